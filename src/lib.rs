//! # danfe
//!
//! DANFE generation for Brazilian NFe invoices: parse the NFe XML (layout
//! 3.10/4.00) into a typed document model and render the printable DANFE
//! as HTML.
//!
//! All monetary values use [`rust_decimal::Decimal`] — never floating
//! point. Formatting follows the DANFE print conventions: `1.234,50`
//! money, `DD/MM/YYYY` dates, masked CPF/CNPJ, the access key in groups
//! of four.
//!
//! ## Quick Start
//!
//! ```rust
//! use danfe::Danfe;
//!
//! let xml = r#"
//! <NFe xmlns="http://www.portalfiscal.inf.br/nfe">
//!   <infNFe Id="NFe35230512345678000195550010000012341000012349" versao="4.00">
//!     <ide>
//!       <natOp>VENDA DE MERCADORIA</natOp>
//!       <serie>1</serie><nNF>1234</nNF>
//!       <dhEmi>2023-05-04T10:20:30-03:00</dhEmi><tpNF>1</tpNF>
//!     </ide>
//!     <emit><CNPJ>12345678000195</CNPJ><xNome>ACME Ltda</xNome></emit>
//!   </infNFe>
//! </NFe>"#;
//!
//! let html = Danfe::from_xml(xml)?.to_html()?;
//! assert!(html.contains("1234"));
//! assert!(html.contains("12.345.678/0001-95"));
//! # Ok::<(), danfe::DanfeError>(())
//! ```
//!
//! An invalid or absent document degrades to an empty rendering; I/O and
//! XML failures come back as [`DanfeError`]. The two channels never mix.

pub mod format;
pub mod nfe;
pub mod render;

mod error;
mod model;

pub use error::DanfeError;
pub use model::Danfe;
