//! NFe document model and XML parsing.
//!
//! The typed [`Nfe`] struct is the contract between the parser and the
//! DANFE data builder: every accessor the rendering side needs exists as a
//! field, and conformance is checked by construction rather than at
//! runtime.

mod parse;
mod types;

pub use parse::parse;
pub use types::*;
