//! Render a DANFE from an NFe XML file and print the HTML to stdout.
//!
//! ```text
//! cargo run --example render_danfe [caminho/para/nfe.xml]
//! ```
//!
//! Without an argument the bundled sample document is used.

use danfe::Danfe;

fn main() -> Result<(), danfe::DanfeError> {
    let danfe = match std::env::args().nth(1) {
        Some(path) => Danfe::from_file(path)?,
        None => Danfe::from_xml(include_str!("../tests/fixtures/nfe.xml"))?,
    };
    println!("{}", danfe.to_html()?);
    Ok(())
}
