use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading an NFe or rendering its DANFE.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DanfeError {
    /// Reading the source XML file failed.
    #[error("failed to read '{}': {source}", path.display())]
    Io {
        /// Path that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The document is not well-formed XML.
    #[error("XML parse error: {0}")]
    Xml(String),

    /// The DANFE template failed to compile.
    #[error("template error: {0}")]
    Template(#[from] handlebars::TemplateError),

    /// Substituting the template data failed.
    #[error("render error: {0}")]
    Render(#[from] handlebars::RenderError),
}
