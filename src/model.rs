use std::fs;
use std::path::Path;

use crate::error::DanfeError;
use crate::nfe::{self, Nfe};
use crate::render::{Renderer, TemplateData};

/// A DANFE document model.
///
/// Carries either a parsed NFe or nothing; the no-invoice state is valid
/// and renders as an empty string. Rendering is lazy — template data is
/// assembled and substituted only when [`to_html`] is called.
///
/// [`to_html`]: Danfe::to_html
#[derive(Debug, Clone, Default)]
pub struct Danfe {
    nfe: Option<Nfe>,
}

impl Danfe {
    /// The explicit no-invoice model. Renders as an empty string.
    pub fn empty() -> Self {
        Self { nfe: None }
    }

    /// Model over an already-parsed document.
    pub fn from_nfe(nfe: Nfe) -> Self {
        Self { nfe: Some(nfe) }
    }

    /// Model from raw NFe XML text.
    ///
    /// Blank input degrades to the empty model; malformed XML is the
    /// parser's error, propagated untranslated.
    pub fn from_xml(xml: &str) -> Result<Self, DanfeError> {
        if xml.trim().is_empty() {
            return Ok(Self::empty());
        }
        Ok(Self::from_nfe(nfe::parse(xml)?))
    }

    /// Model from an NFe XML file.
    ///
    /// An empty path degrades to the empty model; a read failure is an
    /// error naming the path and the underlying cause.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, DanfeError> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Ok(Self::empty());
        }
        log::debug!("reading NFe from '{}'", path.display());
        let xml = fs::read_to_string(path).map_err(|source| DanfeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_xml(&xml)
    }

    /// The parsed document, when the model carries one.
    pub fn nfe(&self) -> Option<&Nfe> {
        self.nfe.as_ref()
    }

    /// Assemble the template context; `None` means nothing to render.
    pub fn template_data(&self) -> Option<TemplateData> {
        self.nfe.as_ref().map(TemplateData::from_nfe)
    }

    /// Render the DANFE with the built-in template.
    pub fn to_html(&self) -> Result<String, DanfeError> {
        self.to_html_with(&Renderer::new()?)
    }

    /// Render the DANFE with an injected renderer.
    pub fn to_html_with(&self, renderer: &Renderer) -> Result<String, DanfeError> {
        match self.template_data() {
            None => Ok(String::new()),
            Some(dados) => renderer.render(&dados),
        }
    }
}
