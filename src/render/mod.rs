//! Template data assembly and DANFE rendering.

mod data;

pub use data::{
    DadosDuplicata, DadosItem, DadosParte, DadosServico, DadosVeiculo, DadosVolume, TemplateData,
};

use handlebars::Handlebars;

use crate::error::DanfeError;

/// Built-in DANFE template, compiled into the library.
const TEMPLATE_DANFE: &str = include_str!("../../templates/danfe.hbs");

const TEMPLATE_NAME: &str = "danfe";

/// Compiled DANFE template, ready to substitute [`TemplateData`] into.
///
/// The default renderer carries the built-in template; deployments with
/// their own layout inject it once at startup through [`with_template`]
/// and reuse the renderer across documents.
///
/// [`with_template`]: Renderer::with_template
#[derive(Debug)]
pub struct Renderer {
    registry: Handlebars<'static>,
}

impl Renderer {
    /// Renderer with the built-in DANFE template.
    pub fn new() -> Result<Self, DanfeError> {
        Self::with_template(TEMPLATE_DANFE)
    }

    /// Renderer with an alternative template source.
    pub fn with_template(source: &str) -> Result<Self, DanfeError> {
        let mut registry = Handlebars::new();
        registry.register_template_string(TEMPLATE_NAME, source)?;
        Ok(Self { registry })
    }

    /// Substitute the context into the template, producing the HTML text.
    pub fn render(&self, dados: &TemplateData) -> Result<String, DanfeError> {
        Ok(self.registry.render(TEMPLATE_NAME, dados)?)
    }
}
