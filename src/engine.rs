use std::collections::BTreeMap;

use crate::error::{ModelError, Position, RenderError};
use crate::model::Model;
use crate::parser::{is_tag_name, tag_names, Scanner, Segment};

/// Renders `template`, replacing every `{{ name }}` with its value in `model`.
///
/// Rendering is all-or-nothing: the first error found, scanning left to
/// right, is returned and no partial output is produced.
///
/// # Arguments
///
/// * `model` - The values placeholders resolve to.
/// * `template` - The template text.
///
/// # Returns
///
/// The rendered string, or the first `RenderError` encountered.
pub fn render<M: Model + ?Sized>(model: &M, template: &str) -> Result<String, RenderError> {
    let mut output = String::with_capacity(template.len());
    for segment in Scanner::new(template) {
        match segment? {
            Segment::Text(text) => output.push_str(text),
            Segment::Tag(tag) => match model.lookup(tag.name) {
                Some(value) => output.push_str(value),
                None => {
                    return Err(RenderError::UnknownTag {
                        name: tag.name.to_string(),
                        position: Position::locate(template, tag.span.start),
                    })
                }
            },
        }
    }
    Ok(output)
}

/// TemplateEngine owns a model and renders templates against it.
#[derive(Debug, Clone, Default)]
pub struct TemplateEngine {
    model: BTreeMap<String, String>,
}

impl TemplateEngine {
    /// Creates a new TemplateEngine with an empty model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a TemplateEngine from an existing model, checking every name.
    pub fn with_model(model: BTreeMap<String, String>) -> Result<Self, ModelError> {
        let mut engine = Self::new();
        engine.extend(model)?;
        Ok(engine)
    }

    /// Sets the value of a tag, replacing any previous value.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<(), ModelError> {
        let name = name.into();
        if !is_tag_name(&name) {
            return Err(ModelError::InvalidTagName(name));
        }
        self.model.insert(name, value.into());
        Ok(())
    }

    pub fn extend<I, K, V>(&mut self, entries: I) -> Result<(), ModelError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (name, value) in entries {
            self.insert(name, value)?;
        }
        Ok(())
    }

    pub fn model(&self) -> &BTreeMap<String, String> {
        &self.model
    }

    /// Renders a template string against the engine's model.
    pub fn render_string(&self, template: &str) -> Result<String, RenderError> {
        render(&self.model, template)
    }

    /// Returns the names used in `template` that the model lacks, each once.
    pub fn missing_tags(&self, template: &str) -> Result<Vec<String>, RenderError> {
        Ok(tag_names(template)?
            .into_iter()
            .filter(|name| self.model.lookup(name).is_none())
            .map(str::to_string)
            .collect())
    }
}
