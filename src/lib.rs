//! Substitutes `{{ name }}` placeholders in text with values from a model.
//!
//! ```
//! use std::collections::HashMap;
//!
//! let model = HashMap::from([("TAG", "REPLACED")]);
//! assert_eq!(tagsub::render(&model, "a {{ TAG }}").unwrap(), "a REPLACED");
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod model;
pub mod parser;

pub use config::{ConfigError, ModelFile};
pub use engine::{render, TemplateEngine};
pub use error::{ModelError, Position, RenderError};
pub use model::Model;
pub use parser::{is_tag_name, placeholders, tag_names, Scanner, Segment, Tag};
