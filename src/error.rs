use std::fmt;
use thiserror::Error;

/// Location of a placeholder inside a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    /// Byte offset of the opening `{{`.
    pub offset: usize,
    /// 1-based line number.
    pub line: usize,
    /// 1-based column, counted in characters.
    pub column: usize,
}

impl Position {
    /// Resolves a byte offset in `source` to a line/column position.
    ///
    /// `offset` must lie on a char boundary; the scanner only ever reports
    /// offsets of ASCII `{` characters.
    pub fn locate(source: &str, offset: usize) -> Self {
        let before = &source[..offset];
        let line_start = before.rfind('\n').map_or(0, |i| i + 1);
        Self {
            offset,
            line: before.matches('\n').count() + 1,
            column: before[line_start..].chars().count() + 1,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// The reasons a template can fail to render.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error("unknown tag `{name}` at {position}")]
    UnknownTag { name: String, position: Position },
    #[error("malformed tag `{raw}` at {position}")]
    MalformedTag { raw: String, position: Position },
    #[error("unterminated placeholder at {position}")]
    UnterminatedPlaceholder { position: Position },
}

impl RenderError {
    pub fn position(&self) -> Position {
        match self {
            RenderError::UnknownTag { position, .. }
            | RenderError::MalformedTag { position, .. }
            | RenderError::UnterminatedPlaceholder { position } => *position,
        }
    }
}

/// Raised when a name cannot be used as a model key.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("invalid tag name: {0:?}")]
    InvalidTagName(String),
}
