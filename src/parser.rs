//! Single-pass scanner splitting a template into text and `{{ name }}` tags.
//!
//! Scanning rules:
//!
//! * `{{` followed by anything other than `{` opens a placeholder, which
//!   closes at the first `}}` after it. Placeholders do not nest, so
//!   `{{ a {{ b }} }}` has the interior ` a {{ b ` and is malformed.
//! * A run of three or more `{` is an escape and renders as a single `{`.
//! * A lone `{`, and any `}` outside a placeholder, is plain text.

use std::ops::Range;

use crate::error::{Position, RenderError};

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

/// Returns true if `s` is a valid tag name: an ASCII letter followed by
/// ASCII letters or digits.
pub fn is_tag_name(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => chars.all(|c| c.is_ascii_alphanumeric()),
        _ => false,
    }
}

/// A well-formed placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag<'a> {
    /// The trimmed tag name.
    pub name: &'a str,
    /// Byte range of the whole marker, braces included.
    pub span: Range<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Text copied to the output unchanged.
    Text(&'a str),
    Tag(Tag<'a>),
}

/// Iterator over the segments of a template.
///
/// Yields at most one error, after which it is exhausted.
pub struct Scanner<'a> {
    source: &'a str,
    pos: usize,
    failed: bool,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            pos: 0,
            failed: false,
        }
    }

    fn fail(&mut self, err: RenderError) -> Option<Result<Segment<'a>, RenderError>> {
        self.failed = true;
        Some(Err(err))
    }

    /// Scans the marker starting at `self.pos`, which points at `{{`.
    fn scan_open(&mut self) -> Option<Result<Segment<'a>, RenderError>> {
        let start = self.pos;
        let rest = &self.source[start..];
        let run = rest.bytes().take_while(|&b| b == b'{').count();
        if run > OPEN.len() {
            self.pos += run;
            return Some(Ok(Segment::Text("{")));
        }

        let body = &rest[OPEN.len()..];
        let Some(close) = body.find(CLOSE) else {
            return self.fail(RenderError::UnterminatedPlaceholder {
                position: Position::locate(self.source, start),
            });
        };

        let interior = &body[..close];
        let name = interior.trim();
        if !is_tag_name(name) {
            return self.fail(RenderError::MalformedTag {
                raw: interior.to_string(),
                position: Position::locate(self.source, start),
            });
        }

        self.pos = start + OPEN.len() + close + CLOSE.len();
        Some(Ok(Segment::Tag(Tag {
            name,
            span: start..self.pos,
        })))
    }
}

impl<'a> Iterator for Scanner<'a> {
    type Item = Result<Segment<'a>, RenderError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.pos >= self.source.len() {
            return None;
        }
        let rest = &self.source[self.pos..];
        match rest.find(OPEN) {
            None => {
                self.pos = self.source.len();
                Some(Ok(Segment::Text(rest)))
            }
            Some(0) => self.scan_open(),
            Some(i) => {
                self.pos += i;
                Some(Ok(Segment::Text(&rest[..i])))
            }
        }
    }
}

impl std::iter::FusedIterator for Scanner<'_> {}

/// Collects every placeholder in `template`, in order of appearance.
///
/// Stops at the first malformed or unterminated placeholder. No model is
/// consulted, so unknown names are not reported here.
pub fn placeholders(template: &str) -> Result<Vec<Tag<'_>>, RenderError> {
    let mut tags = Vec::new();
    for segment in Scanner::new(template) {
        if let Segment::Tag(tag) = segment? {
            tags.push(tag);
        }
    }
    Ok(tags)
}

/// Distinct tag names in `template`, in order of first appearance.
pub fn tag_names(template: &str) -> Result<Vec<&str>, RenderError> {
    let mut names: Vec<&str> = Vec::new();
    for tag in placeholders(template)? {
        if !names.contains(&tag.name) {
            names.push(tag.name);
        }
    }
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segments(template: &str) -> Vec<Result<Segment<'_>, RenderError>> {
        Scanner::new(template).collect()
    }

    #[test]
    fn test_is_tag_name() {
        assert!(is_tag_name("TAG"));
        assert!(is_tag_name("a1"));
        assert!(is_tag_name("x"));
        assert!(!is_tag_name(""));
        assert!(!is_tag_name("1a"));
        assert!(!is_tag_name("snake_case"));
        assert!(!is_tag_name("with space"));
        assert!(!is_tag_name("é"));
    }

    #[test]
    fn test_plain_text_is_one_segment() {
        assert_eq!(segments("No tags"), vec![Ok(Segment::Text("No tags"))]);
        assert!(segments("").is_empty());
    }

    #[test]
    fn test_tag_span_and_trim() {
        let segs = segments("a {{ TAG }}!");
        assert_eq!(
            segs,
            vec![
                Ok(Segment::Text("a ")),
                Ok(Segment::Tag(Tag {
                    name: "TAG",
                    span: 2..11,
                })),
                Ok(Segment::Text("!")),
            ]
        );
    }

    #[test]
    fn test_tabs_around_name() {
        let tags = placeholders("{{\tname\t}}").unwrap();
        assert_eq!(tags[0].name, "name");
    }

    #[test]
    fn test_escape_runs_collapse_to_one_brace() {
        assert_eq!(
            segments("x{{{y"),
            vec![
                Ok(Segment::Text("x")),
                Ok(Segment::Text("{")),
                Ok(Segment::Text("y")),
            ]
        );
        assert_eq!(segments("{{{{{{{"), vec![Ok(Segment::Text("{"))]);
    }

    #[test]
    fn test_single_braces_are_text() {
        assert_eq!(segments("{a}"), vec![Ok(Segment::Text("{a}"))]);
        assert_eq!(segments("end {"), vec![Ok(Segment::Text("end {"))]);
        assert_eq!(segments("}} stray"), vec![Ok(Segment::Text("}} stray"))]);
    }

    #[test]
    fn test_unterminated() {
        let segs = segments("ab {{ TAG");
        assert_eq!(segs.len(), 2);
        match &segs[1] {
            Err(RenderError::UnterminatedPlaceholder { position }) => {
                assert_eq!(position.offset, 3)
            }
            other => panic!("unexpected segment: {:?}", other),
        }
        assert!(matches!(
            segments("{{").as_slice(),
            [Err(RenderError::UnterminatedPlaceholder { .. })]
        ));
    }

    #[test]
    fn test_nested_open_is_malformed() {
        let err = placeholders("{{ a {{ b }} }}").unwrap_err();
        match err {
            RenderError::MalformedTag { raw, position } => {
                assert_eq!(raw, " a {{ b ");
                assert_eq!(position.offset, 0);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_empty_tag_is_malformed() {
        assert!(matches!(
            placeholders("{{}}"),
            Err(RenderError::MalformedTag { raw, .. }) if raw.is_empty()
        ));
        assert!(matches!(
            placeholders("{{   }}"),
            Err(RenderError::MalformedTag { .. })
        ));
    }

    #[test]
    fn test_scanner_stops_after_error() {
        let mut scanner = Scanner::new("{{ 1x }} {{ ok }}");
        assert!(matches!(scanner.next(), Some(Err(_))));
        assert!(scanner.next().is_none());
        assert!(scanner.next().is_none());
    }

    #[test]
    fn test_placeholders_in_order() {
        let tags = placeholders("{{ b }}-{{a}}-{{ b }}").unwrap();
        let names: Vec<_> = tags.iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["b", "a", "b"]);
    }

    #[test]
    fn test_tag_names_are_distinct() {
        assert_eq!(tag_names("{{b}} {{a}} {{b}}").unwrap(), vec!["b", "a"]);
        assert_eq!(tag_names("{{ x }}{{x}}{{\tx }}").unwrap(), vec!["x"]);
        assert!(tag_names("no tags").unwrap().is_empty());
        assert!(tag_names("{{a}} {{").is_err());
    }

    #[test]
    fn test_unicode_whitespace_is_trimmed() {
        let tags = placeholders("{{\u{a0}x\u{a0}}}").unwrap();
        assert_eq!(tags[0].name, "x");
    }

    #[test]
    fn test_multibyte_text_around_tags() {
        let tags = placeholders("héllo {{ x }} wörld").unwrap();
        assert_eq!(tags[0].span, 7..14);
    }
}
