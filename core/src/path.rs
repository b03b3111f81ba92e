//! Path templates such as `/order/{id}`.

use crate::error::DefinitionError;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use std::collections::BTreeMap;
use std::fmt;

/// Everything outside the RFC 3986 unreserved set.
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Variable(String),
}

/// A parsed OpenAPI path template.
///
/// ```
/// use order_api_core::PathTemplate;
///
/// let template = PathTemplate::parse("/order/{id}").unwrap();
/// assert_eq!(template.axum_route(), "/order/:id");
///
/// let params = template.matches("/order/234578").unwrap();
/// assert_eq!(params["id"], "234578");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTemplate {
    raw: String,
    segments: Vec<Segment>,
}

impl PathTemplate {
    /// Parses a template. Each `{name}` must span a whole segment.
    ///
    /// # Errors
    ///
    /// Returns [`DefinitionError::InvalidPathTemplate`] when the template does
    /// not start with `/`, has unbalanced braces, an empty or repeated
    /// variable, or a variable mixed with literal text in one segment.
    pub fn parse(template: &str) -> Result<Self, DefinitionError> {
        let invalid = |reason: &str| DefinitionError::InvalidPathTemplate {
            template: template.to_string(),
            reason: reason.to_string(),
        };

        let rest = template
            .strip_prefix('/')
            .ok_or_else(|| invalid("must start with '/'"))?;

        let mut segments = Vec::new();
        if !rest.is_empty() {
            for part in rest.split('/') {
                let segment = match part.strip_prefix('{').and_then(|p| p.strip_suffix('}')) {
                    Some(name) if name.is_empty() => return Err(invalid("empty variable name")),
                    Some(name) if name.contains(['{', '}']) => {
                        return Err(invalid("unbalanced braces"));
                    }
                    Some(name) => Segment::Variable(name.to_string()),
                    None if part.contains(['{', '}']) => {
                        return Err(invalid("variables must span a whole segment"));
                    }
                    None => Segment::Literal(part.to_string()),
                };

                if let Segment::Variable(name) = &segment {
                    if segments.contains(&segment) {
                        return Err(invalid(&format!("variable '{name}' appears twice")));
                    }
                }
                segments.push(segment);
            }
        }

        Ok(Self {
            raw: template.to_string(),
            segments,
        })
    }

    /// The template as written in the document.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Variable names in order of appearance.
    pub fn variables(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Variable(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// The equivalent axum 0.7 route (`/order/:id`).
    #[must_use]
    pub fn axum_route(&self) -> String {
        self.join(|segment| match segment {
            Segment::Literal(text) => text.clone(),
            Segment::Variable(name) => format!(":{name}"),
        })
    }

    /// Matches a concrete request path, returning the captured variables.
    ///
    /// Captured values are returned exactly as they appear in the path
    /// (no percent-decoding). Empty segments never match a variable.
    #[must_use]
    pub fn matches(&self, path: &str) -> Option<BTreeMap<String, String>> {
        let rest = path.strip_prefix('/')?;
        let parts: Vec<&str> = if rest.is_empty() {
            Vec::new()
        } else {
            rest.split('/').collect()
        };

        if parts.len() != self.segments.len() {
            return None;
        }

        let mut captured = BTreeMap::new();
        for (segment, part) in self.segments.iter().zip(parts) {
            match segment {
                Segment::Literal(text) if text == part => {}
                Segment::Variable(name) if !part.is_empty() => {
                    captured.insert(name.clone(), part.to_string());
                }
                _ => return None,
            }
        }
        Some(captured)
    }

    /// Substitutes variables, percent-encoding each value as one segment.
    ///
    /// # Errors
    ///
    /// Returns [`DefinitionError::MissingPathValue`] if a variable has no value
    /// and [`DefinitionError::InvalidPathValue`] for a value that cannot be
    /// sent as a single segment (empty, `.` or `..`).
    pub fn render<'a, F>(&self, mut value_of: F) -> Result<String, DefinitionError>
    where
        F: FnMut(&str) -> Option<&'a str>,
    {
        let mut rendered = String::new();
        for segment in &self.segments {
            rendered.push('/');
            match segment {
                Segment::Literal(text) => rendered.push_str(text),
                Segment::Variable(name) => {
                    let value = value_of(name)
                        .ok_or_else(|| DefinitionError::MissingPathValue(name.clone()))?;
                    // URL resolution drops dot segments, even percent-encoded ones
                    if matches!(value, "" | "." | "..") {
                        return Err(DefinitionError::InvalidPathValue {
                            name: name.clone(),
                            value: value.to_string(),
                        });
                    }
                    rendered.extend(utf8_percent_encode(value, SEGMENT));
                }
            }
        }
        if rendered.is_empty() {
            rendered.push('/');
        }
        Ok(rendered)
    }

    fn join(&self, render: impl Fn(&Segment) -> String) -> String {
        if self.segments.is_empty() {
            return "/".to_string();
        }
        self.segments.iter().fold(String::new(), |mut acc, segment| {
            acc.push('/');
            acc.push_str(&render(segment));
            acc
        })
    }
}

impl fmt::Display for PathTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_variables() {
        let template = PathTemplate::parse("/order/{id}").unwrap();
        assert_eq!(template.variables().collect::<Vec<_>>(), vec!["id"]);
        assert_eq!(template.axum_route(), "/order/:id");
        assert_eq!(template.to_string(), "/order/{id}");
    }

    #[test]
    fn test_parse_rejects_malformed_templates() {
        for bad in ["order/{id}", "/order/{}", "/order/id-{id}", "/order/{id}/{id}", "/order/{i{d}"] {
            assert!(
                matches!(
                    PathTemplate::parse(bad),
                    Err(DefinitionError::InvalidPathTemplate { .. })
                ),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_matches() {
        let template = PathTemplate::parse("/order/{id}").unwrap();

        let params = template.matches("/order/234578").unwrap();
        assert_eq!(params.get("id").map(String::as_str), Some("234578"));

        assert!(template.matches("/order/").is_none());
        assert!(template.matches("/order").is_none());
        assert!(template.matches("/orders/1").is_none());
        assert!(template.matches("/order/1/extra").is_none());
    }

    #[test]
    fn test_render_encodes_values() {
        let template = PathTemplate::parse("/order/{id}").unwrap();

        let path = template.render(|_| Some("234578")).unwrap();
        assert_eq!(path, "/order/234578");

        let path = template.render(|_| Some("a b/c?")).unwrap();
        assert_eq!(path, "/order/a%20b%2Fc%3F");
    }

    #[test]
    fn test_render_rejects_dot_and_empty_segments() {
        let template = PathTemplate::parse("/order/{id}").unwrap();
        for value in ["", ".", ".."] {
            let err = template.render(|_| Some(value)).unwrap_err();
            assert!(
                matches!(err, DefinitionError::InvalidPathValue { ref name, value: ref v } if name == "id" && v == value),
                "{value:?} should be rejected"
            );
        }
        assert_eq!(template.render(|_| Some("...")).unwrap(), "/order/...");
        assert_eq!(template.render(|_| Some(".a")).unwrap(), "/order/.a");
    }

    #[test]
    fn test_render_missing_value() {
        let template = PathTemplate::parse("/order/{id}").unwrap();
        let err = template.render(|_| None).unwrap_err();
        assert!(matches!(err, DefinitionError::MissingPathValue(name) if name == "id"));
    }

    #[test]
    fn test_root_template() {
        let template = PathTemplate::parse("/").unwrap();
        assert_eq!(template.axum_route(), "/");
        assert!(template.matches("/").is_some());
        assert_eq!(template.render(|_| None).unwrap(), "/");
    }
}
