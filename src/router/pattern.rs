//! Route patterns.
//!
//! A pattern is split on `/` exactly like the paths it is matched against.
//! A segment that starts with [`PARAM_MARKER`] binds the corresponding path
//! segment under its name; every other segment must match literally. There
//! are no wildcards, optional segments or prefix matches, so a pattern and a
//! path can only match when they have the same number of segments.

use super::params::RouteParams;

/// Marks a segment as a named parameter.
pub const PARAM_MARKER: char = ':';

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
}

/// A parsed `/`-delimited route template such as `/anime/:id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePattern {
    raw: String,
    segments: Vec<Segment>,
}

impl RoutePattern {
    /// Parses `pattern`. Parsing cannot fail; any string is a valid pattern.
    pub fn parse(pattern: &str) -> Self {
        let segments = pattern
            .split('/')
            .map(|segment| match segment.strip_prefix(PARAM_MARKER) {
                Some(name) => Segment::Param(name.to_string()),
                None => Segment::Literal(segment.to_string()),
            })
            .collect();

        Self {
            raw: pattern.to_string(),
            segments,
        }
    }

    /// The pattern as registered.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Names of the parameters, in pattern order.
    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Param(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// Whether `path` matches this pattern structurally.
    pub fn matches(&self, path: &str) -> bool {
        let mut actual = path.split('/');
        for segment in &self.segments {
            match (segment, actual.next()) {
                (_, None) => return false,
                (Segment::Literal(expected), Some(part)) if expected != part => return false,
                _ => {}
            }
        }
        actual.next().is_none()
    }

    /// Matches `path` and binds every parameter to its raw segment.
    pub fn extract(&self, path: &str) -> Option<RouteParams> {
        if !self.matches(path) {
            return None;
        }

        Some(
            self.segments
                .iter()
                .zip(path.split('/'))
                .filter_map(|(segment, part)| match segment {
                    Segment::Param(name) => Some((name.clone(), part.to_string())),
                    Segment::Literal(_) => None,
                })
                .collect(),
        )
    }
}

impl std::fmt::Display for RoutePattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}
