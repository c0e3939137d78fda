//! Watched field path template, e.g. `users/{userId}/shareWith`.
//!
//! Concrete change paths are matched segment by segment; the single `{...}`
//! segment captures the subject id.

use crate::domain::{DomainError, UserId};

/// Path of the field whose writes trigger notifications.
pub const DEFAULT_WATCHED_PATH: &str = "users/{userId}/shareWith";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Wildcard,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath {
    template: String,
    segments: Vec<Segment>,
}

impl FieldPath {
    /// Parse a template. Exactly one segment must be a `{name}` placeholder.
    pub fn parse(template: &str) -> Result<Self, DomainError> {
        let trimmed = template.trim_matches('/');
        if trimmed.is_empty() {
            return Err(DomainError::Config("watched path is empty".into()));
        }
        let segments: Vec<Segment> = trimmed
            .split('/')
            .map(|s| {
                if s.len() > 2 && s.starts_with('{') && s.ends_with('}') {
                    Segment::Wildcard
                } else {
                    Segment::Literal(s.to_string())
                }
            })
            .collect();

        let wildcards = segments
            .iter()
            .filter(|s| matches!(s, Segment::Wildcard))
            .count();
        if wildcards != 1 {
            return Err(DomainError::Config(format!(
                "watched path '{}' must contain exactly one {{id}} placeholder, found {}",
                template, wildcards
            )));
        }

        Ok(Self {
            template: template.to_string(),
            segments,
        })
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    /// Returns the subject id if `path` is an instance of this template.
    pub fn match_path(&self, path: &str) -> Option<UserId> {
        let parts: Vec<&str> = path.trim_matches('/').split('/').collect();
        if parts.len() != self.segments.len() {
            return None;
        }
        let mut id = None;
        for (seg, part) in self.segments.iter().zip(parts) {
            match seg {
                Segment::Literal(lit) if lit != part => return None,
                Segment::Literal(_) => {}
                Segment::Wildcard if part.is_empty() => return None,
                Segment::Wildcard => id = Some(UserId::new(part)),
            }
        }
        id
    }
}

impl Default for FieldPath {
    fn default() -> Self {
        Self {
            template: DEFAULT_WATCHED_PATH.to_string(),
            segments: vec![
                Segment::Literal("users".into()),
                Segment::Wildcard,
                Segment::Literal("shareWith".into()),
            ],
        }
    }
}
