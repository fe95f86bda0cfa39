use std::fmt;
use std::str::FromStr;

/// A dot-separated location inside a record, e.g. `"university_info.courses"`
/// or `"page.fees.original"`.
///
/// Parsing rejects empty paths and empty segments, so an invalid address fails
/// at construction instead of being silently ignored when applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath {
    segments: Vec<String>,
}

impl FieldPath {
    pub fn new(segments: Vec<String>) -> Result<Self, String> {
        if segments.is_empty() {
            return Err("Field path cannot be empty".to_string());
        }
        if segments.iter().any(|seg| seg.is_empty()) {
            return Err(format!(
                "Field path '{}' has an empty segment",
                segments.join(".")
            ));
        }
        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// The final segment: the field or list being addressed.
    pub fn leaf(&self) -> &str {
        // new() guarantees at least one segment
        match self.segments.last() {
            Some(leaf) => leaf,
            None => "",
        }
    }

    /// Every segment except the last; these must resolve to mappings.
    pub fn parents(&self) -> &[String] {
        &self.segments[..self.segments.len() - 1]
    }

    /// A new path one segment deeper than this one.
    pub fn child(&self, segment: &str) -> FieldPath {
        let mut segments = self.segments.clone();
        segments.push(segment.to_string());
        FieldPath { segments }
    }
}

impl FromStr for FieldPath {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err("Field path cannot be empty".to_string());
        }
        let segments: Vec<String> = s.split('.').map(|seg| seg.to_string()).collect();
        if segments.iter().any(|seg| seg.is_empty()) {
            return Err(format!("Field path '{}' has an empty segment", s));
        }
        Ok(Self { segments })
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_single_segment() {
        let path = FieldPath::from_str("title").unwrap();
        assert_eq!(path.segments(), ["title"]);
        assert_eq!(path.leaf(), "title");
        assert!(path.parents().is_empty());
    }

    #[test]
    fn parses_nested_path() {
        let path = FieldPath::from_str("university_info.about.highlights").unwrap();
        assert_eq!(path.parents(), ["university_info", "about"]);
        assert_eq!(path.leaf(), "highlights");
        assert_eq!(path.to_string(), "university_info.about.highlights");
    }

    #[test]
    fn rejects_empty_path() {
        assert!(FieldPath::from_str("").is_err());
    }

    #[test]
    fn rejects_empty_segments() {
        assert!(FieldPath::from_str("a..b").is_err());
        assert!(FieldPath::from_str(".a").is_err());
        assert!(FieldPath::from_str("a.").is_err());
    }

    #[test]
    fn child_extends_path() {
        let base = FieldPath::from_str("page.courses").unwrap();
        assert_eq!(base.child("fees").to_string(), "page.courses.fees");
    }
}
