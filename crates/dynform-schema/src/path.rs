use std::fmt::{self, Display};

use crate::key::{FieldKey, FieldKeyError};

/// Location of a field or array item in the form tree.
///
/// The first segment of an element identifier is the editor's root prefix;
/// paths used in dependency bindings are relative to the schema root.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FieldPath(pub Vec<PathSegment>);

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PathSegment {
    Key(FieldKey),
    /// Position of an array item at insertion time. Not stable across removals.
    Index(usize),
}

impl FieldPath {
    pub fn root() -> Self {
        FieldPath(Vec::new())
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    pub fn push(&mut self, segment: PathSegment) {
        self.0.push(segment);
    }

    /// Returns a new path extended by `key`.
    pub fn child(&self, key: &FieldKey) -> Self {
        let mut path = self.clone();
        path.push(PathSegment::Key(key.clone()));
        path
    }

    /// Returns a new path extended by an item index.
    pub fn index(&self, index: usize) -> Self {
        let mut path = self.clone();
        path.push(PathSegment::Index(index));
        path
    }

    pub fn last(&self) -> Option<&PathSegment> {
        self.0.last()
    }

    pub fn parent(&self) -> Option<Self> {
        let (_, init) = self.0.split_last()?;
        Some(FieldPath(init.to_vec()))
    }

    pub fn starts_with(&self, prefix: &FieldPath) -> bool {
        self.0.starts_with(&prefix.0)
    }

    /// Drops the first `n` segments.
    pub fn strip_prefix(&self, n: usize) -> Self {
        FieldPath(self.0.iter().skip(n).cloned().collect())
    }

    /// The schema-shape path: item indices removed.
    pub fn without_indices(&self) -> Self {
        FieldPath(
            self.0
                .iter()
                .filter(|segment| matches!(segment, PathSegment::Key(_)))
                .cloned()
                .collect(),
        )
    }

    /// Parses a slash-joined path such as `network/dns/0/host`.
    ///
    /// Purely numeric segments are item indices; everything else must be a
    /// valid [`FieldKey`].
    pub fn parse_slash(s: &str) -> Result<Self, FieldKeyError> {
        if s.is_empty() {
            return Ok(Self::root());
        }
        s.split('/')
            .map(|part| match part.parse::<usize>() {
                Ok(index) => Ok(PathSegment::Index(index)),
                Err(_) => part.parse().map(PathSegment::Key),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(FieldPath)
    }
}

impl From<FieldKey> for FieldPath {
    fn from(key: FieldKey) -> Self {
        FieldPath(vec![PathSegment::Key(key)])
    }
}

impl FromIterator<PathSegment> for FieldPath {
    fn from_iter<T: IntoIterator<Item = PathSegment>>(iter: T) -> Self {
        FieldPath(iter.into_iter().collect())
    }
}

impl Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(key) => write!(f, "{key}"),
            PathSegment::Index(index) => write!(f, "{index}"),
        }
    }
}

impl Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "(root)");
        }
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "/")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(s: &'static str) -> PathSegment {
        PathSegment::Key(FieldKey::new_unchecked(s))
    }

    #[test]
    fn test_display_root() {
        assert_eq!(FieldPath::root().to_string(), "(root)");
    }

    #[test]
    fn test_display_nested() {
        let path = FieldPath(vec![key("data"), key("dns"), PathSegment::Index(2)]);
        assert_eq!(path.to_string(), "data/dns/2");
    }

    #[test]
    fn test_parse_slash_with_index() {
        let path = FieldPath::parse_slash("dns/1/host").unwrap();
        assert_eq!(
            path,
            FieldPath(vec![key("dns"), PathSegment::Index(1), key("host")])
        );
    }

    #[test]
    fn test_parse_slash_rejects_bad_key() {
        assert!(FieldPath::parse_slash("dns/ho st").is_err());
    }

    #[test]
    fn test_without_indices() {
        let path = FieldPath::parse_slash("dns/1/host").unwrap();
        assert_eq!(path.without_indices().to_string(), "dns/host");
    }

    #[test]
    fn test_strip_prefix() {
        let path = FieldPath::parse_slash("data/mode").unwrap();
        assert_eq!(path.strip_prefix(1).to_string(), "mode");
    }

    #[test]
    fn test_parent_and_child() {
        let path = FieldPath::parse_slash("a/b").unwrap();
        let child = path.child(&FieldKey::new_unchecked("c"));
        assert_eq!(child.to_string(), "a/b/c");
        assert_eq!(child.parent(), Some(path));
        assert_eq!(FieldPath::root().parent(), None);
    }
}
