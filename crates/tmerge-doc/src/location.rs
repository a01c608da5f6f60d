//! Addressing elements inside a tree.
//!
//! A [`Location`] is the list of child indexes leading from a root element to
//! one of its descendants. It stays valid while the tree only grows by
//! appending children.

use std::fmt;

/// Child-index path from a root element to a descendant.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Location(Vec<usize>);

impl Location {
    /// The location of the root itself.
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Location of the `index`-th child below this one.
    pub fn child(&self, index: usize) -> Self {
        let mut indexes = self.0.clone();
        indexes.push(index);
        Self(indexes)
    }

    pub fn indexes(&self) -> &[usize] {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("/")?;
        let parts: Vec<String> = self.0.iter().map(usize::to_string).collect();
        f.write_str(&parts.join("/"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_display() {
        assert_eq!(Location::root().to_string(), "/");
        assert_eq!(Location::root().child(1).child(0).to_string(), "/1/0");
        assert_eq!(Location::root().child(1).depth(), 1);
        assert!(Location::root().is_root());
    }
}
