//! Implication Entity
//!
//! A directed edge between two tags: a file matching the implying tag also
//! matches the implied tag. The edge graph may contain cycles.

use serde::{Deserialize, Serialize};
use super::{Tag, TagId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Implication {
    pub implying_tag: Tag,
    pub implied_tag: Tag,
}

impl Implication {
    pub fn new(implying_tag: Tag, implied_tag: Tag) -> Self {
        Self { implying_tag, implied_tag }
    }

    /// Edge identity for de-duplication: the ordered pair of tag ids
    pub fn key(&self) -> (TagId, TagId) {
        (self.implying_tag.id, self.implied_tag.id)
    }
}

/// A set of edges, typically the result of resolving a closure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Implications(pub Vec<Implication>);

impl Implications {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Whether any edge in the set implies `tag_id`
    pub fn implies(&self, tag_id: TagId) -> bool {
        self.0.iter().any(|i| i.implied_tag.id == tag_id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Implication> {
        self.0.iter()
    }
}

impl IntoIterator for Implications {
    type Item = Implication;
    type IntoIter = std::vec::IntoIter<Implication>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl FromIterator<Implication> for Implications {
    fn from_iter<I: IntoIterator<Item = Implication>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(from: TagId, to: TagId) -> Implication {
        Implication::new(Tag::new(from, format!("t{from}")), Tag::new(to, format!("t{to}")))
    }

    #[test]
    fn test_implies() {
        let set: Implications = vec![edge(1, 2), edge(2, 3)].into_iter().collect();
        assert!(set.implies(2));
        assert!(set.implies(3));
        assert!(!set.implies(1));
        assert!(!Implications::new().implies(1));
    }

    #[test]
    fn test_key_is_ordered_pair() {
        assert_eq!(edge(5, 6).key(), (5, 6));
        assert_ne!(edge(5, 6).key(), edge(6, 5).key());
    }
}
