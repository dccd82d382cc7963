use std::collections::HashMap;

use crate::source::Attributes;

/// Builds a node from the attributes of the element that opened it.
pub type Constructor<N> = fn(&Attributes) -> N;

/// Which tags open a new node, per feed format.
///
/// Keys are canonical, lowercased tag names. A tag that is not in the
/// table never creates a node; its text becomes a field on whatever node
/// is current when it closes. Tables are built once and shared by every
/// parser of that format.
pub struct DispatchTable<N> {
    entries: HashMap<&'static str, Constructor<N>>,
}

impl<N> DispatchTable<N> {
    pub fn new(entries: &[(&'static str, Constructor<N>)]) -> Self {
        Self {
            entries: entries.iter().copied().collect(),
        }
    }

    /// Looks up an already-lowercased tag.
    pub fn get(&self, tag: &str) -> Option<Constructor<N>> {
        self.entries.get(tag).copied()
    }
}

impl<N> std::fmt::Debug for DispatchTable<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut tags: Vec<_> = self.entries.keys().collect();
        tags.sort();
        f.debug_struct("DispatchTable").field("tags", &tags).finish()
    }
}
