//! Format-independent tree construction.
//!
//! The [`TreeBuilder`] consumes open/close/text events and grows a tree of
//! format-specific nodes. It knows nothing about RSS or Atom: a
//! [`DispatchTable`] says which tags become nodes, and the [`TreeNode`]
//! trait says which node accepts which field or child. Anything the
//! tables do not cover is dropped.
//!
//! Nodes live in an arena while the document is open. Each slot remembers
//! its parent, which is what lets a field or child that the current node
//! does not want travel upward to the nearest ancestor that does. When the
//! document ends, the arena is folded bottom-up into an owned tree.

mod dispatch;
mod namespace;
mod recorder;

pub use dispatch::{Constructor, DispatchTable};
pub use namespace::{NamespaceMap, KNOWN_NAMESPACES};
pub use recorder::{ContentKind, MixedContent, Recorder};

use crate::source::{Attributes, Event, DEFAULT_MAX_DEPTH};

/// A node the [`TreeBuilder`] can grow.
///
/// Field names passed in are canonical and lowercased (`dc:creator`,
/// `pubdate`).
pub trait TreeNode: Sized {
    /// Stores element text under `field`. Returns `false` if this node has
    /// no such field, in which case the builder offers it to the parent.
    fn set_text(&mut self, field: &str, value: &str) -> bool;

    /// Consumes attributes of a non-dispatched element that opened while
    /// this node was current (`<itunes:category text="...">`).
    fn set_from_attrs(&mut self, _field: &str, _attrs: &Attributes) {}

    /// Whether this node has a slot for `child` under `field`.
    fn holds(&self, field: &str, child: &Self) -> bool;

    /// Takes ownership of a finished child. Only called after
    /// [`holds`](Self::holds) returned `true` for the same pair.
    fn attach(&mut self, field: &str, child: Self);

    /// The recorder inside this node, if it is a mixed-content node.
    fn recorder(&mut self) -> Option<&mut Recorder> {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct NodeId(usize);

const ROOT: NodeId = NodeId(0);

struct Slot<N> {
    node: N,
    /// Canonical tag that opened the node. `None` for the root.
    tag: Option<String>,
    parent: Option<NodeId>,
    /// Nodes between this one and the root. The root is 0.
    depth: usize,
    /// Children in document order, with the field each arrived under.
    attached: Vec<(String, NodeId)>,
}

/// One open element: its canonical tag and the text seen inside it.
/// Tags and buffers share a frame so they can never drift apart.
#[derive(Debug)]
struct Frame {
    tag: String,
    text: String,
}

/// Event-driven builder for one feed format.
///
/// A builder is reusable: [`reset`](Self::reset) (or
/// [`run`](Self::run), which resets first) starts a fresh document with a
/// fresh namespace map. It is not meant to be shared between threads.
pub struct TreeBuilder<N: 'static> {
    dispatch: &'static DispatchTable<N>,
    new_root: fn() -> N,
    arena: Vec<Slot<N>>,
    cursor: NodeId,
    frames: Vec<Frame>,
    namespaces: NamespaceMap,
    max_depth: usize,
}

impl<N: TreeNode + 'static> TreeBuilder<N> {
    pub fn new(dispatch: &'static DispatchTable<N>, new_root: fn() -> N) -> Self {
        let mut builder = Self {
            dispatch,
            new_root,
            arena: Vec::new(),
            cursor: ROOT,
            frames: Vec::new(),
            namespaces: NamespaceMap::new(),
            max_depth: DEFAULT_MAX_DEPTH,
        };
        builder.reset();
        builder
    }

    /// SEC-003: Deepest node nesting the builder creates. An element that
    /// would open a node below this gets none, and its text falls to the
    /// deepest open node. Every upward walk is bounded by this depth.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Discards any partial tree and starts over with an empty root.
    pub fn reset(&mut self) {
        self.arena.clear();
        self.arena.push(Slot {
            node: (self.new_root)(),
            tag: None,
            parent: None,
            depth: 0,
            attached: Vec::new(),
        });
        self.cursor = ROOT;
        self.frames.clear();
        self.namespaces.clear();
    }

    /// Drives a whole document through the builder and returns its root.
    ///
    /// The first error from `events` aborts the run and is returned as is.
    pub fn run<I, E>(&mut self, events: I) -> Result<N, E>
    where
        I: IntoIterator<Item = Result<Event, E>>,
    {
        self.reset();
        for event in events {
            match event? {
                Event::Open { tag, attrs } => self.start_element(&tag, &attrs),
                Event::Close { tag } => self.end_element(&tag),
                Event::Text(s) => self.text(&s),
            }
        }
        Ok(self.finish())
    }

    pub fn start_element(&mut self, tag: &str, attrs: &Attributes) {
        let tag = self.namespaces.canonicalize(tag, Some(attrs));
        let cursor = self.cursor;

        if let Some(recorder) = self.arena[cursor.0].node.recorder() {
            recorder.start_element(&tag, attrs);
        } else {
            let field = tag.to_ascii_lowercase();
            match self.dispatch.get(&field) {
                Some(construct) => self.descend(construct(attrs), field, &tag),
                None => self.arena[cursor.0].node.set_from_attrs(&field, attrs),
            }
        }

        self.frames.push(Frame {
            tag,
            text: String::new(),
        });
    }

    pub fn text(&mut self, s: &str) {
        if let Some(recorder) = self.arena[self.cursor.0].node.recorder() {
            recorder.text(s);
        } else if let Some(frame) = self.frames.last_mut() {
            frame.text.push_str(s);
        }
    }

    pub fn end_element(&mut self, tag: &str) {
        let tag = self.namespaces.canonicalize(tag, None);
        self.close(&tag);
    }

    /// Folds the arena into an owned tree and resets the builder.
    ///
    /// Elements still open (truncated input) are closed first, so text
    /// already seen inside them is kept.
    pub fn finish(&mut self) -> N {
        while let Some(tag) = self.frames.last().map(|frame| frame.tag.clone()) {
            self.close(&tag);
        }
        let arena = std::mem::take(&mut self.arena);
        tracing::debug!(nodes = arena.len(), "Tree built");
        self.reset();
        fold(arena).unwrap_or_else(self.new_root)
    }

    fn close(&mut self, tag: &str) {
        // Anything left open inside this element closes with it
        while let Some(frame) = self.frames.pop() {
            let value = frame.text.trim();
            if !value.is_empty() {
                self.store_text(&frame.tag, value);
            }
            if frame.tag == *tag {
                break;
            }
        }

        self.resolve_close(tag);
    }

    fn descend(&mut self, child: N, field: String, tag: &str) {
        let depth = self.arena[self.cursor.0].depth + 1;
        if depth > self.max_depth {
            tracing::trace!(tag, depth, "Node nesting too deep, element not built");
            return;
        }
        let holder = self.holder_for(&field, &child);
        let id = NodeId(self.arena.len());
        match holder {
            Some(holder) => self.arena[holder.0].attached.push((field, id)),
            None => tracing::trace!(tag, "No ancestor holds element, its subtree is dropped"),
        }
        self.arena.push(Slot {
            node: child,
            tag: Some(tag.to_string()),
            parent: Some(self.cursor),
            depth,
            attached: Vec::new(),
        });
        self.cursor = id;
    }

    fn holder_for(&self, field: &str, child: &N) -> Option<NodeId> {
        let mut current = Some(self.cursor);
        while let Some(id) = current {
            let slot = &self.arena[id.0];
            if slot.node.holds(field, child) {
                return Some(id);
            }
            current = slot.parent;
        }
        None
    }

    fn store_text(&mut self, tag: &str, value: &str) {
        let field = tag.to_ascii_lowercase();
        let mut current = Some(self.cursor);
        while let Some(id) = current {
            let slot = &mut self.arena[id.0];
            if slot.node.set_text(&field, value) {
                return;
            }
            current = slot.parent;
        }
        tracing::trace!(field, "No node accepts field, dropping");
    }

    fn resolve_close(&mut self, tag: &str) {
        let cursor = self.cursor;
        let slot = &mut self.arena[cursor.0];
        let own_tag = slot.tag.as_deref() == Some(tag);
        let parent = slot.parent;

        if let Some(recorder) = slot.node.recorder() {
            if own_tag {
                recorder.finalize();
                self.cursor = parent.unwrap_or(ROOT);
            } else {
                recorder.end_element(tag);
            }
            return;
        }

        let mut id = cursor;
        loop {
            let slot = &self.arena[id.0];
            if slot.tag.as_deref() == Some(tag) {
                self.cursor = slot.parent.unwrap_or(ROOT);
                return;
            }
            match slot.parent {
                Some(parent) => id = parent,
                None => {
                    tracing::trace!(tag, "Unmatched close tag ignored");
                    return;
                }
            }
        }
    }
}

/// Attaches every slot's children into it, deepest first, and returns the
/// root. Children always sit at higher indices than their holder, so one
/// reverse sweep sees each child finished before its holder.
fn fold<N: TreeNode>(mut arena: Vec<Slot<N>>) -> Option<N> {
    let mut built: Vec<Option<N>> = Vec::with_capacity(arena.len());
    built.resize_with(arena.len(), || None);

    while let Some(slot) = arena.pop() {
        let index = arena.len();
        let mut node = slot.node;
        for (field, child) in slot.attached {
            if let Some(child) = built[child.0].take() {
                node.attach(&field, child);
            }
        }
        built[index] = Some(node);
    }

    built.into_iter().next().flatten()
}
