//! Arena-backed section tree.
//!
//! Nodes live in a flat `Vec` with parent and children relationships
//! tracked by index. Index `0` is always the virtual root: depth `0`, no
//! title, no numbering. Body paragraphs that precede the first heading
//! belong to the root.

use std::collections::BTreeMap;
use std::fmt;

/// Index of a node in a [`SectionTree`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Position of the node in the arena.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// A body paragraph attached to a section.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BodyParagraph {
    /// Raw paragraph text.
    pub text: String,
    /// Position in the source stream.
    pub ordinal: usize,
}

/// A node in the reconstructed hierarchy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SectionNode {
    /// Heading text, empty for the root and for placeholders.
    pub title: String,
    /// Depth in the tree, `0` for the root.
    pub depth: usize,
    /// 1-based sibling ordinals from the root down to this node.
    pub numbering: Vec<u32>,
    /// True for nodes synthesized to fill a skipped heading level.
    pub placeholder: bool,
    /// Ordinal of the heading paragraph, `None` for the root and placeholders.
    pub source_ordinal: Option<usize>,
    /// Body paragraphs that belong directly to this node, in source order.
    pub content: Vec<BodyParagraph>,
}

impl SectionNode {
    pub(crate) fn root() -> Self {
        Self {
            title: String::new(),
            depth: 0,
            numbering: Vec::new(),
            placeholder: false,
            source_ordinal: None,
            content: Vec::new(),
        }
    }

    /// Numbering path joined with dots, e.g. `2.3.1`.
    #[must_use]
    pub fn numbering_label(&self) -> String {
        NumberingLabel(&self.numbering).to_string()
    }
}

struct NumberingLabel<'a>(&'a [u32]);

impl fmt::Display for NumberingLabel<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, part) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{part}")?;
        }
        Ok(())
    }
}

/// Counts describing a [`SectionTree`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TreeStatistics {
    /// Number of sections per depth (root excluded).
    pub per_depth: BTreeMap<usize, usize>,
    /// Number of synthesized placeholder sections.
    pub placeholders: usize,
    /// Number of body paragraphs across all nodes.
    pub paragraphs: usize,
    /// Number of sections (root excluded).
    pub total: usize,
}

/// Section hierarchy with O(1) parent and children access.
///
/// Immutable once built; share it by reference with the assembler.
#[derive(Clone, Debug)]
pub struct SectionTree {
    nodes: Vec<SectionNode>,
    children: Vec<Vec<usize>>,
    parents: Vec<Option<usize>>,
}

impl Default for SectionTree {
    fn default() -> Self {
        Self::new()
    }
}

impl SectionTree {
    /// Create a tree holding only the root.
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            nodes: vec![SectionNode::root()],
            children: vec![Vec::new()],
            parents: vec![None],
        }
    }

    /// Append a child under `parent` and assign its numbering.
    ///
    /// Depth and numbering are derived from the parent; the new node gets
    /// the next 1-based ordinal among its siblings.
    pub(crate) fn add_child(
        &mut self,
        parent: NodeId,
        title: String,
        placeholder: bool,
        source_ordinal: Option<usize>,
    ) -> NodeId {
        let idx = self.nodes.len();
        let parent_node = &self.nodes[parent.0];
        let depth = parent_node.depth + 1;
        let ordinal = u32::try_from(self.children[parent.0].len() + 1).unwrap_or(u32::MAX);
        let mut numbering = Vec::with_capacity(parent_node.numbering.len() + 1);
        numbering.extend_from_slice(&parent_node.numbering);
        numbering.push(ordinal);

        self.nodes.push(SectionNode {
            title,
            depth,
            numbering,
            placeholder,
            source_ordinal,
            content: Vec::new(),
        });
        self.children.push(Vec::new());
        self.parents.push(Some(parent.0));
        self.children[parent.0].push(idx);

        NodeId(idx)
    }

    pub(crate) fn push_content(&mut self, id: NodeId, paragraph: BodyParagraph) {
        self.nodes[id.0].content.push(paragraph);
    }

    /// The virtual root.
    #[must_use]
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Node by id.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not belong to this tree.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &SectionNode {
        &self.nodes[id.0]
    }

    /// Node by id, `None` if out of range.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&SectionNode> {
        self.nodes.get(id.0)
    }

    /// Number of nodes, root included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when the tree holds no sections and no root content.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1 && self.nodes[0].content.is_empty()
    }

    /// Children of `id` in sibling order.
    pub fn children(&self, id: NodeId) -> impl ExactSizeIterator<Item = NodeId> + '_ {
        self.children[id.0].iter().map(|&idx| NodeId(idx))
    }

    /// Parent of `id`, `None` for the root.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.parents[id.0].map(NodeId)
    }

    /// All nodes in depth-first pre-order, root first.
    ///
    /// This is document order: a node precedes its content and its
    /// children, and siblings keep source order.
    #[must_use]
    pub fn preorder(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![0];
        while let Some(idx) = stack.pop() {
            order.push(NodeId(idx));
            stack.extend(self.children[idx].iter().rev());
        }
        order
    }

    /// Find the node whose numbering path equals `numbering`.
    ///
    /// An empty path returns the root.
    #[must_use]
    pub fn find_by_numbering(&self, numbering: &[u32]) -> Option<NodeId> {
        let mut current = 0;
        for &ordinal in numbering {
            let position = usize::try_from(ordinal).ok()?.checked_sub(1)?;
            current = *self.children[current].get(position)?;
        }
        Some(NodeId(current))
    }

    /// Titles from the outermost section down to `id`, root excluded.
    #[must_use]
    pub fn title_path(&self, id: NodeId) -> Vec<&str> {
        let mut path = Vec::new();
        let mut current = Some(id.0);
        while let Some(idx) = current {
            if idx != 0 {
                path.push(self.nodes[idx].title.as_str());
            }
            current = self.parents[idx];
        }
        path.reverse();
        path
    }

    /// Section counts per depth, placeholders and paragraphs.
    #[must_use]
    pub fn statistics(&self) -> TreeStatistics {
        let mut stats = TreeStatistics::default();
        for node in &self.nodes {
            stats.paragraphs += node.content.len();
            if node.depth == 0 {
                continue;
            }
            *stats.per_depth.entry(node.depth).or_default() += 1;
            stats.total += 1;
            if node.placeholder {
                stats.placeholders += 1;
            }
        }
        stats
    }
}
