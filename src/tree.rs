use std::fmt;

use serde::Serialize;

/// A labelled, ordered derivation tree.
///
/// Leaves carry tokens, internal nodes carry the non-terminal they were
/// expanded from. A tree holds no reference to the grammar that built it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tree {
    label: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    children: Vec<Tree>,
}

impl Tree {
    /// Create a node without children
    pub fn leaf(label: impl Into<String>) -> Self {
        Tree {
            label: label.into(),
            children: Vec::new(),
        }
    }

    /// Create a node with the given children
    pub fn node(label: impl Into<String>, children: Vec<Tree>) -> Self {
        Tree {
            label: label.into(),
            children,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn children(&self) -> &[Tree] {
        &self.children
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Labels of all leaves, read left to right
    pub fn get_yield(&self) -> Vec<String> {
        let mut tokens = Vec::new();
        let mut pending = vec![self];

        while let Some(node) = pending.pop() {
            if node.is_leaf() {
                tokens.push(node.label.clone());
            } else {
                pending.extend(node.children.iter().rev());
            }
        }

        tokens
    }

    /// Number of nodes on the longest root-to-leaf path
    pub fn depth(&self) -> usize {
        1 + self.children.iter().map(Tree::depth).max().unwrap_or(0)
    }

    /// Total number of nodes
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(Tree::node_count).sum::<usize>()
    }

    /// Child-index paths to every leaf, left to right
    pub(crate) fn leaf_paths(&self) -> Vec<Vec<usize>> {
        let mut paths = Vec::new();
        let mut pending = vec![(self, Vec::new())];

        while let Some((node, path)) = pending.pop() {
            if node.is_leaf() {
                paths.push(path);
                continue;
            }
            for (index, child) in node.children.iter().enumerate().rev() {
                let mut child_path = path.clone();
                child_path.push(index);
                pending.push((child, child_path));
            }
        }

        paths
    }

    /// The node reached by following child indices from this one
    pub(crate) fn node_mut(&mut self, path: &[usize]) -> Option<&mut Tree> {
        let mut node = self;
        for &index in path {
            node = node.children.get_mut(index)?;
        }
        Some(node)
    }

    /// Replace the children of a leaf; expansion happens once per node
    pub(crate) fn expand(&mut self, children: Vec<Tree>) {
        debug_assert!(self.children.is_empty(), "node {} expanded twice", self.label);
        self.children = children;
    }
}

impl fmt::Display for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_leaf() {
            return write!(f, "{}", self.label);
        }

        write!(f, "[ {}", self.label)?;
        for child in &self.children {
            write!(f, " {}", child)?;
        }
        write!(f, " ]")
    }
}
