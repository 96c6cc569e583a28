use derive_more::Display;
use hashlink::LinkedHashMap;
use snafu::Snafu;
use tracing::trace;

pub const ROOT_NAME: &str = "/";

/// Handle of a node inside a [`FilesystemTree`].
///
/// Handles are only minted by the tree that owns the node, so indexing the
/// arena with one never goes out of bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[display("#{_0}")]
pub struct NodeId(usize);

/// Represents the type of a filesystem node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    File,
    Directory {
        children: LinkedHashMap<String, NodeId>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    name: String,
    kind: NodeKind,
    size: u64,
    parent: Option<NodeId>,
}

impl Node {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// Declared size for files, cumulative size of all files below for directories
    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn is_directory(&self) -> bool {
        matches!(self.kind, NodeKind::Directory { .. })
    }

    /// Child handles in insertion order. Empty for files.
    pub fn children(&self) -> impl Iterator<Item = NodeId> + '_ {
        let children = match &self.kind {
            NodeKind::Directory { children } => Some(children.values().copied()),
            NodeKind::File => None,
        };
        children.into_iter().flatten()
    }
}

/// Arena-backed directory tree rooted at `/`.
///
/// Directory sizes are kept up to date on every insertion by walking the
/// parent chain, so a directory's size always equals the sum of the files
/// in its subtree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilesystemTree {
    nodes: Vec<Node>,
}

impl FilesystemTree {
    pub const ROOT: NodeId = NodeId(0);

    pub fn new() -> Self {
        FilesystemTree {
            nodes: vec![Node {
                name: ROOT_NAME.to_string(),
                kind: NodeKind::Directory {
                    children: LinkedHashMap::new(),
                },
                size: 0,
                parent: None,
            }],
        }
    }

    pub fn root(&self) -> &Node {
        self.node(Self::ROOT)
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn child_by_name(&self, directory: NodeId, name: &str) -> Option<NodeId> {
        match &self.node(directory).kind {
            NodeKind::Directory { children } => children.get(name).copied(),
            NodeKind::File => None,
        }
    }

    /// Registers an empty directory under `parent`.
    ///
    /// Listing an already known directory again returns its existing handle.
    pub fn add_directory(
        &mut self,
        parent: NodeId,
        name: &str,
    ) -> Result<NodeId, TreeInsertError> {
        if let Some(existing) = self.existing_child(parent, name)? {
            return if self.node(existing).is_directory() {
                Ok(existing)
            } else {
                Err(TreeInsertError::ConflictingEntry {
                    name: name.to_string(),
                })
            };
        }

        Ok(self.insert_child(
            parent,
            name,
            NodeKind::Directory {
                children: LinkedHashMap::new(),
            },
            0,
        ))
    }

    /// Registers a file under `parent` and adds its size to every ancestor.
    ///
    /// Listing an identical file again is a no-op, so sizes are never counted twice.
    pub fn add_file(
        &mut self,
        parent: NodeId,
        name: &str,
        size: u64,
    ) -> Result<NodeId, TreeInsertError> {
        if let Some(existing) = self.existing_child(parent, name)? {
            let node = self.node(existing);
            return if !node.is_directory() && node.size == size {
                Ok(existing)
            } else {
                Err(TreeInsertError::ConflictingEntry {
                    name: name.to_string(),
                })
            };
        }

        let ancestors = self.ancestors(parent);
        let new_sizes = ancestors
            .iter()
            .map(|id| self.node(*id).size.checked_add(size))
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| TreeInsertError::SizeOverflow {
                name: name.to_string(),
            })?;

        let id = self.insert_child(parent, name, NodeKind::File, size);
        for (ancestor, new_size) in ancestors.into_iter().zip(new_sizes) {
            self.nodes[ancestor.0].size = new_size;
        }

        Ok(id)
    }

    /// `id` followed by its parent chain up to the root.
    fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut result = vec![id];
        let mut current = self.node(id).parent;
        while let Some(parent) = current {
            result.push(parent);
            current = self.node(parent).parent;
        }
        result
    }

    fn existing_child(
        &self,
        parent: NodeId,
        name: &str,
    ) -> Result<Option<NodeId>, TreeInsertError> {
        match &self.node(parent).kind {
            NodeKind::Directory { children } => Ok(children.get(name).copied()),
            NodeKind::File => Err(TreeInsertError::ParentNotDirectory {
                parent: self.node(parent).name.clone(),
            }),
        }
    }

    fn insert_child(&mut self, parent: NodeId, name: &str, kind: NodeKind, size: u64) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            name: name.to_string(),
            kind,
            size,
            parent: Some(parent),
        });
        if let NodeKind::Directory { children } = &mut self.nodes[parent.0].kind {
            children.insert(name.to_string(), id);
        }
        trace!("Inserted '{}' as {} under {}", name, id, parent);
        id
    }

    /// All directories in pre-order, the root first.
    pub fn directories(&self) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::once(Self::ROOT).chain(self.descendant_directories(Self::ROOT))
    }

    /// Directories strictly below `id`, in pre-order.
    pub fn descendant_directories(&self, id: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut stack = self.child_directories(id);
        stack.reverse();

        while let Some(current) = stack.pop() {
            result.push(current);
            let mut children = self.child_directories(current);
            children.reverse();
            stack.extend(children);
        }

        result
    }

    fn child_directories(&self, id: NodeId) -> Vec<NodeId> {
        self.node(id)
            .children()
            .filter(|child| self.node(*child).is_directory())
            .collect()
    }

    /// Size of `id` recomputed from its files, ignoring the cached directory sizes.
    pub fn recomputed_size(&self, id: NodeId) -> u64 {
        let mut total = 0;
        let mut stack = vec![id];

        while let Some(current) = stack.pop() {
            let node = self.node(current);
            match node.kind {
                NodeKind::File => total += node.size,
                NodeKind::Directory { .. } => stack.extend(node.children()),
            }
        }

        total
    }
}

impl Default for FilesystemTree {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Snafu, PartialEq, Eq)]
pub enum TreeInsertError {
    #[snafu(display("Cannot insert into '{}', it is a file", parent))]
    ParentNotDirectory { parent: String },
    #[snafu(display("Entry '{}' was already listed with a different type or size", name))]
    ConflictingEntry { name: String },
    #[snafu(display("Adding '{}' overflows the size of a directory", name))]
    SizeOverflow { name: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_tree_has_only_an_empty_root() {
        let tree = FilesystemTree::new();

        assert_eq!(tree.node_count(), 1);
        assert_eq!(tree.root().name(), "/");
        assert_eq!(tree.root().size(), 0);
        assert_eq!(tree.root().parent(), None);
        assert!(tree.root().is_directory());
    }

    #[test]
    fn adding_a_file_updates_every_ancestor() {
        let mut tree = FilesystemTree::new();
        let a = tree.add_directory(FilesystemTree::ROOT, "a").unwrap();
        let b = tree.add_directory(a, "b").unwrap();
        let sibling = tree.add_directory(FilesystemTree::ROOT, "sibling").unwrap();

        tree.add_file(b, "deep.txt", 300).unwrap();
        tree.add_file(a, "shallow.txt", 20).unwrap();

        assert_eq!(tree.node(b).size(), 300);
        assert_eq!(tree.node(a).size(), 320);
        assert_eq!(tree.root().size(), 320);
        assert_eq!(tree.node(sibling).size(), 0);
    }

    #[test]
    fn children_keep_insertion_order() {
        let mut tree = FilesystemTree::new();
        tree.add_file(FilesystemTree::ROOT, "z", 1).unwrap();
        tree.add_directory(FilesystemTree::ROOT, "a").unwrap();
        tree.add_file(FilesystemTree::ROOT, "m", 2).unwrap();

        let names = tree
            .root()
            .children()
            .map(|id| tree.node(id).name().to_string())
            .collect::<Vec<_>>();

        assert_eq!(names, vec!["z", "a", "m"]);
    }

    #[test]
    fn relisting_identical_entries_does_not_double_count() {
        let mut tree = FilesystemTree::new();
        let first_dir = tree.add_directory(FilesystemTree::ROOT, "a").unwrap();
        let first_file = tree.add_file(first_dir, "f", 10).unwrap();

        let second_dir = tree.add_directory(FilesystemTree::ROOT, "a").unwrap();
        let second_file = tree.add_file(second_dir, "f", 10).unwrap();

        assert_eq!(first_dir, second_dir);
        assert_eq!(first_file, second_file);
        assert_eq!(tree.root().size(), 10);
        assert_eq!(tree.node_count(), 3);
    }

    #[test]
    fn conflicting_entries_are_rejected() {
        let mut tree = FilesystemTree::new();
        tree.add_file(FilesystemTree::ROOT, "f", 10).unwrap();
        tree.add_directory(FilesystemTree::ROOT, "d").unwrap();

        assert_eq!(
            tree.add_file(FilesystemTree::ROOT, "f", 11),
            Err(TreeInsertError::ConflictingEntry { name: "f".into() })
        );
        assert_eq!(
            tree.add_directory(FilesystemTree::ROOT, "f"),
            Err(TreeInsertError::ConflictingEntry { name: "f".into() })
        );
        assert_eq!(
            tree.add_file(FilesystemTree::ROOT, "d", 1),
            Err(TreeInsertError::ConflictingEntry { name: "d".into() })
        );
        assert_eq!(tree.root().size(), 10);
    }

    #[test]
    fn overflowing_sizes_are_rejected_without_changes() {
        let mut tree = FilesystemTree::new();
        let a = tree.add_directory(FilesystemTree::ROOT, "a").unwrap();
        tree.add_file(FilesystemTree::ROOT, "big", u64::MAX).unwrap();
        let before = tree.clone();

        // 'a' itself could hold it, the root cannot
        let result = tree.add_file(a, "one", 1);

        assert_eq!(
            result,
            Err(TreeInsertError::SizeOverflow { name: "one".into() })
        );
        assert_eq!(tree, before);
        assert_eq!(tree.child_by_name(a, "one"), None);
    }

    #[test]
    fn deep_trees_are_walked_without_recursion() {
        let mut tree = FilesystemTree::new();
        let mut current = FilesystemTree::ROOT;
        for _ in 0..100_000 {
            current = tree.add_directory(current, "d").unwrap();
        }
        tree.add_file(current, "leaf", 3).unwrap();

        assert_eq!(tree.recomputed_size(FilesystemTree::ROOT), 3);
        assert_eq!(tree.root().size(), 3);
    }

    #[test]
    fn files_cannot_have_children() {
        let mut tree = FilesystemTree::new();
        let file = tree.add_file(FilesystemTree::ROOT, "f", 10).unwrap();

        let result = tree.add_file(file, "inner", 1);

        assert!(matches!(
            result,
            Err(TreeInsertError::ParentNotDirectory { .. })
        ));
        assert_eq!(tree.child_by_name(file, "inner"), None);
    }

    #[test]
    fn directories_are_listed_in_pre_order() {
        let mut tree = FilesystemTree::new();
        let a = tree.add_directory(FilesystemTree::ROOT, "a").unwrap();
        let b = tree.add_directory(a, "b").unwrap();
        tree.add_file(a, "file", 5).unwrap();
        let c = tree.add_directory(FilesystemTree::ROOT, "c").unwrap();

        let directories = tree.directories().collect::<Vec<_>>();

        assert_eq!(directories, vec![FilesystemTree::ROOT, a, b, c]);
        assert_eq!(tree.descendant_directories(a), vec![b]);
    }

    #[test]
    fn recomputed_size_matches_incremental_size() {
        let mut tree = FilesystemTree::new();
        let a = tree.add_directory(FilesystemTree::ROOT, "a").unwrap();
        let b = tree.add_directory(a, "b").unwrap();
        tree.add_file(b, "x", 7).unwrap();
        tree.add_file(a, "y", 11).unwrap();
        tree.add_file(FilesystemTree::ROOT, "z", 13).unwrap();

        for directory in tree.directories() {
            assert_eq!(tree.node(directory).size(), tree.recomputed_size(directory));
        }
    }

    #[test]
    fn node_id_display() {
        assert_eq!(FilesystemTree::ROOT.to_string(), "#0");
    }
}
