use std::fmt;

use crate::filesystem::tree::{FilesystemTree, NodeId, NodeKind};

const INDENT: &str = "  ";

/// Renders the tree as an indented listing, children in the order they were listed
impl fmt::Display for FilesystemTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut stack: Vec<(NodeId, usize)> = vec![(Self::ROOT, 0)];

        while let Some((id, depth)) = stack.pop() {
            let node = self.node(id);
            let kind = match node.kind() {
                NodeKind::File => "file",
                NodeKind::Directory { .. } => "dir",
            };
            writeln!(
                f,
                "{}- {} ({}, size={})",
                INDENT.repeat(depth),
                node.name(),
                kind,
                node.size()
            )?;

            let children = node.children().collect::<Vec<_>>();
            stack.extend(children.into_iter().rev().map(|child| (child, depth + 1)));
        }

        Ok(())
    }
}
