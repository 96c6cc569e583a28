//! In-memory directory tree rebuilt from a terminal session log.
//!
//! The tree is an arena of nodes addressed by [`NodeId`] handles. Parents are
//! stored as handles too, which lets file sizes be propagated up to the root
//! as soon as a file is listed.

mod builder;
mod query;
mod render;
mod terminal_log;
mod tree;

pub use builder::{MalformedLogError, TreeBuilder};
pub use query::DiskUsage;
pub use terminal_log::{CdTarget, LogLine, LogLineError};
pub use tree::{FilesystemTree, Node, NodeId, NodeKind, TreeInsertError};

#[cfg(test)]
pub(crate) const SAMPLE_LOG: &str = "\
$ cd /
$ ls
dir a
14848514 b.txt
8504156 c.dat
dir d
$ cd a
$ ls
dir e
29116 f
2557 g
62596 h.lst
$ cd e
$ ls
584 i
$ cd ..
$ cd ..
$ cd d
$ ls
4060174 j
8033020 d.log
5626152 d.ext
7214296 k
";
