use snafu::{ResultExt, Snafu};
use tracing::{debug, trace};

use crate::filesystem::terminal_log::{CdTarget, LogLine, LogLineError};
use crate::filesystem::tree::{FilesystemTree, NodeId};

/// Replays a terminal session log into a [`FilesystemTree`].
///
/// Holds the tree under construction together with the current directory,
/// which starts at the root.
#[derive(Debug)]
pub struct TreeBuilder {
    tree: FilesystemTree,
    current_dir: NodeId,
}

impl TreeBuilder {
    pub fn new() -> Self {
        TreeBuilder {
            tree: FilesystemTree::new(),
            current_dir: FilesystemTree::ROOT,
        }
    }

    /// Applies one log line. `line_number` is 1-based and only used for error reporting.
    pub fn apply_line(&mut self, line_number: usize, line: &str) -> Result<(), MalformedLogError> {
        if line.trim().is_empty() {
            trace!("Skipping blank line {}", line_number);
            return Ok(());
        }

        LogLine::try_from(line)
            .and_then(|log_line| self.apply(log_line))
            .context(MalformedLogSnafu {
                line_number,
                line: line.to_string(),
            })
    }

    fn apply(&mut self, log_line: LogLine<'_>) -> Result<(), LogLineError> {
        trace!("Applying {:?} in {}", log_line, self.current_dir);
        match log_line {
            LogLine::ChangeDirectory(target) => {
                self.current_dir = self.resolve(target)?;
            }
            LogLine::List => {}
            LogLine::DirectoryEntry { name } => {
                self.tree
                    .add_directory(self.current_dir, name)
                    .map_err(|err| LogLineError::EntryRejected { source: err })?;
            }
            LogLine::FileEntry { size, name } => {
                self.tree
                    .add_file(self.current_dir, name, size)
                    .map_err(|err| LogLineError::EntryRejected { source: err })?;
            }
        }
        Ok(())
    }

    fn resolve(&self, target: CdTarget<'_>) -> Result<NodeId, LogLineError> {
        match target {
            CdTarget::Root => Ok(FilesystemTree::ROOT),
            CdTarget::Parent => self
                .tree
                .node(self.current_dir)
                .parent()
                .ok_or(LogLineError::AboveRoot),
            CdTarget::Child(name) => {
                let child = self.tree.child_by_name(self.current_dir, name).ok_or_else(|| {
                    LogLineError::NoSuchDirectory {
                        name: name.to_string(),
                    }
                })?;
                if self.tree.node(child).is_directory() {
                    Ok(child)
                } else {
                    Err(LogLineError::NotADirectory {
                        name: name.to_string(),
                    })
                }
            }
        }
    }

    pub fn finish(self) -> FilesystemTree {
        debug!(
            "Built filesystem tree with {} nodes, {} used",
            self.tree.node_count(),
            self.tree.root().size()
        );
        self.tree
    }
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl FilesystemTree {
    /// Builds a tree from a whole terminal log, aborting on the first malformed line.
    pub fn from_log(log: &str) -> Result<Self, MalformedLogError> {
        log.lines()
            .enumerate()
            .try_fold(TreeBuilder::new(), |mut builder, (index, line)| {
                builder.apply_line(index + 1, line).map(|()| builder)
            })
            .map(TreeBuilder::finish)
    }
}

impl TryFrom<&str> for FilesystemTree {
    type Error = MalformedLogError;

    fn try_from(log: &str) -> Result<Self, Self::Error> {
        Self::from_log(log)
    }
}

#[derive(Debug, Snafu)]
#[snafu(display("Malformed terminal log at line {}: '{}'", line_number, line))]
pub struct MalformedLogError {
    line_number: usize,
    line: String,
    source: LogLineError,
}

impl MalformedLogError {
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    pub fn line(&self) -> &str {
        &self.line
    }

    pub fn reason(&self) -> &LogLineError {
        &self.source
    }
}
