use tracing::debug;

use crate::filesystem::tree::FilesystemTree;

/// Space accounting of a disk holding the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiskUsage {
    pub used: u64,
    pub available: u64,
    /// Space that still has to be freed to reach the required free space, 0 if none
    pub deficit: u64,
}

impl FilesystemTree {
    /// Sums the sizes of all directories below the root that are at most `ceiling`.
    ///
    /// The root itself never contributes, even when it is small enough.
    pub fn bounded_size_sum(&self, ceiling: u64) -> u64 {
        self.descendant_directories(Self::ROOT)
            .into_iter()
            .map(|id| self.node(id).size())
            .filter(|size| *size <= ceiling)
            .sum()
    }

    pub fn disk_usage(&self, capacity: u64, required_free: u64) -> DiskUsage {
        let used = self.root().size();
        DiskUsage {
            used,
            available: capacity.saturating_sub(used),
            deficit: required_free.saturating_add(used).saturating_sub(capacity),
        }
    }

    /// Size of the smallest directory, root included, whose deletion covers the deficit.
    ///
    /// Falls back to the root size when no directory is large enough.
    pub fn smallest_sufficient_directory(&self, capacity: u64, required_free: u64) -> u64 {
        let usage = self.disk_usage(capacity, required_free);
        debug!("Looking for a directory of at least {}", usage.deficit);

        self.directories()
            .map(|id| self.node(id).size())
            .filter(|size| *size >= usage.deficit)
            .min()
            .unwrap_or(usage.used)
    }
}
