use std::fmt;

use colored::Colorize;

use crate::config::DiskConfig;
use crate::filesystem::FilesystemTree;

/// Results of both queries over one tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Answers {
    /// Sum of the directories at most `size_ceiling` in size
    pub bounded_size_sum: u64,
    /// Size of the smallest directory freeing enough space
    pub smallest_sufficient_directory: u64,
}

impl Answers {
    pub fn compute(tree: &FilesystemTree, config: &DiskConfig) -> Self {
        Answers {
            bounded_size_sum: tree.bounded_size_sum(config.size_ceiling),
            smallest_sufficient_directory: tree
                .smallest_sufficient_directory(config.total_capacity, config.required_free),
        }
    }
}

impl fmt::Display for Answers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} {}", "Part one:".bold().green(), self.bounded_size_sum)?;
        writeln!(
            f,
            "{} {}",
            "Part two:".bold().green(),
            self.smallest_sufficient_directory
        )
    }
}
