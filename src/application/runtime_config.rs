use std::path::PathBuf;

use crate::cli::Cli;
use crate::config::DiskConfig;

/// Flags that take precedence over the config file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiskOverrides {
    pub total_capacity: Option<u64>,
    pub required_free: Option<u64>,
    pub size_ceiling: Option<u64>,
}

impl DiskOverrides {
    pub fn apply(&self, config: DiskConfig) -> DiskConfig {
        DiskConfig {
            total_capacity: self.total_capacity.unwrap_or(config.total_capacity),
            required_free: self.required_free.unwrap_or(config.required_free),
            size_ceiling: self.size_ceiling.unwrap_or(config.size_ceiling),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub input: PathBuf,
    pub config_path: Option<PathBuf>,
    pub overrides: DiskOverrides,
    pub show_tree: bool,
}

impl From<Cli> for RuntimeConfig {
    fn from(cli: Cli) -> Self {
        Self {
            input: cli.input,
            config_path: cli.config,
            overrides: DiskOverrides {
                total_capacity: cli.capacity,
                required_free: cli.required,
                size_ceiling: cli.ceiling,
            },
            show_tree: cli.show_tree,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_replace_only_given_values() {
        let overrides = DiskOverrides {
            required_free: Some(1),
            ..DiskOverrides::default()
        };

        let config = overrides.apply(DiskConfig::default());

        assert_eq!(config.required_free, 1);
        assert_eq!(config.total_capacity, DiskConfig::default().total_capacity);
        assert_eq!(config.size_ceiling, DiskConfig::default().size_ceiling);
    }

    #[test]
    fn empty_overrides_keep_the_config() {
        let config = DiskConfig {
            total_capacity: 3,
            required_free: 2,
            size_ceiling: 1,
        };
        assert_eq!(DiskOverrides::default().apply(config), config);
    }
}
