use std::path::Path;

use hashlink::LinkedHashMap;
use saphyr::{LoadableYamlNode, Scalar, Yaml};
use snafu::prelude::*;
use tracing::{debug, warn};

use crate::ext::BestEffortPathExt;

pub const DEFAULT_TOTAL_CAPACITY: u64 = 70_000_000;
pub const DEFAULT_REQUIRED_FREE: u64 = 30_000_000;
pub const DEFAULT_SIZE_CEILING: u64 = 100_000;

const TOTAL_CAPACITY_KEY: &str = "total_capacity";
const REQUIRED_FREE_KEY: &str = "required_free";
const SIZE_CEILING_KEY: &str = "size_ceiling";

/// Disk constants the queries run against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiskConfig {
    pub total_capacity: u64,
    pub required_free: u64,
    pub size_ceiling: u64,
}

impl Default for DiskConfig {
    fn default() -> Self {
        DiskConfig {
            total_capacity: DEFAULT_TOTAL_CAPACITY,
            required_free: DEFAULT_REQUIRED_FREE,
            size_ceiling: DEFAULT_SIZE_CEILING,
        }
    }
}

impl DiskConfig {
    pub async fn from_path(path: &Path) -> Result<Self, DiskConfigError> {
        debug!("Reading config file: {}", path.best_effort_path_display());
        let bytes = compio::fs::read(path).await.context(ReadSnafu {
            file_path: path.best_effort_path_display(),
        })?;
        debug!("Successfully read config file: {} bytes", bytes.len());

        let contents = String::from_utf8_lossy(&bytes);
        Self::try_from(&*contents)
    }

    fn apply_entries(
        mut self,
        top_level: &LinkedHashMap<Yaml, Yaml>,
    ) -> Result<Self, DiskConfigError> {
        for (key, value) in top_level {
            let Yaml::Value(Scalar::String(key)) = key else {
                warn!("Skipping non-string config key: {:?}", key);
                continue;
            };

            let target = match &**key {
                TOTAL_CAPACITY_KEY => &mut self.total_capacity,
                REQUIRED_FREE_KEY => &mut self.required_free,
                SIZE_CEILING_KEY => &mut self.size_ceiling,
                other => {
                    warn!("Skipping unknown config key '{}'", other);
                    continue;
                }
            };
            *target = Self::parse_size(key, value)?;
        }

        Ok(self)
    }

    fn parse_size(key: &str, value: &Yaml) -> Result<u64, DiskConfigError> {
        let size = match value {
            Yaml::Value(Scalar::Integer(n)) => u64::try_from(*n).ok(),
            _ => None,
        };
        size.context(InvalidValueSnafu { key })
    }
}

impl TryFrom<&str> for DiskConfig {
    type Error = DiskConfigError;

    fn try_from(contents: &str) -> Result<Self, Self::Error> {
        let documents = Yaml::load_from_str(contents).context(ParseSnafu)?;
        let document = documents.first().context(MalformedConfigSnafu)?;
        let top_level = document.as_mapping().context(TopLevelNotMapSnafu)?;

        let config = Self::default().apply_entries(top_level)?;
        debug!("Loaded disk config: {:?}", config);
        Ok(config)
    }
}

#[derive(Debug, Snafu)]
pub enum DiskConfigError {
    #[snafu(display("Failed to read the config file: {}", file_path))]
    ReadError {
        file_path: String,
        source: std::io::Error,
    },
    #[snafu(display("Failed to parse the config file"))]
    ParseError { source: saphyr::ScanError },
    #[snafu(display("Improperly formatted config file"))]
    MalformedConfig,
    #[snafu(display("Top level of config should be a map"))]
    TopLevelNotMap,
    #[snafu(display("'{}' should be a non-negative integer", key))]
    InvalidValue { key: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn defaults_match_the_puzzle_constants() {
        let config = DiskConfig::default();
        assert_eq!(config.total_capacity, 70_000_000);
        assert_eq!(config.required_free, 30_000_000);
        assert_eq!(config.size_ceiling, 100_000);
    }

    #[test]
    fn config_overrides_every_key() {
        let yaml = "total_capacity: 100\nrequired_free: 50\nsize_ceiling: 10";
        let config: DiskConfig = yaml.try_into().unwrap();

        assert_eq!(
            config,
            DiskConfig {
                total_capacity: 100,
                required_free: 50,
                size_ceiling: 10,
            }
        );
    }

    #[test]
    fn config_keeps_defaults_for_missing_keys() {
        let config: DiskConfig = "size_ceiling: 5".try_into().unwrap();

        assert_eq!(config.size_ceiling, 5);
        assert_eq!(config.total_capacity, DEFAULT_TOTAL_CAPACITY);
        assert_eq!(config.required_free, DEFAULT_REQUIRED_FREE);
    }

    #[test]
    fn config_skips_unknown_keys() {
        let config: DiskConfig = "colour: blue\n42: answer\nrequired_free: 7"
            .try_into()
            .unwrap();

        assert_eq!(config.required_free, 7);
    }

    #[rstest]
    #[case("total_capacity: -1")]
    #[case("required_free: lots")]
    #[case("size_ceiling: 1.5")]
    #[case("size_ceiling: [1, 2]")]
    fn config_rejects_invalid_values(#[case] yaml: &str) {
        let result: Result<DiskConfig, _> = yaml.try_into();
        assert!(matches!(result, Err(DiskConfigError::InvalidValue { .. })));
    }

    #[test]
    fn config_returns_error_on_invalid_yaml() {
        let result: Result<DiskConfig, _> = "invalid: yaml: content: [unclosed".try_into();
        assert!(matches!(result, Err(DiskConfigError::ParseError { .. })));
    }

    #[test]
    fn config_returns_error_on_empty_file() {
        let result: Result<DiskConfig, _> = "".try_into();
        assert!(matches!(result, Err(DiskConfigError::MalformedConfig)));
    }

    #[rstest]
    #[case("- item1\n- item2")]
    #[case("just a string")]
    fn config_returns_error_when_top_level_is_not_map(#[case] yaml: &str) {
        let result: Result<DiskConfig, _> = yaml.try_into();
        assert!(matches!(result, Err(DiskConfigError::TopLevelNotMap)));
    }

    #[compio::test]
    async fn config_reads_from_file() {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        writeln!(file, "total_capacity: 1000").expect("Failed to write to temp file");

        let config = DiskConfig::from_path(file.path()).await.unwrap();

        assert_eq!(config.total_capacity, 1000);
        assert_eq!(config.size_ceiling, DEFAULT_SIZE_CEILING);
    }

    #[compio::test]
    async fn config_returns_error_on_nonexistent_file() {
        let result = DiskConfig::from_path(Path::new("nonexistent.yaml")).await;
        assert!(matches!(result, Err(DiskConfigError::ReadError { .. })));
    }
}
