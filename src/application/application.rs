use std::io;
use std::path::Path;

use snafu::Snafu;
use snafu::prelude::*;
use tracing::{debug, info};

use crate::application::RuntimeConfig;
use crate::application::data::Answers;
use crate::config::{DiskConfig, DiskConfigError};
use crate::ext::BestEffortPathExt;
use crate::filesystem::{FilesystemTree, MalformedLogError};

pub struct Application;

impl Application {
    pub async fn run(runtime_config: impl Into<RuntimeConfig>) -> Result<(), ApplicationError> {
        let runtime_config: RuntimeConfig = runtime_config.into();
        let (tree, answers) = Self::solve(&runtime_config).await?;
        if runtime_config.show_tree {
            print!("{tree}");
        }
        print!("{answers}");
        Ok(())
    }

    /// Loads the config and the log, rebuilds the tree and runs both queries
    pub async fn solve(
        runtime_config: &RuntimeConfig,
    ) -> Result<(FilesystemTree, Answers), ApplicationError> {
        let disk_config = Self::load_disk_config(runtime_config).await?;

        let log = Self::read_input(&runtime_config.input).await?;
        let tree = FilesystemTree::from_log(&log).context(MalformedLogSnafu)?;

        let usage = tree.disk_usage(disk_config.total_capacity, disk_config.required_free);
        info!(
            "Disk usage: {} used, {} available, {} to free",
            usage.used, usage.available, usage.deficit
        );

        let answers = Answers::compute(&tree, &disk_config);
        Ok((tree, answers))
    }

    async fn load_disk_config(
        runtime_config: &RuntimeConfig,
    ) -> Result<DiskConfig, ApplicationError> {
        let disk_config = match &runtime_config.config_path {
            Some(path) => DiskConfig::from_path(path).await.context(ConfigSnafu)?,
            None => DiskConfig::default(),
        };
        let disk_config = runtime_config.overrides.apply(disk_config);
        debug!("Using disk config: {:?}", disk_config);
        Ok(disk_config)
    }

    async fn read_input(path: &Path) -> Result<String, ApplicationError> {
        debug!("Reading terminal log: {}", path.best_effort_path_display());
        let contents = compio::fs::read(path).await.and_then(|bytes| {
            String::from_utf8(bytes).map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))
        });
        let contents = contents.context(InputUnreadableSnafu {
            path: path.best_effort_path_display(),
        })?;
        debug!("Read {} lines of terminal log", contents.lines().count());
        Ok(contents)
    }
}

#[derive(Debug, Snafu)]
pub enum ApplicationError {
    #[snafu(display("Critical failure encountered while loading the config"))]
    ConfigError { source: DiskConfigError },
    #[snafu(display("Cannot read the terminal log: {}", path))]
    InputUnreadable { path: String, source: io::Error },
    #[snafu(display("Cannot rebuild the filesystem tree"))]
    MalformedLog { source: MalformedLogError },
}
