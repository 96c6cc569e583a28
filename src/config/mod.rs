mod disk_config;

pub use disk_config::{
    DEFAULT_REQUIRED_FREE, DEFAULT_SIZE_CEILING, DEFAULT_TOTAL_CAPACITY, DiskConfig,
    DiskConfigError,
};
