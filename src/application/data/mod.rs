mod answers;
mod log_level;

pub use answers::Answers;
pub use log_level::LogLevel;
