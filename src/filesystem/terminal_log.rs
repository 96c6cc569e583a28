use std::num::ParseIntError;

use snafu::{ResultExt, Snafu};

use crate::filesystem::tree::TreeInsertError;

const PROMPT: &str = "$";
const CHANGE_DIRECTORY: &str = "cd";
const LIST: &str = "ls";
const DIRECTORY_ENTRY: &str = "dir";

/// Target of a `$ cd` command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CdTarget<'a> {
    Root,
    Parent,
    Child(&'a str),
}

/// One classified line of a terminal session log
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogLine<'a> {
    ChangeDirectory(CdTarget<'a>),
    List,
    DirectoryEntry { name: &'a str },
    FileEntry { size: u64, name: &'a str },
}

impl<'a> TryFrom<&'a str> for LogLine<'a> {
    type Error = LogLineError;

    fn try_from(line: &'a str) -> Result<Self, Self::Error> {
        let tokens = line.split_whitespace().collect::<Vec<_>>();

        match tokens.as_slice() {
            [] => Err(LogLineError::EmptyLine),
            [PROMPT, command, args @ ..] => Self::parse_command(command, args),
            [PROMPT] => Err(LogLineError::MissingCommand),
            [DIRECTORY_ENTRY, name] => Ok(LogLine::DirectoryEntry { name: *name }),
            [size, name] => {
                let size = size.parse::<u64>().context(InvalidSizeSnafu {
                    token: size.to_string(),
                })?;
                Ok(LogLine::FileEntry { size, name: *name })
            }
            _ => Err(LogLineError::WrongTokenCount {
                count: tokens.len(),
            }),
        }
    }
}

impl<'a> LogLine<'a> {
    fn parse_command(command: &str, args: &[&'a str]) -> Result<Self, LogLineError> {
        match (command, args) {
            (CHANGE_DIRECTORY, ["/"]) => Ok(LogLine::ChangeDirectory(CdTarget::Root)),
            (CHANGE_DIRECTORY, [".."]) => Ok(LogLine::ChangeDirectory(CdTarget::Parent)),
            (CHANGE_DIRECTORY, [name]) => Ok(LogLine::ChangeDirectory(CdTarget::Child(*name))),
            (CHANGE_DIRECTORY, _) => Err(LogLineError::WrongArgumentCount {
                command: CHANGE_DIRECTORY.to_string(),
                expected: 1,
                count: args.len(),
            }),
            (LIST, []) => Ok(LogLine::List),
            (LIST, _) => Err(LogLineError::WrongArgumentCount {
                command: LIST.to_string(),
                expected: 0,
                count: args.len(),
            }),
            _ => Err(LogLineError::UnknownCommand {
                command: command.to_string(),
            }),
        }
    }
}

/// Reasons a single log line is rejected
#[derive(Debug, Snafu)]
pub enum LogLineError {
    #[snafu(display("Line is empty"))]
    EmptyLine,
    #[snafu(display("Prompt without a command"))]
    MissingCommand,
    #[snafu(display("Unknown command '{}'", command))]
    UnknownCommand { command: String },
    #[snafu(display(
        "Command '{}' expects {} argument(s), got {}",
        command,
        expected,
        count
    ))]
    WrongArgumentCount {
        command: String,
        expected: usize,
        count: usize,
    },
    #[snafu(display("Listing entry should have 2 tokens, got {}", count))]
    WrongTokenCount { count: usize },
    #[snafu(display("'{}' is not a valid file size", token))]
    InvalidSize {
        token: String,
        source: ParseIntError,
    },
    #[snafu(display("Cannot leave the root directory"))]
    AboveRoot,
    #[snafu(display("No directory named '{}' in the current directory", name))]
    NoSuchDirectory { name: String },
    #[snafu(display("'{}' is a file, not a directory", name))]
    NotADirectory { name: String },
    #[snafu(display("Listing entry rejected"))]
    EntryRejected { source: TreeInsertError },
}
