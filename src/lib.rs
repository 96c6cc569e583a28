//! Rebuilds a directory tree from a terminal session log of `cd` and `ls`
//! commands, then answers size questions about it.

#![allow(clippy::module_inception)]

pub mod application;
pub mod cli;
pub mod config;
pub mod ext;
pub mod filesystem;
