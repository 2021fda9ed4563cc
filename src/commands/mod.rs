pub mod check;
pub mod completions;
pub mod config;
pub mod hook;
pub mod import;
pub mod preview;
pub mod update;
