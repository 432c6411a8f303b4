mod args;
mod command;

pub use args::Cli;
pub use command::{Command, UserCmd};

pub use args::parse;
