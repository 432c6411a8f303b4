use crate::cli::Command;
use crate::context;
use crate::storage::Storage;

pub mod seed;
pub mod summary;
pub mod user;

pub trait CommandRunner {
    fn run<S: Storage>(&self, ctx: &context::Context, storage: &S) -> anyhow::Result<()>;
}

impl Command {
    pub fn run<S: Storage>(&self, ctx: &context::Context, storage: &S) -> anyhow::Result<()> {
        match self {
            Command::Seed { file } => seed::run(storage, file),
            Command::User { cmd } => cmd.run(ctx, storage),
            Command::Summary => summary::run(storage),
        }
    }
}
