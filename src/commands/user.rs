use anyhow::{Context, Result};

use super::CommandRunner;
use crate::auth::{generate_token, hash_token};
use crate::cli;
use crate::context;
use crate::storage::{Storage, StorageTx, StorageWrite, User};
use crate::types::Role;

/// Creates a user and returns the bearer token. The token itself is never stored.
pub fn add_user<S: Storage>(storage: &S, name: &str, role: Role) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        anyhow::bail!("user name must not be empty");
    }
    let token = generate_token();
    let tx = storage.begin_tx().context("starting user transaction")?;
    tx.save_user(
        &hash_token(&token),
        &User {
            name: name.to_string(),
            role,
        },
    )
    .with_context(|| format!("saving user {}", name))?;
    tx.commit().context("committing user")?;
    Ok(token)
}

impl CommandRunner for cli::UserCmd {
    fn run<S: Storage>(&self, _ctx: &context::Context, storage: &S) -> Result<()> {
        match self {
            cli::UserCmd::Add { name, role } => {
                let token = add_user(storage, name, *role)?;
                log::info!("👤 Created {} user {}", role, name);
                println!("{}", token);
                Ok(())
            }
        }
    }
}
