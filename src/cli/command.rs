use std::path::PathBuf;

use clap::Subcommand;

use crate::types::Role;

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    #[command(
        about = "Load a dataset document into the database",
        long_about = "Read a JSON document with ward demographics, age-gender rows and ward statistics, and write it in a single transaction. Existing ward demographics are replaced."
    )]
    Seed {
        #[arg(long, value_name = "PATH", help = "Dataset JSON file")]
        file: PathBuf,
    },
    #[command(about = "User management commands")]
    User {
        #[command(subcommand)]
        cmd: UserCmd,
    },
    #[command(
        about = "Print the municipality summary",
        long_about = "Aggregate ward demographics and print the municipality summary as JSON."
    )]
    Summary,
}

#[derive(Subcommand, Debug, Clone)]
pub enum UserCmd {
    #[command(
        about = "Create a user and print its bearer token",
        long_about = "Create a user with the given role. The generated bearer token is printed once; only its SHA-256 digest is stored."
    )]
    Add {
        #[arg(long, value_name = "NAME")]
        name: String,
        #[arg(long, value_name = "ROLE", help = "superadmin, admin, editor or viewer")]
        role: Role,
    },
}
