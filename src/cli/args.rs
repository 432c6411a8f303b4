use clap::Parser;
use std::env;

use crate::cli::command::Command;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Serve the ward-wise digital profile of a municipality",
    long_about = "Serves RPC procedures and localized profile pages over the municipality's ward statistics.\n\nWithout a subcommand the REST service runs until Ctrl-C.",
    subcommand_required = false,
    arg_required_else_help = false
)]
pub struct Cli {
    #[arg(
        long,
        default_value_t = false,
        help = "Reset all persisted state (delete the SQLite database) before starting"
    )]
    pub reset: bool,

    #[arg(
        long,
        env = "DIGITAL_PROFILE_DATA_DIR",
        default_value = ".digital-profile/",
        value_name = "DIR",
        help = "Directory to store persistent data"
    )]
    pub data_dir: String,

    #[arg(
        long = "log-file",
        env = "DIGITAL_PROFILE_LOG_FILE",
        value_name = "PATH",
        help = "Write logs to PATH (in addition to stderr)"
    )]
    pub log_file: Option<String>,

    #[arg(
        long = "api-listen",
        env = "DIGITAL_PROFILE_API_LISTEN",
        value_name = "ADDR",
        default_value = "127.0.0.1:8084",
        help = "REST API listen address (host:port)"
    )]
    pub api_listen: std::net::SocketAddr,

    #[arg(
        long = "base-url",
        env = "DIGITAL_PROFILE_BASE_URL",
        value_name = "URL",
        default_value = "https://digital.example.gov.np",
        help = "Public base URL used for canonical links"
    )]
    pub base_url: url::Url,

    #[arg(
        long = "municipality-name",
        env = "DIGITAL_PROFILE_NAME",
        value_name = "NAME",
        default_value = "Rural Municipality",
        help = "Municipality name shown in English titles"
    )]
    pub municipality_name: String,

    #[arg(
        long = "municipality-name-ne",
        env = "DIGITAL_PROFILE_NAME_NE",
        value_name = "NAME",
        default_value = "गाउँपालिका",
        help = "Municipality name shown in Nepali titles"
    )]
    pub municipality_name_ne: String,

    #[command(subcommand)]
    pub cmd: Option<Command>,
}

pub fn parse() -> Cli {
    let dotenv_path = env::var("DOTENV_PATH").unwrap_or(".env".into());
    dotenvy::from_filename(&dotenv_path).ok();

    Cli::parse()
}
