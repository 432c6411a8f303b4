use std::{net::SocketAddr, path::PathBuf};

use url::Url;

use crate::seo::Site;

/// Settings resolved once from the command line and environment.
#[derive(Clone, Debug)]
pub struct Context {
    pub data_dir: PathBuf,
    pub reset: bool,
    pub log_file: Option<PathBuf>,
    pub api_listen: SocketAddr,
    pub site: Site,
}

impl Context {
    pub fn from_cli(cli: &crate::cli::Cli) -> Self {
        Self {
            data_dir: PathBuf::from(&cli.data_dir),
            reset: cli.reset,
            log_file: cli.log_file.as_ref().map(PathBuf::from),
            api_listen: cli.api_listen,
            site: Site {
                name_en: cli.municipality_name.clone(),
                name_ne: cli.municipality_name_ne.clone(),
                base_url: with_trailing_slash(cli.base_url.clone()),
            },
        }
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join("digital-profile.sqlite")
    }
}

/// Page paths are joined onto the base URL, which drops the last segment
/// unless the path ends with `/`.
fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}
