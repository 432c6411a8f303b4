use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use super::ProfileError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    En,
    #[default]
    Ne,
}

impl Locale {
    pub const ALL: [Locale; 2] = [Locale::En, Locale::Ne];

    pub fn as_str(self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Ne => "ne",
        }
    }

    /// Open Graph locale tag.
    pub fn og_tag(self) -> &'static str {
        match self {
            Locale::En => "en_US",
            Locale::Ne => "ne_NP",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Locale {
    type Err = ProfileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "en" => Ok(Locale::En),
            "ne" => Ok(Locale::Ne),
            _ => Err(ProfileError::InvalidLocale(s.to_string())),
        }
    }
}
