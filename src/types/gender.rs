use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use super::{Locale, ProfileError};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub const ALL: [Gender; 3] = [Gender::Male, Gender::Female, Gender::Other];

    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
        }
    }

    pub fn title(self, locale: Locale) -> &'static str {
        match (self, locale) {
            (Gender::Male, Locale::En) => "Male",
            (Gender::Female, Locale::En) => "Female",
            (Gender::Other, Locale::En) => "Other",
            (Gender::Male, Locale::Ne) => "पुरुष",
            (Gender::Female, Locale::Ne) => "महिला",
            (Gender::Other, Locale::Ne) => "अन्य",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = ProfileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            "other" => Ok(Gender::Other),
            _ => Err(ProfileError::InvalidGender(s.to_string())),
        }
    }
}
