use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use super::ProfileError;

/// Highest ward number any municipality is divided into.
pub const MAX_WARD: u8 = 32;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct WardNumber(u8);

impl WardNumber {
    pub fn new(number: u8) -> Result<Self, ProfileError> {
        if number == 0 || number > MAX_WARD {
            return Err(ProfileError::InvalidWard(number.into()));
        }
        Ok(Self(number))
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for WardNumber {
    type Error = ProfileError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        let number = u8::try_from(value).map_err(|_| ProfileError::InvalidWard(value))?;
        Self::new(number)
    }
}

impl From<WardNumber> for u8 {
    fn from(ward: WardNumber) -> Self {
        ward.0
    }
}

impl fmt::Display for WardNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for WardNumber {
    type Err = ProfileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s
            .trim()
            .parse::<i64>()
            .map_err(|_| ProfileError::InvalidWardText(s.to_string()))?;
        Self::try_from(value)
    }
}
