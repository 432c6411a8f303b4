use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use super::ProfileError;

/// Five-year census age bands, open-ended from 75.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum AgeGroup {
    Age0To4,
    Age5To9,
    Age10To14,
    Age15To19,
    Age20To24,
    Age25To29,
    Age30To34,
    Age35To39,
    Age40To44,
    Age45To49,
    Age50To54,
    Age55To59,
    Age60To64,
    Age65To69,
    Age70To74,
    Age75Plus,
}

/// Broad bands used for the dependency ratio.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LifeStage {
    Child,
    WorkingAge,
    Elderly,
}

const ALL: [AgeGroup; 16] = [
    AgeGroup::Age0To4,
    AgeGroup::Age5To9,
    AgeGroup::Age10To14,
    AgeGroup::Age15To19,
    AgeGroup::Age20To24,
    AgeGroup::Age25To29,
    AgeGroup::Age30To34,
    AgeGroup::Age35To39,
    AgeGroup::Age40To44,
    AgeGroup::Age45To49,
    AgeGroup::Age50To54,
    AgeGroup::Age55To59,
    AgeGroup::Age60To64,
    AgeGroup::Age65To69,
    AgeGroup::Age70To74,
    AgeGroup::Age75Plus,
];

impl AgeGroup {
    pub fn all() -> &'static [AgeGroup] {
        &ALL
    }

    pub fn lower_bound(self) -> u8 {
        match ALL.iter().position(|g| *g == self) {
            Some(index) => (index as u8) * 5,
            None => 0,
        }
    }

    pub fn label(self) -> String {
        match self {
            AgeGroup::Age75Plus => "75+".to_string(),
            other => {
                let lower = other.lower_bound();
                format!("{}-{}", lower, lower + 4)
            }
        }
    }

    pub fn life_stage(self) -> LifeStage {
        match self.lower_bound() {
            0..=14 => LifeStage::Child,
            15..=64 => LifeStage::WorkingAge,
            _ => LifeStage::Elderly,
        }
    }
}

impl fmt::Display for AgeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

impl FromStr for AgeGroup {
    type Err = ProfileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        ALL.iter()
            .copied()
            .find(|group| group.label() == wanted)
            .ok_or_else(|| ProfileError::InvalidAgeGroup(s.to_string()))
    }
}

impl TryFrom<String> for AgeGroup {
    type Error = ProfileError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<AgeGroup> for String {
    fn from(group: AgeGroup) -> Self {
        group.label()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_follow_five_year_bands() {
        assert_eq!(AgeGroup::Age0To4.label(), "0-4");
        assert_eq!(AgeGroup::Age35To39.label(), "35-39");
        assert_eq!(AgeGroup::Age70To74.label(), "70-74");
        assert_eq!(AgeGroup::Age75Plus.label(), "75+");
    }

    #[test]
    fn parse_round_trips_every_label() {
        for group in AgeGroup::all() {
            assert_eq!(AgeGroup::from_str(&group.label()).unwrap(), *group);
        }
        assert!(AgeGroup::from_str("3-7").is_err());
    }

    #[test]
    fn life_stage_boundaries() {
        assert_eq!(AgeGroup::Age10To14.life_stage(), LifeStage::Child);
        assert_eq!(AgeGroup::Age15To19.life_stage(), LifeStage::WorkingAge);
        assert_eq!(AgeGroup::Age60To64.life_stage(), LifeStage::WorkingAge);
        assert_eq!(AgeGroup::Age65To69.life_stage(), LifeStage::Elderly);
        assert_eq!(AgeGroup::Age75Plus.life_stage(), LifeStage::Elderly);
    }
}
