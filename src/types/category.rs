use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use super::{Locale, ProfileError};

/// Families of ward-wise categorical statistics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Caste,
    Religion,
    MotherTongue,
    Occupation,
    RoofMaterial,
    FloorMaterial,
    DrinkingWater,
    ToiletType,
    CookingFuel,
    Literacy,
    EducationLevel,
    Disability,
    RemittanceExpense,
    LandOwnership,
}

const ALL: [Category; 14] = [
    Category::Caste,
    Category::Religion,
    Category::MotherTongue,
    Category::Occupation,
    Category::RoofMaterial,
    Category::FloorMaterial,
    Category::DrinkingWater,
    Category::ToiletType,
    Category::CookingFuel,
    Category::Literacy,
    Category::EducationLevel,
    Category::Disability,
    Category::RemittanceExpense,
    Category::LandOwnership,
];

impl Category {
    pub fn all() -> &'static [Category] {
        &ALL
    }

    pub fn slug(self) -> &'static str {
        match self {
            Category::Caste => "caste",
            Category::Religion => "religion",
            Category::MotherTongue => "mother-tongue",
            Category::Occupation => "occupation",
            Category::RoofMaterial => "roof-material",
            Category::FloorMaterial => "floor-material",
            Category::DrinkingWater => "drinking-water",
            Category::ToiletType => "toilet-type",
            Category::CookingFuel => "cooking-fuel",
            Category::Literacy => "literacy",
            Category::EducationLevel => "education-level",
            Category::Disability => "disability",
            Category::RemittanceExpense => "remittance-expense",
            Category::LandOwnership => "land-ownership",
        }
    }

    /// Key used by the pre-migration `legacy_ward_statistics` table.
    pub fn legacy_key(self) -> String {
        self.slug().replace('-', "_")
    }

    pub fn title(self, locale: Locale) -> &'static str {
        match locale {
            Locale::En => match self {
                Category::Caste => "Caste-wise Population",
                Category::Religion => "Religion-wise Population",
                Category::MotherTongue => "Mother Tongue-wise Population",
                Category::Occupation => "Occupation-wise Population",
                Category::RoofMaterial => "Households by Roof Material",
                Category::FloorMaterial => "Households by Floor Material",
                Category::DrinkingWater => "Households by Drinking Water Source",
                Category::ToiletType => "Households by Toilet Type",
                Category::CookingFuel => "Households by Cooking Fuel",
                Category::Literacy => "Literacy Status",
                Category::EducationLevel => "Educational Attainment",
                Category::Disability => "Population with Disability",
                Category::RemittanceExpense => "Use of Remittance",
                Category::LandOwnership => "Land Ownership",
            },
            Locale::Ne => match self {
                Category::Caste => "जातिगत आधारमा जनसंख्या",
                Category::Religion => "धर्म अनुसार जनसंख्या",
                Category::MotherTongue => "मातृभाषाको आधारमा जनसंख्या",
                Category::Occupation => "पेशाको आधारमा जनसंख्या",
                Category::RoofMaterial => "छानाको प्रकार अनुसार घरपरिवार",
                Category::FloorMaterial => "भुइँको प्रकार अनुसार घरपरिवार",
                Category::DrinkingWater => "खानेपानीको स्रोत अनुसार घरपरिवार",
                Category::ToiletType => "शौचालयको प्रकार अनुसार घरपरिवार",
                Category::CookingFuel => "खाना पकाउने इन्धन अनुसार घरपरिवार",
                Category::Literacy => "साक्षरताको अवस्था",
                Category::EducationLevel => "शैक्षिक योग्यता",
                Category::Disability => "अपाङ्गता भएका जनसंख्या",
                Category::RemittanceExpense => "विप्रेषणको उपयोग",
                Category::LandOwnership => "जग्गा स्वामित्व",
            },
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for Category {
    type Err = ProfileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALL.iter()
            .copied()
            .find(|c| c.slug() == s || c.legacy_key() == s)
            .ok_or_else(|| ProfileError::InvalidCategory(s.to_string()))
    }
}
