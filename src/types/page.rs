use std::{fmt, str::FromStr};

use super::{Category, Locale, ProfileError};

/// A localized profile page.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Page {
    Overview,
    Population,
    AgeGender,
    Category(Category),
}

impl Page {
    pub fn all() -> Vec<Page> {
        let mut pages = vec![Page::Overview, Page::Population, Page::AgeGender];
        pages.extend(Category::all().iter().copied().map(Page::Category));
        pages
    }

    pub fn slug(self) -> &'static str {
        match self {
            Page::Overview => "",
            Page::Population => "population",
            Page::AgeGender => "age-gender",
            Page::Category(category) => category.slug(),
        }
    }

    /// Site-relative path, without a leading slash.
    pub fn path(self, locale: Locale) -> String {
        match self {
            Page::Overview => format!("profile/{}", locale),
            other => format!("profile/{}/{}", locale, other.slug()),
        }
    }

    pub fn title(self, locale: Locale) -> &'static str {
        match (self, locale) {
            (Page::Overview, Locale::En) => "Digital Profile",
            (Page::Overview, Locale::Ne) => "डिजिटल प्रोफाइल",
            (Page::Population, Locale::En) => "Ward-wise Population",
            (Page::Population, Locale::Ne) => "वडागत जनसंख्या",
            (Page::AgeGender, Locale::En) => "Population by Age and Gender",
            (Page::AgeGender, Locale::Ne) => "उमेर र लिङ्ग अनुसार जनसंख्या",
            (Page::Category(category), locale) => category.title(locale),
        }
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Page::Overview => f.write_str("overview"),
            other => f.write_str(other.slug()),
        }
    }
}

impl FromStr for Page {
    type Err = ProfileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" | "overview" => Ok(Page::Overview),
            "population" => Ok(Page::Population),
            "age-gender" => Ok(Page::AgeGender),
            other => Category::from_str(other)
                .map(Page::Category)
                .map_err(|_| ProfileError::InvalidPage(s.to_string())),
        }
    }
}
