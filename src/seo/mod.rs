use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{json, Value};
use url::Url;

use crate::types::{Locale, Page};

/// Municipality identity used when composing titles and links.
#[derive(Clone, Debug)]
pub struct Site {
    pub name_en: String,
    pub name_ne: String,
    pub base_url: Url,
}

impl Site {
    pub fn name(&self, locale: Locale) -> &str {
        match locale {
            Locale::En => &self.name_en,
            Locale::Ne => &self.name_ne,
        }
    }

    /// Absolute URL of a page; falls back to the base URL if the join fails.
    pub fn page_url(&self, locale: Locale, page: Page) -> String {
        self.base_url
            .join(&page.path(locale))
            .map(|u| u.to_string())
            .unwrap_or_else(|_| self.base_url.to_string())
    }
}

/// Headline figures quoted in descriptions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Headline {
    pub total_population: u64,
    pub households: u64,
    pub wards: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenGraph {
    pub title: String,
    pub description: String,
    pub url: String,
    pub site_name: String,
    pub locale: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMetadata {
    pub title: String,
    pub description: String,
    pub keywords: Vec<String>,
    pub canonical: String,
    /// Locale code to URL.
    pub alternates: BTreeMap<String, String>,
    pub open_graph: OpenGraph,
}

const DEVANAGARI_DIGITS: [char; 10] = ['०', '१', '२', '३', '४', '५', '६', '७', '८', '९'];

pub fn localize_digits(text: &str, locale: Locale) -> String {
    match locale {
        Locale::En => text.to_string(),
        Locale::Ne => text
            .chars()
            .map(|c| match c.to_digit(10) {
                Some(d) if c.is_ascii_digit() => DEVANAGARI_DIGITS[d as usize],
                _ => c,
            })
            .collect(),
    }
}

fn title(site: &Site, locale: Locale, page: Page) -> String {
    match page {
        Page::Overview => format!("{} | {}", site.name(locale), page.title(locale)),
        _ => format!(
            "{} | {} {}",
            page.title(locale),
            site.name(locale),
            page_suffix(locale)
        ),
    }
}

fn page_suffix(locale: Locale) -> &'static str {
    match locale {
        Locale::En => "Digital Profile",
        Locale::Ne => "डिजिटल प्रोफाइल",
    }
}

fn description(site: &Site, locale: Locale, page: Page, headline: Option<&Headline>) -> String {
    let name = site.name(locale);
    let topic = page.title(locale);
    let text = match (locale, headline) {
        (Locale::En, Some(h)) => format!(
            "{topic} of {name}: ward-wise statistics covering a population of {} in {} households across {} wards.",
            h.total_population, h.households, h.wards
        ),
        (Locale::En, None) => {
            format!("{topic} of {name}: ward-wise demographic and infrastructure statistics.")
        }
        (Locale::Ne, Some(h)) => format!(
            "{name}को {topic}: {} वडाका {} घरपरिवार र {} जनसंख्याको वडागत तथ्याङ्क।",
            h.wards, h.households, h.total_population
        ),
        (Locale::Ne, None) => format!("{name}को {topic}: वडागत तथ्याङ्क र विवरण।"),
    };
    localize_digits(&text, locale)
}

fn keywords(site: &Site, locale: Locale, page: Page) -> Vec<String> {
    let mut words = vec![
        site.name(locale).to_string(),
        page.title(locale).to_string(),
    ];
    let generic: &[&str] = match locale {
        Locale::En => &["ward statistics", "municipal profile", "Nepal census"],
        Locale::Ne => &["वडागत तथ्याङ्क", "गाउँपालिका प्रोफाइल", "जनगणना"],
    };
    words.extend(generic.iter().map(|w| w.to_string()));
    words
}

fn build(site: &Site, locale: Locale, page: Page, headline: Option<&Headline>) -> PageMetadata {
    let title = title(site, locale, page);
    let description = description(site, locale, page, headline);
    let canonical = site.page_url(locale, page);
    let alternates = Locale::ALL
        .iter()
        .map(|l| (l.as_str().to_string(), site.page_url(*l, page)))
        .collect();

    PageMetadata {
        open_graph: OpenGraph {
            title: title.clone(),
            description: description.clone(),
            url: canonical.clone(),
            site_name: site.name(locale).to_string(),
            locale: locale.og_tag().to_string(),
            kind: "website",
        },
        keywords: keywords(site, locale, page),
        title,
        description,
        canonical,
        alternates,
    }
}

pub fn page_metadata(
    site: &Site,
    locale: Locale,
    page: Page,
    headline: &Headline,
) -> PageMetadata {
    build(site, locale, page, Some(headline))
}

/// Metadata served when the page data could not be loaded.
pub fn default_metadata(site: &Site, locale: Locale, page: Page) -> PageMetadata {
    build(site, locale, page, None)
}

/// schema.org `Dataset` block for the page.
pub fn json_ld(
    site: &Site,
    locale: Locale,
    page: Page,
    headline: Option<&Headline>,
    measured: &[String],
) -> Value {
    let mut dataset = json!({
        "@context": "https://schema.org",
        "@type": "Dataset",
        "name": title(site, locale, page),
        "description": description(site, locale, page, headline),
        "url": site.page_url(locale, page),
        "inLanguage": locale.as_str(),
        "keywords": keywords(site, locale, page),
        "creator": {
            "@type": "GovernmentOrganization",
            "name": site.name(locale),
            "url": site.base_url.as_str(),
        },
        "spatialCoverage": {
            "@type": "Place",
            "name": site.name(locale),
            "containedInPlace": {
                "@type": "AdministrativeArea",
                "name": "Nepal",
            },
        },
        "variableMeasured": measured
            .iter()
            .map(|name| json!({ "@type": "PropertyValue", "name": name }))
            .collect::<Vec<_>>(),
    });

    if let (Some(h), Some(obj)) = (headline, dataset.as_object_mut()) {
        obj.insert(
            "size".to_string(),
            json!({
                "@type": "QuantitativeValue",
                "value": h.total_population,
                "unitText": "persons",
            }),
        );
    }
    dataset
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Category;

    fn site() -> Site {
        Site {
            name_en: "Khajura Rural Municipality".to_string(),
            name_ne: "खजुरा गाउँपालिका".to_string(),
            base_url: Url::parse("https://profile.example.gov.np/").unwrap(),
        }
    }

    fn headline() -> Headline {
        Headline {
            total_population: 50231,
            households: 10870,
            wards: 8,
        }
    }

    #[test]
    fn localize_digits_only_touches_ascii_digits_in_nepali() {
        assert_eq!(localize_digits("Ward 10", Locale::En), "Ward 10");
        assert_eq!(localize_digits("वडा 10", Locale::Ne), "वडा १०");
        assert_eq!(localize_digits("2081/82", Locale::Ne), "२०८१/८२");
    }

    #[test]
    fn canonical_and_alternates_cover_both_locales() {
        let meta = page_metadata(&site(), Locale::En, Page::Population, &headline());
        assert_eq!(
            meta.canonical,
            "https://profile.example.gov.np/profile/en/population"
        );
        assert_eq!(
            meta.alternates.get("ne").map(String::as_str),
            Some("https://profile.example.gov.np/profile/ne/population")
        );
        assert_eq!(meta.open_graph.locale, "en_US");
        assert!(meta.description.contains("50231"));
    }

    #[test]
    fn nepali_description_uses_devanagari_numerals() {
        let meta = page_metadata(
            &site(),
            Locale::Ne,
            Page::Category(Category::Caste),
            &headline(),
        );
        assert!(meta.description.contains("५०२३१"));
        assert!(!meta.description.contains("50231"));
        assert!(meta.title.starts_with("जातिगत आधारमा जनसंख्या"));
    }

    #[test]
    fn default_metadata_has_no_figures() {
        let meta = default_metadata(&site(), Locale::En, Page::AgeGender);
        assert!(!meta.description.chars().any(|c| c.is_ascii_digit()));
        assert_eq!(meta.open_graph.kind, "website");
    }

    #[test]
    fn json_ld_describes_a_dataset() {
        let measured = vec!["Male".to_string(), "Female".to_string()];
        let value = json_ld(
            &site(),
            Locale::En,
            Page::Population,
            Some(&headline()),
            &measured,
        );
        assert_eq!(value["@type"], "Dataset");
        assert_eq!(value["spatialCoverage"]["containedInPlace"]["@type"], "AdministrativeArea");
        assert_eq!(value["variableMeasured"].as_array().unwrap().len(), 2);
        assert_eq!(value["size"]["value"], 50231);

        let bare = json_ld(&site(), Locale::En, Page::Population, None, &[]);
        assert!(bare.get("size").is_none());
    }
}
