//! Localized profile pages, delivered as JSON page models.
//!
//! A page model bundles everything a renderer needs: metadata, a JSON-LD
//! block, the summary numbers, chart series and a table. Loading failures
//! never fail the page; they degrade it to default metadata and empty data.

use serde::Serialize;
use serde_json::Value;

use crate::{
    charts::{self, BarGroup, BarValue, ChartSlice, PyramidBar},
    seo::{self, Headline, PageMetadata, Site},
    stats::{self, AgePyramid, MunicipalitySummary},
    storage::{self, AgeGenderFilter, StorageRead},
    types::{Category, Gender, Locale, Page, WardNumber},
};

/// Slices shown before the rest is folded into "other".
const PIE_TOP: usize = 6;

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Chart {
    Pie { title: String, slices: Vec<ChartSlice> },
    Bar { title: String, groups: Vec<BarGroup> },
    Pyramid { title: String, bars: Vec<PyramidBar> },
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageLink {
    pub slug: String,
    pub title: String,
    pub href: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageModel {
    pub locale: Locale,
    pub page: String,
    pub metadata: PageMetadata,
    pub json_ld: Value,
    pub summary: Value,
    pub charts: Vec<Chart>,
    pub table: Table,
    pub links: Vec<PageLink>,
}

/// Page body before metadata is attached.
struct Content {
    headline: Headline,
    measured: Vec<String>,
    summary: Value,
    charts: Vec<Chart>,
    table: Table,
}

pub fn ward_label(ward: WardNumber, locale: Locale) -> String {
    match locale {
        Locale::En => format!("Ward {}", ward),
        Locale::Ne => seo::localize_digits(&format!("वडा {}", ward), locale),
    }
}

fn other_label(locale: Locale) -> &'static str {
    match locale {
        Locale::En => "Others",
        Locale::Ne => "अन्य",
    }
}

fn column(locale: Locale, en: &str, ne: &str) -> String {
    match locale {
        Locale::En => en.to_string(),
        Locale::Ne => ne.to_string(),
    }
}

fn headline_of(summary: &MunicipalitySummary) -> Headline {
    Headline {
        total_population: summary.total_population,
        households: summary.households,
        wards: summary.wards.len(),
    }
}

fn links(site: &Site, locale: Locale) -> Vec<PageLink> {
    Page::all()
        .into_iter()
        .filter(|p| *p != Page::Overview)
        .map(|p| PageLink {
            slug: p.slug().to_string(),
            title: p.title(locale).to_string(),
            href: site.page_url(locale, p),
        })
        .collect()
}

fn population_content<S: StorageRead + ?Sized>(
    storage: &S,
    locale: Locale,
) -> anyhow::Result<Content> {
    let rows = storage.list_ward_demographics(None)?;
    let summary = stats::municipality_summary(&rows);

    let gender_pie = charts::pie(vec![
        (Gender::Male.title(locale), summary.male),
        (Gender::Female.title(locale), summary.female),
        (Gender::Other.title(locale), summary.other),
    ]);
    let ward_groups = rows
        .iter()
        .map(|r| BarGroup {
            label: ward_label(r.ward, locale),
            values: [
                (Gender::Male, r.male),
                (Gender::Female, r.female),
                (Gender::Other, r.other),
            ]
            .into_iter()
            .map(|(g, value)| BarValue {
                key: g.title(locale).to_string(),
                value,
            })
            .collect(),
        })
        .collect();

    let table = Table {
        columns: vec![
            column(locale, "Ward", "वडा"),
            column(locale, "Population", "जनसंख्या"),
            Gender::Male.title(locale).to_string(),
            Gender::Female.title(locale).to_string(),
            Gender::Other.title(locale).to_string(),
            column(locale, "Households", "घरपरिवार"),
            column(locale, "Share (%)", "प्रतिशत"),
        ],
        rows: rows
            .iter()
            .zip(summary.wards.iter())
            .map(|(r, share)| {
                vec![
                    Value::from(ward_label(r.ward, locale)),
                    Value::from(r.total_population),
                    Value::from(r.male),
                    Value::from(r.female),
                    Value::from(r.other),
                    Value::from(r.households),
                    Value::from(share.percentage),
                ]
            })
            .collect(),
    };

    Ok(Content {
        headline: headline_of(&summary),
        measured: Gender::ALL
            .iter()
            .map(|g| g.title(locale).to_string())
            .collect(),
        summary: serde_json::to_value(&summary)?,
        charts: vec![
            Chart::Pie {
                title: column(locale, "Population by gender", "लिङ्ग अनुसार जनसंख्या"),
                slices: gender_pie,
            },
            Chart::Bar {
                title: column(locale, "Population by ward", "वडागत जनसंख्या"),
                groups: ward_groups,
            },
        ],
        table,
    })
}

fn age_gender_content<S: StorageRead + ?Sized>(
    storage: &S,
    locale: Locale,
) -> anyhow::Result<Content> {
    let rows = storage.list_age_gender(&AgeGenderFilter::default())?;
    let pyramid: AgePyramid = stats::age_pyramid(&rows);
    let households = storage
        .list_ward_demographics(None)?
        .iter()
        .fold(0u64, |acc, r| acc.saturating_add(r.households));
    let wards = {
        let mut wards: Vec<WardNumber> = rows.iter().map(|r| r.ward).collect();
        wards.dedup();
        wards.len()
    };

    let stage_pie = charts::pie(vec![
        (column(locale, "Children (0-14)", "बालबालिका (०-१४)"), pyramid.child_population),
        (
            column(locale, "Working age (15-64)", "सक्रिय उमेर (१५-६४)"),
            pyramid.working_age_population,
        ),
        (column(locale, "Elderly (65+)", "ज्येष्ठ नागरिक (६५+)"), pyramid.elderly_population),
    ]);

    let table = Table {
        columns: vec![
            column(locale, "Age group", "उमेर समूह"),
            Gender::Male.title(locale).to_string(),
            Gender::Female.title(locale).to_string(),
            Gender::Other.title(locale).to_string(),
            column(locale, "Total", "जम्मा"),
        ],
        rows: pyramid
            .bands
            .iter()
            .map(|band| {
                vec![
                    Value::from(band.age_group.clone()),
                    Value::from(band.male),
                    Value::from(band.female),
                    Value::from(band.other),
                    Value::from(band.total),
                ]
            })
            .collect(),
    };

    Ok(Content {
        headline: Headline {
            total_population: pyramid.total,
            households,
            wards,
        },
        measured: pyramid.bands.iter().map(|b| b.age_group.clone()).collect(),
        charts: vec![
            Chart::Pyramid {
                title: column(locale, "Population pyramid", "जनसंख्या पिरामिड"),
                bars: charts::pyramid_bars(&pyramid),
            },
            Chart::Pie {
                title: column(locale, "Broad age groups", "मुख्य उमेर समूह"),
                slices: stage_pie,
            },
        ],
        summary: serde_json::to_value(&pyramid)?,
        table,
    })
}

fn category_content<S: StorageRead + ?Sized>(
    storage: &S,
    locale: Locale,
    category: Category,
) -> anyhow::Result<Content> {
    let rows = storage::ward_stats_with_fallback(storage, category, None)?;
    let summary = stats::category_summary(category, &rows);
    let demographics = storage.list_ward_demographics(None)?;
    let totals = stats::municipality_summary(&demographics);

    let slices = charts::pie(
        summary
            .items
            .iter()
            .map(|item| (item.label.clone(), item.count)),
    );

    let table = Table {
        columns: vec![
            column(locale, "Category", "विवरण"),
            column(locale, "Count", "संख्या"),
            column(locale, "Share (%)", "प्रतिशत"),
        ],
        rows: summary
            .items
            .iter()
            .map(|item| {
                vec![
                    Value::from(item.label.clone()),
                    Value::from(item.count),
                    Value::from(item.percentage),
                ]
            })
            .collect(),
    };

    Ok(Content {
        headline: headline_of(&totals),
        measured: summary.items.iter().map(|i| i.label.clone()).collect(),
        charts: vec![
            Chart::Pie {
                title: category.title(locale).to_string(),
                slices: charts::top_with_other(slices, PIE_TOP, other_label(locale)),
            },
            Chart::Bar {
                title: column(locale, "Ward-wise distribution", "वडागत वितरण"),
                groups: charts::ward_bars(&rows, |ward| ward_label(ward, locale)),
            },
        ],
        summary: serde_json::to_value(&summary)?,
        table,
    })
}

fn overview_content<S: StorageRead + ?Sized>(storage: &S) -> anyhow::Result<Content> {
    let rows = storage.list_ward_demographics(None)?;
    let summary = stats::municipality_summary(&rows);
    Ok(Content {
        headline: headline_of(&summary),
        measured: Vec::new(),
        summary: serde_json::to_value(&summary)?,
        charts: Vec::new(),
        table: Table::default(),
    })
}

fn load<S: StorageRead + ?Sized>(
    storage: &S,
    locale: Locale,
    page: Page,
) -> anyhow::Result<Content> {
    match page {
        Page::Overview => overview_content(storage),
        Page::Population => population_content(storage, locale),
        Page::AgeGender => age_gender_content(storage, locale),
        Page::Category(category) => category_content(storage, locale, category),
    }
}

pub fn build_page<S: StorageRead + ?Sized>(
    storage: &S,
    site: &Site,
    locale: Locale,
    page: Page,
) -> PageModel {
    let links = match page {
        Page::Overview => links(site, locale),
        _ => Vec::new(),
    };

    match load(storage, locale, page) {
        Ok(content) => PageModel {
            locale,
            page: page.to_string(),
            metadata: seo::page_metadata(site, locale, page, &content.headline),
            json_ld: seo::json_ld(site, locale, page, Some(&content.headline), &content.measured),
            summary: content.summary,
            charts: content.charts,
            table: content.table,
            links,
        },
        Err(err) => {
            log::error!("Failed to load page {} ({}): {:#}", page, locale, err);
            PageModel {
                locale,
                page: page.to_string(),
                metadata: seo::default_metadata(site, locale, page),
                json_ld: seo::json_ld(site, locale, page, None, &[]),
                summary: Value::Null,
                charts: Vec::new(),
                table: Table::default(),
                links,
            }
        }
    }
}
