//! Static analyzer data: available charts, filter limits and site entities.

use crate::search::{SearchBox, SearchGroup, SearchItem};
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartSize {
    Medium,
    Large,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartDefinition {
    pub id: &'static str,
    pub title: &'static str,
    pub subtitle: Option<&'static str>,
    pub category: &'static str,
    pub size: ChartSize,
}

impl ChartDefinition {
    pub fn full_title(&self) -> String {
        match self.subtitle {
            Some(subtitle) => format!("{} {}", self.title, subtitle),
            None => self.title.to_string(),
        }
    }
}

const fn chart(
    id: &'static str,
    title: &'static str,
    subtitle: Option<&'static str>,
    category: &'static str,
    size: ChartSize,
) -> ChartDefinition {
    ChartDefinition {
        id,
        title,
        subtitle,
        category,
        size,
    }
}

pub static CHARTS: [ChartDefinition; 12] = [
    // Styles
    chart("typical-styles-absolute", "Styles Breakdown", Some("by Number of Recipes"), "Beer Styles", ChartSize::Large),
    chart("typical-styles-relative", "Styles Breakdown", Some("by Percent of Recipes"), "Beer Styles", ChartSize::Large),
    chart("popular-styles", "Popular Styles", None, "Beer Styles", ChartSize::Medium),
    chart("trending-styles", "Trending Styles", None, "Beer Styles", ChartSize::Medium),
    // Fermentables
    chart("popular-fermentables", "Most Used Fermentables", None, "Fermentables", ChartSize::Medium),
    chart("popular-fermentables-amount", "Typical Amount of Fermentables", None, "Fermentables", ChartSize::Large),
    // Hops
    chart("popular-hops", "Most Used Hops", None, "Hops", ChartSize::Medium),
    chart("trending-hops", "Trending Hops", None, "Hops", ChartSize::Medium),
    chart("popular-hops-amount", "Typical Amount of Hops", None, "Hops", ChartSize::Large),
    chart("hop-pairings", "Common Hop Pairings", None, "Hops", ChartSize::Large),
    // Yeasts
    chart("popular-yeasts", "Most Used Yeasts", None, "Yeasts", ChartSize::Medium),
    chart("trending-yeasts", "Trending Yeasts", None, "Yeasts", ChartSize::Medium),
];

pub fn find_chart(id: &str) -> Option<&'static ChartDefinition> {
    CHARTS.iter().find(|chart| chart.id == id)
}

pub fn chart_ids() -> impl Iterator<Item = &'static str> {
    CHARTS.iter().map(|chart| chart.id)
}

/// Charts grouped by category, categories in catalogue order.
pub fn grouped_charts() -> Vec<(&'static str, Vec<&'static ChartDefinition>)> {
    let mut groups: Vec<(&'static str, Vec<&'static ChartDefinition>)> = Vec::new();
    for chart in CHARTS.iter() {
        match groups.iter_mut().find(|(category, _)| *category == chart.category) {
            Some((_, charts)) => charts.push(chart),
            None => groups.push((chart.category, vec![chart])),
        }
    }
    groups
}

pub fn chart_search_box() -> SearchBox {
    SearchBox::new(
        grouped_charts()
            .into_iter()
            .map(|(category, charts)| {
                let items = charts
                    .into_iter()
                    .map(|chart| {
                        let title = chart.full_title();
                        SearchItem::new(chart.id, title.clone(), &title)
                    })
                    .collect();
                SearchGroup::new(category, items)
            })
            .collect(),
    )
}

/// Limits of a numeric filter. The server treats the domain edges as "no filter".
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub min: i64,
    pub max: i64,
    pub step: i64,
    /// Scale applied to values for display only.
    pub factor: f64,
}

pub static RANGES: [RangeSpec; 4] = [
    RangeSpec { name: "ibu", label: "Bitterness (IBU)", min: 0, max: 301, step: 1, factor: 1.0 },
    RangeSpec { name: "abv", label: "Alcohol (ABV %)", min: 0, max: 21, step: 1, factor: 1.0 },
    RangeSpec { name: "srm", label: "Color (SRM)", min: 0, max: 101, step: 1, factor: 1.0 },
    RangeSpec { name: "og", label: "Original Gravity", min: 1000, max: 1151, step: 2, factor: 0.001 },
];

/// Names of the multi-select filters, in query order.
pub const SET_FILTERS: [&str; 4] = ["styles", "hops", "fermentables", "yeasts"];

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Style {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub parent: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Ingredient {
    pub id: String,
    pub name: String,
}

/// Selectable entities served by the site.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Entities {
    #[serde(default)]
    pub styles: Vec<Style>,
    #[serde(default)]
    pub hops: Vec<Ingredient>,
    #[serde(default)]
    pub fermentables: Vec<Ingredient>,
    #[serde(default)]
    pub yeasts: Vec<Ingredient>,
}

impl Entities {
    /// Allowed keys of a set filter.
    pub fn ids(&self, filter: &str) -> Vec<String> {
        match filter {
            "styles" => self.styles.iter().map(|s| s.id.clone()).collect(),
            "hops" => self.hops.iter().map(|i| i.id.clone()).collect(),
            "fermentables" => self.fermentables.iter().map(|i| i.id.clone()).collect(),
            "yeasts" => self.yeasts.iter().map(|i| i.id.clone()).collect(),
            _ => Vec::new(),
        }
    }

    /// Display name of a key of a set filter.
    pub fn name_of(&self, filter: &str, id: &str) -> Option<&str> {
        match filter {
            "styles" => self.styles.iter().find(|s| s.id == id).map(|s| s.name.as_str()),
            "hops" => find_name(&self.hops, id),
            "fermentables" => find_name(&self.fermentables, id),
            "yeasts" => find_name(&self.yeasts, id),
            _ => None,
        }
    }

    /// Picker for a set filter. Styles are grouped under their parent style.
    pub fn search_box(&self, filter: &str) -> SearchBox {
        if filter == "styles" {
            let mut groups: Vec<SearchGroup> = Vec::new();
            for style in &self.styles {
                let parent = style.parent.as_deref().unwrap_or("Other");
                let item = SearchItem::new(style.id.clone(), style.name.clone(), &style.name);
                match groups.iter_mut().find(|g| g.title == parent) {
                    Some(group) => group.items.push(item),
                    None => groups.push(SearchGroup::new(parent, vec![item])),
                }
            }
            return SearchBox::new(groups);
        }

        let ingredients = match filter {
            "hops" => &self.hops,
            "fermentables" => &self.fermentables,
            "yeasts" => &self.yeasts,
            _ => return SearchBox::new(Vec::new()),
        };
        let items = ingredients
            .iter()
            .map(|i| SearchItem::new(i.id.clone(), i.name.clone(), &i.name))
            .collect();
        SearchBox::new(vec![SearchGroup::new(filter, items)])
    }
}

fn find_name<'a>(ingredients: &'a [Ingredient], id: &str) -> Option<&'a str> {
    ingredients
        .iter()
        .find(|i| i.id == id)
        .map(|i| i.name.as_str())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn sample_entities() -> Entities {
        serde_json::from_str(
            r#"{
                "styles": [
                    {"id": "ipa", "name": "American IPA", "parent": "IPA"},
                    {"id": "neipa", "name": "Hazy IPA", "parent": "IPA"},
                    {"id": "stout", "name": "Stout"}
                ],
                "hops": [{"id": "citra", "name": "Citra"}, {"id": "mosaic", "name": "Mosaic"}],
                "fermentables": [{"id": "pilsner", "name": "Pilsner Malt"}],
                "yeasts": [{"id": "us05", "name": "US-05"}]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_catalogue_groups() {
        let groups = grouped_charts();
        let categories: Vec<&str> = groups.iter().map(|(c, _)| *c).collect();
        assert_eq!(categories, vec!["Beer Styles", "Fermentables", "Hops", "Yeasts"]);
        assert_eq!(groups[2].1.len(), 4);
        assert_eq!(chart_ids().count(), 12);
    }

    #[test]
    fn test_find_chart() {
        let chart = find_chart("typical-styles-relative").unwrap();
        assert_eq!(chart.full_title(), "Styles Breakdown by Percent of Recipes");
        assert_eq!(chart.size, ChartSize::Large);
        assert!(find_chart("nope").is_none());
    }

    #[test]
    fn test_chart_search() {
        let mut search = chart_search_box();
        search.search("trending");
        assert_eq!(search.match_count(), 3);
        assert!(!search.groups()[1].is_matching());
    }

    #[test]
    fn test_entities() {
        let entities = sample_entities();
        assert_eq!(entities.ids("hops"), vec!["citra", "mosaic"]);
        assert_eq!(entities.name_of("styles", "neipa"), Some("Hazy IPA"));
        assert!(entities.ids("ibu").is_empty());

        let styles = entities.search_box("styles");
        let titles: Vec<&str> = styles.groups().iter().map(|g| g.title.as_str()).collect();
        assert_eq!(titles, vec!["IPA", "Other"]);
    }

    #[test]
    fn test_missing_entity_lists_default_to_empty() {
        let entities: Entities = serde_json::from_str(r#"{"styles": []}"#).unwrap();
        assert!(entities.hops.is_empty());
    }
}
