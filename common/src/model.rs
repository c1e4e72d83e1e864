//! Wire and storage model shared by the store service and the explorer.
//!
//! Fields other than `id` are optional: the service does no validation, so a
//! field the client never sent stays absent in memory and in the document.
//! Unknown fields are carried through untouched so an update really does
//! replace the whole record with whatever the client sent.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    #[serde(default)]
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius: Option<String>,
    #[serde(default)]
    pub places: Vec<Place>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    #[serde(default)]
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restaurants: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hotels: Option<Vec<String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Which nearby-venue list of a place is being read or edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VenueKind {
    Restaurants,
    Hotels,
}

impl VenueKind {
    pub fn label(self) -> &'static str {
        match self {
            VenueKind::Restaurants => "Restaurants",
            VenueKind::Hotels => "Hotels",
        }
    }
}

impl City {
    pub fn new(name: impl Into<String>, radius: impl Into<String>) -> Self {
        Self {
            id: 0,
            name: Some(name.into()),
            radius: Some(radius.into()),
            places: Vec::new(),
            extra: Map::new(),
        }
    }

    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }

    pub fn radius(&self) -> &str {
        self.radius.as_deref().unwrap_or_default()
    }

    pub fn place(&self, place_id: i64) -> Option<&Place> {
        self.places.iter().find(|p| p.id == place_id)
    }

    /// Case-insensitive substring match on the city name.
    pub fn matches(&self, query: &str) -> bool {
        contains_ignore_case(self.name(), query)
    }
}

impl Place {
    pub fn new(id: i64, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id,
            name: Some(name.into()),
            description: Some(description.into()),
            restaurants: None,
            hotels: None,
            extra: Map::new(),
        }
    }

    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }

    pub fn description(&self) -> &str {
        self.description.as_deref().unwrap_or_default()
    }

    /// Case-insensitive substring match on name or description.
    pub fn matches(&self, query: &str) -> bool {
        contains_ignore_case(self.name(), query) || contains_ignore_case(self.description(), query)
    }

    pub fn venues(&self, kind: VenueKind) -> &[String] {
        let list = match kind {
            VenueKind::Restaurants => &self.restaurants,
            VenueKind::Hotels => &self.hotels,
        };
        list.as_deref().unwrap_or_default()
    }

    pub fn set_venues(&mut self, kind: VenueKind, venues: Vec<String>) {
        match kind {
            VenueKind::Restaurants => self.restaurants = Some(venues),
            VenueKind::Hotels => self.hotels = Some(venues),
        }
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Next id under the "one greater than the largest existing id" rule.
/// Ids are never handed back out, even if the largest record disappears
/// from under us through an external edit of the document.
pub fn next_id<I>(ids: I) -> i64
where
    I: IntoIterator<Item = i64>,
{
    ids.into_iter().fold(0, i64::max) + 1
}
