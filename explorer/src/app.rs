use crate::api::CatalogApi;
use crate::form::CityForm;
use common::Error;
use common::model::{City, Place, VenueKind};
use tracing::{debug, warn};

/// Where the user is in the drill-down.
#[derive(Debug, Clone, PartialEq)]
pub enum View {
    Home,
    AddingCity(CityForm),
    City { city_id: i64 },
    EditingCity { city_id: i64, form: CityForm },
    Place { city_id: i64, place_id: i64 },
    EditingVenues {
        city_id: i64,
        place_id: i64,
        kind: VenueKind,
        draft: Vec<String>,
    },
}

/// Client-side view state over a cached copy of the catalog.
///
/// The cache is whatever the last list or write response said; it is never
/// refreshed behind the user's back.
pub struct Explorer<A: CatalogApi> {
    api: A,
    cities: Vec<City>,
    query: String,
    view: View,
    error: Option<String>,
}

impl<A: CatalogApi> Explorer<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            cities: Vec::new(),
            query: String::new(),
            view: View::Home,
            error: None,
        }
    }

    /// Fetches the whole collection once.
    pub async fn load(&mut self) {
        match self.api.list().await {
            Ok(cities) => {
                debug!(count = cities.len(), "Loaded cities");
                self.cities = cities;
                self.error = None;
            }
            Err(e) => {
                warn!(error = %e, "Failed to load cities");
                self.error = Some(inline_message(&e, "Failed to load cities"));
            }
        }
    }

    pub fn cities(&self) -> &[City] {
        &self.cities
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: &str) {
        self.query = query.to_string();
    }

    fn city(&self, city_id: i64) -> Option<&City> {
        self.cities.iter().find(|c| c.id == city_id)
    }

    fn selected_city_id(&self) -> Option<i64> {
        match &self.view {
            View::Home | View::AddingCity(_) => None,
            View::City { city_id }
            | View::EditingCity { city_id, .. }
            | View::Place { city_id, .. }
            | View::EditingVenues { city_id, .. } => Some(*city_id),
        }
    }

    pub fn selected_city(&self) -> Option<&City> {
        self.selected_city_id().and_then(|id| self.city(id))
    }

    pub fn selected_place(&self) -> Option<&Place> {
        match &self.view {
            View::Place { city_id, place_id } | View::EditingVenues { city_id, place_id, .. } => {
                self.city(*city_id).and_then(|c| c.place(*place_id))
            }
            _ => None,
        }
    }

    /// Cities whose name contains the query, in collection order.
    pub fn visible_cities(&self) -> Vec<&City> {
        self.cities.iter().filter(|c| c.matches(&self.query)).collect()
    }

    /// Places of the selected city whose name or description contains the query.
    pub fn visible_places(&self) -> Vec<&Place> {
        match self.selected_city() {
            Some(city) => city.places.iter().filter(|p| p.matches(&self.query)).collect(),
            None => Vec::new(),
        }
    }

    pub fn open_city(&mut self, city_id: i64) -> bool {
        if self.view != View::Home || self.city(city_id).is_none() {
            return false;
        }
        self.view = View::City { city_id };
        self.query.clear();
        self.error = None;
        true
    }

    pub fn open_place(&mut self, place_id: i64) -> bool {
        let View::City { city_id } = self.view else {
            return false;
        };
        if self.city(city_id).and_then(|c| c.place(place_id)).is_none() {
            return false;
        }
        self.view = View::Place { city_id, place_id };
        self.error = None;
        true
    }

    /// One step up the hierarchy; from an editing state this is a cancel.
    pub fn back(&mut self) {
        self.error = None;
        self.view = match &self.view {
            View::Home | View::AddingCity(_) => View::Home,
            View::City { .. } => {
                self.query.clear();
                View::Home
            }
            View::EditingCity { city_id, .. } => View::City { city_id: *city_id },
            View::Place { city_id, .. } => View::City { city_id: *city_id },
            View::EditingVenues { city_id, place_id, .. } => View::Place {
                city_id: *city_id,
                place_id: *place_id,
            },
        };
    }

    pub fn cancel(&mut self) {
        if self.is_editing() {
            self.back();
        }
    }

    pub fn is_editing(&self) -> bool {
        matches!(
            self.view,
            View::AddingCity(_) | View::EditingCity { .. } | View::EditingVenues { .. }
        )
    }

    pub fn start_add(&mut self) -> bool {
        if self.view != View::Home {
            return false;
        }
        self.view = View::AddingCity(CityForm::create());
        self.error = None;
        true
    }

    pub fn start_edit(&mut self) -> bool {
        let View::City { city_id } = self.view else {
            return false;
        };
        let Some(city) = self.city(city_id) else {
            return false;
        };
        self.view = View::EditingCity {
            city_id,
            form: CityForm::edit(city),
        };
        self.error = None;
        true
    }

    pub fn start_venue_edit(&mut self, kind: VenueKind) -> bool {
        let View::Place { city_id, place_id } = self.view else {
            return false;
        };
        let Some(place) = self.selected_place() else {
            return false;
        };
        let draft = place.venues(kind).to_vec();
        self.view = View::EditingVenues {
            city_id,
            place_id,
            kind,
            draft,
        };
        self.error = None;
        true
    }

    pub fn form_mut(&mut self) -> Option<&mut CityForm> {
        match &mut self.view {
            View::AddingCity(form) | View::EditingCity { form, .. } => Some(form),
            _ => None,
        }
    }

    pub fn venues_mut(&mut self) -> Option<&mut Vec<String>> {
        match &mut self.view {
            View::EditingVenues { draft, .. } => Some(draft),
            _ => None,
        }
    }

    /// Submits the current editing state. On failure the view stays where it
    /// is and the message is kept for inline display.
    pub async fn save(&mut self) -> bool {
        self.error = None;
        let outcome = match self.view.clone() {
            View::AddingCity(form) => self.submit_new_city(&form).await,
            View::EditingCity { city_id, form } => self.submit_city_edit(city_id, &form).await,
            View::EditingVenues {
                city_id,
                place_id,
                kind,
                draft,
            } => self.submit_venues(city_id, place_id, kind, draft).await,
            _ => return false,
        };

        match outcome {
            Ok(view) => {
                self.view = view;
                true
            }
            Err(message) => {
                self.error = Some(message);
                false
            }
        }
    }

    async fn submit_new_city(&mut self, form: &CityForm) -> Result<View, String> {
        check_required(form)?;
        let created = self
            .api
            .create(&form.to_city())
            .await
            .map_err(|e| inline_message(&e, "Failed to add city"))?;
        debug!(id = created.id, "City added");
        self.cities.push(created);
        Ok(View::Home)
    }

    async fn submit_city_edit(&mut self, city_id: i64, form: &CityForm) -> Result<View, String> {
        check_required(form)?;
        let updated = self
            .api
            .update(city_id, &form.to_city())
            .await
            .map_err(|e| inline_message(&e, "Failed to update city"))?;
        let city_id = updated.id;
        self.replace_city(updated);
        Ok(View::City { city_id })
    }

    async fn submit_venues(
        &mut self,
        city_id: i64,
        place_id: i64,
        kind: VenueKind,
        draft: Vec<String>,
    ) -> Result<View, String> {
        let cached = self
            .city(city_id)
            .ok_or_else(|| "City is no longer available".to_string())?;
        let city = merge_venues(cached, place_id, kind, draft);

        let updated = self
            .api
            .update(city_id, &city)
            .await
            .map_err(|e| inline_message(&e, "Failed to update city"))?;
        let city_id = updated.id;
        self.replace_city(updated);
        Ok(View::Place { city_id, place_id })
    }

    fn replace_city(&mut self, updated: City) {
        match self.cities.iter_mut().find(|c| c.id == updated.id) {
            Some(slot) => *slot = updated,
            None => self.cities.push(updated),
        }
    }
}

/// Copy of `city` where only one place's venue list differs.
pub fn merge_venues(city: &City, place_id: i64, kind: VenueKind, venues: Vec<String>) -> City {
    let mut merged = city.clone();
    if let Some(place) = merged.places.iter_mut().find(|p| p.id == place_id) {
        place.set_venues(kind, venues);
    }
    merged
}

fn check_required(form: &CityForm) -> Result<(), String> {
    let missing = form.missing_fields();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(format!("Please fill in: {}", missing.join(", ")))
    }
}

/// Message shown next to the form that triggered `err`.
pub fn inline_message(err: &Error, fallback: &str) -> String {
    match err {
        Error::Api { message, .. } if !message.is_empty() => message.clone(),
        Error::Api { .. } => fallback.to_string(),
        Error::Http(_) => "Network error".to_string(),
        other => other.to_string(),
    }
}
