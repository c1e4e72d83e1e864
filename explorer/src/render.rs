//! Plain-text rendering of each explorer view.

use crate::api::CatalogApi;
use crate::app::{Explorer, View};
use crate::form::{CityForm, FormMode};
use common::model::{City, Place, VenueKind};
use std::fmt::Write;

const TITLE: &str = "Explore Famous Places in Indian Cities";

pub fn render<A: CatalogApi>(explorer: &Explorer<A>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "== {} ==", TITLE);

    match explorer.view() {
        View::Home => home(&mut out, explorer),
        View::AddingCity(form) | View::EditingCity { form, .. } => city_form(&mut out, form),
        View::City { .. } => match explorer.selected_city() {
            Some(city) => city_view(&mut out, city, explorer),
            None => out.push_str("City not found.\n"),
        },
        View::Place { .. } => match (explorer.selected_city(), explorer.selected_place()) {
            (Some(city), Some(place)) => place_view(&mut out, city, place),
            _ => out.push_str("Place not found.\n"),
        },
        View::EditingVenues { kind, draft, .. } => match explorer.selected_place() {
            Some(place) => venue_form(&mut out, place, *kind, draft),
            None => out.push_str("Place not found.\n"),
        },
    }

    if let Some(error) = explorer.error() {
        let _ = writeln!(out, "\n!! {}", error);
    }
    out
}

fn search_line<A: CatalogApi>(out: &mut String, explorer: &Explorer<A>) {
    let prompt = match explorer.selected_city() {
        Some(city) => format!("Search in {}...", city.name()),
        None => "Search for a city...".to_string(),
    };
    let _ = writeln!(out, "[{}] {}\n", prompt, explorer.query());
}

fn home<A: CatalogApi>(out: &mut String, explorer: &Explorer<A>) {
    search_line(out, explorer);
    let cities = explorer.visible_cities();
    if cities.is_empty() {
        out.push_str("No cities found.\n");
        return;
    }
    for city in cities {
        let _ = writeln!(out, "{:>4}  {} ({})", city.id, city.name(), city.radius());
    }
}

fn city_view<A: CatalogApi>(out: &mut String, city: &City, explorer: &Explorer<A>) {
    search_line(out, explorer);
    let _ = writeln!(out, "Famous Places in {}", city.name());
    let _ = writeln!(out, "All these are within {} of {}.\n", city.radius(), city.name());

    let places = explorer.visible_places();
    if places.is_empty() {
        out.push_str("No places found.\n");
        return;
    }
    for place in places {
        let _ = writeln!(out, "{:>4}  {}: {}", place.id, place.name(), place.description());
    }
}

fn place_view(out: &mut String, city: &City, place: &Place) {
    let _ = writeln!(out, "{} / {}", city.name(), place.name());
    let _ = writeln!(out, "{}\n", place.description());
    for kind in [VenueKind::Restaurants, VenueKind::Hotels] {
        let _ = writeln!(out, "{} nearby:", kind.label());
        venue_list(out, place.venues(kind));
    }
}

fn venue_list(out: &mut String, venues: &[String]) {
    if venues.is_empty() {
        out.push_str("  none listed\n");
    }
    for (index, venue) in venues.iter().enumerate() {
        let _ = writeln!(out, "  {}. {}", index + 1, venue);
    }
}

fn city_form(out: &mut String, form: &CityForm) {
    let heading = match form.mode() {
        FormMode::Create => "Add New City".to_string(),
        FormMode::Edit { city_id } => format!("Edit City #{}", city_id),
    };
    let _ = writeln!(out, "{}", heading);
    let _ = writeln!(out, "  City Name: {}", form.name);
    let _ = writeln!(out, "  Radius:    {}", form.radius);
    out.push_str("  Places:\n");
    for (index, place) in form.places.iter().enumerate() {
        let _ = writeln!(
            out,
            "    {}. {} | {}",
            index + 1,
            place.name(),
            place.description()
        );
    }
}

fn venue_form(out: &mut String, place: &Place, kind: VenueKind, draft: &[String]) {
    let _ = writeln!(out, "Edit {} near {}", kind.label(), place.name());
    venue_list(out, draft);
}
