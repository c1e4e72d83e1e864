use common::model::{City, Place, next_id};

/// What a submitted form turns into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit { city_id: i64 },
}

/// The add-city and edit-city form.
///
/// Place entries carry client-side ids so they keep a stable identity while
/// being added and removed. The store renumbers them on create but keeps them
/// as sent on update, so an edit must preserve the ids it started from.
#[derive(Debug, Clone, PartialEq)]
pub struct CityForm {
    mode: FormMode,
    base: City,
    pub name: String,
    pub radius: String,
    pub places: Vec<Place>,
}

impl CityForm {
    /// Blank form with a single empty place entry.
    pub fn create() -> Self {
        Self {
            mode: FormMode::Create,
            base: City::new("", ""),
            name: String::new(),
            radius: String::new(),
            places: vec![Place::new(1, "", "")],
        }
    }

    /// Form pre-filled from a full copy of an existing city.
    pub fn edit(city: &City) -> Self {
        Self {
            mode: FormMode::Edit { city_id: city.id },
            base: city.clone(),
            name: city.name().to_string(),
            radius: city.radius().to_string(),
            places: city.places.clone(),
        }
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn add_place(&mut self) -> i64 {
        let id = next_id(self.places.iter().map(|p| p.id));
        self.places.push(Place::new(id, "", ""));
        id
    }

    pub fn remove_place(&mut self, index: usize) -> bool {
        if index < self.places.len() {
            self.places.remove(index);
            true
        } else {
            false
        }
    }

    pub fn set_place_name(&mut self, index: usize, name: &str) -> bool {
        match self.places.get_mut(index) {
            Some(place) => {
                place.name = Some(name.to_string());
                true
            }
            None => false,
        }
    }

    pub fn set_place_description(&mut self, index: usize, description: &str) -> bool {
        match self.places.get_mut(index) {
            Some(place) => {
                place.description = Some(description.to_string());
                true
            }
            None => false,
        }
    }

    /// Labels of required inputs that are still empty.
    pub fn missing_fields(&self) -> Vec<String> {
        let mut missing = Vec::new();
        if self.name.trim().is_empty() {
            missing.push("city name".to_string());
        }
        if self.radius.trim().is_empty() {
            missing.push("radius".to_string());
        }
        for (index, place) in self.places.iter().enumerate() {
            if place.name().trim().is_empty() {
                missing.push(format!("place {} name", index + 1));
            }
            if place.description().trim().is_empty() {
                missing.push(format!("place {} description", index + 1));
            }
        }
        missing
    }

    /// The record sent to the store.
    pub fn to_city(&self) -> City {
        let mut city = self.base.clone();
        city.name = Some(self.name.clone());
        city.radius = Some(self.radius.clone());
        city.places = self.places.clone();
        city
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_form_starts_with_one_place() {
        let form = CityForm::create();
        assert_eq!(form.mode(), FormMode::Create);
        assert_eq!(form.places.len(), 1);
        assert_eq!(form.places[0].id, 1);
    }

    #[test]
    fn test_place_ids_follow_max_plus_one() {
        let mut form = CityForm::create();
        assert_eq!(form.add_place(), 2);
        assert_eq!(form.add_place(), 3);
        assert!(form.remove_place(1));
        assert_eq!(form.add_place(), 4);
        assert!(form.remove_place(0));
        assert!(form.remove_place(0));
        assert!(form.remove_place(0));
        assert!(!form.remove_place(0));
        assert_eq!(form.add_place(), 1);
    }

    #[test]
    fn test_edit_form_keeps_ids_and_venues() {
        let mut city = City::new("Pune", "5 km");
        city.id = 3;
        let mut fort = Place::new(5, "Fort", "old fort");
        fort.hotels = Some(vec!["Taj".to_string()]);
        city.places.push(fort);
        city.extra.insert("state".to_string(), "MH".into());

        let mut form = CityForm::edit(&city);
        assert_eq!(form.mode(), FormMode::Edit { city_id: 3 });
        form.name = "Pune City".to_string();
        assert_eq!(form.add_place(), 6);

        let sent = form.to_city();
        assert_eq!(sent.id, 3);
        assert_eq!(sent.name(), "Pune City");
        assert_eq!(sent.places[0].id, 5);
        assert_eq!(sent.places[0].hotels, Some(vec!["Taj".to_string()]));
        assert_eq!(sent.extra.get("state"), Some(&serde_json::Value::from("MH")));
    }

    #[test]
    fn test_missing_fields() {
        let mut form = CityForm::create();
        assert_eq!(
            form.missing_fields(),
            vec!["city name", "radius", "place 1 name", "place 1 description"]
        );

        form.name = "Pune".to_string();
        form.radius = "5 km".to_string();
        assert!(form.set_place_name(0, "Fort"));
        assert!(form.set_place_description(0, "old fort"));
        assert!(!form.set_place_name(4, "Nowhere"));
        assert!(form.missing_fields().is_empty());
    }
}
