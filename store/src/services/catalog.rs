use crate::storage::Document;
use common::model::{City, Place, next_id};
use common::{Error, Result};
use serde_json::{Map, Value};
use tokio::sync::Mutex;
use tracing::{info, warn};

/// Owns the authoritative city collection and its persisted mirror.
///
/// One mutex covers both the in-memory mutation and the document rewrite, so
/// two creates can never compute the same id and writes reach the document in
/// the order they were applied. Updates are still last-writer-wins.
///
/// A failed document write does not undo the in-memory change: the list keeps
/// serving the new state while the document lags until the next good write.
pub struct CatalogService {
    cities: Mutex<Vec<City>>,
    document: Document,
}

impl CatalogService {
    pub fn new(document: Document, cities: Vec<City>) -> Self {
        Self {
            cities: Mutex::new(cities),
            document,
        }
    }

    /// Builds the service from whatever the document currently holds.
    pub async fn open(document: Document) -> Self {
        let cities = document.load_or_empty().await;
        Self::new(document, cities)
    }

    pub async fn list(&self) -> Vec<City> {
        self.cities.lock().await.clone()
    }

    pub async fn create(&self, payload: Value) -> Result<City> {
        let mut cities = self.cities.lock().await;

        let id = next_id(cities.iter().map(|c| c.id));
        let city = normalize_new_city(id, payload)?;

        cities.push(city.clone());
        info!(id, name = city.name(), places = city.places.len(), "Created city");

        self.persist(&cities).await?;
        Ok(city)
    }

    /// Replaces the city wholesale. Whatever `id` the payload carries is
    /// dropped; the stored record always keeps `id`.
    pub async fn update(&self, id: i64, payload: Value) -> Result<City> {
        let mut cities = self.cities.lock().await;

        let slot = cities
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| Error::NotFound(id.to_string()))?;

        let mut fields = object_fields(payload);
        fields.remove("id");
        let mut city = parse_city(fields)?;
        city.id = id;

        *slot = city.clone();
        info!(id, name = city.name(), places = city.places.len(), "Updated city");

        self.persist(&cities).await?;
        Ok(city)
    }

    async fn persist(&self, cities: &[City]) -> Result<()> {
        if let Err(e) = self.document.save(cities).await {
            warn!(error = %e, "City document is now behind the in-memory collection");
            return Err(e);
        }
        Ok(())
    }
}

/// Turns a create payload into a stored city: fresh id, places renumbered
/// from 1 and stripped down to name and description.
fn normalize_new_city(id: i64, payload: Value) -> Result<City> {
    let mut fields = object_fields(payload);

    let places = match fields.remove("places") {
        Some(Value::Array(items)) => items
            .iter()
            .enumerate()
            .map(|(index, item)| new_place(index as i64 + 1, item))
            .collect::<Result<Vec<_>>>()?,
        _ => Vec::new(),
    };

    fields.remove("id");
    let mut city = parse_city(fields)?;
    city.id = id;
    city.places = places;
    Ok(city)
}

/// Non-object payloads count as an empty object.
fn object_fields(payload: Value) -> Map<String, Value> {
    match payload {
        Value::Object(fields) => fields,
        _ => Map::new(),
    }
}

fn parse_city(fields: Map<String, Value>) -> Result<City> {
    serde_json::from_value(Value::Object(fields))
        .map_err(|e| Error::InvalidInput(format!("Malformed city: {}", e)))
}

fn new_place(id: i64, item: &Value) -> Result<Place> {
    let text = |key: &str| -> Result<Option<String>> {
        match item.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(other) => Err(Error::InvalidInput(format!(
                "Place {} has a non-string {}: {}",
                id, key, other
            ))),
        }
    };

    Ok(Place {
        id,
        name: text("name")?,
        description: text("description")?,
        restaurants: None,
        hotels: None,
        extra: Map::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;

    fn service_in(dir: &tempfile::TempDir, cities: Vec<City>) -> CatalogService {
        CatalogService::new(Document::new(dir.path().join("cities.json")), cities)
    }

    fn city(id: i64, name: &str) -> City {
        let mut city = City::new(name, "5 km");
        city.id = id;
        city
    }

    #[tokio::test]
    async fn test_create_into_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let service = service_in(&dir, Vec::new());

        let created = service
            .create(json!({
                "name": "Pune",
                "radius": "5 km",
                "places": [{ "name": "Fort", "description": "old fort" }]
            }))
            .await
            .unwrap();

        assert_eq!(
            serde_json::to_value(&created).unwrap(),
            json!({
                "id": 1,
                "name": "Pune",
                "radius": "5 km",
                "places": [{ "id": 1, "name": "Fort", "description": "old fort" }]
            })
        );
    }

    #[tokio::test]
    async fn test_create_uses_max_plus_one() {
        let dir = tempfile::tempdir().unwrap();
        let service = service_in(&dir, vec![city(3, "Pune"), city(1, "Goa")]);

        let created = service.create(json!({ "id": 1, "name": "Delhi" })).await.unwrap();
        assert_eq!(created.id, 4);

        let next = service.create(json!({ "name": "Agra" })).await.unwrap();
        assert_eq!(next.id, 5);
    }

    #[tokio::test]
    async fn test_create_renumbers_and_strips_places() {
        let dir = tempfile::tempdir().unwrap();
        let service = service_in(&dir, Vec::new());

        let created = service
            .create(json!({
                "name": "Jaipur",
                "places": [
                    { "id": 9, "name": "Amber", "description": "fort", "restaurants": ["1135 AD"] },
                    { "id": 4, "name": "Hawa Mahal", "description": "palace", "hotels": ["Rambagh"], "rating": 5 }
                ]
            }))
            .await
            .unwrap();

        let ids: Vec<i64> = created.places.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(created.places[0].name(), "Amber");
        assert_eq!(created.places[1].name(), "Hawa Mahal");
        assert!(created.places.iter().all(|p| p.restaurants.is_none() && p.hotels.is_none()));
        assert!(created.places[1].extra.is_empty());
    }

    #[tokio::test]
    async fn test_create_without_place_array_gets_no_places() {
        let dir = tempfile::tempdir().unwrap();
        let service = service_in(&dir, Vec::new());

        let missing = service.create(json!({ "name": "Goa" })).await.unwrap();
        assert!(missing.places.is_empty());

        let not_array = service
            .create(json!({ "name": "Agra", "places": "Taj Mahal" }))
            .await
            .unwrap();
        assert!(not_array.places.is_empty());
    }

    #[tokio::test]
    async fn test_create_persists_document() {
        let dir = tempfile::tempdir().unwrap();
        let service = service_in(&dir, Vec::new());

        service.create(json!({ "name": "Pune", "radius": "5 km" })).await.unwrap();

        let reopened = CatalogService::open(Document::new(dir.path().join("cities.json"))).await;
        let cities = reopened.list().await;
        assert_eq!(cities.len(), 1);
        assert_eq!(cities[0].name(), "Pune");
    }

    #[tokio::test]
    async fn test_update_forces_path_id() {
        let dir = tempfile::tempdir().unwrap();
        let service = service_in(&dir, vec![city(3, "Pune")]);

        let updated = service
            .update(3, json!({ "id": 999, "name": "Pune City", "radius": "5 km", "places": [] }))
            .await
            .unwrap();

        assert_eq!(updated.id, 3);
        assert_eq!(updated.name(), "Pune City");
        assert_eq!(service.list().await, vec![updated]);
    }

    #[tokio::test]
    async fn test_update_ignores_body_id_of_any_type() {
        let dir = tempfile::tempdir().unwrap();
        let service = service_in(&dir, vec![city(3, "Pune")]);

        for body_id in [json!("999"), json!(null), json!(3.0), json!({ "n": 1 })] {
            let updated = service
                .update(3, json!({ "id": body_id, "name": "Pune City" }))
                .await
                .unwrap();
            assert_eq!(updated.id, 3);
        }
        assert_eq!(service.list().await.len(), 1);
    }

    #[tokio::test]
    async fn test_update_replaces_whole_record() {
        let dir = tempfile::tempdir().unwrap();
        let mut before = city(1, "Pune");
        before.places.push(Place::new(1, "Fort", "old fort"));
        let service = service_in(&dir, vec![before]);

        let updated = service.update(1, json!({ "name": "Poona" })).await.unwrap();

        assert_eq!(updated.radius, None);
        assert!(updated.places.is_empty());
    }

    #[tokio::test]
    async fn test_update_keeps_place_ids_and_venues() {
        let dir = tempfile::tempdir().unwrap();
        let service = service_in(&dir, vec![city(1, "Pune")]);

        let payload = json!({
            "name": "Pune",
            "places": [{ "id": 7, "name": "Fort", "description": "old", "hotels": ["Taj"] }]
        });
        let updated = service.update(1, payload).await.unwrap();

        assert_eq!(updated.places[0].id, 7);
        assert_eq!(updated.places[0].hotels, Some(vec!["Taj".to_string()]));
    }

    #[tokio::test]
    async fn test_update_unknown_id_leaves_collection() {
        let dir = tempfile::tempdir().unwrap();
        let service = service_in(&dir, vec![city(3, "Pune")]);

        let err = service.update(42, json!({ "name": "Nowhere" })).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(ref id) if id == "42"));

        // The id is looked up before the body is read.
        let err = service.update(42, json!({ "name": 12 })).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));

        assert_eq!(service.list().await, vec![city(3, "Pune")]);
        assert!(!dir.path().join("cities.json").exists());
    }

    #[tokio::test]
    async fn test_failed_persist_keeps_memory_change() {
        let dir = tempfile::tempdir().unwrap();
        let document = Document::new(dir.path().join("gone").join("cities.json"));
        let service = CatalogService::new(document, vec![city(1, "Pune")]);

        let err = service.create(json!({ "name": "Goa" })).await.unwrap_err();
        assert!(matches!(err, Error::Persistence(_)));
        assert_eq!(service.list().await.len(), 2);

        let err = service.update(1, json!({ "name": "Poona" })).await.unwrap_err();
        assert!(matches!(err, Error::Persistence(_)));
        assert_eq!(service.list().await[0].name(), "Poona");
    }

    #[tokio::test]
    async fn test_wrong_typed_field_is_rejected_without_change() {
        let dir = tempfile::tempdir().unwrap();
        let service = service_in(&dir, Vec::new());

        let err = service.create(json!({ "name": 5 })).await.unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));

        let err = service.update(1, json!({ "radius": 5 })).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));

        let err = service
            .create(json!({ "name": "Goa", "places": [{ "name": ["x"] }] }))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
        assert!(service.list().await.is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_creates_get_distinct_ids() {
        let dir = tempfile::tempdir().unwrap();
        let service = Arc::new(service_in(&dir, Vec::new()));

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let service = Arc::clone(&service);
                tokio::spawn(async move { service.create(json!({ "name": format!("City {}", i) })).await })
            })
            .collect();

        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap().unwrap().id);
        }
        ids.sort();
        assert_eq!(ids, (1..=8).collect::<Vec<i64>>());
    }

    #[tokio::test]
    async fn test_list_reflects_write_history() {
        let dir = tempfile::tempdir().unwrap();
        let service = service_in(&dir, vec![city(2, "Pune")]);

        service.create(json!({ "name": "Goa" })).await.unwrap();
        service.update(2, json!({ "name": "Poona" })).await.unwrap();
        let _ = service.update(9, json!({ "name": "Ghost" })).await;

        let names: Vec<(i64, String)> = service
            .list()
            .await
            .iter()
            .map(|c| (c.id, c.name().to_string()))
            .collect();
        assert_eq!(names, vec![(2, "Poona".to_string()), (3, "Goa".to_string())]);
    }
}
