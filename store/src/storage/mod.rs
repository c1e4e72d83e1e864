use common::model::City;
use common::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

/// The single JSON document mirroring the in-memory collection.
///
/// Every save rewrites the whole file; nothing is appended or patched.
#[derive(Debug, Clone)]
pub struct Document {
    path: PathBuf,
}

impl Document {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads and parses the document.
    pub async fn load(&self) -> Result<Vec<City>> {
        let data = tokio::fs::read_to_string(&self.path).await?;
        let cities: Vec<City> = serde_json::from_str(&data)?;
        debug!(path = %self.path.display(), count = cities.len(), "Loaded city document");
        Ok(cities)
    }

    /// Loads the document, starting from an empty collection if it is missing
    /// or cannot be parsed.
    pub async fn load_or_empty(&self) -> Vec<City> {
        match self.load().await {
            Ok(cities) => {
                info!(path = %self.path.display(), count = cities.len(), "Loaded cities");
                cities
            }
            Err(e) => {
                error!(path = %self.path.display(), error = %e, "Failed to load cities, starting empty");
                Vec::new()
            }
        }
    }

    /// Serializes the full collection (pretty-printed) over the document.
    pub async fn save(&self, cities: &[City]) -> Result<()> {
        let body = serde_json::to_string_pretty(cities)
            .map_err(|e| Error::Persistence(format!("Cannot serialize cities: {}", e)))?;

        tokio::fs::write(&self.path, body).await.map_err(|e| {
            Error::Persistence(format!("Cannot write '{}': {}", self.path.display(), e))
        })?;

        debug!(path = %self.path.display(), count = cities.len(), "Saved city document");
        Ok(())
    }
}
