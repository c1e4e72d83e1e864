use async_trait::async_trait;
use common::model::City;
use common::{Error, Result};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

/// The three calls the store service offers.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    async fn list(&self) -> Result<Vec<City>>;

    async fn create(&self, city: &City) -> Result<City>;

    async fn update(&self, id: i64, city: &City) -> Result<City>;
}

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// `CatalogApi` over HTTP against a running store.
pub struct HttpCatalog {
    client: reqwest::Client,
    cities_url: Url,
}

impl HttpCatalog {
    pub fn new(base_url: &str) -> Result<Self> {
        let base = Url::parse(base_url)?;
        let cities_url = base.join("api/cities")?;
        let client = reqwest::Client::builder().build()?;
        Ok(Self { client, cities_url })
    }

    fn city_url(&self, id: i64) -> Result<Url> {
        Ok(self.cities_url.join(&format!("cities/{}", id))?)
    }

    /// Decodes a success body; any other status becomes `Error::Api`.
    async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            // Anything unreadable still counts as a server-side failure.
            let message = response
                .json::<ErrorBody>()
                .await
                .ok()
                .and_then(|body| body.error)
                .unwrap_or_default();
            return Err(Error::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl CatalogApi for HttpCatalog {
    async fn list(&self) -> Result<Vec<City>> {
        debug!(url = %self.cities_url, "Fetching cities");
        let response = self.client.get(self.cities_url.clone()).send().await?;
        Self::read_json(response).await
    }

    async fn create(&self, city: &City) -> Result<City> {
        debug!(url = %self.cities_url, name = city.name(), "Creating city");
        let response = self
            .client
            .post(self.cities_url.clone())
            .json(city)
            .send()
            .await?;
        Self::read_json(response).await
    }

    async fn update(&self, id: i64, city: &City) -> Result<City> {
        let url = self.city_url(id)?;
        debug!(url = %url, "Updating city");
        let response = self.client.put(url).json(city).send().await?;
        Self::read_json(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serves one canned HTTP response and returns the base URL to reach it.
    async fn canned(status_line: &str, body: &str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status_line,
            body.len(),
            body
        );
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[test]
    fn test_urls_are_joined_against_base() {
        let api = HttpCatalog::new("http://localhost:5000").unwrap();
        assert_eq!(api.cities_url.as_str(), "http://localhost:5000/api/cities");
        assert_eq!(api.city_url(3).unwrap().as_str(), "http://localhost:5000/api/cities/3");

        let nested = HttpCatalog::new("http://example.com/explore/").unwrap();
        assert_eq!(nested.cities_url.as_str(), "http://example.com/explore/api/cities");
    }

    #[test]
    fn test_bad_base_url() {
        assert!(matches!(HttpCatalog::new("not a url"), Err(Error::InvalidUri(_))));
    }

    #[tokio::test]
    async fn test_list_reports_server_error() {
        let base = canned("500 Internal Server Error", r#"{"error":"disk full"}"#).await;
        let api = HttpCatalog::new(&base).unwrap();

        let err = api.list().await.unwrap_err();
        assert!(matches!(
            err,
            Error::Api { status: 500, ref message } if message == "disk full"
        ));
    }

    #[tokio::test]
    async fn test_list_decodes_cities() {
        let base = canned("200 OK", r#"[{"id":1,"name":"Pune","radius":"5 km","places":[]}]"#).await;
        let api = HttpCatalog::new(&base).unwrap();

        let cities = api.list().await.unwrap();
        assert_eq!(cities.len(), 1);
        assert_eq!(cities[0].name(), "Pune");
    }
}
