use std::time::Duration;

use async_trait::async_trait;
use mealcal_shared::{
    MealStore, RecipeCatalog, RemoteError, RemoteResult, ShoppingStore, format_date,
    mealplan::{MealRecord, MealWrite, SaveAck},
    recipe::Recipe,
    shopping::{NewShoppingItem, ShoppingItem, ShoppingItemPatch},
};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::{Deserialize, de::DeserializeOwned};
use time::Date;
use url::Url;

/// JSON client for the household API.
#[derive(Clone, Debug)]
pub struct HttpRemote {
    client: Client,
    base_url: Url,
}

#[derive(Deserialize)]
struct Created {
    id: String,
}

impl HttpRemote {
    pub fn new(base_url: &str, timeout: Duration) -> RemoteResult<Self> {
        let mut base = base_url.trim().to_owned();
        if !base.ends_with('/') {
            base.push('/');
        }

        let base_url = Url::parse(&base)
            .map_err(|e| RemoteError::network(format!("invalid base url `{base_url}`: {e}")))?;

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(map_reqwest_error)?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url(&self, path: &str) -> RemoteResult<Url> {
        self.base_url
            .join(path)
            .map_err(|e| RemoteError::network(format!("invalid path `{path}`: {e}")))
    }

    async fn send(&self, request: RequestBuilder) -> RemoteResult<reqwest::Response> {
        let response = request.send().await.map_err(map_reqwest_error)?;
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(map_status_error(status, body))
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> RemoteResult<T> {
        self.send(request)
            .await?
            .json::<T>()
            .await
            .map_err(map_reqwest_error)
    }
}

fn map_reqwest_error(err: reqwest::Error) -> RemoteError {
    if err.is_timeout() {
        RemoteError::timeout(err.to_string())
    } else if err.is_decode() {
        RemoteError::decode(err.to_string())
    } else {
        RemoteError::network(err.to_string())
    }
}

fn map_status_error(status: StatusCode, body: String) -> RemoteError {
    let detail = serde_json::from_str::<serde_json::Value>(&body)
        .unwrap_or_else(|_| serde_json::json!({ "detail": body }));

    let message = detail
        .get("detail")
        .and_then(|d| d.as_str())
        .filter(|d| !d.is_empty())
        .map(str::to_owned)
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("unexpected status")
                .to_owned()
        });

    RemoteError::server(status.as_u16(), message).with_detail(detail)
}

#[async_trait]
impl RecipeCatalog for HttpRemote {
    async fn fetch_recipes(&self, limit: usize) -> RemoteResult<Vec<Recipe>> {
        let url = self.url("recipes")?;
        tracing::debug!(%url, limit, "fetching recipes");

        self.send_json(self.client.get(url).query(&[("limit", limit)]))
            .await
    }
}

#[async_trait]
impl MealStore for HttpRemote {
    async fn fetch_meals(&self, start: Date, end: Date) -> RemoteResult<Vec<MealRecord>> {
        let url = self.url("meals")?;
        tracing::debug!(%url, %start, %end, "fetching meals");

        self.send_json(self.client.get(url).query(&[
            ("start_date", format_date(start)),
            ("end_date", format_date(end)),
        ]))
        .await
    }

    async fn save_meals(&self, meals: Vec<MealWrite>) -> RemoteResult<SaveAck> {
        let url = self.url("meals")?;
        tracing::debug!(%url, count = meals.len(), "saving meals");

        self.send_json(self.client.post(url).json(&meals)).await
    }
}

#[async_trait]
impl ShoppingStore for HttpRemote {
    async fn fetch_shopping_list(&self, month: &str) -> RemoteResult<Vec<ShoppingItem>> {
        let url = self.url("shopping-list")?;

        self.send_json(self.client.get(url).query(&[("month", month)]))
            .await
    }

    async fn add_shopping_item(&self, item: &NewShoppingItem) -> RemoteResult<ShoppingItem> {
        let url = self.url("shopping-list")?;
        let created: Created = self.send_json(self.client.post(url).json(item)).await?;

        Ok(item.clone().into_item(created.id))
    }

    async fn update_shopping_item(
        &self,
        id: &str,
        patch: &ShoppingItemPatch,
    ) -> RemoteResult<()> {
        let url = self.url(&format!("shopping-list/{id}"))?;
        self.send(self.client.patch(url).json(patch)).await?;

        Ok(())
    }

    async fn delete_shopping_item(&self, id: &str) -> RemoteResult<()> {
        let url = self.url(&format!("shopping-list/{id}"))?;
        self.send(self.client.delete(url)).await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_keeps_path_prefix() {
        let remote = HttpRemote::new("http://localhost:8000/api", Duration::from_secs(5)).unwrap();

        assert_eq!(
            remote.url("meals").unwrap().as_str(),
            "http://localhost:8000/api/meals"
        );
        assert_eq!(
            remote.url("shopping-list/abc").unwrap().as_str(),
            "http://localhost:8000/api/shopping-list/abc"
        );
    }

    #[test]
    fn test_status_error_detail() {
        let err = map_status_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            r#"{"detail":"firestore unavailable"}"#.to_owned(),
        );

        assert_eq!(err.status(), Some(500));
        assert_eq!(err.message, "firestore unavailable");

        let err = map_status_error(StatusCode::BAD_GATEWAY, "<html>".to_owned());
        assert_eq!(err.message, "<html>");
        assert_eq!(err.detail, Some(serde_json::json!({"detail": "<html>"})));
    }
}
