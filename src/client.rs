use async_trait::async_trait;
use reqwest::{Client, Response};
use serde_json::Value;
use tracing::{debug, warn};

use crate::{
    config::Config,
    data_formats::{
        validate_article, validate_paged_response, CreateArticle, ListArticlesParams,
        PagedResponse, PatchArticle,
    },
    errors::{ApiError, ClientError, ValidationError},
    models::Article,
};

/// The five remote article operations. [`ArticleClient`] is the HTTP
/// implementation; the list view model only depends on this trait.
#[async_trait]
pub trait ArticleApi: Send + Sync {
    async fn list_articles(
        &self,
        params: ListArticlesParams,
    ) -> Result<PagedResponse<Article>, ClientError>;

    async fn get_article(&self, id: i64) -> Result<Article, ClientError>;

    async fn create_article(&self, payload: &CreateArticle) -> Result<(), ClientError>;

    async fn patch_article(&self, id: i64, payload: &PatchArticle) -> Result<(), ClientError>;

    async fn delete_article(&self, id: i64) -> Result<(), ClientError>;
}

#[derive(Debug, Clone)]
pub struct ArticleClient {
    http: Client,
    base_url: String,
}

impl ArticleClient {
    pub fn new(config: &Config) -> Self {
        Self::with_client(Client::new(), config)
    }

    pub fn with_client(http: Client, config: &Config) -> Self {
        Self {
            http,
            base_url: config.backend_url().to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl ArticleApi for ArticleClient {
    async fn list_articles(
        &self,
        ListArticlesParams {
            limit,
            offset,
            published_only,
        }: ListArticlesParams,
    ) -> Result<PagedResponse<Article>, ClientError> {
        let url = self.url(&format!("/article/{}/{}", limit, offset));
        debug!(%url, published_only, "listing articles");
        let response = self
            .http
            .get(&url)
            .query(&[("published_only", published_only)])
            .send()
            .await?;
        let body = json_body(ensure_success(response).await?).await?;
        Ok(validate_paged_response(&body, validate_article)?)
    }

    async fn get_article(&self, id: i64) -> Result<Article, ClientError> {
        check_id(id)?;
        let url = self.url(&format!("/article/{}", id));
        debug!(%url, "fetching article");
        let response = self.http.get(&url).send().await?;
        let body = json_body(ensure_success(response).await?).await?;
        Ok(validate_article(&body)?)
    }

    async fn create_article(&self, payload: &CreateArticle) -> Result<(), ClientError> {
        payload.check()?;
        let url = self.url("/article");
        debug!(%url, title = %payload.title, "creating article");
        let response = self.http.post(&url).json(payload).send().await?;
        ensure_success(response).await?;
        Ok(())
    }

    async fn patch_article(&self, id: i64, payload: &PatchArticle) -> Result<(), ClientError> {
        check_id(id)?;
        payload.check()?;
        let url = self.url(&format!("/article/{}", id));
        debug!(%url, "patching article");
        let response = self.http.patch(&url).json(payload).send().await?;
        ensure_success(response).await?;
        Ok(())
    }

    async fn delete_article(&self, id: i64) -> Result<(), ClientError> {
        check_id(id)?;
        let url = self.url(&format!("/article/{}", id));
        debug!(%url, "deleting article");
        let response = self.http.delete(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!(%url, %status, "delete was not accepted");
            return Err(ApiError {
                status: status.as_u16(),
                body: None,
            }
            .into());
        }
        Ok(())
    }
}

// ----------------- Helper Functions -----------------

fn check_id(id: i64) -> Result<(), ValidationError> {
    if id < 1 {
        return Err(ValidationError::new("id", "must be a positive integer"));
    }
    Ok(())
}

async fn ensure_success(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let url = response.url().to_string();
    let text = response.text().await?;
    let body = serde_json::from_str::<Value>(&text).ok();
    warn!(%url, %status, "request failed");
    Err(ApiError {
        status: status.as_u16(),
        body,
    }
    .into())
}

async fn json_body(response: Response) -> Result<Value, ClientError> {
    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}
