use async_trait::async_trait;
use reqwest::{header, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{debug, error};

use super::*;
use crate::config::Env;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The backend answered with a non-success status. The response body is
    /// kept as the error payload.
    #[error("{method} {url} failed with {status}")]
    Status {
        method: Method,
        url: String,
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// The comment backend.
#[async_trait]
pub trait CommentApi: Send + Sync {
    /// The full code text.
    async fn code(&self) -> Result<String, ApiError>;

    /// Every server comment.
    async fn comments(&self) -> Result<Vec<Comment>, ApiError>;

    /// A single server comment.
    async fn comment(&self, id: i64) -> Result<Comment, ApiError>;

    /// Create a comment. The backend assigns its id and creation time.
    async fn create(&self, line: usize, text: &CommentText) -> Result<Comment, ApiError>;

    async fn update_is_liked(&self, id: i64, is_liked: bool) -> Result<(), ApiError>;

    async fn remove(&self, id: i64) -> Result<(), ApiError>;
}

#[derive(Deserialize)]
struct CodeBody {
    code: String,
}

#[derive(Deserialize)]
struct CommentsBody {
    #[serde(default)]
    comments: Option<Vec<Comment>>,
}

#[derive(Deserialize)]
struct CommentBody {
    comment: Comment,
}

/// [`CommentApi`] over HTTP.
#[derive(Clone)]
pub struct HttpApi {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HttpApi {
    pub fn new(env: &Env) -> Self {
        HttpApi {
            client: reqwest::Client::new(),
            base_url: env.base_url.trim_end_matches('/').to_owned(),
            api_key: env.api_key.clone(),
        }
    }

    fn url(&self, route: &str) -> String {
        format!("{}{route}", self.base_url)
    }

    fn request(&self, method: Method, route: &str) -> RequestBuilder {
        self.client
            .request(method, self.url(route))
            .header(header::CONTENT_TYPE, "application/json")
            .header("key", &self.api_key)
    }

    async fn send(
        &self,
        method: Method,
        route: &str,
        request: RequestBuilder,
    ) -> Result<Response, ApiError> {
        debug!(%method, route, "calling comment backend");
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let url = response.url().to_string();
        let body = response.text().await.unwrap_or_default();
        error!(%method, %url, %status, "comment backend returned an error");
        Err(ApiError::Status {
            method,
            url,
            status,
            body,
        })
    }

    async fn get<T: DeserializeOwned>(&self, route: &str) -> Result<T, ApiError> {
        let request = self.request(Method::GET, route);
        let response = self.send(Method::GET, route, request).await?;
        Ok(response.json().await?)
    }
}

#[async_trait]
impl CommentApi for HttpApi {
    async fn code(&self) -> Result<String, ApiError> {
        let body: CodeBody = self.get("/code").await?;
        Ok(body.code)
    }

    async fn comments(&self) -> Result<Vec<Comment>, ApiError> {
        let body: CommentsBody = self.get("/comments").await?;
        Ok(body.comments.unwrap_or_default())
    }

    async fn comment(&self, id: i64) -> Result<Comment, ApiError> {
        let body: CommentBody = self.get(&format!("/comments/{id}")).await?;
        Ok(body.comment)
    }

    async fn create(&self, line: usize, text: &CommentText) -> Result<Comment, ApiError> {
        let request = self
            .request(Method::POST, "/create")
            .json(&json!({ "line": line, "text": text.as_str() }));
        let response = self.send(Method::POST, "/create", request).await?;
        let body: CommentBody = response.json().await?;
        Ok(body.comment)
    }

    async fn update_is_liked(&self, id: i64, is_liked: bool) -> Result<(), ApiError> {
        let route = format!("/update-is-liked/{id}");
        let request = self
            .request(Method::PUT, &route)
            .json(&json!({ "isLiked": is_liked }));
        self.send(Method::PUT, &route, request).await?;
        Ok(())
    }

    async fn remove(&self, id: i64) -> Result<(), ApiError> {
        let route = format!("/remove/{id}");
        let request = self.request(Method::DELETE, &route);
        self.send(Method::DELETE, &route, request).await?;
        Ok(())
    }
}
