//! HTTP client relaying validated calls to the server tier

use axum::{
    http::{header::CONTENT_TYPE, Method},
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::{api::SHARER_USER_ID, error::AppResult};

/// Forwards requests to the business-tier server and relays its answers
#[derive(Clone)]
pub struct ServerClient {
    client: reqwest::Client,
    base_url: String,
}

impl ServerClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Forward a call without a body
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        user_id: Option<i64>,
    ) -> AppResult<Response> {
        let request = self.request(method, path, user_id);
        self.relay(request, path).await
    }

    /// Forward a call with a JSON body
    pub async fn send_json<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        user_id: Option<i64>,
        body: &B,
    ) -> AppResult<Response> {
        let request = self.request(method, path, user_id).json(body);
        self.relay(request, path).await
    }

    fn request(
        &self,
        method: Method,
        path: &str,
        user_id: Option<i64>,
    ) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let request = self.client.request(method, url);
        match user_id {
            Some(id) => request.header(SHARER_USER_ID, id.to_string()),
            None => request,
        }
    }

    /// Status and body are passed through unchanged
    async fn relay(&self, request: reqwest::RequestBuilder, path: &str) -> AppResult<Response> {
        let response = request.send().await?;
        let status = response.status();
        let content_type = response.headers().get(CONTENT_TYPE).cloned();
        let body = response.bytes().await?;

        tracing::debug!(path, %status, "Relayed server response");

        let mut relayed = (status, body).into_response();
        match content_type {
            Some(value) => {
                relayed.headers_mut().insert(CONTENT_TYPE, value);
            }
            None => {
                relayed.headers_mut().remove(CONTENT_TYPE);
            }
        }
        Ok(relayed)
    }
}
