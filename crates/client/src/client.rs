//! REST client for the agent-facing portal endpoints.

use serde::de::DeserializeOwned;
use serde_json::json;
use shootdesk_core::types::DbId;
use tokio::sync::RwLock;

use crate::error::ClientError;
use crate::types::{
    AuthSession, ChatMessage, Envelope, ErrorBody, NewMessage, OrderSummary, OrderTimeline,
};

/// HTTP client for one portal deployment.
///
/// Holds the access token from the last successful [`login`](Self::login)
/// and sends it on every authenticated call. Shareable behind an `Arc`.
pub struct PortalClient {
    client: reqwest::Client,
    base_url: String,
    token: RwLock<Option<String>>,
}

impl PortalClient {
    /// * `base_url` - Server root, e.g. `http://localhost:3000`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Reuse an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: RwLock::new(None),
        }
    }

    /// Use an access token obtained elsewhere.
    pub async fn set_token(&self, token: impl Into<String>) {
        *self.token.write().await = Some(token.into());
    }

    /// `POST /auth/login`. Stores the access token on success.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthSession, ClientError> {
        let response = self
            .client
            .post(self.url("/auth/login"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;

        let session: AuthSession = Self::parse_response(response).await?;
        self.set_token(session.access_token.clone()).await;
        tracing::debug!(user_id = session.user.id, "Signed in");
        Ok(session)
    }

    /// `GET /orders`, newest first.
    pub async fn orders(&self) -> Result<Vec<OrderSummary>, ClientError> {
        self.get_data("/orders").await
    }

    /// `GET /orders/{id}/timeline`.
    pub async fn order_timeline(&self, order_id: DbId) -> Result<OrderTimeline, ClientError> {
        self.get_data(&format!("/orders/{order_id}/timeline")).await
    }

    /// `GET /messages`, oldest first. Pass the last seen id as `after_id`
    /// to fetch only newer messages.
    pub async fn messages(
        &self,
        order_id: Option<DbId>,
        after_id: Option<DbId>,
    ) -> Result<Vec<ChatMessage>, ClientError> {
        let mut query: Vec<(&str, DbId)> = Vec::new();
        if let Some(id) = order_id {
            query.push(("order_id", id));
        }
        if let Some(id) = after_id {
            query.push(("after_id", id));
        }

        let request = self.client.get(self.url("/messages")).query(&query);
        let response = self.authorize(request).await?.send().await?;
        let envelope: Envelope<Vec<ChatMessage>> = Self::parse_response(response).await?;
        Ok(envelope.data)
    }

    /// `POST /messages`.
    pub async fn send_message(
        &self,
        content: &str,
        order_id: Option<DbId>,
    ) -> Result<ChatMessage, ClientError> {
        let request = self
            .client
            .post(self.url("/messages"))
            .json(&NewMessage { content, order_id });
        let response = self.authorize(request).await?.send().await?;
        let envelope: Envelope<ChatMessage> = Self::parse_response(response).await?;
        Ok(envelope.data)
    }

    // ---- private helpers ----

    fn url(&self, path: &str) -> String {
        format!("{}/api/v1{path}", self.base_url)
    }

    async fn authorize(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::RequestBuilder, ClientError> {
        let token = self.token.read().await;
        let token = token.as_deref().ok_or(ClientError::NotAuthenticated)?;
        Ok(request.bearer_auth(token))
    }

    async fn get_data<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let request = self.client.get(self.url(path));
        let response = self.authorize(request).await?.send().await?;
        let envelope: Envelope<T> = Self::parse_response(response).await?;
        Ok(envelope.data)
    }

    /// Map a non-2xx response to [`ClientError::Api`], using the JSON
    /// error body when there is one.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        Err(api_error(status.as_u16(), &body))
    }

    async fn parse_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }
}

fn api_error(status: u16, body: &str) -> ClientError {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => ClientError::Api {
            status,
            code: parsed.code,
            message: parsed.error,
        },
        Err(_) => ClientError::Api {
            status,
            code: None,
            message: body.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn api_error_uses_json_body() {
        let err = api_error(404, r#"{"error":"Order with id 9 not found","code":"NOT_FOUND"}"#);
        assert_matches!(
            err,
            ClientError::Api { status: 404, code: Some(ref c), ref message }
                if c == "NOT_FOUND" && message == "Order with id 9 not found"
        );
    }

    #[test]
    fn api_error_falls_back_to_raw_body() {
        let err = api_error(502, "Bad Gateway");
        assert_matches!(err, ClientError::Api { status: 502, code: None, ref message } if message == "Bad Gateway");
        assert_eq!(err.status(), Some(502));
    }

    #[test]
    fn urls_are_rooted_at_api_v1() {
        let client = PortalClient::new("http://localhost:3000/");
        assert_eq!(client.url("/orders"), "http://localhost:3000/api/v1/orders");
    }

    #[tokio::test]
    async fn authenticated_calls_need_a_token() {
        let client = PortalClient::new("http://127.0.0.1:1");
        assert_matches!(client.orders().await, Err(ClientError::NotAuthenticated));
        assert_matches!(
            client.send_message("hi", None).await,
            Err(ClientError::NotAuthenticated)
        );
    }
}
