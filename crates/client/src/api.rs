//! HTTP access to the PDV backend.
//!
//! Every request goes through [`PdvClient::execute`], which plays the role
//! of the request/response interceptors: the bearer token is attached when
//! the session holds one, and any `401` ends the session globally.

use reqwest::header::AUTHORIZATION;
use reqwest::{IntoUrl, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;

use pdv_auth::{AuthData, Credentials, server_message};

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult, GENERIC_LOGIN_FAILURE};
use crate::guard::{SharedGuard, lock};
use crate::types::Product;

#[derive(Debug, Clone)]
pub struct PdvClient {
    http: reqwest::Client,
    config: ClientConfig,
    guard: SharedGuard,
}

impl PdvClient {
    pub fn new(config: ClientConfig, guard: SharedGuard) -> ClientResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self { http, config, guard })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn guard(&self) -> &SharedGuard {
        &self.guard
    }

    /// Authenticate, store the session and redirect by role.
    ///
    /// The session is only touched once the response has arrived, so no
    /// caller can observe a half-updated session while this is pending.
    pub async fn login(&self, credentials: Credentials) -> ClientResult<AuthData> {
        let credentials = credentials.validate()?;
        tracing::info!(login = %credentials.login, url = %self.config.auth_url(), "logging in");

        let response = self
            .execute(self.http.post(self.config.auth_url()).json(&credentials))
            .await
            .map_err(login_failure)?;
        let status = response.status();
        let body = read_json_lenient(response).await.map_err(login_failure)?;

        if !status.is_success() {
            let message = server_message(&body).unwrap_or_else(|| GENERIC_LOGIN_FAILURE.to_string());
            tracing::warn!(status = status.as_u16(), %message, "login rejected");
            return Err(ClientError::Auth(message));
        }

        let auth = AuthData::from_response(&body)?;
        lock(&self.guard).establish(auth.clone())?;
        Ok(auth)
    }

    pub fn logout(&self) {
        lock(&self.guard).logout();
    }

    /// Start a request against the backend; finish it with [`PdvClient::send`].
    pub fn request(&self, method: Method, url: impl IntoUrl) -> RequestBuilder {
        self.http.request(method, url)
    }

    /// Send through the interceptors and turn non-success statuses into errors.
    pub async fn send(&self, request: RequestBuilder) -> ClientResult<Response> {
        let response = self.execute(request).await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            return Err(ClientError::Unauthorized);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Http {
                status: status.as_u16(),
                message: error_message(status, &body),
            });
        }

        Ok(response)
    }

    async fn execute(&self, request: RequestBuilder) -> ClientResult<Response> {
        let header = lock(&self.guard).authorization_header();
        let request = match header {
            Some(value) => request.header(AUTHORIZATION, value),
            None => request,
        };

        let response = request.send().await.map_err(|err| {
            tracing::error!(error = %err, "request failed");
            ClientError::from(err)
        })?;

        if response.status() == StatusCode::UNAUTHORIZED {
            tracing::warn!(url = %response.url(), "received 401");
            lock(&self.guard).handle_unauthorized();
        }

        Ok(response)
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> ClientResult<T> {
        let response = self.send(request).await?;
        response
            .json::<T>()
            .await
            .map_err(|err| ClientError::Decode(err.to_string()))
    }

    pub async fn list_products(&self) -> ClientResult<Vec<Product>> {
        self.send_json(self.request(Method::GET, self.config.products_url()))
            .await
    }

    pub async fn get_product(&self, id: i64) -> ClientResult<Product> {
        self.send_json(self.request(Method::GET, self.config.product_url(id)))
            .await
    }

    pub async fn create_product(&self, product: &Product) -> ClientResult<Product> {
        product.validate()?;
        let created: Product = self
            .send_json(self.request(Method::POST, self.config.products_url()).json(product))
            .await?;
        tracing::info!(id = ?created.id, nome = %created.nome, "product created");
        Ok(created)
    }

    pub async fn update_product(&self, id: i64, product: &Product) -> ClientResult<Product> {
        product.validate()?;
        let updated: Product = self
            .send_json(self.request(Method::PUT, self.config.product_url(id)).json(product))
            .await?;
        tracing::info!(id, "product updated");
        Ok(updated)
    }

    pub async fn delete_product(&self, id: i64) -> ClientResult<()> {
        self.send(self.request(Method::DELETE, self.config.product_url(id)))
            .await?;
        tracing::info!(id, "product deleted");
        Ok(())
    }
}

/// A login that never got a usable response fails like a rejected one.
fn login_failure(err: ClientError) -> ClientError {
    match err {
        ClientError::Network(err) => {
            tracing::warn!(error = %err, "login request did not complete");
            ClientError::Auth(GENERIC_LOGIN_FAILURE.to_string())
        }
        other => other,
    }
}

/// Body as JSON, `Null` when empty or not JSON.
async fn read_json_lenient(response: Response) -> ClientResult<Value> {
    let text = response.text().await?;
    Ok(serde_json::from_str(&text).unwrap_or(Value::Null))
}

fn error_message(status: StatusCode, body: &str) -> String {
    if let Some(message) = serde_json::from_str::<Value>(body)
        .ok()
        .as_ref()
        .and_then(server_message)
    {
        return message;
    }

    let body = body.trim();
    if body.is_empty() {
        status.canonical_reason().unwrap_or("request failed").to_string()
    } else {
        body.to_string()
    }
}
