//! # HTTP backend for the hosted auth + REST service
//!
//! Speaks the two public APIs of the service:
//!
//! - `/auth/v1`: `token?grant_type=password|refresh_token`, `signup`, `logout`, `user`
//! - `/rest/v1/notes`: PostgREST filters (`user_id=eq.…`, `order=created_at.desc`)
//!
//! Every request carries the project's public `apikey`. Calls made on behalf of a user
//! send the user's access token as the bearer, which is what the row-level policies key
//! on; anonymous calls send the public key instead.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::Credentials;
use crate::backend::{Backend, NOTES_TABLE};
use crate::error::BackendError;
use crate::models::{AuthSession, AuthUser, NewNote, Note, SignUpResponse, UserInfo};

const AUTH_PATH: &str = "/auth/v1";
const REST_PATH: &str = "/rest/v1";

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

/// Client for one hosted project.
#[derive(Clone, Debug)]
pub struct SupabaseBackend {
    http: reqwest::Client,
    base_url: String,
    anon_key: String,
}

impl SupabaseBackend {
    pub fn new(base_url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: reqwest::Client::new(),
            base_url,
            anon_key: anon_key.into(),
        }
    }

    fn auth_url(&self, endpoint: &str) -> String {
        format!("{}{AUTH_PATH}/{endpoint}", self.base_url)
    }

    fn rest_url(&self, table: &str) -> String {
        format!("{}{REST_PATH}/{table}", self.base_url)
    }

    fn request(&self, method: Method, url: &str, access_token: Option<&str>) -> RequestBuilder {
        self.http
            .request(method, url)
            .headers(self.headers())
            .bearer_auth(access_token.unwrap_or(&self.anon_key))
    }

    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Ok(value) = HeaderValue::from_str(&self.anon_key) {
            headers.insert("apikey", value);
        }
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers
    }
}

/// Error body shapes used by the auth and REST APIs.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    msg: Option<String>,
    message: Option<String>,
    error_description: Option<String>,
    error: Option<String>,
}

/// Build a [`BackendError`] from a failed response body.
fn api_error(status: StatusCode, body: &str) -> BackendError {
    let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
    let message = parsed
        .msg
        .or(parsed.message)
        .or(parsed.error_description)
        .or(parsed.error)
        .unwrap_or_else(|| body.trim().to_string());
    BackendError::Api {
        status: status.as_u16(),
        message,
    }
}

async fn check(response: Response) -> Result<Response, BackendError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    tracing::warn!(status = status.as_u16(), "backend request failed");
    Err(api_error(status, &body))
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, BackendError> {
    Ok(check(response).await?.json::<T>().await?)
}

#[async_trait]
impl Backend for SupabaseBackend {
    async fn get_user(&self, access_token: &str) -> Result<Option<UserInfo>, BackendError> {
        let response = self
            .request(Method::GET, &self.auth_url("user"), Some(access_token))
            .send()
            .await?;
        if matches!(
            response.status(),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN
        ) {
            return Ok(None);
        }
        let user: AuthUser = read_json(response).await?;
        Ok(Some(user.to_info()))
    }

    async fn sign_in_with_password(
        &self,
        credentials: &Credentials,
    ) -> Result<AuthSession, BackendError> {
        let response = self
            .request(Method::POST, &self.auth_url("token"), None)
            .query(&[("grant_type", "password")])
            .json(credentials)
            .send()
            .await?;
        read_json(response).await
    }

    async fn sign_up(
        &self,
        credentials: &Credentials,
        email_redirect_to: &str,
    ) -> Result<SignUpResponse, BackendError> {
        let response = self
            .request(Method::POST, &self.auth_url("signup"), None)
            .query(&[("redirect_to", email_redirect_to)])
            .json(credentials)
            .send()
            .await?;
        let body: Value = read_json(response).await?;
        SignUpResponse::from_value(body)
    }

    async fn refresh_session(&self, refresh_token: &str) -> Result<AuthSession, BackendError> {
        let response = self
            .request(Method::POST, &self.auth_url("token"), None)
            .query(&[("grant_type", "refresh_token")])
            .json(&json!({ "refresh_token": refresh_token }))
            .send()
            .await?;
        read_json(response).await
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), BackendError> {
        let response = self
            .request(Method::POST, &self.auth_url("logout"), Some(access_token))
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }

    async fn insert_note(&self, access_token: &str, note: &NewNote) -> Result<Note, BackendError> {
        let response = self
            .request(Method::POST, &self.rest_url(NOTES_TABLE), Some(access_token))
            .header("Prefer", "return=representation")
            .json(note)
            .send()
            .await?;
        let rows: Vec<Note> = read_json(response).await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| BackendError::Decode("insert returned no rows".to_string()))
    }

    async fn list_notes(&self, access_token: &str, owner: &str) -> Result<Vec<Note>, BackendError> {
        let owner_filter = format!("eq.{owner}");
        let response = self
            .request(Method::GET, &self.rest_url(NOTES_TABLE), Some(access_token))
            .query(&[
                ("select", "*"),
                ("user_id", owner_filter.as_str()),
                ("order", "created_at.desc"),
            ])
            .send()
            .await?;
        read_json(response).await
    }

    async fn get_note(&self, access_token: &str, id: &str) -> Result<Option<Note>, BackendError> {
        let id_filter = format!("eq.{id}");
        let response = self
            .request(Method::GET, &self.rest_url(NOTES_TABLE), Some(access_token))
            .query(&[("select", "*"), ("id", id_filter.as_str())])
            .send()
            .await?;
        let rows: Vec<Note> = read_json(response).await?;
        Ok(rows.into_iter().next())
    }

    async fn delete_note(&self, access_token: &str, id: &str) -> Result<(), BackendError> {
        let id_filter = format!("eq.{id}");
        let response = self
            .request(Method::DELETE, &self.rest_url(NOTES_TABLE), Some(access_token))
            .query(&[("id", id_filter.as_str())])
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }
}
