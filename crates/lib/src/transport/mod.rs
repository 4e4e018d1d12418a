//! HTTP transport for the Mentora API.
//!
//! `ApiTransport` owns the reqwest client, the API base URL, and the default
//! bearer header applied to every outbound call until changed. The session
//! machine is the only writer of that header; every other component only
//! issues requests through the generic JSON verbs.

use std::sync::RwLock;

use serde::{Serialize, de::DeserializeOwned};
use url::Url;

pub mod errors;

pub use errors::TransportError;

use crate::{
    Result,
    session::{
        AuthError,
        types::{Credentials, LoginSuccess, Principal, ProfilePatch, RegisterRequest},
    },
};

/// HTTP client for the remote Mentora API.
#[derive(Debug)]
pub struct ApiTransport {
    client: reqwest::Client,
    base_url: Url,
    /// Current bearer token; `None` when unauthenticated.
    authorization: RwLock<Option<String>>,
}

impl ApiTransport {
    /// Create a transport against the given API base URL,
    /// e.g. `http://localhost:8000/api`.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        let base_url =
            Url::parse(base_url.as_ref()).map_err(|e| TransportError::InvalidBaseUrl {
                url: base_url.as_ref().to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            client: reqwest::Client::new(),
            base_url,
            authorization: RwLock::new(None),
        })
    }

    /// Set or clear the default bearer token used by subsequent calls.
    pub fn set_authorization(&self, token: Option<&str>) {
        *self
            .authorization
            .write()
            .expect("authorization lock poisoned") = token.map(str::to_string);
    }

    /// Whether a bearer token is currently configured.
    pub fn has_authorization(&self) -> bool {
        self.authorization
            .read()
            .expect("authorization lock poisoned")
            .is_some()
    }

    fn join(&self, path: &str) -> Result<Url> {
        // Base URLs routinely lack the trailing slash; paths are absolute-ish
        // ("/auth/profile/"), so splice on the path segments directly.
        let joined = format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Url::parse(&joined).map_err(|e| {
            TransportError::InvalidBaseUrl {
                url: joined,
                reason: e.to_string(),
            }
            .into()
        })
    }

    fn apply_auth(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let token = self
            .authorization
            .read()
            .expect("authorization lock poisoned")
            .clone();
        match token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn execute(&self, request: reqwest::RequestBuilder, url: &Url) -> Result<reqwest::Response> {
        let response = request
            .send()
            .await
            .map_err(|e| TransportError::Connection {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::Status {
                status: status.as_u16(),
                url: url.to_string(),
                body,
            }
            .into());
        }

        Ok(response)
    }

    async fn decode<T: DeserializeOwned>(&self, response: reqwest::Response, url: &Url) -> Result<T> {
        response.json().await.map_err(|e| {
            TransportError::Decode {
                url: url.to_string(),
                reason: e.to_string(),
            }
            .into()
        })
    }

    // === Generic JSON verbs ===

    /// GET a JSON resource.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.join(path)?;
        let response = self
            .execute(self.apply_auth(self.client.get(url.clone())), &url)
            .await?;
        self.decode(response, &url).await
    }

    /// POST a JSON body, decoding a JSON response.
    pub async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let url = self.join(path)?;
        let response = self
            .execute(self.apply_auth(self.client.post(url.clone()).json(body)), &url)
            .await?;
        self.decode(response, &url).await
    }

    /// PATCH a JSON body, decoding a JSON response.
    pub async fn patch_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let url = self.join(path)?;
        let response = self
            .execute(self.apply_auth(self.client.patch(url.clone()).json(body)), &url)
            .await?;
        self.decode(response, &url).await
    }

    /// DELETE a resource, ignoring any response body.
    pub async fn delete(&self, path: &str) -> Result<()> {
        let url = self.join(path)?;
        self.execute(self.apply_auth(self.client.delete(url.clone())), &url)
            .await?;
        Ok(())
    }

    // === Auth endpoints ===

    /// Exchange credentials for a token pair and the classified principal.
    ///
    /// A remote rejection is surfaced as `AuthError::InvalidCredentials`
    /// carrying the server's error payload untouched: the `detail` string
    /// when present, otherwise the field-keyed validation object.
    pub async fn login(&self, credentials: &Credentials) -> Result<LoginSuccess> {
        match self.post_json("/auth/login/", credentials).await {
            Ok(success) => Ok(success),
            Err(e) => Err(Self::credential_rejection(e)),
        }
    }

    /// Create an account; the server logs the new account in atomically.
    pub async fn register(&self, request: &RegisterRequest) -> Result<LoginSuccess> {
        match self.post_json("/auth/register/", request).await {
            Ok(success) => Ok(success),
            Err(e) => Err(Self::credential_rejection(e)),
        }
    }

    /// Fetch the current principal. The bearer token must already be set.
    ///
    /// A 401/403 means the token is missing, expired, or rejected and is
    /// mapped to `AuthError::SessionExpired`.
    pub async fn fetch_principal(&self) -> Result<Principal> {
        match self.get_json("/auth/profile/").await {
            Ok(principal) => Ok(principal),
            Err(e) if e.is_session_expired() => Err(AuthError::SessionExpired.into()),
            Err(e) => Err(e),
        }
    }

    /// Partially update the profile, returning the updated principal.
    pub async fn update_profile(&self, patch: &ProfilePatch) -> Result<Principal> {
        match self.patch_json("/auth/profile/", patch).await {
            Ok(principal) => Ok(principal),
            Err(e) if e.is_session_expired() => Err(AuthError::SessionExpired.into()),
            Err(e) => Err(e),
        }
    }

    /// Trade a refresh token for a fresh access token.
    pub async fn refresh_access(&self, refresh: &str) -> Result<String> {
        #[derive(Serialize)]
        struct Body<'a> {
            refresh: &'a str,
        }
        #[derive(serde::Deserialize)]
        struct Refreshed {
            access: String,
        }

        match self
            .post_json::<_, Refreshed>("/auth/token/refresh/", &Body { refresh })
            .await
        {
            Ok(refreshed) => Ok(refreshed.access),
            Err(e) if e.is_session_expired() => Err(AuthError::SessionExpired.into()),
            Err(e) => Err(e),
        }
    }

    /// Ask the server to revoke a refresh token.
    pub async fn revoke(&self, refresh: &str) -> Result<()> {
        #[derive(Serialize)]
        struct Body<'a> {
            refresh_token: &'a str,
        }

        let url = self.join("/auth/logout/")?;
        self.execute(
            self.apply_auth(self.client.post(url.clone()).json(&Body {
                refresh_token: refresh,
            })),
            &url,
        )
        .await?;
        Ok(())
    }

    /// Map a 4xx login/register response to a credential rejection, keeping
    /// the remote payload. Other failures pass through unchanged.
    fn credential_rejection(err: crate::Error) -> crate::Error {
        let crate::Error::Transport(TransportError::Status { status, body, .. }) = &err else {
            return err;
        };
        if !(400..500).contains(status) {
            return err;
        }

        let detail = match serde_json::from_str::<serde_json::Value>(body) {
            Ok(payload) => payload
                .get("detail")
                .and_then(|d| d.as_str())
                .map(str::to_string)
                .unwrap_or_else(|| payload.to_string()),
            Err(_) => body.clone(),
        };
        AuthError::InvalidCredentials { detail }.into()
    }
}
