//! Client for the hosted auth provider's REST API (`/auth/v1`).
//!
//! User-scoped calls carry the anon key; admin calls carry the service key in
//! both `apikey` and `Authorization`.

use std::sync::Arc;

use anyhow::anyhow;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::json;
use url::Url;
use uuid::Uuid;

use crate::domain::repository::{SessionPort, UserPort};
use crate::domain::types::{Account, RecoveryToken, SessionTokens, normalize_email};
use crate::error::AuthServiceError;

/// Page size for the admin user search. A page shorter than this is the last.
const USER_SEARCH_PAGE_SIZE: u32 = 50;

#[derive(Clone)]
pub struct BackendAuthClient {
    http: Client,
    base_url: Url,
    anon_key: Arc<str>,
    service_key: Arc<str>,
}

#[derive(Deserialize)]
struct UserList {
    #[serde(default)]
    users: Vec<ProviderUser>,
}

#[derive(Deserialize)]
struct ProviderUser {
    id: Uuid,
    email: Option<String>,
}

#[derive(Deserialize)]
struct GeneratedLink {
    action_link: String,
    hashed_token: String,
}

#[derive(Deserialize)]
struct ProviderSession {
    access_token: String,
    refresh_token: String,
    expires_in: u64,
    #[serde(default = "default_token_type")]
    token_type: String,
}

fn default_token_type() -> String {
    "bearer".to_owned()
}

impl From<ProviderSession> for SessionTokens {
    fn from(s: ProviderSession) -> Self {
        Self {
            access_token: s.access_token,
            refresh_token: s.refresh_token,
            expires_in: s.expires_in,
            token_type: s.token_type,
        }
    }
}

fn transport(context: &'static str) -> impl FnOnce(reqwest::Error) -> AuthServiceError {
    move |e| AuthServiceError::Upstream(anyhow::Error::new(e).context(context))
}

async fn unexpected_status(context: &'static str, resp: Response) -> AuthServiceError {
    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();
    AuthServiceError::Upstream(anyhow!("{context}: HTTP {status}: {body}"))
}

impl BackendAuthClient {
    /// `base_url` must end with `/` so endpoint paths join beneath it.
    pub fn new(
        base_url: Url,
        anon_key: impl Into<Arc<str>>,
        service_key: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            http: Client::new(),
            base_url,
            anon_key: anon_key.into(),
            service_key: service_key.into(),
        }
    }

    fn endpoint(&self, path: &str) -> Result<Url, AuthServiceError> {
        self.base_url
            .join(path)
            .map_err(|e| AuthServiceError::Internal(anyhow::Error::new(e).context("build auth url")))
    }

    fn admin(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("apikey", &*self.service_key)
            .bearer_auth(&*self.service_key)
    }

    fn public(&self, builder: RequestBuilder) -> RequestBuilder {
        builder.header("apikey", &*self.anon_key)
    }

    async fn search_users(
        &self,
        filter: &str,
        page: u32,
    ) -> Result<Vec<ProviderUser>, AuthServiceError> {
        let mut url = self.endpoint("auth/v1/admin/users")?;
        url.query_pairs_mut()
            .append_pair("filter", filter)
            .append_pair("page", &page.to_string())
            .append_pair("per_page", &USER_SEARCH_PAGE_SIZE.to_string());

        let resp = self
            .admin(self.http.get(url))
            .send()
            .await
            .map_err(transport("list users"))?;
        if !resp.status().is_success() {
            return Err(unexpected_status("list users", resp).await);
        }
        let list: UserList = resp.json().await.map_err(transport("decode user list"))?;
        Ok(list.users)
    }
}

impl UserPort for BackendAuthClient {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, AuthServiceError> {
        // The provider filter is a substring match; require an exact address
        // and keep paging until it turns up or the results run out.
        let wanted = normalize_email(email);
        let mut page = 1;
        loop {
            let users = self.search_users(email, page).await?;
            let last_page = users.len() < USER_SEARCH_PAGE_SIZE as usize;
            let found = users.into_iter().find_map(|u| {
                let address = normalize_email(u.email.as_deref()?);
                (address == wanted).then_some(Account {
                    id: u.id,
                    email: address,
                })
            });
            if found.is_some() || last_page {
                return Ok(found);
            }
            page += 1;
        }
    }
}

impl SessionPort for BackendAuthClient {
    async fn generate_recovery_token(
        &self,
        email: &str,
        redirect_to: Option<&str>,
    ) -> Result<RecoveryToken, AuthServiceError> {
        let mut body = json!({ "type": "recovery", "email": email });
        if let Some(redirect_to) = redirect_to {
            body["redirect_to"] = json!(redirect_to);
        }
        let resp = self
            .admin(self.http.post(self.endpoint("auth/v1/admin/generate_link")?))
            .json(&body)
            .send()
            .await
            .map_err(transport("generate recovery link"))?;
        if !resp.status().is_success() {
            return Err(unexpected_status("generate recovery link", resp).await);
        }
        let link: GeneratedLink = resp
            .json()
            .await
            .map_err(transport("decode recovery link"))?;
        Ok(RecoveryToken {
            action_link: link.action_link,
            hashed_token: link.hashed_token,
        })
    }

    async fn exchange_recovery_token(
        &self,
        token_hash: &str,
    ) -> Result<SessionTokens, AuthServiceError> {
        let resp = self
            .public(self.http.post(self.endpoint("auth/v1/verify")?))
            .json(&json!({ "type": "recovery", "token_hash": token_hash }))
            .send()
            .await
            .map_err(transport("verify recovery token"))?;
        if !resp.status().is_success() {
            return Err(unexpected_status("verify recovery token", resp).await);
        }
        let session: ProviderSession = resp.json().await.map_err(transport("decode session"))?;
        Ok(session.into())
    }

    async fn refresh_session(&self, refresh_token: &str) -> Result<SessionTokens, AuthServiceError> {
        let mut url = self.endpoint("auth/v1/token")?;
        url.query_pairs_mut()
            .append_pair("grant_type", "refresh_token");
        let resp = self
            .public(self.http.post(url))
            .json(&json!({ "refresh_token": refresh_token }))
            .send()
            .await
            .map_err(transport("refresh session"))?;
        match resp.status() {
            s if s.is_success() => {
                let session: ProviderSession =
                    resp.json().await.map_err(transport("decode session"))?;
                Ok(session.into())
            }
            s if s.is_client_error() => Err(AuthServiceError::InvalidRefreshToken),
            _ => Err(unexpected_status("refresh session", resp).await),
        }
    }

    async fn update_password(
        &self,
        access_token: &str,
        password: &str,
    ) -> Result<(), AuthServiceError> {
        let resp = self
            .public(self.http.put(self.endpoint("auth/v1/user")?))
            .bearer_auth(access_token)
            .json(&json!({ "password": password }))
            .send()
            .await
            .map_err(transport("update password"))?;
        match resp.status() {
            s if s.is_success() => Ok(()),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(AuthServiceError::InvalidSession),
            StatusCode::UNPROCESSABLE_ENTITY => Err(AuthServiceError::WeakPassword),
            _ => Err(unexpected_status("update password", resp).await),
        }
    }

    async fn delete_user(&self, user_id: Uuid) -> Result<(), AuthServiceError> {
        let resp = self
            .admin(
                self.http
                    .delete(self.endpoint(&format!("auth/v1/admin/users/{user_id}"))?),
            )
            .send()
            .await
            .map_err(transport("delete user"))?;
        match resp.status() {
            s if s.is_success() => Ok(()),
            StatusCode::NOT_FOUND => Ok(()),
            _ => Err(unexpected_status("delete user", resp).await),
        }
    }
}
