use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use super::{NewUser, RemoteUserService, UserId, UserRecord};
use crate::error::RemoteCallFailure;

/// [`RemoteUserService`] backed by a JSONPlaceholder-style REST API.
#[derive(Clone, Debug)]
pub struct HttpUserService {
    http: Client,
    base_url: String,
}

impl HttpUserService {
    pub const DEFAULT_BASE_URL: &'static str = "https://jsonplaceholder.typicode.com";

    /// Client for the API rooted at `base_url` (e.g. `https://host/`).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    /// Same as [`new`](Self::new) but reusing an existing `reqwest` client.
    /// A trailing `/` on `base_url` is dropped.
    pub fn with_client(http: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn users_url(&self) -> String {
        format!("{}/users", self.base_url)
    }

    fn user_url(&self, id: UserId) -> String {
        format!("{}/users/{}", self.base_url, id)
    }
}

impl Default for HttpUserService {
    fn default() -> Self {
        Self::new(Self::DEFAULT_BASE_URL)
    }
}

#[async_trait]
impl RemoteUserService for HttpUserService {
    async fn list(&self, query: Option<&str>) -> Result<Vec<UserRecord>, RemoteCallFailure> {
        let mut request = self.http.get(self.users_url());
        if let Some(q) = query {
            request = request.query(&[("q", q)]);
        }
        debug!(url = %self.users_url(), ?query, "GET users");
        let users = request
            .send()
            .await?
            .error_for_status()?
            .json::<Vec<UserRecord>>()
            .await?;
        Ok(users)
    }

    async fn create(&self, user: &NewUser) -> Result<UserRecord, RemoteCallFailure> {
        debug!(url = %self.users_url(), "POST users");
        let created = self
            .http
            .post(self.users_url())
            .json(user)
            .send()
            .await?
            .error_for_status()?
            .json::<UserRecord>()
            .await?;
        Ok(created)
    }

    async fn update(&self, id: UserId, user: &UserRecord) -> Result<(), RemoteCallFailure> {
        debug!(url = %self.user_url(id), "PUT user");
        self.http
            .put(self.user_url(id))
            .json(user)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    async fn delete(&self, id: UserId) -> Result<(), RemoteCallFailure> {
        debug!(url = %self.user_url(id), "DELETE user");
        self.http
            .delete(self.user_url(id))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}
