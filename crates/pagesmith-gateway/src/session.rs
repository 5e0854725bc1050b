//! Explicit session state: who is signed in and which page is active.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::cache::{LocalCache, AUTH_KEY, PAGE_KEY, TOKEN_KEY};
use crate::error::CacheError;

/// Top-level pages of the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Page {
    #[default]
    Home,
    Dashboard,
    Login,
}

impl Page {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Dashboard => "dashboard",
            Self::Login => "login",
        }
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Page {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "home" => Ok(Self::Home),
            "dashboard" => Ok(Self::Dashboard),
            "login" => Ok(Self::Login),
            other => Err(format!("Unknown page: {other}")),
        }
    }
}

/// Session state, created at start-up from the cache and written back on
/// every change.
#[derive(Debug)]
pub struct SessionContext {
    cache: Arc<LocalCache>,
    authenticated: bool,
    token: Option<String>,
    page: Page,
}

impl SessionContext {
    /// Restore the session stored in `cache`.
    pub async fn load(cache: Arc<LocalCache>) -> Self {
        let authenticated = cache.get(AUTH_KEY).await.as_deref() == Some("true");
        let token = cache.get(TOKEN_KEY).await;
        let page = cache
            .get(PAGE_KEY)
            .await
            .and_then(|p| p.parse().ok())
            .unwrap_or_default();

        Self {
            cache,
            authenticated,
            token,
            page,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// Bearer token for API requests.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn page(&self) -> Page {
        self.page
    }

    /// Record a successful sign-in and move to the dashboard.
    pub async fn sign_in(&mut self, token: impl Into<String>) -> Result<(), CacheError> {
        let token = token.into();
        self.cache.set(TOKEN_KEY, token.clone()).await?;
        self.cache.set(AUTH_KEY, "true").await?;
        self.authenticated = true;
        self.token = Some(token);
        self.navigate(Page::Dashboard).await
    }

    /// Tear the session down and return to the home page.
    pub async fn sign_out(&mut self) -> Result<(), CacheError> {
        self.cache.remove(AUTH_KEY).await?;
        self.cache.remove(TOKEN_KEY).await?;
        self.authenticated = false;
        self.token = None;
        self.navigate(Page::Home).await
    }

    pub async fn navigate(&mut self, page: Page) -> Result<(), CacheError> {
        self.cache.set(PAGE_KEY, page.as_str()).await?;
        self.page = page;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fresh_session_is_anonymous_on_home() {
        let session = SessionContext::load(Arc::new(LocalCache::in_memory())).await;

        assert!(!session.is_authenticated());
        assert_eq!(session.token(), None);
        assert_eq!(session.page(), Page::Home);
    }

    #[tokio::test]
    async fn sign_in_survives_reload() {
        let cache = Arc::new(LocalCache::in_memory());
        let mut session = SessionContext::load(Arc::clone(&cache)).await;
        session.sign_in("tok").await.unwrap();

        let restored = SessionContext::load(cache).await;

        assert!(restored.is_authenticated());
        assert_eq!(restored.token(), Some("tok"));
        assert_eq!(restored.page(), Page::Dashboard);
    }

    #[tokio::test]
    async fn sign_out_clears_credentials() {
        let cache = Arc::new(LocalCache::in_memory());
        let mut session = SessionContext::load(Arc::clone(&cache)).await;
        session.sign_in("tok").await.unwrap();
        session.sign_out().await.unwrap();

        assert_eq!(cache.get(AUTH_KEY).await, None);
        assert_eq!(cache.get(TOKEN_KEY).await, None);
        assert_eq!(cache.get(PAGE_KEY).await.as_deref(), Some("home"));
    }

    #[tokio::test]
    async fn unknown_stored_page_falls_back_to_home() {
        let cache = Arc::new(LocalCache::in_memory());
        cache.set(PAGE_KEY, "settings").await.unwrap();

        assert_eq!(SessionContext::load(cache).await.page(), Page::Home);
    }
}
