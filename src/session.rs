use crate::errors::AppError;
use crate::state::AppState;
use axum::{
    async_trait, extract::FromRequestParts, http::request::Parts, response::Redirect,
    RequestPartsExt,
};
use axum_extra::{
    extract::cookie::{Cookie, CookieJar, SameSite},
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::sync::RwLock;
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "session";
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(12 * 60 * 60);

struct Session {
    username: String,
    expires_at: Instant,
}

/// Logged-in clients, keyed by an opaque token handed out at login.
///
/// A user holds at most one live session: logging in again replaces the
/// previous token. Expired entries are dropped on lookup and on every login.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, Session>>>,
    ttl: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(DEFAULT_SESSION_TTL)
    }
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    pub async fn create(&self, username: &str) -> String {
        let token = Uuid::new_v4().to_string();
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        sessions.retain(|_, session| session.username != username && session.expires_at > now);
        sessions.insert(
            token.clone(),
            Session {
                username: username.to_owned(),
                expires_at: now + self.ttl,
            },
        );
        token
    }

    pub async fn lookup(&self, token: &str) -> Option<String> {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get(token)?;
        if session.expires_at > Instant::now() {
            return Some(session.username.clone());
        }
        sessions.remove(token);
        None
    }

    pub async fn remove(&self, token: &str) {
        self.sessions.write().await.remove(token);
    }

    pub async fn active_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

pub fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

pub fn expired_session_cookie() -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE).path("/").build()
}

/// The user behind the current request, from a bearer token or the session cookie.
pub struct CurrentUser {
    pub token: String,
    pub username: String,
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = match parts.extract::<TypedHeader<Authorization<Bearer>>>().await {
            Ok(TypedHeader(Authorization(bearer))) => bearer.token().to_owned(),
            Err(_) => CookieJar::from_headers(&parts.headers)
                .get(SESSION_COOKIE)
                .map(|cookie| cookie.value().to_owned())
                .ok_or(AppError::Unauthorized)?,
        };

        let username = state
            .sessions
            .lookup(&token)
            .await
            .ok_or(AppError::Unauthorized)?;

        Ok(CurrentUser { token, username })
    }
}

/// `CurrentUser` for HTML form routes: a missing or stale session sends the
/// browser back to the login page instead of a JSON error.
pub struct PageUser(pub CurrentUser);

#[async_trait]
impl FromRequestParts<AppState> for PageUser {
    type Rejection = Redirect;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        CurrentUser::from_request_parts(parts, state)
            .await
            .map(PageUser)
            .map_err(|_| Redirect::to("/"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn sessions_are_scoped_per_token() {
        let sessions = SessionStore::default();
        let alice = sessions.create("alice").await;
        let bob = sessions.create("bob").await;
        assert_ne!(alice, bob);

        assert_eq!(sessions.lookup(&alice).await.as_deref(), Some("alice"));
        sessions.remove(&alice).await;
        assert_eq!(sessions.lookup(&alice).await, None);
        assert_eq!(sessions.lookup(&bob).await.as_deref(), Some("bob"));
    }

    #[tokio::test]
    async fn removing_unknown_token_is_harmless() {
        let sessions = SessionStore::default();
        sessions.remove("missing").await;
        assert_eq!(sessions.lookup("missing").await, None);
    }

    #[tokio::test]
    async fn expired_sessions_are_rejected_and_dropped() {
        let sessions = SessionStore::new(Duration::ZERO);
        let token = sessions.create("alice").await;

        assert_eq!(sessions.lookup(&token).await, None);
        assert_eq!(sessions.active_count().await, 0);
    }

    #[tokio::test]
    async fn relogin_replaces_previous_token() {
        let sessions = SessionStore::default();
        let first = sessions.create("alice").await;
        sessions.create("bob").await;

        let mut latest = first.clone();
        for _ in 0..50 {
            latest = sessions.create("alice").await;
        }

        assert_eq!(sessions.active_count().await, 2);
        assert_eq!(sessions.lookup(&first).await, None);
        assert_eq!(sessions.lookup(&latest).await.as_deref(), Some("alice"));
    }

    #[tokio::test]
    async fn login_sweeps_other_expired_sessions() {
        let sessions = SessionStore::new(Duration::ZERO);
        for user in ["alice", "bob", "carol"] {
            sessions.create(user).await;
        }
        assert_eq!(sessions.active_count().await, 1);
    }
}
