//! Session and role store
//!
//! The authenticated identity lives in a flat string key/value store that the
//! caller injects. Login writes it, logout clears it, and every screen reads
//! it to scope its API calls.

mod seat_link;
mod store;

pub use seat_link::{SeatLink, SeatLinkError};
pub use store::{JsonFileStore, KeyValueStore, MemoryStore, StoreError, StoreResult};

use shared::client::LoginResponse;
use shared::models::Role;

/// Well-known storage keys
pub mod keys {
    pub const TOKEN: &str = "token";
    pub const USER_ID: &str = "usuario_id";
    pub const RESTAURANT_ID: &str = "restaurante_id";
    pub const ROLE: &str = "rol";
    pub const USER_NAME: &str = "nombre_usuario";
    pub const TIER: &str = "plan";
    pub const PUSH_TOKEN: &str = "push_token";

    pub const ALL: [&str; 7] = [
        TOKEN,
        USER_ID,
        RESTAURANT_ID,
        ROLE,
        USER_NAME,
        TIER,
        PUSH_TOKEN,
    ];
}

/// Authenticated identity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: i64,
    pub restaurant_id: i64,
    pub role: Role,
    pub token: String,
    pub user_name: Option<String>,
    pub tier: Option<String>,
    pub push_token: Option<String>,
}

impl From<LoginResponse> for Session {
    fn from(resp: LoginResponse) -> Self {
        Self {
            user_id: resp.user_id,
            restaurant_id: resp.restaurant_id,
            role: resp.role,
            token: resp.token,
            user_name: resp.name,
            tier: resp.tier,
            push_token: None,
        }
    }
}

/// Typed view over a [`KeyValueStore`]
#[derive(Debug, Clone)]
pub struct SessionStore<S> {
    store: S,
}

impl<S: KeyValueStore> SessionStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn inner(&self) -> &S {
        &self.store
    }

    /// Stored session, or `None` when any required key is missing or invalid
    pub fn load(&self) -> StoreResult<Option<Session>> {
        let Some(token) = self.store.get(keys::TOKEN)? else {
            return Ok(None);
        };
        let user_id = self.read_id(keys::USER_ID)?;
        let restaurant_id = self.read_id(keys::RESTAURANT_ID)?;
        let role = match self.store.get(keys::ROLE)? {
            Some(raw) => match raw.parse::<Role>() {
                Ok(role) => Some(role),
                Err(e) => {
                    tracing::warn!("Stored role ignored: {e}");
                    None
                }
            },
            None => None,
        };

        let (Some(user_id), Some(restaurant_id), Some(role)) = (user_id, restaurant_id, role)
        else {
            return Ok(None);
        };

        Ok(Some(Session {
            user_id,
            restaurant_id,
            role,
            token,
            user_name: self.store.get(keys::USER_NAME)?,
            tier: self.store.get(keys::TIER)?,
            push_token: self.store.get(keys::PUSH_TOKEN)?,
        }))
    }

    pub fn save(&self, session: &Session) -> StoreResult<()> {
        let user_id = session.user_id.to_string();
        let restaurant_id = session.restaurant_id.to_string();
        self.store.set(keys::TOKEN, &session.token)?;
        self.store.set(keys::USER_ID, &user_id)?;
        self.store.set(keys::RESTAURANT_ID, &restaurant_id)?;
        self.store.set(keys::ROLE, session.role.as_str())?;
        self.write_opt(keys::USER_NAME, &session.user_name)?;
        self.write_opt(keys::TIER, &session.tier)?;
        self.write_opt(keys::PUSH_TOKEN, &session.push_token)?;
        tracing::debug!(user_id = session.user_id, role = %session.role, "Session saved");
        Ok(())
    }

    /// Logout: drop every well-known key
    pub fn clear(&self) -> StoreResult<()> {
        for key in keys::ALL {
            self.store.remove(key)?;
        }
        Ok(())
    }

    /// `(user_id, restaurant_id)` for the notification channel, if logged in
    pub fn listener_scope(&self) -> StoreResult<Option<(i64, i64)>> {
        Ok(self
            .load()?
            .map(|session| (session.user_id, session.restaurant_id)))
    }

    fn read_id(&self, key: &str) -> StoreResult<Option<i64>> {
        Ok(self
            .store
            .get(key)?
            .and_then(|raw| match raw.trim().parse::<i64>() {
                Ok(id) => Some(id),
                Err(_) => {
                    tracing::warn!(key, value = %raw, "Stored id is not a number");
                    None
                }
            }))
    }

    fn write_opt(&self, key: &str, value: &Option<String>) -> StoreResult<()> {
        match value {
            Some(v) => self.store.set(key, v),
            None => self.store.remove(key),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session {
            user_id: 7,
            restaurant_id: 3,
            role: Role::Cook,
            token: "tok".into(),
            user_name: Some("Ana".into()),
            tier: None,
            push_token: None,
        }
    }

    #[test]
    fn test_save_load_clear() {
        let sessions = SessionStore::new(MemoryStore::new());
        assert_eq!(sessions.load().unwrap(), None);

        sessions.save(&session()).unwrap();
        assert_eq!(sessions.load().unwrap(), Some(session()));
        assert_eq!(sessions.listener_scope().unwrap(), Some((7, 3)));

        sessions.clear().unwrap();
        assert!(sessions.inner().is_empty());
        assert_eq!(sessions.listener_scope().unwrap(), None);
    }

    #[test]
    fn test_partial_session_is_absent() {
        let store = MemoryStore::new();
        store.set(keys::TOKEN, "tok").unwrap();
        store.set(keys::USER_ID, "7").unwrap();
        let sessions = SessionStore::new(store);
        // No restaurant and no role
        assert_eq!(sessions.load().unwrap(), None);

        sessions.inner().set(keys::RESTAURANT_ID, "3").unwrap();
        sessions.inner().set(keys::ROLE, "chef").unwrap();
        assert_eq!(sessions.load().unwrap(), None);

        sessions.inner().set(keys::ROLE, "garzon").unwrap();
        let loaded = sessions.load().unwrap().unwrap();
        assert_eq!(loaded.role, Role::Waiter);
    }

    #[test]
    fn test_save_overwrites_optional_keys() {
        let sessions = SessionStore::new(MemoryStore::new());
        let mut s = session();
        s.tier = Some("pro".into());
        sessions.save(&s).unwrap();
        s.tier = None;
        sessions.save(&s).unwrap();
        assert_eq!(sessions.inner().get(keys::TIER).unwrap(), None);
    }
}
