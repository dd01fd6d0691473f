use std::cell::RefCell;
use std::collections::BTreeMap;

use log::info;
use web_sys::Storage;

use crate::config::{HOME_PAGE, SESSION_LOGGED_IN_KEY, SESSION_USER_ID_KEY};
use crate::dom::Dom;
use crate::error::SiteError;

/// Per-tab key-value storage.
pub trait SessionStore {
    fn get(&self, key: &str) -> Result<Option<String>, SiteError>;
    fn set(&self, key: &str, value: &str) -> Result<(), SiteError>;
    fn clear(&self) -> Result<(), SiteError>;
}

/// `window.sessionStorage`.
pub struct BrowserSession {
    storage: Storage,
}

impl BrowserSession {
    pub fn from_window(window: &web_sys::Window) -> Result<Self, SiteError> {
        match window.session_storage() {
            Ok(Some(storage)) => Ok(Self { storage }),
            Ok(None) => Err(SiteError::Storage("sessionStorage is not available".to_string())),
            Err(e) => Err(SiteError::Storage(SiteError::from(e).to_string())),
        }
    }
}

impl SessionStore for BrowserSession {
    fn get(&self, key: &str) -> Result<Option<String>, SiteError> {
        Ok(self.storage.get_item(key)?)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SiteError> {
        Ok(self.storage.set_item(key, value)?)
    }

    fn clear(&self) -> Result<(), SiteError> {
        Ok(self.storage.clear()?)
    }
}

/// Session store kept in memory, used when the browser refuses
/// `sessionStorage` (sandboxed frames) and in tests.
#[derive(Default)]
pub struct MemorySession {
    entries: RefCell<BTreeMap<String, String>>,
}

impl MemorySession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl SessionStore for MemorySession {
    fn get(&self, key: &str) -> Result<Option<String>, SiteError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SiteError> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), SiteError> {
        self.entries.borrow_mut().clear();
        Ok(())
    }
}

pub fn record_login<S: SessionStore + ?Sized>(store: &S, user_id: &str) -> Result<(), SiteError> {
    store.set(SESSION_LOGGED_IN_KEY, "true")?;
    store.set(SESSION_USER_ID_KEY, user_id)
}

pub fn is_logged_in<S: SessionStore + ?Sized>(store: &S) -> bool {
    matches!(store.get(SESSION_LOGGED_IN_KEY), Ok(Some(flag)) if flag == "true")
}

/// Drops every session entry and sends the visitor home.
pub fn logout<D: Dom, S: SessionStore + ?Sized>(dom: &D, store: &S) -> Result<(), SiteError> {
    store.clear()?;
    info!("Session cleared, returning to {}", HOME_PAGE);
    dom.navigate(HOME_PAGE)
}
