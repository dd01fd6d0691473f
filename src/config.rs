use log::{warn, Level};
use serde::Deserialize;

use crate::dom::{Dom, ElementHandle};
use crate::error::SiteError;

pub const HOME_PAGE: &str = "index.html";
pub const LOGIN_PAGE: &str = "login.html";
pub const DASHBOARD_PAGE: &str = "dashboard.html";

pub const SESSION_LOGGED_IN_KEY: &str = "userLoggedIn";
pub const SESSION_USER_ID_KEY: &str = "userId";

pub const EMPLOYEE_ID_FIELD: &str = "employee-id";
pub const PASSWORD_FIELD: &str = "password";
pub const TYPING_TITLE_ID: &str = "typingTitle";
pub const SITE_CONFIG_ID: &str = "site-config";

pub const NAV_LINK_SELECTOR: &str = ".nav-link";
pub const ANCHOR_LINK_SELECTOR: &str = "a[href^=\"#\"]";
pub const ACTIVE_CLASS: &str = "active";
pub const TYPING_CLASS: &str = "typing";

#[cfg(debug_assertions)]
pub fn log_level() -> Level {
    Level::Debug // Verbose console output while developing locally
}

#[cfg(not(debug_assertions))]
pub fn log_level() -> Level {
    Level::Info
}

/// Tunables for the page behaviours. Every field has a default, so a page can
/// override only what it needs through a `<script type="application/json"
/// id="site-config">` block.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct SiteConfig {
    pub typing_text: String,
    pub typing_speed_ms: u32,
    pub resize_quiet_ms: u32,
    pub reveal_selector: String,
    pub reveal_threshold: f64,
    pub reveal_root_margin: String,
    pub reveal_animation: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            typing_text: "Disaster Response AI:\n4-Phase Integrated Pipeline".to_string(),
            typing_speed_ms: 50,
            resize_quiet_ms: 250,
            reveal_selector: ".feature-card, .ticket-card".to_string(),
            reveal_threshold: 0.1,
            reveal_root_margin: "0px 0px -100px 0px".to_string(),
            reveal_animation: "fadeIn 0.6s ease-in-out".to_string(),
        }
    }
}

impl SiteConfig {
    pub fn from_json(raw: &str) -> Result<Self, SiteError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Reads the inline override block if the page has one. A malformed block
    /// is logged and the defaults are used.
    pub fn load<D: Dom>(dom: &D) -> Self {
        let Some(raw) = dom
            .element_by_id(SITE_CONFIG_ID)
            .and_then(|el| el.text_content())
        else {
            return Self::default();
        };

        if raw.trim().is_empty() {
            return Self::default();
        }

        match Self::from_json(&raw) {
            Ok(config) => config,
            Err(e) => {
                warn!("Ignoring #{}: {}", SITE_CONFIG_ID, e);
                Self::default()
            }
        }
    }
}
