//! Page behaviours for the Disaster Response AI site: hero typing effect,
//! demo login, navigation highlighting, smooth scrolling, keyboard shortcuts
//! and card reveal. Compiled to WebAssembly and attached to the static pages.

use std::cell::RefCell;

use log::{error, info};
use wasm_bindgen::prelude::*;

pub mod browser;
pub mod config;
pub mod controller;
pub mod debounce;
pub mod dom;
pub mod error;
pub mod login;
pub mod navigation;
pub mod reveal;
pub mod scheduler;
pub mod scroll;
pub mod session;
pub mod shortcuts;
pub mod typing;
pub mod urgency;

#[cfg(test)]
mod testing;

use browser::BrowserDom;
use controller::PageController;
use error::SiteError;
use session::BrowserSession;

thread_local! {
    static CONTROLLER: RefCell<Option<PageController>> = RefCell::new(None);
}

#[wasm_bindgen(start)]
pub fn start() {
    // Initialize console error panic hook for better error messages
    console_error_panic_hook::set_once();

    console_log::init_with_level(config::log_level()).expect("error initializing log");

    info!("Starting page behaviours");
    install();
}

/// Attaches the page behaviours, replacing any controller already installed.
#[wasm_bindgen]
pub fn install() {
    teardown();
    match PageController::install() {
        Ok(controller) => CONTROLLER.with(|slot| *slot.borrow_mut() = Some(controller)),
        Err(e) => error!("Page behaviours not installed: {}", e),
    }
}

/// Detaches every behaviour from the page.
#[wasm_bindgen]
pub fn teardown() {
    CONTROLLER.with(|slot| slot.borrow_mut().take());
}

/// Clears the session and returns to the home page. Used by the dashboard's
/// logout button.
#[wasm_bindgen]
pub fn logout() {
    let result = CONTROLLER.with(|slot| match slot.borrow().as_ref() {
        Some(controller) => controller.logout(),
        None => logout_without_controller(),
    });
    if let Err(e) = result {
        error!("Logout failed: {}", e);
    }
}

fn logout_without_controller() -> Result<(), SiteError> {
    let dom = BrowserDom::new()?;
    let store = BrowserSession::from_window(dom.window())?;
    session::logout(&dom, &store)
}

/// Whether the tab session holds the login flag. Works with or without an
/// installed controller.
#[wasm_bindgen(js_name = isLoggedIn)]
pub fn is_logged_in() -> bool {
    let installed = CONTROLLER.with(|slot| slot.borrow().as_ref().map(PageController::is_logged_in));
    installed.unwrap_or_else(|| match logged_in_without_controller() {
        Ok(logged_in) => logged_in,
        Err(e) => {
            error!("Cannot read session: {}", e);
            false
        }
    })
}

fn logged_in_without_controller() -> Result<bool, SiteError> {
    let dom = BrowserDom::new()?;
    let store = BrowserSession::from_window(dom.window())?;
    Ok(session::is_logged_in(&store))
}

#[wasm_bindgen(js_name = formatUrgency)]
pub fn format_urgency(urgency: &str) -> String {
    urgency::format_urgency(urgency)
}

/// CSS colour class (`red`, `yellow`, `green`) for a ticket's urgency score.
#[wasm_bindgen(js_name = urgencyBand)]
pub fn urgency_band(score: f64) -> String {
    urgency::UrgencyBand::from_score(score).css_class().to_string()
}
