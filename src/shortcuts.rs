use log::info;

use crate::config::{DASHBOARD_PAGE, HOME_PAGE, LOGIN_PAGE};
use crate::dom::Dom;
use crate::error::SiteError;

/// The parts of a `keydown` event the shortcuts look at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress<'a> {
    pub key: &'a str,
    pub ctrl: bool,
    pub meta: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    Home,
    Login,
    Dashboard,
}

impl Shortcut {
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "h" | "H" => Some(Shortcut::Home),
            "l" | "L" => Some(Shortcut::Login),
            "d" | "D" => Some(Shortcut::Dashboard),
            _ => None,
        }
    }

    pub fn destination(self) -> &'static str {
        match self {
            Shortcut::Home => HOME_PAGE,
            Shortcut::Login => LOGIN_PAGE,
            Shortcut::Dashboard => DASHBOARD_PAGE,
        }
    }
}

/// Ctrl on most platforms, Cmd (meta) on macOS.
pub fn resolve(press: &KeyPress<'_>) -> Option<Shortcut> {
    if press.ctrl || press.meta {
        Shortcut::from_key(press.key)
    } else {
        None
    }
}

pub fn handle_key<D: Dom>(dom: &D, press: &KeyPress<'_>) -> Result<Option<Shortcut>, SiteError> {
    let Some(shortcut) = resolve(press) else {
        return Ok(None);
    };
    info!("Shortcut {:?} -> {}", shortcut, shortcut.destination());
    dom.navigate(shortcut.destination())?;
    Ok(Some(shortcut))
}
