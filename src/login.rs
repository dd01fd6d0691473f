use log::{info, warn};

use crate::config::{DASHBOARD_PAGE, EMPLOYEE_ID_FIELD, PASSWORD_FIELD};
use crate::dom::{Dom, ElementHandle};
use crate::error::SiteError;
use crate::session::{record_login, SessionStore};

pub const EMPTY_FIELDS_MESSAGE: &str = "Please fill in all fields";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginOutcome {
    /// Flags written, browser sent to the dashboard.
    Redirected,
    /// A field was blank; the visitor was alerted and nothing was stored.
    Rejected,
}

/// Presence check only. There is no credential verification.
pub fn fields_filled(employee_id: &str, password: &str) -> bool {
    !employee_id.trim().is_empty() && !password.trim().is_empty()
}

fn read_field<D: Dom>(dom: &D, id: &str) -> Result<String, SiteError> {
    dom.element_by_id(id)
        .and_then(|el| el.input_value())
        .ok_or_else(|| SiteError::MissingElement(id.to_string()))
}

/// Handles a login form submission. The caller has already prevented the
/// browser's own form navigation.
pub fn submit_login<D, S>(dom: &D, store: &S) -> Result<LoginOutcome, SiteError>
where
    D: Dom,
    S: SessionStore + ?Sized,
{
    let employee_id = read_field(dom, EMPLOYEE_ID_FIELD)?;
    let password = read_field(dom, PASSWORD_FIELD)?;

    if !fields_filled(&employee_id, &password) {
        warn!("Login rejected: empty field");
        dom.alert(EMPTY_FIELDS_MESSAGE);
        return Ok(LoginOutcome::Rejected);
    }

    // Stored as typed, untrimmed
    record_login(store, &employee_id)?;
    info!("Login accepted, redirecting to {}", DASHBOARD_PAGE);
    dom.navigate(DASHBOARD_PAGE)?;
    Ok(LoginOutcome::Redirected)
}
