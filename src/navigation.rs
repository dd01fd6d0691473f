use log::debug;

use crate::config::{ACTIVE_CLASS, HOME_PAGE, NAV_LINK_SELECTOR};
use crate::dom::{Dom, ElementHandle};
use crate::error::SiteError;

/// Last path segment of `pathname`, or the home page for `/` and empty paths.
pub fn current_page(pathname: &str) -> &str {
    match pathname.rsplit('/').next() {
        Some(page) if !page.is_empty() => page,
        _ => HOME_PAGE,
    }
}

pub fn is_active(href: Option<&str>, current: &str) -> bool {
    href == Some(current) || (current.is_empty() && href == Some(HOME_PAGE))
}

/// Moves the `active` class onto the nav links pointing at the current page.
/// Returns how many links ended up active.
pub fn update_navigation<D: Dom>(dom: &D) -> Result<usize, SiteError> {
    let pathname = dom.pathname()?;
    let current = current_page(&pathname);

    let mut active = 0;
    for link in dom.query_selector_all(NAV_LINK_SELECTOR)? {
        link.remove_class(ACTIVE_CLASS)?;
        if is_active(link.attribute("href").as_deref(), current) {
            link.add_class(ACTIVE_CLASS)?;
            active += 1;
        }
    }

    debug!("Navigation updated for {}: {} active", current, active);
    Ok(active)
}
