//! The document access the page behaviours need, kept behind traits so the
//! behaviours can run against the real browser or an in-memory page.

use crate::error::SiteError;

/// A single element of the page.
///
/// Handles are cheap to clone and compare equal when they refer to the same
/// underlying node.
pub trait ElementHandle: Clone + PartialEq {
    fn add_class(&self, class: &str) -> Result<(), SiteError>;
    fn remove_class(&self, class: &str) -> Result<(), SiteError>;
    fn has_class(&self, class: &str) -> bool;
    fn attribute(&self, name: &str) -> Option<String>;
    fn text_content(&self) -> Option<String>;

    /// Removes every child of the element.
    fn clear_content(&self) -> Result<(), SiteError>;
    fn append_text(&self, text: &str) -> Result<(), SiteError>;
    fn append_line_break(&self) -> Result<(), SiteError>;

    /// Current value of a form input, `None` when the element is not one.
    fn input_value(&self) -> Option<String>;
    fn set_style(&self, property: &str, value: &str) -> Result<(), SiteError>;

    /// Smoothly scrolls the element to the top of the viewport.
    fn scroll_into_view_smoothly(&self);
}

/// The document plus the window operations that act on it.
pub trait Dom {
    type Element: ElementHandle;

    fn element_by_id(&self, id: &str) -> Option<Self::Element>;
    fn query_selector(&self, selector: &str) -> Result<Option<Self::Element>, SiteError>;
    fn query_selector_all(&self, selector: &str) -> Result<Vec<Self::Element>, SiteError>;

    /// Path part of the current URL, e.g. `/site/login.html`.
    fn pathname(&self) -> Result<String, SiteError>;
    fn navigate(&self, href: &str) -> Result<(), SiteError>;
    fn alert(&self, message: &str);
    fn scroll_to_top(&self);
}
