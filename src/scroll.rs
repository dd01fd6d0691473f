use log::debug;

use crate::dom::{Dom, ElementHandle};
use crate::error::SiteError;

/// The selector an in-page link points at, if it points anywhere.
pub fn anchor_selector(href: &str) -> Option<&str> {
    if href.len() > 1 && href.starts_with('#') {
        Some(href)
    } else {
        None
    }
}

/// Smoothly scrolls to the target of an in-page link. Returns `false` when
/// the link has no usable target or no element matches it.
pub fn scroll_to_anchor<D: Dom>(dom: &D, href: &str) -> Result<bool, SiteError> {
    let Some(selector) = anchor_selector(href) else {
        return Ok(false);
    };

    match dom.query_selector(selector)? {
        Some(target) => {
            target.scroll_into_view_smoothly();
            Ok(true)
        }
        None => {
            debug!("No element for anchor {}", selector);
            Ok(false)
        }
    }
}

pub fn scroll_to_top<D: Dom>(dom: &D) {
    dom.scroll_to_top();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeDom, FakeElement};

    #[test]
    fn scrolls_to_matching_section() {
        let dom = FakeDom::new("/index.html");
        let pipeline = dom.add(FakeElement::with_id("pipeline"));

        assert!(scroll_to_anchor(&dom, "#pipeline").unwrap());
        assert_eq!(pipeline.scroll_count(), 1);
    }

    #[test]
    fn missing_target_is_a_no_op() {
        let dom = FakeDom::new("/index.html");
        let pipeline = dom.add(FakeElement::with_id("pipeline"));

        assert!(!scroll_to_anchor(&dom, "#contact").unwrap());
        assert_eq!(pipeline.scroll_count(), 0);
    }

    #[test]
    fn bare_hash_is_ignored() {
        let dom = FakeDom::new("/index.html");
        assert!(!scroll_to_anchor(&dom, "#").unwrap());
        assert_eq!(anchor_selector("login.html"), None);
    }

    #[test]
    fn top_scroll_reaches_the_window() {
        let dom = FakeDom::new("/index.html");
        scroll_to_top(&dom);
        assert_eq!(dom.scrolled_to_top.get(), 1);
    }
}
