use std::cell::{Cell, RefCell};

use log::debug;

use crate::dom::{Dom, ElementHandle};
use crate::error::SiteError;

/// Reports when watched elements cross into the viewport.
pub trait ViewportObserver {
    type Element: ElementHandle;

    fn observe(&self, element: &Self::Element) -> Result<(), SiteError>;
    fn unobserve(&self, element: &Self::Element) -> Result<(), SiteError>;
    fn disconnect(&self);
}

/// One-shot fade-in for cards. Each registered element is animated the first
/// time it becomes visible and then dropped from the registry.
pub struct RevealObserver<O: ViewportObserver> {
    observer: O,
    animation: String,
    waiting: RefCell<Vec<O::Element>>,
    revealed: Cell<usize>,
}

impl<O: ViewportObserver> RevealObserver<O> {
    pub fn new(observer: O, animation: impl Into<String>) -> Self {
        Self {
            observer,
            animation: animation.into(),
            waiting: RefCell::new(Vec::new()),
            revealed: Cell::new(0),
        }
    }

    /// Starts watching every element matching `selector`. Returns how many
    /// new elements were registered.
    pub fn init<D>(&self, dom: &D, selector: &str) -> Result<usize, SiteError>
    where
        D: Dom<Element = O::Element>,
    {
        let mut added = 0;
        for element in dom.query_selector_all(selector)? {
            if self.watch(element)? {
                added += 1;
            }
        }
        debug!("Watching {} cards for reveal", added);
        Ok(added)
    }

    pub fn watch(&self, element: O::Element) -> Result<bool, SiteError> {
        if self.waiting.borrow().contains(&element) {
            return Ok(false);
        }
        self.observer.observe(&element)?;
        self.waiting.borrow_mut().push(element);
        Ok(true)
    }

    /// Feeds one intersection record. Returns `true` when this call revealed
    /// the element.
    pub fn handle_entry(&self, target: &O::Element, is_intersecting: bool) -> Result<bool, SiteError> {
        if !is_intersecting {
            return Ok(false);
        }

        let position = self.waiting.borrow().iter().position(|el| el == target);
        let Some(position) = position else {
            return Ok(false);
        };

        let element = self.waiting.borrow_mut().remove(position);
        element.set_style("animation", &self.animation)?;
        self.observer.unobserve(&element)?;
        self.revealed.set(self.revealed.get() + 1);
        Ok(true)
    }

    pub fn waiting_count(&self) -> usize {
        self.waiting.borrow().len()
    }

    pub fn revealed_count(&self) -> usize {
        self.revealed.get()
    }

    /// Stops all observation. Cards not yet revealed keep their current style.
    pub fn teardown(&self) {
        self.observer.disconnect();
        self.waiting.borrow_mut().clear();
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }
}
