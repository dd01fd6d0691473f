//! In-memory page, clock and observer used by the unit tests.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, BTreeSet};
use std::rc::Rc;

use crate::dom::{Dom, ElementHandle};
use crate::error::SiteError;
use crate::reveal::ViewportObserver;
use crate::scheduler::{Scheduler, Task, TimerId};

#[derive(Debug, Clone, PartialEq)]
enum Fragment {
    Text(String),
    LineBreak,
}

#[derive(Debug, Default)]
struct Node {
    id: Option<String>,
    tag: String,
    classes: RefCell<BTreeSet<String>>,
    attributes: RefCell<BTreeMap<String, String>>,
    content: RefCell<Vec<Fragment>>,
    value: RefCell<Option<String>>,
    styles: RefCell<BTreeMap<String, String>>,
    scrolled_into_view: Cell<u32>,
}

#[derive(Debug, Clone)]
pub struct FakeElement(Rc<Node>);

impl PartialEq for FakeElement {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl FakeElement {
    fn build(tag: &str, id: Option<&str>) -> Self {
        Self(Rc::new(Node {
            id: id.map(str::to_string),
            tag: tag.to_string(),
            ..Node::default()
        }))
    }

    pub fn with_id(id: &str) -> Self {
        Self::build("div", Some(id))
    }

    pub fn input(id: &str, value: &str) -> Self {
        let el = Self::build("input", Some(id));
        *el.0.value.borrow_mut() = Some(value.to_string());
        el
    }

    pub fn link(href: &str) -> Self {
        Self::build("a", None).attr("href", href)
    }

    pub fn div() -> Self {
        Self::build("div", None)
    }

    pub fn class(self, class: &str) -> Self {
        self.0.classes.borrow_mut().insert(class.to_string());
        self
    }

    pub fn attr(self, name: &str, value: &str) -> Self {
        self.0
            .attributes
            .borrow_mut()
            .insert(name.to_string(), value.to_string());
        self
    }

    pub fn text(self, text: &str) -> Self {
        *self.0.content.borrow_mut() = vec![Fragment::Text(text.to_string())];
        self
    }

    /// Content as markup, line breaks shown as `<br>`.
    pub fn rendered(&self) -> String {
        self.0
            .content
            .borrow()
            .iter()
            .map(|fragment| match fragment {
                Fragment::Text(text) => text.as_str(),
                Fragment::LineBreak => "<br>",
            })
            .collect()
    }

    pub fn style(&self, property: &str) -> Option<String> {
        self.0.styles.borrow().get(property).cloned()
    }

    pub fn scroll_count(&self) -> u32 {
        self.0.scrolled_into_view.get()
    }

    fn matches(&self, selector: &str) -> bool {
        selector.split(',').map(str::trim).any(|part| {
            if let Some(class) = part.strip_prefix('.') {
                self.has_class(class)
            } else if let Some(id) = part.strip_prefix('#') {
                self.0.id.as_deref() == Some(id)
            } else if part == "a[href^=\"#\"]" {
                self.0.tag == "a"
                    && self
                        .attribute("href")
                        .map_or(false, |href| href.starts_with('#'))
            } else {
                self.0.tag == part
            }
        })
    }
}

impl ElementHandle for FakeElement {
    fn add_class(&self, class: &str) -> Result<(), SiteError> {
        self.0.classes.borrow_mut().insert(class.to_string());
        Ok(())
    }

    fn remove_class(&self, class: &str) -> Result<(), SiteError> {
        self.0.classes.borrow_mut().remove(class);
        Ok(())
    }

    fn has_class(&self, class: &str) -> bool {
        self.0.classes.borrow().contains(class)
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.0.attributes.borrow().get(name).cloned()
    }

    fn text_content(&self) -> Option<String> {
        let text: String = self
            .0
            .content
            .borrow()
            .iter()
            .filter_map(|fragment| match fragment {
                Fragment::Text(text) => Some(text.as_str()),
                Fragment::LineBreak => None,
            })
            .collect();
        Some(text)
    }

    fn clear_content(&self) -> Result<(), SiteError> {
        self.0.content.borrow_mut().clear();
        Ok(())
    }

    fn append_text(&self, text: &str) -> Result<(), SiteError> {
        let mut content = self.0.content.borrow_mut();
        match content.last_mut() {
            Some(Fragment::Text(last)) => last.push_str(text),
            _ => content.push(Fragment::Text(text.to_string())),
        }
        Ok(())
    }

    fn append_line_break(&self) -> Result<(), SiteError> {
        self.0.content.borrow_mut().push(Fragment::LineBreak);
        Ok(())
    }

    fn input_value(&self) -> Option<String> {
        self.0.value.borrow().clone()
    }

    fn set_style(&self, property: &str, value: &str) -> Result<(), SiteError> {
        self.0
            .styles
            .borrow_mut()
            .insert(property.to_string(), value.to_string());
        Ok(())
    }

    fn scroll_into_view_smoothly(&self) {
        self.0.scrolled_into_view.set(self.0.scrolled_into_view.get() + 1);
    }
}

/// A page holding a flat list of elements.
pub struct FakeDom {
    elements: RefCell<Vec<FakeElement>>,
    pathname: RefCell<String>,
    pub navigations: RefCell<Vec<String>>,
    pub alerts: RefCell<Vec<String>>,
    pub scrolled_to_top: Cell<u32>,
}

impl FakeDom {
    pub fn new(pathname: &str) -> Self {
        Self {
            elements: RefCell::new(Vec::new()),
            pathname: RefCell::new(pathname.to_string()),
            navigations: RefCell::new(Vec::new()),
            alerts: RefCell::new(Vec::new()),
            scrolled_to_top: Cell::new(0),
        }
    }

    pub fn add(&self, element: FakeElement) -> FakeElement {
        self.elements.borrow_mut().push(element.clone());
        element
    }

    pub fn set_pathname(&self, pathname: &str) {
        *self.pathname.borrow_mut() = pathname.to_string();
    }

    pub fn last_navigation(&self) -> Option<String> {
        self.navigations.borrow().last().cloned()
    }
}

impl Dom for FakeDom {
    type Element = FakeElement;

    fn element_by_id(&self, id: &str) -> Option<FakeElement> {
        self.elements
            .borrow()
            .iter()
            .find(|el| el.0.id.as_deref() == Some(id))
            .cloned()
    }

    fn query_selector(&self, selector: &str) -> Result<Option<FakeElement>, SiteError> {
        Ok(self.query_selector_all(selector)?.into_iter().next())
    }

    fn query_selector_all(&self, selector: &str) -> Result<Vec<FakeElement>, SiteError> {
        if selector.trim().is_empty() || selector == "#" {
            return Err(SiteError::Js(format!("'{}' is not a valid selector", selector)));
        }
        Ok(self
            .elements
            .borrow()
            .iter()
            .filter(|el| el.matches(selector))
            .cloned()
            .collect())
    }

    fn pathname(&self) -> Result<String, SiteError> {
        Ok(self.pathname.borrow().clone())
    }

    fn navigate(&self, href: &str) -> Result<(), SiteError> {
        self.navigations.borrow_mut().push(href.to_string());
        Ok(())
    }

    fn alert(&self, message: &str) {
        self.alerts.borrow_mut().push(message.to_string());
    }

    fn scroll_to_top(&self) {
        self.scrolled_to_top.set(self.scrolled_to_top.get() + 1);
    }
}

struct Scheduled {
    due: u64,
    id: TimerId,
    task: Task,
}

/// Virtual clock. Tasks only run when the test advances time.
#[derive(Default)]
pub struct ManualScheduler {
    now: Cell<u64>,
    next_id: Cell<u64>,
    queue: RefCell<Vec<Scheduled>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending_count(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Moves the clock forward, running every task that falls due on the way
    /// in due order, including tasks scheduled by those tasks.
    pub fn advance(&self, ms: u64) {
        let target = self.now.get() + ms;
        while let Some(next) = self.pop_due(target) {
            self.now.set(next.due);
            (next.task)();
        }
        self.now.set(target);
    }

    pub fn run_until_idle(&self) {
        loop {
            let next_due = self.queue.borrow().iter().map(|s| s.due).min();
            let Some(due) = next_due else { break };
            self.advance(due.saturating_sub(self.now.get()));
        }
    }

    fn pop_due(&self, target: u64) -> Option<Scheduled> {
        let mut queue = self.queue.borrow_mut();
        let position = queue
            .iter()
            .enumerate()
            .filter(|(_, s)| s.due <= target)
            .min_by_key(|(_, s)| s.due)
            .map(|(i, _)| i)?;
        Some(queue.remove(position))
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, delay_ms: u32, task: Task) -> TimerId {
        let id = TimerId::new(self.next_id.get());
        self.next_id.set(self.next_id.get() + 1);
        self.queue.borrow_mut().push(Scheduled {
            due: self.now.get() + u64::from(delay_ms),
            id,
            task,
        });
        id
    }

    fn cancel(&self, id: TimerId) {
        self.queue.borrow_mut().retain(|s| s.id != id);
    }
}

/// Records what the reveal component asks of the viewport.
#[derive(Default)]
pub struct RecordingObserver {
    pub observed: RefCell<Vec<FakeElement>>,
    pub unobserved: RefCell<Vec<FakeElement>>,
    pub disconnected: Cell<bool>,
}

impl ViewportObserver for RecordingObserver {
    type Element = FakeElement;

    fn observe(&self, element: &FakeElement) -> Result<(), SiteError> {
        self.observed.borrow_mut().push(element.clone());
        Ok(())
    }

    fn unobserve(&self, element: &FakeElement) -> Result<(), SiteError> {
        self.unobserved.borrow_mut().push(element.clone());
        Ok(())
    }

    fn disconnect(&self) {
        self.disconnected.set(true);
    }
}
