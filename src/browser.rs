//! `web-sys` implementations of the page capabilities.

use log::error;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::js_sys::Array;
use web_sys::{
    Document, Element, Event, EventTarget, HtmlElement, HtmlInputElement, IntersectionObserver,
    IntersectionObserverEntry, IntersectionObserverInit, Node, ScrollBehavior,
    ScrollIntoViewOptions, ScrollLogicalPosition, Window,
};

use crate::dom::{Dom, ElementHandle};
use crate::error::SiteError;
use crate::reveal::ViewportObserver;

pub struct BrowserDom {
    window: Window,
    document: Document,
}

impl BrowserDom {
    pub fn new() -> Result<Self, SiteError> {
        let window = web_sys::window().ok_or(SiteError::NoWindow)?;
        let document = window.document().ok_or(SiteError::NoDocument)?;
        Ok(Self { window, document })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn document(&self) -> &Document {
        &self.document
    }
}

impl Dom for BrowserDom {
    type Element = Element;

    fn element_by_id(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    fn query_selector(&self, selector: &str) -> Result<Option<Element>, SiteError> {
        Ok(self.document.query_selector(selector)?)
    }

    fn query_selector_all(&self, selector: &str) -> Result<Vec<Element>, SiteError> {
        let nodes = self.document.query_selector_all(selector)?;
        Ok((0..nodes.length())
            .filter_map(|i| nodes.get(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect())
    }

    fn pathname(&self) -> Result<String, SiteError> {
        Ok(self.window.location().pathname()?)
    }

    fn navigate(&self, href: &str) -> Result<(), SiteError> {
        Ok(self.window.location().set_href(href)?)
    }

    fn alert(&self, message: &str) {
        if let Err(e) = self.window.alert_with_message(message) {
            error!("alert failed: {}", SiteError::from(e));
        }
    }

    fn scroll_to_top(&self) {
        self.window.scroll_to_with_x_and_y(0.0, 0.0);
    }
}

impl ElementHandle for Element {
    fn add_class(&self, class: &str) -> Result<(), SiteError> {
        Ok(self.class_list().add_1(class)?)
    }

    fn remove_class(&self, class: &str) -> Result<(), SiteError> {
        Ok(self.class_list().remove_1(class)?)
    }

    fn has_class(&self, class: &str) -> bool {
        self.class_list().contains(class)
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.get_attribute(name)
    }

    fn text_content(&self) -> Option<String> {
        Node::text_content(self)
    }

    fn clear_content(&self) -> Result<(), SiteError> {
        self.set_text_content(None);
        Ok(())
    }

    fn append_text(&self, text: &str) -> Result<(), SiteError> {
        Ok(self.append_with_str_1(text)?)
    }

    fn append_line_break(&self) -> Result<(), SiteError> {
        let document = self.owner_document().ok_or(SiteError::NoDocument)?;
        let br = document.create_element("br")?;
        self.append_child(&br)?;
        Ok(())
    }

    fn input_value(&self) -> Option<String> {
        self.dyn_ref::<HtmlInputElement>().map(|input| input.value())
    }

    fn set_style(&self, property: &str, value: &str) -> Result<(), SiteError> {
        let element = self
            .dyn_ref::<HtmlElement>()
            .ok_or_else(|| SiteError::Js(format!("<{}> has no inline style", self.tag_name())))?;
        Ok(element.style().set_property(property, value)?)
    }

    fn scroll_into_view_smoothly(&self) {
        let options = ScrollIntoViewOptions::new();
        options.set_behavior(ScrollBehavior::Smooth);
        options.set_block(ScrollLogicalPosition::Start);
        self.scroll_into_view_with_scroll_into_view_options(&options);
    }
}

/// `IntersectionObserver` that reports each entry's target and whether it is
/// intersecting.
pub struct BrowserViewportObserver {
    inner: IntersectionObserver,
    _callback: Closure<dyn FnMut(Array, IntersectionObserver)>,
}

impl BrowserViewportObserver {
    pub fn new<F>(threshold: f64, root_margin: &str, mut on_entry: F) -> Result<Self, SiteError>
    where
        F: FnMut(Element, bool) + 'static,
    {
        let callback = Closure::wrap(Box::new(move |entries: Array, _observer: IntersectionObserver| {
            for entry in entries.iter() {
                if let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() {
                    on_entry(entry.target(), entry.is_intersecting());
                }
            }
        }) as Box<dyn FnMut(Array, IntersectionObserver)>);

        let options = IntersectionObserverInit::new();
        options.set_threshold(&JsValue::from_f64(threshold));
        options.set_root_margin(root_margin);

        let inner = IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options)?;
        Ok(Self {
            inner,
            _callback: callback,
        })
    }
}

impl ViewportObserver for BrowserViewportObserver {
    type Element = Element;

    fn observe(&self, element: &Element) -> Result<(), SiteError> {
        self.inner.observe(element);
        Ok(())
    }

    fn unobserve(&self, element: &Element) -> Result<(), SiteError> {
        self.inner.unobserve(element);
        Ok(())
    }

    fn disconnect(&self) {
        self.inner.disconnect();
    }
}

/// An event listener that is removed again when dropped.
pub struct EventBinding {
    target: EventTarget,
    event: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl EventBinding {
    pub fn listen<F>(target: &EventTarget, event: &'static str, handler: F) -> Result<Self, SiteError>
    where
        F: FnMut(Event) + 'static,
    {
        let callback = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        target.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())?;
        Ok(Self {
            target: target.clone(),
            event,
            callback,
        })
    }

    pub fn event(&self) -> &'static str {
        self.event
    }
}

impl Drop for EventBinding {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.event, self.callback.as_ref().unchecked_ref());
    }
}
