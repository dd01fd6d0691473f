use std::cell::{OnceCell, RefCell};
use std::rc::{Rc, Weak};

use log::{debug, error, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{Element, Event, EventTarget, KeyboardEvent};

use crate::browser::{BrowserDom, BrowserViewportObserver, EventBinding};
use crate::config::{SiteConfig, ANCHOR_LINK_SELECTOR, EMPLOYEE_ID_FIELD, TYPING_TITLE_ID};
use crate::debounce::Debouncer;
use crate::dom::Dom;
use crate::error::SiteError;
use crate::login::{submit_login, LoginOutcome};
use crate::navigation::update_navigation;
use crate::reveal::{RevealObserver, ViewportObserver};
use crate::scheduler::{Scheduler, TimeoutScheduler};
use crate::scroll::{scroll_to_anchor, scroll_to_top};
use crate::session::{self, BrowserSession, MemorySession, SessionStore};
use crate::shortcuts::{handle_key, KeyPress, Shortcut};
use crate::typing::type_into;

/// What the document-ready pass managed to set up.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReadyReport {
    pub typing_started: bool,
    pub active_links: usize,
    pub watched_cards: usize,
}

/// The behaviours that run once the document is parsed: hero typing,
/// navigation highlighting and card reveal registration. A failing behaviour
/// is logged and does not stop the others.
pub fn run_ready_behaviors<D, S, O>(
    dom: &D,
    scheduler: Rc<S>,
    config: &SiteConfig,
    reveal: &RevealObserver<O>,
) -> ReadyReport
where
    D: Dom<Element = O::Element>,
    D::Element: 'static,
    S: Scheduler + ?Sized + 'static,
    O: ViewportObserver,
{
    let mut report = ReadyReport::default();

    if let Some(title) = dom.element_by_id(TYPING_TITLE_ID) {
        match type_into(title, &config.typing_text, config.typing_speed_ms, scheduler) {
            Ok(()) => report.typing_started = true,
            Err(e) => error!("Typing animation failed to start: {}", e),
        }
    }

    match update_navigation(dom) {
        Ok(active) => report.active_links = active,
        Err(e) => error!("Failed to update navigation: {}", e),
    }

    match reveal.init(dom, &config.reveal_selector) {
        Ok(watched) => report.watched_cards = watched,
        Err(e) => error!("Failed to register cards for reveal: {}", e),
    }

    report
}

/// What can run straight away for a given `document.readyState`. The module
/// may finish loading after `DOMContentLoaded` or `load` already fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LifecyclePlan {
    pub run_ready_now: bool,
    pub scroll_now: bool,
}

pub fn lifecycle_plan(ready_state: &str) -> LifecyclePlan {
    match ready_state {
        "loading" => LifecyclePlan {
            run_ready_now: false,
            scroll_now: false,
        },
        "complete" => LifecyclePlan {
            run_ready_now: true,
            scroll_now: true,
        },
        // "interactive": parsed, subresources still loading
        _ => LifecyclePlan {
            run_ready_now: true,
            scroll_now: false,
        },
    }
}

/// Keydown handler body. Events that are not keyboard events are ignored.
pub fn handle_keydown<D: Dom>(dom: &D, event: &Event) -> Result<Option<Shortcut>, SiteError> {
    let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
        return Ok(None);
    };
    let key = event.key();
    let press = KeyPress {
        key: &key,
        ctrl: event.ctrl_key(),
        meta: event.meta_key(),
    };
    handle_key(dom, &press)
}

/// Submit handler body: keeps the browser from posting the form, then runs the
/// demo login.
pub fn handle_login_submit<D, S>(dom: &D, store: &S, event: &Event) -> Result<LoginOutcome, SiteError>
where
    D: Dom,
    S: SessionStore + ?Sized,
{
    event.prevent_default();
    submit_login(dom, store)
}

struct Page {
    dom: BrowserDom,
    session: Box<dyn SessionStore>,
    scheduler: Rc<TimeoutScheduler>,
    config: SiteConfig,
    reveal: RevealObserver<BrowserViewportObserver>,
    resize: Debouncer<()>,
    bindings: RefCell<Vec<EventBinding>>,
}

/// Owns every behaviour attached to the current page, together with the
/// listeners, timers and observer they registered. Dropping the controller or
/// calling [`PageController::teardown`] detaches all of it.
pub struct PageController {
    page: Rc<Page>,
}

impl PageController {
    pub fn install() -> Result<Self, SiteError> {
        let dom = BrowserDom::new()?;

        let session: Box<dyn SessionStore> = match BrowserSession::from_window(dom.window()) {
            Ok(storage) => Box::new(storage),
            Err(e) => {
                warn!("{}; keeping session in memory", e);
                Box::new(MemorySession::new())
            }
        };

        let config = SiteConfig::load(&dom);
        debug!("Site config: {:?}", config);

        let scheduler = Rc::new(TimeoutScheduler::new());
        let resize = Debouncer::new(config.resize_quiet_ms, scheduler.clone(), |()| {
            debug!("Resize settled");
        });

        // The observer callback needs the page, which needs the observer.
        let slot: Rc<OnceCell<Weak<Page>>> = Rc::default();
        let reveal = match Self::reveal_observer(&config, slot.clone()) {
            Ok(reveal) => reveal,
            Err(e) => {
                warn!("Reveal observer rejected config ({}), using defaults", e);
                Self::reveal_observer(&SiteConfig::default(), slot.clone())?
            }
        };

        let page = Rc::new(Page {
            dom,
            session,
            scheduler,
            config,
            reveal,
            resize,
            bindings: RefCell::new(Vec::new()),
        });
        let _ = slot.set(Rc::downgrade(&page));

        let controller = Self { page };
        controller.bind_lifecycle()?;
        info!("Page behaviours installed");
        Ok(controller)
    }

    fn reveal_observer(
        config: &SiteConfig,
        slot: Rc<OnceCell<Weak<Page>>>,
    ) -> Result<RevealObserver<BrowserViewportObserver>, SiteError> {
        let observer = BrowserViewportObserver::new(
            config.reveal_threshold,
            &config.reveal_root_margin,
            move |target: Element, is_intersecting| {
                let Some(page) = slot.get().and_then(Weak::upgrade) else {
                    return;
                };
                if let Err(e) = page.reveal.handle_entry(&target, is_intersecting) {
                    error!("Reveal failed: {}", e);
                }
            },
        )?;
        Ok(RevealObserver::new(observer, config.reveal_animation.clone()))
    }

    fn bind_lifecycle(&self) -> Result<(), SiteError> {
        let page = &self.page;
        let document: EventTarget = page.dom.document().clone().into();
        let window: EventTarget = page.dom.window().clone().into();

        let ready_state = page.dom.document().ready_state();
        let plan = lifecycle_plan(&ready_state);
        debug!("Document is {}: {:?}", ready_state, plan);

        if plan.run_ready_now {
            page.on_ready();
        } else {
            let weak = Rc::downgrade(page);
            page.listen(&document, "DOMContentLoaded", move |_| {
                if let Some(page) = weak.upgrade() {
                    page.on_ready();
                }
            })?;
        }

        if plan.scroll_now {
            scroll_to_top(&page.dom);
        } else {
            let weak = Rc::downgrade(page);
            page.listen(&window, "load", move |_| {
                if let Some(page) = weak.upgrade() {
                    scroll_to_top(&page.dom);
                }
            })?;
        }

        let weak = Rc::downgrade(page);
        page.listen(&window, "resize", move |_| {
            if let Some(page) = weak.upgrade() {
                page.resize.call(());
            }
        })?;

        let weak = Rc::downgrade(page);
        page.listen(&document, "keydown", move |event: Event| {
            let Some(page) = weak.upgrade() else { return };
            if let Err(e) = handle_keydown(&page.dom, &event) {
                error!("Shortcut failed: {}", e);
            }
        })?;

        Ok(())
    }

    pub fn logout(&self) -> Result<(), SiteError> {
        session::logout(&self.page.dom, self.page.session.as_ref())
    }

    pub fn is_logged_in(&self) -> bool {
        session::is_logged_in(self.page.session.as_ref())
    }

    /// Removes every listener, stops the reveal observer and cancels pending
    /// resize work. Typing animations already running finish on their own.
    pub fn teardown(&self) {
        self.page.bindings.borrow_mut().clear();
        self.page.reveal.teardown();
        self.page.resize.cancel();
        debug!(
            "Page behaviours detached, {} timers still pending",
            self.page.scheduler.pending_count()
        );
    }
}

impl Drop for PageController {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl Page {
    fn listen<F>(&self, target: &EventTarget, event: &'static str, handler: F) -> Result<(), SiteError>
    where
        F: FnMut(Event) + 'static,
    {
        let binding = EventBinding::listen(target, event, handler)?;
        debug!("Listening for {}", binding.event());
        self.bindings.borrow_mut().push(binding);
        Ok(())
    }

    fn on_ready(self: &Rc<Self>) {
        let report = run_ready_behaviors(&self.dom, self.scheduler.clone(), &self.config, &self.reveal);
        debug!("Ready: {:?}", report);

        if let Err(e) = self.bind_anchor_links() {
            error!("Failed to bind anchor links: {}", e);
        }
        if let Err(e) = self.bind_login_form() {
            error!("Failed to bind login form: {}", e);
        }
    }

    fn bind_anchor_links(self: &Rc<Self>) -> Result<(), SiteError> {
        for anchor in self.dom.query_selector_all(ANCHOR_LINK_SELECTOR)? {
            let weak = Rc::downgrade(self);
            let link = anchor.clone();
            self.listen(&anchor, "click", move |event: Event| {
                event.prevent_default();
                let (Some(page), Some(href)) = (weak.upgrade(), link.get_attribute("href")) else {
                    return;
                };
                if let Err(e) = scroll_to_anchor(&page.dom, &href) {
                    warn!("Cannot scroll to {}: {}", href, e);
                }
            })?;
        }
        Ok(())
    }

    fn bind_login_form(self: &Rc<Self>) -> Result<(), SiteError> {
        let Some(field) = self.dom.element_by_id(EMPLOYEE_ID_FIELD) else {
            return Ok(());
        };
        let Some(form) = field.closest("form")? else {
            return Ok(());
        };

        let weak = Rc::downgrade(self);
        self.listen(&form, "submit", move |event: Event| {
            let Some(page) = weak.upgrade() else {
                event.prevent_default();
                return;
            };
            match handle_login_submit(&page.dom, page.session.as_ref(), &event) {
                Ok(outcome) => debug!("Login submission: {:?}", outcome),
                Err(e) => error!("Login submission failed: {}", e),
            }
        })
    }
}
