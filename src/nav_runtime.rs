use std::cell::RefCell;
use std::rc::Rc;

use gloo::events::EventListener;
use gloo::timers::future::TimeoutFuture;
use js_sys::Reflect;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Event, Window};

use crate::dom;
use crate::persisted::{self, Config};
use crate::session::PageSession;

const PUZZLE_URL_PREFIX: &str = "https://craftconnections.net/puzzle/";
const ROOT_URL: &str = "https://craftconnections.net/";

fn should_boot(url: &str) -> bool {
    url.starts_with(PUZZLE_URL_PREFIX) || url == ROOT_URL
}

fn should_rearm(url: &str) -> bool {
    url.starts_with(PUZZLE_URL_PREFIX)
}

struct NavRuntime {
    session: Option<Rc<PageSession>>,
    armed_href: Option<String>,
    epoch: u64,
}

impl NavRuntime {
    fn new() -> Self {
        Self {
            session: None,
            armed_href: None,
            epoch: 0,
        }
    }
}

thread_local! {
    static RUNTIME: RefCell<NavRuntime> = RefCell::new(NavRuntime::new());
}

pub(crate) fn boot() {
    let Ok(window) = dom::window() else {
        return;
    };
    let href = window.location().href().unwrap_or_default();
    gloo::console::log!("kumiwake: boot at", href.clone());
    if should_boot(&href) {
        arm(&href);
    }
    if !urlchange_supported(&window) {
        gloo::console::log!("kumiwake: no urlchange support, single init");
        return;
    }
    EventListener::new(&window, "urlchange", move |_event: &Event| {
        let Ok(window) = dom::window() else {
            return;
        };
        let href = window.location().href().unwrap_or_default();
        if should_rearm(&href) {
            arm(&href);
        } else {
            disarm();
        }
    })
    .forget();
}

// A present-but-null onurlchange slot means the host fires urlchange.
fn urlchange_supported(window: &Window) -> bool {
    Reflect::get(window, &JsValue::from_str("onurlchange"))
        .map(|slot| slot.is_null())
        .unwrap_or(false)
}

pub(crate) fn arm(href: &str) {
    let mut stale = None;
    let armed = RUNTIME.with(|slot| {
        let mut runtime = slot.borrow_mut();
        if runtime.armed_href.as_deref() == Some(href) {
            return None;
        }
        stale = runtime.session.take();
        runtime.armed_href = Some(href.to_owned());
        runtime.epoch += 1;
        Some(runtime.epoch)
    });
    if let Some(session) = stale {
        session.teardown();
    }
    let Some(epoch) = armed else {
        return;
    };
    let config = persisted::load_config();
    spawn_local(poll_until_ready(epoch, config));
}

pub(crate) fn disarm() {
    let stale = RUNTIME.with(|slot| {
        let mut runtime = slot.borrow_mut();
        runtime.armed_href = None;
        runtime.epoch += 1;
        runtime.session.take()
    });
    if let Some(session) = stale {
        session.teardown();
        gloo::console::log!("kumiwake: left the puzzle, detached");
    }
}

pub(crate) fn current_epoch() -> u64 {
    RUNTIME.with(|slot| slot.borrow().epoch)
}

fn tiles_present() -> bool {
    let Ok(document) = dom::document() else {
        return false;
    };
    document
        .query_selector(dom::TILE_QUERY)
        .ok()
        .flatten()
        .is_some()
}

async fn poll_until_ready(epoch: u64, config: Config) {
    loop {
        if current_epoch() != epoch {
            return;
        }
        if tiles_present() {
            break;
        }
        TimeoutFuture::new(config.poll_interval_ms).await;
    }
    match PageSession::init(&config) {
        Ok(session) => {
            gloo::console::log!("kumiwake: session up, tiles", session.tile_count() as u32);
            RUNTIME.with(|slot| slot.borrow_mut().session = Some(session));
        }
        Err(error) => {
            gloo::console::error!("kumiwake: init failed:", error.to_string());
        }
    }
}
