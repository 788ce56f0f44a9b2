use std::cell::RefCell;
use std::rc::Rc;

use gloo::events::{EventListener, EventListenerOptions, EventListenerPhase};
use web_sys::{Event, HtmlElement, PointerEvent, PointerEventInit};

use kumiwake_core::TileId;

pub(crate) type ToggleHandler = Rc<dyn Fn(TileId)>;

#[derive(Default)]
pub(crate) struct ClickGate {
    pending: RefCell<Vec<TileId>>,
}

impl ClickGate {
    pub(crate) fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub(crate) fn arm(&self, tile: TileId) {
        self.pending.borrow_mut().push(tile);
    }

    pub(crate) fn take(&self, tile: TileId) -> bool {
        let mut pending = self.pending.borrow_mut();
        match pending.iter().position(|entry| *entry == tile) {
            Some(index) => {
                pending.remove(index);
                true
            }
            None => false,
        }
    }

    pub(crate) fn disarm(&self, tile: TileId) {
        let mut pending = self.pending.borrow_mut();
        if let Some(index) = pending.iter().position(|entry| *entry == tile) {
            pending.remove(index);
        }
    }
}

pub(crate) fn intercept_clicks(
    tiles: &[HtmlElement],
    gate: &Rc<ClickGate>,
    on_toggle: ToggleHandler,
) -> Vec<EventListener> {
    let mut listeners = Vec::with_capacity(tiles.len());
    for (index, tile) in tiles.iter().enumerate() {
        let id = TileId::new(index as u32);
        let gate = Rc::clone(gate);
        let on_toggle = Rc::clone(&on_toggle);
        let options = EventListenerOptions {
            phase: EventListenerPhase::Capture,
            passive: false,
        };
        listeners.push(EventListener::new_with_options(
            tile,
            "click",
            options,
            move |event: &Event| {
                if gate.take(id) {
                    return;
                }
                event.stop_immediate_propagation();
                on_toggle(id);
            },
        ));
    }
    listeners
}

pub(crate) fn dispatch_native_click(gate: &ClickGate, tile: TileId, element: &HtmlElement) {
    gate.arm(tile);
    let init = PointerEventInit::new();
    init.set_bubbles(true);
    let Ok(event) = PointerEvent::new_with_event_init_dict("click", &init) else {
        gate.disarm(tile);
        return;
    };
    if element.dispatch_event(&event).is_err() {
        gate.disarm(tile);
    }
}
