use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use gloo::timers::future::TimeoutFuture;
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlElement;

use crate::intercept::{dispatch_native_click, ClickGate};
use kumiwake_core::TileId;

pub(crate) struct PromotionRunner {
    gate: Rc<ClickGate>,
    delay_ms: u32,
    queue: RefCell<VecDeque<Vec<(TileId, HtmlElement)>>>,
    running: Cell<bool>,
    epoch: Cell<u64>,
}

impl PromotionRunner {
    pub(crate) fn new(gate: Rc<ClickGate>, delay_ms: u32) -> Rc<Self> {
        Rc::new(Self {
            gate,
            delay_ms,
            queue: RefCell::new(VecDeque::new()),
            running: Cell::new(false),
            epoch: Cell::new(0),
        })
    }

    pub(crate) fn enqueue(self: &Rc<Self>, batch: Vec<(TileId, HtmlElement)>) {
        if batch.is_empty() {
            return;
        }
        self.queue.borrow_mut().push_back(batch);
        if self.running.get() {
            return;
        }
        self.running.set(true);
        let runner = Rc::clone(self);
        let epoch = self.epoch.get();
        spawn_local(async move {
            runner.drain(epoch).await;
        });
    }

    pub(crate) fn cancel(&self) {
        self.epoch.set(self.epoch.get() + 1);
        self.queue.borrow_mut().clear();
        self.running.set(false);
    }

    async fn drain(&self, epoch: u64) {
        loop {
            if self.epoch.get() != epoch {
                return;
            }
            let Some(batch) = self.queue.borrow_mut().pop_front() else {
                break;
            };
            for (tile, element) in batch {
                TimeoutFuture::new(self.delay_ms).await;
                if self.epoch.get() != epoch {
                    return;
                }
                dispatch_native_click(&self.gate, tile, &element);
            }
        }
        self.running.set(false);
    }
}
