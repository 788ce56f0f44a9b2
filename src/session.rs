use std::cell::RefCell;
use std::rc::Rc;

use gloo::events::EventListener;
use web_sys::{Event, HtmlElement};

use crate::dom::{self, InitError};
use crate::intercept::{self, ClickGate};
use crate::observe::{GridEvent, GridHandler, GridWatcher};
use crate::persisted::Config;
use crate::promote::PromotionRunner;
use crate::tagger;
use kumiwake_core::{SelectionBoard, TileId, TileTag, ToggleOutcome};

// Handlers update the board first and write classes second.
pub(crate) struct PageSession {
    board: RefCell<SelectionBoard>,
    tiles: Rc<Vec<HtmlElement>>,
    gate: Rc<ClickGate>,
    runner: Rc<PromotionRunner>,
    listeners: RefCell<Vec<EventListener>>,
    watcher: RefCell<Option<GridWatcher>>,
}

impl PageSession {
    pub(crate) fn init(config: &Config) -> Result<Rc<Self>, InitError> {
        let document = dom::document()?;
        dom::inject_stylesheet(&document, tagger::STYLESHEET)?;
        let tiles = Rc::new(dom::query_tiles(&document)?);
        let container = dom::grid_container(&tiles)?;
        let deselect = dom::find_deselect_control(&document)?;

        let gate = ClickGate::new();
        let runner = PromotionRunner::new(Rc::clone(&gate), config.promotion_delay_ms);
        let session = Rc::new(Self {
            board: RefCell::new(SelectionBoard::new()),
            tiles: Rc::clone(&tiles),
            gate: Rc::clone(&gate),
            runner,
            listeners: RefCell::new(Vec::new()),
            watcher: RefCell::new(None),
        });

        let watcher = {
            let session = Rc::clone(&session);
            let handler: GridHandler = Rc::new(move |event| match event {
                GridEvent::CorrectGuess => session.handle_correct_guess(),
                GridEvent::ClassReset(tile) => session.handle_class_reset(tile),
            });
            GridWatcher::observe(&container, Rc::clone(&tiles), handler)?
        };

        for tile in tiles.iter() {
            tagger::apply(tile, TileTag::Item);
        }

        let mut listeners = {
            let session = Rc::clone(&session);
            intercept::intercept_clicks(
                &tiles,
                &gate,
                Rc::new(move |tile| session.handle_toggle(tile)),
            )
        };
        {
            let session = Rc::clone(&session);
            listeners.push(EventListener::new(
                &deselect,
                "click",
                move |_event: &Event| {
                    session.handle_deselect_all();
                },
            ));
        }

        *session.listeners.borrow_mut() = listeners;
        *session.watcher.borrow_mut() = Some(watcher);
        Ok(session)
    }

    pub(crate) fn teardown(&self) {
        self.listeners.borrow_mut().clear();
        self.watcher.borrow_mut().take();
        self.runner.cancel();
    }

    pub(crate) fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    fn handle_toggle(&self, tile: TileId) {
        let Some(element) = self.tiles.get(tile.index()).cloned() else {
            return;
        };
        let outcome = self.board.borrow_mut().toggle(tile);
        match outcome {
            ToggleOutcome::Selected { group } => {
                tagger::apply(&element, TileTag::Group(group));
                // Only group 0 is selected in the host page's own state.
                if group == 0 {
                    intercept::dispatch_native_click(&self.gate, tile, &element);
                }
            }
            ToggleOutcome::Released(outcome) => {
                tagger::remove(&element, TileTag::Group(outcome.group));
                self.rewrite_shifted(&outcome.shifted);
                self.enqueue_promotion(&outcome.promoted);
                if outcome.group == 0 {
                    intercept::dispatch_native_click(&self.gate, tile, &element);
                }
            }
        }
    }

    fn handle_correct_guess(&self) {
        let outcome = self.board.borrow_mut().consume_active();
        for tile in &outcome.consumed {
            if let Some(element) = self.tiles.get(tile.index()) {
                tagger::remove(element, TileTag::Group(0));
            }
        }
        self.rewrite_shifted(&outcome.shifted);
        self.enqueue_promotion(&outcome.promoted);
    }

    fn handle_deselect_all(&self) {
        let outcome = self.board.borrow_mut().clear();
        for &(tile, group) in &outcome.cleared {
            if let Some(element) = self.tiles.get(tile.index()) {
                tagger::remove(element, TileTag::Group(group));
            }
        }
    }

    fn handle_class_reset(&self, tile: TileId) {
        let Some(element) = self.tiles.get(tile.index()) else {
            return;
        };
        let expected = self.board.borrow().expected_tags(tile);
        tagger::reconcile(element, &expected);
    }

    fn rewrite_shifted(&self, shifted: &[(TileId, usize)]) {
        for &(tile, group) in shifted {
            let Some(element) = self.tiles.get(tile.index()) else {
                continue;
            };
            tagger::remove(element, TileTag::Group(group + 1));
            tagger::apply(element, TileTag::Group(group));
        }
    }

    fn enqueue_promotion(&self, promoted: &[TileId]) {
        if promoted.is_empty() {
            return;
        }
        let batch = promoted
            .iter()
            .filter_map(|tile| {
                self.tiles
                    .get(tile.index())
                    .map(|element| (*tile, element.clone()))
            })
            .collect();
        self.runner.enqueue(batch);
    }
}
