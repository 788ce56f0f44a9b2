use std::rc::Rc;

use js_sys::Array;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlElement, MutationObserver, MutationObserverInit, MutationRecord};

use crate::dom::InitError;
use kumiwake_core::TileId;

pub(crate) enum GridEvent {
    CorrectGuess,
    ClassReset(TileId),
}

pub(crate) type GridHandler = Rc<dyn Fn(GridEvent)>;

pub(crate) struct GridWatcher {
    children: MutationObserver,
    classes: MutationObserver,
    _on_children: Closure<dyn FnMut(Array, MutationObserver)>,
    _on_classes: Closure<dyn FnMut(Array, MutationObserver)>,
}

impl GridWatcher {
    pub(crate) fn observe(
        container: &Element,
        tiles: Rc<Vec<HtmlElement>>,
        handler: GridHandler,
    ) -> Result<Self, InitError> {
        let on_children = {
            let handler = Rc::clone(&handler);
            Closure::wrap(Box::new(move |records: Array, _observer: MutationObserver| {
                for record in records.iter() {
                    let Ok(record) = record.dyn_into::<MutationRecord>() else {
                        continue;
                    };
                    let Some(first) = record.added_nodes().get(0) else {
                        continue;
                    };
                    if first.node_name() == "DIV" {
                        handler(GridEvent::CorrectGuess);
                    }
                }
            }) as Box<dyn FnMut(Array, MutationObserver)>)
        };
        let children = MutationObserver::new(on_children.as_ref().unchecked_ref())
            .map_err(|_| InitError::ObserverRejected)?;
        let init = MutationObserverInit::new();
        init.set_child_list(true);
        children
            .observe_with_options(container, &init)
            .map_err(|_| InitError::ObserverRejected)?;

        let on_classes = {
            let handler = Rc::clone(&handler);
            let tiles = Rc::clone(&tiles);
            Closure::wrap(Box::new(move |records: Array, _observer: MutationObserver| {
                for record in records.iter() {
                    let Ok(record) = record.dyn_into::<MutationRecord>() else {
                        continue;
                    };
                    let Some(target) = record.target() else {
                        continue;
                    };
                    let index = tiles
                        .iter()
                        .position(|tile| tile.is_same_node(Some(&target)));
                    if let Some(index) = index {
                        handler(GridEvent::ClassReset(TileId::new(index as u32)));
                    }
                }
            }) as Box<dyn FnMut(Array, MutationObserver)>)
        };
        let classes = MutationObserver::new(on_classes.as_ref().unchecked_ref())
            .map_err(|_| InitError::ObserverRejected)?;
        let init = MutationObserverInit::new();
        init.set_subtree(true);
        let filter = Array::of1(&"class".into());
        init.set_attribute_filter(&filter);
        classes
            .observe_with_options(container, &init)
            .map_err(|_| InitError::ObserverRejected)?;

        Ok(Self {
            children,
            classes,
            _on_children: on_children,
            _on_classes: on_classes,
        })
    }
}

impl Drop for GridWatcher {
    fn drop(&mut self) {
        self.children.disconnect();
        self.classes.disconnect();
    }
}
