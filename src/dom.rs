use std::fmt;

use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, Window};

pub(crate) const TILE_QUERY: &str = ".grid > button";
pub(crate) const DESELECT_LABEL: &str = "Deselect All";
pub(crate) const STYLE_TAG_ID: &str = "kumiwake-style";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InitError {
    NoWindow,
    NoDocument,
    StylesheetRejected,
    MissingTiles,
    MissingDeselectControl,
    ObserverRejected,
}

impl fmt::Display for InitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InitError::NoWindow => write!(f, "window unavailable"),
            InitError::NoDocument => write!(f, "document unavailable"),
            InitError::StylesheetRejected => write!(f, "stylesheet injection failed"),
            InitError::MissingTiles => write!(f, "no tile buttons found"),
            InitError::MissingDeselectControl => write!(f, "deselect all button not found"),
            InitError::ObserverRejected => write!(f, "mutation observer setup failed"),
        }
    }
}

impl std::error::Error for InitError {}

pub(crate) fn window() -> Result<Window, InitError> {
    web_sys::window().ok_or(InitError::NoWindow)
}

pub(crate) fn document() -> Result<Document, InitError> {
    window()?.document().ok_or(InitError::NoDocument)
}

pub(crate) fn query_tiles(document: &Document) -> Result<Vec<HtmlElement>, InitError> {
    let nodes = document
        .query_selector_all(TILE_QUERY)
        .map_err(|_| InitError::MissingTiles)?;
    let mut tiles = Vec::with_capacity(nodes.length() as usize);
    for index in 0..nodes.length() {
        let Some(node) = nodes.get(index) else {
            continue;
        };
        if let Ok(tile) = node.dyn_into::<HtmlElement>() {
            tiles.push(tile);
        }
    }
    if tiles.is_empty() {
        return Err(InitError::MissingTiles);
    }
    Ok(tiles)
}

pub(crate) fn grid_container(tiles: &[HtmlElement]) -> Result<Element, InitError> {
    tiles
        .first()
        .and_then(|tile| tile.parent_element())
        .ok_or(InitError::MissingTiles)
}

pub(crate) fn find_deselect_control(document: &Document) -> Result<HtmlElement, InitError> {
    let buttons = document
        .query_selector_all("button")
        .map_err(|_| InitError::MissingDeselectControl)?;
    for index in 0..buttons.length() {
        let Some(node) = buttons.get(index) else {
            continue;
        };
        let Ok(button) = node.dyn_into::<HtmlElement>() else {
            continue;
        };
        let label = button.text_content().unwrap_or_default();
        if label.contains(DESELECT_LABEL) {
            return Ok(button);
        }
    }
    Err(InitError::MissingDeselectControl)
}

pub(crate) fn inject_stylesheet(document: &Document, css: &str) -> Result<(), InitError> {
    if document.get_element_by_id(STYLE_TAG_ID).is_some() {
        return Ok(());
    }
    let head = document.head().ok_or(InitError::StylesheetRejected)?;
    let style = document
        .create_element("style")
        .map_err(|_| InitError::StylesheetRejected)?;
    style.set_id(STYLE_TAG_ID);
    style.set_text_content(Some(css));
    head.append_child(&style)
        .map_err(|_| InitError::StylesheetRejected)?;
    Ok(())
}
