mod dom;
mod intercept;
mod nav_runtime;
mod observe;
mod persisted;
mod promote;
mod session;
mod tagger;

use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    nav_runtime::boot();
}

#[wasm_bindgen]
pub fn save_settings(promotion_delay_ms: u32, poll_interval_ms: u32) {
    persisted::save_settings(promotion_delay_ms, poll_interval_ms);
}
