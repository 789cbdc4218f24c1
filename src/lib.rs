//! Study RPG client crate.
//!
//! Client-side controller for the server-rendered quiz pages: reveals one
//! question at a time, times the user, posts each answer to `/answer` and
//! renders the scored feedback. On battle pages the same session drives a
//! turn-based boss fight with health bars and a running score.
//!
//! The DOM/timer/network glue only exists on `wasm32`; the session state
//! machine, battle math and wire types are plain Rust so they build and test
//! on the host.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

pub mod session;

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Entry point invoked by the page after the module is loaded. Inspects the
/// rendered layout (training vs. battle), wires the answer form and shows the
/// first question.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn start_session() -> Result<(), JsValue> {
    session::controller::init()
}
