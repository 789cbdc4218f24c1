//! Cancellable `setTimeout` plumbing: the per-question elapsed-time tick and
//! one-shot deferred tasks for delayed transitions and transient effects.
//!
//! Every pending callback is owned by a value tied to the session, so tearing
//! the session down (or replacing the timer on question entry) cancels the
//! browser-side timeout instead of leaving it to fire into stale state.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::window;

use super::{TICK_MS, dom, format_elapsed};

type SharedClosure = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

// --- Elapsed-time tick -------------------------------------------------------

/// Repeating one-second tick rendering `MM:SS` into the timer display.
/// Each instance keeps at most one pending timeout; starting a new timer for
/// the next question drops (and thereby cancels) the previous one.
pub(crate) struct TickTimer {
    handle: Rc<Cell<Option<i32>>>,
    closure: SharedClosure,
}

impl TickTimer {
    /// Render once immediately, then re-render every second relative to
    /// `started_ms` (a `performance.now()` timestamp).
    pub(crate) fn start(started_ms: f64) -> Self {
        render_elapsed(started_ms);

        let handle: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));
        let closure: SharedClosure = Rc::new(RefCell::new(None));
        let h = handle.clone();
        let c = closure.clone();
        *closure.borrow_mut() = Some(Closure::wrap(Box::new(move || {
            render_elapsed(started_ms);
            h.set(arm(&c));
        }) as Box<dyn FnMut()>));
        handle.set(arm(&closure));

        TickTimer { handle, closure }
    }

    pub(crate) fn cancel(&mut self) {
        if let Some(id) = self.handle.take() {
            if let Some(win) = window() {
                win.clear_timeout_with_handle(id);
            }
        }
        // Break the closure's self-reference cycle so it can be freed.
        self.closure.borrow_mut().take();
    }
}

impl Drop for TickTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}

fn arm(closure: &SharedClosure) -> Option<i32> {
    let win = window()?;
    let guard = closure.borrow();
    let cb = guard.as_ref()?;
    win.set_timeout_with_callback_and_timeout_and_arguments_0(
        cb.as_ref().unchecked_ref(),
        TICK_MS,
    )
    .ok()
}

fn render_elapsed(started_ms: f64) {
    let Some(doc) = dom::document() else { return };
    let elapsed = ((dom::now_ms() - started_ms) / 1000.0).max(0.0) as u64;
    dom::set_text_by_id(&doc, "question-timer", &format_elapsed(elapsed));
}

// --- One-shot deferred tasks -------------------------------------------------

/// A `FnOnce` scheduled on the event loop after a delay. Dropping the value
/// before it fires cancels the timeout; `fired()` lets the owner prune
/// completed effects. The owner must not drop a `Deferred` from inside its
/// own callback (the closure would be freed mid-invocation).
pub(crate) struct Deferred {
    handle: Option<i32>,
    fired: Rc<Cell<bool>>,
    _closure: Option<Closure<dyn FnMut()>>,
}

impl Deferred {
    pub(crate) fn new<F: FnOnce() + 'static>(delay_ms: i32, task: F) -> Self {
        let fired = Rc::new(Cell::new(false));
        let done = fired.clone();
        let mut task = Some(task);
        let closure = Closure::wrap(Box::new(move || {
            done.set(true);
            if let Some(task) = task.take() {
                task();
            }
        }) as Box<dyn FnMut()>);
        let handle = window().and_then(|win| {
            win.set_timeout_with_callback_and_timeout_and_arguments_0(
                closure.as_ref().unchecked_ref(),
                delay_ms,
            )
            .ok()
        });
        Deferred {
            handle,
            fired,
            _closure: Some(closure),
        }
    }

    pub(crate) fn fired(&self) -> bool {
        self.fired.get()
    }

    pub(crate) fn cancel(&mut self) {
        if let Some(id) = self.handle.take() {
            if let Some(win) = window() {
                win.clear_timeout_with_handle(id);
            }
        }
    }
}

impl Drop for Deferred {
    fn drop(&mut self) {
        self.cancel();
    }
}
