//! Timer-driven typed insertion.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use tracing::warn;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;

use promptdock_core::typing::{TYPING_INTERVAL_MS, TickOutcome, TypingSession};

use crate::surface::DomSurface;

/// A typed-insertion run scheduled on the page's timer queue.
///
/// Each timer tick places one character through [`TypingSession::tick`] and
/// reschedules itself until the session reports completion. Dropping the
/// task cancels the pending tick, so storing a new task in the same slot
/// aborts the previous run mid-word and the newest request wins.
pub struct TypingTask {
    inner: Rc<TaskInner>,
}

struct TaskInner {
    surface: DomSurface,
    session: RefCell<TypingSession>,
    timeout: Cell<Option<i32>>,
    tick: RefCell<Option<Closure<dyn FnMut()>>>,
}

impl TypingTask {
    /// Start ticking `session` against `surface`.
    pub fn start(surface: DomSurface, session: TypingSession) -> Self {
        let inner = Rc::new(TaskInner {
            surface,
            session: RefCell::new(session),
            timeout: Cell::new(None),
            tick: RefCell::new(None),
        });

        let tick_inner = Rc::clone(&inner);
        let tick = Closure::wrap(Box::new(move || {
            tick_inner.timeout.set(None);
            let outcome = tick_inner.session.borrow_mut().tick(&tick_inner.surface);
            if matches!(outcome, TickOutcome::Typed) {
                tick_inner.schedule();
            }
        }) as Box<dyn FnMut()>);

        *inner.tick.borrow_mut() = Some(tick);
        inner.schedule();
        Self { inner }
    }

    /// Whether a tick is still pending.
    pub fn is_active(&self) -> bool {
        self.inner.timeout.get().is_some()
    }
}

impl TaskInner {
    fn schedule(&self) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let tick = self.tick.borrow();
        let Some(closure) = tick.as_ref() else {
            return;
        };
        match window.set_timeout_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            TYPING_INTERVAL_MS as i32,
        ) {
            Ok(handle) => self.timeout.set(Some(handle)),
            Err(err) => warn!(?err, "typing tick not scheduled"),
        }
    }
}

impl Drop for TypingTask {
    fn drop(&mut self) {
        if let Some(handle) = self.inner.timeout.take() {
            if let Some(window) = web_sys::window() {
                window.clear_timeout_with_handle(handle);
            }
        }
        // The tick closure holds an Rc back to the inner state; taking it
        // out breaks the cycle once the last handle is gone.
        self.inner.tick.borrow_mut().take();
    }
}
