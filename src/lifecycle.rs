//! Mount/unmount bookkeeping
//!
//! A host registers one cleanup action per thing it attached (the pending
//! animation frame, each window listener, timers). [`Teardown::run`] executes
//! them exactly once and flips the shared [`CancelToken`] so a frame callback
//! that is already queued returns without drawing or re-scheduling.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use tracing::debug;

/// Shared "this mount is gone" flag, cloned into every callback.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Rc<Cell<bool>>);

impl CancelToken {
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.0.get()
    }

    fn cancel(&self) {
        self.0.set(true);
    }
}

/// One-shot cleanup list. Also runs on drop.
pub struct Teardown {
    label: &'static str,
    token: CancelToken,
    actions: Vec<(&'static str, Box<dyn FnOnce()>)>,
}

impl Teardown {
    pub fn new(label: &'static str) -> Self {
        Self { label, token: CancelToken::default(), actions: Vec::new() }
    }

    pub fn token(&self) -> CancelToken {
        self.token.clone()
    }

    /// Register a cleanup. Registering after teardown runs the action
    /// immediately, so late attachments never leak.
    pub fn on_teardown(&mut self, what: &'static str, action: impl FnOnce() + 'static) {
        if self.token.is_cancelled() {
            debug!(mount = self.label, what, "Late registration cleaned up immediately");
            action();
            return;
        }
        self.actions.push((what, Box::new(action)));
    }

    /// Number of cleanups still pending.
    pub fn pending(&self) -> usize {
        self.actions.len()
    }

    pub fn is_done(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Cancel and run every registered cleanup. Returns `false` when this
    /// mount was already torn down.
    pub fn run(&mut self) -> bool {
        if self.token.is_cancelled() {
            return false;
        }
        self.token.cancel();
        let actions = std::mem::take(&mut self.actions);
        debug!(mount = self.label, count = actions.len(), "Tearing down");
        // Reverse registration order: the frame loop stops before listeners go
        for (what, action) in actions.into_iter().rev() {
            debug!(mount = self.label, what, "Cleanup");
            action();
        }
        true
    }
}

impl Drop for Teardown {
    fn drop(&mut self) {
        self.run();
    }
}

impl fmt::Debug for Teardown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Teardown")
            .field("label", &self.label)
            .field("done", &self.is_done())
            .field("pending", &self.actions.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::core::{seeded, Recorder, Size};
    use crate::effect::{build, EffectKind, Scene};
    use crate::theme::Theme;
    use std::cell::RefCell;

    /// Stand-in for the browser's listener table.
    #[derive(Default)]
    struct FakeWindow {
        listeners: RefCell<Vec<&'static str>>,
        removals: Cell<usize>,
    }

    impl FakeWindow {
        fn add(self: &Rc<Self>, teardown: &mut Teardown, name: &'static str) {
            self.listeners.borrow_mut().push(name);
            let window = self.clone();
            teardown.on_teardown(name, move || {
                let mut listeners = window.listeners.borrow_mut();
                let pos = listeners.iter().position(|l| *l == name).expect("listener removed twice");
                listeners.remove(pos);
                window.removals.set(window.removals.get() + 1);
            });
        }
    }

    #[test]
    fn teardown_runs_each_cleanup_once() {
        let window = Rc::new(FakeWindow::default());
        let mut teardown = Teardown::new("test");
        window.add(&mut teardown, "resize");
        window.add(&mut teardown, "pointermove");
        window.add(&mut teardown, "scroll");
        assert_eq!(teardown.pending(), 3);

        assert!(teardown.run());
        assert!(!teardown.run(), "second run must be a no-op");
        drop(teardown);

        assert!(window.listeners.borrow().is_empty());
        assert_eq!(window.removals.get(), 3);
    }

    #[test]
    fn repeated_mount_cycles_leave_no_listeners() {
        let window = Rc::new(FakeWindow::default());
        for _ in 0..5 {
            let mut teardown = Teardown::new("cycle");
            window.add(&mut teardown, "resize");
            assert_eq!(window.listeners.borrow().len(), 1);
            teardown.run();
        }
        assert!(window.listeners.borrow().is_empty());
        assert_eq!(window.removals.get(), 5);
    }

    #[test]
    fn drop_tears_down() {
        let ran = Rc::new(Cell::new(0));
        {
            let mut teardown = Teardown::new("drop");
            let ran = ran.clone();
            teardown.on_teardown("frame", move || ran.set(ran.get() + 1));
        }
        assert_eq!(ran.get(), 1);
    }

    #[test]
    fn late_registration_runs_immediately() {
        let ran = Rc::new(Cell::new(false));
        let mut teardown = Teardown::new("late");
        teardown.run();
        let flag = ran.clone();
        teardown.on_teardown("resize", move || flag.set(true));
        assert!(ran.get());
        assert_eq!(teardown.pending(), 0);
    }

    #[test]
    fn cancelled_scene_stops_drawing() {
        let size = Size::new(800.0, 600.0);
        let mut scene = Scene::new(build(EffectKind::Field, size, &Config::default(), seeded(1)), Theme::Dark);
        let mut teardown = Teardown::new("scene");
        let token = teardown.token();
        let mut rec = Recorder::new(size);

        assert!(scene.step_if_live(&token, &mut rec, 0.0));
        assert!(!rec.is_empty());

        teardown.run();
        rec.take();
        // A frame callback that was already queued must not draw
        assert!(!scene.step_if_live(&token, &mut rec, 0.016));
        assert!(rec.is_empty());
        assert_eq!(scene.frames(), 1);
    }
}
