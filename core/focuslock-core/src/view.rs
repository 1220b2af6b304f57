//! One open view of the blocked site: machine + renderer + subscription +
//! reconciler.
//!
//! Opening a view derives its state from the register immediately (a view
//! opened mid-lock must block right away, never assume unlocked), registers a
//! best-effort change listener, and starts the reconciliation loop. The loop
//! and the listener both hold only weak handles, so a view that is dropped
//! cannot be kept alive or ticked by its own machinery.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing::{debug, info};

use focuslock_store::{DeadlineStore, Subscription};

use crate::clock::Clock;
use crate::error::Result;
use crate::machine::{LockMachine, LockState};
use crate::options::ViewOptions;
use crate::reconcile::Reconciler;
use crate::render::{RenderCommand, Renderer, UserIntent};

pub struct View {
    machine: LockMachine,
    renderer: Arc<dyn Renderer>,
    // Last state handed to the renderer. Display bookkeeping only; never
    // consulted as lock authority.
    last_rendered: Mutex<Option<LockState>>,
    reconciler: Mutex<Option<Reconciler>>,
    subscription: Mutex<Option<Subscription>>,
}

impl View {
    pub fn open(
        store: Arc<dyn DeadlineStore>,
        clock: Arc<dyn Clock>,
        renderer: Arc<dyn Renderer>,
        options: ViewOptions,
    ) -> Arc<View> {
        let machine = LockMachine::with_key(store.clone(), clock, options.deadline_key.clone());
        let view = Arc::new(View {
            machine,
            renderer,
            last_rendered: Mutex::new(None),
            subscription: Mutex::new(None),
            reconciler: Mutex::new(None),
        });

        // First evaluation happens before any timer or listener exists.
        view.tick();

        let weak = Arc::downgrade(&view);
        let subscription = store.subscribe(
            &options.deadline_key,
            Arc::new(move |_, _| {
                if let Some(view) = weak.upgrade() {
                    view.tick();
                }
            }),
        );
        if let Ok(mut slot) = view.subscription.lock() {
            *slot = Some(subscription);
        }

        let weak = Arc::downgrade(&view);
        let reconciler = Reconciler::start(
            Duration::from_millis(options.poll_interval_ms),
            move || {
                if let Some(view) = weak.upgrade() {
                    view.tick();
                }
            },
        );
        if let Ok(mut slot) = view.reconciler.lock() {
            *slot = Some(reconciler);
        }

        info!(
            poll_interval_ms = options.poll_interval_ms,
            key = %options.deadline_key,
            "view opened"
        );
        view
    }

    /// One reconciliation pass: read the register, derive (and heal), render
    /// if warranted. Also runs on every change notification.
    pub fn tick(&self) {
        let state = self.machine.resolve();
        self.apply(state);
    }

    /// Current state, straight from the register.
    pub fn state(&self) -> LockState {
        self.machine.resolve()
    }

    /// Routes a user intent from the renderer into the machine.
    ///
    /// The outcome renders in this view immediately; other views learn of it
    /// from their change listener or their next tick. Validation failures
    /// come back to the caller and change nothing.
    pub fn submit(&self, intent: UserIntent) -> Result<()> {
        match intent {
            UserIntent::StartLock { minutes } => {
                let state = self.machine.request_start(&minutes)?;
                self.apply(state);
                Ok(())
            }
            UserIntent::EarlyUnlock { confirmed } => {
                let state = self.machine.request_early_unlock(confirmed);
                self.apply(state);
                Ok(())
            }
        }
    }

    /// Stops the reconciliation loop (joining its thread) and cancels the
    /// change subscription. Idempotent. Must not be called from inside a
    /// render callback; dropping the last `Arc<View>` instead signals the
    /// loop without joining.
    pub fn close(&self) {
        let reconciler = match self.reconciler.lock() {
            Ok(mut slot) => slot.take(),
            Err(_) => None,
        };
        if let Some(reconciler) = reconciler {
            reconciler.stop();
        }

        let subscription = match self.subscription.lock() {
            Ok(mut slot) => slot.take(),
            Err(_) => None,
        };
        if let Some(subscription) = subscription {
            subscription.cancel();
        }
        debug!("view closed");
    }

    /// Renders when the state changed since the last render, or on every
    /// tick while locked (the countdown text advances).
    fn apply(&self, state: LockState) {
        let changed = match self.last_rendered.lock() {
            Ok(mut last) => {
                let changed = last.map_or(true, |previous| previous != state);
                *last = Some(state);
                changed
            }
            Err(_) => true,
        };
        if changed || state.is_locked() {
            self.renderer.render(&RenderCommand::for_state(state));
        }
    }
}
