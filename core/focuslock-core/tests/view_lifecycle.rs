//! Integration tests for view startup and teardown.
//!
//! A view must show the authoritative state the moment it opens, and must
//! stop ticking and listening once it is closed or dropped.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use focuslock_core::{
    Clock, LockState, RenderCommand, Renderer, UserIntent, View, ViewOptions, DEADLINE_KEY,
};
use focuslock_store::{DeadlineStore, MemoryStore};

struct ManualClock {
    now: AtomicU64,
}

impl ManualClock {
    fn at(now: u64) -> Arc<ManualClock> {
        Arc::new(ManualClock {
            now: AtomicU64::new(now),
        })
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}

#[derive(Default)]
struct RecordingRenderer {
    commands: Mutex<Vec<RenderCommand>>,
}

impl RecordingRenderer {
    fn len(&self) -> usize {
        self.commands.lock().unwrap().len()
    }

    fn last_state(&self) -> Option<LockState> {
        self.commands
            .lock()
            .unwrap()
            .last()
            .map(|command| command.state)
    }
}

impl Renderer for RecordingRenderer {
    fn render(&self, command: &RenderCommand) {
        self.commands.lock().unwrap().push(command.clone());
    }
}

fn manual_options() -> ViewOptions {
    ViewOptions {
        poll_interval_ms: 3_600_000,
        ..ViewOptions::default()
    }
}

fn wait_for(mut condition: impl FnMut() -> bool, timeout: Duration) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        thread::sleep(Duration::from_millis(5));
    }
    condition()
}

#[test]
fn test_open_evaluates_before_any_timer_fires() {
    let store = Arc::new(MemoryStore::new());
    store.set(DEADLINE_KEY, 45_000).unwrap();
    let renderer = Arc::new(RecordingRenderer::default());

    // Hour-long poll period: whatever the renderer saw came from open itself.
    let view = View::open(
        store,
        ManualClock::at(0),
        renderer.clone(),
        manual_options(),
    );

    assert_eq!(renderer.len(), 1);
    assert_eq!(
        renderer.last_state(),
        Some(LockState::Locked {
            remaining_ms: 45_000
        })
    );

    view.close();
}

#[test]
fn test_idle_unlocked_view_renders_exactly_once() {
    let store = Arc::new(MemoryStore::new());
    let renderer = Arc::new(RecordingRenderer::default());
    let view = View::open(
        store,
        ManualClock::at(0),
        renderer.clone(),
        manual_options(),
    );

    view.tick();
    view.tick();
    view.tick();

    // Unlocked and unchanged, so only the initial render went out.
    assert_eq!(renderer.len(), 1);

    view.close();
}

#[test]
fn test_close_stops_the_reconciliation_loop() {
    let store = Arc::new(MemoryStore::new());
    let clock = ManualClock::at(0);
    let renderer = Arc::new(RecordingRenderer::default());
    let view = View::open(
        store,
        clock,
        renderer.clone(),
        ViewOptions {
            poll_interval_ms: 10,
            ..ViewOptions::default()
        },
    );
    view.submit(UserIntent::StartLock {
        minutes: "60".to_string(),
    })
    .unwrap();

    // Locked views re-render on every tick, so the count keeps climbing
    // while the loop is alive.
    assert!(wait_for(
        || renderer.len() >= 4,
        Duration::from_secs(2)
    ));

    view.close();
    let settled = renderer.len();
    thread::sleep(Duration::from_millis(80));
    assert_eq!(renderer.len(), settled);
}

#[test]
fn test_close_cancels_the_change_subscription() {
    let store = Arc::new(MemoryStore::new());
    let renderer = Arc::new(RecordingRenderer::default());
    let view = View::open(
        store.clone(),
        ManualClock::at(0),
        renderer.clone(),
        manual_options(),
    );

    view.close();
    let settled = renderer.len();

    // A write from elsewhere must no longer reach the closed view.
    store.set(DEADLINE_KEY, 500_000).unwrap();
    assert_eq!(renderer.len(), settled);
}

#[test]
fn test_close_twice_is_harmless() {
    let store = Arc::new(MemoryStore::new());
    let renderer = Arc::new(RecordingRenderer::default());
    let view = View::open(
        store,
        ManualClock::at(0),
        renderer,
        manual_options(),
    );

    view.close();
    view.close();
}

#[test]
fn test_drop_without_close_winds_the_loop_down() {
    let store = Arc::new(MemoryStore::new());
    let clock = ManualClock::at(0);
    let renderer = Arc::new(RecordingRenderer::default());

    {
        let view = View::open(
            store,
            clock,
            renderer.clone(),
            ViewOptions {
                poll_interval_ms: 10,
                ..ViewOptions::default()
            },
        );
        view.submit(UserIntent::StartLock {
            minutes: "60".to_string(),
        })
        .unwrap();
        assert!(wait_for(
            || renderer.len() >= 2,
            Duration::from_secs(2)
        ));
    }

    // The loop thread may finish its current pass, then must go quiet.
    thread::sleep(Duration::from_millis(50));
    let settled = renderer.len();
    thread::sleep(Duration::from_millis(80));
    assert_eq!(renderer.len(), settled);
}
