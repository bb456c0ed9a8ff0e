use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Monotonic change counter. Every mutation of session state bumps it so
/// read-only subscribers know to take a fresh snapshot.
#[derive(Clone, Debug)]
pub struct Revision(Arc<watch::Sender<u64>>);

impl Revision {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(0);
        Self(Arc::new(tx))
    }

    pub fn bump(&self) {
        self.0.send_modify(|revision| *revision += 1);
    }

    pub fn current(&self) -> u64 {
        *self.0.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.0.subscribe()
    }
}

/// Holds a busy flag for as long as it lives. Dropping it, including when the
/// owning future is cancelled, releases the flag.
#[derive(Debug)]
pub struct BusyGuard {
    flag: Arc<AtomicBool>,
    revision: Revision,
}

impl BusyGuard {
    /// `None` if the flag is already held.
    pub fn acquire(flag: &Arc<AtomicBool>, revision: &Revision) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()?;
        revision.bump();

        Some(Self {
            flag: flag.clone(),
            revision: revision.clone(),
        })
    }
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
        self.revision.bump();
    }
}

/// At most one pending background task plus the generation it was started
/// for. Restarting aborts the old task and invalidates its generation, so a
/// task that already got past its last await still checks `is_current`
/// before writing.
#[derive(Debug, Default)]
pub struct Timer {
    generation: u64,
    task: Option<JoinHandle<()>>,
}

impl Timer {
    pub fn restart(&mut self) -> u64 {
        self.generation += 1;
        if let Some(task) = self.task.take() {
            task.abort();
        }
        self.generation
    }

    pub fn set_task(&mut self, task: JoinHandle<()>) {
        self.task = Some(task);
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.generation == generation
    }
}

#[test]
fn busy_guard_is_exclusive_and_released_on_drop() {
    let flag = Arc::new(AtomicBool::new(false));
    let revision = Revision::new();

    let guard = BusyGuard::acquire(&flag, &revision).unwrap();
    assert!(BusyGuard::acquire(&flag, &revision).is_none());
    assert!(flag.load(Ordering::Acquire));

    drop(guard);
    assert!(!flag.load(Ordering::Acquire));
    assert!(BusyGuard::acquire(&flag, &revision).is_some());
    assert_eq!(revision.current(), 4);
}

#[test]
fn restart_invalidates_previous_generation() {
    let mut timer = Timer::default();

    let first = timer.restart();
    let second = timer.restart();

    assert!(!timer.is_current(first));
    assert!(timer.is_current(second));
}
