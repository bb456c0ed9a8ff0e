use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;

use super::helpers::{Revision, Timer};

#[derive(Debug, Default)]
struct Slot {
    timer: Timer,
    message: Option<String>,
}

/// Single transient message slot. Each message clears itself `ttl` after it
/// was shown unless a newer one replaced it first.
#[derive(Clone, Debug)]
pub struct Notifier {
    slot: Arc<Mutex<Slot>>,
    ttl: Duration,
    revision: Revision,
}

impl Notifier {
    pub fn new(ttl: Duration, revision: &Revision) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Slot::default())),
            ttl,
            revision: revision.clone(),
        }
    }

    pub async fn show(&self, message: String) {
        let mut slot = self.slot.lock().await;
        let generation = slot.timer.restart();
        slot.message = Some(message);

        let this = self.clone();
        slot.timer.set_task(tokio::spawn(async move {
            tokio::time::sleep(this.ttl).await;
            this.expire(generation).await;
        }));
        drop(slot);

        self.revision.bump();
    }

    async fn expire(&self, generation: u64) {
        let mut slot = self.slot.lock().await;
        if !slot.timer.is_current(generation) {
            return;
        }
        slot.message = None;
        drop(slot);

        self.revision.bump();
    }

    pub async fn current(&self) -> Option<String> {
        self.slot.lock().await.message.clone()
    }

    /// Stops the auto-clear timer, leaving the current message in place.
    pub async fn cancel(&self) {
        self.slot.lock().await.timer.restart();
    }
}

#[tokio::test(start_paused = true)]
async fn newer_message_restarts_the_clock() {
    let notifier = Notifier::new(Duration::from_secs(5), &Revision::new());

    notifier.show("Route copied".into()).await;
    tokio::time::sleep(Duration::from_secs(3)).await;
    notifier.show("Thank you".into()).await;

    tokio::time::sleep(Duration::from_millis(4900)).await;
    assert_eq!(notifier.current().await.as_deref(), Some("Thank you"));

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(notifier.current().await, None);
}

#[tokio::test(start_paused = true)]
async fn cancelled_timer_never_clears() {
    let notifier = Notifier::new(Duration::from_secs(5), &Revision::new());

    notifier.show("Saved".into()).await;
    notifier.cancel().await;
    tokio::time::sleep(Duration::from_secs(10)).await;

    assert_eq!(notifier.current().await.as_deref(), Some("Saved"));
}
