//! Event Scheduler
//!
//! Carries out the [`Effect`]s returned by the router. Each effect becomes a
//! small tokio task that eventually pushes one [`SessionEvent`] into the
//! session channel:
//!
//! - [`Effect::ScheduleTick`]: sleep one refresh period, then send `Tick`.
//! - [`Effect::Reload`]: read the tips file on the blocking pool, then send
//!   `ReloadCompleted`.
//!
//! Ticks are self-rescheduling through the router (each `Tick` yields the next
//! `ScheduleTick`), so refresh and reload share one clock. Key capture is a
//! third producer owned by the terminal host and feeds the same channel; the
//! channel is the only ordering point (FIFO, no priorities).

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::events::{Effect, SessionEvent};
use crate::router::SessionRouter;
use crate::session::SessionState;
use crate::storage::TipStore;

/// Sender half of the session channel
pub type EventSender = mpsc::UnboundedSender<SessionEvent>;

/// Receiver half of the session channel
pub type EventReceiver = mpsc::UnboundedReceiver<SessionEvent>;

/// Create the session channel
#[must_use]
pub fn event_channel() -> (EventSender, EventReceiver) {
    mpsc::unbounded_channel()
}

/// Runs timer and reload tasks on behalf of the router
pub struct Scheduler<S: TipStore + 'static> {
    period: Duration,
    store: Arc<S>,
    tx: EventSender,
    tasks: JoinSet<()>,
}

impl<S: TipStore + 'static> Scheduler<S> {
    /// Scheduler delivering events to `tx`
    pub fn new(period: Duration, store: Arc<S>, tx: EventSender) -> Self {
        Self {
            period,
            store,
            tx,
            tasks: JoinSet::new(),
        }
    }

    /// Start a task for each effect
    ///
    /// Must be called from within a tokio runtime.
    pub fn execute(&mut self, effects: impl IntoIterator<Item = Effect>) {
        while self.tasks.try_join_next().is_some() {}

        for effect in effects {
            match effect {
                Effect::ScheduleTick => self.schedule_tick(),
                Effect::Reload => self.reload(),
            }
        }
    }

    /// Number of timer and reload tasks not yet reaped
    #[must_use]
    pub fn outstanding(&self) -> usize {
        self.tasks.len()
    }

    /// Abort all outstanding tasks
    ///
    /// Events they would have sent are never delivered.
    pub fn shutdown(&mut self) {
        self.tasks.abort_all();
    }

    fn schedule_tick(&mut self) {
        let tx = self.tx.clone();
        let period = self.period;
        self.tasks.spawn(async move {
            tokio::time::sleep(period).await;
            let _ = tx.send(SessionEvent::Tick);
        });
    }

    fn reload(&mut self) {
        let tx = self.tx.clone();
        let store = Arc::clone(&self.store);
        self.tasks.spawn(async move {
            let event = match tokio::task::spawn_blocking(move || store.load()).await {
                Ok(Ok(collection)) => SessionEvent::ReloadCompleted(Ok(collection)),
                Ok(Err(e)) => SessionEvent::ReloadCompleted(Err(e.to_string())),
                Err(e) => SessionEvent::Error(format!("reload task failed: {e}")),
            };
            let _ = tx.send(event);
        });
    }
}

impl<S: TipStore + 'static> Drop for Scheduler<S> {
    fn drop(&mut self) {
        self.tasks.abort_all();
    }
}

/// Drive a session until it terminates or every producer is gone
///
/// Issues the router's start effects, calls `draw` once up front and again
/// after every event, and shuts the scheduler down on exit.
///
/// # Errors
///
/// Returns the first error produced by `draw`.
pub async fn run_session<S, R, F>(
    router: &mut SessionRouter<S, R>,
    scheduler: &mut Scheduler<S>,
    events: &mut EventReceiver,
    mut draw: F,
) -> anyhow::Result<()>
where
    S: TipStore + 'static,
    R: rand::Rng,
    F: FnMut(&SessionState) -> anyhow::Result<()>,
{
    scheduler.execute(router.start());
    let result = drive(router, scheduler, events, &mut draw).await;
    scheduler.shutdown();
    result
}

async fn drive<S, R, F>(
    router: &mut SessionRouter<S, R>,
    scheduler: &mut Scheduler<S>,
    events: &mut EventReceiver,
    draw: &mut F,
) -> anyhow::Result<()>
where
    S: TipStore + 'static,
    R: rand::Rng,
    F: FnMut(&SessionState) -> anyhow::Result<()>,
{
    draw(router.state())?;

    while !router.is_terminated() {
        let Some(event) = events.recv().await else {
            tracing::debug!("Session channel closed");
            break;
        };
        let effects = router.handle(event);
        scheduler.execute(effects);
        draw(router.state())?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::tests::MockStore;
    use crate::tip::tests::tip;
    use std::sync::atomic::Ordering;

    #[tokio::test]
    async fn test_schedule_tick_fires_after_period() {
        let store = Arc::new(MockStore::default());
        let (tx, mut rx) = event_channel();
        let mut scheduler = Scheduler::new(Duration::from_millis(20), store, tx);

        scheduler.execute([Effect::ScheduleTick]);
        assert!(rx.try_recv().is_err());

        let event = tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert!(matches!(event, SessionEvent::Tick));
    }

    #[tokio::test]
    async fn test_reload_delivers_collection() {
        let store = Arc::new(MockStore::with_tips(vec![tip("1", "git", "a")]));
        let (tx, mut rx) = event_channel();
        let mut scheduler = Scheduler::new(Duration::from_secs(3600), Arc::clone(&store), tx);

        scheduler.execute([Effect::Reload]);

        let event = tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .unwrap()
            .unwrap();
        match event {
            SessionEvent::ReloadCompleted(Ok(collection)) => assert_eq!(collection.len(), 1),
            other => panic!("unexpected event: {other:?}"),
        }
        assert_eq!(store.loads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_reload_failure_is_reported() {
        let store = Arc::new(MockStore::default());
        store.fail_load.store(true, Ordering::SeqCst);
        let (tx, mut rx) = event_channel();
        let mut scheduler = Scheduler::new(Duration::from_secs(3600), store, tx);

        scheduler.execute([Effect::Reload]);

        let event = tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .unwrap()
            .unwrap();
        match event {
            SessionEvent::ReloadCompleted(Err(message)) => assert!(message.contains("denied")),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_shutdown_cancels_pending_ticks() {
        let store = Arc::new(MockStore::default());
        let (tx, mut rx) = event_channel();
        let mut scheduler = Scheduler::new(Duration::from_millis(30), store, tx);

        scheduler.execute([Effect::ScheduleTick, Effect::ScheduleTick]);
        assert_eq!(scheduler.outstanding(), 2);
        scheduler.shutdown();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(rx.try_recv().is_err());
    }
}
