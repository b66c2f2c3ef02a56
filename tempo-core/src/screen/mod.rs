//! Per-screen view models.
//!
//! Each screen owns one [`ScreenModel`], which moves through
//! `Idle -> Loading -> Ready | Failed` and back to `Loading` on every
//! re-trigger. Every fetch carries a [`FetchTicket`]; only the most recently
//! issued ticket may publish its result, so an older request that resolves
//! late never overwrites newer state. A failure clears any previous data.

use std::{
    future::Future,
    sync::atomic::{AtomicBool, AtomicU64, Ordering},
};

use tokio::sync::watch;
use tracing::{debug, warn};

use crate::error::{Result, WeatherError};

pub mod forecast;
pub mod history;
pub mod home;
pub mod search;

pub use forecast::ExtendedForecastScreen;
pub use history::HistoryScreen;
pub use home::HomeScreen;
pub use search::SearchScreen;

#[derive(Debug, Clone, PartialEq)]
pub enum ScreenState<T> {
    Idle,
    Loading,
    Ready(T),
    Failed(String),
}

impl<T> ScreenState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, ScreenState::Loading)
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            ScreenState::Ready(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ScreenState::Failed(msg) => Some(msg),
            _ => None,
        }
    }
}

/// Identifies one fetch started by [`ScreenModel::begin`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket(u64);

#[derive(Debug)]
pub struct ScreenModel<T> {
    name: &'static str,
    state: watch::Sender<ScreenState<T>>,
    latest: AtomicU64,
    unmounted: AtomicBool,
}

impl<T> ScreenModel<T> {
    pub fn new(name: &'static str) -> Self {
        let (state, _) = watch::channel(ScreenState::Idle);
        Self {
            name,
            state,
            latest: AtomicU64::new(0),
            unmounted: AtomicBool::new(false),
        }
    }

    /// Receiver that observes every published state.
    pub fn subscribe(&self) -> watch::Receiver<ScreenState<T>> {
        self.state.subscribe()
    }

    pub fn is_unmounted(&self) -> bool {
        self.unmounted.load(Ordering::SeqCst)
    }

    /// Start a fetch: invalidates every outstanding ticket and shows `Loading`.
    pub fn begin(&self) -> FetchTicket {
        let mut ticket = FetchTicket(0);
        self.state.send_if_modified(|state| {
            ticket = FetchTicket(self.latest.fetch_add(1, Ordering::SeqCst) + 1);
            if self.is_unmounted() {
                return false;
            }
            *state = ScreenState::Loading;
            true
        });
        ticket
    }

    /// Publish the outcome of `ticket`. Returns `false` when the ticket was
    /// superseded or the screen is gone, in which case nothing changes.
    pub fn finish(&self, ticket: FetchTicket, outcome: Result<T, String>) -> bool {
        let applied = self.state.send_if_modified(|state| {
            if self.is_unmounted() || self.latest.load(Ordering::SeqCst) != ticket.0 {
                return false;
            }
            *state = match outcome {
                Ok(data) => ScreenState::Ready(data),
                Err(msg) => ScreenState::Failed(msg),
            };
            true
        });

        if !applied {
            warn!(screen = self.name, ticket = ticket.0, "discarding stale result");
        }
        applied
    }

    /// Fail without a fetch (validation, permission). Supersedes in-flight fetches.
    pub fn fail_now(&self, message: impl Into<String>) {
        let ticket = self.begin();
        self.finish(ticket, Err(message.into()));
    }

    /// Run `fetch` under a fresh ticket, mapping any error to a user message.
    /// Returns `true` only when fresh data was published.
    pub async fn run<F>(&self, fetch: F, on_error: impl FnOnce(&WeatherError) -> String) -> bool
    where
        F: Future<Output = Result<T>>,
    {
        let ticket = self.begin();
        self.run_with(ticket, fetch, on_error).await
    }

    /// Like [`ScreenModel::run`], for a ticket taken before the fetch could
    /// be built (e.g. while waiting on a permission prompt).
    pub async fn run_with<F>(
        &self,
        ticket: FetchTicket,
        fetch: F,
        on_error: impl FnOnce(&WeatherError) -> String,
    ) -> bool
    where
        F: Future<Output = Result<T>>,
    {
        let outcome = fetch.await.map_err(|err| {
            warn!(screen = self.name, %err, "fetch failed");
            on_error(&err)
        });
        let succeeded = outcome.is_ok();
        self.finish(ticket, outcome) && succeeded
    }

    /// Detach the view: in-flight fetches can no longer publish.
    pub fn unmount(&self) {
        self.unmounted.store(true, Ordering::SeqCst);
        self.latest.fetch_add(1, Ordering::SeqCst);
        debug!(screen = self.name, "unmounted");
    }
}

impl<T: Clone> ScreenModel<T> {
    pub fn state(&self) -> ScreenState<T> {
        self.state.borrow().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_idle_and_moves_through_loading() {
        let model = ScreenModel::<u32>::new("test");
        assert_eq!(model.state(), ScreenState::Idle);

        let ticket = model.begin();
        assert!(model.state().is_loading());

        assert!(model.finish(ticket, Ok(7)));
        assert_eq!(model.state(), ScreenState::Ready(7));
    }

    #[test]
    fn older_ticket_cannot_overwrite_newer_result() {
        let model = ScreenModel::<&str>::new("test");

        let first = model.begin();
        let second = model.begin();

        assert!(model.finish(second, Ok("Olinda")));
        assert!(!model.finish(first, Ok("Recife")));
        assert_eq!(model.state(), ScreenState::Ready("Olinda"));
    }

    #[test]
    fn older_ticket_cannot_clear_loading_of_newer_fetch() {
        let model = ScreenModel::<u32>::new("test");

        let first = model.begin();
        let _second = model.begin();

        assert!(!model.finish(first, Err("boom".into())));
        assert!(model.state().is_loading());
    }

    #[test]
    fn failure_clears_previous_data() {
        let model = ScreenModel::<u32>::new("test");
        let t = model.begin();
        model.finish(t, Ok(1));

        let t = model.begin();
        model.finish(t, Err("falhou".into()));

        assert_eq!(model.state(), ScreenState::Failed("falhou".into()));
        assert!(model.state().ready().is_none());
    }

    #[test]
    fn fail_now_supersedes_in_flight_fetch() {
        let model = ScreenModel::<u32>::new("test");
        let pending = model.begin();

        model.fail_now("vazio");
        assert!(!model.finish(pending, Ok(3)));
        assert_eq!(model.state().error(), Some("vazio"));
    }

    #[test]
    fn unmount_blocks_pending_updates() {
        let model = ScreenModel::<u32>::new("test");
        let pending = model.begin();

        model.unmount();
        assert!(model.is_unmounted());
        assert!(!model.finish(pending, Ok(3)));
        assert!(model.state().is_loading());

        let after = model.begin();
        assert!(!model.finish(after, Ok(4)));
        assert!(model.state().is_loading());
    }

    #[tokio::test]
    async fn subscribers_observe_published_state() {
        let model = ScreenModel::<u32>::new("test");
        let mut rx = model.subscribe();

        let ok = model.run(async { Ok(42) }, |_| "erro".into()).await;
        assert!(ok);

        rx.changed().await.expect("sender alive");
        assert_eq!(*rx.borrow_and_update(), ScreenState::Ready(42));
    }

    #[tokio::test]
    async fn run_with_honors_ticket_taken_earlier() {
        let model = ScreenModel::<u32>::new("test");

        let early = model.begin();
        let later = model.begin();

        assert!(!model.run_with(early, async { Ok(1) }, |_| "erro".into()).await);
        assert!(model.state().is_loading());

        assert!(model.run_with(later, async { Ok(2) }, |_| "erro".into()).await);
        assert_eq!(model.state(), ScreenState::Ready(2));
    }

    #[tokio::test]
    async fn run_maps_errors_through_callback() {
        let model = ScreenModel::<u32>::new("test");

        let published = model
            .run(async { Err(WeatherError::Network("down".into())) }, |err| {
                assert!(err.is_network());
                "sem rede".to_string()
            })
            .await;

        assert!(!published);
        assert_eq!(model.state(), ScreenState::Failed("sem rede".into()));
    }
}
