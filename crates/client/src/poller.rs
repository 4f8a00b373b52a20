//! Fixed-interval polling with latest-value publication.
//!
//! A [`Poller`] owns a background task that calls a fetch function every
//! `period` and publishes each successful result on a `watch` channel.
//! Fetches never overlap: the next tick is only awaited after the current
//! fetch finishes, and ticks missed while a fetch was running collapse into
//! one, so a slow response can never overwrite a newer one. Failed fetches are
//! logged and the previously published value stays in place.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use shootdesk_core::types::DbId;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::client::PortalClient;
use crate::error::ClientError;
use crate::types::{ChatMessage, OrderSummary};

/// Default refresh period for the support conversation.
pub const MESSAGE_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Default refresh period for the order list.
pub const ORDER_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Handle to a running poll loop. Dropping it stops the loop.
pub struct Poller<T> {
    rx: watch::Receiver<Option<T>>,
    cancel: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl<T> Poller<T>
where
    T: Send + Sync + 'static,
{
    /// Start polling `fetch` every `period`, beginning immediately.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn<F, Fut>(name: &'static str, period: Duration, fetch: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, ClientError>> + Send + 'static,
    {
        let (tx, rx) = watch::channel(None);
        let cancel = CancellationToken::new();
        let handle = tokio::spawn(run(name, period, fetch, tx, cancel.clone()));

        Self {
            rx,
            cancel,
            handle: Some(handle),
        }
    }

    /// A receiver that sees every newly published value.
    pub fn subscribe(&self) -> watch::Receiver<Option<T>> {
        self.rx.clone()
    }

    /// Stop polling and wait for an in-flight fetch to be abandoned.
    pub async fn stop(mut self) {
        self.cancel.cancel();
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl<T: Clone> Poller<T> {
    /// Most recent successful result, if any fetch has succeeded yet.
    pub fn latest(&self) -> Option<T> {
        self.rx.borrow().clone()
    }
}

impl<T> Drop for Poller<T> {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn run<T, F, Fut>(
    name: &'static str,
    period: Duration,
    mut fetch: F,
    tx: watch::Sender<Option<T>>,
    cancel: CancellationToken,
) where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ClientError>>,
{
    tracing::debug!(poller = name, period_ms = period.as_millis() as u64, "Poller started");

    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {}
        }

        let result = tokio::select! {
            _ = cancel.cancelled() => break,
            result = fetch() => result,
        };

        match result {
            Ok(value) => {
                if tx.send(Some(value)).is_err() {
                    break;
                }
            }
            Err(e) => {
                tracing::warn!(poller = name, error = %e, "Poll failed; keeping previous value");
            }
        }
    }

    tracing::debug!(poller = name, "Poller stopped");
}

/// Poll the signed-in agent's order list every [`ORDER_POLL_INTERVAL`].
pub fn watch_orders(client: Arc<PortalClient>) -> Poller<Vec<OrderSummary>> {
    Poller::spawn("orders", ORDER_POLL_INTERVAL, move || {
        let client = Arc::clone(&client);
        async move { client.orders().await }
    })
}

/// Poll the support conversation every [`MESSAGE_POLL_INTERVAL`],
/// optionally narrowed to one order.
pub fn watch_messages(
    client: Arc<PortalClient>,
    order_id: Option<DbId>,
) -> Poller<Vec<ChatMessage>> {
    Poller::spawn("messages", MESSAGE_POLL_INTERVAL, move || {
        let client = Arc::clone(&client);
        async move { client.messages(order_id, None).await }
    })
}
