use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use shared::event::describe_request;
use shared::{EventError, Order, OrderId, OrderState, ServerEvent};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::{
    Alert, ConnectionState, DEFAULT_ALERT_TTL, FrameSource, FrameStream, ListenerError,
    ReconnectPolicy, StopReason,
};
use crate::ClientResult;
use crate::board::{OrderBoard, StateUpdate};
use crate::http::OrderSource;
use crate::session::{KeyValueStore, SessionStore, StoreResult};

/// Notification endpoint for one user/restaurant pair
pub fn endpoint(ws_base: &str, user_id: i64, restaurant_id: i64) -> String {
    format!(
        "{}/ws/{}/{}",
        ws_base.trim_end_matches('/'),
        user_id,
        restaurant_id
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Purpose {
    Pending,
    Ready,
}

/// Finished detail fetch, sent back to the listener task
struct Resolution {
    order_id: OrderId,
    purpose: Purpose,
    result: ClientResult<Order>,
}

enum SessionEnd {
    Shutdown,
    Closed,
    Failed(ListenerError),
}

/// Order notification listener
///
/// Owns the board. Frames and fetch results are applied inside one task and
/// every change is published as a fresh snapshot.
pub struct NotificationListener<S, F> {
    url: String,
    source: S,
    orders: Arc<F>,
    policy: ReconnectPolicy,
    board: OrderBoard,
    board_tx: watch::Sender<OrderBoard>,
    state_tx: watch::Sender<ConnectionState>,
    alert_tx: mpsc::UnboundedSender<Alert>,
    alerts: Option<mpsc::UnboundedReceiver<Alert>>,
    resolve_tx: mpsc::UnboundedSender<Resolution>,
    resolve_rx: mpsc::UnboundedReceiver<Resolution>,
    /// Ready fetches in flight, so a repeated terminated event fetches once
    fetching_ready: HashSet<OrderId>,
    /// In-flight ready fetches overtaken by a delivered update
    delivered_while_fetching: HashSet<OrderId>,
    shutdown: CancellationToken,
    alert_ttl: Duration,
}

impl<S, F> NotificationListener<S, F>
where
    S: FrameSource + 'static,
    F: OrderSource + 'static,
{
    pub fn new(url: impl Into<String>, source: S, orders: Arc<F>, policy: ReconnectPolicy) -> Self {
        let (board_tx, _) = watch::channel(OrderBoard::new());
        let (state_tx, _) = watch::channel(ConnectionState::Disconnected);
        let (alert_tx, alerts) = mpsc::unbounded_channel();
        let (resolve_tx, resolve_rx) = mpsc::unbounded_channel();
        Self {
            url: url.into(),
            source,
            orders,
            policy,
            board: OrderBoard::new(),
            board_tx,
            state_tx,
            alert_tx,
            alerts: Some(alerts),
            resolve_tx,
            resolve_rx,
            fetching_ready: HashSet::new(),
            delivered_while_fetching: HashSet::new(),
            shutdown: CancellationToken::new(),
            alert_ttl: DEFAULT_ALERT_TTL,
        }
    }

    /// Listener scoped to the stored identity; `None` when nobody is logged in
    pub fn from_session<K: KeyValueStore>(
        sessions: &SessionStore<K>,
        ws_base: &str,
        source: S,
        orders: Arc<F>,
        policy: ReconnectPolicy,
    ) -> StoreResult<Option<Self>> {
        let Some((user_id, restaurant_id)) = sessions.listener_scope()? else {
            tracing::info!("No stored session, notification listener not started");
            return Ok(None);
        };
        let url = endpoint(ws_base, user_id, restaurant_id);
        Ok(Some(Self::new(url, source, orders, policy)))
    }

    pub fn with_alert_ttl(mut self, ttl: Duration) -> Self {
        self.alert_ttl = ttl;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn subscribe_board(&self) -> watch::Receiver<OrderBoard> {
        self.board_tx.subscribe()
    }

    pub fn subscribe_state(&self) -> watch::Receiver<ConnectionState> {
        self.state_tx.subscribe()
    }

    /// Alert receiver; only the first call gets it
    pub fn take_alerts(&mut self) -> Option<mpsc::UnboundedReceiver<Alert>> {
        self.alerts.take()
    }

    /// Token that stops the listener when cancelled
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Run on a background task
    pub fn spawn(mut self) -> ListenerHandle {
        let shutdown = self.shutdown.clone();
        let board = self.subscribe_board();
        let state = self.subscribe_state();
        let alerts = self.take_alerts();
        let task = tokio::spawn(self.run());
        ListenerHandle {
            shutdown,
            task: Some(task),
            board,
            state,
            alerts,
        }
    }

    /// Connect, process frames, reconnect on closure until stopped or the
    /// retry budget is spent
    pub async fn run(mut self) -> Result<(), ListenerError> {
        let mut failures: u32 = 0;
        tracing::info!(url = %self.url, "Notification listener started");

        loop {
            self.set_state(ConnectionState::Connecting { attempt: failures });
            let opened = tokio::select! {
                _ = self.shutdown.cancelled() => None,
                opened = self.source.open(&self.url) => Some(opened),
            };
            let Some(opened) = opened else {
                self.stopped();
                return Ok(());
            };

            match opened {
                Ok(stream) => {
                    failures = 0;
                    tracing::info!(url = %self.url, "Notification channel connected");
                    self.set_state(ConnectionState::Connected);
                    match self.run_session(stream).await {
                        SessionEnd::Shutdown => {
                            self.stopped();
                            return Ok(());
                        }
                        SessionEnd::Closed => tracing::info!("Notification channel closed"),
                        SessionEnd::Failed(e) => {
                            tracing::warn!(error = %e, "Notification channel failed")
                        }
                    }
                }
                Err(e) => tracing::warn!(error = %e, attempt = failures, "Connect failed"),
            }

            failures += 1;
            let Some(delay) = self.policy.delay_for(failures) else {
                let attempts = failures - 1;
                tracing::error!(attempts, "Giving up on the notification channel");
                self.set_state(ConnectionState::Stopped(StopReason::RetriesExhausted));
                return Err(ListenerError::RetriesExhausted { attempts });
            };

            tracing::info!(
                attempt = failures,
                delay_ms = delay.as_millis() as u64,
                "Reconnect scheduled"
            );
            self.set_state(ConnectionState::Backoff {
                attempt: failures,
                delay,
            });
            if !self.backoff(delay).await {
                self.stopped();
                return Ok(());
            }
        }
    }

    async fn run_session(&mut self, mut stream: Box<dyn FrameStream>) -> SessionEnd {
        let end = loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => break SessionEnd::Shutdown,
                Some(resolution) = self.resolve_rx.recv() => self.apply_resolution(resolution),
                frame = stream.next_frame() => match frame {
                    Some(Ok(text)) => self.handle_frame(&text),
                    Some(Err(e)) => break SessionEnd::Failed(e),
                    None => break SessionEnd::Closed,
                },
            }
        };
        stream.close().await;
        end
    }

    /// Sleep out the delay while still applying fetch results.
    /// Returns false if stopped meanwhile.
    async fn backoff(&mut self, delay: Duration) -> bool {
        let sleep = tokio::time::sleep(delay);
        tokio::pin!(sleep);
        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => return false,
                _ = &mut sleep => return true,
                Some(resolution) = self.resolve_rx.recv() => self.apply_resolution(resolution),
            }
        }
    }

    fn handle_frame(&mut self, text: &str) {
        let event = match ServerEvent::decode(text) {
            Ok(event) => event,
            Err(EventError::UnknownEvent(tag)) => {
                tracing::warn!(%tag, "Ignoring unknown event");
                return;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Dropping malformed frame");
                return;
            }
        };
        tracing::debug!(event = event.tag(), "Frame received");

        match event {
            ServerEvent::NewOrder { order_id } => {
                if self.board.on_new_order(order_id.clone()) {
                    self.publish();
                    self.fetch(order_id, Purpose::Pending);
                }
            }
            ServerEvent::OrderTerminated { order_id } => {
                if !self.board.contains_ready(&order_id)
                    && self.fetching_ready.insert(order_id.clone())
                {
                    self.fetch(order_id, Purpose::Ready);
                }
            }
            ServerEvent::OrderUpdated { order_id, state } => {
                if state == OrderState::Delivered && self.fetching_ready.contains(&order_id) {
                    self.delivered_while_fetching.insert(order_id.clone());
                }
                match self.board.on_state_update(&order_id, state) {
                    StateUpdate::Delivered | StateUpdate::Advanced => self.publish(),
                    outcome => tracing::debug!(%order_id, ?outcome, "State update not applied"),
                }
            }
            ServerEvent::CustomerRequest {
                table,
                kind,
                message,
            } => {
                let text = describe_request(table, kind.as_deref(), message.as_deref());
                self.alert(Alert::CustomerRequest {
                    table,
                    text,
                    dismiss_after: self.alert_ttl,
                });
            }
            ServerEvent::TableUpdated { table_id, state } => {
                if self.board.on_table_update(table_id, state) {
                    self.publish();
                }
            }
        }
    }

    fn fetch(&self, order_id: OrderId, purpose: Purpose) {
        let orders = Arc::clone(&self.orders);
        let tx = self.resolve_tx.clone();
        let shutdown = self.shutdown.clone();
        tokio::spawn(async move {
            let result = tokio::select! {
                _ = shutdown.cancelled() => return,
                result = orders.fetch_order(&order_id) => result,
            };
            // The event id is the board key whatever shape the body used
            let result = result.map(|mut order| {
                order.id = order_id.clone();
                order
            });
            let _ = tx.send(Resolution {
                order_id,
                purpose,
                result,
            });
        });
    }

    fn apply_resolution(&mut self, resolution: Resolution) {
        let Resolution {
            order_id,
            purpose,
            result,
        } = resolution;

        match (purpose, result) {
            (Purpose::Pending, Ok(order)) => {
                if self.board.resolve_pending(order) {
                    self.publish();
                }
            }
            (Purpose::Pending, Err(e)) => {
                tracing::warn!(%order_id, error = %e, "Order detail fetch failed");
                if self.board.fail_pending(&order_id, e.to_string()) {
                    self.publish();
                }
            }
            (Purpose::Ready, Ok(order)) => {
                self.fetching_ready.remove(&order_id);
                if self.delivered_while_fetching.remove(&order_id) {
                    tracing::debug!(%order_id, "Order delivered before its detail arrived");
                    return;
                }
                let table = order.table_label();
                if self.board.insert_ready(order) {
                    self.publish();
                    self.alert(Alert::OrderReady { order_id, table });
                }
            }
            (Purpose::Ready, Err(e)) => {
                self.fetching_ready.remove(&order_id);
                self.delivered_while_fetching.remove(&order_id);
                tracing::warn!(%order_id, error = %e, "Ready order fetch failed");
            }
        }
    }

    fn publish(&self) {
        self.board_tx.send_replace(self.board.clone());
    }

    fn alert(&self, alert: Alert) {
        tracing::info!(%alert, "Alert");
        if self.alert_tx.send(alert).is_err() {
            tracing::debug!("Alert dropped, no receiver");
        }
    }

    fn set_state(&self, state: ConnectionState) {
        self.state_tx.send_if_modified(|current| {
            if *current == state {
                false
            } else {
                *current = state;
                true
            }
        });
    }

    fn stopped(&self) {
        tracing::info!(url = %self.url, "Notification listener stopped");
        self.set_state(ConnectionState::Stopped(StopReason::Requested));
    }
}

/// Handle to a spawned listener; dropping it stops the listener
pub struct ListenerHandle {
    shutdown: CancellationToken,
    task: Option<JoinHandle<Result<(), ListenerError>>>,
    board: watch::Receiver<OrderBoard>,
    state: watch::Receiver<ConnectionState>,
    alerts: Option<mpsc::UnboundedReceiver<Alert>>,
}

impl ListenerHandle {
    pub fn board(&self) -> watch::Receiver<OrderBoard> {
        self.board.clone()
    }

    pub fn state(&self) -> watch::Receiver<ConnectionState> {
        self.state.clone()
    }

    pub fn take_alerts(&mut self) -> Option<mpsc::UnboundedReceiver<Alert>> {
        self.alerts.take()
    }

    pub fn is_finished(&self) -> bool {
        self.task.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Stop the listener, closing the open connection, and wait for it
    pub async fn stop(mut self) -> Result<(), ListenerError> {
        self.shutdown.cancel();
        match self.task.take() {
            Some(task) => task.await.map_err(|e| ListenerError::Task(e.to_string()))?,
            None => Ok(()),
        }
    }
}

impl Drop for ListenerHandle {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}
