use std::ops::ControlFlow;
use std::sync::Arc;

use chrono::Utc;
use futures::StreamExt;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use crate::appwrite::{booking_channel, EventSource, EventStream, ReconnectBackoff};
use crate::error::{AppError, Result};
use crate::ui::FeedRenderer;

use super::notification_classifier::{classify_event, status_notice};
use super::notification_dto::FeedSnapshot;
use super::notification_models::{BookingChangeEvent, BookingDocument, Notice, NotificationEntry, Role};
use super::notification_repository::{BookingRepository, HISTORY_LIMIT};
use super::notification_state::NotificationState;

/// Pending commands an engine buffers before senders wait.
pub const QUEUE_CAPACITY: usize = 100;

pub enum EngineCommand {
    HistoryLoaded(Vec<BookingDocument>),
    Event(BookingChangeEvent),
    ToggleBell,
    ClickOutside,
    ClearAll,
    Snapshot(oneshot::Sender<FeedSnapshot>),
}

/// Feed state of one user plus the surface it renders to. All mutation goes
/// through `handle`, which keeps the engine single-owner.
pub struct NotificationEngine {
    user_id: String,
    role: Role,
    state: NotificationState,
    renderer: Arc<dyn FeedRenderer>,
}

impl NotificationEngine {
    pub fn new(user_id: &str, role: Role, renderer: Arc<dyn FeedRenderer>) -> Self {
        Self {
            user_id: user_id.to_string(),
            role,
            state: NotificationState::new(),
            renderer,
        }
    }

    pub fn state(&self) -> &NotificationState {
        &self.state
    }

    pub fn handle(&mut self, command: EngineCommand) {
        match command {
            EngineCommand::HistoryLoaded(documents) => self.load_history(documents),
            EngineCommand::Event(event) => {
                self.handle_event(&event);
            }
            EngineCommand::ToggleBell => self.toggle_panel(),
            EngineCommand::ClickOutside => self.click_outside(),
            EngineCommand::ClearAll => self.clear_all(),
            EngineCommand::Snapshot(reply) => {
                let _ = reply.send(FeedSnapshot::from_state(&self.state, Utc::now()));
            }
        }
    }

    /// Appends history as read entries and re-renders once.
    pub fn load_history(&mut self, documents: Vec<BookingDocument>) {
        for document in &documents {
            let timestamp = document.updated_at.unwrap_or_else(Utc::now);
            self.state
                .append_history(NotificationEntry::read(status_notice(document), timestamp));
        }
        debug!(
            "Loaded {} history entries for {} {}",
            documents.len(),
            self.role,
            self.user_id
        );
        self.renderer.render_list(self.state.entries());
    }

    /// Returns whether the event produced an entry.
    pub fn handle_event(&mut self, event: &BookingChangeEvent) -> bool {
        match classify_event(event, &self.user_id, self.role) {
            Some(notice) => {
                self.add_notification(&notice.icon, &notice.message);
                true
            }
            None => false,
        }
    }

    pub fn add_notification(&mut self, icon: &str, message: &str) {
        let notice = Notice {
            icon: icon.to_string(),
            message: message.to_string(),
        };
        self.state.push(NotificationEntry::unread(notice, Utc::now()));

        self.renderer.render_badge(self.state.badge().as_deref());
        self.renderer.render_list(self.state.entries());

        if !self.state.panel_open() {
            self.renderer.toast(&format!("{} {}", icon, message));
        }
    }

    pub fn toggle_panel(&mut self) {
        let open = self.state.toggle_panel();
        self.renderer.render_panel(open);
        if open {
            self.renderer.render_badge(None);
            self.renderer.render_list(self.state.entries());
        }
    }

    pub fn click_outside(&mut self) {
        if self.state.close_panel() {
            self.renderer.render_panel(false);
        }
    }

    pub fn clear_all(&mut self) {
        self.state.clear();
        self.renderer.render_badge(None);
        self.renderer.render_list(self.state.entries());
    }
}

async fn run_engine(mut engine: NotificationEngine, mut rx: mpsc::Receiver<EngineCommand>) {
    while let Some(command) = rx.recv().await {
        engine.handle(command);
    }
    debug!("Notification engine for {} stopped", engine.user_id);
}

/// Cloneable front end of a running engine.
#[derive(Clone)]
pub struct NotificationHandle {
    tx: mpsc::Sender<EngineCommand>,
}

impl NotificationHandle {
    async fn send(&self, command: EngineCommand) -> Result<()> {
        self.tx
            .send(command)
            .await
            .map_err(|_| AppError::EngineClosed)
    }

    pub async fn toggle_panel(&self) -> Result<()> {
        self.send(EngineCommand::ToggleBell).await
    }

    pub async fn click_outside(&self) -> Result<()> {
        self.send(EngineCommand::ClickOutside).await
    }

    pub async fn clear_all(&self) -> Result<()> {
        self.send(EngineCommand::ClearAll).await
    }

    pub async fn snapshot(&self) -> Result<FeedSnapshot> {
        let (reply, rx) = oneshot::channel();
        self.send(EngineCommand::Snapshot(reply)).await?;
        rx.await.map_err(|_| AppError::EngineClosed)
    }
}

/// Collaborators a feed needs.
#[derive(Clone)]
pub struct NotificationDeps {
    pub bookings: BookingRepository,
    pub events: Arc<dyn EventSource>,
    pub renderer: Arc<dyn FeedRenderer>,
    pub database_id: String,
    pub bookings_collection: String,
    pub reconnect: ReconnectBackoff,
}

/// Mounts the feed UI, starts the engine and kicks off the history fetch and
/// the live subscription. Neither background step can fail the call.
pub fn init_notifications(user_id: &str, role: Role, deps: NotificationDeps) -> NotificationHandle {
    deps.renderer.mount();

    let (tx, rx) = mpsc::channel(QUEUE_CAPACITY);
    let engine = NotificationEngine::new(user_id, role, deps.renderer.clone());
    tokio::spawn(run_engine(engine, rx));

    tokio::spawn(load_existing_notifications(
        deps.bookings.clone(),
        user_id.to_string(),
        role,
        tx.clone(),
    ));

    let channel = booking_channel(&deps.database_id, &deps.bookings_collection);
    tokio::spawn(subscribe_to_changes(
        deps.events.clone(),
        channel,
        tx.downgrade(),
        deps.reconnect,
    ));

    info!("Notifications initialised for {} {}", role, user_id);
    NotificationHandle { tx }
}

async fn load_existing_notifications(
    bookings: BookingRepository,
    user_id: String,
    role: Role,
    tx: mpsc::Sender<EngineCommand>,
) {
    match bookings
        .find_recent_by_user(&user_id, role, HISTORY_LIMIT)
        .await
    {
        Ok(documents) => {
            let _ = tx.send(EngineCommand::HistoryLoaded(documents)).await;
        }
        Err(e) => warn!("Could not load existing notifications: {}", e),
    }
}

/// Keeps the channel subscribed for as long as the engine runs. A closed or
/// failed subscription is re-opened after a backoff; the attempt counter
/// resets once a subscription is established.
async fn subscribe_to_changes(
    events: Arc<dyn EventSource>,
    channel: String,
    tx: mpsc::WeakSender<EngineCommand>,
    reconnect: ReconnectBackoff,
) {
    let mut attempt: u32 = 0;

    loop {
        match events.subscribe(&channel).await {
            Ok(stream) => {
                attempt = 0;
                info!("Subscribed to {}", channel);
                if forward_events(stream, &tx).await.is_break() {
                    break;
                }
                warn!("Subscription to {} closed", channel);
            }
            Err(e) => warn!("Could not subscribe to real-time updates: {}", e),
        }

        if tx.upgrade().is_none() {
            break;
        }

        let delay = reconnect.delay(attempt);
        attempt = attempt.saturating_add(1);
        debug!("Resubscribing to {} in {:?}", channel, delay);
        tokio::time::sleep(delay).await;
    }

    debug!("Stopped listening on {}", channel);
}

/// Drains one subscription into the engine. Breaks once the engine is gone.
async fn forward_events(
    mut stream: EventStream,
    tx: &mpsc::WeakSender<EngineCommand>,
) -> ControlFlow<()> {
    while let Some(item) = stream.next().await {
        let event = match item.and_then(BookingChangeEvent::try_from) {
            Ok(event) => event,
            Err(e) => {
                warn!("Skipping realtime message: {}", e);
                continue;
            }
        };

        let Some(tx) = tx.upgrade() else {
            return ControlFlow::Break(());
        };
        if tx.send(EngineCommand::Event(event)).await.is_err() {
            return ControlFlow::Break(());
        }
    }

    ControlFlow::Continue(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notification::notification_state::MAX_NOTIFICATIONS;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingRenderer {
        mounts: Mutex<usize>,
        lists: Mutex<Vec<Vec<String>>>,
        badges: Mutex<Vec<Option<String>>>,
        panels: Mutex<Vec<bool>>,
        toasts: Mutex<Vec<String>>,
    }

    impl FeedRenderer for RecordingRenderer {
        fn mount(&self) {
            *self.mounts.lock().unwrap() += 1;
        }

        fn render_list(&self, entries: &VecDeque<NotificationEntry>) {
            self.lists
                .lock()
                .unwrap()
                .push(entries.iter().map(|e| e.message.clone()).collect());
        }

        fn render_badge(&self, badge: Option<&str>) {
            self.badges.lock().unwrap().push(badge.map(String::from));
        }

        fn render_panel(&self, open: bool) {
            self.panels.lock().unwrap().push(open);
        }

        fn toast(&self, message: &str) {
            self.toasts.lock().unwrap().push(message.to_string());
        }
    }

    fn engine(role: Role) -> (NotificationEngine, Arc<RecordingRenderer>) {
        let renderer = Arc::new(RecordingRenderer::default());
        (NotificationEngine::new("U1", role, renderer.clone()), renderer)
    }

    fn booking(worker: &str, status: &str, category: &str) -> BookingDocument {
        BookingDocument {
            id: "b1".into(),
            customer_id: Some("C1".into()),
            worker_id: Some(worker.into()),
            status: Some(status.into()),
            service_category: Some(category.into()),
            updated_at: None,
        }
    }

    fn change(document: BookingDocument, action: &str) -> BookingChangeEvent {
        BookingChangeEvent {
            document,
            events: vec![format!("databases.db.collections.bookings.documents.b1.{}", action)],
        }
    }

    #[test]
    fn test_add_notification_renders_and_toasts() {
        let (mut engine, renderer) = engine(Role::Worker);
        engine.add_notification("📥", "New job request — plumbing");

        assert_eq!(engine.state().unread_count(), 1);
        assert_eq!(renderer.lists.lock().unwrap().len(), 1);
        assert_eq!(renderer.badges.lock().unwrap().last().unwrap().as_deref(), Some("1"));
        assert_eq!(
            renderer.toasts.lock().unwrap().as_slice(),
            ["📥 New job request — plumbing"]
        );
    }

    #[test]
    fn test_no_toast_while_panel_open() {
        let (mut engine, renderer) = engine(Role::Worker);
        engine.toggle_panel();
        engine.add_notification("✅", "Booking has been accepted");

        assert!(renderer.toasts.lock().unwrap().is_empty());
        assert_eq!(engine.state().unread_count(), 1);
    }

    #[test]
    fn test_thirty_additions_keep_twenty() {
        let (mut engine, _) = engine(Role::Customer);
        for n in 0..30 {
            engine.add_notification("📤", &format!("n{}", n));
        }
        assert_eq!(engine.state().entries().len(), MAX_NOTIFICATIONS);
        assert_eq!(engine.state().entries()[0].message, "n29");
        assert_eq!(engine.state().unread_count(), 30);

        engine.toggle_panel();
        assert_eq!(engine.state().unread_count(), 0);
    }

    #[test]
    fn test_irrelevant_event_changes_nothing() {
        let (mut engine, renderer) = engine(Role::Customer);
        let event = change(booking("U1", "pending", "plumbing"), "create");

        assert!(!engine.handle_event(&event));
        assert!(engine.state().entries().is_empty());
        assert!(renderer.lists.lock().unwrap().is_empty());
    }

    #[test]
    fn test_history_is_read_and_quiet() {
        let (mut engine, renderer) = engine(Role::Worker);
        engine.load_history(vec![booking("U1", "cancelled", "ac-repair")]);

        let entry = &engine.state().entries()[0];
        assert!(!entry.unread);
        assert_eq!(entry.icon, "❌");
        assert_eq!(entry.message, "Booking has been cancelled — ac repair");
        assert_eq!(engine.state().unread_count(), 0);
        assert!(renderer.toasts.lock().unwrap().is_empty());
    }

    #[test]
    fn test_click_outside_only_closes_open_panel() {
        let (mut engine, renderer) = engine(Role::Worker);
        engine.click_outside();
        assert!(renderer.panels.lock().unwrap().is_empty());

        engine.toggle_panel();
        engine.click_outside();
        assert_eq!(renderer.panels.lock().unwrap().as_slice(), [true, false]);
        assert!(!engine.state().panel_open());
    }

    #[test]
    fn test_clear_all() {
        let (mut engine, renderer) = engine(Role::Worker);
        engine.add_notification("📥", "one");
        engine.clear_all();

        assert!(engine.state().entries().is_empty());
        assert_eq!(engine.state().unread_count(), 0);
        assert!(renderer.lists.lock().unwrap().last().unwrap().is_empty());
        assert_eq!(renderer.badges.lock().unwrap().last().unwrap(), &None);
    }

    #[tokio::test]
    async fn test_handle_snapshot_round_trip() {
        let (engine, _) = engine(Role::Worker);
        let (tx, rx) = mpsc::channel(QUEUE_CAPACITY);
        tokio::spawn(run_engine(engine, rx));
        let handle = NotificationHandle { tx: tx.clone() };

        tx.send(EngineCommand::Event(change(booking("U1", "pending", "plumbing"), "create")))
            .await
            .unwrap();
        handle.toggle_panel().await.unwrap();

        let snapshot = handle.snapshot().await.unwrap();
        assert_eq!(snapshot.entries.len(), 1);
        assert!(snapshot.panel_open);
        assert_eq!(snapshot.unread_count, 0);
        assert!(snapshot.badge.is_none());
        assert_eq!(snapshot.entries[0].time_ago, "Just now");
    }

    #[tokio::test]
    async fn test_handle_reports_closed_engine() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let handle = NotificationHandle { tx };
        assert!(matches!(handle.clear_all().await, Err(AppError::EngineClosed)));
    }
}
