use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use utoipa::ToSchema;

/// How long an alert stays fully visible.
pub const ALERT_VISIBLE_FOR: Duration = Duration::from_millis(4000);
/// Fade-out before an alert is removed.
pub const ALERT_FADE_FOR: Duration = Duration::from_millis(300);

pub const DEFAULT_LOADING_MESSAGE: &str = "Loading...";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AlertPhase {
    Visible,
    Fading,
    Removed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Alert {
    pub id: u64,
    pub message: String,
    pub kind: AlertKind,
    pub phase: AlertPhase,
}

#[derive(Default)]
struct AlertBoard {
    next_id: u64,
    active: Vec<Alert>,
    loading: Option<String>,
}

/// Transient alerts and the loading overlay of one page. Each alert phase
/// change is published to subscribers.
#[derive(Clone)]
pub struct AlertCenter {
    board: Arc<Mutex<AlertBoard>>,
    tx: broadcast::Sender<Alert>,
}

impl AlertCenter {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(100);
        Self {
            board: Arc::new(Mutex::new(AlertBoard::default())),
            tx,
        }
    }

    fn board(&self) -> MutexGuard<'_, AlertBoard> {
        self.board.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Alert> {
        self.tx.subscribe()
    }

    /// Shows an alert that fades after four seconds and is gone 300ms later.
    /// Must be called from within a tokio runtime.
    pub fn show_alert(&self, message: &str, kind: AlertKind) -> u64 {
        let alert = {
            let mut board = self.board();
            board.next_id += 1;
            let alert = Alert {
                id: board.next_id,
                message: message.to_string(),
                kind,
                phase: AlertPhase::Visible,
            };
            board.active.push(alert.clone());
            alert
        };
        let id = alert.id;
        let _ = self.tx.send(alert);

        let center = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(ALERT_VISIBLE_FOR).await;
            center.set_phase(id, AlertPhase::Fading);
            tokio::time::sleep(ALERT_FADE_FOR).await;
            center.set_phase(id, AlertPhase::Removed);
        });

        id
    }

    fn set_phase(&self, id: u64, phase: AlertPhase) {
        let changed = {
            let mut board = self.board();
            let Some(index) = board.active.iter().position(|a| a.id == id) else {
                return;
            };
            if phase == AlertPhase::Removed {
                let mut alert = board.active.remove(index);
                alert.phase = phase;
                alert
            } else {
                board.active[index].phase = phase;
                board.active[index].clone()
            }
        };
        let _ = self.tx.send(changed);
    }

    /// Alerts currently on screen, oldest first.
    pub fn active(&self) -> Vec<Alert> {
        self.board().active.clone()
    }

    pub fn show_loading(&self, message: Option<&str>) {
        self.board().loading = Some(message.unwrap_or(DEFAULT_LOADING_MESSAGE).to_string());
    }

    pub fn hide_loading(&self) {
        self.board().loading = None;
    }

    pub fn loading(&self) -> Option<String> {
        self.board().loading.clone()
    }
}

impl Default for AlertCenter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_alert_lifecycle() {
        let center = AlertCenter::new();
        let mut rx = center.subscribe();

        let id = center.show_alert("📥 New job request — plumbing", AlertKind::Info);
        assert_eq!(rx.recv().await.unwrap().phase, AlertPhase::Visible);
        assert_eq!(center.active().len(), 1);

        tokio::time::sleep(Duration::from_millis(3990)).await;
        assert_eq!(center.active()[0].phase, AlertPhase::Visible);

        let fading = rx.recv().await.unwrap();
        assert_eq!((fading.id, fading.phase), (id, AlertPhase::Fading));
        assert_eq!(center.active()[0].phase, AlertPhase::Fading);

        let removed = rx.recv().await.unwrap();
        assert_eq!(removed.phase, AlertPhase::Removed);
        assert!(center.active().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_alerts_are_independent() {
        let center = AlertCenter::new();
        center.show_alert("first", AlertKind::Info);
        tokio::time::sleep(Duration::from_millis(2000)).await;
        center.show_alert("second", AlertKind::Error);

        tokio::time::sleep(Duration::from_millis(2400)).await;
        let active = center.active();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].message, "second");
    }

    #[test]
    fn test_loading_overlay() {
        let center = AlertCenter::new();
        assert!(center.loading().is_none());

        center.show_loading(None);
        assert_eq!(center.loading().as_deref(), Some("Loading..."));

        center.show_loading(Some("Saving booking"));
        assert_eq!(center.loading().as_deref(), Some("Saving booking"));

        center.hide_loading();
        assert!(center.loading().is_none());
    }
}
