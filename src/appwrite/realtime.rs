use std::time::{Duration, SystemTime};

use futures::{SinkExt, StreamExt};
use reqwest::Url;
use retry_policies::{policies::ExponentialBackoff, Jitter, RetryDecision, RetryPolicy};
use serde_json::json;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;

use super::types::{RealtimeEvent, RealtimeFrame, RemoteErrorBody};
use super::EventStream;
use crate::error::{AppError, Result};

const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(20);
const MAX_BACKOFF_EXPONENT: u32 = 16;

/// Wait schedule between attempts to re-open a closed subscription.
#[derive(Debug, Clone, Copy)]
pub struct ReconnectBackoff {
    min: Duration,
    max: Duration,
}

impl ReconnectBackoff {
    pub fn new(min: Duration, max: Duration) -> Self {
        Self { min, max: max.max(min) }
    }

    /// Delay before attempt number `attempt` (zero after a clean close).
    pub fn delay(&self, attempt: u32) -> Duration {
        let policy = ExponentialBackoff::builder()
            .retry_bounds(self.min, self.max)
            .jitter(Jitter::Bounded)
            .build_with_max_retries(u32::MAX);

        let now = SystemTime::now();
        match policy.should_retry(now, attempt.min(MAX_BACKOFF_EXPONENT)) {
            RetryDecision::Retry { execute_after } => execute_after
                .duration_since(now)
                .unwrap_or(self.min)
                .clamp(self.min, self.max),
            RetryDecision::DoNotRetry => self.max,
        }
    }
}

impl Default for ReconnectBackoff {
    fn default() -> Self {
        Self::new(Duration::from_secs(1), Duration::from_secs(30))
    }
}

/// Channel carrying every document change of one collection.
pub fn booking_channel(database_id: &str, collection_id: &str) -> String {
    format!(
        "databases.{}.collections.{}.documents",
        database_id, collection_id
    )
}

/// Turns the REST endpoint (`https://host/v1`) into the realtime socket URL.
pub fn realtime_url(endpoint: &str, project_id: &str, channels: &[&str]) -> Result<String> {
    let mut url = Url::parse(endpoint)
        .map_err(|e| AppError::Config(format!("Invalid endpoint {}: {}", endpoint, e)))?;

    let scheme = if url.scheme() == "https" { "wss" } else { "ws" };
    url.set_scheme(scheme)
        .map_err(|_| AppError::Config(format!("Cannot derive socket URL from {}", endpoint)))?;

    url.path_segments_mut()
        .map_err(|_| AppError::Config(format!("Endpoint {} cannot carry a path", endpoint)))?
        .pop_if_empty()
        .push("realtime");

    {
        let mut pairs = url.query_pairs_mut();
        pairs.append_pair("project", project_id);
        for channel in channels {
            pairs.append_pair("channels[]", channel);
        }
    }

    Ok(url.to_string())
}

/// Interprets one text frame. Only `event` frames carry a change; `error`
/// frames become errors and everything else is skipped.
pub(crate) fn parse_frame(text: &str) -> Result<Option<RealtimeEvent>> {
    let frame: RealtimeFrame = serde_json::from_str(text)?;

    match frame.kind.as_str() {
        "event" => Ok(Some(serde_json::from_value(frame.data)?)),
        "error" => {
            let body: RemoteErrorBody = serde_json::from_value(frame.data)?;
            Err(body.into())
        }
        other => {
            tracing::trace!("Skipping realtime frame of type {}", other);
            Ok(None)
        }
    }
}

/// First frame of an authenticated socket. `session` is the session secret,
/// not a JWT.
fn authentication_frame(session: &str) -> String {
    json!({"type": "authentication", "data": {"session": session}}).to_string()
}

struct AbortOnDrop(JoinHandle<()>);

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// Opens the socket and yields change events in arrival order.
pub async fn connect(url: &str, session: Option<&str>) -> Result<EventStream> {
    let (socket, _) = tokio_tungstenite::connect_async(url).await?;
    let (mut sink, stream) = socket.split();

    if let Some(session) = session {
        sink.send(Message::Text(authentication_frame(session))).await?;
    }

    let heartbeat = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(HEARTBEAT_INTERVAL);
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let ping = json!({"type": "ping"}).to_string();
            if sink.send(Message::Text(ping)).await.is_err() {
                break;
            }
        }
    });
    let guard = AbortOnDrop(heartbeat);

    tracing::debug!("Realtime socket open at {}", url);

    let events = stream.filter_map(move |message| {
        let _heartbeat = &guard;
        let item = match message {
            Ok(Message::Text(text)) => parse_frame(&text).transpose(),
            Ok(_) => None,
            Err(e) => Some(Err(AppError::from(e))),
        };
        futures::future::ready(item)
    });

    Ok(events.boxed())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_booking_channel_format() {
        assert_eq!(
            booking_channel("699172230026429d954f", "bookings"),
            "databases.699172230026429d954f.collections.bookings.documents"
        );
    }

    #[test]
    fn test_realtime_url_switches_scheme() {
        let url = realtime_url(
            "https://sgp.cloud.appwrite.io/v1",
            "proj",
            &["databases.db.collections.bookings.documents"],
        )
        .unwrap();

        assert!(url.starts_with("wss://sgp.cloud.appwrite.io/v1/realtime?project=proj"));
        assert!(url.contains("channels%5B%5D=databases.db.collections.bookings.documents"));
    }

    #[test]
    fn test_realtime_url_plain_http() {
        let url = realtime_url("http://localhost/v1/", "p", &[]).unwrap();
        assert_eq!(url, "ws://localhost/v1/realtime?project=p");
    }

    #[test]
    fn test_parse_event_frame() {
        let text = r#"{"type":"event","data":{
            "events":["databases.db.collections.bookings.documents.b1.create"],
            "channels":["documents"],
            "timestamp":"2024-05-01 10:00:00.000",
            "payload":{"$id":"b1","workerId":"W1"}}}"#;

        let event = parse_frame(text).unwrap().unwrap();
        assert_eq!(event.events.len(), 1);
        assert_eq!(event.payload["workerId"], "W1");
    }

    #[test]
    fn test_parse_connected_frame_is_skipped() {
        let text = r#"{"type":"connected","data":{"channels":["documents"],"user":null}}"#;
        assert!(parse_frame(text).unwrap().is_none());
    }

    #[test]
    fn test_parse_error_frame() {
        let text = r#"{"type":"error","data":{"code":1008,"message":"Missing channels"}}"#;
        let err = parse_frame(text).unwrap_err();
        assert!(matches!(err, AppError::Remote { code: 1008, .. }));
    }

    #[test]
    fn test_authentication_frame_carries_session() {
        let frame: serde_json::Value =
            serde_json::from_str(&authentication_frame("secret")).unwrap();
        assert_eq!(frame["type"], "authentication");
        assert_eq!(frame["data"]["session"], "secret");
    }

    #[test]
    fn test_reconnect_delay_stays_in_bounds() {
        let backoff = ReconnectBackoff::new(Duration::from_millis(100), Duration::from_secs(2));
        for attempt in [0, 1, 3, 10, 1_000, u32::MAX] {
            let delay = backoff.delay(attempt);
            assert!(delay >= Duration::from_millis(100), "attempt {}: {:?}", attempt, delay);
            assert!(delay <= Duration::from_secs(2), "attempt {}: {:?}", attempt, delay);
        }
    }

    #[test]
    fn test_reconnect_max_never_below_min() {
        let backoff = ReconnectBackoff::new(Duration::from_secs(5), Duration::from_secs(1));
        assert_eq!(backoff.delay(4), Duration::from_secs(5));
    }
}
