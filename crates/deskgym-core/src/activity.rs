//! Activity events observed from the coding-assistant session.
//!
//! The transcript watcher that produces these lives outside this crate; it
//! pushes typed events through an [`ActivitySender`] and the frame loop
//! drains them one per frame from the matching [`ActivityFeed`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::{self, error::TryRecvError, UnboundedReceiver, UnboundedSender};

/// Seconds without activity before the session counts as inactive.
pub const ACTIVE_WINDOW_SECS: f32 = 60.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    Idle,
    TurnComplete,
    AskUser,
    PermissionEscalation,
    /// The user is back at the keyboard and typed a new prompt.
    Quest,
    PlanStart,
    PlanApproved,
    SpawnAgent,
    Reading,
    Bash,
    Writing,
    TodoUpdate,
    Success,
    Error,
}

impl ActivityKind {
    /// Tool calls made by the assistant; these build up a streak.
    pub fn is_tool_activity(self) -> bool {
        matches!(
            self,
            ActivityKind::Reading | ActivityKind::Bash | ActivityKind::Writing | ActivityKind::TodoUpdate
        )
    }

    /// Events that raise a prompt without needing a streak.
    pub fn prompts_immediately(self) -> bool {
        matches!(
            self,
            ActivityKind::PlanStart
                | ActivityKind::PermissionEscalation
                | ActivityKind::SpawnAgent
                | ActivityKind::PlanApproved
        )
    }

    /// Events that mean the user's attention is needed back in the session.
    pub fn dismisses_prompt(self) -> bool {
        matches!(
            self,
            ActivityKind::Success
                | ActivityKind::Error
                | ActivityKind::AskUser
                | ActivityKind::PlanApproved
                | ActivityKind::Quest
        )
    }

    pub fn breaks_streak(self) -> bool {
        matches!(self, ActivityKind::Quest | ActivityKind::AskUser)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityEvent {
    #[serde(rename = "type")]
    pub kind: ActivityKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub at: Option<DateTime<Utc>>,
}

impl ActivityEvent {
    pub fn new(kind: ActivityKind) -> Self {
        Self { kind, at: None }
    }

    /// Stamp the event with the current time unless the source already did.
    pub fn stamped(self) -> Self {
        Self {
            at: self.at.or_else(|| Some(Utc::now())),
            ..self
        }
    }
}

impl From<ActivityKind> for ActivityEvent {
    fn from(kind: ActivityKind) -> Self {
        Self::new(kind)
    }
}

/// Producer half handed to the event source. Cheap to clone.
#[derive(Debug, Clone)]
pub struct ActivitySender {
    tx: UnboundedSender<ActivityEvent>,
}

impl ActivitySender {
    /// Returns false once the feed has been dropped.
    pub fn send(&self, event: impl Into<ActivityEvent>) -> bool {
        self.tx.send(event.into()).is_ok()
    }
}

/// Consumer half polled by the frame loop.
#[derive(Debug)]
pub struct ActivityFeed {
    rx: UnboundedReceiver<ActivityEvent>,
    closed: bool,
}

/// Create a connected sender/feed pair. Events arrive in send order.
pub fn channel() -> (ActivitySender, ActivityFeed) {
    let (tx, rx) = mpsc::unbounded_channel();
    (ActivitySender { tx }, ActivityFeed { rx, closed: false })
}

impl ActivityFeed {
    /// Take the next pending event without blocking.
    pub fn poll(&mut self) -> Option<ActivityEvent> {
        match self.rx.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.closed = true;
                None
            }
        }
    }

    /// True once every sender is gone and the backlog has been drained.
    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

/// Tracks whether the assistant session is currently doing anything.
#[derive(Debug, Clone, Default)]
pub struct ActivityMonitor {
    active: bool,
    quiet_secs: f32,
}

impl ActivityMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn quiet_secs(&self) -> f32 {
        self.quiet_secs
    }

    pub fn handle_event(&mut self, event: &ActivityEvent) {
        if event.kind != ActivityKind::Idle {
            self.quiet_secs = 0.0;
            self.active = true;
        }
    }

    pub fn update(&mut self, delta_secs: f32) {
        if self.active {
            self.quiet_secs += delta_secs;
            if self.quiet_secs > ACTIVE_WINDOW_SECS {
                self.active = false;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_jsonl_event_lines() {
        let event: ActivityEvent = serde_json::from_str(r#"{"type":"todo_update"}"#).unwrap();
        assert_eq!(event.kind, ActivityKind::TodoUpdate);
        assert!(event.at.is_none());

        let event: ActivityEvent =
            serde_json::from_str(r#"{"type":"plan_start","at":"2026-01-05T10:00:00Z"}"#).unwrap();
        assert_eq!(event.kind, ActivityKind::PlanStart);
        assert!(event.at.is_some());
    }

    #[test]
    fn stamping_keeps_source_timestamps() {
        let before = Utc::now();
        let stamped = ActivityEvent::new(ActivityKind::Bash).stamped();
        assert!(stamped.at.is_some_and(|at| at >= before));

        let event: ActivityEvent =
            serde_json::from_str(r#"{"type":"bash","at":"2026-01-05T10:00:00Z"}"#).unwrap();
        let original = event.at;
        assert_eq!(event.stamped().at, original);
    }

    #[test]
    fn feed_yields_one_event_per_poll_in_order() {
        let (tx, mut feed) = channel();
        assert!(tx.send(ActivityKind::Reading));
        assert!(tx.send(ActivityKind::Bash));
        assert_eq!(feed.poll().map(|e| e.kind), Some(ActivityKind::Reading));
        assert_eq!(feed.poll().map(|e| e.kind), Some(ActivityKind::Bash));
        assert_eq!(feed.poll(), None);
        assert!(!feed.is_closed());

        drop(tx);
        assert_eq!(feed.poll(), None);
        assert!(feed.is_closed());
    }

    #[test]
    fn sender_reports_dropped_feed() {
        let (tx, feed) = channel();
        drop(feed);
        assert!(!tx.send(ActivityKind::Success));
    }

    #[test]
    fn monitor_goes_quiet_after_a_minute() {
        let mut monitor = ActivityMonitor::new();
        monitor.handle_event(&ActivityEvent::new(ActivityKind::Idle));
        assert!(!monitor.is_active());

        monitor.handle_event(&ActivityEvent::new(ActivityKind::Writing));
        assert!(monitor.is_active());
        monitor.update(59.0);
        assert!(monitor.is_active());
        monitor.update(2.0);
        assert!(!monitor.is_active());
    }
}
