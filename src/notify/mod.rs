//! Notifications sent to the clients of a game.
//!
//! The engine never talks to sockets. It hands each [`Notification`] to a
//! [`Channel`] together with an [`Audience`], and the session layer
//! delivers it.

use std::sync::{mpsc, Arc, Mutex, PoisonError};

use serde::{Deserialize, Serialize};

use crate::core::{GameKey, PlayerKey, Turn};

/// Sender name used for advisory messages.
pub const ADVISOR: &str = "Advisor";

/// Who receives a notification.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Audience {
    All,
    Player(PlayerKey),
    /// Everyone except this player.
    Others(PlayerKey),
}

impl Audience {
    /// Whether `key` is part of the audience.
    #[must_use]
    pub fn includes(&self, key: &PlayerKey) -> bool {
        match self {
            Self::All => true,
            Self::Player(k) => k == key,
            Self::Others(k) => k != key,
        }
    }
}

/// Chat-style advisory text. `text` is a message key for the client to
/// translate, with `args` substituted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub sender: String,
    pub text: String,
    pub args: Vec<String>,
    pub classes: Option<String>,
    pub timestamp: Option<i64>,
}

impl Message {
    /// A message from the advisor.
    pub fn advisor(text: impl Into<String>) -> Self {
        Self {
            sender: ADVISOR.to_owned(),
            text: text.into(),
            args: Vec::new(),
            classes: None,
            timestamp: None,
        }
    }

    #[must_use]
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        self.args = args.into_iter().map(|a| a.to_string()).collect();
        self
    }

    /// Highlight as a warning, stamped now.
    #[must_use]
    pub fn warning(mut self) -> Self {
        self.classes = Some("warning".to_owned());
        self.timestamp = Some(chrono::Utc::now().timestamp_millis());
        self
    }
}

/// A player's public standing, sent in `Connections`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSummary {
    pub key: PlayerKey,
    pub name: String,
    pub score: i32,
    pub is_robot: bool,
    pub is_next_to_go: bool,
    pub connected: bool,
}

/// Something that happened in a game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Notification {
    Turn(Turn),
    Message(Message),
    Pause { key: GameKey, name: String, timestamp: i64 },
    Unpause { key: GameKey, name: String, timestamp: i64 },
    NextGame { game_key: GameKey, timestamp: i64 },
    /// A play was refused because of unknown words. Nothing changed.
    Reject { player_key: PlayerKey, words: Vec<String> },
    Connections(Vec<PlayerSummary>),
    /// The last turn was undone.
    Undone(Turn),
}

impl Notification {
    /// Wire tag of the notification.
    #[must_use]
    pub const fn tag(&self) -> &'static str {
        match self {
            Self::Turn(_) => "TURN",
            Self::Message(_) => "MESSAGE",
            Self::Pause { .. } => "PAUSE",
            Self::Unpause { .. } => "UNPAUSE",
            Self::NextGame { .. } => "NEXT_GAME",
            Self::Reject { .. } => "REJECT",
            Self::Connections(_) => "CONNECTIONS",
            Self::Undone(_) => "UNDONE",
        }
    }
}

/// A notification and who it is for.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    pub audience: Audience,
    pub notification: Notification,
}

/// Delivers notifications. Delivery is fire and forget.
pub trait Channel: Send + Sync {
    fn notify(&self, audience: Audience, notification: Notification);
}

/// Drops everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullChannel;

impl Channel for NullChannel {
    fn notify(&self, _audience: Audience, _notification: Notification) {}
}

/// Forwards notifications to a receiver, typically the session layer's
/// delivery thread. Notifications sent after the receiver hangs up are
/// dropped.
impl Channel for Mutex<mpsc::Sender<Envelope>> {
    fn notify(&self, audience: Audience, notification: Notification) {
        let sender = self.lock().unwrap_or_else(PoisonError::into_inner);
        if sender.send(Envelope { audience, notification }).is_err() {
            tracing::debug!("notification receiver has gone away");
        }
    }
}

/// Keeps every notification, for inspection.
///
/// Clones share the same record, so a test can hand one clone to the
/// engine and read from another.
#[derive(Clone, Debug, Default)]
pub struct RecordingChannel {
    sent: Arc<Mutex<Vec<Envelope>>>,
}

impl RecordingChannel {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything sent so far.
    #[must_use]
    pub fn sent(&self) -> Vec<Envelope> {
        self.sent.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Notifications a given player would have received.
    #[must_use]
    pub fn received_by(&self, key: &PlayerKey) -> Vec<Notification> {
        self.sent()
            .into_iter()
            .filter(|e| e.audience.includes(key))
            .map(|e| e.notification)
            .collect()
    }

    /// Messages sent, with their audience.
    #[must_use]
    pub fn messages(&self) -> Vec<(Audience, Message)> {
        self.sent()
            .into_iter()
            .filter_map(|e| match e.notification {
                Notification::Message(m) => Some((e.audience, m)),
                _ => None,
            })
            .collect()
    }

    /// Tags of everything sent, in order.
    #[must_use]
    pub fn tags(&self) -> Vec<&'static str> {
        self.sent().iter().map(|e| e.notification.tag()).collect()
    }

    pub fn clear(&self) {
        self.sent.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }
}

impl Channel for RecordingChannel {
    fn notify(&self, audience: Audience, notification: Notification) {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Envelope { audience, notification });
    }
}
