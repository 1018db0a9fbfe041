//! Voice assistant transcript.
//!
//! Session events arrive over a channel and are applied by one dispatcher
//! task that owns the transcript. Snapshots are published on a watch channel.

use std::sync::LazyLock;
use std::time::Duration;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, oneshot, watch};
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info, warn};

/// Quiet period after which streamed messages are final.
pub const FREEZE_AFTER: Duration = Duration::from_secs(2);

const CHANNEL_CAPACITY: usize = 64;

static CHESS_TERMS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(chess|move|piece|king|queen|rook|bishop|knight|pawn|check|checkmate|castle|en passant|fork|pin|skewer|sacrifice|gambit|opening|endgame|middle game|position|tactic|strategy)\b",
    )
    .unwrap()
});

static POSITIONAL_TERMS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(center|flank|file|rank|diagonal|square|control|pressure|weakness|strength|development|tempo)\b",
    )
    .unwrap()
});

static EVALUATION_TERMS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(good|bad|excellent|poor|strong|weak|better|worse|advantage|disadvantage|winning|losing|equal|balanced)\b",
    )
    .unwrap()
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    User,
    Assistant,
}

/// Voice session lifecycle events, as forwarded by the client.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum VoiceEvent {
    Start,
    End,
    Message { role: Speaker, transcript: String },
    Error { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Evaluative,
    Technical,
    General,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageInsight {
    pub word_count: usize,
    pub has_chess_terms: bool,
    pub has_positional_terms: bool,
    pub has_evaluation_terms: bool,
    pub tone: Tone,
}

impl MessageInsight {
    pub fn of(text: &str) -> Self {
        let has_chess_terms = CHESS_TERMS.is_match(text);
        let has_positional_terms = POSITIONAL_TERMS.is_match(text);
        let has_evaluation_terms = EVALUATION_TERMS.is_match(text);
        let tone = if has_evaluation_terms {
            Tone::Evaluative
        } else if has_chess_terms {
            Tone::Technical
        } else {
            Tone::General
        };
        Self {
            word_count: text.split_whitespace().count(),
            has_chess_terms,
            has_positional_terms,
            has_evaluation_terms,
            tone,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptMessage {
    pub id: u64,
    pub role: Speaker,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    pub is_complete: bool,
    pub insight: MessageInsight,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptView {
    pub connected: bool,
    pub messages: Vec<TranscriptMessage>,
}

#[derive(Debug, Default)]
pub struct Transcript {
    connected: bool,
    messages: Vec<TranscriptMessage>,
    next_id: u64,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn messages(&self) -> &[TranscriptMessage] {
        &self.messages
    }

    /// Apply one event. Returns whether anything changed.
    pub fn apply(&mut self, event: VoiceEvent) -> bool {
        match event {
            VoiceEvent::Start => {
                if self.connected {
                    debug!("Voice session already active, ignoring start");
                    return false;
                }
                info!("Voice session started");
                self.connected = true;
                true
            }
            VoiceEvent::End => {
                info!("Voice session ended");
                let changed = self.connected;
                self.connected = false;
                changed
            }
            VoiceEvent::Error { message } => {
                warn!(%message, "Voice session error");
                let changed = self.connected;
                self.connected = false;
                changed
            }
            VoiceEvent::Message { role, transcript } => self.stream(role, &transcript),
        }
    }

    /// Update the last message in place while it is still streaming from the
    /// same speaker; otherwise start a new one.
    fn stream(&mut self, role: Speaker, text: &str) -> bool {
        let text = text.trim();
        if text.is_empty() {
            return false;
        }
        let now = Utc::now();

        if let Some(last) = self.messages.last_mut() {
            if last.role == role && !last.is_complete {
                last.text = text.to_string();
                last.timestamp = now;
                last.insight = MessageInsight::of(text);
                return true;
            }
        }

        self.next_id += 1;
        self.messages.push(TranscriptMessage {
            id: self.next_id,
            role,
            text: text.to_string(),
            timestamp: now,
            is_complete: false,
            insight: MessageInsight::of(text),
        });
        true
    }

    /// Mark every message complete.
    pub fn freeze(&mut self) -> bool {
        let mut changed = false;
        for message in self.messages.iter_mut().filter(|m| !m.is_complete) {
            message.is_complete = true;
            changed = true;
        }
        changed
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    pub fn view(&self) -> TranscriptView {
        TranscriptView {
            connected: self.connected,
            messages: self.messages.clone(),
        }
    }
}

enum Command {
    Event(VoiceEvent),
    Start(oneshot::Sender<bool>),
    Clear,
    Snapshot(oneshot::Sender<TranscriptView>),
}

/// Handle to the transcript dispatcher.
#[derive(Clone)]
pub struct VoiceHub {
    tx: mpsc::Sender<Command>,
    updates: watch::Receiver<TranscriptView>,
}

impl VoiceHub {
    /// Spawn the dispatcher on the current runtime.
    pub fn spawn(freeze_after: Duration) -> Self {
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        let (updates_tx, updates) = watch::channel(TranscriptView::default());
        tokio::spawn(dispatch(rx, updates_tx, freeze_after));
        Self { tx, updates }
    }

    pub async fn send(&self, event: VoiceEvent) {
        if self.tx.send(Command::Event(event)).await.is_err() {
            warn!("Voice dispatcher is gone");
        }
    }

    /// Open a voice session. False when another one is already active.
    pub async fn start(&self) -> bool {
        let (reply, rx) = oneshot::channel();
        if self.tx.send(Command::Start(reply)).await.is_err() {
            warn!("Voice dispatcher is gone");
            return false;
        }
        rx.await.unwrap_or(false)
    }

    pub async fn clear(&self) {
        if self.tx.send(Command::Clear).await.is_err() {
            warn!("Voice dispatcher is gone");
        }
    }

    pub async fn snapshot(&self) -> TranscriptView {
        let (reply, rx) = oneshot::channel();
        if self.tx.send(Command::Snapshot(reply)).await.is_err() {
            return self.updates.borrow().clone();
        }
        rx.await.unwrap_or_else(|_| self.updates.borrow().clone())
    }

    /// Receiver that sees every published transcript.
    pub fn subscribe(&self) -> watch::Receiver<TranscriptView> {
        self.updates.clone()
    }
}

async fn dispatch(
    mut rx: mpsc::Receiver<Command>,
    updates: watch::Sender<TranscriptView>,
    freeze_after: Duration,
) {
    let mut transcript = Transcript::new();
    let mut freeze_at: Option<Instant> = None;

    loop {
        let deadline = freeze_at;
        let changed = tokio::select! {
            cmd = rx.recv() => match cmd {
                Some(Command::Event(event)) => {
                    let streaming = matches!(event, VoiceEvent::Message { .. });
                    let changed = transcript.apply(event);
                    if changed && streaming {
                        freeze_at = Some(Instant::now() + freeze_after);
                    }
                    changed
                }
                Some(Command::Start(reply)) => {
                    let accepted = transcript.apply(VoiceEvent::Start);
                    let _ = reply.send(accepted);
                    accepted
                }
                Some(Command::Clear) => {
                    transcript.clear();
                    freeze_at = None;
                    true
                }
                Some(Command::Snapshot(reply)) => {
                    let _ = reply.send(transcript.view());
                    false
                }
                None => break,
            },
            _ = async move {
                if let Some(at) = deadline {
                    sleep_until(at).await;
                }
            }, if deadline.is_some() => {
                freeze_at = None;
                transcript.freeze()
            }
        };

        if changed {
            updates.send_replace(transcript.view());
        }
    }

    debug!("Voice dispatcher stopped");
}
