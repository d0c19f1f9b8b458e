use std::collections::HashMap;

use chrono::{DateTime, Utc};
use fitgoose_core::{ExerciseKind, Mood};
use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, RwLock};
use tracing::debug;
use uuid::Uuid;

const CHANNEL_CAPACITY: usize = 1024;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum WorkoutEvent {
    #[serde(rename = "SESSION_STARTED")]
    SessionStarted(SessionStartedPayload),

    #[serde(rename = "SESSION_PAUSED")]
    SessionPaused(SessionPhasePayload),

    #[serde(rename = "SESSION_RESUMED")]
    SessionResumed(SessionPhasePayload),

    #[serde(rename = "SESSION_ENDED")]
    SessionEnded(SessionEndedPayload),

    #[serde(rename = "EXERCISE_CHANGED")]
    ExerciseChanged(ExerciseChangedPayload),

    #[serde(rename = "REP_ACCEPTED")]
    RepAccepted(RepAcceptedPayload),

    #[serde(rename = "ENERGY_DECAYED")]
    EnergyDecayed(EnergyDecayedPayload),
}

impl WorkoutEvent {
    pub fn event_type(&self) -> &'static str {
        match self {
            WorkoutEvent::SessionStarted(_) => "SESSION_STARTED",
            WorkoutEvent::SessionPaused(_) => "SESSION_PAUSED",
            WorkoutEvent::SessionResumed(_) => "SESSION_RESUMED",
            WorkoutEvent::SessionEnded(_) => "SESSION_ENDED",
            WorkoutEvent::ExerciseChanged(_) => "EXERCISE_CHANGED",
            WorkoutEvent::RepAccepted(_) => "REP_ACCEPTED",
            WorkoutEvent::EnergyDecayed(_) => "ENERGY_DECAYED",
        }
    }

    pub fn session_id(&self) -> Option<Uuid> {
        match self {
            WorkoutEvent::SessionStarted(p) => Some(p.session_id),
            WorkoutEvent::SessionPaused(p) | WorkoutEvent::SessionResumed(p) => p.session_id,
            WorkoutEvent::SessionEnded(p) => Some(p.session_id),
            WorkoutEvent::ExerciseChanged(p) => p.session_id,
            WorkoutEvent::RepAccepted(p) => Some(p.session_id),
            WorkoutEvent::EnergyDecayed(p) => p.session_id,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStartedPayload {
    pub session_id: Uuid,
    pub exercise: ExerciseKind,
    pub energy_level: f64,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionPhasePayload {
    pub session_id: Option<Uuid>,
    pub energy_level: f64,
    pub mood: Mood,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionEndedPayload {
    pub session_id: Uuid,
    pub total_reps: u32,
    pub duration_seconds: u64,
    pub energy_level_at_end: f64,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExerciseChangedPayload {
    pub session_id: Option<Uuid>,
    pub exercise: ExerciseKind,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepAcceptedPayload {
    pub session_id: Uuid,
    pub exercise: ExerciseKind,
    pub rep_count: u32,
    pub total_reps: u32,
    pub is_correct_form: bool,
    pub energy_delta: f64,
    pub energy_level: f64,
    pub mood: Mood,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnergyDecayedPayload {
    pub session_id: Option<Uuid>,
    pub ticks: u32,
    pub energy_level: f64,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct EventEnvelope {
    pub id: String,
    pub event: WorkoutEvent,
    pub created_at: DateTime<Utc>,
}

impl EventEnvelope {
    pub fn new(event: WorkoutEvent) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            event,
            created_at: Utc::now(),
        }
    }
}

type SubscriberId = String;

struct Subscriber {
    session_id: Option<Uuid>,
    event_types: Option<Vec<String>>,
    sender: broadcast::Sender<EventEnvelope>,
}

impl Subscriber {
    fn matches(&self, envelope: &EventEnvelope) -> bool {
        if let Some(session_id) = self.session_id {
            if envelope.event.session_id() != Some(session_id) {
                return false;
            }
        }

        if let Some(ref event_types) = self.event_types {
            if !event_types.iter().any(|t| t == envelope.event.event_type()) {
                return false;
            }
        }

        true
    }
}

pub struct EventBus {
    global_sender: broadcast::Sender<EventEnvelope>,
    subscribers: RwLock<HashMap<SubscriberId, Subscriber>>,
    event_count: RwLock<u64>,
}

impl EventBus {
    pub fn new() -> Self {
        let (global_sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            global_sender,
            subscribers: RwLock::new(HashMap::new()),
            event_count: RwLock::new(0),
        }
    }

    pub async fn publish(&self, event: WorkoutEvent) {
        let envelope = EventEnvelope::new(event);
        let event_type = envelope.event.event_type();

        {
            let mut count = self.event_count.write().await;
            *count += 1;
        }

        let subscribers = self.subscribers.read().await;
        let mut sent_count = 0usize;

        for subscriber in subscribers.values() {
            if subscriber.matches(&envelope) && subscriber.sender.send(envelope.clone()).is_ok() {
                sent_count += 1;
            }
        }

        if self.global_sender.send(envelope).is_err() {
            debug!("No global subscribers for event");
        }

        debug!(event_type, sent_to = sent_count, "Event published");
    }

    pub fn subscribe_global(&self) -> broadcast::Receiver<EventEnvelope> {
        self.global_sender.subscribe()
    }

    pub async fn subscribe_filtered(
        &self,
        session_id: Option<Uuid>,
        event_types: Option<Vec<String>>,
    ) -> (SubscriberId, broadcast::Receiver<EventEnvelope>) {
        let (sender, receiver) = broadcast::channel(CHANNEL_CAPACITY);
        let subscriber_id = Uuid::new_v4().to_string();

        let subscriber = Subscriber {
            session_id,
            event_types,
            sender,
        };

        {
            let mut subscribers = self.subscribers.write().await;
            subscribers.insert(subscriber_id.clone(), subscriber);
        }

        debug!(subscriber_id = %subscriber_id, "New filtered subscription created");

        (subscriber_id, receiver)
    }

    pub async fn unsubscribe(&self, subscriber_id: &str) {
        let mut subscribers = self.subscribers.write().await;
        if subscribers.remove(subscriber_id).is_some() {
            debug!(subscriber_id = %subscriber_id, "Subscription removed");
        }
    }

    pub async fn event_count(&self) -> u64 {
        *self.event_count.read().await
    }

    pub async fn stats(&self) -> EventBusStats {
        EventBusStats {
            total_events: self.event_count().await,
            global_subscribers: self.global_sender.receiver_count(),
            filtered_subscribers: self.subscribers.read().await.len(),
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EventBusStats {
    pub total_events: u64,
    pub global_subscribers: usize,
    pub filtered_subscribers: usize,
}
