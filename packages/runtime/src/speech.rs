//! Speech queue between the workout controller and a blocking synthesizer.
//!
//! The controller never waits on audio: cues go into an unbounded channel
//! and a single worker speaks them in order. When a backlog builds up, a
//! high priority cue discards the lower priority cues queued before it.

use fitgoose_core::{Cue, Priority, SpeechSink};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Controller-side sink; never blocks
#[derive(Debug, Clone)]
pub struct QueuedSpeech {
    tx: mpsc::UnboundedSender<Cue>,
}

impl QueuedSpeech {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Cue>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl SpeechSink for QueuedSpeech {
    fn speak(&mut self, text: &str, priority: Priority) {
        let cue = Cue {
            text: text.to_string(),
            priority,
        };
        if self.tx.send(cue).is_err() {
            tracing::trace!("speech worker gone; cue dropped");
        }
    }
}

/// Collapse a backlog: every high priority cue drops the lower priority
/// cues that were waiting ahead of it.
pub fn coalesce(backlog: Vec<Cue>) -> Vec<Cue> {
    let mut kept: Vec<Cue> = Vec::with_capacity(backlog.len());
    for cue in backlog {
        if cue.priority == Priority::High {
            kept.retain(|queued| queued.priority == Priority::High);
        }
        kept.push(cue);
    }
    kept
}

/// Speak queued cues until every sender is dropped, then hand the sink
/// back.
pub fn spawn_speech_worker<S>(mut rx: mpsc::UnboundedReceiver<Cue>, mut sink: S) -> JoinHandle<S>
where
    S: SpeechSink + Send + 'static,
{
    tokio::spawn(async move {
        while let Some(first) = rx.recv().await {
            let mut backlog = vec![first];
            while let Ok(next) = rx.try_recv() {
                backlog.push(next);
            }

            let queued = backlog.len();
            let batch = coalesce(backlog);
            if batch.len() < queued {
                tracing::debug!(dropped = queued - batch.len(), "speech backlog coalesced");
            }

            for cue in batch {
                sink.speak(&cue.text, cue.priority);
                tokio::task::yield_now().await;
            }
        }
        tracing::debug!("speech worker stopped");
        sink
    })
}
