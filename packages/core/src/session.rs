//! Rep/Session Aggregator
//!
//! Turns the per-frame judgment stream into session mutations. Only a
//! judgment whose `rep_count` is strictly greater than the last accepted
//! one counts; everything else is a repeat of the current rep.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::classifier::ExerciseJudgment;
use crate::config::ScoringConfig;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutSession {
    pub id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub exercise_history: Vec<ExerciseJudgment>,
    pub total_reps: u32,
    pub duration_seconds: u64,
    pub energy_level_at_end: f64,
}

impl WorkoutSession {
    pub fn begin(now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            start_time: now,
            end_time: None,
            exercise_history: Vec::new(),
            total_reps: 0,
            duration_seconds: 0,
            energy_level_at_end: 0.0,
        }
    }

    pub fn is_open(&self) -> bool {
        self.end_time.is_none()
    }

    /// Whole seconds since start; never negative
    pub fn elapsed_seconds(&self, now: DateTime<Utc>) -> u64 {
        (now - self.start_time).num_seconds().max(0) as u64
    }

    pub fn record_energy(&mut self, energy: f64) {
        self.energy_level_at_end = energy;
    }

    pub fn close(&mut self, now: DateTime<Utc>, energy: f64) {
        self.duration_seconds = self.elapsed_seconds(now);
        self.end_time = Some(now);
        self.energy_level_at_end = energy;
    }
}

/// Outcome of a judgment that passed deduplication
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AcceptedRep {
    pub rep_count: u32,
    pub total_reps: u32,
    pub is_correct_form: bool,
    pub energy_delta: f64,
    /// Gap since the previous accepted rep; `None` on the first rep
    pub gap_ms: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct RepAggregator {
    scoring: ScoringConfig,
    last_rep_count: u32,
    last_rep_at: Option<DateTime<Utc>>,
    /// Reps finished under earlier exercises of this session
    banked_reps: u32,
}

impl RepAggregator {
    pub fn new(scoring: ScoringConfig) -> Self {
        Self {
            scoring,
            last_rep_count: 0,
            last_rep_at: None,
            banked_reps: 0,
        }
    }

    pub fn last_rep_count(&self) -> u32 {
        self.last_rep_count
    }

    /// Forget everything; used when a new session starts
    pub fn reset(&mut self) {
        self.last_rep_count = 0;
        self.last_rep_at = None;
        self.banked_reps = 0;
    }

    /// Follow a classifier reset: bank the reps seen so far and accept
    /// counts from 1 again.
    pub fn rebase(&mut self) {
        self.banked_reps += self.last_rep_count;
        self.last_rep_count = 0;
    }

    pub fn energy_delta(&self, judgment: &ExerciseJudgment, now: DateTime<Utc>) -> f64 {
        let s = &self.scoring;
        if !judgment.is_correct_form {
            return s.incorrect_form_reward;
        }

        let mut delta = s.correct_form_base;

        if let Some(last) = self.last_rep_at {
            if (now - last).num_milliseconds() < s.consistency_window_ms {
                delta += s.consistency_bonus;
            }
        }

        // mod-10 wins over mod-5 on multiples of ten
        if judgment.rep_count % s.major_milestone_every == 0 {
            delta += s.major_milestone_bonus;
        } else if judgment.rep_count % s.minor_milestone_every == 0 {
            delta += s.minor_milestone_bonus;
        }

        delta
    }

    pub fn submit(
        &mut self,
        session: &mut WorkoutSession,
        judgment: &ExerciseJudgment,
        now: DateTime<Utc>,
    ) -> Option<AcceptedRep> {
        if judgment.rep_count <= self.last_rep_count {
            return None;
        }

        let energy_delta = self.energy_delta(judgment, now);
        let gap_ms = self.last_rep_at.map(|last| (now - last).num_milliseconds());

        session.exercise_history.push(judgment.clone());
        session.total_reps = self.banked_reps + judgment.rep_count;

        self.last_rep_at = Some(now);
        self.last_rep_count = judgment.rep_count;

        tracing::debug!(
            rep = judgment.rep_count,
            total = session.total_reps,
            correct = judgment.is_correct_form,
            delta = energy_delta,
            "rep accepted"
        );

        Some(AcceptedRep {
            rep_count: judgment.rep_count,
            total_reps: session.total_reps,
            is_correct_form: judgment.is_correct_form,
            energy_delta,
            gap_ms,
        })
    }
}
