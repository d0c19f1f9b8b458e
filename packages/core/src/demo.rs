//! Simulated judgment feed for running without a camera.
//!
//! Each call produces one completed rep with a random form verdict.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::classifier::{ExerciseJudgment, PhaseTransition};
use crate::types::ExerciseKind;

pub const DEMO_CONFIDENCE: f64 = 0.8;
pub const DEFAULT_GOOD_FORM_PROBABILITY: f64 = 0.8;

#[derive(Debug, Clone)]
pub struct DemoJudgmentSource {
    exercise: ExerciseKind,
    rep_count: u32,
    good_form_probability: f64,
    rng: ChaCha8Rng,
}

impl DemoJudgmentSource {
    /// `good_form_probability` is clamped to `[0, 1]`; NaN means never.
    pub fn new(exercise: ExerciseKind, good_form_probability: f64, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        let p = if good_form_probability.is_nan() {
            0.0
        } else {
            good_form_probability.clamp(0.0, 1.0)
        };
        Self {
            exercise,
            rep_count: 0,
            good_form_probability: p,
            rng,
        }
    }

    pub fn exercise(&self) -> ExerciseKind {
        self.exercise
    }

    pub fn rep_count(&self) -> u32 {
        self.rep_count
    }

    /// Switching exercise restarts the count, like a real classifier
    pub fn set_exercise(&mut self, exercise: ExerciseKind) {
        self.exercise = exercise;
        self.rep_count = 0;
    }

    pub fn reset(&mut self) {
        self.rep_count = 0;
    }

    pub fn next_judgment(&mut self) -> ExerciseJudgment {
        self.rep_count += 1;
        let is_correct_form = self.rng.gen_bool(self.good_form_probability);

        ExerciseJudgment {
            exercise_kind: self.exercise,
            is_correct_form,
            rep_count: self.rep_count,
            confidence: DEMO_CONFIDENCE,
            feedback_text: format!("Demo {} rep {}!", self.exercise, self.rep_count),
            tips: Vec::new(),
            transition: Some(PhaseTransition::Completed),
        }
    }
}
