//! Gamification State Machine
//!
//! The goose mascot's energy meter and mood. Energy is clamped to
//! `[0, 100]` after every mutation; mood is recomputed only when a rep
//! delta lands, never by decay.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::config::GooseConfig;
use crate::sanitize::clamp_energy;
use crate::types::ExerciseKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Excited,
    Encouraging,
    Focused,
    Celebrating,
}

impl Mood {
    pub fn as_str(self) -> &'static str {
        match self {
            Mood::Excited => "excited",
            Mood::Encouraging => "encouraging",
            Mood::Focused => "focused",
            Mood::Celebrating => "celebrating",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GooseState {
    pub energy_level: f64,
    pub mood: Mood,
    pub current_exercise: Option<ExerciseKind>,
    pub session_active: bool,
}

impl Default for GooseState {
    fn default() -> Self {
        Self {
            energy_level: 0.0,
            mood: Mood::Focused,
            current_exercise: None,
            session_active: false,
        }
    }
}

/// Converts wall-clock time into whole decay ticks.
///
/// Running only between start/resume and pause/stop. Partial intervals
/// carry over to the next call.
#[derive(Debug, Clone)]
pub struct DecayClock {
    interval: Duration,
    anchor: Option<DateTime<Utc>>,
}

impl DecayClock {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            anchor: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.anchor.is_some()
    }

    pub fn restart(&mut self, now: DateTime<Utc>) {
        self.anchor = Some(now);
    }

    pub fn halt(&mut self) {
        self.anchor = None;
    }

    /// Number of full intervals elapsed since the last call
    pub fn due(&mut self, now: DateTime<Utc>) -> u32 {
        let Some(anchor) = self.anchor else {
            return 0;
        };
        let interval_ms = self.interval.num_milliseconds();
        let elapsed_ms = (now - anchor).num_milliseconds();
        if interval_ms <= 0 || elapsed_ms < interval_ms {
            return 0;
        }

        let ticks = elapsed_ms / interval_ms;
        self.anchor = Some(anchor + Duration::milliseconds(ticks * interval_ms));
        ticks.min(u32::MAX as i64) as u32
    }
}

#[derive(Debug, Clone)]
pub struct Goose {
    config: GooseConfig,
    state: GooseState,
    clock: DecayClock,
}

impl Goose {
    pub fn new(config: GooseConfig) -> Self {
        let clock = DecayClock::new(Duration::milliseconds(config.decay_interval_ms));
        Self {
            config,
            state: GooseState::default(),
            clock,
        }
    }

    pub fn state(&self) -> &GooseState {
        &self.state
    }

    pub fn energy(&self) -> f64 {
        self.state.energy_level
    }

    /// Energy is set to the start floor, not added
    pub fn start(&mut self, exercise: ExerciseKind, now: DateTime<Utc>) {
        self.state.session_active = true;
        self.state.mood = Mood::Excited;
        self.state.energy_level = clamp_energy(self.config.start_energy);
        self.state.current_exercise = Some(exercise);
        self.clock.restart(now);
    }

    pub fn pause(&mut self) {
        self.state.session_active = false;
        self.state.mood = Mood::Focused;
        self.clock.halt();
    }

    pub fn resume(&mut self, now: DateTime<Utc>) {
        self.state.session_active = true;
        self.state.mood = Mood::Encouraging;
        self.clock.restart(now);
    }

    pub fn stop(&mut self) {
        self.state.session_active = false;
        self.state.mood = Mood::Celebrating;
        self.state.energy_level = 0.0;
        self.clock.halt();
    }

    pub fn change_exercise(&mut self, exercise: ExerciseKind) {
        self.state.current_exercise = Some(exercise);
        self.state.mood = Mood::Focused;
    }

    pub fn apply_delta(&mut self, delta: f64, correct_form: bool) {
        self.state.energy_level = clamp_energy(self.state.energy_level + delta);
        self.state.mood = self.mood_for(self.state.energy_level, correct_form);
    }

    fn mood_for(&self, energy: f64, correct_form: bool) -> Mood {
        if energy >= self.config.celebrating_threshold {
            Mood::Celebrating
        } else if energy >= self.config.excited_threshold {
            Mood::Excited
        } else if correct_form {
            Mood::Encouraging
        } else {
            Mood::Focused
        }
    }

    /// One decay step. No-op while the session is inactive.
    pub fn decay(&mut self) {
        if !self.state.session_active {
            return;
        }
        self.state.energy_level = clamp_energy(self.state.energy_level - self.config.decay_amount);
    }

    /// Apply every decay step that fell due by `now`; returns the count.
    pub fn tick(&mut self, now: DateTime<Utc>) -> u32 {
        if !self.state.session_active {
            return 0;
        }
        let ticks = self.clock.due(now);
        for _ in 0..ticks {
            self.decay();
        }
        if ticks > 0 {
            tracing::trace!(ticks, energy = self.state.energy_level, "energy decayed");
        }
        ticks
    }

    pub fn tier(&self) -> EnergyTier {
        EnergyTier::from_energy(self.state.energy_level)
    }
}

/// Presentation band of the energy meter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnergyTier {
    LetsBegin,
    GettingStarted,
    BuildingUp,
    GoodEnergy,
    HighEnergy,
    MaximumPower,
}

impl EnergyTier {
    pub fn from_energy(energy: f64) -> Self {
        match energy {
            e if e >= 90.0 => EnergyTier::MaximumPower,
            e if e >= 70.0 => EnergyTier::HighEnergy,
            e if e >= 50.0 => EnergyTier::GoodEnergy,
            e if e >= 30.0 => EnergyTier::BuildingUp,
            e if e >= 10.0 => EnergyTier::GettingStarted,
            _ => EnergyTier::LetsBegin,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            EnergyTier::MaximumPower => "MAXIMUM POWER! 🔥",
            EnergyTier::HighEnergy => "HIGH ENERGY! 💥",
            EnergyTier::GoodEnergy => "Good Energy! ⚡",
            EnergyTier::BuildingUp => "Building Up... 📈",
            EnergyTier::GettingStarted => "Getting Started... 🌱",
            EnergyTier::LetsBegin => "Let's Begin! 🚀",
        }
    }
}

/// Badge level 1..=5, one step per 20 energy
pub fn level_badge(energy: f64) -> u8 {
    let level = (clamp_energy(energy) / 20.0).floor() as u8 + 1;
    level.min(5)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t0() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-03-01T08:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn started() -> Goose {
        let mut goose = Goose::new(GooseConfig::default());
        goose.start(ExerciseKind::Squat, t0());
        goose
    }

    #[test]
    fn test_initial_state() {
        let goose = Goose::new(GooseConfig::default());
        assert_eq!(goose.state(), &GooseState::default());
        assert_eq!(goose.state().mood, Mood::Focused);
    }

    #[test]
    fn test_start_sets_floor() {
        let mut goose = started();
        goose.apply_delta(50.0, true);
        goose.start(ExerciseKind::Pushup, t0());
        assert_eq!(goose.energy(), 10.0);
        assert_eq!(goose.state().mood, Mood::Excited);
        assert_eq!(goose.state().current_exercise, Some(ExerciseKind::Pushup));
    }

    #[test]
    fn test_mood_thresholds() {
        let mut goose = started();
        goose.apply_delta(5.0, true);
        assert_eq!(goose.state().mood, Mood::Encouraging);
        goose.apply_delta(1.0, false);
        assert_eq!(goose.state().mood, Mood::Focused);
        goose.apply_delta(54.0, false);
        assert_eq!(goose.energy(), 70.0);
        assert_eq!(goose.state().mood, Mood::Excited);
        goose.apply_delta(500.0, true);
        assert_eq!(goose.energy(), 100.0);
        assert_eq!(goose.state().mood, Mood::Celebrating);
    }

    #[test]
    fn test_decay_three_ticks() {
        let mut goose = started();
        let ticks = goose.tick(t0() + Duration::seconds(35));
        assert_eq!(ticks, 3);
        assert_eq!(goose.energy(), 7.0);
        assert_eq!(goose.state().mood, Mood::Excited);

        // the remaining 5s carry over
        assert_eq!(goose.tick(t0() + Duration::seconds(40)), 1);
    }

    #[test]
    fn test_decay_never_below_zero() {
        let mut goose = started();
        goose.tick(t0() + Duration::seconds(1_000));
        assert_eq!(goose.energy(), 0.0);
    }

    #[test]
    fn test_paused_goose_does_not_decay() {
        let mut goose = started();
        goose.pause();
        assert_eq!(goose.tick(t0() + Duration::seconds(60)), 0);
        goose.decay();
        assert_eq!(goose.energy(), 10.0);

        goose.resume(t0() + Duration::seconds(60));
        assert_eq!(goose.state().mood, Mood::Encouraging);
        assert_eq!(goose.tick(t0() + Duration::seconds(69)), 0);
        assert_eq!(goose.tick(t0() + Duration::seconds(70)), 1);
    }

    #[test]
    fn test_stop_zeroes_energy() {
        let mut goose = started();
        goose.apply_delta(40.0, true);
        goose.stop();
        assert_eq!(goose.energy(), 0.0);
        assert_eq!(goose.state().mood, Mood::Celebrating);
        assert!(!goose.state().session_active);
    }

    #[test]
    fn test_change_exercise_keeps_energy() {
        let mut goose = started();
        goose.apply_delta(20.0, true);
        goose.change_exercise(ExerciseKind::JumpingJack);
        assert_eq!(goose.energy(), 30.0);
        assert_eq!(goose.state().mood, Mood::Focused);
    }

    #[test]
    fn test_tiers_and_badges() {
        assert_eq!(EnergyTier::from_energy(0.0), EnergyTier::LetsBegin);
        assert_eq!(EnergyTier::from_energy(10.0), EnergyTier::GettingStarted);
        assert_eq!(EnergyTier::from_energy(89.9), EnergyTier::HighEnergy);
        assert_eq!(EnergyTier::from_energy(90.0).label(), "MAXIMUM POWER! 🔥");
        assert_eq!(level_badge(0.0), 1);
        assert_eq!(level_badge(39.0), 2);
        assert_eq!(level_badge(100.0), 5);
    }

    #[test]
    fn test_goose_state_json() {
        let json = serde_json::to_value(GooseState::default()).unwrap();
        assert_eq!(json["energyLevel"], 0.0);
        assert_eq!(json["mood"], "focused");
        assert_eq!(json["sessionActive"], false);
    }
}
