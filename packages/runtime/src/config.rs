use std::path::PathBuf;
use std::time::Duration;

use fitgoose_core::{CoreConfig, ExerciseKind};

use crate::error::{RuntimeError, RuntimeResult};

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub log_level: String,
    pub file_logs: bool,
    pub log_dir: PathBuf,
    pub exercise: ExerciseKind,
    pub demo_cadence: Duration,
    pub demo_good_form: f64,
    /// Fixes phrase selection and demo form verdicts
    pub seed: Option<u64>,
    /// How often the decay clock is polled
    pub decay_poll: Duration,
    pub core: CoreConfig,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            file_logs: false,
            log_dir: PathBuf::from("./logs"),
            exercise: ExerciseKind::Squat,
            demo_cadence: Duration::from_millis(2_000),
            demo_good_form: 0.8,
            seed: None,
            decay_poll: Duration::from_millis(1_000),
            core: CoreConfig::default(),
        }
    }
}

impl RuntimeConfig {
    pub fn from_env() -> RuntimeResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable source; unset variables keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> RuntimeResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let log_level = lookup("RUST_LOG").unwrap_or(defaults.log_level);

        let file_logs = lookup("ENABLE_FILE_LOGS")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(defaults.file_logs);

        let log_dir = lookup("LOG_DIR").map(PathBuf::from).unwrap_or(defaults.log_dir);

        let exercise = match lookup("FITGOOSE_EXERCISE") {
            Some(raw) => raw.parse::<ExerciseKind>()?,
            None => defaults.exercise,
        };

        let demo_cadence = parse_var(&lookup, "FITGOOSE_DEMO_CADENCE_MS")?
            .map(Duration::from_millis)
            .unwrap_or(defaults.demo_cadence);
        if demo_cadence.is_zero() {
            return Err(RuntimeError::Env {
                name: "FITGOOSE_DEMO_CADENCE_MS",
                reason: "must be greater than zero".to_string(),
            });
        }

        let demo_good_form = parse_var::<f64, _>(&lookup, "FITGOOSE_DEMO_GOOD_FORM")?
            .unwrap_or(defaults.demo_good_form);
        if !(0.0..=1.0).contains(&demo_good_form) {
            return Err(RuntimeError::Env {
                name: "FITGOOSE_DEMO_GOOD_FORM",
                reason: format!("{demo_good_form} is outside [0, 1]"),
            });
        }

        let seed = parse_var(&lookup, "FITGOOSE_SEED")?;

        let decay_poll = parse_var(&lookup, "FITGOOSE_DECAY_POLL_MS")?
            .map(Duration::from_millis)
            .unwrap_or(defaults.decay_poll)
            .max(Duration::from_millis(1));

        let core = match lookup("FITGOOSE_CONFIG") {
            Some(path) => {
                let raw = std::fs::read_to_string(&path)?;
                CoreConfig::from_json(&raw)?
            }
            None => defaults.core,
        };

        Ok(Self {
            log_level,
            file_logs,
            log_dir,
            exercise,
            demo_cadence,
            demo_good_form,
            seed,
            decay_poll,
            core,
        })
    }
}

fn parse_var<T, F>(lookup: &F, name: &'static str) -> RuntimeResult<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| RuntimeError::Env {
                name,
                reason: e.to_string(),
            }),
    }
}
