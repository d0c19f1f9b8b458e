use chrono::{DateTime, TimeZone, Utc};
use fitgoose_core::{
    level_badge, parse_voice_command, CommandOutcome, CoreConfig, ExerciseJudgment, ExerciseKind,
    PoseFrame, RecordingSpeech, WorkoutController,
};
use wasm_bindgen::prelude::*;

use crate::landmarks::frame_from_coords;

#[wasm_bindgen]
#[derive(Clone, Copy, Debug)]
pub struct FrameOutcome {
    pub rep_count: u32,
    pub total_reps: u32,
    pub is_correct_form: bool,
    pub confidence: f64,
    /// A new rep reached the session on this frame
    pub rep_accepted: bool,
    pub energy_level: f64,
    pub is_valid: bool,
}

impl FrameOutcome {
    fn invalid(rep_count: u32, energy_level: f64, total_reps: u32) -> Self {
        Self {
            rep_count,
            total_reps,
            is_correct_form: false,
            confidence: 0.0,
            rep_accepted: false,
            energy_level,
            is_valid: false,
        }
    }
}

fn at(timestamp: f64) -> DateTime<Utc> {
    Utc.timestamp_millis_opt(timestamp as i64)
        .single()
        .unwrap_or_default()
}

fn js_err(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Browser-side workout engine. Timestamps are epoch milliseconds.
#[wasm_bindgen]
pub struct FitGooseEngine {
    controller: WorkoutController<RecordingSpeech>,
}

#[wasm_bindgen]
impl FitGooseEngine {
    #[wasm_bindgen(constructor)]
    pub fn new(seed: Option<u32>) -> Self {
        Self::build(CoreConfig::default(), seed)
    }

    #[wasm_bindgen(js_name = fromConfig)]
    pub fn from_config(config_json: &str, seed: Option<u32>) -> Result<FitGooseEngine, JsValue> {
        let config = CoreConfig::from_json(config_json).map_err(js_err)?;
        Ok(Self::build(config, seed))
    }

    /// Returns the new session id
    #[wasm_bindgen]
    pub fn start(&mut self, timestamp: f64) -> Result<String, JsValue> {
        self.controller
            .start(at(timestamp))
            .map(|session| session.id.to_string())
            .map_err(js_err)
    }

    #[wasm_bindgen]
    pub fn pause(&mut self, timestamp: f64) -> Result<(), JsValue> {
        self.controller.pause(at(timestamp)).map_err(js_err)
    }

    #[wasm_bindgen]
    pub fn resume(&mut self, timestamp: f64) -> Result<(), JsValue> {
        self.controller.resume(at(timestamp)).map_err(js_err)
    }

    /// Closed session as a plain object, or `null` when none was open
    #[wasm_bindgen]
    pub fn stop(&mut self, timestamp: f64) -> Result<JsValue, JsValue> {
        match self.controller.stop(at(timestamp)) {
            Some(session) => serde_wasm_bindgen::to_value(&session).map_err(js_err),
            None => Ok(JsValue::NULL),
        }
    }

    #[wasm_bindgen(js_name = changeExercise)]
    pub fn change_exercise(&mut self, name: &str) -> Result<(), JsValue> {
        let kind: ExerciseKind = name.parse().map_err(js_err)?;
        self.controller.change_exercise(kind);
        Ok(())
    }

    #[wasm_bindgen(js_name = resetReps)]
    pub fn reset_reps(&mut self) {
        self.controller.reset_reps();
    }

    #[wasm_bindgen(js_name = repeatInstruction)]
    pub fn repeat_instruction(&mut self) {
        self.controller.repeat_instruction();
    }

    /// Flat `[x, y, z, visibility]` per landmark
    #[wasm_bindgen(js_name = processCoords)]
    pub fn process_coords(&mut self, coords: &[f64], timestamp: f64) -> FrameOutcome {
        match frame_from_coords(coords) {
            Ok(frame) => self.process(&frame, timestamp),
            Err(_) => self.invalid_outcome(),
        }
    }

    /// Array of `{x, y, z?, visibility?}` (or `null` for dropped joints)
    #[wasm_bindgen(js_name = processLandmarks)]
    pub fn process_landmarks(&mut self, landmarks_js: JsValue, timestamp: f64) -> FrameOutcome {
        match serde_wasm_bindgen::from_value::<PoseFrame>(landmarks_js) {
            Ok(frame) => self.process(&frame, timestamp),
            Err(_) => self.invalid_outcome(),
        }
    }

    /// Feed a judgment produced elsewhere; `true` when it counted as a new rep
    #[wasm_bindgen(js_name = submitJudgment)]
    pub fn submit_judgment(&mut self, judgment_js: JsValue, timestamp: f64) -> Result<bool, JsValue> {
        let judgment: ExerciseJudgment =
            serde_wasm_bindgen::from_value(judgment_js).map_err(js_err)?;
        Ok(self
            .controller
            .submit_judgment(judgment, at(timestamp))
            .is_some())
    }

    /// Apply due energy decay; returns the number of steps
    #[wasm_bindgen]
    pub fn tick(&mut self, timestamp: f64) -> u32 {
        self.controller.tick(at(timestamp))
    }

    /// Run a recognised phrase. Returns what happened, or `undefined`
    /// when the phrase held no command.
    #[wasm_bindgen(js_name = handleTranscript)]
    pub fn handle_transcript(
        &mut self,
        transcript: &str,
        timestamp: f64,
    ) -> Result<Option<String>, JsValue> {
        let Some(command) = parse_voice_command(transcript) else {
            return Ok(None);
        };
        let outcome = self
            .controller
            .handle_command(command, at(timestamp))
            .map_err(js_err)?;
        let label = match outcome {
            CommandOutcome::Started => "started",
            CommandOutcome::Paused => "paused",
            CommandOutcome::Resumed => "resumed",
            CommandOutcome::Ended(_) => "ended",
            CommandOutcome::ExerciseChanged(_) => "exercise_changed",
            CommandOutcome::InstructionRepeated => "instruction_repeated",
        };
        Ok(Some(label.to_string()))
    }

    #[wasm_bindgen]
    pub fn energy(&self) -> f64 {
        self.controller.goose().energy_level
    }

    #[wasm_bindgen]
    pub fn mood(&self) -> String {
        self.controller.goose().mood.as_str().to_string()
    }

    #[wasm_bindgen]
    pub fn phase(&self) -> String {
        self.controller.phase().as_str().to_string()
    }

    #[wasm_bindgen]
    pub fn exercise(&self) -> String {
        self.controller.exercise().as_str().to_string()
    }

    #[wasm_bindgen(js_name = badgeLevel)]
    pub fn badge_level(&self) -> u8 {
        level_badge(self.controller.goose().energy_level)
    }

    #[wasm_bindgen(js_name = totalReps)]
    pub fn total_reps(&self) -> u32 {
        self.controller.session().map_or(0, |s| s.total_reps)
    }

    #[wasm_bindgen(js_name = latestFeedback)]
    pub fn latest_feedback(&self) -> Option<String> {
        self.controller
            .latest_judgment()
            .map(|j| j.feedback_text.clone())
    }

    #[wasm_bindgen(js_name = gooseState)]
    pub fn goose_state(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(self.controller.goose()).map_err(js_err)
    }

    /// Open session, or `null`
    #[wasm_bindgen]
    pub fn session(&self) -> Result<JsValue, JsValue> {
        match self.controller.session() {
            Some(session) => serde_wasm_bindgen::to_value(session).map_err(js_err),
            None => Ok(JsValue::NULL),
        }
    }

    #[wasm_bindgen]
    pub fn snapshot(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.controller.snapshot()).map_err(js_err)
    }

    #[wasm_bindgen(js_name = speechConfig)]
    pub fn speech_config(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(self.controller.coach().config()).map_err(js_err)
    }

    /// Cues spoken since the last drain, oldest first
    #[wasm_bindgen(js_name = drainSpeech)]
    pub fn drain_speech(&mut self) -> Result<JsValue, JsValue> {
        let cues = self.take_cues();
        serde_wasm_bindgen::to_value(&cues).map_err(js_err)
    }
}

impl FitGooseEngine {
    fn build(config: CoreConfig, seed: Option<u32>) -> Self {
        let speech = RecordingSpeech::new();
        let controller = match seed {
            Some(seed) => WorkoutController::with_seed(config, speech, u64::from(seed)),
            None => WorkoutController::new(config, speech),
        };
        Self { controller }
    }

    fn process(&mut self, frame: &PoseFrame, timestamp: f64) -> FrameOutcome {
        let (judgment, accepted) = self.controller.process_frame(frame, at(timestamp));
        FrameOutcome {
            rep_count: judgment.rep_count,
            total_reps: self.total_reps(),
            is_correct_form: judgment.is_correct_form,
            confidence: judgment.confidence,
            rep_accepted: accepted.is_some(),
            energy_level: self.energy(),
            is_valid: true,
        }
    }

    fn invalid_outcome(&self) -> FrameOutcome {
        FrameOutcome::invalid(
            self.controller.classifier_state().rep_count,
            self.energy(),
            self.total_reps(),
        )
    }

    fn take_cues(&mut self) -> Vec<fitgoose_core::Cue> {
        self.controller.coach_mut().sink_mut().drain()
    }
}
