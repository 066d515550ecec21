//! Game session - owns all mutable game state and runs the per-frame tick
//!
//! Tick order: spawn check, wall advance + collision, debris, then the
//! latest hand sample. Rendering reads the session afterwards.

use std::collections::BTreeSet;

use nalgebra::{Point3, Vector3};
use rand::rngs::SmallRng;
use rand::SeedableRng;

use super::actuator::{Limb, LimbRig, LIMB_COUNT};
use super::calibration::{Calibration, CalibrationProfile, CaptureOutcome, CaptureStep, GameState};
use super::collision::{self, WallOutcome};
use super::debris::DebrisField;
use super::events::GameEvent;
use super::landmarks::{HandFrame, HandInput, LANDMARK_COUNT, TRACKED_TIPS};
use super::mode::{HitboxShape, ModeProfile, VisualMode};
use super::wall::{CellId, Obstacle, ObstacleId, WallSpawner};
use crate::config::GameConfig;
use crate::error::Result;

/// Raw tracker output waiting for the next tick
#[derive(Clone, Debug, PartialEq)]
pub enum HandSample {
    /// 21 × (x, y, z), validated when the tick picks it up
    Landmarks(Vec<f32>),
    Lost,
}

/// String from a fingertip marker down to a limb
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PuppetString {
    pub limb: Limb,
    pub from: Point3<f32>,
    pub to: Point3<f32>,
}

pub struct Session {
    config: GameConfig,
    calibration: Calibration,
    rig: LimbRig,
    mode: Option<ModeProfile>,
    spawner: WallSpawner,
    obstacles: Vec<Obstacle>,
    debris: DebrisField,
    score: i32,
    hand: Option<HandFrame>,
    pending_hand: Option<HandSample>,
    last_tick: Option<f64>,
    status: String,
    events: Vec<GameEvent>,
    rng: SmallRng,
}

impl Session {
    pub fn new(config: GameConfig, seed: u64) -> Self {
        let root = Point3::new(0.0, 0.0, config.wall.player_depth);
        Self {
            config,
            calibration: Calibration::new(),
            rig: LimbRig::new(root),
            mode: None,
            spawner: WallSpawner::new(),
            obstacles: Vec::new(),
            debris: DebrisField::new(),
            score: 0,
            hand: None,
            pending_hand: None,
            last_tick: None,
            status: status_for(GameState::CalibrateOpen).to_string(),
            events: Vec::new(),
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    // ========================================================================
    // INPUT
    // ========================================================================

    /// Latest value wins; an unprocessed sample is overwritten
    pub fn submit_hand(&mut self, sample: HandSample) {
        self.pending_hand = Some(sample);
    }

    /// Operator capture press (calibration only)
    pub fn capture(&mut self) -> CaptureOutcome {
        let curls = self.hand.as_ref().map(HandFrame::curls);
        let outcome = self.calibration.capture(curls);
        match outcome {
            CaptureOutcome::Captured(step) => {
                self.events.push(GameEvent::CalibrationCaptured { step });
                self.enter_state(self.calibration.state());
                if step == CaptureStep::Closed {
                    log::info!("✅ Calibration complete: {:?}", self.calibration.profile());
                }
            }
            CaptureOutcome::NoHand => {
                log::warn!("⚠️ Capture ignored: no hand detected");
                self.status = "⚠️ No hand detected - show your hand, then capture".to_string();
            }
            CaptureOutcome::NotCalibrating => {}
        }
        outcome
    }

    /// Switch skins; only the limb hitboxes matter to the core
    pub fn select_mode(&mut self, mode: VisualMode) {
        let profile = mode.profile();
        self.rig.set_hitboxes(profile.hitboxes);
        self.mode = Some(profile);
        log::info!("🎨 Visual mode: {:?}", mode);
    }

    /// Replace the mode's hitbox geometry with page-supplied boxes
    pub fn set_hitboxes(&mut self, hitboxes: [HitboxShape; LIMB_COUNT]) {
        self.rig.set_hitboxes(hitboxes);
        if let Some(profile) = self.mode.as_mut() {
            profile.hitboxes = hitboxes;
        }
    }

    // ========================================================================
    // TICK
    // ========================================================================

    /// One frame. `now` is wall-clock seconds.
    pub fn tick(&mut self, now: f64) {
        if !now.is_finite() {
            log::warn!("Ignoring tick with non-finite time {}", now);
            return;
        }
        let dt = match self.last_tick {
            Some(last) => ((now - last).max(0.0) as f32).min(self.config.max_frame_dt),
            None => 0.0,
        };
        self.last_tick = Some(now);

        // 1. Spawn
        if self.calibration.state() == GameState::Playing {
            if let Some(wall) = self.spawner.poll(now, &self.config.wall, &mut self.rng) {
                self.obstacles.push(wall);
            }
        }

        // 2. Advance + collision
        let limbs = self.rig.hitbox_bounds();
        let outcomes = collision::step(&mut self.obstacles, dt, &limbs, &self.config.wall, &mut self.score);
        for outcome in outcomes {
            self.resolve(outcome);
        }

        // 3. Debris
        self.debris.update(dt, &self.config.debris);

        // 4. Hand
        if let Some(sample) = self.pending_hand.take() {
            if let Err(e) = self.process_hand(sample, now) {
                log::warn!("Skipping hand frame: {}", e);
            }
        }
    }

    fn resolve(&mut self, outcome: WallOutcome) {
        let delta = outcome.score_delta();
        match outcome {
            WallOutcome::Crash { obstacle, cells } => {
                self.events.push(GameEvent::Crash { obstacle, cells: cells.iter().copied().collect() });
                self.events.push(GameEvent::ScoreChanged { delta, total: self.score });
                self.status = format!("💥 Crash! {}", delta);
                self.explode(obstacle, &cells);
            }
            WallOutcome::Pass { obstacle } => {
                self.events.push(GameEvent::Pass { obstacle });
                self.events.push(GameEvent::ScoreChanged { delta, total: self.score });
                self.status = format!("✨ Nice dodge! +{}", delta);
            }
        }
    }

    /// Blow the struck cells and their neighbours out of the wall
    fn explode(&mut self, id: ObstacleId, struck: &BTreeSet<CellId>) -> usize {
        let Some(obstacle) = self.obstacles.iter_mut().find(|o| o.id == id) else {
            return 0;
        };
        let selected = obstacle.cells_near(struck, self.config.debris.explosion_radius);
        let detached = obstacle.detach(&selected);

        let wall_velocity = Vector3::new(0.0, 0.0, self.config.wall.speed);
        let count = self.debris.spawn(detached, wall_velocity, &self.config.debris, &mut self.rng);
        log::debug!("Wall {}: {} struck, {} fragments", id.0, struck.len(), count);
        self.events.push(GameEvent::Explosion { obstacle: id, fragments: count });
        count
    }

    fn process_hand(&mut self, sample: HandSample, now: f64) -> Result<()> {
        let input = match sample {
            HandSample::Landmarks(data) => HandInput::Detected(HandFrame::from_flat(&data)?),
            HandSample::Lost => HandInput::Lost,
        };
        self.apply_hand(input, now);
        Ok(())
    }

    fn apply_hand(&mut self, input: HandInput, now: f64) {
        match input {
            HandInput::Detected(frame) => {
                if self.hand.is_none() {
                    self.events.push(GameEvent::HandFound);
                    self.status = status_for(self.calibration.state()).to_string();
                }

                if self.calibration.state().is_calibrated() {
                    let angles = LimbRig::solve(&frame.curls(), self.calibration.profile());
                    self.rig.set_angles(angles);
                }

                if self.calibration.check_start(&frame) {
                    let previous = self.score;
                    self.score = 0;
                    if previous != 0 {
                        self.events.push(GameEvent::ScoreChanged { delta: -previous, total: 0 });
                    }
                    self.spawner.restart(now, &self.config.wall);
                    self.enter_state(GameState::Playing);
                }

                self.hand = Some(frame);
            }
            HandInput::Lost => {
                let was_visible = self.hand.take().is_some();
                let calibrating = self.calibration.state().is_calibrating();
                let status = if calibrating { HAND_LOST_CALIBRATING } else { HAND_LOST_PLAYING };
                // Calibration warns even if no hand was ever seen
                if was_visible || (calibrating && self.status != status) {
                    log::warn!("⚠️ Hand lost ({})", self.calibration.state().name());
                    self.events.push(GameEvent::HandLost);
                    self.status = status.to_string();
                }
            }
        }
    }

    fn enter_state(&mut self, state: GameState) {
        log::info!("Game state -> {}", state.name());
        self.events.push(GameEvent::StateChanged { state });
        self.status = status_for(state).to_string();
    }

    // ========================================================================
    // OUTPUT
    // ========================================================================

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn state(&self) -> GameState {
        self.calibration.state()
    }

    pub fn profile(&self) -> &CalibrationProfile {
        self.calibration.profile()
    }

    pub fn score(&self) -> i32 {
        self.score
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn mode(&self) -> Option<&ModeProfile> {
        self.mode.as_ref()
    }

    pub fn rig(&self) -> &LimbRig {
        &self.rig
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn debris(&self) -> &DebrisField {
        &self.debris
    }

    pub fn hand_visible(&self) -> bool {
        self.hand.is_some()
    }

    /// World positions of all 21 markers, or `None` while the hand is hidden
    pub fn hand_markers(&self) -> Option<[Point3<f32>; LANDMARK_COUNT]> {
        self.hand.as_ref().map(|h| h.marker_positions(&self.config.hand))
    }

    /// Fingertip → limb-end strings, hidden with the hand
    pub fn strings(&self) -> Option<[PuppetString; LIMB_COUNT]> {
        let hand = self.hand.as_ref()?;
        Some(Limb::ALL.map(|limb| PuppetString {
            limb,
            from: hand.marker_position(TRACKED_TIPS[limb.index()], &self.config.hand),
            to: self.rig.attachment_point(limb),
        }))
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

const HAND_LOST_CALIBRATING: &str = "⚠️ Hand lost - show your hand to continue calibrating";
const HAND_LOST_PLAYING: &str = "Hand lost - puppet is holding its pose";

fn status_for(state: GameState) -> &'static str {
    match state {
        GameState::CalibrateOpen => "🖐️ Hold your hand open and press C",
        GameState::CalibrateClosed => "✊ Now curl your fingers and press C",
        GameState::WaitingStart => "👍 Give a thumbs up to start",
        GameState::Playing => "Go! Match the holes in the walls",
    }
}
