//! Two-step open/closed hand calibration and start gating
//!
//! The operator holds the hand open and presses capture, then curls the
//! fingers and presses capture again. After that a thumbs-up starts play.

use serde::Serialize;

use super::landmarks::{FingerCurls, HandFrame, FINGER_COUNT};

/// Session-wide game phase
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum GameState {
    CalibrateOpen,
    CalibrateClosed,
    WaitingStart,
    Playing,
}

impl GameState {
    pub fn name(&self) -> &'static str {
        match self {
            GameState::CalibrateOpen => "CALIBRATE_OPEN",
            GameState::CalibrateClosed => "CALIBRATE_CLOSED",
            GameState::WaitingStart => "WAITING_START",
            GameState::Playing => "PLAYING",
        }
    }

    pub fn is_calibrating(&self) -> bool {
        matches!(self, GameState::CalibrateOpen | GameState::CalibrateClosed)
    }

    /// Limbs only follow the hand once both references exist
    pub fn is_calibrated(&self) -> bool {
        matches!(self, GameState::WaitingStart | GameState::Playing)
    }
}

/// Reference curl values captured with the hand open and closed
///
/// No ordering between `open` and `closed` is enforced. If the operator
/// swaps the gestures, limb motion is simply inverted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct CalibrationProfile {
    pub open: [f32; FINGER_COUNT],
    pub closed: [f32; FINGER_COUNT],
}

/// Which reference a capture filled in
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum CaptureStep {
    Open,
    Closed,
}

/// Result of an operator capture press
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CaptureOutcome {
    Captured(CaptureStep),
    /// No hand in the current frame; nothing changed
    NoHand,
    /// Not in a calibration state; nothing changed
    NotCalibrating,
}

pub struct Calibration {
    state: GameState,
    profile: CalibrationProfile,
}

impl Calibration {
    pub fn new() -> Self {
        Self {
            state: GameState::CalibrateOpen,
            profile: CalibrationProfile::default(),
        }
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn profile(&self) -> &CalibrationProfile {
        &self.profile
    }

    /// Operator trigger. `curls` is `None` when no hand is detected.
    pub fn capture(&mut self, curls: Option<FingerCurls>) -> CaptureOutcome {
        if !self.state.is_calibrating() {
            return CaptureOutcome::NotCalibrating;
        }
        let Some(curls) = curls else {
            return CaptureOutcome::NoHand;
        };

        match self.state {
            GameState::CalibrateOpen => {
                self.profile.open = curls;
                self.state = GameState::CalibrateClosed;
                log::info!("🖐️ Open hand captured: {:?}", curls);
                CaptureOutcome::Captured(CaptureStep::Open)
            }
            GameState::CalibrateClosed => {
                self.profile.closed = curls;
                self.state = GameState::WaitingStart;
                log::info!("✊ Closed hand captured: {:?}", curls);
                CaptureOutcome::Captured(CaptureStep::Closed)
            }
            GameState::WaitingStart | GameState::Playing => CaptureOutcome::NotCalibrating,
        }
    }

    /// Per-frame start check. Returns true on the frame play begins.
    pub fn check_start(&mut self, hand: &HandFrame) -> bool {
        if self.state != GameState::WaitingStart || !hand.is_start_gesture() {
            return false;
        }
        self.state = GameState::Playing;
        log::info!("👍 Start gesture recognized");
        true
    }
}

impl Default for Calibration {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::landmarks::tests::hand_with;
    use crate::game::landmarks::{INDEX_TIP, THUMB_IP, THUMB_TIP};

    fn thumbs_up() -> HandFrame {
        hand_with(&[(THUMB_IP, 0.5), (THUMB_TIP, 0.4), (INDEX_TIP, 0.6)])
    }

    #[test]
    fn test_capture_without_hand_is_noop() {
        let mut cal = Calibration::new();
        assert_eq!(cal.capture(None), CaptureOutcome::NoHand);
        assert_eq!(cal.state(), GameState::CalibrateOpen);
        assert_eq!(*cal.profile(), CalibrationProfile::default());
    }

    #[test]
    fn test_steps_in_order() {
        let mut cal = Calibration::new();
        let open = [-0.4, -0.35, -0.3, -0.25];
        let closed = [-0.05, -0.04, -0.03, -0.02];

        assert_eq!(cal.capture(Some(open)), CaptureOutcome::Captured(CaptureStep::Open));
        assert_eq!(cal.state(), GameState::CalibrateClosed);
        assert_eq!(cal.capture(Some(closed)), CaptureOutcome::Captured(CaptureStep::Closed));
        assert_eq!(cal.state(), GameState::WaitingStart);

        assert_eq!(cal.profile().open, open);
        assert_eq!(cal.profile().closed, closed);

        // Further presses do not overwrite the profile
        assert_eq!(cal.capture(Some([0.0; 4])), CaptureOutcome::NotCalibrating);
        assert_eq!(cal.profile().closed, closed);
    }

    #[test]
    fn test_start_gesture_cannot_skip_calibration() {
        let mut cal = Calibration::new();
        assert!(!cal.check_start(&thumbs_up()));
        assert_eq!(cal.state(), GameState::CalibrateOpen);

        cal.capture(Some([0.0; 4]));
        assert!(!cal.check_start(&thumbs_up()));
        assert_eq!(cal.state(), GameState::CalibrateClosed);
    }

    #[test]
    fn test_start_requires_gesture() {
        let mut cal = Calibration::new();
        cal.capture(Some([-0.4; 4]));
        cal.capture(Some([-0.05; 4]));

        let open_hand = hand_with(&[(THUMB_IP, 0.5), (THUMB_TIP, 0.4), (INDEX_TIP, 0.1)]);
        assert!(!cal.check_start(&open_hand));
        assert_eq!(cal.state(), GameState::WaitingStart);

        assert!(cal.check_start(&thumbs_up()));
        assert_eq!(cal.state(), GameState::Playing);

        // Playing is terminal
        assert!(!cal.check_start(&thumbs_up()));
        assert_eq!(cal.capture(Some([0.0; 4])), CaptureOutcome::NotCalibrating);
        assert_eq!(cal.state(), GameState::Playing);
    }
}
