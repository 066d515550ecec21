//! Hand landmarks and finger curl extraction
//!
//! MediaPipe Hands numbering (21 points). Only the wrist, the thumb IP/tip
//! and the four long fingertips are used by the game.

use nalgebra::Point3;

use crate::config::HandConfig;
use crate::error::{GameError, Result};

// ============================================================================
// HAND LANDMARK INDICES
// ============================================================================

pub const LANDMARK_COUNT: usize = 21;

pub const WRIST: usize = 0;
pub const THUMB_IP: usize = 3;
pub const THUMB_TIP: usize = 4;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_TIP: usize = 12;
pub const RING_TIP: usize = 16;
pub const PINKY_TIP: usize = 20;

/// Fingertips driving the four limbs, in finger order (index, middle, ring, pinky)
pub const TRACKED_TIPS: [usize; 4] = [INDEX_TIP, MIDDLE_TIP, RING_TIP, PINKY_TIP];

/// Number of tracked fingers
pub const FINGER_COUNT: usize = 4;

/// Per-finger curl values (index, middle, ring, pinky)
pub type FingerCurls = [f32; FINGER_COUNT];

// ============================================================================
// DATA STRUCTURES
// ============================================================================

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HandLandmark {
    pub x: f32,  // 0-1 normalized image space
    pub y: f32,  // 0-1 normalized, grows downward
    pub z: f32,  // Relative depth
}

/// One detected hand for one frame
#[derive(Clone, Debug, PartialEq)]
pub struct HandFrame {
    landmarks: [HandLandmark; LANDMARK_COUNT],
}

/// What the tracker delivered for a frame
#[derive(Clone, Debug, PartialEq)]
pub enum HandInput {
    Detected(HandFrame),
    Lost,
}

impl HandFrame {
    pub fn new(landmarks: [HandLandmark; LANDMARK_COUNT]) -> Result<Self> {
        for (index, lm) in landmarks.iter().enumerate() {
            if !(lm.x.is_finite() && lm.y.is_finite() && lm.z.is_finite()) {
                return Err(GameError::NonFiniteLandmark { index });
            }
        }
        Ok(Self { landmarks })
    }

    /// Parse 63 floats (21 × x, y, z). Extra trailing values are rejected.
    pub fn from_flat(data: &[f32]) -> Result<Self> {
        let expected = LANDMARK_COUNT * 3;
        if data.len() != expected {
            return Err(GameError::LandmarkCount { got: data.len(), expected });
        }
        let mut landmarks = [HandLandmark::default(); LANDMARK_COUNT];
        for (i, chunk) in data.chunks_exact(3).enumerate() {
            landmarks[i] = HandLandmark { x: chunk[0], y: chunk[1], z: chunk[2] };
        }
        Self::new(landmarks)
    }

    /// Vertical fingertip offset from the wrist for each tracked finger
    pub fn curls(&self) -> FingerCurls {
        let wrist = self.landmarks[WRIST];
        TRACKED_TIPS.map(|tip| self.landmarks[tip].y - wrist.y)
    }

    /// Thumbs-up: thumb tip above the thumb IP joint, index tip below it
    pub fn is_start_gesture(&self) -> bool {
        let thumb_ip = self.landmarks[THUMB_IP];
        let thumb_tip = self.landmarks[THUMB_TIP];
        let index_tip = self.landmarks[INDEX_TIP];
        thumb_tip.y < thumb_ip.y && index_tip.y > thumb_ip.y
    }

    /// Landmarks placed in world space for the hand marker display
    pub fn marker_positions(&self, config: &HandConfig) -> [Point3<f32>; LANDMARK_COUNT] {
        self.landmarks.map(|lm| to_world(lm, config))
    }

    pub fn marker_position(&self, index: usize, config: &HandConfig) -> Point3<f32> {
        to_world(self.landmarks[index], config)
    }
}

/// Mirrored (selfie) mapping from normalized image space to world space
fn to_world(lm: HandLandmark, config: &HandConfig) -> Point3<f32> {
    let [ox, oy, oz] = config.marker_origin;
    let s = config.marker_scale;
    Point3::new(ox + (0.5 - lm.x) * s, oy + (0.5 - lm.y) * s, oz - lm.z * s)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Flat hand with every landmark at (0.5, 0.5) so tests only set what they need
    pub(crate) fn hand_with(points: &[(usize, f32)]) -> HandFrame {
        let mut landmarks = [HandLandmark { x: 0.5, y: 0.5, z: 0.0 }; LANDMARK_COUNT];
        for &(index, y) in points {
            landmarks[index].y = y;
        }
        HandFrame::new(landmarks).unwrap()
    }

    #[test]
    fn test_curl_is_tip_minus_wrist() {
        let hand = hand_with(&[(WRIST, 0.5), (INDEX_TIP, 0.1), (MIDDLE_TIP, 0.2), (RING_TIP, 0.45), (PINKY_TIP, 0.6)]);
        let curls = hand.curls();
        assert!((curls[0] + 0.4).abs() < 1e-6);
        assert!((curls[1] + 0.3).abs() < 1e-6);
        assert!((curls[2] + 0.05).abs() < 1e-6);
        assert!((curls[3] - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_from_flat_rejects_bad_length() {
        let err = HandFrame::from_flat(&[0.0; 62]).unwrap_err();
        assert!(matches!(err, GameError::LandmarkCount { got: 62, expected: 63 }));
    }

    #[test]
    fn test_from_flat_rejects_nan() {
        let mut data = [0.5f32; 63];
        data[8 * 3 + 1] = f32::NAN;
        let err = HandFrame::from_flat(&data).unwrap_err();
        assert!(matches!(err, GameError::NonFiniteLandmark { index: 8 }));
    }

    #[test]
    fn test_thumbs_up() {
        let thumbs_up = hand_with(&[(THUMB_IP, 0.5), (THUMB_TIP, 0.4), (INDEX_TIP, 0.6)]);
        assert!(thumbs_up.is_start_gesture());

        // Open hand: index tip far above the thumb
        let open = hand_with(&[(THUMB_IP, 0.5), (THUMB_TIP, 0.4), (INDEX_TIP, 0.1)]);
        assert!(!open.is_start_gesture());

        // Thumb pointing down
        let thumb_down = hand_with(&[(THUMB_IP, 0.5), (THUMB_TIP, 0.6), (INDEX_TIP, 0.7)]);
        assert!(!thumb_down.is_start_gesture());
    }

    #[test]
    fn test_marker_mapping_is_mirrored() {
        let config = HandConfig::default();
        let mut landmarks = [HandLandmark { x: 0.5, y: 0.5, z: 0.0 }; LANDMARK_COUNT];
        landmarks[WRIST] = HandLandmark { x: 0.75, y: 0.25, z: 0.1 };
        let hand = HandFrame::new(landmarks).unwrap();
        let p = hand.marker_position(WRIST, &config);
        assert!((p.x + 1.0).abs() < 1e-6);
        assert!((p.y - 5.5).abs() < 1e-6);
        assert!((p.z + 0.4).abs() < 1e-6);
    }
}
