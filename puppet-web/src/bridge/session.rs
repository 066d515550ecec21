//! Session storage and wasm entry points
//!
//! One session per page. JS pushes hand frames and key presses, calls
//! `tick` once per animation frame, then reads the getters to render.

use wasm_bindgen::prelude::*;
use std::cell::RefCell;

use crate::config::GameConfig;
use crate::game::{
    CaptureOutcome, FrameSnapshot, HandSample, HitboxShape, Session, VisualMode, LANDMARK_COUNT,
};

thread_local! {
    static SESSION: RefCell<Session> = RefCell::new(Session::new(GameConfig::default(), random_seed()));
}

fn random_seed() -> u64 {
    (js_sys::Math::random() * u64::MAX as f64) as u64 ^ js_sys::Date::now() as u64
}

fn with_session<T>(f: impl FnOnce(&mut Session) -> T) -> T {
    SESSION.with(|cell| f(&mut cell.borrow_mut()))
}

// ============================================================================
// INPUT
// ============================================================================

/// Rebuild the session, optionally from a JSON config
#[wasm_bindgen]
pub fn init_session(config_json: Option<String>) -> Result<(), JsValue> {
    let config = match config_json {
        Some(json) => GameConfig::from_json(&json)?,
        None => GameConfig::default(),
    };
    with_session(|session| *session = Session::new(config, random_seed()));
    log::info!("🎭 Session ready");
    Ok(())
}

/// `num_hands == 0` means the tracker lost the hand
#[wasm_bindgen]
pub fn apply_hand_landmarks(flat_data: &[f32], num_hands: usize) {
    let sample = if num_hands == 0 {
        HandSample::Lost
    } else {
        // First hand only; the tick validates it
        let len = flat_data.len().min(LANDMARK_COUNT * 3);
        HandSample::Landmarks(flat_data[..len].to_vec())
    };
    with_session(|session| session.submit_hand(sample));
}

/// Returns true if a calibration step was captured
#[wasm_bindgen]
pub fn capture_calibration() -> bool {
    with_session(|session| matches!(session.capture(), CaptureOutcome::Captured(_)))
}

#[wasm_bindgen]
pub fn select_mode(name: &str) -> Result<(), JsValue> {
    let mode = VisualMode::parse(name)?;
    with_session(|session| session.select_mode(mode));
    Ok(())
}

/// 4 limbs × (offset xyz, half extents xyz), measured from the rendered meshes
#[wasm_bindgen]
pub fn set_limb_hitboxes(flat_data: &[f32]) -> Result<(), JsValue> {
    let hitboxes = HitboxShape::parse_set(flat_data)?;
    with_session(|session| session.set_hitboxes(hitboxes));
    Ok(())
}

/// Advance one frame. `now_ms` is `performance.now()`.
#[wasm_bindgen]
pub fn tick(now_ms: f64) {
    with_session(|session| session.tick(now_ms / 1000.0));
}

// ============================================================================
// OUTPUT
// ============================================================================

#[wasm_bindgen]
pub fn get_limb_angles() -> Vec<f32> {
    with_session(|session| session.rig().angles().to_vec())
}

/// 21 × xyz world positions, or undefined while the hand is hidden
#[wasm_bindgen]
pub fn get_hand_markers() -> Option<Vec<f32>> {
    with_session(|session| {
        session
            .hand_markers()
            .map(|markers| markers.iter().flat_map(|p| [p.x, p.y, p.z]).collect())
    })
}

/// 4 × (fingertip xyz, limb end xyz)
#[wasm_bindgen]
pub fn get_string_endpoints() -> Option<Vec<f32>> {
    with_session(|session| {
        session.strings().map(|strings| {
            strings
                .iter()
                .flat_map(|s| [s.from.x, s.from.y, s.from.z, s.to.x, s.to.y, s.to.z])
                .collect()
        })
    })
}

/// Per fragment: position xyz, quaternion xyzw
#[wasm_bindgen]
pub fn get_debris_transforms() -> Vec<f32> {
    with_session(|session| {
        session
            .debris()
            .fragments()
            .iter()
            .flat_map(|f| {
                let q = f.orientation.quaternion();
                [f.position.x, f.position.y, f.position.z, q.i, q.j, q.k, q.w]
            })
            .collect()
    })
}

#[wasm_bindgen]
pub fn get_frame_json() -> String {
    with_session(|session| {
        serde_json::to_string(&FrameSnapshot::capture(session)).unwrap_or_else(|e| {
            log::error!("Frame serialization failed: {}", e);
            String::from("{}")
        })
    })
}

/// Events since the last call, as a JSON array
#[wasm_bindgen]
pub fn drain_events_json() -> String {
    with_session(|session| {
        let events = session.drain_events();
        serde_json::to_string(&events).unwrap_or_else(|e| {
            log::error!("Event serialization failed: {}", e);
            String::from("[]")
        })
    })
}

#[wasm_bindgen]
pub fn get_score() -> i32 {
    with_session(|session| session.score())
}

#[wasm_bindgen]
pub fn get_status() -> String {
    with_session(|session| session.status().to_string())
}

#[wasm_bindgen]
pub fn get_game_state() -> String {
    with_session(|session| session.state().name().to_string())
}
