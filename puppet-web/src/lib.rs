//! Puppet Web - hand-driven marionette wall dodge
//!
//! Entry point for WASM module. Only contains:
//! - Module declarations
//! - wasm_bindgen start hook

pub mod config;
pub mod error;
pub mod game;
mod bridge;

use wasm_bindgen::prelude::*;

// Re-export wasm_bindgen functions for JS access
pub use bridge::{
    init_session, apply_hand_landmarks, capture_calibration, select_mode, set_limb_hitboxes, tick,
    get_limb_angles, get_hand_markers, get_string_endpoints, get_debris_transforms,
    get_frame_json, drain_events_json, get_score, get_status, get_game_state,
};

/// Called automatically when WASM module loads
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already installed".into());
    }
    log::info!("✅ Puppet core loaded");
}
