//! Bridge module - JS ↔ Rust communication
//!
//! All #[wasm_bindgen] entry points live here.
//! Re-exports only in mod.rs, logic in submodules.

mod session;

pub use session::{
    // Input
    init_session,
    apply_hand_landmarks,
    capture_calibration,
    select_mode,
    set_limb_hitboxes,
    tick,
    // Output
    get_limb_angles,
    get_hand_markers,
    get_string_endpoints,
    get_debris_transforms,
    get_frame_json,
    drain_events_json,
    get_score,
    get_status,
    get_game_state,
};
