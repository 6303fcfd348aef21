// ============================================================================
// input.rs — FollowCam
// Keyboard state tracking for continuous held-key actions.
// ============================================================================

/// Tracks which continuous-action keys are currently held down.
///
/// Arrows move the sprite; Q/E rotate the camera; Z/A zoom out/in.
/// One-shot keys (shake, flash, toggles) are handled on the key event
/// itself and never stored here.
#[derive(Default)]
pub struct KeysHeld {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub rotate_ccw: bool,
    pub rotate_cw: bool,
    pub zoom_out: bool,
    pub zoom_in: bool,
}
