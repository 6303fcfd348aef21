// ============================================================================
// config.rs — FollowCam
// Demo tuning constants and runtime-adjustable parameters.
// ============================================================================

/// Window (and camera viewport) size in logical pixels.
pub const WINDOW_WIDTH: u32 = 960;
pub const WINDOW_HEIGHT: u32 = 720;

/// World size used when no background image is supplied.
pub const DEFAULT_WORLD_WIDTH: u32 = 1920;
pub const DEFAULT_WORLD_HEIGHT: u32 = 1080;

/// Sprite movement per held arrow key, in world pixels per frame.
pub const SPRITE_SPEED: f32 = 5.0;

/// Camera rotation per held Q/E key, in degrees per frame.
pub const ROTATE_STEP: f32 = 0.1;

/// Zoom factor change per held Z/A key, per frame.
pub const ZOOM_STEP: f32 = 0.1;

/// Shake effect triggered by S.
pub const SHAKE_DURATION: f32 = 1.5;
pub const SHAKE_FORCE: f32 = 150.0;

/// Flash effect triggered by F.
pub const FLASH_DURATION: f32 = 0.5;

/// Runtime parameters adjustable via keyboard.
#[derive(Clone, Debug)]
pub struct DemoParams {
    pub show_extended_hud: bool,
    pub vsync: bool,
}

impl Default for DemoParams {
    fn default() -> Self {
        Self {
            show_extended_hud: false,
            vsync: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_vsync_with_compact_hud() {
        let params = DemoParams::default();
        assert!(params.vsync);
        assert!(!params.show_extended_hud);
    }
}
