// ============================================================================
// camera.rs — FollowCam
// Follow camera: clamped focus, absolute zoom, rotation, shake & flash
// timers, and the GPU uniform uploaded every frame.
// ============================================================================

use bytemuck::{Pod, Zeroable};
use glam::Vec2;
use rand::Rng;

/// Shake timer decrement per `follow_and_update` call.
///
/// Per-call, not per-second: effect duration scales with the frame rate.
/// The demo runs vsynced, where this gives the intended feel.
pub const SHAKE_TICK: f32 = 0.01;

/// Flash timer decrement per `follow_and_update` call. Same per-call
/// caveat as `SHAKE_TICK`.
pub const FLASH_TICK: f32 = 0.1;

// ======================== GPU Uniform ========================

/// GPU-side camera uniforms uploaded every frame.
///
/// The vertex shader maps world coordinates to clip space with these:
/// offset from `center`, rotate by the inverse camera rotation, divide by
/// `half_view`. `flash` is 1.0 while the flash overlay is active.
#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
pub struct CameraUniforms {
    pub center: [f32; 2],
    pub half_view: [f32; 2],
    pub rot_cos: f32,
    pub rot_sin: f32,
    pub flash: f32,
    pub _pad: f32,
}

impl Default for CameraUniforms {
    fn default() -> Self {
        Self {
            center: [0.0, 0.0],
            half_view: [1.0, 1.0],
            rot_cos: 1.0,
            rot_sin: 0.0,
            flash: 0.0,
            _pad: 0.0,
        }
    }
}

// ======================== Camera ========================

/// CPU-side follow camera.
///
/// Owns all of its state as plain fields; the view transform only leaves
/// through `uniforms()`, so nothing here is tied to a window or renderer.
pub struct Camera {
    /// On-screen pixel size. Fixed at construction.
    viewport: Vec2,
    /// World pixel bounds. Fixed at construction.
    world: Vec2,
    /// Clamped follow position (world space).
    focus: Vec2,
    /// Focus plus the transient shake offset; what the view centers on.
    center: Vec2,
    /// Absolute scale factor applied to the base viewport size.
    zoom: f32,
    /// Accumulated rotation in degrees.
    rotation_deg: f32,
    shake_timer: f32,
    shake_force: f32,
    flash_timer: f32,
}

impl Camera {
    /// Create a camera centered on the world, zoom 1, no effects pending.
    pub fn new(viewport: Vec2, world: Vec2) -> Self {
        let focus = world * 0.5;
        Self {
            viewport,
            world,
            focus,
            center: focus,
            zoom: 1.0,
            rotation_deg: 0.0,
            shake_timer: 0.0,
            shake_force: 0.0,
            flash_timer: 0.0,
        }
    }

    /// Per-frame update: clamp the follow target into view bounds, center
    /// on it, then advance the shake and flash effects.
    pub fn follow_and_update(&mut self, target: Vec2) {
        self.focus = self.clamp_focus(target);
        self.center = self.focus;

        if self.shake_timer > 0.0 {
            if self.shake_force > 0.0 {
                let mut rng = rand::thread_rng();
                self.center.x += rng.gen_range(0.0..self.shake_force);
                self.center.y += rng.gen_range(0.0..self.shake_force);
            }
            self.shake_timer -= SHAKE_TICK;
        }

        if self.flash_timer > 0.0 {
            self.flash_timer -= FLASH_TICK;
        } else {
            self.flash_timer = 0.0;
        }
    }

    /// Accumulate `delta` degrees into the camera rotation.
    pub fn rotate(&mut self, delta: f32) {
        self.rotation_deg += delta;
    }

    /// Accumulate `delta` into the absolute zoom factor. A step that would
    /// drive the factor below zero is reverted; zero itself is allowed
    /// (the view collapses to nothing for that frame).
    pub fn set_zoom(&mut self, delta: f32) {
        self.zoom += delta;
        if self.zoom < 0.0 {
            self.zoom -= delta;
        }
    }

    /// Start a screen shake: random per-axis offsets in `[0, force)` for
    /// roughly `duration / SHAKE_TICK` frames.
    pub fn trigger_shake(&mut self, duration: f32, force: f32) {
        self.shake_timer = duration;
        self.shake_force = force;
    }

    /// Start a flash-to-white: the overlay stays active for roughly
    /// `duration / FLASH_TICK` frames.
    pub fn trigger_flash(&mut self, duration: f32) {
        self.flash_timer = duration;
    }

    // ======================== Accessors ========================

    /// Clamped follow position, before the shake offset.
    pub fn focus(&self) -> Vec2 {
        self.focus
    }

    /// Actual view center this frame (focus plus shake offset).
    pub fn center(&self) -> Vec2 {
        self.center
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn rotation_deg(&self) -> f32 {
        self.rotation_deg
    }

    pub fn shake_remaining(&self) -> f32 {
        self.shake_timer
    }

    /// True while the flash overlay should be drawn.
    pub fn flash_active(&self) -> bool {
        self.flash_timer > 0.0
    }

    /// Build the GPU uniform from current state. The half view extent is
    /// recomputed from the fixed base viewport every frame, so zoom never
    /// compounds across calls.
    pub fn uniforms(&self) -> CameraUniforms {
        let rot = self.rotation_deg.to_radians();
        CameraUniforms {
            center: self.center.to_array(),
            half_view: (self.viewport * 0.5 * self.zoom).to_array(),
            rot_cos: rot.cos(),
            rot_sin: rot.sin(),
            flash: if self.flash_active() { 1.0 } else { 0.0 },
            _pad: 0.0,
        }
    }

    /// Clamp a target into `[viewport/2, world - viewport/2]` per axis.
    /// The max bound is applied first, so when the world is smaller than
    /// the viewport on an axis the camera sticks to the viewport
    /// half-size there.
    fn clamp_focus(&self, target: Vec2) -> Vec2 {
        let half = self.viewport * 0.5;
        target.min(self.world - half).max(half)
    }
}

// ======================== Tests ========================

#[cfg(test)]
mod tests {
    use super::*;

    fn demo_camera() -> Camera {
        Camera::new(Vec2::new(320.0, 240.0), Vec2::new(1920.0, 1080.0))
    }

    #[test]
    fn starts_centered_with_unit_zoom() {
        let cam = demo_camera();
        assert_eq!(cam.focus(), Vec2::new(960.0, 540.0));
        assert_eq!(cam.center(), cam.focus());
        assert_eq!(cam.zoom(), 1.0);
        assert_eq!(cam.rotation_deg(), 0.0);
        assert!(!cam.flash_active());
        assert_eq!(cam.shake_remaining(), 0.0);
    }

    #[test]
    fn clamps_corner_targets() {
        let mut cam = demo_camera();

        cam.follow_and_update(Vec2::new(0.0, 0.0));
        assert_eq!(cam.focus(), Vec2::new(160.0, 120.0));

        cam.follow_and_update(Vec2::new(1920.0, 1080.0));
        assert_eq!(cam.focus(), Vec2::new(1760.0, 960.0));
    }

    #[test]
    fn interior_target_is_untouched() {
        let mut cam = demo_camera();
        cam.follow_and_update(Vec2::new(960.0, 540.0));
        assert_eq!(cam.focus(), Vec2::new(960.0, 540.0));
    }

    #[test]
    fn focus_stays_within_bounds_for_any_target() {
        let mut cam = demo_camera();
        let targets = [
            Vec2::new(-500.0, -500.0),
            Vec2::new(0.0, 1080.0),
            Vec2::new(5000.0, 5000.0),
            Vec2::new(160.0, 960.0),
            Vec2::new(1.0, 1079.0),
        ];
        for target in targets {
            cam.follow_and_update(target);
            let f = cam.focus();
            assert!(f.x >= 160.0 && f.x <= 1760.0, "x out of range: {f:?}");
            assert!(f.y >= 120.0 && f.y <= 960.0, "y out of range: {f:?}");
        }
    }

    #[test]
    fn world_smaller_than_viewport_sticks_to_half_viewport() {
        let mut cam = Camera::new(Vec2::new(320.0, 240.0), Vec2::new(200.0, 100.0));
        cam.follow_and_update(Vec2::new(190.0, 90.0));
        assert_eq!(cam.focus(), Vec2::new(160.0, 120.0));
    }

    #[test]
    fn zoom_never_goes_negative() {
        let mut cam = demo_camera();
        for _ in 0..30 {
            cam.set_zoom(-0.3);
            assert!(cam.zoom() >= 0.0, "zoom went negative: {}", cam.zoom());
        }
    }

    #[test]
    fn zoom_step_below_zero_is_reverted() {
        let mut cam = demo_camera();
        cam.set_zoom(-0.5); // 0.5
        cam.set_zoom(-1.0); // would be -0.5, reverted
        assert_eq!(cam.zoom(), 0.5);
    }

    #[test]
    fn zoom_can_reach_exactly_zero() {
        let mut cam = demo_camera();
        cam.set_zoom(-0.5);
        cam.set_zoom(-0.5);
        assert_eq!(cam.zoom(), 0.0);
    }

    #[test]
    fn zoom_scales_half_view_from_fixed_base() {
        let mut cam = demo_camera();
        cam.set_zoom(1.0); // 2.0 total
        cam.set_zoom(1.0); // 3.0 total — absolute, not compounded
        let u = cam.uniforms();
        assert_eq!(u.half_view, [160.0 * 3.0, 120.0 * 3.0]);
    }

    #[test]
    fn rotation_accumulates() {
        let mut cam = demo_camera();
        cam.rotate(0.1);
        cam.rotate(0.1);
        cam.rotate(-0.05);
        assert!((cam.rotation_deg() - 0.15).abs() < 1e-6);
    }

    #[test]
    fn shake_offsets_then_expires() {
        let mut cam = demo_camera();
        let target = Vec2::new(960.0, 540.0);
        cam.trigger_shake(1.5, 150.0);

        let mut frames = 0;
        while cam.shake_remaining() > 0.0 {
            cam.follow_and_update(target);
            let offset = cam.center() - cam.focus();
            assert!(offset.x >= 0.0 && offset.x < 150.0, "offset {offset:?}");
            assert!(offset.y >= 0.0 && offset.y < 150.0, "offset {offset:?}");
            frames += 1;
            assert!(frames <= 200, "shake never expired");
        }

        // Expired: no further offset is applied.
        cam.follow_and_update(target);
        assert_eq!(cam.center(), cam.focus());
    }

    #[test]
    fn zero_force_shake_applies_no_offset() {
        let mut cam = demo_camera();
        cam.trigger_shake(1.0, 0.0);
        cam.follow_and_update(Vec2::new(960.0, 540.0));
        assert_eq!(cam.center(), cam.focus());
        assert!(cam.shake_remaining() < 1.0, "timer still ticks down");
    }

    #[test]
    fn flash_is_active_exactly_while_timer_positive() {
        let mut cam = demo_camera();
        let target = Vec2::new(960.0, 540.0);

        cam.trigger_flash(0.5);
        assert!(cam.flash_active());

        let mut frames = 0;
        while cam.flash_active() {
            cam.follow_and_update(target);
            frames += 1;
            assert!(frames <= 10, "flash never expired");
        }
        assert!(frames >= 4, "flash expired too early after {frames} frames");

        // Pinned at zero, stays inactive.
        cam.follow_and_update(target);
        assert!(!cam.flash_active());
        assert_eq!(cam.uniforms().flash, 0.0);
    }

    #[test]
    fn flash_flag_reaches_the_uniform() {
        let mut cam = demo_camera();
        cam.trigger_flash(0.5);
        assert_eq!(cam.uniforms().flash, 1.0);
    }

    #[test]
    fn no_effects_means_center_equals_focus() {
        let mut cam = demo_camera();
        cam.follow_and_update(Vec2::new(400.0, 300.0));
        assert_eq!(cam.center(), cam.focus());
    }
}
