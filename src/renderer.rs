// ============================================================================
// renderer.rs — FollowCam
// HUD text rendering via glyphon: FPS, camera state, effect timers and
// key bindings, drawn on top of the scene each frame.
// ============================================================================

use glyphon::{
    Attrs, Buffer as TextBuffer, Cache as GlyphCache, Color as GlyphColor, Family, FontSystem,
    Metrics, Resolution, Shaping, SwashCache, TextArea, TextAtlas, TextBounds, TextRenderer,
    Viewport as GlyphViewport,
};

use crate::camera::Camera;
use crate::config::DemoParams;

/// All glyphon resources needed for HUD text rendering.
pub struct HudRenderer {
    pub font_system: FontSystem,
    pub swash_cache: SwashCache,
    pub glyph_viewport: GlyphViewport,
    pub text_atlas: TextAtlas,
    pub text_renderer: TextRenderer,
}

impl HudRenderer {
    /// Initialize the HUD text rendering subsystem.
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        surface_format: wgpu::TextureFormat,
    ) -> Self {
        let mut font_system = FontSystem::new();
        let swash_cache = SwashCache::new();
        let glyph_cache = GlyphCache::new(device);
        let glyph_viewport = GlyphViewport::new(device, &glyph_cache);
        let mut text_atlas = TextAtlas::new(device, queue, &glyph_cache, surface_format);
        let text_renderer =
            TextRenderer::new(&mut text_atlas, device, wgpu::MultisampleState::default(), None);

        // Prime font system so first frame renders correctly
        let mut primer = TextBuffer::new(&mut font_system, Metrics::new(16.0, 20.0));
        primer.set_text(
            &mut font_system,
            "FollowCam",
            Attrs::new().family(Family::Monospace),
            Shaping::Basic,
        );

        Self {
            font_system,
            swash_cache,
            glyph_viewport,
            text_atlas,
            text_renderer,
        }
    }

    /// Prepare HUD text for the current frame.
    pub fn prepare(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        params: &DemoParams,
        camera: &Camera,
        fps: f32,
        win_w: u32,
        win_h: u32,
    ) {
        self.glyph_viewport.update(
            queue,
            Resolution {
                width: win_w,
                height: win_h,
            },
        );

        let hud_text = build_hud_text(params, camera, fps);

        let mut text_buf = TextBuffer::new(&mut self.font_system, Metrics::new(14.0, 18.0));
        text_buf.set_size(&mut self.font_system, Some(win_w as f32), Some(win_h as f32));
        text_buf.set_text(
            &mut self.font_system,
            &hud_text,
            Attrs::new().family(Family::Monospace),
            Shaping::Basic,
        );
        text_buf.shape_until_scroll(&mut self.font_system, false);

        self.text_renderer
            .prepare(
                device,
                queue,
                &mut self.font_system,
                &mut self.text_atlas,
                &self.glyph_viewport,
                [TextArea {
                    buffer: &text_buf,
                    left: 10.0,
                    top: 10.0,
                    scale: 1.0,
                    bounds: TextBounds {
                        left: 0,
                        top: 0,
                        right: win_w as i32,
                        bottom: win_h as i32,
                    },
                    default_color: GlyphColor::rgb(20, 20, 25),
                    custom_glyphs: &[],
                }],
                &mut self.swash_cache,
            )
            .unwrap();
    }

    /// Render HUD overlay into an active render pass.
    pub fn render<'a>(&'a self, pass: &mut wgpu::RenderPass<'a>) {
        self.text_renderer
            .render(&self.text_atlas, &self.glyph_viewport, pass)
            .unwrap();
    }

    /// Trim the glyph atlas after presenting.
    pub fn trim(&mut self) {
        self.text_atlas.trim();
    }
}

// ======================== HUD Text Builder ========================

fn build_hud_text(params: &DemoParams, camera: &Camera, fps: f32) -> String {
    let mut effects = String::new();
    if camera.shake_remaining() > 0.0 {
        effects.push_str("  [SHAKE]");
    }
    if camera.flash_active() {
        effects.push_str("  [FLASH]");
    }

    let focus = camera.focus();

    if params.show_extended_hud {
        format!(
            "━━━ FollowCam — Extended HUD ━━━\n\
             FPS: {:.0}{}\n\
             Focus: ({:.0}, {:.0})  |  Zoom: {:.2}x  |  Rotation: {:.1}°\n\
             Shake timer: {:.2}  |  Flash: {}\n\
             \n\
             SPRITE:\n\
             • Arrow keys: move\n\
             \n\
             CAMERA:\n\
             • Q/E: rotate  |  Z: zoom out  A: zoom in\n\
             • S: shake  |  F: flash\n\
             \n\
             MISC:\n\
             • H: toggle HUD  |  V: VSync {}  |  ESC: quit",
            fps,
            effects,
            focus.x,
            focus.y,
            camera.zoom(),
            camera.rotation_deg(),
            camera.shake_remaining(),
            if camera.flash_active() { "ON" } else { "off" },
            if params.vsync { "ON" } else { "OFF" },
        )
    } else {
        format!(
            "FPS: {:.0}   Focus: ({:.0}, {:.0})   Zoom: {:.2}x   Rot: {:.1}°{}\n\
             Arrows: move | Q/E: rotate | Z/A: zoom | S: shake | F: flash | H: help",
            fps,
            focus.x,
            focus.y,
            camera.zoom(),
            camera.rotation_deg(),
            effects,
        )
    }
}
