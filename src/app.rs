// ============================================================================
// app.rs — FollowCam
// Application state and winit event-loop handler: GPU setup, input
// dispatch, and the per-frame camera/render update.
// ============================================================================

use std::sync::Arc;
use std::time::Instant;

use glam::Vec2;
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    keyboard::{Key, NamedKey},
    window::{Window, WindowAttributes},
};

use crate::camera::Camera;
use crate::config::{
    DemoParams, FLASH_DURATION, ROTATE_STEP, SHAKE_DURATION, SHAKE_FORCE, WINDOW_HEIGHT,
    WINDOW_WIDTH, ZOOM_STEP,
};
use crate::input::KeysHeld;
use crate::pipeline::{create_pipelines, Pipelines};
use crate::renderer::HudRenderer;
use crate::scene::SceneState;

// ======================== Application ========================

pub struct App {
    state: Option<AppState>,
    config: AppConfig,
}

#[derive(Clone, Debug, Default)]
pub struct AppConfig {
    /// Optional background image; its dimensions become the world bounds.
    pub background_path: Option<String>,
}

struct AppState {
    // GPU
    device: wgpu::Device,
    queue: wgpu::Queue,
    surface: wgpu::Surface<'static>,
    surface_config: wgpu::SurfaceConfiguration,

    // Scene & rendering
    scene: SceneState,
    pipelines: Pipelines,

    // Window
    window: Arc<Window>,

    // Camera & Input
    camera: Camera,
    keys: KeysHeld,
    params: DemoParams,

    // HUD
    hud: HudRenderer,

    // Timing
    last_redraw: Instant,
    fps: f32,
}

impl App {
    pub fn new(config: AppConfig) -> Self {
        Self {
            state: None,
            config,
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &winit::event_loop::ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }

        let window_attrs = WindowAttributes::default()
            .with_title("FollowCam — camera demo")
            .with_inner_size(winit::dpi::LogicalSize::new(WINDOW_WIDTH, WINDOW_HEIGHT));

        let window = Arc::new(event_loop.create_window(window_attrs).unwrap());

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance.create_surface(window.clone()).unwrap();

        let (device, queue, surface_config) =
            pollster::block_on(init_gpu(&instance, &surface, &window));

        surface.configure(&device, &surface_config);

        let scene = SceneState::new(&device, &queue, self.config.background_path.as_deref());
        let pipelines = create_pipelines(&device, &scene, surface_config.format);
        let hud = HudRenderer::new(&device, &queue, surface_config.format);

        // The camera viewport is the logical window size, fixed at
        // construction; resizing the window only reconfigures the surface.
        let viewport = Vec2::new(WINDOW_WIDTH as f32, WINDOW_HEIGHT as f32);
        let camera = Camera::new(viewport, scene.world_size());

        log::info!(
            "FollowCam initialized: {}x{} viewport over {}x{} world",
            WINDOW_WIDTH,
            WINDOW_HEIGHT,
            scene.world_width,
            scene.world_height
        );

        self.state = Some(AppState {
            device,
            queue,
            surface,
            surface_config,
            scene,
            pipelines,
            window: window.clone(),
            camera,
            keys: KeysHeld::default(),
            params: DemoParams::default(),
            hud,
            last_redraw: Instant::now(),
            fps: 0.0,
        });

        // Initial redraw — required on macOS with winit 0.30
        window.request_redraw();
    }

    fn about_to_wait(&mut self, _event_loop: &winit::event_loop::ActiveEventLoop) {
        if let Some(state) = &self.state {
            state.window.request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &winit::event_loop::ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let Some(state) = &mut self.state else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),

            WindowEvent::KeyboardInput { event, .. } => {
                handle_keyboard(state, event_loop, &event);
            }

            WindowEvent::Resized(new_size) => {
                if new_size.width > 0 && new_size.height > 0 {
                    state.surface_config.width = new_size.width;
                    state.surface_config.height = new_size.height;
                    state.surface.configure(&state.device, &state.surface_config);
                }
            }

            WindowEvent::RedrawRequested => {
                redraw(state);
            }

            _ => {}
        }
    }
}

// ======================== GPU Initialization ========================

async fn init_gpu(
    instance: &wgpu::Instance,
    surface: &wgpu::Surface<'_>,
    window: &Window,
) -> (wgpu::Device, wgpu::Queue, wgpu::SurfaceConfiguration) {
    let adapter = instance
        .request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(surface),
            force_fallback_adapter: false,
        })
        .await
        .expect(
            "Failed to find a suitable GPU adapter.\n\
             FollowCam requires a GPU with Vulkan, Metal, or DX12 support.",
        );

    log::info!("GPU: {}", adapter.get_info().name);

    let (device, queue) = adapter
        .request_device(
            &wgpu::DeviceDescriptor {
                label: Some("followcam_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        )
        .await
        .expect("Failed to create device");

    let size = window.inner_size();
    let surface_caps = surface.get_capabilities(&adapter);
    let surface_format = surface_caps
        .formats
        .iter()
        .find(|f| f.is_srgb())
        .copied()
        .unwrap_or(surface_caps.formats[0]);

    // Vsync by default: the effect timers tick per frame, so an uncapped
    // frame rate would make shake and flash nearly instantaneous.
    log::info!("Present mode: Fifo (VSync ON)");

    let surface_config = wgpu::SurfaceConfiguration {
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        format: surface_format,
        width: size.width.max(1),
        height: size.height.max(1),
        present_mode: wgpu::PresentMode::Fifo,
        alpha_mode: surface_caps.alpha_modes[0],
        view_formats: vec![],
        desired_maximum_frame_latency: 2,
    };

    (device, queue, surface_config)
}

// ======================== Keyboard Handling ========================

fn handle_keyboard(
    state: &mut AppState,
    event_loop: &winit::event_loop::ActiveEventLoop,
    event: &winit::event::KeyEvent,
) {
    let pressed = event.state.is_pressed();

    match &event.logical_key {
        Key::Named(NamedKey::Escape) if pressed => event_loop.exit(),

        // Sprite movement (held)
        Key::Named(NamedKey::ArrowUp) => state.keys.up = pressed,
        Key::Named(NamedKey::ArrowDown) => state.keys.down = pressed,
        Key::Named(NamedKey::ArrowLeft) => state.keys.left = pressed,
        Key::Named(NamedKey::ArrowRight) => state.keys.right = pressed,

        Key::Character(c) => match c.as_str() {
            // Camera rotation / zoom (held)
            "q" | "Q" => state.keys.rotate_ccw = pressed,
            "e" | "E" => state.keys.rotate_cw = pressed,
            "z" | "Z" => state.keys.zoom_out = pressed,
            "a" | "A" => state.keys.zoom_in = pressed,

            // Effect triggers (retriggering while held resets the timer,
            // matching keyboard polling in the classic demo)
            "s" | "S" if pressed => {
                state.camera.trigger_shake(SHAKE_DURATION, SHAKE_FORCE);
                log::info!("Shake triggered ({SHAKE_DURATION}, {SHAKE_FORCE})");
            }
            "f" | "F" if pressed => {
                state.camera.trigger_flash(FLASH_DURATION);
                log::info!("Flash triggered ({FLASH_DURATION})");
            }

            "h" | "H" if pressed => {
                state.params.show_extended_hud = !state.params.show_extended_hud;
            }
            "v" | "V" if pressed => {
                state.params.vsync = !state.params.vsync;
                state.surface_config.present_mode = present_mode_for(state.params.vsync);
                state.surface.configure(&state.device, &state.surface_config);
                log::info!("VSync: {}", if state.params.vsync { "ON" } else { "OFF" });
            }
            _ => {}
        },

        _ => {}
    }
}

/// Present mode for the current vsync setting. Both Auto modes are valid
/// on every surface regardless of its capability list, unlike Immediate or
/// Mailbox, so reconfiguring with them can never panic.
fn present_mode_for(vsync: bool) -> wgpu::PresentMode {
    if vsync {
        wgpu::PresentMode::AutoVsync
    } else {
        wgpu::PresentMode::AutoNoVsync
    }
}

// ======================== Frame Rendering ========================

fn redraw(state: &mut AppState) {
    // FPS (exponential moving average)
    let now = Instant::now();
    let dt = now.duration_since(state.last_redraw).as_secs_f32().max(0.0001);
    state.last_redraw = now;
    state.fps = state.fps * 0.95 + (1.0 / dt) * 0.05;

    // Sprite movement from held keys
    state.scene.move_sprite(&state.keys);

    // Continuous camera adjustments from held keys
    if state.keys.rotate_ccw {
        state.camera.rotate(-ROTATE_STEP);
    }
    if state.keys.rotate_cw {
        state.camera.rotate(ROTATE_STEP);
    }
    if state.keys.zoom_out {
        state.camera.set_zoom(ZOOM_STEP);
    }
    if state.keys.zoom_in {
        state.camera.set_zoom(-ZOOM_STEP);
    }

    // Follow the sprite and advance the effect timers
    state.camera.follow_and_update(state.scene.sprite_pos);

    // Upload camera uniform
    state.queue.write_buffer(
        &state.pipelines.camera_buffer,
        0,
        bytemuck::bytes_of(&state.camera.uniforms()),
    );

    // Upload the sprite quad at its new position
    state.queue.write_buffer(
        &state.scene.sprite_quad_buffer,
        0,
        bytemuck::bytes_of(&state.scene.sprite_quad()),
    );

    // ---- Prepare HUD ----
    let win_w = state.surface_config.width;
    let win_h = state.surface_config.height;
    state.hud.prepare(
        &state.device,
        &state.queue,
        &state.params,
        &state.camera,
        state.fps,
        win_w,
        win_h,
    );

    // ---- Render pass ----
    let output = match state.surface.get_current_texture() {
        Ok(t) => t,
        Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
            state.surface.configure(&state.device, &state.surface_config);
            return;
        }
        Err(e) => {
            log::error!("Surface error: {:?}", e);
            return;
        }
    };

    let view = output
        .texture
        .create_view(&wgpu::TextureViewDescriptor::default());

    let mut encoder = state
        .device
        .create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("render_encoder"),
        });

    {
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("render_pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &view,
                resolve_target: None,
                ops: wgpu::Operations {
                    // White, visible when zoomed out past the world bounds.
                    load: wgpu::LoadOp::Clear(wgpu::Color::WHITE),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        pass.set_pipeline(&state.pipelines.scene_pipeline);
        pass.set_bind_group(0, &state.pipelines.background_bind_group, &[]);
        pass.draw(0..6, 0..1);
        pass.set_bind_group(0, &state.pipelines.sprite_bind_group, &[]);
        pass.draw(0..6, 0..1);

        // Flash overlay covers the scene; the HUD stays on top of it.
        if state.camera.flash_active() {
            pass.set_pipeline(&state.pipelines.flash_pipeline);
            pass.draw(0..3, 0..1);
        }

        state.hud.render(&mut pass);
    }

    state.queue.submit(std::iter::once(encoder.finish()));
    output.present();

    state.hud.trim();
    state.window.request_redraw();
}

// ======================== Tests ========================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vsync_toggle_only_uses_always_supported_present_modes() {
        // Immediate/Mailbox may be absent from a surface's capabilities and
        // would panic on configure; the Auto modes are valid everywhere.
        assert_eq!(present_mode_for(true), wgpu::PresentMode::AutoVsync);
        assert_eq!(present_mode_for(false), wgpu::PresentMode::AutoNoVsync);
    }
}
