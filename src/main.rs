// ============================================================================
// main.rs — FollowCam
// Entry point. Initializes logging and starts the event loop.
// ============================================================================

mod app;
mod camera;
mod config;
mod input;
mod pipeline;
mod renderer;
mod scene;

use app::{App, AppConfig};
use winit::event_loop::EventLoop;

fn main() {
    env_logger::init();

    // Optional first argument: background image path (the world takes the
    // image's dimensions). Without it a checkerboard world is generated.
    let config = AppConfig {
        background_path: std::env::args().nth(1),
    };

    let event_loop = EventLoop::new().unwrap();
    event_loop.set_control_flow(winit::event_loop::ControlFlow::Poll);

    let mut app = App::new(config);
    event_loop.run_app(&mut app).unwrap();
}
