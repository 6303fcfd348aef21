// ============================================================================
// scene.rs — FollowCam
// SceneState: world dimensions, background & sprite textures, sprite
// movement, and the per-quad uniform buffers the render pass binds.
// ============================================================================

use bytemuck::{Pod, Zeroable};
use glam::Vec2;
use wgpu::util::DeviceExt;

use crate::config::{DEFAULT_WORLD_HEIGHT, DEFAULT_WORLD_WIDTH, SPRITE_SPEED};
use crate::input::KeysHeld;

// ======================== Constants ========================

/// Sprite texture size in pixels (the sprite quad is drawn at 1:1 scale).
pub const SPRITE_SIZE: u32 = 48;

/// Checkerboard cell size for the generated fallback background.
const CHECKER_CELL: u32 = 120;

/// Width of the dark frame drawn along the world edge of the fallback
/// background, so the clamped world boundary is visible on screen.
const BORDER: u32 = 8;

// ======================== Uniform Structs ========================

/// Per-quad uniform: world-space top-left origin and size in pixels.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct QuadParams {
    pub origin: [f32; 2],
    pub size: [f32; 2],
}

// ======================== SceneState ========================

pub struct SceneState {
    pub world_width: u32,
    pub world_height: u32,

    /// Sprite center in world coordinates. Not clamped; only the camera is.
    pub sprite_pos: Vec2,

    pub background_view: wgpu::TextureView,
    pub sprite_view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,

    // Uniform buffers
    pub background_quad_buffer: wgpu::Buffer,
    pub sprite_quad_buffer: wgpu::Buffer,
}

impl SceneState {
    /// Build the scene. The background comes from `background_path` when
    /// given (its dimensions become the world bounds, as in the classic
    /// photo-scrolling demo); otherwise a checkerboard is generated so the
    /// demo runs without any assets on disk.
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        background_path: Option<&str>,
    ) -> Self {
        let (world_width, world_height, pixels) = match background_path {
            Some(path) => match load_background(path) {
                Ok(loaded) => {
                    log::info!("Background: {} ({}x{})", path, loaded.0, loaded.1);
                    loaded
                }
                Err(err) => {
                    log::warn!(
                        "Failed to load background {}: {}; using generated checkerboard",
                        path,
                        err
                    );
                    checkerboard(DEFAULT_WORLD_WIDTH, DEFAULT_WORLD_HEIGHT)
                }
            },
            None => checkerboard(DEFAULT_WORLD_WIDTH, DEFAULT_WORLD_HEIGHT),
        };

        let background_view = create_texture(
            device,
            queue,
            "background_texture",
            world_width,
            world_height,
            &pixels,
        );
        let sprite_view = create_texture(
            device,
            queue,
            "sprite_texture",
            SPRITE_SIZE,
            SPRITE_SIZE,
            &sprite_pixels(SPRITE_SIZE),
        );

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("scene_sampler"),
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let sprite_pos = Vec2::new(world_width as f32, world_height as f32) * 0.5;

        let background_quad_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("background_quad"),
            contents: bytemuck::bytes_of(&QuadParams {
                origin: [0.0, 0.0],
                size: [world_width as f32, world_height as f32],
            }),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let sprite_quad_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("sprite_quad"),
            contents: bytemuck::bytes_of(&sprite_quad_at(sprite_pos)),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        Self {
            world_width,
            world_height,
            sprite_pos,
            background_view,
            sprite_view,
            sampler,
            background_quad_buffer,
            sprite_quad_buffer,
        }
    }

    pub fn world_size(&self) -> Vec2 {
        Vec2::new(self.world_width as f32, self.world_height as f32)
    }

    /// Advance the sprite from held arrow keys.
    pub fn move_sprite(&mut self, keys: &KeysHeld) {
        self.sprite_pos = step_sprite(self.sprite_pos, keys);
    }

    /// Current sprite quad uniform, rewritten to the GPU every frame.
    pub fn sprite_quad(&self) -> QuadParams {
        sprite_quad_at(self.sprite_pos)
    }
}

// ======================== Sprite Movement ========================

/// One frame of sprite movement: `SPRITE_SPEED` pixels per held direction.
pub fn step_sprite(pos: Vec2, keys: &KeysHeld) -> Vec2 {
    let mut next = pos;
    if keys.left {
        next.x -= SPRITE_SPEED;
    }
    if keys.right {
        next.x += SPRITE_SPEED;
    }
    if keys.up {
        next.y -= SPRITE_SPEED;
    }
    if keys.down {
        next.y += SPRITE_SPEED;
    }
    next
}

/// Quad uniform for a sprite centered at `pos`.
pub fn sprite_quad_at(pos: Vec2) -> QuadParams {
    let half = SPRITE_SIZE as f32 * 0.5;
    QuadParams {
        origin: [pos.x - half, pos.y - half],
        size: [SPRITE_SIZE as f32, SPRITE_SIZE as f32],
    }
}

// ======================== Texture Generation ========================

fn load_background(path: &str) -> Result<(u32, u32, Vec<u8>), image::ImageError> {
    let img = image::open(path)?.to_rgba8();
    let (w, h) = img.dimensions();
    Ok((w, h, img.into_raw()))
}

/// Generated fallback background: a two-tone checkerboard with a dark
/// frame along the world edge.
fn checkerboard(width: u32, height: u32) -> (u32, u32, Vec<u8>) {
    let mut pixels = Vec::with_capacity((width * height * 4) as usize);
    for y in 0..height {
        for x in 0..width {
            let on_border =
                x < BORDER || y < BORDER || x >= width - BORDER || y >= height - BORDER;
            let rgba: [u8; 4] = if on_border {
                [40, 40, 48, 255]
            } else if ((x / CHECKER_CELL) + (y / CHECKER_CELL)) % 2 == 0 {
                [96, 108, 134, 255]
            } else {
                [70, 80, 100, 255]
            };
            pixels.extend_from_slice(&rgba);
        }
    }
    (width, height, pixels)
}

/// Generated sprite: an orange disc with a dark outline on a transparent
/// background.
fn sprite_pixels(size: u32) -> Vec<u8> {
    let mut pixels = Vec::with_capacity((size * size * 4) as usize);
    let center = (size as f32 - 1.0) * 0.5;
    let radius = size as f32 * 0.5 - 1.0;
    for y in 0..size {
        for x in 0..size {
            let dx = x as f32 - center;
            let dy = y as f32 - center;
            let dist = (dx * dx + dy * dy).sqrt();
            let rgba: [u8; 4] = if dist <= radius - 3.0 {
                [235, 130, 40, 255]
            } else if dist <= radius {
                [60, 40, 20, 255]
            } else {
                [0, 0, 0, 0]
            };
            pixels.extend_from_slice(&rgba);
        }
    }
    pixels
}

fn create_texture(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    label: &str,
    width: u32,
    height: u32,
    rgba: &[u8],
) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8UnormSrgb,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });

    queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        rgba,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(width * 4),
            rows_per_image: Some(height),
        },
        wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
    );

    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

// ======================== Tests ========================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_sprite_moves_five_pixels_per_axis() {
        let keys = KeysHeld {
            right: true,
            down: true,
            ..Default::default()
        };
        let next = step_sprite(Vec2::new(100.0, 100.0), &keys);
        assert_eq!(next, Vec2::new(105.0, 105.0));
    }

    #[test]
    fn step_sprite_opposite_keys_cancel() {
        let keys = KeysHeld {
            left: true,
            right: true,
            ..Default::default()
        };
        let next = step_sprite(Vec2::new(100.0, 100.0), &keys);
        assert_eq!(next, Vec2::new(100.0, 100.0));
    }

    #[test]
    fn sprite_quad_is_centered_on_position() {
        let quad = sprite_quad_at(Vec2::new(200.0, 300.0));
        assert_eq!(quad.origin, [200.0 - 24.0, 300.0 - 24.0]);
        assert_eq!(quad.size, [48.0, 48.0]);
    }

    #[test]
    fn checkerboard_fills_the_requested_size() {
        let (w, h, pixels) = checkerboard(240, 120);
        assert_eq!((w, h), (240, 120));
        assert_eq!(pixels.len(), 240 * 120 * 4);
    }

    #[test]
    fn sprite_texture_is_opaque_inside_transparent_outside() {
        let pixels = sprite_pixels(SPRITE_SIZE);
        let at = |x: u32, y: u32| {
            let i = ((y * SPRITE_SIZE + x) * 4) as usize;
            pixels[i + 3]
        };
        assert_eq!(at(SPRITE_SIZE / 2, SPRITE_SIZE / 2), 255);
        assert_eq!(at(0, 0), 0);
        assert_eq!(at(SPRITE_SIZE - 1, SPRITE_SIZE - 1), 0);
    }
}
