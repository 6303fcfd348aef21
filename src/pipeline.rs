// ============================================================================
// pipeline.rs — FollowCam
// GPU pipeline creation (scene quads & flash overlay) and
// bind-group-layout helpers.
// ============================================================================

use wgpu::util::DeviceExt;

use crate::camera::CameraUniforms;
use crate::scene::SceneState;

// ======================== Pipelines ========================

/// All GPU pipelines and their associated bind groups.
pub struct Pipelines {
    pub scene_pipeline: wgpu::RenderPipeline,
    pub background_bind_group: wgpu::BindGroup,
    pub sprite_bind_group: wgpu::BindGroup,

    /// Full-screen white overlay, drawn only while the flash is active.
    pub flash_pipeline: wgpu::RenderPipeline,

    pub camera_buffer: wgpu::Buffer,
}

// ======================== Pipeline Creation ========================

pub fn create_pipelines(
    device: &wgpu::Device,
    scene: &SceneState,
    surface_format: wgpu::TextureFormat,
) -> Pipelines {
    // ---- Load shaders ----
    let scene_shader = load_shader(device, "scene", include_str!("shaders/scene.wgsl"));
    let flash_shader = load_shader(device, "flash", include_str!("shaders/flash.wgsl"));

    // ================================================================
    // SCENE PIPELINE (camera-transformed textured quads)
    // ================================================================
    let scene_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("scene_bgl"),
        entries: &[
            bgl_uniform(0),
            bgl_uniform(1),
            bgl_texture(2),
            bgl_sampler(3),
        ],
    });

    let scene_pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("scene_pipeline_layout"),
        bind_group_layouts: &[&scene_bgl],
        push_constant_ranges: &[],
    });

    let scene_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("scene_pipeline"),
        layout: Some(&scene_pipeline_layout),
        vertex: wgpu::VertexState {
            module: &scene_shader,
            entry_point: Some("vs_main"),
            buffers: &[],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &scene_shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: surface_format,
                // Alpha blending: the sprite texture has transparent corners.
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            ..Default::default()
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    });

    // Camera uniform buffer, rewritten every frame.
    let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("camera_uniforms"),
        contents: bytemuck::bytes_of(&CameraUniforms::default()),
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    });

    let background_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("background_bg"),
        layout: &scene_bgl,
        entries: &[
            bg_buffer(0, &camera_buffer),
            bg_buffer(1, &scene.background_quad_buffer),
            bg_texture(2, &scene.background_view),
            bg_sampler(3, &scene.sampler),
        ],
    });

    let sprite_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("sprite_bg"),
        layout: &scene_bgl,
        entries: &[
            bg_buffer(0, &camera_buffer),
            bg_buffer(1, &scene.sprite_quad_buffer),
            bg_texture(2, &scene.sprite_view),
            bg_sampler(3, &scene.sampler),
        ],
    });

    // ================================================================
    // FLASH PIPELINE (full-screen white overlay, no bindings)
    // ================================================================
    let flash_pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("flash_pipeline_layout"),
        bind_group_layouts: &[],
        push_constant_ranges: &[],
    });

    let flash_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("flash_pipeline"),
        layout: Some(&flash_pipeline_layout),
        vertex: wgpu::VertexState {
            module: &flash_shader,
            entry_point: Some("vs_main"),
            buffers: &[],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &flash_shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: surface_format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            ..Default::default()
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    });

    Pipelines {
        scene_pipeline,
        background_bind_group,
        sprite_bind_group,
        flash_pipeline,
        camera_buffer,
    }
}

// ======================== Helpers ========================

fn load_shader(device: &wgpu::Device, label: &str, source: &str) -> wgpu::ShaderModule {
    device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    })
}

fn bgl_uniform(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

fn bgl_texture(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Texture {
            sample_type: wgpu::TextureSampleType::Float { filterable: true },
            view_dimension: wgpu::TextureViewDimension::D2,
            multisampled: false,
        },
        count: None,
    }
}

fn bgl_sampler(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
        count: None,
    }
}

fn bg_buffer(binding: u32, buffer: &wgpu::Buffer) -> wgpu::BindGroupEntry<'_> {
    wgpu::BindGroupEntry {
        binding,
        resource: buffer.as_entire_binding(),
    }
}

fn bg_texture<'a>(binding: u32, view: &'a wgpu::TextureView) -> wgpu::BindGroupEntry<'a> {
    wgpu::BindGroupEntry {
        binding,
        resource: wgpu::BindingResource::TextureView(view),
    }
}

fn bg_sampler<'a>(binding: u32, sampler: &'a wgpu::Sampler) -> wgpu::BindGroupEntry<'a> {
    wgpu::BindGroupEntry {
        binding,
        resource: wgpu::BindingResource::Sampler(sampler),
    }
}
