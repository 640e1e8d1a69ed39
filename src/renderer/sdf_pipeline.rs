//! SDF-based WebGPU render pipeline
//!
//! Renders the whole scene in the fragment shader: every recorded circle and
//! rectangle becomes a signed distance evaluated per pixel, blended in
//! drawing order over the background.

use bytemuck::{Pod, Zeroable};
use glam::Vec2;
use wgpu::util::DeviceExt;

use super::scene::{DrawCmd, DrawList, colors};

/// Maximum number of shapes per frame (must match shader)
pub const MAX_SHAPES: usize = 256;

const KIND_CIRCLE: u32 = 0;
const KIND_RECT: u32 = 1;

// ============================================================================
// GPU DATA STRUCTURES (must match shader)
// ============================================================================

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Globals {
    resolution: [f32; 2], // offset 0
    playfield: [f32; 2],  // offset 8
    background: [f32; 4], // offset 16
    letterbox: [f32; 4],  // offset 32
    shape_count: u32,     // offset 48
    _pad: [u32; 3],       // pad to 64 bytes
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct ShapeData {
    /// Circle center, or rectangle top-left
    pub pos: [f32; 2],
    /// Circle: `[radius, 0]`; rectangle: extents
    pub size: [f32; 2],
    pub color: [f32; 4],
    pub kind: u32,
    _pad: [u32; 3], // 48-byte array stride
}

/// Convert recorded commands into shader shapes, dropping any past the cap.
///
/// Clears are skipped: the shader paints the background itself.
pub fn encode_shapes(cmds: &[DrawCmd]) -> Vec<ShapeData> {
    let mut shapes: Vec<ShapeData> = cmds
        .iter()
        .filter_map(|cmd| match *cmd {
            DrawCmd::Clear { .. } => None,
            DrawCmd::Circle {
                center,
                radius,
                color,
            } => Some(ShapeData {
                pos: center.to_array(),
                size: [radius, 0.0],
                color,
                kind: KIND_CIRCLE,
                _pad: [0; 3],
            }),
            DrawCmd::Rect {
                origin,
                size,
                color,
            } => Some(ShapeData {
                pos: origin.to_array(),
                size: size.to_array(),
                color,
                kind: KIND_RECT,
                _pad: [0; 3],
            }),
        })
        .collect();

    if shapes.len() > MAX_SHAPES {
        log::debug!("Dropping {} shapes over the budget", shapes.len() - MAX_SHAPES);
        // Keep the last shape if it is the full-field overlay
        let overlay = shapes.last().copied().filter(|s| s.kind == KIND_RECT);
        shapes.truncate(MAX_SHAPES);
        if let Some(overlay) = overlay {
            shapes[MAX_SHAPES - 1] = overlay;
        }
    }
    shapes
}

// ============================================================================
// SDF RENDER STATE
// ============================================================================

pub struct SdfRenderState {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub pipeline: wgpu::RenderPipeline,

    // Uniform buffers
    globals_buffer: wgpu::Buffer,
    shapes_buffer: wgpu::Buffer,

    bind_group: wgpu::BindGroup,

    pub size: (u32, u32),
}

impl SdfRenderState {
    pub async fn new(
        surface: wgpu::Surface<'static>,
        adapter: &wgpu::Adapter,
        width: u32,
        height: u32,
    ) -> Self {
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("sdf-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await
            .expect("Failed to create device");

        let surface_caps = surface.get_capabilities(adapter);
        log::info!("Surface formats: {:?}", surface_caps.formats);

        // Colors are authored as plain sRGB hex values; skip the implicit
        // linear-to-sRGB conversion of *Srgb formats
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| !f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        log::info!("Using surface format: {:?}", surface_format);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("sdf_shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("sdf_shader.wgsl").into()),
        });

        let globals_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("globals"),
            contents: bytemuck::bytes_of(&Globals {
                resolution: [width as f32, height as f32],
                playfield: [1.0, 1.0],
                background: colors::BACKGROUND,
                letterbox: colors::LETTERBOX,
                shape_count: 0,
                _pad: [0; 3],
            }),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let shapes_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("shapes"),
            size: (std::mem::size_of::<ShapeData>() * MAX_SHAPES) as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let uniform_entry = |binding| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        };

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("sdf_bind_group_layout"),
            entries: &[uniform_entry(0), uniform_entry(1)],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("sdf_bind_group"),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: globals_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: shapes_buffer.as_entire_binding(),
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("sdf_pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("sdf_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[], // No vertex buffers - fullscreen triangle
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: None,
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
            multiview_mask: None,
            cache: None,
        });

        Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            globals_buffer,
            shapes_buffer,
            bind_group,
            size: (width, height),
        }
    }

    pub fn resize(&mut self, new_width: u32, new_height: u32) {
        if new_width > 0 && new_height > 0 {
            self.size = (new_width, new_height);
            self.config.width = new_width;
            self.config.height = new_height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Upload the visible part of a frame's draw list and render it
    pub fn render(&mut self, scene: &DrawList, playfield: Vec2) -> Result<(), wgpu::SurfaceError> {
        let shapes = encode_shapes(scene.visible());

        let globals = Globals {
            resolution: [self.size.0 as f32, self.size.1 as f32],
            playfield: playfield.to_array(),
            background: colors::BACKGROUND,
            letterbox: colors::LETTERBOX,
            shape_count: shapes.len() as u32,
            _pad: [0; 3],
        };
        self.queue
            .write_buffer(&self.globals_buffer, 0, bytemuck::bytes_of(&globals));
        if !shapes.is_empty() {
            self.queue
                .write_buffer(&self.shapes_buffer, 0, bytemuck::cast_slice(&shapes));
        }

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("sdf_encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("sdf_render_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            render_pass.set_pipeline(&self.pipeline);
            render_pass.set_bind_group(0, &self.bind_group, &[]);
            render_pass.draw(0..3, 0..1); // Fullscreen triangle
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}
