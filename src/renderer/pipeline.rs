//! wgpu presentation surface
//!
//! Two pipelines share one render pass per frame: flat-colored triangles for
//! the debug overlay and a textured quad for the background. Draw calls are
//! queued between `clear` and `flip` and replayed in order.

use std::ops::Range;
use std::sync::Arc;

use glam::Vec2;
use wgpu::util::DeviceExt;
use winit::window::Window;

use super::shapes;
use super::vertex::{SpriteVertex, Vertex, srgb_to_linear_color};
use crate::app::{DisplayImage, Presenter};
use crate::asset::BackgroundImage;
use crate::error::{DemoError, DemoResult};
use crate::sim::DebugShape;

/// One queued draw, as a vertex range into that frame's buffer
#[derive(Debug, Clone)]
enum DrawCommand {
    Shapes(Range<u32>),
    Sprite(Range<u32>),
}

/// Main render state
pub struct RenderState {
    window: Arc<Window>,
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    shape_pipeline: wgpu::RenderPipeline,
    sprite_pipeline: wgpu::RenderPipeline,
    background_bind_group: wgpu::BindGroup,
    /// Viewport size in pixels
    pub size: (u32, u32),

    // Current frame
    clear_color: wgpu::Color,
    shape_vertices: Vec<Vertex>,
    sprite_vertices: Vec<SpriteVertex>,
    commands: Vec<DrawCommand>,
}

impl RenderState {
    /// Create the surface for `window` and upload `background` to the GPU
    pub fn new(window: Arc<Window>, background: &BackgroundImage) -> DemoResult<Self> {
        pollster::block_on(Self::init(window, background))
    }

    async fn init(window: Arc<Window>, background: &BackgroundImage) -> DemoResult<Self> {
        let inner = window.inner_size();
        let (width, height) = (inner.width.max(1), inner.height.max(1));

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .map_err(|e| DemoError::RenderBackend(format!("create surface: {e}")))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| DemoError::RenderBackend(format!("request adapter: {e}")))?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("pasta-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_defaults()
                    .using_resolution(adapter.limits()),
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await
            .map_err(|e| DemoError::RenderBackend(format!("request device: {e}")))?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or_else(|| DemoError::RenderBackend("surface has no formats".into()))?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        log::info!("Using surface format: {:?}", surface_format);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let max_dim = device.limits().max_texture_dimension_2d;
        if background.width > max_dim || background.height > max_dim {
            return Err(DemoError::RenderBackend(format!(
                "background {}x{} exceeds max texture size {}",
                background.width, background.height, max_dim
            )));
        }

        let shape_pipeline = create_shape_pipeline(&device, config.format);
        let sprite_pipeline = create_sprite_pipeline(&device, config.format);
        let background_bind_group =
            upload_background(&device, &queue, &sprite_pipeline, background);

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            shape_pipeline,
            sprite_pipeline,
            background_bind_group,
            size: (width, height),
            clear_color: wgpu::Color::BLACK,
            shape_vertices: Vec::new(),
            sprite_vertices: Vec::new(),
            commands: Vec::new(),
        })
    }

    fn reset_frame(&mut self) {
        self.shape_vertices.clear();
        self.sprite_vertices.clear();
        self.commands.clear();
    }

    fn acquire(&mut self) -> DemoResult<wgpu::SurfaceTexture> {
        match self.surface.get_current_texture() {
            Ok(texture) => Ok(texture),
            Err(e @ (wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated)) => {
                log::warn!("Surface {e}, reconfiguring");
                self.surface.configure(&self.device, &self.config);
                Ok(self.surface.get_current_texture()?)
            }
            Err(e) => Err(e.into()),
        }
    }
}

impl Presenter for RenderState {
    fn clear(&mut self, color: [u8; 3]) {
        self.reset_frame();
        self.clear_color = srgb_to_linear_color(color);
    }

    fn draw_debug(&mut self, shapes: &[DebugShape]) {
        let start = self.shape_vertices.len() as u32;
        let size = self.size;
        self.shape_vertices
            .extend(shapes::debug_overlay(shapes).into_iter().map(|v| {
                let ndc = pixel_to_ndc(Vec2::from(v.position), size);
                Vertex::new(ndc[0], ndc[1], v.color)
            }));
        let end = self.shape_vertices.len() as u32;
        if end > start {
            self.commands.push(DrawCommand::Shapes(start..end));
        }
    }

    fn blit(&mut self, image: &DisplayImage, origin: Vec2) {
        if image.is_empty() {
            return;
        }
        let (w, h) = image.size();
        let start = self.sprite_vertices.len() as u32;
        let size = self.size;
        self.sprite_vertices.extend(
            shapes::sprite_quad(origin, Vec2::new(w as f32, h as f32))
                .into_iter()
                .map(|v| {
                    let ndc = pixel_to_ndc(Vec2::from(v.position), size);
                    SpriteVertex::new(ndc[0], ndc[1], v.uv[0], v.uv[1])
                }),
        );
        let end = self.sprite_vertices.len() as u32;
        self.commands.push(DrawCommand::Sprite(start..end));
    }

    fn flip(&mut self) -> DemoResult<()> {
        let shape_buffer = (!self.shape_vertices.is_empty()).then(|| {
            self.device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("shape_vertex_buffer"),
                    contents: bytemuck::cast_slice(&self.shape_vertices),
                    usage: wgpu::BufferUsages::VERTEX,
                })
        });
        let sprite_buffer = (!self.sprite_vertices.is_empty()).then(|| {
            self.device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("sprite_vertex_buffer"),
                    contents: bytemuck::cast_slice(&self.sprite_vertices),
                    usage: wgpu::BufferUsages::VERTEX,
                })
        });

        let output = self.acquire()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("render_encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("render_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            for command in &self.commands {
                match command {
                    DrawCommand::Shapes(range) => {
                        if let Some(buffer) = &shape_buffer {
                            render_pass.set_pipeline(&self.shape_pipeline);
                            render_pass.set_vertex_buffer(0, buffer.slice(..));
                            render_pass.draw(range.clone(), 0..1);
                        }
                    }
                    DrawCommand::Sprite(range) => {
                        if let Some(buffer) = &sprite_buffer {
                            render_pass.set_pipeline(&self.sprite_pipeline);
                            render_pass.set_bind_group(0, &self.background_bind_group, &[]);
                            render_pass.set_vertex_buffer(0, buffer.slice(..));
                            render_pass.draw(range.clone(), 0..1);
                        }
                    }
                }
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        self.window.pre_present_notify();
        output.present();
        self.reset_frame();

        Ok(())
    }

    fn set_caption(&mut self, caption: &str) {
        self.window.set_title(caption);
    }

    fn resize(&mut self, new_width: u32, new_height: u32) {
        if new_width > 0 && new_height > 0 {
            self.size = (new_width, new_height);
            self.config.width = new_width;
            self.config.height = new_height;
            self.surface.configure(&self.device, &self.config);
            log::debug!("Surface resized to {}x{}", new_width, new_height);
        }
    }
}

/// Window pixels (origin top-left, y down) to NDC for a viewport of `size`
pub fn pixel_to_ndc(p: Vec2, size: (u32, u32)) -> [f32; 2] {
    let (w, h) = (size.0.max(1) as f32, size.1.max(1) as f32);
    [p.x / w * 2.0 - 1.0, 1.0 - p.y / h * 2.0]
}

fn create_shape_pipeline(
    device: &wgpu::Device,
    format: wgpu::TextureFormat,
) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("shape_shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("shape.wgsl").into()),
    });

    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("shape_pipeline_layout"),
        bind_group_layouts: &[],
        immediate_size: 0,
    });

    create_pipeline(
        device,
        "shape_pipeline",
        Some(&pipeline_layout),
        &shader,
        Vertex::desc(),
        format,
    )
}

fn create_sprite_pipeline(
    device: &wgpu::Device,
    format: wgpu::TextureFormat,
) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("sprite_shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("sprite.wgsl").into()),
    });

    // Layout derived from the shader's texture + sampler bindings
    create_pipeline(
        device,
        "sprite_pipeline",
        None,
        &shader,
        SpriteVertex::desc(),
        format,
    )
}

fn create_pipeline(
    device: &wgpu::Device,
    label: &str,
    layout: Option<&wgpu::PipelineLayout>,
    shader: &wgpu::ShaderModule,
    vertex_layout: wgpu::VertexBufferLayout<'static>,
    format: wgpu::TextureFormat,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout,
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            buffers: &[vertex_layout],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview_mask: None,
        cache: None,
    })
}

/// Upload the original asset once; scaling happens when the quad is drawn
fn upload_background(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    sprite_pipeline: &wgpu::RenderPipeline,
    background: &BackgroundImage,
) -> wgpu::BindGroup {
    let texture_size = wgpu::Extent3d {
        width: background.width,
        height: background.height,
        depth_or_array_layers: 1,
    };
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("background_texture"),
        size: texture_size,
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
        &background.rgba,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(4 * background.width),
            rows_per_image: Some(background.height),
        },
        texture_size,
    );

    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some("background_sampler"),
        address_mode_u: wgpu::AddressMode::ClampToEdge,
        address_mode_v: wgpu::AddressMode::ClampToEdge,
        mag_filter: wgpu::FilterMode::Nearest,
        min_filter: wgpu::FilterMode::Nearest,
        ..Default::default()
    });

    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("background_bind_group"),
        layout: &sprite_pipeline.get_bind_group_layout(0),
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(&sampler),
            },
        ],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_to_ndc_corners() {
        let size = (1280, 720);
        assert_eq!(pixel_to_ndc(Vec2::ZERO, size), [-1.0, 1.0]);
        assert_eq!(pixel_to_ndc(Vec2::new(1280.0, 720.0), size), [1.0, -1.0]);
        assert_eq!(pixel_to_ndc(Vec2::new(640.0, 360.0), size), [0.0, 0.0]);
    }

    #[test]
    fn test_pixel_to_ndc_zero_size_is_finite() {
        let ndc = pixel_to_ndc(Vec2::new(10.0, 10.0), (0, 0));
        assert!(ndc[0].is_finite() && ndc[1].is_finite());
    }
}
