pub mod atlas;
pub mod pipeline;

use std::sync::Arc;

use log::{debug, info};
use wgpu::util::DeviceExt;
use winit::dpi::PhysicalSize;
use winit::window::Window;

use atlas::Atlas;
use image::RgbaImage;
use pipeline::{GridPipeline, GridUniforms, create_grid_pipeline};

use crate::error::{Error, Result};
use crate::grid::Grid;

fn gpu_error(err: impl std::fmt::Display) -> Error {
    Error::Gpu(err.to_string())
}

/// Draws the cell grid to the window surface.
///
/// Everything except the grid texture is created once: the atlas, the
/// pipeline and the uniform block (cell size, grid size and palette never
/// change for the lifetime of the engine).  The grid texture is rebuilt from
/// [`Grid::encode_into`] every frame.
pub struct Renderer {
    pub window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    pipeline: GridPipeline,
    atlas: Atlas,
    uniforms_buffer: wgpu::Buffer,
    /// Encoded grid bytes, reused between frames.
    scratch: Vec<u8>,
}

impl Renderer {
    pub async fn new(
        window: Arc<Window>,
        atlas_image: &RgbaImage,
        cell_size: (u32, u32),
        grid_size: (usize, usize),
    ) -> Result<Self> {
        let size = window.inner_size();

        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(Arc::clone(&window)).map_err(gpu_error)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                compatible_surface: Some(&surface),
                ..Default::default()
            })
            .await
            .map_err(gpu_error)?;
        info!("using GPU adapter {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor::default())
            .await
            .map_err(gpu_error)?;

        // Prefer a plain UNORM target so palette values are written as-is.
        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|format| !format.is_srgb())
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| Error::Gpu("surface reports no supported formats".into()))?;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);
        debug!("surface format {format:?}");

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let (cell_w, cell_h) = cell_size;
        let atlas = Atlas::upload(&device, &queue, atlas_image, cell_w, cell_h);
        let pipeline = create_grid_pipeline(&device, format);

        let uniforms = GridUniforms::new(
            [cell_w, cell_h],
            [grid_size.0 as u32, grid_size.1 as u32],
            [atlas.cols, atlas.rows],
            format.is_srgb(),
        );
        let uniforms_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("grid_uniforms"),
            contents: bytemuck::bytes_of(&uniforms),
            usage: wgpu::BufferUsages::UNIFORM,
        });

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            pipeline,
            atlas,
            uniforms_buffer,
            scratch: Vec::new(),
        })
    }

    /// Reconfigure the surface.  The grid keeps its dimensions; extra
    /// space renders black and cells past the edge are clipped.
    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.surface.configure(&self.device, &self.config);
    }

    /// Upload `grid` as a fresh texture and draw it.
    pub fn render_frame(&mut self, grid: &Grid) -> std::result::Result<(), wgpu::SurfaceError> {
        let frame = self.surface.get_current_texture()?;
        let view = frame.texture.create_view(&wgpu::TextureViewDescriptor::default());

        grid.encode_into(&mut self.scratch);
        let grid_texture = self.device.create_texture_with_data(
            &self.queue,
            &wgpu::TextureDescriptor {
                label: Some("grid_texture"),
                size: wgpu::Extent3d {
                    width: grid.width() as u32,
                    height: grid.height() as u32,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba8Uint,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            },
            wgpu::util::TextureDataOrder::LayerMajor,
            &self.scratch,
        );
        let grid_view = grid_texture.create_view(&wgpu::TextureViewDescriptor::default());

        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("grid_bg"),
            layout: &self.pipeline.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&self.atlas.texture_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.atlas.sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::TextureView(&grid_view),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: self.uniforms_buffer.as_entire_binding(),
                },
            ],
        });

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: Some("grid_encoder") });
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("grid_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    depth_slice: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });
            pass.set_pipeline(&self.pipeline.render_pipeline);
            pass.set_bind_group(0, &bind_group, &[]);
            pass.draw(0..3, 0..1);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        Ok(())
    }
}
