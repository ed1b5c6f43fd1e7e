use std::path::Path;

use image::RgbaImage;
use wgpu::util::DeviceExt;

use crate::error::{Error, Result};

/// Decode a glyph atlas PNG.  The image must hold at least one whole cell;
/// glyph `n` lives at column `n % cols`, row `n / cols`.
pub fn decode(png_bytes: &[u8], path: &Path, cell_w: u32, cell_h: u32) -> Result<RgbaImage> {
    let img = image::load_from_memory(png_bytes)
        .map_err(|source| Error::Atlas { path: path.to_path_buf(), source })?
        .to_rgba8();
    let (img_w, img_h) = img.dimensions();
    if img_w < cell_w || img_h < cell_h {
        return Err(Error::AtlasSize { size: (img_w, img_h), cell_w, cell_h });
    }
    Ok(img)
}

/// The font atlas on the GPU.  Loaded once and never modified.
pub struct Atlas {
    pub texture_view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
    /// Whole cells per atlas row and column.
    pub cols: u32,
    pub rows: u32,
}

impl Atlas {
    pub fn upload(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        img: &RgbaImage,
        cell_w: u32,
        cell_h: u32,
    ) -> Self {
        let (img_w, img_h) = img.dimensions();

        let texture = device.create_texture_with_data(
            queue,
            &wgpu::TextureDescriptor {
                label: Some("font_atlas"),
                size: wgpu::Extent3d { width: img_w, height: img_h, depth_or_array_layers: 1 },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                // Glyph coverage is not a color: keep it linear.
                format: wgpu::TextureFormat::Rgba8Unorm,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            },
            wgpu::util::TextureDataOrder::LayerMajor,
            img.as_raw(),
        );

        let texture_view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("font_atlas_sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        Self { texture_view, sampler, cols: img_w / cell_w, rows: img_h / cell_h }
    }
}
