use crate::palette::{Color, palette_rgba};

/// Uniform block shared by every pixel of the grid pass.  Layout matches
/// `Uniforms` in `shaders/grid.wgsl`.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GridUniforms {
    pub cell_size: [u32; 2],
    pub grid_size: [u32; 2],
    pub atlas_cells: [u32; 2],
    pub _pad: [u32; 2],
    pub palette: [[f32; 4]; Color::COUNT],
}

impl GridUniforms {
    /// `linear` selects a linearized palette for sRGB render targets.
    pub fn new(cell_size: [u32; 2], grid_size: [u32; 2], atlas_cells: [u32; 2], linear: bool) -> Self {
        Self {
            cell_size,
            grid_size,
            atlas_cells,
            _pad: [0; 2],
            palette: palette_rgba(linear),
        }
    }
}

pub struct GridPipeline {
    pub render_pipeline: wgpu::RenderPipeline,
    pub bind_group_layout: wgpu::BindGroupLayout,
}

fn fragment_entry(binding: u32, ty: wgpu::BindingType) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty,
        count: None,
    }
}

pub fn create_grid_pipeline(
    device: &wgpu::Device,
    surface_format: wgpu::TextureFormat,
) -> GridPipeline {
    let shader = device.create_shader_module(wgpu::include_wgsl!("shaders/grid.wgsl"));

    let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("grid_bgl"),
        entries: &[
            // font atlas
            fragment_entry(0, wgpu::BindingType::Texture {
                sample_type: wgpu::TextureSampleType::Float { filterable: true },
                view_dimension: wgpu::TextureViewDimension::D2,
                multisampled: false,
            }),
            fragment_entry(1, wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering)),
            // per-frame cell grid
            fragment_entry(2, wgpu::BindingType::Texture {
                sample_type: wgpu::TextureSampleType::Uint,
                view_dimension: wgpu::TextureViewDimension::D2,
                multisampled: false,
            }),
            fragment_entry(3, wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            }),
        ],
    });

    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("grid_pipeline_layout"),
        bind_group_layouts: &[&bind_group_layout],
        ..Default::default()
    });

    let render_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("grid_pipeline"),
        layout: Some(&layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            buffers: &[], // fullscreen triangle from vertex_index
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: surface_format,
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

    GridPipeline { render_pipeline, bind_group_layout }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_layout_matches_shader() {
        // 3 x vec2<u32> + padding, then 16 x vec4<f32>
        assert_eq!(std::mem::size_of::<GridUniforms>(), 32 + 16 * 16);
        assert_eq!(std::mem::offset_of!(GridUniforms, palette), 32);
    }

    #[test]
    fn uniforms_carry_geometry_and_palette() {
        let u = GridUniforms::new([8, 16], [80, 45], [16, 16], false);
        assert_eq!(u.cell_size, [8, 16]);
        assert_eq!(u.grid_size, [80, 45]);
        assert_eq!(u.palette[Color::White.index() as usize], [1.0, 1.0, 1.0, 1.0]);
        assert_eq!(u.palette[Color::Black.index() as usize], [0.0, 0.0, 0.0, 1.0]);
    }
}
