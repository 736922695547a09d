//! Pipeline and bind-group construction helpers.
//!
//! Thin wrappers over the wgpu descriptors so scene setup reads as a list
//! of resources instead of a wall of descriptor literals. Every sprite
//! pipeline shares the same shape: vertex + fragment stage, one vertex
//! buffer, depth test, back-face culling.

use ember_core::{AttributeFormat, BufferLayout};

use super::DEPTH_FORMAT;

/// Converts a core buffer layout into wgpu vertex attributes.
#[must_use]
pub fn vertex_attributes(layout: &BufferLayout) -> Vec<wgpu::VertexAttribute> {
    layout
        .attributes()
        .iter()
        .zip(layout.offsets())
        .map(|(attribute, &offset)| wgpu::VertexAttribute {
            format: match attribute.format {
                AttributeFormat::Float32x3 => wgpu::VertexFormat::Float32x3,
            },
            offset: offset as u64,
            shader_location: attribute.location,
        })
        .collect()
}

/// Creates a bind-group layout with a single uniform-buffer binding.
#[must_use]
pub fn uniform_bind_group_layout(
    device: &wgpu::Device,
    label: &str,
    visibility: wgpu::ShaderStages,
) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(label),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
    })
}

/// Creates a bind-group layout with a single read-only storage binding,
/// used for the per-instance transform buffer.
#[must_use]
pub fn storage_bind_group_layout(
    device: &wgpu::Device,
    label: &str,
    visibility: wgpu::ShaderStages,
) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(label),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Storage { read_only: true },
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
    })
}

/// Creates a bind group exposing one whole buffer at binding 0.
#[must_use]
pub fn buffer_bind_group(
    device: &wgpu::Device,
    label: &str,
    layout: &wgpu::BindGroupLayout,
    buffer: &wgpu::Buffer,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(label),
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: buffer.as_entire_binding(),
        }],
    })
}

/// Builds a sprite render pipeline: vertex/fragment stages from one shader
/// module, the geometry's vertex layout, alpha blending into the surface
/// format, and a clear-then-store depth test.
#[must_use]
pub fn sprite_pipeline(
    device: &wgpu::Device,
    label: &str,
    shader: &wgpu::ShaderModule,
    bind_group_layouts: &[&wgpu::BindGroupLayout],
    geometry_layout: &BufferLayout,
    surface_format: wgpu::TextureFormat,
) -> wgpu::RenderPipeline {
    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(label),
        bind_group_layouts,
        push_constant_ranges: &[],
    });

    let attributes = vertex_attributes(geometry_layout);
    let vertex_layout = wgpu::VertexBufferLayout {
        array_stride: geometry_layout.stride() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &attributes,
    };

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(&pipeline_layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: "vs_main",
            buffers: &[vertex_layout],
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: "fs_main",
            targets: &[Some(wgpu::ColorTargetState {
                format: surface_format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            cull_mode: Some(wgpu::Face::Back),
            ..Default::default()
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
    })
}
