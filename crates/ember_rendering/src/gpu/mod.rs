//! # GPU Executor
//!
//! The one place that touches the device. Replays a frame's command list:
//! buffer writes through the queue, then every draw into a single render
//! pass with one color attachment and one depth attachment, both
//! clear-then-store.
//!
//! All handles are resolved against the registry *before* anything is
//! encoded, so a stale handle aborts the frame instead of partially
//! submitting it.

pub mod pipeline;
pub mod shaders;

use crate::error::FrameError;
use crate::frame::FrameCommands;
use crate::registry::Registry;

/// Depth attachment format shared by every sprite pipeline.
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth24Plus;

/// Per-frame GPU surface handles, supplied by the platform layer.
///
/// Device/queue acquisition and surface configuration live outside the
/// core; the driver only borrows them for the duration of one frame.
pub struct GpuContext<'a> {
    /// The graphics device.
    pub device: &'a wgpu::Device,
    /// The submission queue.
    pub queue: &'a wgpu::Queue,
    /// This frame's color attachment (the surface texture view).
    pub color_view: &'a wgpu::TextureView,
    /// This frame's depth attachment.
    pub depth_view: &'a wgpu::TextureView,
}

/// Depth texture sized to the drawable surface. Recreated on resize.
pub struct DepthTarget {
    /// The owning texture.
    pub texture: wgpu::Texture,
    /// View used as the render pass depth attachment.
    pub view: wgpu::TextureView,
}

impl DepthTarget {
    /// Creates a depth texture covering `width` x `height` pixels.
    #[must_use]
    pub fn new(device: &wgpu::Device, width: u32, height: u32) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("ember depth target"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self { texture, view }
    }
}

struct ResolvedDraw<'a> {
    pipeline: &'a wgpu::RenderPipeline,
    bind_groups: [Option<&'a wgpu::BindGroup>; crate::frame::MAX_BIND_GROUPS],
    vertex_buffer: &'a wgpu::Buffer,
    vertex_count: u32,
    instance_count: u32,
}

/// Replays one frame's command list against the device.
///
/// # Errors
///
/// Returns [`FrameError::Registry`] if any handle fails to resolve; in
/// that case nothing has been written or submitted.
pub fn submit_frame(
    gpu: &GpuContext<'_>,
    registry: &Registry,
    commands: &FrameCommands,
    clear_color: wgpu::Color,
) -> Result<(), FrameError> {
    // Resolve every handle up front: a frame either submits completely
    // or not at all.
    let mut writes = Vec::with_capacity(commands.write_count() as usize);
    for (write, bytes) in commands.writes() {
        writes.push((registry.uniform_buffer(write.buffer)?, write.offset, bytes));
    }

    let mut draws = Vec::with_capacity(commands.draw_count() as usize);
    for draw in commands.draws() {
        let mut bind_groups = [None; crate::frame::MAX_BIND_GROUPS];
        for (slot, handle) in draw.bind_groups.iter().enumerate() {
            if let Some(handle) = handle {
                bind_groups[slot] = Some(registry.bind_group(*handle)?);
            }
        }
        draws.push(ResolvedDraw {
            pipeline: registry.pipeline(draw.pipeline)?,
            bind_groups,
            vertex_buffer: registry.vertex_buffer(draw.vertex_buffer)?,
            vertex_count: draw.vertex_count,
            instance_count: draw.instance_count,
        });
    }

    for (buffer, offset, bytes) in writes {
        gpu.queue.write_buffer(buffer, offset, bytes);
    }

    let mut encoder = gpu
        .device
        .create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("ember frame encoder"),
        });

    {
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("ember sprite pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: gpu.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(clear_color),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: gpu.depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        for draw in &draws {
            pass.set_pipeline(draw.pipeline);
            for (slot, group) in draw.bind_groups.iter().enumerate() {
                if let Some(group) = group {
                    pass.set_bind_group(slot as u32, group, &[]);
                }
            }
            pass.set_vertex_buffer(0, draw.vertex_buffer.slice(..));
            pass.draw(0..draw.vertex_count, 0..draw.instance_count);
        }
    }

    gpu.queue.submit(std::iter::once(encoder.finish()));
    Ok(())
}
