//! # Frame Command List
//!
//! Render systems do not touch the GPU directly: they record buffer writes
//! and draw calls into a [`FrameCommands`] list that the wgpu executor
//! replays after every system has run. This keeps the systems free of
//! device handles (and testable without one) and guarantees that a frame
//! either submits completely or not at all.
//!
//! The list is owned by the frame driver and reused every frame; containers
//! are cleared, not reallocated.

use ember_core::{BindGroupHandle, PipelineHandle, UniformBufferHandle, VertexBufferHandle};

/// Maximum bind-group slots a draw can use.
pub const MAX_BIND_GROUPS: usize = 4;

/// One pending buffer upload. The payload lives in the command list's
/// shared byte arena.
#[derive(Clone, Copy, Debug)]
pub struct BufferWrite {
    /// Destination buffer.
    pub buffer: UniformBufferHandle,
    /// Destination byte offset.
    pub offset: u64,
    start: usize,
    len: usize,
}

/// One pending draw call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DrawCall {
    /// Pipeline to bind.
    pub pipeline: PipelineHandle,
    /// Bind groups by slot; `None` slots are skipped.
    pub bind_groups: [Option<BindGroupHandle>; MAX_BIND_GROUPS],
    /// Vertex buffer at slot 0.
    pub vertex_buffer: VertexBufferHandle,
    /// Number of vertices.
    pub vertex_count: u32,
    /// Number of instances.
    pub instance_count: u32,
}

/// Counters for one submitted frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Monotonic frame number.
    pub frame_number: u64,
    /// Draw calls issued.
    pub draw_calls: u32,
    /// Instances drawn across all draw calls.
    pub instances: u32,
    /// Buffer writes performed.
    pub buffer_writes: u32,
    /// Collision pairs reported by the support systems.
    pub collision_pairs: u32,
}

/// The per-frame command list: buffer writes, then draws.
#[derive(Debug, Default)]
pub struct FrameCommands {
    data: Vec<u8>,
    writes: Vec<BufferWrite>,
    draws: Vec<DrawCall>,
}

impl FrameCommands {
    /// Creates an empty command list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears the list for a new frame, keeping allocations.
    pub fn begin_frame(&mut self) {
        self.data.clear();
        self.writes.clear();
        self.draws.clear();
    }

    /// Records a buffer write. The bytes are copied into the shared arena.
    pub fn push_write(&mut self, buffer: UniformBufferHandle, offset: u64, bytes: &[u8]) {
        let start = self.data.len();
        self.data.extend_from_slice(bytes);
        self.writes.push(BufferWrite {
            buffer,
            offset,
            start,
            len: bytes.len(),
        });
    }

    /// Records a draw call.
    pub fn push_draw(&mut self, draw: DrawCall) {
        self.draws.push(draw);
    }

    /// Iterates recorded writes with their payloads.
    pub fn writes(&self) -> impl Iterator<Item = (&BufferWrite, &[u8])> {
        self.writes
            .iter()
            .map(|write| (write, &self.data[write.start..write.start + write.len]))
    }

    /// Recorded draw calls, in submission order.
    #[must_use]
    pub fn draws(&self) -> &[DrawCall] {
        &self.draws
    }

    /// Number of recorded buffer writes.
    #[must_use]
    pub fn write_count(&self) -> u32 {
        self.writes.len() as u32
    }

    /// Number of recorded draw calls.
    #[must_use]
    pub fn draw_count(&self) -> u32 {
        self.draws.len() as u32
    }

    /// Total instances across recorded draws.
    #[must_use]
    pub fn instance_count(&self) -> u32 {
        self.draws.iter().map(|draw| draw.instance_count).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_payloads_roundtrip() {
        let mut commands = FrameCommands::new();
        commands.push_write(UniformBufferHandle(0), 0, &[1, 2, 3]);
        commands.push_write(UniformBufferHandle(1), 64, &[9, 9]);

        let collected: Vec<_> = commands
            .writes()
            .map(|(write, bytes)| (write.buffer, write.offset, bytes.to_vec()))
            .collect();
        assert_eq!(
            collected,
            vec![
                (UniformBufferHandle(0), 0, vec![1, 2, 3]),
                (UniformBufferHandle(1), 64, vec![9, 9]),
            ]
        );
    }

    #[test]
    fn test_begin_frame_clears_everything() {
        let mut commands = FrameCommands::new();
        commands.push_write(UniformBufferHandle(0), 0, &[1]);
        commands.push_draw(DrawCall {
            pipeline: PipelineHandle(0),
            bind_groups: [None; MAX_BIND_GROUPS],
            vertex_buffer: VertexBufferHandle(0),
            vertex_count: 6,
            instance_count: 1,
        });

        commands.begin_frame();
        assert_eq!(commands.write_count(), 0);
        assert_eq!(commands.draw_count(), 0);
        assert_eq!(commands.instance_count(), 0);
    }

    #[test]
    fn test_instance_count_sums_draws() {
        let mut commands = FrameCommands::new();
        for instances in [1, 7] {
            commands.push_draw(DrawCall {
                pipeline: PipelineHandle(0),
                bind_groups: [None; MAX_BIND_GROUPS],
                vertex_buffer: VertexBufferHandle(0),
                vertex_count: 6,
                instance_count: instances,
            });
        }
        assert_eq!(commands.instance_count(), 8);
    }
}
