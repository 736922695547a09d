//! Built-in WGSL shader sources for the sprite pipelines.
//!
//! Model matrices are uploaded row-major, so the vertex stage multiplies
//! `vec * mat` (which applies the transpose of the matrix WGSL sees).
//! Camera matrices are uploaded column-major and multiply the usual way.

/// Shader for single sprites: one model matrix per entity.
pub const SPRITE_SHADER: &str = r"
struct Camera {
    projection: mat4x4<f32>,
    view: mat4x4<f32>,
    position: vec3<f32>,
}

@group(0) @binding(0) var<uniform> camera: Camera;
@group(1) @binding(0) var<uniform> albedo: vec3<f32>;
@group(2) @binding(0) var<uniform> model: mat4x4<f32>;

@vertex
fn vs_main(@location(0) position: vec3<f32>) -> @builtin(position) vec4<f32> {
    let world = vec4<f32>(position, 1.0) * model;
    return camera.projection * camera.view * world;
}

@fragment
fn fs_main() -> @location(0) vec4<f32> {
    return vec4<f32>(albedo, 1.0);
}
";

/// Shader for instanced sprites: the instance index selects the model
/// matrix from the per-instance transform buffer.
pub const INSTANCED_SPRITE_SHADER: &str = r"
struct Camera {
    projection: mat4x4<f32>,
    view: mat4x4<f32>,
    position: vec3<f32>,
}

@group(0) @binding(0) var<uniform> camera: Camera;
@group(1) @binding(0) var<uniform> albedo: vec3<f32>;
@group(2) @binding(0) var<storage, read> models: array<mat4x4<f32>>;

@vertex
fn vs_main(
    @location(0) position: vec3<f32>,
    @builtin(instance_index) instance: u32,
) -> @builtin(position) vec4<f32> {
    let world = vec4<f32>(position, 1.0) * models[instance];
    return camera.projection * camera.view * world;
}

@fragment
fn fs_main() -> @location(0) vec4<f32> {
    return vec4<f32>(albedo, 1.0);
}
";
