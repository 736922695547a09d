//! # Component Variants
//!
//! Components are plain data records with no behavior beyond maintaining
//! their own invariants. One tagged union ([`Component`]) spans the full
//! variant list; each variant has a dense storage of its own in the
//! [`SceneRegistry`](super::registry::SceneRegistry).

use glam::{Mat4, Vec3};

use crate::error::ConfigError;
use crate::handle::{ShaderHandle, TextureHandle};

/// The fixed set of component kinds.
///
/// Used as the tag of the [`Component`] union and as the bit position in an
/// entity's component mask.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ComponentKind {
    /// Shared projection/view camera.
    Camera = 0,
    /// Shader + albedo.
    Material = 1,
    /// Static vertex data and buffer layout.
    Geometry = 2,
    /// Single world-space sprite.
    Sprite = 3,
    /// Per-instance sprite arrays.
    InstancedSprite = 4,
    /// Velocity/acceleration/mass for a single sprite.
    Physics = 5,
    /// Per-instance physics arrays.
    InstancedPhysics = 6,
    /// Model matrices and their flattened GPU representation.
    Transform = 7,
}

impl ComponentKind {
    /// Returns the mask bit for this kind.
    #[inline]
    #[must_use]
    pub const fn bit(self) -> u64 {
        1u64 << (self as u8)
    }
}

/// Shared camera state: projection, view, and world position.
///
/// Exactly one camera is expected to exist per scene; every render system
/// reads it each frame. Projection math itself is owned by the platform
/// layer - the matrices are handed in ready-made at scene setup.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraComponent {
    /// Projection matrix.
    pub projection: Mat4,
    /// View matrix.
    pub view: Mat4,
    /// Camera position in world space.
    pub position: Vec3,
}

impl CameraComponent {
    /// Creates a camera from ready-made matrices.
    #[must_use]
    pub const fn new(projection: Mat4, view: Mat4, position: Vec3) -> Self {
        Self {
            projection,
            view,
            position,
        }
    }
}

/// Surface color source for a material: a flat color or a texture.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Albedo {
    /// Flat RGB color.
    Color(Vec3),
    /// Sampled texture.
    Texture(TextureHandle),
}

/// Material: which shader draws the entity and what its surface looks like.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MaterialComponent {
    /// The shader module used to draw this material.
    pub shader: ShaderHandle,
    /// Surface color source.
    pub albedo: Albedo,
}

impl MaterialComponent {
    /// Creates a flat-colored material.
    #[must_use]
    pub const fn with_color(shader: ShaderHandle, color: Vec3) -> Self {
        Self {
            shader,
            albedo: Albedo::Color(color),
        }
    }

    /// Creates a textured material.
    #[must_use]
    pub const fn with_texture(shader: ShaderHandle, texture: TextureHandle) -> Self {
        Self {
            shader,
            albedo: Albedo::Texture(texture),
        }
    }
}

/// Element format of a single vertex attribute.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttributeFormat {
    /// Three 32-bit floats.
    Float32x3,
}

impl AttributeFormat {
    /// Size of one attribute element in bytes.
    #[inline]
    #[must_use]
    pub const fn size(self) -> usize {
        match self {
            Self::Float32x3 => 12,
        }
    }
}

/// One attribute of a vertex buffer layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BufferAttribute {
    /// Diagnostic label.
    pub label: &'static str,
    /// Shader location the attribute binds to.
    pub location: u32,
    /// Element format.
    pub format: AttributeFormat,
}

impl BufferAttribute {
    /// Creates a new attribute description.
    #[must_use]
    pub const fn new(label: &'static str, location: u32, format: AttributeFormat) -> Self {
        Self {
            label,
            location,
            format,
        }
    }
}

/// Derived vertex buffer layout: stride plus per-attribute byte offsets.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BufferLayout {
    attributes: Vec<BufferAttribute>,
    offsets: Vec<usize>,
    stride: usize,
}

impl BufferLayout {
    /// Derives offsets and stride from an ordered attribute list.
    #[must_use]
    pub fn new(attributes: Vec<BufferAttribute>) -> Self {
        let mut offsets = Vec::with_capacity(attributes.len());
        let mut stride = 0;
        for attribute in &attributes {
            offsets.push(stride);
            stride += attribute.format.size();
        }
        Self {
            attributes,
            offsets,
            stride,
        }
    }

    /// Bytes from one vertex to the next.
    #[inline]
    #[must_use]
    pub const fn stride(&self) -> usize {
        self.stride
    }

    /// The ordered attribute list.
    #[must_use]
    pub fn attributes(&self) -> &[BufferAttribute] {
        &self.attributes
    }

    /// Byte offset of each attribute within one vertex.
    #[must_use]
    pub fn offsets(&self) -> &[usize] {
        &self.offsets
    }
}

/// Unit square as a position-only triangle list, centered on the origin.
pub const SQUARE_VERTICES: [f32; 18] = [
    -0.5, -0.5, 0.0, //
    0.5, -0.5, 0.0, //
    0.5, 0.5, 0.0, //
    -0.5, -0.5, 0.0, //
    0.5, 0.5, 0.0, //
    -0.5, 0.5, 0.0, //
];

/// Static geometry: vertex data, its derived layout, and how many instances
/// of it are drawn.
#[derive(Clone, Debug, PartialEq)]
pub struct GeometryComponent {
    /// Position-only triangle-list vertex data.
    pub vertices: Vec<f32>,
    /// Derived buffer layout.
    pub layout: BufferLayout,
    /// Declared instance count, >= 1. Must agree with the paired sprite.
    pub instance_count: u32,
}

impl GeometryComponent {
    /// Creates a unit-square geometry with the given instance count.
    #[must_use]
    pub fn square(instance_count: u32) -> Self {
        let layout = BufferLayout::new(vec![BufferAttribute::new(
            "position",
            0,
            AttributeFormat::Float32x3,
        )]);
        Self {
            vertices: SQUARE_VERTICES.to_vec(),
            layout,
            instance_count,
        }
    }

    /// Total vertex data size in bytes.
    #[inline]
    #[must_use]
    pub fn byte_length(&self) -> usize {
        std::mem::size_of_val(self.vertices.as_slice())
    }

    /// Number of vertices, computed from byte length and stride.
    #[inline]
    #[must_use]
    pub fn vertex_count(&self) -> u32 {
        (self.byte_length() / self.layout.stride()) as u32
    }
}

/// Axis-aligned box used as a sprite collider.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Aabb {
    /// Minimum corner in world space.
    pub position: Vec3,
    /// Extent along each axis.
    pub size: Vec3,
}

impl Aabb {
    /// Creates a box from its minimum corner and size.
    #[inline]
    #[must_use]
    pub const fn new(position: Vec3, size: Vec3) -> Self {
        Self { position, size }
    }

    /// Symmetric AABB overlap test on the x and y axes.
    ///
    /// Each operand contributes its own position and size; the test holds
    /// iff the x ranges and the y ranges both overlap.
    #[inline]
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        let x_overlap = self.position.x < other.position.x + other.size.x
            && other.position.x < self.position.x + self.size.x;
        let y_overlap = self.position.y < other.position.y + other.size.y
            && other.position.y < self.position.y + self.size.y;
        x_overlap && y_overlap
    }
}

/// A single world-space sprite.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpriteComponent {
    /// World position.
    pub position: Vec3,
    /// Size; z stays ~1 for 2D scaling.
    pub size: Vec3,
    /// Axis-aligned collider, kept in sync with position/size.
    pub collider: Aabb,
}

impl SpriteComponent {
    /// Creates a sprite; the collider is derived from position and size.
    #[must_use]
    pub const fn new(position: Vec3, size: Vec3) -> Self {
        Self {
            position,
            size,
            collider: Aabb::new(position, size),
        }
    }

    /// Re-derives the collider after position or size changed.
    #[inline]
    pub fn sync_collider(&mut self) {
        self.collider = Aabb::new(self.position, self.size);
    }
}

/// Per-instance sprite arrays; index i describes instance i.
#[derive(Clone, Debug, PartialEq)]
pub struct InstancedSpriteComponent {
    /// World position per instance.
    pub positions: Vec<Vec3>,
    /// Size per instance.
    pub sizes: Vec<Vec3>,
    /// Collider per instance, kept in sync with positions/sizes.
    pub colliders: Vec<Aabb>,
}

impl InstancedSpriteComponent {
    /// Creates an instanced sprite from parallel position/size arrays.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ArrayLengthMismatch`] if the arrays disagree
    /// in length.
    pub fn new(positions: Vec<Vec3>, sizes: Vec<Vec3>) -> Result<Self, ConfigError> {
        if positions.len() != sizes.len() {
            return Err(ConfigError::ArrayLengthMismatch {
                left: positions.len(),
                right: sizes.len(),
            });
        }
        let colliders = positions
            .iter()
            .zip(&sizes)
            .map(|(&p, &s)| Aabb::new(p, s))
            .collect();
        Ok(Self {
            positions,
            sizes,
            colliders,
        })
    }

    /// Number of instances.
    #[inline]
    #[must_use]
    pub fn instance_count(&self) -> u32 {
        self.positions.len() as u32
    }

    /// Re-derives one instance's collider after its position/size changed.
    #[inline]
    pub fn sync_collider(&mut self, index: usize) {
        self.colliders[index] = Aabb::new(self.positions[index], self.sizes[index]);
    }
}

/// Velocity, acceleration and mass for a single sprite.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhysicsComponent {
    /// Current velocity.
    pub velocity: Vec3,
    /// Current acceleration.
    pub acceleration: Vec3,
    /// Mass; strictly positive, enforced at construction.
    pub mass: f32,
}

impl PhysicsComponent {
    /// Creates a physics payload.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NonPositiveMass`] if `mass <= 0`; mass is a
    /// divisor in force application, so zero-mass configurations are
    /// rejected here rather than dividing by zero mid-frame.
    pub fn new(mass: f32, velocity: Vec3, acceleration: Vec3) -> Result<Self, ConfigError> {
        if mass <= 0.0 {
            return Err(ConfigError::NonPositiveMass { mass });
        }
        Ok(Self {
            velocity,
            acceleration,
            mass,
        })
    }

    /// Applies a force: `acceleration += force / mass` (Newton's second law).
    #[inline]
    pub fn apply_force(&mut self, force: Vec3) {
        self.acceleration += force / self.mass;
    }

    /// Zeroes velocity and acceleration at the end of a frame. Motion is
    /// entirely re-derived from each frame's inputs.
    #[inline]
    pub fn reset(&mut self) {
        self.velocity = Vec3::ZERO;
        self.acceleration = Vec3::ZERO;
    }
}

/// Per-instance physics arrays.
#[derive(Clone, Debug, PartialEq)]
pub struct InstancedPhysicsComponent {
    /// Velocity per instance.
    pub velocities: Vec<Vec3>,
    /// Acceleration per instance.
    pub accelerations: Vec<Vec3>,
    /// Mass per instance; each strictly positive.
    pub masses: Vec<f32>,
}

impl InstancedPhysicsComponent {
    /// Creates instanced physics from parallel arrays.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ArrayLengthMismatch`] on ragged arrays and
    /// [`ConfigError::NonPositiveMass`] if any mass is not strictly
    /// positive.
    pub fn new(
        masses: Vec<f32>,
        velocities: Vec<Vec3>,
        accelerations: Vec<Vec3>,
    ) -> Result<Self, ConfigError> {
        if velocities.len() != masses.len() {
            return Err(ConfigError::ArrayLengthMismatch {
                left: velocities.len(),
                right: masses.len(),
            });
        }
        if accelerations.len() != masses.len() {
            return Err(ConfigError::ArrayLengthMismatch {
                left: accelerations.len(),
                right: masses.len(),
            });
        }
        for &mass in &masses {
            if mass <= 0.0 {
                return Err(ConfigError::NonPositiveMass { mass });
            }
        }
        Ok(Self {
            velocities,
            accelerations,
            masses,
        })
    }

    /// Number of instances.
    #[inline]
    #[must_use]
    pub fn instance_count(&self) -> u32 {
        self.masses.len() as u32
    }

    /// Applies a force to one instance.
    #[inline]
    pub fn apply_force(&mut self, index: usize, force: Vec3) {
        self.accelerations[index] += force / self.masses[index];
    }

    /// Zeroes every instance's velocity and acceleration.
    pub fn reset_all(&mut self) {
        self.velocities.fill(Vec3::ZERO);
        self.accelerations.fill(Vec3::ZERO);
    }
}

/// Model matrices plus their flattened GPU representation.
///
/// The float buffer always holds `16 * instance_count` values, row-major,
/// matrices back-to-back in instance order. It is re-derived on every
/// matrix write so it can never be read stale; nothing else may mutate it.
#[derive(Clone, Debug, PartialEq)]
pub struct TransformComponent {
    matrices: Vec<Mat4>,
    floats: Vec<f32>,
}

impl TransformComponent {
    /// Creates a transform from one model matrix per instance.
    #[must_use]
    pub fn new(matrices: Vec<Mat4>) -> Self {
        let mut transform = Self {
            floats: vec![0.0; matrices.len() * 16],
            matrices,
        };
        for index in 0..transform.matrices.len() {
            transform.flatten(index);
        }
        transform
    }

    /// Creates an identity transform for `instance_count` instances.
    #[must_use]
    pub fn identity(instance_count: u32) -> Self {
        Self::new(vec![Mat4::IDENTITY; instance_count as usize])
    }

    /// Number of instances.
    #[inline]
    #[must_use]
    pub fn instance_count(&self) -> u32 {
        self.matrices.len() as u32
    }

    /// One instance's model matrix.
    #[inline]
    #[must_use]
    pub fn matrix(&self, index: usize) -> Mat4 {
        self.matrices[index]
    }

    /// Replaces one instance's model matrix and immediately re-flattens its
    /// window of the float buffer.
    #[inline]
    pub fn set_matrix(&mut self, index: usize, matrix: Mat4) {
        self.matrices[index] = matrix;
        self.flatten(index);
    }

    /// The flattened buffer: 16 floats per instance, row-major, in
    /// instance order.
    #[inline]
    #[must_use]
    pub fn flattened(&self) -> &[f32] {
        &self.floats
    }

    /// The flattened buffer as bytes, ready for a GPU buffer write.
    #[inline]
    #[must_use]
    pub fn flattened_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.floats)
    }

    fn flatten(&mut self, index: usize) {
        // glam matrices are column-major; the GPU-side layout is row-major.
        let rows = self.matrices[index].transpose().to_cols_array();
        self.floats[index * 16..(index + 1) * 16].copy_from_slice(&rows);
    }
}

/// The component union: one case per kind.
#[derive(Clone, Debug)]
pub enum Component {
    /// Shared camera.
    Camera(CameraComponent),
    /// Shader + albedo.
    Material(MaterialComponent),
    /// Vertex data and layout.
    Geometry(GeometryComponent),
    /// Single sprite.
    Sprite(SpriteComponent),
    /// Per-instance sprite arrays.
    InstancedSprite(InstancedSpriteComponent),
    /// Single-sprite physics.
    Physics(PhysicsComponent),
    /// Per-instance physics arrays.
    InstancedPhysics(InstancedPhysicsComponent),
    /// Model matrices + flattened buffer.
    Transform(TransformComponent),
}

impl Component {
    /// Returns the tag of this component.
    #[must_use]
    pub const fn kind(&self) -> ComponentKind {
        match self {
            Self::Camera(_) => ComponentKind::Camera,
            Self::Material(_) => ComponentKind::Material,
            Self::Geometry(_) => ComponentKind::Geometry,
            Self::Sprite(_) => ComponentKind::Sprite,
            Self::InstancedSprite(_) => ComponentKind::InstancedSprite,
            Self::Physics(_) => ComponentKind::Physics,
            Self::InstancedPhysics(_) => ComponentKind::InstancedPhysics,
            Self::Transform(_) => ComponentKind::Transform,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_square_geometry_vertex_count() {
        let geometry = GeometryComponent::square(1);
        assert_eq!(geometry.layout.stride(), 12);
        assert_eq!(geometry.byte_length(), 18 * 4);
        assert_eq!(geometry.vertex_count(), 6);
    }

    #[test]
    fn test_buffer_layout_offsets() {
        let layout = BufferLayout::new(vec![
            BufferAttribute::new("position", 0, AttributeFormat::Float32x3),
            BufferAttribute::new("normal", 1, AttributeFormat::Float32x3),
        ]);
        assert_eq!(layout.stride(), 24);
        assert_eq!(layout.offsets(), &[0, 12]);
    }

    #[test]
    fn test_aabb_overlap_symmetric() {
        let a = Aabb::new(Vec3::new(0.0, 0.0, 0.0), Vec3::new(10.0, 10.0, 1.0));
        let b = Aabb::new(Vec3::new(5.0, 5.0, 0.0), Vec3::new(10.0, 10.0, 1.0));
        let c = Aabb::new(Vec3::new(100.0, 0.0, 0.0), Vec3::new(5.0, 5.0, 1.0));

        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        assert_eq!(a.overlaps(&c), c.overlaps(&a));
    }

    #[test]
    fn test_aabb_disjoint_x_never_overlaps() {
        // y ranges overlap fully, x ranges are disjoint.
        let a = Aabb::new(Vec3::new(0.0, 0.0, 0.0), Vec3::new(5.0, 50.0, 1.0));
        let b = Aabb::new(Vec3::new(10.0, 0.0, 0.0), Vec3::new(5.0, 50.0, 1.0));
        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));
    }

    #[test]
    fn test_zero_mass_rejected() {
        let err = PhysicsComponent::new(0.0, Vec3::ZERO, Vec3::ZERO).unwrap_err();
        assert!(matches!(err, ConfigError::NonPositiveMass { .. }));
        assert!(PhysicsComponent::new(-1.0, Vec3::ZERO, Vec3::ZERO).is_err());
        assert!(PhysicsComponent::new(1.0, Vec3::ZERO, Vec3::ZERO).is_ok());
    }

    #[test]
    fn test_apply_force_divides_by_mass() {
        let mut physics = PhysicsComponent::new(2.0, Vec3::ZERO, Vec3::ZERO).unwrap();
        physics.apply_force(Vec3::new(4.0, 0.0, 0.0));
        assert_eq!(physics.acceleration, Vec3::new(2.0, 0.0, 0.0));
    }

    #[test]
    fn test_transform_flattened_length_invariant() {
        let transform = TransformComponent::identity(7);
        assert_eq!(transform.flattened().len(), 16 * 7);
    }

    #[test]
    fn test_transform_flatten_is_row_major() {
        let mut transform = TransformComponent::identity(1);
        let model = Mat4::from_translation(Vec3::new(9.0, 8.0, 7.0))
            * Mat4::from_scale(Vec3::new(2.0, 3.0, 1.0));
        transform.set_matrix(0, model);

        let floats = transform.flattened();
        // Row-major: the translation sits at the end of each of the first
        // three rows, the scale on the diagonal.
        assert_eq!(floats[0], 2.0);
        assert_eq!(floats[3], 9.0);
        assert_eq!(floats[5], 3.0);
        assert_eq!(floats[7], 8.0);
        assert_eq!(floats[15], 1.0);
    }

    #[test]
    fn test_instanced_sprite_ragged_arrays_rejected() {
        let err = InstancedSpriteComponent::new(vec![Vec3::ZERO; 3], vec![Vec3::ONE; 2]);
        assert!(matches!(
            err,
            Err(ConfigError::ArrayLengthMismatch { left: 3, right: 2 })
        ));
    }
}
