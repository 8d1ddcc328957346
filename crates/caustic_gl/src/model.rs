use crate::impl_prelude::*;
use crate::traits::ensure_same_context;
use crate::{Camera, Material, MaterialBinding, UniformHolder, UniformValue, VertexArray, VertexData};
use caustic_math::*;
use prelude_plus::*;

pub const MODEL_MATRIX_UNIFORM: &str = "modelMatrix";
pub const VIEW_MATRIX_UNIFORM: &str = "viewMatrix";
pub const PROJECTION_MATRIX_UNIFORM: &str = "projectionMatrix";

/// Position, rotation and scale of a model in world space.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Transform {
  pub position: Vec3f,
  /// Doesn't have to be normalized. A zero axis means no rotation.
  pub rotation_axis: Vec3f,
  /// In radians.
  pub rotation_angle: f32,
  pub scale: Vec3f,
}

impl Default for Transform {
  fn default() -> Self {
    Self { position: Vec3f::ZERO, rotation_axis: Vec3f::UP, rotation_angle: 0.0, scale: Vec3f::ONE }
  }
}

impl Transform {
  pub fn rotation_matrix(&self) -> Mat4f {
    let axis_len = self.rotation_axis.magnitude();
    if self.rotation_angle == 0.0 || axis_len == 0.0 {
      Mat4f::IDENTITY
    } else {
      Mat4f::from_axis_angle(self.rotation_axis / axis_len, self.rotation_angle)
    }
  }

  /// Scale first, then rotation, then translation.
  pub fn matrix(&self) -> Mat4f {
    Mat4f::from_translation(self.position) * self.rotation_matrix() * Mat4f::from_scale(self.scale)
  }
}

fn choose_camera(own: Option<Camera>, material: Option<Camera>, fallback: Option<Camera>) -> Option<Camera> {
  own.or(material).or(fallback)
}

/// A mesh drawn with a material.
#[derive(Debug)]
pub struct Model {
  vertex_array: VertexArray,
  material: Rc<Material>,
  transform: Transform,
  uniforms: UniformHolder,
  camera: Option<Camera>,
}

impl Model {
  pub fn new(ctx: SharedContext, material: Rc<Material>, vertex_data: &VertexData) -> Result<Self> {
    ensure_same_context(&ctx, material.program().ctx())?;
    let mut vertex_array = VertexArray::new(ctx)?;
    vertex_array.set_data(vertex_data)?;
    Ok(Self {
      vertex_array,
      material,
      transform: Transform::default(),
      uniforms: UniformHolder::new(),
      camera: None,
    })
  }

  #[inline(always)]
  pub fn material(&self) -> &Rc<Material> { &self.material }
  #[inline(always)]
  pub fn vertex_array(&self) -> &VertexArray { &self.vertex_array }
  #[inline(always)]
  pub fn vertex_array_mut(&mut self) -> &mut VertexArray { &mut self.vertex_array }
  #[inline(always)]
  pub fn transform(&self) -> &Transform { &self.transform }
  #[inline(always)]
  pub fn transform_mut(&mut self) -> &mut Transform { &mut self.transform }
  #[inline(always)]
  pub fn uniforms(&self) -> &UniformHolder { &self.uniforms }
  #[inline(always)]
  pub fn uniforms_mut(&mut self) -> &mut UniformHolder { &mut self.uniforms }
  #[inline(always)]
  pub fn camera(&self) -> Option<&Camera> { self.camera.as_ref() }

  #[inline]
  pub fn set_transform(&mut self, transform: Transform) { self.transform = transform; }
  #[inline]
  pub fn set_camera(&mut self, camera: Option<Camera>) { self.camera = camera; }

  /// Draws the model with another material from the same context.
  pub fn set_material(&mut self, material: Rc<Material>) -> Result<()> {
    ensure_same_context(self.vertex_array.ctx(), material.program().ctx())?;
    self.material = material;
    Ok(())
  }

  /// Replaces the mesh, reusing the GPU buffers where possible.
  pub fn set_vertex_data(&mut self, vertex_data: &VertexData) -> Result<()> {
    self.vertex_array.set_data(vertex_data)
  }

  /// The model's own camera wins over the material's, which wins over
  /// `fallback`.
  pub fn effective_camera(&self, fallback: Option<Camera>) -> Option<Camera> {
    choose_camera(self.camera, self.material.camera(), fallback)
  }

  /// Draws the model. Its material has to be the one bound by `binding`.
  pub fn render(&self, binding: &MaterialBinding<'_>, fallback_camera: Option<Camera>) -> Result<()> {
    if !binding.is_binding_of(&self.material) {
      return Err(Error::MaterialNotBound);
    }
    let program_binding = binding.program_binding();

    let (view, projection) = match self.effective_camera(fallback_camera) {
      Some(camera) => (camera.view_matrix(), camera.projection_matrix()),
      None => (Mat4f::IDENTITY, Mat4f::IDENTITY),
    };
    program_binding.set_uniform(MODEL_MATRIX_UNIFORM, &UniformValue::Mat4(self.transform.matrix()));
    program_binding.set_uniform(VIEW_MATRIX_UNIFORM, &UniformValue::Mat4(view));
    program_binding.set_uniform(PROJECTION_MATRIX_UNIFORM, &UniformValue::Mat4(projection));
    program_binding.upload(&self.uniforms);

    self.vertex_array.draw()
  }
}
