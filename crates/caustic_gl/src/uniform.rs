use crate::impl_prelude::*;
use caustic_math::*;
use prelude_plus::*;

/// A value for a single (non-array) uniform.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum UniformValue {
  Bool(bool),
  Int(i32),
  Float(f32),
  Vec2(Vec2f),
  Vec3(Vec3f),
  Vec4(Vec4f),
  Mat3(Mat3f),
  Mat4(Mat4f),
  Color(Colorf),
}

impl UniformValue {
  /// # Safety
  ///
  /// The program owning `location` must be in use.
  pub(crate) unsafe fn upload(&self, gl: &RawGL, location: i32) {
    match *self {
      Self::Bool(x) => gl.Uniform1i(location, x as i32),
      Self::Int(x) => gl.Uniform1i(location, x),
      Self::Float(x) => gl.Uniform1f(location, x),
      Self::Vec2(Vec2 { x, y }) => gl.Uniform2f(location, x, y),
      Self::Vec3(Vec3 { x, y, z }) => gl.Uniform3f(location, x, y, z),
      Self::Vec4(Vec4 { x, y, z, w }) => gl.Uniform4f(location, x, y, z, w),
      Self::Mat3(ref m) => gl.UniformMatrix3fv(location, 1, gl::FALSE, m.as_array().as_ptr()),
      Self::Mat4(ref m) => gl.UniformMatrix4fv(location, 1, gl::FALSE, m.as_array().as_ptr()),
      Self::Color(Color { r, g, b, a }) => gl.Uniform4f(location, r, g, b, a),
    }
  }
}

macro_rules! impl_from_for_uniform_value {
  ($($data_type:ty => $variant:ident),+ $(,)?) => {
    $(impl From<$data_type> for UniformValue {
      #[inline(always)]
      fn from(value: $data_type) -> Self { Self::$variant(value) }
    })+
  };
}

impl_from_for_uniform_value![
  bool => Bool,
  i32 => Int,
  f32 => Float,
  Vec2f => Vec2,
  Vec3f => Vec3,
  Vec4f => Vec4,
  Mat3f => Mat3,
  Mat4f => Mat4,
  Colorf => Color,
];

/// Named uniform values, uploaded together into whichever program is bound.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UniformHolder {
  values: HashMap<String, UniformValue>,
}

impl UniformHolder {
  pub fn new() -> Self { Self::default() }

  #[inline(always)]
  pub fn len(&self) -> usize { self.values.len() }
  #[inline(always)]
  pub fn is_empty(&self) -> bool { self.values.is_empty() }

  /// Returns the previous value under the same name.
  pub fn set(&mut self, name: impl Into<String>, value: impl Into<UniformValue>) -> Option<UniformValue> {
    self.values.insert(name.into(), value.into())
  }

  #[inline]
  pub fn get(&self, name: &str) -> Option<&UniformValue> { self.values.get(name) }

  #[inline]
  pub fn contains(&self, name: &str) -> bool { self.values.contains_key(name) }

  #[inline]
  pub fn remove(&mut self, name: &str) -> Option<UniformValue> { self.values.remove(name) }

  pub fn iter(&self) -> impl Iterator<Item = (&str, &UniformValue)> + '_ {
    self.values.iter().map(|(name, value)| (name.as_str(), value))
  }

  /// Copies every value of `other`, overriding the ones with the same name.
  pub fn extend_from(&mut self, other: &UniformHolder) {
    self.values.extend(other.values.iter().map(|(name, value)| (name.clone(), *value)));
  }

  pub fn clear(&mut self) { self.values.clear(); }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn values_convert_from_math_types() {
    assert_eq!(UniformValue::from(true), UniformValue::Bool(true));
    assert_eq!(UniformValue::from(3i32), UniformValue::Int(3));
    assert_eq!(UniformValue::from(vec2(1.0, 2.0)), UniformValue::Vec2(vec2(1.0, 2.0)));
    assert_eq!(UniformValue::from(Mat4f::IDENTITY), UniformValue::Mat4(Mat4f::IDENTITY));
    assert_eq!(UniformValue::from(Colorf::WHITE), UniformValue::Color(Colorf::WHITE));
  }

  #[test]
  fn set_replaces_by_name() {
    let mut uniforms = UniformHolder::new();
    assert!(uniforms.is_empty());
    assert_eq!(uniforms.set("lightIntensity", 0.5f32), None);
    assert_eq!(uniforms.set("lightIntensity", 0.8f32), Some(UniformValue::Float(0.5)));
    assert_eq!(uniforms.len(), 1);
    assert_eq!(uniforms.get("lightIntensity"), Some(&UniformValue::Float(0.8)));
    assert!(uniforms.get("missing").is_none());
  }

  #[test]
  fn remove_and_contains() {
    let mut uniforms = UniformHolder::new();
    uniforms.set("diffuse", 0i32);
    assert!(uniforms.contains("diffuse"));
    assert_eq!(uniforms.remove("diffuse"), Some(UniformValue::Int(0)));
    assert!(!uniforms.contains("diffuse"));
    assert_eq!(uniforms.remove("diffuse"), None);
  }

  #[test]
  fn extending_overrides_existing_values() {
    let mut base = UniformHolder::new();
    base.set("a", 1i32);
    base.set("b", 2i32);
    let mut overrides = UniformHolder::new();
    overrides.set("b", 20i32);
    overrides.set("c", 30i32);

    base.extend_from(&overrides);
    assert_eq!(base.len(), 3);
    assert_eq!(base.get("a"), Some(&UniformValue::Int(1)));
    assert_eq!(base.get("b"), Some(&UniformValue::Int(20)));
    assert_eq!(base.get("c"), Some(&UniformValue::Int(30)));

    let mut names: Vec<&str> = base.iter().map(|(name, _)| name).collect();
    names.sort_unstable();
    assert_eq!(names, ["a", "b", "c"]);

    base.clear();
    assert!(base.is_empty());
  }
}
