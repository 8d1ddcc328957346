#![allow(clippy::too_many_arguments)]

//! Column-major matrices laid out exactly the way `glUniformMatrix*fv`
//! expects them with `transpose = GL_FALSE`.

// See also:
// <https://github.com/rustgd/cgmath/blob/8e0d5ece92ddccd1cbd9670b2bf3007ca9ada986/src/matrix.rs>
// <https://github.com/rustgd/cgmath/blob/8e0d5ece92ddccd1cbd9670b2bf3007ca9ada986/src/projection.rs>

use std::ops::*;

use crate::vectors::*;

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Mat3<T> {
  pub x: Vec3<T>,
  pub y: Vec3<T>,
  pub z: Vec3<T>,
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Mat4<T> {
  pub x: Vec4<T>,
  pub y: Vec4<T>,
  pub z: Vec4<T>,
  pub w: Vec4<T>,
}

pub type Mat3f = Mat3<f32>;
pub type Mat4f = Mat4<f32>;

unsafe impl bytemuck::Zeroable for Mat3f {}
unsafe impl bytemuck::Pod for Mat3f {}
unsafe impl bytemuck::Zeroable for Mat4f {}
unsafe impl bytemuck::Pod for Mat4f {}

impl<T> Mat3<T> {
  #[inline]
  #[rustfmt::skip]
  pub const fn new(
    c0r0: T, c0r1: T, c0r2: T,
    c1r0: T, c1r1: T, c1r2: T,
    c2r0: T, c2r1: T, c2r2: T,
  ) -> Self {
    Self {
      x: vec3(c0r0, c0r1, c0r2),
      y: vec3(c1r0, c1r1, c1r2),
      z: vec3(c2r0, c2r1, c2r2),
    }
  }
}

impl<T> Mat4<T> {
  #[inline]
  #[rustfmt::skip]
  pub const fn new(
    c0r0: T, c0r1: T, c0r2: T, c0r3: T,
    c1r0: T, c1r1: T, c1r2: T, c1r3: T,
    c2r0: T, c2r1: T, c2r2: T, c2r3: T,
    c3r0: T, c3r1: T, c3r2: T, c3r3: T,
  ) -> Self {
    Self {
      x: vec4(c0r0, c0r1, c0r2, c0r3),
      y: vec4(c1r0, c1r1, c1r2, c1r3),
      z: vec4(c2r0, c2r1, c2r2, c2r3),
      w: vec4(c3r0, c3r1, c3r2, c3r3),
    }
  }
}

impl Mat3f {
  #[rustfmt::skip]
  pub const IDENTITY: Self = Self::new(
    1.0, 0.0, 0.0,
    0.0, 1.0, 0.0,
    0.0, 0.0, 1.0,
  );

  #[inline(always)]
  pub fn as_array(&self) -> &[f32; 3 * 3] { bytemuck::cast_ref(self) }

  /// The upper-left 3x3 block, e.g. for normal matrices.
  pub fn from_mat4(m: &Mat4f) -> Self { Self { x: m.x.truncate(), y: m.y.truncate(), z: m.z.truncate() } }
}

impl Mat4f {
  #[rustfmt::skip]
  pub const IDENTITY: Self = Self::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 1.0, 0.0,
    0.0, 0.0, 0.0, 1.0,
  );

  #[inline(always)]
  pub fn identity() -> Self { Self::IDENTITY }

  #[inline(always)]
  pub fn as_array(&self) -> &[f32; 4 * 4] { bytemuck::cast_ref(self) }

  #[rustfmt::skip]
  pub fn from_translation(v: Vec3f) -> Self {
    Self::new(
      1.0, 0.0, 0.0, 0.0,
      0.0, 1.0, 0.0, 0.0,
      0.0, 0.0, 1.0, 0.0,
      v.x, v.y, v.z, 1.0,
    )
  }

  #[rustfmt::skip]
  pub fn from_scale(v: Vec3f) -> Self {
    Self::new(
      v.x, 0.0, 0.0, 0.0,
      0.0, v.y, 0.0, 0.0,
      0.0, 0.0, v.z, 0.0,
      0.0, 0.0, 0.0, 1.0,
    )
  }

  /// `axis` must be normalized.
  #[rustfmt::skip]
  pub fn from_axis_angle(axis: Vec3f, angle: f32) -> Self {
    let Vec3 { x: ax, y: ay, z: az } = axis;
    let (s, c) = angle.sin_cos();
    let tmp = 1.0 - c;

    Self::new(
      tmp * ax * ax + c,      tmp * ax * ay + s * az, tmp * ax * az - s * ay, 0.0,
      tmp * ax * ay - s * az, tmp * ay * ay + c,      tmp * ay * az + s * ax, 0.0,
      tmp * ax * az + s * ay, tmp * ay * az - s * ax, tmp * az * az + c,      0.0,
      0.0,                    0.0,                    0.0,                    1.0,
    )
  }

  /// `dir` must not be zero. When it is parallel to `up`, another world axis
  /// is used as the up vector.
  #[rustfmt::skip]
  pub fn look_to_rh(eye: Vec3f, dir: Vec3f, up: Vec3f) -> Self {
    let f = dir.normalized();
    let mut s = f.cross(up);
    if s.sqr_magnitude() <= f32::EPSILON {
      let fallback_up = if f.z.abs() < 0.9 { Vec3f::FORWARD } else { Vec3f::UP };
      s = f.cross(fallback_up);
    }
    let s = s.normalized();
    let u = s.cross(f);

    Self::new(
      s.x,         u.x,         -f.x,       0.0,
      s.y,         u.y,         -f.y,       0.0,
      s.z,         u.z,         -f.z,       0.0,
      -eye.dot(s), -eye.dot(u), eye.dot(f), 1.0,
    )
  }

  /// Right-handed perspective projection into GL's `[-1; 1]` clip depth.
  #[rustfmt::skip]
  pub fn perspective_rh_no(fov_y: f32, aspect: f32, z_near: f32, z_far: f32) -> Self {
    let tan_half_fov_y = (fov_y / 2.0).tan();
    let c0r0 = 1.0 / (aspect * tan_half_fov_y);
    let c1r1 = 1.0 / tan_half_fov_y;
    let c2r2 = -(z_far + z_near) / (z_far - z_near);
    let c2r3 = -1.0;
    let c3r2 = -(2.0 * z_far * z_near) / (z_far - z_near);
    Self::new(
      c0r0, 0.0,  0.0,  0.0,
      0.0,  c1r1, 0.0,  0.0,
      0.0,  0.0,  c2r2, c2r3,
      0.0,  0.0,  c3r2, 0.0,
    )
  }

  #[rustfmt::skip]
  pub fn orthographic_rh_no(
    left: f32, right: f32, bottom: f32, top: f32, z_near: f32, z_far: f32,
  ) -> Self {
    let c0r0 = 2.0 / (right - left);
    let c1r1 = 2.0 / (top - bottom);
    let c2r2 = -2.0 / (z_far - z_near);
    let c3r0 = -(right + left) / (right - left);
    let c3r1 = -(top + bottom) / (top - bottom);
    let c3r2 = -(z_far + z_near) / (z_far - z_near);
    Self::new(
      c0r0, 0.0,  0.0,  0.0,
      0.0,  c1r1, 0.0,  0.0,
      0.0,  0.0,  c2r2, 0.0,
      c3r0, c3r1, c3r2, 1.0,
    )
  }

  #[inline]
  pub fn transform_point(&self, p: Vec3f) -> Vec3f { (*self * p.extend(1.0)).truncate() }
}

impl Mul<Vec4f> for Mat4f {
  type Output = Vec4f;
  #[inline]
  fn mul(self, v: Vec4f) -> Vec4f { self.x * v.x + self.y * v.y + self.z * v.z + self.w * v.w }
}

impl Mul<Mat4f> for Mat4f {
  type Output = Self;
  #[inline]
  fn mul(self, rhs: Self) -> Self {
    Self { x: self * rhs.x, y: self * rhs.y, z: self * rhs.z, w: self * rhs.w }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn assert_vec_eq(a: Vec3f, b: Vec3f) {
    assert!((a - b).magnitude() < 1e-5, "{:?} != {:?}", a, b);
  }

  #[test]
  fn identity_is_neutral() {
    let m = Mat4f::from_translation(vec3(1.0, 2.0, 3.0));
    assert_eq!(m * Mat4f::IDENTITY, m);
    assert_eq!(Mat4f::IDENTITY * m, m);
  }

  #[test]
  fn translation_then_scale_order() {
    let m = Mat4f::from_translation(vec3(1.0, 0.0, 0.0)) * Mat4f::from_scale(vec3n(2.0));
    assert_vec_eq(m.transform_point(vec3(1.0, 1.0, 1.0)), vec3(3.0, 2.0, 2.0));
  }

  #[test]
  fn rotation_around_y() {
    let m = Mat4f::from_axis_angle(Vec3f::UP, std::f32::consts::FRAC_PI_2);
    assert_vec_eq(m.transform_point(Vec3f::RIGHT), vec3(0.0, 0.0, -1.0));
  }

  #[test]
  fn look_to_moves_eye_to_origin() {
    let eye = vec3(0.0, 0.0, 5.0);
    let view = Mat4f::look_to_rh(eye, Vec3f::FORWARD, Vec3f::UP);
    assert_vec_eq(view.transform_point(eye), Vec3f::ZERO);
    assert_vec_eq(view.transform_point(Vec3f::ZERO), vec3(0.0, 0.0, -5.0));
  }

  #[test]
  fn look_to_along_the_up_axis_stays_finite() {
    let eye = vec3(0.0, 10.0, 0.0);
    for dir in [-Vec3f::UP, Vec3f::UP] {
      let view = Mat4f::look_to_rh(eye, dir, Vec3f::UP);
      assert!(view.as_array().iter().all(|x| x.is_finite()), "{:?}", view);
      assert_vec_eq(view.transform_point(eye), Vec3f::ZERO);
    }
    // looking straight down, the origin is 10 units ahead
    let view = Mat4f::look_to_rh(eye, -Vec3f::UP, Vec3f::UP);
    assert_vec_eq(view.transform_point(Vec3f::ZERO), vec3(0.0, 0.0, -10.0));

    let view = Mat4f::look_to_rh(Vec3f::ZERO, Vec3f::FORWARD, Vec3f::FORWARD);
    assert!(view.as_array().iter().all(|x| x.is_finite()), "{:?}", view);
  }

  #[test]
  fn orthographic_maps_box_to_clip_cube() {
    let proj = Mat4f::orthographic_rh_no(0.0, 800.0, 0.0, 600.0, -1.0, 1.0);
    assert_vec_eq(proj.transform_point(vec3(0.0, 0.0, 0.0)), vec3(-1.0, -1.0, 0.0));
    assert_vec_eq(proj.transform_point(vec3(800.0, 600.0, 0.0)), vec3(1.0, 1.0, 0.0));
  }

  #[test]
  fn column_major_layout() {
    let m = Mat4f::from_translation(vec3(7.0, 8.0, 9.0));
    assert_eq!(&m.as_array()[12..15], &[7.0, 8.0, 9.0]);
  }
}
