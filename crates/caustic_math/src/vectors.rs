// See also:
// <https://github.com/rustgd/cgmath/blob/a691de871493f652836281e71e2c86c1eb5b50ca/src/vector.rs>
// <https://github.com/rustgd/cgmath/blob/a691de871493f652836281e71e2c86c1eb5b50ca/src/macros.rs>

use crate::ops::*;
use std::fmt;
use std::ops::*;

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[repr(C)]
pub struct Vec2<T> {
  pub x: T,
  pub y: T,
}

#[derive(Copy, Clone, PartialEq, PartialOrd, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[repr(C)]
pub struct Vec3<T> {
  pub x: T,
  pub y: T,
  pub z: T,
}

#[derive(Copy, Clone, PartialEq, PartialOrd, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[repr(C)]
pub struct Vec4<T> {
  pub x: T,
  pub y: T,
  pub z: T,
  pub w: T,
}

impl<T: fmt::Debug> fmt::Debug for Vec2<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_tuple("Vec2").field(&self.x).field(&self.y).finish()
  }
}

impl<T: fmt::Debug> fmt::Debug for Vec3<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_tuple("Vec3").field(&self.x).field(&self.y).field(&self.z).finish()
  }
}

impl<T: fmt::Debug> fmt::Debug for Vec4<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_tuple("Vec4").field(&self.x).field(&self.y).field(&self.z).field(&self.w).finish()
  }
}

pub type Vec2f = Vec2<f32>;
pub type Vec2i32 = Vec2<i32>;
pub type Vec2u32 = Vec2<u32>;
pub type Vec3f = Vec3<f32>;
pub type Vec4f = Vec4<f32>;

unsafe impl bytemuck::Zeroable for Vec2f {}
unsafe impl bytemuck::Pod for Vec2f {}
unsafe impl bytemuck::Zeroable for Vec3f {}
unsafe impl bytemuck::Pod for Vec3f {}
unsafe impl bytemuck::Zeroable for Vec4f {}
unsafe impl bytemuck::Pod for Vec4f {}

#[inline(always)]
pub const fn vec2<T>(x: T, y: T) -> Vec2<T> { Vec2 { x, y } }
#[inline(always)]
pub const fn vec3<T>(x: T, y: T, z: T) -> Vec3<T> { Vec3 { x, y, z } }
#[inline(always)]
pub const fn vec4<T>(x: T, y: T, z: T, w: T) -> Vec4<T> { Vec4 { x, y, z, w } }

#[inline]
pub const fn vec2n<T: Copy>(n: T) -> Vec2<T> { Vec2 { x: n, y: n } }
#[inline]
pub const fn vec3n<T: Copy>(n: T) -> Vec3<T> { Vec3 { x: n, y: n, z: n } }

impl<T> Vec2<T> {
  #[inline(always)]
  pub const fn new(x: T, y: T) -> Self { Self { x, y } }

  #[inline]
  pub fn map<U, F: FnMut(T) -> U>(self, mut op: F) -> Vec2<U> {
    Vec2 { x: op(self.x), y: op(self.y) }
  }

  #[inline]
  pub fn zip<U, V, F: FnMut(T, U) -> V>(self, other: Vec2<U>, mut op: F) -> Vec2<V> {
    Vec2 { x: op(self.x, other.x), y: op(self.y, other.y) }
  }
}

impl<T> Vec3<T> {
  #[inline(always)]
  pub const fn new(x: T, y: T, z: T) -> Self { Self { x, y, z } }

  #[inline(always)]
  pub fn extend(self, w: T) -> Vec4<T> { Vec4 { x: self.x, y: self.y, z: self.z, w } }
}

impl<T> Vec4<T> {
  #[inline(always)]
  pub const fn new(x: T, y: T, z: T, w: T) -> Self { Self { x, y, z, w } }

  #[inline(always)]
  pub fn truncate(self) -> Vec3<T> { Vec3 { x: self.x, y: self.y, z: self.z } }
}

macro_rules! impl_vector_operators {
  ($vec:ident { $($field:ident),+ }, $ty:ty) => {
    impl Add for $vec<$ty> {
      type Output = Self;
      #[inline]
      fn add(self, rhs: Self) -> Self { $vec { $($field: self.$field + rhs.$field),+ } }
    }

    impl Sub for $vec<$ty> {
      type Output = Self;
      #[inline]
      fn sub(self, rhs: Self) -> Self { $vec { $($field: self.$field - rhs.$field),+ } }
    }

    impl Mul for $vec<$ty> {
      type Output = Self;
      #[inline]
      fn mul(self, rhs: Self) -> Self { $vec { $($field: self.$field * rhs.$field),+ } }
    }

    impl Div for $vec<$ty> {
      type Output = Self;
      #[inline]
      fn div(self, rhs: Self) -> Self { $vec { $($field: self.$field / rhs.$field),+ } }
    }

    impl Mul<$ty> for $vec<$ty> {
      type Output = Self;
      #[inline]
      fn mul(self, rhs: $ty) -> Self { $vec { $($field: self.$field * rhs),+ } }
    }

    impl Mul<$vec<$ty>> for $ty {
      type Output = $vec<$ty>;
      #[inline]
      fn mul(self, rhs: $vec<$ty>) -> $vec<$ty> { $vec { $($field: self * rhs.$field),+ } }
    }

    impl Div<$ty> for $vec<$ty> {
      type Output = Self;
      #[inline]
      fn div(self, rhs: $ty) -> Self { $vec { $($field: self.$field / rhs),+ } }
    }

    impl AddAssign for $vec<$ty> {
      #[inline]
      fn add_assign(&mut self, rhs: Self) { $(self.$field += rhs.$field;)+ }
    }

    impl SubAssign for $vec<$ty> {
      #[inline]
      fn sub_assign(&mut self, rhs: Self) { $(self.$field -= rhs.$field;)+ }
    }

    impl MulAssign<$ty> for $vec<$ty> {
      #[inline]
      fn mul_assign(&mut self, rhs: $ty) { $(self.$field *= rhs;)+ }
    }

    impl $vec<$ty> {
      #[inline]
      pub fn dot(self, rhs: Self) -> $ty { let mut sum = 0 as $ty; $(sum += self.$field * rhs.$field;)+ sum }
      #[inline]
      pub fn sqr_magnitude(self) -> $ty { self.dot(self) }

      #[inline]
      pub fn min_component(self, rhs: Self) -> Self { $vec { $($field: self.$field.min(rhs.$field)),+ } }
      #[inline]
      pub fn max_component(self, rhs: Self) -> Self { $vec { $($field: self.$field.max(rhs.$field)),+ } }
    }

    impl Clamp2 for $vec<$ty> {
      type Output = Self;
      #[inline]
      fn clamp2(self, min: Self, max: Self) -> Self::Output {
        $vec { $($field: self.$field.clamp2(min.$field, max.$field)),+ }
      }
    }
  };

  ($vec:ident { $($field:ident),+ }, $ty:ty, float) => {
    impl_vector_operators!($vec { $($field),+ }, $ty);

    impl Neg for $vec<$ty> {
      type Output = Self;
      #[inline]
      fn neg(self) -> Self { $vec { $($field: -self.$field),+ } }
    }

    impl $vec<$ty> {
      pub const ZERO: Self = $vec { $($field: 0.0),+ };
      pub const ONE: Self = $vec { $($field: 1.0),+ };

      #[inline]
      pub fn magnitude(self) -> $ty { self.sqr_magnitude().sqrt() }
      #[inline]
      pub fn distance(self, rhs: Self) -> $ty { (rhs - self).magnitude() }
      #[inline]
      pub fn normalized(self) -> Self { self / self.magnitude() }
      #[inline]
      pub fn abs(self) -> Self { $vec { $($field: self.$field.abs()),+ } }
    }

    impl Lerp<Self, $ty> for $vec<$ty> {
      type Output = Self;
      #[inline]
      fn lerp(self, rhs: Self, t: $ty) -> Self::Output { (rhs - self) * t + self }
    }
  };
}

impl_vector_operators!(Vec2 { x, y }, u32);
impl_vector_operators!(Vec2 { x, y }, i32);
impl_vector_operators!(Vec2 { x, y }, f32, float);
impl_vector_operators!(Vec3 { x, y, z }, f32, float);
impl_vector_operators!(Vec4 { x, y, z, w }, f32, float);

impl Vec2<f32> {
  #[inline]
  pub fn angle(self) -> f32 { self.y.atan2(self.x) }
}

impl Vec3<f32> {
  pub const UP: Self = vec3(0.0, 1.0, 0.0);
  pub const RIGHT: Self = vec3(1.0, 0.0, 0.0);
  pub const FORWARD: Self = vec3(0.0, 0.0, -1.0);

  #[inline]
  pub fn cross(self, rhs: Self) -> Self {
    vec3(
      self.y * rhs.z - self.z * rhs.y,
      self.z * rhs.x - self.x * rhs.z,
      self.x * rhs.y - self.y * rhs.x,
    )
  }
}

impl Vec2<u32> {
  #[inline]
  pub fn area(self) -> usize { self.x as usize * self.y as usize }
}

impl<T> From<(T, T)> for Vec2<T> {
  #[inline(always)]
  fn from((x, y): (T, T)) -> Self { Self { x, y } }
}

impl<T> From<[T; 2]> for Vec2<T> {
  #[inline(always)]
  fn from([x, y]: [T; 2]) -> Self { Self { x, y } }
}

impl<T> From<[T; 3]> for Vec3<T> {
  #[inline(always)]
  fn from([x, y, z]: [T; 3]) -> Self { Self { x, y, z } }
}

impl<T> From<[T; 4]> for Vec4<T> {
  #[inline(always)]
  fn from([x, y, z, w]: [T; 4]) -> Self { Self { x, y, z, w } }
}
