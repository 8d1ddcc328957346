use std::fmt;

#[derive(Copy, Clone, PartialEq, PartialOrd, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[repr(C)]
pub struct Color<T> {
  pub r: T,
  pub g: T,
  pub b: T,
  pub a: T,
}

impl<T: fmt::Debug> fmt::Debug for Color<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_tuple("Color").field(&self.r).field(&self.g).field(&self.b).field(&self.a).finish()
  }
}

pub type Colorf = Color<f32>;

unsafe impl bytemuck::Zeroable for Colorf {}
unsafe impl bytemuck::Pod for Colorf {}

#[inline(always)]
pub const fn color<T>(r: T, g: T, b: T, a: T) -> Color<T> { Color { r, g, b, a } }

#[inline]
pub const fn colorn<T: Copy>(n: T, a: T) -> Color<T> { Color { r: n, g: n, b: n, a } }

impl<T> Color<T> {
  #[inline]
  pub fn with_alpha(self, a: T) -> Self { Self { r: self.r, g: self.g, b: self.b, a } }
}

impl Colorf {
  pub const BLACK: Self = color(0.0, 0.0, 0.0, 1.0);
  pub const WHITE: Self = color(1.0, 1.0, 1.0, 1.0);
  pub const TRANSPARENT: Self = color(0.0, 0.0, 0.0, 0.0);

  /// Packs an `0xRRGGBBAA` literal.
  pub fn from_rgba_u32(rgba: u32) -> Self {
    let channel = |shift: u32| ((rgba >> shift) & 0xff) as f32 / 255.0;
    color(channel(24), channel(16), channel(8), channel(0))
  }
}

impl<T> From<[T; 4]> for Color<T> {
  #[inline(always)]
  fn from([r, g, b, a]: [T; 4]) -> Self { Self { r, g, b, a } }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn unpacks_rgba_literals() {
    assert_eq!(Colorf::from_rgba_u32(0xff0000ff), color(1.0, 0.0, 0.0, 1.0));
    assert_eq!(Colorf::from_rgba_u32(0x00000000), Colorf::TRANSPARENT);
  }
}
