use std::ops::*;

macro_rules! impl_operator {
  ({ impl $trait:ident for ($($ty:ty),+) $block:tt }) => {
    $(impl $trait for $ty $block)+
  };
}

pub trait Lerp<Rhs = Self, Param = Self> {
  type Output;
  fn lerp(self, rhs: Rhs, t: Param) -> Self::Output;
}

impl<T> Lerp for T
where
  T: Add<Output = T> + Sub<Output = T> + Mul<Output = T> + Copy,
{
  type Output = Self;
  #[inline]
  fn lerp(self, rhs: Self, t: Self) -> Self::Output { (rhs - self) * t + self }
}

pub trait Clamp2<Range = Self> {
  type Output;
  fn clamp2(self, min: Range, max: Range) -> Self::Output;
}

impl_operator!({
  impl Clamp2 for (u8, i8, u16, i16, u32, i32, u64, i64, usize, isize, f32, f64) {
    type Output = Self;
    #[inline]
    fn clamp2(self, min: Self, max: Self) -> Self::Output { max.min(min.max(self)) }
  }
});

/// Degrees to radians, the camera API takes radians everywhere.
#[inline(always)]
pub fn radians(degrees: f32) -> f32 { degrees.to_radians() }

#[inline]
pub fn is_power_of_two(n: u32) -> bool { n != 0 && n & (n - 1) == 0 }

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn lerp_scalars() {
    assert_eq!(2.0f32.lerp(4.0, 0.5), 3.0);
    assert_eq!(2.0f32.lerp(4.0, 0.0), 2.0);
  }

  #[test]
  fn clamp_scalars() {
    assert_eq!(5i32.clamp2(0, 3), 3);
    assert_eq!((-1.0f32).clamp2(0.0, 1.0), 0.0);
  }

  #[test]
  fn powers_of_two() {
    assert!(is_power_of_two(1));
    assert!(is_power_of_two(256));
    assert!(!is_power_of_two(0));
    assert!(!is_power_of_two(300));
  }
}
