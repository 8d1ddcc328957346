//! An object-oriented wrapper over OpenGL 2.0 and 3.0+.
//!
//! Every GL object holds a [`SharedContext`] and releases its driver-side
//! resources when dropped. The API level (2.0 or 3.0) is chosen once, when the
//! [`Context`] is loaded, and the objects adapt their behavior to it.

#![deny(missing_debug_implementations)]

macro_rules! gl_enum {
  // a wrapper for autoformatting purposes
  ({$($tt:tt)+}) => { gl_enum! { $($tt)+ } };

  (
    $(#[$enum_meta:meta])* $visibility:vis enum $enum_name:ident {
      $($(#[$variant_meta:meta])* $rust_variant:ident = $gl_variant:ident),+ $(,)?
    }
  ) => {
    #[repr(u32)]
    #[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
    $(#[$enum_meta])*
    $visibility enum $enum_name {
      $($(#[$variant_meta])* $rust_variant = ::gl::$gl_variant,)+
    }

    #[allow(dead_code)]
    impl $enum_name {
      $visibility const VARIANTS: &'static [Self] = &[$(Self::$rust_variant),+];

      $visibility const fn from_raw(raw: ::gl::types::GLenum) -> Option<Self> {
        Some(match raw {
          $(::gl::$gl_variant => Self::$rust_variant,)+
            _ => return None,
        })
      }

      #[inline(always)]
      $visibility const fn as_raw(&self) -> ::gl::types::GLenum {
        *self as ::gl::types::GLenum
      }
    }
  };
}

mod impl_prelude;

pub mod buffer;
pub mod camera;
pub mod context;
pub mod debug;
pub mod error;
pub mod gen_idx;
pub mod material;
pub mod model;
pub mod renderer;
pub mod shader;
pub mod texture;
pub mod traits;
pub mod uniform;
pub mod vertex_array;
pub mod vertex_data;

pub use buffer::*;
pub use camera::*;
pub use context::*;
pub use error::*;
pub use gen_idx::*;
pub use material::*;
pub use model::*;
pub use renderer::*;
pub use shader::*;
pub use texture::*;
pub use traits::*;
pub use uniform::*;
pub use vertex_array::*;
pub use vertex_data::*;
