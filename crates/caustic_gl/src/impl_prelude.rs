pub use gl;
pub use gl::types::*;
pub use gl::Gl;

pub use crate::context::{Context, RawGL, SharedContext};
pub use crate::error::{Error, Result};
pub use crate::traits::Object;
