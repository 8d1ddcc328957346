use crate::context::{GlApiVersion, GlVersion};
use crate::shader::ShaderType;
use crate::texture::FilterMode;
use crate::vertex_data::{DataType, UploadMode};
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

gl_enum!({
  pub enum GlErrorCode {
    InvalidEnum = INVALID_ENUM,
    InvalidValue = INVALID_VALUE,
    InvalidOperation = INVALID_OPERATION,
    InvalidFramebufferOperation = INVALID_FRAMEBUFFER_OPERATION,
    OutOfMemory = OUT_OF_MEMORY,
    StackUnderflow = STACK_UNDERFLOW,
    StackOverflow = STACK_OVERFLOW,
  }
});

/// Errors produced by the wrapper.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
  /// `glGetError` reported one or more errors. Unknown codes are kept raw.
  #[error("OpenGL error(s): {}", format_gl_errors(.0))]
  Gl(Vec<Result<GlErrorCode, u32>>),

  #[error("OpenGL {requested} was requested, but the driver only provides {available}")]
  UnsupportedVersion { requested: GlApiVersion, available: GlVersion },

  #[error("the driver returned an unparseable GL_VERSION string: {0:?}")]
  UnknownVersion(String),

  #[error("{shader_type:?} shader compilation failed:\n{log}")]
  ShaderCompilation { shader_type: ShaderType, log: String },

  #[error("program linking failed:\n{log}")]
  ProgramLinking { log: String },

  #[error("attribute {name:?} uses upload mode {mode:?} with {data_type:?}, which needs OpenGL 3.0")]
  UnsupportedUploadMode { name: String, mode: UploadMode, data_type: DataType },

  #[error("attribute {name:?} has {size} components, only 1 to 4 are allowed")]
  InvalidAttributeSize { name: String, size: u32 },

  #[error("{0} indices can't be drawn with a single call")]
  TooManyIndices(usize),

  #[error("{0:?} can't be used as a magnification filter")]
  InvalidMagFilter(FilterMode),

  #[error("invalid texture image: {0}")]
  InvalidImage(String),

  #[error("texture unit {unit} is out of range, the context supports {available} units")]
  InvalidTextureUnit { unit: u32, available: u32 },

  #[error("{0} requires OpenGL 3.0")]
  RequiresGl30(&'static str),

  #[error("the object belongs to a different OpenGL context")]
  ContextMismatch,

  #[error("the model was rendered while a different material was bound")]
  MaterialNotBound,
}

fn format_gl_errors(errors: &[Result<GlErrorCode, u32>]) -> String {
  let names: Vec<String> = errors
    .iter()
    .map(|error| match error {
      Ok(code) => format!("{:?}", code),
      Err(raw) => format!("0x{:04x}", raw),
    })
    .collect();
  names.join(", ")
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn gl_error_codes_round_trip_through_raw_values() {
    for code in GlErrorCode::VARIANTS {
      assert_eq!(GlErrorCode::from_raw(code.as_raw()), Some(*code));
    }
    assert_eq!(GlErrorCode::from_raw(0), None);
  }

  #[test]
  fn gl_errors_are_listed_in_the_message() {
    let error = Error::Gl(vec![Ok(GlErrorCode::InvalidEnum), Err(0x1234)]);
    assert_eq!(error.to_string(), "OpenGL error(s): InvalidEnum, 0x1234");
  }
}
