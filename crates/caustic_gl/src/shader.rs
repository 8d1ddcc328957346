use crate::impl_prelude::*;
use crate::{UniformHolder, UniformValue};
use prelude_plus::*;

gl_enum!({
  #[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
  pub enum ShaderType {
    Vertex = VERTEX_SHADER,
    Fragment = FRAGMENT_SHADER,
  }
});

pub const INACTIVE_UNIFORM_LOCATION: i32 = -1;

fn info_log_to_string(mut buf: Vec<u8>) -> String {
  while buf.last().map_or(false, |b| b.is_ascii_whitespace() || *b == 0) {
    buf.pop();
  }
  String::from_utf8_lossy(&buf).into_owned()
}

#[derive(Debug)]
pub struct Shader {
  ctx: SharedContext,
  addr: u32,
  shader_type: ShaderType,
}

unsafe impl Object for Shader {
  const DEBUG_TYPE_ID: u32 = gl::SHADER;

  #[inline(always)]
  fn ctx(&self) -> &SharedContext { &self.ctx }
  #[inline(always)]
  fn addr(&self) -> u32 { self.addr }
}

impl Shader {
  #[inline(always)]
  pub fn shader_type(&self) -> ShaderType { self.shader_type }

  /// Compiles `src`. Warnings from the compiler are logged, errors are
  /// returned along with the info log.
  pub fn compile(ctx: SharedContext, shader_type: ShaderType, src: &str) -> Result<Self> {
    let addr = unsafe { ctx.raw_gl().CreateShader(shader_type.as_raw()) };
    let shader = Self { ctx, addr, shader_type };

    let c_src = CString::new(src).map_err(|e| Error::ShaderCompilation {
      shader_type,
      log: format!("the source contains a NUL byte at {}", e.nul_position()),
    })?;

    let gl = shader.raw_gl();
    let mut status = gl::FALSE as i32;
    unsafe {
      gl.ShaderSource(addr, 1, &c_src.as_ptr(), ptr::null());
      gl.CompileShader(addr);
      gl.GetShaderiv(addr, gl::COMPILE_STATUS, &mut status);
    }

    let log = info_log_to_string(shader.get_info_log());
    if status != gl::TRUE as i32 {
      return Err(Error::ShaderCompilation { shader_type, log });
    }
    if !log.is_empty() {
      warn!("{:?} shader #{} compiled with warnings:\n{}", shader_type, addr, log);
    }

    shader.ctx.check_error()?;
    Ok(shader)
  }

  pub fn get_info_log(&self) -> Vec<u8> {
    let gl = self.raw_gl();

    let mut buf_size: i32 = 0;
    unsafe { gl.GetShaderiv(self.addr, gl::INFO_LOG_LENGTH, &mut buf_size) };
    let mut buf: Vec<u8> = Vec::with_capacity(buf_size.max(0) as usize);

    if buf_size > 0 {
      let mut text_len: i32 = 0;
      unsafe {
        gl.GetShaderInfoLog(self.addr, buf_size, &mut text_len, buf.as_mut_ptr() as *mut c_char);
        buf.set_len(text_len.max(0) as usize);
      }
    }

    buf
  }
}

impl Drop for Shader {
  fn drop(&mut self) { unsafe { self.raw_gl().DeleteShader(self.addr) }; }
}

#[derive(Debug)]
pub struct Program {
  ctx: SharedContext,
  addr: u32,
  uniform_locations: RefCell<HashMap<String, i32>>,
}

unsafe impl Object for Program {
  const DEBUG_TYPE_ID: u32 = gl::PROGRAM;

  #[inline(always)]
  fn ctx(&self) -> &SharedContext { &self.ctx }
  #[inline(always)]
  fn addr(&self) -> u32 { self.addr }
}

impl Program {
  /// Links `shaders` into a program. Attribute names are bound to their
  /// indices first, so they line up with [`VertexData`](crate::VertexData)
  /// attribute indices.
  pub fn link(ctx: SharedContext, shaders: &[&Shader], attribute_bindings: &[(u32, &str)]) -> Result<Self> {
    if !shaders.iter().all(|shader| shader.belongs_to(&ctx)) {
      return Err(Error::ContextMismatch);
    }

    let addr = unsafe { ctx.raw_gl().CreateProgram() };
    let program = Self { ctx, addr, uniform_locations: RefCell::new(HashMap::new()) };
    let gl = program.raw_gl();

    for shader in shaders {
      unsafe { gl.AttachShader(addr, shader.addr) };
    }
    for &(index, name) in attribute_bindings {
      let c_name = CString::new(name).map_err(|_| Error::ProgramLinking {
        log: format!("attribute name {:?} contains a NUL byte", name),
      })?;
      unsafe { gl.BindAttribLocation(addr, index, c_name.as_ptr()) };
    }

    let mut status = gl::FALSE as i32;
    unsafe {
      gl.LinkProgram(addr);
      gl.GetProgramiv(addr, gl::LINK_STATUS, &mut status);
    }
    for shader in shaders {
      unsafe { gl.DetachShader(addr, shader.addr) };
    }

    let log = info_log_to_string(program.get_info_log());
    if status != gl::TRUE as i32 {
      return Err(Error::ProgramLinking { log });
    }
    if !log.is_empty() {
      warn!("Program #{} linked with warnings:\n{}", addr, log);
    }

    debug!("Linked program #{} from {} shader(s)", addr, shaders.len());
    program.ctx.check_error()?;
    Ok(program)
  }

  pub fn get_info_log(&self) -> Vec<u8> {
    let gl = self.raw_gl();

    let mut buf_size: i32 = 0;
    unsafe { gl.GetProgramiv(self.addr, gl::INFO_LOG_LENGTH, &mut buf_size) };
    let mut buf: Vec<u8> = Vec::with_capacity(buf_size.max(0) as usize);

    if buf_size > 0 {
      let mut text_len: i32 = 0;
      unsafe {
        gl.GetProgramInfoLog(self.addr, buf_size, &mut text_len, buf.as_mut_ptr() as *mut c_char);
        buf.set_len(text_len.max(0) as usize);
      }
    }

    buf
  }

  /// Looks the location up once and caches it, inactive uniforms included.
  pub fn uniform_location(&self, name: &str) -> i32 {
    if let Some(&location) = self.uniform_locations.borrow().get(name) {
      return location;
    }

    let location = match CString::new(name) {
      Ok(c_name) => unsafe { self.raw_gl().GetUniformLocation(self.addr, c_name.as_ptr()) },
      Err(_) => INACTIVE_UNIFORM_LOCATION,
    };
    if location == INACTIVE_UNIFORM_LOCATION {
      trace!("Program #{}: uniform {:?} is inactive", self.addr, name);
    }
    self.uniform_locations.borrow_mut().insert(name.to_owned(), location);
    location
  }

  /// Makes this the program in use. Only one binding may be alive at a time.
  pub fn bind(&self) -> ProgramBinding<'_> {
    let binding_target = &self.ctx.bound_program;
    binding_target.on_binding_created(self.addr);
    binding_target.bind_if_needed(self.raw_gl(), self.addr);
    ProgramBinding { program: self }
  }
}

impl Drop for Program {
  fn drop(&mut self) {
    self.ctx.bound_program.on_object_deleted(self.addr);
    unsafe { self.raw_gl().DeleteProgram(self.addr) };
  }
}

/// Proof that a [`Program`] is in use. Uniforms can only be set through it.
#[derive(Debug)]
pub struct ProgramBinding<'obj> {
  program: &'obj Program,
}

impl<'obj> ProgramBinding<'obj> {
  #[inline(always)]
  pub fn program(&self) -> &'obj Program { self.program }

  pub fn set_uniform(&self, name: &str, value: &UniformValue) {
    let location = self.program.uniform_location(name);
    if location != INACTIVE_UNIFORM_LOCATION {
      unsafe { value.upload(self.program.raw_gl(), location) };
    }
  }

  pub fn upload(&self, uniforms: &UniformHolder) {
    for (name, value) in uniforms.iter() {
      self.set_uniform(name, value);
    }
  }

  /// Drops the binding and switches back to the fixed-function "program" zero.
  pub fn unbind_completely(self) {
    self.program.ctx.bound_program.unbind_unconditionally(self.program.raw_gl());
  }
}

impl<'obj> Drop for ProgramBinding<'obj> {
  fn drop(&mut self) { self.program.ctx.bound_program.on_binding_dropped(); }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn info_logs_are_trimmed() {
    assert_eq!(info_log_to_string(b"0:1(1): error: syntax error\n\0".to_vec()), "0:1(1): error: syntax error");
    assert_eq!(info_log_to_string(b"\n".to_vec()), "");
    assert_eq!(info_log_to_string(Vec::new()), "");
  }

  #[test]
  fn shader_types_map_to_gl() {
    assert_eq!(ShaderType::Vertex.as_raw(), gl::VERTEX_SHADER);
    assert_eq!(ShaderType::from_raw(gl::FRAGMENT_SHADER), Some(ShaderType::Fragment));
  }
}
