use crate::error::GlErrorCode;
use crate::impl_prelude::*;
use caustic_math::*;
use prelude_plus::*;

pub type RawGL = Gl;

pub type SharedContext = Rc<Context>;

// The wrapper never hands out more units than this, even when the driver
// reports hundreds of combined units.
const MAX_USABLE_TEXTURE_UNITS: u32 = 32;

/// The API level the wrapper targets. Everything that differs between the two
/// (vertex array objects, mipmap generation, integer attributes, texture
/// formats) is decided by this value.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum GlApiVersion {
  Gl20,
  Gl30,
}

impl GlApiVersion {
  #[inline]
  pub fn required_version(self) -> GlVersion {
    match self {
      Self::Gl20 => GlVersion::new(2, 0),
      Self::Gl30 => GlVersion::new(3, 0),
    }
  }

  #[inline]
  pub fn detect(driver_version: GlVersion) -> Self {
    if driver_version >= Self::Gl30.required_version() {
      Self::Gl30
    } else {
      Self::Gl20
    }
  }

  #[inline(always)]
  pub fn is_gl30(self) -> bool { self == Self::Gl30 }
}

impl fmt::Display for GlApiVersion {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    fmt::Display::fmt(&self.required_version(), f)
  }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Default)]
pub struct GlVersion {
  pub major: u32,
  pub minor: u32,
}

impl GlVersion {
  #[inline(always)]
  pub const fn new(major: u32, minor: u32) -> Self { Self { major, minor } }

  /// Parses the leading `<major>.<minor>` of a `GL_VERSION` string. Vendor
  /// suffixes and the `OpenGL ES` prefix are ignored.
  pub fn parse(version_str: &str) -> Option<Self> {
    let number = version_str.split_whitespace().find(|word| word.starts_with(|c: char| c.is_ascii_digit()))?;
    let mut parts = number.split('.');
    let major = parts.next()?.parse().ok()?;
    let minor_str = parts.next()?;
    let minor_digits_len = minor_str.find(|c: char| !c.is_ascii_digit()).unwrap_or(minor_str.len());
    let minor = minor_str[..minor_digits_len].parse().ok()?;
    Some(Self { major, minor })
  }
}

impl fmt::Display for GlVersion {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}.{}", self.major, self.minor)
  }
}

#[derive(Debug, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ContextConfig {
  /// `None` picks the highest level the driver supports.
  pub api_version: Option<GlApiVersion>,
  /// Route `GL_KHR_debug` messages into the log.
  pub debug_output: bool,
}

impl Default for ContextConfig {
  fn default() -> Self { Self { api_version: None, debug_output: cfg!(debug_assertions) } }
}

pub struct Context {
  raw_gl: RawGL,
  capabilities: ContextCapabilities,
  api_version: GlApiVersion,
  vertex_array_extension: VertexArrayExtension,

  pub(crate) bound_program: BindingTarget<ProgramBindingTarget>,
  pub(crate) bound_array_buffer: BindingTarget<BufferBindingTarget>,
  pub(crate) bound_vertex_array: BindingTarget<VertexArrayBindingTarget>,
  pub(crate) bound_textures_2d: Vec<BindingTarget<TextureBindingTarget>>,

  active_texture_unit: Cell<u32>,
}

impl Context {
  #[inline(always)]
  pub fn raw_gl(&self) -> &RawGL { &self.raw_gl }
  #[inline(always)]
  pub fn capabilities(&self) -> &ContextCapabilities { &self.capabilities }
  #[inline(always)]
  pub fn api_version(&self) -> GlApiVersion { self.api_version }
  #[inline(always)]
  pub fn vertex_array_extension(&self) -> VertexArrayExtension { self.vertex_array_extension }
  #[inline(always)]
  pub fn texture_units(&self) -> u32 { self.bound_textures_2d.len() as u32 }

  /// Loads the entry points of the context that is current on this thread.
  pub fn load_with<F>(config: &ContextConfig, loader: F) -> Result<Self>
  where
    F: FnMut(&'static str) -> *const c_void,
  {
    let gl = Gl::load_with(loader);

    // This has to be done first!!!
    if config.debug_output {
      crate::debug::init(&gl);
    }

    let capabilities = ContextCapabilities::load(&gl)?;

    let api_version = match config.api_version {
      Some(requested) if capabilities.version < requested.required_version() => {
        return Err(Error::UnsupportedVersion { requested, available: capabilities.version });
      }
      Some(requested) => requested,
      None => GlApiVersion::detect(capabilities.version),
    };
    info!("Targeting the OpenGL {} API", api_version);

    let vertex_array_extension = VertexArrayExtension::select(api_version, &capabilities.extensions);
    match vertex_array_extension {
      VertexArrayExtension::None => {
        warn!("Vertex array objects are unavailable, attributes will be re-bound on every draw")
      }
      ext => info!("Vertex array objects: {:?}", ext),
    }

    let texture_units = capabilities.max_texture_units.min(MAX_USABLE_TEXTURE_UNITS);
    let bound_textures_2d =
      (0..texture_units).map(|_| BindingTarget::new(crate::BindTextureTarget::Texture2D.as_raw())).collect();

    Ok(Self {
      raw_gl: gl,
      capabilities,
      api_version,
      vertex_array_extension,

      // programs and vertex arrays are special cases, the binding target value
      // doesn't matter because there is no target to bind them to
      bound_program: BindingTarget::new(gl::NONE),
      bound_array_buffer: BindingTarget::new(crate::BufferTarget::Array.as_raw()),
      bound_vertex_array: BindingTarget::new(gl::NONE),
      bound_textures_2d,

      active_texture_unit: Cell::new(0),
    })
  }

  #[inline(always)]
  pub fn active_texture_unit(&self) -> u32 { self.active_texture_unit.get() }

  pub(crate) fn set_active_texture_unit(&self, unit: u32) {
    if self.active_texture_unit.get() != unit {
      unsafe { self.raw_gl.ActiveTexture(gl::TEXTURE0 + unit) };
      self.active_texture_unit.set(unit);
    }
  }

  pub fn set_clear_color(&self, color: Colorf) {
    unsafe { self.raw_gl.ClearColor(color.r, color.g, color.b, color.a) };
  }

  pub fn clear(&self, flags: ClearFlags) { unsafe { self.raw_gl.Clear(flags.bits()) }; }

  pub fn set_viewport(&self, pos: Vec2i32, size: Vec2i32) {
    unsafe { self.raw_gl.Viewport(pos.x, pos.y, size.x, size.y) };
  }

  unsafe fn set_feature_enabled(&self, feature: u32, enabled: bool) {
    if enabled {
      self.raw_gl.Enable(feature);
    } else {
      self.raw_gl.Disable(feature);
    }
  }

  #[inline(always)]
  pub fn set_depth_test_enabled(&self, enabled: bool) {
    unsafe { self.set_feature_enabled(gl::DEPTH_TEST, enabled) };
  }

  #[inline(always)]
  pub fn set_face_culling_enabled(&self, enabled: bool) {
    unsafe { self.set_feature_enabled(gl::CULL_FACE, enabled) };
  }

  #[inline(always)]
  pub fn set_blending_enabled(&self, enabled: bool) {
    unsafe { self.set_feature_enabled(gl::BLEND, enabled) };
  }

  pub fn set_blending_factors(&self, src: BlendingFactor, dest: BlendingFactor) {
    unsafe { self.raw_gl.BlendFunc(src.as_raw(), dest.as_raw()) };
  }

  pub fn set_blending_equation(&self, equation: BlendingEquation) {
    unsafe { self.raw_gl.BlendEquation(equation.as_raw()) };
  }

  /// Drains the GL error queue.
  pub fn check_error(&self) -> Result<()> {
    let mut errors = Vec::new();
    loop {
      let code = unsafe { self.raw_gl.GetError() };
      if code == gl::NO_ERROR {
        break;
      }
      errors.push(GlErrorCode::from_raw(code).ok_or(code));
      // GL_CONTEXT_LOST and friends can keep the queue non-empty forever
      if errors.len() >= 16 {
        break;
      }
    }

    if errors.is_empty() {
      Ok(())
    } else {
      Err(Error::Gl(errors))
    }
  }
}

impl fmt::Debug for Context {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Context#<{:p}, GL {}>", self as *const Self, self.api_version)
  }
}

#[derive(Debug)]
pub(crate) struct BindingTarget<T> {
  target: u32,
  bound_addr: Cell<u32>,
  is_binding_alive: Cell<bool>,
  phantom: PhantomData<*mut T>,
}

#[allow(dead_code)]
impl<T> BindingTarget<T> {
  #[inline(always)]
  pub(crate) fn target(&self) -> u32 { self.target }
  #[inline(always)]
  pub(crate) fn bound_addr(&self) -> u32 { self.bound_addr.get() }
  #[inline(always)]
  pub(crate) fn is_anything_bound(&self) -> bool { self.bound_addr() != 0 }
  #[inline(always)]
  pub(crate) fn is_binding_alive(&self) -> bool { self.is_binding_alive.get() }

  pub(crate) fn new(target: u32) -> Self {
    Self {
      target,
      bound_addr: Cell::new(0),
      is_binding_alive: Cell::new(false),
      phantom: PhantomData,
    }
  }

  #[inline]
  pub(crate) fn on_binding_created(&self, addr: u32) {
    if self.is_binding_alive.get() {
      #[inline(never)]
      #[cold]
      #[track_caller]
      fn on_binding_created_fail(addr_new: u32, addr_old: u32) {
        panic!(
          "attempt to bind object #{} while the binding of object #{} is still alive",
          addr_new, addr_old,
        );
      }
      on_binding_created_fail(addr, self.bound_addr.get());
    }
    self.is_binding_alive.set(true);
  }

  #[inline(always)]
  pub(crate) fn on_binding_dropped(&self) { self.is_binding_alive.set(false); }

  /// Deleting a bound object reverts the binding to zero on the driver side.
  #[inline]
  pub(crate) fn on_object_deleted(&self, addr: u32) {
    if self.bound_addr.get() == addr {
      self.bound_addr.set(0);
    }
  }
}

macro_rules! impl_binding_target_state {
  ($target_enum:ident, $gl_bind_fn:ident ($($target:ident)?)) => {
    #[derive(Debug)]
    pub(crate) enum $target_enum {}

    #[allow(dead_code)]
    impl BindingTarget<$target_enum> {
      #[inline]
      pub(crate) fn bind_unconditionally(&self, gl: &RawGL, addr: u32) {
        unsafe { gl.$gl_bind_fn($(self.$target, )? addr) };
        self.bound_addr.set(addr);
      }

      #[inline(always)]
      pub(crate) fn unbind_unconditionally(&self, gl: &RawGL) {
        self.bind_unconditionally(gl, 0)
      }

      #[inline]
      pub(crate) fn bind_if_needed(&self, gl: &RawGL, addr: u32) {
        if self.bound_addr.get() != addr {
          self.bind_unconditionally(gl, addr);
        }
      }
    }
  };
}

impl_binding_target_state!(ProgramBindingTarget, UseProgram());
impl_binding_target_state!(BufferBindingTarget, BindBuffer(target));
impl_binding_target_state!(TextureBindingTarget, BindTexture(target));

#[derive(Debug)]
pub(crate) enum VertexArrayBindingTarget {}

impl BindingTarget<VertexArrayBindingTarget> {
  #[inline]
  pub(crate) fn bind_if_needed(&self, gl: &RawGL, ext: VertexArrayExtension, addr: u32) {
    if self.bound_addr.get() != addr {
      ext.bind(gl, addr);
      self.bound_addr.set(addr);
    }
  }
}

/// Where vertex array objects come from, if anywhere.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum VertexArrayExtension {
  /// Core since OpenGL 3.0.
  Core,
  /// `GL_ARB_vertex_array_object`, same entry points as the core ones.
  Arb,
  /// `GL_APPLE_vertex_array_object`, found on old macOS drivers.
  Apple,
  /// No VAOs: attribute pointers are specified again before every draw.
  None,
}

impl VertexArrayExtension {
  pub fn select(api_version: GlApiVersion, extensions: &ContextExtensions) -> Self {
    match api_version {
      GlApiVersion::Gl30 => Self::Core,
      GlApiVersion::Gl20 if extensions.gl_arb_vertex_array_object => Self::Arb,
      GlApiVersion::Gl20 if extensions.gl_apple_vertex_array_object => Self::Apple,
      GlApiVersion::Gl20 => Self::None,
    }
  }

  #[inline(always)]
  pub fn has(self) -> bool { self != Self::None }

  pub(crate) fn gen(self, gl: &RawGL) -> u32 {
    let mut addr = 0;
    match self {
      Self::Core | Self::Arb => unsafe { gl.GenVertexArrays(1, &mut addr) },
      Self::Apple => unsafe { gl.GenVertexArraysAPPLE(1, &mut addr) },
      Self::None => {}
    }
    addr
  }

  pub(crate) fn bind(self, gl: &RawGL, addr: u32) {
    match self {
      Self::Core | Self::Arb => unsafe { gl.BindVertexArray(addr) },
      Self::Apple => unsafe { gl.BindVertexArrayAPPLE(addr) },
      Self::None => {}
    }
  }

  pub(crate) fn delete(self, gl: &RawGL, addr: u32) {
    match self {
      Self::Core | Self::Arb => unsafe { gl.DeleteVertexArrays(1, &addr) },
      Self::Apple => unsafe { gl.DeleteVertexArraysAPPLE(1, &addr) },
      Self::None => {}
    }
  }
}

#[derive(Debug, Eq, PartialEq, Clone, Hash, Default)]
pub struct ContextCapabilities {
  pub renderer: String,
  pub vendor: String,
  pub gl_version: String,
  pub glsl_version: String,
  pub version: GlVersion,
  pub extensions: ContextExtensions,

  pub max_texture_units: u32,
  pub max_texture_size: u32,
  pub max_vertex_attribs: u32,

  pub max_debug_object_label_len: i32,
}

impl ContextCapabilities {
  pub fn load(gl: &RawGL) -> Result<Self> {
    fn get_i32_1(gl: &RawGL, name: u32) -> i32 {
      let mut value = 0;
      unsafe { gl.GetIntegerv(name, &mut value) }
      value
    }

    #[inline(always)]
    fn get_u32_1(gl: &RawGL, name: u32) -> u32 { get_i32_1(gl, name).max(0) as u32 }

    fn c_str_to_string(ptr: *const u8) -> Option<String> {
      if ptr.is_null() {
        return None;
      }
      let c_str = unsafe { CStr::from_ptr(ptr as *const c_char) };
      Some(c_str.to_string_lossy().into_owned())
    }

    fn get_string(gl: &RawGL, name: u32) -> String {
      c_str_to_string(unsafe { gl.GetString(name) }).unwrap_or_default()
    }

    let renderer = get_string(gl, gl::RENDERER);
    info!("GL renderer:    {}", renderer);
    let vendor = get_string(gl, gl::VENDOR);
    info!("GL vendor:      {}", vendor);
    let gl_version = get_string(gl, gl::VERSION);
    info!("GL version:     {}", gl_version);
    let glsl_version = get_string(gl, gl::SHADING_LANGUAGE_VERSION);
    info!("GLSL version:   {}", glsl_version);

    let version =
      GlVersion::parse(&gl_version).ok_or_else(|| Error::UnknownVersion(gl_version.clone()))?;

    // GL_EXTENSIONS as a single string is gone from 3.0+ core contexts.
    let extensions = if version.major >= 3 && gl.GetStringi.is_loaded() {
      let count = get_u32_1(gl, gl::NUM_EXTENSIONS);
      let names: Vec<String> = (0..count)
        .filter_map(|i| c_str_to_string(unsafe { gl.GetStringi(gl::EXTENSIONS, i) }))
        .collect();
      ContextExtensions::new(names.iter().map(String::as_str))
    } else {
      ContextExtensions::new(get_string(gl, gl::EXTENSIONS).split(' '))
    };
    info!("GL extensions:  {:?}", extensions);

    Ok(Self {
      renderer,
      vendor,
      gl_version,
      glsl_version,
      version,
      extensions,

      max_texture_units: get_u32_1(gl, gl::MAX_COMBINED_TEXTURE_IMAGE_UNITS),
      max_texture_size: get_u32_1(gl, gl::MAX_TEXTURE_SIZE),
      max_vertex_attribs: get_u32_1(gl, gl::MAX_VERTEX_ATTRIBS),

      max_debug_object_label_len: if gl.ObjectLabel.is_loaded() {
        get_i32_1(gl, gl::MAX_LABEL_LENGTH)
      } else {
        0
      },
    })
  }

  /// NPOT textures are core since 2.0, but some 2.x-era drivers only
  /// advertise them through the ARB extension and fall back to software.
  #[inline]
  pub fn supports_npot_textures(&self) -> bool {
    self.version.major >= 3 || self.extensions.gl_arb_texture_non_power_of_two
  }
}

macro_rules! generate_context_extensions_struct {
  ($(($name:literal, $field:ident)),* $(,)?) => {
    #[derive(Debug, Eq, PartialEq, Clone, Hash, Default)]
    pub struct ContextExtensions {
      $(pub $field: bool),*
    }

    impl ContextExtensions {
      pub fn new<'a, T: IntoIterator<Item = &'a str>>(loaded_extension_names_iter: T) -> Self {
        let mut extensions = ContextExtensions {
          $($field: false),*
        };

        for name in loaded_extension_names_iter {
          match name.trim() {
            $($name => extensions.$field = true,)*
            _ => {}
          }
        }

        extensions
      }
    }
  };
}

generate_context_extensions_struct![
  ("GL_ARB_vertex_array_object", gl_arb_vertex_array_object),
  ("GL_APPLE_vertex_array_object", gl_apple_vertex_array_object),
  ("GL_ARB_texture_non_power_of_two", gl_arb_texture_non_power_of_two),
  ("GL_KHR_debug", gl_khr_debug),
];

gl_enum!({
  pub enum BlendingFactor {
    Zero = ZERO,
    One = ONE,

    SrcColor = SRC_COLOR,
    SrcAlpha = SRC_ALPHA,
    OneMinusSrcColor = ONE_MINUS_SRC_COLOR,
    OneMinusSrcAlpha = ONE_MINUS_SRC_ALPHA,

    DestColor = DST_COLOR,
    DestAlpha = DST_ALPHA,
    OneMinusDestColor = ONE_MINUS_DST_COLOR,
    OneMinusDestAlpha = ONE_MINUS_DST_ALPHA,

    ConstColor = CONSTANT_COLOR,
    ConstAlpha = CONSTANT_ALPHA,
    OneMinusConstColor = ONE_MINUS_CONSTANT_COLOR,
    OneMinusConstAlpha = ONE_MINUS_CONSTANT_ALPHA,
  }
});

gl_enum!({
  pub enum BlendingEquation {
    Add = FUNC_ADD,
    Sub = FUNC_SUBTRACT,
    SubRev = FUNC_REVERSE_SUBTRACT,
  }
});

bitflags! {
  pub struct ClearFlags: u32 {
    const COLOR = gl::COLOR_BUFFER_BIT;
    const DEPTH = gl::DEPTH_BUFFER_BIT;
    const STENCIL = gl::STENCIL_BUFFER_BIT;
  }
}
