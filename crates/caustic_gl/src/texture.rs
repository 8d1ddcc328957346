use crate::impl_prelude::*;
use crate::GlApiVersion;
use caustic_math::*;
use prelude_plus::*;

gl_enum!({
  pub enum BindTextureTarget {
    Texture2D = TEXTURE_2D,
  }
});

gl_enum!({
  #[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
  pub enum TextureFormat {
    Alpha = ALPHA,
    Luminance = LUMINANCE,
    LuminanceAlpha = LUMINANCE_ALPHA,
    Red = RED,
    RG = RG,
    RGB = RGB,
    RGBA = RGBA,
    Depth = DEPTH_COMPONENT,
  }
});

impl TextureFormat {
  pub fn color_components(self) -> u8 {
    match self {
      Self::Alpha | Self::Luminance | Self::Red | Self::Depth => 1,
      Self::LuminanceAlpha | Self::RG => 2,
      Self::RGB => 3,
      Self::RGBA => 4,
    }
  }

  fn check_supported(self, api_version: GlApiVersion) -> Result<()> {
    match self {
      Self::Red if !api_version.is_gl30() => Err(Error::RequiresGl30("the RED texture format")),
      Self::RG if !api_version.is_gl30() => Err(Error::RequiresGl30("the RG texture format")),
      _ => Ok(()),
    }
  }
}

gl_enum!({
  #[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
  pub enum WrapMode {
    ClampToEdge = CLAMP_TO_EDGE,
    ClampToBorder = CLAMP_TO_BORDER,
    MirroredRepeat = MIRRORED_REPEAT,
    Repeat = REPEAT,
  }
});

gl_enum!({
  #[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
  pub enum FilterMode {
    Nearest = NEAREST,
    Linear = LINEAR,
    NearestMipmapNearest = NEAREST_MIPMAP_NEAREST,
    LinearMipmapNearest = LINEAR_MIPMAP_NEAREST,
    NearestMipmapLinear = NEAREST_MIPMAP_LINEAR,
    LinearMipmapLinear = LINEAR_MIPMAP_LINEAR,
  }
});

impl FilterMode {
  #[inline]
  pub fn needs_mipmaps(self) -> bool { !matches!(self, Self::Nearest | Self::Linear) }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TextureConfig {
  pub unit: u32,
  pub format: TextureFormat,
  pub wrap_s: WrapMode,
  pub wrap_t: WrapMode,
  pub min_filter: FilterMode,
  pub mag_filter: FilterMode,
}

impl Default for TextureConfig {
  fn default() -> Self {
    Self {
      unit: 0,
      format: TextureFormat::RGBA,
      wrap_s: WrapMode::Repeat,
      wrap_t: WrapMode::Repeat,
      min_filter: FilterMode::Linear,
      mag_filter: FilterMode::Linear,
    }
  }
}

impl TextureConfig {
  pub fn validate(&self, api_version: GlApiVersion, texture_units: u32) -> Result<()> {
    if self.unit >= texture_units {
      return Err(Error::InvalidTextureUnit { unit: self.unit, available: texture_units });
    }
    if self.mag_filter.needs_mipmaps() {
      return Err(Error::InvalidMagFilter(self.mag_filter));
    }
    self.format.check_supported(api_version)
  }
}

fn validate_image(format: TextureFormat, size: Vec2u32, max_size: u32, data_len: Option<usize>) -> Result<()> {
  if size.x > max_size || size.y > max_size {
    return Err(Error::InvalidImage(format!(
      "{}x{} exceeds the maximum texture size of {}",
      size.x, size.y, max_size,
    )));
  }
  if let Some(data_len) = data_len {
    let expected_len = size.x as usize * size.y as usize * format.color_components() as usize;
    if data_len != expected_len {
      return Err(Error::InvalidImage(format!(
        "{}x{} {:?} needs {} bytes, got {}",
        size.x, size.y, format, expected_len, data_len,
      )));
    }
  }
  Ok(())
}

#[derive(Debug)]
pub struct Texture2D {
  ctx: SharedContext,
  addr: u32,
  config: TextureConfig,
  size: Vec2u32,
}

unsafe impl Object for Texture2D {
  const DEBUG_TYPE_ID: u32 = gl::TEXTURE;

  #[inline(always)]
  fn ctx(&self) -> &SharedContext { &self.ctx }
  #[inline(always)]
  fn addr(&self) -> u32 { self.addr }
}

impl Texture2D {
  pub const BIND_TARGET: BindTextureTarget = BindTextureTarget::Texture2D;

  #[inline(always)]
  pub fn config(&self) -> &TextureConfig { &self.config }
  #[inline(always)]
  pub fn unit(&self) -> u32 { self.config.unit }
  #[inline(always)]
  pub fn size(&self) -> Vec2u32 { self.size }

  pub fn new(ctx: SharedContext, config: TextureConfig) -> Result<Self> {
    config.validate(ctx.api_version(), ctx.texture_units())?;

    let mut addr = 0;
    unsafe { ctx.raw_gl().GenTextures(1, &mut addr) };
    let texture = Self { ctx, addr, config, size: vec2n(0) };

    texture.bind();
    let gl = texture.raw_gl();
    let gl_target = Self::BIND_TARGET.as_raw();
    unsafe {
      gl.TexParameteri(gl_target, gl::TEXTURE_WRAP_S, config.wrap_s.as_raw() as i32);
      gl.TexParameteri(gl_target, gl::TEXTURE_WRAP_T, config.wrap_t.as_raw() as i32);
      gl.TexParameteri(gl_target, gl::TEXTURE_MIN_FILTER, config.min_filter.as_raw() as i32);
      gl.TexParameteri(gl_target, gl::TEXTURE_MAG_FILTER, config.mag_filter.as_raw() as i32);
    }
    texture.unbind();

    texture.ctx.check_error()?;
    Ok(texture)
  }

  /// Replaces the image. `None` only allocates storage, e.g. for render
  /// targets.
  pub fn set_image(&mut self, size: Vec2u32, data: Option<&[u8]>) -> Result<()> {
    let capabilities = self.ctx.capabilities();
    validate_image(self.config.format, size, capabilities.max_texture_size, data.map(<[u8]>::len))?;

    if !(is_power_of_two(size.x) && is_power_of_two(size.y)) && !capabilities.supports_npot_textures() {
      warn!(
        "Texture #{} is {}x{}, which is not a power of two, and the driver lacks NPOT support",
        self.addr, size.x, size.y,
      );
    }

    let gl = self.ctx.raw_gl();
    let gl_target = Self::BIND_TARGET.as_raw();
    let format = self.config.format.as_raw();
    let generate_mipmaps = self.config.min_filter.needs_mipmaps() && data.is_some();
    let api_version = self.ctx.api_version();

    self.bind();
    unsafe {
      gl.PixelStorei(gl::UNPACK_ALIGNMENT, 1);
      if generate_mipmaps && !api_version.is_gl30() {
        gl.TexParameteri(gl_target, gl::GENERATE_MIPMAP, gl::TRUE as i32);
      }
      gl.TexImage2D(
        gl_target,
        0,
        format as i32,
        size.x as i32,
        size.y as i32,
        0, // border, must be zero
        format,
        gl::UNSIGNED_BYTE,
        data.map_or(ptr::null(), |data| data.as_ptr() as *const c_void),
      );
      if generate_mipmaps && api_version.is_gl30() {
        gl.GenerateMipmap(gl_target);
      }
    }
    self.unbind();
    self.size = size;

    trace!("Texture #{}: {}x{} {:?}", self.addr, size.x, size.y, self.config.format);
    self.ctx.check_error()
  }

  /// Binds the texture to its unit, making that unit active.
  pub fn bind(&self) {
    let unit = self.config.unit;
    self.ctx.set_active_texture_unit(unit);
    self.ctx.bound_textures_2d[unit as usize].bind_if_needed(self.raw_gl(), self.addr);
  }

  pub fn unbind(&self) {
    let unit = self.config.unit;
    self.ctx.set_active_texture_unit(unit);
    self.ctx.bound_textures_2d[unit as usize].unbind_unconditionally(self.raw_gl());
  }
}

impl Drop for Texture2D {
  fn drop(&mut self) {
    self.ctx.bound_textures_2d[self.config.unit as usize].on_object_deleted(self.addr);
    unsafe { self.raw_gl().DeleteTextures(1, &self.addr) };
  }
}
