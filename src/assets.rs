use caustic_gl::{self as cgl, Object};
use caustic_math::*;
use prelude_plus::*;

const ASSETS_DIR_NAME: &str = "assets";

/// The `assets` directory, looked up next to the executable first and then in
/// the working directory.
#[derive(Debug)]
pub struct Assets {
  pub assets_dir: PathBuf,
}

impl Assets {
  pub fn init() -> AnyResult<Self> {
    let mut candidates = Vec::with_capacity(2);
    match env::current_exe() {
      Ok(exe) => candidates.extend(exe.parent().map(Path::to_path_buf)),
      Err(e) => warn!("Failed to get the path of the executable: {}", e),
    }
    match env::current_dir() {
      Ok(dir) => candidates.push(dir),
      Err(e) => warn!("Failed to get the working directory: {}", e),
    }

    for installation_dir in candidates {
      let assets_dir = installation_dir.join(ASSETS_DIR_NAME);
      if assets_dir.is_dir() {
        debug!("Assets directory: '{}'", assets_dir.display());
        return Ok(Self { assets_dir });
      }
    }
    bail!("Failed to find the '{}' directory", ASSETS_DIR_NAME)
  }

  #[inline]
  pub fn path<P: AsRef<Path>>(&self, relative_path: P) -> PathBuf { self.assets_dir.join(relative_path) }

  #[inline]
  pub fn exists<P: AsRef<Path>>(&self, relative_path: P) -> bool { self.path(relative_path).is_file() }

  pub fn open_file<P: AsRef<Path>>(&self, relative_path: P) -> AnyResult<File> {
    self._open_file(relative_path.as_ref())
  }

  fn _open_file(&self, relative_path: &Path) -> AnyResult<File> {
    File::open(self.path(relative_path))
      .with_context(|| format!("Failed to open file '{}'", relative_path.display()))
  }

  pub fn read_text_file<P: AsRef<Path>>(&self, relative_path: P) -> AnyResult<String> {
    self._read_text_file(relative_path.as_ref())
  }

  fn _read_text_file(&self, relative_path: &Path) -> AnyResult<String> {
    let mut file = self._open_file(relative_path)?;
    let mut text = String::with_capacity(file.metadata().map_or(0, |m| m.len() as usize + 1));
    file
      .read_to_string(&mut text)
      .with_context(|| format!("Failed to read file '{}'", relative_path.display()))?;
    Ok(text)
  }

  pub fn load_shader(&self, path: &str, shader_type: cgl::ShaderType, ctx: cgl::SharedContext) -> AnyResult<cgl::Shader> {
    let src = self.read_text_file(path)?;
    let shader = cgl::Shader::compile(ctx, shader_type, &src)
      .with_context(|| format!("Failed to compile the shader '{}'", path))?;
    shader.set_debug_label(path.as_bytes());
    Ok(shader)
  }

  pub fn load_texture(
    &self,
    path: &str,
    config: cgl::TextureConfig,
    ctx: cgl::SharedContext,
  ) -> AnyResult<cgl::Texture2D> {
    let file = self.open_file(path)?;
    let image = decode_png(file).with_context(|| format!("Failed to decode '{}'", path))?;
    let texture = create_texture(ctx, config, &image)?;
    texture.set_debug_label(path.as_bytes());
    Ok(texture)
  }
}

/// A decoded 8-bit image.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
  pub size: Vec2u32,
  pub format: cgl::TextureFormat,
  pub data: Vec<u8>,
}

pub fn decode_png<R: Read>(reader: R) -> AnyResult<Image> {
  let decoder = png::Decoder::new(reader);
  let mut reader = decoder.read_info()?;
  let mut buf = vec![0; reader.output_buffer_size()];
  let info = reader.next_frame(&mut buf)?;
  buf.truncate(info.buffer_size());

  use png::{BitDepth, ColorType};

  if info.bit_depth != BitDepth::Eight {
    bail!("Unsupported texture bit depth: {:?}", info.bit_depth);
  }

  use cgl::TextureFormat as GlFormat;
  let format = match info.color_type {
    ColorType::Grayscale => GlFormat::Luminance,
    ColorType::Rgb => GlFormat::RGB,
    ColorType::GrayscaleAlpha => GlFormat::LuminanceAlpha,
    ColorType::Rgba => GlFormat::RGBA,
    _ => bail!("Unsupported texture color type: {:?}", info.color_type),
  };

  Ok(Image { size: vec2(info.width, info.height), format, data: buf })
}

/// A two-colour RGBA checkerboard, used when no texture file is configured.
pub fn checkerboard(size: u32, cells: u32, a: Colorf, b: Colorf) -> Image {
  let to_bytes = |c: Colorf| {
    let channel = |x: f32| (x.clamp(0.0, 1.0) * 255.0).round() as u8;
    [channel(c.r), channel(c.g), channel(c.b), channel(c.a)]
  };
  let (a, b) = (to_bytes(a), to_bytes(b));
  let cell_size = (size / cells.max(1)).max(1);

  let mut data = Vec::with_capacity(size as usize * size as usize * 4);
  for y in 0..size {
    for x in 0..size {
      let is_even = (x / cell_size + y / cell_size) % 2 == 0;
      data.extend_from_slice(if is_even { &a } else { &b });
    }
  }
  Image { size: vec2n(size), format: cgl::TextureFormat::RGBA, data }
}

pub fn create_texture(
  ctx: cgl::SharedContext,
  mut config: cgl::TextureConfig,
  image: &Image,
) -> AnyResult<cgl::Texture2D> {
  config.format = image.format;
  let mut texture = cgl::Texture2D::new(ctx, config)?;
  texture.set_image(image.size, Some(&image.data))?;
  Ok(texture)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn checkerboard_alternates_cells() {
    let image = checkerboard(4, 2, Colorf::WHITE, Colorf::BLACK);
    assert_eq!(image.size, vec2(4, 4));
    assert_eq!(image.data.len(), 4 * 4 * 4);

    let pixel = |x: usize, y: usize| &image.data[(y * 4 + x) * 4..][..4];
    assert_eq!(pixel(0, 0), &[255, 255, 255, 255]);
    assert_eq!(pixel(1, 1), &[255, 255, 255, 255]);
    assert_eq!(pixel(2, 0), &[0, 0, 0, 255]);
    assert_eq!(pixel(0, 2), &[0, 0, 0, 255]);
    assert_eq!(pixel(3, 3), &[255, 255, 255, 255]);
  }

  #[test]
  fn decodes_png_images() {
    let mut encoded = Vec::new();
    {
      let mut encoder = png::Encoder::new(&mut encoded, 2, 1);
      encoder.set_color(png::ColorType::Rgb);
      encoder.set_depth(png::BitDepth::Eight);
      let mut writer = encoder.write_header().unwrap();
      writer.write_image_data(&[255, 0, 0, 0, 255, 0]).unwrap();
    }

    let image = decode_png(encoded.as_slice()).unwrap();
    assert_eq!(image.size, vec2(2, 1));
    assert_eq!(image.format, cgl::TextureFormat::RGB);
    assert_eq!(image.data, vec![255, 0, 0, 0, 255, 0]);
  }

  #[test]
  fn rejects_sixteen_bit_images() {
    let mut encoded = Vec::new();
    {
      let mut encoder = png::Encoder::new(&mut encoded, 1, 1);
      encoder.set_color(png::ColorType::Grayscale);
      encoder.set_depth(png::BitDepth::Sixteen);
      let mut writer = encoder.write_header().unwrap();
      writer.write_image_data(&[0x12, 0x34]).unwrap();
    }
    assert!(decode_png(encoded.as_slice()).is_err());
  }
}
