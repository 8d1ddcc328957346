use crate::impl_prelude::*;
use crate::{
  Buffer, BufferTarget, BufferUsage, DataType, GlApiVersion, UploadMode, VertexArrayExtension, VertexData,
};
use prelude_plus::*;

gl_enum!({
  pub enum DrawingMode {
    Points = POINTS,
    Lines = LINES,
    LineLoop = LINE_LOOP,
    LineStrip = LINE_STRIP,
    Triangles = TRIANGLES,
    TriangleStrip = TRIANGLE_STRIP,
    TriangleFan = TRIANGLE_FAN,
  }
});

impl Default for DrawingMode {
  fn default() -> Self { Self::Triangles }
}

gl_enum!({
  pub enum PolygonMode {
    Point = POINT,
    Line = LINE,
    Fill = FILL,
  }
});

impl Default for PolygonMode {
  fn default() -> Self { Self::Fill }
}

/// The part of the index stream that gets drawn.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct IndexRange {
  total: usize,
  offset: usize,
  count: usize,
}

impl IndexRange {
  /// Indices currently stored in the index buffer.
  #[inline(always)]
  pub fn total(&self) -> usize { self.total }
  #[inline(always)]
  pub fn offset(&self) -> usize { self.offset }
  #[inline(always)]
  pub fn count(&self) -> usize { self.count }

  /// Re-fits the range after the index stream was replaced with `total`
  /// indices. An unset count selects everything.
  pub fn on_data_replaced(&mut self, total: usize) {
    self.total = total;
    self.count = if self.count == 0 { total } else { self.count.min(total) };
    self.offset = self.offset.min(self.count.saturating_sub(1));
    self.count -= self.offset;
  }

  pub fn set_offset(&mut self, offset: usize) {
    self.offset = offset.min(self.total.saturating_sub(1));
    self.count = self.count.min(self.total - self.offset);
  }

  /// Zero selects every index after the offset.
  pub fn set_count(&mut self, count: usize) {
    let available = self.total.saturating_sub(self.offset);
    self.count = if count == 0 { available } else { count.min(available) };
  }

  /// Byte offset into the index buffer, as passed to `glDrawElements`.
  #[inline]
  pub fn byte_offset(&self) -> usize { self.offset << DataType::UnsignedInt.multiply_shift() }

  /// The count as passed to `glDrawElements`.
  pub fn draw_count(&self) -> Result<GLsizei> {
    GLsizei::try_from(self.count).map_err(|_| Error::TooManyIndices(self.count))
  }
}

/// Pointer layout of one attribute stream.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
struct AttributeLayout {
  size: i32,
  data_type: DataType,
  upload_mode: UploadMode,
}

impl AttributeLayout {
  /// # Safety
  ///
  /// The attribute's buffer must be bound to `GL_ARRAY_BUFFER`.
  unsafe fn specify(&self, gl: &RawGL, location: u32) {
    if self.upload_mode.to_float() {
      gl.VertexAttribPointer(
        location,
        self.size,
        self.data_type.as_raw(),
        self.upload_mode.normalize() as GLboolean,
        0,
        ptr::null(),
      );
    } else {
      gl.VertexAttribIPointer(location, self.size, self.data_type.as_raw(), 0, ptr::null());
    }
    gl.EnableVertexAttribArray(location);
  }
}

/// Checks that every attribute of `vertex_data` can be uploaded on
/// `api_version` and returns the pointer layouts. KeepInt on floating-point
/// data falls back to ToFloat.
fn validate_attributes(api_version: GlApiVersion, vertex_data: &VertexData) -> Result<Vec<AttributeLayout>> {
  vertex_data
    .attributes()
    .iter()
    .map(|attribute| {
      let size = attribute.size();
      if !(1..=4).contains(&size) {
        return Err(Error::InvalidAttributeSize { name: attribute.name().to_owned(), size });
      }

      let data_type = attribute.data_type();
      let mut upload_mode = attribute.upload_mode();
      if !upload_mode.to_float() {
        if !data_type.is_integer() {
          upload_mode = UploadMode::ToFloat;
        } else if !api_version.is_gl30() {
          return Err(Error::UnsupportedUploadMode {
            name: attribute.name().to_owned(),
            mode: upload_mode,
            data_type,
          });
        }
      }

      Ok(AttributeLayout { size: size as i32, data_type, upload_mode })
    })
    .collect()
}

/// A mesh on the GPU: one buffer per attribute stream plus an index buffer.
#[derive(Debug)]
pub struct VertexArray {
  ctx: SharedContext,
  /// Zero when the context has no vertex array objects.
  addr: u32,
  extension: VertexArrayExtension,

  index_buffer: Buffer,
  attribute_buffers: Vec<Buffer>,
  layouts: Vec<AttributeLayout>,

  range: IndexRange,
  drawing_mode: DrawingMode,
  polygon_mode: PolygonMode,
}

unsafe impl Object for VertexArray {
  const DEBUG_TYPE_ID: u32 = gl::VERTEX_ARRAY;

  #[inline(always)]
  fn ctx(&self) -> &SharedContext { &self.ctx }
  #[inline(always)]
  fn addr(&self) -> u32 { self.addr }
}

impl VertexArray {
  #[inline(always)]
  pub fn index_range(&self) -> IndexRange { self.range }
  #[inline(always)]
  pub fn drawing_mode(&self) -> DrawingMode { self.drawing_mode }
  #[inline(always)]
  pub fn polygon_mode(&self) -> PolygonMode { self.polygon_mode }
  #[inline(always)]
  pub fn attribute_buffers(&self) -> &[Buffer] { &self.attribute_buffers }
  #[inline(always)]
  pub fn index_buffer(&self) -> &Buffer { &self.index_buffer }

  pub fn new(ctx: SharedContext) -> Result<Self> {
    let extension = ctx.vertex_array_extension();
    let addr = extension.gen(ctx.raw_gl());
    let index_buffer = Buffer::new(ctx.clone(), BufferTarget::ElementArray, BufferUsage::StaticDraw);
    ctx.check_error()?;

    Ok(Self {
      ctx,
      addr,
      extension,

      index_buffer,
      attribute_buffers: Vec::new(),
      layouts: Vec::new(),

      range: IndexRange::default(),
      drawing_mode: DrawingMode::default(),
      polygon_mode: PolygonMode::default(),
    })
  }

  /// Uploads a mesh, replacing the previous one. Buffers are reused by
  /// position, each one deciding on its own whether to reallocate.
  pub fn set_data(&mut self, vertex_data: &VertexData) -> Result<()> {
    let layouts = validate_attributes(self.ctx.api_version(), vertex_data)?;
    let gl = self.ctx.raw_gl();

    // the element array binding would otherwise end up in whichever VAO is bound
    self.ctx.bound_vertex_array.bind_if_needed(gl, self.extension, 0);
    self.index_buffer.upload(vertex_data.indices_bytes());
    self.range.on_data_replaced(vertex_data.indices_count());

    let attribute_count = layouts.len();
    self.attribute_buffers.truncate(attribute_count);
    while self.attribute_buffers.len() < attribute_count {
      self.attribute_buffers.push(Buffer::new(self.ctx.clone(), BufferTarget::Array, BufferUsage::StaticDraw));
    }

    if self.extension.has() {
      self.ctx.bound_vertex_array.bind_if_needed(gl, self.extension, self.addr);
    }
    for (location, (attribute, buffer)) in
      vertex_data.attributes().iter().zip(&self.attribute_buffers).enumerate()
    {
      buffer.upload(attribute.data());
      if self.extension.has() {
        buffer.bind_for_draw();
        unsafe { layouts[location].specify(gl, location as u32) };
      }
    }
    if self.extension.has() {
      // locations left over from a previous mesh would point at deleted buffers
      for location in attribute_count..self.layouts.len() {
        unsafe { gl.DisableVertexAttribArray(location as u32) };
      }
    }
    self.ctx.bound_array_buffer.unbind_unconditionally(gl);
    if self.extension.has() {
      self.ctx.bound_vertex_array.bind_if_needed(gl, self.extension, 0);
    }
    self.layouts = layouts;

    trace!(
      "Vertex array #{}: {} attribute(s), {} indices",
      self.addr,
      attribute_count,
      self.range.total(),
    );
    self.ctx.check_error()
  }

  #[inline]
  pub fn set_drawing_mode(&mut self, mode: DrawingMode) { self.drawing_mode = mode; }

  #[inline]
  pub fn set_polygon_mode(&mut self, mode: PolygonMode) { self.polygon_mode = mode; }

  #[inline]
  pub fn set_indices_offset(&mut self, offset: usize) { self.range.set_offset(offset); }

  #[inline]
  pub fn set_indices_count(&mut self, count: usize) { self.range.set_count(count); }

  /// Draws the selected index range with the program that is currently bound.
  pub fn draw(&self) -> Result<()> {
    let count = self.range.draw_count()?;
    let gl = self.ctx.raw_gl();

    if self.extension.has() {
      self.ctx.bound_vertex_array.bind_if_needed(gl, self.extension, self.addr);
    } else {
      for (location, (layout, buffer)) in self.layouts.iter().zip(&self.attribute_buffers).enumerate() {
        buffer.bind_for_draw();
        unsafe { layout.specify(gl, location as u32) };
      }
      self.ctx.bound_array_buffer.unbind_unconditionally(gl);
    }

    self.index_buffer.bind_for_draw();
    unsafe {
      gl.PolygonMode(gl::FRONT_AND_BACK, self.polygon_mode.as_raw());
      gl.DrawElements(
        self.drawing_mode.as_raw(),
        count,
        gl::UNSIGNED_INT,
        self.range.byte_offset() as *const c_void,
      );
    }
    self.index_buffer.unbind();

    if !self.extension.has() {
      for location in 0..self.layouts.len() {
        unsafe { gl.DisableVertexAttribArray(location as u32) };
      }
    }

    self.ctx.check_error()
  }
}

impl Drop for VertexArray {
  fn drop(&mut self) {
    if self.extension.has() {
      self.ctx.bound_vertex_array.on_object_deleted(self.addr);
      self.extension.delete(self.raw_gl(), self.addr);
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::VertexAttribute;

  fn range(total: usize, offset: usize, count: usize) -> IndexRange { IndexRange { total, offset, count } }

  #[test]
  fn first_upload_selects_everything() {
    let mut r = IndexRange::default();
    r.on_data_replaced(36);
    assert_eq!(r, range(36, 0, 36));
    assert_eq!(r.byte_offset(), 0);
  }

  #[test]
  fn replacing_data_clamps_the_count() {
    let mut r = range(36, 0, 36);
    r.on_data_replaced(12);
    assert_eq!(r, range(12, 0, 12));

    // a larger stream keeps an explicitly smaller count
    let mut r = range(12, 0, 6);
    r.on_data_replaced(100);
    assert_eq!(r, range(100, 0, 6));
  }

  #[test]
  fn replacing_data_keeps_the_offset_inside_the_count() {
    let mut r = range(10, 8, 2);
    r.on_data_replaced(5);
    // count = min(2, 5) = 2, offset = min(8, 1) = 1, count = 2 - 1
    assert_eq!(r, range(5, 1, 1));

    let mut r = range(10, 2, 8);
    r.on_data_replaced(10);
    assert_eq!(r, range(10, 2, 6));
  }

  #[test]
  fn replacing_with_an_empty_stream_selects_nothing() {
    let mut r = range(10, 3, 7);
    r.on_data_replaced(0);
    assert_eq!(r, range(0, 0, 0));

    let mut r = IndexRange::default();
    r.on_data_replaced(0);
    assert_eq!(r, range(0, 0, 0));
  }

  #[test]
  fn offset_is_clamped_to_the_last_index() {
    let mut r = range(10, 0, 10);
    r.set_offset(4);
    assert_eq!(r, range(10, 4, 6));
    assert_eq!(r.byte_offset(), 16);

    r.set_offset(50);
    assert_eq!(r, range(10, 9, 1));

    let mut empty = IndexRange::default();
    empty.set_offset(3);
    assert_eq!(empty, range(0, 0, 0));
  }

  #[test]
  fn offset_keeps_a_smaller_count() {
    let mut r = range(10, 0, 3);
    r.set_offset(2);
    assert_eq!(r, range(10, 2, 3));
  }

  #[test]
  fn zero_count_selects_the_rest() {
    let mut r = range(10, 4, 2);
    r.set_count(0);
    assert_eq!(r, range(10, 4, 6));
  }

  #[test]
  fn count_is_clamped_to_the_rest() {
    let mut r = range(10, 4, 6);
    r.set_count(3);
    assert_eq!(r, range(10, 4, 3));
    r.set_count(100);
    assert_eq!(r, range(10, 4, 6));

    let mut empty = IndexRange::default();
    empty.set_count(5);
    assert_eq!(empty, range(0, 0, 0));
  }

  #[test]
  fn draw_count_rejects_what_glsizei_cannot_hold() {
    assert_eq!(range(36, 0, 36).draw_count().unwrap(), 36);
    let max = GLsizei::MAX as usize;
    assert_eq!(range(max, 0, max).draw_count().unwrap(), GLsizei::MAX);
    assert!(matches!(range(max + 1, 0, max + 1).draw_count(), Err(Error::TooManyIndices(n)) if n == max + 1));
  }

  fn mesh(attributes: &[(&str, DataType, u32, UploadMode)]) -> VertexData {
    let mut data = VertexData::new();
    for &(name, data_type, size, upload_mode) in attributes {
      data.add_attribute(VertexAttribute::with_upload_mode(name, data_type, size, upload_mode));
    }
    data
  }

  #[test]
  fn keep_int_on_floats_falls_back_to_float() {
    let data = mesh(&[("positions", DataType::Float, 3, UploadMode::KeepInt)]);
    for api_version in [GlApiVersion::Gl20, GlApiVersion::Gl30] {
      let layouts = validate_attributes(api_version, &data).unwrap();
      assert_eq!(layouts, vec![AttributeLayout {
        size: 3,
        data_type: DataType::Float,
        upload_mode: UploadMode::ToFloat,
      }]);
    }
  }

  #[test]
  fn keep_int_on_integers_needs_gl30() {
    let data = mesh(&[
      ("positions", DataType::Float, 3, UploadMode::ToFloat),
      ("bone_ids", DataType::UnsignedByte, 4, UploadMode::KeepInt),
    ]);

    let layouts = validate_attributes(GlApiVersion::Gl30, &data).unwrap();
    assert_eq!(layouts[1].upload_mode, UploadMode::KeepInt);

    match validate_attributes(GlApiVersion::Gl20, &data) {
      Err(Error::UnsupportedUploadMode { name, mode, data_type }) => {
        assert_eq!(name, "bone_ids");
        assert_eq!(mode, UploadMode::KeepInt);
        assert_eq!(data_type, DataType::UnsignedByte);
      }
      other => panic!("unexpected result: {:?}", other),
    }
  }

  #[test]
  fn integers_converted_to_float_work_everywhere() {
    let data = mesh(&[("colors", DataType::UnsignedByte, 4, UploadMode::ToFloatNormalize)]);
    let layouts = validate_attributes(GlApiVersion::Gl20, &data).unwrap();
    assert_eq!(layouts[0].upload_mode, UploadMode::ToFloatNormalize);
  }

  #[test]
  fn attribute_size_must_be_one_to_four() {
    for size in 1..=4 {
      let data = mesh(&[("a", DataType::Float, size, UploadMode::ToFloat)]);
      assert!(validate_attributes(GlApiVersion::Gl20, &data).is_ok(), "size {}", size);
    }
    for size in [0, 5, 16] {
      let data = mesh(&[("a", DataType::Float, size, UploadMode::ToFloat)]);
      match validate_attributes(GlApiVersion::Gl30, &data) {
        Err(Error::InvalidAttributeSize { name, size: reported }) => {
          assert_eq!(name, "a");
          assert_eq!(reported, size);
        }
        other => panic!("size {}: unexpected result: {:?}", size, other),
      }
    }
  }

  #[test]
  fn default_modes() {
    assert_eq!(DrawingMode::default(), DrawingMode::Triangles);
    assert_eq!(PolygonMode::default(), PolygonMode::Fill);
    assert_eq!(DrawingMode::from_raw(gl::LINE_STRIP), Some(DrawingMode::LineStrip));
  }

  mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn assert_fits(r: &IndexRange) -> std::result::Result<(), TestCaseError> {
      prop_assert!(r.offset() + r.count() <= r.total(), "{:?}", r);
      prop_assert!(r.offset() < r.total() || r.total() == 0, "{:?}", r);
      Ok(())
    }

    proptest! {
      #[test]
      fn replacing_data_keeps_the_range_inside(
        old_total in 0_usize..1000,
        offset in 0_usize..1000,
        count in 0_usize..1000,
        new_total in 0_usize..1000,
      ) {
        let mut r = IndexRange::default();
        r.on_data_replaced(old_total);
        r.set_offset(offset);
        r.set_count(count);
        assert_fits(&r)?;
        r.on_data_replaced(new_total);
        prop_assert_eq!(r.total(), new_total);
        assert_fits(&r)?;
      }

      #[test]
      fn setters_keep_the_range_inside(
        total in 0_usize..1000,
        ops in prop::collection::vec((any::<bool>(), 0_usize..2000), 0..16),
      ) {
        let mut r = IndexRange::default();
        r.on_data_replaced(total);
        for (is_offset, value) in ops {
          if is_offset {
            r.set_offset(value);
          } else {
            r.set_count(value);
          }
          assert_fits(&r)?;
        }
      }

      #[test]
      fn zero_count_selects_everything_after_the_offset(total in 1_usize..1000, offset in 0_usize..1000) {
        let mut r = IndexRange::default();
        r.on_data_replaced(total);
        r.set_offset(offset);
        r.set_count(0);
        prop_assert_eq!(r.offset() + r.count(), total);
      }
    }
  }
}
