//! CPU-side mesh data: attribute streams plus the index stream.

use prelude_plus::*;

gl_enum!({
  pub enum DataType {
    Byte = BYTE,
    UnsignedByte = UNSIGNED_BYTE,
    Short = SHORT,
    UnsignedShort = UNSIGNED_SHORT,
    Int = INT,
    UnsignedInt = UNSIGNED_INT,
    HalfFloat = HALF_FLOAT,
    Float = FLOAT,
    Double = DOUBLE,
  }
});

impl DataType {
  pub fn byte_size(self) -> usize {
    match self {
      Self::Byte | Self::UnsignedByte => 1,
      Self::Short | Self::UnsignedShort | Self::HalfFloat => 2,
      Self::Int | Self::UnsignedInt | Self::Float => 4,
      Self::Double => 8,
    }
  }

  pub fn is_integer(self) -> bool {
    matches!(
      self,
      Self::Byte | Self::UnsignedByte | Self::Short | Self::UnsignedShort | Self::Int | Self::UnsignedInt
    )
  }

  pub fn is_signed(self) -> bool {
    !matches!(self, Self::UnsignedByte | Self::UnsignedShort | Self::UnsignedInt)
  }

  /// `log2(byte_size)`, i.e. multiplying a count by the byte size is a left shift.
  #[inline]
  pub fn multiply_shift(self) -> u32 { self.byte_size().trailing_zeros() }
}

/// How attribute data reaches the shader.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum UploadMode {
  /// Integers are converted to floats as-is.
  ToFloat,
  /// Integers are converted to floats in `[0; 1]` or `[-1; 1]`.
  ToFloatNormalize,
  /// Integers stay integers. OpenGL 3.0 only.
  KeepInt,
}

impl Default for UploadMode {
  fn default() -> Self { Self::ToFloat }
}

impl UploadMode {
  #[inline(always)]
  pub fn normalize(self) -> bool { self == Self::ToFloatNormalize }
  #[inline(always)]
  pub fn to_float(self) -> bool { self != Self::KeepInt }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VertexAttribute {
  name: String,
  data_type: DataType,
  size: u32,
  upload_mode: UploadMode,
  data: Vec<u8>,
}

impl VertexAttribute {
  #[inline(always)]
  pub fn name(&self) -> &str { &self.name }
  #[inline(always)]
  pub fn data_type(&self) -> DataType { self.data_type }
  /// Components per vertex, 1 to 4.
  #[inline(always)]
  pub fn size(&self) -> u32 { self.size }
  #[inline(always)]
  pub fn upload_mode(&self) -> UploadMode { self.upload_mode }
  #[inline(always)]
  pub fn data(&self) -> &[u8] { &self.data }

  pub fn new(name: impl Into<String>, data_type: DataType, size: u32) -> Self {
    Self::with_upload_mode(name, data_type, size, UploadMode::default())
  }

  pub fn with_upload_mode(
    name: impl Into<String>,
    data_type: DataType,
    size: u32,
    upload_mode: UploadMode,
  ) -> Self {
    Self { name: name.into(), data_type, size, upload_mode, data: Vec::new() }
  }

  /// Replaces the data with the bytes of `data`. The element type is not
  /// checked against [`DataType`].
  pub fn set_data<T: bytemuck::Pod>(&mut self, data: &[T]) {
    self.set_raw_data(bytemuck::cast_slice(data));
  }

  pub fn set_raw_data(&mut self, data: &[u8]) {
    self.data.clear();
    self.data.extend_from_slice(data);
  }

  #[inline]
  pub fn clear_data(&mut self) { self.data.clear(); }

  #[inline]
  pub fn vertex_stride(&self) -> usize { self.data_type.byte_size() * self.size as usize }

  /// Whole vertices stored in the data.
  pub fn element_count(&self) -> usize {
    match self.vertex_stride() {
      0 => 0,
      stride => self.data.len() / stride,
    }
  }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct VertexData {
  attributes: Vec<VertexAttribute>,
  name_to_index: HashMap<String, usize>,
  indices: Vec<u32>,
}

impl VertexData {
  pub fn new() -> Self { Self::default() }

  #[inline(always)]
  pub fn attributes(&self) -> &[VertexAttribute] { &self.attributes }
  #[inline(always)]
  pub fn attribute_count(&self) -> usize { self.attributes.len() }
  #[inline(always)]
  pub fn indices(&self) -> &[u32] { &self.indices }
  #[inline(always)]
  pub fn indices_mut(&mut self) -> &mut Vec<u32> { &mut self.indices }
  #[inline(always)]
  pub fn indices_count(&self) -> usize { self.indices.len() }
  #[inline(always)]
  pub fn indices_bytes(&self) -> &[u8] { bytemuck::cast_slice(&self.indices) }

  pub fn set_indices(&mut self, indices: impl Into<Vec<u32>>) { self.indices = indices.into(); }

  /// Appends an attribute and returns its index, which is also the attribute
  /// location it will be bound to. An attribute with the same name is replaced
  /// in place, keeping its index.
  pub fn add_attribute(&mut self, attribute: VertexAttribute) -> usize {
    if let Some(&index) = self.name_to_index.get(attribute.name()) {
      self.attributes[index] = attribute;
      return index;
    }
    let index = self.attributes.len();
    self.name_to_index.insert(attribute.name.clone(), index);
    self.attributes.push(attribute);
    index
  }

  #[inline]
  pub fn attribute(&self, index: usize) -> Option<&VertexAttribute> { self.attributes.get(index) }

  #[inline]
  pub fn attribute_mut(&mut self, index: usize) -> Option<&mut VertexAttribute> {
    self.attributes.get_mut(index)
  }

  #[inline]
  pub fn attribute_index(&self, name: &str) -> Option<usize> { self.name_to_index.get(name).copied() }

  #[inline]
  pub fn attribute_by_name(&self, name: &str) -> Option<&VertexAttribute> {
    self.attribute_index(name).map(|index| &self.attributes[index])
  }

  #[inline]
  pub fn has_attribute(&self, name: &str) -> bool { self.name_to_index.contains_key(name) }

  /// Removes an attribute. The attributes after it shift down by one index.
  pub fn remove_attribute(&mut self, name: &str) -> Option<VertexAttribute> {
    let index = self.name_to_index.remove(name)?;
    let removed = self.attributes.remove(index);
    for other_index in self.name_to_index.values_mut() {
      if *other_index > index {
        *other_index -= 1;
      }
    }
    Some(removed)
  }

  /// `(index, name)` pairs for binding attribute locations before linking.
  pub fn attribute_bindings(&self) -> Vec<(u32, &str)> {
    self.attributes.iter().enumerate().map(|(i, attribute)| (i as u32, attribute.name())).collect()
  }

  pub fn clear(&mut self) {
    self.attributes.clear();
    self.name_to_index.clear();
    self.indices.clear();
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn data_type_sizes() {
    assert_eq!(DataType::Byte.byte_size(), 1);
    assert_eq!(DataType::HalfFloat.byte_size(), 2);
    assert_eq!(DataType::Float.byte_size(), 4);
    assert_eq!(DataType::Double.byte_size(), 8);
    assert_eq!(DataType::Double.multiply_shift(), 3);
    assert_eq!(DataType::Byte.multiply_shift(), 0);
    for data_type in DataType::VARIANTS {
      assert_eq!(1 << data_type.multiply_shift(), data_type.byte_size());
    }
  }

  #[test]
  fn data_type_classification() {
    assert!(DataType::UnsignedShort.is_integer());
    assert!(!DataType::UnsignedShort.is_signed());
    assert!(!DataType::HalfFloat.is_integer());
    assert!(DataType::Float.is_signed());
  }

  #[test]
  fn upload_modes() {
    assert_eq!(UploadMode::default(), UploadMode::ToFloat);
    assert!(UploadMode::ToFloatNormalize.normalize());
    assert!(UploadMode::ToFloatNormalize.to_float());
    assert!(!UploadMode::KeepInt.to_float());
    assert!(!UploadMode::KeepInt.normalize());
  }

  #[test]
  fn attribute_data_is_stored_as_bytes() {
    let mut positions = VertexAttribute::new("positions", DataType::Float, 3);
    positions.set_data(&[0.0f32, 1.0, 2.0, 3.0, 4.0, 5.0]);
    assert_eq!(positions.data().len(), 6 * 4);
    assert_eq!(positions.element_count(), 2);
    assert_eq!(&positions.data()[4..8], &1.0f32.to_ne_bytes());

    positions.clear_data();
    assert!(positions.data().is_empty());
    assert_eq!(positions.element_count(), 0);
  }

  #[test]
  fn partial_vertices_are_not_counted() {
    let mut colors = VertexAttribute::new("colors", DataType::UnsignedByte, 4);
    colors.set_raw_data(&[255; 10]);
    assert_eq!(colors.element_count(), 2);
  }

  #[test]
  fn attributes_are_addressed_by_index_and_name() {
    let mut data = VertexData::new();
    assert_eq!(data.add_attribute(VertexAttribute::new("positions", DataType::Float, 3)), 0);
    assert_eq!(data.add_attribute(VertexAttribute::new("normals", DataType::Float, 3)), 1);
    assert_eq!(data.add_attribute(VertexAttribute::new("uvs", DataType::Float, 2)), 2);

    assert_eq!(data.attribute_count(), 3);
    assert_eq!(data.attribute_index("normals"), Some(1));
    assert_eq!(data.attribute_by_name("uvs").map(|a| a.size()), Some(2));
    assert!(data.attribute(3).is_none());
    assert_eq!(data.attribute_bindings(), vec![(0, "positions"), (1, "normals"), (2, "uvs")]);
  }

  #[test]
  fn adding_an_existing_name_replaces_it() {
    let mut data = VertexData::new();
    data.add_attribute(VertexAttribute::new("positions", DataType::Float, 3));
    data.add_attribute(VertexAttribute::new("uvs", DataType::Float, 2));
    let index = data.add_attribute(VertexAttribute::new("positions", DataType::Float, 2));
    assert_eq!(index, 0);
    assert_eq!(data.attribute_count(), 2);
    assert_eq!(data.attribute(0).map(|a| a.size()), Some(2));
  }

  #[test]
  fn removing_shifts_later_indices() {
    let mut data = VertexData::new();
    data.add_attribute(VertexAttribute::new("positions", DataType::Float, 3));
    data.add_attribute(VertexAttribute::new("normals", DataType::Float, 3));
    data.add_attribute(VertexAttribute::new("uvs", DataType::Float, 2));

    let removed = data.remove_attribute("normals");
    assert_eq!(removed.map(|a| a.name().to_owned()), Some("normals".to_owned()));
    assert!(!data.has_attribute("normals"));
    assert_eq!(data.attribute_index("uvs"), Some(1));
    assert_eq!(data.remove_attribute("normals"), None);
  }

  #[test]
  fn indices_as_bytes() {
    let mut data = VertexData::new();
    data.set_indices(vec![0, 1, 2, 2, 3, 0]);
    assert_eq!(data.indices_count(), 6);
    assert_eq!(data.indices_bytes().len(), 6 * 4);
    data.indices_mut().push(1);
    assert_eq!(data.indices_count(), 7);

    data.clear();
    assert_eq!(data.indices_count(), 0);
    assert_eq!(data.attribute_count(), 0);
  }
}
