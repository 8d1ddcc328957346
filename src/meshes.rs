//! Meshes drawn by the demo. Every mesh has the same attributes in the same
//! order, so one linked program works with all of them.

use caustic_gl::{DataType, UploadMode, VertexAttribute, VertexData};

pub const POSITIONS_ATTRIBUTE: &str = "positions";
pub const TEXTURE_COORDS_ATTRIBUTE: &str = "textureCoords";
pub const COLORS_ATTRIBUTE: &str = "colors";

#[derive(Debug, Default)]
struct MeshBuilder {
  positions: Vec<[f32; 3]>,
  texture_coords: Vec<[f32; 2]>,
  colors: Vec<[u8; 4]>,
  indices: Vec<u32>,
}

impl MeshBuilder {
  fn vertex(&mut self, position: [f32; 3], texture_coords: [f32; 2], color: [u8; 4]) -> u32 {
    let index = self.positions.len() as u32;
    self.positions.push(position);
    self.texture_coords.push(texture_coords);
    self.colors.push(color);
    index
  }

  fn triangle(&mut self, corners: [([f32; 3], [f32; 2]); 3], color: [u8; 4]) {
    for (position, uv) in corners.iter().copied() {
      let index = self.vertex(position, uv, color);
      self.indices.push(index);
    }
  }

  /// Corners go counter-clockwise when looking at the front side.
  fn quad(&mut self, corners: [[f32; 3]; 4], color: [u8; 4]) {
    const UVS: [[f32; 2]; 4] = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];
    let first = self.positions.len() as u32;
    for (position, uv) in corners.iter().zip(UVS.iter()) {
      self.vertex(*position, *uv, color);
    }
    self.indices.extend_from_slice(&[first, first + 1, first + 2, first, first + 2, first + 3]);
  }

  fn build(self) -> VertexData {
    let mut data = VertexData::new();

    let mut positions = VertexAttribute::new(POSITIONS_ATTRIBUTE, DataType::Float, 3);
    positions.set_data(&self.positions);
    data.add_attribute(positions);

    let mut texture_coords = VertexAttribute::new(TEXTURE_COORDS_ATTRIBUTE, DataType::Float, 2);
    texture_coords.set_data(&self.texture_coords);
    data.add_attribute(texture_coords);

    let mut colors =
      VertexAttribute::with_upload_mode(COLORS_ATTRIBUTE, DataType::UnsignedByte, 4, UploadMode::ToFloatNormalize);
    colors.set_data(&self.colors);
    data.add_attribute(colors);

    data.set_indices(self.indices);
    data
  }
}

const WHITE: [u8; 4] = [0xff, 0xff, 0xff, 0xff];

/// A unit cube centered at the origin, with each face textured separately.
pub fn cube() -> VertexData {
  let mut mesh = MeshBuilder::default();
  let h = 0.5;
  // front, back
  mesh.quad([[-h, -h, h], [h, -h, h], [h, h, h], [-h, h, h]], WHITE);
  mesh.quad([[h, -h, -h], [-h, -h, -h], [-h, h, -h], [h, h, -h]], WHITE);
  // right, left
  mesh.quad([[h, -h, h], [h, -h, -h], [h, h, -h], [h, h, h]], WHITE);
  mesh.quad([[-h, -h, -h], [-h, -h, h], [-h, h, h], [-h, h, -h]], WHITE);
  // top, bottom
  mesh.quad([[-h, h, h], [h, h, h], [h, h, -h], [-h, h, -h]], WHITE);
  mesh.quad([[-h, -h, -h], [h, -h, -h], [h, -h, h], [-h, -h, h]], WHITE);
  mesh.build()
}

/// A square pyramid standing on the `y = -0.5` plane, its sides tinted.
pub fn pyramid() -> VertexData {
  let mut mesh = MeshBuilder::default();
  let h = 0.5;
  let apex = [0.0, h, 0.0];
  let base = [[-h, -h, h], [h, -h, h], [h, -h, -h], [-h, -h, -h]];
  #[rustfmt::skip]
  let side_colors = [
    [0xff, 0x80, 0x80, 0xff],
    [0x80, 0xff, 0x80, 0xff],
    [0x80, 0x80, 0xff, 0xff],
    [0xff, 0xff, 0x80, 0xff],
  ];

  for (i, color) in side_colors.iter().enumerate() {
    let a = base[i];
    let b = base[(i + 1) % base.len()];
    mesh.triangle([(a, [0.0, 0.0]), (b, [1.0, 0.0]), (apex, [0.5, 1.0])], *color);
  }
  mesh.quad([base[3], base[2], base[1], base[0]], WHITE);
  mesh.build()
}

#[cfg(test)]
mod tests {
  use super::*;

  fn assert_well_formed(data: &VertexData) {
    let vertices = data.attribute(0).unwrap().element_count();
    assert!(vertices > 0);
    for attribute in data.attributes() {
      assert_eq!(attribute.element_count(), vertices, "attribute {}", attribute.name());
    }
    assert_eq!(data.indices_count() % 3, 0);
    assert!(data.indices().iter().all(|&i| (i as usize) < vertices));
  }

  #[test]
  fn cube_layout() {
    let cube = cube();
    assert_well_formed(&cube);
    assert_eq!(cube.attribute(0).unwrap().element_count(), 24);
    assert_eq!(cube.indices_count(), 36);
  }

  #[test]
  fn pyramid_layout() {
    let pyramid = pyramid();
    assert_well_formed(&pyramid);
    assert_eq!(pyramid.attribute(0).unwrap().element_count(), 16);
    assert_eq!(pyramid.indices_count(), 18);
  }

  #[test]
  fn meshes_share_attribute_bindings() {
    let expected = vec![(0, POSITIONS_ATTRIBUTE), (1, TEXTURE_COORDS_ATTRIBUTE), (2, COLORS_ATTRIBUTE)];
    assert_eq!(cube().attribute_bindings(), expected);
    assert_eq!(pyramid().attribute_bindings(), expected);
  }

  #[test]
  fn colors_are_normalized_bytes() {
    let cube = cube();
    let colors = cube.attribute_by_name(COLORS_ATTRIBUTE).unwrap();
    assert_eq!(colors.data_type(), DataType::UnsignedByte);
    assert_eq!(colors.upload_mode(), UploadMode::ToFloatNormalize);
    assert_eq!(colors.vertex_stride(), 4);
  }
}
