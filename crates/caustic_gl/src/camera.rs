use caustic_math::*;
use prelude_plus::*;

fn normalized_or_none(v: Vec3f) -> Option<Vec3f> {
  let magnitude = v.magnitude();
  if magnitude > 0.0 && magnitude.is_finite() {
    Some(v / magnitude)
  } else {
    None
  }
}

/// A projection plus a point of view in world space.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Camera {
  projection: Mat4f,
  position: Vec3f,
  direction: Vec3f,
  up: Vec3f,
}

impl Camera {
  pub fn new(projection: Mat4f) -> Self {
    Self { projection, position: Vec3f::ZERO, direction: Vec3f::FORWARD, up: Vec3f::UP }
  }

  /// `fov_y` is in degrees.
  pub fn perspective(fov_y: f32, aspect: f32, z_near: f32, z_far: f32) -> Self {
    Self::new(Mat4f::perspective_rh_no(radians(fov_y), aspect, z_near, z_far))
  }

  pub fn orthographic(left: f32, right: f32, bottom: f32, top: f32, z_near: f32, z_far: f32) -> Self {
    Self::new(Mat4f::orthographic_rh_no(left, right, bottom, top, z_near, z_far))
  }

  #[inline(always)]
  pub fn projection_matrix(&self) -> Mat4f { self.projection }
  #[inline(always)]
  pub fn position(&self) -> Vec3f { self.position }
  #[inline(always)]
  pub fn direction(&self) -> Vec3f { self.direction }
  #[inline(always)]
  pub fn up(&self) -> Vec3f { self.up }

  #[inline]
  pub fn set_projection_matrix(&mut self, projection: Mat4f) { self.projection = projection; }
  #[inline]
  pub fn set_position(&mut self, position: Vec3f) { self.position = position; }

  /// A zero-length direction has no orientation and is ignored.
  pub fn set_direction(&mut self, direction: Vec3f) {
    match normalized_or_none(direction) {
      Some(direction) => self.direction = direction,
      None => warn!("Ignoring a zero-length camera direction"),
    }
  }

  /// A zero-length up vector is ignored.
  pub fn set_up(&mut self, up: Vec3f) {
    match normalized_or_none(up) {
      Some(up) => self.up = up,
      None => warn!("Ignoring a zero-length camera up vector"),
    }
  }

  /// Points the camera at `target`, keeping the position. Nothing changes if
  /// the target is the position itself.
  pub fn look_at(&mut self, target: Vec3f) { self.set_direction(target - self.position); }

  /// World space to camera space.
  pub fn view_matrix(&self) -> Mat4f { Mat4f::look_to_rh(self.position, self.direction, self.up) }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn assert_vec_eq(a: Vec3f, b: Vec3f) {
    assert!((a - b).magnitude() < 1e-5, "{:?} != {:?}", a, b);
  }

  #[test]
  fn default_view_is_identity() {
    let camera = Camera::new(Mat4f::IDENTITY);
    let view = camera.view_matrix();
    for p in [vec3(1.0, 2.0, 3.0), vec3(-4.0, 0.5, -7.0)] {
      assert_vec_eq(view.transform_point(p), p);
    }
  }

  #[test]
  fn moving_the_camera_moves_the_world_the_other_way() {
    let mut camera = Camera::perspective(60.0, 16.0 / 9.0, 0.1, 100.0);
    camera.set_position(vec3(0.0, 0.0, 5.0));
    assert_vec_eq(camera.view_matrix().transform_point(Vec3f::ZERO), vec3(0.0, 0.0, -5.0));
  }

  #[test]
  fn look_at_turns_towards_the_target() {
    let mut camera = Camera::new(Mat4f::IDENTITY);
    camera.set_position(vec3(3.0, 0.0, 0.0));
    camera.look_at(Vec3f::ZERO);
    assert_vec_eq(camera.direction(), vec3(-1.0, 0.0, 0.0));
    // the target lands straight ahead, on the negative z axis
    assert_vec_eq(camera.view_matrix().transform_point(Vec3f::ZERO), vec3(0.0, 0.0, -3.0));
  }

  #[test]
  fn looking_at_the_own_position_keeps_the_direction() {
    let mut camera = Camera::new(Mat4f::IDENTITY);
    camera.set_position(vec3(1.0, 2.0, 3.0));
    camera.look_at(Vec3f::ZERO);
    let direction = camera.direction();

    camera.look_at(vec3(1.0, 2.0, 3.0));
    assert_eq!(camera.direction(), direction);
    camera.set_direction(Vec3f::ZERO);
    camera.set_up(Vec3f::ZERO);
    assert_eq!(camera.direction(), direction);
    assert_eq!(camera.up(), Vec3f::UP);
    assert!(camera.view_matrix().as_array().iter().all(|x| x.is_finite()));
  }

  #[test]
  fn top_down_view_is_finite() {
    let mut camera = Camera::new(Mat4f::IDENTITY);
    camera.set_position(vec3(0.0, 10.0, 0.0));
    camera.look_at(Vec3f::ZERO);
    assert_vec_eq(camera.direction(), vec3(0.0, -1.0, 0.0));
    assert_vec_eq(camera.view_matrix().transform_point(Vec3f::ZERO), vec3(0.0, 0.0, -10.0));
  }

  #[test]
  fn perspective_maps_near_and_far_planes_to_clip_bounds() {
    let camera = Camera::perspective(90.0, 1.0, 1.0, 10.0);
    let project = |z: f32| {
      let clip = camera.projection_matrix() * vec4(0.0, 0.0, z, 1.0);
      clip.z / clip.w
    };
    assert!((project(-1.0) + 1.0).abs() < 1e-5);
    assert!((project(-10.0) - 1.0).abs() < 1e-5);
  }

  #[test]
  fn orthographic_maps_the_box_to_ndc() {
    let camera = Camera::orthographic(0.0, 800.0, 0.0, 600.0, -1.0, 1.0);
    let p = camera.projection_matrix().transform_point(vec3(800.0, 600.0, 0.0));
    assert_vec_eq(p, vec3(1.0, 1.0, 0.0));
    let p = camera.projection_matrix().transform_point(vec3(0.0, 0.0, 0.0));
    assert_vec_eq(p, vec3(-1.0, -1.0, 0.0));
  }
}
