use crate::impl_prelude::*;
use prelude_plus::*;

gl_enum!({
  pub enum BufferTarget {
    Array = ARRAY_BUFFER,
    ElementArray = ELEMENT_ARRAY_BUFFER,
  }
});

gl_enum!({
  pub enum BufferUsage {
    StreamDraw = STREAM_DRAW,
    StaticDraw = STATIC_DRAW,
    DynamicDraw = DYNAMIC_DRAW,
  }
});

/// How new contents get into an existing buffer.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum BufferUpdate {
  /// `glBufferData`: a fresh store sized exactly to the payload.
  Reallocate,
  /// `glBufferSubData` at offset zero. Whatever lies past the payload is left
  /// in the store as stale data.
  Overwrite,
}

impl BufferUpdate {
  /// Reallocates when the payload no longer fits, or when at least half of
  /// the store would be wasted. Everything in between is written in place.
  #[inline]
  pub fn choose(capacity: usize, new_len: usize) -> Self {
    // `new_len <= capacity * 0.5` without going through floats
    if new_len > capacity || new_len.saturating_mul(2) <= capacity {
      Self::Reallocate
    } else {
      Self::Overwrite
    }
  }
}

/// Size bookkeeping of one buffer: the allocated store and the valid prefix.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct BufferSize {
  capacity: usize,
  len: usize,
}

impl BufferSize {
  #[inline(always)]
  pub fn capacity(&self) -> usize { self.capacity }
  #[inline(always)]
  pub fn len(&self) -> usize { self.len }
  #[inline(always)]
  pub fn is_empty(&self) -> bool { self.len == 0 }

  /// Records an upload of `new_len` bytes and returns the path to take.
  pub fn apply(&mut self, new_len: usize) -> BufferUpdate {
    let update = BufferUpdate::choose(self.capacity, new_len);
    if update == BufferUpdate::Reallocate {
      self.capacity = new_len;
    }
    self.len = new_len;
    update
  }
}

#[derive(Debug)]
pub struct Buffer {
  ctx: SharedContext,
  addr: u32,
  target: BufferTarget,
  usage: BufferUsage,
  size: Cell<BufferSize>,
}

unsafe impl Object for Buffer {
  const DEBUG_TYPE_ID: u32 = gl::BUFFER;

  #[inline(always)]
  fn ctx(&self) -> &SharedContext { &self.ctx }
  #[inline(always)]
  fn addr(&self) -> u32 { self.addr }
}

impl Buffer {
  #[inline(always)]
  pub fn target(&self) -> BufferTarget { self.target }
  #[inline(always)]
  pub fn usage(&self) -> BufferUsage { self.usage }
  /// Bytes allocated on the driver side.
  #[inline(always)]
  pub fn capacity(&self) -> usize { self.size.get().capacity() }
  /// Bytes written by the last upload.
  #[inline(always)]
  pub fn len(&self) -> usize { self.size.get().len() }
  #[inline(always)]
  pub fn is_empty(&self) -> bool { self.len() == 0 }

  pub fn new(ctx: SharedContext, target: BufferTarget, usage: BufferUsage) -> Self {
    let mut addr = 0;
    unsafe { ctx.raw_gl().GenBuffers(1, &mut addr) };
    Self { ctx, addr, target, usage, size: Cell::new(BufferSize::default()) }
  }

  // Element array bindings are part of the VAO state, so they are never
  // cached and always restored to zero.
  fn bind(&self) {
    match self.target {
      BufferTarget::Array => self.ctx.bound_array_buffer.bind_if_needed(self.raw_gl(), self.addr),
      BufferTarget::ElementArray => unsafe {
        self.raw_gl().BindBuffer(gl::ELEMENT_ARRAY_BUFFER, self.addr)
      },
    }
  }

  pub(crate) fn bind_for_draw(&self) { self.bind() }

  pub(crate) fn unbind(&self) {
    match self.target {
      BufferTarget::Array => self.ctx.bound_array_buffer.unbind_unconditionally(self.raw_gl()),
      BufferTarget::ElementArray => unsafe {
        self.raw_gl().BindBuffer(gl::ELEMENT_ARRAY_BUFFER, 0)
      },
    }
  }

  /// Replaces the contents with `data`, reusing the store when it fits well.
  pub fn upload(&self, data: &[u8]) -> BufferUpdate {
    let mut size = self.size.get();
    let update = size.apply(data.len());
    self.size.set(size);

    let gl = self.raw_gl();
    let gl_target = self.target.as_raw();
    let data_len = data.len() as GLsizeiptr;

    self.bind();
    match update {
      BufferUpdate::Reallocate => unsafe {
        gl.BufferData(gl_target, data_len, data.as_ptr() as *const c_void, self.usage.as_raw())
      },
      BufferUpdate::Overwrite => unsafe {
        gl.BufferSubData(gl_target, 0, data_len, data.as_ptr() as *const c_void)
      },
    }
    self.unbind();

    trace!(
      "Buffer #{}: {:?} with {} bytes (capacity {})",
      self.addr,
      update,
      data.len(),
      size.capacity(),
    );
    update
  }

  #[inline]
  pub fn upload_slice<T: bytemuck::Pod>(&self, data: &[T]) -> BufferUpdate {
    self.upload(bytemuck::cast_slice(data))
  }
}

impl Drop for Buffer {
  fn drop(&mut self) {
    if self.target == BufferTarget::Array {
      self.ctx.bound_array_buffer.on_object_deleted(self.addr);
    }
    unsafe { self.raw_gl().DeleteBuffers(1, &self.addr) };
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn odd_capacities_use_the_exact_half() {
    // 0.5 * 7 = 3.5: 3 is wasteful, 4 is not
    assert_eq!(BufferUpdate::choose(7, 3), BufferUpdate::Reallocate);
    assert_eq!(BufferUpdate::choose(7, 4), BufferUpdate::Overwrite);
  }

  #[test]
  fn repeating_an_upload_reuses_the_store() {
    let mut size = BufferSize::default();
    assert_eq!(size.apply(48), BufferUpdate::Reallocate);
    assert_eq!(size.apply(48), BufferUpdate::Overwrite);
    assert_eq!(size.capacity(), 48);
  }

  #[test]
  fn first_upload_always_allocates() {
    assert_eq!(BufferSize::default().apply(1), BufferUpdate::Reallocate);
    // an empty payload on an empty store still goes through glBufferData
    assert_eq!(BufferSize::default().apply(0), BufferUpdate::Reallocate);
  }

  #[test]
  fn stale_tail_is_tracked_only_through_capacity() {
    let mut size = BufferSize::default();
    size.apply(100);
    size.apply(60);
    assert_eq!(size, BufferSize { capacity: 100, len: 60 });
    size.apply(90);
    assert_eq!(size, BufferSize { capacity: 100, len: 90 });
    size.apply(30);
    assert_eq!(size, BufferSize { capacity: 30, len: 30 });
  }

  #[test]
  fn streams_decide_independently() {
    // positions, colors and indices of four successive meshes, in bytes
    let uploads = [[480, 96, 144], [240, 64, 144], [400, 128, 60], [800, 50, 40]];
    let expected = [
      [BufferUpdate::Reallocate, BufferUpdate::Reallocate, BufferUpdate::Reallocate],
      [BufferUpdate::Reallocate, BufferUpdate::Overwrite, BufferUpdate::Overwrite],
      [BufferUpdate::Reallocate, BufferUpdate::Reallocate, BufferUpdate::Reallocate],
      [BufferUpdate::Reallocate, BufferUpdate::Reallocate, BufferUpdate::Overwrite],
    ];

    let mut streams = [BufferSize::default(); 3];
    for (sizes, expected) in uploads.iter().zip(&expected) {
      for ((stream, &len), &update) in streams.iter_mut().zip(sizes).zip(expected) {
        assert_eq!(stream.apply(len), update, "{} bytes", len);
        assert_eq!(stream.len(), len);
      }
    }
    assert_eq!(streams[0], BufferSize { capacity: 800, len: 800 });
    assert_eq!(streams[1], BufferSize { capacity: 50, len: 50 });
    assert_eq!(streams[2], BufferSize { capacity: 60, len: 40 });
  }

  mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn byte_len() -> impl Strategy<Value = usize> { 0_usize..1 << 24 }

    proptest! {
      #[test]
      fn growing_reallocates_to_the_exact_size(capacity in byte_len(), extra in 1_usize..1 << 24) {
        let mut size = BufferSize { capacity, len: capacity };
        let new_len = capacity + extra;
        prop_assert_eq!(size.apply(new_len), BufferUpdate::Reallocate);
        prop_assert_eq!(size, BufferSize { capacity: new_len, len: new_len });
      }

      #[test]
      fn more_than_half_is_written_in_place(capacity in 1_usize..1 << 24, fraction in 0.0_f64..1.0) {
        let new_len = capacity / 2 + 1 + ((capacity - capacity / 2 - 1) as f64 * fraction) as usize;
        let mut size = BufferSize { capacity, len: capacity };
        prop_assert_eq!(size.apply(new_len), BufferUpdate::Overwrite);
        prop_assert_eq!(size, BufferSize { capacity, len: new_len });
      }

      #[test]
      fn half_or_less_shrinks_to_fit(capacity in byte_len(), fraction in 0.0_f64..=1.0) {
        let new_len = ((capacity / 2) as f64 * fraction) as usize;
        let mut size = BufferSize { capacity, len: capacity };
        prop_assert_eq!(size.apply(new_len), BufferUpdate::Reallocate);
        prop_assert_eq!(size, BufferSize { capacity: new_len, len: new_len });
      }

      #[test]
      fn store_always_fits_the_payload(capacity in byte_len(), new_len in byte_len()) {
        let mut size = BufferSize { capacity, len: capacity.min(new_len) };
        size.apply(new_len);
        prop_assert!(size.len() <= size.capacity());
        prop_assert!(size.capacity() < new_len.saturating_mul(2) || new_len == 0);
      }

      #[test]
      fn repeating_an_upload_changes_nothing(capacity in byte_len(), new_len in byte_len()) {
        let mut size = BufferSize { capacity, len: capacity };
        size.apply(new_len);
        let after_first = size;
        let update = size.apply(new_len);
        prop_assert_eq!(size, after_first);
        if new_len > 0 {
          prop_assert_eq!(update, BufferUpdate::Overwrite);
        }
      }
    }
  }
}
