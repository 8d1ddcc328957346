use crate::debug;
use crate::impl_prelude::*;
use prelude_plus::*;

/// A driver-side object owned by a wrapper type.
///
/// # Safety
///
/// `addr` must return the name of a live object of the kind described by
/// `DEBUG_TYPE_ID`, created in `ctx`.
pub unsafe trait Object {
  const DEBUG_TYPE_ID: u32;

  fn ctx(&self) -> &SharedContext;
  fn addr(&self) -> u32;

  #[inline(always)]
  fn raw_gl(&self) -> &RawGL { self.ctx().raw_gl() }

  #[inline]
  fn belongs_to(&self, ctx: &SharedContext) -> bool { Rc::ptr_eq(self.ctx(), ctx) }

  fn set_debug_label(&self, label: &[u8]) {
    unsafe { debug::set_object_debug_label(self.ctx(), Self::DEBUG_TYPE_ID, self.addr(), label) };
  }

  fn get_debug_label(&self) -> Vec<u8> {
    unsafe { debug::get_object_debug_label(self.ctx(), Self::DEBUG_TYPE_ID, self.addr()) }
  }
}

/// Fails with [`Error::ContextMismatch`] unless both handles point to the
/// same context.
pub(crate) fn ensure_same_context<C>(expected: &Rc<C>, actual: &Rc<C>) -> Result<()> {
  if Rc::ptr_eq(expected, actual) {
    Ok(())
  } else {
    Err(Error::ContextMismatch)
  }
}
