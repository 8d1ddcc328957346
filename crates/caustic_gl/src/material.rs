use crate::impl_prelude::*;
use crate::traits::ensure_same_context;
use crate::{Camera, Program, ProgramBinding, Texture2D, UniformHolder};
use prelude_plus::*;

/// A program together with the textures and uniforms it is drawn with.
/// Materials are shared between models through an `Rc`, so the textures, the
/// uniforms and the camera can all be changed through a shared reference.
/// Changes take effect on the next `bind`.
#[derive(Debug)]
pub struct Material {
  program: Rc<Program>,
  textures: RefCell<BTreeMap<u32, Rc<Texture2D>>>,
  uniforms: RefCell<UniformHolder>,
  camera: Cell<Option<Camera>>,
}

impl Material {
  pub fn new(program: Rc<Program>) -> Self {
    Self {
      program,
      textures: RefCell::new(BTreeMap::new()),
      uniforms: RefCell::new(UniformHolder::new()),
      camera: Cell::new(None),
    }
  }

  #[inline(always)]
  pub fn program(&self) -> &Rc<Program> { &self.program }

  /// Adds a texture on its unit, returning the one it replaced.
  pub fn add_texture(&self, texture: Rc<Texture2D>) -> Result<Option<Rc<Texture2D>>> {
    ensure_same_context(self.program.ctx(), texture.ctx())?;
    Ok(self.textures.borrow_mut().insert(texture.unit(), texture))
  }

  #[inline]
  pub fn has_texture(&self, unit: u32) -> bool { self.textures.borrow().contains_key(&unit) }

  #[inline]
  pub fn texture(&self, unit: u32) -> Option<Rc<Texture2D>> { self.textures.borrow().get(&unit).cloned() }

  #[inline]
  pub fn remove_texture(&self, unit: u32) -> Option<Rc<Texture2D>> { self.textures.borrow_mut().remove(&unit) }

  /// Textures keyed and ordered by unit.
  #[inline]
  pub fn textures(&self) -> Ref<'_, BTreeMap<u32, Rc<Texture2D>>> { self.textures.borrow() }

  #[inline]
  pub fn uniforms(&self) -> Ref<'_, UniformHolder> { self.uniforms.borrow() }

  #[inline]
  pub fn uniforms_mut(&self) -> RefMut<'_, UniformHolder> { self.uniforms.borrow_mut() }

  #[inline(always)]
  pub fn camera(&self) -> Option<Camera> { self.camera.get() }
  #[inline(always)]
  pub fn has_camera(&self) -> bool { self.camera.get().is_some() }
  #[inline]
  pub fn set_camera(&self, camera: Option<Camera>) { self.camera.set(camera); }

  /// Binds the program, uploads the material uniforms and binds every texture.
  pub fn bind(&self) -> MaterialBinding<'_> {
    let program_binding = self.program.bind();
    program_binding.upload(&self.uniforms.borrow());
    for texture in self.textures.borrow().values() {
      texture.bind();
    }
    MaterialBinding { material: self, program_binding }
  }
}

#[derive(Debug)]
pub struct MaterialBinding<'obj> {
  material: &'obj Material,
  program_binding: ProgramBinding<'obj>,
}

impl<'obj> MaterialBinding<'obj> {
  #[inline(always)]
  pub fn material(&self) -> &'obj Material { self.material }
  #[inline(always)]
  pub fn program_binding(&self) -> &ProgramBinding<'obj> { &self.program_binding }

  #[inline]
  pub fn is_binding_of(&self, material: &Material) -> bool { ptr::eq(self.material, material) }

  /// Unbinds the textures and the program.
  pub fn unbind(self) {
    for texture in self.material.textures.borrow().values() {
      texture.unbind();
    }
    self.program_binding.unbind_completely();
  }
}
