use crate::impl_prelude::*;
use crate::traits::ensure_same_context;
use crate::{Camera, ClearFlags, GenIdx, GenIdxVec, Model};
use caustic_math::*;
use prelude_plus::*;

pub type ModelHandle = GenIdx;

/// Draws a list of models, binding each material once per frame. Models are
/// bucketed by material in the order the materials are first met, and keep
/// their relative order inside a bucket.
#[derive(Debug)]
pub struct Renderer {
  ctx: SharedContext,
  camera: Camera,
  clear_color: Colorf,
  models: GenIdxVec<Model>,
}

impl Renderer {
  pub fn new(ctx: SharedContext, camera: Camera) -> Self {
    ctx.set_depth_test_enabled(true);
    Self { ctx, camera, clear_color: Colorf::BLACK, models: GenIdxVec::new() }
  }

  #[inline(always)]
  pub fn ctx(&self) -> &SharedContext { &self.ctx }
  #[inline(always)]
  pub fn camera(&self) -> &Camera { &self.camera }
  #[inline(always)]
  pub fn camera_mut(&mut self) -> &mut Camera { &mut self.camera }
  #[inline(always)]
  pub fn clear_color(&self) -> Colorf { self.clear_color }
  #[inline(always)]
  pub fn model_count(&self) -> usize { self.models.len() }

  #[inline]
  pub fn set_camera(&mut self, camera: Camera) { self.camera = camera; }
  #[inline]
  pub fn set_clear_color(&mut self, color: Colorf) { self.clear_color = color; }

  pub fn add_model(&mut self, model: Model) -> Result<ModelHandle> {
    ensure_same_context(&self.ctx, model.material().program().ctx())?;
    Ok(self.models.insert(model))
  }

  #[inline]
  pub fn remove_model(&mut self, handle: ModelHandle) -> Option<Model> { self.models.remove(handle) }

  #[inline]
  pub fn model(&self, handle: ModelHandle) -> Option<&Model> { self.models.get(handle) }

  #[inline]
  pub fn model_mut(&mut self, handle: ModelHandle) -> Option<&mut Model> { self.models.get_mut(handle) }

  pub fn models(&self) -> impl Iterator<Item = (ModelHandle, &Model)> + '_ { self.models.iter() }

  pub fn render(&self) -> Result<()> {
    self.ctx.set_clear_color(self.clear_color);
    self.ctx.clear(ClearFlags::COLOR | ClearFlags::DEPTH);

    let buckets = group_by_key(self.models.iter().map(|(_, model)| model), |model| Rc::as_ptr(model.material()));
    for bucket in &buckets {
      let material = match bucket.first() {
        Some(model) => model.material(),
        None => continue,
      };
      let binding = material.bind();
      for model in bucket {
        model.render(&binding, Some(self.camera))?;
      }
      binding.unbind();
    }

    trace!("Rendered {} model(s) with {} material switch(es)", self.models.len(), buckets.len());
    self.ctx.check_error()
  }
}

/// Splits `items` into buckets of equal keys. Buckets are ordered by the
/// first appearance of their key, items keep their order inside a bucket.
fn group_by_key<T, K: PartialEq>(items: impl Iterator<Item = T>, key: impl Fn(&T) -> K) -> Vec<Vec<T>> {
  let mut keys: Vec<K> = Vec::new();
  let mut buckets: Vec<Vec<T>> = Vec::new();
  for item in items {
    let item_key = key(&item);
    match keys.iter().position(|k| *k == item_key) {
      Some(i) => buckets[i].push(item),
      None => {
        keys.push(item_key);
        buckets.push(vec![item]);
      }
    }
  }
  buckets
}
