//! A generational arena. Handles to removed slots stop resolving even after
//! the slot is reused.

// Based on <https://github.com/fitzgen/generational-arena/blob/7758d1d8ef65cadf7d7db2ef6d9086c8547d8b55/src/lib.rs>
// See also:
// <http://bitsquid.blogspot.com/2014/08/building-data-oriented-entity-system.html>

pub type Generation = u32;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct GenIdx {
  index: usize,
  generation: Generation,
}

impl GenIdx {
  #[inline(always)]
  pub fn index(self) -> usize { self.index }
  #[inline(always)]
  pub fn generation(self) -> Generation { self.generation }
}

#[derive(Debug, Clone)]
enum Slot<T> {
  Occupied { value: T, generation: Generation },
  Free { next_free: Option<usize>, generation: Generation },
}

#[derive(Debug, Clone)]
pub struct GenIdxVec<T> {
  slots: Vec<Slot<T>>,
  free_head: Option<usize>,
  len: usize,
}

impl<T> Default for GenIdxVec<T> {
  fn default() -> Self { Self { slots: Vec::new(), free_head: None, len: 0 } }
}

impl<T> GenIdxVec<T> {
  pub fn new() -> Self { Self::default() }

  #[inline(always)]
  pub fn len(&self) -> usize { self.len }
  #[inline(always)]
  pub fn is_empty(&self) -> bool { self.len == 0 }

  pub fn insert(&mut self, value: T) -> GenIdx {
    self.len += 1;
    match self.free_head {
      Some(index) => {
        let generation = match self.slots[index] {
          Slot::Free { next_free, generation } => {
            self.free_head = next_free;
            generation
          }
          Slot::Occupied { .. } => unreachable!("the free list points at an occupied slot"),
        };
        self.slots[index] = Slot::Occupied { value, generation };
        GenIdx { index, generation }
      }
      None => {
        let index = self.slots.len();
        self.slots.push(Slot::Occupied { value, generation: 0 });
        GenIdx { index, generation: 0 }
      }
    }
  }

  pub fn remove(&mut self, idx: GenIdx) -> Option<T> {
    match self.slots.get(idx.index) {
      Some(Slot::Occupied { generation, .. }) if *generation == idx.generation => {}
      _ => return None,
    }

    let freed = Slot::Free { next_free: self.free_head, generation: idx.generation.wrapping_add(1) };
    self.free_head = Some(idx.index);
    self.len -= 1;
    match std::mem::replace(&mut self.slots[idx.index], freed) {
      Slot::Occupied { value, .. } => Some(value),
      Slot::Free { .. } => None,
    }
  }

  #[inline]
  pub fn contains(&self, idx: GenIdx) -> bool { self.get(idx).is_some() }

  pub fn get(&self, idx: GenIdx) -> Option<&T> {
    match self.slots.get(idx.index)? {
      Slot::Occupied { value, generation } if *generation == idx.generation => Some(value),
      _ => None,
    }
  }

  pub fn get_mut(&mut self, idx: GenIdx) -> Option<&mut T> {
    match self.slots.get_mut(idx.index)? {
      Slot::Occupied { value, generation } if *generation == idx.generation => Some(value),
      _ => None,
    }
  }

  /// Live values in slot order.
  pub fn iter(&self) -> impl Iterator<Item = (GenIdx, &T)> + '_ {
    self.slots.iter().enumerate().filter_map(|(index, slot)| match slot {
      Slot::Occupied { value, generation } => Some((GenIdx { index, generation: *generation }, value)),
      Slot::Free { .. } => None,
    })
  }

  pub fn iter_mut(&mut self) -> impl Iterator<Item = (GenIdx, &mut T)> + '_ {
    self.slots.iter_mut().enumerate().filter_map(|(index, slot)| match slot {
      Slot::Occupied { value, generation } => Some((GenIdx { index, generation: *generation }, value)),
      Slot::Free { .. } => None,
    })
  }

  pub fn clear(&mut self) {
    self.slots.clear();
    self.free_head = None;
    self.len = 0;
  }
}
