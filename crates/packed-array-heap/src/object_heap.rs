//! Generational arena for reference-counted foreign buffers.

use std::any::{Any, TypeId};
use std::fmt;

/// Handle to a buffer stored in an [`ObjectHeap`].
///
/// Handles are plain identifiers: copying one does not touch the reference
/// count. The generation makes a handle to a freed (and possibly reused)
/// slot detectably stale.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ObjectHandle {
    /// Slot index.
    pub index: u32,
    /// Slot generation when the handle was issued.
    pub generation: u32,
    /// Type of the stored value, checked on every access.
    pub type_id: TypeId,
}

impl ObjectHandle {
    /// Create a handle.
    pub fn new(index: u32, generation: u32, type_id: TypeId) -> Self {
        Self {
            index,
            generation,
            type_id,
        }
    }
}

/// Slot storage with generation tracking.
///
/// Freed slots go onto a free list and are reused with a bumped
/// generation, so lookups through an old handle return `None` instead of
/// someone else's buffer.
pub struct ObjectHeap {
    slots: Vec<Slot>,
    free_list: Vec<u32>,
    live: usize,
}

struct Slot {
    generation: u32,
    value: Option<Box<dyn Any>>,
    ref_count: u32,
}

impl Slot {
    #[inline]
    fn is_live(&self, handle: ObjectHandle) -> bool {
        self.generation == handle.generation && self.value.is_some()
    }
}

impl ObjectHeap {
    /// Create an empty heap.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_list: Vec::new(),
            live: 0,
        }
    }

    /// Store `value` with a reference count of one.
    pub fn allocate<T: Any>(&mut self, value: T) -> ObjectHandle {
        let type_id = TypeId::of::<T>();
        let boxed: Box<dyn Any> = Box::new(value);
        self.live += 1;

        if let Some(index) = self.free_list.pop() {
            let slot = &mut self.slots[index as usize];
            slot.value = Some(boxed);
            slot.ref_count = 1;
            ObjectHandle::new(index, slot.generation, type_id)
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(Slot {
                generation: 0,
                value: Some(boxed),
                ref_count: 1,
            });
            ObjectHandle::new(index, 0, type_id)
        }
    }

    /// Shared access; `None` if the handle is stale or the type differs.
    pub fn get<T: Any>(&self, handle: ObjectHandle) -> Option<&T> {
        if handle.type_id != TypeId::of::<T>() {
            return None;
        }
        let slot = self.slots.get(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.value.as_ref()?.downcast_ref::<T>()
    }

    /// Exclusive access; `None` if the handle is stale or the type differs.
    pub fn get_mut<T: Any>(&mut self, handle: ObjectHandle) -> Option<&mut T> {
        if handle.type_id != TypeId::of::<T>() {
            return None;
        }
        let slot = self.slots.get_mut(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.value.as_mut()?.downcast_mut::<T>()
    }

    /// Increment the reference count. Returns false for a stale handle.
    pub fn add_ref(&mut self, handle: ObjectHandle) -> bool {
        if let Some(slot) = self.slots.get_mut(handle.index as usize)
            && slot.is_live(handle)
        {
            slot.ref_count = slot.ref_count.saturating_add(1);
            return true;
        }
        false
    }

    /// Decrement the reference count, freeing the slot at zero.
    ///
    /// Returns true if the buffer was freed.
    pub fn release(&mut self, handle: ObjectHandle) -> bool {
        let Some(slot) = self.slots.get_mut(handle.index as usize) else {
            return false;
        };
        if !slot.is_live(handle) {
            return false;
        }
        slot.ref_count = slot.ref_count.saturating_sub(1);
        if slot.ref_count > 0 {
            return false;
        }
        self.vacate(handle.index);
        true
    }

    /// Free the buffer regardless of its reference count.
    pub fn free(&mut self, handle: ObjectHandle) {
        if let Some(slot) = self.slots.get(handle.index as usize)
            && slot.is_live(handle)
        {
            self.vacate(handle.index);
        }
    }

    /// Current reference count, or `None` for a stale handle.
    pub fn ref_count(&self, handle: ObjectHandle) -> Option<u32> {
        let slot = self.slots.get(handle.index as usize)?;
        slot.is_live(handle).then_some(slot.ref_count)
    }

    /// Number of buffers currently allocated.
    #[inline]
    pub fn live_count(&self) -> usize {
        self.live
    }

    fn vacate(&mut self, index: u32) {
        let slot = &mut self.slots[index as usize];
        slot.value = None;
        slot.ref_count = 0;
        slot.generation = slot.generation.wrapping_add(1);
        self.free_list.push(index);
        self.live -= 1;
    }
}

impl Default for ObjectHeap {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ObjectHeap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectHeap")
            .field("slot_count", &self.slots.len())
            .field("free_count", &self.free_list.len())
            .field("live_count", &self.live)
            .finish()
    }
}
