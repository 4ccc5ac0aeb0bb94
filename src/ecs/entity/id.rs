use serde::{Deserialize, Serialize};
use std::fmt;

/// Handle to an entity: a storage slot plus the generation the slot carried
/// when the handle was issued. Despawning bumps the slot's generation, so a
/// stale handle fails lookup instead of aliasing the slot's next occupant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityId {
    slot: u32,
    generation: u32,
}

/// Reserved sentinel that never refers to a live entity.
pub const INVALID_ENTITY: EntityId = EntityId {
    slot: u32::MAX,
    generation: 0,
};

impl EntityId {
    #[inline]
    pub(crate) const fn new(slot: u32, generation: u32) -> Self {
        Self { slot, generation }
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.slot as usize
    }

    #[inline]
    pub const fn generation(self) -> u32 {
        self.generation
    }

    #[inline]
    pub const fn is_invalid(self) -> bool {
        self.slot == u32::MAX
    }
}

impl Default for EntityId {
    fn default() -> Self {
        INVALID_ENTITY
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_invalid() {
            write!(f, "invalid")
        } else {
            write!(f, "{}#{}", self.slot, self.generation)
        }
    }
}
