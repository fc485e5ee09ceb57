//! The fixed pool of tracked vehicle slots.

use serde::Deserialize;

use crate::VehicleId;

/// Tracked vehicles `"{prefix}0" .. "{prefix}{size-1}"`.
///
/// A slot is reused when its vehicle finishes or is vaporized: the next run
/// re-inserts a vehicle with the same id on a freshly drawn route.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Fleet {
    #[serde(default = "default_prefix")]
    pub prefix: String,
    pub size:   usize,
}

fn default_prefix() -> String {
    "car".to_owned()
}

impl Fleet {
    pub fn new(prefix: impl Into<String>, size: usize) -> Self {
        Self { prefix: prefix.into(), size }
    }

    /// Id of slot `slot`.
    pub fn vehicle(&self, slot: usize) -> VehicleId {
        VehicleId(format!("{}{}", self.prefix, slot))
    }

    /// All slot ids in slot order.
    pub fn ids(&self) -> impl Iterator<Item = VehicleId> + '_ {
        (0..self.size).map(|slot| self.vehicle(slot))
    }

    /// Slot index of `id`, if it names one of this fleet's vehicles.
    ///
    /// Only the canonical spelling matches: `car03` is not slot 3.
    pub fn slot_of(&self, id: &str) -> Option<usize> {
        let digits = id.strip_prefix(self.prefix.as_str())?;
        let slot: usize = digits.parse().ok()?;
        (slot < self.size && slot.to_string() == digits).then_some(slot)
    }

    #[inline]
    pub fn contains(&self, id: &str) -> bool {
        self.slot_of(id).is_some()
    }
}
