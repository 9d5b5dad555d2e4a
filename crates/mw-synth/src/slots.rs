//! Slot detection.
//!
//! Whether a non-virtual method is mockable by convention is decided by a
//! [`SlotPredicate`] handed to the model builder.

use mw_parser::MethodNode;

/// Decides whether a method follows the project's slot convention.
pub trait SlotPredicate: Send + Sync {
    fn is_slot(&self, method: &MethodNode) -> bool;
}

/// A method is a slot if it carries one of the configured markers
/// (a `slots:` section or a `Q_SLOT` prefix, by default).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerSlotPredicate {
    markers: Vec<String>,
}

impl MarkerSlotPredicate {
    pub fn new<I, S>(markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            markers: markers.into_iter().map(Into::into).collect(),
        }
    }

    #[must_use]
    pub fn markers(&self) -> &[String] {
        &self.markers
    }
}

impl Default for MarkerSlotPredicate {
    fn default() -> Self {
        Self::new(["slots", "Q_SLOT"])
    }
}

impl SlotPredicate for MarkerSlotPredicate {
    fn is_slot(&self, method: &MethodNode) -> bool {
        method.markers.iter().any(|m| self.markers.contains(m))
    }
}

/// Never treats anything as a slot.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSlots;

impl SlotPredicate for NoSlots {
    fn is_slot(&self, _method: &MethodNode) -> bool {
        false
    }
}
