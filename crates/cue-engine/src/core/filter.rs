use rapier2d::prelude::*;
use serde::{Deserialize, Serialize};

/// Category/mask bit pair deciding which bodies may interact.
///
/// Two filters interact when each one's mask accepts the other's category.
/// The same rule gates physical contact (via Rapier interaction groups) and
/// pointer grabbing (via the drag control's own filter).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollisionFilter {
    pub category: u32,
    pub mask: u32,
}

impl CollisionFilter {
    /// Category 1, accepts everything.
    pub const DEFAULT: Self = Self {
        category: 0x0001,
        mask: u32::MAX,
    };

    pub const fn new(category: u32, mask: u32) -> Self {
        Self { category, mask }
    }

    pub fn with_category(mut self, category: u32) -> Self {
        self.category = category;
        self
    }

    /// Whether bodies carrying `self` and `other` are eligible partners.
    pub fn can_interact(&self, other: &CollisionFilter) -> bool {
        (self.mask & other.category) != 0 && (other.mask & self.category) != 0
    }

    pub(crate) fn to_rapier(self) -> InteractionGroups {
        InteractionGroups::new(
            Group::from_bits_truncate(self.category),
            Group::from_bits_truncate(self.mask),
        )
    }
}

impl Default for CollisionFilter {
    fn default() -> Self {
        Self::DEFAULT
    }
}
