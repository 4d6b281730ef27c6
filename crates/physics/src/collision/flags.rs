//! Content flags for collision filtering.
//!
//! Each collider has contents; each query has a mask. A collider takes
//! part in a query when the two intersect.

use serde::{Deserialize, Serialize};

/// What kind of volume a collider is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ContentFlags(pub u32);

impl ContentFlags {
    pub const EMPTY: Self = Self(0);

    /// Static level geometry.
    pub const SOLID: Self = Self(1 << 0);

    /// Blocks the character only. Kicks pass through.
    pub const PLAYER_CLIP: Self = Self(1 << 1);

    /// Volume that never blocks movement, headroom or kicks.
    pub const TRIGGER: Self = Self(1 << 2);

    /// Kickable rigid body.
    pub const DYNAMIC_BODY: Self = Self(1 << 3);

    /// Character movement, ground and headroom probes.
    pub const MASK_PLAYER_SOLID: Self =
        Self(Self::SOLID.0 | Self::PLAYER_CLIP.0 | Self::DYNAMIC_BODY.0);

    /// Kick overlap and sweep.
    pub const MASK_KICK: Self = Self(Self::SOLID.0 | Self::DYNAMIC_BODY.0);

    /// Dynamic bodies moving through the world.
    pub const MASK_BODY_SOLID: Self = Self(Self::SOLID.0 | Self::DYNAMIC_BODY.0);

    #[inline]
    pub fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    #[inline]
    pub fn intersects(self, other: Self) -> bool {
        (self.0 & other.0) != 0
    }
}

impl std::ops::BitOr for ContentFlags {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}
