use bevy_ecs::prelude::*;
use bitflags::bitflags;

bitflags! {
    /// Categories used to filter which colliders a trace can interact with.
    #[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct CollisionChannels : u8 {
        const NONE = 0b0000_0000;
        const WORLD_STATIC = 0b0000_0001;
        const WORLD_DYNAMIC = 0b0000_0010;
        const PAWN = 0b0000_0100;
        const VISIBILITY = 0b0000_1000;
        const SMACKABLE = 0b0001_0000;
    }
}

/// How a collider answers queries on each channel.
///
/// A trace issued on a channel only sees colliders whose `blocks` set contains it.
#[derive(Component, Clone, Copy, Debug, PartialEq, Eq)]
pub struct CollisionResponse {
    pub object_type: CollisionChannels,
    pub blocks: CollisionChannels,
}

impl CollisionResponse {
    pub const PAWN: Self = CollisionResponse {
        object_type: CollisionChannels::PAWN,
        blocks: CollisionChannels::all().difference(CollisionChannels::SMACKABLE),
    };

    pub const SMACKABLE_BODY: Self = CollisionResponse {
        object_type: CollisionChannels::WORLD_STATIC,
        blocks: CollisionChannels::all(),
    };

    pub const LEVEL: Self = CollisionResponse {
        object_type: CollisionChannels::WORLD_STATIC,
        blocks: CollisionChannels::all().difference(CollisionChannels::SMACKABLE),
    };

    pub fn new(object_type: CollisionChannels, blocks: CollisionChannels) -> Self {
        CollisionResponse {
            object_type,
            blocks,
        }
    }

    pub fn blocks(&self, channel: CollisionChannels) -> bool {
        !channel.is_empty() && self.blocks.contains(channel)
    }
}

impl Default for CollisionResponse {
    fn default() -> Self {
        CollisionResponse::LEVEL
    }
}
