//! Body roles on the table and the collision categories that go with them.

use cue_engine::{EngineContext, EntityId};

/// Collision category reserved for the cue ball. The drag control only
/// accepts bodies in this category.
pub const CUE_CATEGORY: u32 = 0x0002;
/// Category for everything else (and for the drag control itself).
pub const TABLE_CATEGORY: u32 = 0x0001;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyLabel {
    CueBall,
    ColorBall,
    Wall,
    Pocket,
}

impl BodyLabel {
    pub const ALL: [BodyLabel; 4] = [
        BodyLabel::CueBall,
        BodyLabel::ColorBall,
        BodyLabel::Wall,
        BodyLabel::Pocket,
    ];

    /// Entity tag used for this label.
    pub fn tag(self) -> &'static str {
        match self {
            BodyLabel::CueBall => "cueBall",
            BodyLabel::ColorBall => "colorBall",
            BodyLabel::Wall => "wall",
            BodyLabel::Pocket => "pocket",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|label| label.tag() == tag)
    }

    /// Balls are the only bodies that bounce off walls and drop into pockets.
    pub fn is_ball(self) -> bool {
        matches!(self, BodyLabel::CueBall | BodyLabel::ColorBall)
    }

    /// Numeric code carried in game events.
    pub fn code(self) -> f32 {
        match self {
            BodyLabel::CueBall => 0.0,
            BodyLabel::ColorBall => 1.0,
            BodyLabel::Wall => 2.0,
            BodyLabel::Pocket => 3.0,
        }
    }
}

/// Label of a live entity. Removed or unlabeled entities have none.
pub fn label_of(ctx: &EngineContext, id: EntityId) -> Option<BodyLabel> {
    ctx.scene.tag_of(id).and_then(BodyLabel::from_tag)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cue_engine::Entity;

    #[test]
    fn tags_round_trip() {
        for label in BodyLabel::ALL {
            assert_eq!(BodyLabel::from_tag(label.tag()), Some(label));
        }
        assert_eq!(BodyLabel::from_tag("ball"), None);
    }

    #[test]
    fn only_balls_are_balls() {
        assert!(BodyLabel::CueBall.is_ball());
        assert!(BodyLabel::ColorBall.is_ball());
        assert!(!BodyLabel::Wall.is_ball());
        assert!(!BodyLabel::Pocket.is_ball());
    }

    #[test]
    fn label_of_live_entities() {
        let mut ctx = EngineContext::new();
        let id = ctx.next_id();
        ctx.scene.spawn(Entity::new(id).with_tag(BodyLabel::Pocket.tag()));
        assert_eq!(label_of(&ctx, id), Some(BodyLabel::Pocket));
        assert_eq!(label_of(&ctx, EntityId(99)), None);
    }
}
