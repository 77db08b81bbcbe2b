//! Table layout and rule tuning, loadable from JSON.
//!
//! Every section falls back to the reference table when omitted, so a host
//! can send only the values it wants to change:
//!
//! ```json
//! { "damping": 0.98, "bounce": { "law": "standard" } }
//! ```

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::math::SHOT_POWER;

/// Upper bound on colored balls, keeping the table inside the render budget.
pub const MAX_COLOR_BALLS: u32 = 32;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    pub cue_ball: CueBallConfig,
    pub color_balls: ColorBallConfig,
    pub ball_material: BallMaterial,
    pub walls: Vec<WallConfig>,
    pub pocket: PocketConfig,
    pub aim: AimConfig,
    /// Per-tick velocity factor for the cue ball.
    pub damping: f32,
    pub bounce: BounceConfig,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            cue_ball: CueBallConfig::default(),
            color_balls: ColorBallConfig::default(),
            ball_material: BallMaterial::default(),
            walls: vec![
                WallConfig::new(Vec2::new(800.0, 700.0), 800.0, 50.0),
                WallConfig::new(Vec2::new(800.0, 100.0), 800.0, 50.0),
                WallConfig::new(Vec2::new(400.0, 400.0), 50.0, 660.0),
                WallConfig::new(Vec2::new(1200.0, 400.0), 50.0, 660.0),
            ],
            pocket: PocketConfig::default(),
            aim: AimConfig::default(),
            damping: 0.99,
            bounce: BounceConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CueBallConfig {
    pub position: Vec2,
    pub radius: f32,
}

impl Default for CueBallConfig {
    fn default() -> Self {
        Self {
            position: Vec2::new(800.0, 300.0),
            radius: 20.0,
        }
    }
}

/// Randomly placed, randomly tinted object balls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorBallConfig {
    pub count: u32,
    pub radius: f32,
    /// Horizontal spawn range, `[x_min, x_max)`.
    pub x_min: f32,
    pub x_max: f32,
    pub y: f32,
    /// Lightness range in percent, `[min, max)`.
    pub lightness_min: u32,
    pub lightness_max: u32,
    pub seed: u64,
}

impl Default for ColorBallConfig {
    fn default() -> Self {
        Self {
            count: 5,
            radius: 20.0,
            x_min: 490.0,
            x_max: 970.0,
            y: 460.0,
            lightness_min: 30,
            lightness_max: 80,
            seed: 0x5EED_CAFE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BallMaterial {
    pub friction: f32,
    pub restitution: f32,
    pub density: f32,
}

impl Default for BallMaterial {
    fn default() -> Self {
        Self {
            friction: 0.005,
            restitution: 0.5,
            density: 0.001,
        }
    }
}

/// A static cushion given by its center and full extents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WallConfig {
    pub center: Vec2,
    pub width: f32,
    pub height: f32,
}

impl WallConfig {
    pub fn new(center: Vec2, width: f32, height: f32) -> Self {
        Self {
            center,
            width,
            height,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PocketConfig {
    pub position: Vec2,
    pub radius: f32,
}

impl Default for PocketConfig {
    fn default() -> Self {
        Self {
            position: Vec2::new(800.0, 600.0),
            radius: 25.0,
        }
    }
}

/// Which point the release stretch is measured from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShotOrigin {
    /// The cue ball's center at the moment of release.
    #[default]
    BallCenter,
    /// Where the drag started.
    DragPoint,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AimConfig {
    /// Stiffness of the visible control spring.
    pub spring_stiffness: f32,
    /// Stiffness of the invisible pointer drag constraint.
    pub drag_stiffness: f32,
    /// Force per unit of stretch.
    pub power: f32,
    /// How long the cue ball stays leashed to its spawn point.
    pub grace_seconds: f32,
    pub shot_origin: ShotOrigin,
}

impl Default for AimConfig {
    fn default() -> Self {
        Self {
            spring_stiffness: 0.05,
            drag_stiffness: 0.2,
            power: SHOT_POWER,
            grace_seconds: 0.025,
            shot_origin: ShotOrigin::BallCenter,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BounceLaw {
    /// `-(1+e)(n.v) / (m^-1 + 1/m^-1)` along the normal.
    #[default]
    Literal,
    /// Reflection `v - (1+e)(n.v)n` while approaching.
    Standard,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BounceConfig {
    pub restitution: f32,
    pub law: BounceLaw,
}

impl Default for BounceConfig {
    fn default() -> Self {
        Self {
            restitution: 0.5,
            law: BounceLaw::Literal,
        }
    }
}

impl TableConfig {
    /// Parse a config from JSON and clamp out-of-range values.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config.sanitized())
    }

    /// Clamp values that would break the rules, logging each correction.
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();

        if !(0.0..=1.0).contains(&self.damping) {
            log::warn!("damping {} out of [0, 1], clamping", self.damping);
            self.damping = self.damping.clamp(0.0, 1.0);
        }
        if self.bounce.restitution < 0.0 {
            log::warn!("negative bounce restitution {}, using 0", self.bounce.restitution);
            self.bounce.restitution = 0.0;
        }
        if self.color_balls.count > MAX_COLOR_BALLS {
            log::warn!(
                "{} colored balls requested, capping at {}",
                self.color_balls.count,
                MAX_COLOR_BALLS
            );
            self.color_balls.count = MAX_COLOR_BALLS;
        }
        if self.color_balls.x_max < self.color_balls.x_min {
            log::warn!("colored ball x range is reversed, swapping");
            std::mem::swap(&mut self.color_balls.x_min, &mut self.color_balls.x_max);
        }
        if self.color_balls.lightness_max <= self.color_balls.lightness_min {
            log::warn!("empty lightness range, using defaults");
            self.color_balls.lightness_min = defaults.color_balls.lightness_min;
            self.color_balls.lightness_max = defaults.color_balls.lightness_max;
        }
        if self.cue_ball.radius <= 0.0 {
            log::warn!("cue ball radius must be positive, using default");
            self.cue_ball.radius = defaults.cue_ball.radius;
        }
        if self.color_balls.radius <= 0.0 {
            log::warn!("colored ball radius must be positive, using default");
            self.color_balls.radius = defaults.color_balls.radius;
        }
        if self.pocket.radius <= 0.0 {
            log::warn!("pocket radius must be positive, using default");
            self.pocket.radius = defaults.pocket.radius;
        }
        if self.ball_material.density <= 0.0 {
            log::warn!("ball density must be positive, using default");
            self.ball_material.density = defaults.ball_material.density;
        }
        for (name, stiffness, fallback) in [
            ("spring", &mut self.aim.spring_stiffness, defaults.aim.spring_stiffness),
            ("drag", &mut self.aim.drag_stiffness, defaults.aim.drag_stiffness),
        ] {
            if !(*stiffness > 0.0 && *stiffness <= 1.0) {
                log::warn!("{} stiffness {} out of (0, 1], using {}", name, stiffness, fallback);
                *stiffness = fallback;
            }
        }
        if self.aim.power < 0.0 {
            log::warn!("negative shot power {}, using 0", self.aim.power);
            self.aim.power = 0.0;
        }
        if self.aim.grace_seconds < 0.0 {
            log::warn!("negative grace delay, releasing immediately");
            self.aim.grace_seconds = 0.0;
        }
        self.walls.retain(|w| {
            let keep = w.width > 0.0 && w.height > 0.0;
            if !keep {
                log::warn!("dropping degenerate wall at {:?}", w.center);
            }
            keep
        });

        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_table() {
        let config = TableConfig::default();
        assert_eq!(config.cue_ball.position, Vec2::new(800.0, 300.0));
        assert_eq!(config.walls.len(), 4);
        assert_eq!(config.walls[2], WallConfig::new(Vec2::new(400.0, 400.0), 50.0, 660.0));
        assert_eq!(config.pocket.radius, 25.0);
        assert_eq!(config.damping, 0.99);
        assert_eq!(config.bounce.law, BounceLaw::Literal);
        assert_eq!(config.aim.shot_origin, ShotOrigin::BallCenter);
    }

    #[test]
    fn empty_json_is_default() {
        assert_eq!(TableConfig::from_json("{}").unwrap(), TableConfig::default());
    }

    #[test]
    fn partial_json_overrides_only_named_fields() {
        let config = TableConfig::from_json(
            r#"{
                "damping": 0.95,
                "cue_ball": { "position": [100.0, 120.0] },
                "bounce": { "law": "standard" },
                "aim": { "shot_origin": "drag_point" }
            }"#,
        )
        .unwrap();
        assert_eq!(config.damping, 0.95);
        assert_eq!(config.cue_ball.position, Vec2::new(100.0, 120.0));
        assert_eq!(config.cue_ball.radius, 20.0);
        assert_eq!(config.bounce.law, BounceLaw::Standard);
        assert_eq!(config.bounce.restitution, 0.5);
        assert_eq!(config.aim.shot_origin, ShotOrigin::DragPoint);
        assert_eq!(config.aim.power, SHOT_POWER);
    }

    #[test]
    fn invalid_json_is_an_error() {
        assert!(TableConfig::from_json("{ damping: }").is_err());
        assert!(TableConfig::from_json(r#"{ "bounce": { "law": "sideways" } }"#).is_err());
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let config = TableConfig::from_json(
            r#"{
                "damping": 1.5,
                "color_balls": { "count": 500, "x_min": 900.0, "x_max": 100.0 },
                "aim": { "spring_stiffness": 0.0, "power": -1.0 },
                "walls": [ { "center": [0.0, 0.0], "width": 0.0, "height": 10.0 } ]
            }"#,
        )
        .unwrap();
        assert_eq!(config.damping, 1.0);
        assert_eq!(config.color_balls.count, MAX_COLOR_BALLS);
        assert_eq!((config.color_balls.x_min, config.color_balls.x_max), (100.0, 900.0));
        assert_eq!(config.aim.spring_stiffness, 0.05);
        assert_eq!(config.aim.power, 0.0);
        assert!(config.walls.is_empty());
    }
}
