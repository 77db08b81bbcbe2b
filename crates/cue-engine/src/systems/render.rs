use crate::api::game::EngineContext;
use crate::core::physics::ColliderDesc;
use crate::renderer::instance::{BodyInstance, LineInstance, RenderBuffer, SHAPE_CIRCLE, SHAPE_RECT};

/// Build the render buffer from the current world.
/// Bodies are written in spawn order; entities without a visible style or
/// without a collider are skipped. Only visible constraints produce lines.
pub fn build_render_buffer(ctx: &EngineContext, buffer: &mut RenderBuffer) {
    buffer.clear();

    for entity in ctx.scene.iter() {
        if !entity.active {
            continue;
        }
        let Some(style) = entity.style.filter(|s| s.visible) else {
            continue;
        };
        let Some(shape) = entity
            .body
            .as_ref()
            .and_then(|body| ctx.physics.collider_shape(body))
        else {
            continue;
        };

        let (shape, half_width, half_height) = match shape {
            ColliderDesc::Ball { radius } => (SHAPE_CIRCLE, radius, radius),
            ColliderDesc::Cuboid {
                half_width,
                half_height,
            } => (SHAPE_RECT, half_width, half_height),
        };

        let pushed = buffer.push_body(BodyInstance {
            x: entity.pos.x,
            y: entity.pos.y,
            rotation: entity.rotation,
            shape,
            half_width,
            half_height,
            r: style.color.r,
            g: style.color.g,
            b: style.color.b,
            a: style.color.a,
        });
        if !pushed {
            log::warn!("render buffer full, dropping bodies after {}", buffer.body_count());
            break;
        }
    }

    for constraint in ctx.constraints.iter() {
        if !constraint.style.visible {
            continue;
        }
        let Some(end) = ctx.position(constraint.body) else {
            continue;
        };
        let color = constraint.style.color;
        if !buffer.push_line(LineInstance {
            x1: constraint.anchor.x,
            y1: constraint.anchor.y,
            x2: end.x,
            y2: end.y,
            r: color.r,
            g: color.g,
            b: color.b,
            a: color.a,
        }) {
            break;
        }
    }
}
