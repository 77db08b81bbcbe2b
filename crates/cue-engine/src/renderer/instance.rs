use bytemuck::{Pod, Zeroable};

/// Shape tag written into [`BodyInstance::shape`].
pub const SHAPE_CIRCLE: f32 = 0.0;
pub const SHAPE_RECT: f32 = 1.0;

/// Per-body render data read by the host renderer.
/// 10 floats = 40 bytes stride.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct BodyInstance {
    /// X position in world space.
    pub x: f32,
    /// Y position in world space.
    pub y: f32,
    /// Rotation in radians.
    pub rotation: f32,
    /// [`SHAPE_CIRCLE`] or [`SHAPE_RECT`].
    pub shape: f32,
    /// Radius for circles, half width for rectangles.
    pub half_width: f32,
    /// Radius for circles, half height for rectangles.
    pub half_height: f32,
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl BodyInstance {
    pub const FLOATS: usize = 10;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;
}

/// A visible constraint drawn as a stroke from its anchor to its body.
/// 8 floats = 32 bytes stride.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct LineInstance {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl LineInstance {
    pub const FLOATS: usize = 8;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;
}

/// Everything the host needs to draw one frame.
pub struct RenderBuffer {
    pub bodies: Vec<BodyInstance>,
    pub lines: Vec<LineInstance>,
    max_bodies: usize,
    max_lines: usize,
}

impl RenderBuffer {
    pub fn with_capacity(max_bodies: usize, max_lines: usize) -> Self {
        Self {
            bodies: Vec::with_capacity(max_bodies),
            lines: Vec::with_capacity(max_lines),
            max_bodies,
            max_lines,
        }
    }

    pub fn clear(&mut self) {
        self.bodies.clear();
        self.lines.clear();
    }

    /// Add a body instance. Returns `false` once the buffer is full.
    pub fn push_body(&mut self, instance: BodyInstance) -> bool {
        if self.bodies.len() >= self.max_bodies {
            return false;
        }
        self.bodies.push(instance);
        true
    }

    /// Add a line instance. Returns `false` once the buffer is full.
    pub fn push_line(&mut self, line: LineInstance) -> bool {
        if self.lines.len() >= self.max_lines {
            return false;
        }
        self.lines.push(line);
        true
    }

    pub fn body_count(&self) -> u32 {
        self.bodies.len() as u32
    }

    pub fn line_count(&self) -> u32 {
        self.lines.len() as u32
    }

    /// Raw pointer to body data for host reads.
    pub fn bodies_ptr(&self) -> *const f32 {
        self.bodies.as_ptr() as *const f32
    }

    /// Raw pointer to line data for host reads.
    pub fn lines_ptr(&self) -> *const f32 {
        self.lines.as_ptr() as *const f32
    }
}

impl Default for RenderBuffer {
    fn default() -> Self {
        Self::with_capacity(64, 16)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instance_strides() {
        assert_eq!(std::mem::size_of::<BodyInstance>(), BodyInstance::STRIDE_BYTES);
        assert_eq!(std::mem::size_of::<LineInstance>(), LineInstance::STRIDE_BYTES);
    }

    #[test]
    fn capacity_is_enforced() {
        let mut buf = RenderBuffer::with_capacity(1, 0);
        assert!(buf.push_body(BodyInstance::default()));
        assert!(!buf.push_body(BodyInstance::default()));
        assert!(!buf.push_line(LineInstance::default()));
        assert_eq!(buf.body_count(), 1);
        assert_eq!(buf.line_count(), 0);
    }

    #[test]
    fn bodies_cast_to_flat_floats() {
        let mut buf = RenderBuffer::default();
        buf.push_body(BodyInstance {
            x: 1.0,
            y: 2.0,
            a: 1.0,
            ..Default::default()
        });
        let floats: &[f32] = bytemuck::cast_slice(&buf.bodies);
        assert_eq!(floats.len(), BodyInstance::FLOATS);
        assert_eq!(floats[..2], [1.0, 2.0]);
        assert_eq!(floats[9], 1.0);
    }
}
