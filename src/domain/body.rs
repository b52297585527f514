/// Arcade physics bodies: axis-aligned rectangles with velocity.
///
/// `pos` is the CENTER of the rectangle, matching how sprites are placed
/// in world coordinates. `prev` is the center at the start of the last
/// physics step and is what collision resolution uses to decide which
/// side a body came from.

use glam::Vec2;

/// Which faces of a body are in contact with another body this step.
/// Cleared at the start of every physics step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Touching {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl Touching {
    pub fn none(&self) -> bool {
        !(self.up || self.down || self.left || self.right)
    }
}

#[derive(Clone, Debug)]
pub struct Body {
    pub pos: Vec2,
    pub prev: Vec2,
    pub size: Vec2,
    pub vel: Vec2,
    pub bounce: Vec2,
    pub allow_gravity: bool,
    pub collide_world_bounds: bool,
    /// Participates in physics and collision (Phaser's `body.enable`).
    pub enabled: bool,
    pub visible: bool,
    /// Contacts with other bodies.
    pub touching: Touching,
    /// Contacts with the world edge.
    pub blocked: Touching,
}

impl Body {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Body {
            pos,
            prev: pos,
            size,
            vel: Vec2::ZERO,
            bounce: Vec2::ZERO,
            allow_gravity: true,
            collide_world_bounds: false,
            enabled: true,
            visible: true,
            touching: Touching::default(),
            blocked: Touching::default(),
        }
    }

    /// Immovable body: no gravity, never integrated.
    pub fn new_static(pos: Vec2, size: Vec2) -> Self {
        Body { allow_gravity: false, ..Body::new(pos, size) }
    }

    #[inline] pub fn half(&self) -> Vec2 { self.size * 0.5 }
    #[inline] pub fn left(&self) -> f32 { self.pos.x - self.size.x * 0.5 }
    #[inline] pub fn right(&self) -> f32 { self.pos.x + self.size.x * 0.5 }
    #[inline] pub fn top(&self) -> f32 { self.pos.y - self.size.y * 0.5 }
    #[inline] pub fn bottom(&self) -> f32 { self.pos.y + self.size.y * 0.5 }

    /// Strict rectangle intersection. Bodies sharing an edge do not intersect.
    pub fn intersects(&self, other: &Body) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }

    /// Take the body out of the simulation and hide it.
    pub fn disable(&mut self) {
        self.enabled = false;
        self.visible = false;
        self.vel = Vec2::ZERO;
        self.touching = Touching::default();
        self.blocked = Touching::default();
    }

    /// Reset the body at `pos` with zero velocity, then enable and show it.
    pub fn enable_at(&mut self, pos: Vec2) {
        self.pos = pos;
        self.prev = pos;
        self.vel = Vec2::ZERO;
        self.touching = Touching::default();
        self.blocked = Touching::default();
        self.enabled = true;
        self.visible = true;
    }
}
