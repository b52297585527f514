/// Arcade physics: gravity, integration, world bounds and rectangle
/// collision between bodies.
///
/// ## Step order (per body)
///
///   1. `integrate`: remember `prev`, clear contacts, apply gravity,
///      move by velocity
///   2. `clamp_to_bounds`: keep bodies with `collide_world_bounds`
///      inside the world, reflecting velocity by bounce
///
/// Collisions run after every body has moved:
///   - `collide_static` separates a moving body from an immovable one
///   - `collide_bodies` separates two moving bodies
///   - `overlaps` only tests, never separates
///
/// ## Pause
///
/// A paused world freezes every body. The caller checks `accepts_writes()`
/// before stepping, resolving contacts, or writing a velocity.

use glam::Vec2;

use super::body::Body;

/// Slack when deciding which side a body approached from.
const SIDE_EPSILON: f32 = 0.5;

#[derive(Clone, Debug)]
pub struct ArcadeWorld {
    /// World rectangle, top-left origin.
    pub width: f32,
    pub height: f32,
    pub gravity: Vec2,
    /// Draw body outlines.
    pub debug: bool,
    paused: bool,
}

impl ArcadeWorld {
    pub fn new(width: f32, height: f32, gravity_y: f32) -> Self {
        ArcadeWorld {
            width,
            height,
            gravity: Vec2::new(0.0, gravity_y),
            debug: false,
            paused: false,
        }
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Velocity writes, integration and contact resolution are no-ops
    /// while paused.
    #[inline]
    pub fn accepts_writes(&self) -> bool {
        !self.paused
    }

    /// Integrate and bound one dynamic body. Disabled bodies stay put.
    pub fn step_body(&self, body: &mut Body, dt: f32) {
        if self.paused || !body.enabled {
            return;
        }
        integrate(body, self.gravity, dt);
        if body.collide_world_bounds {
            clamp_to_bounds(body, self.width, self.height);
        }
    }
}

/// Apply gravity then velocity. Clears contact flags from the last step.
pub fn integrate(body: &mut Body, gravity: Vec2, dt: f32) {
    body.prev = body.pos;
    body.touching = Default::default();
    body.blocked = Default::default();
    if body.allow_gravity {
        body.vel += gravity * dt;
    }
    body.pos += body.vel * dt;
}

/// Keep the body inside `[0, width] x [0, height]`.
/// Velocity into a wall is reflected and scaled by bounce.
pub fn clamp_to_bounds(body: &mut Body, width: f32, height: f32) {
    let half = body.half();

    if body.left() < 0.0 {
        body.pos.x = half.x;
        if body.vel.x < 0.0 { body.vel.x = -body.vel.x * body.bounce.x; }
        body.blocked.left = true;
    } else if body.right() > width {
        body.pos.x = width - half.x;
        if body.vel.x > 0.0 { body.vel.x = -body.vel.x * body.bounce.x; }
        body.blocked.right = true;
    }

    if body.top() < 0.0 {
        body.pos.y = half.y;
        if body.vel.y < 0.0 { body.vel.y = -body.vel.y * body.bounce.y; }
        body.blocked.up = true;
    } else if body.bottom() > height {
        body.pos.y = height - half.y;
        if body.vel.y > 0.0 { body.vel.y = -body.vel.y * body.bounce.y; }
        body.blocked.down = true;
    }
}

/// Which face of `body` made contact.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Down,
    Up,
    Left,
    Right,
}

/// Decide the contact face from where the body was before this step.
/// Falls back to the axis of least penetration when `prev` was already
/// inside (e.g. the body spawned overlapping).
fn contact_side(body: &Body, solid: &Body) -> Side {
    let half = body.half();
    let prev_top = body.prev.y - half.y;
    let prev_bottom = body.prev.y + half.y;
    let prev_left = body.prev.x - half.x;
    let prev_right = body.prev.x + half.x;

    if prev_bottom <= solid.top() + SIDE_EPSILON {
        return Side::Down;
    }
    if prev_top >= solid.bottom() - SIDE_EPSILON {
        return Side::Up;
    }
    if prev_right <= solid.left() + SIDE_EPSILON {
        return Side::Right;
    }
    if prev_left >= solid.right() - SIDE_EPSILON {
        return Side::Left;
    }

    let push_up = body.bottom() - solid.top();
    let push_down = solid.bottom() - body.top();
    let push_left = body.right() - solid.left();
    let push_right = solid.right() - body.left();
    let min_y = push_up.min(push_down);
    let min_x = push_left.min(push_right);
    if min_y <= min_x {
        if push_up <= push_down { Side::Down } else { Side::Up }
    } else if push_left <= push_right {
        Side::Right
    } else {
        Side::Left
    }
}

/// Separate a moving body from an immovable one.
/// Returns the contact face, or None if they do not intersect.
pub fn collide_static(body: &mut Body, solid: &Body) -> Option<Side> {
    if !body.enabled || !solid.enabled || !body.intersects(solid) {
        return None;
    }

    let half = body.half();
    let side = contact_side(body, solid);
    match side {
        Side::Down => {
            body.pos.y = solid.top() - half.y;
            if body.vel.y > 0.0 { body.vel.y = -body.vel.y * body.bounce.y; }
            body.touching.down = true;
        }
        Side::Up => {
            body.pos.y = solid.bottom() + half.y;
            if body.vel.y < 0.0 { body.vel.y = -body.vel.y * body.bounce.y; }
            body.touching.up = true;
        }
        Side::Right => {
            body.pos.x = solid.left() - half.x;
            if body.vel.x > 0.0 { body.vel.x = -body.vel.x * body.bounce.x; }
            body.touching.right = true;
        }
        Side::Left => {
            body.pos.x = solid.right() + half.x;
            if body.vel.x < 0.0 { body.vel.x = -body.vel.x * body.bounce.x; }
            body.touching.left = true;
        }
    }
    Some(side)
}

/// Separate two moving bodies of equal mass.
/// Each is pushed back half the penetration and the velocity components
/// on the contact axis are exchanged, scaled by each body's bounce.
pub fn collide_bodies(a: &mut Body, b: &mut Body) -> bool {
    if !a.enabled || !b.enabled || !a.intersects(b) {
        return false;
    }

    let side = contact_side(a, b);
    match side {
        Side::Down | Side::Up => {
            let overlap = if side == Side::Down {
                a.bottom() - b.top()
            } else {
                b.bottom() - a.top()
            };
            let dir = if side == Side::Down { 1.0 } else { -1.0 };
            a.pos.y -= dir * overlap * 0.5;
            b.pos.y += dir * overlap * 0.5;
            let (va, vb) = (a.vel.y, b.vel.y);
            a.vel.y = vb * a.bounce.y;
            b.vel.y = va * b.bounce.y;
            if side == Side::Down {
                a.touching.down = true;
                b.touching.up = true;
            } else {
                a.touching.up = true;
                b.touching.down = true;
            }
        }
        Side::Right | Side::Left => {
            let overlap = if side == Side::Right {
                a.right() - b.left()
            } else {
                b.right() - a.left()
            };
            let dir = if side == Side::Right { 1.0 } else { -1.0 };
            a.pos.x -= dir * overlap * 0.5;
            b.pos.x += dir * overlap * 0.5;
            let (va, vb) = (a.vel.x, b.vel.x);
            a.vel.x = vb * a.bounce.x;
            b.vel.x = va * b.bounce.x;
            if side == Side::Right {
                a.touching.right = true;
                b.touching.left = true;
            } else {
                a.touching.left = true;
                b.touching.right = true;
            }
        }
    }
    true
}

/// Intersection test without separation. Disabled bodies never overlap.
pub fn overlaps(a: &Body, b: &Body) -> bool {
    a.enabled && b.enabled && a.intersects(b)
}
