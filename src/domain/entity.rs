use glam::Vec2;

use super::anim::{AnimKey, Animator};
use super::body::Body;

/// Tint applied to the player on game over (RGB).
pub const TINT_RED: u32 = 0xFF0000;

/// Directional key state sampled once per frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameInput {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

#[derive(Debug)]
pub struct Player {
    pub body: Body,
    pub anim: Animator,
    pub tint: Option<u32>,
}

impl Player {
    pub fn new(pos: Vec2, size: Vec2, bounce: f32) -> Self {
        let mut body = Body::new(pos, size);
        body.bounce = Vec2::splat(bounce);
        body.collide_world_bounds = true;
        Player {
            body,
            anim: Animator::new(AnimKey::Turn),
            tint: None,
        }
    }

    pub fn x(&self) -> f32 {
        self.body.pos.x
    }

    /// Resting on top of something this step.
    pub fn grounded(&self) -> bool {
        self.body.touching.down
    }
}

/// A collectible. `home_x` is where it respawns on level advance.
#[derive(Debug)]
pub struct Star {
    pub body: Body,
    pub home_x: f32,
}

impl Star {
    pub fn new(pos: Vec2, size: Vec2, bounce_y: f32) -> Self {
        let mut body = Body::new(pos, size);
        body.bounce = Vec2::new(0.0, bounce_y);
        Star { body, home_x: pos.x }
    }

    pub fn is_active(&self) -> bool {
        self.body.enabled
    }
}

#[derive(Debug)]
pub struct Bomb {
    pub id: u32,
    pub body: Body,
}

impl Bomb {
    pub fn new(id: u32, pos: Vec2, size: Vec2, vel: Vec2) -> Self {
        let mut body = Body::new(pos, size);
        body.bounce = Vec2::ONE;
        body.collide_world_bounds = true;
        body.vel = vel;
        Bomb { id, body }
    }
}

#[derive(Debug)]
pub struct Platform {
    pub body: Body,
    pub scale: f32,
}

impl Platform {
    /// `image_size` is the unscaled texture size; the body covers the
    /// scaled sprite.
    pub fn new(pos: Vec2, image_size: Vec2, scale: f32) -> Self {
        Platform {
            body: Body::new_static(pos, image_size * scale),
            scale,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn player_defaults() {
        let p = Player::new(Vec2::new(100.0, 450.0), Vec2::new(32.0, 48.0), 0.2);
        assert_eq!(p.x(), 100.0);
        assert!(p.body.collide_world_bounds);
        assert_eq!(p.body.bounce, Vec2::splat(0.2));
        assert_eq!(p.anim.current(), AnimKey::Turn);
        assert!(p.tint.is_none());
        assert!(!p.grounded());
    }

    #[test]
    fn star_only_bounces_vertically() {
        let s = Star::new(Vec2::new(82.0, 0.0), Vec2::new(24.0, 22.0), 0.6);
        assert_eq!(s.body.bounce, Vec2::new(0.0, 0.6));
        assert_eq!(s.home_x, 82.0);
        assert!(s.is_active());
        assert!(!s.body.collide_world_bounds);
    }

    #[test]
    fn bomb_is_fully_elastic() {
        let b = Bomb::new(1, Vec2::new(500.0, 0.0), Vec2::new(14.0, 14.0), Vec2::new(-120.0, 20.0));
        assert_eq!(b.body.bounce, Vec2::ONE);
        assert!(b.body.collide_world_bounds);
        assert_eq!(b.body.vel, Vec2::new(-120.0, 20.0));
    }

    #[test]
    fn player_debug_names_its_parts() {
        let p = Player::new(Vec2::new(100.0, 450.0), Vec2::new(32.0, 48.0), 0.2);
        let text = format!("{:?}", p);
        assert!(text.contains("body"));
        assert!(text.contains("anim"));
        assert!(text.contains("tint: None"));
    }

    #[test]
    fn scaled_platform_doubles_body() {
        let p = Platform::new(Vec2::new(400.0, 568.0), Vec2::new(400.0, 32.0), 2.0);
        assert_eq!(p.body.size, Vec2::new(800.0, 64.0));
        assert_eq!(p.body.top(), 536.0);
        assert!(!p.body.allow_gravity);
    }
}
