/// WorldState: everything the running scene owns.
///
/// One value, threaded through every transition function. The physics
/// world, entity lists, session counters and the RNG all live here so a
/// scene built from the same seed replays identically.
///
/// ## Level tracking
///
/// There is no level counter that drives behavior. A level is over when
/// `active_stars()` reaches zero. `levels_cleared` is kept for the HUD
/// and the log only.

use glam::Vec2;
use rand_pcg::Pcg32;

use crate::domain::entity::{Bomb, Platform, Player, Star};
use crate::domain::physics::ArcadeWorld;
use crate::domain::rules::{CollisionRule, MotionTuning};

pub const WORLD_WIDTH: f32 = 800.0;
pub const WORLD_HEIGHT: f32 = 600.0;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    Playing,
    /// Terminal. Entered once, never left.
    GameOver,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GameSession {
    pub score: u32,
    pub game_over: bool,
}

/// A placed image with no body (the sky).
#[derive(Clone, Debug)]
pub struct Backdrop {
    pub key: &'static str,
    /// Center of the image.
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Text overlay drawn at a world position.
#[derive(Clone, Debug)]
pub struct TextLabel {
    pub x: f32,
    pub y: f32,
    pub text: String,
}

pub struct WorldState {
    pub session: GameSession,
    pub physics: ArcadeWorld,
    pub tuning: MotionTuning,

    // ── Display ──
    pub backdrop: Option<Backdrop>,
    pub score_text: TextLabel,

    // ── Entities ──
    pub platforms: Vec<Platform>,
    pub player: Player,
    pub stars: Vec<Star>,
    pub bombs: Vec<Bomb>,
    /// Body size for bombs spawned later (from the `bomb` texture).
    pub bomb_size: Vec2,

    // ── Collision policy (registered by create) ──
    pub colliders: Vec<CollisionRule>,

    // ── Meta ──
    pub seed: u64,
    pub rng: Pcg32,
    pub tick: u64,
    pub levels_cleared: u32,
    next_bomb_id: u32,
}

impl WorldState {
    /// Empty world. `sim::scene::create` fills it.
    pub fn new(physics: ArcadeWorld, tuning: MotionTuning, player: Player, seed: u64, rng: Pcg32) -> Self {
        WorldState {
            session: GameSession::default(),
            physics,
            tuning,
            backdrop: None,
            score_text: TextLabel { x: 16.0, y: 16.0, text: String::new() },
            platforms: vec![],
            player,
            stars: vec![],
            bombs: vec![],
            bomb_size: Vec2::ZERO,
            colliders: vec![],
            seed,
            rng,
            tick: 0,
            levels_cleared: 0,
            next_bomb_id: 1,
        }
    }

    pub fn phase(&self) -> Phase {
        if self.session.game_over { Phase::GameOver } else { Phase::Playing }
    }

    pub fn active_stars(&self) -> usize {
        self.stars.iter().filter(|s| s.is_active()).count()
    }

    pub fn next_bomb_id(&mut self) -> u32 {
        let id = self.next_bomb_id;
        self.next_bomb_id += 1;
        id
    }
}
