/// Scene lifecycle: preload → create → update (once per frame).
///
/// `preload` only declares assets. `create` runs once and builds the
/// world in a fixed order:
///   background → platforms → player → stars → bombs → colliders
/// `update` maps input to player motion. It has no game-over branch of
/// its own; once the physics world is paused its writes are dropped.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::config::GameConfig;
use crate::domain::entity::FrameInput;
use crate::domain::physics::ArcadeWorld;
use crate::domain::rules::{self, MotionTuning};
use super::assets::{AssetCache, AssetError, AssetLoader};
use super::build;
use super::event::GameEvent;
use super::world::{WorldState, WORLD_HEIGHT, WORLD_WIDTH};

pub fn preload(loader: &mut AssetLoader) {
    loader.image("sky", "assets/sky.png");
    loader.image("ground", "assets/platform.png");
    loader.image("star", "assets/star.png");
    loader.image("bomb", "assets/bomb.png");
    loader.spritesheet("dude", "assets/dude.png", 32, 48);
}

pub fn create(assets: &AssetCache, config: &GameConfig, seed: u64) -> Result<WorldState, AssetError> {
    let mut physics = ArcadeWorld::new(WORLD_WIDTH, WORLD_HEIGHT, config.world.gravity);
    physics.debug = config.world.debug;
    let tuning = MotionTuning {
        run_speed: config.player.run_speed,
        jump_speed: config.player.jump_speed,
    };

    let (backdrop, score_text) = build::create_background(assets)?;
    let platforms = build::create_platforms(assets)?;
    let player = build::create_player(assets, config.player.bounce)?;

    let mut world = WorldState::new(physics, tuning, player, seed, Pcg32::seed_from_u64(seed));
    world.backdrop = Some(backdrop);
    world.score_text = score_text;
    world.platforms = platforms;
    world.stars = build::create_stars(assets, &mut world.rng)?;
    world.bomb_size = build::create_bombs(assets)?;
    build::set_colliders(&mut world);

    log::info!(
        "scene created: seed {}, backdrop '{}', {} platforms, {} stars, {} collider rules",
        seed,
        world.backdrop.as_ref().map_or("none", |b| b.key),
        world.platforms.len(),
        world.stars.len(),
        world.colliders.len()
    );
    Ok(world)
}

pub fn update(world: &mut WorldState, input: &FrameInput, events: &mut Vec<GameEvent>) {
    if !world.physics.accepts_writes() {
        return;
    }

    let motion = rules::map_input(input, world.player.grounded(), &world.tuning);
    let player = &mut world.player;
    player.body.vel.x = motion.vx;
    player.anim.play(motion.anim, motion.ignore_if_playing);

    if let Some(vy) = motion.vy {
        player.body.vel.y = vy;
        events.push(GameEvent::Jumped);
    }
}

/// Preload and create in one go.
pub fn boot(config: &GameConfig, seed: u64) -> Result<WorldState, AssetError> {
    let mut loader = AssetLoader::new();
    preload(&mut loader);
    log::info!("preloading {} assets", loader.len());
    let assets = loader.load()?;
    log::debug!("{} textures ready", assets.len());
    create(&assets, config, seed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::anim::AnimKey;
    use crate::sim::progress;
    use crate::sim::world::Phase;

    fn fresh() -> WorldState {
        boot(&GameConfig::default(), 42).unwrap()
    }

    fn held(left: bool, right: bool, up: bool) -> FrameInput {
        FrameInput { left, right, up, down: false }
    }

    #[test]
    fn create_initializes_session() {
        let w = fresh();
        assert_eq!(w.session.score, 0);
        assert!(!w.session.game_over);
        assert_eq!(w.phase(), Phase::Playing);
        assert_eq!(w.score_text.text, "Score: 0");
        assert_eq!(w.platforms.len(), 4);
        assert_eq!(w.stars.len(), 12);
        assert_eq!(w.active_stars(), 12);
        assert!(w.bombs.is_empty());
        assert_eq!(w.colliders.len(), 5);
        assert_eq!(w.physics.gravity.y, 600.0);
        assert!(w.backdrop.is_some());
    }

    #[test]
    fn same_seed_same_stars() {
        let a = boot(&GameConfig::default(), 5).unwrap();
        let b = boot(&GameConfig::default(), 5).unwrap();
        let bounce = |w: &WorldState| w.stars.iter().map(|s| s.body.bounce.y).collect::<Vec<_>>();
        assert_eq!(bounce(&a), bounce(&b));
    }

    #[test]
    fn update_sets_run_velocity_and_animation() {
        let mut w = fresh();
        let mut events = vec![];
        update(&mut w, &held(true, false, false), &mut events);
        assert_eq!(w.player.body.vel.x, -160.0);
        assert_eq!(w.player.anim.current(), AnimKey::Left);

        update(&mut w, &held(false, false, false), &mut events);
        assert_eq!(w.player.body.vel.x, 0.0);
        assert_eq!(w.player.anim.current(), AnimKey::Turn);
        assert!(events.is_empty());
    }

    #[test]
    fn jump_only_from_ground() {
        let mut w = fresh();
        let mut events = vec![];
        update(&mut w, &held(false, false, true), &mut events);
        assert!(events.is_empty());

        w.player.body.touching.down = true;
        update(&mut w, &held(false, false, true), &mut events);
        assert_eq!(w.player.body.vel.y, -500.0);
        assert_eq!(events, vec![GameEvent::Jumped]);
    }

    #[test]
    fn update_is_inert_after_game_over() {
        let mut w = fresh();
        let mut events = vec![];
        progress::end_game(&mut w, 1, &mut events);
        events.clear();

        w.player.body.touching.down = true;
        let vel = w.player.body.vel;
        update(&mut w, &held(false, true, true), &mut events);
        assert_eq!(w.player.body.vel, vel);
        assert_eq!(w.player.anim.current(), AnimKey::Turn);
        assert!(events.is_empty());
    }
}
