/// World builder: the fixed layout of the single scene.
///
/// Each step reads texture geometry from the asset cache and returns the
/// pieces it built. `scene::create` calls them in order and registers the
/// collision policy last, once every body exists.

use std::ops::Range;

use glam::Vec2;
use rand::Rng;

use crate::domain::anim::PLAYER_ANIMATIONS;
use crate::domain::entity::{Platform, Player, Star};
use crate::domain::rules::COLLISION_RULES;
use super::assets::{AssetCache, AssetError, Texture};
use super::progress::score_label;
use super::world::{Backdrop, TextLabel, WorldState, WORLD_HEIGHT, WORLD_WIDTH};

/// (x, y, scale) of each ledge. The first one is the ground.
const PLATFORM_LAYOUT: [(f32, f32, f32); 4] = [
    (400.0, 568.0, 2.0),
    (600.0, 400.0, 1.0),
    (50.0, 250.0, 1.0),
    (750.0, 220.0, 1.0),
];

const PLAYER_SPAWN: Vec2 = Vec2::new(100.0, 450.0);

const STAR_COUNT: usize = 12;
const STAR_FIRST_X: f32 = 12.0;
const STAR_STEP_X: f32 = 70.0;
const STAR_BOUNCE: Range<f32> = 0.4..0.8;

const SCORE_TEXT_POS: Vec2 = Vec2::new(16.0, 16.0);

fn frame_size(t: &Texture) -> Vec2 {
    Vec2::new(t.frame_width as f32, t.frame_height as f32)
}

/// Sky centered in the world, plus the score overlay.
pub fn create_background(assets: &AssetCache) -> Result<(Backdrop, TextLabel), AssetError> {
    let sky = frame_size(assets.get("sky")?);
    let backdrop = Backdrop {
        key: "sky",
        x: WORLD_WIDTH / 2.0,
        y: WORLD_HEIGHT / 2.0,
        width: sky.x,
        height: sky.y,
    };
    let label = TextLabel {
        x: SCORE_TEXT_POS.x,
        y: SCORE_TEXT_POS.y,
        text: score_label(0),
    };
    Ok((backdrop, label))
}

pub fn create_platforms(assets: &AssetCache) -> Result<Vec<Platform>, AssetError> {
    let ground = frame_size(assets.get("ground")?);
    Ok(PLATFORM_LAYOUT
        .iter()
        .map(|&(x, y, scale)| Platform::new(Vec2::new(x, y), ground, scale))
        .collect())
}

pub fn create_player(assets: &AssetCache, bounce: f32) -> Result<Player, AssetError> {
    let dude = assets.get("dude")?;
    let needed = PLAYER_ANIMATIONS
        .iter()
        .map(|a| (a.first_frame + a.frame_count) as u32)
        .max()
        .unwrap_or(0);
    if dude.frame_count < needed {
        return Err(AssetError::TooFewFrames {
            key: dude.key.clone(),
            needed,
            found: dude.frame_count,
        });
    }
    Ok(Player::new(PLAYER_SPAWN, frame_size(dude), bounce))
}

/// Twelve stars in a row along the top edge, each with its own bounce.
pub fn create_stars<R: Rng>(assets: &AssetCache, rng: &mut R) -> Result<Vec<Star>, AssetError> {
    let size = frame_size(assets.get("star")?);
    Ok((0..STAR_COUNT)
        .map(|i| {
            let x = STAR_FIRST_X + STAR_STEP_X * i as f32;
            let bounce_y = rng.random_range(STAR_BOUNCE);
            Star::new(Vec2::new(x, 0.0), size, bounce_y)
        })
        .collect())
}

/// The bomb group starts empty; this resolves the size bombs spawn with.
pub fn create_bombs(assets: &AssetCache) -> Result<Vec2, AssetError> {
    Ok(frame_size(assets.get("bomb")?))
}

pub fn set_colliders(world: &mut WorldState) {
    world.colliders = COLLISION_RULES.to_vec();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::assets::AssetLoader;
    use crate::sim::scene;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn assets() -> AssetCache {
        let mut loader = AssetLoader::new();
        scene::preload(&mut loader);
        loader.load().unwrap()
    }

    #[test]
    fn four_platforms_with_scaled_ground() {
        let platforms = create_platforms(&assets()).unwrap();
        assert_eq!(platforms.len(), 4);
        assert_eq!(platforms[0].body.size, Vec2::new(800.0, 64.0));
        assert_eq!(platforms[0].scale, 2.0);
        for p in &platforms[1..] {
            assert_eq!(p.body.size, Vec2::new(400.0, 32.0));
        }
        assert_eq!(platforms[3].body.pos, Vec2::new(750.0, 220.0));
    }

    #[test]
    fn player_spawns_left_of_center() {
        let player = create_player(&assets(), 0.2).unwrap();
        assert_eq!(player.body.pos, Vec2::new(100.0, 450.0));
        assert_eq!(player.body.size, Vec2::new(32.0, 48.0));
    }

    #[test]
    fn stars_in_a_row_with_bounded_bounce() {
        let mut rng = Pcg32::seed_from_u64(9);
        let stars = create_stars(&assets(), &mut rng).unwrap();
        assert_eq!(stars.len(), 12);
        for (i, s) in stars.iter().enumerate() {
            assert_eq!(s.body.pos, Vec2::new(12.0 + 70.0 * i as f32, 0.0));
            assert!((0.4..=0.8).contains(&s.body.bounce.y));
            assert_eq!(s.body.bounce.x, 0.0);
        }
        assert_eq!(stars[11].body.pos.x, 782.0);
    }

    #[test]
    fn bomb_group_uses_bomb_texture() {
        assert_eq!(create_bombs(&assets()).unwrap(), Vec2::new(14.0, 14.0));
    }

    #[test]
    fn short_sprite_sheet_is_rejected() {
        let mut loader = AssetLoader::new();
        loader.spritesheet("dude", "assets/dude.png", 96, 48);
        let cache = loader.load().unwrap();
        assert_eq!(
            create_player(&cache, 0.2).unwrap_err(),
            AssetError::TooFewFrames { key: "dude".into(), needed: 9, found: 3 }
        );
    }

    #[test]
    fn missing_sky_fails_background() {
        let cache = AssetLoader::new().load().unwrap();
        assert!(create_background(&cache).is_err());
    }

    #[test]
    fn score_overlay_starts_at_zero() {
        let (sky, label) = create_background(&assets()).unwrap();
        assert_eq!((sky.x, sky.y, sky.width, sky.height), (400.0, 300.0, 800.0, 600.0));
        assert_eq!(label.text, "Score: 0");
        assert_eq!((label.x, label.y), (16.0, 16.0));
    }
}
