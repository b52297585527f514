/// Progression: score, level clear, level advance, game over.
///
/// States: Playing → GameOver (terminal).
/// Inside Playing, a level ends when the last active star is collected;
/// the next level reuses the same stars and adds one more bomb.

use glam::Vec2;
use rand::Rng;

use crate::domain::anim::AnimKey;
use crate::domain::entity::{Bomb, TINT_RED};
use super::event::GameEvent;
use super::world::{WorldState, WORLD_WIDTH};

pub const STAR_POINTS: u32 = 10;
/// Vertical speed of a freshly spawned bomb (downward).
const BOMB_DROP_SPEED: f32 = 20.0;
const BOMB_MAX_VX: i32 = 200;

pub fn score_label(score: u32) -> String {
    format!("Score: {}", score)
}

/// Player overlapped star `index`. Inactive stars are ignored.
/// Returns true if the star was collected.
pub fn collect_star(world: &mut WorldState, index: usize, events: &mut Vec<GameEvent>) -> bool {
    if world.session.game_over {
        return false;
    }
    let Some(star) = world.stars.get_mut(index) else { return false };
    if !star.is_active() {
        return false;
    }

    star.body.disable();
    world.session.score += STAR_POINTS;
    world.score_text.text = score_label(world.session.score);
    events.push(GameEvent::StarCollected { index, score: world.session.score });
    log::debug!("star {} collected, score {}", index, world.session.score);

    if world.active_stars() == 0 {
        next_level(world, events);
    }
    true
}

/// Reset every star to the top of the screen and add one bomb on the
/// side of the world away from the player.
pub fn next_level(world: &mut WorldState, events: &mut Vec<GameEvent>) {
    for star in &mut world.stars {
        let home = Vec2::new(star.home_x, 0.0);
        star.body.enable_at(home);
    }
    world.levels_cleared += 1;
    events.push(GameEvent::LevelCleared { levels_cleared: world.levels_cleared });
    log::info!(
        "level {} cleared with score {}",
        world.levels_cleared, world.session.score
    );

    let x = bomb_spawn_x(world.player.x(), &mut world.rng);
    let vx = world.rng.random_range(-BOMB_MAX_VX..=BOMB_MAX_VX) as f32;
    spawn_bomb(world, x, vx, events);
}

/// Uniform integer x on the opposite half of the world from `player_x`.
pub fn bomb_spawn_x<R: Rng>(player_x: f32, rng: &mut R) -> f32 {
    let mid = (WORLD_WIDTH / 2.0) as i32;
    let full = WORLD_WIDTH as i32;
    let x = if player_x < mid as f32 {
        rng.random_range(mid..=full)
    } else {
        rng.random_range(0..=mid)
    };
    x as f32
}

pub fn spawn_bomb(world: &mut WorldState, x: f32, vx: f32, events: &mut Vec<GameEvent>) {
    let id = world.next_bomb_id();
    let size = world.bomb_size;
    let bomb = Bomb::new(id, Vec2::new(x, 0.0), size, Vec2::new(vx, BOMB_DROP_SPEED));
    world.bombs.push(bomb);
    events.push(GameEvent::BombSpawned { id, x, vx });
    log::info!("bomb {} spawned at x={} vx={} ({} total)", id, x, vx, world.bombs.len());
}

/// Player touched a bomb: freeze the world and mark the player.
/// Idempotent; only the first call has any effect.
pub fn end_game(world: &mut WorldState, bomb_id: u32, events: &mut Vec<GameEvent>) {
    if world.session.game_over {
        return;
    }
    world.physics.pause();
    world.player.tint = Some(TINT_RED);
    world.player.anim.play(AnimKey::Turn, false);
    world.session.game_over = true;
    events.push(GameEvent::GameOver { bomb_id, score: world.session.score });
    log::info!(
        "game over: bomb {} hit the player, final score {}",
        bomb_id, world.session.score
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::sim::scene;
    use crate::sim::world::Phase;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn fresh(seed: u64) -> WorldState {
        scene::boot(&GameConfig::default(), seed).unwrap()
    }

    fn collect_all(world: &mut WorldState, events: &mut Vec<GameEvent>) {
        for i in 0..world.stars.len() {
            collect_star(world, i, events);
        }
    }

    #[test]
    fn first_star_scores_ten() {
        let mut w = fresh(1);
        let mut events = vec![];
        assert!(collect_star(&mut w, 0, &mut events));
        assert_eq!(w.session.score, 10);
        assert_eq!(w.score_text.text, "Score: 10");
        assert_eq!(w.active_stars(), 11);
        assert_eq!(events, vec![GameEvent::StarCollected { index: 0, score: 10 }]);
    }

    #[test]
    fn collecting_inactive_star_does_nothing() {
        let mut w = fresh(1);
        let mut events = vec![];
        collect_star(&mut w, 3, &mut events);
        events.clear();
        assert!(!collect_star(&mut w, 3, &mut events));
        assert_eq!(w.session.score, 10);
        assert!(events.is_empty());
    }

    #[test]
    fn out_of_range_index_is_ignored() {
        let mut w = fresh(1);
        let mut events = vec![];
        assert!(!collect_star(&mut w, 99, &mut events));
        assert_eq!(w.session.score, 0);
    }

    #[test]
    fn clearing_all_stars_advances_level() {
        let mut w = fresh(7);
        let mut events = vec![];
        collect_all(&mut w, &mut events);

        assert_eq!(w.session.score, 120);
        assert_eq!(w.active_stars(), 12);
        assert_eq!(w.bombs.len(), 1);
        assert_eq!(w.bombs[0].body.pos.y, 0.0);
        assert_eq!(w.bombs[0].body.vel.y, 20.0);
        assert_eq!(w.levels_cleared, 1);
        assert!(!w.session.game_over);
        for s in &w.stars {
            assert_eq!(s.body.pos, Vec2::new(s.home_x, 0.0));
            assert_eq!(s.body.vel, Vec2::ZERO);
        }
        let clears = events.iter().filter(|e| matches!(e, GameEvent::LevelCleared { .. })).count();
        assert_eq!(clears, 1);
    }

    #[test]
    fn level_advance_only_on_last_star() {
        let mut w = fresh(3);
        let mut events = vec![];
        for i in 0..11 {
            collect_star(&mut w, i, &mut events);
            assert!(w.bombs.is_empty());
        }
        assert_eq!(w.active_stars(), 1);
        collect_star(&mut w, 11, &mut events);
        assert_eq!(w.bombs.len(), 1);
    }

    #[test]
    fn bombs_accumulate_across_levels() {
        let mut w = fresh(11);
        let mut events = vec![];
        for level in 1..=3 {
            collect_all(&mut w, &mut events);
            assert_eq!(w.bombs.len(), level);
        }
        let ids: Vec<u32> = w.bombs.iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(w.session.score, 360);
    }

    #[test]
    fn bomb_spawns_opposite_the_player() {
        for seed in 0..50 {
            let mut w = fresh(seed);
            assert_eq!(w.player.x(), 100.0);
            let mut events = vec![];
            collect_all(&mut w, &mut events);
            let b = &w.bombs[0].body;
            assert!((400.0..=800.0).contains(&b.pos.x), "seed {seed}: x={}", b.pos.x);
            assert!((-200.0..=200.0).contains(&b.vel.x));
        }
    }

    #[test]
    fn spawn_side_flips_with_player() {
        let mut rng = Pcg32::seed_from_u64(5);
        for _ in 0..200 {
            let right = bomb_spawn_x(100.0, &mut rng);
            assert!((400.0..=800.0).contains(&right));
            let left = bomb_spawn_x(400.0, &mut rng);
            assert!((0.0..=400.0).contains(&left));
            assert_eq!(left.fract(), 0.0);
        }
    }

    #[test]
    fn end_game_freezes_and_tints() {
        let mut w = fresh(1);
        let mut events = vec![];
        w.player.anim.play(AnimKey::Left, true);
        end_game(&mut w, 4, &mut events);

        assert_eq!(w.phase(), Phase::GameOver);
        assert!(w.physics.is_paused());
        assert_eq!(w.player.tint, Some(0xFF0000));
        assert_eq!(w.player.anim.current(), AnimKey::Turn);
        assert_eq!(events, vec![GameEvent::GameOver { bomb_id: 4, score: 0 }]);

        end_game(&mut w, 5, &mut events);
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn no_scoring_after_game_over() {
        let mut w = fresh(1);
        let mut events = vec![];
        end_game(&mut w, 1, &mut events);
        assert!(!collect_star(&mut w, 0, &mut events));
        assert_eq!(w.session.score, 0);
        assert_eq!(w.active_stars(), 12);
    }
}
