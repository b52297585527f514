/// The step function: advances the world by one frame.
///
/// Processing order:
///   1. Physics motion (player → stars → bombs)
///   2. Collider rules, in registration order, with their handlers
///   3. Scene update (input → player velocity / animation)
///   4. Animation playback
///
/// Once a handler pauses the physics world, the remaining rules for the
/// frame are skipped and every later frame leaves bodies untouched.

use crate::domain::entity::FrameInput;
use crate::domain::physics;
use crate::domain::rules::{CollisionRule, Contact, Group, Handler};
use super::event::GameEvent;
use super::progress;
use super::scene;
use super::world::WorldState;

/// What a rule's handler fired against.
#[derive(Clone, Copy, Debug)]
enum Hit {
    Bomb(u32),
    Star(usize),
}

// ══════════════════════════════════════════════════════════════
// Main entry point
// ══════════════════════════════════════════════════════════════

pub fn step(world: &mut WorldState, input: &FrameInput, dt: f32) -> Vec<GameEvent> {
    let mut events: Vec<GameEvent> = Vec::new();
    world.tick += 1;

    resolve_motion(world, dt);
    resolve_colliders(world, &mut events);
    scene::update(world, input, &mut events);
    if world.physics.accepts_writes() {
        world.player.anim.advance(dt);
    }

    events
}

// ══════════════════════════════════════════════════════════════
// Motion
// ══════════════════════════════════════════════════════════════

fn resolve_motion(world: &mut WorldState, dt: f32) {
    if world.physics.is_paused() {
        return;
    }
    let arcade = &world.physics;
    arcade.step_body(&mut world.player.body, dt);
    for star in &mut world.stars {
        arcade.step_body(&mut star.body, dt);
    }
    for bomb in &mut world.bombs {
        arcade.step_body(&mut bomb.body, dt);
    }
}

// ══════════════════════════════════════════════════════════════
// Colliders
// ══════════════════════════════════════════════════════════════

fn resolve_colliders(world: &mut WorldState, events: &mut Vec<GameEvent>) {
    for i in 0..world.colliders.len() {
        if world.physics.is_paused() {
            break;
        }
        let rule = world.colliders[i];
        resolve_rule(world, rule, events);
    }
}

fn resolve_rule(world: &mut WorldState, rule: CollisionRule, events: &mut Vec<GameEvent>) {
    match (rule.a, rule.b, rule.contact) {
        (Group::Player, Group::Platforms, Contact::Collide) => {
            for p in &world.platforms {
                physics::collide_static(&mut world.player.body, &p.body);
            }
        }
        (Group::Stars, Group::Platforms, Contact::Collide) => {
            for star in &mut world.stars {
                for p in &world.platforms {
                    physics::collide_static(&mut star.body, &p.body);
                }
            }
        }
        (Group::Bombs, Group::Platforms, Contact::Collide) => {
            for bomb in &mut world.bombs {
                for p in &world.platforms {
                    physics::collide_static(&mut bomb.body, &p.body);
                }
            }
        }
        (Group::Player, Group::Bombs, Contact::Collide) => {
            let mut hit = None;
            for bomb in &mut world.bombs {
                if physics::collide_bodies(&mut world.player.body, &mut bomb.body) {
                    hit = Some(bomb.id);
                    break;
                }
            }
            if let Some(id) = hit {
                run_handler(world, rule.handler, Hit::Bomb(id), events);
            }
        }
        (Group::Player, Group::Stars, Contact::Overlap) => {
            for i in 0..world.stars.len() {
                if physics::overlaps(&world.player.body, &world.stars[i].body) {
                    run_handler(world, rule.handler, Hit::Star(i), events);
                }
            }
        }
        _ => log::warn!("no resolver for collider rule {:?}", rule),
    }
}

fn run_handler(world: &mut WorldState, handler: Handler, hit: Hit, events: &mut Vec<GameEvent>) {
    match (handler, hit) {
        (Handler::None, _) => {}
        (Handler::EndGame, Hit::Bomb(id)) => progress::end_game(world, id, events),
        (Handler::CollectStar, Hit::Star(i)) => {
            progress::collect_star(world, i, events);
        }
        (h, target) => log::warn!("handler {:?} does not apply to {:?}", h, target),
    }
}
