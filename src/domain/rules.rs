/// Pure gameplay rules: input-to-motion mapping and the collision policy.
///
/// Nothing here touches world state. `sim::scene` applies `Motion`, and
/// `sim::step` walks `COLLISION_RULES` in order each frame.

use super::anim::AnimKey;
use super::entity::FrameInput;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MotionTuning {
    pub run_speed: f32,
    pub jump_speed: f32,
}

impl Default for MotionTuning {
    fn default() -> Self {
        MotionTuning { run_speed: 160.0, jump_speed: 500.0 }
    }
}

/// What the player should do this frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Motion {
    pub vx: f32,
    /// Set only when a jump starts.
    pub vy: Option<f32>,
    pub anim: AnimKey,
    /// Animation restarts unless it is already playing.
    pub ignore_if_playing: bool,
}

/// Map held keys to velocity and animation.
///
/// Horizontal: left beats right beats idle. Jump is evaluated independently
/// and is level-triggered: it fires on every frame that up is held while
/// the player rests on a surface.
pub fn map_input(input: &FrameInput, grounded: bool, tuning: &MotionTuning) -> Motion {
    let (vx, anim, ignore_if_playing) = if input.left {
        (-tuning.run_speed, AnimKey::Left, true)
    } else if input.right {
        (tuning.run_speed, AnimKey::Right, true)
    } else {
        (0.0, AnimKey::Turn, false)
    };

    let jump = input.up && grounded;
    Motion {
        vx,
        vy: jump.then_some(-tuning.jump_speed),
        anim,
        ignore_if_playing,
    }
}

// ── Collision policy ──

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Group {
    Player,
    Platforms,
    Stars,
    Bombs,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Contact {
    /// Bodies are separated.
    Collide,
    /// Intersection is reported, bodies pass through.
    Overlap,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Handler {
    None,
    EndGame,
    CollectStar,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CollisionRule {
    pub a: Group,
    pub b: Group,
    pub contact: Contact,
    pub handler: Handler,
}

const fn rule(a: Group, b: Group, contact: Contact, handler: Handler) -> CollisionRule {
    CollisionRule { a, b, contact, handler }
}

/// Registered once at scene creation, in this order.
pub const COLLISION_RULES: [CollisionRule; 5] = [
    rule(Group::Player, Group::Platforms, Contact::Collide, Handler::None),
    rule(Group::Stars, Group::Platforms, Contact::Collide, Handler::None),
    rule(Group::Bombs, Group::Platforms, Contact::Collide, Handler::None),
    rule(Group::Player, Group::Bombs, Contact::Collide, Handler::EndGame),
    rule(Group::Player, Group::Stars, Contact::Overlap, Handler::CollectStar),
];

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(left: bool, right: bool, up: bool) -> FrameInput {
        FrameInput { left, right, up, down: false }
    }

    fn tuning() -> MotionTuning {
        MotionTuning::default()
    }

    #[test]
    fn left_runs_left() {
        let m = map_input(&keys(true, false, false), true, &tuning());
        assert_eq!(m.vx, -160.0);
        assert_eq!(m.anim, AnimKey::Left);
        assert!(m.ignore_if_playing);
        assert_eq!(m.vy, None);
    }

    #[test]
    fn left_wins_over_right() {
        let m = map_input(&keys(true, true, false), true, &tuning());
        assert_eq!(m.vx, -160.0);
        assert_eq!(m.anim, AnimKey::Left);
    }

    #[test]
    fn right_runs_right() {
        let m = map_input(&keys(false, true, false), false, &tuning());
        assert_eq!(m.vx, 160.0);
        assert_eq!(m.anim, AnimKey::Right);
    }

    #[test]
    fn idle_stops_and_turns() {
        let m = map_input(&FrameInput::default(), true, &tuning());
        assert_eq!(m.vx, 0.0);
        assert_eq!(m.anim, AnimKey::Turn);
        assert!(!m.ignore_if_playing);
        assert!(m.vy.is_none());
    }

    #[test]
    fn jump_requires_ground() {
        let air = map_input(&keys(false, false, true), false, &tuning());
        assert_eq!(air.vy, None);
        assert!(air.vy.is_none());

        let ground = map_input(&keys(false, false, true), true, &tuning());
        assert_eq!(ground.vy, Some(-500.0));
        assert!(ground.vy.is_some());
    }

    #[test]
    fn jump_is_independent_of_direction() {
        let m = map_input(&keys(false, true, true), true, &tuning());
        assert_eq!(m.vx, 160.0);
        assert_eq!(m.vy, Some(-500.0));
    }

    #[test]
    fn held_jump_refires_every_grounded_frame() {
        let held = keys(false, false, true);
        let cues = (0..5)
            .filter(|_| map_input(&held, true, &tuning()).vy.is_some())
            .count();
        assert_eq!(cues, 5);
    }

    #[test]
    fn down_key_is_ignored() {
        let m = map_input(&FrameInput { down: true, ..Default::default() }, true, &tuning());
        assert_eq!(m, map_input(&FrameInput::default(), true, &tuning()));
    }

    #[test]
    fn policy_has_five_rules_in_order() {
        assert_eq!(COLLISION_RULES.len(), 5);
        assert_eq!(COLLISION_RULES[3].handler, Handler::EndGame);
        assert_eq!(COLLISION_RULES[4].contact, Contact::Overlap);
        assert_eq!(COLLISION_RULES[4].handler, Handler::CollectStar);
        let solid = COLLISION_RULES.iter().filter(|r| r.contact == Contact::Collide).count();
        assert_eq!(solid, 4);
    }
}
