/// Sprite-sheet animation player.
///
/// The player sheet has 9 frames (32×48 each):
///   0..=3  running left   (10 fps, loops)
///   4      facing camera  (single frame)
///   5..=8  running right  (10 fps, loops)

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum AnimKey {
    Left,
    Turn,
    Right,
}

impl AnimKey {
    pub fn as_str(self) -> &'static str {
        match self {
            AnimKey::Left => "left",
            AnimKey::Turn => "turn",
            AnimKey::Right => "right",
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Animation {
    pub key: AnimKey,
    pub first_frame: u8,
    pub frame_count: u8,
    pub frame_rate: f32,
    pub repeat: bool,
}

pub const PLAYER_ANIMATIONS: [Animation; 3] = [
    Animation { key: AnimKey::Left, first_frame: 0, frame_count: 4, frame_rate: 10.0, repeat: true },
    Animation { key: AnimKey::Turn, first_frame: 4, frame_count: 1, frame_rate: 20.0, repeat: false },
    Animation { key: AnimKey::Right, first_frame: 5, frame_count: 4, frame_rate: 10.0, repeat: true },
];

/// Every key has exactly one entry in the table.
fn animation(key: AnimKey) -> &'static Animation {
    PLAYER_ANIMATIONS
        .iter()
        .find(|a| a.key == key)
        .unwrap_or(&PLAYER_ANIMATIONS[1])
}

#[derive(Clone, Debug)]
pub struct Animator {
    current: AnimKey,
    index: u8,
    elapsed: f32,
}

impl Animator {
    pub fn new(key: AnimKey) -> Self {
        Animator { current: key, index: 0, elapsed: 0.0 }
    }

    /// Switch to `key`. With `ignore_if_playing`, an animation that is
    /// already current keeps its frame; otherwise it restarts.
    pub fn play(&mut self, key: AnimKey, ignore_if_playing: bool) {
        if ignore_if_playing && self.current == key {
            return;
        }
        self.current = key;
        self.index = 0;
        self.elapsed = 0.0;
    }

    pub fn advance(&mut self, dt: f32) {
        let anim = animation(self.current);
        if anim.frame_count <= 1 {
            return;
        }
        self.elapsed += dt;
        let frame_time = 1.0 / anim.frame_rate;
        while self.elapsed >= frame_time {
            self.elapsed -= frame_time;
            if self.index + 1 < anim.frame_count {
                self.index += 1;
            } else if anim.repeat {
                self.index = 0;
            } else {
                self.elapsed = 0.0;
                break;
            }
        }
    }

    pub fn current(&self) -> AnimKey {
        self.current
    }

    /// Absolute frame in the sprite sheet.
    pub fn frame(&self) -> u8 {
        animation(self.current).first_frame + self.index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_has_one_entry_per_key() {
        for key in [AnimKey::Left, AnimKey::Turn, AnimKey::Right] {
            assert_eq!(PLAYER_ANIMATIONS.iter().filter(|a| a.key == key).count(), 1);
            assert_eq!(animation(key).key, key);
        }
    }

    #[test]
    fn turn_is_single_frame_four() {
        let mut a = Animator::new(AnimKey::Turn);
        assert_eq!(a.frame(), 4);
        a.advance(5.0);
        assert_eq!(a.frame(), 4);
    }

    #[test]
    fn left_loops_through_frames_zero_to_three() {
        let mut a = Animator::new(AnimKey::Left);
        let mut seen = vec![a.frame()];
        for _ in 0..4 {
            a.advance(0.1);
            seen.push(a.frame());
        }
        assert_eq!(seen, vec![0, 1, 2, 3, 0]);
    }

    #[test]
    fn right_starts_at_frame_five() {
        let mut a = Animator::new(AnimKey::Turn);
        a.play(AnimKey::Right, true);
        assert_eq!(a.current(), AnimKey::Right);
        assert_eq!(a.frame(), 5);
    }

    #[test]
    fn ignore_if_playing_keeps_frame() {
        let mut a = Animator::new(AnimKey::Right);
        a.advance(0.25);
        let mid = a.frame();
        assert!(mid > 5);
        a.play(AnimKey::Right, true);
        assert_eq!(a.frame(), mid);
        a.play(AnimKey::Right, false);
        assert_eq!(a.frame(), 5);
    }

    #[test]
    fn keys_have_stable_names() {
        assert_eq!(AnimKey::Left.as_str(), "left");
        assert_eq!(AnimKey::Turn.as_str(), "turn");
        assert_eq!(AnimKey::Right.as_str(), "right");
    }
}
