/// Events emitted during a frame.
/// The presentation layer consumes these for sound; tests use them to
/// observe transitions.

#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    /// Jump started (level-triggered; repeats while up is held on ground).
    Jumped,
    StarCollected { index: usize, score: u32 },
    /// Every star was collected; they have been reset.
    LevelCleared { levels_cleared: u32 },
    BombSpawned { id: u32, x: f32, vx: f32 },
    /// Player touched a bomb. Terminal.
    GameOver { bomb_id: u32, score: u32 },
}
