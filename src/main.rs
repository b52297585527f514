/// Entry point and game loop.

mod config;
mod domain;
mod sim;
mod ui;

use std::fs::File;
use std::time::{Duration, Instant};

use crossterm::event::KeyCode;

use config::GameConfig;
use domain::entity::FrameInput;
use sim::event::GameEvent;
use sim::scene;
use sim::step;
use sim::world::WorldState;
use ui::gamepad::GamepadState;
use ui::input::InputState;
use ui::renderer::Renderer;
use ui::sound::{Cue, SoundEngine};

const FRAME_SLEEP: Duration = Duration::from_millis(5);

fn main() {
    let (config, warnings) = GameConfig::load();
    init_logging(&config);
    for w in &warnings {
        log::warn!("{w}");
    }

    let seed = config.seed.unwrap_or_else(rand::random);
    log::info!("starting with seed {seed}, tick {} ms", config.timing.tick_rate_ms);

    let mut world = match scene::boot(&config, seed) {
        Ok(w) => w,
        Err(e) => {
            log::error!("scene failed to load: {e}");
            eprintln!("Could not start: {e}");
            std::process::exit(1);
        }
    };

    let mut renderer = Renderer::new();
    if let Err(e) = renderer.init() {
        log::error!("terminal init failed: {e}");
        eprintln!("Terminal init failed: {e}");
        return;
    }

    let sound = SoundEngine::new();
    let mut kb = InputState::new();
    kb.enable_release_events();

    let result = game_loop(&mut world, &mut renderer, &mut kb, sound.as_ref(), &config);

    kb.restore();
    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }
    if let Err(e) = result {
        log::error!("game loop stopped: {e}");
        eprintln!("Game error: {e}");
    }

    println!();
    println!("Thanks for playing Star Catcher!");
    println!(
        "Final Score: {}  (levels cleared: {}, seed: {})",
        world.session.score, world.levels_cleared, world.seed
    );
}

/// `RUST_LOG` wins; otherwise warnings only. A configured log file keeps
/// log lines off the game screen.
fn init_logging(config: &GameConfig) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if let Some(path) = &config.log_file {
        match File::create(path) {
            Ok(file) => {
                builder.target(env_logger::Target::Pipe(Box::new(file)));
            }
            Err(e) => eprintln!("Could not open log file {}: {e}", path.display()),
        }
    }
    builder.init();
}

fn game_loop(
    world: &mut WorldState,
    renderer: &mut Renderer,
    kb: &mut InputState,
    sound: Option<&SoundEngine>,
    config: &GameConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut gp = GamepadState::new();
    gp.load_button_config(&config.gamepad);
    if gp.connected {
        log::info!("gamepad detected");
    }
    let tick_rate = Duration::from_millis(config.timing.tick_rate_ms);
    let dt = config.dt();
    let mut last_tick = Instant::now();

    loop {
        kb.drain_events();
        gp.update();

        if kb.ctrl_c_pressed() || kb.any_pressed(KEYS_QUIT) || gp.quit_pressed() {
            log::info!("quit requested at tick {}", world.tick);
            break;
        }

        if last_tick.elapsed() >= tick_rate {
            let input = detect_input(kb, &gp);
            let events = step::step(world, &input, dt);
            process_sound_events(sound, &events);
            last_tick = Instant::now();
        }

        renderer.render(world)?;
        std::thread::sleep(FRAME_SLEEP);
    }

    Ok(())
}

fn cue_for(event: &GameEvent) -> Option<Cue> {
    match event {
        GameEvent::Jumped => Some(Cue::Jump),
        GameEvent::StarCollected { .. } => Some(Cue::Star),
        GameEvent::LevelCleared { .. } => Some(Cue::LevelClear),
        GameEvent::GameOver { .. } => Some(Cue::GameOver),
        GameEvent::BombSpawned { .. } => None,
    }
}

fn process_sound_events(sound: Option<&SoundEngine>, events: &[GameEvent]) {
    let sfx = match sound {
        Some(s) => s,
        None => return,
    };
    for cue in events.iter().filter_map(cue_for) {
        sfx.play(cue);
    }
}

// ── Key Constants ──

const KEYS_LEFT: &[KeyCode] = &[KeyCode::Left, KeyCode::Char('a')];
const KEYS_RIGHT: &[KeyCode] = &[KeyCode::Right, KeyCode::Char('d')];
const KEYS_UP: &[KeyCode] = &[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char(' ')];
const KEYS_DOWN: &[KeyCode] = &[KeyCode::Down, KeyCode::Char('s')];
const KEYS_QUIT: &[KeyCode] = &[KeyCode::Esc, KeyCode::Char('q')];

/// Snapshot of every direction held this frame, keyboard or pad.
fn detect_input(kb: &InputState, gp: &GamepadState) -> FrameInput {
    FrameInput {
        left: kb.any_held(KEYS_LEFT) || gp.left_held(),
        right: kb.any_held(KEYS_RIGHT) || gp.right_held(),
        up: kb.any_held(KEYS_UP) || gp.up_held(),
        down: kb.any_held(KEYS_DOWN) || gp.down_held(),
    }
}
