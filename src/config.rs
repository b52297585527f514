/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to the stock tuning if the file is missing or incomplete.
/// Problems are returned as warnings so they can be logged once the
/// logger is up.

use serde::Deserialize;
use std::path::PathBuf;

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub world: WorldConfig,
    pub player: PlayerConfig,
    pub timing: TimingConfig,
    pub gamepad: GamepadConfig,
    /// RNG seed; a fresh one is drawn when absent.
    pub seed: Option<u64>,
    pub log_file: Option<PathBuf>,
}

#[derive(Clone, Debug)]
pub struct WorldConfig {
    pub gravity: f32,
    pub debug: bool,
}

#[derive(Clone, Debug)]
pub struct PlayerConfig {
    pub run_speed: f32,
    pub jump_speed: f32,
    pub bounce: f32,
}

#[derive(Clone, Debug)]
pub struct TimingConfig {
    pub tick_rate_ms: u64,
}

#[derive(Clone, Debug)]
pub struct GamepadConfig {
    pub jump: Vec<String>,
    pub quit: Vec<String>,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    world: TomlWorld,
    #[serde(default)]
    player: TomlPlayer,
    #[serde(default)]
    timing: TomlTiming,
    #[serde(default)]
    gamepad: TomlGamepad,
    #[serde(default)]
    general: TomlGeneral,
}

#[derive(Deserialize, Debug)]
struct TomlWorld {
    #[serde(default = "default_gravity")]
    gravity: f32,
    #[serde(default)]
    debug: bool,
}

#[derive(Deserialize, Debug)]
struct TomlPlayer {
    #[serde(default = "default_run_speed")]
    run_speed: f32,
    #[serde(default = "default_jump_speed")]
    jump_speed: f32,
    #[serde(default = "default_bounce")]
    bounce: f32,
}

#[derive(Deserialize, Debug)]
struct TomlTiming {
    #[serde(default = "default_tick_rate")]
    tick_rate_ms: u64,
}

#[derive(Deserialize, Debug)]
struct TomlGamepad {
    #[serde(default = "default_jump_buttons")]
    jump: Vec<String>,
    #[serde(default = "default_quit_buttons")]
    quit: Vec<String>,
}

#[derive(Deserialize, Debug, Default)]
struct TomlGeneral {
    #[serde(default)]
    seed: Option<u64>,
    #[serde(default)]
    log_file: Option<String>,
}

// ── Defaults ──

fn default_gravity() -> f32 { 600.0 }
fn default_run_speed() -> f32 { 160.0 }
fn default_jump_speed() -> f32 { 500.0 }
fn default_bounce() -> f32 { 0.2 }
fn default_tick_rate() -> u64 { 16 }   // ~60 frames per second

fn default_jump_buttons() -> Vec<String> { vec!["A".into()] }
fn default_quit_buttons() -> Vec<String> { vec!["Select".into()] }

impl Default for TomlWorld {
    fn default() -> Self {
        TomlWorld { gravity: default_gravity(), debug: false }
    }
}

impl Default for TomlPlayer {
    fn default() -> Self {
        TomlPlayer {
            run_speed: default_run_speed(),
            jump_speed: default_jump_speed(),
            bounce: default_bounce(),
        }
    }
}

impl Default for TomlTiming {
    fn default() -> Self {
        TomlTiming { tick_rate_ms: default_tick_rate() }
    }
}

impl Default for TomlGamepad {
    fn default() -> Self {
        TomlGamepad {
            jump: default_jump_buttons(),
            quit: default_quit_buttons(),
        }
    }
}

// ── Loading ──

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig::from_toml(TomlConfig::default())
    }
}

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    /// Returns the config plus any warnings met on the way.
    pub fn load() -> (Self, Vec<String>) {
        let mut warnings = Vec::new();
        let cfg = load_from(&candidate_dirs(), &mut warnings);
        (cfg, warnings)
    }

    /// Parse one config document; missing keys take their defaults.
    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str::<TomlConfig>(text).map(GameConfig::from_toml)
    }

    fn from_toml(cfg: TomlConfig) -> Self {
        GameConfig {
            world: WorldConfig {
                gravity: cfg.world.gravity,
                debug: cfg.world.debug,
            },
            player: PlayerConfig {
                run_speed: cfg.player.run_speed,
                jump_speed: cfg.player.jump_speed,
                bounce: cfg.player.bounce,
            },
            timing: TimingConfig {
                tick_rate_ms: cfg.timing.tick_rate_ms.max(1),
            },
            gamepad: GamepadConfig {
                jump: cfg.gamepad.jump,
                quit: cfg.gamepad.quit,
            },
            seed: cfg.general.seed,
            log_file: cfg.general.log_file.map(PathBuf::from),
        }
    }

    /// Fixed simulation timestep in seconds.
    pub fn dt(&self) -> f32 {
        self.timing.tick_rate_ms as f32 / 1000.0
    }
}

/// Candidate directories to search: exe dir + CWD (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// Search for config.toml in candidate directories.
fn load_from(search_dirs: &[PathBuf], warnings: &mut Vec<String>) -> GameConfig {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if !path.exists() {
            continue;
        }
        match std::fs::read_to_string(&path) {
            Ok(text) => match GameConfig::parse(&text) {
                Ok(cfg) => return cfg,
                Err(e) => {
                    warnings.push(format!(
                        "{} parse error: {e}; using default settings",
                        path.display()
                    ));
                    return GameConfig::default();
                }
            },
            Err(e) => {
                warnings.push(format!("could not read {}: {e}", path.display()));
            }
        }
    }
    GameConfig::default()
}
