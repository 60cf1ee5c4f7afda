/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to sensible defaults if the file is missing or incomplete.

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use tracing::warn;

use crate::sim::score;
use crate::sim::world::validate_dimension;

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub board: BoardConfig,
    pub timing: TimingConfig,
    pub score_file: PathBuf,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoardConfig {
    pub dimension: Option<usize>, // None: ask at startup
    pub seed: Option<u64>,        // None: seed from the clock
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TimingConfig {
    pub intro: Duration,
    pub chop_frame: Duration,
    pub fire_frame: Duration,
    pub victory_frame: Duration,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    board: TomlBoard,
    #[serde(default)]
    timing: TomlTiming,
    #[serde(default)]
    general: TomlGeneral,
}

#[derive(Deserialize, Debug, Default)]
struct TomlBoard {
    #[serde(default)]
    dimension: Option<i64>,
    #[serde(default)]
    seed: Option<u64>,
}

#[derive(Deserialize, Debug)]
struct TomlTiming {
    #[serde(default = "default_intro")]
    intro_ms: u64,
    #[serde(default = "default_chop_frame")]
    chop_frame_ms: u64,
    #[serde(default = "default_fire_frame")]
    fire_frame_ms: u64,
    #[serde(default = "default_victory_frame")]
    victory_frame_ms: u64,
}

#[derive(Deserialize, Debug)]
struct TomlGeneral {
    #[serde(default = "default_score_file")]
    score_file: String,
}

// ── Defaults ──

fn default_intro() -> u64 { 5555 }
fn default_chop_frame() -> u64 { 500 }
fn default_fire_frame() -> u64 { 100 }
fn default_victory_frame() -> u64 { 500 }
fn default_score_file() -> String { "score.txt".into() }

impl Default for TomlTiming {
    fn default() -> Self {
        TomlTiming {
            intro_ms: default_intro(),
            chop_frame_ms: default_chop_frame(),
            fire_frame_ms: default_fire_frame(),
            victory_frame_ms: default_victory_frame(),
        }
    }
}

impl Default for TomlGeneral {
    fn default() -> Self {
        TomlGeneral {
            score_file: default_score_file(),
        }
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        let search_dirs = candidate_dirs();
        let toml_cfg = load_toml(&search_dirs);
        Self::from_toml(toml_cfg)
    }

    fn from_toml(toml_cfg: TomlConfig) -> Self {
        let dimension = toml_cfg.board.dimension.and_then(|d| match validate_dimension(d) {
            Ok(d) => Some(d),
            Err(e) => {
                warn!("config.toml: {e}; will ask at startup");
                None
            }
        });

        GameConfig {
            board: BoardConfig {
                dimension,
                seed: toml_cfg.board.seed,
            },
            timing: TimingConfig {
                intro: Duration::from_millis(toml_cfg.timing.intro_ms),
                chop_frame: Duration::from_millis(toml_cfg.timing.chop_frame_ms),
                fire_frame: Duration::from_millis(toml_cfg.timing.fire_frame_ms),
                victory_frame: Duration::from_millis(toml_cfg.timing.victory_frame_ms),
            },
            score_file: score::score_path(&toml_cfg.general.score_file),
        }
    }
}

/// Candidate directories to search: exe dir + CWD + XDG data dir (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    // 1. Directory of the running executable
    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    // 2. Current working directory
    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    // 3. XDG data home (~/.local/share/corona-panic)
    if let Ok(home) = std::env::var("HOME") {
        let xdg = PathBuf::from(&home).join(".local/share/corona-panic");
        if xdg.is_dir() && !dirs.iter().any(|d| d == &xdg) {
            dirs.push(xdg);
        }
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// Search for config.toml in candidate directories.
fn load_toml(search_dirs: &[PathBuf]) -> TomlConfig {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(text) => match toml::from_str::<TomlConfig>(&text) {
                    Ok(cfg) => return cfg,
                    Err(e) => {
                        warn!("config.toml parse error: {e}; using default settings");
                        return TomlConfig::default();
                    }
                },
                Err(e) => {
                    warn!("could not read {}: {e}", path.display());
                }
            }
        }
    }
    TomlConfig::default()
}
