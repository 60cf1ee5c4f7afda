/// Persisted high score.
///
/// ## File format:
///   A single decimal integer, no trailing newline. Anything else (missing
///   file, garbage, negative number) reads as 0.
///
/// The file is only ever rewritten when a session beats the stored value.

use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

/// Where the score file lives: first writable of exe dir, XDG data home, CWD.
pub fn score_dir() -> PathBuf {
    // 1. Try exe directory (works for local/portable installs)
    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            // Check if writable (system installs like /usr/games/ won't be)
            let test_path = parent.join(".write_test_corona_panic");
            if std::fs::write(&test_path, "").is_ok() {
                let _ = std::fs::remove_file(&test_path);
                return parent.to_path_buf();
            }
        }
    }

    // 2. XDG data home (~/.local/share/corona-panic) for system installs
    if let Ok(home) = std::env::var("HOME") {
        let xdg = PathBuf::from(&home).join(".local/share/corona-panic");
        if std::fs::create_dir_all(&xdg).is_ok() {
            return xdg;
        }
    }

    // 3. Fallback to CWD
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

/// Resolve a configured score file name. Absolute paths are used as-is.
pub fn score_path(file_name: &str) -> PathBuf {
    let p = PathBuf::from(file_name);
    if p.is_absolute() { p } else { score_dir().join(p) }
}

fn parse_score(content: &str) -> u32 {
    content.trim().parse().unwrap_or(0)
}

/// Read the stored best. Never fails: unreadable means 0.
pub fn load_high_score(path: &Path) -> u32 {
    match std::fs::read_to_string(path) {
        Ok(content) => {
            let score = parse_score(&content);
            debug!(path = %path.display(), score, "loaded high score");
            score
        }
        Err(e) => {
            if e.kind() != io::ErrorKind::NotFound {
                warn!(path = %path.display(), error = %e, "could not read high score");
            }
            0
        }
    }
}

/// Write `score` if it strictly beats `previous`. Returns whether it wrote.
pub fn save_if_higher(path: &Path, score: u32, previous: u32) -> io::Result<bool> {
    if score <= previous {
        return Ok(false);
    }
    std::fs::write(path, score.to_string())?;
    debug!(path = %path.display(), score, previous, "saved high score");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_file(name: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "corona_panic_{}_{}.txt",
            name,
            std::process::id()
        ));
        let _ = std::fs::remove_file(&path);
        path
    }

    #[test]
    fn parse_variants() {
        assert_eq!(parse_score("42"), 42);
        assert_eq!(parse_score("  17\n"), 17);
        assert_eq!(parse_score(""), 0);
        assert_eq!(parse_score("abc"), 0);
        assert_eq!(parse_score("-5"), 0);
    }

    #[test]
    fn missing_file_reads_zero() {
        let path = temp_file("missing");
        assert_eq!(load_high_score(&path), 0);
    }

    #[test]
    fn higher_score_is_written() {
        let path = temp_file("higher");
        std::fs::write(&path, "10").unwrap();
        assert!(save_if_higher(&path, 11, 10).unwrap());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "11");
        assert_eq!(load_high_score(&path), 11);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn equal_or_lower_score_is_not_written() {
        let path = temp_file("lower");
        std::fs::write(&path, "10").unwrap();
        assert!(!save_if_higher(&path, 10, 10).unwrap());
        assert!(!save_if_higher(&path, 3, 10).unwrap());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "10");
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn first_score_creates_file() {
        let path = temp_file("first");
        assert!(save_if_higher(&path, 1, 0).unwrap());
        assert_eq!(load_high_score(&path), 1);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn absolute_path_kept() {
        let abs = std::env::temp_dir().join("hs.txt");
        assert_eq!(score_path(abs.to_str().unwrap()), abs);
    }
}
