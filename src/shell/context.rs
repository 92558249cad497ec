//! Working directory and command-line tokenizing
//!
//! The working directory belongs to the shell instance, never to the
//! process: children receive it explicitly at spawn, so several shells in
//! one process stay independent.

use crate::error::{Error, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

/// One whitespace-delimited token; quoted runs may contain whitespace
static TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?:"[^"]*"?|'[^']*'?|[^\s"']+)+"#).expect("valid token pattern"));

/// The pieces of a token: quoted runs (quotes stripped) or bare text
static TOKEN_PART: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""([^"]*)"?|'([^']*)'?|([^\s"']+)"#).expect("valid part pattern"));

/// Split a raw line into argv-style tokens.
///
/// Whitespace separates tokens except inside single or double quotes; the
/// quotes themselves are removed. An unterminated quote runs to the end of
/// the line.
pub fn tokenize(raw: &str) -> Vec<String> {
    TOKEN
        .find_iter(raw)
        .map(|token| {
            TOKEN_PART
                .captures_iter(token.as_str())
                .filter_map(|part| part.get(1).or_else(|| part.get(2)).or_else(|| part.get(3)))
                .map(|m| m.as_str())
                .collect::<String>()
        })
        .collect()
}

/// Replace a leading `~` with the home directory
pub fn expand_tilde(path: &str) -> PathBuf {
    if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    } else if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

/// Resolve `candidate` to an existing path.
///
/// Absolute (and `~`) paths are taken literally; relative paths resolve
/// against `base`, which stands in for the process working directory. The
/// result is canonical (absolute, symlinks resolved).
pub fn resolve_path(base: &Path, candidate: &str) -> Result<PathBuf> {
    let not_found = || Error::PathNotFound {
        path: candidate.to_string(),
    };

    if candidate.is_empty() {
        return Err(not_found());
    }

    let literal = expand_tilde(candidate);
    let found = if literal.is_absolute() {
        literal
    } else {
        base.join(literal)
    };

    if !found.exists() {
        return Err(not_found());
    }
    found.canonicalize().map_err(|_| not_found())
}

/// Resolve a path that must name a directory
pub fn resolve_directory(base: &Path, candidate: &str) -> Result<PathBuf> {
    let path = resolve_path(base, candidate)?;
    if !path.is_dir() {
        return Err(Error::NotADirectory {
            path: candidate.to_string(),
        });
    }
    Ok(path)
}

/// Resolve a path that must name a regular file
pub fn resolve_file(base: &Path, candidate: &str) -> Result<PathBuf> {
    let path = resolve_path(base, candidate)?;
    if !path.is_file() {
        return Err(Error::PathNotFound {
            path: candidate.to_string(),
        });
    }
    Ok(path)
}

/// Per-shell working directory, replaced only as a whole
#[derive(Debug)]
pub struct ShellContext {
    working_directory: RwLock<PathBuf>,
}

impl ShellContext {
    pub fn new(working_directory: PathBuf) -> Self {
        Self {
            working_directory: RwLock::new(working_directory),
        }
    }

    /// Validate and canonicalize a starting directory
    pub fn open(path: &Path) -> Result<Self> {
        let canonical = path
            .canonicalize()
            .map_err(|e| Error::InvalidWorkingDirectory {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        if !canonical.is_dir() {
            return Err(Error::InvalidWorkingDirectory {
                path: path.to_path_buf(),
                reason: "not a directory".to_string(),
            });
        }
        Ok(Self::new(canonical))
    }

    pub fn working_directory(&self) -> PathBuf {
        match self.working_directory.read() {
            Ok(dir) => dir.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Commit a new working directory
    pub fn set_working_directory(&self, path: PathBuf) {
        let mut current = match self.working_directory.write() {
            Ok(dir) => dir,
            Err(poisoned) => poisoned.into_inner(),
        };
        *current = path;
    }

    /// Resolve `target` against the current directory and commit it.
    ///
    /// The working directory is left unchanged on failure.
    pub fn change_directory(&self, target: &str) -> Result<PathBuf> {
        let resolved = resolve_directory(&self.working_directory(), target)?;
        self.set_working_directory(resolved.clone());
        debug!("Working directory is now {}", resolved.display());
        Ok(resolved)
    }
}
