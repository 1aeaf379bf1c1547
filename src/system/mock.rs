//! Mock system implementation for testing

use super::System;
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

/// In-memory implementation of System trait for testing
///
/// # Example
/// ```
/// use cmdchain::system::{mock::MockSystem, System};
/// use std::path::Path;
///
/// let system = MockSystem::new()
///     .with_args(["cmdchain", "print", "--message", "hi"]).unwrap()
///     .with_file("/etc/cmdchain.yaml", b"default_commands: [print]").unwrap();
///
/// assert_eq!(system.args().len(), 4);
/// assert!(system.exists(Path::new("/etc/cmdchain.yaml")).unwrap());
/// ```
#[derive(Clone)]
pub struct MockSystem {
    state: Arc<RwLock<MockSystemState>>,
}

struct MockSystemState {
    args: Vec<String>,
    files: HashMap<PathBuf, Vec<u8>>,
}

impl MockSystem {
    /// Create a new `MockSystem` with only a program name as argument
    #[must_use]
    #[inline]
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(MockSystemState {
                args: vec!["cmdchain".to_owned()],
                files: HashMap::new(),
            })),
        }
    }

    /// Replace the process arguments (builder pattern)
    ///
    /// # Errors
    ///
    /// Returns an error if the internal state lock is poisoned
    #[inline]
    pub fn with_args<I, S>(self, args: I) -> io::Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut state = self
            .state
            .write()
            .map_err(|e| io::Error::other(e.to_string()))?;
        state.args = args.into_iter().map(Into::into).collect();
        drop(state);
        Ok(self)
    }

    /// Add a file with contents (builder pattern)
    ///
    /// # Errors
    ///
    /// Returns an error if the internal state lock is poisoned
    #[inline]
    pub fn with_file<P: AsRef<Path>>(self, path: P, contents: &[u8]) -> io::Result<Self> {
        let mut state = self
            .state
            .write()
            .map_err(|e| io::Error::other(e.to_string()))?;
        state
            .files
            .insert(path.as_ref().to_path_buf(), contents.to_vec());
        drop(state);
        Ok(self)
    }
}

impl Default for MockSystem {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl System for MockSystem {
    #[inline]
    fn args(&self) -> Vec<String> {
        self.state
            .read()
            .map(|state| state.args.clone())
            .unwrap_or_default()
    }

    #[inline]
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        let state = self
            .state
            .read()
            .map_err(|e| io::Error::other(e.to_string()))?;
        let contents = state.files.get(path).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("File not found: {}", path.display()),
            )
        })?;
        String::from_utf8(contents.clone())
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    #[inline]
    fn exists(&self, path: &Path) -> io::Result<bool> {
        let state = self
            .state
            .read()
            .map_err(|e| io::Error::other(e.to_string()))?;
        Ok(state.files.contains_key(path))
    }
}
