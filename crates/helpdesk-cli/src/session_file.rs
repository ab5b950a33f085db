// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use helpdesk_app::{SessionStore, StoredSession};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Signed-in session kept as a JSON file between runs.
#[derive(Debug, Clone)]
pub struct SessionFile {
    path: PathBuf,
}

impl SessionFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for SessionFile {
    fn load(&self) -> Result<Option<StoredSession>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(error) if error.kind() == ErrorKind::NotFound => return Ok(None),
            Err(error) => {
                return Err(error)
                    .with_context(|| format!("read session file {}", self.path.display()));
            }
        };
        let session = serde_json::from_str(&raw)
            .with_context(|| format!("parse session file {}", self.path.display()))?;
        Ok(Some(session))
    }

    fn save(&mut self, session: &StoredSession) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .with_context(|| format!("create session directory {}", parent.display()))?;
        }
        let raw = serde_json::to_string_pretty(session).context("encode session")?;
        fs::write(&self.path, raw)
            .with_context(|| format!("write session file {}", self.path.display()))
    }

    fn clear(&mut self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(()),
            Err(error) => Err(error)
                .with_context(|| format!("remove session file {}", self.path.display())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::SessionFile;
    use anyhow::Result;
    use helpdesk_app::{SessionStore, StoredSession};
    use helpdesk_testkit::{DeskFaker, temp_file_path};

    #[test]
    fn missing_file_means_no_session() -> Result<()> {
        let (_dir, path) = temp_file_path("session.json")?;
        assert_eq!(SessionFile::new(path).load()?, None);
        Ok(())
    }

    #[test]
    fn save_creates_parents_and_loads_back() -> Result<()> {
        let (dir, _) = temp_file_path("unused")?;
        let path = dir.path().join("nested").join("deeper").join("session.json");
        let session = StoredSession {
            token: "token-u1".to_owned(),
            user: DeskFaker::new(4).user(),
        };
        let mut store = SessionFile::new(&path);
        store.save(&session)?;
        assert_eq!(store.load()?, Some(session));
        Ok(())
    }

    #[test]
    fn clear_is_idempotent() -> Result<()> {
        let (_dir, path) = temp_file_path("session.json")?;
        let mut store = SessionFile::new(&path);
        store.save(&StoredSession {
            token: "t".to_owned(),
            user: DeskFaker::new(8).user(),
        })?;
        store.clear()?;
        assert!(!path.exists());
        store.clear()?;
        Ok(())
    }

    #[test]
    fn garbage_file_is_a_parse_error() -> Result<()> {
        let (_dir, path) = temp_file_path("session.json")?;
        std::fs::write(&path, "{\"token\":")?;
        let error = SessionFile::new(&path)
            .load()
            .expect_err("truncated file should fail");
        assert!(error.to_string().contains("parse session file"));
        Ok(())
    }
}
