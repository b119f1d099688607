use std::{
    fs,
    io::{BufWriter, Write},
    path::PathBuf,
};

use serde::{Deserialize, Serialize};

use crate::memory::{error::MemoryError, types::MemoryItem};

/// Durable storage for the memory store. The file is fully rewritten on
/// every save via a temp file and an atomic rename; there is no incremental
/// append.
#[derive(Debug, Clone)]
pub struct MemoryPersistence {
    path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistedMemory {
    pub short_term: Vec<MemoryItem>,
    pub long_term: Vec<MemoryItem>,
}

impl MemoryPersistence {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// `Ok(None)` when no file exists yet; parse failures are errors so the
    /// caller can decide to degrade to an empty store.
    pub fn load(&self) -> Result<Option<PersistedMemory>, MemoryError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(MemoryError::Read {
                    path: self.path.clone(),
                    source: err,
                });
            }
        };

        let parsed = serde_json::from_str(&content).map_err(|err| MemoryError::Parse {
            path: self.path.clone(),
            source: err,
        })?;

        Ok(Some(parsed))
    }

    pub fn save(&self, state: &PersistedMemory) -> Result<(), MemoryError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|err| MemoryError::Write {
                path: parent.to_path_buf(),
                source: err,
            })?;
        }

        let tmp_path = self.path.with_extension("tmp");
        let file = fs::File::create(&tmp_path).map_err(|err| MemoryError::Write {
            path: tmp_path.clone(),
            source: err,
        })?;
        {
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, state)
                .map_err(|err| MemoryError::Serialize { source: err })?;
            writer
                .write_all(b"\n")
                .and_then(|()| writer.flush())
                .map_err(|err| MemoryError::Write {
                    path: tmp_path.clone(),
                    source: err,
                })?;
        }

        let tmp_file = fs::OpenOptions::new()
            .read(true)
            .open(&tmp_path)
            .map_err(|err| MemoryError::Write {
                path: tmp_path.clone(),
                source: err,
            })?;
        tmp_file.sync_all().map_err(|err| MemoryError::Write {
            path: tmp_path.clone(),
            source: err,
        })?;

        fs::rename(&tmp_path, &self.path).map_err(|err| MemoryError::Write {
            path: self.path.clone(),
            source: err,
        })?;

        Ok(())
    }
}
