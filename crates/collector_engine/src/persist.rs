use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use collector_core::with_txt_extension;
use engine_logging::engine_info;
use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("output directory missing or not writable: {0}")]
    OutputDir(String),
    #[error("invalid file name: {0:?}")]
    InvalidFilename(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Ensure output directory exists; create if missing.
pub fn ensure_output_dir(dir: &Path) -> Result<(), PersistError> {
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
        if !meta.is_dir() {
            return Err(PersistError::OutputDir("path is not a directory".into()));
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
    }
    Ok(())
}

/// Atomically write content to `{dir}/{filename}` by writing a temp file then renaming.
pub struct AtomicFileWriter {
    dir: PathBuf,
}

impl AtomicFileWriter {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn write(&self, filename: &str, content: &str) -> Result<PathBuf, PersistError> {
        ensure_output_dir(&self.dir)?;

        let target = self.dir.join(filename);
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.flush()?;
        tmp.as_file_mut().sync_all()?;

        tmp.persist(&target).map_err(|e| PersistError::Io(e.error))?;
        Ok(target)
    }
}

/// Write `links` to `{dir}/{filename}.txt`, one per line, sorted and deduplicated.
pub fn save_link_list(dir: &Path, filename: &str, links: &[String]) -> Result<PathBuf, PersistError> {
    let filename = filename.trim();
    if filename.is_empty()
        || filename.contains(['/', '\\'])
        || filename == "."
        || filename == ".."
    {
        return Err(PersistError::InvalidFilename(filename.to_string()));
    }

    let mut sorted: Vec<&str> = links.iter().map(String::as_str).collect();
    sorted.sort_unstable();
    sorted.dedup();

    let mut content = String::with_capacity(sorted.iter().map(|l| l.len() + 1).sum());
    for link in &sorted {
        content.push_str(link);
        content.push('\n');
    }

    let writer = AtomicFileWriter::new(dir.to_path_buf());
    let path = writer.write(&with_txt_extension(filename), &content)?;
    engine_info!("Saved {} links to {:?}", sorted.len(), path);
    Ok(path)
}
