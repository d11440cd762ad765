//! On-disk persistence of inputs and artifacts
//!
//! Every write goes to a sibling `.part` file first and is renamed into place
//! once complete, so the presence of an artifact always means a finished stage.

use crate::error::{BuildError, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Read and parse a JSON document
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let reader = open(path)?;
    serde_json::from_reader(reader).map_err(|e| BuildError::json(path, e))
}

/// Open a file for buffered reading, reporting a missing file distinctly
pub fn open(path: &Path) -> Result<BufReader<File>> {
    match File::open(path) {
        Ok(file) => Ok(BufReader::new(file)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(BuildError::MissingFile(path.to_path_buf()))
        }
        Err(e) => Err(BuildError::io(path, e)),
    }
}

pub fn read_to_string(path: &Path) -> Result<String> {
    match std::fs::read_to_string(path) {
        Ok(text) => Ok(text),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(BuildError::MissingFile(path.to_path_buf()))
        }
        Err(e) => Err(BuildError::io(path, e)),
    }
}

/// Serialize `value` as compact JSON to `path`
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let bytes = serde_json::to_vec(value).map_err(|e| BuildError::json(path, e))?;
    write_bytes(path, &bytes)
}

/// Serialize `value` as indented JSON to `path`
pub fn write_json_pretty<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(value).map_err(|e| BuildError::json(path, e))?;
    write_bytes(path, &bytes)
}

pub fn write_bytes(path: &Path, bytes: &[u8]) -> Result<()> {
    let mut file = PendingFile::create(path)?;
    file.write_all(bytes)
        .map_err(|e| BuildError::io(&file.part_path, e))?;
    file.commit()
}

/// A file being written under a temporary name until `commit`
pub struct PendingFile {
    writer: BufWriter<File>,
    part_path: PathBuf,
    final_path: PathBuf,
}

impl PendingFile {
    pub fn create(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| BuildError::io(parent, e))?;
            }
        }

        let mut part_name = path.file_name().unwrap_or_default().to_os_string();
        part_name.push(".part");
        let part_path = path.with_file_name(part_name);
        let file = File::create(&part_path).map_err(|e| BuildError::io(&part_path, e))?;

        Ok(Self {
            writer: BufWriter::new(file),
            part_path,
            final_path: path.to_path_buf(),
        })
    }

    /// Flush and move the file to its final name
    pub fn commit(mut self) -> Result<()> {
        self.writer
            .flush()
            .map_err(|e| BuildError::io(&self.part_path, e))?;
        std::fs::rename(&self.part_path, &self.final_path)
            .map_err(|e| BuildError::io(&self.final_path, e))?;
        log::debug!("Wrote {}", self.final_path.display());
        Ok(())
    }
}

impl Write for PendingFile {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.writer.flush()
    }
}

/// Files in `dir` whose name starts with `prefix` and ends with `suffix`,
/// sorted by name. A missing directory yields no files.
pub fn list_files(dir: &Path, prefix: &str, suffix: &str) -> Result<Vec<PathBuf>> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            log::warn!("Directory not found: {}", dir.display());
            return Ok(Vec::new());
        }
        Err(e) => return Err(BuildError::io(dir, e)),
    };

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| BuildError::io(dir, e))?;
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if name.starts_with(prefix) && name.ends_with(suffix) && entry.path().is_file() {
            files.push(entry.path());
        }
    }
    files.sort();
    Ok(files)
}
