//! JSON-lines backed collection
//!
//! Each collection is a single append-only file holding one document per
//! line. Writes are flushed before they are acknowledged; lines that fail to
//! parse are skipped on read.

use crate::filter::Filter;
use crate::store::{assign_id, DocumentStore, InsertOutcome};
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use shelter_core::{Document, Error, Result};
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;
use tracing::{debug, info};

/// Collection persisted as a `.jsonl` file
pub struct JsonlStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonlStore {
    /// Open (or prepare) the collection file at `path`
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        info!("Opened JSON-lines collection at {:?}", path);

        Ok(Self {
            path,
            write_lock: Mutex::new(()),
        })
    }

    fn append(&self, document: &Document) -> Result<()> {
        let line = serde_json::to_string(document)?;

        let _guard = self.write_lock.lock();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| self.io_error("open", e))?;
        let mut writer = BufWriter::new(file);
        writeln!(writer, "{}", line)
            .and_then(|_| writer.flush())
            .map_err(|e| self.io_error("append to", e))?;

        Ok(())
    }

    fn scan(&self, filter: &Filter) -> Result<Vec<Document>> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(self.io_error("open", e)),
        };

        let mut results = Vec::new();
        for (line_no, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|e| self.io_error("read", e))?;
            if line.trim().is_empty() {
                continue;
            }

            match serde_json::from_str::<Value>(&line) {
                Ok(Value::Object(doc)) => {
                    if filter.matches(&doc) {
                        results.push(doc);
                    }
                }
                Ok(_) => debug!("Skipping non-object line {} in {:?}", line_no + 1, self.path),
                Err(e) => debug!("Failed to parse line {} in {:?}: {}", line_no + 1, self.path, e),
            }
        }

        Ok(results)
    }

    fn io_error(&self, action: &str, err: std::io::Error) -> Error {
        Error::store(format!("failed to {} {:?}: {}", action, self.path, err))
    }
}

#[async_trait]
impl DocumentStore for JsonlStore {
    async fn insert_one(&self, mut document: Document) -> Result<InsertOutcome> {
        let id = assign_id(&mut document);
        self.append(&document)?;
        Ok(InsertOutcome::acknowledged(id))
    }

    async fn find(&self, filter: &Filter) -> Result<Vec<Document>> {
        self.scan(filter)
    }

    fn name(&self) -> &str {
        "jsonl"
    }
}
