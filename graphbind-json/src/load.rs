use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use glob::glob;
use graphbind_core::{Record, RecordFactory};
use thiserror::Error;
use tracing::debug;

use crate::record_from_str;

#[derive(Debug, Clone)]
pub struct LoadedPayload {
    pub path: Utf8PathBuf,
    /// File stem, e.g. `host` for `host.json`.
    pub name: String,
    pub record: Result<Record, PayloadLoadError>,
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PayloadLoadError {
    #[error("io error: {message}")]
    Io { message: String },

    #[error("decode error: {message}")]
    Decode { message: String },
}

/// Decode every `*.json` file directly under `dir` with `factory` as the root factory.
///
/// Per-file failures are reported in [`LoadedPayload::record`]; only a failing directory scan
/// is an error. Results are sorted by path.
pub fn load_payloads(dir: &Utf8Path, factory: RecordFactory) -> anyhow::Result<Vec<LoadedPayload>> {
    let pattern = dir.join("*.json");
    let pattern_str = pattern.as_str();

    debug!(pattern = %pattern_str, "scanning for payloads");

    let mut out = Vec::new();
    for entry in glob(pattern_str).context("glob *.json payloads")? {
        let path = entry
            .map_err(|e| anyhow::anyhow!("glob error: {e}"))?
            .to_string_lossy()
            .to_string();

        let utf8_path = Utf8PathBuf::from(path);
        let name = utf8_path.file_stem().unwrap_or("unknown").to_string();

        let record = match fs::read_to_string(&utf8_path) {
            Ok(s) => record_from_str(&s, factory).map_err(|e| PayloadLoadError::Decode {
                message: e.to_string(),
            }),
            Err(e) => Err(PayloadLoadError::Io {
                message: e.to_string(),
            }),
        };

        if let Err(err) = &record {
            debug!(path = %utf8_path, error = %err, "payload failed to load");
        }

        out.push(LoadedPayload {
            path: utf8_path,
            name,
            record,
        });
    }

    out.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(out)
}
