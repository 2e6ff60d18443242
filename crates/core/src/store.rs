//! JSON array files shared by the resource catalog and the veteran registry.

use std::{
    fmt, fs,
    io::Write,
    path::{Path, PathBuf},
};

use anyhow::{anyhow, Context, Result};
use chrono::Local;
use serde::Serialize;
use serde_json::{ser::PrettyFormatter, Serializer, Value};
use tempfile::NamedTempFile;
use tracing::{error, info, warn};

/// Indentation used for catalog files.
pub const CATALOG_INDENT: &[u8] = b"    ";
/// Indentation used for the registry file.
pub const REGISTRY_INDENT: &[u8] = b"  ";

/// A record that could not be decoded and was left out of a load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skipped<E> {
    /// Position of the element in the stored array.
    pub index: usize,
    /// Why the element was rejected.
    pub error: E,
}

/// Outcome of a best-effort load.
#[derive(Debug)]
pub struct LoadReport<T, E> {
    /// Records that decoded successfully, in file order.
    pub records: Vec<T>,
    /// Elements that were skipped with a warning.
    pub skipped: Vec<Skipped<E>>,
    /// Set when the whole file was unreadable and nothing was loaded.
    pub failure: Option<anyhow::Error>,
    /// Copy of an unreadable file kept aside before it can be overwritten.
    pub quarantined: Option<PathBuf>,
}

impl<T, E> Default for LoadReport<T, E> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            skipped: Vec::new(),
            failure: None,
            quarantined: None,
        }
    }
}

/// Read a JSON array from `path`, returning `None` if the file does not exist.
pub fn read_array(path: impl AsRef<Path>) -> Result<Option<Vec<Value>>> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(None);
    }

    let contents =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let value: Value = serde_json::from_str(&contents)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    match value {
        Value::Array(items) => Ok(Some(items)),
        other => Err(anyhow!(
            "expected a JSON array in {}, found {}",
            path.display(),
            json_type_name(&other)
        )),
    }
}

/// Load every element of the array at `path` through `decode`.
///
/// A missing file yields an empty report. An unreadable file is logged, copied
/// aside and yields an empty report with `failure` set. Elements rejected by
/// `decode` are logged and listed in `skipped`; their siblings still load.
pub fn load_array<T, E, F>(path: impl AsRef<Path>, decode: F) -> LoadReport<T, E>
where
    E: fmt::Display,
    F: Fn(&Value) -> std::result::Result<T, E>,
{
    let path = path.as_ref();
    let items = match read_array(path) {
        Ok(Some(items)) => items,
        Ok(None) => {
            info!(path = %path.display(), "no data file yet, starting empty");
            return LoadReport::default();
        }
        Err(err) => {
            error!(path = %path.display(), "failed to load data file: {err:#}");
            let quarantined = if path.is_file() {
                match quarantine(path) {
                    Ok(copy) => Some(copy),
                    Err(copy_err) => {
                        warn!(path = %path.display(), "could not keep a copy: {copy_err:#}");
                        None
                    }
                }
            } else {
                None
            };
            return LoadReport {
                failure: Some(err),
                quarantined,
                ..LoadReport::default()
            };
        }
    };

    let mut report = LoadReport::default();
    for (index, item) in items.iter().enumerate() {
        match decode(item) {
            Ok(record) => report.records.push(record),
            Err(err) => {
                warn!(path = %path.display(), index, "skipping record: {err}");
                report.skipped.push(Skipped { index, error: err });
            }
        }
    }
    info!(
        path = %path.display(),
        count = report.records.len(),
        skipped = report.skipped.len(),
        "data file loaded"
    );
    report
}

/// Persist `records` as a pretty-printed JSON array, creating parent directories if needed.
///
/// The array is written to a temporary file next to `path` which then replaces
/// the target, so a failed write leaves the previous contents intact.
pub fn write_array<T: Serialize>(
    path: impl AsRef<Path>,
    records: &[T],
    indent: &[u8],
) -> Result<()> {
    let path = path.as_ref();
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)
        .with_context(|| format!("failed to create data directory {}", parent.display()))?;

    let mut buffer = Vec::new();
    let mut serializer =
        Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(indent));
    records
        .serialize(&mut serializer)
        .with_context(|| format!("failed to serialize records for {}", path.display()))?;

    let mut file = NamedTempFile::new_in(parent)
        .with_context(|| format!("failed to create temporary file in {}", parent.display()))?;
    file.write_all(&buffer)
        .with_context(|| format!("failed to write {}", path.display()))?;
    file.persist(path)
        .with_context(|| format!("failed to replace {}", path.display()))?;
    Ok(())
}

/// Copy an unreadable data file to `<name>.corrupt-<timestamp>` and return the copy's path.
pub fn quarantine(path: impl AsRef<Path>) -> Result<PathBuf> {
    let path = path.as_ref();
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| anyhow!("invalid data file path {}", path.display()))?;
    let stamp = Local::now().format("%Y%m%d%H%M%S");
    let target = path.with_file_name(format!("{file_name}.corrupt-{stamp}"));
    fs::copy(path, &target)
        .with_context(|| format!("failed to copy {} to {}", path.display(), target.display()))?;
    warn!(from = %path.display(), to = %target.display(), "kept a copy of unreadable data file");
    Ok(target)
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
