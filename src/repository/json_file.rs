//! Whole-file JSON array persistence shared by the stores

use std::{
    fs::{self, File},
    io::{BufReader, BufWriter, Write},
    path::Path,
};

use serde::{de::DeserializeOwned, Serialize};

use crate::error::AppResult;

/// Create `path` holding an empty array unless it already exists
pub(crate) fn ensure_exists(path: &Path) -> AppResult<()> {
    if path.exists() {
        return Ok(());
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    tracing::info!("Creating empty data file {}", path.display());
    write_all::<serde_json::Value>(path, &[])
}

pub(crate) fn read_all<T: DeserializeOwned>(path: &Path) -> AppResult<Vec<T>> {
    let file = File::open(path)?;
    let items: Vec<T> = serde_json::from_reader(BufReader::new(file))?;
    tracing::debug!("Read {} records from {}", items.len(), path.display());
    Ok(items)
}

/// Write the array to a sibling temp file, fsync it, then rename it over `path`.
/// The data is durable once this returns.
pub(crate) fn write_all<T: Serialize>(path: &Path, items: &[T]) -> AppResult<()> {
    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = Path::new(&tmp_name);

    let file = File::create(tmp_path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, items)?;
    writer.write_all(b"\n")?;
    let file = writer.into_inner().map_err(|e| e.into_error())?;
    file.sync_all()?;

    fs::rename(tmp_path, path)?;
    tracing::debug!("Wrote {} records to {}", items.len(), path.display());
    Ok(())
}
