//! Serialization container for file-of-filenames (FOFN) lists: `.json`,
//! `.msgpack`, or a plain whitespace-delimited list of paths, resolved
//! relative to the FOFN's own directory.
//!
//! Grounded in `falcon_kit/io.py`'s `deserialize`/`serialize` and
//! `yield_abspath_from_fofn`.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ContainerError;

fn is_msgpack(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("msgpack")
}

fn is_json(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("json")
}

/// Deserialize a `Vec<String>` from a `.json` or `.msgpack` file. Errors on
/// any other extension, matching `deserialize()`'s `raise Exception` path.
pub fn deserialize_list(path: &Path) -> Result<Vec<String>, ContainerError> {
    let bytes = fs::read(path)?;
    if is_msgpack(path) {
        rmp_serde::from_slice(&bytes).map_err(|e| ContainerError::Msgpack(path.to_path_buf(), e))
    } else if is_json(path) {
        serde_json::from_slice(&bytes).map_err(|e| ContainerError::Json(path.to_path_buf(), e))
    } else {
        Err(ContainerError::UnknownExtension(path.to_path_buf()))
    }
}

/// Serialize a `Vec<String>` to `.json` (pretty, sorted-key intent
/// preserved via a plain array) or `.msgpack`.
pub fn serialize_list(path: &Path, values: &[String]) -> Result<(), ContainerError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let bytes = if is_msgpack(path) {
        rmp_serde::to_vec(values).map_err(|e| ContainerError::Msgpack(path.to_path_buf(), e.into()))?
    } else if is_json(path) {
        let mut bytes = serde_json::to_vec_pretty(values)
            .map_err(|e| ContainerError::Json(path.to_path_buf(), e))?;
        bytes.push(b'\n');
        bytes
    } else {
        return Err(ContainerError::UnknownExtension(path.to_path_buf()));
    };
    fs::write(path, bytes)?;
    Ok(())
}

/// Resolve every path named in a FOFN (`.fofn`, `.json`, or `.msgpack`) to
/// an absolute path, relative entries resolved against the FOFN's own
/// parent directory.
///
/// Mirrors `yield_abspath_from_fofn`: try the structured container first,
/// fall back to a plain whitespace-split file (so truncated/binary files
/// fail loudly instead of silently parsing as an empty list).
pub fn read_fofn_paths(fofn_path: &Path) -> Result<Vec<PathBuf>, ContainerError> {
    let names = match deserialize_list(fofn_path) {
        Ok(names) => names,
        Err(_) => {
            let content = fs::read_to_string(fofn_path)?;
            content.split_whitespace().map(|s| s.to_string()).collect()
        }
    };
    let base_dir = fofn_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();
    Ok(names
        .into_iter()
        .map(|name| {
            let p = PathBuf::from(&name);
            if p.is_absolute() {
                p
            } else {
                base_dir.join(p)
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn reads_plain_whitespace_list_with_relative_paths() {
        let dir = tempfile::tempdir().unwrap();
        let fofn = dir.path().join("files.fofn");
        let mut f = fs::File::create(&fofn).unwrap();
        writeln!(f, "a.las\nsub/b.las").unwrap();

        let paths = read_fofn_paths(&fofn).unwrap();
        assert_eq!(paths, vec![dir.path().join("a.las"), dir.path().join("sub/b.las")]);
    }

    #[test]
    fn json_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let fofn = dir.path().join("files.json");
        serialize_list(&fofn, &["a.las".to_string(), "b.las".to_string()]).unwrap();
        let paths = read_fofn_paths(&fofn).unwrap();
        assert_eq!(paths, vec![dir.path().join("a.las"), dir.path().join("b.las")]);
    }

    #[test]
    fn unknown_extension_is_rejected_by_deserialize_list() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("files.txt");
        fs::write(&path, b"a.las\n").unwrap();
        assert!(deserialize_list(&path).is_err());
    }
}
