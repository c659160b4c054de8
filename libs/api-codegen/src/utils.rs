use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Load every `*.json` file of `input_dir` into one top-level namespace.
///
/// Files are read in file-name order. Each must hold a JSON object; when two
/// files define the same top-level key the later file wins.
pub fn load_documents(input_dir: &Path) -> Result<Map<String, Value>> {
    let io_error = |source: std::io::Error| Error::Io {
        path: input_dir.to_path_buf(),
        source,
    };

    let mut files: Vec<PathBuf> = Vec::new();
    for entry in fs::read_dir(input_dir).map_err(io_error)? {
        let path = entry.map_err(io_error)?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
            files.push(path);
        }
    }
    files.sort();

    let mut documents = Map::new();
    for path in files {
        let contents = fs::read_to_string(&path).map_err(|source| Error::Io {
            path: path.clone(),
            source,
        })?;
        let value: Value = serde_json::from_str(&contents).map_err(|source| Error::Document {
            path: path.clone(),
            source,
        })?;

        let Value::Object(entries) = value else {
            return Err(Error::schema(
                path.display().to_string(),
                "top-level document must be a JSON object",
            ));
        };

        tracing::debug!(file = %path.display(), entries = entries.len(), "loaded document");
        for (key, value) in entries {
            if documents.insert(key.clone(), value).is_some() {
                tracing::debug!(
                    key = %key,
                    file = %path.display(),
                    "top-level key redefined, keeping the later one"
                );
            }
        }
    }

    Ok(documents)
}

/// Write generated modules to the given output directory.
/// Creates the directory if it does not exist.
pub fn write_modules(output_dir: &Path, modules: &BTreeMap<String, String>) -> Result<()> {
    fs::create_dir_all(output_dir).map_err(|source| Error::Io {
        path: output_dir.to_path_buf(),
        source,
    })?;

    for (filename, contents) in modules {
        let path = output_dir.join(filename);
        fs::write(&path, contents).map_err(|source| Error::Io {
            path: path.clone(),
            source,
        })?;
    }

    Ok(())
}
