//! Helpers shared across the pipeline: glob expansion, size formatting
//! and object graph copying.

use crate::error::{CompileError, Result};
use lopdf::{Document, Object};
use std::path::PathBuf;

/// Expand glob patterns in order, keeping each pattern's matches sorted.
///
/// A pattern without glob metacharacters is kept as a literal path even
/// when it does not exist, so the pipeline can report it as skipped.
pub fn collect_paths_for_patterns<T>(patterns: T) -> Result<Vec<PathBuf>>
where
    T: IntoIterator,
    T::Item: AsRef<str>,
{
    let mut resolved_paths = Vec::new();

    for pattern in patterns.into_iter() {
        let paths = collect_paths_for_pattern(pattern.as_ref())?;
        resolved_paths.extend(paths);
    }

    Ok(resolved_paths)
}

fn collect_paths_for_pattern(pattern: &str) -> Result<Vec<PathBuf>> {
    if !is_glob(pattern) {
        return Ok(vec![PathBuf::from(pattern)]);
    }

    let paths = glob::glob(pattern).map_err(|err| CompileError::Other {
        message: format!("Invalid pattern '{pattern}': {err}"),
    })?;

    let mut resolved_paths = Vec::new();
    for entry in paths {
        let path = entry.map_err(|err| CompileError::Other {
            message: err.to_string(),
        })?;
        resolved_paths.push(path);
    }

    if resolved_paths.is_empty() {
        log::warn!("Pattern matched no files: {pattern}");
    }

    Ok(resolved_paths)
}

fn is_glob(pattern: &str) -> bool {
    pattern.contains(['*', '?', '['])
}

/// Format file size as human-readable string.
pub fn format_file_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{} bytes", size)
    }
}

/// Copy every object reachable from `obj` out of `source` into `target`,
/// keeping object ids. Objects already in `target` are not revisited.
pub fn copy_references(target: &mut Document, source: &Document, obj: &Object) {
    match obj {
        Object::Reference(ref_id) => {
            if !target.objects.contains_key(ref_id)
                && let Ok(referenced_obj) = source.get_object(*ref_id)
            {
                target.objects.insert(*ref_id, referenced_obj.clone());
                copy_references(target, source, referenced_obj);
            }
        }
        Object::Dictionary(dict) => {
            for (_, value) in dict.iter() {
                copy_references(target, source, value);
            }
        }
        Object::Array(arr) => {
            for item in arr {
                copy_references(target, source, item);
            }
        }
        Object::Stream(stream) => {
            for (_, value) in stream.dict.iter() {
                copy_references(target, source, value);
            }
        }
        _ => {}
    }
}
