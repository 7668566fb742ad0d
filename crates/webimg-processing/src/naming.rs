//! Output file naming
//!
//! Everything that decides what a file is called on disk: sanitization, SKU
//! fragments, the `-web` suffix and collision counters.

use std::path::{Path, PathBuf};
use webimg_core::constants::{FALLBACK_STEM, WEB_SUFFIX};

/// Reduce `name` to a portable filename.
///
/// Non-ASCII characters are dropped, path separators and whitespace runs become
/// a single `_`, anything outside `[A-Za-z0-9._-]` is removed and leading or
/// trailing `.`/`_` are trimmed. The result may be empty.
pub fn secure_filename(name: &str) -> String {
    let ascii: String = name
        .chars()
        .filter(char::is_ascii)
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();

    let joined = ascii.split_whitespace().collect::<Vec<_>>().join("_");

    joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect::<String>()
        .trim_matches(|c| c == '.' || c == '_')
        .to_string()
}

/// Filename-safe SKU fragment, or `None` when nothing usable remains.
pub fn sanitize_sku(raw: Option<&str>) -> Option<String> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    let fragment = secure_filename(raw).replace('_', "-");
    if fragment.is_empty() {
        None
    } else {
        Some(fragment)
    }
}

/// First path in `directory` for `desired_name` that does not exist yet.
///
/// Collisions get `_1`, `_2`, ... inserted before the extension. There is no
/// locking: two concurrent callers can receive the same path.
pub fn resolve_unique_path(directory: &Path, desired_name: &str) -> PathBuf {
    let mut name = secure_filename(desired_name);
    if name.is_empty() {
        name = FALLBACK_STEM.to_string();
    }

    let is_free = |candidate: &Path| !candidate.exists();

    let candidate = directory.join(&name);
    if is_free(&candidate) {
        return candidate;
    }

    let (stem, extension) = split_extension(&name);
    let mut counter = 1u32;
    loop {
        let candidate = directory.join(format!("{}_{}{}", stem, counter, extension));
        if is_free(&candidate) {
            return candidate;
        }
        counter += 1;
    }
}

/// Split `photo.final.jpg` into (`photo.final`, `.jpg`).
fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(idx) if idx > 0 => name.split_at(idx),
        _ => (name, ""),
    }
}

/// Unique path for the output of `source`.
///
/// The name is the source stem, followed when `include_suffix` is set by the
/// sanitized SKU (if any) and `web`, hyphen-joined, then `extension` (with its
/// leading dot). The source still exists while this runs, so an output that
/// would keep the source name gets a counter instead.
pub fn build_output_path(
    source: &Path,
    extension: &str,
    include_suffix: bool,
    sku: Option<&str>,
) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut parts = vec![stem];
    if include_suffix {
        if let Some(fragment) = sanitize_sku(sku) {
            parts.push(fragment);
        }
        parts.push(WEB_SUFFIX.to_string());
    }

    let joined = parts
        .into_iter()
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join("-");

    let mut base = secure_filename(&joined);
    if base.is_empty() {
        base = FALLBACK_STEM.to_string();
    }

    let directory = match source.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    resolve_unique_path(directory, &format!("{}{}", base, extension))
}
