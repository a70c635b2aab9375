//! Static responder for the browser UI.

use std::path::{Component, Path, PathBuf};

use log::warn;

use crate::error::RelayError;

const CONTENT_TYPES: &[(&str, &str)] = &[
    ("html", "text/html; charset=utf-8"),
    ("js", "application/javascript; charset=utf-8"),
    ("css", "text/css; charset=utf-8"),
    ("svg", "image/svg+xml"),
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("json", "application/json; charset=utf-8"),
    ("ico", "image/x-icon"),
];

const OCTET_STREAM: &str = "application/octet-stream";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticAsset {
    pub path: PathBuf,
    pub content_type: &'static str,
}

pub fn content_type_for(path: &Path) -> &'static str {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return OCTET_STREAM;
    };
    let ext = ext.to_ascii_lowercase();
    CONTENT_TYPES
        .iter()
        .find(|(known, _)| *known == ext)
        .map_or(OCTET_STREAM, |&(_, ct)| ct)
}

/// Relative path for a request path, or `None` if it tries to leave the root.
fn relative_path(request_path: &str) -> Option<PathBuf> {
    let mut out = PathBuf::new();
    for component in Path::new(request_path.trim_start_matches('/')).components() {
        match component {
            Component::Normal(part) => out.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    Some(out)
}

/// Map a request path to a file under `root`. Directories resolve to their
/// `index.html`. The resolved file must stay inside `root` after symlinks are
/// followed.
pub async fn resolve(root: &Path, request_path: &str) -> Result<StaticAsset, RelayError> {
    let Some(relative) = relative_path(request_path) else {
        warn!("Rejected static path outside public root: {}", request_path);
        return Err(RelayError::NotFound);
    };

    let mut candidate = root.join(relative);
    let metadata = tokio::fs::metadata(&candidate)
        .await
        .map_err(|_| RelayError::NotFound)?;
    if metadata.is_dir() {
        candidate.push("index.html");
    }

    let root = tokio::fs::canonicalize(root)
        .await
        .map_err(|_| RelayError::NotFound)?;
    let path = tokio::fs::canonicalize(&candidate)
        .await
        .map_err(|_| RelayError::NotFound)?;
    if !path.starts_with(&root) {
        warn!("Rejected static path escaping public root: {}", request_path);
        return Err(RelayError::NotFound);
    }
    if !tokio::fs::metadata(&path).await.map_or(false, |m| m.is_file()) {
        return Err(RelayError::NotFound);
    }

    Ok(StaticAsset {
        content_type: content_type_for(&path),
        path,
    })
}
