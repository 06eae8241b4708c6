//! Input materialization: the document source and embedded image assets.
//!
//! Asset names are constrained to the workspace — traversal outside it is
//! rejected. A malformed asset is logged and skipped; it never aborts the
//! request.

use std::path::{Component, Path, PathBuf};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use tracing::{debug, warn};

use shared_types::ImageAsset;

use super::workspace::Workspace;

/// Entry-point file the renderer is pointed at.
pub const MAIN_TEX: &str = "main.tex";

#[derive(Debug, thiserror::Error)]
enum AssetError {
    #[error("name escapes the workspace")]
    UnsafeName,
    #[error("data URI has no payload separator")]
    TruncatedDataUri,
    #[error("malformed base64 payload: {0}")]
    Decode(#[from] base64::DecodeError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Write the document source and all usable assets into the workspace.
///
/// Only the entry-point write can fail the request; per-asset failures
/// degrade to a warning.
pub async fn materialize(
    ws: &Workspace,
    latex: &str,
    images: &[ImageAsset],
) -> std::io::Result<()> {
    tokio::fs::write(ws.join(MAIN_TEX), latex).await?;

    for img in images {
        // An asset with a missing name or missing reference is dropped.
        if img.name.is_empty() || img.url.is_empty() {
            continue;
        }
        if let Err(e) = write_asset(ws, img).await {
            warn!(name = %img.name, "failed to process image: {e}");
        }
    }
    Ok(())
}

async fn write_asset(ws: &Workspace, img: &ImageAsset) -> Result<(), AssetError> {
    let dest = safe_join(ws.path(), &img.name).ok_or(AssetError::UnsafeName)?;

    let Some(rest) = img.url.strip_prefix("data:") else {
        // External reference: accepted but not fetched in this version.
        debug!(name = %img.name, "skipping non-embedded image reference");
        return Ok(());
    };
    let (_, encoded) = rest.split_once(',').ok_or(AssetError::TruncatedDataUri)?;
    let bytes = BASE64.decode(encoded)?;

    if let Some(parent) = dest.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(&dest, bytes).await?;
    Ok(())
}

/// Constrain an asset name to the workspace.
///
/// Rejects null bytes, absolute paths, and any `..` sequence that would
/// escape `root`. Returns the normalized destination path when safe.
fn safe_join(root: &Path, name: &str) -> Option<PathBuf> {
    if name.contains('\0') {
        return None;
    }
    let path = Path::new(name);
    if path.is_absolute() {
        return None;
    }

    let mut normalized = PathBuf::new();
    for comp in path.components() {
        match comp {
            Component::Normal(s) => normalized.push(s),
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    return None;
                }
            }
            Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    if normalized.as_os_str().is_empty() {
        return None;
    }
    Some(root.join(normalized))
}
