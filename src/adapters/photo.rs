use crate::utils::error::{AdminError, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::path::Path;

fn mime_for(path: &Path) -> Option<&'static str> {
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();
    match extension.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}

/// Bytes as a `data:image/...;base64,` URL, the form the façade's
/// `photoBase64` field expects.
pub fn encode_photo(bytes: &[u8], mime: &str) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

pub fn encode_photo_file(path: &Path) -> Result<String> {
    let mime = mime_for(path).ok_or_else(|| AdminError::InvalidArgument {
        field: "photo".to_string(),
        reason: format!("{} is not a jpeg, png, gif or webp image", path.display()),
    })?;
    let bytes = std::fs::read(path)?;
    tracing::debug!("Encoded {} ({} bytes) as {}", path.display(), bytes.len(), mime);
    Ok(encode_photo(&bytes, mime))
}
