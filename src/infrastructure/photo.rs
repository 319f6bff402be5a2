use crate::shared::error::AppError;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::path::Path;

/// Upper bound for an encoded photo; larger images must be downscaled first.
pub const MAX_PHOTO_BYTES: usize = 5 * 1024 * 1024;

/// Reads an image file into the `data:` URL form stored in `Entry::photo`.
pub async fn photo_data_url(path: &Path) -> Result<String, AppError> {
    let bytes = tokio::fs::read(path).await?;
    if bytes.len() > MAX_PHOTO_BYTES {
        return Err(AppError::InvalidInput(format!(
            "Photo {} is {} bytes, limit is {}",
            path.display(),
            bytes.len(),
            MAX_PHOTO_BYTES
        )));
    }
    Ok(encode_data_url(mime_for(path), &bytes))
}

pub fn encode_data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}

fn mime_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());
    match extension.as_deref() {
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "image/jpeg",
    }
}
