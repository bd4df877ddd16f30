use crate::error::IntakeError;
use crate::models::selected_file::SelectedFile;
use base64::{engine::general_purpose, Engine as _};
use image::{ImageFormat, ImageReader};
use std::io::Cursor;
use std::path::Path;

const FALLBACK_MIME: &str = "application/octet-stream";

/// Encode bytes as a base64 `data:` URI
pub fn encode(mime_type: &str, bytes: &[u8]) -> String {
    format!(
        "data:{};base64,{}",
        mime_type,
        general_purpose::STANDARD.encode(bytes)
    )
}

/// Split a base64 `data:` URI into its MIME type and still-encoded payload
pub fn split(uri: &str) -> Result<(&str, &str), String> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or("Not a data URI (missing 'data:' prefix)")?;
    let (meta, payload) = rest
        .split_once(',')
        .ok_or("Malformed data URI (missing ',')")?;
    let mime_type = meta
        .strip_suffix(";base64")
        .ok_or("Only base64 data URIs are supported")?;

    Ok((mime_type, payload))
}

/// Read a selected file into a displayable data URI off the async runtime
pub async fn read_as_data_uri(file: &SelectedFile) -> Result<String, IntakeError> {
    let mime_type = file.mime_type.clone();
    let bytes = file.bytes.clone();

    tokio::task::spawn_blocking(move || encode(&mime_type, &bytes))
        .await
        .map_err(|e| IntakeError::Read(std::io::Error::other(e)))
}

/// MIME type from the content, falling back to the file extension
pub fn sniff_mime(path: &Path, bytes: &[u8]) -> String {
    image::guess_format(bytes)
        .or_else(|_| ImageFormat::from_path(path))
        .map(|format| format.to_mime_type().to_string())
        .unwrap_or_else(|_| FALLBACK_MIME.to_string())
}

/// Load a file from disk for path-based intake
pub async fn load_file(path: &Path) -> Result<SelectedFile, IntakeError> {
    let bytes = tokio::fs::read(path).await?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mime_type = sniff_mime(path, &bytes);

    Ok(SelectedFile::new(name, mime_type, bytes))
}

/// Pixel dimensions, when the content is a decodable image
pub fn image_dimensions(bytes: &[u8]) -> Option<(u32, u32)> {
    ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .ok()?
        .into_dimensions()
        .ok()
}
