// Upload validation for /predict

use image::ImageFormat;

use crate::error::AppError;

pub const ALLOWED_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// An uploaded image that passed every check
#[derive(Debug, Clone)]
pub struct CheckedImage {
    pub file_name: String,
    pub mime_type: &'static str,
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

fn extension(file_name: &str) -> Option<String> {
    let (_, ext) = file_name.rsplit_once('.')?;
    Some(ext.to_ascii_lowercase())
}

fn mime_for(ext: &str) -> Option<&'static str> {
    match ext {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        _ => None,
    }
}

/// Validate name, declared type, size and decodability of an upload.
///
/// Check order: file selected, extension, non-empty, size, declared MIME,
/// then a full decode.
pub fn check_upload(
    file_name: Option<&str>,
    declared_mime: Option<&str>,
    data: Vec<u8>,
    max_bytes: usize,
) -> Result<CheckedImage, AppError> {
    let file_name = file_name
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .ok_or_else(|| AppError::BadRequest("No file selected".to_string()))?;

    let mime_type = extension(file_name)
        .filter(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()))
        .and_then(|ext| mime_for(&ext))
        .ok_or_else(|| AppError::BadRequest("Unsupported file type".to_string()))?;

    if data.is_empty() {
        return Err(AppError::BadRequest("Empty file".to_string()));
    }
    if data.len() > max_bytes {
        return Err(AppError::PayloadTooLarge);
    }

    if let Some(declared) = declared_mime {
        let declared = declared.trim().to_ascii_lowercase();
        let consistent = declared == mime_type
            || declared == "application/octet-stream"
            || (mime_type == "image/jpeg" && declared == "image/jpg");
        if !consistent {
            return Err(AppError::BadRequest(
                "File type does not match its extension".to_string(),
            ));
        }
    }

    let format = match mime_type {
        "image/png" => ImageFormat::Png,
        _ => ImageFormat::Jpeg,
    };
    let decoded = image::load_from_memory_with_format(&data, format)
        .map_err(|_| AppError::BadRequest("Invalid or corrupted image".to_string()))?;
    if decoded.width() == 0 || decoded.height() == 0 {
        return Err(AppError::BadRequest("Invalid or corrupted image".to_string()));
    }

    Ok(CheckedImage {
        file_name: file_name.to_string(),
        mime_type,
        width: decoded.width(),
        height: decoded.height(),
        data,
    })
}
