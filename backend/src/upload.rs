use actix_multipart::Multipart;
use futures::{StreamExt, TryStreamExt};
use image::ImageFormat;
use shared::api::UPLOAD_FIELD;

use crate::error::GatewayError;

/// An image received from the browser, checked and ready to forward.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub data: Vec<u8>,
    pub file_name: String,
    pub content_type: &'static str,
}

const ACCEPTED: [ImageFormat; 5] = [
    ImageFormat::Jpeg,
    ImageFormat::Png,
    ImageFormat::WebP,
    ImageFormat::Gif,
    ImageFormat::Bmp,
];

/// Checks the magic bytes rather than trusting the declared type.
pub fn sniff_format(data: &[u8]) -> Result<ImageFormat, GatewayError> {
    match image::guess_format(data) {
        Ok(format) if ACCEPTED.contains(&format) => Ok(format),
        Ok(format) => Err(GatewayError::UnsupportedMedia(format!("{:?}", format))),
        Err(_) => Err(GatewayError::UnsupportedMedia("not an image".into())),
    }
}

/// Reads the first non-empty `file` field (or the first non-empty field at
/// all) from the upload.
pub async fn read_image(mut payload: Multipart, limit: usize) -> Result<UploadedImage, GatewayError> {
    let mut fallback: Option<(Vec<u8>, String)> = None;

    while let Some(mut field) = payload
        .try_next()
        .await
        .map_err(|e| GatewayError::BadRequest(format!("Invalid upload: {}", e)))?
    {
        let is_file_field = field.name() == Some(UPLOAD_FIELD);
        let file_name = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .unwrap_or("image.jpg")
            .to_string();

        let mut data = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk.map_err(|e| GatewayError::BadRequest(format!("Invalid upload: {}", e)))?;
            if data.len() + chunk.len() > limit {
                return Err(GatewayError::TooLarge { limit });
            }
            data.extend_from_slice(&chunk);
        }

        if data.is_empty() {
            continue;
        }
        if is_file_field {
            return finish(data, file_name);
        }
        if fallback.is_none() {
            fallback = Some((data, file_name));
        }
    }

    match fallback {
        Some((data, file_name)) => finish(data, file_name),
        None => Err(GatewayError::MissingImage),
    }
}

fn finish(data: Vec<u8>, file_name: String) -> Result<UploadedImage, GatewayError> {
    let format = sniff_format(&data)?;
    Ok(UploadedImage {
        data,
        file_name,
        content_type: format.to_mime_type(),
    })
}
