use crate::{CoreError, CoreResult};

const MB: f64 = 1024.0 * 1024.0;

/// Checks an uploaded image before it is stored.
pub fn validate_image(content_type: &str, size: usize, max_size_mb: u64) -> CoreResult<()> {
    if !content_type.starts_with("image/") {
        return Err(CoreError::Validation("File must be an image".to_string()));
    }
    let max_bytes = max_size_mb.saturating_mul(1024 * 1024);
    if size as u64 > max_bytes {
        return Err(CoreError::Validation(format!(
            "Image size must be less than {}MB. Current size: {:.2}MB",
            max_size_mb,
            size as f64 / MB
        )));
    }
    Ok(())
}

/// File extension used when storing an image of the given content type.
pub fn extension_for(content_type: &str) -> &'static str {
    match content_type {
        "image/jpeg" | "image/jpg" => "jpg",
        "image/png" => "png",
        "image/webp" => "webp",
        "image/gif" => "gif",
        "image/avif" => "avif",
        _ => "img",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_images_are_rejected() {
        let err = validate_image("application/pdf", 10, 10).unwrap_err();
        assert_eq!(err.to_string(), "File must be an image");
    }

    #[test]
    fn oversize_message_reports_both_sizes() {
        let err = validate_image("image/png", 12 * 1024 * 1024 + 512 * 1024, 10).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Image size must be less than 10MB. Current size: 12.50MB"
        );
    }

    #[test]
    fn size_at_limit_is_accepted() {
        assert!(validate_image("image/webp", 10 * 1024 * 1024, 10).is_ok());
        assert_eq!(extension_for("image/webp"), "webp");
        assert_eq!(extension_for("image/x-icon"), "img");
    }
}
