use crate::error::IntakeError;
use crate::models::config::IntakeConfig;
use crate::models::selected_file::FileInfo;

/// Check a file's metadata against the intake limits. No content is needed.
///
/// The type check runs first, so an oversized non-image reports the type.
pub fn validate_file(file: &FileInfo, limits: &IntakeConfig) -> Result<(), IntakeError> {
    if !file.mime_type.starts_with(&limits.accepted_mime_prefix) {
        return Err(IntakeError::InvalidType {
            mime_type: file.mime_type.clone(),
        });
    }

    if file.size > limits.max_file_bytes {
        return Err(IntakeError::TooLarge {
            size: file.size,
            max: limits.max_file_bytes,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIB: u64 = 1024 * 1024;

    fn file(mime: &str, size: u64) -> FileInfo {
        FileInfo::new("upload", mime, size)
    }

    #[test]
    fn test_accepts_images_within_limit() {
        let limits = IntakeConfig::default();
        for mime in ["image/png", "image/jpeg", "image/webp", "image/svg+xml"] {
            assert!(validate_file(&file(mime, 1024), &limits).is_ok(), "{} should pass", mime);
        }
    }

    #[test]
    fn test_rejects_non_image_types() {
        let limits = IntakeConfig::default();
        for mime in ["application/pdf", "text/plain", "", "video/mp4", "IMAGE/PNG", "x-image/png"] {
            let result = validate_file(&file(mime, 10), &limits);
            assert!(
                matches!(result, Err(IntakeError::InvalidType { .. })),
                "{:?} should be rejected",
                mime
            );
        }
    }

    #[test]
    fn test_size_limit_is_inclusive() {
        let limits = IntakeConfig::default();

        assert!(validate_file(&file("image/png", 10 * MIB), &limits).is_ok());

        let result = validate_file(&file("image/png", 10 * MIB + 1), &limits);
        match result {
            Err(IntakeError::TooLarge { size, max }) => {
                assert_eq!(size, 10 * MIB + 1);
                assert_eq!(max, 10 * MIB);
            }
            other => panic!("expected TooLarge, got {:?}", other),
        }
    }

    #[test]
    fn test_huge_declared_size_rejected_without_content() {
        let limits = IntakeConfig::default();
        let result = validate_file(&file("image/tiff", 2 * 1024 * MIB), &limits);
        assert!(matches!(result, Err(IntakeError::TooLarge { .. })));
    }

    #[test]
    fn test_oversized_non_image_reports_type_first() {
        let limits = IntakeConfig::default();
        let result = validate_file(&file("application/zip", 11 * MIB), &limits);
        assert!(matches!(result, Err(IntakeError::InvalidType { .. })));
    }

    #[test]
    fn test_custom_limit() {
        let limits = IntakeConfig {
            max_file_bytes: 100,
            ..IntakeConfig::default()
        };
        assert!(validate_file(&file("image/gif", 100), &limits).is_ok());
        assert!(validate_file(&file("image/gif", 101), &limits).is_err());
    }
}
