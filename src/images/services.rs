use std::path::Path;

use bytes::Bytes;
use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use crate::api::transport::FilePart;
use crate::error::{ApiError, ApiResult};

pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

/// An image picked for scanning, held in memory until it is sent.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub body: Bytes,
    pub content_type: String,
    pub file_name: String,
}

impl ImageUpload {
    pub fn new(body: impl Into<Bytes>, content_type: &str, file_name: &str) -> Self {
        Self {
            body: body.into(),
            content_type: content_type.to_string(),
            file_name: file_name.to_string(),
        }
    }

    /// Reads an image from disk and validates it before anything is sent.
    pub async fn from_path(path: &Path) -> ApiResult<Self> {
        let content_type = path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(mime_from_ext)
            .unwrap_or("application/octet-stream");
        let body = tokio::fs::read(path)
            .await
            .map_err(|e| ApiError::Validation(format!("Could not read {}: {}", path.display(), e)))?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string)
            .unwrap_or_else(|| format!("upload.{}", ext_from_mime(content_type).unwrap_or("bin")));

        let upload = Self::new(body, content_type, &file_name);
        upload.validate()?;
        debug!(file = %upload.file_name, bytes = upload.body.len(), content_type = %upload.content_type, "image loaded");
        Ok(upload)
    }

    pub fn validate(&self) -> ApiResult<()> {
        if !self.content_type.starts_with("image/") {
            return Err(ApiError::Validation(
                "Please select an image file (JPG, PNG)".into(),
            ));
        }
        if self.body.is_empty() {
            return Err(ApiError::Validation("Image file is empty".into()));
        }
        if self.body.len() > MAX_IMAGE_BYTES {
            return Err(ApiError::Validation(
                "Image size should be less than 10MB".into(),
            ));
        }
        Ok(())
    }

    /// Fails on a content type that is not a bare `type/subtype`, before anything is sent.
    pub(crate) fn into_part(self, field: &str) -> ApiResult<FilePart> {
        lazy_static! {
            static ref MIME_RE: Regex = Regex::new(r"^[\w!#$&^.+-]+/[\w!#$&^.+-]+$").unwrap();
        }
        if !MIME_RE.is_match(&self.content_type) {
            return Err(ApiError::Request(format!(
                "invalid content type {:?}",
                self.content_type
            )));
        }
        Ok(FilePart {
            field: field.to_string(),
            file_name: self.file_name,
            content_type: self.content_type,
            bytes: self.body,
        })
    }
}

fn mime_from_ext(ext: &str) -> Option<&'static str> {
    match ext.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "webp" => Some("image/webp"),
        "heic" => Some("image/heic"),
        "gif" => Some("image/gif"),
        _ => None,
    }
}

fn ext_from_mime(ct: &str) -> Option<&'static str> {
    match ct {
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/webp" => Some("webp"),
        "image/heic" => Some("heic"),
        "image/gif" => Some("gif"),
        _ => None,
    }
}

#[cfg(test)]
mod image_tests {
    use super::*;

    #[test]
    fn part_requires_a_well_formed_content_type() {
        for bad in ["image/", "image", "image/png; x=1", "image /png"] {
            let err = ImageUpload::new(vec![1u8], bad, "a.png")
                .into_part("file")
                .unwrap_err();
            assert!(matches!(err, ApiError::Request(_)), "{}", bad);
        }
        let part = ImageUpload::new(vec![1u8], "image/svg+xml", "a.svg")
            .into_part("file")
            .unwrap();
        assert_eq!(part.content_type, "image/svg+xml");
    }

    #[test]
    fn test_mime_from_ext() {
        assert_eq!(mime_from_ext("jpg"), Some("image/jpeg"));
        assert_eq!(mime_from_ext("JPEG"), Some("image/jpeg"));
        assert_eq!(mime_from_ext("png"), Some("image/png"));
        assert_eq!(mime_from_ext("webp"), Some("image/webp"));
        assert_eq!(mime_from_ext("heic"), Some("image/heic"));
        assert_eq!(mime_from_ext("txt"), None);
    }

    #[test]
    fn test_ext_from_mime() {
        assert_eq!(ext_from_mime("image/jpeg"), Some("jpg"));
        assert_eq!(ext_from_mime("image/jpg"), Some("jpg"));
        assert_eq!(ext_from_mime("image/png"), Some("png"));
        assert_eq!(ext_from_mime("application/octet-stream"), None);
    }

    #[test]
    fn rejects_non_images() {
        let up = ImageUpload::new(vec![1u8, 2, 3], "application/pdf", "label.pdf");
        let err = up.validate().unwrap_err();
        assert_eq!(err.to_string(), "Please select an image file (JPG, PNG)");
    }

    #[test]
    fn rejects_oversized_images() {
        let up = ImageUpload::new(vec![0u8; MAX_IMAGE_BYTES + 1], "image/png", "big.png");
        let err = up.validate().unwrap_err();
        assert!(err.is_validation());
        assert_eq!(err.to_string(), "Image size should be less than 10MB");
    }

    #[test]
    fn accepts_exactly_ten_megabytes() {
        let up = ImageUpload::new(vec![0u8; MAX_IMAGE_BYTES], "image/jpeg", "ok.jpg");
        assert!(up.validate().is_ok());
    }

    #[test]
    fn rejects_empty_files() {
        let up = ImageUpload::new(Vec::<u8>::new(), "image/jpeg", "empty.jpg");
        assert_eq!(up.validate().unwrap_err().to_string(), "Image file is empty");
    }

    #[tokio::test]
    async fn load_reads_and_types_the_file() {
        let dir = std::env::temp_dir().join(format!("fineprint-img-{}", std::process::id()));
        tokio::fs::create_dir_all(&dir).await.unwrap();
        let path = dir.join("label.PNG");
        tokio::fs::write(&path, b"\x89PNG fake").await.unwrap();

        let up = ImageUpload::from_path(&path).await.unwrap();
        assert_eq!(up.content_type, "image/png");
        assert_eq!(up.file_name, "label.PNG");

        let part = up.into_part("file").unwrap();
        assert_eq!(part.field, "file");
        assert_eq!(part.bytes.as_ref(), b"\x89PNG fake");

        tokio::fs::remove_dir_all(&dir).await.ok();
    }

    #[tokio::test]
    async fn load_rejects_unknown_extensions() {
        let dir = std::env::temp_dir().join(format!("fineprint-txt-{}", std::process::id()));
        tokio::fs::create_dir_all(&dir).await.unwrap();
        let path = dir.join("notes.txt");
        tokio::fs::write(&path, b"sugar, salt").await.unwrap();

        let err = ImageUpload::from_path(&path).await.unwrap_err();
        assert!(err.is_validation());

        tokio::fs::remove_dir_all(&dir).await.ok();
    }
}
