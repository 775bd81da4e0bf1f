use std::path::Path;

use crate::error::TransportError;

/// File extensions the upload picker advertises.
pub const ACCEPTED_EXTENSIONS: [&str; 4] = ["pdf", "jpg", "jpeg", "png"];

/// Advisory classification of an upload. Nothing is rejected based on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    Pdf,
    Jpg,
    Jpeg,
    Png,
}

impl UploadKind {
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        let extension = Path::new(file_name).extension()?.to_str()?;
        match extension.to_ascii_lowercase().as_str() {
            "pdf" => Some(UploadKind::Pdf),
            "jpg" => Some(UploadKind::Jpg),
            "jpeg" => Some(UploadKind::Jpeg),
            "png" => Some(UploadKind::Png),
            _ => None,
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            UploadKind::Pdf => "application/pdf",
            UploadKind::Jpg | UploadKind::Jpeg => "image/jpeg",
            UploadKind::Png => "image/png",
        }
    }
}

/// A file chosen by the user, held until another file replaces it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadSelection {
    file_name: String,
    bytes: Vec<u8>,
}

impl UploadSelection {
    /// Selection coming from a drop: the name and contents are already in hand.
    pub fn from_bytes(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes: bytes.into(),
        }
    }

    /// Selection coming from the file picker.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, TransportError> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| {
                TransportError::InvalidUpload(format!("no file name in {}", path.display()))
            })?
            .to_string();

        let bytes = tokio::fs::read(path).await?;
        Ok(Self { file_name, bytes })
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn kind(&self) -> Option<UploadKind> {
        UploadKind::from_file_name(&self.file_name)
    }

    /// Whether the picker filter would have offered this file.
    pub fn is_advised_type(&self) -> bool {
        self.kind().is_some()
    }

    pub fn mime_type(&self) -> &'static str {
        self.kind()
            .map(|kind| kind.mime_type())
            .unwrap_or("application/octet-stream")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_kind_is_case_insensitive() {
        assert_eq!(UploadKind::from_file_name("scan.PDF"), Some(UploadKind::Pdf));
        assert_eq!(UploadKind::from_file_name("photo.Jpeg"), Some(UploadKind::Jpeg));
        assert_eq!(UploadKind::from_file_name("notes.txt"), None);
        assert_eq!(UploadKind::from_file_name("no_extension"), None);
    }

    #[test]
    fn test_unadvised_type_is_kept_with_generic_mime() {
        let selection = UploadSelection::from_bytes("labs.docx", b"x".to_vec());
        assert!(!selection.is_advised_type());
        assert_eq!(selection.mime_type(), "application/octet-stream");
        assert_eq!(selection.file_name(), "labs.docx");
    }

    #[tokio::test]
    async fn test_picker_and_drop_produce_same_selection() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("report.pdf");
        let mut file = std::fs::File::create(&path)?;
        file.write_all(b"%PDF-1.4 test")?;

        let picked = UploadSelection::from_path(&path).await?;
        let dropped = UploadSelection::from_bytes("report.pdf", b"%PDF-1.4 test".to_vec());

        assert_eq!(picked, dropped);
        assert_eq!(picked.mime_type(), "application/pdf");
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let result = UploadSelection::from_path("/definitely/not/here/report.pdf").await;
        assert!(matches!(result, Err(TransportError::Io(_))));
    }
}
