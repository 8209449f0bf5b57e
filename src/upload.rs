use std::fs;
use std::path::Path;

use crate::error::UploadError;

pub const MIME_PDF: &str = "application/pdf";
pub const MIME_TEXT: &str = "text/plain";
pub const MIME_UNKNOWN: &str = "application/octet-stream";

const ACCEPTED_TYPES: [&str; 2] = [MIME_PDF, MIME_TEXT];

/// A document held in memory, ready to be posted as the `file` field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedFile {
    pub name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl StagedFile {
    pub fn new(name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime: mime.into(),
            bytes,
        }
    }

    /// Reads a file from disk, typing it the way a browser would from its extension.
    pub fn from_path(path: &Path) -> Result<Self, UploadError> {
        let bytes = fs::read(path).map_err(|source| UploadError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Ok(Self::new(name, mime_for_path(path), bytes))
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// Size in KiB with one decimal, e.g. `12.3 KB`.
    pub fn size_label(&self) -> String {
        format!("{:.1} KB", self.size() as f64 / 1024.0)
    }
}

pub fn mime_for_path(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    match extension.as_deref() {
        Some("pdf") => MIME_PDF,
        Some("txt") => MIME_TEXT,
        _ => MIME_UNKNOWN,
    }
}

pub fn is_valid_file_type(file: &StagedFile) -> bool {
    ACCEPTED_TYPES.contains(&file.mime.as_str())
}

/// Drop target plus the single staged document.
#[derive(Debug, Clone, Default)]
pub struct DropZone {
    active: bool,
    staged: Option<StagedFile>,
}

impl DropZone {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn staged(&self) -> Option<&StagedFile> {
        self.staged.as_ref()
    }

    pub fn drag_enter(&mut self) {
        self.active = true;
    }

    pub fn drag_over(&mut self) {
        self.active = true;
    }

    pub fn drag_leave(&mut self) {
        self.active = false;
    }

    /// Stages the first dropped file if its type is accepted. Anything else
    /// is ignored without feedback.
    pub fn drop_files(&mut self, files: Vec<StagedFile>) -> bool {
        self.active = false;
        match files.into_iter().next() {
            Some(file) => self.pick(file),
            None => false,
        }
    }

    /// Same validation as a drop, for files chosen through the picker.
    pub fn pick(&mut self, file: StagedFile) -> bool {
        if !is_valid_file_type(&file) {
            return false;
        }
        self.staged = Some(file);
        true
    }

    pub fn remove(&mut self) {
        self.staged = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pdf(name: &str) -> StagedFile {
        StagedFile::new(name, MIME_PDF, b"%PDF-1.4".to_vec())
    }

    #[test]
    fn test_mime_from_extension() {
        assert_eq!(mime_for_path(Path::new("report.pdf")), MIME_PDF);
        assert_eq!(mime_for_path(Path::new("NOTES.TXT")), MIME_TEXT);
        assert_eq!(mime_for_path(Path::new("photo.png")), MIME_UNKNOWN);
        assert_eq!(mime_for_path(Path::new("README")), MIME_UNKNOWN);
    }

    #[test]
    fn test_rejected_type_leaves_state_unchanged() {
        let mut zone = DropZone::new();
        assert!(!zone.pick(StagedFile::new("photo.png", "image/png", vec![1, 2, 3])));
        assert!(zone.staged().is_none());

        assert!(zone.pick(pdf("a.pdf")));
        assert!(!zone.pick(StagedFile::new("sheet.xlsx", MIME_UNKNOWN, vec![])));
        assert_eq!(zone.staged().map(|f| f.name.as_str()), Some("a.pdf"));
    }

    #[test]
    fn test_drag_tracking() {
        let mut zone = DropZone::new();
        zone.drag_enter();
        assert!(zone.is_active());
        zone.drag_leave();
        assert!(!zone.is_active());
        zone.drag_over();
        assert!(zone.is_active());

        // Drop stages only the first file and always clears the highlight
        let staged = zone.drop_files(vec![
            StagedFile::new("first.txt", MIME_TEXT, b"hi".to_vec()),
            pdf("second.pdf"),
        ]);
        assert!(staged);
        assert!(!zone.is_active());
        assert_eq!(zone.staged().unwrap().name, "first.txt");
    }

    #[test]
    fn test_drop_of_invalid_first_file_is_ignored() {
        let mut zone = DropZone::new();
        zone.drag_enter();
        let staged = zone.drop_files(vec![
            StagedFile::new("image.jpg", "image/jpeg", vec![0xff]),
            pdf("valid.pdf"),
        ]);
        assert!(!staged);
        assert!(zone.staged().is_none());
        assert!(!zone.drop_files(Vec::new()));
    }

    #[test]
    fn test_size_label() {
        let file = StagedFile::new("big.txt", MIME_TEXT, vec![b'a'; 12_700]);
        assert_eq!(file.size_label(), "12.4 KB");
        assert_eq!(StagedFile::new("empty.txt", MIME_TEXT, vec![]).size_label(), "0.0 KB");
    }

    #[test]
    fn test_unreadable_path_is_an_upload_error() {
        let missing = Path::new("/nonexistent/emailer/notes.txt");
        match StagedFile::from_path(missing) {
            Err(UploadError::Read { path, .. }) => assert!(path.ends_with("notes.txt")),
            other => panic!("expected read error, got {:?}", other),
        }
    }

    #[test]
    fn test_remove_clears_staged_file() {
        let mut zone = DropZone::new();
        zone.pick(pdf("a.pdf"));
        zone.remove();
        assert!(zone.staged().is_none());
    }
}
