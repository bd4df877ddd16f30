use serde::{Deserialize, Serialize};

/// What the intake zone knows about a file before reading it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileInfo {
    pub name: String,
    pub mime_type: String,
    /// Size in bytes as reported by the file chooser or drop
    pub size: u64,
}

impl FileInfo {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            size,
        }
    }
}

/// Image chosen by the user, either from the file chooser or a drop
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedFile {
    pub name: String,
    /// MIME type as declared by the browser (or sniffed for path intake)
    pub mime_type: String,
    #[serde(skip)]
    pub bytes: Vec<u8>,
}

impl SelectedFile {
    /// Create a new selected file from its raw content
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// Size of the content in bytes
    pub fn byte_size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Metadata of the content actually read
    pub fn info(&self) -> FileInfo {
        FileInfo::new(self.name.clone(), self.mime_type.clone(), self.byte_size())
    }
}
