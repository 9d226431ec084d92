use std::path::Path;

use tempfile::NamedTempFile;
use tokio::io::AsyncWriteExt;

use crate::form::UploadedFile;

const DEFAULT_SUFFIX: &str = ".mzML";

/// An upload written to disk for the engine. The file is removed when this
/// value is dropped, whichever way the request ends.
#[derive(Debug)]
pub struct TempUpload {
    file: NamedTempFile,
}

impl TempUpload {
    pub async fn materialize(upload: &UploadedFile) -> std::io::Result<Self> {
        let file = tempfile::Builder::new()
            .prefix("eic-")
            .suffix(&upload_suffix(upload.file_name.as_deref()))
            .tempfile()?;

        let mut handle = tokio::fs::File::from_std(file.reopen()?);
        handle.write_all(&upload.bytes).await?;
        handle.flush().await?;

        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

/// Engines pick a reader by extension, so keep the client's one.
fn upload_suffix(file_name: Option<&str>) -> String {
    file_name
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|ext| format!(".{ext}"))
        .unwrap_or_else(|| DEFAULT_SUFFIX.to_string())
}
