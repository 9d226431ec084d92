use axum::body::Bytes;
use axum::extract::Multipart;
use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use params::RawForm;
use tracing::debug;

use crate::error::ApiError;

/// The uploaded raw file, held in memory until the form validates.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: Option<String>,
    pub bytes: Bytes,
}

#[derive(Debug)]
pub struct EicForm {
    pub fields: RawForm,
    pub file: UploadedFile,
}

fn invalid_body(err: MultipartError) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge(format!("Upload too large: {}", err.body_text()))
    } else {
        ApiError::Validation(format!("Invalid multipart body: {}", err.body_text()))
    }
}

/// Decode the multipart body. Only presence of `file` is checked here; the
/// text fields are validated by [`params::ExtractionRequest::from_form`].
pub async fn read_eic_form(mut multipart: Multipart) -> Result<EicForm, ApiError> {
    let mut fields = RawForm::default();
    let mut file = None;

    while let Some(field) = multipart.next_field().await.map_err(invalid_body)? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        if name == "file" {
            let file_name = field.file_name().map(str::to_string);
            let bytes = field.bytes().await.map_err(invalid_body)?;
            file = Some(UploadedFile { file_name, bytes });
        } else {
            let value = field.text().await.map_err(invalid_body)?;
            if !fields.set(&name, value) {
                debug!(field = %name, "Ignoring unknown form field");
            }
        }
    }

    let file = file.ok_or_else(|| ApiError::Validation("file is required.".to_string()))?;
    Ok(EicForm { fields, file })
}
