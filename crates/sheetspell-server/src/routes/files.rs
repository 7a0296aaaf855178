//! `/file-input` endpoints

use sheetspell_intake::{DeleteOutcome, FileLookup, UploadOutcome, ALL_FILES};

use super::{message, required, MessageResponse, RouteResult};
use crate::app::App;
use crate::error::ApiError;
use crate::http::{ApiRequest, ApiResponse};

fn parse_flag(value: &str) -> Result<bool, ApiError> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ApiError::invalid(format!(
            "confirmation_flag must be a boolean, got '{value}'"
        ))),
    }
}

impl App {
    pub(super) fn check_file(&self, request: &ApiRequest<'_>) -> RouteResult {
        let name = request.param("file_name").unwrap_or(ALL_FILES);
        let action = "get file(s)";

        if name == ALL_FILES {
            let all = self
                .files
                .list()
                .map_err(|e| ApiError::from_intake(action, e))?;
            return Ok(ApiResponse::ok(&MessageResponse {
                response_message: format!("Found {} files", all.len()),
                all_files: Some(all),
                deleted_files: None,
            }));
        }

        let lookup = self
            .files
            .lookup(name)
            .map_err(|e| ApiError::from_intake(action, e))?;
        match lookup {
            FileLookup::Present => message(format!("'{name}' is present")),
            FileLookup::DifferentCase(matches) => message(format!(
                "'{name}' is present but with different case: {}",
                matches.join(", ")
            )),
            FileLookup::Missing => message(format!("'{name}' is not present")),
        }
    }

    pub(super) fn upload(&self, request: &mut ApiRequest<'_>) -> RouteResult {
        let name = required(request, "file_name")?.to_string();
        let outcome = self
            .files
            .upload(&name, request.body)
            .map_err(|e| ApiError::from_intake("upload file", e))?;

        match outcome {
            UploadOutcome::Saved { .. } => message(format!("'{name}' uploaded successfully!")),
            UploadOutcome::Rejected { allowed } => message(format!(
                "Invalid file_type! Allowed file extensions are: '{}'",
                allowed.join(", ")
            )),
        }
    }

    pub(super) fn delete_file(&self, request: &ApiRequest<'_>) -> RouteResult {
        let confirmed = parse_flag(required(request, "confirmation_flag")?)?;
        let name = request.param("file_name").unwrap_or(ALL_FILES);

        let outcome = self
            .files
            .delete(name, confirmed)
            .map_err(|e| ApiError::from_intake("delete file(s)", e))?;

        match outcome {
            DeleteOutcome::NotConfirmed => {
                message("Did not delete any file as confirmation_flag was false")
            }
            DeleteOutcome::Deleted(deleted) if name == ALL_FILES => {
                Ok(ApiResponse::ok(&MessageResponse {
                    response_message: format!("{} files deleted", deleted.len()),
                    all_files: None,
                    deleted_files: Some(deleted),
                }))
            }
            DeleteOutcome::Deleted(_) => message(format!("'{name}' deleted successfully")),
            DeleteOutcome::Missing => {
                message(format!("Could not delete '{name}' as it is not present"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("True").unwrap());
        assert!(!parse_flag("false").unwrap());
        assert_eq!(parse_flag("maybe").unwrap_err().status, 422);
    }
}
