//! Request routing

mod browser;
mod files;
mod spell_check;

use serde::Serialize;

use crate::app::App;
use crate::error::ApiError;
use crate::http::{ApiRequest, ApiResponse, Method};

type RouteResult = Result<ApiResponse, ApiError>;

#[derive(Debug, Serialize)]
struct RootResponse<'a> {
    title: &'a str,
    version: &'a str,
    description: &'a str,
}

/// Body of the browser and file-input endpoints
#[derive(Debug, Serialize)]
pub(crate) struct MessageResponse {
    pub response_message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub all_files: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_files: Option<Vec<String>>,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            response_message: message.into(),
            all_files: None,
            deleted_files: None,
        }
    }
}

fn message(text: impl Into<String>) -> RouteResult {
    Ok(ApiResponse::ok(&MessageResponse::new(text)))
}

impl App {
    /// Answer one request. Errors become `{"detail": ...}` responses.
    pub async fn handle(&self, mut request: ApiRequest<'_>) -> ApiResponse {
        let method = request.method.clone();
        let path = request.path.clone();

        let response = match self.route(&mut request).await {
            Ok(response) => response,
            Err(err) => err.into_response(),
        };
        tracing::info!(%method, %path, status = response.status, "Handled request");
        response
    }

    async fn route(&self, request: &mut ApiRequest<'_>) -> RouteResult {
        let segments = request.segments();
        let segments: Vec<&str> = segments.iter().map(String::as_str).collect();
        let method = request.method.clone();

        match (&method, segments.as_slice()) {
            (Method::Get, []) => Ok(self.root()),

            (Method::Get, ["browser", "open-url"]) => self.open_url(request).await,
            (Method::Get, ["browser", "google-login"]) => self.google_login().await,
            (Method::Get, ["browser", "screenshot"]) => self.screenshot().await,
            (Method::Get, ["browser", "kill", target]) => self.kill(target).await,

            (Method::Get, ["file-input"]) => self.check_file(request),
            (Method::Post, ["file-input", "upload"]) => self.upload(request),
            (Method::Delete, ["file-input"]) => self.delete_file(request),

            (Method::Get, ["spell-check", "words", word]) => self.check_word(word).await,
            (Method::Get, ["spell-check", "words"]) => self.check_word_list(request).await,
            (Method::Get, ["spell-check", "file"]) => self.check_input_file(request).await,

            (_, path) if is_known(path) => Err(ApiError::method_not_allowed()),
            _ => Err(ApiError::not_found()),
        }
    }

    fn root(&self) -> ApiResponse {
        let server = &self.config.server;
        ApiResponse::ok(&RootResponse {
            title: &server.title,
            version: &server.version,
            description: &server.description,
        })
    }
}

fn is_known(path: &[&str]) -> bool {
    matches!(
        path,
        []
            | ["browser", "open-url" | "google-login" | "screenshot"]
            | ["browser", "kill", _]
            | ["file-input"]
            | ["file-input", "upload"]
            | ["spell-check", "words"]
            | ["spell-check", "words", _]
            | ["spell-check", "file"]
    )
}

/// A required query parameter
fn required<'r>(request: &'r ApiRequest<'_>, name: &str) -> Result<&'r str, ApiError> {
    request
        .param(name)
        .ok_or_else(|| ApiError::invalid(format!("Missing required query parameter '{name}'")))
}
