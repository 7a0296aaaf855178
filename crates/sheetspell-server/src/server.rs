//! tiny_http front end.
//!
//! `tiny_http::Server::recv` blocks, so the accept loop runs on a blocking
//! thread and each request is handled on its own blocking thread that drives
//! the async handler with the runtime handle.

use std::sync::Arc;

use tokio::runtime::Handle;

use crate::app::App;
use crate::error::ServerError;
use crate::http::{ApiRequest, ApiResponse, Method};

/// Bind `address` and serve requests until the listener fails
pub async fn serve(app: Arc<App>, address: &str) -> Result<(), ServerError> {
    let server = tiny_http::Server::http(address).map_err(|e| ServerError::Bind {
        address: address.to_string(),
        reason: e.to_string(),
    })?;
    tracing::info!("Listening on http://{address}");

    if let Err(e) = app.files().ensure_root() {
        tracing::warn!("Could not create upload folder: {e}");
    }

    let runtime = Handle::current();
    tokio::task::spawn_blocking(move || accept_loop(server, app, runtime)).await??;
    Ok(())
}

fn accept_loop(server: tiny_http::Server, app: Arc<App>, runtime: Handle) -> Result<(), ServerError> {
    loop {
        let request = server.recv()?;
        let app = Arc::clone(&app);
        let handle = runtime.clone();
        runtime.spawn_blocking(move || respond(request, &app, &handle));
    }
}

fn respond(mut request: tiny_http::Request, app: &App, runtime: &Handle) {
    let method = Method::parse(request.method().as_str());
    let target = request.url().to_string();

    let response = {
        let api_request = ApiRequest::new(method, &target, request.as_reader());
        runtime.block_on(app.handle(api_request))
    };

    if let Err(e) = request.respond(into_tiny(response)) {
        tracing::warn!("Could not send response for {target}: {e}");
    }
}

fn into_tiny(response: ApiResponse) -> tiny_http::Response<std::io::Cursor<Vec<u8>>> {
    let mut tiny = tiny_http::Response::from_data(response.body).with_status_code(response.status);
    if let Ok(header) = tiny_http::Header::from_bytes("Content-Type", response.content_type) {
        tiny = tiny.with_header(header);
    }
    if let Some(filename) = response.attachment {
        let value = format!("attachment; filename=\"{filename}\"");
        if let Ok(header) = tiny_http::Header::from_bytes("Content-Disposition", value) {
            tiny = tiny.with_header(header);
        }
    }
    tiny
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attachment_headers() {
        let response = into_tiny(ApiResponse::attachment("image/png", "screenshot.png", vec![1, 2]));
        assert_eq!(response.status_code().0, 200);
        let headers: Vec<String> = response
            .headers()
            .iter()
            .map(|h| format!("{}: {}", h.field, h.value))
            .collect();
        assert!(headers.contains(&"Content-Type: image/png".to_string()));
        assert!(headers.contains(&"Content-Disposition: attachment; filename=\"screenshot.png\"".to_string()));
    }
}
