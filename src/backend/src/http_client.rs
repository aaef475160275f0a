use actix_web::HttpResponse;
use anyhow::{Context, Result, ensure};
use log::error;
use rameplayer_admin_core::SettingsDraft;
use reqwest::{Client, Response};
use serde::Serialize;
use std::time::Duration;

/// Create the HTTP client used to talk to the device REST API
///
/// # Examples
/// ```no_run
/// use rameplayer_admin::http_client::rest_client;
/// use std::time::Duration;
///
/// let client = rest_client(Duration::from_secs(30))
///     .expect("failed to create client");
/// ```
pub fn rest_client(timeout: Duration) -> Result<Client> {
    ensure!(!timeout.is_zero(), "failed to create REST client: zero timeout");

    Client::builder()
        .timeout(timeout)
        .build()
        .context("failed to create REST HTTP client")
}

/// Trait for converting service results into HTTP responses
pub trait ServiceResultResponse {
    fn into_response(self) -> HttpResponse;
}

impl ServiceResultResponse for () {
    fn into_response(self) -> HttpResponse {
        HttpResponse::Ok().finish()
    }
}

impl ServiceResultResponse for SettingsDraft {
    fn into_response(self) -> HttpResponse {
        json_response(&self)
    }
}

fn json_response(value: &impl Serialize) -> HttpResponse {
    match serde_json::to_string(value) {
        Ok(json) => HttpResponse::Ok()
            .content_type("application/json")
            .body(json),
        Err(e) => {
            error!("failed to serialize response: {e:#}");
            HttpResponse::InternalServerError().body("failed to serialize response")
        }
    }
}

/// Convert a service result into an HTTP response
///
/// Errors are logged with their full context chain and answered with
/// `500 Internal Server Error`.
pub fn handle_service_result<T>(result: Result<T>, operation: &str) -> HttpResponse
where
    T: ServiceResultResponse,
{
    match result {
        Ok(data) => data.into_response(),
        Err(e) => {
            error!("{operation} failed: {e:#}");
            HttpResponse::InternalServerError().body(e.to_string())
        }
    }
}

/// Handle HTTP response by checking status and extracting body
///
/// # Returns
/// * `Ok(String)` - The response body if the status is successful
/// * `Err` - If the status is not successful or reading the body fails
pub async fn handle_http_response(res: Response, context_msg: &str) -> Result<String> {
    let status = res.status();
    let body = res.text().await.context("failed to read response body")?;

    ensure!(
        status.is_success(),
        "{context_msg} failed with status {status} and body: {body}"
    );

    Ok(body)
}
