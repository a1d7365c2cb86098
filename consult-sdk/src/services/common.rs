//! Common utilities for service clients
//!
//! This module provides shared HTTP handling for all remote calls.

use reqwest::{Response, StatusCode};
use serde_json::Value;

use crate::error::{ErrorContext, Result, ServiceError};

/// Create error context for HTTP requests
pub fn create_error_context(
    service_name: &str,
    endpoint: &str,
    status: Option<StatusCode>,
) -> ErrorContext {
    let mut context = ErrorContext::for_service(service_name).endpoint(endpoint);

    if let Some(status_code) = status {
        context = context.status_code(status_code.as_u16());
    }

    context
}

/// Parse error response from HTTP response
pub async fn parse_error_response(
    service_name: &str,
    response: Response,
) -> ServiceError {
    let status = response.status();
    let endpoint = response.url().to_string();
    let mut context = create_error_context(service_name, &endpoint, Some(status));

    let body = match response.text().await {
        Ok(body) => body,
        Err(e) => format!("Failed to read error response: {}", e),
    };

    crate::error::mapping::map_http_error(status, &body, &mut context)
        .with_context(context)
}

/// Accept a response only when it is 2xx with a JSON body
pub async fn read_json_success(service_name: &str, response: Response) -> Result<Value> {
    if !response.status().is_success() {
        return Err(parse_error_response(service_name, response).await);
    }

    let endpoint = response.url().to_string();
    let body = response.text().await?;
    serde_json::from_str::<Value>(&body).map_err(|e| {
        ServiceError::invalid_response(format!("Unparseable body from {}: {}", service_name, e))
            .with_context(create_error_context(service_name, &endpoint, None))
    })
}
