use tracing::warn;

use crate::config::PlannerConfig;
use crate::server::api::{self, ApiError};

pub struct HttpResponse {
    pub status_code: u16,
    pub status_text: &'static str,
    pub content_type: &'static str,
    pub body: String,
}

impl HttpResponse {
    pub fn to_http_string(&self) -> String {
        format!(
            "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            self.status_code,
            self.status_text,
            self.content_type,
            self.body.len(),
            self.body
        )
    }

    fn json(body: String) -> Self {
        Self {
            status_code: 200,
            status_text: "OK",
            content_type: "application/json",
            body,
        }
    }
}

pub fn route_request(method: &str, path: &str, body: &str, config: &PlannerConfig) -> HttpResponse {
    let path = path.split('?').next().unwrap_or(path);
    match (method, path) {
        ("GET", "/api/health") => match api::health_payload() {
            Ok(payload) => HttpResponse::json(payload),
            Err(err) => error_response(500, "Internal Server Error", "error", &err.to_string()),
        },
        ("POST", "/api/team-days") => api_response(api::team_days_payload(body, config)),
        ("POST", "/api/optimize") => api_response(api::optimize_payload(body, config)),
        ("POST", "/api/simulate") => api_response(api::simulate_payload(body, config)),
        ("POST", "/api/scan") => api_response(api::scan_payload(body, config)),
        _ => error_response(404, "Not Found", "error", "Route not found"),
    }
}

fn api_response(result: Result<String, ApiError>) -> HttpResponse {
    match result {
        Ok(payload) => HttpResponse::json(payload),
        Err(ApiError::Plan(err)) if err.is_warning() => {
            warn!(error = %err, "request produced a warning");
            error_response(422, "Unprocessable Entity", "warning", &err.to_string())
        }
        Err(err) => error_response(400, "Bad Request", "error", &err.to_string()),
    }
}

pub(crate) fn error_response(
    status_code: u16,
    status_text: &'static str,
    status: &str,
    message: &str,
) -> HttpResponse {
    HttpResponse {
        status_code,
        status_text,
        content_type: "application/json",
        body: format!(
            "{{\n  \"status\": \"{status}\",\n  \"message\": {}\n}}",
            serde_json::to_string(message).unwrap_or_else(|_| "\"Unknown error\"".to_string())
        ),
    }
}
