//! Failure type shared by the outbound API clients.

use reqwest::Response;

#[derive(Debug)]
pub enum UpstreamError {
    Http {
        service: &'static str,
        source: reqwest::Error,
    },
    Status {
        service: &'static str,
        status: u16,
        body: String,
    },
    /// The API answered 2xx but reported a failure in its payload
    Api {
        service: &'static str,
        message: String,
    },
    Decode {
        service: &'static str,
        message: String,
    },
    NotConfigured {
        service: &'static str,
        setting: &'static str,
    },
    PageLimit {
        service: &'static str,
        pages: u32,
    },
    InvalidUrl {
        service: &'static str,
        message: String,
    },
}

impl UpstreamError {
    pub fn http(service: &'static str) -> impl FnOnce(reqwest::Error) -> Self {
        move |source| UpstreamError::Http { service, source }
    }

    pub fn decode(service: &'static str, message: impl Into<String>) -> Self {
        UpstreamError::Decode {
            service,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for UpstreamError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UpstreamError::Http { service, source } => {
                write!(f, "{} request failed: {}", service, source)
            }
            UpstreamError::Status {
                service,
                status,
                body,
            } => write!(f, "{} API error {}: {}", service, status, body),
            UpstreamError::Api { service, message } => {
                write!(f, "{} API error: {}", service, message)
            }
            UpstreamError::Decode { service, message } => {
                write!(f, "{} returned an unexpected payload: {}", service, message)
            }
            UpstreamError::NotConfigured { service, setting } => {
                write!(f, "{} API is not configured ({} missing)", service, setting)
            }
            UpstreamError::PageLimit { service, pages } => {
                write!(f, "{} pagination did not finish after {} pages", service, pages)
            }
            UpstreamError::InvalidUrl { service, message } => {
                write!(f, "{} request URL is invalid: {}", service, message)
            }
        }
    }
}

impl std::error::Error for UpstreamError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            UpstreamError::Http { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Pass 2xx responses through; turn anything else into `UpstreamError::Status`
/// carrying the response body.
pub async fn ensure_success(
    service: &'static str,
    response: Response,
) -> Result<Response, UpstreamError> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    Err(UpstreamError::Status {
        service,
        status,
        body,
    })
}
