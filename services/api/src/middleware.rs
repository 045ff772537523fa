//! Request logging, search rate limiting and dev-logs authorization

use std::net::{IpAddr, SocketAddr};

use axum::{
    extract::{ConnectInfo, Request, State},
    http::header::{AUTHORIZATION, USER_AGENT},
    middleware::Next,
    response::Response,
};
use tracing::info;

use crate::{error::ApiError, state::AppState};

/// Client address as seen by the listener, if the server recorded one
fn client_ip(req: &Request) -> Option<IpAddr> {
    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip())
}

/// IPv4 addresses keep their first two octets; other addresses are logged as-is
pub fn anonymize_ip(ip: IpAddr) -> String {
    match ip {
        IpAddr::V4(v4) => {
            let [a, b, _, _] = v4.octets();
            format!("{}.{}.*.*", a, b)
        }
        IpAddr::V6(v6) => v6.to_string(),
    }
}

/// Coarse platform name guessed from a `User-Agent` header
pub fn detect_platform(user_agent: &str) -> &'static str {
    // Android agents also mention Linux, so order matters
    const PLATFORMS: [(&str, &str); 5] = [
        ("Android", "Android"),
        ("iPhone", "iOS"),
        ("Windows", "Windows"),
        ("Mac", "macOS"),
        ("Linux", "Linux"),
    ];

    PLATFORMS
        .iter()
        .find(|(marker, _)| user_agent.contains(marker))
        .map(|(_, platform)| *platform)
        .unwrap_or("Unknown")
}

/// Log method, path, query, anonymized client and platform of each request
pub async fn log_request(req: Request, next: Next) -> Response {
    let ip = client_ip(&req)
        .map(anonymize_ip)
        .unwrap_or_else(|| "unknown".to_string());
    let query = req.uri().query().unwrap_or_default();
    let user_agent = req
        .headers()
        .get(USER_AGENT)
        .and_then(|value| value.to_str().ok());

    match user_agent {
        Some(agent) => info!(
            "[Request] {} {}?{} from {} using {}",
            req.method(),
            req.uri().path(),
            query,
            ip,
            detect_platform(agent)
        ),
        None => info!(
            "[Request] {} {}?{} from {}",
            req.method(),
            req.uri().path(),
            query,
            ip
        ),
    }

    next.run(req).await
}

/// Reject searches once a client address exceeds its budget
pub async fn limit_searches(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let key = client_ip(&req)
        .map(|ip| ip.to_string())
        .unwrap_or_else(|| "unknown".to_string());

    if !state.search_limiter.is_allowed(&key).await {
        let config = state.search_limiter.config();
        return Err(ApiError::TooManyRequests(format!(
            "Rate limit exceeded: {} per {} seconds",
            config.max_requests,
            config.window.as_secs()
        )));
    }

    Ok(next.run(req).await)
}

/// Require the configured token in the `Authorization` header
///
/// Every request is rejected when no token is configured.
pub async fn require_dev_token(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let expected = state
        .config
        .dev_logs_token
        .as_deref()
        .ok_or(ApiError::Unauthorized)?;

    let provided = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .ok_or(ApiError::Unauthorized)?;

    if provided != expected {
        return Err(ApiError::Unauthorized);
    }

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{Ipv4Addr, Ipv6Addr};

    #[test]
    fn test_anonymize_ipv4() {
        let ip = IpAddr::V4(Ipv4Addr::new(192, 168, 12, 34));
        assert_eq!(anonymize_ip(ip), "192.168.*.*");
    }

    #[test]
    fn test_ipv6_is_unchanged() {
        let ip = IpAddr::V6(Ipv6Addr::LOCALHOST);
        assert_eq!(anonymize_ip(ip), "::1");
    }

    #[test]
    fn test_platform_detection() {
        assert_eq!(
            detect_platform("Mozilla/5.0 (Linux; Android 14; Pixel 8)"),
            "Android"
        );
        assert_eq!(
            detect_platform("Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X)"),
            "iOS"
        );
        assert_eq!(
            detect_platform("Mozilla/5.0 (Windows NT 10.0; Win64; x64)"),
            "Windows"
        );
        assert_eq!(
            detect_platform("Mozilla/5.0 (Macintosh; Intel Mac OS X 14_0)"),
            "macOS"
        );
        assert_eq!(detect_platform("Mozilla/5.0 (X11; Linux x86_64)"), "Linux");
        assert_eq!(detect_platform("curl/8.4.0"), "Unknown");
    }
}
