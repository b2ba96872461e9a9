use crate::utils::error::{Result, StockError};
use chrono_tz::Tz;
use std::net::SocketAddr;
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    parse_http_url(url_str).map(|_| ()).map_err(|reason| {
        StockError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason,
        }
    })
}

/// Parses an absolute `http`/`https` URL, returning the rejection reason otherwise.
pub fn parse_http_url(url_str: &str) -> std::result::Result<Url, String> {
    if url_str.trim().is_empty() {
        return Err("URL cannot be empty".to_string());
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(url),
            scheme => Err(format!("Unsupported URL scheme: {}", scheme)),
        },
        Err(e) => Err(format!("Invalid URL format: {}", e)),
    }
}

pub fn validate_socket_addr(field_name: &str, addr: &str) -> Result<SocketAddr> {
    addr.parse::<SocketAddr>()
        .map_err(|e| StockError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: addr.to_string(),
            reason: format!("Invalid socket address: {}", e),
        })
}

pub fn validate_timezone(field_name: &str, name: &str) -> Result<Tz> {
    name.parse::<Tz>()
        .map_err(|e| StockError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: name.to_string(),
            reason: format!("Unknown timezone: {}", e),
        })
}

pub fn validate_route_path(field_name: &str, path: &str) -> Result<()> {
    if !path.starts_with('/') || path.contains('?') || path.contains(char::is_whitespace) {
        return Err(StockError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path must start with '/' and contain no query or whitespace".to_string(),
        });
    }

    // The router reads these as captures or wildcards.
    let has_capture = path.contains(['{', '}'])
        || path
            .split('/')
            .any(|segment| segment.starts_with(':') || segment.starts_with('*'));
    if has_capture {
        return Err(StockError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path must be literal, without ':', '*' or '{}' segments".to_string(),
        });
    }
    Ok(())
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| StockError::MissingConfigError {
        field: field_name.to_string(),
    })
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(StockError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("stock_endpoint", "https://example.com").is_ok());
        assert!(validate_url("stock_endpoint", "http://example.com").is_ok());
        assert!(validate_url("stock_endpoint", "").is_err());
        assert!(validate_url("stock_endpoint", "invalid-url").is_err());
        assert!(validate_url("stock_endpoint", "ftp://example.com").is_err());
    }

    #[test]
    fn test_parse_http_url_reasons() {
        assert_eq!(parse_http_url("  ").unwrap_err(), "URL cannot be empty");
        assert!(parse_http_url("file:///etc/passwd")
            .unwrap_err()
            .starts_with("Unsupported URL scheme"));
        assert_eq!(
            parse_http_url("https://cdn.example.com/a.png").unwrap().host_str(),
            Some("cdn.example.com")
        );
    }

    #[test]
    fn test_validate_socket_addr() {
        assert!(validate_socket_addr("bind", "0.0.0.0:3000").is_ok());
        assert!(validate_socket_addr("bind", "localhost").is_err());
    }

    #[test]
    fn test_validate_timezone() {
        assert_eq!(
            validate_timezone("timezone", "America/New_York").unwrap(),
            chrono_tz::America::New_York
        );
        assert!(validate_timezone("timezone", "Mars/Olympus").is_err());
    }

    #[test]
    fn test_validate_route_path() {
        assert!(validate_route_path("proxy_path", "/api/image-proxy").is_ok());
        assert!(validate_route_path("proxy_path", "api/image-proxy").is_err());
        assert!(validate_route_path("proxy_path", "/api?x=1").is_err());
        assert!(validate_route_path("proxy_path", "/img/:id").is_err());
        assert!(validate_route_path("proxy_path", "/img/*rest").is_err());
        assert!(validate_route_path("proxy_path", "/img/{").is_err());
        assert!(validate_route_path("proxy_path", "/img/{id}").is_err());
        assert!(validate_route_path("proxy_path", "/img/proxy-v2").is_ok());
    }
}
