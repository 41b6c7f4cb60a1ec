//! Validation of user-supplied audit targets.
//!
//! The scoring service fetches whatever URL it is given, so local and
//! private-network addresses are refused before any request is made.

use std::net::{Ipv4Addr, Ipv6Addr};
use thiserror::Error;
use url::{Host, Url};

/// Why an audit URL was refused. The messages are shown to users as-is.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UrlValidationError {
    #[error("Please enter a URL")]
    Empty,

    #[error("Please enter a valid URL")]
    Unparseable,

    #[error("Please enter a full domain (e.g. yoursite.com)")]
    IncompleteDomain,

    #[error("Cannot audit local or private network URLs")]
    PrivateNetwork,
}

/// Validate and normalize an audit target.
///
/// A missing scheme defaults to `https://`. The private-network check runs
/// before the domain check so bracketed IPv6 literals are refused by the
/// right rule.
///
/// ```
/// use perfally::utils::{validate_audit_url, UrlValidationError};
///
/// assert_eq!(validate_audit_url("example.com/").unwrap(), "https://example.com");
/// assert_eq!(
///     validate_audit_url("http://[::1]"),
///     Err(UrlValidationError::PrivateNetwork)
/// );
/// ```
pub fn validate_audit_url(input: &str) -> Result<String, UrlValidationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(UrlValidationError::Empty);
    }

    let lower = trimmed.to_ascii_lowercase();
    let candidate = if lower.starts_with("http://") || lower.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    };

    let parsed = Url::parse(&candidate).map_err(|_| UrlValidationError::Unparseable)?;
    let host = parsed.host().ok_or(UrlValidationError::IncompleteDomain)?;

    match host {
        Host::Domain(domain) => {
            let domain = domain.trim_end_matches('.');
            if domain == "localhost" || domain.ends_with(".localhost") {
                return Err(UrlValidationError::PrivateNetwork);
            }
            if !domain.contains('.') {
                return Err(UrlValidationError::IncompleteDomain);
            }
        }
        Host::Ipv4(addr) => {
            if is_private_v4(addr) {
                return Err(UrlValidationError::PrivateNetwork);
            }
        }
        Host::Ipv6(addr) => {
            if is_private_v6(addr) {
                return Err(UrlValidationError::PrivateNetwork);
            }
        }
    }

    Ok(normalize(&parsed))
}

/// Serialized form, without the trailing slash of a bare root path.
fn normalize(url: &Url) -> String {
    let serialized = url.as_str();
    if url.path() == "/" && url.query().is_none() && url.fragment().is_none() {
        serialized.trim_end_matches('/').to_string()
    } else {
        serialized.to_string()
    }
}

fn is_private_v4(addr: Ipv4Addr) -> bool {
    let [a, b, ..] = addr.octets();
    addr.is_loopback()
        || addr.is_unspecified()
        || addr.is_private()
        || addr.is_link_local()
        // 100.64.0.0/10 carrier-grade NAT
        || (a == 100 && (64..=127).contains(&b))
}

fn is_private_v6(addr: Ipv6Addr) -> bool {
    if let Some(v4) = addr.to_ipv4_mapped() {
        return is_private_v4(v4);
    }
    let first = addr.segments()[0];
    addr.is_loopback()
        || addr.is_unspecified()
        // fc00::/7 unique local
        || (first & 0xfe00) == 0xfc00
        // fe80::/10 link local
        || (first & 0xffc0) == 0xfe80
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_and_normalizes() {
        assert_eq!(validate_audit_url("https://example.com").unwrap(), "https://example.com");
        assert_eq!(validate_audit_url("http://example.com").unwrap(), "http://example.com");
        assert_eq!(validate_audit_url("example.com").unwrap(), "https://example.com");
        assert_eq!(validate_audit_url("https://example.com/").unwrap(), "https://example.com");
        assert_eq!(validate_audit_url("  example.com  ").unwrap(), "https://example.com");
        assert_eq!(
            validate_audit_url("https://example.com/pricing?plan=pro").unwrap(),
            "https://example.com/pricing?plan=pro"
        );
        assert_eq!(validate_audit_url("HTTPS://Example.COM").unwrap(), "https://example.com");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(validate_audit_url(""), Err(UrlValidationError::Empty));
        assert_eq!(validate_audit_url("   "), Err(UrlValidationError::Empty));
    }

    #[test]
    fn test_incomplete_domain() {
        assert_eq!(validate_audit_url("notaurl"), Err(UrlValidationError::IncompleteDomain));
        // The https:// prefix turns "ftp" into the host
        assert_eq!(
            validate_audit_url("ftp://example.com"),
            Err(UrlValidationError::IncompleteDomain)
        );
    }

    #[test]
    fn test_private_hosts_refused() {
        for url in [
            "http://localhost",
            "http://localhost:3000/admin",
            "http://app.localhost",
            "http://127.0.0.1",
            "http://0.0.0.0",
            "http://192.168.1.1",
            "http://10.0.0.1",
            "http://172.16.0.1",
            "http://172.31.255.255",
            "http://169.254.169.254",
            "http://100.64.0.1",
            "http://100.127.255.255",
            "http://[::1]",
            "http://[::]",
            "http://[fd12:3456::1]",
            "http://[fe80::1]",
            "http://[::ffff:10.0.0.1]",
        ] {
            assert_eq!(
                validate_audit_url(url),
                Err(UrlValidationError::PrivateNetwork),
                "{url} should be refused"
            );
        }
    }

    #[test]
    fn test_cgnat_boundaries() {
        assert!(validate_audit_url("http://100.63.0.1").is_ok());
        assert!(validate_audit_url("http://100.128.0.1").is_ok());
        assert!(validate_audit_url("http://172.32.0.1").is_ok());
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            UrlValidationError::PrivateNetwork.to_string(),
            "Cannot audit local or private network URLs"
        );
        assert_eq!(
            UrlValidationError::IncompleteDomain.to_string(),
            "Please enter a full domain (e.g. yoursite.com)"
        );
    }
}
