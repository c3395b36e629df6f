//! URL validation and scheme normalization.
//!
//! A candidate URL is accepted when it parses as an absolute `http`/`https`
//! URL, or as a bare `host/path` reference that becomes one once a scheme is
//! added. Accepted URLs always leave here on `https`. URLs pointing back at
//! the service's own public domain are rejected so a short link can never
//! expand into another short link on the same service.

use crate::error::AppError;
use regex::Regex;
use std::sync::LazyLock;
use url::{Host, Url};

static SCHEME_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9+.-]*://").expect("scheme pattern is valid")
});

/// Validates and normalizes URLs submitted for shortening.
#[derive(Debug, Clone)]
pub struct UrlValidator {
    own_host: String,
}

impl UrlValidator {
    /// Creates a validator that rejects URLs pointing at `public_domain`.
    ///
    /// `public_domain` may be given with or without scheme, port, path or a
    /// leading `www.` (`localhost:3000`, `https://sho.rt/` and `sho.rt` are
    /// all accepted).
    pub fn new(public_domain: &str) -> Self {
        Self {
            own_host: canonical_host(public_domain),
        }
    }

    /// Validates `raw` and returns it with the scheme upgraded to `https`.
    ///
    /// Input without a leading `scheme://` is treated as `host/path` and gets
    /// `https://` prepended; it may not carry credentials. The result is the
    /// serialized [`Url`], so a bare host gains a root path
    /// (`https://example.com` becomes `https://example.com/`).
    ///
    /// # Errors
    ///
    /// - [`AppError::InvalidUrl`] if the input is not a well-formed web URL
    /// - [`AppError::DomainRejected`] if its host is the service's own domain
    pub fn validate(&self, raw: &str) -> Result<String, AppError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(AppError::InvalidUrl("URL is empty".to_string()));
        }

        let has_scheme = SCHEME_PREFIX.is_match(trimmed);
        let candidate = if has_scheme {
            trimmed.to_string()
        } else {
            format!("https://{trimmed}")
        };

        let mut url = Url::parse(&candidate).map_err(|e| AppError::InvalidUrl(e.to_string()))?;

        if !has_scheme && (!url.username().is_empty() || url.password().is_some()) {
            return Err(AppError::InvalidUrl(
                "URL without scheme must not contain credentials".to_string(),
            ));
        }

        match url.scheme() {
            "http" | "https" => {}
            other => {
                return Err(AppError::InvalidUrl(format!(
                    "unsupported scheme '{other}'"
                )));
            }
        }

        let host = match url.host() {
            Some(Host::Domain(domain)) => {
                if !is_plausible_domain(domain) {
                    return Err(AppError::InvalidUrl(format!("invalid host '{domain}'")));
                }
                domain.to_ascii_lowercase()
            }
            Some(Host::Ipv4(ip)) => ip.to_string(),
            Some(Host::Ipv6(ip)) => format!("[{ip}]"),
            None => return Err(AppError::InvalidUrl("URL has no host".to_string())),
        };

        if strip_www(&host) == self.own_host {
            return Err(AppError::DomainRejected);
        }

        if url.scheme() == "http" {
            url.set_scheme("https")
                .map_err(|_| AppError::InvalidUrl("cannot upgrade scheme".to_string()))?;
        }

        Ok(url.to_string())
    }
}

/// Reduces a configured domain to a bare lowercase host.
fn canonical_host(domain: &str) -> String {
    let lower = domain.trim().to_ascii_lowercase();
    let without_scheme = lower
        .split_once("://")
        .map_or(lower.as_str(), |(_, rest)| rest);
    let authority = without_scheme.split('/').next().unwrap_or_default();

    let host = if authority.starts_with('[') {
        authority
            .find(']')
            .map_or(authority, |end| &authority[..=end])
    } else {
        authority.split(':').next().unwrap_or(authority)
    };

    strip_www(host).to_string()
}

fn strip_www(host: &str) -> &str {
    host.strip_prefix("www.").unwrap_or(host)
}

/// Accepts dotted names and `localhost`; rejects empty labels.
fn is_plausible_domain(domain: &str) -> bool {
    if domain.eq_ignore_ascii_case("localhost") {
        return true;
    }

    let trimmed = domain.strip_suffix('.').unwrap_or(domain);
    trimmed.contains('.') && trimmed.split('.').all(|label| !label.is_empty())
}
