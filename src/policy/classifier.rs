//! Domain and scheme classification for navigation targets.
//!
//! Every predicate here is total: malformed input degrades to `false`/`None`
//! and nothing panics. Parse failures count as "not ours" (fail-closed).
//!
//! Owned-domain matching is exact-or-subdomain on a label boundary. A host that
//! merely contains the domain (`oliva.church.evil.com`, `evil-oliva.church`)
//! never matches.

use crate::policy::types::{SchemeKind, ShellConfig, UrlClassification};
use url::Url;

/// Prefixes every shell hands to the OS, regardless of configuration.
pub const BUILTIN_SPECIAL_SCHEMES: &[&str] = &["tel:", "mailto:", "sms:"];

/// Pure URL classifier bound to one owned domain.
#[derive(Debug, Clone)]
pub struct DomainClassifier {
    /// Lowercased, no trailing dot
    owned_domain: String,
    /// Built-in prefixes followed by configured vendor prefixes
    special_prefixes: Vec<String>,
}

impl DomainClassifier {
    /// Build a classifier for `owned_domain` with extra special-scheme prefixes.
    /// Prefixes without a trailing `:` get one, so `whatsapp` means `whatsapp:`.
    pub fn new<I, S>(owned_domain: &str, extra_schemes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut special_prefixes: Vec<String> = BUILTIN_SPECIAL_SCHEMES
            .iter()
            .map(|s| s.to_string())
            .collect();

        for scheme in extra_schemes {
            let prefix = normalize_scheme_prefix(scheme.as_ref());
            if prefix.len() > 1 && !special_prefixes.contains(&prefix) {
                special_prefixes.push(prefix);
            }
        }

        Self {
            owned_domain: owned_domain
                .trim()
                .trim_end_matches('.')
                .to_ascii_lowercase(),
            special_prefixes,
        }
    }

    pub fn from_config(config: &ShellConfig) -> Self {
        Self::new(&config.owned_domain, &config.special_schemes)
    }

    pub fn owned_domain(&self) -> &str {
        &self.owned_domain
    }

    pub fn special_prefixes(&self) -> &[String] {
        &self.special_prefixes
    }

    /// True iff `url` parses as http(s) and its host is the owned domain or a
    /// subdomain of it. `javascript://oliva.church/...` has the right host but
    /// is still not ours.
    pub fn is_owned_domain(&self, url: &str) -> bool {
        match Url::parse(url) {
            Ok(parsed) => self.parsed_is_owned(&parsed),
            Err(_) => false,
        }
    }

    fn parsed_is_owned(&self, parsed: &Url) -> bool {
        matches!(parsed.scheme(), "http" | "https")
            && parsed
                .host_str()
                .map(|host| self.host_is_owned(host))
                .unwrap_or(false)
    }

    /// The parsed host of `url`. `None` on parse failure or for host-less URLs
    /// such as `javascript:` or `mailto:`.
    pub fn hostname_of(&self, url: &str) -> Option<String> {
        hostname_of(url)
    }

    /// True iff the parsed scheme is `http` or `https`.
    pub fn is_standard_scheme(&self, url: &str) -> bool {
        is_standard_scheme(url)
    }

    /// True iff the parsed scheme is `https`.
    pub fn is_secure_scheme(&self, url: &str) -> bool {
        is_secure_scheme(url)
    }

    /// Literal prefix match of the raw string against the special allow-list.
    /// Deliberately not parsed: deep links are often not valid URLs.
    pub fn is_special_scheme(&self, url: &str) -> bool {
        self.special_prefix(url).is_some()
    }

    fn special_prefix(&self, url: &str) -> Option<&str> {
        self.special_prefixes
            .iter()
            .find(|prefix| url.starts_with(prefix.as_str()))
            .map(|s| s.as_str())
    }

    /// Full classification. A special prefix wins over the parsed scheme.
    pub fn classify(&self, url: &str) -> UrlClassification {
        let parsed = Url::parse(url).ok();

        let scheme = if let Some(prefix) = self.special_prefix(url) {
            SchemeKind::Special(prefix.to_string())
        } else {
            match parsed.as_ref().map(|u| u.scheme()) {
                Some("http") => SchemeKind::Http,
                Some("https") => SchemeKind::Https,
                Some(other) => SchemeKind::Other(other.to_string()),
                None => SchemeKind::Invalid,
            }
        };

        let hostname = parsed
            .as_ref()
            .and_then(|u| u.host_str())
            .map(|h| h.to_string());

        UrlClassification {
            owned_domain: parsed
                .as_ref()
                .map(|u| self.parsed_is_owned(u))
                .unwrap_or(false),
            hostname,
            scheme,
        }
    }

    fn host_is_owned(&self, host: &str) -> bool {
        if self.owned_domain.is_empty() {
            return false;
        }
        // `oliva.church.` is the fully-qualified spelling of the same host.
        let host = host.strip_suffix('.').unwrap_or(host).to_ascii_lowercase();
        if host == self.owned_domain {
            return true;
        }
        // Suffix match only on a label boundary, with a non-empty label in front.
        host.len() > self.owned_domain.len() + 1
            && host.ends_with(&self.owned_domain)
            && host.as_bytes()[host.len() - self.owned_domain.len() - 1] == b'.'
    }
}

/// The parsed host of `url`, if any.
pub fn hostname_of(url: &str) -> Option<String> {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.to_string()))
}

/// True iff `url` parses with an `http` or `https` scheme.
pub fn is_standard_scheme(url: &str) -> bool {
    Url::parse(url)
        .map(|u| matches!(u.scheme(), "http" | "https"))
        .unwrap_or(false)
}

/// True iff `url` parses with an `https` scheme.
pub fn is_secure_scheme(url: &str) -> bool {
    Url::parse(url)
        .map(|u| u.scheme() == "https")
        .unwrap_or(false)
}

/// `whatsapp` -> `whatsapp:`; already-suffixed prefixes are kept as-is.
pub fn normalize_scheme_prefix(scheme: &str) -> String {
    let trimmed = scheme.trim().to_ascii_lowercase();
    if trimmed.ends_with(':') {
        trimmed
    } else {
        format!("{}:", trimmed)
    }
}
