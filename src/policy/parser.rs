//! YAML shell config parser for navguard.
//!
//! Parses a small YAML file into a validated `ShellConfig`.
//!
//! # Example config file:
//! ```yaml
//! shell: oliva-church
//! site_url: https://oliva.church/
//! owned_domain: oliva.church
//! special_schemes: [whatsapp, market, intent]
//! handoff_triggers: click
//! user_agent: OlivaChurchApp/1.0
//! ```

use crate::policy::classifier::normalize_scheme_prefix;
use crate::policy::types::*;
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::Path;
use url::Url;

/// Raw YAML representation before validation.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    #[serde(default)]
    shell: Option<String>,
    site_url: String,
    #[serde(default)]
    owned_domain: Option<String>,
    #[serde(default)]
    special_schemes: Option<StringOrVec>,
    #[serde(default)]
    handoff_triggers: Option<StringOrVec>,
    #[serde(default)]
    user_agent: Option<String>,
}

/// Allows YAML fields to be either a single string or a list of strings.
/// ```yaml
/// special_schemes: whatsapp            # single string — works
/// special_schemes: [whatsapp, market]  # list — also works
/// ```
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StringOrVec {
    Single(String),
    Multiple(Vec<String>),
}

impl StringOrVec {
    fn into_vec(self) -> Vec<String> {
        match self {
            StringOrVec::Single(s) => vec![s],
            StringOrVec::Multiple(v) => v,
        }
    }
}

/// Parse a YAML config file from a file path.
pub fn parse_config_file(path: impl AsRef<Path>) -> Result<ShellConfig> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    parse_config_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Parse a YAML config string into a validated `ShellConfig`.
pub fn parse_config_str(yaml: &str) -> Result<ShellConfig> {
    let raw: RawConfig = serde_yaml::from_str(yaml).context("Invalid YAML syntax in config file")?;

    let site_url = Url::parse(raw.site_url.trim())
        .with_context(|| format!("site_url '{}' is not an absolute URL", raw.site_url))?;
    if !matches!(site_url.scheme(), "http" | "https") {
        bail!(
            "site_url must use http or https, got '{}:'",
            site_url.scheme()
        );
    }
    let site_host = site_url
        .host_str()
        .map(|h| h.to_string())
        .context("site_url must include a host")?;

    // The owned domain defaults to the site's own host.
    let owned_domain = match raw.owned_domain {
        Some(domain) => validate_domain(&domain)?,
        None => site_host.to_ascii_lowercase(),
    };

    let special_schemes = raw
        .special_schemes
        .map(|s| s.into_vec())
        .unwrap_or_default()
        .iter()
        .enumerate()
        .map(|(i, s)| validate_scheme(s).with_context(|| format!("Invalid special_schemes entry {}", i)))
        .collect::<Result<Vec<_>>>()?;

    let handoff_triggers = match raw.handoff_triggers {
        Some(triggers) => triggers
            .into_vec()
            .iter()
            .map(|t| {
                TriggerKind::from_str_loose(t)
                    .ok_or_else(|| anyhow::anyhow!("Unknown trigger '{}' in handoff_triggers", t))
            })
            .collect::<Result<Vec<_>>>()?,
        None => vec![TriggerKind::Click],
    };

    let shell = raw
        .shell
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| owned_domain.clone());

    Ok(ShellConfig {
        shell,
        site_url,
        owned_domain,
        special_schemes,
        handoff_triggers,
        user_agent: raw.user_agent,
    })
}

/// The owned domain must be a bare hostname: no scheme, path, port or wildcard.
fn validate_domain(domain: &str) -> Result<String> {
    let domain = domain.trim().trim_end_matches('.').to_ascii_lowercase();
    if domain.is_empty() {
        bail!("owned_domain must not be empty");
    }
    if domain.contains("://") {
        bail!(
            "owned_domain '{}' looks like a URL — use the bare hostname (e.g. 'oliva.church')",
            domain
        );
    }
    if let Some(bad) = domain.chars().find(|c| matches!(c, '/' | ':' | '*' | '@' | '?' | '#' | ' ')) {
        bail!("owned_domain '{}' contains '{}' — use the bare hostname", domain, bad);
    }
    if domain.starts_with('.') {
        bail!(
            "owned_domain '{}' must not start with '.' — subdomains are always included",
            domain
        );
    }
    Ok(domain)
}

/// Special schemes are `name` or `name:`, with RFC 3986 scheme characters.
fn validate_scheme(scheme: &str) -> Result<String> {
    let prefix = normalize_scheme_prefix(scheme);
    let name = prefix.trim_end_matches(':');
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        _ => bail!("'{}' is not a valid scheme name", scheme),
    }
    if !chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')) {
        bail!("'{}' is not a valid scheme name", scheme);
    }
    if matches!(name, "http" | "https") {
        bail!("'{}' is a web scheme — web links are routed by domain, not by scheme", scheme);
    }
    Ok(prefix)
}
