//! Built-in shell config templates that ship with navguard.
//!
//! - `oliva`: the production Oliva Church shell, with the chat and store deep links
//! - `minimal`: just a site and its domain, for wrapping something new

/// The Oliva Church app shell.
pub const OLIVA_YAML: &str = r#"# navguard shell: oliva-church
# Keeps oliva.church (and every *.oliva.church) inside the app,
# sends everything else to the phone's browser or the right app.

shell: oliva-church

site_url: https://oliva.church/
owned_domain: oliva.church

# tel:, mailto: and sms: are always handed to the OS.
# These are the extra deep links the site uses.
special_schemes:
  - whatsapp   # "talk to us" buttons
  - market     # Play Store links to the app itself
  - intent     # Android app intents

# Only user clicks leave the app; redirects during page load stay put.
handoff_triggers: [click]

user_agent: OlivaChurchApp/1.0
"#;

/// Bare-bones template. `init` fills in the placeholders.
pub const MINIMAL_YAML: &str = r#"# navguard shell: {shell}

shell: {shell}

site_url: {site_url}
owned_domain: {domain}

handoff_triggers: [click]
"#;

/// Get a template by name.
pub fn get_template(name: &str) -> Option<&'static str> {
    match name.to_lowercase().as_str() {
        "oliva" | "oliva-church" | "default" => Some(OLIVA_YAML),
        "minimal" | "bare" => Some(MINIMAL_YAML),
        _ => None,
    }
}

/// List all available template names.
pub fn list_templates() -> Vec<(&'static str, &'static str)> {
    vec![
        ("oliva", "The Oliva Church shell — whatsapp, market and intent deep links"),
        ("minimal", "Just a site URL and its domain"),
    ]
}

/// Fill the minimal template for a domain and site URL.
pub fn render_minimal(domain: &str, site_url: &str) -> String {
    let shell = domain.replace('.', "-");
    MINIMAL_YAML
        .replace("{shell}", &shell)
        .replace("{site_url}", site_url)
        .replace("{domain}", domain)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::parser::parse_config_str;

    #[test]
    fn test_oliva_template_parses() {
        let config = parse_config_str(OLIVA_YAML).unwrap();
        assert_eq!(config.shell, "oliva-church");
        assert_eq!(config.owned_domain, "oliva.church");
        assert_eq!(config.special_schemes.len(), 3);
    }

    #[test]
    fn test_rendered_minimal_parses() {
        let yaml = render_minimal("example.org", "https://www.example.org/");
        let config = parse_config_str(&yaml).unwrap();
        assert_eq!(config.shell, "example-org");
        assert_eq!(config.owned_domain, "example.org");
    }

    #[test]
    fn test_template_lookup() {
        assert!(get_template("oliva").is_some());
        assert!(get_template("MINIMAL").is_some());
        assert!(get_template("nope").is_none());
    }
}
