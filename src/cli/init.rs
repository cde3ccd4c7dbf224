//! `navguard init` — generate a starter shell config.
//!
//! Writes a `.navguard.yaml` in the current directory, either from the
//! built-in Oliva template or from the minimal template filled in for the
//! given domain and site URL.

use crate::policy::{defaults, parser};
use crate::utils::paths::CONFIG_FILE_NAME;
use anyhow::{bail, Context, Result};
use colored::Colorize;
use std::path::PathBuf;

/// Options for `navguard init`.
#[derive(Debug, Default)]
pub struct InitOptions {
    pub template: Option<String>,
    pub domain: Option<String>,
    pub site_url: Option<String>,
    pub output: Option<PathBuf>,
    pub force: bool,
}

/// Run the `navguard init` command. Returns the path written.
pub fn run_init(options: InitOptions) -> Result<PathBuf> {
    let output_file = match options.output {
        Some(path) => path,
        None => std::env::current_dir()
            .context("Failed to get current directory")?
            .join(CONFIG_FILE_NAME),
    };

    if output_file.exists() && !options.force {
        bail!(
            "A config file already exists at {}. Use --force to overwrite it, or edit it directly.",
            output_file.display()
        );
    }

    let (template_name, yaml_content) = match (options.domain.as_deref(), options.site_url.as_deref()) {
        (None, None) => {
            let name = options.template.as_deref().unwrap_or("oliva");
            let yaml = defaults::get_template(name).ok_or_else(|| {
                let available: Vec<String> = defaults::list_templates()
                    .iter()
                    .map(|(name, desc)| format!("  {} — {}", name.bold(), desc))
                    .collect();
                anyhow::anyhow!(
                    "Unknown template '{}'. Available templates:\n{}",
                    name,
                    available.join("\n")
                )
            })?;
            if yaml == defaults::MINIMAL_YAML {
                bail!("The minimal template needs --domain and/or --site-url");
            }
            (name.to_string(), yaml.to_string())
        }
        (domain, site_url) => {
            let domain = domain.map(|d| d.to_string()).unwrap_or_else(|| {
                site_url
                    .and_then(|u| url::Url::parse(u).ok())
                    .and_then(|u| u.host_str().map(|h| h.to_string()))
                    .unwrap_or_default()
            });
            let site_url = site_url
                .map(|u| u.to_string())
                .unwrap_or_else(|| format!("https://{}/", domain));
            ("minimal".to_string(), defaults::render_minimal(&domain, &site_url))
        }
    };

    // Never write a config we couldn't load back.
    let config = parser::parse_config_str(&yaml_content)
        .context("Generated config is invalid — check --domain and --site-url")?;

    std::fs::write(&output_file, &yaml_content)
        .with_context(|| format!("Failed to write config file: {}", output_file.display()))?;

    println!();
    println!(
        "  {} Created {}",
        "✓".green().bold(),
        output_file.display().to_string().bold()
    );
    println!();
    println!("  Template: {}", template_name.cyan());
    println!("  Site:     {}", config.site_url.as_str().cyan());
    println!();
    println!("  {} What this shell does:", "ℹ".blue());
    println!(
        "    • Keeps {} and every *.{} page inside the app",
        config.owned_domain.bold(),
        config.owned_domain
    );
    println!("    • Sends tapped links to other sites to the system browser");
    println!("    • Hands tel:, mailto: and sms: links to the phone");
    if !config.special_schemes.is_empty() {
        println!(
            "    • Also hands off deep links: {}",
            config.special_schemes.join(" ")
        );
    }

    println!();
    println!("  {} Next steps:", "→".blue());
    println!(
        "    1. Validate it: {}",
        format!("navguard check {}", output_file.display()).dimmed()
    );
    println!(
        "    2. Try a link: {}",
        "navguard classify https://example.com".dimmed()
    );
    println!("    3. Run the bridge: {}", "navguard serve".dimmed());
    println!();

    Ok(output_file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_init_from_domain() {
        let tmp = TempDir::new().unwrap();
        let output = tmp.path().join("shell.yaml");
        run_init(InitOptions {
            domain: Some("example.org".into()),
            output: Some(output.clone()),
            ..Default::default()
        })
        .unwrap();

        let config = parser::parse_config_file(&output).unwrap();
        assert_eq!(config.owned_domain, "example.org");
        assert_eq!(config.site_url.as_str(), "https://example.org/");
    }

    #[test]
    fn test_init_refuses_to_overwrite() {
        let tmp = TempDir::new().unwrap();
        let output = tmp.path().join("shell.yaml");
        std::fs::write(&output, "keep me").unwrap();

        let result = run_init(InitOptions {
            output: Some(output.clone()),
            ..Default::default()
        });
        assert!(result.is_err());
        assert_eq!(std::fs::read_to_string(&output).unwrap(), "keep me");
    }

    #[test]
    fn test_init_rejects_bad_domain() {
        let tmp = TempDir::new().unwrap();
        let output = tmp.path().join("shell.yaml");
        let result = run_init(InitOptions {
            domain: Some("https://example.org".into()),
            output: Some(output.clone()),
            ..Default::default()
        });
        assert!(result.is_err());
        assert!(!output.exists());
    }
}
