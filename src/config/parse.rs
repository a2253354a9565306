use super::types::*;
use crate::config::{expand_env_vars, expand_tilde};
use regex::Regex;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("validation failed:\n{}", .0.join("\n"))]
    ValidationList(Vec<String>),

    #[error("validation failed: {0}")]
    Validation(String),
}

pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let yaml_string = std::fs::read_to_string(path).map_err(|e| {
        ConfigError::Io(std::io::Error::new(
            e.kind(),
            format!("failed to read config file '{}': {}", path.display(), e),
        ))
    })?;

    // Expand environment variables in the YAML string before parsing
    let yaml_string = expand_env_vars(&yaml_string);
    check_unexpanded_vars(&yaml_string)?;

    let mut config: Config = serde_yaml::from_str(&yaml_string).map_err(|e| {
        ConfigError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("in file '{}': {}", path.display(), e),
        ))
    })?;

    config.watermark.path = expand_tilde(&config.watermark.path);

    validate_config(&config)?;

    Ok(config)
}

/// Checks for unexpanded environment variables and returns a helpful error.
/// Comment lines are skipped so documentation can show the `$env{...}`
/// syntax literally without tripping validation.
fn check_unexpanded_vars(yaml_string: &str) -> Result<(), ConfigError> {
    let re = Regex::new(r"\$env\{([A-Za-z_][A-Za-z0-9_]*)\}").unwrap();
    let mut unexpanded_vars: Vec<String> = yaml_string
        .lines()
        .filter(|line| !line.trim_start().starts_with('#'))
        .flat_map(|line| {
            re.captures_iter(line)
                .map(|cap| cap.get(1).unwrap().as_str().to_string())
                .collect::<Vec<_>>()
        })
        .collect();

    if unexpanded_vars.is_empty() {
        return Ok(());
    }

    unexpanded_vars.sort();
    unexpanded_vars.dedup();

    Err(ConfigError::Validation(format!(
        "Environment variables are not set: {}\n\
         \n\
         To fix this, either:\n\
         1. Set the environment variables (e.g., export WEBHOOK_URL=https://...)\n\
         2. Replace the variables in the config file with actual values",
        unexpanded_vars.join(", ")
    )))
}

fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let mut errors = Vec::new();

    if config.webhook.url.trim().is_empty() {
        errors.push("webhook.url must not be empty".to_string());
    } else if !config.webhook.url.starts_with("http://") && !config.webhook.url.starts_with("https://")
    {
        errors.push(format!(
            "webhook.url must be an http(s) URL, got '{}'",
            config.webhook.url
        ));
    }

    if config.perforce.depot.trim().is_empty() {
        errors.push("perforce.depot must not be empty".to_string());
    }

    if config.perforce.binary.trim().is_empty() {
        errors.push("perforce.binary must not be empty".to_string());
    }

    if config.poll.max_changes == 0 {
        errors.push("poll.max_changes must be at least 1".to_string());
    }

    if config.watermark.path.as_os_str().is_empty() {
        errors.push("watermark.path must not be empty".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationList(errors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, yaml: &str) -> std::path::PathBuf {
        let path = dir.path().join("config.yml");
        std::fs::write(&path, yaml).unwrap();
        path
    }

    #[test]
    fn test_minimal_config_with_defaults() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            r#"
webhook:
  url: https://discord.com/api/webhooks/123/abc
perforce:
  depot: //depot/main/...
"#,
        );

        let config = load_config(&path).unwrap();
        assert_eq!(config.perforce.binary, "p4");
        assert_eq!(config.poll.interval, Duration::from_secs(1));
        assert_eq!(config.poll.delivery_pause, Duration::from_secs(1));
        assert_eq!(config.poll.max_changes, 8);
        assert!(!config.poll.signature);
    }

    #[test]
    fn test_full_config() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            r#"
webhook:
  url: https://discord.com/api/webhooks/123/abc
perforce:
  depot: //depot/main/...
  binary: /usr/local/bin/p4
poll:
  interval: 30s
  delivery_pause: 2s
  max_changes: 20
  signature: true
watermark:
  path: /var/lib/p4relay/last_change
"#,
        );

        let config = load_config(&path).unwrap();
        assert_eq!(config.poll.interval, Duration::from_secs(30));
        assert_eq!(config.poll.max_changes, 20);
        assert!(config.poll.signature);
        assert_eq!(
            config.watermark.path,
            std::path::PathBuf::from("/var/lib/p4relay/last_change")
        );
    }

    #[test]
    fn test_zero_max_changes_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            r#"
webhook:
  url: https://discord.com/api/webhooks/123/abc
perforce:
  depot: //depot/main/...
poll:
  max_changes: 0
"#,
        );

        let err = load_config(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationList(_)));
    }

    #[test]
    fn test_non_http_webhook_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            r#"
webhook:
  url: not-a-url
perforce:
  depot: //depot/main/...
"#,
        );

        let err = load_config(&path).unwrap_err();
        match err {
            ConfigError::ValidationList(errors) => {
                assert!(errors.iter().any(|e| e.contains("webhook.url")));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unset_env_var_in_comment_ignored() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            r#"
# Values support $env{VAR_NAME} expansion, e.g. url: $env{WEBHOOK_URL}
webhook:
  url: https://discord.com/api/webhooks/123/abc
perforce:
  depot: //depot/main/...
"#,
        );

        load_config(&path).expect("comment-only $env references must not fail validation");
    }

    #[test]
    fn test_unset_env_var_reported() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            r#"
webhook:
  url: $env{P4RELAY_UNSET_WEBHOOK}
perforce:
  depot: //depot/main/...
"#,
        );

        let err = load_config(&path).unwrap_err();
        match err {
            ConfigError::Validation(msg) => {
                assert!(msg.contains("P4RELAY_UNSET_WEBHOOK"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
