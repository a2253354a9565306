use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub webhook: WebhookConfig,
    pub perforce: PerforceConfig,
    #[serde(default)]
    pub poll: PollConfig,
    #[serde(default)]
    pub watermark: WatermarkConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookConfig {
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerforceConfig {
    /// Depot path passed to `p4 changes`, e.g. `//depot/main/...`.
    pub depot: String,
    #[serde(default = "default_p4_binary")]
    pub binary: String,
}

fn default_p4_binary() -> String {
    "p4".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollConfig {
    /// Pause between poll cycles.
    #[serde(default = "default_interval", with = "duration_format")]
    pub interval: Duration,
    /// Pause between consecutive deliveries within one batch, to stay under
    /// the destination's rate limits.
    #[serde(default = "default_interval", with = "duration_format")]
    pub delivery_pause: Duration,
    /// Most changes requested per cycle.
    #[serde(default = "default_max_changes")]
    pub max_changes: u32,
    /// Attach a decorative signature footer to outgoing messages.
    #[serde(default)]
    pub signature: bool,
}

fn default_interval() -> Duration {
    Duration::from_secs(1)
}

fn default_max_changes() -> u32 {
    8
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: default_interval(),
            delivery_pause: default_interval(),
            max_changes: default_max_changes(),
            signature: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatermarkConfig {
    #[serde(default = "default_watermark_path")]
    pub path: PathBuf,
}

fn default_watermark_path() -> PathBuf {
    PathBuf::from("~/.local/state/p4relay/last_change")
}

impl Default for WatermarkConfig {
    fn default() -> Self {
        Self {
            path: default_watermark_path(),
        }
    }
}

// Custom serde module for duration parsing
mod duration_format {
    use serde::{self, Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format_duration(*duration))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse_duration(&s).map_err(serde::de::Error::custom)
    }

    fn parse_duration(s: &str) -> Result<Duration, String> {
        let s = s.trim();
        if s.is_empty() {
            return Err("empty duration string".to_string());
        }

        let (value_str, unit) = if s.ends_with("ms") {
            (&s[..s.len() - 2], "ms")
        } else if s.ends_with('s') {
            (&s[..s.len() - 1], "s")
        } else if s.ends_with('m') {
            (&s[..s.len() - 1], "m")
        } else if s.ends_with('h') {
            (&s[..s.len() - 1], "h")
        } else {
            return Err(format!("invalid duration format: {}", s));
        };

        let value: u64 = value_str
            .parse()
            .map_err(|_| format!("invalid numeric value: {}", value_str))?;

        let duration = match unit {
            "ms" => Duration::from_millis(value),
            "s" => Duration::from_secs(value),
            "m" => Duration::from_secs(value * 60),
            "h" => Duration::from_secs(value * 3600),
            _ => return Err(format!("unknown unit: {}", unit)),
        };

        Ok(duration)
    }

    fn format_duration(d: Duration) -> String {
        let secs = d.as_secs();
        if secs % 3600 == 0 && secs > 0 {
            format!("{}h", secs / 3600)
        } else if secs % 60 == 0 && secs > 0 {
            format!("{}m", secs / 60)
        } else if secs > 0 {
            format!("{}s", secs)
        } else {
            format!("{}ms", d.as_millis())
        }
    }
}
