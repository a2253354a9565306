pub fn generate_starter_config() -> String {
    r#"# =============================================================================
# P4RELAY CONFIGURATION
# =============================================================================
# p4relay polls a Perforce server for newly submitted changelists and relays
# each one to a chat webhook. The highest reported change number is kept in a
# small watermark file so nothing is re-announced after a restart.
#
# Config file locations (in order of precedence):
#   1. Path specified via --config argument
#   2. ~/.config/p4relay/config.yml
#   3. /etc/p4relay/config.yml
#
# Values support $env{VAR_NAME} expansion, handy for keeping the webhook URL
# out of the file:
#   url: $env{WEBHOOK_URL}

webhook:
  # Discord-compatible webhook endpoint to post notifications to.
  url: https://discord.com/api/webhooks/CHANGE/ME

perforce:
  # Depot path passed to `p4 changes`, usually ending in /...
  depot: //depot/main/...
  # Perforce client binary; override when p4 is not on PATH.
  binary: p4

poll:
  # Pause between poll cycles. Units: ms, s, m, h.
  interval: 1s
  # Pause between messages within one batch, to respect webhook rate limits.
  delivery_pause: 1s
  # Most changelists requested per cycle.
  max_changes: 8
  # Attach a decorative signature footer to each message.
  signature: false

watermark:
  # File holding the last reported change number. Created on first write.
  path: ~/.local/state/p4relay/last_change
"#
    .to_string()
}
