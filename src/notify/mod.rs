pub mod message;
pub mod webhook;

pub use message::{render_message, ChangeMessage};
pub use webhook::{DiscordWebhook, Notifier, NotifyError};
