use crate::changes::Change;
use rand::seq::SliceRandom;

/// Decorative footer lines, one picked at random per message when signatures
/// are enabled.
const SIGNATURES: &[&str] = &[
    "Delivered while the build was still green",
    "Another one for the history books",
    "Fresh off the submit queue",
    "Your friendly neighborhood change courier",
    "Syncing recommended",
];

/// A fully rendered notification, ready for a webhook transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeMessage {
    pub author_line: String,
    pub body: String,
    pub footer: Option<String>,
}

/// Renders one change into the message shape the webhook expects.
///
/// The `user@workspace` author is split here, at the rendering boundary; the
/// parsed record keeps the raw string. Leading whitespace is trimmed from the
/// start of the description so the code fence does not open on a blank run,
/// but interior blank lines stay.
pub fn render_message(change: &Change, with_signature: bool) -> ChangeMessage {
    let user = change
        .author
        .split('@')
        .next()
        .unwrap_or(change.author.as_str());

    let body = format!(
        "`Change #{}`  - {} {} \n```fix\n{}``` ",
        change.number,
        change.time,
        change.date,
        change.description.trim_start(),
    );

    let footer = if with_signature {
        SIGNATURES
            .choose(&mut rand::thread_rng())
            .map(|s| s.to_string())
    } else {
        None
    };

    ChangeMessage {
        author_line: format!("@{user} pushed something"),
        body,
        footer,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_change() -> Change {
        Change {
            number: 42,
            date: "2024/01/01".to_string(),
            time: "10:00:00".to_string(),
            author: "alice@ws1".to_string(),
            description: "\tfixed bug\n\n\tadded test\n".to_string(),
        }
    }

    #[test]
    fn test_author_split_at_render_time() {
        let msg = render_message(&sample_change(), false);
        assert_eq!(msg.author_line, "@alice pushed something");
    }

    #[test]
    fn test_author_without_workspace_suffix() {
        let mut change = sample_change();
        change.author = "bob".to_string();
        let msg = render_message(&change, false);
        assert_eq!(msg.author_line, "@bob pushed something");
    }

    #[test]
    fn test_body_keeps_interior_blank_line() {
        let msg = render_message(&sample_change(), false);
        assert!(msg.body.contains("fixed bug\n\n\tadded test"));
        // Leading tab before the first line is trimmed.
        assert!(msg.body.contains("```fix\nfixed bug"));
    }

    #[test]
    fn test_signature_toggle() {
        let without = render_message(&sample_change(), false);
        assert!(without.footer.is_none());

        let with = render_message(&sample_change(), true);
        let footer = with.footer.unwrap();
        assert!(SIGNATURES.contains(&footer.as_str()));
    }
}
