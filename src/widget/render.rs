//! HTML rendering of transcript nodes.

use std::borrow::Cow;

use chrono::{DateTime, Local};
use serde::Deserialize;

use super::message::{Message, Sender};
use super::view::Node;

/// Reserved id of the typing indicator node.
pub const INDICATOR_ID: &str = "typing-indicator";

/// How bot text is inserted into the transcript.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ContentPolicy {
    /// Insert bot text as HTML. The responder is trusted to send markup.
    #[default]
    Markup,
    /// Escape bot text so it displays literally.
    Escape,
}

/// Render a message as a transcript node.
///
/// User text is always escaped; bot text follows `policy`.
#[must_use]
pub fn render_message(message: &Message, policy: ContentPolicy) -> Node {
    let body = match (message.sender, policy) {
        (Sender::Bot, ContentPolicy::Markup) => Cow::Borrowed(message.text.as_str()),
        _ => escape_html(&message.text),
    };

    Node::new(format!(
        r#"<div class="message {sender}"><div class="message-content">{body}</div><div class="message-time">{time}</div></div>"#,
        sender = message.sender,
        time = format_time(&message.sent_at),
    ))
}

/// Render the typing indicator.
#[must_use]
pub fn render_indicator() -> Node {
    Node::with_id(
        INDICATOR_ID,
        format!(
            r#"<div id="{INDICATOR_ID}" class="message bot typing"><div class="typing-dots"><span></span><span></span><span></span></div></div>"#
        ),
    )
}

/// Hour and minute label, pt-BR style (`09:05`, `21:40`).
#[must_use]
pub fn format_time(time: &DateTime<Local>) -> String {
    time.format("%H:%M").to_string()
}

/// Escape the five HTML-significant characters.
#[must_use]
pub fn escape_html(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len() + 16);
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at_nine_oh_five(sender: Sender, text: &str) -> Message {
        let time = Local.with_ymd_and_hms(2024, 3, 1, 9, 5, 0).unwrap();
        Message::at(sender, text, time)
    }

    #[test]
    fn test_time_label_is_zero_padded_24h() {
        let time = Local.with_ymd_and_hms(2024, 3, 1, 21, 7, 59).unwrap();
        assert_eq!(format_time(&time), "21:07");
    }

    #[test]
    fn test_markup_policy_keeps_bot_html() {
        let node = render_message(
            &at_nine_oh_five(Sender::Bot, "<b>CS Lagoa</b>"),
            ContentPolicy::Markup,
        );
        assert!(node.html.contains(r#"<div class="message-content"><b>CS Lagoa</b></div>"#));
        assert!(node.html.contains(r#"<div class="message-time">09:05</div>"#));
        assert!(node.id.is_none());
    }

    #[test]
    fn test_escape_policy_escapes_bot_html() {
        let node = render_message(
            &at_nine_oh_five(Sender::Bot, "<b>CS Lagoa</b>"),
            ContentPolicy::Escape,
        );
        assert!(node.html.contains("&lt;b&gt;CS Lagoa&lt;/b&gt;"));
    }

    #[test]
    fn test_user_text_always_escaped() {
        let node = render_message(
            &at_nine_oh_five(Sender::User, "<script>x</script>"),
            ContentPolicy::Markup,
        );
        assert!(node.html.starts_with(r#"<div class="message user">"#));
        assert!(!node.html.contains("<script>"));
    }

    #[test]
    fn test_indicator_carries_reserved_id() {
        let node = render_indicator();
        assert_eq!(node.id, Some(INDICATOR_ID));
        assert!(node.html.contains(r#"id="typing-indicator""#));
    }

    #[test]
    fn test_escape_borrows_plain_text() {
        assert!(matches!(escape_html("sem marcação"), Cow::Borrowed(_)));
        assert_eq!(escape_html(r#"a&"b'"#), "a&amp;&quot;b&#39;");
    }
}
