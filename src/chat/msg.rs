use std::collections::HashMap;

use crate::{
    colors::FALLBACK_COLOR,
    include_res,
    models::{Friend, Message},
    res,
};

pub(crate) fn message_to_html(message: &Message, colors: &HashMap<i64, &str>) -> String {
    let color = colors.get(&message.sender_id).copied().unwrap_or(FALLBACK_COLOR);

    include_res!(str, "/pages/chat/message.html")
        .replace("{id}", &message.id.to_string())
        .replace("{color}", color)
        .replace("{sender_name}", &res::escape(&message.sender_name))
        .replace("{time}", &message.created_at.clock())
        .replace("{text}", &res::markdown_to_html(&message.text, false))
}

pub(crate) fn sender_options(friends: &[Friend]) -> String {
    friends
        .iter()
        .map(|friend| format!(r#"<option value="{}">{}</option>"#, friend.id, res::escape(&friend.name)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Energy, Timestamp};

    fn message(sender_id: i64, text: &str) -> Message {
        Message {
            id: 4,
            chat_id: 1,
            text: text.to_owned(),
            sender_id,
            sender_name: "<Cass>".to_owned(),
            created_at: Timestamp(0),
        }
    }

    #[test]
    fn renders_sender_color_and_escaped_name() {
        let colors = HashMap::from([(2, "teal")]);
        let html = message_to_html(&message(2, "I love *Overwatch*"), &colors);

        assert!(html.contains(r#"id="message-4""#));
        assert!(html.contains("color: teal"));
        assert!(html.contains("&lt;Cass&gt;"));
        assert!(html.contains("<em>Overwatch</em>"));
        assert!(html.contains("00:00"));
    }

    #[test]
    fn unknown_sender_gets_the_fallback_color() {
        let html = message_to_html(&message(9, "hi"), &HashMap::new());
        assert!(html.contains("color: grey"));
    }

    #[test]
    fn sender_options_list_every_friend() {
        let friends = vec![
            Friend { id: 1, name: "Cass".into(), energy: Energy::High, event_id: None },
            Friend { id: 2, name: "Bryan & co".into(), energy: Energy::Low, event_id: None },
        ];
        assert_eq!(
            sender_options(&friends),
            r#"<option value="1">Cass</option><option value="2">Bryan &amp; co</option>"#
        );
    }
}
