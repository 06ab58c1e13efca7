//! Pagination UI component builders.

use twilight_model::channel::message::component::{ActionRow, Button, ButtonStyle, Component};

use super::token::build_custom_id;
use super::view::{NavAction, NavControls};

fn label(action: NavAction) -> &'static str {
    match action {
        NavAction::First => "⏪",
        NavAction::Previous => "◀️",
        NavAction::Next => "▶️",
        NavAction::Last => "⏩",
        NavAction::Dismiss => "❌",
    }
}

fn style(action: NavAction) -> ButtonStyle {
    match action {
        NavAction::Dismiss => ButtonStyle::Danger,
        _ => ButtonStyle::Secondary,
    }
}

/// Build the first/previous/next/last/dismiss button row.
pub fn build_nav_components(
    command: &str,
    owner_user_id: u64,
    controls: NavControls,
) -> Vec<Component> {
    let buttons = NavAction::ALL
        .into_iter()
        .map(|action| {
            Component::Button(Button {
                id: None,
                custom_id: Some(build_custom_id(command, action, owner_user_id)),
                disabled: !controls.enabled(action),
                emoji: None,
                label: Some(label(action).to_owned()),
                style: style(action),
                url: None,
                sku_id: None,
            })
        })
        .collect();

    vec![Component::ActionRow(ActionRow {
        id: None,
        components: buttons,
    })]
}
