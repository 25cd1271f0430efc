//! Discord embeds and buttons for everything the help desk posts.

use crate::{
    config::{ButtonColour, CategoryConfig},
    core::{
        controls::Control,
        lifecycle::OpenThread,
        notice::{ClosedDm, ClosingNotice, IntroMessage, LogEntry, LogKind},
        platform::LifecycleState,
    },
};
use poise::serenity_prelude as serenity;
use std::fmt::Write;

/// Neutral embed colour for guide sections, intros and notices.
pub const HELP_COLOUR: u32 = 0x0036_393F;

/// Discord's cap on embed descriptions.
const DESCRIPTION_LIMIT: usize = 4096;

/// Discord allows at most five buttons per row.
const BUTTONS_PER_ROW: usize = 5;

/// Text above the category buttons of the creation prompt.
pub const CREATION_PROMPT: &str =
    "**:white_check_mark: If you've read the guidelines above, click a button to create a help thread!**";

const fn log_colour(kind: LogKind) -> u32 {
    match kind {
        LogKind::Opened => 0x002E_CC71,
        LogKind::Closed => 0x00E7_4C3C,
        LogKind::Reopened => 0x0034_98DB,
    }
}

/// Maps a configured colour to a button style.
#[must_use]
pub const fn button_style(colour: ButtonColour) -> serenity::ButtonStyle {
    match colour {
        ButtonColour::Primary => serenity::ButtonStyle::Primary,
        ButtonColour::Secondary => serenity::ButtonStyle::Secondary,
        ButtonColour::Success => serenity::ButtonStyle::Success,
        ButtonColour::Danger => serenity::ButtonStyle::Danger,
    }
}

fn close_button() -> serenity::CreateButton {
    serenity::CreateButton::new(Control::ThreadClose.custom_id())
        .label("Close")
        .emoji('🔒')
        .style(serenity::ButtonStyle::Danger)
}

/// The pinned first message of a new thread.
#[must_use]
pub fn intro_message(intro: &IntroMessage) -> serenity::CreateMessage {
    let embed = serenity::CreateEmbed::new()
        .title(intro.title())
        .description(IntroMessage::DESCRIPTION)
        .color(HELP_COLOUR)
        .footer(serenity::CreateEmbedFooter::new(IntroMessage::FOOTER));
    serenity::CreateMessage::new()
        .content(intro.content())
        .embed(embed)
        .allowed_mentions(
            serenity::CreateAllowedMentions::new()
                .roles(vec![intro.helper_role])
                .users(vec![intro.author]),
        )
        .components(vec![serenity::CreateActionRow::Buttons(vec![close_button()])])
}

/// The notice posted right before a thread is locked.
#[must_use]
pub fn closing_notice_embed(notice: &ClosingNotice) -> serenity::CreateEmbed {
    serenity::CreateEmbed::new()
        .title(notice.title)
        .description(notice.description)
        .color(HELP_COLOUR)
}

/// The direct message sent to the author of a closed thread.
#[must_use]
pub fn closed_dm_embed(dm: &ClosedDm) -> serenity::CreateEmbed {
    serenity::CreateEmbed::new()
        .title(ClosedDm::TITLE)
        .description(dm.description())
        .color(HELP_COLOUR)
}

/// The button on a log entry that moves the thread to its other state.
#[must_use]
pub const fn log_toggle(kind: LogKind) -> Control {
    match kind.resulting_state() {
        LifecycleState::Open => Control::LogClose,
        LifecycleState::Closed => Control::LogReopen,
    }
}

fn log_buttons(entry: &LogEntry) -> Vec<serenity::CreateActionRow> {
    let toggle = match log_toggle(entry.kind) {
        Control::LogClose => serenity::CreateButton::new(Control::LogClose.custom_id())
            .label("Close")
            .style(serenity::ButtonStyle::Danger),
        _ => serenity::CreateButton::new(Control::LogReopen.custom_id())
            .label("Re-open")
            .style(serenity::ButtonStyle::Success),
    };
    vec![serenity::CreateActionRow::Buttons(vec![
        serenity::CreateButton::new_link(entry.thread.jump_url()).label("Jump"),
        serenity::CreateButton::new(Control::LogView.custom_id())
            .label("View")
            .style(serenity::ButtonStyle::Secondary),
        toggle,
    ])]
}

/// A log channel entry with its jump, view and state buttons.
#[must_use]
pub fn log_message(entry: &LogEntry) -> serenity::CreateMessage {
    let mut embed = serenity::CreateEmbed::new()
        .title(entry.kind.title())
        .description(entry.description())
        .color(log_colour(entry.kind))
        .footer(serenity::CreateEmbedFooter::new(entry.footer()));
    if let Ok(timestamp) = serenity::Timestamp::from_unix_timestamp(entry.at.timestamp()) {
        embed = embed.timestamp(timestamp);
    }
    serenity::CreateMessage::new()
        .embed(embed)
        .components(log_buttons(entry))
}

/// "Yes" and "No" on the confirmation prompt.
#[must_use]
pub fn confirm_buttons(disabled: bool) -> Vec<serenity::CreateActionRow> {
    vec![serenity::CreateActionRow::Buttons(vec![
        serenity::CreateButton::new(Control::Confirm.custom_id())
            .label("Yes")
            .style(serenity::ButtonStyle::Success)
            .disabled(disabled),
        serenity::CreateButton::new(Control::Decline.custom_id())
            .label("No")
            .style(serenity::ButtonStyle::Danger)
            .disabled(disabled),
    ])]
}

/// The message under the guide with one create button per category.
#[must_use]
pub fn creation_prompt(categories: &[CategoryConfig]) -> serenity::CreateMessage {
    let rows = categories
        .chunks(BUTTONS_PER_ROW)
        .map(|chunk| {
            serenity::CreateActionRow::Buttons(
                chunk
                    .iter()
                    .map(|c| {
                        serenity::CreateButton::new(Control::Create(c.key.clone()).custom_id())
                            .label(&c.label)
                            .style(button_style(c.colour))
                    })
                    .collect(),
            )
        })
        .collect();
    serenity::CreateMessage::new()
        .content(CREATION_PROMPT)
        .components(rows)
}

/// One section of the help guide.
#[must_use]
pub fn guide_embed(section: &str) -> serenity::CreateEmbed {
    serenity::CreateEmbed::new()
        .description(section)
        .color(HELP_COLOUR)
}

/// Listing lines for open threads, cut to fit `limit` characters.
#[must_use]
pub fn open_threads_text(threads: &[OpenThread], limit: usize) -> String {
    if threads.is_empty() {
        return "There are no open help threads.".to_string();
    }
    let mut text = String::new();
    for (shown, thread) in threads.iter().enumerate() {
        let mut line = format!("• <#{}> {}", thread.id, thread.topic);
        if let Some(id) = thread.embedded_id {
            let _ = write!(line, " (`{id}`)");
        }
        line.push('\n');

        let rest = threads.len() - shown;
        let more = format!("…and {rest} more");
        if text.chars().count() + line.chars().count() + more.chars().count() > limit {
            text.push_str(&more);
            return text;
        }
        text.push_str(&line);
    }
    text.trim_end().to_string()
}

/// Embed for the open threads listing.
#[must_use]
pub fn open_threads_embed(threads: &[OpenThread]) -> serenity::CreateEmbed {
    serenity::CreateEmbed::new()
        .title(format!("Open help threads ({})", threads.len()))
        .description(open_threads_text(threads, DESCRIPTION_LIMIT))
        .color(HELP_COLOUR)
}

/// Rebuilds a message's buttons. `disable` receives each button's custom id
/// (`None` for link buttons) and returns the new disabled flag, or `None` to
/// keep the current one.
pub fn rebuild_controls<F>(
    components: &[serenity::ActionRow],
    disable: F,
) -> Vec<serenity::CreateActionRow>
where
    F: Fn(Option<&str>) -> Option<bool>,
{
    components
        .iter()
        .map(|row| {
            let buttons = row
                .components
                .iter()
                .filter_map(|component| match component {
                    serenity::ActionRowComponent::Button(button) => {
                        rebuild_button(button, &disable)
                    }
                    _ => None,
                })
                .collect();
            serenity::CreateActionRow::Buttons(buttons)
        })
        .collect()
}

fn rebuild_button<F>(button: &serenity::Button, disable: &F) -> Option<serenity::CreateButton>
where
    F: Fn(Option<&str>) -> Option<bool>,
{
    let (mut rebuilt, custom_id) = match &button.data {
        serenity::ButtonKind::Link { url } => (serenity::CreateButton::new_link(url), None),
        serenity::ButtonKind::NonLink { custom_id, style } => (
            serenity::CreateButton::new(custom_id).style(*style),
            Some(custom_id.as_str()),
        ),
        _ => return None,
    };
    if let Some(label) = &button.label {
        rebuilt = rebuilt.label(label);
    }
    if let Some(emoji) = &button.emoji {
        rebuilt = rebuilt.emoji(emoji.clone());
    }
    Some(rebuilt.disabled(disable(custom_id).unwrap_or(button.disabled)))
}

/// Same buttons, all disabled.
#[must_use]
pub fn disable_all(components: &[serenity::ActionRow]) -> Vec<serenity::CreateActionRow> {
    rebuild_controls(components, |_| Some(true))
}

/// Same buttons with the one carrying `pressed` disabled.
#[must_use]
pub fn retire_button(
    components: &[serenity::ActionRow],
    pressed: &str,
) -> Vec<serenity::CreateActionRow> {
    rebuild_controls(components, |id| (id == Some(pressed)).then_some(true))
}

/// Same buttons with the thread's close button switched on or off.
#[must_use]
pub fn set_close_enabled(
    components: &[serenity::ActionRow],
    enabled: bool,
) -> Vec<serenity::CreateActionRow> {
    let close_id = Control::ThreadClose.custom_id();
    rebuild_controls(components, |id| {
        (id == Some(close_id.as_str())).then_some(!enabled)
    })
}
