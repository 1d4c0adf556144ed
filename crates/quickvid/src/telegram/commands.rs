//! Fixed bot texts and keyboards.

use teloxide::utils::markdown::{bold, escape};

use crate::download::quality::{self, Quality};
use crate::download::send::Menu;

pub const WELCOME_TEXT: &str = "👋 Welcome! Send a video link to download it.";
pub const UNKNOWN_COMMAND_TEXT: &str = "❌ Unknown command. Type `/help` to see available commands.";
pub const DOWNLOAD_HINT_TEXT: &str = "🔗 Paste a video link (YouTube, Instagram, etc.) and I'll offer the available qualities.";

pub const FEEDBACK_USAGE_TEXT: &str = "Please provide your feedback. Example: `/feedback I love this bot!`";
pub const FEEDBACK_THROTTLED_TEXT: &str = "❌ You can only provide feedback once a week. Try again later!";
pub const FEEDBACK_FAILED_TEXT: &str = "❌ Failed to save feedback. Please try again later.";
pub const FEEDBACK_THANKS_TEXT: &str = "✅ Thank you for your feedback! 😊";

pub const QUALITY_INTRO_TEXT: &str = "🎥 Choose your preferred video quality:";
pub const QUALITY_PROMPT_TEXT: &str = "📌 Select the quality you want to download:";
pub const LINK_TOO_LONG_TEXT: &str = "❌ This link is too long to offer quality buttons for. Try a shorter link.";

/// Label of the reply-keyboard button that asks for a link
pub const DOWNLOAD_BUTTON: &str = "📥 Download Video";

/// Commands registered with Telegram's command menu
pub const BOT_COMMANDS: [(&str, &str); 4] = [
    ("start", "Start the bot and see the menu"),
    ("help", "Show help"),
    ("about", "Learn about the bot"),
    ("feedback", "Send feedback"),
];

const PLATFORMS: [&str; 5] = ["YouTube", "Instagram", "Twitter (X)", "Facebook", "TikTok"];

fn lines(items: &[&str]) -> String {
    items.iter().map(|l| escape(l)).collect::<Vec<_>>().join("\n")
}

fn platform_list(marker: &str) -> String {
    PLATFORMS
        .iter()
        .map(|p| format!("{} {}", marker, escape(p)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// `/help` body (MarkdownV2)
pub fn help_text() -> String {
    format!(
        "📌 {}\n\n📝 {}\n{}\n\n🔹 {}\n{}\n\n📌 {}\n{}",
        bold("QuickVidLoader Bot Help"),
        bold("How to use this bot?"),
        lines(&[
            "1️⃣ Send a valid video link (YouTube, Instagram, etc.).",
            "2️⃣ Pick a quality; the bot downloads the file and sends it back.",
            "3️⃣ Use the menu buttons for quick actions.",
        ]),
        bold("Available Commands:"),
        lines(&[
            "✅ /start - Start the bot and see the menu",
            "✅ /help - Show this help message",
            "✅ /about - Learn about the bot",
            "✅ /feedback [your message] - Send feedback (once a week)",
            "✅ Send any valid video link to download",
        ]),
        bold("Supported Platforms:"),
        platform_list("✔"),
    )
}

/// `/about` body (MarkdownV2)
pub fn about_text() -> String {
    format!(
        "📢 {}\n\n🚀 {}\n{}\n\n🎥 {}\n{}\n\n💡 {}\n{}",
        bold("About QuickVidLoader Bot"),
        bold("What does this bot do?"),
        escape("This bot allows you to download videos from various platforms by simply sending a link."),
        bold("Supported Platforms:"),
        platform_list("✅"),
        bold("How to use?"),
        escape("Just send a valid video link and get your video downloaded!"),
    )
}

/// Reply keyboard shown by `/start`.
pub fn main_menu() -> Menu {
    Menu::Reply(vec![
        vec![DOWNLOAD_BUTTON.to_string(), "/help".to_string()],
        vec!["/feedback".to_string(), "/about".to_string()],
    ])
}

/// Inline keyboard with one button per quality, two per row.
///
/// `None` when a token for `url` would not fit in a callback payload.
pub fn quality_menu(url: &str) -> Option<Menu> {
    let buttons = Quality::all()
        .map(|q| (q.button_label().to_string(), quality::encode(q, url)))
        .collect::<Vec<_>>();

    if !buttons.iter().all(|(_, token)| quality::fits_callback_limit(token)) {
        return None;
    }

    Some(Menu::Inline(buttons.chunks(2).map(<[_]>::to_vec).collect()))
}
