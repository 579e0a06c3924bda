//! Static texts and keyboards shown to users

use anyhow::Result;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

/// Fixed part of the `/start` greeting that follows the user's name
pub const WELCOME_PHRASE: &str = "Я умный бот, который может общаться с тобой на любые темы. \
Задавай вопросы, обсуждай идеи или просто поболтай со мной!";

/// Reply to `/help`
pub const HELP_TEXT: &str = "📖 Помощь по использованию бота\n\n\
Я - бот, который может ответить на твои вопросы с помощью искусственного интеллекта. \
Вот что ты можешь сделать:\n\n\
• Напиши мне любое сообщение, и я постараюсь дать развернутый ответ\n\
• Используй команду /start, чтобы начать общение заново\n\
• Если у тебя есть вопросы или предложения, свяжись с разработчиком\n\n\
Просто напиши мне что-нибудь, и я помогу тебе!";

/// Sent instead of the model reply whenever the relay fails
pub const APOLOGY_TEXT: &str = "Извините, произошла ошибка при обработке вашего запроса.";

/// Label of the contact button attached to `/help`
pub const DEVELOPER_BUTTON_TEXT: &str = "💬 Написать разработчику";
/// Target of the contact button attached to `/help`
pub const DEVELOPER_CONTACT_URL: &str = "https://t.me/Arche006";

/// Greeting for `/start`, addressed to `display_name`
#[must_use]
pub fn welcome_text(display_name: &str) -> String {
    format!("Привет, {display_name}! 👋\n\n{WELCOME_PHRASE}")
}

/// Inline keyboard with the single developer contact button
///
/// # Errors
///
/// Returns an error if the contact URL cannot be parsed.
pub fn help_keyboard() -> Result<InlineKeyboardMarkup> {
    let url = DEVELOPER_CONTACT_URL.parse()?;
    Ok(InlineKeyboardMarkup::new(vec![vec![
        InlineKeyboardButton::url(DEVELOPER_BUTTON_TEXT, url),
    ]]))
}
