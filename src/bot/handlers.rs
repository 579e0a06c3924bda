use crate::bot::views::{help_keyboard, welcome_text, APOLOGY_TEXT, HELP_TEXT};
use crate::llm::LlmProvider;
use anyhow::Result;
use std::sync::Arc;
use teloxide::{
    prelude::*,
    types::{ChatAction, User},
    utils::command::BotCommands,
};
use tracing::{error, info};

/// Supported commands for the bot
#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Поддерживаемые команды:")]
pub enum Command {
    /// Show the welcome message
    #[command(description = "Начать общение.")]
    Start,
    /// Show usage help and the developer contact
    #[command(description = "Помощь по использованию бота.")]
    Help,
}

/// Full name of the message sender, or a neutral fallback when the platform
/// did not report one.
#[must_use]
pub fn sender_display_name(msg: &Message) -> String {
    msg.from
        .as_ref()
        .map(User::full_name)
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| "друг".to_string())
}

/// Start handler
///
/// # Errors
///
/// Returns an error if the welcome message cannot be sent.
pub async fn start(bot: Bot, msg: Message) -> Result<()> {
    let user_name = sender_display_name(&msg);
    info!(chat_id = msg.chat.id.0, "User {user_name} initiated /start command.");

    bot.send_message(msg.chat.id, welcome_text(&user_name)).await?;
    Ok(())
}

/// Help handler
///
/// # Errors
///
/// Returns an error if the keyboard cannot be built or the message cannot be sent.
pub async fn help(bot: Bot, msg: Message) -> Result<()> {
    bot.send_message(msg.chat.id, HELP_TEXT)
        .reply_markup(help_keyboard()?)
        .await?;
    Ok(())
}

/// Text message handler: relays the text to the LLM and sends back the reply.
///
/// # Errors
///
/// Returns an error only if Telegram rejects the chat action or the reply.
pub async fn handle_text(bot: Bot, msg: Message, llm: Arc<dyn LlmProvider>) -> Result<()> {
    let Some(text) = msg.text() else {
        return Ok(());
    };

    bot.send_chat_action(msg.chat.id, ChatAction::Typing).await?;

    let reply = relay_reply(llm.as_ref(), msg.chat.id, text).await;
    bot.send_message(msg.chat.id, reply).await?;
    Ok(())
}

/// Ask the LLM for a reply to `text`, falling back to [`APOLOGY_TEXT`].
///
/// Every failure kind is logged and collapsed into the same user-facing text.
pub async fn relay_reply(llm: &dyn LlmProvider, chat_id: ChatId, text: &str) -> String {
    match llm.chat_completion(text).await {
        Ok(reply) => reply,
        Err(e) => {
            error!(chat_id = chat_id.0, error = ?e, "Error while calling the LLM API: {e}");
            APOLOGY_TEXT.to_string()
        }
    }
}
