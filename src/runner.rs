//! Telegram runtime entrypoint.

use crate::bot;
use crate::bot::handlers::Command;
use crate::config::Settings;
use crate::llm::{LlmProvider, OpenRouterProvider};
use std::sync::Arc;
use teloxide::dispatching::UpdateHandler;
use teloxide::error_handlers::LoggingErrorHandler;
use teloxide::prelude::*;
use teloxide::update_listeners::Polling;
use teloxide::utils::command::BotCommands;
use tracing::{error, info};

/// Run the bot until Ctrl-C.
///
/// Updates queued before startup are dropped.
pub async fn run_bot(settings: Arc<Settings>) {
    let llm = init_llm(&settings);
    let bot = Bot::new(settings.bot_token.clone());

    register_commands(&bot).await;

    let handler = setup_handler();
    let listener = Polling::builder(bot.clone())
        .drop_pending_updates()
        .build();

    info!("Bot is running and ready to work!");

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![llm])
        .enable_ctrlc_handler()
        .build()
        .dispatch_with_listener(
            listener,
            LoggingErrorHandler::with_custom_text("An error from the update listener"),
        )
        .await;

    info!("Bot stopped.");
}

fn init_llm(settings: &Settings) -> Arc<dyn LlmProvider> {
    let provider = OpenRouterProvider::from_settings(settings);
    info!(model = provider.model(), "LLM Client initialized.");
    Arc::new(provider)
}

async fn register_commands(bot: &Bot) {
    if let Err(e) = bot.set_my_commands(Command::bot_commands()).await {
        error!("Failed to register bot commands: {}", e);
    }
}

/// Build the update handler tree: commands first, then any text message.
#[must_use]
pub fn setup_handler() -> UpdateHandler<teloxide::RequestError> {
    Update::filter_message()
        .branch(
            dptree::entry()
                .filter_command::<Command>()
                .endpoint(handle_command),
        )
        .branch(
            dptree::filter(|msg: Message| msg.text().is_some()).endpoint(handle_text_message),
        )
}

async fn handle_command(
    bot: Bot,
    msg: Message,
    cmd: Command,
) -> Result<(), teloxide::RequestError> {
    let res = match cmd {
        Command::Start => bot::handlers::start(bot, msg).await,
        Command::Help => bot::handlers::help(bot, msg).await,
    };
    if let Err(e) = res {
        error!("Command error: {}", e);
    }
    respond(())
}

async fn handle_text_message(
    bot: Bot,
    msg: Message,
    llm: Arc<dyn LlmProvider>,
) -> Result<(), teloxide::RequestError> {
    if let Err(e) = bot::handlers::handle_text(bot, msg, llm).await {
        error!("Text handler error: {}", e);
    }
    respond(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::MockLlmProvider;
    use std::ops::ControlFlow;
    use teloxide::types::Me;

    const ME_JSON: &str = r#"{
        "id": 777,
        "is_bot": true,
        "first_name": "Relay",
        "username": "relay_bot",
        "can_join_groups": false,
        "can_read_all_group_messages": false,
        "supports_inline_queries": false,
        "can_connect_to_business": false,
        "has_main_web_app": false,
        "has_topics_enabled": false,
        "allows_users_to_create_topics": false
    }"#;

    fn text_update(text: &str) -> String {
        format!(
            r#"{{
                "update_id": 1,
                "message": {{
                    "message_id": 10,
                    "date": 1700000000,
                    "chat": {{"id": 42, "type": "private", "first_name": "Ivan"}},
                    "from": {{"id": 42, "is_bot": false, "first_name": "Ivan"}},
                    "text": {}
                }}
            }}"#,
            serde_json::Value::from(text)
        )
    }

    const PHOTO_UPDATE: &str = r#"{
        "update_id": 2,
        "message": {
            "message_id": 11,
            "date": 1700000000,
            "chat": {"id": 42, "type": "private", "first_name": "Ivan"},
            "from": {"id": 42, "is_bot": false, "first_name": "Ivan"},
            "photo": [{
                "file_id": "AgACAgIAAxkBAAIB",
                "file_unique_id": "AQADAgAT",
                "width": 90,
                "height": 90,
                "file_size": 1024
            }]
        }
    }"#;

    // Telegram calls fail fast against a closed local port, the endpoints
    // log the error and still report the update as handled.
    fn offline_bot() -> Result<Bot, Box<dyn std::error::Error>> {
        Ok(Bot::new("123456:offline").set_api_url("http://127.0.0.1:1".parse()?))
    }

    fn idle_llm() -> Arc<dyn LlmProvider> {
        let mut mock = MockLlmProvider::new();
        mock.expect_chat_completion()
            .returning(|_| Ok("unused".to_string()));
        Arc::new(mock)
    }

    async fn is_handled(raw_update: &str) -> Result<bool, Box<dyn std::error::Error>> {
        let update: Update = serde_json::from_str(raw_update)?;
        let me: Me = serde_json::from_str(ME_JSON)?;
        let bot = offline_bot()?;
        let llm = idle_llm();

        let outcome = setup_handler()
            .dispatch(dptree::deps![update, bot, llm, me])
            .await;
        Ok(matches!(outcome, ControlFlow::Break(_)))
    }

    #[tokio::test]
    async fn test_known_commands_handled() -> Result<(), Box<dyn std::error::Error>> {
        assert!(is_handled(&text_update("/start")).await?);
        assert!(is_handled(&text_update("/help")).await?);
        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_command_falls_through_to_relay() -> Result<(), Box<dyn std::error::Error>> {
        assert!(is_handled(&text_update("/foo")).await?);
        Ok(())
    }

    #[tokio::test]
    async fn test_plain_text_handled() -> Result<(), Box<dyn std::error::Error>> {
        assert!(is_handled(&text_update("hello")).await?);
        Ok(())
    }

    #[tokio::test]
    async fn test_non_text_message_ignored() -> Result<(), Box<dyn std::error::Error>> {
        assert!(!is_handled(PHOTO_UPDATE).await?);
        Ok(())
    }
}
