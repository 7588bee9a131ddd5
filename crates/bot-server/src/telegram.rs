//! Telegram transport
//!
//! Long-polls text messages, converts them for the [`MessageDispatcher`]
//! and replies in the same chat with Markdown formatting.

use std::sync::Arc;

use anyhow::Context as _;
use teloxide::{
    dispatching::{Dispatcher, UpdateFilterExt},
    dptree,
    prelude::*,
    types::{MessageEntityKind, ParseMode, ReplyParameters},
};

use crate::dispatcher::{InboundMessage, MessageDispatcher, Sender};

/// Authenticate the token and return the bot together with its username
pub async fn connect(token: &str) -> anyhow::Result<(Bot, String)> {
    let bot = Bot::new(token);
    let me = bot
        .get_me()
        .await
        .context("failed to authenticate Telegram bot")?;

    let username = me.username.clone().unwrap_or_default();
    tracing::info!(username = %username, id = me.id.0, "✓ Telegram bot authenticated");
    Ok((bot, username))
}

/// Poll until the dispatcher stops
pub async fn run(bot: Bot, dispatcher: Arc<MessageDispatcher>) {
    let handler = Update::filter_message()
        .filter(|msg: Message| is_plain_text(&msg))
        .endpoint(message_handler);

    tracing::info!(bot = dispatcher.bot_username(), "starting Telegram long polling");

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![dispatcher])
        .default_handler(|upd| async move {
            tracing::trace!(update = ?upd.id, "unhandled update");
        })
        .error_handler(LoggingErrorHandler::with_custom_text(
            "error in Telegram handler",
        ))
        .build()
        .dispatch()
        .await;

    tracing::warn!("Telegram dispatcher stopped");
}

async fn message_handler(
    bot: Bot,
    msg: Message,
    dispatcher: Arc<MessageDispatcher>,
) -> ResponseResult<()> {
    let Some(inbound) = inbound_message(&msg) else {
        return Ok(());
    };

    if let Some(reply) = dispatcher.handle(&inbound).await {
        send_reply(&bot, &msg, &reply).await;
    }
    Ok(())
}

/// Text that is not a bot command
pub fn is_plain_text(msg: &Message) -> bool {
    msg.text().is_some_and(|text| !text.starts_with('/'))
}

/// Sender and mention entities of a text message; `None` for anything else
pub fn inbound_message(msg: &Message) -> Option<InboundMessage> {
    let text = msg.text()?;
    let from = msg.from.as_ref()?;

    let mentions = msg
        .parse_entities()
        .unwrap_or_default()
        .iter()
        .filter(|entity| matches!(entity.kind(), MessageEntityKind::Mention))
        .map(|entity| entity.text().to_string())
        .collect();

    Some(InboundMessage {
        text: text.to_string(),
        sender: Sender {
            id: bot_core::UserId(from.id.0),
            username: from
                .username
                .clone()
                .unwrap_or_else(|| from.first_name.clone()),
            locale: from.language_code.clone(),
        },
        mentions,
    })
}

/// Markdown first; Telegram rejects unbalanced markup, so retry as plain text
async fn send_reply(bot: &Bot, msg: &Message, text: &str) {
    let markdown = bot
        .send_message(msg.chat.id, text)
        .parse_mode(ParseMode::Markdown)
        .reply_parameters(ReplyParameters::new(msg.id))
        .await;

    let Err(e) = markdown else {
        return;
    };
    tracing::warn!(
        chat_id = msg.chat.id.0,
        error = %e,
        "markdown reply rejected, resending as plain text"
    );

    if let Err(e) = bot
        .send_message(msg.chat.id, text)
        .reply_parameters(ReplyParameters::new(msg.id))
        .await
    {
        tracing::error!(chat_id = msg.chat.id.0, error = %e, "failed to send reply");
    }
}
