//! Console mode: one prompt per line, replies printed to stdout.

use bot_core::UserId;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use crate::dispatcher::{InboundMessage, MessageDispatcher, Sender};

const PROMPT: &str = "You: ";

/// Identity every console line is attributed to
pub const CONSOLE_USER: UserId = UserId(1);
pub const CONSOLE_USERNAME: &str = "tester";

/// Interactive loop on stdin/stdout, until EOF
pub async fn run(dispatcher: &MessageDispatcher) -> anyhow::Result<()> {
    let stdin = BufReader::new(tokio::io::stdin());
    run_with(dispatcher, stdin, tokio::io::stdout()).await
}

pub async fn run_with<R, W>(
    dispatcher: &MessageDispatcher,
    input: R,
    mut output: W,
) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();

    loop {
        output.write_all(PROMPT.as_bytes()).await?;
        output.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let reply = dispatcher.respond(&console_message(line)).await;
        output.write_all(reply.as_bytes()).await?;
        output.write_all(b"\n").await?;
    }

    output.write_all(b"\n").await?;
    output.flush().await?;
    tracing::info!("console input closed");
    Ok(())
}

fn console_message(text: &str) -> InboundMessage {
    InboundMessage {
        text: text.into(),
        sender: Sender {
            id: CONSOLE_USER,
            username: CONSOLE_USERNAME.into(),
            locale: None,
        },
        mentions: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use bot_core::{Completion, GenerationOptions, LlmProvider, Message};
    use crypto_assistant::StaticOracle;

    use super::*;
    use crate::state::AppState;

    /// Answers every prompt with the same classification
    struct FixedProvider(&'static str);

    #[async_trait]
    impl LlmProvider for FixedProvider {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn health_check(&self) -> bot_core::Result<bool> {
            Ok(true)
        }

        async fn complete(
            &self,
            _messages: &[Message],
            options: &GenerationOptions,
        ) -> bot_core::Result<Completion> {
            Ok(Completion {
                content: self.0.to_string(),
                model: options.model.clone(),
                usage: None,
                finish_reason: None,
            })
        }
    }

    #[tokio::test]
    async fn test_console_round() {
        let state = AppState::with_parts(
            Arc::new(FixedProvider(
                r#"{"intent":"price_query","coin":"sol","is_chinese":false,"reply":"Checking."}"#,
            )),
            Arc::new(StaticOracle::new()),
            GenerationOptions::default(),
            10,
        );
        let dispatcher = state.dispatcher("price_bot");

        let mut output = Vec::new();
        run_with(&dispatcher, &b"sol?\n\n"[..], &mut output).await.unwrap();

        let output = String::from_utf8(output).unwrap();
        assert!(output.starts_with("You: Checking.\n\n📊 The median price of SOL is $165.88 USD."));
        assert!(output.ends_with("You: You: \n"));

        let history = state.contexts.get(CONSOLE_USER);
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].content, "@tester: sol?");
    }
}
