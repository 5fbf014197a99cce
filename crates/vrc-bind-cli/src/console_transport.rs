//! Line-oriented stand-in for a chat platform.
//!
//! Each input line is `<user_id> <text>` for a private message or
//! `<user_id>@<channel_id> <text>` for a group message.

use anyhow::{bail, Context, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use vrc_bind_runtime::{BindingRuntime, InboundMessage};

pub(crate) fn parse_console_line(line: &str) -> Result<Option<InboundMessage>> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }

    let mut parts = trimmed.splitn(2, char::is_whitespace);
    let sender = parts.next().unwrap_or_default();
    let content = parts.next().unwrap_or_default().trim();
    let (user_id, channel_id) = match sender.split_once('@') {
        Some((user_id, channel_id)) => (user_id, Some(channel_id)),
        None => (sender, None),
    };
    if user_id.is_empty() {
        bail!("missing user id in '{trimmed}'");
    }
    if channel_id.is_some_and(str::is_empty) {
        bail!("missing channel id after '@' in '{trimmed}'");
    }

    Ok(Some(InboundMessage {
        user_id: user_id.to_string(),
        channel_id: channel_id.map(ToOwned::to_owned),
        content: content.to_string(),
    }))
}

fn render_reply_header(message: &InboundMessage) -> String {
    match message.channel_id.as_deref() {
        Some(channel_id) => format!("[{}@{}]", message.user_id, channel_id),
        None => format!("[{}]", message.user_id),
    }
}

/// Feeds every input line through the runtime until EOF.
pub(crate) async fn run_console_transport<R, W>(
    runtime: &mut BindingRuntime,
    reader: R,
    mut writer: W,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();
    while let Some(line) = lines
        .next_line()
        .await
        .context("failed to read console input")?
    {
        let message = match parse_console_line(&line) {
            Ok(Some(message)) => message,
            Ok(None) => continue,
            Err(error) => {
                eprintln!("skipping console line: {error}");
                continue;
            }
        };

        match runtime.handle_message(&message).await {
            Ok(Some(reply)) => {
                let rendered = format!("{} {}\n", render_reply_header(&message), reply);
                writer
                    .write_all(rendered.as_bytes())
                    .await
                    .context("failed to write console reply")?;
                writer.flush().await.context("failed to flush console")?;
            }
            Ok(None) => {
                tracing::debug!(user_id = %message.user_id, "message not handled");
            }
            Err(error) => {
                tracing::error!(user_id = %message.user_id, "binding runtime fault: {error:#}");
            }
        }
    }
    Ok(())
}
