// SPDX-FileCopyrightText: 2026 Aco Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `aco shell` command implementation.
//!
//! An interactive REPL with readline history. Plain lines are routed as
//! inbound events from the configured shell user; lines starting with `/`
//! run relay commands.

use std::sync::Arc;

use aco_config::model::AcoConfig;
use aco_core::error::AcoError;
use aco_core::traits::ChannelAdapter;
use aco_core::types::{HealthStatus, InboundEvent};
use aco_gemini::GeminiProvider;
use aco_relay::{
    AddChannelOutcome, Command, CommandReply, Invocation, Relay, RemoveChannelOutcome,
    RouteOutcome,
};
use colored::Colorize;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::{info, warn};

use crate::console::ConsoleChannel;

const HELP: &str = "\
Commands:
  /status                 bot status in this destination
  /enable, /disable       turn the bot on or off (admin)
  /addchannel <id>        answer in a channel (admin)
  /removechannel <id>     stop answering in a channel (admin)
  /channels               list active channels (admin)
  /clearhistory           forget your conversation
  /mystats                your message count
  /stats                  destination message counts
  /leaderboard [n]        most active users
  /setpersonality <text>  set the destination persona (admin)
  /getpersonality         show the destination persona
  /resetpersonality       restore the default persona (admin)
  /help                   this text
  /quit                   leave the shell";

/// Runs the `aco shell` interactive REPL.
pub async fn run_shell(config: AcoConfig) -> Result<(), AcoError> {
    let provider = GeminiProvider::new(&config.gemini)?;

    let mut console = ConsoleChannel::new(config.shell.clone(), config.agent.name.as_str());
    console.connect().await?;
    let mut rl = DefaultEditor::new()
        .map_err(|e| AcoError::Internal(format!("failed to initialize readline: {e}")))?;

    let relay = Relay::new(&config.relay, Arc::new(console), Arc::new(provider));
    let health = relay.health().await;
    if let Some(note) = health_note(&health) {
        warn!(health = ?health, "relay adapters are not healthy");
        println!("{}", note.yellow());
    }

    let shell = &config.shell;
    info!(
        user_id = shell.user_id.as_str(),
        destination_id = shell.destination_id.as_deref().unwrap_or("private"),
        channel_id = shell.channel_id.as_str(),
        "shell started"
    );

    println!("{}", format!("{} shell", config.agent.name).bold().green());
    match &shell.destination_id {
        Some(destination) => println!(
            "Speaking as {} in {}#{}",
            shell.user_id.yellow(),
            destination,
            shell.channel_id
        ),
        None => println!("Speaking as {} in a private channel", shell.user_id.yellow()),
    }
    println!("Type {} for commands, {} to exit.\n", "/help".yellow(), "/quit".yellow());

    let prompt = format!("{}> ", shell.user_id.green());
    loop {
        match rl.readline(&prompt) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(&line);

                match trimmed {
                    "/quit" | "/exit" => break,
                    "/help" => println!("{HELP}"),
                    command if command.starts_with('/') => {
                        run_command(&relay, &config, command).await;
                    }
                    text => {
                        let event = InboundEvent {
                            id: uuid::Uuid::new_v4().to_string(),
                            author_id: shell.user_id.clone(),
                            is_bot_author: false,
                            destination_id: shell.destination_id.clone(),
                            channel_id: shell.channel_id.clone(),
                            text: text.to_string(),
                        };
                        if let Some(note) = silence_note(relay.handle_inbound(&event).await) {
                            println!("{}", note.dimmed());
                        }
                    }
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("{}: {e}", "error".red());
                break;
            }
        }
    }

    relay.shutdown().await;
    Ok(())
}

/// Startup warning for a relay that is not fully healthy.
fn health_note(health: &HealthStatus) -> Option<String> {
    match health {
        HealthStatus::Healthy => None,
        HealthStatus::Degraded(reason) => Some(format!("warning: degraded ({reason})")),
        HealthStatus::Unhealthy(reason) => Some(format!("warning: unhealthy ({reason})")),
    }
}

async fn run_command(relay: &Relay, config: &AcoConfig, line: &str) {
    let result = match Command::parse(line) {
        Ok(command) => {
            relay
                .execute(Invocation {
                    actor_id: config.shell.user_id.clone(),
                    destination_id: config.shell.destination_id.clone(),
                    command,
                })
                .await
        }
        Err(e) => Err(e),
    };

    match result {
        Ok(reply) => println!("{}", render_reply(&reply)),
        Err(AcoError::PermissionDenied { action }) => {
            eprintln!("{}", format!("/{action} requires administrator rights").red());
        }
        Err(e) => eprintln!("{}: {e}", "error".red()),
    }
}

/// Explains why a plain message got no reply.
fn silence_note(outcome: RouteOutcome) -> Option<&'static str> {
    match outcome {
        RouteOutcome::Disabled => Some("(the bot is disabled here, /enable to turn it on)"),
        RouteOutcome::InactiveChannel => {
            Some("(this channel is not active, /addchannel <id> to activate it)")
        }
        _ => None,
    }
}

/// Human-readable text for a command reply.
fn render_reply(reply: &CommandReply) -> String {
    match reply {
        CommandReply::Status(status) => format!(
            "Status: {} | active channels: {}",
            if status.enabled { "enabled" } else { "disabled" },
            status.active_channels
        ),
        CommandReply::EnabledSet(true) => "Bot enabled in this destination.".to_string(),
        CommandReply::EnabledSet(false) => "Bot disabled in this destination.".to_string(),
        CommandReply::ChannelAdded(AddChannelOutcome::Added) => "Channel activated.".to_string(),
        CommandReply::ChannelAdded(AddChannelOutcome::AlreadyActive) => {
            "Channel is already active.".to_string()
        }
        CommandReply::ChannelRemoved(RemoveChannelOutcome::Removed) => {
            "Channel deactivated.".to_string()
        }
        CommandReply::ChannelRemoved(RemoveChannelOutcome::NotActive) => {
            "Channel was not active.".to_string()
        }
        CommandReply::Channels(channels) if channels.is_empty() => {
            "No active channels. Use /addchannel <id>.".to_string()
        }
        CommandReply::Channels(channels) => format!("Active channels: {}", channels.join(", ")),
        CommandReply::HistoryCleared => "Conversation history cleared.".to_string(),
        CommandReply::UserUsage(stats) => match stats.last_message_at {
            Some(at) => format!(
                "Messages: {} | last message: {}",
                stats.count,
                at.format("%Y-%m-%d %H:%M:%S UTC")
            ),
            None => format!("Messages: {}", stats.count),
        },
        CommandReply::DestinationUsage(stats) => format!(
            "Total messages: {} | active users: {}",
            stats.total_messages,
            stats.active_users()
        ),
        CommandReply::Leaderboard(entries) if entries.is_empty() => {
            "No messages recorded yet.".to_string()
        }
        CommandReply::Leaderboard(entries) => entries
            .iter()
            .enumerate()
            .map(|(rank, entry)| format!("{}. {} - {} messages", rank + 1, entry.user_id, entry.count))
            .collect::<Vec<_>>()
            .join("\n"),
        CommandReply::Personality { text, custom } => {
            let kind = if *custom { "custom" } else { "default" };
            format!("Personality ({kind}): {text}")
        }
        CommandReply::PersonalitySet => "Personality updated.".to_string(),
        CommandReply::PersonalityReset => "Personality reset to the default.".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aco_relay::{DestinationStats, DestinationStatus, UserCount};

    #[test]
    fn health_note_only_for_unhealthy_relays() {
        assert_eq!(health_note(&HealthStatus::Healthy), None);
        assert_eq!(
            health_note(&HealthStatus::Degraded("gemini: slow".into())).as_deref(),
            Some("warning: degraded (gemini: slow)")
        );
        assert_eq!(
            health_note(&HealthStatus::Unhealthy("console: closed".into())).as_deref(),
            Some("warning: unhealthy (console: closed)")
        );
    }

    #[test]
    fn status_reply_is_rendered() {
        let reply = CommandReply::Status(DestinationStatus {
            enabled: true,
            active_channels: 2,
        });
        assert_eq!(render_reply(&reply), "Status: enabled | active channels: 2");
    }

    #[test]
    fn leaderboard_is_ranked() {
        let reply = CommandReply::Leaderboard(vec![
            UserCount {
                user_id: "alice".into(),
                count: 3,
            },
            UserCount {
                user_id: "bob".into(),
                count: 1,
            },
        ]);
        assert_eq!(
            render_reply(&reply),
            "1. alice - 3 messages\n2. bob - 1 messages"
        );
    }

    #[test]
    fn destination_stats_show_active_users() {
        let reply = CommandReply::DestinationUsage(DestinationStats {
            total_messages: 4,
            per_user: vec![UserCount {
                user_id: "alice".into(),
                count: 4,
            }],
        });
        assert_eq!(render_reply(&reply), "Total messages: 4 | active users: 1");
    }

    #[test]
    fn gated_outcomes_explain_silence() {
        assert!(silence_note(RouteOutcome::Disabled).is_some());
        assert!(silence_note(RouteOutcome::InactiveChannel).is_some());
        assert!(silence_note(RouteOutcome::Replied { segments: 1 }).is_none());
    }
}
