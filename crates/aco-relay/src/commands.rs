// SPDX-FileCopyrightText: 2026 Aco Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed command surface with scope and permission checks.
//!
//! Destination-scoped commands are rejected in private channels. Privileged
//! commands ask the transport whether the actor administers the destination
//! before touching any state.

use aco_core::AcoError;
use strum::Display;
use tracing::{debug, info};

use crate::Relay;
use crate::settings::{AddChannelOutcome, DestinationStatus, RemoveChannelOutcome};
use crate::usage::{DestinationStats, UserCount, UserStats};

/// Longest persona override accepted, in characters.
pub const MAX_PERSONALITY_CHARS: usize = 500;

/// A command with already-parsed arguments. Displays as its command name.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Command {
    Status,
    Enable,
    Disable,
    AddChannel { channel_id: String },
    RemoveChannel { channel_id: String },
    #[strum(to_string = "channels")]
    ListChannels,
    ClearHistory,
    #[strum(to_string = "mystats")]
    UserUsage,
    #[strum(to_string = "stats")]
    DestinationUsage,
    Leaderboard { limit: Option<usize> },
    SetPersonality { text: String },
    GetPersonality,
    ResetPersonality,
}

impl Command {
    /// Whether the actor must administer the destination.
    pub fn requires_admin(&self) -> bool {
        matches!(
            self,
            Self::Enable
                | Self::Disable
                | Self::AddChannel { .. }
                | Self::RemoveChannel { .. }
                | Self::ListChannels
                | Self::SetPersonality { .. }
                | Self::ResetPersonality
        )
    }

    /// Whether the command only makes sense inside a group destination.
    pub fn is_destination_scoped(&self) -> bool {
        !matches!(self, Self::ClearHistory | Self::UserUsage)
    }

    /// Parses a command line such as `addchannel general` or
    /// `leaderboard 5`. A leading `/` is accepted.
    pub fn parse(line: &str) -> Result<Self, AcoError> {
        let line = line.trim();
        let line = line.strip_prefix('/').unwrap_or(line);
        let (name, rest) = match line.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (line, ""),
        };

        let required = |what: &str| -> Result<String, AcoError> {
            if rest.is_empty() {
                Err(AcoError::InvalidCommand(format!("`{name}` requires {what}")))
            } else {
                Ok(rest.to_string())
            }
        };

        let command = match name.to_ascii_lowercase().as_str() {
            "status" => Self::Status,
            "enable" => Self::Enable,
            "disable" => Self::Disable,
            "addchannel" => Self::AddChannel {
                channel_id: required("a channel")?,
            },
            "removechannel" => Self::RemoveChannel {
                channel_id: required("a channel")?,
            },
            "channels" => Self::ListChannels,
            "clearhistory" => Self::ClearHistory,
            "mystats" => Self::UserUsage,
            "stats" => Self::DestinationUsage,
            "leaderboard" if rest.is_empty() => Self::Leaderboard { limit: None },
            "leaderboard" => {
                let limit = rest.parse::<usize>().map_err(|_| {
                    AcoError::InvalidCommand(format!("invalid leaderboard size `{rest}`"))
                })?;
                Self::Leaderboard { limit: Some(limit) }
            }
            "setpersonality" => Self::SetPersonality {
                text: required("the personality text")?,
            },
            "getpersonality" => Self::GetPersonality,
            "resetpersonality" => Self::ResetPersonality,
            other => {
                return Err(AcoError::InvalidCommand(format!(
                    "unknown command `{other}`"
                )));
            }
        };
        Ok(command)
    }
}

/// Who runs a command, and where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub actor_id: String,
    /// `None` when invoked from a private channel.
    pub destination_id: Option<String>,
    pub command: Command,
}

/// Typed result of a command. Rendering is left to the shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandReply {
    Status(DestinationStatus),
    EnabledSet(bool),
    ChannelAdded(AddChannelOutcome),
    ChannelRemoved(RemoveChannelOutcome),
    Channels(Vec<String>),
    HistoryCleared,
    UserUsage(UserStats),
    DestinationUsage(DestinationStats),
    Leaderboard(Vec<UserCount>),
    Personality { text: String, custom: bool },
    PersonalitySet,
    PersonalityReset,
}

impl Relay {
    /// Runs one command on behalf of `invocation.actor_id`.
    pub async fn execute(&self, invocation: Invocation) -> Result<CommandReply, AcoError> {
        let Invocation {
            actor_id,
            destination_id,
            command,
        } = invocation;
        let destination_id = destination_id.as_deref();

        debug!(actor_id = actor_id.as_str(), command = %command, "executing command");
        let destination = self.authorize(&command, &actor_id, destination_id).await?;

        let reply = match &command {
            Command::ClearHistory => {
                self.clear_history(&actor_id);
                CommandReply::HistoryCleared
            }
            Command::UserUsage => CommandReply::UserUsage(self.user_usage(&actor_id)),
            Command::Status => CommandReply::Status(self.status(destination)),
            Command::Enable | Command::Disable => {
                let enabled = command == Command::Enable;
                self.set_enabled(destination, enabled);
                info!(destination_id = destination, enabled, "destination toggled");
                CommandReply::EnabledSet(enabled)
            }
            Command::AddChannel { channel_id } => {
                CommandReply::ChannelAdded(self.add_channel(destination, channel_id))
            }
            Command::RemoveChannel { channel_id } => {
                CommandReply::ChannelRemoved(self.remove_channel(destination, channel_id))
            }
            Command::ListChannels => CommandReply::Channels(self.list_channels(destination)),
            Command::DestinationUsage => {
                CommandReply::DestinationUsage(self.destination_usage(destination))
            }
            Command::Leaderboard { limit } => {
                let limit = limit.unwrap_or(self.leaderboard_size());
                CommandReply::Leaderboard(self.top_users(destination, limit))
            }
            Command::SetPersonality { text } => {
                validate_personality(text)?;
                self.set_personality(destination, text.as_str());
                info!(destination_id = destination, "personality override set");
                CommandReply::PersonalitySet
            }
            Command::GetPersonality => CommandReply::Personality {
                text: self.personality(destination),
                custom: self.has_custom_personality(destination),
            },
            Command::ResetPersonality => {
                self.reset_personality(destination);
                CommandReply::PersonalityReset
            }
        };
        Ok(reply)
    }

    /// Checks scope and, for privileged commands, administrator rights.
    /// Returns the destination the command applies to, empty for personal
    /// commands run in a private channel.
    async fn authorize<'a>(
        &self,
        command: &Command,
        actor_id: &str,
        destination_id: Option<&'a str>,
    ) -> Result<&'a str, AcoError> {
        let destination = match destination_id {
            Some(destination) => destination,
            None if command.is_destination_scoped() => {
                return Err(AcoError::InvalidCommand(format!(
                    "`{command}` is only available in a server"
                )));
            }
            // Personal commands never read the destination.
            None => "",
        };

        if command.requires_admin() && !self.channel().is_admin(destination, actor_id).await? {
            return Err(AcoError::PermissionDenied {
                action: command.to_string(),
            });
        }
        Ok(destination)
    }
}

fn validate_personality(text: &str) -> Result<(), AcoError> {
    if text.trim().is_empty() {
        return Err(AcoError::InvalidCommand(
            "personality text must not be empty".to_string(),
        ));
    }
    let chars = text.chars().count();
    if chars > MAX_PERSONALITY_CHARS {
        return Err(AcoError::InvalidCommand(format!(
            "personality text is {chars} characters, the maximum is {MAX_PERSONALITY_CHARS}"
        )));
    }
    Ok(())
}
