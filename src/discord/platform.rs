// © 2024-2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use async_trait::async_trait;
use miette::Diagnostic;
use std::fmt;
use std::sync::Arc;
use twilight_cache_inmemory::DefaultInMemoryCache;
use twilight_http::client::Client;
use twilight_http::error::{Error, ErrorType};
use twilight_http::response::{DeserializeBodyError, StatusCode};
use twilight_model::channel::ChannelType;
use twilight_model::channel::message::embed::Embed;
use twilight_model::channel::message::component::Component;
use twilight_model::http::interaction::InteractionResponse;
use twilight_model::channel::permission_overwrite::PermissionOverwrite;
use twilight_model::id::Id;
use twilight_model::id::marker::{
	ApplicationMarker, ChannelMarker, GuildMarker, InteractionMarker, MessageMarker, RoleMarker,
};

/// Error data for operations against the chat platform
#[derive(Debug, Diagnostic)]
pub enum PlatformError {
	Http(Error),
	Deserialize(DeserializeBodyError),
	/// The platform couldn't complete the operation for a reason that didn't come from an HTTP response
	Unavailable(String),
}

impl From<Error> for PlatformError {
	fn from(error: Error) -> Self {
		Self::Http(error)
	}
}

impl From<DeserializeBodyError> for PlatformError {
	fn from(error: DeserializeBodyError) -> Self {
		Self::Deserialize(error)
	}
}

impl std::error::Error for PlatformError {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		match self {
			Self::Http(error) => Some(error),
			Self::Deserialize(error) => Some(error),
			Self::Unavailable(_) => None,
		}
	}
}

impl fmt::Display for PlatformError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Http(error) => write!(f, "HTTP error: {}", error),
			Self::Deserialize(error) => write!(f, "deserialization error: {}", error),
			Self::Unavailable(reason) => write!(f, "platform unavailable: {}", reason),
		}
	}
}

/// A channel to create for a new ticket
#[derive(Clone, Debug)]
pub struct NewTicketChannel {
	pub name: String,
	pub parent: Id<ChannelMarker>,
	pub permission_overwrites: Vec<PermissionOverwrite>,
}

/// A message to post to a channel
#[derive(Clone, Debug, Default)]
pub struct OutgoingMessage {
	pub content: Option<String>,
	pub components: Vec<Component>,
	pub embeds: Vec<Embed>,
}

/// The operations the ticket flow needs from the chat platform.
#[async_trait]
pub trait TicketPlatform: Send + Sync {
	async fn find_category(
		&self,
		guild_id: Id<GuildMarker>,
		name: &str,
	) -> Result<Option<Id<ChannelMarker>>, PlatformError>;

	async fn create_category(&self, guild_id: Id<GuildMarker>, name: &str) -> Result<Id<ChannelMarker>, PlatformError>;

	async fn role_exists(&self, guild_id: Id<GuildMarker>, role_id: Id<RoleMarker>) -> Result<bool, PlatformError>;

	async fn channel_exists(&self, channel_id: Id<ChannelMarker>) -> Result<bool, PlatformError>;

	async fn create_ticket_channel(
		&self,
		guild_id: Id<GuildMarker>,
		channel: &NewTicketChannel,
	) -> Result<Id<ChannelMarker>, PlatformError>;

	async fn delete_channel(&self, channel_id: Id<ChannelMarker>) -> Result<(), PlatformError>;

	async fn send_message(
		&self,
		channel_id: Id<ChannelMarker>,
		message: &OutgoingMessage,
	) -> Result<Id<MessageMarker>, PlatformError>;

	/// Gets the most recent message in the channel, if there is one
	async fn latest_message(&self, channel_id: Id<ChannelMarker>) -> Result<Option<Id<MessageMarker>>, PlatformError>;

	async fn delete_message(
		&self,
		channel_id: Id<ChannelMarker>,
		message_id: Id<MessageMarker>,
	) -> Result<(), PlatformError>;

	async fn respond(
		&self,
		interaction_id: Id<InteractionMarker>,
		interaction_token: &str,
		response: &InteractionResponse,
	) -> Result<(), PlatformError>;

	/// Replaces the content of the initial response to an interaction, such as a deferred response
	async fn update_response(&self, interaction_token: &str, content: &str) -> Result<(), PlatformError>;
}

/// Discord implementation of the platform, backed by the HTTP client and the gateway cache.
pub struct DiscordPlatform {
	http_client: Arc<Client>,
	cache: Arc<DefaultInMemoryCache>,
	application_id: Id<ApplicationMarker>,
}

impl DiscordPlatform {
	pub fn new(
		http_client: Arc<Client>,
		cache: Arc<DefaultInMemoryCache>,
		application_id: Id<ApplicationMarker>,
	) -> Self {
		Self {
			http_client,
			cache,
			application_id,
		}
	}

	fn cached_category(&self, guild_id: Id<GuildMarker>, name: &str) -> Option<Id<ChannelMarker>> {
		let guild_channels = self.cache.guild_channels(guild_id)?;
		guild_channels.iter().copied().find(|channel_id| {
			self.cache.channel(*channel_id).is_some_and(|channel| {
				channel.kind == ChannelType::GuildCategory && channel.name.as_deref() == Some(name)
			})
		})
	}
}

#[async_trait]
impl TicketPlatform for DiscordPlatform {
	async fn find_category(
		&self,
		guild_id: Id<GuildMarker>,
		name: &str,
	) -> Result<Option<Id<ChannelMarker>>, PlatformError> {
		if let Some(category_id) = self.cached_category(guild_id, name) {
			return Ok(Some(category_id));
		}

		let channels = self.http_client.guild_channels(guild_id).await?.models().await?;
		let category = channels
			.into_iter()
			.find(|channel| channel.kind == ChannelType::GuildCategory && channel.name.as_deref() == Some(name));
		Ok(category.map(|channel| channel.id))
	}

	async fn create_category(&self, guild_id: Id<GuildMarker>, name: &str) -> Result<Id<ChannelMarker>, PlatformError> {
		let category = self
			.http_client
			.create_guild_channel(guild_id, name)
			.kind(ChannelType::GuildCategory)
			.await?
			.model()
			.await?;
		Ok(category.id)
	}

	async fn role_exists(&self, guild_id: Id<GuildMarker>, role_id: Id<RoleMarker>) -> Result<bool, PlatformError> {
		let cached = self
			.cache
			.role(role_id)
			.is_some_and(|role| role.guild_id() == guild_id);
		if cached {
			return Ok(true);
		}

		let roles = self.http_client.roles(guild_id).await?.models().await?;
		Ok(roles.iter().any(|role| role.id == role_id))
	}

	async fn channel_exists(&self, channel_id: Id<ChannelMarker>) -> Result<bool, PlatformError> {
		if self.cache.channel(channel_id).is_some() {
			return Ok(true);
		}

		match self.http_client.channel(channel_id).await {
			Ok(_) => Ok(true),
			Err(error) => {
				if let ErrorType::Response {
					status: StatusCode::NOT_FOUND,
					..
				} = error.kind()
				{
					return Ok(false);
				}
				Err(error.into())
			}
		}
	}

	async fn create_ticket_channel(
		&self,
		guild_id: Id<GuildMarker>,
		channel: &NewTicketChannel,
	) -> Result<Id<ChannelMarker>, PlatformError> {
		let created_channel = self
			.http_client
			.create_guild_channel(guild_id, &channel.name)
			.kind(ChannelType::GuildText)
			.parent_id(channel.parent)
			.permission_overwrites(&channel.permission_overwrites)
			.await?
			.model()
			.await?;
		Ok(created_channel.id)
	}

	async fn delete_channel(&self, channel_id: Id<ChannelMarker>) -> Result<(), PlatformError> {
		self.http_client.delete_channel(channel_id).await?;
		Ok(())
	}

	async fn send_message(
		&self,
		channel_id: Id<ChannelMarker>,
		message: &OutgoingMessage,
	) -> Result<Id<MessageMarker>, PlatformError> {
		let mut create_message = self.http_client.create_message(channel_id);
		if let Some(content) = &message.content {
			create_message = create_message.content(content);
		}
		let sent_message = create_message
			.components(&message.components)
			.embeds(&message.embeds)
			.await?
			.model()
			.await?;
		Ok(sent_message.id)
	}

	async fn latest_message(&self, channel_id: Id<ChannelMarker>) -> Result<Option<Id<MessageMarker>>, PlatformError> {
		let messages = self
			.http_client
			.channel_messages(channel_id)
			.limit(1)
			.await?
			.models()
			.await?;
		Ok(messages.first().map(|message| message.id))
	}

	async fn delete_message(
		&self,
		channel_id: Id<ChannelMarker>,
		message_id: Id<MessageMarker>,
	) -> Result<(), PlatformError> {
		self.http_client.delete_message(channel_id, message_id).await?;
		Ok(())
	}

	async fn respond(
		&self,
		interaction_id: Id<InteractionMarker>,
		interaction_token: &str,
		response: &InteractionResponse,
	) -> Result<(), PlatformError> {
		self.http_client
			.interaction(self.application_id)
			.create_response(interaction_id, interaction_token, response)
			.await?;
		Ok(())
	}

	async fn update_response(&self, interaction_token: &str, content: &str) -> Result<(), PlatformError> {
		self.http_client
			.interaction(self.application_id)
			.update_response(interaction_token)
			.content(Some(content))
			.await?;
		Ok(())
	}
}
