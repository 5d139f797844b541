// © 2024-2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::context::BotContext;
use super::interactions::{InboundInteraction, InvokingUser, TicketInteraction};
use super::platform::{NewTicketChannel, OutgoingMessage, PlatformError, TicketPlatform};
use crate::config::ConfigData;
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use twilight_model::http::interaction::InteractionResponse;
use twilight_model::id::Id;
use twilight_model::id::marker::{
	ChannelMarker, GuildMarker, InteractionMarker, MessageMarker, RoleMarker, UserMarker,
};

pub const GUILD: Id<GuildMarker> = Id::new(100);
pub const USER: Id<UserMarker> = Id::new(200);
pub const BOT_USER: Id<UserMarker> = Id::new(300);
pub const REVIEWER_ROLE: Id<RoleMarker> = Id::new(400);
pub const SETUP_CHANNEL: Id<ChannelMarker> = Id::new(500);
pub const REVIEW_CHANNEL: Id<ChannelMarker> = Id::new(600);
pub const TICKET_CHANNEL: Id<ChannelMarker> = Id::new(700);

const TEST_CONFIG: &str = r#"
discord-token "test-token"
setup-channel 500
review-channel 600
reviewer-role 400
"#;

/// A call made against the platform, with its arguments
#[derive(Clone, Debug)]
pub enum PlatformCall {
	FindCategory {
		guild: Id<GuildMarker>,
		name: String,
	},
	CreateCategory {
		guild: Id<GuildMarker>,
		name: String,
	},
	RoleExists {
		guild: Id<GuildMarker>,
		role: Id<RoleMarker>,
	},
	ChannelExists {
		channel: Id<ChannelMarker>,
	},
	CreateTicketChannel {
		guild: Id<GuildMarker>,
		channel: NewTicketChannel,
	},
	DeleteChannel {
		channel: Id<ChannelMarker>,
	},
	SendMessage {
		channel: Id<ChannelMarker>,
		message: OutgoingMessage,
	},
	LatestMessage {
		channel: Id<ChannelMarker>,
	},
	DeleteMessage {
		channel: Id<ChannelMarker>,
		message: Id<MessageMarker>,
	},
	Respond {
		interaction: Id<InteractionMarker>,
		response: InteractionResponse,
	},
	UpdateResponse {
		content: String,
	},
}

/// In-memory platform that records every call made against it
pub struct RecordingPlatform {
	calls: Mutex<Vec<PlatformCall>>,
	categories: Mutex<HashMap<(Id<GuildMarker>, String), Id<ChannelMarker>>>,
	roles: HashSet<Id<RoleMarker>>,
	channels: Mutex<HashSet<Id<ChannelMarker>>>,
	messages: Mutex<HashMap<Id<ChannelMarker>, Vec<Id<MessageMarker>>>>,
	fail_message_deletes: bool,
	fail_message_sends: bool,
	fail_responses: bool,
	fail_response_updates: bool,
	next_id: AtomicU64,
}

impl Default for RecordingPlatform {
	fn default() -> Self {
		Self {
			calls: Mutex::new(Vec::new()),
			categories: Mutex::new(HashMap::new()),
			roles: HashSet::new(),
			channels: Mutex::new(HashSet::new()),
			messages: Mutex::new(HashMap::new()),
			fail_message_deletes: false,
			fail_message_sends: false,
			fail_responses: false,
			fail_response_updates: false,
			next_id: AtomicU64::new(10_000),
		}
	}
}

impl RecordingPlatform {
	pub fn with_role(mut self, role_id: Id<RoleMarker>) -> Self {
		self.roles.insert(role_id);
		self
	}

	pub fn with_channel(self, channel_id: Id<ChannelMarker>) -> Self {
		self.channels.lock().unwrap().insert(channel_id);
		self
	}

	pub fn with_category(self, guild_id: Id<GuildMarker>, name: &str, category_id: Id<ChannelMarker>) -> Self {
		self.categories
			.lock()
			.unwrap()
			.insert((guild_id, name.to_string()), category_id);
		self.with_channel(category_id)
	}

	pub fn with_message(self, channel_id: Id<ChannelMarker>, message_id: Id<MessageMarker>) -> Self {
		self.messages
			.lock()
			.unwrap()
			.entry(channel_id)
			.or_default()
			.push(message_id);
		self.with_channel(channel_id)
	}

	pub fn failing_message_deletes(mut self) -> Self {
		self.fail_message_deletes = true;
		self
	}

	pub fn failing_message_sends(mut self) -> Self {
		self.fail_message_sends = true;
		self
	}

	pub fn failing_responses(mut self) -> Self {
		self.fail_responses = true;
		self
	}

	pub fn failing_response_updates(mut self) -> Self {
		self.fail_response_updates = true;
		self
	}

	pub fn calls(&self) -> Vec<PlatformCall> {
		self.calls.lock().unwrap().clone()
	}

	pub fn responses(&self) -> Vec<InteractionResponse> {
		self.calls()
			.into_iter()
			.filter_map(|call| match call {
				PlatformCall::Respond { response, .. } => Some(response),
				_ => None,
			})
			.collect()
	}

	/// The text the user was shown, whether sent directly or by filling in a deferred response
	pub fn replies(&self) -> Vec<String> {
		self.calls()
			.into_iter()
			.filter_map(|call| match call {
				PlatformCall::Respond { response, .. } => response.data.and_then(|data| data.content),
				PlatformCall::UpdateResponse { content } => Some(content),
				_ => None,
			})
			.collect()
	}

	pub fn sent_messages(&self) -> Vec<(Id<ChannelMarker>, OutgoingMessage)> {
		self.calls()
			.into_iter()
			.filter_map(|call| match call {
				PlatformCall::SendMessage { channel, message } => Some((channel, message)),
				_ => None,
			})
			.collect()
	}

	pub fn has_channel(&self, channel_id: Id<ChannelMarker>) -> bool {
		self.channels.lock().unwrap().contains(&channel_id)
	}

	/// Removes a channel without recording a call, as if it was deleted outside the bot
	pub fn remove_channel(&self, channel_id: Id<ChannelMarker>) {
		self.channels.lock().unwrap().remove(&channel_id);
	}

	pub fn messages_in(&self, channel_id: Id<ChannelMarker>) -> Vec<Id<MessageMarker>> {
		self.messages
			.lock()
			.unwrap()
			.get(&channel_id)
			.cloned()
			.unwrap_or_default()
	}

	fn record(&self, call: PlatformCall) {
		self.calls.lock().unwrap().push(call);
	}

	fn new_id<T>(&self) -> Id<T> {
		Id::new(self.next_id.fetch_add(1, Ordering::SeqCst))
	}
}

#[async_trait]
impl TicketPlatform for RecordingPlatform {
	async fn find_category(
		&self,
		guild_id: Id<GuildMarker>,
		name: &str,
	) -> Result<Option<Id<ChannelMarker>>, PlatformError> {
		self.record(PlatformCall::FindCategory {
			guild: guild_id,
			name: name.to_string(),
		});
		let categories = self.categories.lock().unwrap();
		Ok(categories.get(&(guild_id, name.to_string())).copied())
	}

	async fn create_category(&self, guild_id: Id<GuildMarker>, name: &str) -> Result<Id<ChannelMarker>, PlatformError> {
		self.record(PlatformCall::CreateCategory {
			guild: guild_id,
			name: name.to_string(),
		});
		let category_id = self.new_id();
		self.categories
			.lock()
			.unwrap()
			.insert((guild_id, name.to_string()), category_id);
		self.channels.lock().unwrap().insert(category_id);
		Ok(category_id)
	}

	async fn role_exists(&self, guild_id: Id<GuildMarker>, role_id: Id<RoleMarker>) -> Result<bool, PlatformError> {
		self.record(PlatformCall::RoleExists {
			guild: guild_id,
			role: role_id,
		});
		Ok(self.roles.contains(&role_id))
	}

	async fn channel_exists(&self, channel_id: Id<ChannelMarker>) -> Result<bool, PlatformError> {
		self.record(PlatformCall::ChannelExists { channel: channel_id });
		Ok(self.has_channel(channel_id))
	}

	async fn create_ticket_channel(
		&self,
		guild_id: Id<GuildMarker>,
		channel: &NewTicketChannel,
	) -> Result<Id<ChannelMarker>, PlatformError> {
		self.record(PlatformCall::CreateTicketChannel {
			guild: guild_id,
			channel: channel.clone(),
		});
		let channel_id = self.new_id();
		self.channels.lock().unwrap().insert(channel_id);
		Ok(channel_id)
	}

	async fn delete_channel(&self, channel_id: Id<ChannelMarker>) -> Result<(), PlatformError> {
		self.record(PlatformCall::DeleteChannel { channel: channel_id });
		if self.channels.lock().unwrap().remove(&channel_id) {
			Ok(())
		} else {
			Err(PlatformError::Unavailable(format!("unknown channel {}", channel_id)))
		}
	}

	async fn send_message(
		&self,
		channel_id: Id<ChannelMarker>,
		message: &OutgoingMessage,
	) -> Result<Id<MessageMarker>, PlatformError> {
		self.record(PlatformCall::SendMessage {
			channel: channel_id,
			message: message.clone(),
		});
		if self.fail_message_sends {
			return Err(PlatformError::Unavailable(String::from("missing permissions")));
		}
		let message_id = self.new_id();
		self.messages
			.lock()
			.unwrap()
			.entry(channel_id)
			.or_default()
			.push(message_id);
		Ok(message_id)
	}

	async fn latest_message(&self, channel_id: Id<ChannelMarker>) -> Result<Option<Id<MessageMarker>>, PlatformError> {
		self.record(PlatformCall::LatestMessage { channel: channel_id });
		Ok(self.messages_in(channel_id).last().copied())
	}

	async fn delete_message(
		&self,
		channel_id: Id<ChannelMarker>,
		message_id: Id<MessageMarker>,
	) -> Result<(), PlatformError> {
		self.record(PlatformCall::DeleteMessage {
			channel: channel_id,
			message: message_id,
		});
		if self.fail_message_deletes {
			return Err(PlatformError::Unavailable(String::from("missing permissions")));
		}
		if let Some(messages) = self.messages.lock().unwrap().get_mut(&channel_id) {
			messages.retain(|id| *id != message_id);
		}
		Ok(())
	}

	async fn respond(
		&self,
		interaction_id: Id<InteractionMarker>,
		_interaction_token: &str,
		response: &InteractionResponse,
	) -> Result<(), PlatformError> {
		self.record(PlatformCall::Respond {
			interaction: interaction_id,
			response: response.clone(),
		});
		if self.fail_responses {
			return Err(PlatformError::Unavailable(String::from("unknown interaction")));
		}
		Ok(())
	}

	async fn update_response(&self, _interaction_token: &str, content: &str) -> Result<(), PlatformError> {
		self.record(PlatformCall::UpdateResponse {
			content: content.to_string(),
		});
		if self.fail_response_updates {
			return Err(PlatformError::Unavailable(String::from("unknown webhook")));
		}
		Ok(())
	}
}

pub fn test_context(platform: Arc<dyn TicketPlatform>) -> BotContext {
	let config = ConfigData::from_sources(Some(TEST_CONFIG), |_| None).unwrap();
	BotContext::new(platform, Arc::new(config), BOT_USER)
}

/// An interaction from the test user in the test ticket channel
pub fn button_interaction(kind: TicketInteraction) -> InboundInteraction {
	InboundInteraction {
		id: Id::new(1),
		token: String::from("interaction-token"),
		kind,
		guild_id: Some(GUILD),
		channel_id: Some(TICKET_CHANNEL),
		user: Some(InvokingUser {
			id: USER,
			name: String::from("ayse"),
		}),
		fields: Vec::new(),
		received_at: Utc.with_ymd_and_hms(2024, 6, 14, 18, 0, 0).unwrap(),
	}
}
