// © 2024-2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::context::BotContext;
use super::platform::{OutgoingMessage, PlatformError, TicketPlatform};
use super::state::setup::SetupMessageState;
use super::utils::shared_components::new_ticket_button;
use twilight_model::id::Id;
use twilight_model::id::marker::{ChannelMarker, MessageMarker};

/// Replaces the most recent message in the setup channel with a fresh setup message. Does nothing if this process
/// already posted one. Returns the ID of the posted message.
pub async fn replace_setup_message(context: &BotContext) -> Result<Option<Id<MessageMarker>>, PlatformError> {
	{
		let state = context.bot_state.read().await;
		if let Some(message_id) = state.get::<SetupMessageState>().and_then(|setup| setup.message) {
			tracing::debug!(message = %message_id, "Setup message was already posted");
			return Ok(None);
		}
	}

	let platform = context.platform.as_ref();
	let ticket_config = &context.config.tickets;
	let setup_channel = ticket_config.setup_channel;

	tracing::info!(channel = %setup_channel, "Replacing the last message in the setup channel");
	clear_latest_message(platform, setup_channel).await;

	let setup_message = OutgoingMessage {
		content: Some(ticket_config.setup_prompt.clone()),
		components: vec![new_ticket_button()],
		embeds: Vec::new(),
	};
	let message_id = platform.send_message(setup_channel, &setup_message).await?;

	let mut state = context.bot_state.write().await;
	let setup_state = state
		.entry::<SetupMessageState>()
		.or_insert_with(SetupMessageState::default);
	setup_state.message = Some(message_id);

	Ok(Some(message_id))
}

async fn clear_latest_message(platform: &dyn TicketPlatform, channel_id: Id<ChannelMarker>) {
	let message_id = match platform.latest_message(channel_id).await {
		Ok(Some(message_id)) => message_id,
		Ok(None) => {
			tracing::debug!(channel = %channel_id, "Setup channel has no messages to delete");
			return;
		}
		Err(error) => {
			tracing::warn!(source = ?error, channel = %channel_id, "Failed to get the last setup channel message");
			return;
		}
	};

	match platform.delete_message(channel_id, message_id).await {
		Ok(()) => tracing::info!(message = %message_id, "Last message deleted"),
		Err(error) => tracing::warn!(source = ?error, message = %message_id, "Failed to delete the last message"),
	}
}
