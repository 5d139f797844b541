// © 2024-2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::{InboundInteraction, InvokingUser, TicketFlowError};
use crate::discord::context::BotContext;
use crate::discord::platform::{NewTicketChannel, OutgoingMessage};
use crate::discord::state::tickets::TicketStates;
use crate::discord::utils::permissions::{ticket_channel_name, ticket_channel_overwrites};
use crate::discord::utils::responses::{
	Responder, ticket_already_open_message, ticket_channel_greeting, ticket_created_message,
};
use crate::discord::utils::shared_components::ticket_control_buttons;
use twilight_mention::fmt::Mention;
use twilight_model::id::Id;
use twilight_model::id::marker::{ChannelMarker, GuildMarker};

pub async fn create_ticket(
	context: &BotContext,
	interaction: &InboundInteraction,
	responder: &mut Responder,
) -> Result<(), TicketFlowError> {
	let Some(guild_id) = interaction.guild_id else {
		return Err(TicketFlowError::NotInGuild);
	};
	let Some(user) = &interaction.user else {
		return Err(TicketFlowError::NoInvokingUser);
	};
	let platform = context.platform.as_ref();

	// Creation can queue behind other clicks in the guild, so acknowledge the click first.
	responder.defer(platform).await?;

	let creation_lock = context.ticket_creation_lock(guild_id).await;
	let creation_guard = creation_lock.lock().await;

	if let Some(existing_channel) = existing_ticket(context, guild_id, user).await? {
		drop(creation_guard);
		responder
			.reply(platform, &ticket_already_open_message(existing_channel.mention()))
			.await?;
		return Ok(());
	}

	let channel_id = create_ticket_channel(context, guild_id, user).await?;
	{
		let mut state = context.bot_state.write().await;
		let ticket_states = state.entry::<TicketStates>().or_insert_with(TicketStates::default);
		ticket_states.record_created(channel_id, guild_id, user.id);
	}
	drop(creation_guard);
	tracing::info!(guild = %guild_id, user = %user.id, channel = %channel_id, "Created ticket channel");

	let greeting = OutgoingMessage {
		content: Some(ticket_channel_greeting(user.id.mention())),
		components: vec![ticket_control_buttons()],
		embeds: Vec::new(),
	};
	if let Err(error) = platform.send_message(channel_id, &greeting).await {
		discard_ticket(context, channel_id).await;
		return Err(error.into());
	}

	responder
		.reply(platform, &ticket_created_message(channel_id.mention()))
		.await?;

	Ok(())
}

/// Removes a ticket channel that never got its controls, so the user isn't left with a ticket they can't use or
/// delete
async fn discard_ticket(context: &BotContext, channel_id: Id<ChannelMarker>) {
	if let Err(error) = context.platform.delete_channel(channel_id).await {
		tracing::warn!(source = ?error, channel = %channel_id, "Failed to delete a ticket channel without controls");
	}
	let mut state = context.bot_state.write().await;
	if let Some(ticket_states) = state.get_mut::<TicketStates>() {
		ticket_states.terminate(channel_id);
	}
}

/// Finds the user's open ticket in the guild. A tracked ticket whose channel was deleted some other way is
/// forgotten.
async fn existing_ticket(
	context: &BotContext,
	guild_id: Id<GuildMarker>,
	user: &InvokingUser,
) -> Result<Option<Id<ChannelMarker>>, TicketFlowError> {
	let tracked_channel = {
		let state = context.bot_state.read().await;
		state
			.get::<TicketStates>()
			.and_then(|ticket_states| ticket_states.open_ticket_for(guild_id, user.id))
	};
	let Some(channel_id) = tracked_channel else {
		return Ok(None);
	};

	if context.platform.channel_exists(channel_id).await? {
		return Ok(Some(channel_id));
	}

	let mut state = context.bot_state.write().await;
	if let Some(ticket_states) = state.get_mut::<TicketStates>() {
		ticket_states.terminate(channel_id);
	}
	tracing::debug!(channel = %channel_id, "Forgot a ticket whose channel no longer exists");
	Ok(None)
}

async fn create_ticket_channel(
	context: &BotContext,
	guild_id: Id<GuildMarker>,
	user: &InvokingUser,
) -> Result<Id<ChannelMarker>, TicketFlowError> {
	let platform = context.platform.as_ref();
	let ticket_config = &context.config.tickets;

	let reviewer_role = ticket_config.reviewer_role;
	if !platform.role_exists(guild_id, reviewer_role).await? {
		return Err(TicketFlowError::ReviewerRoleMissing(reviewer_role));
	}

	let category_id = match platform.find_category(guild_id, &ticket_config.category_name).await? {
		Some(category_id) => category_id,
		None => {
			tracing::info!(guild = %guild_id, name = %ticket_config.category_name, "Creating ticket category");
			platform.create_category(guild_id, &ticket_config.category_name).await?
		}
	};

	let new_channel = NewTicketChannel {
		name: ticket_channel_name(&user.name),
		parent: category_id,
		permission_overwrites: ticket_channel_overwrites(guild_id, user.id, context.bot_user_id, reviewer_role),
	};
	Ok(platform.create_ticket_channel(guild_id, &new_channel).await?)
}
