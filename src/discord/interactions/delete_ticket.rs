// © 2024-2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::{InboundInteraction, TicketFlowError};
use crate::discord::context::BotContext;
use crate::discord::state::tickets::{TicketState, TicketStates};
use crate::discord::utils::responses::{Responder, TICKET_DELETED, ephemeral_message};
use twilight_model::id::Id;
use twilight_model::id::marker::ChannelMarker;

pub async fn delete_ticket(
	context: &BotContext,
	interaction: &InboundInteraction,
	responder: &mut Responder,
) -> Result<(), TicketFlowError> {
	let Some(channel_id) = interaction.channel_id else {
		return Err(TicketFlowError::NotInChannel);
	};
	let platform = context.platform.as_ref();

	responder.respond(platform, &ephemeral_message(TICKET_DELETED)).await?;
	platform.delete_channel(channel_id).await?;

	let owner = forget_ticket_channel(context, channel_id).await.and_then(|ticket| ticket.owner);
	tracing::info!(channel = %channel_id, ?owner, "Deleted ticket channel");

	Ok(())
}

/// Drops the ticket tracked for a channel that no longer exists. Returns the dropped ticket, if there was one.
pub async fn forget_ticket_channel(context: &BotContext, channel_id: Id<ChannelMarker>) -> Option<TicketState> {
	let mut state = context.bot_state.write().await;
	let removed = state
		.get_mut::<TicketStates>()
		.and_then(|ticket_states| ticket_states.terminate(channel_id));
	if removed.is_some() {
		tracing::debug!(channel = %channel_id, "Forgot the ticket for a deleted channel");
	}
	removed
}
