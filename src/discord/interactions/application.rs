// © 2024-2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::{InboundInteraction, TicketFlowError};
use crate::discord::context::BotContext;
use crate::discord::platform::OutgoingMessage;
use crate::discord::state::tickets::{TicketEvent, TicketStates};
use crate::discord::utils::responses::{Responder, TICKET_ANSWERS_RECEIVED, ephemeral_message};
use crate::discord::utils::shared_components::{APPLICATION_FORM_ID, application_form_components};
use crate::discord::utils::tickets::SubmittedAnswers;
use crate::discord::utils::timestamp::review_time;
use twilight_model::http::interaction::{InteractionResponse, InteractionResponseType};
use twilight_model::id::Id;
use twilight_model::id::marker::{ChannelMarker, GuildMarker};
use twilight_util::builder::InteractionResponseDataBuilder;

pub async fn start_application(
	context: &BotContext,
	interaction: &InboundInteraction,
	responder: &mut Responder,
) -> Result<(), TicketFlowError> {
	let Some(guild_id) = interaction.guild_id else {
		return Err(TicketFlowError::NotInGuild);
	};
	let Some(channel_id) = interaction.channel_id else {
		return Err(TicketFlowError::NotInChannel);
	};
	let ticket_config = &context.config.tickets;

	let response = InteractionResponseDataBuilder::new()
		.custom_id(APPLICATION_FORM_ID)
		.title(ticket_config.form_title.clone())
		.components(application_form_components(&ticket_config.questions))
		.build();
	let response = InteractionResponse {
		kind: InteractionResponseType::Modal,
		data: Some(response),
	};
	responder.respond(context.platform.as_ref(), &response).await?;

	record_event(context, channel_id, guild_id, TicketEvent::FormOpened).await;
	Ok(())
}

pub async fn submit_application(
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
	let ticket_config = &context.config.tickets;
	let platform = context.platform.as_ref();

	let submitted_at = review_time(interaction.received_at, ticket_config.review_utc_offset);
	let answers = SubmittedAnswers::from_fields(
		&ticket_config.questions,
		interaction
			.fields
			.iter()
			.map(|(custom_id, value)| (custom_id.as_str(), value.as_str())),
		&user.name,
		user.id,
		submitted_at,
	);
	match serde_json::to_string_pretty(&answers) {
		Ok(answers_json) => tracing::info!(user = %user.id, "Answers received:\n{}", answers_json),
		Err(error) => tracing::warn!(source = ?error, user = %user.id, "Failed to serialize received answers"),
	}

	let summary_embed = answers.summary_embed().map_err(TicketFlowError::SummaryInvalid)?;

	let review_channel = ticket_config.review_channel;
	if !platform.channel_exists(review_channel).await? {
		return Err(TicketFlowError::ReviewChannelMissing(review_channel));
	}
	let summary_message = OutgoingMessage {
		content: None,
		components: Vec::new(),
		embeds: vec![summary_embed],
	};
	platform.send_message(review_channel, &summary_message).await?;

	responder
		.respond(platform, &ephemeral_message(TICKET_ANSWERS_RECEIVED))
		.await?;

	if let Some(channel_id) = interaction.channel_id {
		record_event(context, channel_id, guild_id, TicketEvent::AnswersSubmitted).await;
	}
	Ok(())
}

async fn record_event(context: &BotContext, channel_id: Id<ChannelMarker>, guild_id: Id<GuildMarker>, event: TicketEvent) {
	let mut state = context.bot_state.write().await;
	let ticket_states = state.entry::<TicketStates>().or_insert_with(TicketStates::default);
	let stage = ticket_states.advance(channel_id, guild_id, event);
	let submissions = ticket_states
		.states
		.get(&channel_id)
		.map_or(0, |ticket| ticket.submissions);
	tracing::debug!(channel = %channel_id, ?stage, submissions, "Ticket moved to a new stage");
}
