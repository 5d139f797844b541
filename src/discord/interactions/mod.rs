// © 2024-2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::context::BotContext;
use super::utils::responses::{Responder, ResponseState};
use super::utils::shared_components::{
	APPLICATION_FORM_ID, CREATE_TICKET_ID, DELETE_TICKET_ID, START_APPLICATION_ID,
};
use super::utils::timestamp::datetime_from_id;
use chrono::{DateTime, Utc};
use twilight_model::application::interaction::{Interaction, InteractionData};
use twilight_model::channel::message::component::ComponentType;
use twilight_model::id::Id;
use twilight_model::id::marker::{ChannelMarker, GuildMarker, InteractionMarker, UserMarker};

mod application;
mod create_ticket;
mod delete_ticket;
mod error;

pub use delete_ticket::forget_ticket_channel;
pub use error::TicketFlowError;

/// What kind of control an interaction came from
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum InteractionSource {
	Button,
	Modal,
	/// Any other message component, such as a select menu
	OtherComponent,
}

/// The interactions the ticket flow recognizes
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TicketInteraction {
	CreateTicket,
	StartApplication,
	DeleteTicket,
	SubmitApplication,
	Unrecognized { custom_id: String },
}

impl TicketInteraction {
	pub fn from_custom_id(source: InteractionSource, custom_id: &str) -> Self {
		match (source, custom_id) {
			(InteractionSource::Button, CREATE_TICKET_ID) => Self::CreateTicket,
			(InteractionSource::Button, START_APPLICATION_ID) => Self::StartApplication,
			(InteractionSource::Button, DELETE_TICKET_ID) => Self::DeleteTicket,
			(InteractionSource::Modal, APPLICATION_FORM_ID) => Self::SubmitApplication,
			_ => Self::Unrecognized {
				custom_id: custom_id.to_string(),
			},
		}
	}
}

#[derive(Clone, Debug)]
pub struct InvokingUser {
	pub id: Id<UserMarker>,
	pub name: String,
}

/// The parts of a gateway interaction the ticket flow uses
#[derive(Clone, Debug)]
pub struct InboundInteraction {
	pub id: Id<InteractionMarker>,
	pub token: String,
	pub kind: TicketInteraction,
	pub guild_id: Option<Id<GuildMarker>>,
	pub channel_id: Option<Id<ChannelMarker>>,
	pub user: Option<InvokingUser>,
	/// Submitted modal fields as (custom ID, value) pairs, in the order they were submitted
	pub fields: Vec<(String, String)>,
	pub received_at: DateTime<Utc>,
}

impl InboundInteraction {
	/// Extracts the ticket flow's view of a gateway interaction. Returns `None` for interactions that aren't
	/// component or modal interactions.
	pub fn from_gateway(interaction: &Interaction) -> Option<Self> {
		let (source, custom_id, fields) = match &interaction.data {
			Some(InteractionData::MessageComponent(component_data)) => {
				let source = if component_data.component_type == ComponentType::Button {
					InteractionSource::Button
				} else {
					InteractionSource::OtherComponent
				};
				(source, component_data.custom_id.as_str(), Vec::new())
			}
			Some(InteractionData::ModalSubmit(modal_data)) => {
				let fields: Vec<(String, String)> = modal_data
					.components
					.iter()
					.flat_map(|row| row.components.iter())
					.map(|component| (component.custom_id.clone(), component.value.clone().unwrap_or_default()))
					.collect();
				(InteractionSource::Modal, modal_data.custom_id.as_str(), fields)
			}
			_ => return None,
		};

		let user = interaction
			.member
			.as_ref()
			.and_then(|member| member.user.as_ref())
			.or(interaction.user.as_ref())
			.map(|user| InvokingUser {
				id: user.id,
				name: user.name.clone(),
			});

		Some(Self {
			id: interaction.id,
			token: interaction.token.clone(),
			kind: TicketInteraction::from_custom_id(source, custom_id),
			guild_id: interaction.guild_id,
			channel_id: interaction.channel.as_ref().map(|channel| channel.id),
			user,
			fields,
			received_at: datetime_from_id(interaction.id).unwrap_or_else(Utc::now),
		})
	}
}

/// Runs the ticket flow step for an interaction. If the step fails before the user got a response, they're told it
/// failed; the error is then returned for logging.
pub async fn route_interaction(context: &BotContext, interaction: InboundInteraction) -> miette::Result<()> {
	let mut responder = Responder::new(interaction.id, interaction.token.clone());

	let result = match &interaction.kind {
		TicketInteraction::CreateTicket => create_ticket::create_ticket(context, &interaction, &mut responder).await,
		TicketInteraction::StartApplication => {
			application::start_application(context, &interaction, &mut responder).await
		}
		TicketInteraction::SubmitApplication => {
			application::submit_application(context, &interaction, &mut responder).await
		}
		TicketInteraction::DeleteTicket => delete_ticket::delete_ticket(context, &interaction, &mut responder).await,
		TicketInteraction::Unrecognized { custom_id } => {
			tracing::debug!(custom_id = %custom_id, "Ignoring interaction with an unrecognized custom ID");
			return Ok(());
		}
	};

	let Err(error) = result else {
		return Ok(());
	};
	if responder.state() != ResponseState::Sent {
		if let Err(response_error) = responder.reply(context.platform.as_ref(), error.user_message()).await {
			tracing::warn!(source = ?response_error, "Failed to tell the user a ticket interaction failed");
		}
	}
	Err(error.into())
}
