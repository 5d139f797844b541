// © 2024-2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::discord::platform::{PlatformError, TicketPlatform};
use twilight_model::channel::message::MessageFlags;
use twilight_model::http::interaction::{InteractionResponse, InteractionResponseType};
use twilight_model::id::Id;
use twilight_model::id::marker::InteractionMarker;
use twilight_util::builder::InteractionResponseDataBuilder;

pub const TICKET_ANSWERS_RECEIVED: &str = "Cevaplar alındı ve işlendi!";
pub const TICKET_DELETED: &str = "Ticket Silindi!";
pub const GENERIC_FAILURE: &str = "Bir hata oluştu, lütfen daha sonra tekrar deneyin.";
pub const REVIEWER_ROLE_MISSING: &str = "Ticket oluşturulamadı: yetkili rolü bulunamadı. Lütfen bir yetkiliye bildirin.";
pub const REVIEW_CHANNEL_MISSING: &str = "Cevaplarınız iletilemedi. Lütfen bir yetkiliye bildirin.";
pub const ANSWERS_TOO_LONG: &str = "Cevaplarınız çok uzun olduğu için iletilemedi. Lütfen kısaltıp tekrar deneyin.";

pub fn ticket_created_message(channel_mention: impl std::fmt::Display) -> String {
	format!("Ticket oluşturuldu: {}", channel_mention)
}

pub fn ticket_already_open_message(channel_mention: impl std::fmt::Display) -> String {
	format!("Zaten açık bir ticketınız var: {}", channel_mention)
}

pub fn ticket_channel_greeting(user_mention: impl std::fmt::Display) -> String {
	format!("{} Yetkili Başvurunuz İçin Aşağıdaki Butona", user_mention)
}

/// A message response only the interacting user can see
pub fn ephemeral_message(content: impl Into<String>) -> InteractionResponse {
	let response = InteractionResponseDataBuilder::new()
		.content(content)
		.flags(MessageFlags::EPHEMERAL)
		.build();
	InteractionResponse {
		kind: InteractionResponseType::ChannelMessageWithSource,
		data: Some(response),
	}
}

/// A deferred response only the interacting user will see; the content is filled in later with
/// [`Responder::reply`]
pub fn deferred_ephemeral_message() -> InteractionResponse {
	let response = InteractionResponseDataBuilder::new().flags(MessageFlags::EPHEMERAL).build();
	InteractionResponse {
		kind: InteractionResponseType::DeferredChannelMessageWithSource,
		data: Some(response),
	}
}

/// How far an interaction's response has gotten
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ResponseState {
	Pending,
	/// The user sees a loading state until the response is updated.
	Deferred,
	Sent,
}

/// Sends the response to one interaction, remembering whether it has been sent. Discord accepts only one initial
/// response per interaction.
#[derive(Debug)]
pub struct Responder {
	interaction_id: Id<InteractionMarker>,
	interaction_token: String,
	state: ResponseState,
}

impl Responder {
	pub fn new(interaction_id: Id<InteractionMarker>, interaction_token: String) -> Self {
		Self {
			interaction_id,
			interaction_token,
			state: ResponseState::Pending,
		}
	}

	pub fn state(&self) -> ResponseState {
		self.state
	}

	pub async fn respond(
		&mut self,
		platform: &dyn TicketPlatform,
		response: &InteractionResponse,
	) -> Result<(), PlatformError> {
		platform
			.respond(self.interaction_id, &self.interaction_token, response)
			.await?;
		self.state = ResponseState::Sent;
		Ok(())
	}

	/// Acknowledges the interaction without content, for steps that may not finish within Discord's response window
	pub async fn defer(&mut self, platform: &dyn TicketPlatform) -> Result<(), PlatformError> {
		platform
			.respond(self.interaction_id, &self.interaction_token, &deferred_ephemeral_message())
			.await?;
		self.state = ResponseState::Deferred;
		Ok(())
	}

	/// Sends an ephemeral text reply, filling in the deferred response if there is one
	pub async fn reply(&mut self, platform: &dyn TicketPlatform, content: &str) -> Result<(), PlatformError> {
		match self.state {
			ResponseState::Deferred => {
				platform.update_response(&self.interaction_token, content).await?;
				self.state = ResponseState::Sent;
				Ok(())
			}
			ResponseState::Pending => self.respond(platform, &ephemeral_message(content)).await,
			ResponseState::Sent => Err(PlatformError::Unavailable(String::from(
				"the interaction already has a response",
			))),
		}
	}
}
