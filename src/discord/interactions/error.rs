// © 2024-2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::discord::platform::PlatformError;
use crate::discord::utils::responses::{
	ANSWERS_TOO_LONG, GENERIC_FAILURE, REVIEW_CHANNEL_MISSING, REVIEWER_ROLE_MISSING,
};
use miette::Diagnostic;
use std::fmt;
use twilight_model::id::Id;
use twilight_model::id::marker::{ChannelMarker, RoleMarker};
use twilight_validate::embed::EmbedValidationError;

/// Error data for a step of the ticket flow
#[derive(Debug, Diagnostic)]
pub enum TicketFlowError {
	NotInGuild,
	NotInChannel,
	NoInvokingUser,
	ReviewerRoleMissing(Id<RoleMarker>),
	ReviewChannelMissing(Id<ChannelMarker>),
	SummaryInvalid(EmbedValidationError),
	Platform(PlatformError),
}

impl TicketFlowError {
	/// The message to show the interacting user when the flow fails before they got a response
	pub fn user_message(&self) -> &'static str {
		match self {
			Self::ReviewerRoleMissing(_) => REVIEWER_ROLE_MISSING,
			Self::ReviewChannelMissing(_) => REVIEW_CHANNEL_MISSING,
			Self::SummaryInvalid(_) => ANSWERS_TOO_LONG,
			Self::NotInGuild | Self::NotInChannel | Self::NoInvokingUser | Self::Platform(_) => GENERIC_FAILURE,
		}
	}
}

impl From<PlatformError> for TicketFlowError {
	fn from(error: PlatformError) -> Self {
		Self::Platform(error)
	}
}

impl std::error::Error for TicketFlowError {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		match self {
			Self::SummaryInvalid(error) => Some(error),
			Self::Platform(error) => Some(error),
			_ => None,
		}
	}
}

impl fmt::Display for TicketFlowError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::NotInGuild => write!(f, "ticket interaction used outside of a guild"),
			Self::NotInChannel => write!(f, "ticket interaction has no channel"),
			Self::NoInvokingUser => write!(f, "ticket interaction isn't from a user"),
			Self::ReviewerRoleMissing(role_id) => write!(f, "reviewer role {} doesn't exist", role_id),
			Self::ReviewChannelMissing(channel_id) => write!(f, "review channel {} doesn't exist", channel_id),
			Self::SummaryInvalid(error) => write!(f, "answer summary doesn't fit in an embed: {}", error),
			Self::Platform(error) => write!(f, "{}", error),
		}
	}
}
