// © 2024-2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::collections::HashMap;
use twilight_model::id::Id;
use twilight_model::id::marker::{ChannelMarker, GuildMarker, UserMarker};

/// Where a ticket is in its lifecycle. A terminated ticket has no stage; its state is removed.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TicketStage {
	ChannelCreated,
	FormDisplayed,
	AnswersRecorded,
}

/// Things that move a live ticket between stages
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TicketEvent {
	FormOpened,
	AnswersSubmitted,
}

impl TicketEvent {
	/// The stage a live ticket is in after this event. The form can be reopened and resubmitted from any stage.
	pub fn resulting_stage(self) -> TicketStage {
		match self {
			Self::FormOpened => TicketStage::FormDisplayed,
			Self::AnswersSubmitted => TicketStage::AnswersRecorded,
		}
	}
}

#[derive(Debug)]
pub struct TicketState {
	pub guild: Id<GuildMarker>,
	/// The user the ticket was created for. Unknown for channels the bot didn't create in this process.
	pub owner: Option<Id<UserMarker>>,
	pub stage: TicketStage,
	pub submissions: u32,
}

#[derive(Debug, Default)]
pub struct TicketStates {
	pub states: HashMap<Id<ChannelMarker>, TicketState>,
}

impl TicketStates {
	/// Finds the open ticket channel for the given user in the given guild
	pub fn open_ticket_for(&self, guild: Id<GuildMarker>, user: Id<UserMarker>) -> Option<Id<ChannelMarker>> {
		self.states
			.iter()
			.find(|(_, state)| state.guild == guild && state.owner == Some(user))
			.map(|(channel_id, _)| *channel_id)
	}

	pub fn record_created(&mut self, channel: Id<ChannelMarker>, guild: Id<GuildMarker>, owner: Id<UserMarker>) {
		let state = TicketState {
			guild,
			owner: Some(owner),
			stage: TicketStage::ChannelCreated,
			submissions: 0,
		};
		self.states.insert(channel, state);
	}

	/// Moves the ticket for a channel to its next stage, returning the new stage. Channels that aren't tracked (for
	/// example, ones created before a restart) are adopted with an unknown owner.
	pub fn advance(&mut self, channel: Id<ChannelMarker>, guild: Id<GuildMarker>, event: TicketEvent) -> TicketStage {
		let state = self.states.entry(channel).or_insert_with(|| TicketState {
			guild,
			owner: None,
			stage: TicketStage::ChannelCreated,
			submissions: 0,
		});
		state.stage = event.resulting_stage();
		if event == TicketEvent::AnswersSubmitted {
			state.submissions += 1;
		}
		state.stage
	}

	pub fn terminate(&mut self, channel: Id<ChannelMarker>) -> Option<TicketState> {
		self.states.remove(&channel)
	}
}
