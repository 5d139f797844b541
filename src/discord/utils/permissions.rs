// © 2024-2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use twilight_model::guild::Permissions;
use twilight_model::channel::permission_overwrite::{PermissionOverwrite, PermissionOverwriteType};
use twilight_model::id::Id;
use twilight_model::id::marker::{GenericMarker, GuildMarker, RoleMarker, UserMarker};

/// Permissions granted to everyone who participates in a ticket channel
pub fn ticket_participant_permissions() -> Permissions {
	Permissions::VIEW_CHANNEL | Permissions::SEND_MESSAGES
}

/// Builds the overwrites for a ticket channel: hidden from everyone, visible to the ticket's user, the bot, and the
/// reviewer role.
pub fn ticket_channel_overwrites(
	guild_id: Id<GuildMarker>,
	ticket_user_id: Id<UserMarker>,
	bot_user_id: Id<UserMarker>,
	reviewer_role_id: Id<RoleMarker>,
) -> Vec<PermissionOverwrite> {
	let participant = |id: Id<GenericMarker>, kind: PermissionOverwriteType| PermissionOverwrite {
		allow: ticket_participant_permissions(),
		deny: Permissions::empty(),
		id,
		kind,
	};

	vec![
		// The @everyone role shares the guild's ID.
		PermissionOverwrite {
			allow: Permissions::empty(),
			deny: Permissions::VIEW_CHANNEL,
			id: guild_id.cast(),
			kind: PermissionOverwriteType::Role,
		},
		participant(ticket_user_id.cast(), PermissionOverwriteType::Member),
		participant(bot_user_id.cast(), PermissionOverwriteType::Member),
		participant(reviewer_role_id.cast(), PermissionOverwriteType::Role),
	]
}

/// Turns a user's name into the name of their ticket channel
pub fn ticket_channel_name(user_name: &str) -> String {
	// Discord limits channel names to 100 characters.
	format!("ticket-{}", user_name).chars().take(100).collect()
}
