// © 2024-2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use twilight_model::id::Id;
use twilight_model::id::marker::MessageMarker;

/// Tracks the setup message posted by this process, so reconnects don't post another one.
#[derive(Debug, Default)]
pub struct SetupMessageState {
	pub message: Option<Id<MessageMarker>>,
}
