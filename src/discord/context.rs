// © 2024-2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::platform::TicketPlatform;
use crate::config::ConfigData;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use twilight_model::id::Id;
use twilight_model::id::marker::{GuildMarker, UserMarker};
use type_map::concurrent::TypeMap;

/// Everything an event handler needs, constructed once the bot knows who it is
pub struct BotContext {
	pub platform: Arc<dyn TicketPlatform>,
	pub config: Arc<ConfigData>,
	pub bot_user_id: Id<UserMarker>,
	pub bot_state: Arc<RwLock<TypeMap>>,
	/// Per-guild locks held while checking for and creating a ticket channel, so concurrent clicks can't create
	/// duplicate categories or tickets
	ticket_creation_locks: Mutex<HashMap<Id<GuildMarker>, Arc<Mutex<()>>>>,
}

impl BotContext {
	pub fn new(platform: Arc<dyn TicketPlatform>, config: Arc<ConfigData>, bot_user_id: Id<UserMarker>) -> Self {
		Self {
			platform,
			config,
			bot_user_id,
			bot_state: Arc::new(RwLock::new(TypeMap::new())),
			ticket_creation_locks: Mutex::new(HashMap::new()),
		}
	}

	/// Gets the lock serializing ticket creation in a guild
	pub async fn ticket_creation_lock(&self, guild_id: Id<GuildMarker>) -> Arc<Mutex<()>> {
		let mut locks = self.ticket_creation_locks.lock().await;
		Arc::clone(locks.entry(guild_id).or_default())
	}
}
