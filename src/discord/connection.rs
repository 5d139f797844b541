// © 2024-2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::context::BotContext;
use super::interactions::{InboundInteraction, forget_ticket_channel, route_interaction};
use super::platform::DiscordPlatform;
use super::setup::replace_setup_message;
use crate::config::ConfigData;
use miette::IntoDiagnostic;
use std::sync::Arc;
use twilight_cache_inmemory::{DefaultInMemoryCache, ResourceType};
use twilight_gateway::{EventTypeFlags, Intents, Shard, ShardId, StreamExt};
use twilight_http::client::Client;
use twilight_model::gateway::event::Event;

pub fn set_up_client(config: &ConfigData) -> Arc<Client> {
	Arc::new(Client::new(config.discord.bot_token.clone()))
}

pub async fn run_bot(config: Arc<ConfigData>, http_client: Arc<Client>) -> miette::Result<()> {
	// Interactions arrive regardless of intents; guild data keeps the channel and role cache current.
	let intents = Intents::GUILDS;

	let mut shard = Shard::new(ShardId::ONE, config.discord.bot_token.clone(), intents);

	let cache = Arc::new(
		DefaultInMemoryCache::builder()
			.resource_types(ResourceType::GUILD | ResourceType::CHANNEL | ResourceType::ROLE)
			.build(),
	);

	let application_id = {
		let application_response = http_client.current_user_application().await.into_diagnostic()?;
		application_response.model().await.into_diagnostic()?.id
	};
	let bot_user = http_client
		.current_user()
		.await
		.into_diagnostic()?
		.model()
		.await
		.into_diagnostic()?;
	tracing::info!(user = %bot_user.name, id = %bot_user.id, "Logged in");

	let platform = Arc::new(DiscordPlatform::new(
		Arc::clone(&http_client),
		Arc::clone(&cache),
		application_id,
	));
	let context = Arc::new(BotContext::new(platform, config, bot_user.id));

	while let Some(event) = shard.next_event(EventTypeFlags::all()).await {
		let event = match event {
			Ok(event) => event,
			Err(error) => {
				tracing::warn!(source = ?error, "error receiving event");
				continue;
			}
		};
		cache.update(&event);

		tokio::spawn(handle_event(event, Arc::clone(&context)));
	}

	Ok(())
}

async fn handle_event(event: Event, context: Arc<BotContext>) {
	let event_result = handle_event_route(event, &context).await;
	if let Err(error) = event_result {
		tracing::error!(source = ?error, "An error occurred handling a gateway event");
	}
}

async fn handle_event_route(event: Event, context: &BotContext) -> miette::Result<()> {
	tracing::debug!("Incoming gateway message: {:?}", event);
	match event {
		Event::InteractionCreate(interaction) => {
			if let Some(interaction) = InboundInteraction::from_gateway(&interaction) {
				route_interaction(context, interaction).await?;
			}
		}
		Event::ChannelDelete(channel) => {
			forget_ticket_channel(context, channel.id).await;
		}
		Event::Ready(_) => {
			tracing::info!("Discord gateway is ready");
			replace_setup_message(context).await?;
		}
		_ => (),
	}
	Ok(())
}
