// © 2024-2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::sync::Arc;
use ticket_clerk::config::{CONFIG_PATH_VARIABLE, DEFAULT_CONFIG_PATH, parse_config};
use ticket_clerk::discord::{run_bot, set_up_client};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> miette::Result<()> {
	let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
	tracing_subscriber::fmt().with_env_filter(env_filter).init();

	let config_path = std::env::var(CONFIG_PATH_VARIABLE).unwrap_or_else(|_| String::from(DEFAULT_CONFIG_PATH));
	let config = Arc::new(parse_config(&config_path).await?);
	tracing::debug!(?config, "Loaded configuration");

	let http_client = set_up_client(&config);
	run_bot(config, http_client).await
}
