// © 2024 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use chrono::FixedOffset;
use kdl::{KdlDocument, KdlValue};
use miette::{IntoDiagnostic, bail, ensure, miette};
use std::fmt;
use std::io::ErrorKind;
use tokio::fs::read_to_string;
use twilight_model::id::Id;
use twilight_model::id::marker::{ChannelMarker, RoleMarker};

/// Environment variable naming the configuration file to read
pub const CONFIG_PATH_VARIABLE: &str = "TICKET_CLERK_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "config.kdl";

const TOKEN_VARIABLE: &str = "DISCORD_TOKEN";
const SETUP_CHANNEL_VARIABLE: &str = "TICKET_SETUP_CHANNEL";
const REVIEW_CHANNEL_VARIABLE: &str = "TICKET_REVIEW_CHANNEL";
const REVIEWER_ROLE_VARIABLE: &str = "TICKET_REVIEWER_ROLE";

// Discord allows at most five rows in a modal, and text input labels are capped at 45 characters.
const MAX_FORM_QUESTIONS: usize = 5;
const MAX_QUESTION_LENGTH: usize = 45;
const MAX_FORM_TITLE_LENGTH: usize = 45;
const MAX_MESSAGE_LENGTH: usize = 2000;

pub const DEFAULT_CATEGORY_NAME: &str = "Tickets";
pub const DEFAULT_REVIEW_UTC_OFFSET_HOURS: i32 = 3;
pub const DEFAULT_SETUP_PROMPT: &str = "Yetkili Başvurunuz İçin Tıklayınız!";
pub const DEFAULT_FORM_TITLE: &str = "Başvuru Formu";
pub const DEFAULT_QUESTIONS: [&str; 5] = [
	"Adınız?",
	"Aktif Olucakmısın??",
	"Yaşınız kaç?",
	"Daha Önceki Deneyimleriniz Nelerdir?",
	"E-posta Adresiniz?",
];

/// Reads the configuration file at the given path, applying environment overrides. A missing file is fine as long
/// as the environment provides every required setting.
pub async fn parse_config(config_path: &str) -> miette::Result<ConfigData> {
	let config_file_contents = match read_to_string(config_path).await {
		Ok(contents) => Some(contents),
		Err(error) if error.kind() == ErrorKind::NotFound => {
			tracing::info!(path = config_path, "No configuration file found; using environment configuration only");
			None
		}
		Err(error) => return Err(error).into_diagnostic(),
	};
	ConfigData::from_sources(config_file_contents.as_deref(), |name| std::env::var(name).ok())
}

#[derive(Debug)]
pub struct ConfigData {
	pub discord: DiscordConfig,
	pub tickets: TicketConfig,
}

pub struct DiscordConfig {
	pub bot_token: String,
}

impl fmt::Debug for DiscordConfig {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("DiscordConfig").field("bot_token", &"<redacted>").finish()
	}
}

#[derive(Debug)]
pub struct TicketConfig {
	/// The channel whose latest message is replaced with the setup message on startup
	pub setup_channel: Id<ChannelMarker>,
	/// The channel application summaries are sent to
	pub review_channel: Id<ChannelMarker>,
	/// The role that can see every ticket channel
	pub reviewer_role: Id<RoleMarker>,
	pub category_name: String,
	pub review_utc_offset: FixedOffset,
	pub setup_prompt: String,
	pub form_title: String,
	pub questions: Vec<String>,
}

impl ConfigData {
	/// Builds the configuration from the contents of a KDL document (if there is one) and an environment lookup.
	/// Environment values take precedence over the document.
	pub fn from_sources(
		config_file_contents: Option<&str>,
		env: impl Fn(&str) -> Option<String>,
	) -> miette::Result<Self> {
		let document: KdlDocument = match config_file_contents {
			Some(contents) => contents.parse()?,
			None => KdlDocument::new(),
		};

		let bot_token = match env(TOKEN_VARIABLE) {
			Some(token) => token,
			None => match string_setting(&document, "discord-token")? {
				Some(token) => token,
				None => bail!(
					"Missing required setting `discord-token` (or the {} environment variable)",
					TOKEN_VARIABLE
				),
			},
		};
		ensure!(!bot_token.trim().is_empty(), "The Discord token is empty");

		let setup_channel = id_setting(&document, "setup-channel", SETUP_CHANNEL_VARIABLE, &env)?;
		let review_channel = id_setting(&document, "review-channel", REVIEW_CHANNEL_VARIABLE, &env)?;
		let reviewer_role = id_setting(&document, "reviewer-role", REVIEWER_ROLE_VARIABLE, &env)?;

		let category_name =
			string_setting(&document, "category-name")?.unwrap_or_else(|| String::from(DEFAULT_CATEGORY_NAME));
		ensure!(!category_name.trim().is_empty(), "The `category-name` setting is empty");

		let offset_hours = match first_argument(&document, "review-utc-offset-hours") {
			Some(value) => {
				let Some(hours) = value.as_integer() else {
					bail!("The `review-utc-offset-hours` setting must be a whole number of hours");
				};
				i32::try_from(hours)
					.map_err(|_| miette!("The `review-utc-offset-hours` setting is out of range: {}", hours))?
			}
			None => DEFAULT_REVIEW_UTC_OFFSET_HOURS,
		};
		ensure!(
			(-23..=23).contains(&offset_hours),
			"The `review-utc-offset-hours` setting must be between -23 and 23 (got {})",
			offset_hours
		);
		let Some(review_utc_offset) = FixedOffset::east_opt(offset_hours * 3600) else {
			bail!("Invalid UTC offset: {} hours", offset_hours);
		};

		let setup_prompt =
			string_setting(&document, "setup-prompt")?.unwrap_or_else(|| String::from(DEFAULT_SETUP_PROMPT));
		let setup_prompt_length = setup_prompt.chars().count();
		ensure!(!setup_prompt.trim().is_empty(), "The `setup-prompt` setting is empty");
		ensure!(
			setup_prompt_length <= MAX_MESSAGE_LENGTH,
			"The `setup-prompt` setting is {} characters long; messages are limited to {}",
			setup_prompt_length,
			MAX_MESSAGE_LENGTH
		);
		let form_title = string_setting(&document, "form-title")?.unwrap_or_else(|| String::from(DEFAULT_FORM_TITLE));
		let form_title_length = form_title.chars().count();
		ensure!(!form_title.trim().is_empty(), "The `form-title` setting is empty");
		ensure!(
			form_title_length <= MAX_FORM_TITLE_LENGTH,
			"The `form-title` setting is {} characters long; form titles are limited to {}",
			form_title_length,
			MAX_FORM_TITLE_LENGTH
		);
		let questions = questions_setting(&document)?;

		Ok(Self {
			discord: DiscordConfig { bot_token },
			tickets: TicketConfig {
				setup_channel,
				review_channel,
				reviewer_role,
				category_name,
				review_utc_offset,
				setup_prompt,
				form_title,
				questions,
			},
		})
	}
}

fn first_argument<'a>(document: &'a KdlDocument, node_name: &str) -> Option<&'a KdlValue> {
	document
		.get(node_name)?
		.entries()
		.iter()
		.find(|entry| entry.name().is_none())
		.map(|entry| entry.value())
}

fn string_setting(document: &KdlDocument, node_name: &str) -> miette::Result<Option<String>> {
	let Some(value) = first_argument(document, node_name) else {
		return Ok(None);
	};
	match value.as_string() {
		Some(value) => Ok(Some(value.to_string())),
		None => bail!("The `{}` setting must be a string", node_name),
	}
}

fn id_setting<T>(
	document: &KdlDocument,
	node_name: &str,
	env_name: &str,
	env: &impl Fn(&str) -> Option<String>,
) -> miette::Result<Id<T>> {
	if let Some(value) = env(env_name) {
		return id_from_text(env_name, &value);
	}
	let Some(value) = first_argument(document, node_name) else {
		bail!(
			"Missing required setting `{}` (or the {} environment variable)",
			node_name,
			env_name
		);
	};
	if let Some(text) = value.as_string() {
		return id_from_text(node_name, text);
	}
	let Some(raw_id) = value.as_integer() else {
		bail!("The `{}` setting must be a Discord ID", node_name);
	};
	let raw_id = u64::try_from(raw_id).map_err(|_| miette!("The `{}` setting is not a valid Discord ID", node_name))?;
	Id::new_checked(raw_id).ok_or_else(|| miette!("The `{}` setting must not be zero", node_name))
}

fn id_from_text<T>(setting_name: &str, text: &str) -> miette::Result<Id<T>> {
	let raw_id: u64 = text
		.trim()
		.parse()
		.map_err(|_| miette!("The `{}` setting is not a valid Discord ID: {:?}", setting_name, text))?;
	Id::new_checked(raw_id).ok_or_else(|| miette!("The `{}` setting must not be zero", setting_name))
}

fn questions_setting(document: &KdlDocument) -> miette::Result<Vec<String>> {
	let Some(node) = document.get("questions") else {
		return Ok(DEFAULT_QUESTIONS.iter().map(|question| question.to_string()).collect());
	};

	let mut questions: Vec<String> = Vec::new();
	for entry in node.entries().iter().filter(|entry| entry.name().is_none()) {
		let Some(question) = entry.value().as_string() else {
			bail!("Every entry in `questions` must be a string");
		};
		ensure!(!question.trim().is_empty(), "Form questions can't be empty");
		ensure!(
			question.chars().count() <= MAX_QUESTION_LENGTH,
			"The question {:?} is longer than {} characters",
			question,
			MAX_QUESTION_LENGTH
		);
		questions.push(question.to_string());
	}
	ensure!(
		(1..=MAX_FORM_QUESTIONS).contains(&questions.len()),
		"The form must have between 1 and {} questions (got {})",
		MAX_FORM_QUESTIONS,
		questions.len()
	);

	Ok(questions)
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::collections::HashMap;

	const FULL_CONFIG: &str = r#"
discord-token "file-token"
setup-channel 1247056515362455634
review-channel "1251544814323896401"
reviewer-role 1251640239039053946
category-name "Applications"
review-utc-offset-hours -5
setup-prompt "Click to apply"
form-title "Staff Application"
questions "Name?" "Age?"
"#;

	fn no_env(_: &str) -> Option<String> {
		None
	}

	#[test]
	fn reads_every_setting_from_the_document() {
		let config = ConfigData::from_sources(Some(FULL_CONFIG), no_env).unwrap();
		assert_eq!(config.discord.bot_token, "file-token");
		assert_eq!(config.tickets.setup_channel.get(), 1247056515362455634);
		assert_eq!(config.tickets.review_channel.get(), 1251544814323896401);
		assert_eq!(config.tickets.reviewer_role.get(), 1251640239039053946);
		assert_eq!(config.tickets.category_name, "Applications");
		assert_eq!(config.tickets.review_utc_offset.local_minus_utc(), -5 * 3600);
		assert_eq!(config.tickets.setup_prompt, "Click to apply");
		assert_eq!(config.tickets.form_title, "Staff Application");
		assert_eq!(config.tickets.questions, vec!["Name?", "Age?"]);
	}

	#[test]
	fn environment_overrides_the_document() {
		let env: HashMap<&str, &str> = HashMap::from([("DISCORD_TOKEN", "env-token"), ("TICKET_REVIEWER_ROLE", "42")]);
		let config =
			ConfigData::from_sources(Some(FULL_CONFIG), |name| env.get(name).map(|value| value.to_string())).unwrap();
		assert_eq!(config.discord.bot_token, "env-token");
		assert_eq!(config.tickets.reviewer_role.get(), 42);
		assert_eq!(config.tickets.setup_channel.get(), 1247056515362455634);
	}

	#[test]
	fn environment_alone_is_enough() {
		let env: HashMap<&str, &str> = HashMap::from([
			("DISCORD_TOKEN", "env-token"),
			("TICKET_SETUP_CHANNEL", "1"),
			("TICKET_REVIEW_CHANNEL", "2"),
			("TICKET_REVIEWER_ROLE", "3"),
		]);
		let config = ConfigData::from_sources(None, |name| env.get(name).map(|value| value.to_string())).unwrap();
		assert_eq!(config.tickets.category_name, DEFAULT_CATEGORY_NAME);
		assert_eq!(config.tickets.review_utc_offset.local_minus_utc(), 3 * 3600);
		assert_eq!(config.tickets.setup_prompt, DEFAULT_SETUP_PROMPT);
		assert_eq!(config.tickets.questions.len(), 5);
		assert_eq!(config.tickets.questions[0], "Adınız?");
	}

	#[test]
	fn missing_token_is_an_error() {
		let document = "setup-channel 1\nreview-channel 2\nreviewer-role 3";
		assert!(ConfigData::from_sources(Some(document), no_env).is_err());
	}

	#[test]
	fn zero_ids_are_rejected() {
		let document = "discord-token \"t\"\nsetup-channel 0\nreview-channel 2\nreviewer-role 3";
		assert!(ConfigData::from_sources(Some(document), no_env).is_err());
	}

	#[test]
	fn too_many_questions_are_rejected() {
		let document = "discord-token \"t\"\nsetup-channel 1\nreview-channel 2\nreviewer-role 3\nquestions \"a\" \"b\" \"c\" \"d\" \"e\" \"f\"";
		assert!(ConfigData::from_sources(Some(document), no_env).is_err());
	}

	#[test]
	fn texts_over_discord_limits_are_rejected() {
		let required = "discord-token \"t\"\nsetup-channel 1\nreview-channel 2\nreviewer-role 3";

		let long_title = format!("{}\nform-title \"{}\"", required, "a".repeat(46));
		assert!(ConfigData::from_sources(Some(long_title.as_str()), no_env).is_err());
		let longest_title = format!("{}\nform-title \"{}\"", required, "ş".repeat(45));
		assert!(ConfigData::from_sources(Some(longest_title.as_str()), no_env).is_ok());

		let long_prompt = format!("{}\nsetup-prompt \"{}\"", required, "a".repeat(2001));
		assert!(ConfigData::from_sources(Some(long_prompt.as_str()), no_env).is_err());
		let empty_prompt = format!("{}\nsetup-prompt \"\"", required);
		assert!(ConfigData::from_sources(Some(empty_prompt.as_str()), no_env).is_err());
	}

	#[test]
	fn out_of_range_offset_is_rejected() {
		let document = "discord-token \"t\"\nsetup-channel 1\nreview-channel 2\nreviewer-role 3\nreview-utc-offset-hours 30";
		assert!(ConfigData::from_sources(Some(document), no_env).is_err());
	}
}
