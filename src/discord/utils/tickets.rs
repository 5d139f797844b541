// © 2024-2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::shared_components::answer_field_index;
use chrono::{DateTime, FixedOffset};
use serde::Serialize;
use std::fmt::Write;
use twilight_model::channel::message::embed::Embed;
use twilight_model::id::Id;
use twilight_model::id::marker::UserMarker;
use twilight_util::builder::embed::EmbedBuilder;
use twilight_validate::embed::EmbedValidationError;

pub const SUMMARY_COLOR: u32 = 0x3498DB;
pub const REVIEW_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Serialize)]
pub struct QuestionAnswer {
	pub question: String,
	pub answer: String,
}

/// The answers to one application form submission
#[derive(Debug, Serialize)]
pub struct SubmittedAnswers {
	pub user_name: String,
	pub user_id: Id<UserMarker>,
	pub submitted_at: DateTime<FixedOffset>,
	pub answers: Vec<QuestionAnswer>,
}

impl SubmittedAnswers {
	/// Pairs each question with the value of its answer field. Fields that don't belong to a question are ignored,
	/// and questions without a field get an empty answer.
	pub fn from_fields<'a>(
		questions: &[String],
		fields: impl IntoIterator<Item = (&'a str, &'a str)>,
		user_name: &str,
		user_id: Id<UserMarker>,
		submitted_at: DateTime<FixedOffset>,
	) -> Self {
		let mut answer_values: Vec<Option<&str>> = vec![None; questions.len()];
		for (custom_id, value) in fields {
			let Some(index) = answer_field_index(custom_id) else {
				continue;
			};
			if let Some(slot) = answer_values.get_mut(index) {
				*slot = Some(value);
			}
		}

		let answers = questions
			.iter()
			.zip(answer_values)
			.map(|(question, answer)| QuestionAnswer {
				question: question.clone(),
				answer: answer.unwrap_or_default().to_string(),
			})
			.collect();

		Self {
			user_name: user_name.to_string(),
			user_id,
			submitted_at,
			answers,
		}
	}

	pub fn summary_description(&self) -> String {
		let mut description = format!(
			"**Name of User:** {}\n**ID of User:** {}\n**Date:** {}\n\n**Answers:**",
			self.user_name,
			self.user_id,
			self.submitted_at.format(REVIEW_DATE_FORMAT)
		);
		for answer in self.answers.iter() {
			let question = answer.question.replace('*', "\\*");
			// Writing to a String can't fail.
			let _ = write!(description, "\n**{}:** {}", question, answer.answer);
		}
		description
	}

	/// Generates the embed sent to the review channel
	pub fn summary_embed(&self) -> Result<Embed, EmbedValidationError> {
		Ok(EmbedBuilder::new()
			.description(self.summary_description())
			.color(SUMMARY_COLOR)
			.validate()?
			.build())
	}
}
