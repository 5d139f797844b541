// © 2024-2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use twilight_model::channel::message::component::{
	ActionRow, Button, ButtonStyle, Component, TextInput, TextInputStyle,
};

pub const CREATE_TICKET_ID: &str = "ticket/create";
pub const START_APPLICATION_ID: &str = "ticket/apply";
pub const DELETE_TICKET_ID: &str = "ticket/delete";
pub const APPLICATION_FORM_ID: &str = "ticket/application";

const ANSWER_FIELD_PREFIX: &str = "answer/";

fn button(custom_id: &str, label: &str, style: ButtonStyle) -> Component {
	Component::Button(Button {
		custom_id: Some(String::from(custom_id)),
		disabled: false,
		emoji: None,
		label: Some(String::from(label)),
		style,
		url: None,
		sku_id: None,
	})
}

/// The button row for the standing setup message
pub fn new_ticket_button() -> Component {
	Component::ActionRow(ActionRow {
		components: vec![button(CREATE_TICKET_ID, "Ticket Oluştur", ButtonStyle::Primary)],
	})
}

/// The button row posted into a newly created ticket channel
pub fn ticket_control_buttons() -> Component {
	Component::ActionRow(ActionRow {
		components: vec![
			button(START_APPLICATION_ID, "Başvuru Butonu", ButtonStyle::Primary),
			button(DELETE_TICKET_ID, "Ticket Sil", ButtonStyle::Danger),
		],
	})
}

pub fn answer_field_id(index: usize) -> String {
	format!("{}{}", ANSWER_FIELD_PREFIX, index)
}

/// Gets the question index from an answer field's custom ID
pub fn answer_field_index(custom_id: &str) -> Option<usize> {
	custom_id.strip_prefix(ANSWER_FIELD_PREFIX)?.parse().ok()
}

/// One short text input row per question, in question order
pub fn application_form_components(questions: &[String]) -> Vec<Component> {
	questions
		.iter()
		.enumerate()
		.map(|(index, question)| {
			let question_input = Component::TextInput(TextInput {
				custom_id: answer_field_id(index),
				label: question.clone(),
				max_length: None,
				min_length: None,
				placeholder: None,
				required: Some(true),
				style: TextInputStyle::Short,
				value: None,
			});
			Component::ActionRow(ActionRow {
				components: vec![question_input],
			})
		})
		.collect()
}
