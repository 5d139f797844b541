// © 2024-2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use twilight_util::snowflake::Snowflake;

/// Gets the timestamp from the ID snowflake. If any failures occur in the conversion, returns `None`.
pub fn datetime_from_id(id: impl Snowflake) -> Option<DateTime<Utc>> {
	let timestamp = id.timestamp();
	Utc.timestamp_millis_opt(timestamp).single()
}

/// Shifts a time onto the fixed clock used for review summaries
pub fn review_time(time: DateTime<Utc>, offset: FixedOffset) -> DateTime<FixedOffset> {
	time.with_timezone(&offset)
}
