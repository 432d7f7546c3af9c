// Copyright 2021-2024 Parity Technologies (UK) Ltd.
// This file is part of poll-forecaster.

// poll-forecaster is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

// poll-forecaster is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.

// You should have received a copy of the GNU General Public License
// along with poll-forecaster.  If not, see <http://www.gnu.org/licenses/>.

use crate::{error::Error, feed::ParsedFeed, opt::FeedSource};

/// Number of candidates listed by `info`, most polled first.
const TOP_CANDIDATES: usize = 10;

/// Describe the loaded feed, so that candidate and region names can be looked up before
/// running a forecast.
pub fn feed_info(source: &FeedSource, feed: &ParsedFeed) -> serde_json::Value {
	let store = &feed.store;

	let mut candidates: Vec<(&str, usize)> = store.candidates().into_iter().collect();
	candidates.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
	candidates.truncate(TOP_CANDIDATES);

	let (first_poll, last_poll) = store.date_span().unzip();

	serde_json::json!({
		"feed": source.to_string(),
		"rows": store.len(),
		"rejected_rows": feed.rejected,
		"first_poll_date": first_poll,
		"last_poll_date": last_poll,
		"cycles": store.cycles(),
		"populations": store.populations(),
		"regions": store.regions(),
		"candidates": candidates
			.into_iter()
			.map(|(name, rows)| serde_json::json!({ "name": name, "rows": rows }))
			.collect::<Vec<_>>(),
	})
}

pub async fn info_cmd(source: FeedSource, feed: ParsedFeed) -> Result<(), Error> {
	let info = serde_json::to_string_pretty(&feed_info(&source, &feed))?;
	eprintln!("Poll feed:\n{info}");
	Ok(())
}
