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

//! Poll feed adapter.
//!
//! Turns the comma separated feed into [`PollObservation`]s. Rows that cannot be parsed are
//! rejected here, so nothing downstream has to re-validate dates or percentages.

use crate::{
	error::Error,
	opt::FeedSource,
	prelude::{LOG_TARGET, NATIONAL_REGION},
	store::{PollObservation, PollStore, PollsterGrade, PopulationType},
};
use chrono::NaiveDate;
use serde::Deserialize;
use std::{fs::File, io::Read};

/// Raw feed row, extra columns are ignored.
#[derive(Debug, Deserialize)]
struct FeedRow {
	question_id: String,
	#[serde(default)]
	state: Option<String>,
	start_date: String,
	end_date: String,
	#[serde(default)]
	cycle: Option<u32>,
	#[serde(default)]
	fte_grade: Option<String>,
	#[serde(default)]
	sample_size: Option<f64>,
	#[serde(default)]
	population: Option<String>,
	candidate_name: String,
	pct: f64,
}

/// Why a feed row was rejected.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum MalformedRow {
	#[error("cannot decode row: {0}")]
	Undecodable(String),
	#[error("empty question_id")]
	MissingQuestionId,
	#[error("empty candidate_name")]
	MissingCandidate,
	#[error("invalid date `{0}`")]
	InvalidDate(String),
	#[error("end_date {end} precedes start_date {start}")]
	EndBeforeStart { start: NaiveDate, end: NaiveDate },
	#[error("pct `{0}` is not a percentage")]
	InvalidPct(f64),
}

/// Result of reading a feed.
#[derive(Debug, Clone, Default)]
pub struct ParsedFeed {
	pub store: PollStore,
	/// Number of rows rejected as malformed.
	pub rejected: usize,
}

/// Load the feed from `source`.
///
/// Remote feeds are fetched exactly once, the whole body is resolved before parsing starts.
pub async fn load_feed(source: &FeedSource) -> Result<ParsedFeed, Error> {
	let parsed = match source {
		FeedSource::Remote(url) => {
			log::info!(target: LOG_TARGET, "Fetching poll feed from {url}");
			let body = reqwest::get(url).await?.error_for_status()?.bytes().await?;
			log::debug!(target: LOG_TARGET, "Fetched {} bytes", body.len());
			parse_feed(body.as_ref())?
		},
		FeedSource::File(path) => {
			log::info!(target: LOG_TARGET, "Reading poll feed from {}", path.display());
			parse_feed(File::open(path)?)?
		},
	};

	log::info!(
		target: LOG_TARGET,
		"Loaded {} poll rows ({} rejected)",
		parsed.store.len(),
		parsed.rejected
	);

	if parsed.store.is_empty() {
		return Err(Error::EmptyFeed);
	}

	Ok(parsed)
}

/// Parse a feed, rejecting malformed rows instead of failing on them.
///
/// Only errors that make the whole input unreadable (I/O, missing header) are returned.
pub fn parse_feed<R: Read>(reader: R) -> Result<ParsedFeed, Error> {
	let mut reader = csv::ReaderBuilder::new()
		.trim(csv::Trim::All)
		.flexible(true)
		.from_reader(reader);
	let headers = reader.headers()?.clone();

	let mut observations = Vec::new();
	let mut rejected = 0;
	let mut record = csv::StringRecord::new();

	while reader.read_record(&mut record)? {
		let line = record.position().map_or(0, |p| p.line());
		let row = record
			.deserialize::<FeedRow>(Some(&headers))
			.map_err(|e| MalformedRow::Undecodable(e.to_string()))
			.and_then(FeedRow::into_observation);

		match row {
			Ok(observation) => observations.push(observation),
			Err(e) => {
				log::warn!(target: LOG_TARGET, "Skipping feed line {line}: {e}");
				rejected += 1;
			},
		}
	}

	Ok(ParsedFeed { store: PollStore::new(observations), rejected })
}

impl FeedRow {
	fn into_observation(self) -> Result<PollObservation, MalformedRow> {
		if self.question_id.is_empty() {
			return Err(MalformedRow::MissingQuestionId);
		}
		if self.candidate_name.is_empty() {
			return Err(MalformedRow::MissingCandidate);
		}

		let start_date = parse_date(&self.start_date)?;
		let end_date = parse_date(&self.end_date)?;
		if end_date < start_date {
			return Err(MalformedRow::EndBeforeStart { start: start_date, end: end_date });
		}

		if !self.pct.is_finite() || !(0.0..=100.0).contains(&self.pct) {
			return Err(MalformedRow::InvalidPct(self.pct));
		}

		let region = self
			.state
			.filter(|s| !s.is_empty())
			.unwrap_or_else(|| NATIONAL_REGION.to_string());

		let sample_size = self
			.sample_size
			.filter(|n| n.is_finite() && *n >= 1.0)
			.map(|n| n.round().min(u32::MAX as f64) as u32);

		Ok(PollObservation {
			question_id: self.question_id,
			region,
			start_date,
			end_date,
			cycle: self.cycle,
			pollster_grade: self.fte_grade.filter(|g| !g.is_empty()).map(PollsterGrade),
			sample_size,
			population_type: self.population.filter(|p| !p.is_empty()).map(PopulationType::from),
			candidate_name: self.candidate_name,
			pct: self.pct,
		})
	}
}

/// Parse a `month/day/year` date, with a two or four digit year. ISO dates are accepted too.
pub fn parse_date(s: &str) -> Result<NaiveDate, MalformedRow> {
	let invalid = || MalformedRow::InvalidDate(s.to_string());

	let format = match s.rsplit_once('/') {
		Some((_, year)) if year.len() <= 2 => "%m/%d/%y",
		Some(_) => "%m/%d/%Y",
		None => "%Y-%m-%d",
	};

	NaiveDate::parse_from_str(s, format).map_err(|_| invalid())
}

#[cfg(test)]
mod tests {
	use super::*;

	const HEADER: &str =
		"question_id,poll_id,state,start_date,end_date,cycle,fte_grade,sample_size,population,candidate_name,pct";

	fn feed(rows: &[&str]) -> String {
		let mut feed = HEADER.to_string();
		for row in rows {
			feed.push('\n');
			feed.push_str(row);
		}
		feed
	}

	#[test]
	fn parse_date_accepts_feed_formats() {
		let expected = NaiveDate::from_ymd_opt(2020, 11, 3).unwrap();
		assert_eq!(parse_date("11/3/20"), Ok(expected));
		assert_eq!(parse_date("11/03/2020"), Ok(expected));
		assert_eq!(parse_date("2020-11-03"), Ok(expected));
		assert_eq!(parse_date("13/3/20"), Err(MalformedRow::InvalidDate("13/3/20".into())));
		assert!(parse_date("yesterday").is_err());
	}

	#[test]
	fn parse_feed_reads_rows() {
		let input = feed(&[
			"1,10,Ohio,10/1/20,10/3/20,2020,A+,800,lv,Biden,48",
			"1,10,Ohio,10/1/20,10/3/20,2020,A+,800,lv,Trump,46.5",
		]);

		let parsed = parse_feed(input.as_bytes()).unwrap();
		assert_eq!(parsed.rejected, 0);
		assert_eq!(parsed.store.len(), 2);

		let first = &parsed.store.as_slice()[0];
		assert_eq!(first.question_id, "1");
		assert_eq!(first.region, "Ohio");
		assert_eq!(first.start_date, NaiveDate::from_ymd_opt(2020, 10, 1).unwrap());
		assert_eq!(first.cycle, Some(2020));
		assert_eq!(first.pollster_grade, Some(PollsterGrade("A+".into())));
		assert_eq!(first.sample_size, Some(800));
		assert_eq!(first.population_type, Some(PopulationType::LikelyVoters));
		assert_eq!(parsed.store.as_slice()[1].pct, 46.5);
	}

	#[test]
	fn parse_feed_fills_missing_optionals() {
		let input = feed(&["7,70,,10/1/20,10/3/20,,,,,Biden,50"]);

		let parsed = parse_feed(input.as_bytes()).unwrap();
		let poll = &parsed.store.as_slice()[0];
		assert_eq!(poll.region, NATIONAL_REGION);
		assert_eq!(poll.cycle, None);
		assert_eq!(poll.pollster_grade, None);
		assert_eq!(poll.sample_size, None);
		assert_eq!(poll.population_type, None);
	}

	#[test]
	fn parse_feed_rejects_malformed_rows() {
		let input = feed(&[
			"1,10,Ohio,10/1/20,10/3/20,2020,A,800,lv,Biden,48",
			"2,20,Ohio,not a date,10/3/20,2020,A,800,lv,Biden,48",
			"3,30,Ohio,10/1/20,10/3/20,2020,A,800,lv,Biden,lots",
			"4,40,Ohio,10/1/20,10/3/20,2020,A,800,lv,Biden,140",
			"5,50,Ohio,10/5/20,10/3/20,2020,A,800,lv,Biden,40",
			",60,Ohio,10/1/20,10/3/20,2020,A,800,lv,Biden,40",
			"7,70,Ohio,10/1/20",
		]);

		let parsed = parse_feed(input.as_bytes()).unwrap();
		assert_eq!(parsed.store.len(), 1);
		assert_eq!(parsed.rejected, 6);
	}

	#[test]
	fn parse_feed_rounds_sample_sizes() {
		let input = feed(&[
			"1,10,Ohio,10/1/20,10/3/20,2020,A,799.6,lv,Biden,48",
			"2,20,Ohio,10/1/20,10/3/20,2020,A,0,lv,Biden,48",
		]);

		let parsed = parse_feed(input.as_bytes()).unwrap();
		assert_eq!(parsed.store.as_slice()[0].sample_size, Some(800));
		assert_eq!(parsed.store.as_slice()[1].sample_size, None);
	}

	#[test]
	fn parse_feed_handles_quoted_fields() {
		let input = "question_id,state,start_date,end_date,cycle,fte_grade,sample_size,population,candidate_name,pct\n\
			1,\"Nebraska CD-2\",10/1/20,10/3/20,2020,B,500,lv,\"Biden, Joseph R.\",51";

		let parsed = parse_feed(input.as_bytes()).unwrap();
		let poll = &parsed.store.as_slice()[0];
		assert_eq!(poll.region, "Nebraska CD-2");
		assert_eq!(poll.candidate_name, "Biden, Joseph R.");
	}
}
