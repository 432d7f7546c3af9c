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

//! The forecast pipeline: filter, gaps, region statistics, inference and winner calls.
//!
//! Each stage consumes the output of the previous one and nothing is kept between runs, so a
//! forecast is re-derived from the store whenever the settings change.

use crate::{
	aggregate,
	classify::{self, Winner},
	error::Error,
	gaps::{self, CandidateGap, GroupAttribute, Matchup},
	inference::{self, RegionSummary},
	prelude::{LOG_TARGET, Pct},
	stats::Alternative,
	store::{PollFilter, PollStore},
};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Everything a forecast run depends on besides the polls.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastSettings {
	pub matchup: Matchup,
	pub filter: PollFilter,
	/// Points by which candidate1 is assumed to be overstated by the polls.
	pub candidate1_bias: Pct,
	/// Direction of the one-sided test behind `p_candidate1`.
	pub alternative: Alternative,
	pub group_by: Vec<GroupAttribute>,
}

impl ForecastSettings {
	pub fn new(matchup: Matchup, candidate1_bias: Pct) -> Result<Self, Error> {
		if !candidate1_bias.is_finite() {
			return Err(Error::InvalidParameters(format!(
				"bias must be a finite number, got {candidate1_bias}"
			)));
		}

		Ok(Self {
			matchup,
			filter: PollFilter::default(),
			candidate1_bias,
			alternative: Alternative::default(),
			group_by: Vec::new(),
		})
	}

	pub fn with_alternative(mut self, alternative: Alternative) -> Self {
		self.alternative = alternative;
		self
	}

	pub fn with_filter(mut self, filter: PollFilter) -> Self {
		self.filter = filter;
		self
	}

	pub fn with_group_by(mut self, group_by: Vec<GroupAttribute>) -> Self {
		self.group_by = group_by;
		self
	}
}

#[derive(Debug, Clone, Serialize)]
pub struct ForecastMetadata {
	pub timestamp: DateTime<Utc>,
	pub candidate1: String,
	pub candidate2: String,
	pub bias: Pct,
	pub alternative: Alternative,
	/// Poll rows left after filtering.
	pub polls_considered: usize,
	pub gaps_computed: usize,
	pub regions: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegionForecast {
	#[serde(flatten)]
	pub summary: RegionSummary,
	pub winner: Winner,
}

#[derive(Debug, Clone, Serialize)]
pub struct Forecast {
	pub metadata: ForecastMetadata,
	/// Sorted by region name.
	pub regions: Vec<RegionForecast>,
}

impl Forecast {
	pub fn region(&self, name: &str) -> Option<&RegionForecast> {
		self.regions.iter().find(|r| r.summary.region() == name)
	}
}

/// Filtered polls reduced to one margin per question, in presentation order.
pub fn select_gaps(store: &PollStore, settings: &ForecastSettings) -> (usize, Vec<CandidateGap>) {
	let polls = store.filter(&settings.filter);
	log::info!(
		target: LOG_TARGET,
		"{} of {} poll rows pass the filter",
		polls.len(),
		store.len()
	);

	let gaps = gaps::compute_gaps(polls.iter(), &settings.matchup, &settings.group_by);
	log::info!(
		target: LOG_TARGET,
		"Computed {} gaps between {} and {}",
		gaps.len(),
		settings.matchup.candidate1,
		settings.matchup.candidate2
	);

	(polls.len(), gaps)
}

/// Run the whole pipeline over `store`.
pub fn run(store: &PollStore, settings: &ForecastSettings) -> Forecast {
	let (polls_considered, gaps) = select_gaps(store, settings);
	forecast_gaps(&gaps, polls_considered, settings)
}

/// Summarize, infer and classify precomputed gaps.
pub fn forecast_gaps(
	gaps: &[CandidateGap],
	polls_considered: usize,
	settings: &ForecastSettings,
) -> Forecast {
	let stats = aggregate::summarize(gaps);
	let summaries =
		inference::infer_all(stats, gaps, settings.candidate1_bias, settings.alternative);

	let regions: Vec<RegionForecast> = summaries
		.into_iter()
		.map(|summary| {
			let call = classify::classify(&summary, &settings.matchup);
			match summary.p_candidate1() {
				Some(p) => log::info!(
					target: LOG_TARGET,
					"{}: {} polls, mean gap {:+.2}, P({}) = {:.3} => {}",
					call.region,
					summary.stats.n_polls,
					summary.stats.mean_gap,
					settings.matchup.candidate1,
					p,
					call.winner
				),
				None => log::info!(
					target: LOG_TARGET,
					"{}: {} polls => {}",
					call.region,
					summary.stats.n_polls,
					call.winner
				),
			}
			RegionForecast { summary, winner: call.winner }
		})
		.collect();

	Forecast {
		metadata: ForecastMetadata {
			timestamp: Utc::now(),
			candidate1: settings.matchup.candidate1.clone(),
			candidate2: settings.matchup.candidate2.clone(),
			bias: settings.candidate1_bias,
			alternative: settings.alternative,
			polls_considered,
			gaps_computed: gaps.len(),
			regions: regions.len(),
		},
		regions,
	}
}
