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

//! Command line and request configuration of the commands.

use crate::{
	error::Error,
	forecast::ForecastSettings,
	gaps::{GroupAttribute, Matchup},
	prelude::{DEFAULT_OUTPUT_DIR, DEFAULT_SERVER_PORT, Pct, Region},
	stats::Alternative,
	store::{GradeFilter, PollFilter, PopulationType},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// Parsed from the command line, or from the JSON body of a `/forecast` request. No doc comment
// here, clap would use it as the about text of every command flattening these params.
#[derive(Debug, Clone, PartialEq, clap::Parser, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ForecastParams {
	/// Candidate whose lead is positive, e.g. "Biden".
	#[clap(long)]
	pub candidate1: String,

	/// The opponent of candidate1.
	#[clap(long)]
	pub candidate2: String,

	/// Percentage points by which the polls are assumed to overstate candidate1.
	///
	/// Negative values assume candidate1 is understated.
	#[clap(long, default_value_t = 0.0, allow_negative_numbers = true)]
	#[serde(default)]
	pub bias: Pct,

	/// Direction of the one-sided t-test on the bias corrected gaps.
	///
	/// "less" reports the probability that candidate1 leads, "greater" its complement.
	#[clap(long, value_enum, default_value_t = Alternative::Less)]
	#[serde(default)]
	pub alternative: Alternative,

	/// Only use polls of this election cycle, e.g. 2020.
	#[clap(long)]
	#[serde(default)]
	pub cycle: Option<u32>,

	/// Comma separated regions to forecast. All regions are used if omitted.
	///
	/// Polls without a state are filed under "National".
	#[clap(long, value_delimiter = ',')]
	#[serde(default)]
	pub regions: Vec<Region>,

	/// Accepted leading letters of the pollster grade, e.g. "AB". Ungraded polls are dropped
	/// while this is set.
	#[clap(long)]
	#[serde(default)]
	pub grades: Option<GradeFilter>,

	/// Minimum sample size of a poll. Polls without a sample size are dropped while this is set.
	#[clap(long)]
	#[serde(default)]
	pub min_sample_size: Option<u32>,

	/// Only use polls started on or after this date (YYYY-MM-DD).
	#[clap(long)]
	#[serde(default)]
	pub min_start_date: Option<NaiveDate>,

	/// Only use polls of this population, e.g. "lv", "rv", "a" or "v".
	#[clap(long)]
	#[serde(default)]
	pub population: Option<PopulationType>,

	/// Treat rows of one question that differ in these attributes as separate polls.
	#[clap(long, value_enum, value_delimiter = ',')]
	#[serde(default)]
	pub group_by: Vec<GroupAttribute>,
}

impl ForecastParams {
	pub fn matchup(&self) -> Result<Matchup, Error> {
		Matchup::new(self.candidate1.as_str(), self.candidate2.as_str())
	}

	pub fn filter(&self) -> PollFilter {
		PollFilter {
			cycle: self.cycle,
			regions: self
				.regions
				.iter()
				.map(|r| r.trim())
				.filter(|r| !r.is_empty())
				.map(ToString::to_string)
				.collect(),
			grades: self.grades.clone(),
			min_sample_size: self.min_sample_size,
			min_start_date: self.min_start_date,
			population: self.population.clone(),
		}
	}

	/// Validate the parameters and turn them into pipeline settings.
	pub fn settings(&self) -> Result<ForecastSettings, Error> {
		Ok(ForecastSettings::new(self.matchup()?, self.bias)?
			.with_alternative(self.alternative)
			.with_filter(self.filter())
			.with_group_by(self.group_by.clone()))
	}
}

#[derive(Debug, Clone, PartialEq, clap::Parser)]
pub struct ForecastConfig {
	#[clap(flatten)]
	pub params: ForecastParams,

	/// Directory `forecast.json` is written to.
	#[clap(long, default_value = DEFAULT_OUTPUT_DIR)]
	pub output_dir: String,
}

#[derive(Debug, Clone, PartialEq, clap::Parser)]
pub struct GapsConfig {
	#[clap(flatten)]
	pub params: ForecastParams,

	/// Directory `gaps.json` is written to.
	#[clap(long, default_value = DEFAULT_OUTPUT_DIR)]
	pub output_dir: String,
}

#[derive(Debug, Clone, PartialEq, clap::Parser)]
pub struct ServerConfig {
	/// The TCP port the REST API listens on.
	#[clap(long, env = "PORT", default_value_t = DEFAULT_SERVER_PORT)]
	pub port: u16,
}
