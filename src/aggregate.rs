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

//! Descriptive statistics of the gaps, per region.

use crate::{
	gaps::CandidateGap,
	prelude::{Pct, Region},
	stats,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Statistics of one region's gap sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionStats {
	pub region: Region,
	pub n_polls: usize,
	pub first_poll_date: NaiveDate,
	pub last_poll_date: NaiveDate,
	pub mean_gap: Pct,
	/// Sample standard deviation, missing below two polls.
	pub stdev_gap: Option<Pct>,
}

/// Group gap values by region, keeping the gap order within each region.
pub fn gaps_by_region(gaps: &[CandidateGap]) -> BTreeMap<&str, Vec<Pct>> {
	let mut regions: BTreeMap<&str, Vec<Pct>> = BTreeMap::new();
	for gap in gaps {
		regions.entry(gap.region.as_str()).or_default().push(gap.pct_diff);
	}
	regions
}

/// Summarize gaps per region, sorted by region name.
///
/// Only regions with at least one gap are emitted.
pub fn summarize(gaps: &[CandidateGap]) -> Vec<RegionStats> {
	let mut regions: BTreeMap<&str, Vec<&CandidateGap>> = BTreeMap::new();
	for gap in gaps {
		regions.entry(gap.region.as_str()).or_default().push(gap);
	}

	regions
		.into_iter()
		.filter_map(|(region, gaps)| {
			let first_poll_date = gaps.iter().map(|g| g.start_date).min()?;
			let last_poll_date = gaps.iter().map(|g| g.start_date).max()?;
			let values: Vec<Pct> = gaps.iter().map(|g| g.pct_diff).collect();

			Some(RegionStats {
				region: region.to_string(),
				n_polls: values.len(),
				first_poll_date,
				last_poll_date,
				mean_gap: stats::mean(&values)?,
				stdev_gap: stats::sample_stdev(&values),
			})
		})
		.collect()
}
