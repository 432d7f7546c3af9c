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

//! Bias corrected win probabilities.
//!
//! Every gap of a region is shifted by the assumed polling bias of candidate1 and a one-sample
//! t-test against a zero mean is run on the shifted sample. `p_candidate1` is the one-sided
//! p-value in the requested direction. With the default alternative "less" that is `F(t)`, the
//! mass a Student's t with `n - 1` degrees of freedom puts below the observed statistic, i.e. the
//! probability that candidate1 leads. "greater" yields `1 - F(t)`.
//!
//! Inference never fails the pipeline. Regions with fewer than two polls, or where the test
//! cannot be computed, get no inference at all, which is different from a 50% call.

use crate::{
	aggregate::{RegionStats, gaps_by_region},
	gaps::CandidateGap,
	prelude::{LOG_TARGET, Pct},
	stats::{self, Alternative, StatsError},
};
use serde::{Deserialize, Serialize};

/// Outcome of the bias corrected test of one region.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Inference {
	/// One-sided p-value of the shifted sample. Under the "less" alternative, the probability
	/// that candidate1's true gap exceeds the bias correction.
	pub p_candidate1: f64,
	pub t_statistic: f64,
	pub degrees_of_freedom: f64,
}

/// Region statistics together with the bias corrected inference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionSummary {
	#[serde(flatten)]
	pub stats: RegionStats,
	/// Assumed systematic overstatement of candidate1, in percentage points.
	pub bias_correction: Pct,
	/// `None` when the region has too little (or too uniform) data.
	pub inference: Option<Inference>,
}

impl RegionSummary {
	pub fn region(&self) -> &str {
		&self.stats.region
	}

	pub fn p_candidate1(&self) -> Option<f64> {
		self.inference.map(|i| i.p_candidate1)
	}

	pub fn t_statistic(&self) -> Option<f64> {
		self.inference.map(|i| i.t_statistic)
	}
}

/// Probability that candidate1 leads once `candidate1_bias` is taken off every gap, for
/// [`Alternative::Less`].
pub fn win_probability(
	gaps: &[Pct],
	candidate1_bias: Pct,
	alternative: Alternative,
) -> Result<Inference, StatsError> {
	let shifted: Vec<Pct> = gaps.iter().map(|gap| gap - candidate1_bias).collect();
	let test = stats::one_sample_t_test(&shifted, 0.0, alternative)?;

	Ok(Inference {
		p_candidate1: test.p_value,
		t_statistic: test.t_statistic,
		degrees_of_freedom: test.degrees_of_freedom,
	})
}

/// Attach the bias corrected inference to one region's statistics.
pub fn infer(
	stats: RegionStats,
	gaps: &[Pct],
	candidate1_bias: Pct,
	alternative: Alternative,
) -> RegionSummary {
	let inference = match win_probability(gaps, candidate1_bias, alternative) {
		Ok(inference) => Some(inference),
		Err(e) => {
			log::debug!(target: LOG_TARGET, "No inference for {}: {e}", stats.region);
			None
		},
	};

	RegionSummary { stats, bias_correction: candidate1_bias, inference }
}

/// Run [`infer`] for every region in `stats`, taking the samples from `gaps`.
pub fn infer_all(
	stats: Vec<RegionStats>,
	gaps: &[CandidateGap],
	candidate1_bias: Pct,
	alternative: Alternative,
) -> Vec<RegionSummary> {
	let samples = gaps_by_region(gaps);

	stats
		.into_iter()
		.map(|stats| {
			let sample = samples.get(stats.region.as_str()).map(Vec::as_slice).unwrap_or_default();
			infer(stats, sample, candidate1_bias, alternative)
		})
		.collect()
}
