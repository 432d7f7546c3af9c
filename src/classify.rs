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

//! Discrete winner calls.

use crate::{gaps::Matchup, inference::RegionSummary, prelude::Region};
use serde::{Serialize, Serializer};
use std::fmt;

pub(crate) const TIE: &str = "tie";
pub(crate) const INSUFFICIENT_DATA: &str = "insufficient data";

/// Called winner of a region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Winner {
	Candidate(String),
	/// `p_candidate1` is exactly one half.
	Tie,
	/// No inference could be made for the region.
	InsufficientData,
}

impl Winner {
	pub fn is_call(&self) -> bool {
		matches!(self, Self::Candidate(_))
	}
}

impl fmt::Display for Winner {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Candidate(name) => write!(f, "{name}"),
			Self::Tie => write!(f, "{TIE}"),
			Self::InsufficientData => write!(f, "{INSUFFICIENT_DATA}"),
		}
	}
}

impl Serialize for Winner {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.collect_str(self)
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WinnerCall {
	pub region: Region,
	pub winner: Winner,
}

/// Map a region's win probability to a winner.
pub fn classify(summary: &RegionSummary, matchup: &Matchup) -> WinnerCall {
	let winner = match summary.p_candidate1() {
		None => Winner::InsufficientData,
		Some(p) if p > 0.5 => Winner::Candidate(matchup.candidate1.clone()),
		Some(p) if p < 0.5 => Winner::Candidate(matchup.candidate2.clone()),
		Some(p) if p == 0.5 => Winner::Tie,
		// NaN is not a probability
		Some(_) => Winner::InsufficientData,
	};

	WinnerCall { region: summary.region().to_string(), winner }
}
