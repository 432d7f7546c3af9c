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

//! In-memory poll observations and the predicates used to select them.

use crate::prelude::{Pct, QuestionId, Region};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::{
	collections::{BTreeMap, BTreeSet},
	fmt,
	str::FromStr,
};

/// Quality rating of a pollster, e.g. `A+`, `B/C` or `D-`.
///
/// Grades are only ordered by their leading letter, the modifiers carry no ordering.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PollsterGrade(pub String);

impl PollsterGrade {
	/// The leading letter grade, upper-cased.
	pub fn letter(&self) -> Option<char> {
		self.0.trim().chars().next().filter(char::is_ascii_alphabetic).map(|c| c.to_ascii_uppercase())
	}
}

impl fmt::Display for PollsterGrade {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

/// The population a poll was fielded on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PopulationType {
	LikelyVoters,
	RegisteredVoters,
	Adults,
	Voters,
	/// Anything the feed reports that we have no dedicated variant for.
	Other(String),
}

impl From<String> for PopulationType {
	fn from(s: String) -> Self {
		match s.trim().to_ascii_lowercase().as_str() {
			"lv" => Self::LikelyVoters,
			"rv" => Self::RegisteredVoters,
			"a" => Self::Adults,
			"v" => Self::Voters,
			_ => Self::Other(s.trim().to_string()),
		}
	}
}

impl From<PopulationType> for String {
	fn from(p: PopulationType) -> String {
		p.to_string()
	}
}

impl fmt::Display for PopulationType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let population = match self {
			Self::LikelyVoters => "lv",
			Self::RegisteredVoters => "rv",
			Self::Adults => "a",
			Self::Voters => "v",
			Self::Other(other) => other.as_str(),
		};
		write!(f, "{}", population)
	}
}

impl FromStr for PopulationType {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		if s.trim().is_empty() {
			return Err("population type must not be empty".to_string());
		}
		Ok(Self::from(s.to_string()))
	}
}

/// Accepted leading letters of a pollster grade, e.g. `ABC` accepts `A+`, `B/C` and `C-`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct GradeFilter {
	letters: BTreeSet<char>,
}

impl GradeFilter {
	/// Whether a poll with the given grade passes. Ungraded polls never pass.
	pub fn accepts(&self, grade: Option<&PollsterGrade>) -> bool {
		grade.and_then(PollsterGrade::letter).is_some_and(|letter| self.letters.contains(&letter))
	}

	pub fn letters(&self) -> impl Iterator<Item = char> + '_ {
		self.letters.iter().copied()
	}
}

impl FromStr for GradeFilter {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let mut letters = BTreeSet::new();
		for c in s.chars().filter(|c| !c.is_whitespace() && *c != ',') {
			if !c.is_ascii_alphabetic() {
				return Err(format!("invalid grade letter `{c}` in `{s}`"));
			}
			letters.insert(c.to_ascii_uppercase());
		}
		if letters.is_empty() {
			return Err("grade filter needs at least one letter".to_string());
		}
		Ok(Self { letters })
	}
}

impl TryFrom<String> for GradeFilter {
	type Error = String;

	fn try_from(s: String) -> Result<Self, Self::Error> {
		s.parse()
	}
}

impl From<GradeFilter> for String {
	fn from(g: GradeFilter) -> String {
		g.to_string()
	}
}

impl fmt::Display for GradeFilter {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		self.letters.iter().try_for_each(|c| write!(f, "{c}"))
	}
}

/// One row per (poll question, candidate) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollObservation {
	pub question_id: QuestionId,
	pub region: Region,
	pub start_date: NaiveDate,
	pub end_date: NaiveDate,
	pub cycle: Option<u32>,
	pub pollster_grade: Option<PollsterGrade>,
	pub sample_size: Option<u32>,
	pub population_type: Option<PopulationType>,
	pub candidate_name: String,
	/// Support share of the candidate, 0..=100.
	pub pct: Pct,
}

/// Caller supplied selection of the polls that enter the pipeline.
///
/// All active predicates have to hold for a poll to be kept. `None` (or an empty region set)
/// disables the predicate.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PollFilter {
	pub cycle: Option<u32>,
	pub regions: BTreeSet<Region>,
	pub grades: Option<GradeFilter>,
	/// Inclusive lower bound, polls without a sample size are dropped while it is set.
	pub min_sample_size: Option<u32>,
	/// Inclusive lower bound on the first fielding day.
	pub min_start_date: Option<NaiveDate>,
	pub population: Option<PopulationType>,
}

impl PollFilter {
	pub fn accepts(&self, poll: &PollObservation) -> bool {
		if let Some(cycle) = self.cycle {
			if poll.cycle != Some(cycle) {
				return false;
			}
		}

		if !self.regions.is_empty() && !self.regions.contains(&poll.region) {
			return false;
		}

		if let Some(grades) = &self.grades {
			if !grades.accepts(poll.pollster_grade.as_ref()) {
				return false;
			}
		}

		if let Some(min) = self.min_sample_size {
			match poll.sample_size {
				Some(n) if n >= min => {},
				_ => return false,
			}
		}

		if let Some(min) = self.min_start_date {
			if poll.start_date < min {
				return false;
			}
		}

		match &self.population {
			Some(population) => poll.population_type.as_ref() == Some(population),
			None => true,
		}
	}
}

/// Immutable collection of poll observations as loaded from the feed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PollStore {
	observations: Vec<PollObservation>,
}

impl PollStore {
	pub fn new(observations: Vec<PollObservation>) -> Self {
		Self { observations }
	}

	pub fn len(&self) -> usize {
		self.observations.len()
	}

	pub fn is_empty(&self) -> bool {
		self.observations.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = &PollObservation> {
		self.observations.iter()
	}

	pub fn as_slice(&self) -> &[PollObservation] {
		&self.observations
	}

	/// A new store holding only the observations accepted by `filter`, in input order.
	pub fn filter(&self, filter: &PollFilter) -> PollStore {
		PollStore::new(self.observations.iter().filter(|poll| filter.accepts(poll)).cloned().collect())
	}

	pub fn regions(&self) -> BTreeSet<&str> {
		self.observations.iter().map(|p| p.region.as_str()).collect()
	}

	/// Candidate names with the number of rows mentioning them.
	pub fn candidates(&self) -> BTreeMap<&str, usize> {
		let mut candidates = BTreeMap::new();
		for poll in &self.observations {
			*candidates.entry(poll.candidate_name.as_str()).or_insert(0) += 1;
		}
		candidates
	}

	pub fn cycles(&self) -> BTreeSet<u32> {
		self.observations.iter().filter_map(|p| p.cycle).collect()
	}

	pub fn populations(&self) -> BTreeSet<&PopulationType> {
		self.observations.iter().filter_map(|p| p.population_type.as_ref()).collect()
	}

	/// Earliest start date and latest end date over all observations.
	pub fn date_span(&self) -> Option<(NaiveDate, NaiveDate)> {
		let first = self.observations.iter().map(|p| p.start_date).min()?;
		let last = self.observations.iter().map(|p| p.end_date).max()?;
		Some((first, last))
	}
}

impl FromIterator<PollObservation> for PollStore {
	fn from_iter<I: IntoIterator<Item = PollObservation>>(iter: I) -> Self {
		Self::new(iter.into_iter().collect())
	}
}
