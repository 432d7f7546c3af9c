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

//! Per-question margins between the two candidates of a matchup.

use crate::{
	classify::{INSUFFICIENT_DATA, TIE},
	error::Error,
	prelude::{LOG_TARGET, Pct, QuestionId, Region},
	store::{PollObservation, PollsterGrade, PopulationType},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The two candidates being compared. Margins are always `candidate1 - candidate2`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Matchup {
	pub candidate1: String,
	pub candidate2: String,
}

impl Matchup {
	pub fn new(candidate1: impl Into<String>, candidate2: impl Into<String>) -> Result<Self, Error> {
		let candidate1 = candidate1.into().trim().to_string();
		let candidate2 = candidate2.into().trim().to_string();

		if candidate1.is_empty() || candidate2.is_empty() {
			return Err(Error::InvalidParameters("candidate names must not be empty".into()));
		}
		if candidate1 == candidate2 {
			return Err(Error::InvalidParameters(format!(
				"cannot compare `{candidate1}` against itself"
			)));
		}
		// winner labels must stay unambiguous
		if let Some(name) = [&candidate1, &candidate2].into_iter().find(|name| {
			name.eq_ignore_ascii_case(TIE) || name.eq_ignore_ascii_case(INSUFFICIENT_DATA)
		}) {
			return Err(Error::InvalidParameters(format!(
				"`{name}` is reserved for winner labels and cannot be a candidate"
			)));
		}

		Ok(Self { candidate1, candidate2 })
	}
}

/// Extra poll attributes a question's rows are grouped by.
///
/// `region`, `start_date` and `pollster_grade` are always part of the key.
#[derive(
	Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, clap::ValueEnum, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum GroupAttribute {
	EndDate,
	SampleSize,
	Population,
}

/// Signed margin of one poll question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateGap {
	pub question_id: QuestionId,
	pub region: Region,
	pub start_date: NaiveDate,
	pub pollster_grade: Option<PollsterGrade>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub end_date: Option<NaiveDate>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub sample_size: Option<u32>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub population: Option<PopulationType>,
	/// `pct(candidate1) - pct(candidate2)`, positive when candidate1 leads.
	pub pct_diff: Pct,
}

/// Question identifier plus the pass-through attributes requested by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct GroupKey {
	question_id: QuestionId,
	region: Region,
	start_date: NaiveDate,
	pollster_grade: Option<PollsterGrade>,
	end_date: Option<NaiveDate>,
	sample_size: Option<u32>,
	population: Option<PopulationType>,
}

impl GroupKey {
	fn new(poll: &PollObservation, group_by: &[GroupAttribute]) -> Self {
		let mut key = Self {
			question_id: poll.question_id.clone(),
			region: poll.region.clone(),
			start_date: poll.start_date,
			pollster_grade: poll.pollster_grade.clone(),
			end_date: None,
			sample_size: None,
			population: None,
		};

		for attribute in group_by {
			match attribute {
				GroupAttribute::EndDate => key.end_date = Some(poll.end_date),
				GroupAttribute::SampleSize => key.sample_size = poll.sample_size,
				GroupAttribute::Population => key.population = poll.population_type.clone(),
			}
		}

		key
	}
}

#[derive(Debug)]
struct Pending {
	key: GroupKey,
	candidate1: Option<Pct>,
	candidate2: Option<Pct>,
}

impl Pending {
	fn into_gap(self) -> Option<CandidateGap> {
		let pct_diff = self.candidate1? - self.candidate2?;
		let key = self.key;

		Some(CandidateGap {
			question_id: key.question_id,
			region: key.region,
			start_date: key.start_date,
			pollster_grade: key.pollster_grade,
			end_date: key.end_date,
			sample_size: key.sample_size,
			population: key.population,
			pct_diff,
		})
	}
}

/// Reduce per-candidate rows to one margin per question.
///
/// Questions lacking a row for either candidate are dropped. The output is ordered by
/// `start_date`, ties keep the order in which the questions were first seen.
pub fn compute_gaps<'a>(
	polls: impl IntoIterator<Item = &'a PollObservation>,
	matchup: &Matchup,
	group_by: &[GroupAttribute],
) -> Vec<CandidateGap> {
	let mut index: HashMap<GroupKey, usize> = HashMap::new();
	let mut pending: Vec<Pending> = Vec::new();

	for poll in polls {
		let is_first = poll.candidate_name == matchup.candidate1;
		if !is_first && poll.candidate_name != matchup.candidate2 {
			continue;
		}

		let key = GroupKey::new(poll, group_by);
		let i = *index.entry(key.clone()).or_insert_with(|| {
			pending.push(Pending { key, candidate1: None, candidate2: None });
			pending.len() - 1
		});

		let slot =
			if is_first { &mut pending[i].candidate1 } else { &mut pending[i].candidate2 };
		if slot.is_some() {
			log::warn!(
				target: LOG_TARGET,
				"Question {} has more than one row for {}, keeping the first",
				poll.question_id,
				poll.candidate_name
			);
		} else {
			*slot = Some(poll.pct);
		}
	}

	let questions = pending.len();
	let mut gaps: Vec<CandidateGap> = pending.into_iter().filter_map(Pending::into_gap).collect();
	if gaps.len() < questions {
		log::debug!(
			target: LOG_TARGET,
			"Dropped {} of {questions} questions missing {} or {}",
			questions - gaps.len(),
			matchup.candidate1,
			matchup.candidate2
		);
	}

	gaps.sort_by_key(|gap| gap.start_date);
	gaps
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::store::tests::{date, observation};

	fn matchup() -> Matchup {
		Matchup::new("Biden", "Trump").unwrap()
	}

	#[test]
	fn matchup_rejects_bad_pairs() {
		assert!(Matchup::new("Biden", " Biden ").is_err());
		assert!(Matchup::new("", "Trump").is_err());
		assert_eq!(Matchup::new(" Biden", "Trump ").unwrap(), matchup());
	}

	#[test]
	fn matchup_rejects_winner_labels() {
		for label in ["tie", "Tie", "insufficient data", " INSUFFICIENT DATA "] {
			assert!(matches!(Matchup::new(label, "Trump"), Err(Error::InvalidParameters(_))));
			assert!(matches!(Matchup::new("Biden", label), Err(Error::InvalidParameters(_))));
		}
		assert!(Matchup::new("Tierney", "Trump").is_ok());
	}

	#[test]
	fn gap_is_candidate1_minus_candidate2() {
		let polls = vec![
			observation("1", "Ohio", "Trump", 47.0),
			observation("1", "Ohio", "Jorgensen", 2.0),
			observation("1", "Ohio", "Biden", 45.5),
		];

		let gaps = compute_gaps(&polls, &matchup(), &[]);
		assert_eq!(gaps.len(), 1);
		assert_eq!(gaps[0].question_id, "1");
		assert_eq!(gaps[0].pct_diff, -1.5);

		let reversed = Matchup::new("Trump", "Biden").unwrap();
		assert_eq!(compute_gaps(&polls, &reversed, &[])[0].pct_diff, 1.5);
	}

	#[test]
	fn question_missing_a_candidate_is_dropped() {
		let polls = vec![
			observation("1", "Ohio", "Biden", 50.0),
			observation("1", "Ohio", "Trump", 45.0),
			observation("2", "Ohio", "Biden", 51.0),
			observation("3", "Texas", "Trump", 52.0),
			observation("3", "Texas", "Jorgensen", 3.0),
		];

		let gaps = compute_gaps(&polls, &matchup(), &[]);
		assert_eq!(gaps.len(), 1);
		assert_eq!(gaps[0].question_id, "1");
		assert_eq!(gaps[0].pct_diff, 5.0);
	}

	#[test]
	fn gaps_are_ordered_by_start_date_stably() {
		let mut polls = Vec::new();
		for (question, start, pct) in
			[("late", "2020-10-20", 50.0), ("early-a", "2020-09-01", 51.0), ("early-b", "2020-09-01", 52.0)]
		{
			for (candidate, pct) in [("Biden", pct), ("Trump", 40.0)] {
				let mut poll = observation(question, "Ohio", candidate, pct);
				poll.start_date = date(start);
				polls.push(poll);
			}
		}

		let gaps = compute_gaps(&polls, &matchup(), &[]);
		let order: Vec<_> = gaps.iter().map(|g| g.question_id.as_str()).collect();
		assert_eq!(order, vec!["early-a", "early-b", "late"]);
	}

	#[test]
	fn extra_group_attributes_split_questions() {
		let mut polls = vec![
			observation("1", "Ohio", "Biden", 48.0),
			observation("1", "Ohio", "Trump", 46.0),
			observation("1", "Ohio", "Biden", 47.0),
			observation("1", "Ohio", "Trump", 47.0),
		];
		polls[2].population_type = Some(PopulationType::RegisteredVoters);
		polls[3].population_type = Some(PopulationType::RegisteredVoters);

		let gaps = compute_gaps(&polls, &matchup(), &[GroupAttribute::Population]);
		assert_eq!(gaps.len(), 2);
		assert_eq!(gaps[0].population, Some(PopulationType::LikelyVoters));
		assert_eq!(gaps[0].pct_diff, 2.0);
		assert_eq!(gaps[1].population, Some(PopulationType::RegisteredVoters));
		assert_eq!(gaps[1].pct_diff, 0.0);
		assert_eq!(gaps[0].end_date, None);
	}

	#[test]
	fn duplicate_candidate_rows_keep_the_first() {
		let polls = vec![
			observation("1", "Ohio", "Biden", 48.0),
			observation("1", "Ohio", "Biden", 60.0),
			observation("1", "Ohio", "Trump", 46.0),
		];

		let gaps = compute_gaps(&polls, &matchup(), &[]);
		assert_eq!(gaps.len(), 1);
		assert_eq!(gaps[0].pct_diff, 2.0);
	}
}
