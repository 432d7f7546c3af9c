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

//! Constants and type aliases shared all over the place.

/// Default poll feed to fetch when none is given.
///
/// The public presidential general-election poll snapshot; anything else has to be passed
/// explicitly through `--feed`.
pub const DEFAULT_FEED: &str = "https://projects.fivethirtyeight.com/polls-page/president_polls.csv";
/// Default port to start the forecast server on.
pub const DEFAULT_SERVER_PORT: u16 = 8080;
/// Default directory the command outputs are written to.
pub const DEFAULT_OUTPUT_DIR: &str = "results";
/// The logging target.
pub const LOG_TARGET: &str = "poll-forecaster";

/// Region the feed rows without a state are filed under.
pub const NATIONAL_REGION: &str = "National";

/// Opaque identifier grouping the candidate rows of one poll question.
pub type QuestionId = String;
/// Geographic unit the polls are aggregated over, e.g. a state name.
pub type Region = String;
/// Percentage points, 0..=100 for support shares, signed for margins.
pub type Pct = f64;
