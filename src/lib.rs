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

//! Poll aggregation and bias corrected winner calls.
//!
//! Polls are read into a [`store::PollStore`], reduced to one margin per question by
//! [`gaps::compute_gaps`], summarized per region, tested with a one-sample Student's t-test and
//! finally mapped to a winner. [`forecast::run`] strings the stages together.

pub mod aggregate;
pub mod classify;
pub mod commands;
pub mod error;
pub mod feed;
pub mod forecast;
pub mod gaps;
pub mod inference;
pub mod opt;
pub mod prelude;
pub mod stats;
pub mod store;
pub mod utils;
