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

//! # Poll Forecaster.
//!
//! Fetches a snapshot of published opinion polls, computes the margin between two candidates for
//! every poll question and calls the likely winner of each region with a one-sample t-test,
//! optionally correcting for a known polling bias.
//! See `help` for more information.
//!
//! # Implementation Notes:
//!
//! The feed is fetched exactly once per run. `server` keeps the loaded feed in memory and
//! recomputes the forecast for every request, a new feed snapshot requires a restart.
#![cfg_attr(docsrs, feature(doc_cfg))]

use clap::Parser;
use futures::future::{BoxFuture, FutureExt};
use poll_forecaster::{
	commands::{
		self,
		types::{ForecastConfig, ForecastParams, GapsConfig, ServerConfig},
	},
	error::Error,
	feed::load_feed,
	opt::FeedSource,
	prelude::{DEFAULT_FEED, LOG_TARGET},
};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Parser)]
#[cfg_attr(test, derive(PartialEq))]
#[clap(author, version, about)]
pub struct Opt {
	/// Where to read the polls from: an `http(s)://` URL or the path of a local CSV file.
	#[clap(long, short, default_value = DEFAULT_FEED, env = "FEED")]
	pub feed: FeedSource,

	#[clap(subcommand)]
	pub command: Command,

	/// Sets a custom logging filter. Syntax is `<target>=<level>`, e.g.
	/// -lpoll-forecaster=debug.
	///
	/// Log levels (least to most verbose) are error, warn, info, debug, and trace.
	/// By default, all targets log `info`. The global log level can be set with `-l<level>`.
	#[clap(long, short, default_value = "info")]
	pub log: String,
}

#[derive(Debug, Clone, Parser)]
#[cfg_attr(test, derive(PartialEq))]
pub enum Command {
	/// Call the winner of every region and write `forecast.json`.
	Forecast(ForecastConfig),
	/// Write the per-question candidate margins to `gaps.json`.
	Gaps(GapsConfig),
	/// Describe the poll feed: regions, candidates, cycles and dates.
	Info,
	/// Serve forecasts over a REST API.
	Server(ServerConfig),
}

impl Command {
	fn params(&self) -> Option<&ForecastParams> {
		match self {
			Command::Forecast(cfg) => Some(&cfg.params),
			Command::Gaps(cfg) => Some(&cfg.params),
			Command::Info | Command::Server(_) => None,
		}
	}
}

#[tokio::main]
async fn main() -> Result<(), Error> {
	let Opt { feed, command, log } = Opt::parse();
	let filter = EnvFilter::from_default_env().add_directive(log.parse()?);
	tracing_subscriber::fmt().with_env_filter(filter).init();

	// Reject bad parameters before fetching anything.
	if let Some(params) = command.params() {
		params.settings()?;
	}

	let parsed = load_feed(&feed).await?;

	let fut = match command {
		Command::Info => commands::info_cmd(feed, parsed).boxed(),
		Command::Forecast(cfg) => commands::forecast_cmd(parsed.store, cfg).boxed(),
		Command::Gaps(cfg) => commands::gaps_cmd(parsed.store, cfg).boxed(),
		Command::Server(cfg) => commands::server_cmd(parsed.store, cfg).boxed(),
	};

	let res = run_command(fut).await;

	log::debug!(target: LOG_TARGET, "execution finished. outcome = {res:?}");
	res
}

#[cfg(target_family = "unix")]
async fn run_command(fut: BoxFuture<'_, Result<(), Error>>) -> Result<(), Error> {
	use tokio::signal::unix::{SignalKind, signal};

	let mut stream_int = signal(SignalKind::interrupt()).map_err(Error::Io)?;
	let mut stream_term = signal(SignalKind::terminate()).map_err(Error::Io)?;

	tokio::select! {
		_ = stream_int.recv() => {
			Ok(())
		}
		_ = stream_term.recv() => {
			Ok(())
		}
		res = fut => res,
	}
}

#[cfg(not(unix))]
async fn run_command(fut: BoxFuture<'_, Result<(), Error>>) -> Result<(), Error> {
	use tokio::signal::ctrl_c;

	tokio::select! {
		_ = ctrl_c() => Ok(()),
		res = fut => res,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use poll_forecaster::{gaps::GroupAttribute, prelude::DEFAULT_OUTPUT_DIR, stats::Alternative};
	use std::path::PathBuf;

	fn params(candidate1: &str, candidate2: &str) -> ForecastParams {
		ForecastParams {
			candidate1: candidate1.to_string(),
			candidate2: candidate2.to_string(),
			bias: 0.0,
			alternative: Alternative::Less,
			cycle: None,
			regions: vec![],
			grades: None,
			min_sample_size: None,
			min_start_date: None,
			population: None,
			group_by: vec![],
		}
	}

	#[test]
	fn cli_forecast_works() {
		let opt = Opt::try_parse_from([
			env!("CARGO_PKG_NAME"),
			"--feed",
			"polls.csv",
			"-lpoll-forecaster=debug",
			"forecast",
			"--candidate1",
			"Biden",
			"--candidate2",
			"Trump",
			"--bias",
			"3",
			"--group-by",
			"sample-size",
			"--output-dir",
			"out",
		])
		.unwrap();

		assert_eq!(
			opt,
			Opt {
				feed: FeedSource::File(PathBuf::from("polls.csv")),
				log: "poll-forecaster=debug".to_string(),
				command: Command::Forecast(ForecastConfig {
					params: ForecastParams {
						bias: 3.0,
						group_by: vec![GroupAttribute::SampleSize],
						..params("Biden", "Trump")
					},
					output_dir: "out".to_string(),
				}),
			}
		);
	}

	#[test]
	fn cli_gaps_default_works() {
		let opt = Opt::try_parse_from([
			env!("CARGO_PKG_NAME"),
			"--feed",
			"https://example.com/polls.csv",
			"gaps",
			"--candidate1",
			"Biden",
			"--candidate2",
			"Trump",
		])
		.unwrap();

		assert!(opt.feed.is_remote());
		assert_eq!(opt.log, "info");
		assert_eq!(
			opt.command,
			Command::Gaps(GapsConfig {
				params: params("Biden", "Trump"),
				output_dir: DEFAULT_OUTPUT_DIR.to_string(),
			})
		);
	}

	#[test]
	fn cli_info_works() {
		let opt = Opt::try_parse_from([env!("CARGO_PKG_NAME"), "info"]).unwrap();
		assert_eq!(opt.command, Command::Info);
		assert_eq!(opt.command.params(), None);
	}

	#[test]
	fn cli_forecast_requires_candidates() {
		assert!(Opt::try_parse_from([env!("CARGO_PKG_NAME"), "forecast"]).is_err());
	}
}
