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

//! Forecast command: run the pipeline once and write `forecast.json`.

use crate::{
	commands::types::ForecastConfig,
	error::Error,
	forecast,
	prelude::LOG_TARGET,
	store::PollStore,
	utils::write_data_to_json_file,
};
use std::path::Path;

pub async fn forecast_cmd(store: PollStore, config: ForecastConfig) -> Result<(), Error> {
	let settings = config.params.settings()?;
	log::info!(
		target: LOG_TARGET,
		"Forecasting {} vs {} with a bias of {:+} points",
		settings.matchup.candidate1,
		settings.matchup.candidate2,
		settings.candidate1_bias
	);

	let forecast = tokio::task::spawn_blocking(move || forecast::run(&store, &settings)).await?;
	if forecast.regions.is_empty() {
		log::warn!(target: LOG_TARGET, "No region has polls for both candidates");
	}

	let output = Path::new(&config.output_dir).join("forecast.json");
	write_data_to_json_file(&forecast, &output).await?;

	log::info!(
		target: LOG_TARGET,
		"Forecast of {} regions saved to {}",
		forecast.metadata.regions,
		output.display()
	);

	Ok(())
}
