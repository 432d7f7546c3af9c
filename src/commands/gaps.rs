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

//! Gaps command: write the per-question margins without running the inference.

use crate::{
	commands::types::GapsConfig, error::Error, forecast, prelude::LOG_TARGET, store::PollStore,
	utils::write_data_to_json_file,
};
use std::path::Path;

pub async fn gaps_cmd(store: PollStore, config: GapsConfig) -> Result<(), Error> {
	let settings = config.params.settings()?;
	let (_, gaps) = forecast::select_gaps(&store, &settings);

	let output = Path::new(&config.output_dir).join("gaps.json");
	write_data_to_json_file(&gaps, &output).await?;

	log::info!(target: LOG_TARGET, "{} gaps saved to {}", gaps.len(), output.display());

	Ok(())
}
