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

use crate::prelude::LOG_TARGET;
use anyhow::Context;
use serde::Serialize;
use std::{
	fs::{self, File},
	io::{BufWriter, Write},
	path::{Path, PathBuf},
};

/// Write data to a JSON file, creating the parent directories as needed.
///
/// The data is serialized on the caller's task, the file system work runs on the blocking pool.
pub async fn write_data_to_json_file<T>(data: &T, path: impl AsRef<Path>) -> anyhow::Result<()>
where
	T: Serialize,
{
	let path = path.as_ref().to_path_buf();
	let json = serde_json::to_string_pretty(data)
		.with_context(|| format!("serialize {}", path.display()))?;

	let path = tokio::task::spawn_blocking(move || write_file(path, json.as_bytes()))
		.await
		.context("JSON writer task failed")??;

	log::info!(target: LOG_TARGET, "Wrote JSON data to {}", path.display());
	Ok(())
}

fn write_file(path: PathBuf, bytes: &[u8]) -> anyhow::Result<PathBuf> {
	if let Some(parent) = path.parent() {
		if !parent.as_os_str().is_empty() {
			fs::create_dir_all(parent)
				.with_context(|| format!("create directory {}", parent.display()))?;
		}
	}

	let file = File::create(&path).with_context(|| format!("create {}", path.display()))?;
	let mut writer = BufWriter::with_capacity(1024 * 1024, file);
	writer.write_all(bytes).with_context(|| format!("write {}", path.display()))?;
	writer.flush().with_context(|| format!("flush {}", path.display()))?;

	Ok(path)
}
