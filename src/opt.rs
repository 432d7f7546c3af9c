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

use std::{fmt, path::PathBuf, str::FromStr};

/// Where the poll feed is read from.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedSource {
	/// Fetch the feed over HTTP(S).
	Remote(String),
	/// Read the feed from the local file system.
	File(PathBuf),
}

impl FeedSource {
	pub fn is_remote(&self) -> bool {
		matches!(self, Self::Remote(_))
	}
}

impl FromStr for FeedSource {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let s = s.trim();
		if s.is_empty() {
			return Err("feed location must not be empty".to_string());
		}

		let lower = s.to_ascii_lowercase();
		if lower.starts_with("http://") || lower.starts_with("https://") {
			Ok(Self::Remote(s.to_string()))
		} else {
			Ok(Self::File(PathBuf::from(s)))
		}
	}
}

impl fmt::Display for FeedSource {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Remote(url) => write!(f, "{}", url),
			Self::File(path) => write!(f, "{}", path.display()),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn feed_source_from_str_works() {
		assert_eq!(
			FeedSource::from_str("https://example.com/polls.csv").unwrap(),
			FeedSource::Remote("https://example.com/polls.csv".to_string())
		);
		assert_eq!(
			FeedSource::from_str("HTTP://example.com/polls.csv").unwrap(),
			FeedSource::Remote("HTTP://example.com/polls.csv".to_string())
		);
		assert_eq!(
			FeedSource::from_str("data/polls.csv").unwrap(),
			FeedSource::File(PathBuf::from("data/polls.csv"))
		);
		assert!(FeedSource::from_str(" ").is_err());
	}

	#[test]
	fn feed_source_display_round_trips() {
		let source = FeedSource::from_str("https://example.com/polls.csv").unwrap();
		assert!(source.is_remote());
		assert_eq!(FeedSource::from_str(&source.to_string()).unwrap(), source);
	}
}
