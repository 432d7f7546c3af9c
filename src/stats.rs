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

//! Descriptive statistics and the one-sample Student's t-test.

use serde::{Deserialize, Serialize};

/// Iteration cap of the incomplete beta continued fraction.
const MAX_ITERATIONS: usize = 1_000;
const EPS: f64 = 1e-15;
const FP_MIN: f64 = 1e-300;

/// Lanczos approximation, g = 7.
const LANCZOS_G: f64 = 7.0;
const LANCZOS_COEFFICIENTS: [f64; 9] = [
	0.999_999_999_999_809_9,
	676.520_368_121_885_1,
	-1_259.139_216_722_402_8,
	771.323_428_777_653_1,
	-176.615_029_162_140_6,
	12.507_343_278_686_905,
	-0.138_571_095_265_720_12,
	9.984_369_578_019_572e-6,
	1.505_632_735_149_311_6e-7,
];

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq)]
pub enum StatsError {
	#[error("need at least {needed} observations, got {got}")]
	TooFewObservations { needed: usize, got: usize },
	#[error("sample is essentially constant")]
	ZeroVariance,
	#[error("non-finite value in computation")]
	NonFinite,
	#[error("continued fraction did not converge")]
	NoConvergence,
}

/// Direction of the one-sided alternative hypothesis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Alternative {
	/// True mean below the null mean.
	#[default]
	Less,
	/// True mean above the null mean.
	Greater,
}

impl Alternative {
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Less => "less",
			Self::Greater => "greater",
		}
	}
}

impl std::fmt::Display for Alternative {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Outcome of a one-sample t-test.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TTest {
	pub t_statistic: f64,
	pub degrees_of_freedom: f64,
	pub p_value: f64,
}

pub fn mean(sample: &[f64]) -> Option<f64> {
	if sample.is_empty() {
		return None;
	}
	Some(sample.iter().sum::<f64>() / sample.len() as f64)
}

/// Sample standard deviation (denominator `n - 1`), `None` below two observations.
pub fn sample_stdev(sample: &[f64]) -> Option<f64> {
	if sample.len() < 2 {
		return None;
	}
	let mean = mean(sample)?;
	let ss: f64 = sample.iter().map(|x| (x - mean).powi(2)).sum();
	Some((ss / (sample.len() - 1) as f64).sqrt())
}

/// Natural logarithm of the gamma function for `x > 0`.
pub fn ln_gamma(x: f64) -> f64 {
	if x < 0.5 {
		// reflection formula
		return (std::f64::consts::PI / (std::f64::consts::PI * x).sin()).ln() - ln_gamma(1.0 - x);
	}

	let x = x - 1.0;
	let t = x + LANCZOS_G + 0.5;
	let series = LANCZOS_COEFFICIENTS
		.iter()
		.enumerate()
		.skip(1)
		.fold(LANCZOS_COEFFICIENTS[0], |acc, (i, c)| acc + c / (x + i as f64));

	0.5 * (2.0 * std::f64::consts::PI).ln() + (x + 0.5) * t.ln() - t + series.ln()
}

/// Regularized incomplete beta function `I_x(a, b)`.
pub fn regularized_incomplete_beta(x: f64, a: f64, b: f64) -> Result<f64, StatsError> {
	if !(x.is_finite() && a.is_finite() && b.is_finite()) || a <= 0.0 || b <= 0.0 {
		return Err(StatsError::NonFinite);
	}
	if x <= 0.0 {
		return Ok(0.0);
	}
	if x >= 1.0 {
		return Ok(1.0);
	}

	let ln_front = ln_gamma(a + b) - ln_gamma(a) - ln_gamma(b) + a * x.ln() + b * (1.0 - x).ln();
	let front = ln_front.exp();

	// The continued fraction converges fast only on this side of the mode.
	if x < (a + 1.0) / (a + b + 2.0) {
		Ok(front * beta_continued_fraction(x, a, b)? / a)
	} else {
		Ok(1.0 - front * beta_continued_fraction(1.0 - x, b, a)? / b)
	}
}

/// Modified Lentz evaluation of the incomplete beta continued fraction.
fn beta_continued_fraction(x: f64, a: f64, b: f64) -> Result<f64, StatsError> {
	let clamp = |v: f64| if v.abs() < FP_MIN { FP_MIN } else { v };

	let qab = a + b;
	let qap = a + 1.0;
	let qam = a - 1.0;

	let mut c = 1.0;
	let mut d = 1.0 / clamp(1.0 - qab * x / qap);
	let mut h = d;

	for m in 1..=MAX_ITERATIONS {
		let m = m as f64;
		let m2 = 2.0 * m;

		let aa = m * (b - m) * x / ((qam + m2) * (a + m2));
		d = 1.0 / clamp(1.0 + aa * d);
		c = clamp(1.0 + aa / c);
		h *= d * c;

		let aa = -(a + m) * (qab + m) * x / ((a + m2) * (qap + m2));
		d = 1.0 / clamp(1.0 + aa * d);
		c = clamp(1.0 + aa / c);
		let delta = d * c;
		h *= delta;

		if (delta - 1.0).abs() < EPS {
			return Ok(h);
		}
	}

	Err(StatsError::NoConvergence)
}

/// Cumulative distribution function of Student's t with `df` degrees of freedom.
pub fn students_t_cdf(t: f64, df: f64) -> Result<f64, StatsError> {
	if t.is_nan() || !df.is_finite() || df <= 0.0 {
		return Err(StatsError::NonFinite);
	}
	if t.is_infinite() {
		return Ok(if t > 0.0 { 1.0 } else { 0.0 });
	}

	let tail = 0.5 * regularized_incomplete_beta(df / (df + t * t), df / 2.0, 0.5)?;
	Ok(if t > 0.0 { 1.0 - tail } else { tail })
}

/// One-sample t-test of `H0: mean == null_mean` against `alternative`.
pub fn one_sample_t_test(
	sample: &[f64],
	null_mean: f64,
	alternative: Alternative,
) -> Result<TTest, StatsError> {
	let n = sample.len();
	if n < 2 {
		return Err(StatsError::TooFewObservations { needed: 2, got: n });
	}
	if sample.iter().any(|x| !x.is_finite()) || !null_mean.is_finite() {
		return Err(StatsError::NonFinite);
	}

	let mean = mean(sample).ok_or(StatsError::TooFewObservations { needed: 2, got: n })?;
	let stdev = sample_stdev(sample).ok_or(StatsError::TooFewObservations { needed: 2, got: n })?;
	// spread lost in the rounding noise of the mean
	let std_error = stdev / (n as f64).sqrt();
	if stdev == 0.0 || std_error < 10.0 * f64::EPSILON * mean.abs() {
		return Err(StatsError::ZeroVariance);
	}

	let df = (n - 1) as f64;
	let t_statistic = (mean - null_mean) / std_error;
	if !t_statistic.is_finite() {
		return Err(StatsError::NonFinite);
	}

	let lower = students_t_cdf(t_statistic, df)?;
	let p_value = match alternative {
		Alternative::Less => lower,
		Alternative::Greater => 1.0 - lower,
	};

	Ok(TTest { t_statistic, degrees_of_freedom: df, p_value })
}
