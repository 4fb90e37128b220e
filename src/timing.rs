//! Repeated-measurement timing of compiled modules.
//!
//! A [`TimeEvaluator`] produces one latency sample per repeat; each sample
//! is the wall-clock time of `number` back-to-back runs divided by
//! `number`, so timer overhead is amortized across the inner iterations.

use crate::gpu::errors::GpuError;
use crate::gpu::module::CompiledModule;
use log::debug;
use std::time::Instant;
use thiserror::Error;

/// Errors raised when constructing a time evaluator.
#[derive(Error, Debug)]
pub enum TimingError {
    #[error("Evaluator iteration count must be greater than 0")]
    ZeroNumber,

    #[error("Evaluator repeat count must be greater than 0")]
    ZeroRepeat,
}

/// Times a compiled module over `repeat` samples of `number` runs each.
#[derive(Debug, Clone, Copy)]
pub struct TimeEvaluator {
    number: u32,
    repeat: u32,
}

impl TimeEvaluator {
    pub fn new(number: u32, repeat: u32) -> Result<Self, TimingError> {
        if number == 0 {
            return Err(TimingError::ZeroNumber);
        }
        if repeat == 0 {
            return Err(TimingError::ZeroRepeat);
        }
        Ok(TimeEvaluator { number, repeat })
    }

    /// Runs the module and collects one seconds-per-run sample per repeat.
    pub fn evaluate(&self, module: &CompiledModule) -> Result<TimingResults, GpuError> {
        debug!(
            "Timing {} run(s) x {} repeat(s)",
            self.number, self.repeat
        );
        let mut results = Vec::with_capacity(self.repeat as usize);
        for _ in 0..self.repeat {
            let start = Instant::now();
            for _ in 0..self.number {
                module.run()?;
            }
            results.push(start.elapsed().as_secs_f64() / self.number as f64);
        }
        Ok(TimingResults { results })
    }
}

/// Ordered per-repeat latency samples, in seconds per run.
#[derive(Debug, Clone)]
pub struct TimingResults {
    results: Vec<f64>,
}

impl TimingResults {
    /// Creates results from raw seconds-per-run samples.
    pub fn from_samples(results: Vec<f64>) -> Self {
        TimingResults { results }
    }

    /// Raw per-repeat samples in seconds per run.
    pub fn results(&self) -> &[f64] {
        &self.results
    }

    /// Mean latency in milliseconds.
    pub fn mean_ms(&self) -> f64 {
        if self.results.is_empty() {
            return 0.0;
        }
        let sum_ms: f64 = self.results.iter().map(|s| s * 1000.0).sum();
        sum_ms / self.results.len() as f64
    }

    /// Population standard deviation of the latency in milliseconds.
    pub fn std_dev_ms(&self) -> f64 {
        if self.results.is_empty() {
            return 0.0;
        }
        let mean = self.mean_ms();
        let variance: f64 = self
            .results
            .iter()
            .map(|s| {
                let diff = s * 1000.0 - mean;
                diff * diff
            })
            .sum::<f64>()
            / self.results.len() as f64;
        variance.sqrt()
    }
}
