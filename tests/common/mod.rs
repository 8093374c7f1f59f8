//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::cell::Cell;

use timing_matchers::{Clock, TimingMatchers};
use tokio::runtime::Runtime;

/// Clock replaying scripted durations.
///
/// Odd reads (measurement start) return 1000 ms, even reads return
/// 1000 ms plus the next scripted duration.
pub struct ScriptedClock {
    durations: Vec<f64>,
    reads: Cell<usize>,
}

impl ScriptedClock {
    pub fn new(durations: Vec<f64>) -> Self {
        Self {
            durations,
            reads: Cell::new(0),
        }
    }

    /// Every invocation takes `ms`.
    pub fn constant(ms: f64, invocations: usize) -> Self {
        Self::new(vec![ms; invocations])
    }

    pub fn reads(&self) -> usize {
        self.reads.get()
    }
}

impl Clock for ScriptedClock {
    fn now_ms(&self) -> f64 {
        let n = self.reads.get();
        self.reads.set(n + 1);
        if n % 2 == 0 {
            1_000.0
        } else {
            1_000.0 + self.durations[n / 2]
        }
    }
}

pub fn matchers(durations: Vec<f64>) -> TimingMatchers<ScriptedClock> {
    TimingMatchers::with_clock(ScriptedClock::new(durations))
}

/// Single-threaded Tokio runtime for driving async matchers.
pub fn single_thread_runtime() -> Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .expect("failed to create single-thread runtime")
}

/// Route `tracing` output through the test harness writer.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("timing_matchers=debug")),
        )
        .with_test_writer()
        .try_init();
}
