//! Duration collection for single and repeated runs.
//!
//! Iterations always run strictly in sequence: duration N+1 is only measured
//! after invocation N has returned (or its future resolved). The first failed
//! invocation aborts collection and its error is returned unchanged.

use std::future::Future;

use super::Clock;

/// Time one synchronous invocation.
///
/// Returns the work's output together with the elapsed milliseconds.
pub fn measure<C, F, T>(clock: &C, work: F) -> (T, f64)
where
    C: Clock + ?Sized,
    F: FnOnce() -> T,
{
    let t0 = clock.now_ms();
    let out = work();
    let t1 = clock.now_ms();
    (out, t1 - t0)
}

/// Time one asynchronous invocation, from calling `work` until its future resolves.
pub async fn measure_async<C, F, Fut>(clock: &C, work: F) -> (Fut::Output, f64)
where
    C: Clock + ?Sized,
    F: FnOnce() -> Fut,
    Fut: Future,
{
    let t0 = clock.now_ms();
    let out = work().await;
    let t1 = clock.now_ms();
    (out, t1 - t0)
}

/// Run fallible `work` `iterations` times and collect one duration per call.
///
/// # Errors
///
/// Returns the first `Err` produced by `work`; later iterations are not run.
pub fn collect<C, F, T, E>(clock: &C, iterations: usize, mut work: F) -> Result<Vec<f64>, E>
where
    C: Clock + ?Sized,
    F: FnMut() -> Result<T, E>,
{
    let mut durations = Vec::with_capacity(iterations);
    for i in 0..iterations {
        let (out, elapsed) = measure(clock, &mut work);
        out?;
        tracing::trace!(iteration = i, duration_ms = elapsed, "measured iteration");
        durations.push(elapsed);
    }
    Ok(durations)
}

/// Async counterpart of [`collect`]; each future is awaited before the next call.
///
/// # Errors
///
/// Returns the first `Err` a future resolves to; later iterations are not run.
pub async fn collect_async<C, F, Fut, T, E>(
    clock: &C,
    iterations: usize,
    mut work: F,
) -> Result<Vec<f64>, E>
where
    C: Clock + ?Sized,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut durations = Vec::with_capacity(iterations);
    for i in 0..iterations {
        let (out, elapsed) = measure_async(clock, &mut work).await;
        out?;
        tracing::trace!(iteration = i, duration_ms = elapsed, "measured iteration");
        durations.push(elapsed);
    }
    Ok(durations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn stepping_clock(step: f64) -> impl Fn() -> f64 {
        let ticks = Cell::new(0.0);
        move || {
            let now = ticks.get();
            ticks.set(now + step);
            now
        }
    }

    #[test]
    fn test_measure_returns_output_and_duration() {
        let clock = stepping_clock(3.0);
        let (out, elapsed) = measure(&clock, || 7);
        assert_eq!(out, 7);
        assert_eq!(elapsed, 3.0);
    }

    #[test]
    fn test_collect_runs_exact_iterations() {
        let clock = stepping_clock(1.0);
        let calls = Cell::new(0usize);
        let durations = collect(&clock, 25, || {
            calls.set(calls.get() + 1);
            Ok::<_, ()>(())
        })
        .unwrap();
        assert_eq!(calls.get(), 25);
        assert_eq!(durations, vec![1.0; 25]);
    }

    #[test]
    fn test_collect_stops_at_first_error() {
        let clock = stepping_clock(1.0);
        let calls = Cell::new(0usize);
        let result = collect(&clock, 10, || {
            calls.set(calls.get() + 1);
            if calls.get() == 3 {
                Err("boom")
            } else {
                Ok(())
            }
        });
        assert_eq!(result, Err("boom"));
        assert_eq!(calls.get(), 3);
    }

    #[test]
    fn test_collect_async_sequential() {
        let rt = tokio::runtime::Builder::new_current_thread()
            .build()
            .expect("failed to create runtime");
        let clock = stepping_clock(2.0);
        let in_flight = Cell::new(false);

        let durations = rt
            .block_on(collect_async(&clock, 4, || {
                assert!(!in_flight.get(), "iterations overlapped");
                in_flight.set(true);
                let flag = &in_flight;
                async move {
                    tokio::task::yield_now().await;
                    flag.set(false);
                    Ok::<_, ()>(())
                }
            }))
            .unwrap();

        assert_eq!(durations, vec![2.0; 4]);
    }
}
