#[cfg(feature = "perf")]
use std::time::Instant;

/// Drop-based timing probe around the hot paths (decode, render, encode).
///
/// Compiled in with `--features perf`, a no-op otherwise. Timings land on
/// the `perf` tracing target at debug level.
#[cfg(feature = "perf")]
pub struct PerfSpan {
    label: &'static str,
    started: Instant,
}

#[cfg(feature = "perf")]
impl PerfSpan {
    #[inline]
    pub fn enter(label: &'static str) -> Self {
        Self {
            label,
            started: Instant::now(),
        }
    }
}

#[cfg(feature = "perf")]
impl Drop for PerfSpan {
    fn drop(&mut self) {
        let elapsed_ms = self.started.elapsed().as_secs_f64() * 1000.0;
        tracing::debug!(target: "perf", label = self.label, elapsed_ms);
    }
}

#[cfg(not(feature = "perf"))]
pub struct PerfSpan;

#[cfg(not(feature = "perf"))]
impl PerfSpan {
    #[inline]
    pub fn enter(_label: &'static str) -> Self {
        PerfSpan
    }
}

#[macro_export]
macro_rules! perf_scope {
    ($label:expr) => {
        $crate::perf::PerfSpan::enter($label)
    };
}
