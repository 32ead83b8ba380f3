// std
use std::sync::atomic::{AtomicU64, Ordering};

/// Point-in-time copy of [`RefreshMetrics`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RefreshSnapshot {
	/// Refreshes that found an expired token.
	pub attempts: u64,
	/// Refreshes that returned a valid token, including reuse of a token another caller refreshed.
	pub successes: u64,
	/// Refreshes that returned an error.
	pub failures: u64,
	/// Refresh requests actually sent to the token endpoint.
	pub network_refreshes: u64,
}

/// Thread-safe counters shared by every clone of a client.
#[derive(Debug, Default)]
pub struct RefreshMetrics {
	attempts: AtomicU64,
	successes: AtomicU64,
	failures: AtomicU64,
	network_refreshes: AtomicU64,
}
impl RefreshMetrics {
	/// Refreshes that found an expired token.
	pub fn attempts(&self) -> u64 {
		self.attempts.load(Ordering::Relaxed)
	}

	/// Refreshes that returned a valid token.
	pub fn successes(&self) -> u64 {
		self.successes.load(Ordering::Relaxed)
	}

	/// Refreshes that returned an error.
	pub fn failures(&self) -> u64 {
		self.failures.load(Ordering::Relaxed)
	}

	/// Refresh requests actually sent; concurrent callers sharing one refresh count once.
	pub fn network_refreshes(&self) -> u64 {
		self.network_refreshes.load(Ordering::Relaxed)
	}

	/// Reads all counters at once.
	pub fn snapshot(&self) -> RefreshSnapshot {
		RefreshSnapshot {
			attempts: self.attempts(),
			successes: self.successes(),
			failures: self.failures(),
			network_refreshes: self.network_refreshes(),
		}
	}

	pub(crate) fn record_attempt(&self) {
		bump(&self.attempts);
	}

	pub(crate) fn record_success(&self) {
		bump(&self.successes);
	}

	pub(crate) fn record_failure(&self) {
		bump(&self.failures);
	}

	pub(crate) fn record_network_refresh(&self) {
		bump(&self.network_refreshes);
	}
}

fn bump(counter: &AtomicU64) {
	counter.fetch_add(1, Ordering::Relaxed);
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn snapshot_reflects_recorded_events() {
		let metrics = RefreshMetrics::default();

		metrics.record_attempt();
		metrics.record_attempt();
		metrics.record_network_refresh();
		metrics.record_success();
		metrics.record_success();

		assert_eq!(
			metrics.snapshot(),
			RefreshSnapshot { attempts: 2, successes: 2, failures: 0, network_refreshes: 1 }
		);
	}
}
