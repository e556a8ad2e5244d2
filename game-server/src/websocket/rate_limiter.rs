use std::time::{Duration, Instant};

/// Token bucket guarding a single connection's inbound frames.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    tokens: u32,
    max_tokens: u32,
    refill_every: Duration,
    last_refill: Instant,
}

impl RateLimiter {
    pub fn new(max_tokens: u32, refill_every: Duration) -> Self {
        Self {
            tokens: max_tokens, // Start with a full bucket
            max_tokens,
            refill_every: refill_every.max(Duration::from_millis(1)),
            last_refill: Instant::now(),
        }
    }

    pub fn check_rate_limit(&mut self) -> bool {
        self.check_at(Instant::now())
    }

    pub fn check_at(&mut self, now: Instant) -> bool {
        self.refill_tokens(now);

        if self.tokens > 0 {
            self.tokens -= 1;
            true
        } else {
            false
        }
    }

    fn refill_tokens(&mut self, now: Instant) {
        let elapsed = now.saturating_duration_since(self.last_refill);
        let intervals = elapsed.as_millis() / self.refill_every.as_millis();
        if intervals == 0 {
            return;
        }

        let intervals = u32::try_from(intervals).unwrap_or(u32::MAX);
        self.tokens = self.tokens.saturating_add(intervals).min(self.max_tokens);
        // Keep the partial interval so slow trickles still earn tokens.
        self.last_refill += self.refill_every.saturating_mul(intervals);
    }

    pub fn remaining_tokens(&self) -> u32 {
        self.tokens
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(30, Duration::from_millis(500))
    }
}
