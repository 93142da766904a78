//! Per-provider rate-limit cool-down timers.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Which provider a timer belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderSlot {
    /// Preferred provider.
    Primary,
    /// Secondary provider.
    Fallback,
}

impl ProviderSlot {
    /// Slot label for logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Fallback => "fallback",
        }
    }
}

impl fmt::Display for ProviderSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shared cool-down state for the two providers.
///
/// Deadlines are millisecond offsets from a fixed origin and only move
/// forward (`fetch_max`) until [`reset`](Self::reset). Two racing callers may
/// both observe a provider as available and make one wasted call each; that is
/// accepted, the timers are advisory.
#[derive(Debug)]
pub struct ProviderCooldowns {
    origin: Instant,
    primary_until_ms: AtomicU64,
    fallback_until_ms: AtomicU64,
    consecutive_both_limited: AtomicU64,
    primary_cooldown: Duration,
    fallback_cooldown: Duration,
}

impl ProviderCooldowns {
    /// Tracker with per-slot cool-down lengths.
    pub fn new(primary_cooldown: Duration, fallback_cooldown: Duration) -> Self {
        Self {
            origin: Instant::now(),
            primary_until_ms: AtomicU64::new(0),
            fallback_until_ms: AtomicU64::new(0),
            consecutive_both_limited: AtomicU64::new(0),
            primary_cooldown,
            fallback_cooldown,
        }
    }

    fn now_ms(&self) -> u64 {
        u64::try_from(self.origin.elapsed().as_millis()).unwrap_or(u64::MAX)
    }

    fn deadline(&self, slot: ProviderSlot) -> &AtomicU64 {
        match slot {
            ProviderSlot::Primary => &self.primary_until_ms,
            ProviderSlot::Fallback => &self.fallback_until_ms,
        }
    }

    /// Configured cool-down length applied on a rate-limit error.
    pub const fn cooldown_for(&self, slot: ProviderSlot) -> Duration {
        match slot {
            ProviderSlot::Primary => self.primary_cooldown,
            ProviderSlot::Fallback => self.fallback_cooldown,
        }
    }

    /// Time left in the provider's cool-down, or `None` when available.
    pub fn remaining(&self, slot: ProviderSlot) -> Option<Duration> {
        let until = self.deadline(slot).load(Ordering::Acquire);
        let now = self.now_ms();
        (now < until).then(|| Duration::from_millis(until - now))
    }

    /// Whether `slot` is still cooling down.
    pub fn is_limited(&self, slot: ProviderSlot) -> bool {
        self.remaining(slot).is_some()
    }

    /// Start the provider's configured cool-down from now.
    pub fn mark_limited(&self, slot: ProviderSlot) -> Duration {
        let cooldown = self.cooldown_for(slot);
        self.extend(slot, cooldown);
        cooldown
    }

    /// Push the deadline to at least now + `duration`. Never moves it back.
    pub fn extend(&self, slot: ProviderSlot, duration: Duration) {
        let wanted = self
            .now_ms()
            .saturating_add(u64::try_from(duration.as_millis()).unwrap_or(u64::MAX));
        self.deadline(slot).fetch_max(wanted, Ordering::AcqRel);
    }

    /// Clear both timers and the counter.
    pub fn reset(&self) {
        self.primary_until_ms.store(0, Ordering::Release);
        self.fallback_until_ms.store(0, Ordering::Release);
        self.consecutive_both_limited.store(0, Ordering::Release);
    }

    /// Count one fast failure with every provider limited; returns the new count.
    pub fn record_both_limited(&self) -> u64 {
        self.consecutive_both_limited.fetch_add(1, Ordering::AcqRel) + 1
    }

    /// Reset the both-limited counter.
    pub fn record_success(&self) {
        self.consecutive_both_limited.store(0, Ordering::Release);
    }

    /// Consecutive fail-fast calls since the last success.
    pub fn consecutive_both_limited(&self) -> u64 {
        self.consecutive_both_limited.load(Ordering::Acquire)
    }
}

impl Default for ProviderCooldowns {
    fn default() -> Self {
        Self::new(Duration::from_secs(60), Duration::from_secs(120))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_state_is_available() {
        let cooldowns = ProviderCooldowns::default();
        assert!(!cooldowns.is_limited(ProviderSlot::Primary));
        assert!(!cooldowns.is_limited(ProviderSlot::Fallback));
        assert_eq!(cooldowns.consecutive_both_limited(), 0);
    }

    #[test]
    fn test_mark_limited_uses_configured_duration() {
        let cooldowns = ProviderCooldowns::default();
        assert_eq!(cooldowns.mark_limited(ProviderSlot::Fallback), Duration::from_secs(120));

        let remaining = cooldowns.remaining(ProviderSlot::Fallback).unwrap();
        assert!(remaining <= Duration::from_secs(120));
        assert!(remaining > Duration::from_secs(119));
        assert!(!cooldowns.is_limited(ProviderSlot::Primary));
    }

    #[test]
    fn test_deadline_never_moves_back() {
        let cooldowns = ProviderCooldowns::default();
        cooldowns.extend(ProviderSlot::Primary, Duration::from_secs(300));
        cooldowns.extend(ProviderSlot::Primary, Duration::from_secs(10));

        let remaining = cooldowns.remaining(ProviderSlot::Primary).unwrap();
        assert!(remaining > Duration::from_secs(290));
    }

    #[test]
    fn test_reset_clears_everything() {
        let cooldowns = ProviderCooldowns::default();
        cooldowns.mark_limited(ProviderSlot::Primary);
        cooldowns.mark_limited(ProviderSlot::Fallback);
        cooldowns.record_both_limited();

        cooldowns.reset();

        assert!(!cooldowns.is_limited(ProviderSlot::Primary));
        assert!(!cooldowns.is_limited(ProviderSlot::Fallback));
        assert_eq!(cooldowns.consecutive_both_limited(), 0);
    }

    #[test]
    fn test_counter() {
        let cooldowns = ProviderCooldowns::default();
        assert_eq!(cooldowns.record_both_limited(), 1);
        assert_eq!(cooldowns.record_both_limited(), 2);
        cooldowns.record_success();
        assert_eq!(cooldowns.consecutive_both_limited(), 0);
    }

    #[test]
    fn test_zero_duration_is_not_limited() {
        let cooldowns = ProviderCooldowns::new(Duration::ZERO, Duration::ZERO);
        cooldowns.mark_limited(ProviderSlot::Primary);
        assert!(!cooldowns.is_limited(ProviderSlot::Primary));
    }
}
