//! Cache statistics

/// Counters for one collection's query cache
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups served from the cache
    pub hits: u64,
    /// Lookups that needed the network
    pub misses: u64,
    /// Entries dropped to stay within capacity
    pub evictions: u64,
    /// Entries currently held
    pub entries: usize,
    /// Maximum entries held
    pub capacity: usize,
}

impl CacheStats {
    /// Fraction of lookups served from the cache, as a percentage
    pub fn hit_rate(&self) -> f64 {
        let lookups = self.hits + self.misses;
        if lookups == 0 {
            return 0.0;
        }
        self.hits as f64 / lookups as f64 * 100.0
    }

    /// Whether the cache is holding as many entries as it may
    pub fn is_full(&self) -> bool {
        self.entries >= self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_rate() {
        let stats = CacheStats {
            hits: 3,
            misses: 1,
            ..Default::default()
        };
        assert!((stats.hit_rate() - 75.0).abs() < f64::EPSILON);
        assert_eq!(CacheStats::default().hit_rate(), 0.0);
    }

    #[test]
    fn test_is_full() {
        let stats = CacheStats {
            entries: 2,
            capacity: 2,
            ..Default::default()
        };
        assert!(stats.is_full());
    }
}
