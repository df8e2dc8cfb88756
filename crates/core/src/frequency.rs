//! Symbol frequency counting.
//!
//! A single pass over the input fills a 256-entry count table and records the
//! order in which each distinct symbol first appeared. That order seeds the
//! priority queue, which keeps tree construction reproducible.

/// Occurrence counts for every byte value seen in an input.
#[derive(Debug, Clone)]
pub struct FrequencyTable {
    counts: [u64; 256],
    /// Distinct symbols in first-occurrence order
    order: Vec<u8>,
}

impl FrequencyTable {
    /// Count every symbol of `data` in one pass.
    pub fn from_bytes(data: &[u8]) -> Self {
        let mut counts = [0u64; 256];
        let mut order = Vec::new();
        for &byte in data {
            let count = &mut counts[byte as usize];
            if *count == 0 {
                order.push(byte);
            }
            *count += 1;
        }
        Self { counts, order }
    }

    /// Count of `symbol` (0 if it never occurred).
    pub fn get(&self, symbol: u8) -> u64 {
        self.counts[symbol as usize]
    }

    /// Iterate `(symbol, count)` pairs in first-occurrence order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, u64)> + '_ {
        self.order
            .iter()
            .map(move |&symbol| (symbol, self.counts[symbol as usize]))
    }

    /// Number of distinct symbols.
    pub fn distinct(&self) -> usize {
        self.order.len()
    }

    /// Sum of all counts, i.e. the input length in symbols.
    pub fn total(&self) -> u64 {
        self.iter().map(|(_, count)| count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_abracadabra_counts() {
        let table = FrequencyTable::from_bytes(b"abracadabra");
        let pairs: Vec<_> = table.iter().collect();
        assert_eq!(
            pairs,
            vec![(b'a', 5), (b'b', 2), (b'r', 2), (b'c', 1), (b'd', 1)]
        );
        assert_eq!(table.distinct(), 5);
        assert_eq!(table.total(), 11);
        assert_eq!(table.get(b'z'), 0);
    }

    #[test]
    fn test_empty_input() {
        let table = FrequencyTable::from_bytes(b"");
        assert!(table.is_empty());
        assert_eq!(table.total(), 0);
        assert_eq!(table.iter().count(), 0);
    }

    #[test]
    fn test_first_occurrence_order_ignores_count() {
        let table = FrequencyTable::from_bytes(b"zyyxxx");
        let symbols: Vec<u8> = table.iter().map(|(s, _)| s).collect();
        assert_eq!(symbols, b"zyx".to_vec());
    }

    #[test]
    fn test_all_byte_values() {
        let data: Vec<u8> = (0..=255).collect();
        let table = FrequencyTable::from_bytes(&data);
        assert_eq!(table.distinct(), 256);
        assert!(table.iter().all(|(_, count)| count == 1));
    }
}
