//! Per-context symbol counts with a cached most common value.

/// Symbol frequencies observed after one context.
///
/// Most contexts of a byte sample are followed by only a handful of distinct
/// symbols, so counts are kept as a short list of `(symbol, count)` pairs
/// rather than a 256-entry array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct McvTracker {
    counts: Vec<(u8, u32)>,
    mode: u8,
    mode_count: u32,
}

impl McvTracker {
    /// Tracker whose first observation is `symbol`.
    pub fn new(symbol: u8) -> Self {
        Self {
            counts: vec![(symbol, 1)],
            mode: symbol,
            mode_count: 1,
        }
    }

    /// Count one more `symbol`. It becomes the mode if its count is now
    /// higher, or equal with a larger symbol value.
    pub fn update(&mut self, symbol: u8) {
        let count = match self.counts.iter_mut().find(|(s, _)| *s == symbol) {
            Some((_, c)) => {
                *c += 1;
                *c
            }
            None => {
                self.counts.push((symbol, 1));
                1
            }
        };
        if count > self.mode_count || (count == self.mode_count && symbol > self.mode) {
            self.mode = symbol;
            self.mode_count = count;
        }
    }

    pub fn mode(&self) -> u8 {
        self.mode
    }

    pub fn mode_count(&self) -> u32 {
        self.mode_count
    }

    pub fn count(&self, symbol: u8) -> u32 {
        self.counts
            .iter()
            .find(|(s, _)| *s == symbol)
            .map_or(0, |&(_, c)| c)
    }

    /// Number of distinct symbols seen.
    pub fn distinct(&self) -> usize {
        self.counts.len()
    }
}
