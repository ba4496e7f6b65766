//! Longest-common-prefix array (Kasai et al.).

use std::ops::Index;

use super::suffix_array::SuffixArray;

/// `lcp[r]` is the common prefix length of the suffixes ranked `r - 1` and `r`.
///
/// The array has `n + 1` entries: `lcp[0]` and `lcp[n]` are zero sentinels,
/// so a left-to-right scan always ends by closing every open depth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LcpArray {
    lcp: Vec<usize>,
    max: usize,
}

impl LcpArray {
    pub fn new(text: &[u8], sa: &SuffixArray) -> Self {
        let n = text.len();
        let mut lcp = vec![0usize; n + 1];
        let rank = sa.ranks();

        let mut h = 0usize;
        for i in 0..n {
            if rank[i] == 0 {
                h = 0;
                continue;
            }
            let j = sa[rank[i] - 1];
            while i + h < n && j + h < n && text[i + h] == text[j + h] {
                h += 1;
            }
            lcp[rank[i]] = h;
            h = h.saturating_sub(1);
        }

        let max = lcp.iter().copied().max().unwrap_or(0);
        Self { lcp, max }
    }

    /// Longest repeated substring length.
    pub fn max(&self) -> usize {
        self.max
    }

    /// Visit every closed LCP interval in one left-to-right pass.
    ///
    /// `visit(floor, depth, occurrences)` is called once per interval: every
    /// length in `floor + 1..=depth` has a substring that starts at exactly
    /// `occurrences` positions, namely the suffixes of the interval. Nested
    /// intervals are reported before the interval that contains them.
    ///
    /// The frames of the explicit stack have strictly increasing depths in
    /// `1..=max`, so the stack never grows past `max + 2` entries.
    pub fn for_each_interval<F>(&self, mut visit: F)
    where
        F: FnMut(usize, usize, usize),
    {
        // (depth, number of lcp entries >= depth inside the interval)
        let mut stack: Vec<(usize, usize)> = Vec::with_capacity(self.max + 2);

        for &cur in &self.lcp[1..] {
            let mut carried = 0;
            while let Some(&(depth, entries)) = stack.last() {
                if depth <= cur {
                    break;
                }
                stack.pop();
                let parent = stack.last().map_or(0, |&(d, _)| d);
                visit(parent.max(cur), depth, entries + 1);
                match stack.last_mut() {
                    Some(top) if top.0 > cur => top.1 += entries,
                    _ => carried = entries,
                }
            }
            if cur > 0 {
                match stack.last_mut() {
                    Some(top) if top.0 == cur => top.1 += carried + 1,
                    _ => stack.push((cur, carried + 1)),
                }
            }
        }
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.lcp
    }

    pub fn len(&self) -> usize {
        self.lcp.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lcp.is_empty()
    }
}

impl Index<usize> for LcpArray {
    type Output = usize;

    fn index(&self, rank: usize) -> &usize {
        &self.lcp[rank]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn common_prefix(a: &[u8], b: &[u8]) -> usize {
        a.iter().zip(b).take_while(|(x, y)| x == y).count()
    }

    fn check_brute_force(text: &[u8]) {
        let sa = SuffixArray::new(text);
        let lcp = LcpArray::new(text, &sa);
        assert_eq!(lcp.len(), text.len() + 1);
        assert_eq!(lcp[0], 0);
        assert_eq!(lcp[text.len()], 0);
        let mut max = 0;
        for r in 1..text.len() {
            let expected = common_prefix(&text[sa[r - 1]..], &text[sa[r]..]);
            assert_eq!(lcp[r], expected, "rank {r} of {text:?}");
            max = max.max(expected);
        }
        assert_eq!(lcp.max(), max);
    }

    #[test]
    fn test_intervals_of_banana() {
        let sa = SuffixArray::new(b"banana");
        let lcp = LcpArray::new(b"banana", &sa);
        let mut seen = Vec::new();
        lcp.for_each_interval(|floor, depth, count| seen.push((floor, depth, count)));
        // "ana" twice, "a" three times, "na" twice
        assert_eq!(seen, vec![(1, 3, 2), (0, 1, 3), (0, 2, 2)]);
    }

    #[test]
    fn test_intervals_of_constant_text() {
        let text = [5u8; 6];
        let lcp = LcpArray::new(&text, &SuffixArray::new(&text));
        let mut counts = vec![0; 7];
        lcp.for_each_interval(|floor, depth, count| {
            for t in floor + 1..=depth {
                counts[t] = count;
            }
        });
        assert_eq!(&counts[1..6], &[6, 5, 4, 3, 2]);
    }

    #[test]
    fn test_banana() {
        let sa = SuffixArray::new(b"banana");
        let lcp = LcpArray::new(b"banana", &sa);
        assert_eq!(lcp.as_slice(), &[0, 1, 3, 0, 0, 2, 0]);
        assert_eq!(lcp.max(), 3);
    }

    #[test]
    fn test_constant_text() {
        let text = [0u8; 64];
        let sa = SuffixArray::new(&text);
        let lcp = LcpArray::new(&text, &sa);
        assert_eq!(lcp.max(), 63);
        check_brute_force(&text);
    }

    #[test]
    fn test_empty_and_single() {
        let lcp = LcpArray::new(&[], &SuffixArray::new(&[]));
        assert_eq!(lcp.as_slice(), &[0]);
        assert_eq!(lcp.max(), 0);
        check_brute_force(&[9]);
    }

    #[test]
    fn test_matches_brute_force() {
        let mut state: u64 = 0xDEAD_BEEF;
        for len in [2usize, 5, 31, 200, 777] {
            for modulus in [2u64, 4, 256] {
                let text: Vec<u8> = (0..len)
                    .map(|_| {
                        state = state
                            .wrapping_mul(6364136223846793005)
                            .wrapping_add(1442695040888963407);
                        ((state >> 33) % modulus) as u8
                    })
                    .collect();
                check_brute_force(&text);
            }
        }
    }
}
