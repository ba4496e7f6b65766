//! Suffix array by prefix doubling with counting sorts.
//!
//! Suffixes are ordered lexicographically; when one suffix is a prefix of
//! another, the shorter one sorts first. Each doubling round ranks suffixes by
//! their first `2k` symbols, so the number of rounds is logarithmic in the
//! longest repeat and a constant sample is no slower than a random one.

use std::ops::Index;

/// Sorted suffix start offsets of a sample.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuffixArray {
    sa: Vec<usize>,
}

impl SuffixArray {
    /// Build the suffix array of `text`.
    pub fn new(text: &[u8]) -> Self {
        Self { sa: build(text) }
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.sa
    }

    pub fn len(&self) -> usize {
        self.sa.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sa.is_empty()
    }

    /// Rank of every text position (inverse permutation).
    pub fn ranks(&self) -> Vec<usize> {
        let mut rank = vec![0; self.sa.len()];
        for (r, &pos) in self.sa.iter().enumerate() {
            rank[pos] = r;
        }
        rank
    }
}

impl Index<usize> for SuffixArray {
    type Output = usize;

    fn index(&self, rank: usize) -> &usize {
        &self.sa[rank]
    }
}

/// Stable counting sort of `input` into `output` by `key`, keys in `0..classes`.
fn counting_sort<K>(input: &[usize], output: &mut [usize], classes: usize, key: K)
where
    K: Fn(usize) -> usize,
{
    let mut start = vec![0usize; classes + 1];
    for &i in input {
        start[key(i) + 1] += 1;
    }
    for c in 1..=classes {
        start[c] += start[c - 1];
    }
    for &i in input {
        let k = key(i);
        output[start[k]] = i;
        start[k] += 1;
    }
}

fn build(text: &[u8]) -> Vec<usize> {
    let n = text.len();
    if n == 0 {
        return Vec::new();
    }

    // Rank 0 is reserved for "past the end", so shorter suffixes sort first.
    let mut rank: Vec<usize> = text.iter().map(|&b| b as usize + 1).collect();
    let mut next_rank = vec![0usize; n];
    let mut sa: Vec<usize> = (0..n).collect();
    let mut scratch = vec![0usize; n];
    let mut classes = 257;
    let mut k = 1;

    loop {
        {
            let rank = &rank;
            let second = |i: usize| if i + k < n { rank[i + k] } else { 0 };
            counting_sort(&sa, &mut scratch, classes, second);
            counting_sort(&scratch, &mut sa, classes, |i| rank[i]);

            next_rank[sa[0]] = 1;
            for r in 1..n {
                let (a, b) = (sa[r - 1], sa[r]);
                let differs = rank[a] != rank[b] || second(a) != second(b);
                next_rank[b] = next_rank[a] + usize::from(differs);
            }
        }
        std::mem::swap(&mut rank, &mut next_rank);

        let distinct = rank[sa[n - 1]];
        if distinct == n || k >= n {
            break;
        }
        classes = distinct + 1;
        k *= 2;
    }

    sa
}

#[cfg(test)]
mod tests {
    use super::*;

    fn naive(text: &[u8]) -> Vec<usize> {
        let mut sa: Vec<usize> = (0..text.len()).collect();
        sa.sort_by(|&a, &b| text[a..].cmp(&text[b..]));
        sa
    }

    #[test]
    fn test_empty_text() {
        assert!(SuffixArray::new(&[]).is_empty());
    }

    #[test]
    fn test_banana() {
        let sa = SuffixArray::new(b"banana");
        assert_eq!(sa.as_slice(), &[5, 3, 1, 0, 4, 2]);
    }

    #[test]
    fn test_shorter_suffix_sorts_first() {
        let sa = SuffixArray::new(&[7, 7, 7, 7]);
        assert_eq!(sa.as_slice(), &[3, 2, 1, 0]);
    }

    #[test]
    fn test_matches_naive_sort() {
        let mut state: u32 = 12345;
        for len in [1usize, 2, 3, 10, 97, 500] {
            for modulus in [2u32, 3, 256] {
                let text: Vec<u8> = (0..len)
                    .map(|_| {
                        state = state.wrapping_mul(1_103_515_245).wrapping_add(12345);
                        ((state >> 16) % modulus) as u8
                    })
                    .collect();
                let sa = SuffixArray::new(&text);
                assert_eq!(sa.as_slice(), naive(&text).as_slice(), "len={len} mod={modulus}");
            }
        }
    }

    #[test]
    fn test_ranks_invert_the_array() {
        let sa = SuffixArray::new(b"mississippi");
        let rank = sa.ranks();
        for r in 0..sa.len() {
            assert_eq!(rank[sa[r]], r);
        }
    }
}
