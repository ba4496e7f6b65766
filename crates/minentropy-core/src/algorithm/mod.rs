//! Substring statistics over a sample: suffix array and LCP array.

pub mod lcp_array;
pub mod suffix_array;

pub use lcp_array::LcpArray;
pub use suffix_array::SuffixArray;
