//! FM-index over a code-numeric text.
//!
//! The text uses symbol codes in `[1, sigma)` with 0 reserved for the
//! sentinel. The index keeps the C table, the BWT with block-sampled Occ
//! counts, and owns the sparse suffix array by value, so suffix positions
//! are answered without any cyclic references: the LF map and the sampled
//! values live in the same parent.

use crate::error::Result;
use crate::index::sparse_sa::{LfMap, SparseSuffixArray};

/// Occ sampling block length, compensated by a forward scan inside the block.
const OCC_BLOCK: usize = 64;

#[derive(Debug)]
pub struct FmIndex {
    sigma: usize,
    /// C[c] = number of text symbols smaller than c.
    c: Vec<u32>,
    bwt: Vec<u8>,
    /// occ_samples[block * sigma + c], counts before the block start.
    occ_samples: Vec<u32>,
    sparse_sa: SparseSuffixArray,
}

impl FmIndex {
    /// Build from a sentinel-terminated code text (exactly one trailing 0).
    pub fn build(text: &[u8], sigma: usize, sa_sampling: usize) -> Self {
        let n = text.len();
        let sa = build_suffix_array(text);
        let mut bwt = vec![0u8; n];
        for (row, &pos) in sa.iter().enumerate() {
            let p = pos as usize;
            bwt[row] = if p == 0 { text[n - 1] } else { text[p - 1] };
        }

        let mut freq = vec![0u32; sigma];
        for &ch in &bwt {
            freq[ch as usize] += 1;
        }
        let mut c = vec![0u32; sigma + 1];
        for i in 0..sigma {
            c[i + 1] = c[i] + freq[i];
        }

        let num_blocks = n.div_ceil(OCC_BLOCK);
        let mut occ_samples = vec![0u32; num_blocks * sigma];
        let mut running = vec![0u32; sigma];
        for bi in 0..num_blocks {
            occ_samples[bi * sigma..(bi + 1) * sigma].copy_from_slice(&running);
            let end = ((bi + 1) * OCC_BLOCK).min(n);
            for &ch in &bwt[bi * OCC_BLOCK..end] {
                running[ch as usize] += 1;
            }
        }

        let sparse_sa = SparseSuffixArray::sample(&sa, sa_sampling);

        FmIndex {
            sigma,
            c,
            bwt,
            occ_samples,
            sparse_sa,
        }
    }

    /// Occurrences of `c` in BWT[0..pos).
    #[inline]
    pub fn occ(&self, c: u8, pos: usize) -> u32 {
        if pos == 0 {
            return 0;
        }
        let bi = (pos - 1) / OCC_BLOCK;
        let mut count = self.occ_samples[bi * self.sigma + c as usize];
        for &ch in &self.bwt[bi * OCC_BLOCK..pos] {
            if ch == c {
                count += 1;
            }
        }
        count
    }

    /// Suffix-array value for row `i`, recovered through the sparse sample.
    pub fn sa(&self, i: usize) -> Result<usize> {
        self.sparse_sa.lookup(i, self)
    }

    pub fn sampling(&self) -> usize {
        self.sparse_sa.sampling()
    }
}

impl LfMap for FmIndex {
    #[inline]
    fn lf(&self, i: usize) -> usize {
        let ch = self.bwt[i];
        self.c[ch as usize] as usize + self.occ(ch, i) as usize
    }

    #[inline]
    fn len(&self) -> usize {
        self.bwt.len()
    }
}

/// Prefix-doubling suffix array construction, O(n log^2 n).
pub fn build_suffix_array(text: &[u8]) -> Vec<u32> {
    let n = text.len();
    if n == 0 {
        return Vec::new();
    }
    let mut sa: Vec<usize> = (0..n).collect();
    let mut rank: Vec<i64> = text.iter().map(|&b| b as i64).collect();
    let mut tmp: Vec<i64> = vec![0; n];

    let mut k = 1usize;
    loop {
        let key = |i: usize| {
            let next = if i + k < n { rank[i + k] } else { -1 };
            (rank[i], next)
        };
        sa.sort_unstable_by(|&a, &b| key(a).cmp(&key(b)));

        tmp[sa[0]] = 0;
        for w in 1..n {
            let prev = sa[w - 1];
            let cur = sa[w];
            tmp[cur] = tmp[prev] + if key(cur) != key(prev) { 1 } else { 0 };
        }
        rank.copy_from_slice(&tmp);
        if rank[sa[n - 1]] as usize == n - 1 || k >= n {
            break;
        }
        k <<= 1;
    }
    sa.into_iter().map(|x| x as u32).collect()
}
