//! Q-gram index over the query set.
//!
//! The index stores a bucket directory `dir` and an occurrence table `occ`;
//! `occ[dir[c]..dir[c+1])` lists every (seqId, offset) occurrence of q-gram
//! code `c`, grouped by seqId in stable order. Buckets whose cardinality
//! exceeds the abundance threshold are masked and answer the empty slice.
//! Masking depends only on the queries, never on the database.
//!
//! Two backends, chosen by the code-space size: a direct-address directory
//! when `sigma^q` is small enough, a hashed directory otherwise.

use rustc_hash::FxHashMap;

use crate::alphabet::Alphabet;
use crate::sequence::SeqRecord;

/// Largest code space served by the direct-address directory.
const MAX_DIRECT_TABLE: u64 = 1 << 26;

/// Bucket cardinality is never masked below this count.
const ABUNDANCE_FLOOR: usize = 100;

/// Rolling q-gram coder: pushes one symbol at a time, yields the code of the
/// window ending at that symbol once q definite symbols are in view. Symbols
/// outside the alphabet reset the window.
#[derive(Debug, Clone)]
pub struct RollingCoder {
    alphabet: Alphabet,
    q: usize,
    sigma: u64,
    /// sigma^(q-1), weight of the outgoing symbol.
    high_weight: u64,
    window: [u8; 32],
    head: usize,
    valid: usize,
    code: u64,
}

impl RollingCoder {
    pub fn new(alphabet: Alphabet, q: usize) -> Self {
        debug_assert!((1..=32).contains(&q));
        let sigma = alphabet.size() as u64;
        RollingCoder {
            alphabet,
            q,
            sigma,
            high_weight: sigma.pow(q as u32 - 1),
            window: [0; 32],
            head: 0,
            valid: 0,
            code: 0,
        }
    }

    pub fn reset(&mut self) {
        self.valid = 0;
        self.code = 0;
    }

    /// Push the next symbol; Some(code) once a full window is definite.
    #[inline]
    pub fn push(&mut self, symbol: u8) -> Option<u64> {
        let Some(rank) = self.alphabet.rank(symbol) else {
            self.reset();
            return None;
        };
        if self.valid == self.q {
            let out = self.window[self.head];
            self.code -= out as u64 * self.high_weight;
            self.valid -= 1;
        }
        self.window[self.head] = rank;
        self.head = (self.head + 1) % self.q;
        self.code = self.code * self.sigma + rank as u64;
        self.valid += 1;
        if self.valid == self.q {
            Some(self.code)
        } else {
            None
        }
    }
}

#[derive(Debug)]
enum Directory {
    /// Prefix sums over all sigma^q buckets, sentinel-terminated.
    Direct(Vec<u32>),
    /// (begin, end) ranges into occ for non-empty buckets.
    Hashed(FxHashMap<u64, (u32, u32)>),
}

#[derive(Debug)]
pub struct QGramIndex<'q> {
    queries: &'q [SeqRecord],
    alphabet: Alphabet,
    q: usize,
    dir: Directory,
    occ: Vec<(u32, u32)>,
    /// Masked bucket codes; small relative to the bucket count.
    masked: rustc_hash::FxHashSet<u64>,
}

impl<'q> QGramIndex<'q> {
    /// Single-threaded construction; the index is read-only afterwards.
    pub fn build(
        queries: &'q [SeqRecord],
        alphabet: Alphabet,
        q: usize,
        abundance_cut: f64,
    ) -> Self {
        let table_size = (alphabet.size() as u64).pow(q as u32);
        let use_direct = table_size <= MAX_DIRECT_TABLE;

        // counting pass
        let mut direct_counts: Vec<u32> = Vec::new();
        let mut hashed_counts: FxHashMap<u64, u32> = FxHashMap::default();
        if use_direct {
            direct_counts = vec![0u32; table_size as usize];
        }
        let mut total = 0usize;
        for record in queries {
            let mut coder = RollingCoder::new(alphabet, q);
            for &symbol in &record.seq {
                if let Some(code) = coder.push(symbol) {
                    if use_direct {
                        direct_counts[code as usize] += 1;
                    } else {
                        *hashed_counts.entry(code).or_insert(0) += 1;
                    }
                    total += 1;
                }
            }
        }

        // prefix sums into the directory, then a fill pass into occ
        let mut occ = vec![(0u32, 0u32); total];
        let (dir, mut cursors) = if use_direct {
            let mut dir = vec![0u32; table_size as usize + 1];
            let mut acc = 0u32;
            for (c, &count) in direct_counts.iter().enumerate() {
                dir[c] = acc;
                acc += count;
            }
            dir[table_size as usize] = acc;
            let cursors = dir[..table_size as usize].to_vec();
            (Directory::Direct(dir), CursorTable::Direct(cursors))
        } else {
            let mut codes: Vec<u64> = hashed_counts.keys().copied().collect();
            codes.sort_unstable();
            let mut map = FxHashMap::default();
            let mut cursors = FxHashMap::default();
            let mut acc = 0u32;
            for code in codes {
                let count = hashed_counts[&code];
                map.insert(code, (acc, acc + count));
                cursors.insert(code, acc);
                acc += count;
            }
            (Directory::Hashed(map), CursorTable::Hashed(cursors))
        };

        for (seq_id, record) in queries.iter().enumerate() {
            let mut coder = RollingCoder::new(alphabet, q);
            for (pos, &symbol) in record.seq.iter().enumerate() {
                if let Some(code) = coder.push(symbol) {
                    let offset = (pos + 1 - q) as u32;
                    let slot = cursors.bump(code);
                    occ[slot as usize] = (seq_id as u32, offset);
                }
            }
        }

        // single pass over bucket sizes flags over-abundant buckets
        let threshold = ABUNDANCE_FLOOR.max((abundance_cut * total as f64).floor() as usize);
        let mut masked = rustc_hash::FxHashSet::default();
        match &dir {
            Directory::Direct(dir) => {
                for c in 0..table_size as usize {
                    if (dir[c + 1] - dir[c]) as usize > threshold {
                        masked.insert(c as u64);
                    }
                }
            }
            Directory::Hashed(map) => {
                for (&code, &(begin, end)) in map {
                    if (end - begin) as usize > threshold {
                        masked.insert(code);
                    }
                }
            }
        }

        QGramIndex {
            queries,
            alphabet,
            q,
            dir,
            occ,
            masked,
        }
    }

    #[inline]
    pub fn q(&self) -> usize {
        self.q
    }

    #[inline]
    pub fn alphabet(&self) -> Alphabet {
        self.alphabet
    }

    #[inline]
    pub fn queries(&self) -> &'q [SeqRecord] {
        self.queries
    }

    pub fn coder(&self) -> RollingCoder {
        RollingCoder::new(self.alphabet, self.q)
    }

    /// Occurrences of a q-gram code; empty for masked or absent buckets.
    #[inline]
    pub fn bucket(&self, code: u64) -> &[(u32, u32)] {
        if self.masked.contains(&code) {
            return &[];
        }
        match &self.dir {
            Directory::Direct(dir) => {
                let c = code as usize;
                &self.occ[dir[c] as usize..dir[c + 1] as usize]
            }
            Directory::Hashed(map) => match map.get(&code) {
                Some(&(begin, end)) => &self.occ[begin as usize..end as usize],
                None => &[],
            },
        }
    }

    pub fn masked_bucket_count(&self) -> usize {
        self.masked.len()
    }
}

enum CursorTable {
    Direct(Vec<u32>),
    Hashed(FxHashMap<u64, u32>),
}

impl CursorTable {
    #[inline]
    fn bump(&mut self, code: u64) -> u32 {
        match self {
            CursorTable::Direct(cursors) => {
                let slot = cursors[code as usize];
                cursors[code as usize] += 1;
                slot
            }
            CursorTable::Hashed(cursors) => {
                let entry = cursors.get_mut(&code).expect("counted bucket");
                let slot = *entry;
                *entry += 1;
                slot
            }
        }
    }
}
