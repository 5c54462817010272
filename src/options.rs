//! Validated search parameters and the filter geometry derived from them.

use crate::alphabet::Alphabet;
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationMethod {
    AllLocal,
    BestLocal,
    BandedGlobal,
    BandedGlobalExtend,
}

impl VerificationMethod {
    pub fn from_name(name: &str) -> Result<Self> {
        match name {
            "all-local" => Ok(VerificationMethod::AllLocal),
            "best-local" => Ok(VerificationMethod::BestLocal),
            "banded-global" => Ok(VerificationMethod::BandedGlobal),
            "banded-global-extend" => Ok(VerificationMethod::BandedGlobalExtend),
            other => Err(Error::InvalidOption(format!(
                "unknown verification method: {other}"
            ))),
        }
    }

    /// Whether one alignment per parallelogram suffices.
    pub fn fast_exit(self) -> bool {
        matches!(self, VerificationMethod::BestLocal)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Gff,
    Tabular,
}

impl OutputFormat {
    pub fn from_name(name: &str) -> Result<Self> {
        match name {
            "gff" => Ok(OutputFormat::Gff),
            "tabular" => Ok(OutputFormat::Tabular),
            other => Err(Error::InvalidOption(format!(
                "unknown output format: {other}"
            ))),
        }
    }
}

/// All knobs of one search run, validated once up front.
#[derive(Debug, Clone)]
pub struct SearchParams {
    pub epsilon: f64,
    pub min_length: usize,
    pub qgram: usize,
    pub abundance_cut: f64,
    pub x_drop: f64,
    /// Requested diagonal tolerance; 0 derives it from (epsilon, min_length).
    pub delta: usize,
    pub min_repeat_length: usize,
    pub max_repeat_period: usize,
    pub disable_thresh: usize,
    pub compact_thresh: usize,
    pub num_matches: usize,
    pub forward: bool,
    pub reverse: bool,
    pub alphabet: Alphabet,
    pub verification: VerificationMethod,
    pub threads: usize,
}

impl Default for SearchParams {
    fn default() -> Self {
        SearchParams {
            epsilon: 0.05,
            min_length: 100,
            qgram: 0,
            abundance_cut: 1.0,
            x_drop: 5.0,
            delta: 0,
            min_repeat_length: 1000,
            max_repeat_period: 1,
            disable_thresh: usize::MAX,
            compact_thresh: 500,
            num_matches: 50,
            forward: true,
            reverse: true,
            alphabet: Alphabet::Dna5,
            verification: VerificationMethod::AllLocal,
            threads: 0,
        }
    }
}

/// Geometry of the q-gram filter for one (epsilon, min_length, q) triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterParams {
    pub qgram: usize,
    /// Maximal error count of a minimal-length match.
    pub errors: usize,
    /// Minimal shared q-gram count per parallelogram.
    pub threshold: usize,
    /// Diagonal tolerance, rounded up to a power of two.
    pub delta: usize,
    /// Parallelogram overlap; equals delta so hits tile with one-delta overlap.
    pub overlap: usize,
    /// Text window within which threshold many q-grams must fall.
    pub window: usize,
}

impl SearchParams {
    /// Resolve the q-gram length, 0 meaning automatic choice from epsilon.
    /// The choice keeps the filter threshold genuinely positive: a minimal
    /// eps-match with e errors still shares (l+1) - q(e+1) q-grams, so q
    /// may not exceed l/(e+1).
    pub fn effective_qgram(&self) -> usize {
        if self.qgram != 0 {
            return self.qgram;
        }
        let l = self.min_length;
        let errors = (self.epsilon * l as f64).floor() as usize;
        let by_eps = (1.0 / (self.epsilon + 0.00001)).floor() as usize;
        by_eps
            .min(32)
            .min(l.saturating_sub(1))
            .min(l / (errors + 1))
            .max(3)
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=0.25).contains(&self.epsilon) {
            return Err(Error::InvalidOption(format!(
                "epsilon must lie in [0, 0.25], got {}",
                self.epsilon
            )));
        }
        if self.min_length == 0 {
            return Err(Error::InvalidOption("minLength must be positive".into()));
        }
        if self.epsilon > 0.0 && self.epsilon * (self.min_length as f64) < 1.0 {
            return Err(Error::InvalidOption(format!(
                "epsilon * minLength must be at least 1, got {}",
                self.epsilon * self.min_length as f64
            )));
        }
        let q = self.effective_qgram();
        if !(3..=32).contains(&q) {
            return Err(Error::InvalidOption(format!(
                "q-gram length must lie in [3, 32], got {q}"
            )));
        }
        if q > self.min_length {
            return Err(Error::InvalidOption(format!(
                "q-gram length {q} exceeds minLength {}",
                self.min_length
            )));
        }
        if (self.alphabet.size() as u64).checked_pow(q as u32).is_none() {
            return Err(Error::InvalidOption(format!(
                "q-gram code space {}^{q} does not fit in 64 bits",
                self.alphabet.size()
            )));
        }
        if self.abundance_cut <= 0.0 || self.abundance_cut > 1.0 {
            return Err(Error::InvalidOption(format!(
                "abundance cut must lie in (0, 1], got {}",
                self.abundance_cut
            )));
        }
        if self.num_matches == 0 {
            return Err(Error::InvalidOption("numMatches must be positive".into()));
        }
        if !self.forward && !self.reverse {
            return Err(Error::InvalidOption(
                "at least one strand must be searched".into(),
            ));
        }
        Ok(())
    }

    /// Derive the SWIFT filter geometry. Call after `validate`.
    pub fn filter_params(&self) -> FilterParams {
        let q = self.effective_qgram();
        let l = self.min_length;
        let errors = (self.epsilon * l as f64).floor() as usize;
        let threshold = (l + 1)
            .saturating_sub(q * (errors + 1))
            .max(1);
        let delta = if self.delta > 0 {
            self.delta.next_power_of_two()
        } else {
            let raw = if self.epsilon > 0.0 {
                (self.epsilon * l as f64 / (1.0 - self.epsilon)).ceil() as usize
            } else {
                0
            };
            raw.max(1).next_power_of_two()
        };
        FilterParams {
            qgram: q,
            errors,
            threshold,
            delta,
            overlap: delta,
            window: l,
        }
    }

    /// Minimal score of a local alignment that can still contain an
    /// eps-match of minimal length.
    pub fn min_score_floor(&self) -> i64 {
        let l = self.min_length as f64;
        let e = (self.epsilon * l).floor();
        let s0 = ((l - e) / (e + 1.0)).ceil() as i64;
        if self.epsilon <= 0.0 {
            return s0;
        }
        let l1 = ((e + 1.0) / self.epsilon).ceil().max(0.0);
        let e1 = (self.epsilon * l1).floor();
        let s1 = ((l1 - e1) / (e1 + 1.0)).ceil() as i64;
        s0.min(s1)
    }
}
