//! Integration tests, organized by area:
//! - `filter` - SWIFT filter completeness and geometry
//! - `verification` - banded DP, X-drop splitting, extension
//! - `match_store` - overlap suppression and compaction invariants
//! - `regions` - genomic region parsing
//! - `scenarios` - literal end-to-end searches

mod helpers;

mod filter;
mod match_store;
mod regions;
mod scenarios;
mod verification;
