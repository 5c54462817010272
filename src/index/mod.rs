pub mod fm;
pub mod qgram;
pub mod sparse_sa;

pub use fm::FmIndex;
pub use qgram::QGramIndex;
pub use sparse_sa::SparseSuffixArray;
