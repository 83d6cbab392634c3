//! Durable per-page shards and the merge that folds them into one dataset.
//!
//! Layout under the configured output directory:
//!
//! ```text
//! <output_dir>/<source>/1.csv
//! <output_dir>/<source>/2.csv
//! ...
//! <output_dir>/<source>/all.csv   (consolidated output)
//! ```

pub mod error;
pub mod merge;
pub mod shards;

pub use error::StoreError;
pub use merge::{merge, MergeReport};
pub use shards::{ShardEntry, ShardStore, CONSOLIDATED_FILE_NAME};
