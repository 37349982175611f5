//! Version resolution and snapshot materialization for single documents

/// Index pages linking snapshots together
pub mod index;
/// Output path derivation and collision tracking
pub mod layout;
/// Writes retained versions to disk with rewritten metadata
pub mod materializer;
/// Historical revisions to a deduplicated version table
pub mod resolver;
/// Filesystem seam for generated output
pub mod writer;

pub use index::{DocumentIndex, IndexRow, PROJECT_INDEX_TITLE};
pub use layout::{OutputLayout, PathRegistry, sanitize_version};
pub use materializer::{MaterializedDocument, SnapshotMaterializer, TOP_INDEX_TITLE};
pub use resolver::{AUTO, LATEST, Snapshot, UNVERSIONED, VersionResolver, VersionTable};
pub use writer::{DiskWriter, MemoryWriter, OutputWriter};
