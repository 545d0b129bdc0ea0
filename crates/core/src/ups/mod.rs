mod snapshot;
mod source;
mod status;

pub use snapshot::{Reading, StatusSnapshot};
pub use source::{RawSnapshot, SnapshotSource, UpscSource};
pub use status::{StatusFlag, StatusFlags};
