//! WAL pipeline types shared between listeners and processors

pub mod position;

pub use position::CommitPosition;
