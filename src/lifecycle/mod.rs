//! Lifecycle Layer
//!
//! Operations that span several statements and must keep file-tags and
//! implications consistent while tags and values change identity.
//! This is the surface command handlers call.

mod merge;
mod tag_ops;
mod value_ops;

#[cfg(test)]
mod tests;

pub use merge::{MergeReport, MergeWarning};
pub use tag_ops::TagLifecycleOperations;
pub use value_ops::ValueLifecycleOperations;
