//! Tag Codec
//!
//! Neutral tag tree plus the lossless bidirectional conversion to and from
//! the host's tag tree.

pub mod tag_data;
pub mod tag_operations;

pub use tag_data::{CompoundTag, Tag, TagKind};
pub use tag_operations::{
    compound_to_host, compound_to_neutral, to_host, to_host_opt, to_neutral, to_neutral_opt,
};
