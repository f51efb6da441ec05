//! Core data types for the docpane document explorer.
//!
//! This crate provides the types shared by every docpane interface: the backend
//! [`Dialect`], the [`ContainerHandle`] being browsed, partition key definitions
//! and the [`PartitionKeyResolver`], raw backend documents and the
//! [`DocumentIdentity`] rows shown in the document list.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod container;
mod dialect;
mod document;
mod identity;
mod partition_key;
mod resolver;

pub use container::{ContainerHandle, ContainerHandleBuilder, ContainerHandleBuilderError};
pub use dialect::Dialect;
pub use document::{RawDocument, format_json};
pub use identity::DocumentIdentity;
pub use partition_key::{
    PartitionKeyDefinition, PartitionKeyDefinitionBuilder, PartitionKeyDefinitionBuilderError,
    PartitionKeyKind, PartitionKeyValue, WRAPPER_MARKER, canonicalize,
};
pub use resolver::{
    PartitionKeyResolver, extract_values, has_shard_key, is_extended_key_enabled,
};
