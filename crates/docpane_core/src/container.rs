//! The container being browsed.

use crate::{Dialect, PartitionKeyDefinition, PartitionKeyResolver, PartitionKeyValue};
use derive_builder::Builder;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Identifies a logical container and how it is reached.
///
/// Immutable for the life of a browsing session.
///
/// # Examples
///
/// ```
/// use docpane_core::{ContainerHandle, Dialect, PartitionKeyDefinition};
///
/// let container = ContainerHandle::builder()
///     .database_id("store")
///     .container_id("products")
///     .dialect(Dialect::Relational)
///     .partition_key(PartitionKeyDefinition::single("/category"))
///     .build()
///     .unwrap();
/// assert_eq!(container.resolver().paths(), &["/category".to_string()]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters, Builder)]
#[serde(rename_all = "camelCase")]
#[builder(setter(into))]
pub struct ContainerHandle {
    /// Database identifier.
    database_id: String,

    /// Container (collection) identifier.
    container_id: String,

    /// Raw partition key definition, absent for unpartitioned containers.
    #[serde(default)]
    #[builder(default, setter(strip_option))]
    partition_key: Option<PartitionKeyDefinition>,

    /// Backend dialect.
    dialect: Dialect,

    /// Partition key value a resource token is scoped to, if any.
    #[serde(default)]
    #[builder(default, setter(strip_option))]
    resource_token_partition_key: Option<PartitionKeyValue>,
}

impl ContainerHandle {
    /// Creates a builder.
    pub fn builder() -> ContainerHandleBuilder {
        ContainerHandleBuilder::default()
    }

    /// Unpartitioned container handle.
    pub fn new(
        database_id: impl Into<String>,
        container_id: impl Into<String>,
        dialect: Dialect,
    ) -> Self {
        Self {
            database_id: database_id.into(),
            container_id: container_id.into(),
            partition_key: None,
            dialect,
            resource_token_partition_key: None,
        }
    }

    /// Sets the partition key definition.
    pub fn with_partition_key(mut self, definition: PartitionKeyDefinition) -> Self {
        self.partition_key = Some(definition);
        self
    }

    /// Resolver over this container's partition key.
    pub fn resolver(&self) -> PartitionKeyResolver {
        PartitionKeyResolver::new(self.partition_key.as_ref())
    }
}
