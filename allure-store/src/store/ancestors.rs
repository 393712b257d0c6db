// Copyright (c) The allure-store Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Resolution of the containers that wrap a result or container.
//!
//! Containers only record edges from parent to child. [`ParentIndex`] inverts
//! those edges once per aggregation pass, then walks child → parent lookups
//! for each starting id.

use crate::model::Container;
use indexmap::IndexMap;
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

/// Containers keyed by id, in the order the reader listed them.
pub(crate) type ContainerMap = IndexMap<String, Container>;

/// A child id → parent container id lookup table.
#[derive(Debug)]
pub(crate) struct ParentIndex<'a> {
    containers: &'a ContainerMap,
    parent_of: HashMap<&'a str, &'a str>,
}

impl<'a> ParentIndex<'a> {
    /// Builds the index by scanning every container's child list once.
    ///
    /// If a child is listed by more than one container, the container that
    /// comes last in `containers` owns it.
    pub(crate) fn new(containers: &'a ContainerMap) -> Self {
        let mut parent_of = HashMap::new();
        for container in containers.values() {
            for child in &container.children {
                if let Some(previous) = parent_of.insert(child.as_str(), container.uuid.as_str()) {
                    debug!(
                        "`{child}` is listed as a child of both `{previous}` and `{}`, \
                         using `{}`",
                        container.uuid, container.uuid,
                    );
                }
            }
        }

        Self {
            containers,
            parent_of,
        }
    }

    /// Returns the containers wrapping `start_id`, outermost first.
    ///
    /// The walk stops at the first id without a parent, at a parent id that
    /// isn't in the container map, or on returning to an id already visited.
    /// Ids that have no parent produce an empty list.
    pub(crate) fn ancestors(&self, start_id: &str) -> Vec<&'a Container> {
        let mut ancestors = Vec::new();
        let mut visited = HashSet::from([start_id]);
        let mut current = start_id;

        while let Some(&parent_id) = self.parent_of.get(current) {
            if !visited.insert(parent_id) {
                warn!(
                    "containers above `{start_id}` form a cycle at `{parent_id}`, \
                     ignoring ancestors beyond it"
                );
                break;
            }
            let Some(parent) = self.containers.get(parent_id) else {
                // Dangling reference: resolution stops here.
                break;
            };
            ancestors.push(parent);
            current = parent_id;
        }

        ancestors.reverse();
        ancestors
    }
}
