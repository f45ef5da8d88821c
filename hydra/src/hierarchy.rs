//! Validated hierarchy values.
//!
//! A [`Hierarchy`] is the only way a type sequence reaches the dispatch
//! engine: construction runs the structural checks, so dispatch never sees
//! an empty, duplicated, or misordered sequence. The checks are data
//! independent; a declaration either always validates or never does.

use std::any::TypeId;
use std::fmt;
use std::marker::PhantomData;

use rustc_hash::FxHashMap;
use thiserror::Error;
use tracing::debug;

use crate::lineage::{Concat, Lineage};
use crate::node::{NodeList, TypeNode};

/// Why a hierarchy declaration was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HierarchyError {
    /// The declared sequence names no types.
    #[error("hierarchy must name at least one type")]
    Empty,

    /// The same type appears at two positions.
    #[error("type `{name}` appears at positions {first} and {second}; members must be unique")]
    Duplicate {
        name: &'static str,
        first: usize,
        second: usize,
    },

    /// A base type precedes one of its descendants.
    #[error(
        "`{base}` (position {base_index}) precedes its descendant `{derived}` \
         (position {derived_index}); more-derived members must come first"
    )]
    OutOfOrder {
        base: &'static str,
        base_index: usize,
        derived: &'static str,
        derived_index: usize,
    },
}

/// A validated type hierarchy, declared most-derived-first.
///
/// The lineage `L` carries the member types for the dispatch engine; the
/// node list carries their runtime descriptors for validation, lookup, and
/// error reporting. Probing is first-match-wins, which makes the validated
/// order load-bearing: a misordered sequence would silently resolve to a
/// less-derived member, so it is rejected here instead.
pub struct Hierarchy<L: Lineage> {
    nodes: NodeList,
    positions: FxHashMap<TypeId, usize>,
    _lineage: PhantomData<L>,
}

impl<L: Lineage> Hierarchy<L> {
    /// Validate the declared lineage and build the hierarchy.
    pub fn new() -> Result<Self, HierarchyError> {
        let nodes = NodeList::new(L::nodes());
        validate(&nodes)?;
        let positions = nodes
            .iter()
            .enumerate()
            .map(|(position, node)| (node.id(), position))
            .collect();
        debug!(members = nodes.len(), "hierarchy validated");
        Ok(Self {
            nodes,
            positions,
            _lineage: PhantomData,
        })
    }

    /// Number of member types.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false for a validated hierarchy; mirrors the container API.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether `T` is a member.
    pub fn contains<T: 'static>(&self) -> bool {
        self.positions.contains_key(&TypeId::of::<T>())
    }

    /// Position of `T`, most-derived member at 0.
    pub fn index_of<T: 'static>(&self) -> Option<usize> {
        self.positions.get(&TypeId::of::<T>()).copied()
    }

    /// The descriptor at `index`, if in bounds.
    pub fn at(&self, index: usize) -> Option<&TypeNode> {
        self.nodes.at(index)
    }

    /// The member descriptors, most-derived first.
    pub fn nodes(&self) -> &NodeList {
        &self.nodes
    }

    /// Concatenate with another hierarchy, revalidating the combined order.
    ///
    /// Two individually valid hierarchies can concatenate into an invalid
    /// one (a root followed by its own descendants, say), so the result is
    /// checked like any fresh declaration.
    pub fn concat<R: Lineage>(
        &self,
        _other: &Hierarchy<R>,
    ) -> Result<Hierarchy<<L as Concat<R>>::Joined>, HierarchyError>
    where
        L: Concat<R>,
    {
        Hierarchy::new()
    }
}

impl<L: Lineage> fmt::Debug for Hierarchy<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hierarchy")
            .field(
                "members",
                &self.nodes.iter().map(TypeNode::name).collect::<Vec<_>>(),
            )
            .finish()
    }
}

fn validate(nodes: &NodeList) -> Result<(), HierarchyError> {
    if nodes.is_empty() {
        return Err(HierarchyError::Empty);
    }

    if !nodes.is_unique() {
        for (first, node) in nodes.iter().enumerate() {
            if let Some(offset) = nodes
                .iter()
                .skip(first + 1)
                .position(|other| other.id() == node.id())
            {
                return Err(HierarchyError::Duplicate {
                    name: node.name(),
                    first,
                    second: first + 1 + offset,
                });
            }
        }
    }

    // every pair of positions, not only adjacent ones: an unrelated member
    // between a base and its descendant must not mask the inversion
    for (base_index, earlier) in nodes.iter().enumerate() {
        for (derived_index, later) in nodes.iter().enumerate().skip(base_index + 1) {
            if earlier.is_strict_base_of(later) {
                return Err(HierarchyError::OutOfOrder {
                    base: earlier.name(),
                    base_index,
                    derived: later.name(),
                    derived_index,
                });
            }
        }
    }

    Ok(())
}
