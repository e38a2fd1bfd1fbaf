//! Nested containers of leaves.
//!
//! Observation, action and discount specs of an environment are not always a single
//! array. They can be sequences or string-keyed maps of arrays, nested to any depth.
//! [`Nest`] represents such a tree. Its methods transform the leaves while keeping
//! the containers as they are, so that a converted spec has exactly the same
//! structure as the original one.
use crate::error::BridgeError;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A tree of leaves of type `T`.
///
/// Keys of [`Nest::Map`] are kept sorted, so that traversal order does not depend on
/// insertion order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Nest<T> {
    /// A single leaf.
    Leaf(T),

    /// An ordered sequence of nests.
    Seq(Vec<Nest<T>>),

    /// A string-keyed map of nests.
    Map(BTreeMap<String, Nest<T>>),
}

impl<T> Nest<T> {
    /// Constructs a leaf.
    pub fn leaf(v: T) -> Self {
        Nest::Leaf(v)
    }

    /// Constructs a sequence.
    pub fn seq(items: impl IntoIterator<Item = Nest<T>>) -> Self {
        Nest::Seq(items.into_iter().collect())
    }

    /// Constructs a map from key-nest pairs.
    pub fn map_of<K: Into<String>>(items: impl IntoIterator<Item = (K, Nest<T>)>) -> Self {
        Nest::Map(items.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Returns `true` if this nest is a single leaf.
    pub fn is_leaf(&self) -> bool {
        matches!(self, Nest::Leaf(_))
    }

    /// Returns the leaf if this nest is a single leaf.
    pub fn as_leaf(&self) -> Option<&T> {
        match self {
            Nest::Leaf(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the child with the given key of a map.
    pub fn get(&self, key: &str) -> Option<&Nest<T>> {
        match self {
            Nest::Map(items) => items.get(key),
            _ => None,
        }
    }

    /// Returns the child at the given position of a sequence.
    pub fn at(&self, ix: usize) -> Option<&Nest<T>> {
        match self {
            Nest::Seq(items) => items.get(ix),
            _ => None,
        }
    }

    /// Returns the number of leaves.
    pub fn len(&self) -> usize {
        match self {
            Nest::Leaf(_) => 1,
            Nest::Seq(items) => items.iter().map(|n| n.len()).sum(),
            Nest::Map(items) => items.values().map(|n| n.len()).sum(),
        }
    }

    /// Returns `true` if the nest has no leaves.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the leaves in depth-first order, map entries in key order.
    pub fn flatten(&self) -> Vec<&T> {
        let mut leaves = Vec::with_capacity(self.len());
        self.collect_leaves(&mut leaves);
        leaves
    }

    fn collect_leaves<'a>(&'a self, leaves: &mut Vec<&'a T>) {
        match self {
            Nest::Leaf(v) => leaves.push(v),
            Nest::Seq(items) => items.iter().for_each(|n| n.collect_leaves(leaves)),
            Nest::Map(items) => items.values().for_each(|n| n.collect_leaves(leaves)),
        }
    }

    /// Applies `f` to every leaf, keeping the structure.
    pub fn map<U, F>(&self, mut f: F) -> Nest<U>
    where
        F: FnMut(&T) -> U,
    {
        self.map_leaves(&mut f)
    }

    fn map_leaves<U, F>(&self, f: &mut F) -> Nest<U>
    where
        F: FnMut(&T) -> U,
    {
        match self {
            Nest::Leaf(v) => Nest::Leaf(f(v)),
            Nest::Seq(items) => Nest::Seq(items.iter().map(|n| n.map_leaves(f)).collect()),
            Nest::Map(items) => Nest::Map(
                items
                    .iter()
                    .map(|(k, n)| (k.clone(), n.map_leaves(f)))
                    .collect(),
            ),
        }
    }

    /// Applies a fallible `f` to every leaf, stopping at the first error.
    pub fn try_map<U, E, F>(&self, mut f: F) -> std::result::Result<Nest<U>, E>
    where
        F: FnMut(&T) -> std::result::Result<U, E>,
    {
        self.try_map_leaves(&mut f)
    }

    fn try_map_leaves<U, E, F>(&self, f: &mut F) -> std::result::Result<Nest<U>, E>
    where
        F: FnMut(&T) -> std::result::Result<U, E>,
    {
        Ok(match self {
            Nest::Leaf(v) => Nest::Leaf(f(v)?),
            Nest::Seq(items) => Nest::Seq(
                items
                    .iter()
                    .map(|n| n.try_map_leaves(f))
                    .collect::<std::result::Result<_, E>>()?,
            ),
            Nest::Map(items) => Nest::Map(
                items
                    .iter()
                    .map(|(k, n)| Ok((k.clone(), n.try_map_leaves(f)?)))
                    .collect::<std::result::Result<_, E>>()?,
            ),
        })
    }

    /// Returns `true` if both nests have the same containers, lengths and keys.
    pub fn same_structure<U>(&self, other: &Nest<U>) -> bool {
        match (self, other) {
            (Nest::Leaf(_), Nest::Leaf(_)) => true,
            (Nest::Seq(a), Nest::Seq(b)) => {
                a.len() == b.len() && a.iter().zip(b.iter()).all(|(a, b)| a.same_structure(b))
            }
            (Nest::Map(a), Nest::Map(b)) => {
                a.len() == b.len()
                    && a
                        .iter()
                        .zip(b.iter())
                        .all(|((ka, a), (kb, b))| ka == kb && a.same_structure(b))
            }
            _ => false,
        }
    }

    /// Applies `f` to pairs of corresponding leaves of two nests.
    ///
    /// Fails with [`BridgeError::StructureMismatch`] if the structures differ, or with
    /// the first error returned by `f`.
    pub fn zip_with<U, V, F>(&self, other: &Nest<U>, mut f: F) -> Result<Nest<V>>
    where
        F: FnMut(&T, &U) -> Result<V>,
    {
        if !self.same_structure(other) {
            return Err(BridgeError::StructureMismatch.into());
        }
        self.zip_leaves(other, &mut f)
    }

    fn zip_leaves<U, V, F>(&self, other: &Nest<U>, f: &mut F) -> Result<Nest<V>>
    where
        F: FnMut(&T, &U) -> Result<V>,
    {
        Ok(match (self, other) {
            (Nest::Leaf(a), Nest::Leaf(b)) => Nest::Leaf(f(a, b)?),
            (Nest::Seq(a), Nest::Seq(b)) => Nest::Seq(
                a.iter()
                    .zip(b.iter())
                    .map(|(a, b)| a.zip_leaves(b, f))
                    .collect::<Result<_>>()?,
            ),
            (Nest::Map(a), Nest::Map(b)) => Nest::Map(
                a.iter()
                    .zip(b.values())
                    .map(|((k, a), b)| Ok((k.clone(), a.zip_leaves(b, f)?)))
                    .collect::<Result<_>>()?,
            ),
            _ => return Err(BridgeError::StructureMismatch.into()),
        })
    }
}
