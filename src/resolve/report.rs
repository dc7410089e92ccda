//! Resolution outcome summary.
//!
//! This module provides [`ResolveReport`], the record a [`Resolver`] builds up
//! while splicing referenced definitions into place: how many definitions were
//! moved or cloned, how many external-namespace links were dropped, and which
//! references could not be resolved.
//!
//! [`Resolver`]: crate::resolve::Resolver

use crate::resolve::LinkKind;

/// A reference whose target id had no matching definition.
///
/// The tree degrades locally (a "NOT FOUND" placeholder is spliced in) and the
/// miss is recorded here for callers that want to act on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedRef {
    /// Which pass encountered the miss.
    pub kind: LinkKind,
    /// The id that had no matching definition.
    pub target_id: String,
    /// Ordinal of the reference in processing order (1-based).
    pub index: usize,
}

/// Accumulated result of a full resolution run.
///
/// Produced by [`Resolver::resolve_all`](crate::resolve::Resolver::resolve_all).
///
/// # Example
///
/// ```ignore
/// let report = Resolver::new().resolve_all(&mut tree)?;
/// if !report.is_clean() {
///     for miss in report.unresolved() {
///         eprintln!("missing definition: {}", miss.target_id);
///     }
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct ResolveReport {
    /// Definitions relocated to their first referencing site.
    pub(crate) moved: usize,
    /// Id-stripped copies created for second and later references.
    pub(crate) cloned: usize,
    /// Reserved-prefix link references deleted without resolution.
    pub(crate) removed: usize,
    /// References whose target id had no matching definition.
    pub(crate) unresolved: Vec<UnresolvedRef>,
}

impl ResolveReport {
    /// Create a new empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of definitions moved to their first referencing site.
    pub fn moved(&self) -> usize {
        self.moved
    }

    /// Number of clones created for repeat references.
    pub fn cloned(&self) -> usize {
        self.cloned
    }

    /// Number of reserved-prefix references deleted outright.
    pub fn removed(&self) -> usize {
        self.removed
    }

    /// Total materialized copies (moves plus clones), placeholders included.
    pub fn materialized(&self) -> usize {
        self.moved + self.cloned
    }

    /// All references that had no matching definition.
    pub fn unresolved(&self) -> &[UnresolvedRef] {
        &self.unresolved
    }

    /// Check that every reference found its definition.
    pub fn is_clean(&self) -> bool {
        self.unresolved.is_empty()
    }
}
