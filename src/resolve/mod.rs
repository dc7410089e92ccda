//! Reference resolution passes.
//!
//! The rendered documentation tree contains "definition" elements (each with a
//! unique id) and "reference" elements pointing at definition ids. Resolution
//! splices a materialized copy of every referenced definition immediately
//! after its reference: the first reference to an id relocates the original
//! definition, every later reference gets an id-stripped clone. References
//! nested inside a freshly spliced definition are resolved transitively.
//!
//! ## Pipeline order
//!
//! The passes must run in this order, because the link passes assume the
//! hierarchy built by ordinary-reference resolution is already in place:
//!
//! 1. **Ordinary references** - recursive, whole-hierarchy splice
//! 2. **Extension links** - flat pass, reserved-prefix targets deleted
//! 3. **Type links** - flat pass, reserved-prefix targets deleted
//!
//! [`Resolver::resolve_all`] runs all three and returns a [`ResolveReport`].
//!
//! A `Resolver` is single-use per tree. Re-running the ordinary pass over an
//! already resolved tree is unsupported: the first-use bookkeeping would treat
//! every previously moved definition as unused and relocate it again.

mod links;
mod references;
mod report;

pub use report::{ResolveReport, UnresolvedRef};

use std::collections::HashSet;
use std::fmt;

use crate::dom::{Attribute, DocTree, NodeId};

/// Category of a reference element, selected by display-role class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkKind {
    /// Ordinary reference, resolved recursively.
    Reference,
    /// Extension link, resolved in a flat pass after ordinary references.
    Extension,
    /// Type link, resolved in a flat pass after extension links.
    Type,
}

impl LinkKind {
    /// Human-readable kind name, used in diagnostics.
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkKind::Reference => "reference",
            LinkKind::Extension => "extension",
            LinkKind::Type => "type",
        }
    }
}

impl fmt::Display for LinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Class names and attribute conventions of the rendered page.
///
/// `Default` provides the values the documentation site renders with; callers
/// with differently rendered trees can override any of them.
#[derive(Debug, Clone)]
pub struct ResolveOptions {
    /// Display-role class marking ordinary reference elements.
    pub reference_class: String,
    /// Display-role class marking extension-link elements.
    pub extension_class: String,
    /// Display-role class marking type-link elements.
    pub type_class: String,
    /// Class applied to every materialized definition (moved or cloned).
    pub linked_class: String,
    /// Attribute carrying the target definition id on a reference element.
    pub ref_attr: String,
    /// Target-id prefix for externally defined primitive types; link
    /// references with this prefix are deleted without resolution.
    pub reserved_prefix: String,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            reference_class: "reference".to_string(),
            extension_class: "extensionLink".to_string(),
            type_class: "typeLink".to_string(),
            linked_class: "linkedElement".to_string(),
            ref_attr: "ref".to_string(),
            reserved_prefix: "xsd:".to_string(),
        }
    }
}

impl ResolveOptions {
    /// The display-role class selecting references of a kind.
    pub fn class_for(&self, kind: LinkKind) -> &str {
        match kind {
            LinkKind::Reference => &self.reference_class,
            LinkKind::Extension => &self.extension_class,
            LinkKind::Type => &self.type_class,
        }
    }
}

/// Splices referenced definitions into place across a documentation tree.
///
/// The resolver carries all resolution state explicitly instead of writing
/// marker attributes onto shared nodes:
///
/// - `materialized` replaces the per-node `used` flag: an id enters the set
///   when its definition is relocated, so later references clone instead.
///   The set is shared across all three passes; a definition moved by the
///   ordinary pass is cloned by a link pass.
/// - `consumed` replaces the per-node `refAdded` marker: a reference resolved
///   by a deeper recursive scan is skipped when an outer scan reaches its
///   relocated node.
/// - `in_progress` is the chain of definition ids currently being expanded;
///   a reference back into the chain fails with
///   [`Error::CyclicReference`](crate::Error::CyclicReference) instead of
///   recursing unboundedly.
pub struct Resolver {
    options: ResolveOptions,
    /// Ids whose definition has already been relocated.
    materialized: HashSet<String>,
    /// Reference nodes already resolved (or deleted).
    consumed: HashSet<NodeId>,
    /// Definition ids on the current recursive expansion chain.
    in_progress: Vec<String>,
    /// Lazily created not-found placeholder; its text is rewritten per miss.
    placeholder: NodeId,
    placeholder_used: bool,
    /// Ordinal of the last processed reference, for diagnostics.
    counter: usize,
    report: ResolveReport,
}

impl Resolver {
    /// Create a resolver with the default page conventions.
    pub fn new() -> Self {
        Self::with_options(ResolveOptions::default())
    }

    /// Create a resolver with custom class names / conventions.
    pub fn with_options(options: ResolveOptions) -> Self {
        Self {
            options,
            materialized: HashSet::new(),
            consumed: HashSet::new(),
            in_progress: Vec::new(),
            placeholder: NodeId::NONE,
            placeholder_used: false,
            counter: 0,
            report: ResolveReport::new(),
        }
    }

    /// The options this resolver was built with.
    pub fn options(&self) -> &ResolveOptions {
        &self.options
    }

    /// The report accumulated so far.
    pub fn report(&self) -> &ResolveReport {
        &self.report
    }

    /// Run the full pipeline: ordinary references, then extension links, then
    /// type links.
    ///
    /// On a cyclic reference graph this fails with
    /// [`Error::CyclicReference`](crate::Error::CyclicReference) and the tree
    /// is left in an unspecified partially resolved state. Every other failure
    /// mode is non-fatal: missing definitions degrade to an inline
    /// `"<id> NOT FOUND"` placeholder plus a warning diagnostic, and the run
    /// completes.
    pub fn resolve_all(mut self, doc: &mut DocTree) -> crate::Result<ResolveReport> {
        let root = doc.document();
        self.resolve_references(doc, root)?;
        self.resolve_links(doc, LinkKind::Extension)?;
        self.resolve_links(doc, LinkKind::Type)?;
        Ok(self.report)
    }

    /// Materialize `target` immediately after `reference`.
    ///
    /// First use relocates the original; later uses insert an id-stripped
    /// clone. Either way the placed node is tagged with the linked-element
    /// class. Returns the placed node.
    fn splice(&mut self, doc: &mut DocTree, reference: NodeId, target: NodeId, first_use: bool) -> NodeId {
        let placed = if first_use {
            doc.detach(target);
            doc.insert_after(reference, target);
            self.report.moved += 1;
            target
        } else {
            let copy = doc.clone_subtree(target);
            doc.insert_after(reference, copy);
            self.report.cloned += 1;
            copy
        };
        let class = self.options.linked_class.clone();
        doc.add_class(placed, &class);
        placed
    }

    /// Materialize the not-found placeholder after `reference`, rewriting its
    /// text to name the missing id.
    ///
    /// There is a single placeholder node per resolver; because its text is
    /// overwritten on every miss, the relocated original only ever shows the
    /// most recent failed lookup. Clones keep the text they were created with.
    fn splice_placeholder(&mut self, doc: &mut DocTree, reference: NodeId, missing_id: &str) -> NodeId {
        if self.placeholder.is_none() {
            self.placeholder =
                doc.create_element("div", vec![Attribute::new("class", "notFound")]);
        }
        let placeholder = self.placeholder;
        doc.set_element_text(placeholder, &format!("{missing_id} NOT FOUND"));
        let first_use = !self.placeholder_used;
        self.placeholder_used = true;
        self.splice(doc, reference, placeholder, first_use)
    }

    /// Record a miss and emit the warning diagnostic.
    fn record_unresolved(&mut self, kind: LinkKind, target_id: &str, index: usize) {
        log::warn!("{kind} NOT FOUND: {index} '{kind}' with ID: {target_id}");
        self.report.unresolved.push(UnresolvedRef {
            kind,
            target_id: target_id.to_string(),
            index,
        });
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve a whole tree with the default conventions.
///
/// Convenience wrapper over [`Resolver::resolve_all`].
pub fn resolve(doc: &mut DocTree) -> crate::Result<ResolveReport> {
    Resolver::new().resolve_all(doc)
}
