//! # xsdoc
//!
//! Cross-reference resolution for rendered XML schema documentation.
//!
//! A schema documentation page renders every element definition once, with a
//! unique id, and renders cross-references as small placeholder elements
//! pointing at those ids. This crate builds the visual hierarchy the reader
//! actually wants: every referenced definition is spliced in immediately after
//! its reference, moved on first use and cloned (id-stripped) on every later
//! use, with references nested inside spliced definitions expanded
//! transitively.
//!
//! ## Quick Start
//!
//! ```
//! use xsdoc::{resolve, xhtml};
//!
//! let page = r#"<div class="reference" ref="Image"/><div id="Image">An image.</div>"#;
//! let mut tree = xhtml::parse(page).unwrap();
//!
//! let report = resolve(&mut tree).unwrap();
//! assert_eq!(report.moved(), 1);
//! assert!(report.is_clean());
//! ```
//!
//! ## Working with the tree
//!
//! The [`DocTree`] arena is the only data structure in play: the parser
//! produces one, the [`Resolver`](resolve::Resolver) mutates it in place, and
//! the serializer writes it back out. Resolution is single-shot: build the
//! tree, resolve it once, serialize. Resolving the same tree a second time is
//! unsupported (the first-use bookkeeping would relocate already-spliced
//! definitions again).

pub mod dom;
pub mod error;
pub mod resolve;
pub mod visibility;
pub mod xhtml;

pub use dom::{Attribute, DocTree, NodeId};
pub use error::{Error, Result};
pub use resolve::{LinkKind, ResolveOptions, ResolveReport, Resolver, UnresolvedRef, resolve};
