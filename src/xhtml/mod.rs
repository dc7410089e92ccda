//! XHTML boundary: loading rendered markup into a [`DocTree`] and writing a
//! tree back out.
//!
//! The resolver itself never touches markup; this module is the only place
//! that does. Input is the already rendered documentation page (well-formed
//! XHTML), output is the same markup with the resolved hierarchy in place.
//!
//! [`DocTree`]: crate::dom::DocTree

mod parser;
mod writer;

pub use parser::parse;
pub use writer::serialize;
