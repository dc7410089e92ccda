//! Passes 2+3: extension and type link resolution.
//!
//! Link references are resolved across the whole tree in a flat pass, after
//! the ordinary-reference pass has built the hierarchy. Two differences from
//! the ordinary pass:
//!
//! - A target id carrying the reserved external-namespace prefix names an
//!   externally defined primitive type with no local definition to splice in;
//!   the reference is deleted outright, with no diagnostic.
//! - No recursion into the spliced definition.

use crate::dom::DocTree;
use crate::error::Error;
use crate::resolve::{LinkKind, Resolver};

impl Resolver {
    /// Resolve every link reference of `kind` across the tree, in document
    /// order.
    ///
    /// Shares first-use bookkeeping with the ordinary pass: a definition
    /// already relocated there is cloned here. A link inside its own
    /// not-yet-materialized target fails with
    /// [`Error::CyclicReference`](crate::Error::CyclicReference), since moving
    /// the definition would nest it into itself.
    pub fn resolve_links(&mut self, doc: &mut DocTree, kind: LinkKind) -> crate::Result<()> {
        let class = self.options().class_for(kind).to_string();
        let ref_attr = self.options().ref_attr.clone();
        let reserved = self.options().reserved_prefix.clone();

        for reference in doc.find_all_by_class(&class) {
            if self.consumed.contains(&reference) {
                continue;
            }
            let Some(target_id) = doc.get_attr(reference, &ref_attr).map(str::to_string) else {
                continue;
            };
            self.consumed.insert(reference);

            // Externally defined primitive type: nothing local to splice in.
            if target_id.starts_with(&reserved) {
                doc.detach(reference);
                self.report.removed += 1;
                continue;
            }

            self.counter += 1;
            let index = self.counter;

            match doc.get_by_id(&target_id) {
                Some(target) => {
                    let first_use = !self.materialized.contains(&target_id);
                    if target == reference
                        || (first_use && doc.is_descendant_of(reference, target))
                    {
                        return Err(Error::CyclicReference {
                            id: target_id,
                            chain: Vec::new(),
                        });
                    }
                    self.materialized.insert(target_id.clone());
                    self.splice(doc, reference, target, first_use);
                }
                None => {
                    self.splice_placeholder(doc, reference, &target_id);
                    self.record_unresolved(kind, &target_id, index);
                }
            }
        }

        Ok(())
    }
}
