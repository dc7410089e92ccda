//! Pass 1: ordinary-reference resolution.
//!
//! Scans a subtree for reference elements in document order and splices the
//! referenced definition in after each one, recursing into whatever was just
//! spliced so transitively referenced definitions are expanded too:
//!
//! ```text
//! before:  <div class="reference" ref="A"/> ... <div id="A">...</div>
//! after:   <div class="reference" ref="A"/><div id="A" class="... linkedElement">...</div>
//! ```

use crate::dom::{DocTree, NodeId};
use crate::error::Error;
use crate::resolve::{LinkKind, Resolver};

impl Resolver {
    /// Resolve every ordinary reference in `start`'s subtree, in document
    /// order, splicing each target in and recursing into first-use moves
    /// (clones copy an already expanded subtree and are left alone).
    ///
    /// Unknown target ids degrade to the not-found placeholder and a warning;
    /// a reference back into the definition currently being expanded fails
    /// with [`Error::CyclicReference`].
    pub fn resolve_references(&mut self, doc: &mut DocTree, start: NodeId) -> crate::Result<()> {
        let class = self.options().reference_class.clone();
        let ref_attr = self.options().ref_attr.clone();

        for reference in doc.find_all_by_class_within(start, &class) {
            // Already handled by a deeper recursive scan before this node
            // was relocated into our subtree.
            if self.consumed.contains(&reference) {
                continue;
            }
            let Some(target_id) = doc.get_attr(reference, &ref_attr).map(str::to_string) else {
                continue;
            };
            self.consumed.insert(reference);
            self.counter += 1;
            let index = self.counter;

            let Some(target) = doc.get_by_id(&target_id) else {
                self.splice_placeholder(doc, reference, &target_id);
                self.record_unresolved(LinkKind::Reference, &target_id, index);
                continue;
            };

            // Cycle guards: a reference that is its own target, a reference
            // back into a definition that is being expanded on this chain, or
            // a definition that would be moved into its own subtree, can
            // never terminate.
            if target == reference
                || self.in_progress.iter().any(|id| id == &target_id)
                || doc.is_descendant_of(reference, target)
            {
                return Err(Error::CyclicReference {
                    id: target_id,
                    chain: self.in_progress.clone(),
                });
            }

            let first_use = self.materialized.insert(target_id.clone());
            let placed = self.splice(doc, reference, target, first_use);

            // Only a first-use move needs the recursive scan. A clone copies
            // a subtree that was fully expanded when the original moved, so
            // every nested reference inside it already has its copy in place;
            // re-scanning would splice duplicates (the cloned reference nodes
            // have fresh arena ids the consumed set knows nothing about).
            if first_use {
                self.in_progress.push(target_id);
                let result = self.resolve_references(doc, placed);
                self.in_progress.pop();
                result?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::dom::{Attribute, DocTree, NodeId};
    use crate::error::Error;
    use crate::resolve::Resolver;

    fn definition(tree: &mut DocTree, parent: NodeId, id: &str, text: &str) -> NodeId {
        let def = tree.create_element("div", vec![Attribute::new("id", id)]);
        let t = tree.create_text(text);
        tree.append(parent, def);
        tree.append(def, t);
        def
    }

    fn reference(tree: &mut DocTree, parent: NodeId, target: &str) -> NodeId {
        let r = tree.create_element(
            "div",
            vec![
                Attribute::new("class", "reference"),
                Attribute::new("ref", target),
            ],
        );
        tree.append(parent, r);
        r
    }

    fn next_sibling(tree: &DocTree, id: NodeId) -> NodeId {
        tree.get(id).unwrap().next_sibling
    }

    #[test]
    fn test_single_reference_moves_original() {
        let mut tree = DocTree::new();
        let root = tree.document();
        let r = reference(&mut tree, root, "X");
        let x = definition(&mut tree, root, "X", "def X");

        let mut resolver = Resolver::new();
        resolver.resolve_references(&mut tree, root).unwrap();

        // The original was relocated, not cloned
        assert_eq!(next_sibling(&tree, r), x);
        assert_eq!(tree.element_id(x), Some("X"));
        assert!(tree.has_class(x, "linkedElement"));
        assert_eq!(resolver.report().moved(), 1);
        assert_eq!(resolver.report().cloned(), 0);
    }

    #[test]
    fn test_second_reference_clones() {
        let mut tree = DocTree::new();
        let root = tree.document();
        let r1 = reference(&mut tree, root, "X");
        let r2 = reference(&mut tree, root, "X");
        let x = definition(&mut tree, root, "X", "def X");

        let mut resolver = Resolver::new();
        resolver.resolve_references(&mut tree, root).unwrap();

        assert_eq!(next_sibling(&tree, r1), x);

        let clone = next_sibling(&tree, r2);
        assert_ne!(clone, x);
        assert_eq!(tree.element_id(clone), None);
        assert!(tree.has_class(clone, "linkedElement"));
        assert_eq!(tree.collect_text(clone), "def X");
        // Lookup still finds the relocated original
        assert_eq!(tree.get_by_id("X"), Some(x));
        assert_eq!(resolver.report().moved(), 1);
        assert_eq!(resolver.report().cloned(), 1);
    }

    #[test]
    fn test_transitive_expansion() {
        let mut tree = DocTree::new();
        let root = tree.document();
        let r = reference(&mut tree, root, "A");
        let a = definition(&mut tree, root, "A", "A body ");
        let ra = reference(&mut tree, a, "B");
        let b = definition(&mut tree, root, "B", "B body ");
        let rb = reference(&mut tree, b, "C");
        let c = definition(&mut tree, root, "C", "C body");

        let mut resolver = Resolver::new();
        resolver.resolve_references(&mut tree, root).unwrap();

        // A spliced after its reference, B inside A, C inside B
        assert_eq!(next_sibling(&tree, r), a);
        assert_eq!(next_sibling(&tree, ra), b);
        assert_eq!(next_sibling(&tree, rb), c);
        assert_eq!(tree.collect_text(a), "A body B body C body");
        assert_eq!(resolver.report().moved(), 3);
    }

    #[test]
    fn test_missing_target_spliced_as_placeholder() {
        let mut tree = DocTree::new();
        let root = tree.document();
        let r = reference(&mut tree, root, "ghost");

        let mut resolver = Resolver::new();
        resolver.resolve_references(&mut tree, root).unwrap();

        let placeholder = next_sibling(&tree, r);
        assert!(placeholder.is_some());
        assert!(tree.has_class(placeholder, "notFound"));
        assert!(tree.has_class(placeholder, "linkedElement"));
        assert_eq!(tree.collect_text(placeholder), "ghost NOT FOUND");

        let report = resolver.report();
        assert_eq!(report.unresolved().len(), 1);
        assert_eq!(report.unresolved()[0].target_id, "ghost");
    }

    #[test]
    fn test_placeholder_text_tracks_latest_miss() {
        let mut tree = DocTree::new();
        let root = tree.document();
        let r1 = reference(&mut tree, root, "first");
        let r2 = reference(&mut tree, root, "second");

        let mut resolver = Resolver::new();
        resolver.resolve_references(&mut tree, root).unwrap();

        // The moved placeholder is shared, so the earlier splice shows the
        // most recent failed lookup; the clone keeps its creation-time text.
        let moved = next_sibling(&tree, r1);
        let cloned = next_sibling(&tree, r2);
        assert_eq!(tree.collect_text(moved), "second NOT FOUND");
        assert_eq!(tree.collect_text(cloned), "second NOT FOUND");
        assert_eq!(resolver.report().unresolved().len(), 2);
    }

    #[test]
    fn test_reference_without_ref_attr_is_skipped() {
        let mut tree = DocTree::new();
        let root = tree.document();
        let r = tree.create_element("div", vec![Attribute::new("class", "reference")]);
        tree.append(root, r);

        let mut resolver = Resolver::new();
        resolver.resolve_references(&mut tree, root).unwrap();

        assert!(next_sibling(&tree, r).is_none());
        assert_eq!(resolver.report().materialized(), 0);
    }

    #[test]
    fn test_clone_of_expanded_definition_is_not_rescanned() {
        // X is referenced twice and contains a nested reference to Y. The
        // first use expands X in place; the second use must take a plain
        // clone of the expanded subtree without resolving the cloned nested
        // reference again.
        let mut tree = DocTree::new();
        let root = tree.document();
        let r1 = reference(&mut tree, root, "X");
        let r2 = reference(&mut tree, root, "X");
        let x = definition(&mut tree, root, "X", "X body ");
        reference(&mut tree, x, "Y");
        definition(&mut tree, root, "Y", "Y body");

        let mut resolver = Resolver::new();
        resolver.resolve_references(&mut tree, root).unwrap();

        assert_eq!(resolver.report().moved(), 2, "X and Y each move once");
        assert_eq!(resolver.report().cloned(), 1, "one clone for the repeat use");
        assert_eq!(resolver.report().materialized(), 3);

        assert_eq!(next_sibling(&tree, r1), x);
        let clone = next_sibling(&tree, r2);
        let text = tree.collect_text(clone);
        assert_eq!(text, "X body Y body");
        assert_eq!(text.matches("Y body").count(), 1, "no duplicate Y in the clone");
    }

    #[test]
    fn test_reference_carrying_its_own_target_id_is_cyclic() {
        let mut tree = DocTree::new();
        let root = tree.document();
        let r = tree.create_element(
            "div",
            vec![
                Attribute::new("class", "reference"),
                Attribute::new("ref", "X"),
                Attribute::new("id", "X"),
            ],
        );
        tree.append(root, r);

        let mut resolver = Resolver::new();
        let err = resolver.resolve_references(&mut tree, root).unwrap_err();
        assert!(matches!(err, Error::CyclicReference { id, .. } if id == "X"));
        // The node was not spliced after itself and out of the document
        assert_eq!(tree.get(r).unwrap().parent, root);
    }

    #[test]
    fn test_self_reference_is_cyclic() {
        let mut tree = DocTree::new();
        let root = tree.document();
        let a = definition(&mut tree, root, "A", "A body");
        reference(&mut tree, a, "A");

        let mut resolver = Resolver::new();
        let err = resolver.resolve_references(&mut tree, root).unwrap_err();
        assert!(matches!(err, Error::CyclicReference { id, .. } if id == "A"));
    }

    #[test]
    fn test_mutual_cycle_is_detected() {
        let mut tree = DocTree::new();
        let root = tree.document();
        reference(&mut tree, root, "A");
        let a = definition(&mut tree, root, "A", "A body");
        reference(&mut tree, a, "B");
        let b = definition(&mut tree, root, "B", "B body");
        reference(&mut tree, b, "A");

        let mut resolver = Resolver::new();
        let err = resolver.resolve_references(&mut tree, root).unwrap_err();
        assert!(matches!(err, Error::CyclicReference { .. }));
    }

    #[test]
    fn test_nested_reference_not_reprocessed_by_outer_scan() {
        // B's body holds a reference that the recursive scan resolves while
        // expanding B; the outer document-order scan must then skip it.
        let mut tree = DocTree::new();
        let root = tree.document();
        let r = reference(&mut tree, root, "B");
        let b = definition(&mut tree, root, "B", "B body ");
        let rb = reference(&mut tree, b, "C");
        definition(&mut tree, root, "C", "C body");

        let mut resolver = Resolver::new();
        resolver.resolve_references(&mut tree, root).unwrap();

        assert_eq!(next_sibling(&tree, r), b);
        // Exactly one materialization for C
        let c = next_sibling(&tree, rb);
        assert_eq!(tree.element_id(c), Some("C"));
        assert_eq!(resolver.report().moved(), 2);
        assert_eq!(resolver.report().cloned(), 0);
    }
}
