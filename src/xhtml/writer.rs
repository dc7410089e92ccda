//! XHTML serialization from the arena document tree.

use std::fmt::Write;

use crate::dom::{DocTree, NodeData, NodeId};

/// Serialize a [`DocTree`] back to XHTML.
///
/// Attributes are written in stored order; elements without children are
/// self-closed. The output is a markup fragment (no XML declaration), same as
/// the input the parser accepts.
pub fn serialize(tree: &DocTree) -> String {
    let mut out = String::new();
    for child in tree.children(tree.document()) {
        emit(tree, child, &mut out);
    }
    out
}

fn emit(tree: &DocTree, id: NodeId, out: &mut String) {
    let Some(node) = tree.get(id) else { return };

    match &node.data {
        NodeData::Document => {
            for child in tree.children(id) {
                emit(tree, child, out);
            }
        }
        NodeData::Element { tag, attrs, .. } => {
            let _ = write!(out, "<{tag}");
            for attr in attrs {
                let _ = write!(out, " {}=\"{}\"", attr.name, escape_xml(&attr.value));
            }
            if node.first_child.is_none() {
                out.push_str("/>");
            } else {
                out.push('>');
                for child in tree.children(id) {
                    emit(tree, child, out);
                }
                let _ = write!(out, "</{tag}>");
            }
        }
        NodeData::Text(text) => {
            out.push_str(&escape_xml(text));
        }
        NodeData::Comment(text) => {
            let _ = write!(out, "<!--{text}-->");
        }
    }
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
