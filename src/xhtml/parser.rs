//! XHTML parsing into the arena document tree.

use quick_xml::Reader;
use quick_xml::events::Event;

use crate::dom::{Attribute, DocTree, NodeId};
use crate::error::{Error, Result};

/// Parse rendered XHTML into a [`DocTree`].
///
/// Comments are preserved (the page renders XML source comments as display
/// blocks) and CDATA content is kept as text. Only the predefined XML
/// entities and numeric character references are resolved.
pub fn parse(content: &str) -> Result<DocTree> {
    let mut reader = Reader::from_str(content);

    let mut tree = DocTree::new();
    let mut stack: Vec<NodeId> = vec![tree.document()];

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let element = create_element(&mut tree, &e)?;
                let parent = *stack.last().expect("stack holds at least the document");
                tree.append(parent, element);
                stack.push(element);
            }
            Ok(Event::Empty(e)) => {
                let element = create_element(&mut tree, &e)?;
                let parent = *stack.last().expect("stack holds at least the document");
                tree.append(parent, element);
            }
            Ok(Event::End(e)) => {
                if stack.len() <= 1 {
                    let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                    return Err(Error::Malformed(format!("unexpected closing tag </{name}>")));
                }
                stack.pop();
            }
            Ok(Event::Text(e)) => {
                let parent = *stack.last().expect("stack holds at least the document");
                tree.append_text(parent, &String::from_utf8_lossy(e.as_ref()));
            }
            Ok(Event::CData(e)) => {
                let parent = *stack.last().expect("stack holds at least the document");
                tree.append_text(parent, &String::from_utf8_lossy(e.as_ref()));
            }
            Ok(Event::GeneralRef(e)) => {
                let entity = String::from_utf8_lossy(e.as_ref()).to_string();
                if let Some(resolved) = resolve_entity(&entity) {
                    let parent = *stack.last().expect("stack holds at least the document");
                    tree.append_text(parent, &resolved);
                }
            }
            Ok(Event::Comment(e)) => {
                let parent = *stack.last().expect("stack holds at least the document");
                let comment = tree.create_comment(String::from_utf8_lossy(e.as_ref()));
                tree.append(parent, comment);
            }
            Ok(Event::Decl(_)) | Ok(Event::PI(_)) | Ok(Event::DocType(_)) => {}
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::Xml(e)),
        }
    }

    if stack.len() > 1 {
        return Err(Error::Malformed("unclosed element at end of input".to_string()));
    }

    Ok(tree)
}

/// Build an element node from a start or empty tag.
fn create_element(tree: &mut DocTree, e: &quick_xml::events::BytesStart<'_>) -> Result<NodeId> {
    let tag = String::from_utf8_lossy(e.name().as_ref()).to_string();

    let mut attrs = Vec::new();
    for attr in e.attributes().flatten() {
        let name = String::from_utf8_lossy(attr.key.as_ref()).to_string();
        let value = String::from_utf8(attr.value.to_vec())?;
        attrs.push(Attribute::new(name, value));
    }

    Ok(tree.create_element(tag, attrs))
}

/// Resolve XML entity references: the five predefined entities plus numeric
/// character references.
fn resolve_entity(entity: &str) -> Option<String> {
    match entity {
        "amp" => return Some("&".to_string()),
        "lt" => return Some("<".to_string()),
        "gt" => return Some(">".to_string()),
        "quot" => return Some("\"".to_string()),
        "apos" => return Some("'".to_string()),
        _ => {}
    }

    let num = entity.strip_prefix('#')?;
    let code = if let Some(hex) = num.strip_prefix('x').or_else(|| num.strip_prefix('X')) {
        u32::from_str_radix(hex, 16).ok()?
    } else {
        num.parse::<u32>().ok()?
    };
    char::from_u32(code).map(|c| c.to_string())
}
