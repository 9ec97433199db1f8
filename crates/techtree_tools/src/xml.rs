//! Catalog document parsing.
//!
//! Turns XML text into the core's [`Element`] tree. Only elements and
//! their attributes matter; text, comments and processing instructions
//! are skipped.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use techtree_core::document::Element;

use crate::error::{Result, ToolError};

/// Parse a document and return its root element, if any.
///
/// `origin` names the document in errors.
pub fn parse_document(text: &str, origin: &str) -> Result<Option<Element>> {
    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(true);

    let xml_error = |source: quick_xml::Error| ToolError::Xml {
        path: origin.to_string(),
        source,
    };

    let mut stack: Vec<Element> = Vec::new();
    let mut root = None;
    loop {
        match reader.read_event().map_err(xml_error)? {
            Event::Start(ref e) => stack.push(start_element(e).map_err(xml_error)?),
            Event::Empty(ref e) => {
                let element = start_element(e).map_err(xml_error)?;
                attach(&mut stack, &mut root, element);
            }
            Event::End(_) => {
                if let Some(element) = stack.pop() {
                    attach(&mut stack, &mut root, element);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    while let Some(element) = stack.pop() {
        tracing::warn!("Unclosed <{}> at end of {origin}", element.name);
        attach(&mut stack, &mut root, element);
    }
    Ok(root)
}

fn start_element(e: &BytesStart<'_>) -> std::result::Result<Element, quick_xml::Error> {
    let mut element = Element::new(String::from_utf8_lossy(e.name().as_ref()).into_owned());
    for attr in e.attributes() {
        let attr = attr?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value()?.into_owned();
        element.attributes.push((key, value));
    }
    Ok(element)
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None if root.is_none() => *root = Some(element),
        None => tracing::warn!("Ignoring extra top-level element <{}>", element.name),
    }
}
