//! SVG parsing from XML.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::ast::*;
use crate::error::{Error, Result};

/// Parse a complete SVG document.
pub fn parse_svg(svg: &str) -> Result<Document> {
    let mut reader = Reader::from_str(svg);

    let mut doctype = None;
    let mut root = None;

    loop {
        match reader.read_event()? {
            Event::DocType(dt) => {
                doctype = Some(String::from_utf8_lossy(&dt).into_owned());
            }
            Event::Start(start) => {
                root = Some(parse_element(&mut reader, &start)?);
                break;
            }
            Event::Empty(start) => {
                root = Some(parse_element_start(&start)?);
                break;
            }
            Event::Eof => break,
            // Declarations, comments, PIs and whitespace before the root
            _ => {}
        }
    }

    let root = root.ok_or_else(|| Error::InvalidSvg("No root element found".into()))?;

    Ok(Document { doctype, root })
}

/// Parse a markup fragment (zero or more sibling nodes without a shared
/// root). The nodes become the children of a synthetic `<g>` element.
pub fn parse_fragment(fragment: &str) -> Result<Element> {
    let wrapped = format!("<g>{}</g>", fragment);
    let doc = parse_svg(&wrapped)?;
    Ok(doc.root)
}

fn parse_element(reader: &mut Reader<&[u8]>, start: &BytesStart) -> Result<Element> {
    let mut element = parse_element_start(start)?;

    loop {
        match reader.read_event()? {
            Event::Start(start) => {
                element
                    .children
                    .push(Node::Element(parse_element(reader, &start)?));
            }
            Event::Empty(start) => {
                element
                    .children
                    .push(Node::Element(parse_element_start(&start)?));
            }
            Event::End(_) => break,
            Event::Text(text) => {
                let text = text.unescape()?;
                if !text.is_empty() {
                    element.children.push(Node::Text(text.into_owned()));
                }
            }
            Event::Comment(comment) => {
                element
                    .children
                    .push(Node::Comment(String::from_utf8_lossy(&comment).into_owned()));
            }
            Event::CData(cdata) => {
                element
                    .children
                    .push(Node::CData(String::from_utf8_lossy(&cdata).into_owned()));
            }
            Event::Eof => {
                return Err(Error::InvalidSvg("Unexpected end of file".into()));
            }
            _ => {}
        }
    }

    Ok(element)
}

fn parse_element_start(start: &BytesStart) -> Result<Element> {
    let name_bytes = start.name();
    let name = std::str::from_utf8(name_bytes.as_ref())?;

    let mut element = Element {
        name: QName::parse(name),
        attributes: Vec::new(),
        children: Vec::new(),
    };

    for attr in start.attributes() {
        let attr = attr.map_err(|e| Error::InvalidSvg(format!("Invalid attribute: {}", e)))?;
        let key = std::str::from_utf8(attr.key.as_ref())?;
        let value = attr.unescape_value()?;
        element.attributes.push(Attribute {
            name: QName::parse(key),
            value: value.into_owned(),
        });
    }

    Ok(element)
}
