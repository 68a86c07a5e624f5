//! Conversion between XML text and [`XmlNode`] trees.

use std::fmt::Display;

use quick_xml::Reader;
use quick_xml::Writer;
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use dawproject_model::{DataError, Result};

use crate::node::XmlNode;

/// Parse XML text into its root element.
///
/// Attribute values and text are unescaped. Text is trimmed per element.
/// Declarations, comments and processing instructions are skipped.
pub fn parse_str(content: &str) -> Result<XmlNode> {
    if content.trim().is_empty() {
        return Err(DataError::xml("XML content cannot be empty"));
    }
    if !content.contains('<') {
        return Err(DataError::xml("content contains no XML elements"));
    }

    let mut reader = Reader::from_str(content);
    let mut stack: Vec<XmlNode> = Vec::new();
    let mut root: Option<XmlNode> = None;

    loop {
        let event = match reader.read_event() {
            Ok(event) => event,
            Err(e) => {
                return Err(DataError::xml(format!(
                    "{e} (at byte {})",
                    reader.buffer_position()
                )));
            }
        };
        match event {
            Event::Start(start) => stack.push(element(&start)?),
            Event::Empty(start) => attach(element(&start)?, &mut stack, &mut root)?,
            Event::End(_) => {
                let mut node = stack
                    .pop()
                    .ok_or_else(|| DataError::xml("closing tag without an open element"))?;
                node.text = node.text.trim().to_string();
                attach(node, &mut stack, &mut root)?;
            }
            Event::Text(text) => push_text(&mut stack, &String::from_utf8_lossy(&text))?,
            Event::CData(data) => push_text(&mut stack, &String::from_utf8_lossy(&data))?,
            Event::GeneralRef(reference) => {
                let resolved = match reference.resolve_char_ref().map_err(xml_error)? {
                    Some(ch) => ch.to_string(),
                    None => {
                        let name = String::from_utf8_lossy(&reference);
                        resolve_predefined_entity(&name)
                            .ok_or_else(|| DataError::xml(format!("unknown entity '&{name};'")))?
                            .to_string()
                    }
                };
                push_text(&mut stack, &resolved)?;
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(DataError::xml(format!("element <{}> is not closed", open.name)));
    }
    root.ok_or_else(|| DataError::xml("document has no root element"))
}

fn element(start: &BytesStart<'_>) -> Result<XmlNode> {
    let mut node = XmlNode::new(String::from_utf8_lossy(start.name().as_ref()));
    for attribute in start.attributes() {
        let attribute = attribute
            .map_err(|e| DataError::xml(format!("bad attribute in <{}>: {e}", node.name)))?;
        let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        let value = attribute
            .unescape_value()
            .map_err(|e| DataError::xml(format!("bad value for '{key}' in <{}>: {e}", node.name)))?
            .into_owned();
        node.attributes.insert(key, value);
    }
    Ok(node)
}

fn attach(node: XmlNode, stack: &mut [XmlNode], root: &mut Option<XmlNode>) -> Result<()> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(node);
    } else if root.is_some() {
        return Err(DataError::xml(format!(
            "second root element <{}>",
            node.name
        )));
    } else {
        *root = Some(node);
    }
    Ok(())
}

fn push_text(stack: &mut [XmlNode], text: &str) -> Result<()> {
    match stack.last_mut() {
        Some(node) => node.text.push_str(text),
        None if text.trim().is_empty() => {}
        None => return Err(DataError::xml("text outside the root element")),
    }
    Ok(())
}

/// Render a whole document: declaration plus the indented tree.
pub fn to_document_string(root: &XmlNode) -> Result<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(xml_error)?;
    write_element(&mut writer, root)?;
    let mut text = into_string(writer.into_inner())?;
    text.push('\n');
    Ok(text)
}

/// Render a single element on one line.
pub fn to_element_string(node: &XmlNode) -> Result<String> {
    let mut writer = Writer::new(Vec::new());
    write_element(&mut writer, node)?;
    into_string(writer.into_inner())
}

fn write_element(writer: &mut Writer<Vec<u8>>, node: &XmlNode) -> Result<()> {
    let mut start = BytesStart::new(node.name.as_str());
    for (key, value) in &node.attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if node.children.is_empty() && node.text.is_empty() {
        writer.write_event(Event::Empty(start)).map_err(xml_error)?;
        return Ok(());
    }

    writer.write_event(Event::Start(start)).map_err(xml_error)?;
    if !node.text.is_empty() {
        writer
            .write_event(Event::Text(BytesText::new(&node.text)))
            .map_err(xml_error)?;
    }
    for child in &node.children {
        write_element(writer, child)?;
    }
    writer
        .write_event(Event::End(BytesEnd::new(node.name.as_str())))
        .map_err(xml_error)?;
    Ok(())
}

fn into_string(bytes: Vec<u8>) -> Result<String> {
    String::from_utf8(bytes).map_err(xml_error)
}

fn xml_error(error: impl Display) -> DataError {
    DataError::xml(error.to_string())
}
