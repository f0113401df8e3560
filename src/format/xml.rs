//! Markup-tree adapter backed by quick-xml.
//!
//! An element with child elements reads as a map (repeated names kept in
//! order) and its interleaved text is dropped; any other element reads as its
//! text, kept verbatim including surrounding whitespace. Attributes, comments
//! and processing instructions are ignored. Sequences are written as `item`
//! child elements, and empty nodes as self-closing elements.

use std::fmt;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use super::Format;
use crate::document::{Node, ITEM};
use crate::error::ParamError;

fn syntax(message: impl fmt::Display) -> ParamError {
    ParamError::Syntax {
        format: Format::Xml,
        message: message.to_string(),
    }
}

fn write_error(message: impl fmt::Display) -> ParamError {
    ParamError::Write {
        format: Format::Xml,
        message: message.to_string(),
    }
}

/// An open element while reading.
struct Frame {
    name: String,
    text: String,
    children: Vec<(String, Node)>,
}

impl Frame {
    fn open(name: String) -> Self {
        Self {
            name,
            text: String::new(),
            children: Vec::new(),
        }
    }

    /// Text beside child elements is indentation and is dropped.
    fn close(self) -> (String, Node) {
        let node = if self.children.is_empty() {
            Node::Scalar(self.text)
        } else {
            Node::Map(self.children)
        };
        (self.name, node)
    }
}

fn element_name(start: &BytesStart<'_>) -> Result<String, ParamError> {
    String::from_utf8(start.name().as_ref().to_vec()).map_err(syntax)
}

/// Attach a finished element to its parent, or make it the root.
fn attach(
    stack: &mut [Frame],
    root: &mut Option<(String, Node)>,
    name: String,
    node: Node,
) -> Result<(), ParamError> {
    match stack.last_mut() {
        Some(parent) => {
            parent.children.push((name, node));
            Ok(())
        }
        None if root.is_none() => {
            *root = Some((name, node));
            Ok(())
        }
        None => Err(syntax(format!("second root element <{}>", name))),
    }
}

pub(super) fn parse(text: &str) -> Result<Node, ParamError> {
    let mut reader = Reader::from_str(text);

    let mut stack: Vec<Frame> = Vec::new();
    let mut root: Option<(String, Node)> = None;

    loop {
        let event = reader
            .read_event()
            .map_err(|err| syntax(format!("at byte {}: {}", reader.buffer_position(), err)))?;
        match event {
            Event::Start(start) => stack.push(Frame::open(element_name(&start)?)),
            Event::Empty(start) => {
                let name = element_name(&start)?;
                attach(&mut stack, &mut root, name, Node::scalar(""))?;
            }
            Event::Text(content) => {
                if let Some(frame) = stack.last_mut() {
                    frame.text.push_str(&content.unescape().map_err(syntax)?);
                }
            }
            Event::CData(data) => {
                if let Some(frame) = stack.last_mut() {
                    frame.text.push_str(&String::from_utf8_lossy(&data));
                }
            }
            Event::End(_) => {
                let frame = stack
                    .pop()
                    .ok_or_else(|| syntax("closing tag without an open element"))?;
                let (name, node) = frame.close();
                attach(&mut stack, &mut root, name, node)?;
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(frame) = stack.last() {
        return Err(syntax(format!("unclosed element <{}>", frame.name)));
    }
    let (name, node) = root.ok_or_else(|| syntax("document has no root element"))?;
    Ok(Node::Map(vec![(name, node)]))
}

fn write_node(writer: &mut Writer<Vec<u8>>, name: &str, node: &Node) -> Result<(), ParamError> {
    let empty = match node {
        Node::Scalar(text) => text.is_empty(),
        Node::Map(entries) => entries.is_empty(),
        Node::Seq(items) => items.is_empty(),
    };
    if empty {
        writer
            .write_event(Event::Empty(BytesStart::new(name)))
            .map_err(write_error)?;
        return Ok(());
    }
    writer
        .write_event(Event::Start(BytesStart::new(name)))
        .map_err(write_error)?;
    match node {
        Node::Scalar(text) => writer
            .write_event(Event::Text(BytesText::new(text)))
            .map_err(write_error)?,
        Node::Map(entries) => {
            for (key, child) in entries {
                write_node(writer, key, child)?;
            }
        }
        Node::Seq(items) => {
            for item in items {
                write_node(writer, ITEM, item)?;
            }
        }
    }
    writer
        .write_event(Event::End(BytesEnd::new(name)))
        .map_err(write_error)?;
    Ok(())
}

pub(super) fn render(doc: &Node) -> Result<String, ParamError> {
    let (name, root) = match doc.entries() {
        [(name, root)] => (name, root),
        entries => {
            return Err(write_error(format!(
                "document needs exactly one root element, found {}",
                entries.len()
            )))
        }
    };

    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(write_error)?;
    write_node(&mut writer, name, root)?;

    let mut text = String::from_utf8(writer.into_inner()).map_err(write_error)?;
    text.push('\n');
    Ok(text)
}
