//! Serialization of documents back to XML.
//!
//! Annotated diff documents are written with an XML declaration and configurable indentation.
//! Single elements can also be rendered on one line, which is how removed source subtrees are
//! quoted inside annotation comments.

use std::io::Write;

use quick_xml::{
  events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event},
  Writer,
};

use super::*;

impl Document {
  /// Writes the document as an XML string with an XML declaration.
  ///
  /// `indent` is the number of spaces per nesting level, `0` writes everything on one line.
  pub fn to_xml_string(&self, indent: usize) -> Result<String> {
    let mut buffer = Vec::new();
    self.write_to(&mut buffer, indent)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
  }

  /// Writes the document to any byte sink.
  pub fn write_to<W: Write>(&self, sink: W, indent: usize) -> Result<()> {
    let mut writer = match indent {
      0 => Writer::new(sink),
      n => Writer::new_with_indent(sink, b' ', n),
    };
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    write_element(&mut writer, &self.root)?;
    if indent > 0 {
      writer.get_mut().write_all(b"\n")?;
    }
    Ok(())
  }
}

impl Element {
  /// Renders the element and its subtree on a single line, without declaration.
  pub fn to_compact_string(&self) -> Result<String> {
    let mut writer = Writer::new(Vec::new());
    write_element(&mut writer, self)?;
    Ok(String::from_utf8_lossy(&writer.into_inner()).into_owned())
  }
}

/// Writes a document to a file, replacing any existing content.
pub fn write_document(path: impl AsRef<Path>, document: &Document, indent: usize) -> Result<()> {
  let path = path.as_ref();
  debug!("Writing document to {}", path.display());
  let file = std::fs::File::create(path)?;
  let mut sink = std::io::BufWriter::new(file);
  document.write_to(&mut sink, indent)?;
  sink.flush()?;
  Ok(())
}

/// Makes arbitrary text safe to use as comment content.
///
/// A comment must not contain `--` and must not end with `-`.
pub fn sanitize_comment(text: &str) -> String {
  let mut sanitized = text.to_string();
  while sanitized.contains("--") {
    sanitized = sanitized.replace("--", "- -");
  }
  if sanitized.ends_with('-') {
    sanitized.push(' ');
  }
  sanitized
}

/// Recursively writes an element.
fn write_element<W: Write>(writer: &mut Writer<W>, element: &Element) -> Result<()> {
  let name = element.name.to_string();
  let mut start = BytesStart::new(name.as_str());
  for attribute in &element.attributes {
    start.push_attribute((attribute.name.to_string().as_str(), attribute.value.as_str()));
  }

  if element.children.is_empty() {
    writer.write_event(Event::Empty(start))?;
    return Ok(());
  }

  writer.write_event(Event::Start(start))?;
  for child in &element.children {
    match child {
      Node::Element(child) => write_element(writer, child)?,
      Node::Text(text) => writer.write_event(Event::Text(BytesText::new(text)))?,
      Node::CData(data) => writer.write_event(Event::CData(BytesCData::new(data.as_str())))?,
      Node::Comment(comment) => {
        let comment = sanitize_comment(comment);
        writer.write_event(Event::Comment(BytesText::from_escaped(comment.as_str())))?
      },
    }
  }
  writer.write_event(Event::End(BytesEnd::new(name.as_str())))?;
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[traced_test]
  #[test]
  fn test_sanitize_comment() {
    assert_eq!(sanitize_comment("plain"), "plain");
    assert_eq!(sanitize_comment("a--b"), "a- -b");
    assert_eq!(sanitize_comment("a---b"), "a- - -b");
    assert_eq!(sanitize_comment("ends-"), "ends- ");
  }

  #[traced_test]
  #[test]
  fn test_compact_string_escapes() {
    let element = Element::new("language")
      .with_attribute("name", "de")
      .with_text("Autor & \"Verfasser\"")
      .with_child(Element::new("empty"));
    let compact = element.to_compact_string().unwrap();
    assert!(compact.starts_with(r#"<language name="de">"#));
    assert!(compact.contains("Autor &amp;"));
    assert!(compact.ends_with("<empty/></language>"));
  }

  #[traced_test]
  #[test]
  fn test_document_round_trip_through_file() {
    let document = Document::parse(
      r#"<Preferences xmlns:u="urn:u"><!-- a -- b --><u:Name>x &lt; y</u:Name><Raw><![CDATA[<p>]]></Raw></Preferences>"#,
    )
    .unwrap();

    let dir = tempdir().unwrap();
    let path = dir.path().join("out.xml");
    write_document(&path, &document, 2).unwrap();

    let written = std::fs::read_to_string(&path).unwrap();
    assert!(written.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
    assert!(written.contains("<!-- a - - b -->"));
    assert_eq!(Document::from_path(&path).unwrap().root.find_child("Name").unwrap().text(), "x < y");
    assert_eq!(Document::from_path(&path).unwrap().root.find_child("Raw").unwrap().text(), "<p>");
  }
}
