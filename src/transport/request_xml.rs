use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use crate::domain::XmlTemplate;

use super::XmlError;

/// Parse a root-element template into its name and unescaped attributes.
///
/// Accepts an optional declaration followed by exactly one element with no
/// content, e.g. `<CHARGETOBILLREQUEST/>` or `<ROOT version="2"></ROOT>`.
pub fn parse_xml_template(input: &str) -> Result<(String, Vec<(String, String)>), XmlError> {
    let mut reader = Reader::from_str(input);
    reader.config_mut().trim_text(true);

    let mut root: Option<(String, Vec<(String, String)>)> = None;
    let mut open = false;

    loop {
        match reader.read_event()? {
            Event::Decl(_) if root.is_none() => {}
            Event::Comment(_) => {}
            Event::Empty(start) if root.is_none() => {
                root = Some(read_start(&start)?);
            }
            Event::Start(start) if root.is_none() => {
                root = Some(read_start(&start)?);
                open = true;
            }
            Event::End(_) if open => open = false,
            Event::Eof => break,
            Event::Text(_) | Event::CData(_) if open => {
                return Err(XmlError::InvalidTemplate {
                    reason: "root element must be empty",
                });
            }
            Event::Start(_) | Event::Empty(_) if open => {
                return Err(XmlError::InvalidTemplate {
                    reason: "root element must not have children",
                });
            }
            _ => {
                return Err(XmlError::InvalidTemplate {
                    reason: "expected a single root element",
                });
            }
        }
    }

    if open {
        return Err(XmlError::InvalidTemplate {
            reason: "root element is not closed",
        });
    }
    root.ok_or(XmlError::InvalidTemplate {
        reason: "no root element",
    })
}

fn read_start(start: &BytesStart<'_>) -> Result<(String, Vec<(String, String)>), XmlError> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut attributes = Vec::new();
    for attribute in start.attributes() {
        let attribute = attribute?;
        let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        let value = attribute.unescape_value()?.into_owned();
        attributes.push((key, value));
    }
    Ok((name, attributes))
}

/// Render the request document: declaration, root element from `template`,
/// then one child element per field in order with escaped text content.
pub fn encode_request_xml(
    template: &XmlTemplate,
    fields: &[(String, String)],
) -> Result<String, XmlError> {
    let mut writer = Writer::new(Vec::new());
    write_event(&mut writer, Event::Decl(BytesDecl::new("1.0", None, None)))?;

    let mut root = BytesStart::new(template.name());
    for (key, value) in template.attributes() {
        ensure_xml_chars(key, value)?;
        root.push_attribute((key.as_str(), value.as_str()));
    }
    write_event(&mut writer, Event::Start(root))?;

    for (key, value) in fields {
        ensure_xml_chars(key, value)?;
        write_event(&mut writer, Event::Start(BytesStart::new(key.as_str())))?;
        if !value.is_empty() {
            write_event(&mut writer, Event::Text(BytesText::new(value)))?;
        }
        write_event(&mut writer, Event::End(BytesEnd::new(key.as_str())))?;
    }

    write_event(&mut writer, Event::End(BytesEnd::new(template.name())))?;
    Ok(String::from_utf8(writer.into_inner())?)
}

/// Reject characters outside the XML 1.0 `Char` production; escaping cannot represent them.
fn ensure_xml_chars(field: &str, value: &str) -> Result<(), XmlError> {
    let valid = value.chars().all(|c| {
        matches!(c, '\t' | '\n' | '\r' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}')
            || c >= '\u{10000}'
    });
    if valid {
        Ok(())
    } else {
        Err(XmlError::InvalidCharacter {
            field: field.to_owned(),
        })
    }
}

fn write_event(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<(), XmlError> {
    writer
        .write_event(event)
        .map_err(|err| XmlError::Write(err.to_string()))
}
