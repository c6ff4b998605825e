use std::collections::BTreeMap;

use quick_xml::Reader;
use quick_xml::events::Event;

use crate::domain::ResponseRecord;

use super::XmlError;

/// Decode a flat reply document into a [`ResponseRecord`].
///
/// Every direct child of the root element becomes one field with its
/// trimmed, unescaped text. Children with nested elements and repeated
/// children are rejected.
pub fn decode_response_xml(xml: &str) -> Result<ResponseRecord, XmlError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut fields = BTreeMap::<String, String>::new();
    let mut seen_root = false;
    let mut depth = 0usize;
    let mut current: Option<(String, String)> = None;

    loop {
        match reader.read_event()? {
            Event::Start(start) => {
                depth += 1;
                let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
                match depth {
                    1 => enter_root(&mut seen_root)?,
                    2 => current = Some((name, String::new())),
                    _ => return Err(nested(current)),
                }
            }
            Event::Empty(start) => {
                let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
                match depth {
                    0 => enter_root(&mut seen_root)?,
                    1 => insert_field(&mut fields, name, String::new())?,
                    _ => return Err(nested(current)),
                }
            }
            Event::Text(text) => {
                if let Some((_, value)) = current.as_mut() {
                    value.push_str(&text.unescape()?);
                }
            }
            Event::CData(data) => {
                if let Some((_, value)) = current.as_mut() {
                    value.push_str(&String::from_utf8_lossy(&data.into_inner()));
                }
            }
            Event::End(_) => {
                if depth == 2 {
                    if let Some((name, value)) = current.take() {
                        insert_field(&mut fields, name, value)?;
                    }
                }
                depth = depth.saturating_sub(1);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !seen_root {
        return Err(XmlError::InvalidDocument {
            reason: "no root element",
        });
    }
    if depth != 0 {
        return Err(XmlError::InvalidDocument {
            reason: "unclosed element",
        });
    }
    Ok(ResponseRecord::new(fields))
}

fn insert_field(
    fields: &mut BTreeMap<String, String>,
    name: String,
    value: String,
) -> Result<(), XmlError> {
    if fields.contains_key(&name) {
        return Err(XmlError::DuplicateField { field: name });
    }
    fields.insert(name, value);
    Ok(())
}

fn enter_root(seen_root: &mut bool) -> Result<(), XmlError> {
    if *seen_root {
        return Err(XmlError::InvalidDocument {
            reason: "multiple root elements",
        });
    }
    *seen_root = true;
    Ok(())
}

fn nested(current: Option<(String, String)>) -> XmlError {
    XmlError::NestedElement {
        field: current.map(|(name, _)| name).unwrap_or_default(),
    }
}
