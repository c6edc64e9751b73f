//! OWA JSON to SOAP envelope translation
//!
//! Decodes the upstream JSON response and emits SOAP XML events driven by
//! the operation's expected response type. The JSON side carries no
//! namespaces and frequently omits discriminators, so resolution goes
//! through the registry's derived choice tables and hook registry;
//! response item arrays get their discriminators stamped in up front.

use std::io::{Read, Write};

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{Breadcrumb, Error, Result};
use crate::namespaces::{ENVELOPE_XMLNS, SOAP_BODY_TAG, SOAP_ENVELOPE_TAG, SOAP_HEADER_TAG, XML_DECLARATION};
use crate::registry::{
    registry, Choice, JsonElement, JsonObject, JsonType, Operation, Registry, SimpleKind, TypeDef,
};

/// The decoded shape of every OWA service response
#[derive(Debug, Deserialize)]
struct JsonSoapMessage {
    #[serde(rename = "Header", default)]
    header: Option<Value>,
    #[serde(rename = "Body", default)]
    body: Option<Value>,
}

/// Translate an OWA JSON response read from `reader` into a SOAP envelope
/// written to `writer`, driven by the operation the request resolved to.
pub fn json_to_soap<R: Read, W: Write>(
    reader: R,
    op: &Operation,
    mut writer: W,
    indent: bool,
) -> Result<()> {
    let reg = registry();
    let msg: JsonSoapMessage = serde_json::from_reader(reader)?;
    log::debug!("translating {} response", op.action);

    writer.write_all(XML_DECLARATION.as_bytes())?;
    let xml = if indent {
        Writer::new_with_indent(writer, b' ', 1)
    } else {
        Writer::new(writer)
    };
    let mut em = XmlEmitter { writer: xml };

    let xmlns: Vec<(&str, String)> = ENVELOPE_XMLNS
        .iter()
        .map(|(name, uri)| (*name, uri.to_string()))
        .collect();
    em.start_with(SOAP_ENVELOPE_TAG, &xmlns)?;

    if let Some(header) = msg.header.filter(|v| !v.is_null()) {
        translate_value(&mut em, reg, header, reg.response_header_element())
            .at(SOAP_HEADER_TAG)?;
    }

    if let Some(mut body) = msg.body.filter(|v| !v.is_null()) {
        em.start(SOAP_BODY_TAG)?;
        stamp_response_items(reg, op, &mut body).at(SOAP_BODY_TAG)?;
        translate_value(&mut em, reg, body, &op.response).at(SOAP_BODY_TAG)?;
        em.end(SOAP_BODY_TAG)?;
    }

    em.end(SOAP_ENVELOPE_TAG)
}

// The per-item response messages all share one JSON array, and the type
// hint the upstream puts on them is either absent or ambiguous. Stamp
// every object item with `<response element>Message`, which is exactly the
// key the response container's choice table is wired with.
fn stamp_response_items(reg: &Registry, op: &Operation, body: &mut Value) -> Result<()> {
    let Value::Object(map) = body else {
        return Ok(());
    };
    let Some(response_jt) = op.response.single() else {
        return Err(Error::Internal(format!(
            "response element for {} is not a single type",
            op.action
        )));
    };
    let response_ty = reg.ty(response_jt.ty);
    let stamp = format!("{}Message", op.response.json_name);

    for child in response_ty.children.values() {
        // children that are absent or not objects need no hint
        let Some(Value::Object(child_map)) = map.get_mut(&child.json_name) else {
            continue;
        };
        match child_map.get_mut("Items") {
            Some(Value::Array(items)) => {
                for item in items {
                    if let Value::Object(obj) = item {
                        obj.insert("__type".to_string(), Value::String(stamp.clone()));
                    }
                    // non-object entries are tolerated and skipped
                }
            }
            Some(_) => {
                return Err(Error::Structure(format!(
                    "cannot convert Items to an array in {}",
                    child.json_name
                )))
            }
            None if reg.ty(child.ty).declares_items() => {
                return Err(Error::Structure(format!(
                    "cannot find Items element in {}",
                    child.json_name
                )))
            }
            None => {}
        }
    }
    Ok(())
}

/// Event-level XML output
struct XmlEmitter<W: Write> {
    writer: Writer<W>,
}

impl<W: Write> XmlEmitter<W> {
    fn start(&mut self, tag: &str) -> Result<()> {
        self.writer.write_event(Event::Start(BytesStart::new(tag)))?;
        Ok(())
    }

    fn start_with(&mut self, tag: &str, attrs: &[(&str, String)]) -> Result<()> {
        let mut el = BytesStart::new(tag);
        for (name, value) in attrs {
            el.push_attribute((*name, value.as_str()));
        }
        self.writer.write_event(Event::Start(el))?;
        Ok(())
    }

    fn end(&mut self, tag: &str) -> Result<()> {
        self.writer.write_event(Event::End(BytesEnd::new(tag)))?;
        Ok(())
    }

    fn text(&mut self, text: &str) -> Result<()> {
        self.writer.write_event(Event::Text(BytesText::new(text)))?;
        Ok(())
    }
}

/// Translate one JSON value against its element descriptor
fn translate_value<W: Write>(
    em: &mut XmlEmitter<W>,
    reg: &Registry,
    value: Value,
    el: &JsonElement,
) -> Result<()> {
    match value {
        Value::Object(map) => translate_object(em, reg, map, el).at(el.json_name.clone()),
        Value::Array(items) => translate_list(em, reg, items, el).at(el.json_name.clone()),
        // the upstream emits null for omitted members
        Value::Null => Ok(()),
        scalar => {
            if !el.is_char_data(reg) {
                return Err(Error::Structure(format!(
                    "{}: unexpected simple content",
                    el.json_name
                )));
            }
            let jt = el.single().ok_or_else(|| {
                Error::Internal(format!("{} has no single type", el.json_name))
            })?;
            emit_scalar_element(em, reg, jt, &scalar).at(el.json_name.clone())
        }
    }
}

fn translate_object<W: Write>(
    em: &mut XmlEmitter<W>,
    reg: &Registry,
    mut map: JsonObject,
    el: &JsonElement,
) -> Result<()> {
    // pick the concrete type: declared, hook-resolved, or discriminated
    let jt: &JsonType = match &el.choice {
        Choice::Single(jt) => jt,
        Choice::Hooked(hook) => hook(el, &map)?,
        Choice::Discriminated(types) => {
            let hint = map.get("__type").and_then(Value::as_str).ok_or_else(|| {
                Error::Schema(format!(
                    "no type hint, cannot determine the type of {}",
                    el.json_name
                ))
            })?;
            types.get(hint).ok_or_else(|| {
                Error::Schema(format!("hint {} not known for element {}", hint, el.json_name))
            })?
        }
    };
    let typ = reg.ty(jt.ty);
    map.remove("__type");

    if typ.is_chardata_simple() {
        return Err(Error::Structure(format!("{} is a simple type", typ.name)));
    }

    // attributes first, in declared order
    let mut attrs: Vec<(&str, String)> = Vec::new();
    for attr in &typ.attributes {
        if let Some(value) = map.remove(attr.json_name) {
            let text = scalar_to_text(reg.ty(attr.ty), &value)
                .map_err(|e| e.at(format!("invalid attribute {}", attr.json_name)))?;
            attrs.push((attr.xml_name, text));
        }
    }
    em.start_with(&jt.xml_tag, &attrs)?;

    if typ.simple.is_some() && !typ.text_attr.is_empty() {
        // attributes plus folded character data
        if let Some(value) = map.remove(typ.text_attr) {
            let text = to_text(&value).at(typ.text_attr)?;
            em.text(&text)?;
        }
    } else if !typ.json_list_name.is_empty() {
        match map.remove(typ.json_list_name) {
            None | Some(Value::Null) => {
                return Err(Error::Structure(format!(
                    "no {} member found for {}",
                    typ.json_list_name, typ.name
                )))
            }
            Some(items) => {
                let list_el = typ.list_element.as_ref().ok_or_else(|| {
                    Error::Internal(format!("{} has no derived list element", typ.name))
                })?;
                translate_value(em, reg, items, list_el)?;
            }
        }
    } else {
        // emit children in declared order, consuming them from the value
        for je in &typ.json_elements {
            if let Some(value) = map.remove(&je.json_name) {
                if is_enum_bitfield(reg, je) {
                    emit_bitfield(em, reg, je, &value).at(je.json_name.clone())?;
                } else {
                    translate_value(em, reg, value, je)?;
                }
            }
        }
    }

    for extra in typ.json_extras {
        map.remove(*extra);
    }
    if !map.is_empty() {
        let keys: Vec<&str> = map.keys().map(String::as_str).collect();
        return Err(Error::Schema(format!(
            "unexpected members in {}: {}",
            typ.name,
            keys.join(", ")
        )));
    }

    em.end(&jt.xml_tag)
}

fn translate_list<W: Write>(
    em: &mut XmlEmitter<W>,
    reg: &Registry,
    items: Vec<Value>,
    el: &JsonElement,
) -> Result<()> {
    // A list either sits inside a declared wrapper element whose type is
    // list-shaped, or the descriptor itself marks repeating siblings.
    let mut wrapper: Option<&JsonType> = None;
    let child: &JsonElement = match el.single() {
        Some(jt) if reg.ty(jt.ty).is_list_shaped() => {
            wrapper = Some(jt);
            reg.ty(jt.ty).list_element.as_ref().ok_or_else(|| {
                Error::Internal(format!("{} has no derived list element", reg.ty(jt.ty).name))
            })?
        }
        _ if el.is_list => el,
        _ => {
            return Err(Error::Structure(format!(
                "could not determine the list type of {}",
                el.json_name
            )))
        }
    };

    if let Some(jt) = wrapper {
        em.start(&jt.xml_tag)?;
    }
    for item in items {
        if item.is_null() {
            // the upstream pads some arrays with nulls
            continue;
        }
        if child.is_char_data(reg) {
            let jt = child.single().ok_or_else(|| {
                Error::Internal(format!("{} has no single type", child.json_name))
            })?;
            emit_scalar_element(em, reg, jt, &item)?;
        } else if let Value::Object(map) = item {
            translate_object(em, reg, map, child)?;
        } else {
            return Err(Error::Structure(format!(
                "while processing a list, expected an object, got {}",
                kind_name(&item)
            )));
        }
    }
    if let Some(jt) = wrapper {
        em.end(&jt.xml_tag)?;
    }
    Ok(())
}

fn emit_scalar_element<W: Write>(
    em: &mut XmlEmitter<W>,
    reg: &Registry,
    jt: &JsonType,
    value: &Value,
) -> Result<()> {
    let text = scalar_to_text(reg.ty(jt.ty), value)?;
    em.start(&jt.xml_tag)?;
    em.text(&text)?;
    em.end(&jt.xml_tag)
}

// Enum values arrive as indexes into the label list; labels sent verbatim
// (the same tolerance the XML to JSON direction applies to unknown labels)
// pass through untouched.
fn scalar_to_text(typ: &TypeDef, value: &Value) -> Result<String> {
    let text = to_text(value)?;
    if typ.simple != Some(SimpleKind::Enum) || matches!(value, Value::String(_)) {
        return Ok(text);
    }
    let idx: usize = text.parse().map_err(|_| {
        Error::Value(format!(
            "cannot convert `{}` to an enum index for {}",
            text, typ.name
        ))
    })?;
    typ.enum_values
        .get(idx)
        .map(|label| label.to_string())
        .ok_or_else(|| {
            Error::Value(format!(
                "enum index {} out of range for {}",
                idx, typ.name
            ))
        })
}

// A bitfield integer selects enum labels by bit position; the labels are
// joined with single spaces in enum order.
fn emit_bitfield<W: Write>(
    em: &mut XmlEmitter<W>,
    reg: &Registry,
    el: &JsonElement,
    value: &Value,
) -> Result<()> {
    let jt = el
        .single()
        .ok_or_else(|| Error::Internal(format!("{} has no single type", el.json_name)))?;
    let typ = reg.ty(jt.ty);
    let item = reg.ty(typ.list_item.ok_or_else(|| {
        Error::Internal(format!("{} has no list item type", typ.name))
    })?);

    let text = to_text(value)?;
    let joined = match text.parse::<u32>() {
        Ok(bits) => {
            let mut labels = Vec::new();
            for (i, label) in item.enum_values.iter().enumerate().take(32) {
                if bits & (1 << i) != 0 {
                    labels.push(*label);
                }
            }
            labels.join(" ")
        }
        // already spelled out as labels
        Err(_) if matches!(value, Value::String(_)) => text,
        Err(_) => {
            return Err(Error::Value(format!(
                "cannot convert `{}` to a bitfield integer for {}",
                text, typ.name
            )))
        }
    };

    em.start(&jt.xml_tag)?;
    em.text(&joined)?;
    em.end(&jt.xml_tag)
}

fn is_enum_bitfield(reg: &Registry, el: &JsonElement) -> bool {
    let Some(jt) = el.single() else {
        return false;
    };
    let typ = reg.ty(jt.ty);
    typ.simple == Some(SimpleKind::List)
        && typ
            .list_item
            .map_or(false, |item| reg.ty(item).simple == Some(SimpleKind::Enum))
}

/// Convert a JSON leaf to XML character data
fn to_text(value: &Value) -> Result<String> {
    match value {
        Value::Bool(true) => Ok("true".to_string()),
        Value::Bool(false) => Ok("false".to_string()),
        Value::Number(n) => Ok(n.to_string()),
        Value::String(s) => Ok(s.clone()),
        Value::Null => Ok(String::new()),
        other => Err(Error::Structure(format!(
            "expected a simple value, got {}",
            kind_name(other)
        ))),
    }
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
