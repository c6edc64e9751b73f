//! SOAP envelope to OWA JSON translation
//!
//! Drives a streaming XML pull parser over a SOAP 1.1 envelope and builds
//! the equivalent WCF JSON request. Every element is resolved against the
//! type registry; nothing here knows any schema detail itself. The caller
//! gets back the serialized message together with the operation descriptor
//! needed to translate the response later.

use std::io::BufRead;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde_json::Number;

use crate::error::{Breadcrumb, Error, Result};
use crate::namespaces::{is_xmlns, local_name};
use crate::ordered::{JsonValue, OrderedObject};
use crate::registry::{registry, Operation, Registry, SimpleKind, TypeDef, TypeId, XmlChild};

/// Translate a SOAP request read from `reader` into OWA JSON.
///
/// Returns the serialized JSON message and the operation descriptor
/// resolved from the action element, which the caller needs both for the
/// outgoing `Action` header and to translate the response.
pub fn soap_to_json<R: BufRead>(reader: R) -> Result<(Vec<u8>, &'static Operation)> {
    let reg = registry();
    let mut dec = SoapDecoder::new(reader);

    let envelope = dec.next_start()?;
    if envelope.local != "Envelope" {
        return Err(Error::Schema("not a SOAP document".to_string()));
    }

    let mut header: Option<OrderedObject> = None;
    let mut body: Option<OrderedObject> = None;
    let mut operation: Option<&'static Operation> = None;
    let mut got_header = false;
    let mut envelope_closed = false;

    while !(got_header && operation.is_some()) {
        match dec.next_element()? {
            None => {
                envelope_closed = true;
                break;
            }
            Some(tag) if tag.local == "Header" => {
                if got_header {
                    return Err(Error::Schema("multiple SOAP headers found".to_string()));
                }
                let header_ty = reg.request_header_type();
                let json_type = reg.ty(header_ty).json_type.clone();
                header = dec
                    .process_soap_element(reg, &tag, header_ty, &json_type)
                    .at("Header")?;
                got_header = true;
            }
            Some(tag) if tag.local == "Body" => {
                if operation.is_some() {
                    return Err(Error::Schema("multiple SOAP bodies found".to_string()));
                }
                // the first element in the body names the operation
                let action = dec.next_start()?;
                let op = reg.lookup_operation(&action.local).ok_or_else(|| {
                    Error::Schema(format!("unknown EWS operation {}", action.local))
                })?;
                log::debug!("translating EWS request for {}", op.action);
                let name = action.local.clone();
                body = dec
                    .process_soap_element(reg, &action, op.request, &op.body_type)
                    .at(name)?;
                operation = Some(op);
                dec.next_end()?; // </soap:Body>
            }
            Some(_) => dec.skip_subtree()?,
        }
    }

    let operation = operation.ok_or_else(|| Error::Schema("no SOAP body found".to_string()))?;
    if !envelope_closed {
        dec.next_end()?; // </soap:Envelope>
    }

    let header = match header {
        Some(mut h) => {
            fix_request_version(&mut h);
            h
        }
        // The client sent no header; the JSON endpoint requires one, so
        // synthesize the minimal version statement.
        None => {
            let mut h = OrderedObject::new();
            h.set("__type", "JsonRequestHeaders:#Exchange");
            h.set("RequestServerVersion", "Exchange2013");
            h
        }
    };

    let mut msg = OrderedObject::new();
    msg.set("__type", operation.request_type.clone());
    msg.set("Header", JsonValue::Object(header));
    msg.set(
        "Body",
        body.map(JsonValue::Object).unwrap_or(JsonValue::Null),
    );

    let bytes = serde_json::to_vec(&msg)?;
    Ok((bytes, operation))
}

// The JSON header does not follow the normal conversion rules: the version
// element collapses to a bare string, and version labels older than 2013
// are rejected by the JSON endpoint, so they are upgraded in place.
fn fix_request_version(header: &mut OrderedObject) {
    let Some(JsonValue::Object(version_el)) = header.get("RequestServerVersion") else {
        return;
    };
    let Some(JsonValue::String(version)) = version_el.get("Version") else {
        return;
    };
    let version = if version.starts_with("Exchange2007") || version.starts_with("Exchange2010") {
        "Exchange2013".to_string()
    } else {
        version.clone()
    };
    header.set("RequestServerVersion", version);
}

/// A captured start element: local name plus non-xmlns attributes with
/// their prefixes stripped
struct StartTag {
    local: String,
    attributes: Vec<(String, String)>,
}

enum Token {
    Start(StartTag),
    End,
    Text(String),
    Eof,
}

/// Streaming pull decoder over the SOAP input
struct SoapDecoder<R: BufRead> {
    reader: Reader<R>,
    buf: Vec<u8>,
}

impl<R: BufRead> SoapDecoder<R> {
    fn new(reader: R) -> Self {
        let mut reader = Reader::from_reader(reader);
        reader.trim_text(true);
        reader.expand_empty_elements(true);
        Self {
            reader,
            buf: Vec::new(),
        }
    }

    fn read_token(&mut self) -> Result<Token> {
        loop {
            self.buf.clear();
            match self.reader.read_event_into(&mut self.buf)? {
                Event::Start(e) => return capture_start(&self.reader, &e).map(Token::Start),
                Event::End(_) => return Ok(Token::End),
                Event::Text(e) => {
                    let text = e.unescape()?;
                    let trimmed = text.trim();
                    if !trimmed.is_empty() {
                        return Ok(Token::Text(trimmed.to_string()));
                    }
                }
                Event::CData(e) => {
                    let bytes = e.into_inner();
                    let text = self.reader.decoder().decode(&bytes)?;
                    let trimmed = text.trim();
                    if !trimmed.is_empty() {
                        return Ok(Token::Text(trimmed.to_string()));
                    }
                }
                Event::Eof => return Ok(Token::Eof),
                _ => {} // declarations, comments, processing instructions
            }
        }
    }

    /// Next start element, or None when the enclosing element ends
    fn next_element(&mut self) -> Result<Option<StartTag>> {
        loop {
            match self.read_token()? {
                Token::Start(tag) => return Ok(Some(tag)),
                Token::End => return Ok(None),
                Token::Text(_) => {} // stray character data between elements
                Token::Eof => {
                    return Err(Error::Schema("unexpected end of document".to_string()))
                }
            }
        }
    }

    fn next_start(&mut self) -> Result<StartTag> {
        self.next_element()?.ok_or_else(|| {
            Error::Schema("unexpected end element, expected a start element".to_string())
        })
    }

    fn next_end(&mut self) -> Result<()> {
        match self.next_element()? {
            None => Ok(()),
            Some(tag) => Err(Error::Schema(format!(
                "unexpected element {}, expected an end element",
                tag.local
            ))),
        }
    }

    /// Consume the rest of an element we do not care about
    fn skip_subtree(&mut self) -> Result<()> {
        let mut depth = 1usize;
        loop {
            match self.read_token()? {
                Token::Start(_) => depth += 1,
                Token::End => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(());
                    }
                }
                Token::Text(_) => {}
                Token::Eof => {
                    return Err(Error::Schema("unexpected end of document".to_string()))
                }
            }
        }
    }

    /// Translate one element, consuming everything up to and including its
    /// end tag. Returns None for an element with no content at all.
    fn process_element(
        &mut self,
        reg: &Registry,
        tag: &StartTag,
        ty: TypeId,
    ) -> Result<Option<JsonValue>> {
        let typ = reg.ty(ty);
        let mut building = if tag.attributes.is_empty() {
            Building::NotStarted
        } else {
            init_building(reg, tag, typ)?
        };

        loop {
            match self.read_token()? {
                Token::Start(child_tag) => {
                    if matches!(building, Building::NotStarted) {
                        building = init_building(reg, tag, typ)?;
                    }
                    let child = typ.children.get(&child_tag.local).ok_or_else(|| {
                        Error::Schema(format!(
                            "unknown element {} in type {}",
                            child_tag.local, typ.name
                        ))
                    })?;
                    let name = child_tag.local.clone();
                    let item = self.process_element(reg, &child_tag, child.ty).at(name)?;

                    match &mut building {
                        Building::NamedList { items, .. } => {
                            items.push(item.unwrap_or(JsonValue::Null))
                        }
                        Building::List(items) => items.push(item.unwrap_or(JsonValue::Null)),
                        Building::Object(obj) => install_child(reg, obj, child, typ, item)?,
                        _ => {
                            return Err(Error::Structure(format!(
                                "mixed content in type {}",
                                typ.name
                            )))
                        }
                    }
                }
                Token::Text(text) => {
                    let converted = convert_simple(reg, typ, &text)?;
                    if typ.text_attr.is_empty() {
                        building = Building::Scalar(converted);
                    } else {
                        if matches!(building, Building::NotStarted) {
                            building = init_building(reg, tag, typ)?;
                        }
                        match &mut building {
                            Building::Object(obj) => {
                                obj.set(typ.text_attr, converted);
                            }
                            _ => {
                                return Err(Error::Structure(format!(
                                    "character data in list type {}",
                                    typ.name
                                )))
                            }
                        }
                    }
                }
                Token::End => return finish_element(building, typ),
                Token::Eof => {
                    return Err(Error::Schema("unexpected end of document".to_string()))
                }
            }
        }
    }

    /// Translate a header or body element, which must come out as an
    /// object, and force the given discriminator into first position.
    fn process_soap_element(
        &mut self,
        reg: &Registry,
        tag: &StartTag,
        ty: TypeId,
        json_type: &str,
    ) -> Result<Option<OrderedObject>> {
        match self.process_element(reg, tag, ty)? {
            None => Ok(None),
            Some(JsonValue::Object(mut obj)) => {
                if !json_type.is_empty() {
                    obj.set_front("__type", json_type);
                }
                Ok(Some(obj))
            }
            Some(_) => Err(Error::Structure(format!(
                "invalid content in {}, expected an object",
                tag.local
            ))),
        }
    }
}

fn capture_start<R>(reader: &Reader<R>, e: &BytesStart) -> Result<StartTag> {
    let name = reader.decoder().decode(e.name().as_ref())?.to_string();
    let mut attributes = Vec::new();
    for attr in e.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        let key = reader.decoder().decode(attr.key.as_ref())?.to_string();
        if is_xmlns(&key) {
            continue;
        }
        let value = attr.unescape_value()?.to_string();
        attributes.push((local_name(&key).to_string(), value));
    }
    Ok(StartTag {
        local: local_name(&name).to_string(),
        attributes,
    })
}

/// The value under construction for the current element
enum Building {
    NotStarted,
    Scalar(JsonValue),
    Object(OrderedObject),
    List(Vec<JsonValue>),
    NamedList {
        obj: OrderedObject,
        items: Vec<JsonValue>,
    },
}

fn init_building(reg: &Registry, tag: &StartTag, typ: &TypeDef) -> Result<Building> {
    if typ.is_chardata_simple() {
        // the element's value is its character data, nothing to set up
        return Ok(Building::NotStarted);
    }

    if typ.is_list_shaped() {
        if !tag.attributes.is_empty() {
            return Err(Error::Schema(format!(
                "type {} is a list but has attributes",
                typ.name
            )));
        }
        if typ.json_list_name.is_empty() {
            return Ok(Building::List(Vec::new()));
        }
        let mut obj = OrderedObject::new();
        if !typ.json_type.is_empty() {
            obj.set("__type", typ.json_type.clone());
        }
        return Ok(Building::NamedList {
            obj,
            items: Vec::new(),
        });
    }

    let mut obj = OrderedObject::new();
    if !typ.json_type.is_empty() {
        obj.set("__type", typ.json_type.clone());
    }
    for (name, value) in &tag.attributes {
        let attr = typ.attribute(name).ok_or_else(|| {
            Error::Schema(format!("unknown attribute {} for type {}", name, typ.name))
        })?;
        obj.set(attr.json_name, convert_simple(reg, reg.ty(attr.ty), value)?);
    }
    Ok(Building::Object(obj))
}

fn install_child(
    reg: &Registry,
    obj: &mut OrderedObject,
    child: &XmlChild,
    parent: &TypeDef,
    item: Option<JsonValue>,
) -> Result<()> {
    if child.is_list {
        let item = item.unwrap_or(JsonValue::Null);
        match obj.get_mut(&child.json_name) {
            Some(JsonValue::Array(items)) => items.push(item),
            Some(_) => {
                return Err(Error::Internal(format!(
                    "inconsistent list under key {} for type {}",
                    child.json_name, parent.name
                )))
            }
            None => {
                obj.set(child.json_name.clone(), JsonValue::Array(vec![item]));
            }
        }
        return Ok(());
    }

    let item = match item {
        Some(v) => v,
        // an empty string element comes back as no content at all
        None if reg.ty(child.ty).simple == Some(SimpleKind::String) => {
            JsonValue::String(String::new())
        }
        None => JsonValue::Null,
    };
    if !obj.set(child.json_name.clone(), item) {
        return Err(Error::Internal(format!(
            "collision on key {} for type {}",
            child.json_name, parent.name
        )));
    }
    Ok(())
}

fn finish_element(building: Building, typ: &TypeDef) -> Result<Option<JsonValue>> {
    match building {
        Building::NotStarted => Ok(None),
        Building::Scalar(v) => Ok(Some(v)),
        Building::List(items) => Ok(Some(JsonValue::Array(items))),
        Building::NamedList { mut obj, items } => {
            obj.set(typ.json_list_name, JsonValue::Array(items));
            Ok(Some(finish_object(obj, typ)))
        }
        Building::Object(obj) => Ok(Some(finish_object(obj, typ))),
    }
}

fn finish_object(mut obj: OrderedObject, typ: &TypeDef) -> JsonValue {
    for (key, value) in &typ.json_defaults {
        if obj.get(key).is_none() {
            obj.set(key.clone(), value.clone());
        }
    }
    if let Some(hook) = typ.post_hook {
        hook(typ, &mut obj);
    }
    JsonValue::Object(obj)
}

/// Convert trimmed character data according to the simple kind of its type
fn convert_simple(reg: &Registry, typ: &TypeDef, chardata: &str) -> Result<JsonValue> {
    match typ.simple {
        Some(SimpleKind::Bool) => Ok((chardata == "true" || chardata == "1").into()),
        Some(SimpleKind::Number) => match serde_json::from_str::<Number>(chardata) {
            Ok(n) => Ok(JsonValue::Number(n)),
            Err(_) => Err(Error::Value(format!(
                "invalid number literal `{}` for type {}",
                chardata, typ.name
            ))),
        },
        Some(SimpleKind::Enum) => Ok(convert_enum(typ, chardata)),
        Some(SimpleKind::List) => convert_simple_list(reg, typ, chardata),
        _ => Ok(chardata.into()),
    }
}

fn convert_enum(typ: &TypeDef, chardata: &str) -> JsonValue {
    match typ.enum_values.iter().position(|v| *v == chardata) {
        Some(idx) => JsonValue::from(idx as u64),
        // labels from newer server versions are passed through raw
        None => {
            log::debug!(
                "enum {} has no label `{}`, using the raw value",
                typ.name,
                chardata
            );
            chardata.into()
        }
    }
}

// A whitespace-joined list of enum labels becomes a bitfield integer, bit
// i meaning label i is present. Lists of anything else, and lists holding
// unknown labels, pass through as the raw string.
fn convert_simple_list(reg: &Registry, typ: &TypeDef, chardata: &str) -> Result<JsonValue> {
    let Some(item_id) = typ.list_item else {
        return Ok(chardata.into());
    };
    let item = reg.ty(item_id);
    if item.simple != Some(SimpleKind::Enum) {
        return Ok(chardata.into());
    }

    let mut bits: u32 = 0;
    for token in chardata.split_whitespace() {
        match item.enum_values.iter().position(|v| *v == token) {
            Some(i) if i < 32 => bits |= 1 << i,
            _ => {
                log::debug!(
                    "list of {} has no label `{}`, using the raw value",
                    item.name,
                    token
                );
                return Ok(chardata.into());
            }
        }
    }
    Ok(JsonValue::from(bits as u64))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typ(name: &str) -> &'static TypeDef {
        registry().lookup_type(name).unwrap()
    }

    #[test]
    fn test_convert_bool() {
        let reg = registry();
        let b = typ("boolean");
        assert_eq!(convert_simple(reg, b, "true").unwrap(), JsonValue::Bool(true));
        assert_eq!(convert_simple(reg, b, "1").unwrap(), JsonValue::Bool(true));
        assert_eq!(convert_simple(reg, b, "false").unwrap(), JsonValue::Bool(false));
        assert_eq!(convert_simple(reg, b, "yes").unwrap(), JsonValue::Bool(false));
    }

    #[test]
    fn test_convert_number_preserves_lexical_form() {
        let reg = registry();
        let n = convert_simple(reg, typ("int"), "9007199254740993").unwrap();
        assert_eq!(
            serde_json::to_string(&n).unwrap(),
            "9007199254740993"
        );
        assert!(matches!(
            convert_simple(reg, typ("int"), "12,5"),
            Err(Error::Value(_))
        ));
    }

    #[test]
    fn test_convert_enum_index_and_fallback() {
        let reg = registry();
        let shape = typ("DefaultShapeNamesType");
        assert_eq!(convert_simple(reg, shape, "IdOnly").unwrap(), JsonValue::from(0u64));
        assert_eq!(convert_simple(reg, shape, "Default").unwrap(), JsonValue::from(1u64));
        // unknown labels pass through untouched
        assert_eq!(
            convert_simple(reg, shape, "EverythingAndMore").unwrap(),
            JsonValue::from("EverythingAndMore")
        );
    }

    #[test]
    fn test_convert_enum_list_to_bitfield() {
        let reg = registry();
        let days = typ("DaysOfWeekType");
        // Monday is bit 1, Wednesday bit 3
        assert_eq!(
            convert_simple(reg, days, "Monday Wednesday").unwrap(),
            JsonValue::from(10u64)
        );
        assert_eq!(convert_simple(reg, days, "Sunday").unwrap(), JsonValue::from(1u64));
        assert_eq!(
            convert_simple(reg, days, "Monday Noday").unwrap(),
            JsonValue::from("Monday Noday")
        );
    }

    #[test]
    fn test_unknown_element_fails() {
        let xml = br#"<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/">
            <soap:Body>
              <m:GetFolder xmlns:m="http://schemas.microsoft.com/exchange/services/2006/messages">
                <m:NoSuchElement/>
              </m:GetFolder>
            </soap:Body>
          </soap:Envelope>"#;
        let err = soap_to_json(&xml[..]).unwrap_err();
        assert!(format!("{}", err).contains("unknown element NoSuchElement"));
    }

    #[test]
    fn test_unknown_operation_fails() {
        let xml = br#"<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/">
            <soap:Body><m:TeleportItem/></soap:Body>
          </soap:Envelope>"#;
        let err = soap_to_json(&xml[..]).unwrap_err();
        assert!(format!("{}", err).contains("unknown EWS operation TeleportItem"));
    }

    #[test]
    fn test_not_a_soap_document() {
        let err = soap_to_json(&b"<html></html>"[..]).unwrap_err();
        assert!(matches!(err, Error::Schema(_)));
    }
}
