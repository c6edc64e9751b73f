//! Registry metamodel: type records, descriptors, and derived tables
//!
//! EWS types form a mutually recursive graph (folders contain items, items
//! reference folders), so the registry is an arena of named type records.
//! Declarations reference each other by name; [`Registry::build`] resolves
//! every reference into a [`TypeId`] handle and derives the lookup tables
//! both translators run on. The arena lives for the process lifetime and is
//! never mutated after construction.

use std::collections::HashMap;
use std::fmt;

use crate::error::Result;
use crate::namespaces::local_name;
use crate::ordered::{JsonValue, OrderedObject};
use crate::registry::hooks;
use crate::registry::operations::{OpDecl, Operation};

/// A JSON object as decoded from the upstream response stream
pub type JsonObject = serde_json::Map<String, serde_json::Value>;

/// Post-conversion hook applied to a freshly built JSON object
pub type JsonPostHook = fn(&TypeDef, &mut OrderedObject);

/// Hook that selects the target XML type from JSON content when no usable
/// `__type` discriminator is present
pub type XmlChoiceHook = for<'a> fn(&'a JsonElement, &JsonObject) -> Result<&'a JsonType>;

/// The container type whose JSON side discriminates per-item response
/// messages by XML element name rather than by `__type`
pub(crate) const RESPONSE_MESSAGES_TYPE: &str = "ArrayOfResponseMessagesType";

/// Value kinds a simple type can have
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimpleKind {
    /// XML "true"/"1" map to JSON true, anything else to false
    Bool,
    /// Arbitrary-precision decimal, lexical form preserved
    Number,
    /// Character data passed through verbatim
    String,
    /// Ordered label list; JSON carries the integer index
    Enum,
    /// Whitespace-joined sequence of simple items; enum items are encoded
    /// as a 32-bit bitfield on the JSON side
    List,
}

/// Handle to a type record in the registry arena
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeId(usize);

impl TypeId {
    pub(crate) fn index(self) -> usize {
        self.0
    }
}

//
// Declarations: the raw form the schema tables are written in. Resolved
// into TypeDef records by Registry::build.
//

/// Raw child-element descriptor used when declaring a type
#[derive(Debug, Clone)]
pub struct ElementDecl {
    xml_name: &'static str,
    json_name: &'static str,
    type_name: &'static str,
    is_list: bool,
    json_hint: &'static str,
    json_default: Option<fn() -> JsonValue>,
}

/// Start a child-element declaration for the given prefixed XML name and
/// referenced type
pub fn el(xml_name: &'static str, type_name: &'static str) -> ElementDecl {
    ElementDecl {
        xml_name,
        json_name: "",
        type_name,
        is_list: false,
        json_hint: "",
        json_default: None,
    }
}

impl ElementDecl {
    /// Override the JSON key (defaults to the XML local name)
    pub fn named(mut self, json_name: &'static str) -> Self {
        self.json_name = json_name;
        self
    }

    /// Mark the element as repeating; sibling occurrences collapse into a
    /// JSON array
    pub fn list(mut self) -> Self {
        self.is_list = true;
        self
    }

    /// Override the JSON discriminator registered for this element,
    /// replacing the type's native one
    pub fn hinted(mut self, json_hint: &'static str) -> Self {
        self.json_hint = json_hint;
        self
    }

    /// Inject the given literal under this element's JSON key when the key
    /// is absent after conversion
    pub fn default_value(mut self, value: fn() -> JsonValue) -> Self {
        self.json_default = Some(value);
        self
    }
}

/// Raw attribute descriptor: XML attribute name and its simple type
#[derive(Debug, Clone)]
pub struct AttrDecl {
    name: &'static str,
    type_name: &'static str,
}

/// Raw type declaration
#[derive(Debug, Clone)]
pub struct TypeDecl {
    name: &'static str,
    json_stem: Option<&'static str>,
    simple: Option<SimpleKind>,
    text_attr: &'static str,
    enum_values: &'static [&'static str],
    list_item: &'static str,
    elements: Vec<ElementDecl>,
    attributes: Vec<AttrDecl>,
    json_extras: &'static [&'static str],
    is_list: bool,
    json_list_name: &'static str,
}

fn decl(name: &'static str, simple: Option<SimpleKind>) -> TypeDecl {
    TypeDecl {
        name,
        json_stem: None,
        simple,
        text_attr: "",
        enum_values: &[],
        list_item: "",
        elements: Vec::new(),
        attributes: Vec::new(),
        json_extras: &[],
        is_list: false,
        json_list_name: "",
    }
}

/// Declare a complex type
pub fn complex(name: &'static str) -> TypeDecl {
    decl(name, None)
}

/// Declare a simple type of the given kind
pub fn simple(name: &'static str, kind: SimpleKind) -> TypeDecl {
    decl(name, Some(kind))
}

/// Declare an enumeration simple type with its ordered label list
pub fn enumeration(name: &'static str, values: &'static [&'static str]) -> TypeDecl {
    TypeDecl {
        enum_values: values,
        ..decl(name, Some(SimpleKind::Enum))
    }
}

/// Declare a list-of-simple type with the given item type
pub fn simple_list(name: &'static str, item: &'static str) -> TypeDecl {
    TypeDecl {
        list_item: item,
        ..decl(name, Some(SimpleKind::List))
    }
}

impl TypeDecl {
    /// Append a child-element descriptor
    pub fn child(mut self, element: ElementDecl) -> Self {
        self.elements.push(element);
        self
    }

    /// Append an attribute descriptor
    pub fn attr(mut self, name: &'static str, type_name: &'static str) -> Self {
        self.attributes.push(AttrDecl { name, type_name });
        self
    }

    /// JSON-only keys to drop silently during JSON to XML translation
    pub fn extras(mut self, extras: &'static [&'static str]) -> Self {
        self.json_extras = extras;
        self
    }

    /// Represent the type in JSON as an object holding its items under the
    /// given key
    pub fn list_key(mut self, name: &'static str) -> Self {
        self.json_list_name = name;
        self
    }

    /// Represent the type in JSON as a bare array of its items
    pub fn collapsed_list(mut self) -> Self {
        self.is_list = true;
        self
    }

    /// Fold attributes plus character data into a JSON object, with the
    /// character data stored under the given key
    pub fn text_attr(mut self, name: &'static str) -> Self {
        self.text_attr = name;
        self
    }

    /// Override the discriminator stem (the part before `:#Exchange`),
    /// normally derived from the type name with a trailing `Type` stripped
    pub fn discriminator_stem(mut self, stem: &'static str) -> Self {
        self.json_stem = Some(stem);
        self
    }
}

//
// Resolved records
//

/// Resolved attribute descriptor
#[derive(Debug)]
pub struct AttrDef {
    /// XML attribute name
    pub xml_name: &'static str,
    /// JSON key, identical to the XML name for all registered types
    pub json_name: &'static str,
    /// Attribute value type
    pub ty: TypeId,
}

/// Resolved child descriptor for the XML to JSON direction, keyed by XML
/// local name on the parent
#[derive(Debug)]
pub struct XmlChild {
    /// JSON key the child value is installed under
    pub json_name: String,
    /// Child value type
    pub ty: TypeId,
    /// Whether sibling occurrences collapse into a JSON array
    pub is_list: bool,
}

/// One concrete XML target a JSON element can resolve to
#[derive(Debug, Clone)]
pub struct JsonType {
    /// Target type
    pub ty: TypeId,
    /// Prefixed XML tag emitted for this target, e.g. `t:FolderId`
    pub xml_tag: String,
    // Discriminator override carried through derived-table construction
    hint: &'static str,
}

/// How a JSON element resolves to a concrete XML target
pub enum Choice {
    /// Exactly one candidate type
    Single(JsonType),
    /// Candidates keyed by `__type` discriminator (or, for the response
    /// message container, by XML element local name)
    Discriminated(HashMap<String, JsonType>),
    /// A registered hook picks the candidate from the object's content
    Hooked(XmlChoiceHook),
}

// hand-written because hook function pointers have no Debug impl
impl fmt::Debug for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Choice::Single(jt) => f.debug_tuple("Single").field(jt).finish(),
            Choice::Discriminated(types) => f.debug_tuple("Discriminated").field(types).finish(),
            Choice::Hooked(_) => f.write_str("Hooked(..)"),
        }
    }
}

/// Resolved descriptor for the JSON to XML direction: all children of a
/// type that share one JSON key, with the choice between them
#[derive(Debug)]
pub struct JsonElement {
    /// JSON key this element is read from
    pub json_name: String,
    /// Whether the element holds sibling XML elements without a wrapper
    pub is_list: bool,
    /// Candidate resolution
    pub choice: Choice,
    tags: HashMap<String, JsonType>,
}

impl JsonElement {
    /// Look up a candidate by its prefixed XML tag; used by choice hooks
    pub fn tag(&self, xml_tag: &str) -> Option<&JsonType> {
        self.tags.get(xml_tag)
    }

    /// True when the element body is plain character data (a simple type
    /// with no attribute folding)
    pub fn is_char_data(&self, registry: &Registry) -> bool {
        match &self.choice {
            Choice::Single(jt) => registry.ty(jt.ty).is_chardata_simple(),
            _ => false,
        }
    }

    /// The single candidate, if the choice is not polymorphic
    pub fn single(&self) -> Option<&JsonType> {
        match &self.choice {
            Choice::Single(jt) => Some(jt),
            _ => None,
        }
    }
}

/// A fully resolved type record
pub struct TypeDef {
    /// Registry name of the type
    pub name: &'static str,
    /// WCF discriminator of the form `Name:#Exchange`
    pub json_type: String,
    /// Simple kind, or None for complex types
    pub simple: Option<SimpleKind>,
    /// JSON key holding character data when attributes are folded in
    pub text_attr: &'static str,
    /// Enumeration labels in wire order
    pub enum_values: &'static [&'static str],
    /// Item type of a list-of-simple
    pub list_item: Option<TypeId>,
    /// Whether the type is a bare JSON array
    pub is_list: bool,
    /// JSON key holding the items when the type is an object-wrapped list
    pub json_list_name: &'static str,
    /// JSON-only keys dropped during JSON to XML translation
    pub json_extras: &'static [&'static str],
    /// Attribute descriptors in declared order
    pub attributes: Vec<AttrDef>,
    /// XML to JSON child table keyed by XML local name
    pub children: HashMap<String, XmlChild>,
    /// Defaults injected after conversion, in declared order
    pub json_defaults: Vec<(String, JsonValue)>,
    /// JSON to XML elements in declared order
    pub json_elements: Vec<JsonElement>,
    /// Synthesized element collecting the item candidates of a list type
    pub list_element: Option<JsonElement>,
    /// Post-conversion hook, if one is registered for the type
    pub post_hook: Option<JsonPostHook>,
    attr_index: HashMap<&'static str, usize>,
}

// hand-written because hook function pointers have no Debug impl
impl fmt::Debug for TypeDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDef")
            .field("name", &self.name)
            .field("json_type", &self.json_type)
            .field("simple", &self.simple)
            .field("is_list", &self.is_list)
            .field("json_list_name", &self.json_list_name)
            .field("attributes", &self.attributes)
            .field("children", &self.children)
            .field("json_elements", &self.json_elements)
            .field("list_element", &self.list_element)
            .field("post_hook", &self.post_hook.is_some())
            .finish_non_exhaustive()
    }
}

impl TypeDef {
    /// Look up an attribute descriptor by XML name
    pub fn attribute(&self, xml_name: &str) -> Option<&AttrDef> {
        self.attr_index.get(xml_name).map(|&i| &self.attributes[i])
    }

    /// A simple type with no attribute folding: its whole value is
    /// character data
    pub fn is_chardata_simple(&self) -> bool {
        self.simple.is_some() && self.text_attr.is_empty()
    }

    /// Whether the type is list-shaped on the JSON side, bare or wrapped
    pub fn is_list_shaped(&self) -> bool {
        self.is_list || !self.json_list_name.is_empty()
    }

    /// Whether the type declares an `Items` member, either as its list key
    /// or as a child element
    pub fn declares_items(&self) -> bool {
        self.json_list_name == "Items" || self.json_elements.iter().any(|e| e.json_name == "Items")
    }
}

//
// Registry
//

/// The process-wide table of EWS types and operations
///
/// Built once before any translation runs; read-only afterward, so
/// concurrent translations share it without locking.
#[derive(Debug)]
pub struct Registry {
    types: Vec<TypeDef>,
    by_name: HashMap<&'static str, TypeId>,
    operations: HashMap<&'static str, Operation>,
    request_header: TypeId,
    response_header: JsonElement,
}

impl Registry {
    /// Access a type record by handle
    pub fn ty(&self, id: TypeId) -> &TypeDef {
        &self.types[id.index()]
    }

    /// Look up a type by registry name
    pub fn lookup_type(&self, name: &str) -> Option<&TypeDef> {
        self.by_name.get(name).map(|&id| self.ty(id))
    }

    /// Look up an operation by EWS action name
    pub fn lookup_operation(&self, action: &str) -> Option<&Operation> {
        self.operations.get(action)
    }

    /// Type the SOAP request header is translated against
    pub fn request_header_type(&self) -> TypeId {
        self.request_header
    }

    /// Element descriptor the SOAP response header is translated against
    pub fn response_header_element(&self) -> &JsonElement {
        &self.response_header
    }

    /// Resolve declarations into the immutable registry.
    ///
    /// A dangling type reference is a bug in the compiled-in tables and
    /// panics with the offending names.
    pub(crate) fn build(decls: Vec<TypeDecl>, ops: Vec<OpDecl>) -> Registry {
        let mut by_name: HashMap<&'static str, TypeId> = HashMap::new();
        for (i, d) in decls.iter().enumerate() {
            if by_name.insert(d.name, TypeId(i)).is_some() {
                panic!("registry: duplicate type `{}`", d.name);
            }
        }

        let resolve = |name: &str, referrer: &str| -> TypeId {
            *by_name.get(name).unwrap_or_else(|| {
                panic!("registry: unknown type `{}` referenced by `{}`", name, referrer)
            })
        };

        // Discriminators are needed while deriving choice tables, so
        // compute them for the whole arena first.
        let json_types: Vec<String> = decls
            .iter()
            .map(|d| {
                let stem = d
                    .json_stem
                    .unwrap_or_else(|| d.name.strip_suffix("Type").unwrap_or(d.name));
                format!("{}:#Exchange", stem)
            })
            .collect();

        let mut types = Vec::with_capacity(decls.len());
        for d in &decls {
            let mut attributes = Vec::new();
            let mut attr_index = HashMap::new();
            for a in &d.attributes {
                attr_index.insert(a.name, attributes.len());
                attributes.push(AttrDef {
                    xml_name: a.name,
                    json_name: a.name,
                    ty: resolve(a.type_name, d.name),
                });
            }

            let mut children = HashMap::new();
            let mut json_defaults = Vec::new();
            let mut builders: Vec<ElementBuilder> = Vec::new();
            let mut builder_index: HashMap<String, usize> = HashMap::new();

            for e in &d.elements {
                let local = local_name(e.xml_name);
                let json_name = if e.json_name.is_empty() {
                    local
                } else {
                    e.json_name
                };
                let child_ty = resolve(e.type_name, d.name);

                children.insert(
                    local.to_string(),
                    XmlChild {
                        json_name: json_name.to_string(),
                        ty: child_ty,
                        is_list: e.is_list,
                    },
                );
                if let Some(default) = e.json_default {
                    json_defaults.push((json_name.to_string(), default()));
                }

                let idx = *builder_index
                    .entry(json_name.to_string())
                    .or_insert_with(|| {
                        builders.push(ElementBuilder::new(json_name.to_string(), e.is_list));
                        builders.len() - 1
                    });
                let jt = JsonType {
                    ty: child_ty,
                    xml_tag: e.xml_name.to_string(),
                    hint: e.json_hint,
                };
                if d.name == RESPONSE_MESSAGES_TYPE {
                    // The response container discriminates by the stamped
                    // element name, not by a WCF discriminator.
                    builders[idx].add_keyed(local.to_string(), jt);
                } else {
                    builders[idx].add(jt, &json_types);
                }
            }

            let list_builder = if d.is_list || !d.json_list_name.is_empty() {
                let mut lb = ElementBuilder::new(d.json_list_name.to_string(), true);
                if d.name == RESPONSE_MESSAGES_TYPE {
                    lb.copy_types(&builders[0]);
                } else {
                    for b in &builders {
                        for jt in b.candidates() {
                            lb.add(jt.clone(), &json_types);
                        }
                    }
                }
                Some(lb)
            } else {
                None
            };

            let choice_hook = hooks::xml_choice_hook(d.name);
            let json_elements = builders
                .into_iter()
                .map(|b| b.finish(choice_hook))
                .collect();
            let list_element = list_builder.map(|b| b.finish(choice_hook));

            let list_item = if d.list_item.is_empty() {
                None
            } else {
                Some(resolve(d.list_item, d.name))
            };

            types.push(TypeDef {
                name: d.name,
                json_type: json_types[types.len()].clone(),
                simple: d.simple,
                text_attr: d.text_attr,
                enum_values: d.enum_values,
                list_item,
                is_list: d.is_list,
                json_list_name: d.json_list_name,
                json_extras: d.json_extras,
                attributes,
                children,
                json_defaults,
                json_elements,
                list_element,
                post_hook: hooks::json_post_hook(d.name),
                attr_index,
            });
        }

        let mut operations = HashMap::new();
        for o in ops {
            let request = resolve(o.request_type_name, o.action);
            let response_ty = resolve(o.response_type_name, o.action);
            let jt = JsonType {
                ty: response_ty,
                xml_tag: format!("m:{}", o.response_element),
                hint: "",
            };
            let mut tags = HashMap::new();
            tags.insert(jt.xml_tag.clone(), jt.clone());
            operations.insert(
                o.action,
                Operation {
                    action: o.action,
                    request,
                    body_type: format!("{}Request:#Exchange", o.action),
                    request_type: format!("{}JsonRequest:#Exchange", o.action),
                    response: JsonElement {
                        json_name: o.response_element.to_string(),
                        is_list: false,
                        choice: Choice::Single(jt),
                        tags,
                    },
                },
            );
        }

        let request_header = resolve("JsonRequestHeaders", "soap:Header");
        let response_ty = resolve("JsonResponseHeaders", "soap:Header");
        let header_jt = JsonType {
            ty: response_ty,
            xml_tag: crate::namespaces::SOAP_HEADER_TAG.to_string(),
            hint: "",
        };
        let mut header_tags = HashMap::new();
        header_tags.insert(header_jt.xml_tag.clone(), header_jt.clone());
        let response_header = JsonElement {
            json_name: "Header".to_string(),
            is_list: false,
            choice: Choice::Single(header_jt),
            tags: header_tags,
        };

        Registry {
            types,
            by_name,
            operations,
            request_header,
            response_header,
        }
    }
}

/// Accumulates the candidates sharing one JSON key while derived tables
/// are being built
struct ElementBuilder {
    json_name: String,
    is_list: bool,
    single: Option<JsonType>,
    types: HashMap<String, JsonType>,
    tags: HashMap<String, JsonType>,
}

impl ElementBuilder {
    fn new(json_name: String, is_list: bool) -> Self {
        Self {
            json_name,
            is_list,
            single: None,
            types: HashMap::new(),
            tags: HashMap::new(),
        }
    }

    fn add(&mut self, jt: JsonType, json_types: &[String]) {
        self.tags.insert(jt.xml_tag.clone(), jt.clone());
        if let Some(prev) = self.single.take() {
            self.add_keys(prev, json_types);
            self.add_keys(jt, json_types);
        } else if !self.types.is_empty() {
            self.add_keys(jt, json_types);
        } else {
            self.single = Some(jt);
        }
    }

    // WCF is observed emitting either the native discriminator or a
    // `<stem>Type:#Exchange` variant, so register both unless the element
    // carries an explicit override.
    fn add_keys(&mut self, jt: JsonType, json_types: &[String]) {
        if jt.hint.is_empty() {
            let native = json_types[jt.ty.index()].clone();
            let stem = native.split(':').next().unwrap_or("").to_string();
            self.types.insert(format!("{}Type:#Exchange", stem), jt.clone());
            self.types.insert(native, jt);
        } else {
            self.types.insert(jt.hint.to_string(), jt);
        }
    }

    fn add_keyed(&mut self, key: String, jt: JsonType) {
        self.tags.insert(jt.xml_tag.clone(), jt.clone());
        self.types.insert(key, jt);
    }

    fn copy_types(&mut self, other: &ElementBuilder) {
        self.types = other.types.clone();
        self.tags = other.tags.clone();
    }

    fn candidates(&self) -> Vec<&JsonType> {
        match &self.single {
            Some(jt) => vec![jt],
            None => self.types.values().collect(),
        }
    }

    fn finish(self, hook: Option<XmlChoiceHook>) -> JsonElement {
        let choice = match self.single {
            Some(jt) => Choice::Single(jt),
            None => match hook {
                Some(h) => Choice::Hooked(h),
                None => Choice::Discriminated(self.types),
            },
        };
        JsonElement {
            json_name: self.json_name,
            is_list: self.is_list,
            choice,
            tags: self.tags,
        }
    }
}

#[cfg(test)]
impl Registry {
    /// An operation whose response element targets the request type, so
    /// request documents can be driven back through the JSON to XML
    /// direction in round-trip tests.
    pub(crate) fn echo_operation(&self, action: &str) -> Operation {
        let op = self.lookup_operation(action).expect("registered action");
        let xml_tag = format!("m:{}", action);
        let jt = JsonType {
            ty: op.request,
            xml_tag: xml_tag.clone(),
            hint: "",
        };
        let mut tags = HashMap::new();
        tags.insert(xml_tag, jt.clone());
        Operation {
            action: op.action,
            request: op.request,
            body_type: op.body_type.clone(),
            request_type: op.request_type.clone(),
            response: JsonElement {
                json_name: action.to_string(),
                is_list: false,
                choice: Choice::Single(jt),
                tags,
            },
        }
    }
}
