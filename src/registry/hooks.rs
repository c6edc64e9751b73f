//! Hook tables
//!
//! Two small registries of plain function values, both keyed by type name:
//! JSON post-conversion fixups applied after an object is built from SOAP,
//! and XML choice resolvers that pick a target type from JSON content when
//! the upstream omits a usable `__type` discriminator. The set of hooks is
//! known at build time.

use crate::error::{Error, Result};
use crate::ordered::OrderedObject;
use crate::registry::schema::{JsonElement, JsonObject, JsonPostHook, JsonType, TypeDef, XmlChoiceHook};

/// Look up the JSON post-conversion hook registered for a type
pub(crate) fn json_post_hook(type_name: &str) -> Option<JsonPostHook> {
    match type_name {
        "ResolveNamesType" => Some(resolve_names_defaults),
        _ => None,
    }
}

/// Look up the XML choice hook registered for a type
pub(crate) fn xml_choice_hook(type_name: &str) -> Option<XmlChoiceHook> {
    match type_name {
        "SyncFolderHierarchyChangesType" => Some(sync_folder_hierarchy_change),
        _ => None,
    }
}

// The OWA endpoint rejects ResolveNames requests without a contact data
// shape, while SOAP clients routinely omit it.
fn resolve_names_defaults(_ty: &TypeDef, obj: &mut OrderedObject) {
    if obj.get("ContactDataShape").is_none() {
        obj.set("ContactDataShape", "Default");
    }
}

// Folder hierarchy changes carry no discriminator; the ChangeType member
// names the XML tag directly.
fn sync_folder_hierarchy_change<'a>(
    element: &'a JsonElement,
    obj: &JsonObject,
) -> Result<&'a JsonType> {
    if let Some(serde_json::Value::String(change)) = obj.get("ChangeType") {
        if let Some(jt) = element.tag(&format!("t:{}", change)) {
            return Ok(jt);
        }
    }
    Err(Error::Schema(format!(
        "invalid ChangeType {:?} for {}",
        obj.get("ChangeType"),
        element.json_name
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ordered::JsonValue;

    #[test]
    fn test_resolve_names_hook_inserts_default() {
        let reg = crate::registry::registry();
        let ty = reg.lookup_type("ResolveNamesType").unwrap();
        let hook = ty.post_hook.expect("hook registered");

        let mut obj = OrderedObject::new();
        obj.set("UnresolvedEntry", "meg");
        hook(ty, &mut obj);
        assert_eq!(
            obj.get("ContactDataShape"),
            Some(&JsonValue::from("Default"))
        );

        // an explicit shape is left alone
        let mut obj = OrderedObject::new();
        obj.set("ContactDataShape", "IdOnly");
        hook(ty, &mut obj);
        assert_eq!(
            obj.get("ContactDataShape"),
            Some(&JsonValue::from("IdOnly"))
        );
    }

    #[test]
    fn test_hierarchy_change_hook_resolves_by_change_type() {
        let reg = crate::registry::registry();
        let changes = reg.lookup_type("SyncFolderHierarchyChangesType").unwrap();
        let element = changes.list_element.as_ref().unwrap();

        let mut obj = JsonObject::new();
        obj.insert("ChangeType".into(), serde_json::Value::String("Create".into()));
        let jt = sync_folder_hierarchy_change(element, &obj).unwrap();
        assert_eq!(jt.xml_tag, "t:Create");

        obj.insert("ChangeType".into(), serde_json::Value::String("Vanish".into()));
        let err = sync_folder_hierarchy_change(element, &obj).unwrap_err();
        assert!(matches!(err, Error::Schema(_)));
    }
}
