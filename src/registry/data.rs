//! Schema tables for the registered EWS types and operations
//!
//! A hand-maintained subset of the EWS messages/types schema covering the
//! registered operations. XML names carry their wire prefix (`m:` for
//! messages-level elements, `t:` for types-level elements); JSON keys
//! default to the XML local name and are overridden where OWA disagrees.
//! Discriminators are derived from the type name (`FolderIdType` ->
//! `FolderId:#Exchange`) unless a stem override says otherwise.

use crate::ordered::{JsonValue, OrderedObject};
use crate::registry::operations::{op, OpDecl};
use crate::registry::schema::{
    complex, el, enumeration, simple, simple_list, SimpleKind, TypeDecl,
};

// OWA refuses folder paging requests without an explicit view, so absent
// views are filled in with the full-range page.
fn indexed_page_view_default() -> JsonValue {
    let mut obj = OrderedObject::new();
    obj.set("__type", "IndexedPageView:#Exchange");
    obj.set("MaxEntriesReturned", 2147483647i64);
    obj.set("Offset", 0i64);
    obj.set("BasePoint", "Beginning");
    JsonValue::Object(obj)
}

/// All registered type declarations
pub(crate) fn types() -> Vec<TypeDecl> {
    let mut decls = vec![
        // XSD builtins
        simple("string", SimpleKind::String),
        simple("boolean", SimpleKind::Bool),
        simple("decimal", SimpleKind::Number),
        simple("int", SimpleKind::Number),
        simple("dateTime", SimpleKind::String),
        simple("base64Binary", SimpleKind::String),
        // The full response code enumeration is enormous and OWA sends the
        // labels verbatim, so it stays a string here.
        simple("ResponseCodeType", SimpleKind::String),
        simple("UnindexedFieldURIType", SimpleKind::String),
        // Enumerations, in schema order
        enumeration(
            "DistinguishedFolderIdNameType",
            &[
                "calendar",
                "contacts",
                "deleteditems",
                "drafts",
                "inbox",
                "journal",
                "notes",
                "outbox",
                "sentitems",
                "tasks",
                "msgfolderroot",
                "publicfoldersroot",
                "root",
                "junkemail",
                "searchfolders",
                "voicemail",
            ],
        ),
        enumeration("DefaultShapeNamesType", &["IdOnly", "Default", "AllProperties"]),
        enumeration("FolderQueryTraversalType", &["Shallow", "Deep", "SoftDeleted"]),
        enumeration("ItemQueryTraversalType", &["Shallow", "SoftDeleted", "Associated"]),
        enumeration("IndexBasePointType", &["Beginning", "End"]),
        enumeration("SortDirectionType", &["Ascending", "Descending"]),
        enumeration("ResponseClassType", &["Success", "Warning", "Error"]),
        enumeration(
            "MailboxTypeType",
            &[
                "Unknown",
                "OneOff",
                "Mailbox",
                "PublicDL",
                "PrivateDL",
                "Contact",
                "PublicFolder",
                "GroupMailbox",
            ],
        ),
        enumeration(
            "SensitivityChoicesType",
            &["Normal", "Personal", "Private", "Confidential"],
        ),
        enumeration("ImportanceChoicesType", &["Low", "Normal", "High"]),
        enumeration(
            "LegacyFreeBusyType",
            &["Free", "Tentative", "Busy", "OOF", "WorkingElsewhere", "NoData"],
        ),
        enumeration(
            "ResponseTypeType",
            &[
                "Unknown",
                "Organizer",
                "Tentative",
                "Accept",
                "Decline",
                "NoResponseReceived",
            ],
        ),
        enumeration(
            "DayOfWeekType",
            &[
                "Sunday",
                "Monday",
                "Tuesday",
                "Wednesday",
                "Thursday",
                "Friday",
                "Saturday",
                "Day",
                "Weekday",
                "WeekendDay",
            ],
        ),
        enumeration(
            "EmailAddressKeyType",
            &["EmailAddress1", "EmailAddress2", "EmailAddress3"],
        ),
        enumeration(
            "ResolveNamesSearchScopeType",
            &[
                "ActiveDirectory",
                "ActiveDirectoryContacts",
                "Contacts",
                "ContactsActiveDirectory",
            ],
        ),
        enumeration(
            "SyncFolderItemsScopeType",
            &["NormalItems", "NormalAndAssociatedItems"],
        ),
        enumeration(
            "ContainmentModeType",
            &["FullString", "Prefixed", "Substring", "PrefixOnWords", "ExactPhrase"],
        ),
        enumeration(
            "ContainmentComparisonType",
            &[
                "Exact",
                "IgnoreCase",
                "IgnoreNonSpacingCharacters",
                "Loose",
                "IgnoreCaseAndNonSpacingCharacters",
                "LooseAndIgnoreCase",
                "LooseAndIgnoreNonSpace",
                "LooseAndIgnoreCaseAndIgnoreNonSpace",
            ],
        ),
        simple_list("DaysOfWeekType", "DayOfWeekType"),
    ];

    // SOAP header types. OWA merges the per-operation headers into one
    // request and one response shape.
    decls.extend(vec![
        complex("RequestServerVersion").attr("Version", "string"),
        complex("TimeZoneDefinitionType")
            .discriminator_stem("TimeZoneDefinitionType")
            .attr("Id", "string")
            .attr("Name", "string"),
        complex("TimeZoneContextType")
            .child(el("t:TimeZoneDefinition", "TimeZoneDefinitionType")),
        complex("JsonRequestHeaders")
            .child(el("t:RequestServerVersion", "RequestServerVersion"))
            .child(el("t:MailboxCulture", "string"))
            .child(el("t:TimeZoneContext", "TimeZoneContextType")),
        complex("ServerVersionInfo")
            .attr("MajorVersion", "int")
            .attr("MinorVersion", "int")
            .attr("MajorBuildNumber", "int")
            .attr("MinorBuildNumber", "int")
            .attr("Version", "string"),
        complex("JsonResponseHeaders").child(el("t:ServerVersionInfo", "ServerVersionInfo")),
    ]);

    // Identifiers and shared building blocks
    decls.extend(vec![
        complex("FolderIdType")
            .attr("Id", "string")
            .attr("ChangeKey", "string"),
        complex("ItemIdType")
            .attr("Id", "string")
            .attr("ChangeKey", "string"),
        complex("DistinguishedFolderIdType")
            .attr("Id", "DistinguishedFolderIdNameType")
            .attr("ChangeKey", "string")
            .child(el("t:Mailbox", "EmailAddressType")),
        complex("EmailAddressType")
            .extras(&["EmailAddressIndex", "RelevanceScore", "SipUri", "Submitted"])
            .child(el("t:Name", "string"))
            .child(el("t:EmailAddress", "string"))
            .child(el("t:RoutingType", "string"))
            .child(el("t:MailboxType", "MailboxTypeType"))
            .child(el("t:ItemId", "ItemIdType")),
        complex("SingleRecipientType")
            .discriminator_stem("SingleRecipientType")
            .child(el("t:Mailbox", "EmailAddressType")),
        complex("FolderResponseShapeType")
            .child(el("t:BaseShape", "DefaultShapeNamesType"))
            .child(el("t:AdditionalProperties", "NonEmptyArrayOfPathsToElementType")),
        complex("ItemResponseShapeType")
            .child(el("t:BaseShape", "DefaultShapeNamesType"))
            .child(el("t:IncludeMimeContent", "boolean"))
            .child(el("t:AdditionalProperties", "NonEmptyArrayOfPathsToElementType")),
        complex("NonEmptyArrayOfPathsToElementType")
            .collapsed_list()
            .child(el("t:FieldURI", "PathToUnindexedFieldType").list())
            .child(el("t:IndexedFieldURI", "PathToIndexedFieldType").list())
            .child(el("t:ExtendedFieldURI", "PathToExtendedFieldType").list()),
        // OWA names the property path types differently from the schema
        complex("PathToUnindexedFieldType")
            .discriminator_stem("PropertyUri")
            .attr("FieldURI", "UnindexedFieldURIType"),
        complex("PathToIndexedFieldType")
            .discriminator_stem("DictionaryPropertyUri")
            .attr("FieldURI", "UnindexedFieldURIType")
            .attr("FieldIndex", "string"),
        complex("PathToExtendedFieldType")
            .discriminator_stem("ExtendedPropertyUri")
            .attr("PropertyTag", "string")
            .attr("PropertyName", "string")
            .attr("PropertyId", "int")
            .attr("PropertySetId", "string")
            .attr("PropertyType", "string"),
        complex("NonEmptyArrayOfBaseFolderIdsType")
            .collapsed_list()
            .child(el("t:FolderId", "FolderIdType").list())
            .child(el("t:DistinguishedFolderId", "DistinguishedFolderIdType").list()),
        complex("IndexedPageViewType")
            .attr("MaxEntriesReturned", "int")
            .attr("Offset", "int")
            .attr("BasePoint", "IndexBasePointType"),
        complex("TargetFolderIdType")
            .child(el("t:FolderId", "FolderIdType").named("BaseFolderId"))
            .child(el("t:DistinguishedFolderId", "DistinguishedFolderIdType").named("BaseFolderId")),
    ]);

    // Folders
    decls.extend(vec![
        complex("FolderType")
            .child(el("t:FolderId", "FolderIdType"))
            .child(el("t:ParentFolderId", "FolderIdType"))
            .child(el("t:FolderClass", "string"))
            .child(el("t:DisplayName", "string"))
            .child(el("t:TotalCount", "int"))
            .child(el("t:ChildFolderCount", "int"))
            .child(el("t:UnreadCount", "int")),
        complex("CalendarFolderType")
            .extras(&["Charm"])
            .child(el("t:FolderId", "FolderIdType"))
            .child(el("t:ParentFolderId", "FolderIdType"))
            .child(el("t:FolderClass", "string"))
            .child(el("t:DisplayName", "string"))
            .child(el("t:TotalCount", "int"))
            .child(el("t:ChildFolderCount", "int")),
        complex("ArrayOfFoldersType")
            .collapsed_list()
            .child(el("t:Folder", "FolderType").named("Folder").list())
            .child(el("t:CalendarFolder", "CalendarFolderType").named("Folder").list()),
    ]);

    // Items
    decls.extend(vec![
        complex("ItemType")
            .child(el("t:ItemId", "ItemIdType"))
            .child(el("t:ParentFolderId", "FolderIdType"))
            .child(el("t:ItemClass", "string"))
            .child(el("t:Subject", "string"))
            .child(el("t:Sensitivity", "SensitivityChoicesType"))
            .child(el("t:DateTimeReceived", "dateTime"))
            .child(el("t:Size", "int"))
            .child(el("t:Importance", "ImportanceChoicesType"))
            .child(el("t:HasAttachments", "boolean")),
        complex("MessageType")
            .extras(&[
                "Apps",
                "IsGroupEscalationMessage",
                "MessageResponseType",
                "ParentMessageId",
                "ReceivedOrRenewTime",
                "RecipientCounts",
            ])
            .child(el("t:ItemId", "ItemIdType"))
            .child(el("t:ParentFolderId", "FolderIdType"))
            .child(el("t:ItemClass", "string"))
            .child(el("t:Subject", "string"))
            .child(el("t:Sensitivity", "SensitivityChoicesType"))
            .child(el("t:DateTimeReceived", "dateTime"))
            .child(el("t:Size", "int"))
            .child(el("t:Importance", "ImportanceChoicesType"))
            .child(el("t:HasAttachments", "boolean"))
            .child(el("t:From", "SingleRecipientType"))
            .child(el("t:IsRead", "boolean"))
            .child(el("t:InternetMessageId", "string")),
        complex("CalendarItemType")
            .extras(&["Charm"])
            .child(el("t:ItemId", "ItemIdType"))
            .child(el("t:Subject", "string"))
            .child(el("t:Start", "dateTime"))
            .child(el("t:End", "dateTime"))
            .child(el("t:LegacyFreeBusyStatus", "LegacyFreeBusyType").named("FreeBusyType"))
            .child(el("t:MyResponseType", "ResponseTypeType").named("ResponseType"))
            .child(el("t:Recurrence", "RecurrenceType")),
        complex("ContactItemType")
            .discriminator_stem("Contact")
            .child(el("t:ItemId", "ItemIdType"))
            .child(el("t:DisplayName", "string"))
            .child(el("t:GivenName", "string"))
            .child(el("t:Surname", "string"))
            .child(el("t:EmailAddresses", "EmailAddressDictionaryType")),
        complex("EmailAddressDictionaryType")
            .collapsed_list()
            .child(el("t:Entry", "EmailAddressDictionaryEntryType").list()),
        simple("EmailAddressDictionaryEntryType", SimpleKind::String)
            .discriminator_stem("EmailAddressDictionaryEntryType")
            .text_attr("EmailAddress")
            .attr("Key", "EmailAddressKeyType"),
        complex("ArrayOfRealItemsType")
            .collapsed_list()
            .child(el("t:Item", "ItemType").list())
            .child(el("t:Message", "MessageType").list())
            .child(el("t:CalendarItem", "CalendarItemType").list())
            .child(el("t:Contact", "ContactItemType").list()),
    ]);

    // Recurrence
    decls.extend(vec![
        complex("RecurrenceType")
            .child(el("t:WeeklyRecurrence", "WeeklyRecurrencePatternType"))
            .child(el("t:NoEndRecurrence", "NoEndRecurrenceRangeType")),
        complex("WeeklyRecurrencePatternType")
            .child(el("t:Interval", "int"))
            .child(el("t:DaysOfWeek", "DaysOfWeekType"))
            .child(el("t:FirstDayOfWeek", "DayOfWeekType")),
        complex("NoEndRecurrenceRangeType").child(el("t:StartDate", "dateTime")),
    ]);

    // Search expressions. OWA folds every expression position into one
    // `Item` key and discriminates by type.
    decls.extend(vec![
        complex("RestrictionType")
            .discriminator_stem("RestrictionType")
            .child(el("t:Exists", "ExistsType").named("Item"))
            .child(el("t:IsEqualTo", "IsEqualToType").named("Item"))
            .child(el("t:Contains", "ContainsExpressionType").named("Item")),
        complex("ExistsType")
            .child(el("t:FieldURI", "PathToUnindexedFieldType").named("Item"))
            .child(el("t:IndexedFieldURI", "PathToIndexedFieldType").named("Item"))
            .child(el("t:ExtendedFieldURI", "PathToExtendedFieldType").named("Item")),
        complex("IsEqualToType")
            .child(el("t:FieldURI", "PathToUnindexedFieldType").named("Item"))
            .child(el("t:IndexedFieldURI", "PathToIndexedFieldType").named("Item"))
            .child(el("t:ExtendedFieldURI", "PathToExtendedFieldType").named("Item"))
            .child(el("t:FieldURIOrConstant", "FieldURIOrConstantType")),
        complex("FieldURIOrConstantType")
            .discriminator_stem("FieldURIOrConstantType")
            .child(el("t:Constant", "ConstantValueType").named("Item"))
            .child(el("t:FieldURI", "PathToUnindexedFieldType").named("Item"))
            .child(el("t:IndexedFieldURI", "PathToIndexedFieldType").named("Item"))
            .child(el("t:ExtendedFieldURI", "PathToExtendedFieldType").named("Item")),
        complex("ConstantValueType")
            .discriminator_stem("Constant")
            .attr("Value", "string"),
        complex("ContainsExpressionType")
            .discriminator_stem("Contains")
            .attr("ContainmentMode", "ContainmentModeType")
            .attr("ContainmentComparison", "ContainmentComparisonType")
            .child(el("t:FieldURI", "PathToUnindexedFieldType").named("Item"))
            .child(el("t:IndexedFieldURI", "PathToIndexedFieldType").named("Item"))
            .child(el("t:ExtendedFieldURI", "PathToExtendedFieldType").named("Item"))
            .child(el("t:Constant", "ConstantValueType")),
    ]);

    // Response message container. The JSON side discriminates the items by
    // the stamped element name, so every child shares the `Items` key and
    // the registry wires a name-keyed choice for this one type.
    decls.push(
        complex("ArrayOfResponseMessagesType")
            .list_key("Items")
            .child(el("m:GetFolderResponseMessage", "FolderInfoResponseMessageType").named("Items").list())
            .child(el("m:FindFolderResponseMessage", "FindFolderResponseMessageType").named("Items").list())
            .child(el("m:FindItemResponseMessage", "FindItemResponseMessageType").named("Items").list())
            .child(el("m:ResolveNamesResponseMessage", "ResolveNamesResponseMessageType").named("Items").list())
            .child(
                el("m:SyncFolderHierarchyResponseMessage", "SyncFolderHierarchyResponseMessageType")
                    .named("Items")
                    .list(),
            )
            .child(
                el("m:SyncFolderItemsResponseMessage", "SyncFolderItemsResponseMessageType")
                    .named("Items")
                    .list(),
            ),
    );

    // GetFolder
    decls.extend(vec![
        complex("GetFolderType")
            .child(el("m:FolderShape", "FolderResponseShapeType"))
            .child(el("m:FolderIds", "NonEmptyArrayOfBaseFolderIdsType")),
        complex("GetFolderResponseType")
            .child(el("m:ResponseMessages", "ArrayOfResponseMessagesType")),
        complex("FolderInfoResponseMessageType")
            .attr("ResponseClass", "ResponseClassType")
            .child(el("m:MessageText", "string"))
            .child(el("m:ResponseCode", "ResponseCodeType"))
            .child(el("m:DescriptiveLinkKey", "int"))
            .child(el("m:Folders", "ArrayOfFoldersType")),
    ]);

    // FindFolder
    decls.extend(vec![
        complex("FindFolderType")
            .attr("Traversal", "FolderQueryTraversalType")
            .child(el("m:FolderShape", "FolderResponseShapeType"))
            .child(
                el("m:IndexedPageFolderView", "IndexedPageViewType")
                    .named("Paging")
                    .default_value(indexed_page_view_default),
            )
            .child(el("m:ParentFolderIds", "NonEmptyArrayOfBaseFolderIdsType")),
        complex("FindFolderResponseType")
            .child(el("m:ResponseMessages", "ArrayOfResponseMessagesType")),
        complex("FindFolderResponseMessageType")
            .attr("ResponseClass", "ResponseClassType")
            .child(el("m:MessageText", "string"))
            .child(el("m:ResponseCode", "ResponseCodeType"))
            .child(el("m:DescriptiveLinkKey", "int"))
            .child(el("m:RootFolder", "FindFolderParentType")),
        complex("FindFolderParentType")
            .attr("IndexedPagingOffset", "int")
            .attr("TotalItemsInView", "int")
            .attr("IncludesLastItemInRange", "boolean")
            .child(el("t:Folders", "ArrayOfFoldersType")),
    ]);

    // FindItem
    decls.extend(vec![
        complex("FindItemType")
            .attr("Traversal", "ItemQueryTraversalType")
            .child(el("m:ItemShape", "ItemResponseShapeType"))
            .child(el("m:IndexedPageItemView", "IndexedPageViewType").named("Paging"))
            .child(el("m:Restriction", "RestrictionType"))
            .child(el("m:SortOrder", "NonEmptyArrayOfFieldOrdersType"))
            .child(el("m:ParentFolderIds", "NonEmptyArrayOfBaseFolderIdsType"))
            .child(el("m:QueryString", "string")),
        complex("NonEmptyArrayOfFieldOrdersType")
            .collapsed_list()
            .child(el("t:FieldOrder", "FieldOrderType").list()),
        complex("FieldOrderType")
            .discriminator_stem("SortResults")
            .attr("Order", "SortDirectionType")
            .child(el("t:FieldURI", "PathToUnindexedFieldType"))
            .child(el("t:IndexedFieldURI", "PathToIndexedFieldType"))
            .child(el("t:ExtendedFieldURI", "PathToExtendedFieldType")),
        complex("FindItemResponseType")
            .child(el("m:ResponseMessages", "ArrayOfResponseMessagesType")),
        complex("FindItemResponseMessageType")
            .attr("ResponseClass", "ResponseClassType")
            .extras(&["IsSearchInProgress", "SearchFolderId"])
            .child(el("m:MessageText", "string"))
            .child(el("m:ResponseCode", "ResponseCodeType"))
            .child(el("m:DescriptiveLinkKey", "int"))
            .child(el("m:RootFolder", "FindItemParentType")),
        complex("FindItemParentType")
            .attr("IndexedPagingOffset", "int")
            .attr("TotalItemsInView", "int")
            .attr("IncludesLastItemInRange", "boolean")
            .child(el("t:Items", "ArrayOfRealItemsType")),
    ]);

    // ResolveNames
    decls.extend(vec![
        complex("ResolveNamesType")
            .attr("ReturnFullContactData", "boolean")
            .attr("SearchScope", "ResolveNamesSearchScopeType")
            .attr("ContactDataShape", "DefaultShapeNamesType")
            .child(el("m:ParentFolderIds", "NonEmptyArrayOfBaseFolderIdsType"))
            .child(el("m:UnresolvedEntry", "string")),
        complex("ResolveNamesResponseType")
            .child(el("m:ResponseMessages", "ArrayOfResponseMessagesType")),
        complex("ResolveNamesResponseMessageType")
            .attr("ResponseClass", "ResponseClassType")
            .child(el("m:MessageText", "string"))
            .child(el("m:ResponseCode", "ResponseCodeType"))
            .child(el("m:DescriptiveLinkKey", "int"))
            .child(el("m:ResolutionSet", "ArrayOfResolutionType")),
        complex("ArrayOfResolutionType")
            .attr("IndexedPagingOffset", "int")
            .attr("TotalItemsInView", "int")
            .attr("IncludesLastItemInRange", "boolean")
            .child(el("t:Resolution", "ResolutionType").named("Resolutions").list()),
        complex("ResolutionType")
            .child(el("t:Mailbox", "EmailAddressType"))
            .child(el("t:Contact", "ContactItemType")),
    ]);

    // SyncFolderHierarchy
    decls.extend(vec![
        complex("SyncFolderHierarchyType")
            .child(el("m:FolderShape", "FolderResponseShapeType"))
            .child(el("m:SyncFolderId", "TargetFolderIdType"))
            .child(el("m:SyncState", "string")),
        complex("SyncFolderHierarchyResponseType")
            .child(el("m:ResponseMessages", "ArrayOfResponseMessagesType")),
        complex("SyncFolderHierarchyResponseMessageType")
            .attr("ResponseClass", "ResponseClassType")
            .child(el("m:MessageText", "string"))
            .child(el("m:ResponseCode", "ResponseCodeType"))
            .child(el("m:DescriptiveLinkKey", "int"))
            .child(el("m:SyncState", "string"))
            .child(el("m:IncludesLastFolderInRange", "boolean"))
            .child(el("m:Changes", "SyncFolderHierarchyChangesType")),
        complex("SyncFolderHierarchyChangesType")
            .list_key("Changes")
            .child(el("t:Create", "SyncFolderHierarchyCreateOrUpdateType").list())
            .child(el("t:Update", "SyncFolderHierarchyCreateOrUpdateType").list())
            .child(el("t:Delete", "SyncFolderHierarchyDeleteType").list()),
        complex("SyncFolderHierarchyCreateOrUpdateType")
            .extras(&["ChangeType"])
            .child(el("t:Folder", "FolderType"))
            .child(el("t:CalendarFolder", "CalendarFolderType").named("Folder")),
        complex("SyncFolderHierarchyDeleteType")
            .extras(&["ChangeType"])
            .child(el("t:FolderId", "FolderIdType")),
    ]);

    // SyncFolderItems
    decls.extend(vec![
        complex("SyncFolderItemsType")
            .child(el("m:ItemShape", "ItemResponseShapeType"))
            .child(el("m:SyncFolderId", "TargetFolderIdType"))
            .child(el("m:SyncState", "string"))
            .child(el("m:MaxChangesReturned", "int"))
            .child(el("m:SyncScope", "SyncFolderItemsScopeType")),
        complex("SyncFolderItemsResponseType")
            .child(el("m:ResponseMessages", "ArrayOfResponseMessagesType")),
        complex("SyncFolderItemsResponseMessageType")
            .attr("ResponseClass", "ResponseClassType")
            .extras(&["OldestReceivedTime", "MoreItemsOnServer", "TotalCount"])
            .child(el("m:MessageText", "string"))
            .child(el("m:ResponseCode", "ResponseCodeType"))
            .child(el("m:DescriptiveLinkKey", "int"))
            .child(el("m:SyncState", "string"))
            .child(el("m:IncludesLastItemInRange", "boolean"))
            .child(el("m:Changes", "SyncFolderItemsChangesType")),
        complex("SyncFolderItemsChangesType")
            .list_key("Changes")
            .child(
                el("t:Create", "SyncFolderItemsCreateOrUpdateType")
                    .hinted("SyncFolderItemsCreateType:#Exchange")
                    .list(),
            )
            .child(
                el("t:Update", "SyncFolderItemsCreateOrUpdateType")
                    .hinted("SyncFolderItemsUpdateType:#Exchange")
                    .list(),
            )
            .child(el("t:Delete", "SyncFolderItemsDeleteType").list())
            .child(el("t:ReadFlagChange", "SyncFolderItemsReadFlagType").list()),
        complex("SyncFolderItemsCreateOrUpdateType")
            .extras(&["ChangeType"])
            .child(el("t:Item", "ItemType"))
            .child(el("t:Message", "MessageType").named("Item"))
            .child(el("t:CalendarItem", "CalendarItemType").named("Item"))
            .child(el("t:Contact", "ContactItemType").named("Item")),
        complex("SyncFolderItemsDeleteType")
            .extras(&["ChangeType"])
            .child(el("t:ItemId", "ItemIdType")),
        complex("SyncFolderItemsReadFlagType")
            .extras(&["ChangeType"])
            .child(el("t:ItemId", "ItemIdType"))
            .child(el("t:IsRead", "boolean")),
    ]);

    decls
}

/// The operation catalog
pub(crate) fn operations() -> Vec<OpDecl> {
    vec![
        op("GetFolder", "GetFolderType", "GetFolderResponse", "GetFolderResponseType"),
        op("FindFolder", "FindFolderType", "FindFolderResponse", "FindFolderResponseType"),
        op("FindItem", "FindItemType", "FindItemResponse", "FindItemResponseType"),
        op(
            "ResolveNames",
            "ResolveNamesType",
            "ResolveNamesResponse",
            "ResolveNamesResponseType",
        ),
        op(
            "SyncFolderHierarchy",
            "SyncFolderHierarchyType",
            "SyncFolderHierarchyResponse",
            "SyncFolderHierarchyResponseType",
        ),
        op(
            "SyncFolderItems",
            "SyncFolderItemsType",
            "SyncFolderItemsResponse",
            "SyncFolderItemsResponseType",
        ),
    ]
}
