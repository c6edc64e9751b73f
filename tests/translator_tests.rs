//! End-to-end translation tests over the public API
//!
//! Requests are SOAP captures pushed through `soap_to_json` and compared
//! against the JSON the OWA endpoint expects; responses are OWA JSON
//! captures pushed through `json_to_soap` and compared against the SOAP a
//! legacy client expects.

use ews_bridge::{json_to_soap, lookup_operation, soap_to_json, Error};

const ENVELOPE_OPEN: &str = r#"<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/" xmlns:m="http://schemas.microsoft.com/exchange/services/2006/messages" xmlns:t="http://schemas.microsoft.com/exchange/services/2006/types">"#;

fn request(body: &str) -> String {
    format!("{}<soap:Body>{}</soap:Body></soap:Envelope>", ENVELOPE_OPEN, body)
}

fn request_with_header(header: &str, body: &str) -> String {
    format!(
        "{}<soap:Header>{}</soap:Header><soap:Body>{}</soap:Body></soap:Envelope>",
        ENVELOPE_OPEN, header, body
    )
}

fn translate_request(xml: &str) -> (String, &'static str) {
    let (json, op) = soap_to_json(xml.as_bytes()).expect("request translation");
    (String::from_utf8(json).unwrap(), op.action)
}

fn translate_response(action: &str, json: &str) -> String {
    let op = lookup_operation(action).expect("registered operation");
    let mut out = Vec::new();
    json_to_soap(json.as_bytes(), op, &mut out, false).expect("response translation");
    String::from_utf8(out).unwrap()
}

fn response_error(action: &str, json: &str) -> Error {
    let op = lookup_operation(action).expect("registered operation");
    let mut out = Vec::new();
    json_to_soap(json.as_bytes(), op, &mut out, false).expect_err("translation should fail")
}

//
// requests
//

#[test]
fn get_folder_request_without_header_synthesizes_one() {
    let xml = request(
        r#"<m:GetFolder><m:FolderShape><t:BaseShape>IdOnly</t:BaseShape></m:FolderShape><m:FolderIds><t:DistinguishedFolderId Id="inbox"/></m:FolderIds></m:GetFolder>"#,
    );
    let (json, action) = translate_request(&xml);
    assert_eq!(action, "GetFolder");
    assert_eq!(
        json,
        r#"{"__type":"GetFolderJsonRequest:#Exchange","Header":{"__type":"JsonRequestHeaders:#Exchange","RequestServerVersion":"Exchange2013"},"Body":{"__type":"GetFolderRequest:#Exchange","FolderShape":{"__type":"FolderResponseShape:#Exchange","BaseShape":0},"FolderIds":[{"__type":"DistinguishedFolderId:#Exchange","Id":4}]}}"#
    );
}

#[test]
fn discriminator_is_always_the_first_key() {
    let xml = request(
        r#"<m:GetFolder><m:FolderShape><t:BaseShape>Default</t:BaseShape></m:FolderShape><m:FolderIds><t:FolderId Id="AQMkAD"/></m:FolderIds></m:GetFolder>"#,
    );
    let (json, _) = translate_request(&xml);
    assert!(json.starts_with(r#"{"__type":"GetFolderJsonRequest:#Exchange""#));
    assert!(json.contains(r#""Header":{"__type":"#));
    assert!(json.contains(r#""Body":{"__type":"GetFolderRequest:#Exchange""#));
    assert!(json.contains(r#"{"__type":"FolderId:#Exchange","Id":"AQMkAD"}"#));
}

#[test]
fn old_request_server_versions_are_upgraded() {
    let xml = request_with_header(
        r#"<t:RequestServerVersion Version="Exchange2010_SP2"/>"#,
        r#"<m:GetFolder><m:FolderShape><t:BaseShape>IdOnly</t:BaseShape></m:FolderShape><m:FolderIds><t:DistinguishedFolderId Id="root"/></m:FolderIds></m:GetFolder>"#,
    );
    let (json, _) = translate_request(&xml);
    assert!(json.contains(
        r#""Header":{"__type":"JsonRequestHeaders:#Exchange","RequestServerVersion":"Exchange2013"}"#
    ));
}

#[test]
fn current_request_server_versions_pass_through() {
    let xml = request_with_header(
        r#"<t:RequestServerVersion Version="Exchange2013_SP1"/>"#,
        r#"<m:GetFolder><m:FolderShape><t:BaseShape>IdOnly</t:BaseShape></m:FolderShape><m:FolderIds><t:DistinguishedFolderId Id="root"/></m:FolderIds></m:GetFolder>"#,
    );
    let (json, _) = translate_request(&xml);
    assert!(json.contains(r#""RequestServerVersion":"Exchange2013_SP1""#));
}

#[test]
fn resolve_names_gets_a_default_contact_data_shape() {
    let xml = request(
        r#"<m:ResolveNames ReturnFullContactData="true"><m:UnresolvedEntry>meg</m:UnresolvedEntry></m:ResolveNames>"#,
    );
    let (json, action) = translate_request(&xml);
    assert_eq!(action, "ResolveNames");
    assert_eq!(
        json,
        r#"{"__type":"ResolveNamesJsonRequest:#Exchange","Header":{"__type":"JsonRequestHeaders:#Exchange","RequestServerVersion":"Exchange2013"},"Body":{"__type":"ResolveNamesRequest:#Exchange","ReturnFullContactData":true,"UnresolvedEntry":"meg","ContactDataShape":"Default"}}"#
    );
}

#[test]
fn find_folder_paging_default_is_injected() {
    let xml = request(
        r#"<m:FindFolder Traversal="Deep"><m:FolderShape><t:BaseShape>Default</t:BaseShape></m:FolderShape><m:ParentFolderIds><t:DistinguishedFolderId Id="msgfolderroot"/></m:ParentFolderIds></m:FindFolder>"#,
    );
    let (json, _) = translate_request(&xml);
    assert!(json.contains(
        r#""Paging":{"__type":"IndexedPageView:#Exchange","MaxEntriesReturned":2147483647,"Offset":0,"BasePoint":"Beginning"}"#
    ));
    // Traversal is an attribute of an enumerated type
    assert!(json.contains(r#""Traversal":1"#));
}

#[test]
fn sibling_elements_collapse_into_one_array() {
    let xml = request(
        r#"<m:GetFolder><m:FolderShape><t:BaseShape>IdOnly</t:BaseShape></m:FolderShape><m:FolderIds><t:DistinguishedFolderId Id="inbox"/><t:DistinguishedFolderId Id="outbox"/><t:FolderId Id="AQMkAD"/></m:FolderIds></m:GetFolder>"#,
    );
    let (json, _) = translate_request(&xml);
    assert!(json.contains(
        r#""FolderIds":[{"__type":"DistinguishedFolderId:#Exchange","Id":4},{"__type":"DistinguishedFolderId:#Exchange","Id":7},{"__type":"FolderId:#Exchange","Id":"AQMkAD"}]"#
    ));
}

#[test]
fn request_numbers_keep_their_lexical_form() {
    let xml = request(
        r#"<m:SyncFolderItems><m:ItemShape><t:BaseShape>IdOnly</t:BaseShape></m:ItemShape><m:SyncFolderId><t:DistinguishedFolderId Id="inbox"/></m:SyncFolderId><m:MaxChangesReturned>9007199254740993</m:MaxChangesReturned></m:SyncFolderItems>"#,
    );
    let (json, _) = translate_request(&xml);
    assert!(json.contains(r#""MaxChangesReturned":9007199254740993"#));
}

#[test]
fn unknown_request_element_is_a_schema_violation() {
    let xml = request(r#"<m:GetFolder><m:Sideband/></m:GetFolder>"#);
    let err = soap_to_json(xml.as_bytes()).unwrap_err();
    let msg = format!("{}", err);
    assert!(msg.contains("unknown element Sideband"), "got: {}", msg);
}

//
// responses
//

#[test]
fn find_item_response_items_are_stamped_and_translated() {
    let json = r#"{
        "Header": {"ServerVersionInfo": {"__type": "ServerVersionInfo:#Exchange", "MajorVersion": 15, "MinorVersion": 1, "MajorBuildNumber": 2507, "MinorBuildNumber": 27}},
        "Body": {"ResponseMessages": {"Items": [
            {"ResponseClass": "Success", "ResponseCode": "NoError", "IsSearchInProgress": false, "RootFolder": {
                "IndexedPagingOffset": 2, "TotalItemsInView": 2, "IncludesLastItemInRange": true,
                "Items": [
                    {"__type": "Message:#Exchange", "ItemId": {"__type": "ItemId:#Exchange", "Id": "AAMkAGI2", "ChangeKey": "CQAAABYA"}, "Subject": "hello", "IsRead": false},
                    {"__type": "Message:#Exchange", "ItemId": {"__type": "ItemId:#Exchange", "Id": "AAMkAGI3", "ChangeKey": "CQAAABYB"}, "Subject": "again", "IsRead": true}
                ]}}
        ]}}}"#;
    let xml = translate_response("FindItem", json);
    assert_eq!(
        xml,
        concat!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n",
            "<soap:Envelope xmlns:soap=\"http://schemas.xmlsoap.org/soap/envelope/\" xmlns:m=\"http://schemas.microsoft.com/exchange/services/2006/messages\" xmlns:t=\"http://schemas.microsoft.com/exchange/services/2006/types\">",
            "<soap:Header><t:ServerVersionInfo MajorVersion=\"15\" MinorVersion=\"1\" MajorBuildNumber=\"2507\" MinorBuildNumber=\"27\"></t:ServerVersionInfo></soap:Header>",
            "<soap:Body><m:FindItemResponse><m:ResponseMessages>",
            "<m:FindItemResponseMessage ResponseClass=\"Success\"><m:ResponseCode>NoError</m:ResponseCode>",
            "<m:RootFolder IndexedPagingOffset=\"2\" TotalItemsInView=\"2\" IncludesLastItemInRange=\"true\">",
            "<t:Items>",
            "<t:Message><t:ItemId Id=\"AAMkAGI2\" ChangeKey=\"CQAAABYA\"></t:ItemId><t:Subject>hello</t:Subject><t:IsRead>false</t:IsRead></t:Message>",
            "<t:Message><t:ItemId Id=\"AAMkAGI3\" ChangeKey=\"CQAAABYB\"></t:ItemId><t:Subject>again</t:Subject><t:IsRead>true</t:IsRead></t:Message>",
            "</t:Items></m:RootFolder></m:FindItemResponseMessage>",
            "</m:ResponseMessages></m:FindItemResponse></soap:Body></soap:Envelope>"
        )
    );
}

#[test]
fn get_folder_response_translates_folders_and_big_numbers() {
    let json = r#"{"Body": {"ResponseMessages": {"Items": [
        {"ResponseClass": "Success", "ResponseCode": "NoError", "DescriptiveLinkKey": 9007199254740993,
         "Folders": [
            null,
            {"__type": "Folder:#Exchange",
             "FolderId": {"__type": "FolderId:#Exchange", "Id": "AQMkAD", "ChangeKey": "AQAAAB"},
             "DisplayName": "Inbox", "TotalCount": 42, "ChildFolderCount": 0, "UnreadCount": 7}
        ]}
    ]}}}"#;
    let xml = translate_response("GetFolder", json);
    assert!(xml.contains("<m:DescriptiveLinkKey>9007199254740993</m:DescriptiveLinkKey>"));
    // the null list entry is skipped, the folder is emitted in declared order
    assert!(xml.contains(concat!(
        "<m:Folders><t:Folder>",
        "<t:FolderId Id=\"AQMkAD\" ChangeKey=\"AQAAAB\"></t:FolderId>",
        "<t:DisplayName>Inbox</t:DisplayName>",
        "<t:TotalCount>42</t:TotalCount>",
        "<t:ChildFolderCount>0</t:ChildFolderCount>",
        "<t:UnreadCount>7</t:UnreadCount>",
        "</t:Folder></m:Folders>"
    )));
}

#[test]
fn calendar_items_translate_enums_and_bitfield_lists() {
    let json = r#"{"Body": {"ResponseMessages": {"Items": [
        {"ResponseClass": "Success", "ResponseCode": "NoError", "RootFolder": {
            "TotalItemsInView": 1, "IncludesLastItemInRange": true,
            "Items": [
                {"__type": "CalendarItem:#Exchange",
                 "ItemId": {"__type": "ItemId:#Exchange", "Id": "AAMkAGI4", "ChangeKey": "DwAAABYA"},
                 "Subject": "standup",
                 "FreeBusyType": 2,
                 "Recurrence": {
                     "WeeklyRecurrence": {"Interval": 1, "DaysOfWeek": 10, "FirstDayOfWeek": 1},
                     "NoEndRecurrence": {"StartDate": "2024-01-01"}
                 }}
            ]}}
    ]}}}"#;
    let xml = translate_response("FindItem", json);
    assert!(xml.contains("<t:LegacyFreeBusyStatus>Busy</t:LegacyFreeBusyStatus>"));
    assert!(xml.contains(concat!(
        "<t:Recurrence><t:WeeklyRecurrence>",
        "<t:Interval>1</t:Interval>",
        "<t:DaysOfWeek>Monday Wednesday</t:DaysOfWeek>",
        "<t:FirstDayOfWeek>Monday</t:FirstDayOfWeek>",
        "</t:WeeklyRecurrence>",
        "<t:NoEndRecurrence><t:StartDate>2024-01-01</t:StartDate></t:NoEndRecurrence>",
        "</t:Recurrence>"
    )));
}

#[test]
fn hierarchy_changes_resolve_their_tags_through_the_change_type() {
    let json = r#"{"Body": {"ResponseMessages": {"Items": [
        {"ResponseClass": "Success", "ResponseCode": "NoError", "SyncState": "abc=", "IncludesLastFolderInRange": true,
         "Changes": {"Changes": [
            {"ChangeType": "Create", "Folder": {"__type": "Folder:#Exchange",
                "FolderId": {"__type": "FolderId:#Exchange", "Id": "AAMk", "ChangeKey": "AQA"},
                "DisplayName": "New Folder"}},
            {"ChangeType": "Delete", "FolderId": {"__type": "FolderId:#Exchange", "Id": "AAMl", "ChangeKey": "AQB"}}
         ]}}
    ]}}}"#;
    let xml = translate_response("SyncFolderHierarchy", json);
    assert!(xml.contains(concat!(
        "<m:Changes>",
        "<t:Create><t:Folder><t:FolderId Id=\"AAMk\" ChangeKey=\"AQA\"></t:FolderId>",
        "<t:DisplayName>New Folder</t:DisplayName></t:Folder></t:Create>",
        "<t:Delete><t:FolderId Id=\"AAMl\" ChangeKey=\"AQB\"></t:FolderId></t:Delete>",
        "</m:Changes>"
    )));
    assert!(xml.contains("<m:SyncState>abc=</m:SyncState>"));
}

#[test]
fn unknown_change_type_is_a_schema_violation() {
    let json = r#"{"Body": {"ResponseMessages": {"Items": [
        {"ResponseClass": "Success", "ResponseCode": "NoError", "SyncState": "abc=", "IncludesLastFolderInRange": true,
         "Changes": {"Changes": [{"ChangeType": "Frobnicate", "Folder": {}}]}}
    ]}}}"#;
    let err = response_error("SyncFolderHierarchy", json);
    let msg = format!("{}", err);
    assert!(msg.contains("invalid ChangeType"), "got: {}", msg);
    assert!(msg.contains("soap:Body"), "breadcrumb missing: {}", msg);
}

#[test]
fn resolutions_fold_attributes_and_text_into_entries() {
    let json = r#"{"Body": {"ResponseMessages": {"Items": [
        {"ResponseClass": "Success", "ResponseCode": "NoError",
         "ResolutionSet": {"TotalItemsInView": 1, "IncludesLastItemInRange": true,
            "Resolutions": [
                {"__type": "Resolution:#Exchange",
                 "Mailbox": {"__type": "EmailAddress:#Exchange", "Name": "Meg", "EmailAddress": "meg@example.com", "RoutingType": "SMTP", "MailboxType": 2},
                 "Contact": {"__type": "Contact:#Exchange", "DisplayName": "Meg",
                     "EmailAddresses": [{"__type": "EmailAddressDictionaryEntryType:#Exchange", "Key": 0, "EmailAddress": "meg@example.com"}]}}
            ]}}
    ]}}}"#;
    let xml = translate_response("ResolveNames", json);
    assert!(xml.contains(
        "<m:ResolutionSet TotalItemsInView=\"1\" IncludesLastItemInRange=\"true\">"
    ));
    assert!(xml.contains(concat!(
        "<t:Mailbox><t:Name>Meg</t:Name><t:EmailAddress>meg@example.com</t:EmailAddress>",
        "<t:RoutingType>SMTP</t:RoutingType><t:MailboxType>Mailbox</t:MailboxType></t:Mailbox>"
    )));
    assert!(xml.contains(
        "<t:EmailAddresses><t:Entry Key=\"EmailAddress1\">meg@example.com</t:Entry></t:EmailAddresses>"
    ));
}

#[test]
fn sync_items_changes_resolve_through_hinted_discriminators() {
    let json = r#"{"Body": {"ResponseMessages": {"Items": [
        {"ResponseClass": "Success", "ResponseCode": "NoError", "SyncState": "xyz=", "IncludesLastItemInRange": true,
         "Changes": {"Changes": [
            {"__type": "SyncFolderItemsCreateType:#Exchange", "ChangeType": "Create",
             "Item": {"__type": "Message:#Exchange", "ItemId": {"__type": "ItemId:#Exchange", "Id": "AAMk", "ChangeKey": "CQA"}, "Subject": "hi", "IsRead": false}},
            {"__type": "SyncFolderItemsDelete:#Exchange", "ChangeType": "Delete",
             "ItemId": {"__type": "ItemId:#Exchange", "Id": "AAMl", "ChangeKey": "CQB"}},
            {"__type": "SyncFolderItemsReadFlagType:#Exchange", "ChangeType": "ReadFlagChange",
             "ItemId": {"__type": "ItemId:#Exchange", "Id": "AAMm", "ChangeKey": "CQC"}, "IsRead": true}
         ]}}
    ]}}}"#;
    let xml = translate_response("SyncFolderItems", json);
    assert!(xml.contains(concat!(
        "<t:Create><t:Message><t:ItemId Id=\"AAMk\" ChangeKey=\"CQA\"></t:ItemId>",
        "<t:Subject>hi</t:Subject><t:IsRead>false</t:IsRead></t:Message></t:Create>"
    )));
    assert!(xml.contains(
        "<t:Delete><t:ItemId Id=\"AAMl\" ChangeKey=\"CQB\"></t:ItemId></t:Delete>"
    ));
    assert!(xml.contains(concat!(
        "<t:ReadFlagChange><t:ItemId Id=\"AAMm\" ChangeKey=\"CQC\"></t:ItemId>",
        "<t:IsRead>true</t:IsRead></t:ReadFlagChange>"
    )));
}

#[test]
fn leftover_json_keys_are_a_schema_violation() {
    let json = r#"{"Body": {"ResponseMessages": {"Items": [
        {"ResponseClass": "Success", "ResponseCode": "NoError", "RootFolder": {
            "TotalItemsInView": 1, "IncludesLastItemInRange": true,
            "Items": [{"__type": "Message:#Exchange", "Subject": "hello", "FrobnicationLevel": 9}]}}
    ]}}}"#;
    let err = response_error("FindItem", json);
    let msg = format!("{}", err);
    assert!(msg.contains("unexpected members in MessageType"), "got: {}", msg);
    assert!(msg.contains("FrobnicationLevel"), "got: {}", msg);
    assert!(msg.contains("soap:Body"), "breadcrumb missing: {}", msg);
}

#[test]
fn dropped_extras_are_silently_consumed() {
    let json = r#"{"Body": {"ResponseMessages": {"Items": [
        {"ResponseClass": "Success", "ResponseCode": "NoError", "IsSearchInProgress": false, "SearchFolderId": null,
         "RootFolder": {"TotalItemsInView": 0, "IncludesLastItemInRange": true, "Items": []}}
    ]}}}"#;
    let xml = translate_response("FindItem", json);
    assert!(!xml.contains("IsSearchInProgress"));
    assert!(xml.contains("<t:Items></t:Items>"));
}

#[test]
fn items_that_are_not_an_array_fail_structurally() {
    let err = response_error(
        "FindItem",
        r#"{"Body": {"ResponseMessages": {"Items": {"oops": 1}}}}"#,
    );
    assert!(format!("{}", err).contains("cannot convert Items to an array"));
}

#[test]
fn declared_items_must_be_present() {
    let err = response_error(
        "FindItem",
        r#"{"Body": {"ResponseMessages": {"NotItems": []}}}"#,
    );
    assert!(format!("{}", err).contains("cannot find Items element"));
}

#[test]
fn enum_index_out_of_range_is_a_value_error() {
    let json = r#"{"Body": {"ResponseMessages": {"Items": [
        {"ResponseClass": "Success", "ResponseCode": "NoError", "RootFolder": {
            "TotalItemsInView": 1, "IncludesLastItemInRange": true,
            "Items": [{"__type": "Message:#Exchange", "Sensitivity": 99}]}}
    ]}}}"#;
    let err = response_error("FindItem", json);
    assert!(format!("{}", err).contains("out of range"));
}

#[test]
fn enum_labels_sent_verbatim_pass_through() {
    let json = r#"{"Body": {"ResponseMessages": {"Items": [
        {"ResponseClass": "Success", "ResponseCode": "NoError", "RootFolder": {
            "TotalItemsInView": 1, "IncludesLastItemInRange": true,
            "Items": [{"__type": "Message:#Exchange", "Sensitivity": "CompanyConfidential"}]}}
    ]}}}"#;
    let xml = translate_response("FindItem", json);
    assert!(xml.contains("<t:Sensitivity>CompanyConfidential</t:Sensitivity>"));
}
