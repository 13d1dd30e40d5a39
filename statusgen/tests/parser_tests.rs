use statusgen::{ErrorKind, parse_proto};

#[test]
fn test_enum_values_and_docs() {
    let source = r#"
syntax = "proto3";

package proto;

/**
 * Response codes
 */
enum ResponseCodeEnum {
    /**
     * The transaction passed the precheck validations.
     *
     * Nothing else to report.
     */
    OK = 0;
    INVALID_TRANSACTION = 1; // generic failure
    SUCCESS = 22;
}
"#;

    let file = parse_proto(source).unwrap();
    assert_eq!(file.package.as_deref(), Some("proto"));

    let codes = file.find_enum("ResponseCodeEnum").unwrap();
    assert_eq!(codes.doc, vec!["Response codes"]);

    let values: Vec<_> = codes.values.iter().map(|v| (v.name.as_str(), v.number)).collect();
    assert_eq!(values, vec![("OK", 0), ("INVALID_TRANSACTION", 1), ("SUCCESS", 22)]);

    assert_eq!(
        codes.values[0].doc,
        vec!["The transaction passed the precheck validations.", "", "Nothing else to report."]
    );
    assert_eq!(codes.values[1].doc, vec!["generic failure"]);
    assert!(codes.values[2].doc.is_empty());
}

#[test]
fn test_block_doc_wins_over_trailing_comment() {
    let source = "enum E {\n  /** block */\n  A = 1; // trailing\n}\n";
    let file = parse_proto(source).unwrap();
    assert_eq!(file.enums[0].values[0].doc, vec!["block"]);
}

#[test]
fn test_comment_on_next_line_is_not_trailing() {
    let source = "enum E {\n  A = 1;\n  // about B\n  B = 2;\n}\n";
    let file = parse_proto(source).unwrap();
    assert!(file.enums[0].values[0].doc.is_empty());
    assert!(file.enums[0].values[1].doc.is_empty());
}

#[test]
fn test_value_options_and_reserved() {
    let source = r#"
enum Legacy {
    option allow_alias = true;
    reserved 2, 15, 9 to 11;
    reserved "FOO";
    UNKNOWN = 0;
    OLD = 1 [deprecated = true];
    NEGATIVE = -1;
    HEX = 0x10;
}
"#;
    let file = parse_proto(source).unwrap();
    let values: Vec<_> = file.enums[0].values.iter().map(|v| (v.name.as_str(), v.number)).collect();
    assert_eq!(values, vec![("UNKNOWN", 0), ("OLD", 1), ("NEGATIVE", -1), ("HEX", 16)]);
}

#[test]
fn test_nested_messages_and_enums() {
    let source = r#"
/**
 * The receipt of a transaction
 */
message TransactionReceipt {
    ResponseCodeEnum status = 1;
    map<string, int64> balances = 2;

    /** Exchange rates */
    message ExchangeRate {
        int32 hbarEquiv = 1;

        enum Kind {
            CURRENT = 0;
            NEXT = 1;
        }
    }

    oneof body {
        AccountID accountID = 3;
        FileID fileID = 4;
    }
}
"#;
    let file = parse_proto(source).unwrap();

    let names: Vec<_> = file.all_messages().into_iter().map(|(name, _)| name).collect();
    assert_eq!(names, vec!["TransactionReceipt", "TransactionReceipt.ExchangeRate"]);

    let kind = file.find_enum("Kind").unwrap();
    assert_eq!(kind.values.len(), 2);

    let (_, rate) = &file.all_messages()[1];
    assert_eq!(rate.doc, vec!["Exchange rates"]);
}

#[test]
fn test_services_and_imports_are_skipped() {
    let source = r#"
syntax = "proto3";
import "basic_types.proto";
option java_package = "com.hederahashgraph.service.proto.java";

service CryptoService {
    rpc createAccount (Transaction) returns (TransactionResponse);
    rpc updateAccount (Transaction) returns (TransactionResponse) {
        option deprecated = true;
    }
}

enum After {
    A = 0;
}
"#;
    let file = parse_proto(source).unwrap();
    assert!(file.messages.is_empty());
    assert_eq!(file.enums.len(), 1);
    assert_eq!(file.enums[0].name, "After");
}

#[test]
fn test_plain_block_comments_are_not_docs() {
    let source = "/* not a doc */\nenum E {\n  /**/\n  A = 0;\n}\n";
    let file = parse_proto(source).unwrap();
    assert!(file.enums[0].doc.is_empty());
    assert!(file.enums[0].values[0].doc.is_empty());
}

#[test]
fn test_unclosed_enum() {
    let err = parse_proto("enum E {\n  A = 0;\n").unwrap_err();
    assert_eq!(err.kind, ErrorKind::UnclosedBlock);
    assert_eq!(err.related_span.unwrap().start.line, 0);
}

#[test]
fn test_missing_equals() {
    let err = parse_proto("enum E {\n    SUCCESS 22;\n}\n").unwrap_err();
    assert_eq!(err.kind, ErrorKind::UnexpectedToken);
    assert_eq!(err.message, "Expected '=', found number 22.");
    assert_eq!((err.span.start.line, err.span.start.col), (1, 12));
}

#[test]
fn test_unterminated_comment() {
    let err = parse_proto("/** never closed\nenum E {}").unwrap_err();
    assert_eq!(err.kind, ErrorKind::UnterminatedComment);
}

#[test]
fn test_unknown_top_level_keyword() {
    let err = parse_proto("struct Foo {}").unwrap_err();
    assert_eq!(err.kind, ErrorKind::UnexpectedToken);
    assert!(err.message.starts_with("Expected a top-level declaration"));
}

#[test]
fn test_error_render_points_at_token() {
    let source = "enum E {\n    SUCCESS 22;\n}\n";
    let err = parse_proto(source).unwrap_err();
    let rendered = err.render(source, "codes.proto");
    assert!(rendered.contains("codes.proto:2:13"));
    assert!(rendered.contains("SUCCESS 22;"));
    assert!(rendered.contains("^^"));
}
