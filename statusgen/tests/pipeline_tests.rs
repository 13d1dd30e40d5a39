use statusgen::{
    DuplicatePolicy, Error, ErrorKind, NameStyle, Options, Pipeline, Source, Target,
    discover_protos, message_docs,
};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const DECLARATIONS: &str = "\
export namespace proto {
    /** ResponseCodeEnum enum. */
    enum ResponseCodeEnum {
        OK = 0,
        INVALID_TRANSACTION = 1,
        SUCCESS = 22
    }
}
";

const RESPONSE_CODE_PROTO: &str = r#"syntax = "proto3";

package proto;

enum ResponseCodeEnum {
    /**
     * The transaction passed the precheck validations.
     */
    OK = 0;
    INVALID_TRANSACTION = 1; // generic failure
    SUCCESS = 22;
}
"#;

/// Lay out a proto/declaration tree in a temporary directory
fn workspace(declarations: &str, protos: &[(&str, &str)]) -> (TempDir, Options) {
    let dir = tempfile::tempdir().unwrap();
    let services = dir.path().join("services");
    fs::create_dir(&services).unwrap();
    for (name, text) in protos {
        fs::write(services.join(name), text).unwrap();
    }
    fs::write(dir.path().join("proto.d.ts"), declarations).unwrap();

    let options = Options {
        proto_dir: "services".into(),
        declarations: "proto.d.ts".into(),
        output: "StatusCodes".into(),
        ..Options::default()
    }
    .relative_to(dir.path());
    (dir, options)
}

#[test]
fn test_generate_writes_output() {
    let (dir, options) = workspace(DECLARATIONS, &[("response_code.proto", RESPONSE_CODE_PROTO)]);
    let generated = Pipeline::new(options).generate().unwrap();

    let written = fs::read_to_string(dir.path().join("StatusCodes")).unwrap();
    assert_eq!(written, generated.code);
    assert!(written.contains("            case Status.InvalidTransaction:\n                return \"INVALID_TRANSACTION\";\n"));
    assert!(written.contains("            case 22:\n                return Status.Success;\n"));
    assert!(written.contains("/**\n * generic failure\n */\nStatus.InvalidTransaction = new Status(1);\n"));

    assert_eq!(generated.constants.len(), 3);
    assert_eq!(generated.documented, 2);
    assert_eq!(generated.proto_files, 1);
    assert!(generated.drift.as_ref().is_some_and(|d| d.is_empty()));
}

#[test]
fn test_second_run_is_byte_identical() {
    let (dir, options) = workspace(DECLARATIONS, &[("response_code.proto", RESPONSE_CODE_PROTO)]);
    let output = dir.path().join("StatusCodes");
    let pipeline = Pipeline::new(options);

    pipeline.generate().unwrap();
    let first = fs::read(&output).unwrap();
    pipeline.generate().unwrap();
    let second = fs::read(&output).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_previous_output_is_replaced() {
    let (dir, options) = workspace(DECLARATIONS, &[("response_code.proto", RESPONSE_CODE_PROTO)]);
    let output = dir.path().join("StatusCodes");
    fs::write(&output, "stale contents that are much longer than nothing at all\n".repeat(500)).unwrap();

    Pipeline::new(options).generate().unwrap();

    let written = fs::read_to_string(&output).unwrap();
    assert!(!written.contains("stale contents"));
    assert!(written.starts_with("/*-\n"));
}

#[test]
fn test_toggle_order_follows_declarations() {
    let declarations = "enum ResponseCodeEnum {\n    SUCCESS = 22,\n    OK = 0\n}\n";
    let (_dir, options) = workspace(declarations, &[]);
    let generated = Pipeline::new(options).run().unwrap();

    let success = generated.code.find("case Status.Success:").unwrap();
    let ok = generated.code.find("case Status.Ok:").unwrap();
    assert!(success < ok);

    let case_22 = generated.code.find("case 22:").unwrap();
    let case_0 = generated.code.find("case 0:").unwrap();
    assert!(case_22 < case_0);
}

#[test]
fn test_missing_declarations() {
    let (dir, options) = workspace(DECLARATIONS, &[]);
    fs::remove_file(dir.path().join("proto.d.ts")).unwrap();

    let err = Pipeline::new(options).generate().unwrap_err();
    assert!(matches!(err, Error::MissingInput { ref path } if path.ends_with("proto.d.ts")));
    assert!(!dir.path().join("StatusCodes").exists());
}

#[test]
fn test_missing_proto_dir() {
    let (dir, options) = workspace(DECLARATIONS, &[]);
    fs::remove_dir(dir.path().join("services")).unwrap();

    let err = Pipeline::new(options).run().unwrap_err();
    assert!(matches!(err, Error::MissingInput { ref path } if path.ends_with("services")));
}

#[test]
fn test_failure_leaves_previous_output() {
    let (dir, options) = workspace("enum ResponseCodeEnum {\n    OK 0\n}\n", &[]);
    let output = dir.path().join("StatusCodes");
    fs::write(&output, "previous").unwrap();

    let err = Pipeline::new(options).generate().unwrap_err();
    assert_eq!(err.parse_kind(), Some(ErrorKind::MalformedLine));
    assert_eq!(fs::read_to_string(&output).unwrap(), "previous");
}

#[test]
fn test_drift_reported() {
    let proto = "enum ResponseCodeEnum {\n  OK = 0;\n  SUCCESS = 22;\n  BUSY = 12;\n}\n";
    let declarations = "enum ResponseCodeEnum {\n    OK = 0,\n    INVALID_TRANSACTION = 1\n}\n";
    let (_dir, options) = workspace(declarations, &[("codes.proto", proto)]);

    let generated = Pipeline::new(options).run().unwrap();
    let drift = generated.drift.unwrap();
    assert_eq!(drift.missing_in_proto, vec!["INVALID_TRANSACTION"]);
    assert_eq!(drift.missing_in_declarations, vec!["SUCCESS", "BUSY"]);
}

#[test]
fn test_enum_absent_from_protos() {
    let (_dir, options) = workspace(DECLARATIONS, &[("other.proto", "message Empty {}\n")]);
    let generated = Pipeline::new(options).run().unwrap();
    assert!(generated.drift.is_none());
    assert_eq!(generated.documented, 0);
}

#[test]
fn test_duplicate_code_last_write_wins() {
    let declarations = "enum ResponseCodeEnum {\n    A = 1,\n    B = 2,\n    C = 1\n}\n";
    let (_dir, mut options) = workspace(declarations, &[]);
    options.duplicates = DuplicatePolicy::LastWriteWins;
    options.name_style = NameStyle::Raw;

    let generated = Pipeline::new(options).run().unwrap();
    assert!(generated.code.contains("            case 1:\n                return Status.C;\n            case 2:\n"));
    assert!(!generated.code.contains("return Status.A;"));
    assert_eq!(generated.constants.len(), 3);
}

#[test]
fn test_duplicate_code_rejected_by_default() {
    let declarations = "enum ResponseCodeEnum {\n    A = 1,\n    C = 1\n}\n";
    let (_dir, options) = workspace(declarations, &[]);

    let err = Pipeline::new(options).run().unwrap_err();
    assert_eq!(err.parse_kind(), Some(ErrorKind::DuplicateKey));
    assert_eq!(err.to_string(), "proto.d.ts:3:5: Duplicate key: '1' is defined more than once.");

    let rendered = err.render();
    assert!(rendered.contains("first defined here"));
}

#[test]
fn test_hex_code_duplicates_decimal() {
    let declarations = "enum ResponseCodeEnum {\n    A = 1,\n    B = 0x1\n}\n";
    let (_dir, options) = workspace(declarations, &[]);

    let err = Pipeline::new(options).run().unwrap_err();
    assert_eq!(err.parse_kind(), Some(ErrorKind::DuplicateKey));
    assert_eq!(err.to_string(), "proto.d.ts:3:5: Duplicate key: '1' is defined more than once.");
}

#[test]
fn test_case_labels_are_decimal() {
    let declarations = "enum ResponseCodeEnum {\n    OK = 0,\n    BUSY = 0x10\n}\n";
    let (_dir, options) = workspace(declarations, &[]);

    let generated = Pipeline::new(options).run().unwrap();
    assert!(generated.code.contains("            case 16:\n                return Status.Busy;\n"));
    assert!(!generated.code.contains("0x10"));
    assert!(generated.code.contains("Status.Busy = new Status(16);"));
}

#[test]
fn test_doc_cannot_close_jsdoc_early() {
    let proto = "enum ResponseCodeEnum {\n  OK = 0; // ends */ early\n}\n";
    let declarations = "enum ResponseCodeEnum {\n    OK = 0\n}\n";
    let (_dir, options) = workspace(declarations, &[("codes.proto", proto)]);

    let generated = Pipeline::new(options).run().unwrap();
    assert!(generated.code.ends_with("/**\n * ends *\\/ early\n */\nStatus.Ok = new Status(0);\n"));
    assert!(!generated.code.contains(" * ends */"));
}

#[test]
fn test_request_type_target() {
    let declarations = "enum HederaFunctionality {\n    NONE = 0,\n    CryptoTransfer = 1\n}\n";
    let (_dir, mut options) = workspace(declarations, &[]);
    options.target = Target::RequestType;
    options.license_header = false;

    let generated = Pipeline::new(options).run().unwrap();
    assert_eq!(generated.class_name, "RequestType");
    assert!(generated.code.starts_with("/**\n * @namespace proto\n"));
    assert!(generated.code.contains("export default class RequestType {"));
    assert!(generated.code.contains("RequestType.CryptoTransfer = new RequestType(1);"));
}

#[test]
fn test_mappings_point_at_declaration_lines() {
    let (_dir, options) = workspace(DECLARATIONS, &[]);
    let generated = Pipeline::new(options).run().unwrap();

    let lines: Vec<&str> = generated.code.lines().collect();
    let success = generated
        .mappings
        .iter()
        .find(|m| lines[m.gen_line].contains("case Status.Success:"))
        .unwrap();
    assert_eq!(success.src_line, 5);
}

#[test]
fn test_compile_from_memory() {
    let pipeline = Pipeline::default();
    let declarations = Source::new("proto.d.ts", DECLARATIONS);
    let protos = vec![statusgen::parse_proto(RESPONSE_CODE_PROTO).unwrap()];

    let generated = pipeline.compile(&declarations, &protos).unwrap();
    assert_eq!(generated.output, Path::new("StatusCodes"));
    assert_eq!(generated.constants[0].doc, vec!["The transaction passed the precheck validations."]);
}

#[test]
fn test_discover_protos_sorted_and_filtered() {
    let (dir, _options) = workspace(
        DECLARATIONS,
        &[("b.proto", ""), ("a.proto", ""), ("notes.txt", "")],
    );
    fs::create_dir(dir.path().join("services").join("nested.proto")).unwrap();

    let files = discover_protos(&dir.path().join("services")).unwrap();
    let names: Vec<_> = files
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["a.proto", "b.proto"]);
}

#[test]
fn test_message_docs() {
    let proto = "/** Outer */\nmessage A {\n  /** Inner */\n  message B {}\n  message C {}\n}\n";
    let protos = vec![statusgen::parse_proto(proto).unwrap()];
    let docs = message_docs(&protos);

    let entries: Vec<_> = docs.iter().map(|(k, v)| (k.as_str(), v.clone())).collect();
    assert_eq!(
        entries,
        vec![("A", vec!["Outer".to_string()]), ("A.B", vec!["Inner".to_string()])]
    );
}
