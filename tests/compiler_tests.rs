// tests/compiler_tests.rs

use pql_lang::{
    CompileError, FieldSchema, FieldSets, FieldType, ProjectionCompiler, TranslationContext,
    compile_projection, compile_projection_with_schema, parser::parse,
};
use serde_json::{Value, json};

fn no_fields() -> FieldSets {
    FieldSets::default()
}

fn compile(source: &str) -> Value {
    compile_projection(source, &no_fields()).unwrap()
}

fn compile_with(source: &str, fields: &FieldSets) -> Value {
    compile_projection(source, fields).unwrap()
}

fn compile_err(source: &str) -> CompileError {
    compile_projection(source, &no_fields()).unwrap_err()
}

fn elevated(field: &str, alias: &str, condition: Value) -> Value {
    let root = format!("${}", field);
    json!({
        "$and": [
            { "$isArray": root },
            {
                "$anyElementTrue": {
                    "$map": {
                        "input": { "$cond": { "if": { "$isArray": root }, "then": root, "else": [] } },
                        "as": alias,
                        "in": { "$cond": { "if": condition, "then": true, "else": false } }
                    }
                }
            }
        ]
    })
}

fn all_strings(value: &Value) -> Vec<String> {
    match value {
        Value::String(s) => vec![s.clone()],
        Value::Array(items) => items.iter().flat_map(all_strings).collect(),
        Value::Object(map) => map
            .iter()
            .flat_map(|(k, v)| std::iter::once(k.clone()).chain(all_strings(v)))
            .collect(),
        _ => vec![],
    }
}

// ============================================================================
// Scalar Equality
// ============================================================================

#[test]
fn test_string_equality() {
    assert_eq!(compile("hostname == 'db01'"), json!({ "$eq": ["$hostname", "db01"] }));
}

#[test]
fn test_scalar_literals() {
    assert_eq!(compile("port == 22"), json!({ "$eq": ["$port", 22] }));
    assert_eq!(compile("load == 0.5"), json!({ "$eq": ["$load", 0.5] }));
    assert_eq!(compile("delta == -4"), json!({ "$eq": ["$delta", -4] }));
    assert_eq!(compile("enabled == True"), json!({ "$eq": ["$enabled", true] }));
    assert_eq!(compile("owner == None"), json!({ "$eq": ["$owner", null] }));
}

#[test]
fn test_nested_field_path() {
    assert_eq!(compile("os.type == 'Linux'"), json!({ "$eq": ["$os.type", "Linux"] }));
}

#[test]
fn test_quoted_field_path() {
    assert_eq!(compile("'odd-name' == 1"), json!({ "$eq": ["$odd-name", 1] }));
}

// ============================================================================
// Reference Forms and Elevation
// ============================================================================

#[test]
fn test_array_field_uses_alias() {
    let fields = FieldSets::new(["adapters.ips"], []);
    let fragment = compile_with("adapters.ips == '10.0.0.1'", &fields);

    assert_eq!(fragment, json!({ "$eq": ["$$ips", "10.0.0.1"] }));
    assert!(!all_strings(&fragment).contains(&"$adapters.ips".to_string()));
}

#[test]
fn test_complex_field_alone_is_root_scoped() {
    let fields = FieldSets::new([], ["os"]);
    assert_eq!(
        compile_with("os == 'Linux'", &fields),
        json!({ "$eq": ["$os", "Linux"] })
    );
}

#[test]
fn test_array_of_documents_is_elevated() {
    let fields = FieldSets::new(["adapters"], ["adapters"]);
    assert_eq!(
        compile_with("adapters == 'eth0'", &fields),
        elevated("adapters", "adapters", json!({ "$eq": ["$$adapters", "eth0"] }))
    );
}

#[test]
fn test_nested_array_of_documents_alias_is_last_segment() {
    let fields = FieldSets::new(["specific.adapters"], ["specific.adapters"]);
    assert_eq!(
        compile_with("specific.adapters == 7", &fields),
        elevated(
            "specific.adapters",
            "adapters",
            json!({ "$eq": ["$$adapters", 7] })
        )
    );
}

#[test]
fn test_elevation_is_per_comparison() {
    let fields = FieldSets::new(["adapters"], ["adapters"]);
    assert_eq!(
        compile_with("adapters == 'eth0' and hostname == 'db01'", &fields),
        json!({
            "$and": [
                elevated("adapters", "adapters", json!({ "$eq": ["$$adapters", "eth0"] })),
                { "$eq": ["$hostname", "db01"] }
            ]
        })
    );
}

#[test]
fn test_elevated_dict_match() {
    let fields = FieldSets::new(["adapters"], ["adapters"]);
    assert_eq!(
        compile_with("adapters == {'name': 'eth0'}", &fields),
        elevated(
            "adapters",
            "adapters",
            json!({ "$and": [{ "name": { "$eq": ["$$adapters", "eth0"] } }] })
        )
    );
}

// ============================================================================
// Dict and List Literals
// ============================================================================

#[test]
fn test_dict_reuses_compared_field() {
    assert_eq!(
        compile("os == {'type': 'Linux', 'bits': 64}"),
        json!({
            "$and": [
                { "type": { "$eq": ["$os", "Linux"] } },
                { "bits": { "$eq": ["$os", 64] } }
            ]
        })
    );
}

#[test]
fn test_dict_key_must_be_string() {
    let err = compile_err("os == {1: 'Linux'}");
    assert!(matches!(err, CompileError::UnsupportedConstruct { offset: 7, .. }));
}

#[test]
fn test_dict_value_field_reference_is_unsupported() {
    let err = compile_err("os == {'type': other}");
    assert!(matches!(err, CompileError::UnsupportedConstruct { offset: 15, .. }));
}

#[test]
fn test_list_literal() {
    assert_eq!(
        compile("ports == [22, 80]"),
        json!({ "$eq": ["$ports", [22, 80]] })
    );
}

#[test]
fn test_list_item_must_be_literal() {
    let err = compile_err("ports == [22, other]");
    assert!(matches!(err, CompileError::UnsupportedConstruct { offset: 14, .. }));
}

// ============================================================================
// Boolean Logic
// ============================================================================

#[test]
fn test_and_or() {
    assert_eq!(
        compile("a == 1 and b == 2"),
        json!({ "$and": [{ "$eq": ["$a", 1] }, { "$eq": ["$b", 2] }] })
    );
    assert_eq!(
        compile("a == 1 or b == 2"),
        json!({ "$or": [{ "$eq": ["$a", 1] }, { "$eq": ["$b", 2] }] })
    );
}

#[test]
fn test_nesting_is_preserved() {
    assert_eq!(
        compile("a == 1 and (b == 2 and c == 3)"),
        json!({
            "$and": [
                { "$eq": ["$a", 1] },
                { "$and": [{ "$eq": ["$b", 2] }, { "$eq": ["$c", 3] }] }
            ]
        })
    );
}

#[test]
fn test_not_single_comparison() {
    assert_eq!(
        compile("not hostname == 'db01'"),
        json!({ "$not": { "$eq": ["$hostname", "db01"] } })
    );
}

#[test]
fn test_not_composite_is_unsupported() {
    let err = compile_err("not (a == 1 and b == 2)");
    assert!(matches!(err, CompileError::UnsupportedConstruct { offset: 5, .. }));
}

#[test]
fn test_not_elevated_is_unsupported() {
    let fields = FieldSets::new(["adapters"], ["adapters"]);
    let err = compile_projection("not adapters == 'eth0'", &fields).unwrap_err();
    assert!(matches!(err, CompileError::UnsupportedConstruct { .. }));
}

#[test]
fn test_not_exists() {
    assert_eq!(
        compile("not serial == exists(true)"),
        json!({ "$not": { "serial": { "$exists": true } } })
    );
}

// ============================================================================
// Compare Errors
// ============================================================================

#[test]
fn test_chained_comparison() {
    let err = compile_err("1 == a == 2");
    assert_eq!(
        err,
        CompileError::InvalidComparatorCount {
            count: 2,
            offset: 10
        }
    );
}

#[test]
fn test_unsupported_operator() {
    let err = compile_err("port > 22");
    match err {
        CompileError::UnsupportedConstruct { options, offset, .. } => {
            assert_eq!(offset, 7);
            assert_eq!(options, Some(vec!["==".to_string()]));
        }
        other => panic!("Expected UnsupportedConstruct, got {:?}", other),
    }
}

#[test]
fn test_bare_literal_is_not_a_condition() {
    assert!(matches!(
        compile_err("'just a string'"),
        CompileError::UnsupportedConstruct { offset: 0, .. }
    ));
}

#[test]
fn test_syntax_error_is_wrapped() {
    let err = compile_err("a == ");
    assert!(matches!(err, CompileError::Syntax(_)));
    assert_eq!(err.offset(), 5);
}

// ============================================================================
// Field-to-Field Comparison
// ============================================================================

#[test]
fn test_field_to_field() {
    assert_eq!(compile("a == b.c"), json!({ "$eq": ["$a", "$b.c"] }));
}

#[test]
fn test_field_to_field_is_root_scoped() {
    let fields = FieldSets::new(["tags"], []);
    assert_eq!(
        compile_with("tags == other", &fields),
        json!({ "$eq": ["$tags", "$other"] })
    );
}

#[test]
fn test_field_to_field_is_not_elevated() {
    let fields = FieldSets::new(["adapters"], ["adapters"]);
    let fragment = compile_with("adapters == hostname", &fields);

    assert_eq!(fragment, json!({ "$eq": ["$adapters", "$hostname"] }));
    assert!(!all_strings(&fragment).iter().any(|s| s.starts_with("$$")));
}

// ============================================================================
// Functions
// ============================================================================

#[test]
fn test_exists() {
    assert_eq!(compile("serial == exists(true)"), json!({ "serial": { "$exists": true } }));
    assert_eq!(compile("serial == exists(False)"), json!({ "serial": { "$exists": false } }));
    assert_eq!(compile("serial == exists(value=true)"), json!({ "serial": { "$exists": true } }));
}

#[test]
fn test_exists_requires_bool() {
    assert!(matches!(
        compile_err("serial == exists('yes')"),
        CompileError::UnsupportedConstruct { offset: 17, .. }
    ));
    assert!(matches!(
        compile_err("serial == exists(None)"),
        CompileError::UnsupportedConstruct { .. }
    ));
    assert!(matches!(
        compile_err("serial == exists()"),
        CompileError::UnsupportedConstruct { .. }
    ));
}

#[test]
fn test_regex_match() {
    assert_eq!(
        compile("hostname == regexMatch('^db')"),
        json!({
            "$and": [
                { "$eq": ["string", { "$type": "$hostname" }] },
                { "$regexMatch": { "input": "$hostname", "regex": "^db" } }
            ]
        })
    );
}

#[test]
fn test_regex_match_options() {
    let expected = json!({
        "$and": [
            { "$eq": ["string", { "$type": "$hostname" }] },
            { "$regexMatch": { "input": "$hostname", "regex": "^db", "options": "i" } }
        ]
    });
    assert_eq!(compile("hostname == regexMatch('^db', 'i')"), expected);
    assert_eq!(compile("hostname == regexMatch('^db', options='i')"), expected);
}

#[test]
fn test_regex_match_on_array_field_uses_alias() {
    let fields = FieldSets::new(["names"], []);
    assert_eq!(
        compile_with("names == regexMatch('x')", &fields),
        json!({
            "$and": [
                { "$eq": ["string", { "$type": "$$names" }] },
                { "$regexMatch": { "input": "$$names", "regex": "x" } }
            ]
        })
    );
}

#[test]
fn test_regex_match_forwards_any_options() {
    for flags in ["g", "q", "imsx", ""] {
        let source = format!("hostname == regexMatch('^db', '{}')", flags);
        assert_eq!(
            compile(&source)["$and"][1],
            json!({ "$regexMatch": { "input": "$hostname", "regex": "^db", "options": flags } }),
            "Failed for input: {}",
            source
        );
    }
}

#[test]
fn test_regex_match_bad_arguments() {
    assert!(matches!(
        compile_err("hostname == regexMatch('^db', 1)"),
        CompileError::UnsupportedConstruct { offset: 30, .. }
    ));
    assert!(matches!(
        compile_err("hostname == regexMatch(1)"),
        CompileError::UnsupportedConstruct { .. }
    ));
    assert!(matches!(
        compile_err("hostname == regexMatch('a', 'i', 'x')"),
        CompileError::UnsupportedConstruct { .. }
    ));
    assert!(matches!(
        compile_err("hostname == regexMatch('a', flags='i')"),
        CompileError::UnsupportedConstruct { .. }
    ));
    assert!(matches!(
        compile_err("hostname == regexMatch(other)"),
        CompileError::UnsupportedConstruct { .. }
    ));
}

#[test]
fn test_unknown_function_on_right() {
    match compile_err("hostname == lower('x')") {
        CompileError::UnsupportedConstruct { options, .. } => {
            assert_eq!(
                options,
                Some(vec!["exists".to_string(), "regexMatch".to_string()])
            );
        }
        other => panic!("Expected UnsupportedConstruct, got {:?}", other),
    }
}

#[test]
fn test_search() {
    assert_eq!(
        compile("search('needle')"),
        json!({ "$text": { "$search": "\"needle\"", "$caseSensitive": false } })
    );
}

#[test]
fn test_search_call_shapes() {
    for source in ["search()", "search(1)", "search('a', 'b')", "search(text='a')"] {
        assert!(
            matches!(compile_err(source), CompileError::UnsupportedConstruct { .. }),
            "Failed for input: {}",
            source
        );
    }
}

#[test]
fn test_unknown_top_level_call() {
    match compile_err("lookup('x')") {
        CompileError::UnsupportedConstruct { options, offset, .. } => {
            assert_eq!(offset, 0);
            assert_eq!(options, Some(vec!["search".to_string()]));
        }
        other => panic!("Expected UnsupportedConstruct, got {:?}", other),
    }
}

// ============================================================================
// Schema-Aware Compilation
// ============================================================================

fn schema() -> FieldSchema {
    FieldSchema::new()
        .with_field("hostname", FieldType::String)
        .with_field("port", FieldType::Int)
        .with_field("enabled", FieldType::Bool)
        .with_field("tags", FieldType::List(Box::new(FieldType::String)))
        .with_field("os", FieldType::Dict(Box::new(FieldType::String)))
}

fn compile_schema(source: &str) -> Result<Value, CompileError> {
    compile_projection_with_schema(source, &schema(), &no_fields())
}

#[test]
fn test_schema_known_fields() {
    assert_eq!(
        compile_schema("hostname == 'db01'").unwrap(),
        json!({ "$eq": ["$hostname", "db01"] })
    );
    assert_eq!(compile_schema("port == 22").unwrap(), json!({ "$eq": ["$port", 22] }));
    assert_eq!(
        compile_schema("tags == 'prod'").unwrap(),
        json!({ "$eq": ["$tags", "prod"] })
    );
}

#[test]
fn test_schema_unknown_field_suggests_all_paths() {
    match compile_schema("hostnam == 'db01'").unwrap_err() {
        CompileError::FieldNotFound {
            field,
            offset,
            suggestions,
        } => {
            assert_eq!(field, "hostnam");
            assert_eq!(offset, 0);
            assert_eq!(suggestions, vec!["enabled", "hostname", "os", "port", "tags"]);
        }
        other => panic!("Expected FieldNotFound, got {:?}", other),
    }
}

#[test]
fn test_schema_unknown_right_field() {
    assert!(matches!(
        compile_schema("hostname == missing").unwrap_err(),
        CompileError::FieldNotFound { offset: 12, .. }
    ));
    assert_eq!(
        compile_schema("hostname == os").unwrap(),
        json!({ "$eq": ["$hostname", "$os"] })
    );
}

#[test]
fn test_schema_type_mismatch() {
    match compile_schema("port == 'x'").unwrap_err() {
        CompileError::UnsupportedConstruct { options, offset, .. } => {
            assert_eq!(offset, 8);
            assert_eq!(
                options,
                Some(vec!["integer".to_string(), "float".to_string(), "null".to_string()])
            );
        }
        other => panic!("Expected UnsupportedConstruct, got {:?}", other),
    }
    assert!(compile_schema("enabled == 1").is_err());
    assert!(compile_schema("tags == 1").is_err());
}

#[test]
fn test_schema_int_has_no_regex() {
    assert!(matches!(
        compile_schema("port == regexMatch('1')").unwrap_err(),
        CompileError::UnsupportedConstruct { .. }
    ));
    assert_eq!(
        compile_schema("port == exists(true)").unwrap(),
        json!({ "port": { "$exists": true } })
    );
}

#[test]
fn test_schema_typed_dict_values() {
    assert_eq!(
        compile_schema("os == {'type': 'Linux'}").unwrap(),
        json!({ "$and": [{ "type": { "$eq": ["$os", "Linux"] } }] })
    );
    assert!(compile_schema("os == {'bits': 64}").is_err());
}

#[test]
fn test_schema_from_json() {
    let schema: FieldSchema =
        serde_json::from_str(r#"{"hostname": "string", "ports": "list<int>"}"#).unwrap();
    assert_eq!(
        schema.get("ports"),
        Some(&FieldType::List(Box::new(FieldType::Int)))
    );
    assert!(serde_json::from_str::<FieldSchema>(r#"{"x": "date"}"#).is_err());
}

// ============================================================================
// Determinism and Context
// ============================================================================

#[test]
fn test_keys_keep_template_order() {
    let fields = FieldSets::new(["adapters"], ["adapters"]);
    let fragment = compile_with("adapters == 'eth0'", &fields);
    let keys = |value: &Value| value.as_object().unwrap().keys().cloned().collect::<Vec<_>>();

    let map = &fragment["$and"][1]["$anyElementTrue"]["$map"];
    assert_eq!(keys(map), ["input", "as", "in"]);
    assert_eq!(keys(&map["input"]["$cond"]), ["if", "then", "else"]);

    let regex = compile("hostname == regexMatch('^db', 'i')");
    assert_eq!(keys(&regex["$and"][1]["$regexMatch"]), ["input", "regex", "options"]);
}

#[test]
fn test_translation_is_deterministic() {
    let fields = FieldSets::new(["adapters", "tags"], ["adapters"]);
    let source = "adapters == {'name': 'eth0', 'up': true} or (tags == 'a' and not b == 2)";
    let first = serde_json::to_string(&compile_with(source, &fields)).unwrap();
    let second = serde_json::to_string(&compile_with(source, &fields)).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_compiler_is_shareable() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ProjectionCompiler>();
}

#[test]
fn test_context_does_not_leak_between_siblings() {
    let fields = FieldSets::new(["adapters"], ["adapters"]);
    let compiler = ProjectionCompiler::schema_free();
    let expr = parse("adapters == 'eth0' and hostname == regexMatch('x')").unwrap();
    let fragment = compiler
        .translate(&expr, TranslationContext::new(&fields))
        .unwrap();

    assert_eq!(
        fragment["$and"][1],
        json!({
            "$and": [
                { "$eq": ["string", { "$type": "$hostname" }] },
                { "$regexMatch": { "input": "$hostname", "regex": "x" } }
            ]
        })
    );
}

#[test]
fn test_error_options_accessor() {
    let err = compile_schema("nope == 1").unwrap_err();
    assert_eq!(err.offset(), 0);
    assert_eq!(err.options().map(|o| o.len()), Some(5));
    assert!(err.to_string().contains("Field not found: nope"));
}
