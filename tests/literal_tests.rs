use latex2pydata::{
    parse_literal, pydata, Error, ErrorKind, LiteralParser, PySet, Value, DEFAULT_MAX_DEPTH,
};

#[test]
fn test_record_payload() {
    let text = r#"
# latex2pydata metadata: {"schema": {"title": "str"}}
{
"title": "'Literal \\'quotes\\''",
"authors": "['A. Author', \"B. O'Author\"]",
"empty": "",
}
"#;
    let value = parse_literal(text).unwrap();
    let dict = value.as_dict().unwrap();
    assert_eq!(dict.len(), 3);
    assert_eq!(
        dict.get_str("title").and_then(Value::as_str),
        Some(r"'Literal \'quotes\''")
    );
    assert_eq!(
        dict.get_str("authors").and_then(Value::as_str),
        Some(r#"['A. Author', "B. O'Author"]"#)
    );
    assert_eq!(dict.get_str("empty").and_then(Value::as_str), Some(""));
}

#[test]
fn test_nested_mixed_containers() {
    let value = parse_literal("{'a': [1, (2, {3, 4}), {'b': None}], 'c': (), 'd': set()}").unwrap();
    assert_eq!(
        value,
        pydata!({"a": [1, (2, {3, 4}), {"b": None}], "c": (), "d": (Value::Set(PySet::new()))})
    );
}

#[test]
fn test_unhashable_looking_keys_are_allowed() {
    let value = parse_literal("{[1, 2]: 'list key', {'k': 1}: 'dict key'}").unwrap();
    let dict = value.as_dict().unwrap();
    assert_eq!(
        dict.get(&pydata!([1, 2])),
        Some(&Value::from("list key"))
    );
    assert_eq!(dict.get(&pydata!({"k": 1})), Some(&Value::from("dict key")));
}

#[test]
fn test_numbers_keep_their_type() {
    let value = parse_literal("[1, 1.0, True, -0.0, 0x10, 1e2]").unwrap();
    let items = value.as_slice().unwrap();
    let types: Vec<_> = items.iter().map(Value::type_name).collect();
    assert_eq!(types, vec!["int", "float", "bool", "float", "int", "float"]);

    // int and float never compare equal, and neither does bool and int
    assert_ne!(items[0], items[1]);
    assert_ne!(items[0], items[2]);
    assert_eq!(parse_literal("{1, 1.0, True}").unwrap().as_set().unwrap().len(), 3);
}

#[test]
fn test_default_depth_limit() {
    let ok = format!("{}{}", "[".repeat(DEFAULT_MAX_DEPTH), "]".repeat(DEFAULT_MAX_DEPTH));
    assert!(parse_literal(&ok).is_ok());

    let too_deep = format!(
        "{}{}",
        "[".repeat(DEFAULT_MAX_DEPTH + 1),
        "]".repeat(DEFAULT_MAX_DEPTH + 1)
    );
    let err = parse_literal(&too_deep).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::LiteralSyntax);
}

#[test]
fn test_custom_depth_limit() {
    assert!(LiteralParser::new("{'a': [1]}").with_max_depth(2).parse().is_ok());
    assert!(LiteralParser::new("{'a': [1]}").with_max_depth(1).parse().is_err());
    assert!(LiteralParser::new("1").with_max_depth(0).parse().is_ok());
}

#[test]
fn test_rendering_reparses() {
    for text in [
        "None",
        "[True, False]",
        "(1,)",
        "{'it\\'s': \"x\"}",
        "b'\\x00\\xff\"'",
        "{1: {2.5, -3}, 'k': [(), set()]}",
        "123456789012345678901234567890123",
        "'tab\\there\\nnewline \\\\ backslash'",
        "1e999",
    ] {
        let value = parse_literal(text).unwrap();
        let rendered = value.to_string();
        assert_eq!(parse_literal(&rendered).unwrap(), value, "{} -> {}", text, rendered);
    }
}

#[test]
fn test_syntax_error_details() {
    let err = parse_literal("[1,\n 2,\n 3 4]").unwrap_err();
    match err {
        Error::Syntax { line, context, .. } => {
            assert_eq!(line, 3);
            assert_eq!(context, " 3 4]");
        }
        other => panic!("Expected syntax error, got {:?}", other),
    }
}

#[test]
fn test_never_evaluates() {
    for code in [
        "__import__('os').system('true')",
        "open('/etc/passwd').read()",
        "(lambda: 1)()",
        "[x for x in range(3)]",
        "1 if True else 2",
        "{**{}}",
        "[*range(2)]",
        "2 ** 10",
        "not True",
        "'a' * 3",
    ] {
        let err = parse_literal(code).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::LiteralSyntax, "{}", code);
    }
}
