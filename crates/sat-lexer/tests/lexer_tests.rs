//! Lexer tests: literals, statement splitting, nested forms, object/block
//! disambiguation, locations and unterminated-literal errors.

use sat_lexer::{lex, Lexer, Special, Token, TokenKind, TokenStream};
use sat_types::{Config, ErrorCode, Location};

// ─────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────

fn statements(source: &str) -> Vec<TokenStream> {
    lex("file", source).unwrap()
}

/// Lex a single statement and return its tokens.
fn single(source: &str) -> Vec<Token> {
    let statements = statements(source);
    assert_eq!(statements.len(), 1, "expected one statement in {source:?}");
    statements[0].tokens().to_vec()
}

fn kinds(stream: &TokenStream) -> Vec<TokenKind> {
    stream.tokens().iter().map(|t| t.kind.clone()).collect()
}

fn at(row: u32, col: u32) -> Location {
    Location::new("file", row, col)
}

fn symbol(name: &str) -> TokenKind {
    TokenKind::Symbol(name.into())
}

fn error_code(source: &str) -> ErrorCode {
    lex("file", source).unwrap_err().code
}

// ─────────────────────────────────────────────────────────────────────
// Literals
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_string_with_escapes_and_newline() {
    let tokens = single(" \"some 123 \\\"string\\\" \n34\"");
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].location, at(1, 2));
    assert_eq!(
        tokens[0].kind,
        TokenKind::String("some 123 \"string\" \n34".into())
    );
}

#[test]
fn test_backslash_escapes_any_character() {
    let tokens = single(r#""a\\b\nc""#);
    assert_eq!(tokens[0].kind, TokenKind::String("a\\bnc".into()));
}

#[test]
fn test_decimal_number() {
    let tokens = single("123.456");
    assert_eq!(tokens[0].location, at(1, 1));
    assert_eq!(tokens[0].kind, TokenKind::Number("123.456".into()));
}

#[test]
fn test_number_separators_removed() {
    let tokens = single(" 1_000_000");
    assert_eq!(tokens[0].location, at(1, 2));
    assert_eq!(tokens[0].kind, TokenKind::Number("1000000".into()));

    let tokens = single("1_234.5_6");
    assert_eq!(tokens[0].kind, TokenKind::Number("1234.56".into()));
}

#[test]
fn test_numeric_path_segment_keeps_dot() {
    let kinds: Vec<_> = single("items.0.id").into_iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![
            symbol("items"),
            TokenKind::Dot,
            TokenKind::Number("0".into()),
            TokenKind::Dot,
            symbol("id"),
        ]
    );
}

#[test]
fn test_symbol_allows_digits_and_underscores() {
    let tokens = single("_user_2");
    assert_eq!(tokens[0].kind, symbol("_user_2"));
}

#[test]
fn test_operators() {
    let tokens = single("a = b == c");
    assert_eq!(tokens[1].kind, TokenKind::Special(Special::Assign));
    assert_eq!(tokens[1].location, at(1, 3));
    assert_eq!(tokens[3].kind, TokenKind::Special(Special::Equality));
    assert_eq!(tokens[3].location, at(1, 7));
    assert_eq!(tokens[4].location, at(1, 10));
}

#[test]
fn test_dots_and_commas() {
    let tokens = single("status, res.body.0");
    let kinds: Vec<_> = tokens.into_iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![
            symbol("status"),
            TokenKind::Comma,
            symbol("res"),
            TokenKind::Dot,
            symbol("body"),
            TokenKind::Dot,
            TokenKind::Number("0".into()),
        ]
    );
}

#[test]
fn test_unknown_characters_skipped() {
    let tokens = single("a ! @ # b");
    assert_eq!(tokens.len(), 2);
    assert_eq!(tokens[1].location, at(1, 9));
}

// ─────────────────────────────────────────────────────────────────────
// Statements
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_leading_newline() {
    let tokens = single("\na");
    assert_eq!(tokens[0].kind, symbol("a"));
    assert_eq!(tokens[0].location, at(2, 1));
}

#[test]
fn test_newlines_and_semicolons_split_statements() {
    let statements = statements("a = 1; b = 2\n\n\nc = 3;");
    assert_eq!(statements.len(), 3);
    assert_eq!(statements[2].at(0).unwrap().location, at(4, 1));
}

#[test]
fn test_empty_input() {
    assert!(statements("").is_empty());
    assert!(statements("\n;\n  ").is_empty());
}

#[test]
fn test_crlf_line_endings() {
    let statements = statements("a = 1\r\nb = 2\r\n");
    assert_eq!(statements.len(), 2);
    assert_eq!(statements[1].at(0).unwrap().location, at(2, 1));
}

// ─────────────────────────────────────────────────────────────────────
// Pipes
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_pipe_runs_to_end_of_line() {
    let statements = statements("assert: a == b\nx = 1");
    assert_eq!(statements.len(), 2);
    let tokens = statements[0].tokens();
    assert_eq!(tokens.len(), 2);
    assert_eq!(tokens[1].location, at(1, 7));
    let TokenKind::Pipe(pipe) = &tokens[1].kind else {
        panic!("expected pipe, got {:?}", tokens[1].kind);
    };
    assert_eq!(pipe.len(), 3);
    assert_eq!(pipe.at(0).unwrap().location, at(1, 9));
}

#[test]
fn test_pipe_stops_at_semicolon() {
    let statements = statements("run: \"make\"; kill: server");
    assert_eq!(statements.len(), 2);
}

#[test]
fn test_pipe_stops_at_enclosing_brace() {
    let tokens = single("test \"name\" { assert: true }");
    let TokenKind::Block(block) = &tokens[2].kind else {
        panic!("expected block, got {:?}", tokens[2].kind);
    };
    assert_eq!(block.len(), 1);
    assert_eq!(kinds(&block[0])[0], symbol("assert"));
}

#[test]
fn test_empty_pipe() {
    let tokens = single("assert:");
    let TokenKind::Pipe(pipe) = &tokens[1].kind else {
        panic!("expected pipe");
    };
    assert!(pipe.is_empty());
    assert_eq!(pipe.location(), at(1, 8));
}

// ─────────────────────────────────────────────────────────────────────
// Blocks and objects
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_object_inside_block() {
    let contents = "test {\nobj = {hello: \"world\", 1: 23.0, \"other\": true == true}\na=b\n}";
    let tokens = single(contents);
    assert_eq!(tokens.len(), 2);
    assert_eq!(tokens[0].kind, symbol("test"));
    assert_eq!(tokens[0].location, at(1, 1));
    assert_eq!(tokens[1].location, at(1, 6));

    let TokenKind::Block(block) = &tokens[1].kind else {
        panic!("expected block, got {:?}", tokens[1].kind);
    };
    assert_eq!(block.len(), 2);
    assert_eq!(block[0].len(), 3);

    let first = block[0].tokens();
    assert_eq!(first[0].kind, symbol("obj"));
    assert_eq!(first[0].location, at(2, 1));
    assert_eq!(first[1].kind, TokenKind::Special(Special::Assign));
    assert_eq!(first[1].location, at(2, 5));
    assert_eq!(first[2].location, at(2, 7));

    let TokenKind::Object(props) = &first[2].kind else {
        panic!("expected object, got {:?}", first[2].kind);
    };
    assert_eq!(props.len(), 3);

    let hello = props["hello"].tokens();
    assert_eq!(hello.len(), 1);
    assert_eq!(hello[0].kind, TokenKind::String("world".into()));
    assert_eq!(hello[0].location, at(2, 15));

    let one = props["1"].tokens();
    assert_eq!(one.len(), 1);
    assert_eq!(one[0].kind, TokenKind::Number("23.0".into()));
    assert_eq!(one[0].location, at(2, 27));

    let other = props["other"].tokens();
    assert_eq!(other.len(), 3);
    assert_eq!(other[0].kind, symbol("true"));
    assert_eq!(other[0].location, at(2, 42));
    assert_eq!(other[1].kind, TokenKind::Special(Special::Equality));
    assert_eq!(other[1].location, at(2, 47));
    assert_eq!(other[2].location, at(2, 50));

    let second = block[1].tokens();
    assert_eq!(second.len(), 3);
    assert_eq!(second[0].location, at(3, 1));
    assert_eq!(second[1].location, at(3, 2));
    assert_eq!(second[2].kind, symbol("b"));
    assert_eq!(second[2].location, at(3, 3));
}

#[test]
fn test_named_test_block() {
    let tokens = single("test \"a\" {\nx=1\n}");
    assert_eq!(tokens[1].kind, TokenKind::String("a".into()));
    assert_eq!(tokens[1].location, at(1, 6));
    assert_eq!(tokens[2].location, at(1, 10));
    assert!(matches!(&tokens[2].kind, TokenKind::Block(b) if b.len() == 1));
}

#[test]
fn test_block_statements_with_pipe() {
    let tokens = single("test \"simple test\" {\n    assert : true\n    bool = true\n}");
    let TokenKind::Block(block) = &tokens[2].kind else {
        panic!("expected block");
    };
    assert_eq!(block.len(), 2);
    let first = block[0].tokens();
    assert_eq!(first.len(), 2);
    assert_eq!(first[0].kind, symbol("assert"));
    let TokenKind::Pipe(pipe) = &first[1].kind else {
        panic!("expected pipe");
    };
    assert_eq!(kinds(pipe), vec![symbol("true")]);
}

#[test]
fn test_brace_at_statement_start_is_block() {
    let tokens = single("{ a = 1 }");
    assert!(matches!(&tokens[0].kind, TokenKind::Block(b) if b.len() == 1));
}

#[test]
fn test_brace_after_pipe_is_object() {
    let tokens = single("assert: {a: 1} == obj");
    let TokenKind::Pipe(pipe) = &tokens[1].kind else {
        panic!("expected pipe");
    };
    assert!(matches!(pipe.at(0).unwrap().kind, TokenKind::Object(_)));
    assert_eq!(pipe.len(), 3);
}

#[test]
fn test_nested_object_values() {
    let tokens = single("o = {inner: {deep: [1, {x: 2}]}}");
    let TokenKind::Object(props) = &tokens[2].kind else {
        panic!("expected object");
    };
    let TokenKind::Object(inner) = &props["inner"].tokens()[0].kind else {
        panic!("expected nested object");
    };
    let TokenKind::Array(items) = &inner["deep"].tokens()[0].kind else {
        panic!("expected array");
    };
    assert_eq!(items.len(), 2);
    assert!(matches!(items[1].tokens()[0].kind, TokenKind::Object(_)));
}

#[test]
fn test_empty_object_and_trailing_comma() {
    let tokens = single("o = {}");
    assert!(matches!(&tokens[2].kind, TokenKind::Object(p) if p.is_empty()));

    let tokens = single("o = {a: 1, b: 2,}");
    assert!(matches!(&tokens[2].kind, TokenKind::Object(p) if p.len() == 2));
}

#[test]
fn test_duplicate_object_key_last_wins() {
    let tokens = single("o = {a: 1, a: 2}");
    let TokenKind::Object(props) = &tokens[2].kind else {
        panic!("expected object");
    };
    assert_eq!(props.len(), 1);
    assert_eq!(props["a"].tokens()[0].kind, TokenKind::Number("2".into()));
}

#[test]
fn test_multiline_object_inserts_eol() {
    let tokens = single("o = {\n  a: 1\n}");
    let TokenKind::Object(props) = &tokens[2].kind else {
        panic!("expected object");
    };
    assert_eq!(
        kinds(&props["a"]),
        vec![TokenKind::Number("1".into()), TokenKind::Eol]
    );
    assert_eq!(props["a"].at(1).unwrap().location, at(3, 1));
}

// ─────────────────────────────────────────────────────────────────────
// Arrays
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_array_items() {
    let tokens = single("array = [\"haha\", 45.6, false, true == true]");
    assert_eq!(tokens.len(), 3);
    assert_eq!(tokens[0].location, at(1, 1));
    assert_eq!(tokens[1].location, at(1, 7));
    assert_eq!(tokens[2].location, at(1, 9));

    let TokenKind::Array(items) = &tokens[2].kind else {
        panic!("expected array, got {:?}", tokens[2].kind);
    };
    assert_eq!(items.len(), 4);
    assert_eq!(items[0].at(0).unwrap().location, at(1, 10));
    assert_eq!(items[1].at(0).unwrap().kind, TokenKind::Number("45.6".into()));
    assert_eq!(items[1].at(0).unwrap().location, at(1, 18));
    assert_eq!(items[2].at(0).unwrap().kind, symbol("false"));
    assert_eq!(items[2].at(0).unwrap().location, at(1, 24));

    let last = items[3].tokens();
    assert_eq!(last.len(), 3);
    assert_eq!(last[0].location, at(1, 31));
    assert_eq!(last[1].location, at(1, 36));
    assert_eq!(last[2].location, at(1, 39));
}

#[test]
fn test_empty_array() {
    let tokens = single("a = []");
    assert!(matches!(&tokens[2].kind, TokenKind::Array(items) if items.is_empty()));
}

#[test]
fn test_array_trailing_comma() {
    let tokens = single("a = [1,\n2,\n]");
    assert!(matches!(&tokens[2].kind, TokenKind::Array(items) if items.len() == 2));
}

// ─────────────────────────────────────────────────────────────────────
// Errors
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_unterminated_string() {
    let err = lex("file", "a = \"open").unwrap_err();
    assert_eq!(err.code, ErrorCode::UNTERMINATED_STRING);
    assert_eq!(err.location, at(1, 5));
}

#[test]
fn test_unterminated_escape() {
    assert_eq!(error_code("a = \"open\\"), ErrorCode::UNTERMINATED_STRING);
}

#[test]
fn test_unterminated_object() {
    let err = lex("file", "o = {a: 1").unwrap_err();
    assert_eq!(err.code, ErrorCode::UNTERMINATED_OBJECT);
    assert_eq!(err.location, at(1, 5));
}

#[test]
fn test_unterminated_array() {
    assert_eq!(error_code("a = [1, 2"), ErrorCode::UNTERMINATED_ARRAY);
}

#[test]
fn test_unterminated_block() {
    let err = lex("file", "test \"x\" {\n  a = 1\n").unwrap_err();
    assert_eq!(err.code, ErrorCode::UNTERMINATED_BLOCK);
    assert_eq!(err.location, at(1, 10));
}

#[test]
fn test_stray_top_level_brace_ends_input() {
    let statements = statements("a = 1\n}\nb = 2");
    assert_eq!(statements.len(), 1);
}

// ─────────────────────────────────────────────────────────────────────
// Configuration
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_traced_lexer_matches_untraced() {
    let source = "test \"t\" {\n  s, b = get: \"http://x\"\n  assert: s == 200\n}";
    let config = Config::traced();
    let traced = Lexer::new("file", source, &config).lex().unwrap();
    assert_eq!(traced, statements(source));
}

#[test]
fn test_determinism_100_iterations() {
    let source = "obj = {a: [1, 2, {b: \"c\"}]}\nassert: obj.a.0 == 1";
    let first = statements(source);
    for _ in 0..100 {
        assert_eq!(statements(source), first);
    }
}
