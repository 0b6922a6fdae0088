//! End-to-end lexer behavior through the public API.

use sagitta::{LexerBuilder, Position};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Kind {
    Aa,
    A,
    B,
    Word,
    Int,
    Number,
    Space,
    Open,
    Close,
    Error,
    Eof,
}

fn munch_lexer() -> sagitta::Lexer<Kind> {
    let mut builder = LexerBuilder::new();
    let a1 = builder.byte(b'a');
    let a2 = builder.byte(b'a');
    let aa = builder.concat(a1, a2);
    builder.token(Kind::Aa, aa);
    let a = builder.byte(b'a');
    builder.token(Kind::A, a);
    let b = builder.byte(b'b');
    builder.token(Kind::B, b);
    builder.build(Kind::Eof, Kind::Error).unwrap()
}

fn language_lexer() -> sagitta::Lexer<Kind> {
    let mut builder = LexerBuilder::new();
    let lower = builder.range(b'a', b'z');
    let word = builder.plus(lower);
    builder.token(Kind::Word, word);
    builder.keyword(Kind::Int, "int");
    let digit = builder.range(b'0', b'9');
    let number = builder.plus(digit);
    builder.token(Kind::Number, number);
    let ws = builder.one_of(b" \t\n");
    let spaces = builder.plus(ws);
    builder.whitespace(Kind::Space, spaces);
    let open = builder.literal("(*");
    builder.token(Kind::Open, open);
    let close = builder.literal("*)");
    builder.token(Kind::Close, close);
    builder.comment_pair(Kind::Open, Kind::Close);
    builder.build(Kind::Eof, Kind::Error).unwrap()
}

#[test]
fn maximal_munch_fixture() {
    let lexer = munch_lexer();
    let texts: Vec<String> = lexer
        .tokenize("aababaabaa")
        .iter()
        .map(|t| t.text.to_string())
        .collect();
    assert_eq!(texts, ["aa", "b", "a", "b", "aa", "b", "aa", ""]);
}

#[test]
fn no_emitted_lexeme_is_a_strict_prefix_of_a_longer_match() {
    // With {aa, a, b}, a single `a` may only be emitted when not followed
    // by another `a`.
    let lexer = munch_lexer();
    let tokens = lexer.tokenize("aaabaaa");
    for pair in tokens.windows(2) {
        if pair[0].kind == Kind::A {
            assert_ne!(pair[1].kind, Kind::Aa);
            assert_ne!(pair[1].kind, Kind::A);
        }
    }
}

#[test]
fn keyword_priority_fixture() {
    let lexer = language_lexer();
    let tokens = lexer.tokenize("int ints");
    assert_eq!(tokens[0].kind, Kind::Int);
    assert_eq!(tokens[0].text, "int");
    assert_eq!(tokens[1].kind, Kind::Word);
    assert_eq!(tokens[1].text, "ints");
    assert_eq!(tokens[2].kind, Kind::Eof);
}

#[test]
fn positions_are_one_based_and_newline_aware() {
    let lexer = language_lexer();
    let tokens = lexer.tokenize("ab\ncd");
    assert_eq!(tokens[0].pos, Position::new(1, 1));
    assert_eq!(tokens[1].pos, Position::new(2, 1));
}

#[test]
fn comment_regions_nest_and_suppress_significant_tokens() {
    let lexer = language_lexer();
    let tokens = lexer.tokenize("x (* int (* 42 *) y *) z");
    let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
    assert_eq!(texts, ["x", "z", ""]);
}

#[test]
fn lexical_mismatch_produces_an_error_token_and_continues() {
    let lexer = language_lexer();
    let tokens = lexer.tokenize("ab ; cd");
    assert_eq!(tokens[1].kind, Kind::Error);
    assert_eq!(tokens[1].text, ";");
    assert_eq!(tokens[2].kind, Kind::Word);
    assert_eq!(tokens[2].text, "cd");
}

#[test]
fn whitespace_class_is_kept_on_request() {
    let lexer = language_lexer();
    let with_trivia = lexer.tokenize_all("a b");
    assert!(with_trivia.iter().any(|t| t.kind == Kind::Space));
    let without = lexer.tokenize("a b");
    assert!(without.iter().all(|t| t.kind != Kind::Space));
}

#[test]
fn tokens_iterator_is_lazy_and_fused() {
    let lexer = language_lexer();
    let mut stream = lexer.tokens("ab cd");
    assert_eq!(stream.next().map(|t| t.kind), Some(Kind::Word));
    assert_eq!(stream.next().map(|t| t.kind), Some(Kind::Word));
    assert_eq!(stream.next().map(|t| t.kind), Some(Kind::Eof));
    assert_eq!(stream.next(), None);
    assert_eq!(stream.next(), None);
}

#[test]
fn same_lexer_reused_across_inputs() {
    let lexer = language_lexer();
    let first = lexer.tokenize("int a");
    let second = lexer.tokenize("int a");
    assert_eq!(first, second);

    // Build-from-scratch equivalence: reconstructing the automaton yields
    // the same state count.
    assert_eq!(lexer.state_count(), language_lexer().state_count());
}

#[test]
fn builder_rejects_degenerate_vocabularies() {
    let empty: LexerBuilder<Kind> = LexerBuilder::new();
    assert!(empty.build(Kind::Eof, Kind::Error).is_err());

    let mut nullable = LexerBuilder::new();
    let a = nullable.byte(b'a');
    let star = nullable.star(a);
    nullable.token(Kind::Word, star);
    assert!(nullable.build(Kind::Eof, Kind::Error).is_err());
}
