//! Property-based tests over the lexical pipeline.

use proptest::prelude::*;
use sagitta::LexerBuilder;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Kind {
    Aa,
    A,
    B,
    Word,
    Number,
    Space,
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
    let digit = builder.range(b'0', b'9');
    let number = builder.plus(digit);
    builder.token(Kind::Number, number);
    let ws = builder.one_of(b" \t\n");
    let spaces = builder.plus(ws);
    builder.whitespace(Kind::Space, spaces);
    builder.build(Kind::Eof, Kind::Error).unwrap()
}

proptest! {
    /// Tokenization is a pure function of (automaton, input).
    #[test]
    fn tokenize_is_deterministic(input in "[a-z0-9 \n.;]{0,64}") {
        let lexer = language_lexer();
        let first = lexer.tokenize(&input);
        let second = lexer.tokenize(&input);
        prop_assert_eq!(first, second);

        // And independent of which automaton instance runs it.
        let other = language_lexer();
        prop_assert_eq!(lexer.tokenize(&input), other.tokenize(&input));
    }

    /// With trivia kept, every input character lands in exactly one token:
    /// concatenating all lexemes reproduces the input.
    #[test]
    fn tokenize_all_is_lossless(input in "[a-z0-9 \n.;]{0,64}") {
        let lexer = language_lexer();
        let rebuilt: String = lexer
            .tokenize_all(&input)
            .iter()
            .map(|t| t.text.as_str())
            .collect();
        prop_assert_eq!(rebuilt, input);
    }

    /// Maximal munch over {aa, a, b}: a single `a` token is never emitted
    /// where `aa` would also have matched.
    #[test]
    fn no_lexeme_is_a_strict_prefix_of_a_longer_match(input in "[ab]{0,48}") {
        let lexer = munch_lexer();
        let tokens = lexer.tokenize(&input);
        for pair in tokens.windows(2) {
            if pair[0].kind == Kind::A {
                prop_assert_ne!(pair[1].kind, Kind::Aa);
                prop_assert_ne!(pair[1].kind, Kind::A);
            }
        }
    }

    /// Error tokens carry exactly the offending character and never swallow
    /// neighbors.
    #[test]
    fn error_tokens_are_single_characters(input in "[a-z.;]{0,48}") {
        let lexer = language_lexer();
        for token in lexer.tokenize(&input) {
            if token.kind == Kind::Error {
                prop_assert_eq!(token.text.chars().count(), 1);
            }
        }
    }
}
