//! Tokenizer for rule text

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TokenKind {
    LParen,
    RParen,
    Comma,
    And,
    Or,
    /// Anything between delimiters, trimmed; may contain inner spaces
    Word(String),
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::LParen => f.write_str("("),
            TokenKind::RParen => f.write_str(")"),
            TokenKind::Comma => f.write_str(","),
            TokenKind::And => f.write_str("&&"),
            TokenKind::Or => f.write_str("||"),
            TokenKind::Word(w) => f.write_str(w),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Token {
    pub kind: TokenKind,
    /// Byte offset of the first character
    pub offset: usize,
}

/// Split rule text into tokens
///
/// Delimiters are `(`, `)`, `,`, `&&` and `||`. A lone `&` or `|` is part of
/// a word. Lexing never fails; the parser judges what the words mean.
pub(crate) fn tokenize(text: &str) -> Vec<Token> {
    let bytes = text.as_bytes();
    let mut tokens = Vec::new();
    let mut word_start: Option<usize> = None;
    let mut i = 0;

    while i < bytes.len() {
        let (kind, width) = match bytes[i] {
            b'(' => (Some(TokenKind::LParen), 1),
            b')' => (Some(TokenKind::RParen), 1),
            b',' => (Some(TokenKind::Comma), 1),
            b'&' if bytes.get(i + 1) == Some(&b'&') => (Some(TokenKind::And), 2),
            b'|' if bytes.get(i + 1) == Some(&b'|') => (Some(TokenKind::Or), 2),
            _ => (None, 1),
        };

        match kind {
            Some(kind) => {
                if let Some(start) = word_start.take() {
                    push_word(text, start, i, &mut tokens);
                }
                tokens.push(Token { kind, offset: i });
                i += width;
            }
            None => {
                if word_start.is_none() {
                    word_start = Some(i);
                }
                i += 1;
            }
        }
    }

    if let Some(start) = word_start {
        push_word(text, start, bytes.len(), &mut tokens);
    }

    tokens
}

fn push_word(text: &str, start: usize, end: usize, tokens: &mut Vec<Token>) {
    // Delimiters are ASCII, so start/end always sit on char boundaries
    let raw = &text[start..end];
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return;
    }
    let leading = raw.len() - raw.trim_start().len();
    tokens.push(Token {
        kind: TokenKind::Word(trimmed.to_string()),
        offset: start + leading,
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(text: &str) -> Vec<TokenKind> {
        tokenize(text).into_iter().map(|t| t.kind).collect()
    }

    fn word(s: &str) -> TokenKind {
        TokenKind::Word(s.to_string())
    }

    #[test]
    fn test_tokenize_leaf() {
        assert_eq!(
            kinds("at-least-n(2, Requirement, CHILD, Design)"),
            vec![
                word("at-least-n"),
                TokenKind::LParen,
                word("2"),
                TokenKind::Comma,
                word("Requirement"),
                TokenKind::Comma,
                word("CHILD"),
                TokenKind::Comma,
                word("Design"),
                TokenKind::RParen,
            ]
        );
    }

    #[test]
    fn test_words_keep_inner_spaces() {
        let tokens = tokenize("  exactly-one( Design Definition ,CHILD,Test)");
        assert_eq!(tokens[0].kind, word("exactly-one"));
        assert_eq!(tokens[0].offset, 2);
        assert_eq!(tokens[2].kind, word("Design Definition"));
        assert_eq!(tokens[2].offset, 15);
    }

    #[test]
    fn test_combinators() {
        assert_eq!(
            kinds("a() && b() || c()"),
            vec![
                word("a"),
                TokenKind::LParen,
                TokenKind::RParen,
                TokenKind::And,
                word("b"),
                TokenKind::LParen,
                TokenKind::RParen,
                TokenKind::Or,
                word("c"),
                TokenKind::LParen,
                TokenKind::RParen,
            ]
        );
    }

    #[test]
    fn test_single_ampersand_is_part_of_word() {
        assert_eq!(kinds("R&D"), vec![word("R&D")]);
        assert_eq!(kinds("a|b"), vec![word("a|b")]);
    }

    #[test]
    fn test_empty_and_whitespace() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   \t ").is_empty());
    }
}
