//! Hand-written lexer for `.rengbis` source text.

mod cursor;

use cursor::Cursor;

use crate::SyntaxError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenKind {
    /// Identifier or keyword.
    Name,
    Int,
    Float,
    /// Double-quoted string, unescaped.
    Str,
    /// Single-quoted symbol, e.g. `'base64'`.
    Sym,
    /// `##` comment; the data carries the trimmed text.
    DocComment,
    Eq,        // =
    FatArrow,  // =>
    DefaultEq, // ?=
    EqEq,      // ==
    Lt,        // <
    Lte,       // <=
    Gt,        // >
    Gte,       // >=
    Pipe,      // |
    Comma,     // ,
    Colon,     // :
    Question,  // ?
    Star,      // *
    Plus,      // +
    Dot,       // .
    Spread,    // ...
    At,        // @
    LParen,    // (
    RParen,    // )
    LBracket,  // [
    RBracket,  // ]
    LCurly,    // {
    RCurly,    // }
    Eof,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    pub(crate) kind: TokenKind,
    pub(crate) data: String,
    pub(crate) index: usize,
    pub(crate) line: usize,
}

impl Token {
    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    /// The token text: identifier, unescaped string content, number
    /// literal, or raw lexeme for punctuation.
    pub fn data(&self) -> &str {
        &self.data
    }

    /// Byte offset where the token begins.
    pub fn index(&self) -> usize {
        self.index
    }

    /// 1-based line where the token begins.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Human-readable form for error messages.
    pub(crate) fn describe(&self) -> String {
        match self.kind {
            TokenKind::Eof => "end of file".to_string(),
            TokenKind::Str => format!("\"{}\"", self.data),
            TokenKind::Sym => format!("'{}'", self.data),
            TokenKind::DocComment => "a doc comment".to_string(),
            _ => format!("`{}`", self.data),
        }
    }
}

/// Lex the whole input. The returned stream always ends with an `Eof`
/// token.
pub(crate) fn tokenize(input: &str) -> Result<Vec<Token>, SyntaxError> {
    let mut cursor = Cursor::new(input);
    let mut tokens = Vec::new();
    loop {
        cursor.skip_trivia();
        let index = cursor.offset();
        let line = cursor.line();
        let Some(first) = cursor.bump() else {
            tokens.push(Token {
                kind: TokenKind::Eof,
                data: String::new(),
                index,
                line,
            });
            return Ok(tokens);
        };

        let (kind, data) = match first {
            '#' => {
                // `skip_trivia` leaves only `##` comments behind.
                cursor.bump();
                let text = cursor.take_line();
                (TokenKind::DocComment, text.trim().to_string())
            }
            '"' => string_value(&mut cursor, index, line)?,
            '\'' => symbol_value(&mut cursor, index, line)?,
            '=' => {
                if cursor.eatc('>') {
                    (TokenKind::FatArrow, "=>".to_string())
                } else if cursor.eatc('=') {
                    (TokenKind::EqEq, "==".to_string())
                } else {
                    (TokenKind::Eq, "=".to_string())
                }
            }
            '?' => {
                if cursor.eatc('=') {
                    (TokenKind::DefaultEq, "?=".to_string())
                } else {
                    (TokenKind::Question, "?".to_string())
                }
            }
            '<' => {
                if cursor.eatc('=') {
                    (TokenKind::Lte, "<=".to_string())
                } else {
                    (TokenKind::Lt, "<".to_string())
                }
            }
            '>' => {
                if cursor.eatc('=') {
                    (TokenKind::Gte, ">=".to_string())
                } else {
                    (TokenKind::Gt, ">".to_string())
                }
            }
            '.' => {
                if cursor.eatc('.') {
                    if cursor.eatc('.') {
                        (TokenKind::Spread, "...".to_string())
                    } else {
                        return Err(SyntaxError::Parse {
                            index,
                            line,
                            expected: "`...`".to_string(),
                            found: "`..`".to_string(),
                        });
                    }
                } else {
                    (TokenKind::Dot, ".".to_string())
                }
            }
            '|' => (TokenKind::Pipe, "|".to_string()),
            ',' => (TokenKind::Comma, ",".to_string()),
            ':' => (TokenKind::Colon, ":".to_string()),
            '*' => (TokenKind::Star, "*".to_string()),
            '+' => (TokenKind::Plus, "+".to_string()),
            '@' => (TokenKind::At, "@".to_string()),
            '(' => (TokenKind::LParen, "(".to_string()),
            ')' => (TokenKind::RParen, ")".to_string()),
            '[' => (TokenKind::LBracket, "[".to_string()),
            ']' => (TokenKind::RBracket, "]".to_string()),
            '{' => (TokenKind::LCurly, "{".to_string()),
            '}' => (TokenKind::RCurly, "}".to_string()),
            c if is_name_start(c) => name(&mut cursor, c),
            c if c == '-' || c.is_ascii_digit() => number(&mut cursor, c, index, line)?,
            c => {
                return Err(SyntaxError::Parse {
                    index,
                    line,
                    expected: "a token".to_string(),
                    found: format!("`{c}`"),
                })
            }
        };
        tokens.push(Token {
            kind,
            data,
            index,
            line,
        });
    }
}

fn string_value(
    cursor: &mut Cursor,
    index: usize,
    line: usize,
) -> Result<(TokenKind, String), SyntaxError> {
    let mut text = String::new();
    loop {
        match cursor.bump() {
            Some('"') => return Ok((TokenKind::Str, text)),
            Some('\\') => match cursor.bump() {
                Some('"') => text.push('"'),
                Some('\\') => text.push('\\'),
                Some('n') => text.push('\n'),
                Some('t') => text.push('\t'),
                Some('r') => text.push('\r'),
                other => {
                    return Err(SyntaxError::Parse {
                        index,
                        line,
                        expected: "an escape sequence".to_string(),
                        found: match other {
                            Some(c) => format!("`\\{c}`"),
                            None => "end of file".to_string(),
                        },
                    })
                }
            },
            Some('\n') | None => {
                return Err(SyntaxError::Parse {
                    index,
                    line,
                    expected: "closing `\"`".to_string(),
                    found: "end of line".to_string(),
                })
            }
            Some(c) => text.push(c),
        }
    }
}

fn symbol_value(
    cursor: &mut Cursor,
    index: usize,
    line: usize,
) -> Result<(TokenKind, String), SyntaxError> {
    let mut text = String::new();
    loop {
        match cursor.bump() {
            Some('\'') => return Ok((TokenKind::Sym, text)),
            Some('\n') | None => {
                return Err(SyntaxError::Parse {
                    index,
                    line,
                    expected: "closing `'`".to_string(),
                    found: "end of line".to_string(),
                })
            }
            Some(c) => text.push(c),
        }
    }
}

fn name(cursor: &mut Cursor, first: char) -> (TokenKind, String) {
    let mut text = String::new();
    text.push(first);
    while let Some(c) = cursor.first() {
        if is_name_continue(c) {
            text.push(c);
            cursor.bump();
        } else {
            break;
        }
    }
    (TokenKind::Name, text)
}

fn number(
    cursor: &mut Cursor,
    first: char,
    index: usize,
    line: usize,
) -> Result<(TokenKind, String), SyntaxError> {
    let mut text = String::new();
    text.push(first);

    if first == '-' && !cursor.first().is_some_and(|c| c.is_ascii_digit()) {
        return Err(SyntaxError::Parse {
            index,
            line,
            expected: "a digit after `-`".to_string(),
            found: match cursor.first() {
                Some(c) => format!("`{c}`"),
                None => "end of file".to_string(),
            },
        });
    }

    while let Some(c) = cursor.first() {
        if c.is_ascii_digit() {
            text.push(c);
            cursor.bump();
        } else {
            break;
        }
    }

    // A fractional part needs a digit right after the dot, otherwise the
    // dot belongs to the following token.
    let mut kind = TokenKind::Int;
    if cursor.first() == Some('.') && cursor.second().is_some_and(|c| c.is_ascii_digit()) {
        kind = TokenKind::Float;
        text.push('.');
        cursor.bump();
        while let Some(c) = cursor.first() {
            if c.is_ascii_digit() {
                text.push(c);
                cursor.bump();
            } else {
                break;
            }
        }
    }
    Ok((kind, text))
}

fn is_name_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_name_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}
