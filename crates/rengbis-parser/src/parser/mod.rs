mod grammar;

use rengbis_schema::Schema;

use crate::lexer::{self, Token, TokenKind};
use crate::limit::LimitTracker;
use crate::SyntaxError;

/// A parsed source file: named definitions, imports, and an optional
/// root schema. References are still symbolic; resolution is the
/// loader's job.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Document {
    pub definitions: Vec<Definition>,
    pub root: Option<Schema>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Definition {
    /// `name = body`
    Named { name: String, schema: Schema },
    /// `namespace => import "path"`
    Import { namespace: String, path: String },
}

/// Parse a whole source file.
pub fn parse_document(input: &str) -> Result<Document, SyntaxError> {
    Parser::new(input)?.parse()
}

/// Recursive-descent parser over the token stream.
pub struct Parser {
    tokens: Vec<Token>,
    index: usize,
    pub(crate) recursion: LimitTracker,
}

impl Parser {
    pub fn new(input: &str) -> Result<Self, SyntaxError> {
        let text = normalize(input);
        let tokens = lexer::tokenize(&text)?;
        Ok(Self {
            tokens,
            index: 0,
            recursion: LimitTracker::default(),
        })
    }

    /// Replace the default recursion limit.
    pub fn recursion_limit(mut self, limit: usize) -> Self {
        self.recursion = LimitTracker::new(limit);
        self
    }

    pub fn parse(mut self) -> Result<Document, SyntaxError> {
        grammar::document::document(&mut self)
    }

    pub(crate) fn peek(&self) -> &Token {
        &self.tokens[self.index]
    }

    pub(crate) fn peek_kind(&self) -> TokenKind {
        self.peek().kind
    }

    pub(crate) fn at(&self, kind: TokenKind) -> bool {
        self.peek_kind() == kind
    }

    /// Consume and return the current token. `Eof` is never consumed.
    pub(crate) fn bump(&mut self) -> Token {
        let token = self.tokens[self.index].clone();
        if token.kind != TokenKind::Eof {
            self.index += 1;
        }
        token
    }

    pub(crate) fn eat(&mut self, kind: TokenKind) -> Option<Token> {
        if self.at(kind) {
            Some(self.bump())
        } else {
            None
        }
    }

    pub(crate) fn expect(&mut self, kind: TokenKind, expected: &str) -> Result<Token, SyntaxError> {
        if self.at(kind) {
            Ok(self.bump())
        } else {
            Err(self.error(expected))
        }
    }

    pub(crate) fn error(&self, expected: impl Into<String>) -> SyntaxError {
        let token = self.peek();
        SyntaxError::Parse {
            index: token.index,
            line: token.line,
            expected: expected.into(),
            found: token.describe(),
        }
    }

    /// Line of the most recently consumed token; 0 before the first
    /// token. Tokens never span lines, so this is also its end line.
    pub(crate) fn prev_line(&self) -> usize {
        if self.index == 0 {
            0
        } else {
            self.tokens[self.index - 1].line
        }
    }

    pub(crate) fn enter(&mut self) -> Result<(), SyntaxError> {
        self.recursion.consume();
        if self.recursion.limited() {
            return Err(SyntaxError::RecursionLimit {
                limit: self.recursion.limit,
            });
        }
        Ok(())
    }

    pub(crate) fn exit(&mut self) {
        self.recursion.release();
    }
}

/// Discard a leading BOM and normalize line endings to `\n`.
fn normalize(input: &str) -> String {
    let input = input.strip_prefix('\u{feff}').unwrap_or(input);
    input.replace("\r\n", "\n").replace('\r', "\n")
}

impl Document {
    /// The canonical source text: definitions first, blank-line
    /// separated, the root last. Annotations print as `##` lines
    /// followed by `@deprecated`.
    pub fn to_source(&self) -> String {
        let mut out = String::new();
        let mut first = true;
        for definition in &self.definitions {
            if !first {
                out.push('\n');
            }
            first = false;
            match definition {
                Definition::Import { namespace, path } => {
                    out.push_str(namespace);
                    out.push_str(" => import ");
                    push_quoted(&mut out, path);
                    out.push('\n');
                }
                Definition::Named { name, schema } => {
                    let (doc, deprecated, base) = schema.split_annotations();
                    push_annotations(&mut out, doc, deprecated);
                    out.push_str(name);
                    out.push_str(" = ");
                    out.push_str(&base.to_source());
                    out.push('\n');
                }
            }
        }
        if let Some(root) = &self.root {
            if !first {
                out.push('\n');
            }
            let (doc, deprecated, base) = root.split_annotations();
            push_annotations(&mut out, doc, false);
            out.push_str("= ");
            // The grammar has no leading `@deprecated` line for the
            // root, so deprecation prints inline.
            if deprecated {
                out.push_str(&Schema::deprecated(base.clone()).to_source());
            } else {
                out.push_str(&base.to_source());
            }
            out.push('\n');
        }
        out
    }
}

fn push_annotations(out: &mut String, doc: Option<&str>, deprecated: bool) {
    if let Some(doc) = doc {
        for line in doc.split('\n') {
            if line.is_empty() {
                out.push_str("##\n");
            } else {
                out.push_str("## ");
                out.push_str(line);
                out.push('\n');
            }
        }
    }
    if deprecated {
        out.push_str("@deprecated\n");
    }
}

fn push_quoted(out: &mut String, text: &str) {
    out.push('"');
    for character in text.chars() {
        match character {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            other => out.push(other),
        }
    }
    out.push('"');
}
