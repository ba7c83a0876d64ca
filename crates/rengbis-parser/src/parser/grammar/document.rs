use rengbis_schema::Schema;

use crate::parser::grammar::body;
use crate::parser::{Definition, Document, Parser};
use crate::{SyntaxError, TokenKind};

/// *file*:
///     (definition | import)* root?
///
/// Leading `##` lines and `@deprecated` attach to the next definition;
/// blank lines and `#` comments are trivia.
pub(crate) fn document(p: &mut Parser) -> Result<Document, SyntaxError> {
    let mut definitions = Vec::new();
    let mut root = None;
    loop {
        let (docs, deprecated) = leading_annotations(p)?;
        match p.peek_kind() {
            TokenKind::Eof => {
                if !docs.is_empty() || deprecated {
                    return Err(p.error("a definition after the annotations"));
                }
                break;
            }
            TokenKind::Name => {
                if root.is_some() {
                    return Err(p.error("end of file after the root schema"));
                }
                let name = p.bump();
                if p.at(TokenKind::FatArrow) {
                    if !docs.is_empty() || deprecated {
                        return Err(p.error("`=` after an annotated definition name"));
                    }
                    p.bump();
                    let keyword = p.expect(TokenKind::Name, "`import`")?;
                    if keyword.data != "import" {
                        return Err(SyntaxError::Parse {
                            index: keyword.index,
                            line: keyword.line,
                            expected: "`import`".to_string(),
                            found: keyword.describe(),
                        });
                    }
                    let path = import_path(p)?;
                    definitions.push(Definition::Import {
                        namespace: name.data,
                        path,
                    });
                } else {
                    p.expect(TokenKind::Eq, "`=` or `=>`")?;
                    let schema = body::body(p)?;
                    definitions.push(Definition::Named {
                        name: name.data,
                        schema: apply_annotations(schema, docs, deprecated),
                    });
                }
            }
            TokenKind::Eq => {
                if root.is_some() {
                    return Err(p.error("end of file after the root schema"));
                }
                p.bump();
                let schema = body::body(p)?;
                root = Some(apply_annotations(schema, docs, deprecated));
            }
            _ => return Err(p.error("a definition name, an import, or `=`")),
        }
    }
    Ok(Document { definitions, root })
}

/// An import path: a quoted string, or a bare dotted name such as
/// `common.rengbis`.
fn import_path(p: &mut Parser) -> Result<String, SyntaxError> {
    if let Some(token) = p.eat(TokenKind::Str) {
        return Ok(token.data);
    }
    let mut path = p.expect(TokenKind::Name, "an import path")?.data;
    while p.eat(TokenKind::Dot).is_some() {
        path.push('.');
        path.push_str(&p.expect(TokenKind::Name, "an import path segment")?.data);
    }
    Ok(path)
}

/// Consume `##` lines and `@deprecated` markers, in either order.
pub(crate) fn leading_annotations(p: &mut Parser) -> Result<(Vec<String>, bool), SyntaxError> {
    let mut docs = Vec::new();
    let mut deprecated = false;
    loop {
        match p.peek_kind() {
            TokenKind::DocComment => docs.push(p.bump().data),
            TokenKind::At => {
                p.bump();
                let keyword = p.expect(TokenKind::Name, "`deprecated`")?;
                if keyword.data != "deprecated" {
                    return Err(SyntaxError::Parse {
                        index: keyword.index,
                        line: keyword.line,
                        expected: "`deprecated`".to_string(),
                        found: keyword.describe(),
                    });
                }
                deprecated = true;
            }
            _ => return Ok((docs, deprecated)),
        }
    }
}

/// Wrap a schema in its annotations, normalized so `Documented` is the
/// outermost wrapper.
pub(crate) fn apply_annotations(schema: Schema, docs: Vec<String>, deprecated: bool) -> Schema {
    let schema = if deprecated {
        Schema::deprecated(schema)
    } else {
        schema
    };
    if docs.is_empty() {
        schema
    } else {
        Schema::documented(docs.join("\n"), schema)
    }
}
