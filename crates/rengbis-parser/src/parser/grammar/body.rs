use rengbis_schema::{
    BinaryConstraints, Bound, ListConstraints, NumericConstraints, Schema, SizeRange,
    TextConstraints,
};

use crate::parser::grammar::document::{apply_annotations, leading_annotations};
use crate::parser::grammar::{constraint, object};
use crate::parser::Parser;
use crate::{SyntaxError, TokenKind};

/// *body*:
///     item (**|** item)*
///
/// Two or more quoted strings collapse to an enum; any other plurality
/// builds an alternative. A `|` may begin a new line.
pub(crate) fn body(p: &mut Parser) -> Result<Schema, SyntaxError> {
    p.enter()?;
    let result = body_inner(p);
    p.exit();
    result
}

fn body_inner(p: &mut Parser) -> Result<Schema, SyntaxError> {
    let mut items = vec![item(p)?];
    while p.eat(TokenKind::Pipe).is_some() {
        items.push(item(p)?);
    }
    if items.len() == 1 {
        return Ok(items.pop().expect("one item"));
    }

    let mut values = Vec::with_capacity(items.len());
    for candidate in &items {
        match candidate {
            Schema::GivenText(value) => values.push(value.clone()),
            _ => return Ok(Schema::alternative(items)?),
        }
    }
    Ok(Schema::enumeration(values)?)
}

/// *item*:
///     ("@deprecated")? docComment* atom ("*" | "+")? ("[" listConstraints "]")?
///     | "(" body ("," body)* ")" ("*" | "+")? ("[" listConstraints "]")?
///
/// A trailing `##` on the same line attaches to the item just parsed.
pub(crate) fn item(p: &mut Parser) -> Result<Schema, SyntaxError> {
    let (docs, deprecated) = leading_annotations(p)?;
    let core = item_core(p)?;
    let mut schema = apply_annotations(core, docs, deprecated);
    if p.at(TokenKind::DocComment) && p.peek().line() == p.prev_line() {
        let doc = p.bump().data;
        schema = attach_trailing_doc(schema, doc);
    }
    Ok(schema)
}

fn item_core(p: &mut Parser) -> Result<Schema, SyntaxError> {
    if p.eat(TokenKind::LParen).is_some() {
        let mut bodies = vec![body(p)?];
        while p.eat(TokenKind::Comma).is_some() {
            bodies.push(body(p)?);
        }
        p.expect(TokenKind::RParen, "`)`")?;
        let inner = if bodies.len() == 1 {
            bodies.pop().expect("one body")
        } else {
            Schema::tuple(bodies)?
        };
        return suffixes(p, inner);
    }
    let atom = atom(p)?;
    suffixes(p, atom)
}

/// `*` and `+` list suffixes plus the bracketed list constraints. `+`
/// folds into a minimum size of one.
fn suffixes(p: &mut Parser, inner: Schema) -> Result<Schema, SyntaxError> {
    let plus = if p.eat(TokenKind::Star).is_some() {
        false
    } else if p.eat(TokenKind::Plus).is_some() {
        true
    } else {
        return Ok(inner);
    };

    let mut constraints = if p.at(TokenKind::LBracket) {
        constraint::list_constraints(p)?
    } else {
        ListConstraints::default()
    };
    if plus {
        constraints.size = Some(match constraints.size.take() {
            None => SizeRange::at_least(1),
            Some(range) if range.min().is_none() => {
                SizeRange::new(Some(Bound::Inclusive(1)), range.max().copied())
                    .map_err(|error| SyntaxError::Constraint {
                        message: error.to_string(),
                    })?
            }
            Some(range) => range,
        });
    }
    Ok(Schema::list(inner, constraints))
}

fn atom(p: &mut Parser) -> Result<Schema, SyntaxError> {
    match p.peek_kind() {
        TokenKind::Str => Ok(Schema::given(p.bump().data)),
        TokenKind::LCurly => object::object_or_map(p),
        TokenKind::Name => named_atom(p),
        _ => Err(p.error("a schema")),
    }
}

fn named_atom(p: &mut Parser) -> Result<Schema, SyntaxError> {
    let token = p.bump();
    match token.data.as_str() {
        "any" => Ok(Schema::Any),
        "fail" => Ok(Schema::Fail),
        "boolean" => {
            let default = if p.eat(TokenKind::DefaultEq).is_some() {
                let literal = p.expect(TokenKind::Name, "`true` or `false`")?;
                match literal.data.as_str() {
                    "true" => Some(true),
                    "false" => Some(false),
                    _ => {
                        return Err(SyntaxError::Parse {
                            index: literal.index,
                            line: literal.line,
                            expected: "`true` or `false`".to_string(),
                            found: literal.describe(),
                        })
                    }
                }
            } else {
                None
            };
            Ok(Schema::boolean(default))
        }
        "text" => {
            let constraints = if p.at(TokenKind::LBracket) {
                constraint::text_constraints(p)?
            } else {
                TextConstraints::default()
            };
            let default = if p.eat(TokenKind::DefaultEq).is_some() {
                Some(p.expect(TokenKind::Str, "a quoted string default")?.data)
            } else {
                None
            };
            Ok(Schema::text(constraints, default)?)
        }
        "number" => {
            let constraints = if p.at(TokenKind::LBracket) {
                constraint::numeric_constraints(p)?
            } else {
                NumericConstraints::default()
            };
            let default = if p.eat(TokenKind::DefaultEq).is_some() {
                Some(constraint::decimal_literal(p)?)
            } else {
                None
            };
            Ok(Schema::number(constraints, default))
        }
        "binary" => {
            let constraints = if p.at(TokenKind::LBracket) {
                constraint::binary_constraints(p)?
            } else {
                BinaryConstraints::default()
            };
            Ok(Schema::binary(constraints))
        }
        "time" => {
            let format = constraint::time_constraints(p)?;
            Ok(Schema::time(format)?)
        }
        _ => {
            if p.eat(TokenKind::Dot).is_some() {
                let member = p.expect(TokenKind::Name, "a definition name")?;
                Ok(Schema::scoped_ref(token.data, member.data))
            } else {
                Ok(Schema::named_ref(token.data))
            }
        }
    }
}

pub(crate) fn attach_trailing_doc(schema: Schema, doc: String) -> Schema {
    match schema {
        Schema::Documented {
            doc: existing,
            inner,
        } => Schema::Documented {
            doc: format!("{existing}\n{doc}"),
            inner,
        },
        other => Schema::documented(doc, other),
    }
}
