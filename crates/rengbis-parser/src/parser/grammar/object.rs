use rengbis_schema::{Label, Schema};

use crate::parser::grammar::body;
use crate::parser::grammar::document::{apply_annotations, leading_annotations};
use crate::parser::Parser;
use crate::{SyntaxError, TokenKind};

/// *objectLiteral*:
///     **{** field (**,** field | newline field)* **}**
/// *mapLiteral*:
///     **{** **...** **:** body **}**
pub(crate) fn object_or_map(p: &mut Parser) -> Result<Schema, SyntaxError> {
    p.expect(TokenKind::LCurly, "`{`")?;

    if p.eat(TokenKind::Spread).is_some() {
        p.expect(TokenKind::Colon, "`:`")?;
        let value = body::body(p)?;
        p.expect(TokenKind::RCurly, "`}`")?;
        return Ok(Schema::map(value));
    }

    if p.eat(TokenKind::RCurly).is_some() {
        return Ok(Schema::object(Vec::new())?);
    }

    let mut fields: Vec<(Label, Schema)> = Vec::new();
    loop {
        let (label, schema) = field(p)?;
        if fields.iter().any(|(seen, _)| seen.name() == label.name()) {
            return Err(SyntaxError::DuplicateField {
                name: label.name().to_string(),
            });
        }
        fields.push((label, schema));

        if p.eat(TokenKind::Comma).is_some() {
            continue;
        }
        if p.eat(TokenKind::RCurly).is_some() {
            break;
        }
        // A field on a fresh line needs no comma.
        let next = p.peek();
        let starts_field = matches!(
            next.kind(),
            TokenKind::Name | TokenKind::At | TokenKind::DocComment
        );
        if starts_field && next.line() > p.prev_line() {
            continue;
        }
        return Err(p.error("`,`, `}` or a new line"));
    }
    Ok(Schema::object(fields)?)
}

/// *field*:
///     ("@deprecated")? docComment* name ("?")? **:** body
fn field(p: &mut Parser) -> Result<(Label, Schema), SyntaxError> {
    let (docs, deprecated) = leading_annotations(p)?;
    let name = p.expect(TokenKind::Name, "a field name")?.data;
    let optional = p.eat(TokenKind::Question).is_some();
    p.expect(TokenKind::Colon, "`:`")?;
    let schema = body::body(p)?;
    let label = if optional {
        Label::optional(name)
    } else {
        Label::mandatory(name)
    };
    Ok((label, apply_annotations(schema, docs, deprecated)))
}
