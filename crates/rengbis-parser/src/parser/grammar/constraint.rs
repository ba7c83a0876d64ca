//! The small embedded grammars inside `[ ... ]` constraint lists.

use std::fmt;
use std::str::FromStr;

use rengbis_schema::{
    BinaryConstraints, BinaryEncoding, Bound, ListConstraints, NumericConstraints, Range,
    TextConstraints, TimeFormat, Uniqueness,
};
use rust_decimal::Decimal;

use crate::parser::Parser;
use crate::{SyntaxError, TokenKind};

const BINARY_UNITS: &[(&str, u64)] = &[("bytes", 1), ("KB", 1 << 10), ("MB", 1 << 20)];

/// `length == N`, `length >= N`, `A <= length <= B`, `regex = "…"`,
/// `pattern = "…"` (the glyph format).
pub(crate) fn text_constraints(p: &mut Parser) -> Result<TextConstraints, SyntaxError> {
    let mut constraints = TextConstraints::default();
    let mut length = PartialRange::new("length");
    p.expect(TokenKind::LBracket, "`[`")?;
    loop {
        match p.peek_kind() {
            TokenKind::Int => size_range_form(p, &[("length", 1)], &mut length)?,
            TokenKind::Name => {
                let keyword = p.bump();
                match keyword.data.as_str() {
                    "length" => size_comparison(p, 1, &mut length)?,
                    "regex" => {
                        p.expect(TokenKind::Eq, "`=`")?;
                        let value = p.expect(TokenKind::Str, "a quoted regex")?;
                        set_once(&mut constraints.regex, value.data, "regex")?;
                    }
                    "pattern" => {
                        p.expect(TokenKind::Eq, "`=`")?;
                        let value = p.expect(TokenKind::Str, "a quoted pattern")?;
                        set_once(&mut constraints.format, value.data, "pattern")?;
                    }
                    _ => {
                        return Err(unexpected(&keyword, "`length`, `regex` or `pattern`"));
                    }
                }
            }
            _ => return Err(p.error("a text constraint")),
        }
        if p.eat(TokenKind::Comma).is_none() {
            break;
        }
    }
    p.expect(TokenKind::RBracket, "`]`")?;
    constraints.size = length.finish()?;
    Ok(constraints)
}

/// `integer`; `value` with the comparison grammar over decimals.
pub(crate) fn numeric_constraints(p: &mut Parser) -> Result<NumericConstraints, SyntaxError> {
    let mut constraints = NumericConstraints::default();
    let mut value = PartialRange::new("value");
    p.expect(TokenKind::LBracket, "`[`")?;
    loop {
        match p.peek_kind() {
            TokenKind::Int | TokenKind::Float => value_range_form(p, &mut value)?,
            TokenKind::Name => {
                let keyword = p.bump();
                match keyword.data.as_str() {
                    "integer" => constraints.integer = true,
                    "value" => value_comparison(p, &mut value)?,
                    _ => return Err(unexpected(&keyword, "`integer` or `value`")),
                }
            }
            _ => return Err(p.error("a numeric constraint")),
        }
        if p.eat(TokenKind::Comma).is_none() {
            break;
        }
    }
    p.expect(TokenKind::RBracket, "`]`")?;
    constraints.value = value.finish()?;
    Ok(constraints)
}

/// `encoding = 'base64' | 'base32' | 'hex'`; `bytes`/`KB`/`MB` with the
/// comparison grammar. Units convert to bytes here, at parse time.
pub(crate) fn binary_constraints(p: &mut Parser) -> Result<BinaryConstraints, SyntaxError> {
    let mut constraints = BinaryConstraints::default();
    let mut size = PartialRange::new("bytes");
    p.expect(TokenKind::LBracket, "`[`")?;
    loop {
        match p.peek_kind() {
            TokenKind::Int => size_range_form(p, BINARY_UNITS, &mut size)?,
            TokenKind::Name => {
                let keyword = p.bump();
                if keyword.data == "encoding" {
                    p.expect(TokenKind::Eq, "`=`")?;
                    let name = p.expect(TokenKind::Sym, "'base64', 'base32' or 'hex'")?;
                    let encoding =
                        BinaryEncoding::from_name(&name.data).ok_or(SyntaxError::Constraint {
                            message: format!("unknown binary encoding '{}'", name.data),
                        })?;
                    set_once(&mut constraints.encoding, encoding, "encoding")?;
                } else if let Some((_, factor)) =
                    BINARY_UNITS.iter().find(|(unit, _)| *unit == keyword.data)
                {
                    size_comparison(p, *factor, &mut size)?;
                } else {
                    return Err(unexpected(&keyword, "`encoding`, `bytes`, `KB` or `MB`"));
                }
            }
            _ => return Err(p.error("a binary constraint")),
        }
        if p.eat(TokenKind::Comma).is_none() {
            break;
        }
    }
    p.expect(TokenKind::RBracket, "`]`")?;
    constraints.size = size.finish()?;
    Ok(constraints)
}

/// `size` with the comparison grammar; `unique`, `unique = field`,
/// `unique = (f1, f2, …)`.
pub(crate) fn list_constraints(p: &mut Parser) -> Result<ListConstraints, SyntaxError> {
    let mut constraints = ListConstraints::default();
    let mut size = PartialRange::new("size");
    p.expect(TokenKind::LBracket, "`[`")?;
    loop {
        match p.peek_kind() {
            TokenKind::Int => size_range_form(p, &[("size", 1)], &mut size)?,
            TokenKind::Name => {
                let keyword = p.bump();
                match keyword.data.as_str() {
                    "size" => size_comparison(p, 1, &mut size)?,
                    "unique" => {
                        let uniqueness = if p.eat(TokenKind::Eq).is_some() {
                            if p.eat(TokenKind::LParen).is_some() {
                                let mut names =
                                    vec![p.expect(TokenKind::Name, "a field name")?.data];
                                while p.eat(TokenKind::Comma).is_some() {
                                    names.push(p.expect(TokenKind::Name, "a field name")?.data);
                                }
                                p.expect(TokenKind::RParen, "`)`")?;
                                Uniqueness::ByFields(names)
                            } else {
                                let name = p.expect(TokenKind::Name, "a field name")?;
                                Uniqueness::ByFields(vec![name.data])
                            }
                        } else {
                            Uniqueness::Simple
                        };
                        constraints.unique.push(uniqueness);
                    }
                    _ => return Err(unexpected(&keyword, "`size` or `unique`")),
                }
            }
            _ => return Err(p.error("a list constraint")),
        }
        if p.eat(TokenKind::Comma).is_none() {
            break;
        }
    }
    p.expect(TokenKind::RBracket, "`]`")?;
    constraints.size = size.finish()?;
    Ok(constraints)
}

/// `format = 'iso8601' | 'iso8601-date' | 'iso8601-time' | 'rfc3339'`
/// for the named formats; a double-quoted string is a custom template.
pub(crate) fn time_constraints(p: &mut Parser) -> Result<TimeFormat, SyntaxError> {
    p.expect(TokenKind::LBracket, "`[`")?;
    let keyword = p.expect(TokenKind::Name, "`format`")?;
    if keyword.data != "format" {
        return Err(unexpected(&keyword, "`format`"));
    }
    p.expect(TokenKind::Eq, "`=`")?;
    let format = match p.peek_kind() {
        TokenKind::Sym => {
            let name = p.bump();
            TimeFormat::from_name(&name.data).ok_or(SyntaxError::Constraint {
                message: format!("unknown time format '{}'", name.data),
            })?
        }
        TokenKind::Str => TimeFormat::Custom(p.bump().data),
        _ => return Err(p.error("a format name or a quoted template")),
    };
    p.expect(TokenKind::RBracket, "`]`")?;
    Ok(format)
}

/// A number literal for a `?=` default clause.
pub(crate) fn decimal_literal(p: &mut Parser) -> Result<Decimal, SyntaxError> {
    let token = match p.peek_kind() {
        TokenKind::Int | TokenKind::Float => p.bump(),
        _ => return Err(p.error("a number")),
    };
    Decimal::from_str(&token.data).map_err(|_| SyntaxError::Parse {
        index: token.index,
        line: token.line,
        expected: "a decimal number".to_string(),
        found: token.describe(),
    })
}

/// Accumulates the `min`/`max` endpoints a constraint list spells out
/// across one or more clauses, then checks the interval is non-empty.
struct PartialRange<T> {
    subject: &'static str,
    min: Option<Bound<T>>,
    max: Option<Bound<T>>,
}

impl<T: PartialOrd + fmt::Display + Clone> PartialRange<T> {
    fn new(subject: &'static str) -> Self {
        Self {
            subject,
            min: None,
            max: None,
        }
    }

    fn set_min(&mut self, bound: Bound<T>) -> Result<(), SyntaxError> {
        if self.min.replace(bound).is_some() {
            return Err(SyntaxError::Constraint {
                message: format!("{} has more than one lower bound", self.subject),
            });
        }
        Ok(())
    }

    fn set_max(&mut self, bound: Bound<T>) -> Result<(), SyntaxError> {
        if self.max.replace(bound).is_some() {
            return Err(SyntaxError::Constraint {
                message: format!("{} has more than one upper bound", self.subject),
            });
        }
        Ok(())
    }

    fn set_exact(&mut self, value: T) -> Result<(), SyntaxError> {
        self.set_min(Bound::Inclusive(value.clone()))?;
        self.set_max(Bound::Inclusive(value))
    }

    fn finish(self) -> Result<Option<Range<T>>, SyntaxError> {
        if self.min.is_none() && self.max.is_none() {
            return Ok(None);
        }
        Range::new(self.min, self.max)
            .map(Some)
            .map_err(|error| SyntaxError::Constraint {
                message: error.to_string(),
            })
    }
}

/// `<subject> == N`, `<subject> >= N`, and so on. The subject keyword
/// has already been consumed; `factor` scales units like `KB` into
/// bytes.
fn size_comparison(
    p: &mut Parser,
    factor: u64,
    range: &mut PartialRange<u64>,
) -> Result<(), SyntaxError> {
    match p.peek_kind() {
        TokenKind::EqEq => {
            p.bump();
            let value = int_literal(p)? * factor;
            range.set_exact(value)
        }
        TokenKind::Gte => {
            p.bump();
            range.set_min(Bound::Inclusive(int_literal(p)? * factor))
        }
        TokenKind::Gt => {
            p.bump();
            range.set_min(Bound::Exclusive(int_literal(p)? * factor))
        }
        TokenKind::Lte => {
            p.bump();
            range.set_max(Bound::Inclusive(int_literal(p)? * factor))
        }
        TokenKind::Lt => {
            p.bump();
            range.set_max(Bound::Exclusive(int_literal(p)? * factor))
        }
        _ => Err(p.error("a comparison operator")),
    }
}

/// `A <= <subject> <= B` with all four inclusivity combinations.
fn size_range_form(
    p: &mut Parser,
    subjects: &[(&str, u64)],
    range: &mut PartialRange<u64>,
) -> Result<(), SyntaxError> {
    let low = int_literal(p)?;
    let low_inclusive = range_op(p)?;
    let keyword = p.expect(TokenKind::Name, "a size keyword")?;
    let Some((_, factor)) = subjects.iter().find(|(name, _)| *name == keyword.data) else {
        let expected: Vec<String> = subjects
            .iter()
            .map(|(name, _)| format!("`{name}`"))
            .collect();
        return Err(unexpected(&keyword, &expected.join(" or ")));
    };
    let high_inclusive = range_op(p)?;
    let high = int_literal(p)?;
    range.set_min(directional(low * factor, low_inclusive))?;
    range.set_max(directional(high * factor, high_inclusive))
}

fn value_comparison(p: &mut Parser, range: &mut PartialRange<Decimal>) -> Result<(), SyntaxError> {
    match p.peek_kind() {
        TokenKind::EqEq => {
            p.bump();
            let value = decimal_literal(p)?;
            range.set_exact(value)
        }
        TokenKind::Gte => {
            p.bump();
            range.set_min(Bound::Inclusive(decimal_literal(p)?))
        }
        TokenKind::Gt => {
            p.bump();
            range.set_min(Bound::Exclusive(decimal_literal(p)?))
        }
        TokenKind::Lte => {
            p.bump();
            range.set_max(Bound::Inclusive(decimal_literal(p)?))
        }
        TokenKind::Lt => {
            p.bump();
            range.set_max(Bound::Exclusive(decimal_literal(p)?))
        }
        _ => Err(p.error("a comparison operator")),
    }
}

fn value_range_form(p: &mut Parser, range: &mut PartialRange<Decimal>) -> Result<(), SyntaxError> {
    let low = decimal_literal(p)?;
    let low_inclusive = range_op(p)?;
    let keyword = p.expect(TokenKind::Name, "`value`")?;
    if keyword.data != "value" {
        return Err(unexpected(&keyword, "`value`"));
    }
    let high_inclusive = range_op(p)?;
    let high = decimal_literal(p)?;
    range.set_min(directional(low, low_inclusive))?;
    range.set_max(directional(high, high_inclusive))
}

fn directional<T>(value: T, inclusive: bool) -> Bound<T> {
    if inclusive {
        Bound::Inclusive(value)
    } else {
        Bound::Exclusive(value)
    }
}

/// `<=` or `<`; returns whether the endpoint is inclusive.
fn range_op(p: &mut Parser) -> Result<bool, SyntaxError> {
    match p.peek_kind() {
        TokenKind::Lte => {
            p.bump();
            Ok(true)
        }
        TokenKind::Lt => {
            p.bump();
            Ok(false)
        }
        _ => Err(p.error("`<=` or `<`")),
    }
}

fn int_literal(p: &mut Parser) -> Result<u64, SyntaxError> {
    let token = p.expect(TokenKind::Int, "a non-negative integer")?;
    token.data.parse().map_err(|_| SyntaxError::Parse {
        index: token.index,
        line: token.line,
        expected: "a non-negative integer".to_string(),
        found: token.describe(),
    })
}

fn set_once<T>(slot: &mut Option<T>, value: T, what: &str) -> Result<(), SyntaxError> {
    if slot.replace(value).is_some() {
        return Err(SyntaxError::Constraint {
            message: format!("{what} is given more than once"),
        });
    }
    Ok(())
}

fn unexpected(token: &crate::Token, expected: &str) -> SyntaxError {
    SyntaxError::Parse {
        index: token.index,
        line: token.line,
        expected: expected.to_string(),
        found: token.describe(),
    }
}
