//! Canonical text form for schemas.
//!
//! Printing is deterministic: ASCII only, `\n` line endings, object
//! fields sorted by label name, single quotes around enumerated
//! encoding/format names, double quotes around user-supplied strings.
//! The output parses back to an equal schema.

use std::fmt;

use crate::constraints::{
    BinaryConstraints, ListConstraints, NumericConstraints, TextConstraints, TimeFormat,
    Uniqueness,
};
use crate::schema::Schema;

impl Schema {
    /// The canonical source text of this schema body.
    pub fn to_source(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut state = State::new(f);
        body(&mut state, self)
    }
}

pub(crate) struct State<'a, 'b> {
    output: &'a mut fmt::Formatter<'b>,
    indent_level: usize,
    /// A trailing `## …` was just written; the next separator must
    /// break the line so the doc comment does not swallow what follows.
    trailing_doc: bool,
}

impl<'a, 'b> State<'a, 'b> {
    pub(crate) fn new(output: &'a mut fmt::Formatter<'b>) -> Self {
        Self {
            output,
            indent_level: 0,
            trailing_doc: false,
        }
    }

    fn write(&mut self, text: &str) -> fmt::Result {
        self.output.write_str(text)
    }

    fn new_line(&mut self) -> fmt::Result {
        self.write("\n")?;
        for _ in 0..self.indent_level {
            self.write("  ")?;
        }
        self.trailing_doc = false;
        Ok(())
    }
}

pub(crate) fn body(state: &mut State, schema: &Schema) -> fmt::Result {
    match schema {
        Schema::Enum(values) => {
            for (position, value) in values.iter().enumerate() {
                if position > 0 {
                    state.write(" | ")?;
                }
                write_quoted(state, value)?;
            }
            Ok(())
        }
        Schema::Alternative(options) => {
            for (position, option) in options.iter().enumerate() {
                if position > 0 {
                    if state.trailing_doc {
                        state.new_line()?;
                        state.write("| ")?;
                    } else {
                        state.write(" | ")?;
                    }
                }
                item(state, option)?;
            }
            Ok(())
        }
        other => item(state, other),
    }
}

fn item(state: &mut State, schema: &Schema) -> fmt::Result {
    match schema {
        Schema::List { item: inner, constraints } => {
            grouped(state, inner)?;
            state.write("*")?;
            if !constraints.is_empty() {
                state.write(" [ ")?;
                write_list_constraints(state, constraints)?;
                state.write(" ]")?;
            }
            Ok(())
        }
        Schema::Tuple(items) => {
            state.write("(")?;
            for (position, element) in items.iter().enumerate() {
                if position > 0 {
                    if state.trailing_doc {
                        state.new_line()?;
                    }
                    state.write(", ")?;
                }
                body(state, element)?;
            }
            close_delimiter(state, ")")
        }
        Schema::Documented { doc, inner } => {
            item(state, inner)?;
            state.write(" ## ")?;
            state.write(doc)?;
            state.trailing_doc = true;
            Ok(())
        }
        Schema::Deprecated(inner) => {
            state.write("@deprecated ")?;
            item(state, inner)
        }
        Schema::Enum(_) | Schema::Alternative(_) => grouped(state, schema),
        other => atom(state, other),
    }
}

/// Parenthesize forms that would otherwise bind differently. A doc
/// comment runs to the end of its line, so inside a group it prints as
/// a leading `##` line rather than a trailing one.
fn grouped(state: &mut State, schema: &Schema) -> fmt::Result {
    match schema {
        Schema::Documented { doc, inner } => {
            state.write("(")?;
            for line in doc.split('\n') {
                if line.is_empty() {
                    state.write("##")?;
                } else {
                    state.write("## ")?;
                    state.write(line)?;
                }
                state.new_line()?;
            }
            item(state, inner)?;
            close_delimiter(state, ")")
        }
        Schema::Enum(_)
        | Schema::Alternative(_)
        | Schema::List { .. }
        | Schema::Deprecated(_) => {
            state.write("(")?;
            body(state, schema)?;
            close_delimiter(state, ")")
        }
        other => item(state, other),
    }
}

/// Break the line first when a trailing doc comment would otherwise
/// swallow the delimiter.
fn close_delimiter(state: &mut State, delimiter: &str) -> fmt::Result {
    if state.trailing_doc {
        state.new_line()?;
    }
    state.write(delimiter)
}

fn atom(state: &mut State, schema: &Schema) -> fmt::Result {
    match schema {
        Schema::Any => state.write("any"),
        Schema::Fail => state.write("fail"),
        Schema::Boolean { default } => {
            state.write("boolean")?;
            if let Some(default) = default {
                state.write(if *default { " ?= true" } else { " ?= false" })?;
            }
            Ok(())
        }
        Schema::Text {
            constraints,
            default,
        } => {
            state.write("text")?;
            write_text_constraints(state, constraints)?;
            if let Some(default) = default {
                state.write(" ?= ")?;
                write_quoted(state, default)?;
            }
            Ok(())
        }
        Schema::GivenText(literal) => write_quoted(state, literal),
        Schema::Numeric {
            constraints,
            default,
        } => {
            state.write("number")?;
            write_numeric_constraints(state, constraints)?;
            if let Some(default) = default {
                state.write(" ?= ")?;
                state.write(&default.to_string())?;
            }
            Ok(())
        }
        Schema::Binary(constraints) => {
            state.write("binary")?;
            write_binary_constraints(state, constraints)
        }
        Schema::Time(format) => {
            state.write("time [ format = ")?;
            match format {
                TimeFormat::Custom(pattern) => write_quoted(state, pattern)?,
                named => {
                    state.write("'")?;
                    state.write(named.label())?;
                    state.write("'")?;
                }
            }
            state.write(" ]")
        }
        Schema::Object(fields) => {
            if fields.is_empty() {
                return state.write("{}");
            }
            let mut sorted: Vec<_> = fields.iter().collect();
            sorted.sort_by(|(a, _), (b, _)| a.name().cmp(b.name()));

            state.write("{")?;
            state.indent_level += 1;
            for (label, schema) in sorted {
                state.new_line()?;
                let (doc, deprecated, base) = schema.split_annotations();
                if let Some(doc) = doc {
                    for line in doc.split('\n') {
                        if line.is_empty() {
                            state.write("##")?;
                        } else {
                            state.write("## ")?;
                            state.write(line)?;
                        }
                        state.new_line()?;
                    }
                }
                if deprecated {
                    state.write("@deprecated")?;
                    state.new_line()?;
                }
                state.write(label.name())?;
                if label.is_optional() {
                    state.write("?")?;
                }
                state.write(": ")?;
                body(state, base)?;
            }
            state.indent_level -= 1;
            state.new_line()?;
            state.write("}")
        }
        Schema::Map(value) => {
            state.write("{ ...: ")?;
            body(state, value)?;
            if state.trailing_doc {
                state.new_line()?;
                state.write("}")
            } else {
                state.write(" }")
            }
        }
        Schema::NamedRef(name) => state.write(name),
        Schema::ScopedRef { namespace, name } => {
            state.write(namespace)?;
            if !name.is_empty() {
                state.write(".")?;
                state.write(name)?;
            }
            Ok(())
        }
        // Handled by `body`/`item` before reaching atoms.
        Schema::Enum(_)
        | Schema::Alternative(_)
        | Schema::List { .. }
        | Schema::Tuple(_)
        | Schema::Documented { .. }
        | Schema::Deprecated(_) => item(state, schema),
    }
}

fn write_quoted(state: &mut State, text: &str) -> fmt::Result {
    state.write("\"")?;
    for character in text.chars() {
        match character {
            '"' => state.write("\\\"")?,
            '\\' => state.write("\\\\")?,
            '\n' => state.write("\\n")?,
            '\t' => state.write("\\t")?,
            '\r' => state.write("\\r")?,
            other => state.output.write_fmt(format_args!("{other}"))?,
        }
    }
    state.write("\"")
}

fn write_text_constraints(state: &mut State, constraints: &TextConstraints) -> fmt::Result {
    if constraints.is_empty() {
        return Ok(());
    }
    state.write(" [ ")?;
    let mut first = true;
    if let Some(size) = &constraints.size {
        write_part(state, &mut first, &size.render("length"))?;
    }
    if let Some(regex) = &constraints.regex {
        separator(state, &mut first)?;
        state.write("regex = ")?;
        write_quoted(state, regex)?;
    }
    if let Some(format) = &constraints.format {
        separator(state, &mut first)?;
        state.write("pattern = ")?;
        write_quoted(state, format)?;
    }
    state.write(" ]")
}

fn write_numeric_constraints(state: &mut State, constraints: &NumericConstraints) -> fmt::Result {
    if constraints.is_empty() {
        return Ok(());
    }
    state.write(" [ ")?;
    let mut first = true;
    if constraints.integer {
        write_part(state, &mut first, "integer")?;
    }
    if let Some(value) = &constraints.value {
        write_part(state, &mut first, &value.render("value"))?;
    }
    state.write(" ]")
}

fn write_binary_constraints(state: &mut State, constraints: &BinaryConstraints) -> fmt::Result {
    if constraints.is_empty() {
        return Ok(());
    }
    state.write(" [ ")?;
    let mut first = true;
    if let Some(encoding) = &constraints.encoding {
        separator(state, &mut first)?;
        state.write("encoding = '")?;
        state.write(encoding.as_str())?;
        state.write("'")?;
    }
    if let Some(size) = &constraints.size {
        write_part(state, &mut first, &size.render("bytes"))?;
    }
    state.write(" ]")
}

fn write_list_constraints(state: &mut State, constraints: &ListConstraints) -> fmt::Result {
    let mut first = true;
    if let Some(size) = &constraints.size {
        write_part(state, &mut first, &size.render("size"))?;
    }
    for uniqueness in &constraints.unique {
        separator(state, &mut first)?;
        match uniqueness {
            Uniqueness::Simple => state.write("unique")?,
            Uniqueness::ByFields(fields) if fields.len() == 1 => {
                state.write("unique = ")?;
                state.write(&fields[0])?;
            }
            Uniqueness::ByFields(fields) => {
                state.write("unique = (")?;
                state.write(&fields.join(", "))?;
                state.write(")")?;
            }
        }
    }
    Ok(())
}

fn separator(state: &mut State, first: &mut bool) -> fmt::Result {
    if !*first {
        state.write(", ")?;
    }
    *first = false;
    Ok(())
}

fn write_part(state: &mut State, first: &mut bool, part: &str) -> fmt::Result {
    separator(state, first)?;
    state.write(part)
}

#[cfg(test)]
mod test {
    use expect_test::expect;
    use rust_decimal::Decimal;

    use crate::{
        BinaryConstraints, BinaryEncoding, Bound, Label, ListConstraints, NumericConstraints,
        Schema, SizeRange, TextConstraints, TimeFormat, Uniqueness, ValueRange,
    };

    #[test]
    fn scalars() {
        expect!["any"].assert_eq(&Schema::Any.to_source());
        expect!["boolean ?= true"].assert_eq(&Schema::boolean(Some(true)).to_source());
        expect![[r#""yes" | "no""#]]
            .assert_eq(&Schema::enumeration(vec!["yes".into(), "no".into()]).unwrap().to_source());
    }

    #[test]
    fn text_with_constraints() {
        let constraints = TextConstraints {
            size: Some(
                SizeRange::new(Some(Bound::Inclusive(10)), Some(Bound::Inclusive(100))).unwrap(),
            ),
            regex: Some("^[a-z]+$".into()),
            format: None,
        };
        let schema = Schema::text(constraints, None).unwrap();
        expect![[r#"text [ 10 <= length <= 100, regex = "^[a-z]+$" ]"#]]
            .assert_eq(&schema.to_source());
    }

    #[test]
    fn numeric_with_constraints() {
        let constraints = NumericConstraints {
            value: Some(ValueRange::at_least(Decimal::ZERO)),
            integer: true,
        };
        let schema = Schema::number(constraints, Some(Decimal::from(42)));
        expect!["number [ integer, value >= 0 ] ?= 42"].assert_eq(&schema.to_source());
    }

    #[test]
    fn binary_with_constraints() {
        let constraints = BinaryConstraints {
            encoding: Some(BinaryEncoding::Base64),
            size: Some(SizeRange::exact(11)),
        };
        expect!["binary [ encoding = 'base64', bytes == 11 ]"]
            .assert_eq(&Schema::binary(constraints).to_source());
    }

    #[test]
    fn time_formats() {
        expect!["time [ format = 'rfc3339' ]"]
            .assert_eq(&Schema::time(TimeFormat::Rfc3339).unwrap().to_source());
        expect![[r#"time [ format = "%d/%m/%Y" ]"#]].assert_eq(
            &Schema::time(TimeFormat::Custom("%d/%m/%Y".into())).unwrap().to_source(),
        );
    }

    #[test]
    fn lists_and_uniqueness() {
        let schema = Schema::list(
            Schema::object([
                (Label::mandatory("id"), Schema::text(Default::default(), None).unwrap()),
            ])
            .unwrap(),
            ListConstraints {
                size: Some(SizeRange::at_least(1)),
                unique: vec![Uniqueness::ByFields(vec!["id".into()])],
            },
        );
        expect![[r#"
            {
              id: text
            }* [ size >= 1, unique = id ]"#]]
        .assert_eq(&schema.to_source());
    }

    #[test]
    fn object_fields_print_sorted_with_annotations() {
        let schema = Schema::object([
            (
                Label::mandatory("zeta"),
                Schema::documented("last letter", Schema::number(Default::default(), None)),
            ),
            (
                Label::optional("alpha"),
                Schema::deprecated(Schema::text(Default::default(), None).unwrap()),
            ),
        ])
        .unwrap();
        expect![[r#"
            {
              @deprecated
              alpha?: text
              ## last letter
              zeta: number
            }"#]]
        .assert_eq(&schema.to_source());
    }

    #[test]
    fn alternatives_group_composite_list_items() {
        let inner = Schema::alternative(vec![
            Schema::number(Default::default(), None),
            Schema::text(Default::default(), None).unwrap(),
        ])
        .unwrap();
        let schema = Schema::list(inner, ListConstraints::default());
        expect!["(number | text)*"].assert_eq(&schema.to_source());
    }

    #[test]
    fn tuples_and_maps() {
        let tuple = Schema::tuple(vec![
            Schema::number(Default::default(), None),
            Schema::text(Default::default(), None).unwrap(),
        ])
        .unwrap();
        expect!["(number, text)"].assert_eq(&tuple.to_source());
        expect!["{ ...: number }"]
            .assert_eq(&Schema::map(Schema::number(Default::default(), None)).to_source());
    }

    #[test]
    fn inline_documentation_trails_the_item() {
        let schema = Schema::alternative(vec![
            Schema::documented("count", Schema::number(Default::default(), None)),
            Schema::text(Default::default(), None).unwrap(),
        ])
        .unwrap();
        expect![[r#"
            number ## count
            | text"#]]
        .assert_eq(&schema.to_source());
    }
}
