/// Peekable iterator over a char sequence that tracks byte offsets and
/// line numbers.
#[derive(Debug, Clone)]
pub(crate) struct Cursor<'a> {
    chars: std::str::Chars<'a>,
    offset: usize,
    line: usize,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(input: &'a str) -> Cursor<'a> {
        Cursor {
            chars: input.chars(),
            offset: 0,
            line: 1,
        }
    }

    /// Byte offset of the next character.
    pub(crate) fn offset(&self) -> usize {
        self.offset
    }

    /// 1-based line of the next character.
    pub(crate) fn line(&self) -> usize {
        self.line
    }

    /// Peek at the next character without consuming it.
    pub(crate) fn first(&self) -> Option<char> {
        self.chars.clone().next()
    }

    /// Peek one character past the next.
    pub(crate) fn second(&self) -> Option<char> {
        let mut ahead = self.chars.clone();
        ahead.next();
        ahead.next()
    }

    /// Consume and return the next character.
    pub(crate) fn bump(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        self.offset += c.len_utf8();
        if c == '\n' {
            self.line += 1;
        }
        Some(c)
    }

    /// Consume the next character when it matches.
    pub(crate) fn eatc(&mut self, expected: char) -> bool {
        if self.first() == Some(expected) {
            self.bump();
            true
        } else {
            false
        }
    }

    /// Consume up to, but not including, the next line terminator.
    pub(crate) fn take_line(&mut self) -> String {
        let mut text = String::new();
        while let Some(c) = self.first() {
            if c == '\n' {
                break;
            }
            text.push(c);
            self.bump();
        }
        text
    }

    /// Skip whitespace and `#` line comments. Stops at `##`, which is a
    /// doc-comment token, not trivia.
    pub(crate) fn skip_trivia(&mut self) {
        loop {
            match self.first() {
                Some(c) if c.is_whitespace() => {
                    self.bump();
                }
                Some('#') if self.second() != Some('#') => {
                    self.take_line();
                }
                _ => return,
            }
        }
    }
}
