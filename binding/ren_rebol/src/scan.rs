//! Source scanner: text to unbound cells.
//!
//! Produces the items of the outermost level of `source`; nested blocks and
//! groups are allocated on the heap as they close. Words come out unbound;
//! the caller binds them into whatever context the text is loaded for.

mod cursor;

use ren_cell::Cell;

use self::cursor::Cursor;
use crate::errors::{self, ErrorKind};
use crate::heap::Heap;
use crate::layout::{self, tag};
use crate::stack::ensure_sufficient_stack;

/// Scan `source` into a list of values.
pub(crate) fn scan(heap: &mut Heap, source: &str) -> Result<Vec<Cell>, ErrorKind> {
    let mut scanner = Scanner {
        cursor: Cursor::new(source),
        heap,
    };
    let items = scanner.scan_items(None)?;
    tracing::trace!(items = items.len(), bytes = source.len(), "scanned");
    Ok(items)
}

/// Bytes that end a word, number, issue or refinement.
fn is_delimiter(b: u8) -> bool {
    b.is_ascii_whitespace() || matches!(b, b'[' | b']' | b'(' | b')' | b'"' | b';' | b'{' | b'}' | b'/' | b':')
}

/// Bytes that end a file or url, which may contain `/` and `:`.
fn ends_locator(b: u8) -> bool {
    b.is_ascii_whitespace() || matches!(b, b'[' | b']' | b'(' | b')' | b'"' | b';')
}

/// Bytes that may follow a `/` inside a path.
fn starts_segment(b: u8) -> bool {
    b == b'(' || !ends_locator(b)
}

struct Scanner<'s, 'h> {
    cursor: Cursor<'s>,
    heap: &'h mut Heap,
}

impl Scanner<'_, '_> {
    fn scan_items(&mut self, close: Option<(u8, u8)>) -> Result<Vec<Cell>, ErrorKind> {
        ensure_sufficient_stack(|| {
            let mut items = Vec::new();
            loop {
                self.cursor.skip_trivia();
                match self.cursor.peek() {
                    None => {
                        return match close {
                            Some((open, close)) => {
                                Err(errors::missing(char::from(close), char::from(open)))
                            }
                            None => Ok(items),
                        };
                    }
                    Some(b @ (b']' | b')')) => {
                        if close.map(|(_, c)| c) == Some(b) {
                            self.cursor.advance(1);
                            return Ok(items);
                        }
                        return Err(errors::invalid("end", char::from(b).to_string()));
                    }
                    Some(_) => items.push(self.scan_value()?),
                }
            }
        })
    }

    fn scan_value(&mut self) -> Result<Cell, ErrorKind> {
        let Some(b) = self.cursor.peek() else {
            return Err(errors::invalid("end", "end-of-script"));
        };
        let next = self.cursor.peek_at(1);
        match b {
            b'[' => {
                self.cursor.advance(1);
                let items = self.scan_items(Some((b'[', b']')))?;
                Ok(self.heap.make_array(tag::BLOCK, items))
            }
            b'(' => {
                self.cursor.advance(1);
                let items = self.scan_items(Some((b'(', b')')))?;
                Ok(self.heap.make_array(tag::PAREN, items))
            }
            b'"' => {
                self.cursor.advance(1);
                let text = self.quoted_string()?;
                Ok(self.heap.make_text(tag::STRING, &text))
            }
            b'{' => {
                self.cursor.advance(1);
                let text = self.braced_string()?;
                Ok(self.heap.make_text(tag::STRING, &text))
            }
            b'#' if next == Some(b'"') => {
                self.cursor.advance(2);
                self.character()
            }
            b'#' => {
                self.cursor.advance(1);
                let name = self.cursor.eat_while(|b| !is_delimiter(b));
                if name.is_empty() {
                    return Err(errors::invalid("issue", "#"));
                }
                Ok(self.heap.make_word(tag::ISSUE, name))
            }
            b'%' => {
                self.cursor.advance(1);
                let path = if self.cursor.peek() == Some(b'"') {
                    self.cursor.advance(1);
                    self.quoted_string()?
                } else {
                    self.cursor.eat_while(|b| !ends_locator(b)).to_owned()
                };
                Ok(self.heap.make_text(tag::FILE, &path))
            }
            b'<' if self.at_tag() => {
                self.cursor.advance(1);
                let end = self.cursor.find(b'>').unwrap_or(0);
                let start = self.cursor.pos();
                let body = self.cursor.slice(start, start + end).to_owned();
                self.cursor.advance(end + 1);
                Ok(self.heap.make_text(tag::TAG, &body))
            }
            b'\'' => {
                self.cursor.advance(1);
                self.word_or_path(tag::LIT_WORD, tag::LIT_PATH)
            }
            b':' => {
                self.cursor.advance(1);
                self.word_or_path(tag::GET_WORD, tag::GET_PATH)
            }
            b'/' => {
                if next.is_some_and(|n| !is_delimiter(n)) {
                    self.cursor.advance(1);
                    let name = self.cursor.eat_while(|b| !is_delimiter(b));
                    Ok(self.heap.make_word(tag::REFINEMENT, name))
                } else {
                    let name = self.cursor.eat_while(|b| b == b'/');
                    Ok(self.heap.make_word(tag::WORD, name))
                }
            }
            b'0'..=b'9' => self.number(),
            b'+' | b'-' | b'.' if next.is_some_and(|n| n.is_ascii_digit()) => self.number(),
            _ => self.word_or_path(tag::WORD, tag::PATH),
        }
    }

    /// `<` opens a tag when a letter, `/` or `!` follows and a `>` closes it
    /// on the same line.
    fn at_tag(&self) -> bool {
        let opens = self
            .cursor
            .peek_at(1)
            .is_some_and(|b| b.is_ascii_alphabetic() || b == b'/' || b == b'!');
        if !opens {
            return false;
        }
        match (self.cursor.find(b'>'), self.cursor.find(b'\n')) {
            (Some(close), Some(newline)) => close < newline,
            (Some(_), None) => true,
            (None, _) => false,
        }
    }

    fn number(&mut self) -> Result<Cell, ErrorKind> {
        let text = self.cursor.eat_while(|b| !is_delimiter(b));
        let digits: String = text.chars().filter(|&c| c != '\'').collect();
        let is_decimal = digits.contains(['.', 'e', 'E']);
        if is_decimal {
            digits
                .parse::<f64>()
                .map(layout::decimal)
                .map_err(|_| errors::invalid("decimal", text))
        } else {
            digits
                .parse::<i64>()
                .map(layout::integer)
                .map_err(|_| errors::invalid("integer", text))
        }
    }

    /// A word (with the given sigil tag) or, if a `/` follows, a path.
    fn word_or_path(&mut self, word_tag: u8, path_tag: u8) -> Result<Cell, ErrorKind> {
        let name = self.cursor.eat_while(|b| !is_delimiter(b));
        if name.is_empty() {
            let shown = self.cursor.bump_char().map(String::from).unwrap_or_default();
            return Err(errors::invalid("word", shown));
        }

        if word_tag == tag::WORD && self.cursor.peek() == Some(b':') {
            match self.cursor.peek_at(1) {
                Some(b) if !ends_locator(b) => {
                    let rest = self.cursor.eat_while(|b| !ends_locator(b));
                    return Ok(self.heap.make_text(tag::URL, &format!("{name}{rest}")));
                }
                _ => {
                    self.cursor.advance(1);
                    return Ok(self.heap.make_word(tag::SET_WORD, name));
                }
            }
        }

        if self.cursor.peek() == Some(b'/') && self.cursor.peek_at(1).is_some_and(starts_segment) {
            let head = self.heap.make_word(tag::WORD, name);
            return self.path(head, path_tag);
        }

        Ok(self.heap.make_word(word_tag, name))
    }

    fn path(&mut self, head: Cell, path_tag: u8) -> Result<Cell, ErrorKind> {
        let mut parts = vec![head];
        while self.cursor.peek() == Some(b'/') && self.cursor.peek_at(1).is_some_and(starts_segment) {
            self.cursor.advance(1);
            let part = match self.cursor.peek() {
                Some(b'(') => {
                    self.cursor.advance(1);
                    let items = self.scan_items(Some((b'(', b')')))?;
                    self.heap.make_array(tag::PAREN, items)
                }
                Some(b':') => {
                    self.cursor.advance(1);
                    let name = self.cursor.eat_while(|b| !is_delimiter(b));
                    self.heap.make_word(tag::GET_WORD, name)
                }
                Some(b'0'..=b'9') => self.number()?,
                _ => {
                    let name = self.cursor.eat_while(|b| !is_delimiter(b));
                    if name.is_empty() {
                        return Err(errors::invalid("path", "/"));
                    }
                    self.heap.make_word(tag::WORD, name)
                }
            };
            parts.push(part);
        }

        let path_tag = if path_tag == tag::PATH && self.cursor.peek() == Some(b':') {
            self.cursor.advance(1);
            tag::SET_PATH
        } else {
            path_tag
        };
        Ok(self.heap.make_array(path_tag, parts))
    }

    fn quoted_string(&mut self) -> Result<String, ErrorKind> {
        let mut out = String::new();
        loop {
            let rest = self.cursor.rest();
            let Some(offset) = memchr::memchr3(b'"', b'^', b'\n', rest) else {
                return Err(errors::missing('"', '"'));
            };
            let start = self.cursor.pos();
            out.push_str(self.cursor.slice(start, start + offset));
            self.cursor.advance(offset);
            match self.cursor.peek() {
                Some(b'"') => {
                    self.cursor.advance(1);
                    return Ok(out);
                }
                Some(b'^') => {
                    self.cursor.advance(1);
                    out.push(self.escape()?);
                }
                _ => return Err(errors::invalid("string", out)),
            }
        }
    }

    fn braced_string(&mut self) -> Result<String, ErrorKind> {
        let mut out = String::new();
        let mut depth = 1usize;
        while let Some(c) = self.cursor.bump_char() {
            match c {
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(out);
                    }
                }
                '^' => {
                    out.push(self.escape()?);
                    continue;
                }
                _ => {}
            }
            out.push(c);
        }
        Err(errors::missing('}', '{'))
    }

    fn character(&mut self) -> Result<Cell, ErrorKind> {
        let c = match self.cursor.bump_char() {
            Some('^') => self.escape()?,
            Some(c) => c,
            None => return Err(errors::missing('"', '"')),
        };
        if self.cursor.peek() != Some(b'"') {
            return Err(errors::invalid("char", c.to_string()));
        }
        self.cursor.advance(1);
        Ok(layout::character(c))
    }

    /// Decode the character after a `^`.
    fn escape(&mut self) -> Result<char, ErrorKind> {
        let Some(c) = self.cursor.bump_char() else {
            return Err(errors::invalid("escape", "^"));
        };
        Ok(match c {
            '/' => '\n',
            '-' => '\t',
            '@' => '\0',
            '(' => {
                let Some(end) = self.cursor.find(b')') else {
                    return Err(errors::invalid("escape", "^("));
                };
                let start = self.cursor.pos();
                let name = self.cursor.slice(start, start + end).to_owned();
                self.cursor.advance(end + 1);
                named_escape(&name).ok_or_else(|| errors::invalid("escape", format!("^({name})")))?
            }
            'A'..='Z' => char::from(c as u8 - b'@'),
            other => other,
        })
    }
}

fn named_escape(name: &str) -> Option<char> {
    match name.to_ascii_lowercase().as_str() {
        "line" => Some('\n'),
        "tab" => Some('\t'),
        "null" => Some('\0'),
        "back" => Some('\u{8}'),
        "esc" => Some('\u{1b}'),
        "del" => Some('\u{7f}'),
        hex => u32::from_str_radix(hex, 16).ok().and_then(char::from_u32),
    }
}

#[cfg(test)]
mod tests;
