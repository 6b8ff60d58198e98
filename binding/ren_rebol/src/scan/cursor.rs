//! Byte cursor over source text.
//!
//! Delimiters in the source syntax are all ASCII, and UTF-8 never encodes a
//! non-ASCII character with ASCII bytes, so the cursor can scan bytes and
//! still only ever stop on character boundaries.

#[derive(Clone, Copy, Debug)]
pub(crate) struct Cursor<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(src: &'a str) -> Self {
        Cursor { src, pos: 0 }
    }

    #[inline]
    pub(crate) fn pos(&self) -> usize {
        self.pos
    }

    #[inline]
    pub(crate) fn peek(&self) -> Option<u8> {
        self.src.as_bytes().get(self.pos).copied()
    }

    #[inline]
    pub(crate) fn peek_at(&self, offset: usize) -> Option<u8> {
        self.src.as_bytes().get(self.pos + offset).copied()
    }

    /// Advance over `n` bytes. Callers only skip ASCII.
    #[inline]
    pub(crate) fn advance(&mut self, n: usize) {
        self.pos = (self.pos + n).min(self.src.len());
    }

    pub(crate) fn bump_char(&mut self) -> Option<char> {
        let c = self.src.get(self.pos..)?.chars().next()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    pub(crate) fn rest(&self) -> &'a [u8] {
        self.src.as_bytes().get(self.pos..).unwrap_or_default()
    }

    pub(crate) fn slice(&self, start: usize, end: usize) -> &'a str {
        self.src.get(start..end).unwrap_or_default()
    }

    /// Offset of the next `byte` from the current position.
    pub(crate) fn find(&self, byte: u8) -> Option<usize> {
        memchr::memchr(byte, self.rest())
    }

    /// Skip whitespace and `;` line comments.
    pub(crate) fn skip_trivia(&mut self) {
        while let Some(b) = self.peek() {
            if b.is_ascii_whitespace() {
                self.advance(1);
            } else if b == b';' {
                match self.find(b'\n') {
                    Some(offset) => self.advance(offset + 1),
                    None => self.pos = self.src.len(),
                }
            } else {
                break;
            }
        }
    }

    /// Consume bytes while `keep` holds and return the consumed text.
    pub(crate) fn eat_while(&mut self, keep: impl Fn(u8) -> bool) -> &'a str {
        let start = self.pos;
        while let Some(b) = self.peek() {
            if !keep(b) {
                break;
            }
            self.pos += 1;
        }
        self.slice(start, self.pos)
    }
}
