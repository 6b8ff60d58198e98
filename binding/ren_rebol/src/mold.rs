//! FORM and MOLD: human text and loadable source text for values.

use std::fmt::Write as _;

use ren_cell::Cell;

use crate::heap::{FrameId, Heap, SeriesId};
use crate::layout::{self, tag};
use crate::natives;
use crate::stack::ensure_sufficient_stack;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Mode {
    Form,
    Mold,
    /// Mold with construction syntax for values that have no literal form.
    MoldAll,
}

pub(crate) fn form(heap: &Heap, cell: &Cell) -> String {
    Molder::new(heap, Mode::Form).run(cell)
}

pub(crate) fn mold(heap: &Heap, cell: &Cell, all: bool) -> String {
    let mode = if all { Mode::MoldAll } else { Mode::Mold };
    Molder::new(heap, mode).run(cell)
}

/// `1.0`, `0.5`, `1e+20`
pub(crate) fn format_decimal(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

struct Molder<'h> {
    heap: &'h Heap,
    mode: Mode,
    out: String,
    series: Vec<SeriesId>,
    frames: Vec<FrameId>,
}

impl<'h> Molder<'h> {
    fn new(heap: &'h Heap, mode: Mode) -> Self {
        Molder {
            heap,
            mode,
            out: String::new(),
            series: Vec::new(),
            frames: Vec::new(),
        }
    }

    fn run(mut self, cell: &Cell) -> String {
        self.value(cell);
        self.out
    }

    fn value(&mut self, cell: &Cell) {
        let t = layout::tag_of(cell);
        match t {
            tag::UNSET => {
                if self.mode == Mode::MoldAll {
                    self.out.push_str("#[unset!]");
                }
            }
            tag::NONE => self.out.push_str(if self.mode == Mode::MoldAll { "#[none]" } else { "none" }),
            tag::LOGIC => {
                let value = layout::logic_value(cell).unwrap_or(false);
                let text = match (self.mode == Mode::MoldAll, value) {
                    (true, true) => "#[true]",
                    (true, false) => "#[false]",
                    (false, true) => "true",
                    (false, false) => "false",
                };
                self.out.push_str(text);
            }
            tag::INTEGER => {
                let _ = write!(self.out, "{}", layout::integer_value(cell).unwrap_or(0));
            }
            tag::DECIMAL => {
                let text = format_decimal(layout::decimal_value(cell).unwrap_or(0.0));
                self.out.push_str(&text);
            }
            tag::CHAR => {
                let c = layout::char_value(cell).unwrap_or('\0');
                if self.mode == Mode::Form {
                    self.out.push(c);
                } else {
                    self.out.push_str("#\"");
                    push_escaped(&mut self.out, c, '"');
                    self.out.push('"');
                }
            }
            tag::STRING | tag::FILE | tag::URL | tag::TAG => self.text(cell, t),
            t if layout::is_word_tag(t) => self.word(cell, t),
            t if layout::is_array_tag(t) => self.array(cell, t),
            tag::OBJECT => self.object(cell),
            tag::ERROR => self.error(cell),
            tag::FUNCTION => self.function(cell),
            tag::NATIVE => self.native(cell),
            _ => self.out.push_str("#[trash]"),
        }
    }

    fn text(&mut self, cell: &Cell, t: u8) {
        let text = self.heap.text_string(cell).unwrap_or_default();
        if self.mode == Mode::Form {
            if t == tag::TAG {
                let _ = write!(self.out, "<{text}>");
            } else {
                self.out.push_str(&text);
            }
            return;
        }
        match t {
            tag::STRING => {
                self.out.push('"');
                for c in text.chars() {
                    push_escaped(&mut self.out, c, '"');
                }
                self.out.push('"');
            }
            tag::FILE => {
                if text.contains(char::is_whitespace) {
                    self.out.push_str("%\"");
                    for c in text.chars() {
                        push_escaped(&mut self.out, c, '"');
                    }
                    self.out.push('"');
                } else {
                    let _ = write!(self.out, "%{text}");
                }
            }
            tag::TAG => {
                let _ = write!(self.out, "<{text}>");
            }
            _ => self.out.push_str(&text),
        }
    }

    fn word(&mut self, cell: &Cell, t: u8) {
        let name = self.heap.name(cell);
        if self.mode == Mode::Form {
            self.out.push_str(name);
            return;
        }
        let (prefix, suffix) = match t {
            tag::SET_WORD => ("", ":"),
            tag::GET_WORD => (":", ""),
            tag::LIT_WORD => ("'", ""),
            tag::REFINEMENT => ("/", ""),
            tag::ISSUE => ("#", ""),
            _ => ("", ""),
        };
        let _ = write!(self.out, "{prefix}{name}{suffix}");
    }

    fn array(&mut self, cell: &Cell, t: u8) {
        let id = layout::series_id(cell);
        let (open, sep, close) = match t {
            tag::BLOCK => ("[", " ", "]"),
            tag::PAREN => ("(", " ", ")"),
            tag::PATH => ("", "/", ""),
            tag::SET_PATH => ("", "/", ":"),
            tag::GET_PATH => (":", "/", ""),
            _ => ("'", "/", ""),
        };
        let is_path = sep == "/";
        let (open, close) = if self.mode == Mode::Form && !is_path {
            ("", "")
        } else {
            (open, close)
        };

        if self.series.contains(&id) {
            let _ = write!(self.out, "{open}...{close}");
            return;
        }
        let items = self.heap.array_items(cell).unwrap_or_default();

        self.series.push(id);
        self.out.push_str(open);
        ensure_sufficient_stack(|| {
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    self.out.push_str(sep);
                }
                if is_path && self.mode == Mode::Form {
                    // Path parts always print in source form.
                    let saved = self.mode;
                    self.mode = Mode::Mold;
                    self.value(item);
                    self.mode = saved;
                } else {
                    self.value(item);
                }
            }
        });
        self.out.push_str(close);
        self.series.pop();
    }

    fn fields(&mut self, frame: FrameId, separator: &str, skip_none: bool) {
        let Ok(f) = self.heap.frame(frame) else {
            return;
        };
        let pairs: Vec<_> = f.keys().iter().copied().zip(f.values().iter().copied()).collect();
        let saved = self.mode;
        let mut first = true;
        for (key, value) in pairs {
            if skip_none && layout::tag_of(&value) == tag::NONE {
                continue;
            }
            if !first {
                self.out.push_str(separator);
            }
            first = false;
            let _ = write!(self.out, "{}: ", self.heap.symbols.name(key));
            if saved == Mode::Form {
                self.mode = Mode::Mold;
            }
            if layout::tag_of(&value) == tag::WORD {
                self.out.push('\'');
            }
            ensure_sufficient_stack(|| self.value(&value));
            self.mode = saved;
        }
    }

    fn object(&mut self, cell: &Cell) {
        let frame = layout::frame_id(cell);
        if self.frames.contains(&frame) {
            self.out.push_str("make object! [...]");
            return;
        }
        self.frames.push(frame);
        if self.mode == Mode::Form {
            self.fields(frame, "\n", false);
        } else {
            self.out.push_str("make object! [");
            self.fields(frame, " ", false);
            self.out.push(']');
        }
        self.frames.pop();
    }

    fn error(&mut self, cell: &Cell) {
        if self.mode == Mode::Form {
            self.out.push_str(&self.heap.error_text(cell));
            return;
        }
        let frame = layout::frame_id(cell);
        self.out.push_str("make error! [");
        self.fields(frame, " ", true);
        self.out.push(']');
    }

    fn function(&mut self, cell: &Cell) {
        if self.mode == Mode::Form {
            self.out.push_str("?function?");
            return;
        }
        let Ok(node) = self.heap.func(layout::func_id(cell)) else {
            self.out.push_str("#[trash]");
            return;
        };
        let (spec, body) = (node.spec, node.body);
        self.out.push_str("make function! [");
        self.value(&spec);
        self.out.push(' ');
        self.value(&body);
        self.out.push(']');
    }

    fn native(&mut self, cell: &Cell) {
        if self.mode == Mode::Form {
            self.out.push_str("?native?");
            return;
        }
        let params = natives::lookup(layout::native_index(cell)).map_or(&[][..], |def| def.params);
        let _ = write!(self.out, "make native! [[{}]]", params.join(" "));
    }
}

fn push_escaped(out: &mut String, c: char, quote: char) {
    match c {
        '^' => out.push_str("^^"),
        '\n' => out.push_str("^/"),
        '\t' => out.push_str("^-"),
        c if c == quote => {
            out.push('^');
            out.push(c);
        }
        c if c.is_control() => {
            let _ = write!(out, "^({:02X})", u32::from(c));
        }
        c => out.push(c),
    }
}

#[cfg(test)]
mod tests;
