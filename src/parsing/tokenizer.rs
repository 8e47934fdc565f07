//! Single pass scanner turning document text into a stream of tokens.
//!
//! The scanner only recognizes the handful of micro-grammars the deadline
//! parser cares about: dates, times, checklist markers, same-line HTML
//! comments (and the directives inside them), and code fences. Everything
//! else is stepped over one character at a time.
//!
//! All the patterns are ASCII, so scanning proceeds over bytes. Columns are
//! counted in characters: continuation bytes of a multi-byte UTF-8 sequence
//! do not advance the column.

use std::collections::VecDeque;

/// A predicate over a single byte of input.
type Classifier = fn(u8) -> bool;

// character classifier

fn is_digit(c: u8) -> bool {
    c.is_ascii_digit()
}

fn is_slash(c: u8) -> bool {
    c == b'/'
}

fn is_colon(c: u8) -> bool {
    c == b':'
}

fn is_space(c: u8) -> bool {
    c == b' '
}

fn is_bullet(c: u8) -> bool {
    c == b'-' || c == b'+'
}

fn is_open_bracket(c: u8) -> bool {
    c == b'['
}

fn is_close_bracket(c: u8) -> bool {
    c == b']'
}

fn is_checked(c: u8) -> bool {
    c == b'x' || c == b'X'
}

fn is_check_mark(c: u8) -> bool {
    is_checked(c) || is_space(c)
}

fn is_hour_suffix(c: u8) -> bool {
    c == b'h'
}

fn is_minute_suffix(c: u8) -> bool {
    c == b'm'
}

pub(crate) fn is_line_break(c: u8) -> bool {
    c == b'\n' || c == b'\r'
}

fn is_whitespace(c: u8) -> bool {
    is_space(c) || c == b'\t' || is_line_break(c)
}

fn is_continuation(c: u8) -> bool {
    c & 0xC0 == 0x80
}

// pattern tables

/// `dd/mm/yyyy`
static DATE: [Classifier; 10] = [
    is_digit, is_digit, is_slash, is_digit, is_digit, is_slash, is_digit, is_digit, is_digit,
    is_digit,
];

/// `hh:mm`
static TIME: [Classifier; 5] = [is_digit, is_digit, is_colon, is_digit, is_digit];

/// `hhh:mmm`, that is hours and minutes each with their unit letter: `09h:30m`
static TIME_WITH_UNITS: [Classifier; 7] = [
    is_digit,
    is_digit,
    is_hour_suffix,
    is_colon,
    is_digit,
    is_digit,
    is_minute_suffix,
];

/// `- [ ] `, `- [x] `, `- [X] ` and the same led by `+`
static CHECKLIST_MARKER: [Classifier; 6] = [
    is_bullet,
    is_space,
    is_open_bracket,
    is_check_mark,
    is_close_bracket,
    is_space,
];

/// Offset of the check mark within a checklist marker.
const CHECK_MARK: usize = 3;

const COMMENT_START: &str = "<!--";
const COMMENT_END: &str = "-->";
const CODE_FENCE: &str = "```";

const SECTION_END_DIRECTIVE: &str = " end section ";
const SKIP_DIRECTIVE: &str = " skip ";
const MOVED_DIRECTIVE: &str = " moved ";

/// Does the start of `bytes` satisfy every classifier in `table`?
fn fits(table: &[Classifier], bytes: &[u8]) -> bool {
    bytes.len() >= table.len()
        && table
            .iter()
            .zip(bytes)
            .all(|(classify, c)| classify(*c))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Newline,
    Date,
    Time,
    TodoItem,
    FinishedTodoItem,
    /// Always the last token produced.
    LineEnd,
    TripleBackTick,
    CommentStart,
    CommentEnd,
    SectionEndIdent,
    SkipIdent,
    MovedIdent,
}

/// A token along with the text it matched and where it sits. For checklist
/// items `text` is what follows the marker while `start` is the column of
/// the marker itself. Directive tokens span their whole comment. A newline
/// token sits at the end of the line it terminates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'i> {
    pub kind: TokenKind,
    pub text: &'i str,
    pub line: usize,
    pub start: usize,
    pub end: usize,
}

/// Scanning position. The snapshot of the previous line and column is taken
/// at every line break so that the end of the line just finished can be
/// recovered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    pub line: usize,
    pub line_offset: usize,
    pub position: usize,
    pub previous_line: usize,
    pub previous_line_offset: usize,
}

impl Cursor {
    fn advance(&mut self, bytes: &[u8]) {
        if let Some(&c) = bytes.get(self.position) {
            self.position += 1;
            if !is_continuation(c) {
                self.line_offset += 1;
            }
        }
    }

    fn advance_by(&mut self, bytes: &[u8], width: usize) {
        for _ in 0..width {
            self.advance(bytes);
        }
    }

    /// Step through `table`, consuming each character that satisfies its
    /// classifier. On failure the cursor is left on the offending
    /// character, which has not been consumed.
    fn probe(&mut self, bytes: &[u8], table: &[Classifier]) -> bool {
        for classify in table {
            match bytes.get(self.position) {
                Some(&c) if classify(c) => self.advance(bytes),
                _ => return false,
            }
        }
        true
    }

    fn line_break(&mut self, bytes: &[u8]) {
        let first = bytes[self.position];
        self.position += 1;

        // \r\n counts as a single break
        if first == b'\r' && bytes.get(self.position) == Some(&b'\n') {
            self.position += 1;
        }

        self.previous_line = self.line;
        self.previous_line_offset = self.line_offset;
        self.line += 1;
        self.line_offset = 0;
    }
}

/// Lazy, non-restartable token sequence over one document. Construct a new
/// one for every pass.
#[derive(Debug)]
pub struct Tokenizer<'i> {
    source: &'i str,
    bytes: &'i [u8],
    cursor: Cursor,
    pending: VecDeque<Token<'i>>,
    finished: bool,
}

impl<'i> Tokenizer<'i> {
    pub fn new(source: &'i str) -> Tokenizer<'i> {
        Tokenizer {
            source,
            bytes: source.as_bytes(),
            cursor: Cursor::default(),
            pending: VecDeque::new(),
            finished: false,
        }
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    fn peek(&self, ahead: usize) -> Option<u8> {
        self.bytes
            .get(self.cursor.position + ahead)
            .copied()
    }

    fn looking_at(&self, literal: &str) -> bool {
        self.bytes[self.cursor.position..].starts_with(literal.as_bytes())
    }

    fn token_since(&self, kind: TokenKind, begin: Cursor) -> Token<'i> {
        Token {
            kind,
            text: &self.source[begin.position..self.cursor.position],
            line: begin.line,
            start: begin.line_offset,
            end: self.cursor.line_offset,
        }
    }

    fn take_line_break(&mut self) -> Token<'i> {
        let begin = self.cursor;
        self.cursor
            .line_break(self.bytes);

        Token {
            kind: TokenKind::Newline,
            text: &self.source[begin.position..self.cursor.position],
            line: self
                .cursor
                .previous_line,
            start: self
                .cursor
                .previous_line_offset,
            end: self
                .cursor
                .previous_line_offset,
        }
    }

    fn take_pattern(&mut self, kind: TokenKind, table: &[Classifier]) -> Option<Token<'i>> {
        let begin = self.cursor;
        if self
            .cursor
            .probe(self.bytes, table)
        {
            Some(self.token_since(kind, begin))
        } else {
            None
        }
    }

    /// The character two or three ahead tells a time apart from a date.
    fn take_date_or_time(&mut self) -> Option<Token<'i>> {
        if self.peek(2) == Some(b':') {
            self.take_time(&TIME)
        } else if self.peek(3) == Some(b':') {
            self.take_time(&TIME_WITH_UNITS)
        } else {
            self.take_pattern(TokenKind::Date, &DATE)
        }
    }

    /// A time only counts if it stands alone, with whitespace (or the edge
    /// of the document) on either side.
    fn take_time(&mut self, table: &[Classifier]) -> Option<Token<'i>> {
        let before = self
            .cursor
            .position
            .checked_sub(1)
            .map(|i| self.bytes[i]);

        let token = self.take_pattern(TokenKind::Time, table)?;
        let after = self.peek(0);

        if before.map_or(true, is_whitespace) && after.map_or(true, is_whitespace) {
            Some(token)
        } else {
            None
        }
    }

    fn take_checklist_item(&mut self) -> Option<Token<'i>> {
        let begin = self.cursor;
        if !self
            .cursor
            .probe(self.bytes, &CHECKLIST_MARKER)
        {
            return None;
        }

        let kind = if is_checked(self.bytes[begin.position + CHECK_MARK]) {
            TokenKind::FinishedTodoItem
        } else {
            TokenKind::TodoItem
        };

        let from = self
            .cursor
            .position;
        while let Some(c) = self.peek(0) {
            if is_line_break(c) {
                break;
            }
            self.cursor
                .advance(self.bytes);
        }

        // a marker with nothing after it is not a checklist item
        if self
            .cursor
            .position
            == from
        {
            return None;
        }

        Some(Token {
            kind,
            text: &self.source[from..self.cursor.position],
            line: begin.line,
            start: begin.line_offset,
            end: self
                .cursor
                .line_offset,
        })
    }

    /// Emits the comment start immediately. If the comment closes on the
    /// same line, the end delimiter and any directive found in the body are
    /// queued up behind it and the body is consumed.
    fn take_comment(&mut self) -> Token<'i> {
        let begin = self.cursor;
        self.cursor
            .advance_by(self.bytes, COMMENT_START.len());
        let start = self.token_since(TokenKind::CommentStart, begin);

        let rest = &self.source[self.cursor.position..];
        let width = rest
            .find(&['\n', '\r'][..])
            .unwrap_or(rest.len());

        if let Some(i) = rest[..width].find(COMMENT_END) {
            let body = &rest[..i];
            let inside = self.cursor;

            self.cursor
                .advance_by(self.bytes, i);
            let closing = self.cursor;
            self.cursor
                .advance_by(self.bytes, COMMENT_END.len());

            let end = self.token_since(TokenKind::CommentEnd, closing);
            self.pending
                .push_back(end);

            self.classify_directive(body, begin, inside);
        }

        start
    }

    fn classify_directive(&mut self, body: &'i str, begin: Cursor, inside: Cursor) {
        let end = self
            .cursor
            .line_offset;
        let directive = |kind| Token {
            kind,
            text: body,
            line: begin.line,
            start: begin.line_offset,
            end,
        };

        if body == SECTION_END_DIRECTIVE {
            let token = directive(TokenKind::SectionEndIdent);
            self.pending
                .push_back(token);
        } else if body == SKIP_DIRECTIVE {
            let token = directive(TokenKind::SkipIdent);
            self.pending
                .push_back(token);
        } else if let Some(rest) = body.strip_prefix(MOVED_DIRECTIVE) {
            if !fits(&DATE, rest.as_bytes()) {
                return;
            }
            let token = directive(TokenKind::MovedIdent);

            // the prefix is ASCII so its width in columns is its length
            let start = inside.line_offset + MOVED_DIRECTIVE.len();
            let date = Token {
                kind: TokenKind::Date,
                text: &rest[..DATE.len()],
                line: begin.line,
                start,
                end: start + DATE.len(),
            };

            self.pending
                .push_back(token);
            self.pending
                .push_back(date);
        }
    }

    fn take_code_fence(&mut self) -> Token<'i> {
        let begin = self.cursor;
        self.cursor
            .advance_by(self.bytes, CODE_FENCE.len());
        self.token_since(TokenKind::TripleBackTick, begin)
    }
}

impl<'i> Iterator for Tokenizer<'i> {
    type Item = Token<'i>;

    fn next(&mut self) -> Option<Token<'i>> {
        if let Some(token) = self
            .pending
            .pop_front()
        {
            return Some(token);
        }

        if self.finished {
            return None;
        }

        // every branch consumes at least one character, so this terminates
        while let Some(c) = self.peek(0) {
            let token = if is_line_break(c) {
                Some(self.take_line_break())
            } else if is_digit(c) {
                self.take_date_or_time()
            } else if is_bullet(c) {
                self.take_checklist_item()
            } else if self.looking_at(COMMENT_START) {
                Some(self.take_comment())
            } else if self.looking_at(CODE_FENCE) {
                Some(self.take_code_fence())
            } else {
                self.cursor
                    .advance(self.bytes);
                None
            };

            if token.is_some() {
                return token;
            }
        }

        self.finished = true;

        Some(Token {
            kind: TokenKind::LineEnd,
            text: "",
            line: self
                .cursor
                .line,
            start: self
                .cursor
                .line_offset,
            end: self
                .cursor
                .line_offset,
        })
    }
}

#[cfg(test)]
#[path = "checks/tokenizer.rs"]
mod check;
