//! Suppression and directive state layered over the token stream.
//!
//! Whether the scan is inside a code block or a comment is one axis, held
//! in [`Mode`]. Pending `skip` and `moved` directives, and whether
//! checklist items are currently being attributed to a section, are
//! independent of it and tracked alongside.

use tracing::debug;

use super::section::MoveDetail;
use super::tokenizer::{Token, TokenKind};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Normal,
    CodeBlock,
    Comment,
}

/// A `moved` directive waiting for the section it applies to. The target is
/// the date written inside the directive, filled in once that date token
/// arrives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingMove {
    pub line: usize,
    pub start: usize,
    pub end: usize,
    pub target: Option<String>,
}

/// What the guard decided about a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// The guard used or discarded the token; the parser should not see it.
    Consumed,
    /// The parser should act on the token.
    Admitted,
}

#[derive(Debug, Default)]
pub struct Guard {
    mode: Mode,
    skip: bool,
    pending_move: Option<PendingMove>,
    parsing_items: bool,
}

impl Guard {
    pub fn new() -> Guard {
        Guard::default()
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Route a token through the suppression state. The end of input always
    /// gets through and `skip` or `moved` directives always take effect.
    /// Otherwise inside a code block only the closing fence matters, and
    /// inside a comment only the closing delimiter does.
    pub fn admit(&mut self, token: &Token) -> Admission {
        match token.kind {
            TokenKind::LineEnd => return Admission::Admitted,
            TokenKind::SkipIdent | TokenKind::MovedIdent => return self.admit_directive(token),
            _ => {}
        }

        match self.mode {
            Mode::CodeBlock => {
                if token.kind == TokenKind::TripleBackTick {
                    self.mode = Mode::Normal;
                }
                Admission::Consumed
            }
            Mode::Comment => {
                if token.kind == TokenKind::CommentEnd {
                    self.mode = Mode::Normal;
                }
                Admission::Consumed
            }
            Mode::Normal => self.admit_normally(token),
        }
    }

    fn admit_normally(&mut self, token: &Token) -> Admission {
        match token.kind {
            TokenKind::TripleBackTick => {
                self.mode = Mode::CodeBlock;
                Admission::Consumed
            }
            TokenKind::CommentStart => {
                self.mode = Mode::Comment;
                Admission::Consumed
            }
            TokenKind::CommentEnd => Admission::Consumed,
            _ => Admission::Admitted,
        }
    }

    fn admit_directive(&mut self, token: &Token) -> Admission {
        match token.kind {
            TokenKind::SkipIdent => {
                debug!(line = token.line, "Skipping next section");
                self.skip = true;
                Admission::Consumed
            }
            TokenKind::MovedIdent => {
                debug!(line = token.line, "Moving next section");
                self.pending_move = Some(PendingMove {
                    line: token.line,
                    start: token.start,
                    end: token.end,
                    target: None,
                });
                Admission::Consumed
            }
            _ => Admission::Consumed,
        }
    }

    /// Is a `moved` directive on `line` still waiting to learn its target?
    pub fn awaiting_move_target(&self, line: usize) -> bool {
        match &self.pending_move {
            Some(pending) => pending.line == line && pending.target.is_none(),
            None => false,
        }
    }

    pub fn set_move_target(&mut self, target: &str) {
        if let Some(pending) = &mut self.pending_move {
            pending.target = Some(target.to_string());
        }
    }

    /// Hand the pending skip to the section being opened, clearing it.
    pub fn take_skip(&mut self) -> bool {
        std::mem::take(&mut self.skip)
    }

    /// Hand the pending move to the section being opened, clearing it. A
    /// directive whose target never arrived is dropped.
    pub fn take_move(&mut self) -> Option<MoveDetail> {
        let pending = self
            .pending_move
            .take()?;

        pending
            .target
            .map(|target| MoveDetail {
                target,
                line: pending.line,
                start: pending.start,
                end: pending.end,
            })
    }

    pub fn open_section(&mut self) {
        self.parsing_items = true;
    }

    pub fn close_section(&mut self) {
        self.parsing_items = false;
    }

    pub fn is_parsing_section_items(&self) -> bool {
        self.parsing_items
    }
}
