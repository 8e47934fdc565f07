//! The deadline parser. Drives the tokenizer over a document, builds
//! deadline sections from the tokens the guard lets through, reconciles
//! `moved` directives, and collects what every section has to report.

use chrono::{Local, NaiveDate, NaiveDateTime};
use tracing::debug;

use super::dates::{date_deadline, date_problems, time_deadline};
use super::guard::{Admission, Guard};
use super::ledger::MoveLedger;
use super::section::{Context, DeadlineSection, Origin, SectionId};
use super::tokenizer::{Token, TokenKind, Tokenizer};
use crate::language::{ChecklistItem, Diagnostic, Range, Settings, Severity};

pub const ONE_DATE_PER_LINE: &str = "Only one date per line is allowed.";

/// Observer of a parse. Every hook has an empty default so implementors
/// pick only the ones they need. Hooks run synchronously, in registration
/// order, inline with the parse.
pub trait ParserVisitor {
    fn on_parse_begin(&mut self) {}

    /// Called once all sections have been built and reconciled.
    fn on_parse_end(&mut self, _sections: &[DeadlineSection]) {}

    /// A line break was reached directly after the line holding a section's
    /// anchor. `line_end` is the column at which that line stopped.
    fn on_new_line_at_date(&mut self, _section: &DeadlineSection, _line: usize, _line_end: usize) {}

    /// The document ended on the line holding a section's anchor.
    fn on_end_line_at_date(&mut self, _section: &DeadlineSection, _line: usize, _line_end: usize) {}
}

pub struct Parser {
    settings: Settings,
    today: Option<NaiveDateTime>,
    visitors: Vec<Box<dyn ParserVisitor>>,
}

impl Parser {
    pub fn new(settings: Settings) -> Parser {
        Parser {
            settings,
            today: None,
            visitors: Vec::new(),
        }
    }

    /// Measure deadlines against a fixed instant rather than the clock.
    pub fn with_today(mut self, today: NaiveDateTime) -> Parser {
        self.today = Some(today);
        self
    }

    pub fn with_visitor(mut self, visitor: impl ParserVisitor + 'static) -> Parser {
        self.visitors
            .push(Box::new(visitor));
        self
    }

    pub fn settings(&self) -> Settings {
        self.settings
    }

    /// Scan `source` from scratch and return its diagnostics. Nothing is
    /// carried over from previous calls.
    pub fn parse(&mut self, source: &str) -> Vec<Diagnostic> {
        let now = self
            .today
            .unwrap_or_else(|| {
                Local::now().naive_local()
            });

        let context = Context {
            now,
            settings: self.settings,
        };

        for visitor in &mut self.visitors {
            visitor.on_parse_begin();
        }

        let mut pass = Pass::new(context);

        for token in Tokenizer::new(source) {
            if pass
                .guard
                .admit(&token)
                == Admission::Consumed
            {
                continue;
            }

            match token.kind {
                TokenKind::Date => pass.take_date(&token),
                TokenKind::Time => pass.take_time(&token),
                TokenKind::TodoItem => pass.take_item(&token, false),
                TokenKind::FinishedTodoItem => pass.take_item(&token, true),
                TokenKind::SectionEndIdent => {
                    debug!(line = token.line, "Section ended");
                    pass.guard
                        .close_section();
                }
                TokenKind::Newline => {
                    if let Some(section) = pass.section_on(token.line) {
                        for visitor in &mut self.visitors {
                            visitor.on_new_line_at_date(section, token.line, token.start);
                        }
                    }
                }
                TokenKind::LineEnd => {
                    if let Some(section) = pass.section_on(token.line) {
                        for visitor in &mut self.visitors {
                            visitor.on_end_line_at_date(section, token.line, token.start);
                        }
                    }
                }
                _ => {}
            }
        }

        let (sections, diagnostics) = pass.finish();

        for visitor in &mut self.visitors {
            visitor.on_parse_end(&sections);
        }

        diagnostics
    }
}

/// State belonging to a single call to parse.
struct Pass {
    guard: Guard,
    ledger: MoveLedger,
    sections: Vec<DeadlineSection>,
    diagnostics: Vec<Diagnostic>,
    context: Context,
}

impl Pass {
    fn new(context: Context) -> Pass {
        Pass {
            guard: Guard::new(),
            ledger: MoveLedger::new(),
            sections: Vec::new(),
            diagnostics: Vec::new(),
            context,
        }
    }

    /// The most recent section, if its anchor is on `line`.
    fn section_on(&self, line: usize) -> Option<&DeadlineSection> {
        self.sections
            .last()
            .filter(|section| section.line() == line)
    }

    /// Times without a date on their line borrow the date of the most
    /// recent section, or today's if there is none yet.
    fn base_date(&self) -> NaiveDate {
        match self
            .sections
            .last()
        {
            Some(section) => section.date(),
            None => self
                .context
                .now
                .date(),
        }
    }

    fn take_date(&mut self, token: &Token) {
        // the date inside a moved directive names where items go
        if self
            .guard
            .awaiting_move_target(token.line)
        {
            debug!(target_date = token.text, "Move target");
            self.guard
                .set_move_target(token.text);
            return;
        }

        if self.is_second_on_line(token) {
            return;
        }

        let instant = match date_deadline(token.text) {
            Some(instant) => instant,
            None => {
                debug!(date = token.text, "Date out of range");
                return;
            }
        };

        let problems = date_problems(token.text, self.context.now.date());
        if !problems.is_empty() {
            debug!(date = token.text, ?problems, "Questionable date");
        }

        self.open(token, Origin::Date, instant);
    }

    fn take_time(&mut self, token: &Token) {
        if let Some(section) = self
            .sections
            .last_mut()
        {
            if section.line() == token.line {
                let instant = time_deadline(section.date(), token.text);
                debug!(line = token.line, %instant, "Time applied to section");
                section.set_time(instant, token.end);
                return;
            }
        }

        let instant = time_deadline(self.base_date(), token.text);
        self.open(token, Origin::Time, instant);
    }

    fn is_second_on_line(&mut self, token: &Token) -> bool {
        if self
            .section_on(token.line)
            .is_none()
        {
            return false;
        }

        debug!(line = token.line, column = token.start, "Second date on line");
        self.diagnostics
            .push(Diagnostic::new(
                Range::on_line(token.line, token.start, token.end),
                ONE_DATE_PER_LINE,
                Severity::Hint,
            ));
        true
    }

    fn open(&mut self, token: &Token, origin: Origin, instant: NaiveDateTime) {
        let id = SectionId(
            self.sections
                .len(),
        );
        let skip = self
            .guard
            .take_skip();
        let moved = self
            .guard
            .take_move();

        if let Some(detail) = &moved {
            self.ledger
                .register_transfer(&detail.target, id);
        }
        self.ledger
            .register_account(token.text, id);

        debug!(line = token.line, key = token.text, %instant, skip, moved = moved.is_some(), "Section opened");

        let section = DeadlineSection::new(
            id,
            origin,
            token.text,
            Range::on_line(token.line, token.start, token.end),
            instant,
            self.context,
        )
        .skipped(skip)
        .moving(moved);

        self.sections
            .push(section);
        self.guard
            .open_section();
    }

    fn take_item(&mut self, token: &Token, checked: bool) {
        if !self
            .guard
            .is_parsing_section_items()
        {
            return;
        }

        if let Some(section) = self
            .sections
            .last_mut()
        {
            section.add_item(ChecklistItem {
                text: token
                    .text
                    .to_string(),
                line: token.line,
                column: token.start,
                end: token.end,
                checked,
            });
        }
    }

    fn finish(mut self) -> (Vec<DeadlineSection>, Vec<Diagnostic>) {
        self.ledger
            .validate_transfers(&mut self.sections);

        for section in &self.sections {
            section.report(&mut self.diagnostics);
        }

        debug!(
            sections = self
                .sections
                .len(),
            diagnostics = self
                .diagnostics
                .len(),
            "Parse complete"
        );

        (self.sections, self.diagnostics)
    }
}
