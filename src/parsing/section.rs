//! A deadline section: one date (or time) anchor and the checklist items
//! written beneath it.

use std::collections::HashSet;

use chrono::{NaiveDate, NaiveDateTime};

use super::dates::{classify, Verdict};
use crate::language::{ChecklistItem, Diagnostic, Range, Settings, Severity};

pub const NOT_ALL_MOVED: &str = "Not all items are moved to the new date.";
pub const ITEM_NOT_MOVED: &str = "This item is not moved to the new date.";
pub const MOVED_TO_ITSELF: &str = "A date cannot move its items to itself...";

/// Stable handle of a section within one parse. Sections are stored in
/// creation order and the handle is the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SectionId(pub usize);

/// What kind of token opened the section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Date,
    Time,
}

/// Where a `moved` directive was written and which date it moves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveDetail {
    pub target: String,
    pub line: usize,
    pub start: usize,
    pub end: usize,
}

impl MoveDetail {
    pub fn range(&self) -> Range {
        Range::on_line(self.line, self.start, self.end)
    }
}

/// The moment deadlines are measured against, and the thresholds to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Context {
    pub now: NaiveDateTime,
    pub settings: Settings,
}

#[derive(Debug, Clone)]
pub struct DeadlineSection {
    id: SectionId,
    origin: Origin,
    key: String,
    range: Range,
    instant: NaiveDateTime,
    context: Context,
    items: Vec<ChecklistItem>,
    texts: HashSet<String>,
    verdict: Option<Verdict>,
    seen_unchecked: bool,
    skip: bool,
    moved: Option<MoveDetail>,
}

impl DeadlineSection {
    /// A section anchored at `range`, keyed by the anchor's literal text.
    /// The verdict is computed straight away.
    pub fn new(
        id: SectionId,
        origin: Origin,
        key: &str,
        range: Range,
        instant: NaiveDateTime,
        context: Context,
    ) -> DeadlineSection {
        let mut section = DeadlineSection {
            id,
            origin,
            key: key.to_string(),
            range,
            instant,
            context,
            items: Vec::new(),
            texts: HashSet::new(),
            verdict: None,
            seen_unchecked: false,
            skip: false,
            moved: None,
        };
        section.run_diagnostic_check();
        section
    }

    pub fn skipped(mut self, skip: bool) -> DeadlineSection {
        self.skip = skip;
        self
    }

    pub fn moving(mut self, moved: Option<MoveDetail>) -> DeadlineSection {
        self.moved = moved;
        self
    }

    pub fn run_diagnostic_check(&mut self) -> Option<&Verdict> {
        self.verdict = classify(self.instant, self.context.now, &self.context.settings);
        self.verdict
            .as_ref()
    }

    /// A time later on the anchor line replaces the instant and stretches
    /// the anchor through to the end of the time.
    pub fn set_time(&mut self, instant: NaiveDateTime, end: usize) {
        self.instant = instant;
        self.range
            .end
            .column = end;
        self.run_diagnostic_check();
    }

    pub fn add_item(&mut self, item: ChecklistItem) {
        if !item.checked {
            self.seen_unchecked = true;
        }
        self.texts
            .insert(item.text.clone());
        self.items
            .push(item);
    }

    /// Drop every unchecked item that also appears in `moved`, the item
    /// texts of the section these were meant to be moved into. What is left
    /// over failed to move.
    pub fn retain_unmoved(&mut self, moved: &HashSet<String>) {
        self.items
            .retain(|item| item.checked || !moved.contains(&item.text));
    }

    pub fn id(&self) -> SectionId {
        self.id
    }

    pub fn origin(&self) -> Origin {
        self.origin
    }

    /// The literal anchor text, used to look sections up by date.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The line the anchor is on.
    pub fn line(&self) -> usize {
        self.range
            .start
            .line
    }

    pub fn range(&self) -> Range {
        self.range
    }

    pub fn instant(&self) -> NaiveDateTime {
        self.instant
    }

    pub fn date(&self) -> NaiveDate {
        self.instant
            .date()
    }

    pub fn items(&self) -> &[ChecklistItem] {
        &self.items
    }

    pub fn item_texts(&self) -> &HashSet<String> {
        &self.texts
    }

    pub fn has_items(&self) -> bool {
        !self
            .items
            .is_empty()
    }

    /// True once an unchecked item has been added, provided there are
    /// still items left.
    pub fn has_unfinished_items(&self) -> bool {
        self.seen_unchecked && self.has_items()
    }

    pub fn verdict(&self) -> Option<&Verdict> {
        self.verdict
            .as_ref()
    }

    /// The anchor's own diagnostic, if the deadline warrants one.
    pub fn diagnostic(&self) -> Option<Diagnostic> {
        self.verdict
            .as_ref()
            .map(|verdict| Diagnostic::new(self.range, verdict.message.clone(), verdict.severity))
    }

    pub fn is_skipped(&self) -> bool {
        self.skip
    }

    pub fn move_detail(&self) -> Option<&MoveDetail> {
        self.moved
            .as_ref()
    }

    pub fn is_registered_for_extraction(&self) -> bool {
        self.moved
            .is_some()
    }

    /// Append this section's diagnostics to `out`.
    pub fn report(&self, out: &mut Vec<Diagnostic>) {
        if self.is_skipped() || !self.has_unfinished_items() {
            return;
        }

        match self.move_detail() {
            Some(moved) => self.report_move(moved, out),
            None => self.report_deadline(out),
        }
    }

    fn report_move(&self, moved: &MoveDetail, out: &mut Vec<Diagnostic>) {
        let mut unchecked = self
            .items
            .iter()
            .filter(|item| !item.checked)
            .peekable();

        if unchecked
            .peek()
            .is_none()
        {
            return;
        }

        let message = if moved.target == self.key {
            MOVED_TO_ITSELF
        } else {
            NOT_ALL_MOVED
        };
        out.push(Diagnostic::new(
            moved.range(),
            message,
            Severity::Information,
        ));

        for item in unchecked {
            out.push(Diagnostic::new(
                item.range(),
                ITEM_NOT_MOVED,
                Severity::Information,
            ));
        }
    }

    fn report_deadline(&self, out: &mut Vec<Diagnostic>) {
        let anchor = match self.diagnostic() {
            Some(anchor) => anchor,
            None => return,
        };
        let message = anchor
            .message
            .clone();
        let severity = anchor.severity;
        out.push(anchor);

        for item in &self.items {
            if item.checked {
                continue;
            }
            out.push(Diagnostic::new(item.range(), message.clone(), severity));
        }
    }
}
