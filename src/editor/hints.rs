//! Inline annotations painted after the line of each date: which weekday
//! it falls on and, where it applies, whether the section is done.

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use chrono::NaiveDate;
use deadlines::parsing::section::{Origin, SectionId};
use deadlines::parsing::{DeadlineSection, ParserVisitor};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    pub line: usize,
    pub column: usize,
    pub label: String,
}

/// Collects the end of every date line during a parse and resolves the
/// labels once the parse is over, when moves have been reconciled.
pub struct Annotator {
    today: NaiveDate,
    seen: Vec<(SectionId, usize, usize)>,
    results: Rc<RefCell<Vec<Annotation>>>,
}

impl Annotator {
    pub fn new(today: NaiveDate) -> Annotator {
        Annotator {
            today,
            seen: Vec::new(),
            results: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Handle onto the annotations, still readable after the annotator has
    /// been handed to a parser.
    pub fn shared(&self) -> Rc<RefCell<Vec<Annotation>>> {
        Rc::clone(&self.results)
    }

    fn record(&mut self, section: &DeadlineSection, line: usize, line_end: usize) {
        if self
            .seen
            .iter()
            .any(|(_, seen, _)| *seen == line)
        {
            return;
        }
        self.seen
            .push((section.id(), line, line_end));
    }
}

pub fn label(section: &DeadlineSection, today: NaiveDate) -> String {
    let date = section.date();

    let mut label = String::new();
    if date == today {
        label.push_str("Today ");
    }
    label.push_str(&format!("({})", date.format("%A")));

    if !section.has_items() {
        if section.is_registered_for_extraction() {
            label.push_str(" All items moved");
        }
    } else if !section.has_unfinished_items() {
        label.push_str(" Done");
    }

    label
}

impl ParserVisitor for Annotator {
    fn on_parse_begin(&mut self) {
        self.seen
            .clear();
        self.results
            .borrow_mut()
            .clear();
    }

    fn on_new_line_at_date(&mut self, section: &DeadlineSection, line: usize, line_end: usize) {
        self.record(section, line, line_end);
    }

    fn on_end_line_at_date(&mut self, section: &DeadlineSection, line: usize, line_end: usize) {
        self.record(section, line, line_end);
    }

    fn on_parse_end(&mut self, sections: &[DeadlineSection]) {
        let mut lines = HashSet::new();
        let mut results = self
            .results
            .borrow_mut();

        for (id, line, column) in &self.seen {
            let section = match sections.get(id.0) {
                Some(section) => section,
                None => continue,
            };
            if section.origin() == Origin::Time || !lines.insert(*line) {
                continue;
            }

            results.push(Annotation {
                line: *line,
                column: *column,
                label: label(section, self.today),
            });
        }
    }
}
