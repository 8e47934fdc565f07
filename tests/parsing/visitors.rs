#[cfg(test)]
mod verify {
    use std::cell::RefCell;
    use std::rc::Rc;

    use chrono::NaiveDate;
    use deadlines::language::Settings;
    use deadlines::parsing::{DeadlineSection, Parser, ParserVisitor};

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Event {
        Begin,
        NewLine(NaiveDate, usize, usize),
        EndLine(NaiveDate, usize, usize),
        End(usize),
    }

    struct Recorder {
        events: Rc<RefCell<Vec<Event>>>,
    }

    impl ParserVisitor for Recorder {
        fn on_parse_begin(&mut self) {
            self.events
                .borrow_mut()
                .push(Event::Begin);
        }

        fn on_parse_end(&mut self, sections: &[DeadlineSection]) {
            self.events
                .borrow_mut()
                .push(Event::End(sections.len()));
        }

        fn on_new_line_at_date(&mut self, section: &DeadlineSection, line: usize, line_end: usize) {
            self.events
                .borrow_mut()
                .push(Event::NewLine(section.date(), line, line_end));
        }

        fn on_end_line_at_date(&mut self, section: &DeadlineSection, line: usize, line_end: usize) {
            self.events
                .borrow_mut()
                .push(Event::EndLine(section.date(), line, line_end));
        }
    }

    fn record(input: &str) -> Vec<Event> {
        let events = Rc::new(RefCell::new(Vec::new()));
        let today = NaiveDate::from_ymd_opt(1997, 8, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();

        let mut parser = Parser::new(Settings::default())
            .with_today(today)
            .with_visitor(Recorder {
                events: Rc::clone(&events),
            });
        parser.parse(input);

        let result = events
            .borrow()
            .clone();
        result
    }

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn single_date() {
        assert_eq!(
            record("01/06/1997   \n- [ ] Something"),
            vec![
                Event::Begin,
                Event::NewLine(date(1997, 6, 1), 0, 13),
                Event::End(1)
            ]
        );
    }

    #[test]
    fn multiple_dates() {
        assert_eq!(
            record("01/06/1997   \nhello\n31/12/1997"),
            vec![
                Event::Begin,
                Event::NewLine(date(1997, 6, 1), 0, 13),
                Event::EndLine(date(1997, 12, 31), 2, 10),
                Event::End(2)
            ]
        );
    }

    #[test]
    fn not_within_code_block() {
        assert_eq!(
            record("```01/06/1997   ```\nhello"),
            vec![Event::Begin, Event::End(0)]
        );
        assert_eq!(
            record("```\n01/06/1997\n```"),
            vec![Event::Begin, Event::End(0)]
        );
    }

    #[test]
    fn not_within_comment() {
        assert_eq!(
            record("<!-- 01/06/1997 -->\nhello"),
            vec![Event::Begin, Event::End(0)]
        );
    }

    #[test]
    fn date_line_with_time() {
        assert_eq!(
            record("01/06/1997 10:30\n"),
            vec![
                Event::Begin,
                Event::NewLine(date(1997, 6, 1), 0, 16),
                Event::End(1)
            ]
        );
    }

    #[test]
    fn each_parse_notifies() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let mut parser = Parser::new(Settings::default()).with_visitor(Recorder {
            events: Rc::clone(&events),
        });

        parser.parse("");
        parser.parse("");

        assert_eq!(
            *events.borrow(),
            vec![Event::Begin, Event::End(0), Event::Begin, Event::End(0)]
        );
    }
}
