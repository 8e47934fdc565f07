#[cfg(test)]
mod verify {
    use chrono::{NaiveDate, NaiveDateTime};
    use deadlines::language::{Diagnostic, Range, Settings, Severity};
    use deadlines::parsing::Parser;

    fn today() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(1997, 8, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn parse(input: &str) -> Vec<Diagnostic> {
        Parser::new(Settings {
            critical: 2,
            deadline_approaching: 4,
        })
        .with_today(today())
        .parse(input)
    }

    fn severities(input: &str) -> Vec<Severity> {
        parse(input)
            .iter()
            .map(|diagnostic| diagnostic.severity)
            .collect()
    }

    #[test]
    fn date_without_items_is_quiet() {
        assert_eq!(parse("01/06/1997"), vec![]);
        assert_eq!(parse("01/06/1997\n\nsome text"), vec![]);
    }

    #[test]
    fn overdue_date_and_item() {
        let diagnostics = parse("01/06/1997\n- [ ] task");

        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics[0].range, Range::on_line(0, 0, 10));
        // the item spans its own text, `- [ ] task`, so it ends at 10, not 12
        assert_eq!(diagnostics[1].range, Range::on_line(1, 0, 10));
        assert!(diagnostics
            .iter()
            .all(|diagnostic| diagnostic.severity == Severity::Error));
        assert_eq!(diagnostics[0].message, "Overdue: 60 days past deadline");
    }

    #[test]
    fn severity_escalates() {
        let item = "\n- [ ] task";

        assert_eq!(
            severities(&format!("05/08/1997{}", item)),
            vec![]
        );
        assert_eq!(
            severities(&format!("04/08/1997{}", item)),
            vec![Severity::Information, Severity::Information]
        );
        assert_eq!(
            severities(&format!("03/08/1997{}", item)),
            vec![Severity::Information, Severity::Information]
        );
        assert_eq!(
            severities(&format!("02/08/1997{}", item)),
            vec![Severity::Warning, Severity::Warning]
        );
        assert_eq!(
            severities(&format!("01/08/1997{}", item)),
            vec![Severity::Warning, Severity::Warning]
        );
        assert_eq!(
            severities(&format!("31/07/1997{}", item)),
            vec![Severity::Error, Severity::Error]
        );
    }

    #[test]
    fn checked_items_never_diagnosed() {
        let input = "01/06/1997\n- [x] done\n- [ ] open\n- [X] also done";
        let diagnostics = parse(input);

        let lines: Vec<usize> = diagnostics
            .iter()
            .map(|diagnostic| {
                diagnostic
                    .range
                    .start
                    .line
            })
            .collect();
        assert_eq!(lines, vec![0, 2]);
    }

    #[test]
    fn all_items_checked_is_quiet() {
        assert_eq!(parse("01/06/1997\n- [x] one\n+ [X] two"), vec![]);
    }

    #[test]
    fn one_date_per_line() {
        let diagnostics = parse("30/07/1997 01/08/1997");
        assert_eq!(
            diagnostics,
            vec![Diagnostic::new(
                Range::on_line(0, 11, 21),
                "Only one date per line is allowed.",
                Severity::Hint
            )]
        );
    }

    #[test]
    fn second_date_opens_no_section() {
        // items belong to the first date on the line
        let diagnostics = parse("30/07/1997 09/09/1997\n- [ ] task");
        assert_eq!(diagnostics.len(), 3);
        assert_eq!(diagnostics[0].severity, Severity::Hint);
        assert_eq!(diagnostics[1].range, Range::on_line(0, 0, 10));
        assert_eq!(diagnostics[1].severity, Severity::Error);
        assert_eq!(diagnostics[2].range, Range::on_line(1, 0, 10));
    }

    #[test]
    fn items_attach_to_nearest_date() {
        let input = "01/06/1997\n- [x] old\n03/08/1997\n- [ ] new";
        let diagnostics = parse(input);

        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics[0].range, Range::on_line(2, 0, 10));
        assert_eq!(diagnostics[0].severity, Severity::Information);
        assert_eq!(
            diagnostics[0].message,
            "Deadline approaching: 2 days remaining"
        );
    }

    #[test]
    fn items_before_any_date_are_ignored() {
        assert_eq!(parse("- [ ] floating\n\n01/09/1997"), vec![]);
    }

    #[test]
    fn items_continue_past_other_text() {
        let input = "01/06/1997\n# heading\nsome text\n- [ ] task";
        let diagnostics = parse(input);
        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics[1].range, Range::on_line(3, 0, 10));
    }

    #[test]
    fn time_refines_deadline() {
        let diagnostics = parse("31/07/1997 23:00\n- [ ] task");
        assert_eq!(diagnostics[0].range, Range::on_line(0, 0, 16));
        assert_eq!(diagnostics[0].message, "Overdue: 1 hour past deadline");

        let diagnostics = parse("01/08/1997 00:30\n- [ ] task");
        assert_eq!(
            diagnostics[0].message,
            "Deadline is near: 30 minutes remaining"
        );
    }

    #[test]
    fn time_with_units() {
        let diagnostics = parse("01/08/1997 09h:30m\n- [ ] task");
        assert_eq!(diagnostics[0].range, Range::on_line(0, 0, 18));
        assert_eq!(
            diagnostics[0].message,
            "Deadline is near: 9 hours remaining"
        );
    }

    #[test]
    fn time_on_its_own_line_opens_section() {
        let input = "01/08/1997\n- [x] morning\n11:00\n- [ ] lunch";
        let diagnostics = parse(input);

        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics[0].range, Range::on_line(2, 0, 5));
        assert_eq!(
            diagnostics[0].message,
            "Deadline is near: 11 hours remaining"
        );
    }

    #[test]
    fn indented_items() {
        let diagnostics = parse("01/06/1997\n  - [ ] nested");
        assert_eq!(diagnostics[1].range, Range::on_line(1, 2, 14));
    }

    #[test]
    fn impossible_dates_are_not_reported() {
        // 32/07 rolls over to the 1st of August; the mistake itself goes
        // unreported for now
        let diagnostics = parse("32/07/1997\n- [ ] task");
        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics[0].severity, Severity::Warning);
    }

    #[test]
    fn idempotent() {
        let input = "<!-- moved 09/08/1997 -->\n01/06/1997\n- [ ] t\n05/06/1997\n- [ ] t";
        let mut parser = Parser::new(Settings::default()).with_today(today());

        let first = parser.parse(input);
        let second = parser.parse(input);
        assert_eq!(first, second);
    }

    #[test]
    fn custom_thresholds() {
        let mut parser = Parser::new(Settings {
            critical: 0,
            deadline_approaching: 30,
        })
        .with_today(today());

        let diagnostics = parser.parse("20/08/1997\n- [ ] task");
        assert_eq!(diagnostics[0].severity, Severity::Information);
        assert_eq!(
            parser
                .settings()
                .deadline_approaching,
            30
        );
    }

    #[test]
    fn crlf_line_endings() {
        let diagnostics = parse("01/06/1997\r\n- [ ] task\r\n");
        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics[1].range, Range::on_line(1, 0, 10));
    }
}
