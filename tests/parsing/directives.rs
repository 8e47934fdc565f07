#[cfg(test)]
mod verify {
    use chrono::NaiveDate;
    use deadlines::language::{Diagnostic, Range, Settings, Severity};
    use deadlines::parsing::Parser;

    fn parse(lines: &[&str]) -> Vec<Diagnostic> {
        let today = NaiveDate::from_ymd_opt(1997, 8, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();

        Parser::new(Settings::default())
            .with_today(today)
            .parse(&lines.join("\n"))
    }

    #[test]
    fn skip_suppresses_section() {
        assert_eq!(parse(&["<!-- skip -->", "01/06/1997", "- [ ] task"]), vec![]);
    }

    #[test]
    fn skip_applies_to_next_section_only() {
        let diagnostics = parse(&[
            "<!-- skip -->",
            "01/06/1997",
            "- [ ] task",
            "02/06/1997",
            "- [ ] task",
        ]);
        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics[0].range, Range::on_line(3, 0, 10));
    }

    #[test]
    fn skip_requires_exact_spelling() {
        let diagnostics = parse(&["<!--skip-->", "01/06/1997", "- [ ] task"]);
        assert_eq!(diagnostics.len(), 2);
    }

    #[test]
    fn end_section_stops_items() {
        let diagnostics = parse(&[
            "01/06/1997",
            "- [ ] task",
            "<!-- end section -->",
            "- [ ] unrelated",
        ]);
        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics[1].range, Range::on_line(1, 0, 10));
    }

    #[test]
    fn end_section_before_any_items() {
        assert_eq!(
            parse(&["01/06/1997", "<!-- end section -->", "- [ ] task"]),
            vec![]
        );
    }

    #[test]
    fn next_date_reopens_items() {
        let diagnostics = parse(&[
            "01/06/1997",
            "<!-- end section -->",
            "- [ ] ignored",
            "02/06/1997",
            "- [ ] counted",
        ]);
        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics[1].range, Range::on_line(4, 0, 13));
    }

    #[test]
    fn move_reconciles_items() {
        let diagnostics = parse(&[
            "<!-- moved 09/08/1997 -->",
            "01/06/1997",
            "- [ ] t",
            "05/06/1997",
            "- [ ] t",
            "09/08/1997",
            "- [ ] t",
        ]);

        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics[0].range, Range::on_line(3, 0, 10));
        assert_eq!(diagnostics[1].range, Range::on_line(4, 0, 7));
        assert!(diagnostics
            .iter()
            .all(|diagnostic| diagnostic.severity == Severity::Error));
    }

    #[test]
    fn incomplete_move() {
        let diagnostics = parse(&[
            "<!-- moved 09/08/1997 -->",
            "01/06/1997",
            "- [ ] copied",
            "- [ ] forgotten",
            "- [x] finished",
            "09/08/1997",
            "- [ ] copied",
        ]);

        assert_eq!(
            diagnostics,
            vec![
                Diagnostic::new(
                    Range::on_line(0, 0, 25),
                    "Not all items are moved to the new date.",
                    Severity::Information
                ),
                Diagnostic::new(
                    Range::on_line(3, 0, 15),
                    "This item is not moved to the new date.",
                    Severity::Information
                ),
            ]
        );
    }

    #[test]
    fn move_to_missing_date() {
        let diagnostics = parse(&["<!-- moved 09/08/1997 -->", "01/06/1997", "- [ ] t"]);

        assert_eq!(diagnostics.len(), 2);
        assert_eq!(
            diagnostics[0].message,
            "Not all items are moved to the new date."
        );
        assert_eq!(diagnostics[1].range, Range::on_line(2, 0, 7));
    }

    #[test]
    fn move_to_itself() {
        let diagnostics = parse(&["<!-- moved 01/06/1997 -->", "01/06/1997", "- [ ] t"]);

        assert_eq!(diagnostics.len(), 2);
        assert_eq!(
            diagnostics[0].message,
            "A date cannot move its items to itself..."
        );
    }

    #[test]
    fn move_matches_literal_date_text() {
        // the same day written differently is a different date as far as
        // moving is concerned; 32/07 rolls over to 01/08 but is not it
        let diagnostics = parse(&[
            "<!-- moved 01/08/1997 -->",
            "01/06/1997",
            "- [ ] t",
            "32/07/1997",
            "- [x] t",
        ]);
        assert_eq!(
            diagnostics[0].message,
            "Not all items are moved to the new date."
        );
    }

    #[test]
    fn moved_items_may_be_finished_at_target() {
        let diagnostics = parse(&[
            "<!-- moved 09/08/1997 -->",
            "01/06/1997",
            "- [ ] t",
            "09/08/1997",
            "- [x] t",
        ]);
        assert_eq!(diagnostics, vec![]);
    }

    #[test]
    fn malformed_move_is_inert() {
        let diagnostics = parse(&["<!-- moved 9/08/1997 -->", "01/06/1997", "- [ ] t"]);
        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics[0].severity, Severity::Error);
    }

    #[test]
    fn code_blocks_suppress() {
        let diagnostics = parse(&["```", "01/06/1997", "- [ ] task", "```"]);
        assert_eq!(diagnostics, vec![]);

    }

    #[test]
    fn directives_inside_code_blocks_still_apply() {
        let diagnostics = parse(&["```", "<!-- skip -->", "```", "01/06/1997", "- [ ] task"]);
        assert_eq!(diagnostics, vec![]);

        let diagnostics = parse(&[
            "```",
            "<!-- moved 09/08/1997 -->",
            "```",
            "01/06/1997",
            "- [ ] task",
        ]);
        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics[0].severity, Severity::Error);
    }

    #[test]
    fn code_block_inside_section_hides_items() {
        let diagnostics = parse(&["01/06/1997", "```", "- [ ] task", "```", "- [ ] real"]);
        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics[1].range, Range::on_line(4, 0, 10));
    }

    #[test]
    fn comments_suppress() {
        assert_eq!(parse(&["<!-- 01/06/1997 -->", "- [ ] task"]), vec![]);
        assert_eq!(
            parse(&["01/06/1997", "<!-- - [ ] commented out -->"]),
            vec![]
        );
    }

    #[test]
    fn unterminated_comment_hides_the_rest() {
        assert_eq!(
            parse(&["<!-- notes", "01/06/1997", "- [ ] task", "-->"]),
            vec![]
        );
    }
}
