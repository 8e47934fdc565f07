#[cfg(test)]
mod samples {
    use std::fs;
    use std::path::{Path, PathBuf};

    use chrono::NaiveDate;
    use deadlines::language::{Settings, Severity};
    use deadlines::parsing;

    fn markdown_files(dir: &Path) -> Vec<PathBuf> {
        let entries = fs::read_dir(dir).expect("Failed to read directory");

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.expect("Failed to read directory entry");
            let path = entry.path();

            if path
                .extension()
                .and_then(|s| s.to_str())
                == Some("md")
            {
                files.push(path);
            }
        }
        files
    }

    fn check(file: &Path) -> Vec<deadlines::language::Diagnostic> {
        let content = parsing::load(file)
            .unwrap_or_else(|e| panic!("Failed to load file {:?}: {:?}", file, e));

        let today = NaiveDate::from_ymd_opt(1997, 8, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();

        parsing::check(&content, Settings::default(), Some(today))
    }

    #[test]
    fn ensure_samples_are_clean() {
        let dir = Path::new("tests/samples/");

        assert!(dir.exists(), "samples directory missing");

        let files = markdown_files(dir);
        assert!(!files.is_empty(), "No .md files found in samples directory");

        let mut failures = Vec::new();

        for file in &files {
            let diagnostics = check(file);
            if !diagnostics.is_empty() {
                println!("File {:?} produced diagnostics: {:?}", file, diagnostics);
                failures.push(file.clone());
            }
        }

        if !failures.is_empty() {
            panic!(
                "Sample files should produce no diagnostics, but {} files did",
                failures.len()
            );
        }
    }

    #[test]
    fn ensure_broken_report_errors() {
        let dir = Path::new("tests/broken/");

        assert!(dir.exists(), "broken directory missing");

        let files = markdown_files(dir);
        assert!(!files.is_empty(), "No .md files found in broken directory");

        let mut unexpected_successes = Vec::new();

        for file in &files {
            let diagnostics = check(file);
            if !diagnostics
                .iter()
                .any(|diagnostic| diagnostic.severity == Severity::Error)
            {
                println!("File {:?} unexpectedly reported no errors", file);
                unexpected_successes.push(file.clone());
            }
        }

        if !unexpected_successes.is_empty() {
            panic!(
                "Broken files should report errors, but {} files did not",
                unexpected_successes.len()
            );
        }
    }

    #[test]
    fn missing_file() {
        let result = parsing::load(Path::new("tests/samples/does-not-exist.md"));
        let error = result.unwrap_err();
        assert_eq!(error.problem, "File not found");
    }
}
