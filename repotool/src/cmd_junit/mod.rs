use repocommon::prelude::*;

use std::io::{BufRead, Write};
use std::process::ExitCode;

use crate::error::Error;

mod parse;
mod report;
mod suite;

use parse::Patterns;

/// Result of a conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Report written, no test failed
    Passed,
    /// Report written, some tests failed
    Failed,
    /// Input could not be parsed, an error report was written instead
    Malformed,
}

impl Outcome {
    /// Exit code for the CI runner.
    ///
    /// Malformed input is reported as an error in the XML, and the runner
    /// expects exit code 0 when the report has no failures
    pub fn exit_code(self) -> ExitCode {
        match self {
            Outcome::Failed => ExitCode::FAILURE,
            Outcome::Passed | Outcome::Malformed => ExitCode::SUCCESS,
        }
    }
}

pub fn run() -> Result<ExitCode, Error> {
    let stdin = std::io::stdin().lock();
    let mut stdout = std::io::stdout().lock();
    let outcome = convert(stdin, &mut stdout)?;
    Ok(outcome.exit_code())
}

/// Read plenary output from `input` and write the JUnit XML report to `out`
pub fn convert(input: impl BufRead, out: &mut impl Write) -> Result<Outcome, Error> {
    let lines = system::read_lines(input, "stdin").change_context(Error::ReadInput)?;
    let patterns = Patterns::new().change_context(Error::Patterns)?;

    let (suite, outcome) = match patterns.parse(&lines) {
        Ok(suite) => {
            infoln!(
                "Converted",
                "{}: {} tests, {} failures, {} skipped, {} errors",
                suite.name,
                suite.tests,
                suite.failures,
                suite.skipped,
                suite.errors
            );
            let outcome = if suite.failures > 0 {
                Outcome::Failed
            } else {
                Outcome::Passed
            };
            (suite, outcome)
        }
        Err(malformed) => {
            errorln!("Malformed", "{}", malformed);
            (malformed.into_suite(&patterns, &lines), Outcome::Malformed)
        }
    };

    report::write(&suite, out)?;
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::parse::SEPARATOR;
    use super::suite::{CaseError, CaseResult, Failure, TestCase, TestSuite};
    use super::*;

    fn to_lines(lines: &[&str]) -> Vec<String> {
        lines.iter().map(|s| s.to_string()).collect()
    }

    fn parse(lines: &[&str]) -> std::result::Result<TestSuite, parse::Malformed> {
        Patterns::new().unwrap().parse(&to_lines(lines))
    }

    fn convert_str(lines: &[&str]) -> (Outcome, String) {
        let input = lines.join("\n");
        let mut out = Vec::new();
        let outcome = convert(std::io::Cursor::new(input), &mut out).unwrap();
        (outcome, String::from_utf8(out).unwrap())
    }

    const PASSING: &[&str] = &[
        SEPARATOR,
        "Testing: \ttests/math_spec.lua",
        "\x1b[32mSuccess\x1b[0m\t||\tmath adds",
        "\x1b[32mSuccess\x1b[0m\t||\tmath subtracts",
        "",
        "\x1b[32mSuccess: \x1b[0m\t2",
        "\x1b[31mFailed : \x1b[0m\t0",
        "\x1b[31mErrors : \x1b[0m\t0",
        SEPARATOR,
    ];

    const FAILING: &[&str] = &[
        SEPARATOR,
        "Testing: \ttests/math_spec.lua",
        "\x1b[32mSuccess\x1b[0m\t||\tmath adds",
        "computing 2 + 3",
        "\x1b[31mFail\x1b[0m\t||\tmath adds different numbers",
        "            tests/math_spec.lua:9: Expected objects to be equal.",
        "            Passed in:",
        "            (number) 4",
        "            Expected:",
        "            (number) 5",
        "",
        "            stack traceback:",
        "            \ttests/math_spec.lua:9: in function <tests/math_spec.lua:7>",
        "",
        "\x1b[33mPending\x1b[0m\t||\tmath divides",
        "",
        "\x1b[32mSuccess: \x1b[0m\t1",
        "\x1b[31mFailed : \x1b[0m\t1",
        "\x1b[31mErrors : \x1b[0m\t0",
        SEPARATOR,
        "Tests Failed. Exit: 1",
    ];

    #[test]
    fn test_passing_suite() {
        let suite = parse(PASSING).unwrap();
        assert_eq!(suite.name, "tests.math_spec");
        assert_eq!(suite.short_name(), "math_spec");
        assert_eq!((suite.tests, suite.failures, suite.skipped, suite.errors), (2, 0, 0, 0));
        assert_eq!(
            suite.cases,
            vec![
                TestCase::new("math adds", CaseResult::Passed),
                TestCase::new("math subtracts", CaseResult::Passed),
            ]
        );
    }

    #[test]
    fn test_failing_suite() {
        let suite = parse(FAILING).unwrap();
        assert_eq!((suite.tests, suite.failures, suite.skipped, suite.errors), (3, 1, 1, 0));
        assert_eq!(suite.cases.len(), 3);

        let failed = &suite.cases[1];
        assert_eq!(failed.name, "math adds different numbers");
        assert_eq!(failed.stdout.as_deref(), Some("computing 2 + 3"));
        assert_eq!(
            failed.result,
            CaseResult::Failure(Failure {
                message: "tests/math_spec.lua:9: Expected objects to be equal.".to_string(),
                value: [
                    "Passed in:",
                    "(number) 4",
                    "Expected:",
                    "(number) 5",
                    "stack traceback:",
                    "\ttests/math_spec.lua:9: in function <tests/math_spec.lua:7>",
                ]
                .join("\n"),
            })
        );
        assert_eq!(suite.cases[2].result, CaseResult::Skipped);
        assert_eq!(suite.cases[2].stdout, None);
    }

    #[test]
    fn test_startup_error() {
        let mut lines = vec!["Error detected while processing init.lua:", "E5113: boom  "];
        lines.extend_from_slice(PASSING);
        let suite = parse(&lines).unwrap();
        assert_eq!(suite.tests, 2);
        assert_eq!(
            suite.cases[0],
            TestCase::new(
                "nvim startup",
                CaseResult::Error(CaseError {
                    message: None,
                    value: "Error detected while processing init.lua:\nE5113: boom".to_string(),
                })
            )
        );
    }

    #[test]
    fn test_load_failure() {
        let suite = parse(&[
            SEPARATOR,
            "Testing: \ttests/broken_spec.lua",
            SEPARATOR,
            "FAILED TO LOAD FILE",
            "\x1b[31mtests/broken_spec.lua:3: unexpected symbol near x\x1b[0m   ",
            SEPARATOR,
        ])
        .unwrap();
        assert_eq!((suite.tests, suite.failures, suite.errors), (1, 0, 1));
        assert_eq!(
            suite.cases,
            vec![TestCase::new(
                "broken_spec",
                CaseResult::Error(CaseError {
                    message: None,
                    value: "tests/broken_spec.lua:3: unexpected symbol near x".to_string(),
                })
            )]
        );
    }

    #[test]
    fn test_unexpected_error() {
        let suite = parse(&[
            SEPARATOR,
            "Testing: \ttests/nested/io_spec.lua",
            "\x1b[32mSuccess\x1b[0m\t||\tio reads",
            "\x1b[32mSuccess: \x1b[0m\t1",
            "\x1b[31mFailed : \x1b[0m\t0",
            "\x1b[31mErrors : \x1b[0m\t0",
            SEPARATOR,
            "We had an unexpected error: attempt to index a nil value",
            "stack traceback:",
        ])
        .unwrap();
        assert_eq!(suite.name, "tests.nested.io_spec");
        assert_eq!((suite.tests, suite.errors), (2, 1));
        let case = &suite.cases[1];
        assert_eq!(case.name, "io_spec");
        match &case.result {
            CaseResult::Error(error) => {
                assert!(error.message.as_deref().unwrap().starts_with("Unexpected error reported."));
                assert_eq!(error.value, "attempt to index a nil value\nstack traceback:");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_outcome_line_prefix_is_stdout() {
        let suite = parse(&[
            SEPARATOR,
            "Testing: \ttests/print_spec.lua",
            "earlier output",
            "hello\x1b[32mSuccess\x1b[0m\t||\tprints without newline",
            "\x1b[32mSuccess\x1b[0m\t||\tprints nothing",
            "\x1b[32mSuccess: \x1b[0m\t2",
            "\x1b[31mFailed : \x1b[0m\t0",
            "\x1b[31mErrors : \x1b[0m\t0",
            SEPARATOR,
        ])
        .unwrap();
        assert_eq!(suite.tests, 2);
        assert_eq!(suite.cases[0].name, "prints without newline");
        assert_eq!(suite.cases[0].stdout.as_deref(), Some("earlier output\nhello"));
        assert_eq!(suite.cases[1].stdout, None);
    }

    #[test]
    fn test_unexpected_error_keeps_stdout() {
        let suite = parse(&[
            SEPARATOR,
            "Testing: \ttests/io_spec.lua",
            "\x1b[32mSuccess\x1b[0m\t||\tio reads",
            "closing handles",
            "",
            "\x1b[32mSuccess: \x1b[0m\t1",
            "\x1b[31mFailed : \x1b[0m\t0",
            "\x1b[31mErrors : \x1b[0m\t0",
            SEPARATOR,
            "We had an unexpected error: boom",
        ])
        .unwrap();
        assert_eq!((suite.tests, suite.errors), (2, 1));
        assert_eq!(suite.cases[0].stdout, None);
        let case = &suite.cases[1];
        assert_eq!(case.name, "io_spec");
        assert_eq!(case.stdout.as_deref(), Some("closing handles"));
        match &case.result {
            CaseResult::Error(error) => assert_eq!(error.value, "boom"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_truncated_load_failure_is_malformed() {
        let malformed = parse(&[
            SEPARATOR,
            "Testing: \ttests/broken_spec.lua",
            SEPARATOR,
            "FAILED TO LOAD FILE",
        ])
        .unwrap_err();
        assert_eq!(malformed.case_name, "broken_spec");
        assert_eq!(
            malformed.message,
            "expected line 5 after \"FAILED TO LOAD FILE\", only 4 lines in input"
        );
    }

    #[test]
    fn test_missing_separator_is_malformed() {
        let malformed = parse(&["garbage"]).unwrap_err();
        assert_eq!(malformed.case_name, "");
        assert_eq!(
            malformed.message,
            format!("expected line 2 to be {:?}, only 1 lines in input", SEPARATOR)
        );
    }

    #[test]
    fn test_trailing_line_after_success_is_malformed() {
        let mut lines = PASSING.to_vec();
        lines.push("Tests Failed. Exit: 1");
        let malformed = parse(&lines).unwrap_err();
        assert_eq!(malformed.case_name, "tests.math_spec");
        assert_eq!(malformed.message, "unexpected line 10: \"Tests Failed. Exit: 1\"");
    }

    #[test]
    fn test_truncated_summary_is_malformed() {
        let malformed = parse(&PASSING[..6]).unwrap_err();
        assert_eq!(malformed.case_name, "math_spec");
        assert!(malformed.message.starts_with("expected line 7 to match regex"), "{}", malformed);
    }

    #[test]
    fn test_malformed_into_suite() {
        let patterns = Patterns::new().unwrap();
        let lines = to_lines(&["\x1b[31mnot plenary\x1b[0m"]);
        let malformed = patterns.parse(&lines).unwrap_err();
        let suite = malformed.into_suite(&patterns, &lines);
        assert_eq!((suite.tests, suite.errors), (1, 1));
        match &suite.cases[0].result {
            CaseResult::Error(error) => {
                assert!(error
                    .message
                    .as_deref()
                    .unwrap()
                    .starts_with("Converting plenary test output to JUnit XML report: expected line 2"));
                assert_eq!(error.value, "Test output:\n1| not plenary");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_convert_invalid_utf8() {
        let mut input = PASSING[..3].join("\n").into_bytes();
        input.extend_from_slice(b"\nprinted \xff\xfe bytes\n");
        input.extend_from_slice(PASSING[3..].join("\n").as_bytes());

        let mut out = Vec::new();
        let outcome = convert(std::io::Cursor::new(input), &mut out).unwrap();
        let xml = String::from_utf8(out).unwrap();
        assert_eq!(outcome, Outcome::Passed);
        assert!(xml.contains("printed \u{fffd}\u{fffd} bytes</system-out>"), "{}", xml);
    }

    #[test]
    fn test_convert_outcomes() {
        let (outcome, xml) = convert_str(PASSING);
        assert_eq!(outcome, Outcome::Passed);
        assert!(xml.contains(r#"tests="2" failures="0""#), "{}", xml);

        let (outcome, xml) = convert_str(FAILING);
        assert_eq!(outcome, Outcome::Failed);
        assert!(xml.contains(
            r#"<failure message="tests/math_spec.lua:9: Expected objects to be equal.">"#
        ), "{}", xml);
        assert!(xml.contains("computing 2 + 3</system-out>"), "{}", xml);

        let (outcome, xml) = convert_str(&["garbage"]);
        assert_eq!(outcome, Outcome::Malformed);
        assert!(xml.starts_with(r#"<testsuite name="" tests="1" failures="0" skipped="0" errors="1">"#), "{}", xml);
    }
}
