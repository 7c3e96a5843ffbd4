//! Parser for the text report printed by plenary's test harness
use std::borrow::Cow;

use regex::{Captures, Regex};

use super::suite::{CaseError, CaseResult, Failure, TestCase, TestSuite};

/// Line printed around each spec file's report
pub const SEPARATOR: &str = "========================================";
/// Indent of assertion failure details
static FAILURE_INDENT: &str = "            ";
static LOAD_FAILURE: &str = "FAILED TO LOAD FILE";
static TESTS_FAILED: &str = "Tests Failed. Exit: 1";
static UNEXPECTED_ERROR: &str =
    "Unexpected error reported. This usually occurs when an error is raised outside of an \"it\" block.";
static STARTUP_CASE: &str = "nvim startup";

/// Compiled patterns for lines of plenary output
pub struct Patterns {
    suite_name: Regex,
    outcome: Regex,
    success_count: Regex,
    failed_count: Regex,
    errors_count: Regex,
    escape_seq: Regex,
    unexpected_error: Regex,
}

impl Patterns {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            suite_name: Regex::new(r"^Testing:\s+(.+)$")?,
            outcome: Regex::new(r"^(.*?)\x1B\[\d+m(\w+)\x1B\[0m\s+\|\|\s+(.+)$")?,
            success_count: Regex::new(r"^\x1B\[32mSuccess:")?,
            failed_count: Regex::new(r"^\x1B\[31mFailed :")?,
            errors_count: Regex::new(r"^\x1B\[31mErrors :")?,
            escape_seq: Regex::new(r"\x1B\[\d+m")?,
            unexpected_error: Regex::new(r"^We had an unexpected error:\s+")?,
        })
    }

    /// Remove terminal color sequences
    pub fn strip_escapes<'a>(&self, line: &'a str) -> Cow<'a, str> {
        self.escape_seq.replace_all(line, "")
    }

    /// Parse the report of one spec file
    pub fn parse(&self, lines: &[String]) -> Result<TestSuite, Malformed> {
        Parser {
            patterns: self,
            lines,
        }
        .run()
    }
}

/// Input that doesn't follow the plenary report format
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{message}")]
pub struct Malformed {
    /// Name of the test case to report the problem under
    pub case_name: String,
    pub message: String,
}

impl Malformed {
    fn new(case_name: &str, message: String) -> Self {
        Self {
            case_name: case_name.to_string(),
            message,
        }
    }

    /// Build a suite with a single error that shows the whole input
    pub fn into_suite(self, patterns: &Patterns, lines: &[String]) -> TestSuite {
        let width = lines.len().to_string().len();
        let numbered = lines
            .iter()
            .enumerate()
            .map(|(i, line)| {
                let line = format!("{:>width$}| {}", i + 1, line);
                patterns.strip_escapes(&line).into_owned()
            })
            .collect::<Vec<_>>();

        let mut suite = TestSuite::new("");
        suite.tests = 1;
        suite.errors = 1;
        suite.cases.push(TestCase::new(
            self.case_name,
            CaseResult::Error(CaseError {
                message: Some(format!(
                    "Converting plenary test output to JUnit XML report: {}",
                    self.message
                )),
                value: format!("Test output:\n{}", numbered.join("\n")),
            }),
        ));
        suite
    }
}

struct Parser<'a> {
    patterns: &'a Patterns,
    lines: &'a [String],
}

impl<'a> Parser<'a> {
    fn run(self) -> Result<TestSuite, Malformed> {
        let lines = self.lines;
        let p = self.patterns;

        // anything before the first separator is printed by nvim itself
        let mut i = 0;
        let mut startup = Vec::new();
        while i < lines.len() && lines[i].trim() != SEPARATOR {
            startup.push(lines[i].trim_end());
            i += 1;
        }
        self.expect_line(i, SEPARATOR, "")?;
        i += 1;

        let caps = self.expect_match(i, &p.suite_name, "")?;
        let path = caps.get(1).map_or("", |m| m.as_str());
        let mut suite = TestSuite::new(path.strip_suffix(".lua").unwrap_or(path).replace('/', "."));
        let short_name = suite.short_name().to_string();
        i += 1;

        let startup = startup.join("\n");
        let startup = startup.trim_end();
        if !startup.is_empty() {
            suite.cases.push(TestCase::new(
                STARTUP_CASE,
                CaseResult::Error(CaseError {
                    message: None,
                    value: startup.to_string(),
                }),
            ));
        }

        let mut stdout: Vec<&'a str> = Vec::new();

        while i < lines.len() {
            let line = lines[i].as_str();
            let trimmed = line.trim();

            if let Some(caps) = p.outcome.captures(trimmed) {
                let printed = caps.get(1).map_or("", |m| m.as_str());
                if !printed.is_empty() {
                    stdout.push(printed);
                }
                suite.tests += 1;
                let result = match caps.get(2).map_or("", |m| m.as_str()) {
                    "Fail" => {
                        suite.failures += 1;
                        CaseResult::Failure(Failure::default())
                    }
                    "Pending" => {
                        suite.skipped += 1;
                        CaseResult::Skipped
                    }
                    _ => CaseResult::Passed,
                };
                let mut case = TestCase::new(caps.get(3).map_or("", |m| m.as_str()), result);
                case.stdout = take_stdout(&mut stdout);
                suite.cases.push(case);
            } else if p.success_count.is_match(trimmed) {
                // summary block ends the report
                self.expect_match(i + 1, &p.failed_count, &short_name)?;
                self.expect_match(i + 2, &p.errors_count, &short_name)?;
                self.expect_line(i + 3, SEPARATOR, &short_name)?;

                let Some(next) = lines.get(i + 4) else {
                    break;
                };

                if p.unexpected_error.is_match(next) {
                    suite.tests += 1;
                    suite.errors += 1;
                    let first = p.unexpected_error.replace(next, "");
                    let value = std::iter::once(&*first)
                        .chain(lines[i + 5..].iter().map(String::as_str))
                        .collect::<Vec<_>>()
                        .join("\n");
                    let mut case = TestCase::new(
                        &short_name,
                        CaseResult::Error(CaseError {
                            message: Some(UNEXPECTED_ERROR.to_string()),
                            value,
                        }),
                    );
                    case.stdout = take_stdout(&mut stdout);
                    suite.cases.push(case);
                    break;
                }

                if suite.failures == 0 {
                    return Err(Malformed::new(
                        &suite.name,
                        format!("unexpected line {}: {:?}", i + 5, next),
                    ));
                }

                self.expect_line(i + 4, TESTS_FAILED, &short_name)?;
                match lines.get(i + 5) {
                    None => break,
                    Some(extra) => {
                        return Err(Malformed::new(
                            &suite.name,
                            format!("unexpected line {}: {:?}", i + 6, extra),
                        ))
                    }
                }
            } else if line.starts_with(FAILURE_INDENT) && last_failure(&mut suite).is_some() {
                // first detail line is the message, the rest is the value
                if let Some(failure) = last_failure(&mut suite) {
                    if failure.message.is_empty() {
                        failure.message = trimmed.to_string();
                    } else {
                        if !failure.value.is_empty() {
                            failure.value.push('\n');
                        }
                        failure.value.push_str(&line[FAILURE_INDENT.len()..]);
                    }
                }
            } else if trimmed == SEPARATOR {
                self.expect_line(i + 1, LOAD_FAILURE, &short_name)?;
                i += 1;
                if lines.len() <= i + 1 {
                    return Err(Malformed::new(
                        &short_name,
                        format!(
                            "expected line {} after {:?}, only {} lines in input",
                            i + 2,
                            LOAD_FAILURE,
                            lines.len()
                        ),
                    ));
                }
                i += 1;
                suite.tests += 1;
                suite.errors += 1;
                let mut error_lines = Vec::new();
                while i < lines.len() && lines[i].trim() != SEPARATOR {
                    error_lines.push(p.strip_escapes(&lines[i]).trim_end().to_string());
                    i += 1;
                }
                suite.cases.push(TestCase::new(
                    &short_name,
                    CaseResult::Error(CaseError {
                        message: None,
                        value: error_lines.join("\n"),
                    }),
                ));
                self.expect_line(i, SEPARATOR, &suite.name)?;
            } else {
                stdout.push(line);
            }

            i += 1;
        }

        for case in &mut suite.cases {
            if let CaseResult::Failure(failure) = &mut case.result {
                failure.value = failure.value.trim().to_string();
            }
        }

        Ok(suite)
    }

    /// Check that line `i` (0-based) is `expected` after trimming
    fn expect_line(&self, i: usize, expected: &str, case_name: &str) -> Result<(), Malformed> {
        let Some(line) = self.lines.get(i) else {
            return Err(Malformed::new(
                case_name,
                format!(
                    "expected line {} to be {:?}, only {} lines in input",
                    i + 1,
                    expected,
                    self.lines.len()
                ),
            ));
        };
        let line = line.trim();
        if line != expected {
            return Err(Malformed::new(
                case_name,
                format!("expected line {} to be {:?}, got {:?}", i + 1, expected, line),
            ));
        }
        Ok(())
    }

    /// Check that line `i` (0-based) matches `pattern` after trimming
    fn expect_match(
        &self,
        i: usize,
        pattern: &Regex,
        case_name: &str,
    ) -> Result<Captures<'a>, Malformed> {
        let lines: &'a [String] = self.lines;
        let Some(line) = lines.get(i) else {
            return Err(Malformed::new(
                case_name,
                format!(
                    "expected line {} to match regex {:?}, only {} lines in input",
                    i + 1,
                    pattern.as_str(),
                    lines.len()
                ),
            ));
        };
        let line = line.trim();
        pattern.captures(line).ok_or_else(|| {
            Malformed::new(
                case_name,
                format!(
                    "expected line {} to match regex {:?}, got {:?}",
                    i + 1,
                    pattern.as_str(),
                    line
                ),
            )
        })
    }
}

fn last_failure(suite: &mut TestSuite) -> Option<&mut Failure> {
    match suite.cases.last_mut() {
        Some(TestCase {
            result: CaseResult::Failure(failure),
            ..
        }) => Some(failure),
        _ => None,
    }
}

/// Take the captured output, if there is any
fn take_stdout(stdout: &mut Vec<&str>) -> Option<String> {
    let joined = stdout.join("\n");
    let joined = joined.trim();
    if joined.is_empty() {
        return None;
    }
    stdout.clear();
    Some(joined.to_string())
}
