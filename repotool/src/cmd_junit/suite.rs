//! Test suite model, as reported in JUnit XML

/// A `<testsuite>`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TestSuite {
    pub name: String,
    pub tests: usize,
    pub failures: usize,
    pub skipped: usize,
    pub errors: usize,
    pub cases: Vec<TestCase>,
}

impl TestSuite {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Last dotted part of the suite name, e.g. `foo_spec` for `tests.foo_spec`
    pub fn short_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }
}

/// A `<testcase>`
#[derive(Debug, Clone, PartialEq)]
pub struct TestCase {
    pub name: String,
    pub result: CaseResult,
    /// Output captured before the outcome line
    pub stdout: Option<String>,
}

impl TestCase {
    pub fn new(name: impl Into<String>, result: CaseResult) -> Self {
        Self {
            name: name.into(),
            result,
            stdout: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CaseResult {
    Passed,
    Failure(Failure),
    Skipped,
    Error(CaseError),
}

/// An assertion failure
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Failure {
    pub message: String,
    pub value: String,
}

/// An error outside of assertions, e.g. a file that failed to load
#[derive(Debug, Clone, PartialEq)]
pub struct CaseError {
    pub message: Option<String>,
    pub value: String,
}
