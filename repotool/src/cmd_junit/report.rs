//! JUnit XML output
use repocommon::prelude::*;

use std::borrow::Cow;
use std::io::Write;

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use super::suite::{CaseResult, TestCase, TestSuite};
use crate::error::Error;

/// Write `suite` as an indented `<testsuite>` document
pub fn write(suite: &TestSuite, out: &mut impl Write) -> Result<(), Error> {
    let mut xml = XmlWriter(Writer::new_with_indent(Vec::new(), b' ', 2));

    let mut start = BytesStart::new("testsuite");
    start.push_attribute(("name", &*clean(&suite.name)));
    start.push_attribute(("tests", suite.tests.to_string().as_str()));
    start.push_attribute(("failures", suite.failures.to_string().as_str()));
    start.push_attribute(("skipped", suite.skipped.to_string().as_str()));
    start.push_attribute(("errors", suite.errors.to_string().as_str()));

    if suite.cases.is_empty() {
        xml.event(Event::Empty(start))?;
    } else {
        xml.event(Event::Start(start))?;
        for case in &suite.cases {
            write_case(&mut xml, case)?;
        }
        xml.event(Event::End(BytesEnd::new("testsuite")))?;
    }

    let mut bytes = xml.0.into_inner();
    bytes.push(b'\n');
    out.write_all(&bytes).change_context(Error::WriteReport)?;
    out.flush().change_context(Error::WriteReport)
}

fn write_case(xml: &mut XmlWriter, case: &TestCase) -> Result<(), Error> {
    let mut start = BytesStart::new("testcase");
    start.push_attribute(("name", &*clean(&case.name)));

    if matches!(case.result, CaseResult::Passed) && case.stdout.is_none() {
        return xml.event(Event::Empty(start));
    }

    xml.event(Event::Start(start))?;
    match &case.result {
        CaseResult::Passed => {}
        CaseResult::Failure(failure) => {
            xml.element("failure", Some(failure.message.as_str()), &failure.value)?;
        }
        CaseResult::Skipped => {
            xml.event(Event::Empty(BytesStart::new("skipped")))?;
        }
        CaseResult::Error(error) => {
            xml.element("error", error.message.as_deref(), &error.value)?;
        }
    }
    if let Some(stdout) = &case.stdout {
        xml.element("system-out", None, stdout)?;
    }
    xml.event(Event::End(BytesEnd::new("testcase")))
}

struct XmlWriter(Writer<Vec<u8>>);

impl XmlWriter {
    fn event(&mut self, event: Event<'_>) -> Result<(), Error> {
        self.0
            .write_event(event)
            .change_context(Error::WriteReport)
    }

    /// Write an element with an optional `message` attribute and text content
    fn element(&mut self, name: &str, message: Option<&str>, text: &str) -> Result<(), Error> {
        let mut start = BytesStart::new(name);
        if let Some(message) = message {
            start.push_attribute(("message", &*clean(message)));
        }
        if text.is_empty() {
            return self.event(Event::Empty(start));
        }
        self.event(Event::Start(start))?;
        self.event(Event::Text(BytesText::new(&clean(text))))?;
        self.event(Event::End(BytesEnd::new(name)))
    }
}

/// Replace characters that are not allowed in XML 1.0 with U+FFFD
fn clean(text: &str) -> Cow<'_, str> {
    fn allowed(c: char) -> bool {
        matches!(c, '\t' | '\n' | '\r') || (c >= ' ' && c != '\u{FFFE}' && c != '\u{FFFF}')
    }

    if text.chars().all(allowed) {
        return Cow::Borrowed(text);
    }
    Cow::Owned(
        text.chars()
            .map(|c| if allowed(c) { c } else { '\u{FFFD}' })
            .collect(),
    )
}
