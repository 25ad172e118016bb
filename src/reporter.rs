//! Reporters let a procedural function (a checker, a netlist importer, a report writer...) report any number of
//! messages without knowing where they end up and without stopping at the first error.
//!
//! Severities tag the messages for formatting and display, no filtering is done when reporting.

use log::{debug, error, info, warn};

use crate::severity::{Severity, SeverityMask};

pub trait Reporter {
    fn report(&mut self, text: &str, severity: Severity) -> &mut dyn Reporter;

    /// Places the report at the end of the list, for reporters that support ordering.
    fn report_tail(&mut self, text: &str, severity: Severity) -> &mut dyn Reporter {
        self.report(text, severity)
    }

    /// Places the report at the beginning of the list, for reporters that support ordering.
    fn report_head(&mut self, text: &str, severity: Severity) -> &mut dyn Reporter {
        self.report(text, severity)
    }

    /// Returns true if the reporter has received any message it keeps.
    fn has_message(&self) -> bool;
}

/// Reports to nowhere.
///
/// Lets callers always pass a reporter instead of checking for one.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn report(&mut self, _text: &str, _severity: Severity) -> &mut dyn Reporter {
        self
    }

    fn has_message(&self) -> bool {
        false
    }
}

/// Debugging aid, prints to stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutReporter;

impl Reporter for StdoutReporter {
    fn report(&mut self, text: &str, severity: Severity) -> &mut dyn Reporter {
        match severity {
            Severity::Undefined => println!("{}", text),
            _ => println!("{}: {}", severity, text),
        }
        self
    }

    fn has_message(&self) -> bool {
        false
    }
}

/// Appends each report, followed by a newline, to a `String`.
pub struct StringReporter<'a> {
    string: &'a mut String,
}

impl<'a> StringReporter<'a> {
    pub fn new(string: &'a mut String) -> Self {
        Self {
            string,
        }
    }
}

impl Reporter for StringReporter<'_> {
    fn report(&mut self, text: &str, _severity: Severity) -> &mut dyn Reporter {
        self.string.push_str(text);
        self.string.push('\n');
        self
    }

    fn has_message(&self) -> bool {
        !self.string.is_empty()
    }
}

/// Forwards reports to the `log` facade.
#[derive(Debug, Default)]
pub struct LogReporter {
    reported: bool,
}

impl Reporter for LogReporter {
    fn report(&mut self, text: &str, severity: Severity) -> &mut dyn Reporter {
        match severity {
            Severity::Error => error!("{}", text),
            Severity::Warning => warn!("{}", text),
            Severity::Info | Severity::Action => info!("{}", text),
            Severity::Undefined | Severity::Exclusion | Severity::Ignore => debug!("{}", text),
        }
        self.reported = true;
        self
    }

    fn has_message(&self) -> bool {
        self.reported
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    Head,
    Body,
    Tail,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportLine {
    pub severity: Severity,
    pub text: String,
}

/// Storage behind a report panel.
///
/// Head messages (usually intro messages) are shown before all others, tail messages (usually status messages) after
/// all others.
#[derive(Debug, Default, Clone)]
pub struct ReportPanel {
    head: Vec<ReportLine>,
    body: Vec<ReportLine>,
    tail: Vec<ReportLine>,
}

impl ReportPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, location: Location, text: &str, severity: Severity) {
        let line = ReportLine {
            severity,
            text: text.to_string(),
        };
        match location {
            // newest head message first
            Location::Head => self.head.insert(0, line),
            Location::Body => self.body.push(line),
            Location::Tail => self.tail.push(line),
        }
    }

    /// Lines in display order, keeping those with a severity in `filter`.
    ///
    /// Lines reported without a severity are always kept.
    pub fn lines(&self, filter: SeverityMask) -> impl Iterator<Item = &ReportLine> {
        self.head
            .iter()
            .chain(self.body.iter())
            .chain(self.tail.iter())
            .filter(move |line| line.severity == Severity::Undefined || filter.contains(line.severity))
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.head
            .iter()
            .chain(self.body.iter())
            .chain(self.tail.iter())
            .filter(|line| line.severity == severity)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_empty() && self.body.is_empty() && self.tail.is_empty()
    }

    pub fn clear(&mut self) {
        self.head.clear();
        self.body.clear();
        self.tail.clear();
    }

    /// The panel's content as plain text, one line per report, e.g. for saving to a file.
    pub fn to_text(&self, filter: SeverityMask) -> String {
        self.lines(filter)
            .map(|line| match line.severity {
                Severity::Undefined => format!("{}\n", line.text),
                severity => format!("{}: {}\n", severity, line.text),
            })
            .collect()
    }
}

pub struct PanelReporter<'a> {
    panel: &'a mut ReportPanel,
}

impl<'a> PanelReporter<'a> {
    pub fn new(panel: &'a mut ReportPanel) -> Self {
        Self {
            panel,
        }
    }
}

impl Reporter for PanelReporter<'_> {
    fn report(&mut self, text: &str, severity: Severity) -> &mut dyn Reporter {
        self.panel.push(Location::Body, text, severity);
        self
    }

    fn report_tail(&mut self, text: &str, severity: Severity) -> &mut dyn Reporter {
        self.panel.push(Location::Tail, text, severity);
        self
    }

    fn report_head(&mut self, text: &str, severity: Severity) -> &mut dyn Reporter {
        self.panel.push(Location::Head, text, severity);
        self
    }

    fn has_message(&self) -> bool {
        !self.panel.is_empty()
    }
}
