use std::fmt;

use crate::model::{Alignment, Attr, HeaderStructure, ParagraphRecord, RunRecord};

/// Font sizes closer than this are the same size.
pub const FONT_SIZE_TOLERANCE: f64 = 0.1;

/// One difference inside a paragraph. Run indices are 0-based.
#[derive(Clone, Debug, PartialEq)]
pub enum Difference {
    Text { expected: String, actual: String },
    Alignment { expected: Attr<Alignment>, actual: Attr<Alignment> },
    RunCount { expected: usize, actual: usize },
    RunText { run: usize, expected: String, actual: String },
    Bold { run: usize, expected: Attr<bool>, actual: Attr<bool> },
    Italic { run: usize, expected: Attr<bool>, actual: Attr<bool> },
    Underline { run: usize, expected: Attr<bool>, actual: Attr<bool> },
    FontName { run: usize, expected: Attr<String>, actual: Attr<String> },
    FontSize { run: usize, expected: Attr<f64>, actual: Attr<f64> },
}

impl fmt::Display for Difference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difference::Text { expected, actual } => {
                write!(f, "Text mismatch: Expected '{expected}' but got '{actual}'")
            }
            Difference::Alignment { expected, actual } => {
                write!(f, "Alignment mismatch: Expected '{expected}' but got '{actual}'")
            }
            Difference::RunCount { expected, actual } => {
                write!(f, "Run count mismatch: Expected {expected} but got {actual}")
            }
            Difference::RunText { run, expected, actual } => {
                write!(f, "Run {run} text mismatch: Expected '{expected}' but got '{actual}'")
            }
            Difference::Bold { run, expected, actual } => {
                write!(f, "Run {run} bold mismatch: Expected {expected} but got {actual}")
            }
            Difference::Italic { run, expected, actual } => {
                write!(f, "Run {run} italic mismatch: Expected {expected} but got {actual}")
            }
            Difference::Underline { run, expected, actual } => {
                write!(f, "Run {run} underline mismatch: Expected {expected} but got {actual}")
            }
            Difference::FontName { run, expected, actual } => {
                write!(f, "Run {run} font mismatch: Expected '{expected}' but got '{actual}'")
            }
            Difference::FontSize { run, expected, actual } => {
                if expected.is_set() && actual.is_set() {
                    write!(f, "Run {run} font size mismatch: Expected {expected}pt but got {actual}pt")
                } else {
                    write!(f, "Run {run} font size mismatch: Expected {expected} but got {actual}")
                }
            }
        }
    }
}

/// Top-level result of a comparison, in report order.
#[derive(Clone, Debug, PartialEq)]
pub enum Finding {
    NoHeaderContent,
    ParagraphCount { expected: usize, actual: usize },
    /// `index` is 0-based; reports number paragraphs from 1.
    Paragraph { index: usize, differences: Vec<Difference> },
    ImageCount { expected: usize, actual: usize },
    TableCount { expected: usize, actual: usize },
}

/// Outcome of validating one candidate. Valid exactly when there are no
/// findings.
#[derive(Clone, Debug, PartialEq)]
pub struct Verdict {
    findings: Vec<Finding>,
    template_name: String,
}

impl Verdict {
    pub(crate) fn new(findings: Vec<Finding>) -> Self {
        Verdict { findings, template_name: crate::DEFAULT_TEMPLATE_FILE.to_string() }
    }

    /// Name used when the report tells the submitter where to copy the header from.
    pub fn with_template_name(mut self, name: impl Into<String>) -> Self {
        self.template_name = name.into();
        self
    }

    pub fn is_valid(&self) -> bool {
        self.findings.is_empty()
    }

    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    pub fn template_name(&self) -> &str {
        &self.template_name
    }

    /// Empty when valid, otherwise the text to show the submitter verbatim.
    pub fn report(&self) -> String {
        crate::report::render(self)
    }
}

fn sizes_match(expected: Attr<f64>, actual: Attr<f64>) -> bool {
    match (expected, actual) {
        (Attr::Set(a), Attr::Set(b)) => (a - b).abs() <= FONT_SIZE_TOLERANCE,
        (Attr::Unset, Attr::Unset) => true,
        _ => false,
    }
}

fn compare_runs(run: usize, expected: &RunRecord, actual: &RunRecord, out: &mut Vec<Difference>) {
    if expected.text != actual.text {
        out.push(Difference::RunText {
            run,
            expected: expected.text.clone(),
            actual: actual.text.clone(),
        });
    }
    if expected.bold != actual.bold {
        out.push(Difference::Bold { run, expected: expected.bold, actual: actual.bold });
    }
    if expected.italic != actual.italic {
        out.push(Difference::Italic { run, expected: expected.italic, actual: actual.italic });
    }
    if expected.underline != actual.underline {
        out.push(Difference::Underline {
            run,
            expected: expected.underline,
            actual: actual.underline,
        });
    }
    if expected.font_name != actual.font_name {
        out.push(Difference::FontName {
            run,
            expected: expected.font_name.clone(),
            actual: actual.font_name.clone(),
        });
    }
    if !sizes_match(expected.font_size, actual.font_size) {
        out.push(Difference::FontSize {
            run,
            expected: expected.font_size,
            actual: actual.font_size,
        });
    }
}

/// Every difference between two paragraphs at the same position.
pub fn compare_paragraphs(expected: &ParagraphRecord, actual: &ParagraphRecord) -> Vec<Difference> {
    let mut out = Vec::new();

    if expected.text != actual.text {
        out.push(Difference::Text { expected: expected.text.clone(), actual: actual.text.clone() });
    }
    if expected.alignment != actual.alignment {
        out.push(Difference::Alignment {
            expected: expected.alignment.clone(),
            actual: actual.alignment.clone(),
        });
    }

    if expected.runs.len() != actual.runs.len() {
        out.push(Difference::RunCount { expected: expected.runs.len(), actual: actual.runs.len() });
    } else {
        for (i, (e, a)) in expected.runs.iter().zip(&actual.runs).enumerate() {
            compare_runs(i, e, a, &mut out);
        }
    }

    out
}

/// Compare a candidate header against the template header.
///
/// Returns early only for a header-less candidate and for differing paragraph
/// counts; everything else is accumulated so the submitter sees every fix at
/// once. Images and tables are compared by count only.
pub fn compare(template: &HeaderStructure, candidate: &HeaderStructure) -> Verdict {
    if candidate.is_empty() {
        return Verdict::new(vec![Finding::NoHeaderContent]);
    }

    if template.paragraphs.len() != candidate.paragraphs.len() {
        return Verdict::new(vec![Finding::ParagraphCount {
            expected: template.paragraphs.len(),
            actual: candidate.paragraphs.len(),
        }]);
    }

    let mut findings = Vec::new();

    for (index, (t, c)) in template.paragraphs.iter().zip(&candidate.paragraphs).enumerate() {
        let differences = compare_paragraphs(t, c);
        if !differences.is_empty() {
            findings.push(Finding::Paragraph { index, differences });
        }
    }

    if template.images.len() != candidate.images.len() {
        findings.push(Finding::ImageCount {
            expected: template.images.len(),
            actual: candidate.images.len(),
        });
    }

    if template.tables.len() != candidate.tables.len() {
        findings.push(Finding::TableCount {
            expected: template.tables.len(),
            actual: candidate.tables.len(),
        });
    }

    Verdict::new(findings)
}
