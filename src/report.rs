use std::fmt::Write;

use crate::compare::{Finding, Verdict};
use crate::model::HeaderStructure;

pub const NO_HEADER_MESSAGE: &str = "Uploaded document has no header content";

const RULE_WIDTH: usize = 60;

fn finding_lines(finding: &Finding, lines: &mut Vec<String>) {
    match finding {
        Finding::Paragraph { index, differences } => {
            lines.push(format!("Paragraph {}:", index + 1));
            lines.extend(differences.iter().map(|d| format!("  - {d}")));
        }
        Finding::ImageCount { expected, actual } => lines.push(format!(
            "Image count mismatch: Template has {expected} images but uploaded document has {actual} images"
        )),
        Finding::TableCount { expected, actual } => lines.push(format!(
            "Table count mismatch: Template has {expected} tables but uploaded document has {actual} tables"
        )),
        // gates never share a verdict with other findings
        Finding::NoHeaderContent | Finding::ParagraphCount { .. } => {}
    }
}

pub(crate) fn render(verdict: &Verdict) -> String {
    let template = verdict.template_name();
    match verdict.findings() {
        [] => String::new(),
        [Finding::NoHeaderContent] => NO_HEADER_MESSAGE.to_string(),
        [Finding::ParagraphCount { expected, actual }] => format!(
            "Header structure mismatch: Template has {expected} paragraphs \
             but uploaded document has {actual} paragraphs. \
             Please use the exact {template} header."
        ),
        findings => {
            let mut lines = Vec::new();
            for finding in findings {
                finding_lines(finding, &mut lines);
            }
            format!(
                "Document header does not match the required template exactly. \
                 Please ensure you copy the header from {template} exactly \
                 (including fonts, sizes, and formatting).\n\n\
                 Differences found:\n{}",
                lines.join("\n")
            )
        }
    }
}

/// Operator-facing dump of a header structure.
pub fn preview(structure: &HeaderStructure) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let mut out = String::new();

    // writeln! into a String cannot fail
    let _ = writeln!(out, "{rule}\nTEMPLATE HEADER STRUCTURE\n{rule}");

    for (idx, para) in structure.paragraphs.iter().enumerate() {
        let _ = writeln!(out, "\nParagraph {}:", idx + 1);
        let _ = writeln!(out, "  Text: {}", para.text);
        let _ = writeln!(out, "  Alignment: {}", para.alignment);
        if para.runs.is_empty() {
            continue;
        }
        let _ = writeln!(out, "  Runs: {}", para.runs.len());
        for (run_idx, run) in para.runs.iter().enumerate() {
            if run.text.is_empty() {
                continue;
            }
            let mut style = Vec::new();
            if run.bold.is_on() {
                style.push("Bold");
            }
            if run.italic.is_on() {
                style.push("Italic");
            }
            if run.underline.is_on() {
                style.push("Underline");
            }
            let style = if style.is_empty() { "Normal".to_string() } else { style.join(", ") };
            let _ = writeln!(
                out,
                "    Run {}: '{}' | Font: {} | Size: {}pt | Style: {style}",
                run_idx + 1,
                run.text,
                run.font_name,
                run.font_size,
            );
        }
    }

    if !structure.images.is_empty() {
        let _ = writeln!(out, "\nImages: {}", structure.images.len());
        for (idx, image) in structure.images.iter().enumerate() {
            let _ = writeln!(out, "  Image {}: {}", idx + 1, image.target);
        }
    }

    if !structure.tables.is_empty() {
        let _ = writeln!(out, "\nTables: {}", structure.tables.len());
    }

    out.push_str(&rule);
    out
}
