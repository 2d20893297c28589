use std::fs::File;
use std::io::{Cursor, Read, Seek};
use std::path::Path;

use log::debug;

use crate::error::PackageError;
use crate::model::{
    Alignment, Attr, HeaderStructure, ImageRef, ParagraphRecord, RunRecord, TableRecord,
};

const WML_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const DML_NS: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
const REL_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

const MAIN_PART: &str = "word/document.xml";

struct Relationship {
    id: String,
    rel_type: String,
    target: String,
    external: bool,
}

impl Relationship {
    fn is_image(&self) -> bool {
        self.rel_type.ends_with("/image")
    }
}

fn is_wml(node: roxmltree::Node, name: &str) -> bool {
    node.is_element()
        && node.tag_name().name() == name
        && node.tag_name().namespace() == Some(WML_NS)
}

fn wml<'a>(node: roxmltree::Node<'a, 'a>, name: &str) -> Option<roxmltree::Node<'a, 'a>> {
    node.children().find(|n| is_wml(*n, name))
}

fn wml_attr<'a>(node: roxmltree::Node<'a, 'a>, child: &str) -> Option<&'a str> {
    wml(node, child).and_then(|n| n.attribute((WML_NS, "val")))
}

fn strip_bom(xml: &str) -> &str {
    xml.strip_prefix('\u{feff}').unwrap_or(xml)
}

/// `word/header1.xml` -> `word/_rels/header1.xml.rels`
fn rels_path(part: &str) -> String {
    match part.rsplit_once('/') {
        Some((dir, file)) => format!("{dir}/_rels/{file}.rels"),
        None => format!("_rels/{part}.rels"),
    }
}

/// Resolve a relationship target against the part that owns the relationship.
fn resolve_target(source_part: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }
    let mut segments: Vec<&str> = source_part.split('/').collect();
    segments.pop();
    for seg in target.split('/') {
        match seg {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }
    segments.join("/")
}

/// ST_OnOff: a bare element or any value other than false/0/off means on.
fn toggle(rpr: Option<roxmltree::Node>, name: &str) -> Attr<bool> {
    match rpr.and_then(|n| wml(n, name)) {
        None => Attr::Unset,
        Some(el) => Attr::Set(
            el.attribute((WML_NS, "val"))
                .is_none_or(|v| !matches!(v, "false" | "0" | "off")),
        ),
    }
}

/// `w:sz` is in half-points, but a universal measure like `12pt` is legal too.
fn parse_font_size(val: &str) -> Option<f64> {
    match val.strip_suffix("pt") {
        Some(pt) => pt.parse::<f64>().ok(),
        None => val.parse::<f64>().ok().map(|hp| hp / 2.0),
    }
}

fn run_text(run: roxmltree::Node) -> String {
    let mut text = String::new();
    for child in run.children() {
        if !child.is_element() || child.tag_name().namespace() != Some(WML_NS) {
            continue;
        }
        match child.tag_name().name() {
            "t" => text.push_str(child.text().unwrap_or_default()),
            "tab" | "ptab" => text.push('\t'),
            "br" => {
                // page and column breaks are not visible text
                if child
                    .attribute((WML_NS, "type"))
                    .is_none_or(|t| t == "textWrapping")
                {
                    text.push('\n');
                }
            }
            "cr" => text.push('\n'),
            "noBreakHyphen" => text.push('-'),
            _ => {}
        }
    }
    text
}

fn run_has_graphic(run: roxmltree::Node) -> bool {
    run.descendants()
        .any(|n| n.tag_name().name() == "graphic" && n.tag_name().namespace() == Some(DML_NS))
}

fn run_record(run: roxmltree::Node) -> RunRecord {
    let rpr = wml(run, "rPr");

    // any line style counts as underlined, so single vs double is not a difference
    let underline = rpr
        .and_then(|n| wml_attr(n, "u"))
        .map(|v| v != "none");

    let font_name = rpr
        .and_then(|n| wml(n, "rFonts"))
        .and_then(|n| n.attribute((WML_NS, "ascii")))
        .map(str::to_string);

    let font_size = rpr
        .and_then(|n| wml_attr(n, "sz"))
        .and_then(parse_font_size);

    RunRecord {
        text: run_text(run),
        bold: toggle(rpr, "b"),
        italic: toggle(rpr, "i"),
        underline: Attr::from_option(underline),
        font_name: Attr::from_option(font_name),
        font_size: Attr::from_option(font_size),
    }
}

fn paragraph_record(para: roxmltree::Node) -> ParagraphRecord {
    let alignment = wml(para, "pPr")
        .and_then(|ppr| wml_attr(ppr, "jc"))
        .map(Alignment::from_jc);

    let mut text = String::new();
    let mut runs = Vec::new();
    let mut has_image = false;

    for child in para.children() {
        if is_wml(child, "r") {
            text.push_str(&run_text(child));
            has_image |= run_has_graphic(child);
            runs.push(run_record(child));
        } else if is_wml(child, "hyperlink") {
            for run in child.children().filter(|n| is_wml(*n, "r")) {
                text.push_str(&run_text(run));
            }
        }
    }

    ParagraphRecord {
        text: text.trim().to_string(),
        alignment: Attr::from_option(alignment),
        has_image,
        runs,
    }
}

fn table_record(tbl: roxmltree::Node) -> TableRecord {
    let rows: Vec<Vec<ParagraphRecord>> = tbl
        .children()
        .filter(|n| is_wml(*n, "tr"))
        .map(|tr| {
            tr.children()
                .filter(|n| is_wml(*n, "tc"))
                .flat_map(|tc| tc.children().filter(|n| is_wml(*n, "p")))
                .map(paragraph_record)
                .filter(ParagraphRecord::is_significant)
                .collect()
        })
        .collect();
    TableRecord { rows }
}

/// Append the paragraphs and tables of one `w:hdr` root.
fn collect_header(hdr: roxmltree::Node, structure: &mut HeaderStructure) {
    for node in hdr.children() {
        if is_wml(node, "p") {
            let para = paragraph_record(node);
            if para.is_significant() {
                structure.paragraphs.push(para);
            }
        } else if is_wml(node, "tbl") {
            structure.tables.push(table_record(node));
        }
    }
}

fn parse_relationships(xml: &str) -> Result<Vec<Relationship>, PackageError> {
    let doc = roxmltree::Document::parse(strip_bom(xml))?;
    let rels = doc
        .root_element()
        .children()
        .filter(|n| n.is_element() && n.tag_name().name() == "Relationship")
        .filter_map(|n| {
            Some(Relationship {
                id: n.attribute("Id")?.to_string(),
                rel_type: n.attribute("Type").unwrap_or_default().to_string(),
                target: n.attribute("Target")?.to_string(),
                external: n.attribute("TargetMode") == Some("External"),
            })
        })
        .collect();
    Ok(rels)
}

/// Header part of every section, in section order. A section without its own
/// default header repeats the one of the closest preceding section.
fn section_header_parts(
    document_xml: &str,
    rels: &[Relationship],
) -> Result<Vec<String>, PackageError> {
    let xml = roxmltree::Document::parse(strip_bom(document_xml))?;
    let body = wml(xml.root_element(), "body")
        .ok_or_else(|| PackageError::InvalidDocx("missing w:body".into()))?;

    let sections = body.children().filter_map(|n| {
        if is_wml(n, "p") {
            wml(n, "pPr").and_then(|ppr| wml(ppr, "sectPr"))
        } else if is_wml(n, "sectPr") {
            Some(n)
        } else {
            None
        }
    });

    let mut parts = Vec::new();
    let mut current: Option<String> = None;

    for (index, sect) in sections.enumerate() {
        let own_ref = sect
            .children()
            .filter(|n| is_wml(*n, "headerReference"))
            .find(|n| n.attribute((WML_NS, "type")).is_none_or(|t| t == "default"))
            .and_then(|n| n.attribute((REL_NS, "id")));

        if let Some(id) = own_ref {
            let rel = rels
                .iter()
                .find(|r| r.id == id && !r.external)
                .ok_or_else(|| {
                    PackageError::InvalidDocx(format!("header reference {id} has no relationship"))
                })?;
            current = Some(resolve_target(MAIN_PART, &rel.target));
        } else {
            debug!("section {index} has no default header, linking to previous");
        }

        if let Some(part) = &current {
            parts.push(part.clone());
        }
    }

    Ok(parts)
}

/// An open DOCX package.
pub struct DocxPackage<R> {
    zip: zip::ZipArchive<R>,
}

impl DocxPackage<File> {
    pub fn open(path: &Path) -> Result<Self, PackageError> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }
}

impl<'a> DocxPackage<Cursor<&'a [u8]>> {
    pub fn from_bytes(bytes: &'a [u8]) -> Result<Self, PackageError> {
        Self::from_reader(Cursor::new(bytes))
    }
}

impl<R: Read + Seek> DocxPackage<R> {
    pub fn from_reader(reader: R) -> Result<Self, PackageError> {
        let zip = zip::ZipArchive::new(reader)?;
        Ok(DocxPackage { zip })
    }

    fn read_part(&mut self, name: &str) -> Result<Option<String>, PackageError> {
        let mut file = match self.zip.by_name(name) {
            Ok(file) => file,
            Err(zip::result::ZipError::FileNotFound) => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let mut content = String::new();
        file.read_to_string(&mut content)?;
        Ok(Some(content))
    }

    fn read_relationships(&mut self, part: &str) -> Result<Vec<Relationship>, PackageError> {
        match self.read_part(&rels_path(part))? {
            Some(xml) => parse_relationships(&xml),
            None => Ok(Vec::new()),
        }
    }

    /// Extract the header structure of every section, in section order.
    ///
    /// Only default headers are read; first-page and even-page variants are
    /// not part of the letterhead comparison. Reading the package has no side
    /// effects beyond the archive cursor.
    pub fn header_structure(&mut self) -> Result<HeaderStructure, PackageError> {
        let document = self
            .read_part(MAIN_PART)?
            .ok_or_else(|| PackageError::InvalidDocx(format!("missing {MAIN_PART}")))?;
        let rels = self.read_relationships(MAIN_PART)?;
        let parts = section_header_parts(&document, &rels)?;

        let mut structure = HeaderStructure::default();

        for part in &parts {
            let Some(xml_content) = self.read_part(part)? else {
                return Err(PackageError::InvalidDocx(format!("missing header part {part}")));
            };
            let xml = roxmltree::Document::parse(strip_bom(&xml_content))?;
            collect_header(xml.root_element(), &mut structure);

            for rel in self.read_relationships(part)? {
                if rel.is_image() {
                    structure.images.push(ImageRef { rel_id: rel.id, target: rel.target });
                } else {
                    debug!("{part}: ignoring relationship {} ({})", rel.id, rel.rel_type);
                }
            }
        }

        debug!(
            "extracted header from {} section(s): {} paragraph(s), {} image(s), {} table(s)",
            parts.len(),
            structure.paragraphs.len(),
            structure.images.len(),
            structure.tables.len()
        );

        Ok(structure)
    }
}
