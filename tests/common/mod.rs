//! Builds small DOCX packages for the integration tests.

#![allow(dead_code)]

use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use zip::write::SimpleFileOptions;

const NAMESPACES: &str = concat!(
    r#"xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" "#,
    r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" "#,
    r#"xmlns:wp="http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing" "#,
    r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" "#,
    r#"xmlns:pic="http://schemas.openxmlformats.org/drawingml/2006/picture""#,
);

const HEADER_REL: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/header";
const IMAGE_REL: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";

// 1x1 transparent PNG
const PNG: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
    0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F,
    0x15, 0xC4, 0x89, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x00,
    0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00, 0x00, 0x00, 0x49,
    0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
];

#[derive(Clone, Default)]
pub struct RunSpec {
    text: String,
    bold: Option<bool>,
    italic: Option<bool>,
    underline: Option<String>,
    font: Option<String>,
    size: Option<f64>,
    drawing: Option<String>,
}

pub fn run(text: &str) -> RunSpec {
    RunSpec { text: text.to_string(), ..Default::default() }
}

/// A run holding an inline picture that points at header image relationship `rel_id`.
pub fn picture(rel_id: &str) -> RunSpec {
    RunSpec { drawing: Some(rel_id.to_string()), ..Default::default() }
}

fn on_off(name: &str, on: bool) -> String {
    if on { format!("<w:{name}/>") } else { format!(r#"<w:{name} w:val="0"/>"#) }
}

impl RunSpec {
    pub fn bold(mut self, on: bool) -> Self {
        self.bold = Some(on);
        self
    }

    pub fn italic(mut self, on: bool) -> Self {
        self.italic = Some(on);
        self
    }

    pub fn underline(mut self, style: &str) -> Self {
        self.underline = Some(style.to_string());
        self
    }

    pub fn font(mut self, name: &str) -> Self {
        self.font = Some(name.to_string());
        self
    }

    pub fn size(mut self, points: f64) -> Self {
        self.size = Some(points);
        self
    }

    fn props(&self) -> String {
        let mut props = String::new();
        if let Some(name) = &self.font {
            props.push_str(&format!(r#"<w:rFonts w:ascii="{name}" w:hAnsi="{name}"/>"#));
        }
        if let Some(on) = self.bold {
            props.push_str(&on_off("b", on));
        }
        if let Some(on) = self.italic {
            props.push_str(&on_off("i", on));
        }
        if let Some(points) = self.size {
            let half_points = (points * 2.0).round() as u32;
            props.push_str(&format!(r#"<w:sz w:val="{half_points}"/>"#));
        }
        if let Some(style) = &self.underline {
            props.push_str(&format!(r#"<w:u w:val="{style}"/>"#));
        }
        props
    }

    fn xml(&self) -> String {
        let mut out = String::from("<w:r>");
        let props = self.props();
        if !props.is_empty() {
            out.push_str(&format!("<w:rPr>{props}</w:rPr>"));
        }
        if let Some(rel_id) = &self.drawing {
            out.push_str(&format!(
                r#"<w:drawing><wp:inline><wp:extent cx="914400" cy="914400"/><wp:docPr id="1" name="Logo"/><a:graphic><a:graphicData uri="http://schemas.openxmlformats.org/drawingml/2006/picture"><pic:pic><pic:blipFill><a:blip r:embed="{rel_id}"/></pic:blipFill></pic:pic></a:graphicData></a:graphic></wp:inline></w:drawing>"#
            ));
        }
        if !self.text.is_empty() {
            out.push_str(&format!(r#"<w:t xml:space="preserve">{}</w:t>"#, self.text));
        }
        out.push_str("</w:r>");
        out
    }
}

/// The letterhead line used throughout the tests: Arial 12pt, not bold.
pub fn plain(text: &str) -> RunSpec {
    run(text).bold(false).font("Arial").size(12.0)
}

#[derive(Clone)]
pub struct ParaSpec {
    jc: Option<String>,
    runs: Vec<RunSpec>,
}

pub fn para(runs: Vec<RunSpec>) -> ParaSpec {
    ParaSpec { jc: None, runs }
}

pub fn centered(runs: Vec<RunSpec>) -> ParaSpec {
    para(runs).align("center")
}

pub fn blank() -> ParaSpec {
    para(vec![])
}

impl ParaSpec {
    pub fn align(mut self, jc: &str) -> Self {
        self.jc = Some(jc.to_string());
        self
    }

    fn xml(&self) -> String {
        let mut out = String::from("<w:p>");
        if let Some(jc) = &self.jc {
            out.push_str(&format!(r#"<w:pPr><w:jc w:val="{jc}"/></w:pPr>"#));
        }
        for run in &self.runs {
            out.push_str(&run.xml());
        }
        out.push_str("</w:p>");
        out
    }
}

#[derive(Clone)]
pub struct HeaderSpec {
    paragraphs: Vec<ParaSpec>,
    images: usize,
    tables: usize,
}

pub fn header(paragraphs: Vec<ParaSpec>) -> HeaderSpec {
    HeaderSpec { paragraphs, images: 0, tables: 0 }
}

impl HeaderSpec {
    /// Add image relationships `rIdImg1..=rIdImgN` to the header part.
    pub fn images(mut self, count: usize) -> Self {
        self.images = count;
        self
    }

    pub fn tables(mut self, count: usize) -> Self {
        self.tables = count;
        self
    }

    fn xml(&self) -> String {
        let mut out = format!(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:hdr {NAMESPACES}>"#);
        for p in &self.paragraphs {
            out.push_str(&p.xml());
        }
        for i in 0..self.tables {
            out.push_str(&format!(
                "<w:tbl><w:tr><w:tc><w:p><w:r><w:t>Cell {}</w:t></w:r></w:p></w:tc></w:tr></w:tbl>",
                i + 1
            ));
        }
        out.push_str("</w:hdr>");
        out
    }

    fn rels_xml(&self) -> String {
        let mut out = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
        );
        for i in 1..=self.images {
            out.push_str(&format!(
                r#"<Relationship Id="rIdImg{i}" Type="{IMAGE_REL}" Target="media/image{i}.png"/>"#
            ));
        }
        out.push_str("</Relationships>");
        out
    }
}

fn add(zip: &mut zip::ZipWriter<Cursor<Vec<u8>>>, name: String, data: &[u8]) {
    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
    zip.start_file(name, options).unwrap();
    zip.write_all(data).unwrap();
}

/// A DOCX package; each section optionally owns a default header.
#[derive(Clone, Default)]
pub struct DocxSpec {
    headers: Vec<HeaderSpec>,
    sections: Vec<Option<usize>>,
}

impl DocxSpec {
    pub fn with_header(header: HeaderSpec) -> Self {
        DocxSpec::default().section(Some(header))
    }

    pub fn without_header() -> Self {
        DocxSpec::default().section(None)
    }

    /// Append a section. `None` leaves it linked to the previous header.
    pub fn section(mut self, header: Option<HeaderSpec>) -> Self {
        let index = header.map(|h| {
            self.headers.push(h);
            self.headers.len() - 1
        });
        self.sections.push(index);
        self
    }

    fn sect_pr(header: Option<usize>) -> String {
        let reference = header
            .map(|i| format!(r#"<w:headerReference w:type="default" r:id="rIdHdr{}"/>"#, i + 1))
            .unwrap_or_default();
        format!(r#"<w:sectPr>{reference}<w:pgSz w:w="12240" w:h="15840"/></w:sectPr>"#)
    }

    fn document_xml(&self) -> String {
        let mut body = String::new();
        let last = self.sections.len().saturating_sub(1);
        for (i, section) in self.sections.iter().enumerate() {
            body.push_str(&format!("<w:p><w:r><w:t>Body of section {}</w:t></w:r></w:p>", i + 1));
            if i < last {
                body.push_str(&format!("<w:p><w:pPr>{}</w:pPr></w:p>", Self::sect_pr(*section)));
            } else {
                body.push_str(&Self::sect_pr(*section));
            }
        }
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:document {NAMESPACES}><w:body>{body}</w:body></w:document>"#
        )
    }

    fn document_rels_xml(&self) -> String {
        let mut out = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
        );
        for i in 1..=self.headers.len() {
            out.push_str(&format!(
                r#"<Relationship Id="rIdHdr{i}" Type="{HEADER_REL}" Target="header{i}.xml"/>"#
            ));
        }
        out.push_str("</Relationships>");
        out
    }

    fn content_types_xml(&self) -> String {
        let mut overrides = String::from(
            r#"<Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>"#,
        );
        for i in 1..=self.headers.len() {
            overrides.push_str(&format!(
                r#"<Override PartName="/word/header{i}.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.header+xml"/>"#
            ));
        }
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Default Extension="png" ContentType="image/png"/>{overrides}</Types>"#
        )
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));

        add(&mut zip, "[Content_Types].xml".into(), self.content_types_xml().as_bytes());
        add(
            &mut zip,
            "_rels/.rels".into(),
            br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#,
        );
        add(&mut zip, "word/document.xml".into(), self.document_xml().as_bytes());
        add(&mut zip, "word/_rels/document.xml.rels".into(), self.document_rels_xml().as_bytes());

        let mut max_images = 0;
        for (i, h) in self.headers.iter().enumerate() {
            add(&mut zip, format!("word/header{}.xml", i + 1), h.xml().as_bytes());
            add(&mut zip, format!("word/_rels/header{}.xml.rels", i + 1), h.rels_xml().as_bytes());
            max_images = max_images.max(h.images);
        }
        for i in 1..=max_images {
            add(&mut zip, format!("word/media/image{i}.png"), PNG);
        }

        zip.finish().unwrap().into_inner()
    }

    pub fn write(&self, dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, self.to_bytes()).unwrap();
        path
    }
}

/// Single-paragraph letterhead: "Republic of the Philippines", centered, Arial 12pt.
pub fn letterhead() -> HeaderSpec {
    header(vec![centered(vec![plain("Republic of the Philippines")])])
}
