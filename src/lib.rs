mod compare;
mod docx;
mod error;
mod model;
mod report;
mod validator;

pub use compare::{Difference, FONT_SIZE_TOLERANCE, Finding, Verdict, compare, compare_paragraphs};
pub use docx::DocxPackage;
pub use error::{Error, PackageError};
pub use model::{
    Alignment, Attr, HeaderStructure, ImageRef, ParagraphRecord, RunRecord, TableRecord,
};
pub use report::{NO_HEADER_MESSAGE, preview};
pub use validator::{DEFAULT_TEMPLATE_FILE, HeaderValidator, ReferenceTemplate, TEMPLATE_ENV};

use std::path::Path;

/// Read the header structure of the DOCX file at `path`.
pub fn extract_header_structure(path: &Path) -> Result<HeaderStructure, PackageError> {
    DocxPackage::open(path)?.header_structure()
}

/// One-shot validation without keeping a validator around.
pub fn validate_header(template: &Path, candidate: &Path) -> Result<Verdict, Error> {
    HeaderValidator::new(template).validate(candidate)
}
