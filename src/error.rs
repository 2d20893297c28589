use std::fmt;
use std::path::PathBuf;

/// Low-level failure while reading a DOCX package.
#[derive(Debug)]
pub enum PackageError {
    InvalidDocx(String),
    Zip(zip::result::ZipError),
    Xml(roxmltree::Error),
    Io(std::io::Error),
}

impl fmt::Display for PackageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PackageError::InvalidDocx(reason) => write!(f, "not a Word document: {reason}"),
            PackageError::Zip(e) => write!(f, "damaged document archive: {e}"),
            PackageError::Xml(e) => write!(f, "malformed document XML: {e}"),
            PackageError::Io(e) => write!(f, "read failed: {e}"),
        }
    }
}

impl std::error::Error for PackageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PackageError::InvalidDocx(_) => None,
            PackageError::Zip(e) => Some(e),
            PackageError::Xml(e) => Some(e),
            PackageError::Io(e) => Some(e),
        }
    }
}

impl From<zip::result::ZipError> for PackageError {
    fn from(e: zip::result::ZipError) -> Self {
        PackageError::Zip(e)
    }
}

impl From<roxmltree::Error> for PackageError {
    fn from(e: roxmltree::Error) -> Self {
        PackageError::Xml(e)
    }
}

impl From<std::io::Error> for PackageError {
    fn from(e: std::io::Error) -> Self {
        PackageError::Io(e)
    }
}

/// Errors surfaced by [`crate::HeaderValidator`].
///
/// The three `Template*` variants are configuration defects and make the
/// validator unusable until fixed. `DocumentUnreadable` only rejects the one
/// submission. A header that does not match is not an error at all, see
/// [`crate::Verdict`].
#[derive(Debug)]
pub enum Error {
    TemplateMissing(PathBuf),
    TemplateEmpty(PathBuf),
    TemplateUnreadable { path: PathBuf, source: PackageError },
    DocumentUnreadable(PackageError),
}

impl Error {
    pub fn is_template_error(&self) -> bool {
        !matches!(self, Error::DocumentUnreadable(_))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::TemplateMissing(path) => {
                write!(f, "template file not found at: {}", path.display())
            }
            Error::TemplateEmpty(path) => {
                write!(f, "template document has no header content: {}", path.display())
            }
            Error::TemplateUnreadable { path, source } => {
                write!(f, "failed to load template header from {}: {source}", path.display())
            }
            Error::DocumentUnreadable(e) => write!(f, "could not read the uploaded document: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::TemplateUnreadable { source, .. } => Some(source),
            Error::DocumentUnreadable(e) => Some(e),
            _ => None,
        }
    }
}
