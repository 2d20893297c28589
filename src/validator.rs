use std::ffi::OsString;
use std::io::{Read, Seek};
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use log::{debug, error, info, warn};

use crate::compare::{self, Verdict};
use crate::docx::DocxPackage;
use crate::error::{Error, PackageError};
use crate::model::HeaderStructure;
use crate::report;

/// Environment variable naming the reference template for [`HeaderValidator::from_env`].
pub const TEMPLATE_ENV: &str = "DOCX_HEADER_TEMPLATE";

/// Template looked up in the working directory when nothing is configured.
pub const DEFAULT_TEMPLATE_FILE: &str = "Template.docx";

/// The reference header every upload is compared against.
#[derive(Debug)]
pub struct ReferenceTemplate {
    path: PathBuf,
    structure: HeaderStructure,
}

impl ReferenceTemplate {
    pub fn load(path: &Path) -> Result<Self, Error> {
        if !path.is_file() {
            return Err(Error::TemplateMissing(path.to_path_buf()));
        }

        let structure = DocxPackage::open(path)
            .and_then(|mut pkg| pkg.header_structure())
            .map_err(|source| Error::TemplateUnreadable { path: path.to_path_buf(), source })?;

        if structure.is_empty() {
            return Err(Error::TemplateEmpty(path.to_path_buf()));
        }

        info!(
            "loaded header template {}: {} paragraph(s), {} image(s), {} table(s)",
            path.display(),
            structure.paragraphs.len(),
            structure.images.len(),
            structure.tables.len()
        );

        Ok(ReferenceTemplate { path: path.to_path_buf(), structure })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn structure(&self) -> &HeaderStructure {
        &self.structure
    }

    fn display_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| DEFAULT_TEMPLATE_FILE.to_string())
    }
}

/// Validates uploaded documents against a reference header template.
///
/// The template is read once and cached. Loading happens outside the lock and
/// the result is published afterwards, so two threads racing on first use both
/// compute the same value and the last one wins. Share one instance (for
/// example behind an `Arc`) across request handlers.
pub struct HeaderValidator {
    template_path: PathBuf,
    reference: RwLock<Option<Arc<ReferenceTemplate>>>,
}

impl HeaderValidator {
    pub fn new(template_path: impl Into<PathBuf>) -> Self {
        HeaderValidator { template_path: template_path.into(), reference: RwLock::new(None) }
    }

    /// Template path from `DOCX_HEADER_TEMPLATE`, falling back to `Template.docx`.
    pub fn from_env() -> Self {
        Self::new(template_path_from(std::env::var_os(TEMPLATE_ENV)))
    }

    pub fn template_path(&self) -> &Path {
        &self.template_path
    }

    /// Read the template now, replacing any cached copy.
    ///
    /// Call this at startup so a misconfigured template fails loudly before
    /// the first upload arrives.
    pub fn initialize(&self) -> Result<Arc<ReferenceTemplate>, Error> {
        let loaded = match ReferenceTemplate::load(&self.template_path) {
            Ok(t) => Arc::new(t),
            Err(e) => {
                error!("header template unusable: {e}");
                return Err(e);
            }
        };
        *self.reference.write().unwrap_or_else(PoisonError::into_inner) = Some(loaded.clone());
        Ok(loaded)
    }

    /// Drop the cached template; the next call reads it again.
    pub fn reset(&self) {
        *self.reference.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// The cached template, loading it on first use.
    pub fn reference(&self) -> Result<Arc<ReferenceTemplate>, Error> {
        let cached = self.reference.read().unwrap_or_else(PoisonError::into_inner).clone();
        match cached {
            Some(t) => Ok(t),
            None => self.initialize(),
        }
    }

    /// Validate the DOCX file at `candidate`.
    pub fn validate(&self, candidate: &Path) -> Result<Verdict, Error> {
        let reference = self.reference()?;
        let structure = read_candidate(DocxPackage::open(candidate))?;
        let verdict = self.judge(&reference, &structure);
        debug!("{}: valid={}", candidate.display(), verdict.is_valid());
        Ok(verdict)
    }

    /// Validate an upload that is already in memory or behind a stream.
    pub fn validate_reader<R: Read + Seek>(&self, reader: R) -> Result<Verdict, Error> {
        let reference = self.reference()?;
        let structure = read_candidate(DocxPackage::from_reader(reader))?;
        Ok(self.judge(&reference, &structure))
    }

    pub fn validate_bytes(&self, bytes: &[u8]) -> Result<Verdict, Error> {
        let reference = self.reference()?;
        let structure = read_candidate(DocxPackage::from_bytes(bytes))?;
        Ok(self.judge(&reference, &structure))
    }

    /// Human-readable dump of the template header.
    pub fn template_preview(&self) -> Result<String, Error> {
        Ok(report::preview(self.reference()?.structure()))
    }

    fn judge(&self, reference: &ReferenceTemplate, candidate: &HeaderStructure) -> Verdict {
        let verdict = compare::compare(&reference.structure, candidate)
            .with_template_name(reference.display_name());
        if !verdict.is_valid() {
            debug!("header mismatch: {} finding(s)", verdict.findings().len());
        }
        verdict
    }
}

fn template_path_from(configured: Option<OsString>) -> PathBuf {
    configured
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_TEMPLATE_FILE))
}

fn read_candidate<R: Read + Seek>(
    package: Result<DocxPackage<R>, PackageError>,
) -> Result<HeaderStructure, Error> {
    package
        .and_then(|mut pkg| pkg.header_structure())
        .map_err(|e| {
            warn!("rejecting unreadable upload: {e}");
            Error::DocumentUnreadable(e)
        })
}
