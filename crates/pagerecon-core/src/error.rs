//! Error and diagnostic types for pagerecon.
//!
//! Provides [`PdfError`] for fatal errors that stop processing,
//! [`Diagnostic`] for non-fatal events handed to an external tracker,
//! [`ExtractResult`] for pairing a value with collected diagnostics, and
//! [`ExtractOptions`] for configuring limits and diagnostic behavior.

use std::fmt;

/// Fatal error types.
///
/// Page assembly never fails; these errors come from configuration loading
/// and from strict mode escalation.
#[derive(Debug, Clone, PartialEq)]
pub enum PdfError {
    /// I/O error reading configuration data.
    IoError(String),
    /// Error in the font substitution configuration.
    ConfigError(String),
    /// A diagnostic escalated by strict mode.
    Escalated(Diagnostic),
}

impl fmt::Display for PdfError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PdfError::IoError(msg) => write!(f, "I/O error: {msg}"),
            PdfError::ConfigError(msg) => write!(f, "configuration error: {msg}"),
            PdfError::Escalated(diagnostic) => write!(f, "strict mode: {diagnostic}"),
        }
    }
}

impl std::error::Error for PdfError {}

impl From<std::io::Error> for PdfError {
    fn from(err: std::io::Error) -> Self {
        PdfError::IoError(err.to_string())
    }
}

/// How serious a diagnostic is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Severity {
    /// Degraded but usable output.
    Warning,
    /// Input was dropped or could not be resolved.
    Error,
}

/// Machine-readable diagnostic code.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "type", content = "detail")
)]
pub enum DiagnosticCode {
    /// A character arrived before any font was set.
    MissingFont,
    /// A character, path or image had a non-finite transform or coordinate.
    NonFiniteTransform,
    /// A glyph could not be resolved and the replacement character was used.
    UnresolvedGlyph,
    /// Aggregate: codes a font could not map.
    UnmappedCodes,
    /// Aggregate: a font needed a substitution table and none was configured.
    NoSubstitutionTable,
    /// A font matched a substitution entry by name but not by mapping hash.
    DuplicateMapping,
    /// A font matched neither the configuration nor a known system font.
    UnknownFont,
    /// The image codec rejected an image.
    ImageEncodingFailed,
    /// A per-page resource limit was reached; further input was dropped.
    ResourceLimitReached,
    /// A fill or stroke color had a non-finite component and was ignored.
    NonFiniteColor,
}

impl DiagnosticCode {
    /// Returns the string tag for this code.
    pub fn as_str(&self) -> &str {
        match self {
            DiagnosticCode::MissingFont => "MISSING_FONT",
            DiagnosticCode::NonFiniteTransform => "NON_FINITE_TRANSFORM",
            DiagnosticCode::UnresolvedGlyph => "UNRESOLVED_GLYPH",
            DiagnosticCode::UnmappedCodes => "UNMAPPED_CODES",
            DiagnosticCode::NoSubstitutionTable => "NO_SUBSTITUTION_TABLE",
            DiagnosticCode::DuplicateMapping => "DUPLICATE_MAPPING",
            DiagnosticCode::UnknownFont => "UNKNOWN_FONT",
            DiagnosticCode::ImageEncodingFailed => "IMAGE_ENCODING_FAILED",
            DiagnosticCode::ResourceLimitReached => "RESOURCE_LIMIT_REACHED",
            DiagnosticCode::NonFiniteColor => "NON_FINITE_COLOR",
        }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A non-fatal event emitted by the engine.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: DiagnosticCode,
    /// Human-readable description.
    pub description: String,
    /// Page number (0-indexed), if applicable.
    pub page: Option<usize>,
    /// Font name associated with the event, if applicable.
    pub font_name: Option<String>,
    /// Element context (e.g., "code 0x41").
    pub element: Option<String>,
}

impl Diagnostic {
    pub fn new(severity: Severity, code: DiagnosticCode, description: impl Into<String>) -> Self {
        Self {
            severity,
            code,
            description: description.into(),
            page: None,
            font_name: None,
            element: None,
        }
    }

    pub fn error(code: DiagnosticCode, description: impl Into<String>) -> Self {
        Self::new(Severity::Error, code, description)
    }

    pub fn warning(code: DiagnosticCode, description: impl Into<String>) -> Self {
        Self::new(Severity::Warning, code, description)
    }

    /// Attach a page number (builder pattern).
    pub fn on_page(mut self, page: usize) -> Self {
        self.page = Some(page);
        self
    }

    /// Attach a font name (builder pattern).
    pub fn with_font(mut self, font_name: impl Into<String>) -> Self {
        self.font_name = Some(font_name.into());
        self
    }

    /// Attach element context (builder pattern).
    pub fn with_element(mut self, element: impl Into<String>) -> Self {
        self.element = Some(element.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// Convert this diagnostic into a [`PdfError`] (strict mode).
    pub fn to_error(&self) -> PdfError {
        PdfError::Escalated(self.clone())
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.description)?;
        if let Some(page) = self.page {
            write!(f, " (page {page})")?;
        }
        if let Some(ref font_name) = self.font_name {
            write!(f, " [font {font_name}]")?;
        }
        if let Some(ref element) = self.element {
            write!(f, " [{element}]")?;
        }
        Ok(())
    }
}

/// Result wrapper that pairs a value with collected diagnostics.
#[derive(Debug, Clone)]
pub struct ExtractResult<T> {
    /// The extracted value.
    pub value: T,
    /// Diagnostics collected while producing the value.
    pub diagnostics: Vec<Diagnostic>,
}

impl<T> ExtractResult<T> {
    /// Create a result with no diagnostics.
    pub fn ok(value: T) -> Self {
        Self {
            value,
            diagnostics: Vec::new(),
        }
    }

    /// Create a result with diagnostics.
    pub fn with_diagnostics(value: T, diagnostics: Vec<Diagnostic>) -> Self {
        Self { value, diagnostics }
    }

    /// Returns true if there are no diagnostics.
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Transform the value while preserving diagnostics.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ExtractResult<U> {
        ExtractResult {
            value: f(self.value),
            diagnostics: self.diagnostics,
        }
    }
}

/// Options controlling assembly behavior and resource limits.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
pub struct ExtractOptions {
    /// Whether to collect diagnostics (default: true). Logging is unaffected.
    pub collect_diagnostics: bool,
    /// Keep characters drawn with an invisible render mode (default: true).
    pub keep_invisible_text: bool,
    /// Maximum characters accepted per page (default: 1,000,000).
    pub max_chars_per_page: usize,
    /// Maximum drawn paths and images accepted per page (default: 200,000).
    pub max_graphics_per_page: usize,
    /// When true, error diagnostics fail `Document::finish` (default: false).
    pub strict_mode: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            collect_diagnostics: true,
            keep_invisible_text: true,
            max_chars_per_page: 1_000_000,
            max_graphics_per_page: 200_000,
            strict_mode: false,
        }
    }
}
