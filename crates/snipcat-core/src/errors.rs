use serde::{Deserialize, Serialize};
use snipcat_core_types::RequestId;
use thiserror::Error;

/// Result type alias using SnipcatError
pub type Result<T> = std::result::Result<T, SnipcatError>;

/// Result type alias using the structured ExError
pub type ExResult<T> = std::result::Result<T, ExError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that can be used for programmatic
/// error handling, testing, and external API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Structural/Validation
    InvalidInput,
    NotFound,
    AlreadyExists,

    // Preview
    /// Render requested while the host surface is not mounted
    PreviewUnmounted,
    /// A sandbox capability that would let rendered code reach the host
    IsolationViolation,

    // Integration/IO
    Io,
    Serialization,
    Persistence,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::AlreadyExists => "ERR_ALREADY_EXISTS",
            ExErrorKind::PreviewUnmounted => "ERR_PREVIEW_UNMOUNTED",
            ExErrorKind::IsolationViolation => "ERR_ISOLATION_VIOLATION",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// A single rejected form field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Canonical structured error type
///
/// Classification fields for programmatic handling plus context for debugging.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    entity_id: Option<String>,
    request_id: Option<RequestId>,
    message: String,
    source: Option<Box<ExError>>,
    violations: Vec<FieldViolation>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity_id: None,
            request_id: None,
            message: String::new(),
            source: None,
            violations: Vec::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add entity ID context
    pub fn with_entity_id(mut self, id: impl Into<String>) -> Self {
        self.entity_id = Some(id.into());
        self
    }

    /// Add request ID context
    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = Some(request_id);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Attach the rejected fields of a validation failure
    pub fn with_violations(mut self, violations: Vec<FieldViolation>) -> Self {
        self.violations = violations;
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    pub fn request_id(&self) -> Option<&RequestId> {
        self.request_id.as_ref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }

    /// Field violations, empty unless this is a validation failure
    pub fn violations(&self) -> &[FieldViolation] {
        &self.violations
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(entity_id) = &self.entity_id {
            write!(f, " (entity_id: {})", entity_id)?;
        }
        if let Some(request_id) = &self.request_id {
            write!(f, " (request_id: {})", request_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Domain error taxonomy for SnipCat operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SnipcatError {
    // ===== Catalog =====
    #[error("Category not found: {slug}")]
    CategoryNotFound { slug: String },

    #[error("Category id not found: {category_id}")]
    CategoryIdNotFound { category_id: i64 },

    #[error("Snippet not found: {snippet_id}")]
    SnippetNotFound { snippet_id: i64 },

    /// A category with the same name or slug already exists
    #[error("Category {field} already exists: {value}")]
    DuplicateCategory { field: String, value: String },

    /// One or more form fields failed validation
    #[error("Validation failed: {}", format_violations(.violations))]
    Validation { violations: Vec<FieldViolation> },

    // ===== Preview =====
    /// The host surface for the isolated context is not mounted
    #[error("Preview surface is not mounted")]
    PreviewUnmounted,

    /// The capability would let rendered code escape its context
    #[error("Sandbox capability {capability} breaks preview isolation")]
    UnsafeSandboxCapability { capability: String },

    // ===== Internal =====
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

fn format_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<SnipcatError> for ExError {
    fn from(err: SnipcatError) -> Self {
        match err {
            SnipcatError::CategoryNotFound { slug } => ExError::new(ExErrorKind::NotFound)
                .with_entity_id(slug)
                .with_message("Category not found"),

            SnipcatError::CategoryIdNotFound { category_id } => {
                ExError::new(ExErrorKind::InvalidInput)
                    .with_entity_id(category_id.to_string())
                    .with_message("Category does not exist")
                    .with_violations(vec![FieldViolation::new(
                        "categoryId",
                        "Category does not exist",
                    )])
            }

            SnipcatError::SnippetNotFound { snippet_id } => ExError::new(ExErrorKind::NotFound)
                .with_entity_id(snippet_id.to_string())
                .with_message("Snippet not found"),

            SnipcatError::DuplicateCategory { field, value } => {
                ExError::new(ExErrorKind::AlreadyExists)
                    .with_entity_id(value)
                    .with_message(format!("Category {} already exists", field))
            }

            SnipcatError::Validation { violations } => ExError::new(ExErrorKind::InvalidInput)
                .with_message("Validation failed")
                .with_violations(violations),

            SnipcatError::PreviewUnmounted => ExError::new(ExErrorKind::PreviewUnmounted)
                .with_op("render")
                .with_message("Preview surface must be mounted before rendering"),

            SnipcatError::UnsafeSandboxCapability { capability } => {
                ExError::new(ExErrorKind::IsolationViolation)
                    .with_entity_id(capability)
                    .with_message("Capability would let rendered code reach the host")
            }

            SnipcatError::Serialization { message } => {
                ExError::new(ExErrorKind::Serialization).with_message(message)
            }

            SnipcatError::Internal { message } => {
                ExError::new(ExErrorKind::Internal).with_message(message)
            }
        }
    }
}

/// Conversion from serde_json::Error to SnipcatError
impl From<serde_json::Error> for SnipcatError {
    fn from(err: serde_json::Error) -> Self {
        SnipcatError::Serialization {
            message: err.to_string(),
        }
    }
}
