use thiserror::Error;

/// Result type alias using ModelDiffError
pub type Result<T> = std::result::Result<T, ModelDiffError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that can be used for programmatic
/// error handling, testing, and display in review screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Declaration
    ImproperlyConfigured,
    InvalidFieldList,
    UnknownField,
    UnknownModel,

    // Comparison
    TypeMismatch,
    InvalidValue,
    DepthExceeded,
    NotFound,

    // Rendering
    TemplateNotFound,
    Render,

    // Integration/IO
    Serialization,
    Io,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::ImproperlyConfigured => "ERR_IMPROPERLY_CONFIGURED",
            ExErrorKind::InvalidFieldList => "ERR_INVALID_FIELD_LIST",
            ExErrorKind::UnknownField => "ERR_UNKNOWN_FIELD",
            ExErrorKind::UnknownModel => "ERR_UNKNOWN_MODEL",
            ExErrorKind::TypeMismatch => "ERR_TYPE_MISMATCH",
            ExErrorKind::InvalidValue => "ERR_INVALID_VALUE",
            ExErrorKind::DepthExceeded => "ERR_DEPTH_EXCEEDED",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::TemplateNotFound => "ERR_TEMPLATE_NOT_FOUND",
            ExErrorKind::Render => "ERR_RENDER",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries classification fields for programmatic handling and context
/// (operation, comparator, field) for debugging.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    comparator: Option<String>,
    field: Option<String>,
    message: String,
    fields: Option<Vec<String>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            comparator: None,
            field: None,
            message: String::new(),
            fields: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add comparator name context
    pub fn with_comparator(mut self, name: impl Into<String>) -> Self {
        self.comparator = Some(name.into());
        self
    }

    /// Add field name context
    pub fn with_field(mut self, name: impl Into<String>) -> Self {
        self.field = Some(name.into());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add the full list of offending field names (used for UnknownField)
    pub fn with_fields(mut self, names: Vec<String>) -> Self {
        self.fields = Some(names);
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

    pub fn comparator(&self) -> Option<&str> {
        self.comparator.as_deref()
    }

    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Offending field names, if any (populated on UnknownField)
    pub fn fields(&self) -> Option<&[String]> {
        self.fields.as_deref()
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
        if let Some(comparator) = &self.comparator {
            write!(f, " (comparator: {})", comparator)?;
        }
        if let Some(field) = &self.field {
            write!(f, " (field: {})", field)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Error taxonomy for comparator declaration, comparison and rendering
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelDiffError {
    // ===== Declaration Errors =====
    /// Comparator declaration is incomplete or inconsistent
    #[error("Comparator {comparator} is improperly configured: {reason}")]
    ImproperlyConfigured { comparator: String, reason: String },

    /// `fields` or `exclude` was given as a bare string
    #[error(
        "{comparator}.{option} cannot be a string. Did you mean to type: ['{value}']?"
    )]
    FieldListIsString {
        comparator: String,
        option: String,
        value: String,
    },

    /// Field names that exist neither on the model nor among declared fields
    #[error("Unknown field(s) ({}) specified for {model}", fields.join(", "))]
    UnknownFields { model: String, fields: Vec<String> },

    /// Model is not known to the schema
    #[error("Unknown model: {model}")]
    UnknownModel { model: String },

    // ===== Comparison Errors =====
    /// Both compared values are present but of different types
    #[error("Types of first and second comparing objects are not the same: {first} vs {second}")]
    TypeMismatch { first: String, second: String },

    /// A relation field yielded a value that is not a record
    #[error("Field {field} expected {expected}, got {found}")]
    UnexpectedValue {
        field: String,
        expected: String,
        found: String,
    },

    /// Nested comparison exceeded the configured depth
    #[error("Comparison of {model} exceeds maximum nesting depth {max_depth}")]
    DepthExceeded { model: String, max_depth: usize },

    /// Lookup of a field that is not registered on the comparator
    #[error("Field {field} is not registered on comparator {comparator}")]
    FieldNotFound { comparator: String, field: String },

    // ===== Rendering Errors =====
    /// Renderer has no template with this name
    #[error("Template not found: {template}")]
    TemplateNotFound { template: String },

    /// Renderer failed
    #[error("Render failed for template {template}: {message}")]
    Render { template: String, message: String },

    // ===== Internal Errors =====
    /// Configuration or context (de)serialization failed
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// Reading a catalog file failed
    #[error("Failed to read {path}: {message}")]
    Io { path: String, message: String },
}

impl From<ModelDiffError> for ExError {
    fn from(err: ModelDiffError) -> Self {
        match err {
            ModelDiffError::ImproperlyConfigured { comparator, reason } => {
                ExError::new(ExErrorKind::ImproperlyConfigured)
                    .with_comparator(comparator)
                    .with_message(reason)
            }

            ModelDiffError::FieldListIsString {
                comparator,
                option,
                value,
            } => ExError::new(ExErrorKind::InvalidFieldList)
                .with_comparator(comparator)
                .with_field(value.clone())
                .with_message(format!(
                    "`{}` cannot be a string, did you mean ['{}']?",
                    option, value
                )),

            ModelDiffError::UnknownFields { model, fields } => {
                ExError::new(ExErrorKind::UnknownField)
                    .with_message(format!(
                        "Unknown field(s) ({}) specified for {}",
                        fields.join(", "),
                        model
                    ))
                    .with_fields(fields)
            }

            ModelDiffError::UnknownModel { model } => ExError::new(ExErrorKind::UnknownModel)
                .with_message(format!("Unknown model: {}", model)),

            ModelDiffError::TypeMismatch { first, second } => {
                ExError::new(ExErrorKind::TypeMismatch)
                    .with_message(format!("{} vs {}", first, second))
            }

            ModelDiffError::UnexpectedValue {
                field,
                expected,
                found,
            } => ExError::new(ExErrorKind::InvalidValue)
                .with_field(field)
                .with_message(format!("expected {}, got {}", expected, found)),

            ModelDiffError::DepthExceeded { model, max_depth } => {
                ExError::new(ExErrorKind::DepthExceeded).with_message(format!(
                    "{} nested deeper than {}",
                    model, max_depth
                ))
            }

            ModelDiffError::FieldNotFound { comparator, field } => {
                ExError::new(ExErrorKind::NotFound)
                    .with_comparator(comparator)
                    .with_field(field)
                    .with_message("Field not registered")
            }

            ModelDiffError::TemplateNotFound { template } => {
                ExError::new(ExErrorKind::TemplateNotFound)
                    .with_message(format!("Template not found: {}", template))
            }

            ModelDiffError::Render { template, message } => ExError::new(ExErrorKind::Render)
                .with_message(format!("{}: {}", template, message)),

            ModelDiffError::Serialization { message } => {
                ExError::new(ExErrorKind::Serialization).with_message(message)
            }

            ModelDiffError::Io { path, message } => {
                ExError::new(ExErrorKind::Io).with_message(format!("{}: {}", path, message))
            }
        }
    }
}

impl From<serde_json::Error> for ModelDiffError {
    fn from(err: serde_json::Error) -> Self {
        ModelDiffError::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for ModelDiffError {
    fn from(err: toml::de::Error) -> Self {
        ModelDiffError::Serialization {
            message: err.to_string(),
        }
    }
}
