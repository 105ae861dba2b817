// Client-side validation for images and symptoms

/// Validation errors.
///
/// These are resolved where they happen (the offending action is blocked
/// and a message shown in place); they never become flow failures.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please select an image to analyze")]
    MissingImage,

    #[error("The selected file is empty")]
    EmptyFile,

    #[error("Please drop an image file (got {0})")]
    NotAnImage(String),

    #[error("Unsupported file type: {0}. Please upload a JPEG or PNG image")]
    UnsupportedType(String),

    #[error("File is too large: {size_mb:.1} MB (limit: {max_mb} MB)")]
    FileTooLarge { size_mb: f64, max_mb: u32 },

    #[error("Please enter a symptom")]
    EmptySymptom,

    #[error("Symptom must be at least {min} characters")]
    SymptomTooShort { min: usize },

    #[error("Symptom must be at most {max} characters")]
    SymptomTooLong { max: usize },

    #[error("\"{0}\" has already been added")]
    DuplicateSymptom(String),

    #[error("You can add at most {0} symptoms")]
    TooManySymptoms(usize),
}

/// MIME types accepted for analysis
pub const ACCEPTED_MIME_TYPES: &[&str] = &["image/jpeg", "image/png"];

/// Size and type constraints shared by uploads and camera captures
#[derive(Debug, Clone, PartialEq)]
pub struct ImageConstraints {
    pub max_size_mb: u32,
    pub accepted_mime_types: Vec<String>,
}

impl ImageConstraints {
    pub fn new(max_size_mb: u32) -> Self {
        Self {
            max_size_mb,
            accepted_mime_types: ACCEPTED_MIME_TYPES.iter().map(|m| m.to_string()).collect(),
        }
    }

    pub fn max_bytes(&self) -> usize {
        self.max_size_mb as usize * 1024 * 1024
    }

    /// Check the byte size against the limit
    pub fn check_size(&self, size_bytes: usize) -> Result<(), ValidationError> {
        if size_bytes == 0 {
            return Err(ValidationError::EmptyFile);
        }
        if size_bytes > self.max_bytes() {
            return Err(ValidationError::FileTooLarge {
                size_mb: size_bytes as f64 / (1024.0 * 1024.0),
                max_mb: self.max_size_mb,
            });
        }
        Ok(())
    }

    /// Check the declared MIME type and size
    ///
    /// # Rules
    /// - MIME type must be one of the accepted types (case-insensitive)
    /// - Size must be non-zero and at most `max_size_mb`
    pub fn validate(&self, mime_type: &str, size_bytes: usize) -> Result<(), ValidationError> {
        let mime = mime_type.trim().to_ascii_lowercase();
        if !self.accepted_mime_types.iter().any(|m| *m == mime) {
            return Err(ValidationError::UnsupportedType(mime_type.to_string()));
        }
        self.check_size(size_bytes)
    }
}

impl Default for ImageConstraints {
    fn default() -> Self {
        Self::new(5)
    }
}
