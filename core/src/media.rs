// Image selection from the file picker and drag-and-drop

use crate::models::{ImageOrigin, SelectedImage};
use crate::validation::{ImageConstraints, ValidationError};

/// A file handed over by the browser, already read into memory
#[derive(Debug, Clone, PartialEq)]
pub struct FileBlob {
    pub name: String,
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl FileBlob {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            data,
        }
    }

    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }
}

/// Holds at most one selected image.
///
/// Any selection attempt replaces the previous one: a rejected file clears
/// the selection so a stale preview never lingers next to an error.
#[derive(Debug, Clone, Default)]
pub struct MediaSelection {
    constraints: ImageConstraints,
    current: Option<SelectedImage>,
}

impl MediaSelection {
    pub fn new(constraints: ImageConstraints) -> Self {
        Self {
            constraints,
            current: None,
        }
    }

    pub fn constraints(&self) -> &ImageConstraints {
        &self.constraints
    }

    pub fn current(&self) -> Option<&SelectedImage> {
        self.current.as_ref()
    }

    /// Validate and select a file from the picker
    pub fn select_from_file(&mut self, file: FileBlob) -> Result<&SelectedImage, ValidationError> {
        self.current = None;
        self.constraints.validate(&file.mime_type, file.size_bytes())?;
        let image = SelectedImage::new(
            file.name,
            file.mime_type.to_ascii_lowercase(),
            file.data,
            ImageOrigin::FilePicker,
        );
        Ok(&*self.current.insert(image))
    }

    /// Vet a file from its declared type and size before any bytes are
    /// read. `dropped` adds the drag-and-drop `image/*` check. A rejection
    /// clears the current selection.
    pub fn check_declared(
        &mut self,
        mime_type: &str,
        size_bytes: usize,
        dropped: bool,
    ) -> Result<(), ValidationError> {
        let result = if dropped && !mime_type.to_ascii_lowercase().starts_with("image/") {
            Err(ValidationError::NotAnImage(mime_type.to_string()))
        } else {
            self.constraints.validate(mime_type, size_bytes)
        };
        if result.is_err() {
            self.current = None;
        }
        result
    }

    /// Select from a drop event. Only the first file counts, and it must
    /// at least claim to be an image before the regular checks run.
    pub fn select_dropped(&mut self, files: Vec<FileBlob>) -> Result<&SelectedImage, ValidationError> {
        let Some(first) = files.into_iter().next() else {
            self.current = None;
            return Err(ValidationError::MissingImage);
        };
        if !first.mime_type.to_ascii_lowercase().starts_with("image/") {
            self.current = None;
            return Err(ValidationError::NotAnImage(first.mime_type));
        }
        self.select_from_file(first)
    }

    /// Adopt an image produced by the camera. Captures are always JPEG,
    /// so only the size is checked.
    pub fn accept_capture(&mut self, image: SelectedImage) -> Result<&SelectedImage, ValidationError> {
        self.current = None;
        self.constraints.check_size(image.size_bytes())?;
        Ok(&*self.current.insert(image))
    }

    pub fn clear(&mut self) {
        self.current = None;
    }

    /// Hand the selection to the caller, leaving this holder empty
    pub fn take(&mut self) -> Option<SelectedImage> {
        self.current.take()
    }
}
