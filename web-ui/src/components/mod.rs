// Components module

pub mod analyzing;
pub mod camera_capture;
pub mod error_banner;
pub mod error_modal;
pub mod image_upload;
pub mod results;
pub mod symptom_checklist;
pub mod symptom_input;
pub mod toast;

pub use analyzing::Analyzing;
pub use camera_capture::CameraCapture;
pub use error_banner::ErrorBanner;
pub use error_modal::ErrorModal;
pub use image_upload::ImageUpload;
pub use results::Results;
pub use symptom_checklist::SymptomChecklist;
pub use symptom_input::SymptomInput;
pub use toast::Toast;
