// Camera capture sub-state machine over an abstract media capability

use image::codecs::jpeg::JpegEncoder;
use image::{imageops, DynamicImage, RgbaImage};

use crate::models::{ImageOrigin, SelectedImage};
use crate::validation::{ImageConstraints, ValidationError};

pub const CAPTURE_JPEG_QUALITY: u8 = 90;
pub const CAPTURE_FILE_NAME: &str = "camera-capture.jpg";

/// Which physical camera is requested
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FacingMode {
    /// Front camera
    #[default]
    User,
    /// Rear camera
    Environment,
}

impl FacingMode {
    pub fn opposite(self) -> Self {
        match self {
            FacingMode::User => FacingMode::Environment,
            FacingMode::Environment => FacingMode::User,
        }
    }

    /// Value of the `facingMode` media constraint
    pub fn as_constraint(self) -> &'static str {
        match self {
            FacingMode::User => "user",
            FacingMode::Environment => "environment",
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CameraError {
    #[error("Camera access was denied. Please allow camera permissions and try again")]
    PermissionDenied,

    #[error("No camera was found on this device")]
    NoDevice,

    #[error("The camera is already in use by another application")]
    DeviceBusy,

    #[error("Camera capture is not supported in this browser")]
    Unsupported,

    #[error("Failed to capture photo: {0}")]
    Capture(String),

    #[error("Failed to encode photo: {0}")]
    Encode(String),

    #[error(transparent)]
    Rejected(#[from] ValidationError),

    #[error("No active camera stream")]
    NotActive,
}

/// Raw RGBA frame grabbed from a live stream
#[derive(Debug, Clone, PartialEq)]
pub struct VideoFrame {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

/// A live device media stream
pub trait MediaStream {
    /// Render the current video frame into an off-screen bitmap
    fn grab_frame(&self) -> Result<VideoFrame, CameraError>;

    /// Stop every track. Must be safe to call more than once.
    fn stop(&mut self);

    fn is_live(&self) -> bool;
}

/// Platform media capability (`getUserMedia` in the browser, fakes in tests)
#[allow(async_fn_in_trait)]
pub trait MediaDevices {
    type Stream: MediaStream;

    async fn acquire(&self, facing: FacingMode) -> Result<Self::Stream, CameraError>;

    /// Number of video input devices; 0 when enumeration is unavailable
    async fn camera_count(&self) -> usize;
}

/// Owns a stream and stops it when dropped
#[derive(Debug)]
pub struct StreamGuard<S: MediaStream> {
    stream: S,
}

impl<S: MediaStream> StreamGuard<S> {
    pub fn new(stream: S) -> Self {
        Self { stream }
    }

    pub fn stream(&self) -> &S {
        &self.stream
    }
}

impl<S: MediaStream> Drop for StreamGuard<S> {
    fn drop(&mut self) {
        self.stream.stop();
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CameraPhase {
    Idle,
    Initializing,
    Active,
    Captured,
    Error(CameraError),
}

/// Proof of a pending start; a stream delivered for an outdated ticket is
/// stopped instead of adopted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartTicket {
    generation: u64,
    pub facing: FacingMode,
}

pub struct CameraSession<D: MediaDevices> {
    devices: D,
    constraints: ImageConstraints,
    facing: FacingMode,
    phase: CameraPhase,
    stream: Option<StreamGuard<D::Stream>>,
    captured: Option<SelectedImage>,
    generation: u64,
    camera_count: usize,
    is_mobile: bool,
}

impl<D: MediaDevices> CameraSession<D> {
    pub fn new(devices: D, constraints: ImageConstraints) -> Self {
        Self {
            devices,
            constraints,
            facing: FacingMode::default(),
            phase: CameraPhase::Idle,
            stream: None,
            captured: None,
            generation: 0,
            camera_count: 0,
            is_mobile: false,
        }
    }

    pub fn phase(&self) -> &CameraPhase {
        &self.phase
    }

    pub fn facing(&self) -> FacingMode {
        self.facing
    }

    pub fn captured(&self) -> Option<&SelectedImage> {
        self.captured.as_ref()
    }

    pub fn stream(&self) -> Option<&D::Stream> {
        self.stream.as_ref().map(StreamGuard::stream)
    }

    pub fn has_live_stream(&self) -> bool {
        self.stream.as_ref().is_some_and(|g| g.stream().is_live())
    }

    pub fn update_device_count(&mut self, count: usize, is_mobile: bool) {
        self.camera_count = count;
        self.is_mobile = is_mobile;
    }

    /// Whether the "switch camera" affordance is offered
    pub fn can_switch(&self) -> bool {
        self.camera_count > 1 || self.is_mobile
    }

    /// Enter `Initializing`, releasing anything held and invalidating
    /// earlier tickets.
    pub fn begin_start(&mut self, facing: FacingMode) -> StartTicket {
        self.release();
        self.captured = None;
        self.generation += 1;
        self.facing = facing;
        self.phase = CameraPhase::Initializing;
        StartTicket {
            generation: self.generation,
            facing,
        }
    }

    /// Deliver the outcome of an acquisition. Returns `false` when the
    /// ticket was superseded (cancelled, restarted); any stream is stopped.
    pub fn complete_start(
        &mut self,
        ticket: StartTicket,
        result: Result<D::Stream, CameraError>,
    ) -> bool {
        let current = ticket.generation == self.generation
            && matches!(self.phase, CameraPhase::Initializing);
        if !current {
            if let Ok(mut stream) = result {
                stream.stop();
            }
            return false;
        }

        match result {
            Ok(stream) => {
                self.stream = Some(StreamGuard::new(stream));
                self.phase = CameraPhase::Active;
            }
            Err(err) => {
                self.phase = CameraPhase::Error(err);
            }
        }
        true
    }

    /// Start (or restart) the camera and wait for the device
    pub async fn start(&mut self, facing: FacingMode) -> Result<(), CameraError> {
        let ticket = self.begin_start(facing);
        let count = self.devices.camera_count().await;
        self.camera_count = count;
        let result = self.devices.acquire(facing).await;
        self.complete_start(ticket, result);
        match &self.phase {
            CameraPhase::Error(err) => Err(err.clone()),
            _ => Ok(()),
        }
    }

    /// Grab, mirror (front camera), encode and size-check the current frame.
    /// A rejected capture leaves the session `Active`.
    pub fn capture(&mut self) -> Result<&SelectedImage, CameraError> {
        if self.phase != CameraPhase::Active {
            return Err(CameraError::NotActive);
        }
        let guard = self.stream.as_ref().ok_or(CameraError::NotActive)?;
        let frame = guard.stream().grab_frame()?;
        let jpeg = encode_frame(&frame, self.facing == FacingMode::User)?;
        self.constraints.check_size(jpeg.len())?;

        self.phase = CameraPhase::Captured;
        let image = SelectedImage::new(
            CAPTURE_FILE_NAME.to_string(),
            "image/jpeg".to_string(),
            jpeg,
            ImageOrigin::CameraCapture,
        );
        Ok(&*self.captured.insert(image))
    }

    /// Promote the capture to the selected image and tear the stream down
    pub fn confirm(&mut self) -> Option<SelectedImage> {
        if self.phase != CameraPhase::Captured {
            return None;
        }
        let image = self.captured.take();
        self.release();
        self.phase = CameraPhase::Idle;
        image
    }

    /// Discard the capture and restart with the same facing mode
    pub fn retake(&mut self) -> StartTicket {
        self.begin_start(self.facing)
    }

    /// Restart with the opposite facing mode, when switching is offered
    pub fn switch_camera(&mut self) -> Option<StartTicket> {
        if !self.can_switch() || self.phase == CameraPhase::Initializing {
            return None;
        }
        Some(self.begin_start(self.facing.opposite()))
    }

    /// Abandon the camera from any sub-state
    pub fn cancel(&mut self) {
        self.release();
        self.captured = None;
        self.generation += 1;
        self.phase = CameraPhase::Idle;
    }

    fn release(&mut self) {
        // Dropping the guard stops the tracks
        self.stream = None;
    }
}

impl<D: MediaDevices + Clone> CameraSession<D> {
    /// Handle used to acquire a stream without holding the session borrow
    pub fn devices(&self) -> D {
        self.devices.clone()
    }
}

/// Encode a frame as JPEG, optionally mirrored
pub fn encode_frame(frame: &VideoFrame, mirror: bool) -> Result<Vec<u8>, CameraError> {
    let rgb = DynamicImage::ImageRgba8(oriented_image(frame, mirror)?).to_rgb8();

    let mut out = Vec::new();
    JpegEncoder::new_with_quality(&mut out, CAPTURE_JPEG_QUALITY)
        .encode_image(&rgb)
        .map_err(|e| CameraError::Encode(e.to_string()))?;
    Ok(out)
}

/// Frame as an image, flipped horizontally when `mirror` is set
fn oriented_image(frame: &VideoFrame, mirror: bool) -> Result<RgbaImage, CameraError> {
    let mut image = to_rgba_image(frame)?;
    if mirror {
        imageops::flip_horizontal_in_place(&mut image);
    }
    Ok(image)
}

fn to_rgba_image(frame: &VideoFrame) -> Result<RgbaImage, CameraError> {
    if frame.width == 0 || frame.height == 0 {
        return Err(CameraError::Capture("video has no dimensions yet".to_string()));
    }
    RgbaImage::from_raw(frame.width, frame.height, frame.rgba.clone())
        .ok_or_else(|| CameraError::Capture("frame buffer size mismatch".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[derive(Clone)]
    struct FakeDevices {
        live: Rc<Cell<usize>>,
        cameras: usize,
        failure: Option<CameraError>,
    }

    struct FakeStream {
        live: Rc<Cell<usize>>,
        stopped: bool,
    }

    impl FakeDevices {
        fn new(cameras: usize) -> Self {
            Self {
                live: Rc::new(Cell::new(0)),
                cameras,
                failure: None,
            }
        }

        fn failing(err: CameraError) -> Self {
            Self {
                failure: Some(err),
                ..Self::new(1)
            }
        }
    }

    impl MediaStream for FakeStream {
        fn grab_frame(&self) -> Result<VideoFrame, CameraError> {
            Ok(VideoFrame {
                width: 4,
                height: 4,
                rgba: vec![200; 4 * 4 * 4],
            })
        }

        fn stop(&mut self) {
            if !self.stopped {
                self.stopped = true;
                self.live.set(self.live.get() - 1);
            }
        }

        fn is_live(&self) -> bool {
            !self.stopped
        }
    }

    impl MediaDevices for FakeDevices {
        type Stream = FakeStream;

        async fn acquire(&self, _facing: FacingMode) -> Result<FakeStream, CameraError> {
            if let Some(err) = &self.failure {
                return Err(err.clone());
            }
            self.live.set(self.live.get() + 1);
            Ok(FakeStream {
                live: self.live.clone(),
                stopped: false,
            })
        }

        async fn camera_count(&self) -> usize {
            self.cameras
        }
    }

    fn session(devices: &FakeDevices) -> CameraSession<FakeDevices> {
        CameraSession::new(devices.clone(), ImageConstraints::default())
    }

    #[test]
    fn test_start_reaches_active() {
        let devices = FakeDevices::new(1);
        let mut cam = session(&devices);
        tokio_test::block_on(cam.start(FacingMode::User)).unwrap();
        assert_eq!(cam.phase(), &CameraPhase::Active);
        assert_eq!(devices.live.get(), 1);
        assert!(cam.has_live_stream());
    }

    #[test]
    fn test_start_failure_is_classified() {
        let devices = FakeDevices::failing(CameraError::PermissionDenied);
        let mut cam = session(&devices);
        let result = tokio_test::block_on(cam.start(FacingMode::User));
        assert_eq!(result, Err(CameraError::PermissionDenied));
        assert_eq!(cam.phase(), &CameraPhase::Error(CameraError::PermissionDenied));
        assert_eq!(devices.live.get(), 0);
    }

    #[test]
    fn test_capture_then_confirm_releases_stream() {
        let devices = FakeDevices::new(1);
        let mut cam = session(&devices);
        tokio_test::block_on(cam.start(FacingMode::Environment)).unwrap();

        let image = cam.capture().unwrap();
        assert_eq!(image.origin, ImageOrigin::CameraCapture);
        assert_eq!(image.mime_type, "image/jpeg");
        assert_eq!(cam.phase(), &CameraPhase::Captured);

        let confirmed = cam.confirm().unwrap();
        assert!(confirmed.size_bytes() > 0);
        assert_eq!(cam.phase(), &CameraPhase::Idle);
        assert_eq!(devices.live.get(), 0);
    }

    #[test]
    fn test_cancel_from_every_phase_releases_stream() {
        let devices = FakeDevices::new(1);
        let mut cam = session(&devices);

        tokio_test::block_on(cam.start(FacingMode::User)).unwrap();
        cam.cancel();
        assert_eq!(devices.live.get(), 0);

        tokio_test::block_on(cam.start(FacingMode::User)).unwrap();
        cam.capture().unwrap();
        cam.cancel();
        assert_eq!(devices.live.get(), 0);
        assert!(cam.captured().is_none());
        assert_eq!(cam.phase(), &CameraPhase::Idle);
    }

    #[test]
    fn test_retake_releases_stream() {
        let devices = FakeDevices::new(1);
        let mut cam = session(&devices);
        tokio_test::block_on(cam.start(FacingMode::User)).unwrap();
        cam.capture().unwrap();

        let ticket = cam.retake();
        assert_eq!(devices.live.get(), 0);
        assert!(cam.captured().is_none());
        assert_eq!(ticket.facing, FacingMode::User);
        assert_eq!(cam.phase(), &CameraPhase::Initializing);
    }

    #[test]
    fn test_cancel_during_initialization_stops_late_stream() {
        let devices = FakeDevices::new(1);
        let mut cam = session(&devices);

        let ticket = cam.begin_start(FacingMode::User);
        cam.cancel();
        let late = tokio_test::block_on(devices.acquire(FacingMode::User));
        assert_eq!(devices.live.get(), 1);

        assert!(!cam.complete_start(ticket, late));
        assert_eq!(devices.live.get(), 0);
        assert_eq!(cam.phase(), &CameraPhase::Idle);
    }

    #[test]
    fn test_drop_releases_stream() {
        let devices = FakeDevices::new(1);
        {
            let mut cam = session(&devices);
            tokio_test::block_on(cam.start(FacingMode::User)).unwrap();
            assert_eq!(devices.live.get(), 1);
        }
        assert_eq!(devices.live.get(), 0);
    }

    #[test]
    fn test_oversized_capture_stays_active() {
        let devices = FakeDevices::new(1);
        let mut cam = CameraSession::new(devices.clone(), ImageConstraints::new(0));
        tokio_test::block_on(cam.start(FacingMode::User)).unwrap();

        let result = cam.capture();
        assert!(matches!(
            result,
            Err(CameraError::Rejected(ValidationError::FileTooLarge { .. }))
        ));
        assert_eq!(cam.phase(), &CameraPhase::Active);
        assert!(cam.has_live_stream());
    }

    #[test]
    fn test_capture_requires_active() {
        let devices = FakeDevices::new(1);
        let mut cam = session(&devices);
        assert_eq!(cam.capture().unwrap_err(), CameraError::NotActive);
    }

    #[test]
    fn test_switch_camera() {
        let devices = FakeDevices::new(2);
        let mut cam = session(&devices);
        tokio_test::block_on(cam.start(FacingMode::User)).unwrap();
        assert!(cam.can_switch());

        let ticket = cam.switch_camera().unwrap();
        assert_eq!(ticket.facing, FacingMode::Environment);
        assert_eq!(devices.live.get(), 0);
    }

    #[test]
    fn test_switch_offered_on_mobile_with_one_camera() {
        let devices = FakeDevices::new(1);
        let mut cam = session(&devices);
        cam.update_device_count(1, false);
        assert!(!cam.can_switch());
        cam.update_device_count(1, true);
        assert!(cam.can_switch());
    }

    #[test]
    fn test_mirroring_swaps_columns() {
        let frame = VideoFrame {
            width: 2,
            height: 1,
            rgba: vec![1, 2, 3, 255, 9, 8, 7, 255],
        };
        let mirrored = oriented_image(&frame, true).unwrap();
        assert_eq!(mirrored.into_raw(), vec![9, 8, 7, 255, 1, 2, 3, 255]);
        let plain = oriented_image(&frame, false).unwrap();
        assert_eq!(plain.into_raw(), frame.rgba);
    }

    #[test]
    fn test_encode_rejects_bad_buffer() {
        let frame = VideoFrame {
            width: 2,
            height: 2,
            rgba: vec![0; 3],
        };
        assert!(matches!(encode_frame(&frame, false), Err(CameraError::Capture(_))));
    }

    #[test]
    fn test_encoded_capture_is_jpeg() {
        let frame = VideoFrame {
            width: 2,
            height: 2,
            rgba: vec![128; 16],
        };
        let bytes = encode_frame(&frame, true).unwrap();
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
    }
}
