// Browser media: camera capability, file reading and preview URLs

use js_sys::{Array, Object, Reflect, Uint8Array};
use skinscan_core::{
    CameraError, FacingMode, FileBlob, MediaDevices, MediaStream, SelectedImage, VideoFrame,
};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    Blob, BlobPropertyBag, CanvasRenderingContext2d, DomException, HtmlCanvasElement,
    HtmlVideoElement, MediaDeviceInfo, MediaDeviceKind, MediaStreamConstraints, MediaStreamTrack,
    Url,
};

use crate::errors::{js_message, UiError};

const IDEAL_WIDTH: f64 = 1280.0;
const IDEAL_HEIGHT: f64 = 720.0;

/// Classify a `getUserMedia` rejection by its `DOMException` name
pub fn camera_error_from_name(name: &str, message: &str) -> CameraError {
    match name {
        "NotAllowedError" | "PermissionDeniedError" | "SecurityError" => {
            CameraError::PermissionDenied
        }
        "NotFoundError" | "DevicesNotFoundError" | "OverconstrainedError" => CameraError::NoDevice,
        "NotReadableError" | "TrackStartError" | "AbortError" => CameraError::DeviceBusy,
        "NotSupportedError" | "TypeError" => CameraError::Unsupported,
        _ => CameraError::Capture(message.to_string()),
    }
}

fn camera_error(value: JsValue) -> CameraError {
    match value.dyn_ref::<DomException>() {
        Some(ex) => camera_error_from_name(&ex.name(), &ex.message()),
        None => CameraError::Capture(js_message(&value)),
    }
}

/// User agent sniffing for phones and tablets
pub fn is_mobile_user_agent(user_agent: &str) -> bool {
    ["Mobi", "Android", "iPhone", "iPad", "iPod"]
        .iter()
        .any(|marker| user_agent.contains(marker))
}

pub fn is_mobile() -> bool {
    web_sys::window()
        .and_then(|w| w.navigator().user_agent().ok())
        .is_some_and(|ua| is_mobile_user_agent(&ua))
}

/// `navigator.mediaDevices`, or nothing on insecure origins and old browsers
#[derive(Clone)]
pub struct BrowserMediaDevices {
    devices: Option<web_sys::MediaDevices>,
}

impl BrowserMediaDevices {
    pub fn new() -> Self {
        let devices = web_sys::window().and_then(|w| w.navigator().media_devices().ok());
        Self { devices }
    }
}

impl Default for BrowserMediaDevices {
    fn default() -> Self {
        Self::new()
    }
}

fn set(target: &Object, key: &str, value: &JsValue) -> Result<(), CameraError> {
    Reflect::set(target, &JsValue::from_str(key), value)
        .map(|_| ())
        .map_err(camera_error)
}

fn video_constraints(facing: FacingMode) -> Result<Object, CameraError> {
    let video = Object::new();
    set(&video, "facingMode", &JsValue::from_str(facing.as_constraint()))?;

    let width = Object::new();
    set(&width, "ideal", &JsValue::from_f64(IDEAL_WIDTH))?;
    set(&video, "width", &width)?;

    let height = Object::new();
    set(&height, "ideal", &JsValue::from_f64(IDEAL_HEIGHT))?;
    set(&video, "height", &height)?;
    Ok(video)
}

impl MediaDevices for BrowserMediaDevices {
    type Stream = BrowserStream;

    async fn acquire(&self, facing: FacingMode) -> Result<BrowserStream, CameraError> {
        let devices = self.devices.as_ref().ok_or(CameraError::Unsupported)?;

        let constraints = MediaStreamConstraints::new();
        let video: Object = video_constraints(facing)?;
        constraints.set_video(&video);
        constraints.set_audio(&JsValue::FALSE);

        let promise = devices
            .get_user_media_with_constraints(&constraints)
            .map_err(camera_error)?;
        let stream: web_sys::MediaStream = JsFuture::from(promise)
            .await
            .map_err(camera_error)?
            .dyn_into()
            .map_err(|_| CameraError::Unsupported)?;

        BrowserStream::attach(stream)
    }

    async fn camera_count(&self) -> usize {
        let Some(devices) = self.devices.as_ref() else {
            return 0;
        };
        let Ok(promise) = devices.enumerate_devices() else {
            return 0;
        };
        match JsFuture::from(promise).await {
            Ok(list) => Array::from(&list)
                .iter()
                .filter_map(|d| d.dyn_into::<MediaDeviceInfo>().ok())
                .filter(|d| d.kind() == MediaDeviceKind::Videoinput)
                .count(),
            Err(_) => 0,
        }
    }
}

/// A live camera stream playing into its own `<video>` element
pub struct BrowserStream {
    stream: web_sys::MediaStream,
    video: HtmlVideoElement,
    stopped: bool,
}

impl BrowserStream {
    fn attach(stream: web_sys::MediaStream) -> Result<Self, CameraError> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or(CameraError::Unsupported)?;
        let video: HtmlVideoElement = document
            .create_element("video")
            .map_err(camera_error)?
            .dyn_into()
            .map_err(|_| CameraError::Unsupported)?;

        let mut this = Self {
            stream,
            video,
            stopped: false,
        };
        this.video.set_class_name("camera-video");
        this.video.set_muted(true);
        this.video.set_autoplay(true);
        if let Err(e) = this.video.set_attribute("playsinline", "") {
            this.stop();
            return Err(camera_error(e));
        }
        this.video.set_src_object(Some(&this.stream));
        // Autoplay covers browsers that reject an explicit play()
        if let Ok(promise) = this.video.play() {
            wasm_bindgen_futures::spawn_local(async move {
                let _ = JsFuture::from(promise).await;
            });
        }
        Ok(this)
    }

    /// Element showing the live feed, for mounting into the page
    pub fn video(&self) -> &HtmlVideoElement {
        &self.video
    }
}

impl MediaStream for BrowserStream {
    fn grab_frame(&self) -> Result<VideoFrame, CameraError> {
        let width = self.video.video_width();
        let height = self.video.video_height();
        if width == 0 || height == 0 {
            return Err(CameraError::Capture("the camera is not ready yet".to_string()));
        }

        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or(CameraError::Unsupported)?;
        let canvas: HtmlCanvasElement = document
            .create_element("canvas")
            .map_err(camera_error)?
            .dyn_into()
            .map_err(|_| CameraError::Unsupported)?;
        canvas.set_width(width);
        canvas.set_height(height);

        let context: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .map_err(camera_error)?
            .ok_or(CameraError::Unsupported)?
            .dyn_into()
            .map_err(|_| CameraError::Unsupported)?;
        context
            .draw_image_with_html_video_element(&self.video, 0.0, 0.0)
            .map_err(camera_error)?;
        let pixels = context
            .get_image_data(0.0, 0.0, width as f64, height as f64)
            .map_err(camera_error)?;

        Ok(VideoFrame {
            width,
            height,
            rgba: pixels.data().0,
        })
    }

    fn stop(&mut self) {
        if self.stopped {
            return;
        }
        self.stopped = true;
        for track in self.stream.get_tracks().iter() {
            if let Ok(track) = track.dyn_into::<MediaStreamTrack>() {
                track.stop();
            }
        }
        self.video.set_src_object(None);
        self.video.remove();
    }

    fn is_live(&self) -> bool {
        !self.stopped && self.stream.active()
    }
}

impl Drop for BrowserStream {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Read a picked or dropped file into memory
pub async fn read_file(file: &web_sys::File) -> Result<FileBlob, UiError> {
    let buffer = JsFuture::from(file.array_buffer())
        .await
        .map_err(UiError::file_read)?;
    let data = Uint8Array::new(&buffer).to_vec();
    Ok(FileBlob::new(file.name(), file.type_(), data))
}

/// Object URL for an in-memory image, revoked when dropped
#[derive(Debug, PartialEq)]
pub struct PreviewUrl {
    url: String,
}

impl PreviewUrl {
    pub fn from_bytes(data: &[u8], mime_type: &str) -> Result<Self, UiError> {
        let parts = Array::new();
        parts.push(&Uint8Array::from(data));

        let options = BlobPropertyBag::new();
        options.set_type(mime_type);

        let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &options)
            .map_err(UiError::dom)?;
        let url = Url::create_object_url_with_blob(&blob).map_err(UiError::dom)?;
        Ok(Self { url })
    }

    pub fn for_image(image: &SelectedImage) -> Result<Self, UiError> {
        Self::from_bytes(&image.data, &image.mime_type)
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Drop for PreviewUrl {
    fn drop(&mut self) {
        let _ = Url::revoke_object_url(&self.url);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dom_exception_names() {
        assert_eq!(camera_error_from_name("NotAllowedError", ""), CameraError::PermissionDenied);
        assert_eq!(camera_error_from_name("NotFoundError", ""), CameraError::NoDevice);
        assert_eq!(camera_error_from_name("NotReadableError", ""), CameraError::DeviceBusy);
        assert_eq!(camera_error_from_name("NotSupportedError", ""), CameraError::Unsupported);
        assert_eq!(
            camera_error_from_name("WeirdError", "boom"),
            CameraError::Capture("boom".to_string())
        );
    }

    #[test]
    fn test_mobile_user_agents() {
        assert!(is_mobile_user_agent(
            "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) Mobile/15E148"
        ));
        assert!(is_mobile_user_agent("Mozilla/5.0 (Linux; Android 14; Pixel 8)"));
        assert!(!is_mobile_user_agent(
            "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 Chrome/120.0"
        ));
    }
}
