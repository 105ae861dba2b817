// Live camera capture surface

use std::cell::RefCell;
use std::rc::Rc;

use skinscan_core::{
    CameraPhase, CameraSession, FacingMode, ImageConstraints, MediaDevices, SelectedImage,
    StartTicket,
};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::media::{self, BrowserMediaDevices, PreviewUrl};

type SessionRef = Rc<RefCell<CameraSession<BrowserMediaDevices>>>;

#[derive(Properties, PartialEq)]
pub struct CameraCaptureProps {
    pub constraints: ImageConstraints,
    pub on_confirm: Callback<SelectedImage>,
    pub on_close: Callback<()>,
}

/// Acquire a stream for `ticket` without holding the session borrow across
/// the await; a stale ticket gets its stream stopped by the session.
fn acquire(session: SessionRef, ticket: StartTicket, rerender: UseForceUpdateHandle) {
    let devices = session.borrow().devices();
    rerender.force_update();
    spawn_local(async move {
        let count = devices.camera_count().await;
        let result = devices.acquire(ticket.facing).await;
        if let Ok(mut session) = session.try_borrow_mut() {
            session.update_device_count(count, media::is_mobile());
            session.complete_start(ticket, result);
        }
        rerender.force_update();
    });
}

#[function_component(CameraCapture)]
pub fn camera_capture(props: &CameraCaptureProps) -> Html {
    let session: SessionRef = {
        let constraints = props.constraints.clone();
        use_mut_ref(move || CameraSession::new(BrowserMediaDevices::new(), constraints))
    };
    let rerender = use_force_update();
    let capture_error = use_state(|| None::<String>);
    let video_host = use_node_ref();

    // Start on mount; unmounting from any sub-state releases the device
    {
        let session = session.clone();
        let rerender = rerender.clone();
        use_effect_with((), move |_| {
            let ticket = session.borrow_mut().begin_start(FacingMode::User);
            acquire(session.clone(), ticket, rerender);
            move || {
                if let Ok(mut session) = session.try_borrow_mut() {
                    session.cancel();
                }
            }
        });
    }

    // Mount the live <video> once a stream is active
    {
        let session = session.clone();
        let video_host = video_host.clone();
        use_effect(move || {
            if let (Some(host), Ok(session)) =
                (video_host.cast::<web_sys::Element>(), session.try_borrow())
            {
                if let Some(stream) = session.stream() {
                    let video = stream.video();
                    if video.parent_node().is_none() {
                        let _ = host.append_child(video);
                    }
                }
            }
            || {}
        });
    }

    let (phase, facing, can_switch, captured) = {
        let session = session.borrow();
        (
            session.phase().clone(),
            session.facing(),
            session.can_switch(),
            session.captured().cloned(),
        )
    };

    let preview = {
        let captured = captured.clone();
        use_memo(captured.as_ref().map(|c| c.id), move |_| {
            captured.as_ref().and_then(|c| PreviewUrl::for_image(c).ok())
        })
    };

    let on_capture = {
        let session = session.clone();
        let capture_error = capture_error.clone();
        let rerender = rerender.clone();
        Callback::from(move |_: MouseEvent| {
            let outcome = session.borrow_mut().capture().map(|_| ());
            match outcome {
                Ok(()) => capture_error.set(None),
                Err(e) => capture_error.set(Some(e.to_string())),
            }
            rerender.force_update();
        })
    };

    let on_use_photo = {
        let session = session.clone();
        let on_confirm = props.on_confirm.clone();
        Callback::from(move |_: MouseEvent| {
            let image = session.borrow_mut().confirm();
            if let Some(image) = image {
                on_confirm.emit(image);
            }
        })
    };

    let on_retake = {
        let session = session.clone();
        let capture_error = capture_error.clone();
        let rerender = rerender.clone();
        Callback::from(move |_: MouseEvent| {
            capture_error.set(None);
            let ticket = session.borrow_mut().retake();
            acquire(session.clone(), ticket, rerender.clone());
        })
    };

    let on_switch = {
        let session = session.clone();
        let rerender = rerender.clone();
        Callback::from(move |_: MouseEvent| {
            let ticket = session.borrow_mut().switch_camera();
            if let Some(ticket) = ticket {
                acquire(session.clone(), ticket, rerender.clone());
            }
        })
    };

    let on_cancel = {
        let session = session.clone();
        let on_close = props.on_close.clone();
        Callback::from(move |_: MouseEvent| {
            session.borrow_mut().cancel();
            on_close.emit(());
        })
    };

    let body = match &phase {
        CameraPhase::Idle | CameraPhase::Initializing => html! {
            <div class="camera-status">{ "Starting camera..." }</div>
        },
        CameraPhase::Active => html! {
            <>
                <div
                    ref={video_host}
                    class={classes!("camera-view", (facing == FacingMode::User).then_some("mirrored"))}
                />
                <div class="camera-actions">
                    <button class="capture-button" onclick={on_capture}>{ "Take photo" }</button>
                    if can_switch {
                        <button class="switch-button" onclick={on_switch}>{ "Switch camera" }</button>
                    }
                </div>
            </>
        },
        CameraPhase::Captured => html! {
            <>
                if let Some(url) = (*preview).as_ref() {
                    <img class="captured-photo" src={url.url().to_string()} alt="Captured photo" />
                }
                <div class="camera-actions">
                    <button class="confirm-button" onclick={on_use_photo}>{ "Use photo" }</button>
                    <button class="retake-button" onclick={on_retake.clone()}>{ "Retake" }</button>
                </div>
            </>
        },
        CameraPhase::Error(err) => html! {
            <div class="camera-error">
                <p>{ err.to_string() }</p>
                <button class="retake-button" onclick={on_retake}>{ "Try again" }</button>
            </div>
        },
    };

    html! {
        <div class="camera-capture">
            { body }
            if let Some(message) = (*capture_error).clone() {
                <div class="field-error">{ message }</div>
            }
            <button class="cancel-button" onclick={on_cancel}>{ "Cancel" }</button>
        </div>
    }
}
