// Web UI library for the skin analysis app
//
// This crate provides the Yew components and browser glue for the
// upload -> analyzing -> results flow.

use std::rc::Rc;

use skinscan_api_client::ApiClient;
use skinscan_core::{
    Affordance, ClientConfig, FlowAction, FlowState, Phase, SelectedImage, SymptomCatalog,
    SymptomSet,
};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

pub mod components;
pub mod errors;
pub mod media;
pub mod messages;

// Re-export components
pub use components::*;

/// Flow controller state as a Yew reducer
#[derive(Debug, Clone, PartialEq)]
pub struct FlowStore(pub FlowState);

impl Reducible for FlowStore {
    type Action = FlowAction;

    fn reduce(self: Rc<Self>, action: FlowAction) -> Rc<Self> {
        let state = Rc::unwrap_or_clone(self).0;
        Rc::new(FlowStore(state.reduce(action)))
    }
}

fn console_warn(message: &str) {
    web_sys::console::warn_1(&message.into());
}

/// Main application component: owns the flow state and wires every surface to it
#[function_component(App)]
pub fn app() -> Html {
    let config = use_memo((), |_| ClientConfig::from_env());
    let flow = {
        let config = config.clone();
        use_reducer(move || {
            FlowStore(FlowState::new(config.max_symptoms, config.stage_thresholds))
        })
    };
    let catalog = use_state(SymptomCatalog::builtin);
    let camera_open = use_state(|| false);
    let checklist_mode = use_state(|| false);
    let toast_dismissed = use_state(|| false);

    // Server-side symptom list replaces the built-in one when reachable
    {
        let catalog = catalog.clone();
        let config = config.clone();
        use_effect_with((), move |_| {
            spawn_local(async move {
                let fetched = match ApiClient::new((*config).clone()) {
                    Ok(client) => client.symptoms().await,
                    Err(e) => Err(e),
                };
                match fetched {
                    Ok(response) if !response.categories.is_empty() => {
                        catalog.set(SymptomCatalog::new(response.categories));
                    }
                    Ok(_) => {}
                    Err(e) => console_warn(&format!("Using built-in symptom list: {}", e)),
                }
            });
            || ()
        });
    }

    // Run the in-flight request; stale outcomes are ignored by the reducer
    {
        let dispatcher = flow.dispatcher();
        let config = config.clone();
        let request = flow.0.pending_request().cloned();
        use_effect_with(request.as_ref().map(|r| r.id), move |_| {
            if let Some(request) = request {
                spawn_local(async move {
                    let id = request.id;
                    let progress = dispatcher.clone();
                    let outcome = match ApiClient::new((*config).clone()) {
                        Ok(client) => {
                            client
                                .predict_with_retry(&request, move |percent| {
                                    progress.dispatch(FlowAction::Progress { request: id, percent })
                                })
                                .await
                        }
                        Err(e) => Err(e),
                    };
                    match outcome {
                        Ok(result) => dispatcher.dispatch(FlowAction::Succeeded {
                            request: id,
                            result: Box::new(result),
                        }),
                        Err(e) => dispatcher.dispatch(FlowAction::Failed {
                            request: id,
                            error: e.to_descriptor(),
                        }),
                    }
                });
            }
            || ()
        });
    }

    // Every new error gets a fresh toast
    {
        let toast_dismissed = toast_dismissed.clone();
        use_effect_with(flow.0.error.clone(), move |_| {
            toast_dismissed.set(false);
            || ()
        });
    }

    let state = &flow.0;

    let on_select = {
        let flow = flow.clone();
        let camera_open = camera_open.clone();
        Callback::from(move |image: SelectedImage| {
            camera_open.set(false);
            flow.dispatch(FlowAction::ImageSelected(image));
        })
    };

    let on_clear = {
        let flow = flow.clone();
        Callback::from(move |_: ()| flow.dispatch(FlowAction::ImageCleared))
    };

    let on_open_camera = {
        let camera_open = camera_open.clone();
        Callback::from(move |_: ()| camera_open.set(true))
    };

    let on_close_camera = {
        let camera_open = camera_open.clone();
        Callback::from(move |_: ()| camera_open.set(false))
    };

    let on_symptoms = {
        let flow = flow.clone();
        Callback::from(move |symptoms: SymptomSet| {
            flow.dispatch(FlowAction::SymptomsChanged(symptoms))
        })
    };

    let on_submit = {
        let flow = flow.clone();
        Callback::from(move |_: MouseEvent| flow.dispatch(FlowAction::Submit))
    };

    let on_error_action = {
        let flow = flow.clone();
        Callback::from(move |affordance: Affordance| match affordance {
            Affordance::Retry => flow.dispatch(FlowAction::Retry),
            Affordance::UploadAnother => {
                flow.dispatch(FlowAction::ImageCleared);
                flow.dispatch(FlowAction::DismissError);
            }
            Affordance::Reset => flow.dispatch(FlowAction::Reset),
            Affordance::None => {}
        })
    };

    let on_dismiss_error = {
        let flow = flow.clone();
        Callback::from(move |_: ()| flow.dispatch(FlowAction::DismissError))
    };

    let on_reset = {
        let flow = flow.clone();
        let camera_open = camera_open.clone();
        Callback::from(move |_: ()| {
            camera_open.set(false);
            flow.dispatch(FlowAction::Reset);
        })
    };

    let on_dismiss_toast = {
        let toast_dismissed = toast_dismissed.clone();
        Callback::from(move |_: ()| toast_dismissed.set(true))
    };

    let on_new_analysis = {
        let flow = flow.clone();
        let camera_open = camera_open.clone();
        Callback::from(move |_: ()| {
            camera_open.set(false);
            flow.dispatch(FlowAction::NewAnalysis);
        })
    };

    let show_checklist = {
        let checklist_mode = checklist_mode.clone();
        Callback::from(move |_: MouseEvent| checklist_mode.set(true))
    };
    let show_tags = {
        let checklist_mode = checklist_mode.clone();
        Callback::from(move |_: MouseEvent| checklist_mode.set(false))
    };

    let presentation = state.error.as_ref().map(|e| (e.clone(), e.presentation()));
    let constraints = config.image_constraints();

    let body = match state.phase {
        Phase::Upload => html! {
            <div class="upload-step">
                <section class="step">
                    <h2>{ "1. Photo" }</h2>
                    if *camera_open {
                        <CameraCapture
                            constraints={constraints.clone()}
                            on_confirm={on_select.clone()}
                            on_close={on_close_camera}
                        />
                    } else {
                        <ImageUpload
                            image={state.image.clone()}
                            constraints={constraints.clone()}
                            on_select={on_select}
                            on_clear={on_clear}
                            on_open_camera={on_open_camera}
                        />
                    }
                </section>

                <section class="step">
                    <h2>{ "2. Symptoms (optional)" }</h2>
                    <div class="symptom-mode">
                        <button class={classes!((!*checklist_mode).then_some("active"))} onclick={show_tags}>
                            { "Type" }
                        </button>
                        <button class={classes!((*checklist_mode).then_some("active"))} onclick={show_checklist}>
                            { "Browse list" }
                        </button>
                    </div>
                    if *checklist_mode {
                        <SymptomChecklist
                            symptoms={state.symptoms.clone()}
                            catalog={(*catalog).clone()}
                            on_change={on_symptoms}
                        />
                    } else {
                        <SymptomInput
                            symptoms={state.symptoms.clone()}
                            catalog={(*catalog).clone()}
                            on_change={on_symptoms}
                        />
                    }
                </section>

                if let Some((error, _)) = presentation.as_ref().filter(|(_, p)| p.inline) {
                    <ErrorBanner
                        error={error.clone()}
                        on_action={on_error_action}
                        on_dismiss={on_dismiss_error.clone()}
                    />
                }

                <button class="submit-button" onclick={on_submit} disabled={!state.can_submit()}>
                    { "Analyze" }
                </button>
            </div>
        },
        Phase::Analyzing => html! {
            <Analyzing stage={state.stage} percent={state.progress.percent()} />
        },
        Phase::Results => match state.result.clone() {
            Some(result) => html! {
                <Results result={result} on_new_analysis={on_new_analysis} />
            },
            None => html! {},
        },
    };

    html! {
        <div class="app-container">
            <header class="app-header">
                <h1>{ "Skin Condition Analyzer" }</h1>
                <p class="subtitle">{ "Upload a photo and describe your symptoms for an AI-assisted assessment" }</p>
            </header>

            <main class="main-content">
                { body }
            </main>

            if let Some((error, p)) = presentation.as_ref() {
                if let Some(duration) = p.toast.filter(|_| !*toast_dismissed) {
                    <Toast error={error.clone()} duration={duration} on_dismiss={on_dismiss_toast} />
                }
                if p.modal {
                    <ErrorModal error={error.clone()} on_dismiss={on_dismiss_error} on_reset={on_reset} />
                }
            }
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skinscan_core::{ErrorDescriptor, ErrorKind, ImageOrigin, RequestId, SuggestedAction};

    fn store() -> Rc<FlowStore> {
        Rc::new(FlowStore(FlowState::default()))
    }

    fn image() -> SelectedImage {
        SelectedImage::new(
            "photo.jpg".to_string(),
            "image/jpeg".to_string(),
            vec![1, 2, 3],
            ImageOrigin::FilePicker,
        )
    }

    #[test]
    fn test_store_delegates_to_flow_reducer() {
        let state = store()
            .reduce(FlowAction::ImageSelected(image()))
            .reduce(FlowAction::Submit);
        assert_eq!(state.0.phase, Phase::Analyzing);
        assert!(state.0.pending_request().is_some());
    }

    #[test]
    fn test_store_failure_returns_to_upload() {
        let state = store()
            .reduce(FlowAction::ImageSelected(image()))
            .reduce(FlowAction::Submit);
        let id = state.0.pending_request().map(|r| r.id).unwrap();
        let state = state.reduce(FlowAction::Failed {
            request: id,
            error: ErrorDescriptor::new(ErrorKind::Timeout, "slow", SuggestedAction::Retry),
        });
        assert_eq!(state.0.phase, Phase::Upload);
        assert_eq!(state.0.progress.percent(), 0);
        assert!(state.0.can_retry());
    }

    #[test]
    fn test_store_ignores_stale_request() {
        let state = store()
            .reduce(FlowAction::ImageSelected(image()))
            .reduce(FlowAction::Submit)
            .reduce(FlowAction::Progress {
                request: RequestId(99),
                percent: 60,
            });
        assert_eq!(state.0.progress.percent(), 0);
    }
}
