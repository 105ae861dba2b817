// Inline error with its recovery action

use skinscan_core::{Affordance, ErrorDescriptor};
use yew::prelude::*;

use crate::messages::{affordance_label, error_title, get_message_class, MessageLevel};

#[derive(Properties, PartialEq)]
pub struct ErrorBannerProps {
    pub error: ErrorDescriptor,
    pub on_action: Callback<Affordance>,
    pub on_dismiss: Callback<()>,
}

#[function_component(ErrorBanner)]
pub fn error_banner(props: &ErrorBannerProps) -> Html {
    let affordance = props.error.presentation().affordance;
    let level = MessageLevel::from(props.error.kind);

    let on_action = {
        let on_action = props.on_action.clone();
        Callback::from(move |_: MouseEvent| on_action.emit(affordance))
    };
    let on_dismiss = {
        let on_dismiss = props.on_dismiss.clone();
        Callback::from(move |_: MouseEvent| on_dismiss.emit(()))
    };

    html! {
        <div class={classes!("error-banner", get_message_class(level))} role="alert">
            <div class="error-text">
                <strong>{ error_title(props.error.kind) }</strong>
                <p>{ props.error.message.clone() }</p>
            </div>
            if let Some(label) = affordance_label(affordance) {
                <button class="error-action" onclick={on_action}>{ label }</button>
            }
            <button class="error-dismiss" title="Dismiss" onclick={on_dismiss}>{ "×" }</button>
        </div>
    }
}
