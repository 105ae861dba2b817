// Blocking dialog for unrecoverable failures

use skinscan_core::ErrorDescriptor;
use yew::prelude::*;

use crate::messages::error_title;

#[derive(Properties, PartialEq)]
pub struct ErrorModalProps {
    pub error: ErrorDescriptor,
    pub on_dismiss: Callback<()>,
    pub on_reset: Callback<()>,
}

#[function_component(ErrorModal)]
pub fn error_modal(props: &ErrorModalProps) -> Html {
    let on_dismiss = {
        let on_dismiss = props.on_dismiss.clone();
        Callback::from(move |_: MouseEvent| on_dismiss.emit(()))
    };
    let on_reset = {
        let on_reset = props.on_reset.clone();
        Callback::from(move |_: MouseEvent| on_reset.emit(()))
    };

    html! {
        <div class="modal-backdrop">
            <div class="modal" role="alertdialog" aria-modal="true">
                <h2>{ error_title(props.error.kind) }</h2>
                <p>{ props.error.message.clone() }</p>
                <div class="modal-actions">
                    <button class="modal-dismiss" onclick={on_dismiss}>{ "Close" }</button>
                    <button class="modal-reset" onclick={on_reset}>{ "Start over" }</button>
                </div>
            </div>
        </div>
    }
}
