// Auto-expiring toast for transient failures

use std::time::Duration;

use gloo_timers::callback::Timeout;
use skinscan_core::ErrorDescriptor;
use yew::prelude::*;

use crate::messages::error_title;

#[derive(Properties, PartialEq)]
pub struct ToastProps {
    pub error: ErrorDescriptor,
    pub duration: Duration,
    pub on_dismiss: Callback<()>,
}

/// Timer dependencies: a different error or duration restarts the countdown
fn timer_key(props: &ToastProps) -> (ErrorDescriptor, u32) {
    let millis = u32::try_from(props.duration.as_millis()).unwrap_or(u32::MAX);
    (props.error.clone(), millis)
}

#[function_component(Toast)]
pub fn toast(props: &ToastProps) -> Html {
    {
        let on_dismiss = props.on_dismiss.clone();
        use_effect_with(timer_key(props), move |(_, millis)| {
            let timeout = Timeout::new(*millis, move || on_dismiss.emit(()));
            move || drop(timeout)
        });
    }

    let on_close = {
        let on_dismiss = props.on_dismiss.clone();
        Callback::from(move |_: MouseEvent| on_dismiss.emit(()))
    };

    html! {
        <div class="toast" role="status">
            <strong>{ error_title(props.error.kind) }</strong>
            <span class="toast-message">{ props.error.message.clone() }</span>
            <button class="toast-close" title="Dismiss" onclick={on_close}>{ "×" }</button>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skinscan_core::{ErrorKind, SuggestedAction};

    fn props(message: &str, secs: u64) -> ToastProps {
        ToastProps {
            error: ErrorDescriptor::new(ErrorKind::Network, message, SuggestedAction::Retry),
            duration: Duration::from_secs(secs),
            on_dismiss: Callback::noop(),
        }
    }

    #[test]
    fn test_new_error_restarts_timer() {
        let first = timer_key(&props("Connection lost", 5));
        assert_eq!(first, timer_key(&props("Connection lost", 5)));
        assert_ne!(first, timer_key(&props("Server unavailable", 5)));
        assert_ne!(first, timer_key(&props("Connection lost", 8)));
        assert_eq!(first.1, 5_000);
    }
}
