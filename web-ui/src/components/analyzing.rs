// Progress view shown while a request is in flight

use std::rc::Rc;

use gloo_timers::callback::Interval;
use skinscan_core::Stage;
use yew::prelude::*;

/// Stage messages rotate at this period
const ROTATION_MS: u32 = 2_000;

const STAGES: [Stage; 3] = [Stage::Uploading, Stage::Processing, Stage::Finalizing];

#[derive(Default)]
struct Rotation(usize);

impl Reducible for Rotation {
    type Action = ();

    fn reduce(self: Rc<Self>, _: ()) -> Rc<Self> {
        Rc::new(Rotation(self.0 + 1))
    }
}

#[derive(Properties, PartialEq)]
pub struct AnalyzingProps {
    pub stage: Stage,
    pub percent: u8,
}

#[function_component(Analyzing)]
pub fn analyzing(props: &AnalyzingProps) -> Html {
    let rotation = use_reducer(Rotation::default);

    {
        let dispatcher = rotation.dispatcher();
        use_effect_with(props.stage, move |_| {
            let interval = Interval::new(ROTATION_MS, move || dispatcher.dispatch(()));
            move || drop(interval)
        });
    }

    let current = STAGES.iter().position(|s| *s == props.stage).unwrap_or(0);

    html! {
        <div class="analyzing">
            <div class="spinner" />
            <p class="stage-message">{ props.stage.message(rotation.0) }</p>
            <div class="progress-bar">
                <div class="progress-fill" style={format!("width: {}%", props.percent)} />
            </div>
            <div class="progress-percent">{ format!("{}%", props.percent) }</div>
            <ol class="stage-steps">
                { for STAGES.iter().enumerate().map(|(i, stage)| {
                    let state = if i < current {
                        "done"
                    } else if i == current {
                        "active"
                    } else {
                        "pending"
                    };
                    html! {
                        <li class={classes!("stage-step", state)}>{ stage.label() }</li>
                    }
                }) }
            </ol>
        </div>
    }
}
