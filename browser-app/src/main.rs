// Skin Analysis Browser Application

use skinscan_web_ui::App;
use wasm_bindgen::prelude::*;
use yew::prelude::*;

#[function_component(Main)]
fn main_component() -> Html {
    html! {
        <App />
    }
}

#[wasm_bindgen(start)]
pub fn run_app() {
    console_error_panic_hook::set_once();
    yew::Renderer::<Main>::new().render();
}

fn main() {
    run_app();
}
