// Symptom tag input with autocomplete

use skinscan_core::{SymptomCatalog, SymptomSet};
use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::messages::symptom_display;

const SUGGESTION_LIMIT: usize = 6;

#[derive(Properties, PartialEq)]
pub struct SymptomInputProps {
    pub symptoms: SymptomSet,
    pub catalog: SymptomCatalog,
    pub on_change: Callback<SymptomSet>,
}

#[function_component(SymptomInput)]
pub fn symptom_input(props: &SymptomInputProps) -> Html {
    let query = use_state(String::new);
    let error = use_state(|| None::<String>);

    let add = {
        let symptoms = props.symptoms.clone();
        let on_change = props.on_change.clone();
        let query = query.clone();
        let error = error.clone();
        Callback::from(move |raw: String| {
            let mut next = symptoms.clone();
            match next.add(&raw) {
                Ok(()) => {
                    error.set(None);
                    query.set(String::new());
                    on_change.emit(next);
                }
                Err(e) => error.set(Some(e.to_string())),
            }
        })
    };

    let on_input = {
        let query = query.clone();
        let error = error.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            let value = input.value();
            // A typed comma commits the tag
            if let Some(tag) = value.strip_suffix(',') {
                query.set(tag.to_string());
            } else {
                query.set(value);
            }
            error.set(None);
        })
    };

    let on_key_down = {
        let query = query.clone();
        let add = add.clone();
        Callback::from(move |e: KeyboardEvent| {
            if e.key() == "Enter" || e.key() == "," {
                e.prevent_default();
                add.emit((*query).clone());
            }
        })
    };

    let remove = {
        let symptoms = props.symptoms.clone();
        let on_change = props.on_change.clone();
        let error = error.clone();
        Callback::from(move |token: String| {
            let mut next = symptoms.clone();
            next.remove(&token);
            error.set(None);
            on_change.emit(next);
        })
    };

    let on_clear = {
        let symptoms = props.symptoms.clone();
        let on_change = props.on_change.clone();
        let error = error.clone();
        Callback::from(move |_: MouseEvent| {
            let mut next = symptoms.clone();
            next.clear();
            error.set(None);
            on_change.emit(next);
        })
    };

    let suggestions = props
        .catalog
        .suggest(query.as_str(), &props.symptoms, SUGGESTION_LIMIT);

    html! {
        <div class="symptom-input">
            <div class="symptom-tags">
                { for props.symptoms.iter().map(|token| {
                    let remove = remove.clone();
                    let owned = token.to_string();
                    html! {
                        <span class="symptom-tag" key={token.to_string()}>
                            { symptom_display(token) }
                            <button
                                class="tag-remove"
                                title="Remove"
                                onclick={Callback::from(move |_: MouseEvent| remove.emit(owned.clone()))}
                            >
                                { "×" }
                            </button>
                        </span>
                    }
                }) }
            </div>
            <input
                type="text"
                class="symptom-text"
                placeholder={format!(
                    "Type a symptom and press Enter ({} / {})",
                    props.symptoms.len(),
                    props.symptoms.max()
                )}
                value={(*query).clone()}
                oninput={on_input}
                onkeydown={on_key_down}
            />
            if !suggestions.is_empty() {
                <ul class="symptom-suggestions">
                    { for suggestions.into_iter().map(|s| {
                        let add = add.clone();
                        let label = symptom_display(&s);
                        let key = s.clone();
                        html! {
                            <li key={key} onclick={Callback::from(move |_: MouseEvent| add.emit(s.clone()))}>
                                { label }
                            </li>
                        }
                    }) }
                </ul>
            }
            if let Some(message) = (*error).clone() {
                <div class="field-error">{ message }</div>
            }
            if !props.symptoms.is_empty() {
                <button class="clear-symptoms" onclick={on_clear}>{ "Clear all" }</button>
            }
        </div>
    }
}
