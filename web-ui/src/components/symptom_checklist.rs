// Category-grouped symptom checkboxes

use skinscan_core::{SymptomCatalog, SymptomSet};
use yew::prelude::*;

use crate::messages::symptom_display;

#[derive(Properties, PartialEq)]
pub struct SymptomChecklistProps {
    pub symptoms: SymptomSet,
    pub catalog: SymptomCatalog,
    pub on_change: Callback<SymptomSet>,
}

#[function_component(SymptomChecklist)]
pub fn symptom_checklist(props: &SymptomChecklistProps) -> Html {
    let error = use_state(|| None::<String>);

    let toggle = {
        let symptoms = props.symptoms.clone();
        let on_change = props.on_change.clone();
        let error = error.clone();
        Callback::from(move |token: String| {
            let mut next = symptoms.clone();
            match next.toggle(&token) {
                Ok(_) => {
                    error.set(None);
                    on_change.emit(next);
                }
                Err(e) => error.set(Some(e.to_string())),
            }
        })
    };

    html! {
        <div class="symptom-checklist">
            { for props.catalog.categories().iter().map(|category| html! {
                <fieldset class="symptom-category" key={category.name.clone()}>
                    <legend>{ category.name.clone() }</legend>
                    { for category.symptoms.iter().map(|symptom| {
                        let toggle = toggle.clone();
                        let token = symptom.clone();
                        html! {
                            <label class="symptom-option" key={symptom.clone()}>
                                <input
                                    type="checkbox"
                                    checked={props.symptoms.contains(symptom)}
                                    onchange={Callback::from(move |_: Event| toggle.emit(token.clone()))}
                                />
                                { symptom_display(symptom) }
                            </label>
                        }
                    }) }
                </fieldset>
            }) }
            <div class="symptom-count">
                { format!("{} of {} selected", props.symptoms.len(), props.symptoms.max()) }
            </div>
            if let Some(message) = (*error).clone() {
                <div class="field-error">{ message }</div>
            }
        </div>
    }
}
