// Result presentation

use skinscan_core::{format_confidence, NormalizedResult};
use yew::prelude::*;

use crate::messages::{
    alignment_label, confidence_class, confidence_label, severity_class, severity_label,
    symptom_display, urgency_label,
};

#[derive(Properties, PartialEq)]
pub struct ResultsProps {
    pub result: NormalizedResult,
    pub on_new_analysis: Callback<()>,
}

fn bullet_section(title: &str, items: &[String]) -> Html {
    if items.is_empty() {
        return html! {};
    }
    html! {
        <section class="recommendation-section">
            <h4>{ title.to_string() }</h4>
            <ul>
                { for items.iter().map(|item| html! { <li>{ item.clone() }</li> }) }
            </ul>
        </section>
    }
}

#[function_component(Results)]
pub fn results(props: &ResultsProps) -> Html {
    let result = &props.result;
    let prediction = &result.prediction;
    let severity = &result.severity;
    let recs = &result.recommendations;

    let on_new = {
        let on_new_analysis = props.on_new_analysis.clone();
        Callback::from(move |_: MouseEvent| on_new_analysis.emit(()))
    };

    html! {
        <div class="results">
            <section class="prediction-card">
                <h2 class="disease-name">{ prediction.disease.clone() }</h2>
                <div class={confidence_class(prediction.confidence_level)}>
                    <span class="confidence-value">{ prediction.formatted_confidence() }</span>
                    <span class="confidence-label">{ confidence_label(prediction.confidence_level) }</span>
                </div>
                if prediction.needs_review {
                    <div class="review-warning">
                        { prediction.review_reason.clone().unwrap_or_else(|| "This prediction should be reviewed by a professional".to_string()) }
                    </div>
                }
                if !prediction.alternatives.is_empty() {
                    <div class="alternatives">
                        <h4>{ "Other possibilities" }</h4>
                        <ul>
                            { for prediction.alternatives.iter().map(|alt| html! {
                                <li>
                                    <span>{ alt.disease.clone() }</span>
                                    <span class="alt-confidence">{ format_confidence(alt.confidence) }</span>
                                </li>
                            }) }
                        </ul>
                    </div>
                }
            </section>

            <section class="severity-card">
                <span class={severity_class(severity.level)}>{ severity_label(severity.level) }</span>
                <span class={classes!("urgency", severity.urgency.as_str())}>{ urgency_label(severity.urgency) }</span>
                if !severity.explanation.is_empty() {
                    <p class="severity-explanation">{ severity.explanation.clone() }</p>
                }
            </section>

            if let Some(analysis) = result.symptom_analysis.as_ref() {
                <section class="symptom-analysis">
                    <h3>{ "Symptom match" }</h3>
                    <div class={classes!("alignment", analysis.alignment.as_str())}>
                        { format!("{} ({}%)", alignment_label(analysis.alignment), analysis.match_percentage) }
                    </div>
                    <p>{ analysis.message.clone() }</p>
                    if let Some(adjustment) = analysis.confidence_adjustment.as_ref() {
                        <p class="confidence-adjustment">
                            { format!(
                                "Confidence with symptoms: {} (model: {})",
                                format_confidence(adjustment.adjusted),
                                format_confidence(adjustment.original)
                            ) }
                            if let Some(reason) = adjustment.reason.clone() {
                                <span class="adjustment-reason">{ reason }</span>
                            }
                        </p>
                    }
                    if !analysis.matched_symptoms.is_empty() {
                        <div class="matched-symptoms">
                            { for analysis.matched_symptoms.iter().map(|s| html! {
                                <span class="symptom-tag">{ symptom_display(s) }</span>
                            }) }
                        </div>
                    }
                </section>
            }

            <section class="recommendations">
                <h3>{ "Recommendations" }</h3>
                if !recs.general_advice.is_empty() {
                    <p class="general-advice">{ recs.general_advice.clone() }</p>
                }
                { bullet_section("Immediate care", &recs.immediate_care) }
                { bullet_section("Home remedies", &recs.home_remedies) }
                { bullet_section("Precautions", &recs.precautions) }
                { bullet_section("Lifestyle tips", &recs.lifestyle_tips) }
                if !recs.when_to_see_doctor.is_empty() {
                    <div class="see-doctor">
                        <h4>{ "When to see a doctor" }</h4>
                        <p>{ recs.when_to_see_doctor.clone() }</p>
                    </div>
                }
            </section>

            <p class="disclaimer">{ result.disclaimer.clone() }</p>

            <button class="new-analysis" onclick={on_new}>{ "New analysis" }</button>
        </div>
    }
}
