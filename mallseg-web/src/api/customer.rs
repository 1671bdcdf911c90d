//! Customer form: classify and record a submission

use axum::{
    extract::State,
    response::Html,
    Form,
};
use mallseg_common::Submission;
use serde::Deserialize;
use tracing::debug;

use super::ui::{page, success};
use crate::AppState;

pub const INCOME_MAX: u32 = 150;
pub const SPENDING_MAX: u32 = 100;
const SLIDER_DEFAULT: u32 = 50;

/// Customer form fields
///
/// Numbers are taken as given; the sliders bound them in the browser but
/// nothing is validated server-side.
#[derive(Debug, Deserialize)]
pub struct CustomerForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    pub income: f64,
    pub spending_score: f64,
}

fn form_body() -> String {
    format!(
        r#"
    <div class="header">Customer Input</div>
    <form method="post" action="/customer">
        <label for="name">Name</label>
        <input type="text" id="name" name="name">
        <label for="email">Email</label>
        <input type="text" id="email" name="email">
        <label for="income">Annual Income (k$): <output id="income-value">{default}</output></label>
        <input type="range" id="income" name="income" min="0" max="{income_max}" value="{default}"
               oninput="document.getElementById('income-value').value = this.value">
        <label for="spending_score">Spending Score (1-100): <output id="spending-value">{default}</output></label>
        <input type="range" id="spending_score" name="spending_score" min="0" max="{spending_max}" value="{default}"
               oninput="document.getElementById('spending-value').value = this.value">
        <button type="submit">Submit</button>
    </form>"#,
        default = SLIDER_DEFAULT,
        income_max = INCOME_MAX,
        spending_max = SPENDING_MAX,
    )
}

/// GET /customer
pub async fn customer_form() -> Html<String> {
    page(&form_body())
}

/// POST /customer
///
/// Classifies the submission, appends it to the store and confirms.
pub async fn submit_customer(
    State(state): State<AppState>,
    Form(form): Form<CustomerForm>,
) -> Html<String> {
    let segment_id = state.classifier.classify(form.income, form.spending_score);

    let count = state.store.append(Submission {
        name: form.name.clone(),
        email: form.email,
        income: form.income,
        spending_score: form.spending_score,
        segment_id,
    });
    debug!(segment = %segment_id, total = count, "Recorded customer submission");

    let body = format!(
        "{}\n    <p>You belong to Cluster {}. You will receive marketing emails accordingly.</p>\n{}",
        success(&format!(
            "Thank you, {}! Your response has been recorded.",
            form.name
        )),
        segment_id,
        form_body(),
    );
    page(&body)
}
