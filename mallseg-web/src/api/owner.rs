//! Operator login and dashboard

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Form,
};
use mallseg_common::classifier::LabeledPoint;
use mallseg_common::{SegmentClassifier, Submission};
use serde::Deserialize;
use std::fmt::Write;

use super::ui::{error, escape_html, page, success};
use crate::AppState;

pub const INVALID_CREDENTIALS: &str = "Invalid credentials. Please try again.";
pub const LOGIN_OK: &str = "Logged in successfully!";
pub const NO_DATA: &str = "No customer data available.";

/// Login form fields
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

const LOGIN_FORM: &str = r#"
    <div class="header">Mall Owner Login</div>
    <form method="post" action="/owner">
        <label for="username">Username</label>
        <input type="text" id="username" name="username">
        <label for="password">Password</label>
        <input type="password" id="password" name="password">
        <button type="submit">Login</button>
    </form>"#;

/// GET /owner
pub async fn owner_login() -> Html<String> {
    page(LOGIN_FORM)
}

/// POST /owner
///
/// Renders the dashboard when the gate accepts the credentials, otherwise
/// the login form again with a rejection message. Retries are unlimited.
pub async fn owner_dashboard(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Response {
    if !state.gate.verify(&form.username, &form.password) {
        let body = format!("{}{}", LOGIN_FORM, error(INVALID_CREDENTIALS));
        return (StatusCode::UNAUTHORIZED, page(&body)).into_response();
    }

    let submissions = state.store.all();
    page(&render_dashboard(state.classifier.as_ref(), &submissions)).into_response()
}

/// Dashboard body: submissions table, per-customer action lines and, for
/// clustering revisions, the labelled reference dataset.
pub fn render_dashboard(classifier: &dyn SegmentClassifier, submissions: &[Submission]) -> String {
    let mut body = success(LOGIN_OK);

    if submissions.is_empty() {
        let _ = write!(body, "\n    <p>{}</p>", NO_DATA);
    } else {
        body.push_str("\n    <div class=\"subheader\">Customer Data and Segmentation</div>");
        body.push_str(&submissions_table(submissions));

        for submission in submissions {
            body.push_str(&action_line(classifier, submission));
        }
    }

    let reference = classifier.reference_table();
    if !reference.is_empty() {
        let _ = write!(
            body,
            "\n    <div class=\"subheader\">Reference Segmentation ({} customers, revision {})</div>",
            reference.len(),
            classifier.revision()
        );
        body.push_str(&reference_table(reference));
    }

    body
}

fn submissions_table(submissions: &[Submission]) -> String {
    let mut table = String::from(
        "\n    <table>\n        <tr><th></th><th>Name</th><th>Email</th><th>Annual Income</th><th>Spending Score</th><th>Cluster</th></tr>",
    );
    for (idx, s) in submissions.iter().enumerate() {
        let _ = write!(
            table,
            "\n        <tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            idx,
            escape_html(&s.name),
            escape_html(&s.email),
            s.income,
            s.spending_score,
            s.segment_id
        );
    }
    table.push_str("\n    </table>");
    table
}

/// One "Customer: ... - Action: ..." line
///
/// Ids outside the revision's action table get no action part.
fn action_line(classifier: &dyn SegmentClassifier, submission: &Submission) -> String {
    let mut line = format!(
        "Customer: {} (Cluster {})",
        submission.name, submission.segment_id
    );
    if let Some(action) = classifier.action(submission.segment_id) {
        let _ = write!(line, " - Action: {}", action);
    }
    format!(
        "\n    <div class=\"cluster-result\">{}</div>",
        escape_html(&line)
    )
}

fn reference_table(rows: &[LabeledPoint]) -> String {
    let mut table = String::from(
        "\n    <table>\n        <tr><th>Annual Income (k$)</th><th>Spending Score (1-100)</th><th>Cluster</th></tr>",
    );
    for row in rows {
        let _ = write!(
            table,
            "\n        <tr><td>{}</td><td>{}</td><td>{}</td></tr>",
            row.income, row.spending_score, row.segment_id
        );
    }
    table.push_str("\n    </table>");
    table
}
