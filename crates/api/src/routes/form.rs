//! HTML Form Routes
//!
//! Server-rendered entry form. Values arrive as text, so blank inputs are
//! reported as missing.

use axum::{
    extract::{Form, State},
    response::Html,
};
use data_validator::{Field, InputRecord, MachineType, RawValue};
use html_escape::encode_safe;
use inference_engine::{reference_tables, ReferenceEntry};
use std::collections::HashMap;
use std::sync::Arc;

use crate::service::Submission;
use crate::AppState;

const TITLE: &str = "Machine Failure Prediction Web App";

/// Empty form
pub async fn index() -> Html<String> {
    Html(render_page(&HashMap::new(), None))
}

/// Handle a form submission and re-render the page with its outcome
pub async fn submit(
    State(state): State<Arc<AppState>>,
    Form(values): Form<HashMap<String, String>>,
) -> Html<String> {
    let record = record_from_form(&values);
    let submission = state.service.submit(&record);
    Html(render_page(&values, Some(&submission)))
}

/// Map form keys onto a record in textual entry mode
pub fn record_from_form(values: &HashMap<String, String>) -> InputRecord {
    let mut record = InputRecord::default();
    for field in Field::ALL {
        let value = values.get(field.key()).map(|v| RawValue::Text(v.clone()));
        record.set(field, value);
    }
    record
}

fn render_page(values: &HashMap<String, String>, submission: Option<&Submission>) -> String {
    let mut html = String::with_capacity(4096);
    html.push_str(&format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{TITLE}</title>\n\
         <style>.error{{color:#b00020}} .success{{color:#1b5e20}} \
         form{{display:grid;grid-template-columns:1fr 1fr;gap:0.75em;max-width:40em}}</style>\n\
         </head>\n<body>\n<h1>{TITLE}</h1>\n"
    ));

    html.push_str("<form method=\"post\" action=\"/predict\">\n");
    for (i, field) in Field::ALL.iter().enumerate() {
        let current = values.get(field.key()).map(String::as_str).unwrap_or("");
        html.push_str(&format!("<label>{}. {} value<br>", i + 1, encode_safe(field.name())));
        match field {
            Field::Type => html.push_str(&type_select(current)),
            _ => html.push_str(&format!(
                "<input type=\"text\" inputmode=\"decimal\" name=\"{}\" value=\"{}\">",
                field.key(),
                encode_safe(current)
            )),
        }
        html.push_str("</label>\n");
    }
    html.push_str("<button type=\"submit\">Predict Machine Failure</button>\n</form>\n");

    match submission {
        Some(Submission::Invalid { errors }) => {
            for line in errors.lines() {
                html.push_str(&format!("<p class=\"error\">{}</p>\n", encode_safe(&line)));
            }
        }
        Some(Submission::Predicted { report }) => {
            for line in report.lines() {
                html.push_str(&format!("<p class=\"success\">{}</p>\n", encode_safe(line)));
            }
        }
        Some(Submission::Failed { message }) | Some(Submission::Rejected { message, .. }) => {
            html.push_str(&format!("<p class=\"error\">{}</p>\n", encode_safe(message)));
        }
        None => {}
    }

    let tables = reference_tables();
    html.push_str(&reference_table(
        "Failure Type Abbreviations and Full Forms",
        &tables.failure_types,
    ));
    html.push_str(&reference_table("Type Column Descriptions", &tables.machine_types));
    html.push_str("</body>\n</html>\n");
    html
}

fn type_select(current: &str) -> String {
    let mut select = format!("<select name=\"{}\">", Field::Type.key());
    for machine_type in MachineType::ALL {
        let code = machine_type.code().to_string();
        let selected = if current.trim() == code { " selected" } else { "" };
        select.push_str(&format!(
            "<option value=\"{code}\"{selected}>{}</option>",
            encode_safe(machine_type.label())
        ));
    }
    select.push_str("</select>");
    select
}

fn reference_table(heading: &str, entries: &[ReferenceEntry]) -> String {
    let mut table = format!("<h3>{}</h3>\n<table>\n", encode_safe(heading));
    for entry in entries {
        table.push_str(&format!(
            "<tr><th>{}</th><td>{}</td></tr>\n",
            encode_safe(&entry.code),
            encode_safe(&entry.description)
        ));
    }
    table.push_str("</table>\n");
    table
}
