//! Settings panel handlers.
//!
//! The HTML form and the JSON API share one load path and one save path.
//! Feedback is coarse: one success banner when every section saved, one
//! generic failure banner otherwise.

use std::collections::HashMap;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::Value;
use tracing::{instrument, warn};

use yen_flowers_core::{SettingsSection, SiteSettings};

use crate::error::{AppError, Result};
use crate::filters;
use crate::settings::{SaveReport, settings_from_form};
use crate::state::AppState;

/// One input on the settings form.
#[derive(Debug, Clone)]
pub struct FieldView {
    /// Field key within its section (e.g. `default_fee`)
    pub key: String,
    /// Form input name (e.g. `delivery.default_fee`)
    pub name: String,
    pub value: String,
    pub is_checkbox: bool,
    pub is_number: bool,
    pub checked: bool,
}

/// One fieldset on the settings form.
#[derive(Debug, Clone)]
pub struct SectionForm {
    pub key: &'static str,
    pub title: &'static str,
    pub fields: Vec<FieldView>,
}

/// Build the fieldsets from current values.
#[must_use]
pub fn section_forms(settings: &SiteSettings) -> Vec<SectionForm> {
    SettingsSection::ALL
        .into_iter()
        .map(|section| {
            let fields = match settings.section_payload(section) {
                Ok(Value::Object(values)) => values
                    .into_iter()
                    .map(|(key, value)| FieldView {
                        name: format!("{}.{key}", section.key()),
                        is_checkbox: value.is_boolean(),
                        is_number: value.is_number(),
                        checked: value.as_bool().unwrap_or(false),
                        value: match value {
                            Value::String(text) => text,
                            Value::Bool(_) => "on".to_string(),
                            other => other.to_string(),
                        },
                        key,
                    })
                    .collect(),
                _ => Vec::new(),
            };

            SectionForm {
                key: section.key(),
                title: section.title(),
                fields,
            }
        })
        .collect()
}

/// Fieldsets holding exactly what was submitted.
///
/// Used to re-show a rejected form. Text and number inputs keep their raw
/// text, checkboxes follow presence, and fields that were not submitted show
/// their defaults.
#[must_use]
pub fn submitted_forms(fields: &[(String, String)]) -> Vec<SectionForm> {
    let mut forms = section_forms(&SiteSettings::default());
    for field in forms.iter_mut().flat_map(|form| form.fields.iter_mut()) {
        let submitted = fields
            .iter()
            .rev()
            .find(|(name, _)| *name == field.name)
            .map(|(_, value)| value);

        if field.is_checkbox {
            field.checked = submitted.is_some();
        } else if let Some(raw) = submitted {
            field.value.clone_from(raw);
        }
    }
    forms
}

/// Banner shown above the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub is_error: bool,
    pub message: String,
}

impl Banner {
    fn success(message: &str) -> Self {
        Self {
            is_error: false,
            message: message.to_string(),
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            is_error: true,
            message: message.into(),
        }
    }

    /// Coarse banner for a save report.
    #[must_use]
    pub fn for_report(report: &SaveReport) -> Self {
        if report.is_success() {
            Self::success("Đã lưu cài đặt.")
        } else {
            Self::error("Lưu cài đặt thất bại. Vui lòng thử lại.")
        }
    }
}

/// Settings page template.
#[derive(Template, WebTemplate)]
#[template(path = "settings.html")]
pub struct SettingsTemplate {
    pub sections: Vec<SectionForm>,
    pub banner: Option<Banner>,
}

/// Display the settings form.
///
/// If loading fails the defaults are shown with an error banner.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> impl IntoResponse {
    let (settings, banner) = match state.settings().load().await {
        Ok(settings) => (settings, None),
        Err(e) => {
            warn!(error = %e, "Failed to load settings");
            (
                SiteSettings::default(),
                Some(Banner::error(
                    "Không tải được cài đặt. Đang hiển thị giá trị mặc định.",
                )),
            )
        }
    };

    SettingsTemplate {
        sections: section_forms(&settings),
        banner,
    }
}

/// Save the settings form.
#[instrument(skip(state, fields))]
pub async fn save(
    State(state): State<AppState>,
    Form(fields): Form<Vec<(String, String)>>,
) -> Response {
    let settings = match settings_from_form(&fields) {
        Ok(settings) => settings,
        Err(e) => {
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                SettingsTemplate {
                    sections: submitted_forms(&fields),
                    banner: Some(Banner::error(format!("Giá trị không hợp lệ: {}", e.0))),
                },
            )
                .into_response();
        }
    };

    let report = state.settings().save(&settings).await;

    SettingsTemplate {
        sections: section_forms(&settings),
        banner: Some(Banner::for_report(&report)),
    }
    .into_response()
}

/// Current settings as JSON.
#[instrument(skip(state))]
pub async fn api_get(State(state): State<AppState>) -> Result<Json<SiteSettings>> {
    Ok(Json(state.settings().load().await?))
}

/// Update the sections present in the body.
///
/// Each section patch is laid over the stored values before saving. Answers
/// 200 when every section saved and 502 otherwise, always with the report.
#[instrument(skip(state, body))]
pub async fn api_put(
    State(state): State<AppState>,
    Json(body): Json<HashMap<String, Value>>,
) -> Result<Response> {
    for key in body.keys() {
        if SettingsSection::from_key(key).is_none() {
            warn!(section = %key, "Ignoring unknown settings section");
        }
    }

    let sections: Vec<SettingsSection> = SettingsSection::ALL
        .into_iter()
        .filter(|section| body.contains_key(section.key()))
        .collect();
    if sections.is_empty() {
        return Err(AppError::BadRequest("no known settings sections".to_string()));
    }

    let mut settings = state.settings().load().await?;
    for &section in &sections {
        if let Some(patch) = body.get(section.key()) {
            settings.apply_patch(section, patch);
        }
    }

    let report = state.settings().save_sections(&settings, &sections).await;
    let status = if report.is_success() {
        StatusCode::OK
    } else {
        StatusCode::BAD_GATEWAY
    };

    Ok((status, Json(report)).into_response())
}
