//! Server-rendered HTML form.
//!
//! Every button of the page posts the whole form with an `action` value;
//! successful actions redirect back to the page (post/redirect/get).

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::attendance::dtos::{FormViewDto, PageAction, PageActionForm};
use crate::features::attendance::services::{FormService, FormSession};
use crate::shared::constants::SUBMISSION_SUCCESS_MESSAGE;
use crate::shared::templates::render_page;

const FORM_TEMPLATE: &str = "attendance/form.html";

fn form_path(id: Uuid) -> String {
    format!("/forms/{}", id)
}

fn render(session: FormSession, error: Option<String>) -> Result<Html<String>> {
    let form = FormViewDto::from(session);
    let html = render_page(
        FORM_TEMPLATE,
        minijinja::context! {
            form => form,
            error => error,
            success_message => SUBMISSION_SUCCESS_MESSAGE,
        },
    )?;
    Ok(Html(html))
}

/// `GET /`: open a fresh form
pub async fn new_form(State(service): State<Arc<FormService>>) -> Result<Redirect> {
    let session = service.create_session().await?;
    Ok(Redirect::to(&form_path(session.id)))
}

/// `GET /forms/{id}`
pub async fn show_form(
    State(service): State<Arc<FormService>>,
    Path(id): Path<Uuid>,
) -> Result<Html<String>> {
    let session = service.get_session(id).await?;
    render(session, None)
}

/// `POST /forms/{id}`
pub async fn post_form(
    State(service): State<Arc<FormService>>,
    Path(id): Path<Uuid>,
    Form(form): Form<PageActionForm>,
) -> Result<Response> {
    match apply_action(&service, id, &form).await {
        Ok(()) => Ok(Redirect::to(&form_path(id)).into_response()),
        Err(AppError::NotFound(msg)) => Err(AppError::NotFound(msg)),
        Err(e) => {
            // Re-render in place so the visitor sees what went wrong
            let status = e.status_code();
            let message = match &e {
                AppError::Internal(_) => "Internal server error".to_string(),
                other => other.to_string(),
            };
            tracing::debug!("Form {}: action {:?} rejected: {}", id, form.action, e);
            let session = service.get_session(id).await?;
            Ok((status, render(session, Some(message))?).into_response())
        }
    }
}

async fn apply_action(service: &FormService, id: Uuid, form: &PageActionForm) -> Result<()> {
    if form.action != PageAction::DismissSuccess {
        service.update_identity(id, form.identity()).await?;
    }

    match form.action {
        PageAction::SelectProvince
        | PageAction::SelectCity
        | PageAction::SelectDistrict
        | PageAction::SelectVillage => {
            let Some(level) = form.action.level() else {
                return Ok(());
            };
            // The placeholder option posts an empty value: nothing to select
            if let Some(region_id) = form.region_id(level) {
                service.select(id, level, region_id).await?;
            }
        }
        PageAction::ReloadProvince
        | PageAction::ReloadCity
        | PageAction::ReloadDistrict
        | PageAction::ReloadVillage => {
            if let Some(level) = form.action.level() {
                service.reload_level(id, level).await?;
            }
        }
        PageAction::Submit => {
            service.submit(id).await?;
        }
        PageAction::DismissSuccess => {
            service.dismiss_success(id).await?;
        }
        PageAction::DismissAlert => {
            service.dismiss_alert(id).await?;
        }
    }

    Ok(())
}
