//! Admin page routes
//!
//! GET renders the page (or the print list for `action=PrintRaidTeams`),
//! POST executes the action written into the hidden `action` field.

use axum::{
    Router,
    extract::{Form, FromRequest, Multipart, Query, Request, State},
    http::{HeaderMap, StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use raidadmin::{
    ActionOutcome, AdminAction, PageContext, RaidId, RaidSelector, Viewer, action::field,
    render_admin_page, render_document, render_print_page,
};
use std::collections::HashMap;
use tracing::{debug, info, warn};

use crate::{
    AppState,
    auth::resolve_viewer,
    error::{ApiError, Result},
    models::{AdminQuery, PostedForm},
};

const PAGE_TITLE: &str = "Администрирование";

/// Create admin page routes mounted at `script_path`
pub fn router(script_path: &str) -> Router<AppState> {
    Router::new().route(script_path, get(show_page).post(post_action))
}

/// Render the admin page or the print list
async fn show_page(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<AdminQuery>,
) -> Result<Response> {
    let viewer = resolve_viewer(&headers, &state.config)?;
    let raid_id = query.raid_id()?;

    match query.action()? {
        None => render_page(&state, viewer, raid_id, None).await,
        Some(AdminAction::PrintRaidTeams) => {
            debug!("Printing teams of raid {}", raid_id);
            let raid = state.admin.printable_raid(&viewer, raid_id).await?;
            Ok(Html(render_print_page(&raid)).into_response())
        }
        Some(action) => Err(ApiError::bad_request(&format!(
            "Action {} must be posted",
            action
        ))),
    }
}

/// Execute an action posted by one of the page's forms
async fn post_action(
    State(state): State<AppState>,
    headers: HeaderMap,
    request: Request,
) -> Result<Response> {
    let viewer = resolve_viewer(&headers, &state.config)?;
    if !viewer.can_administer() {
        warn!("{} posted to the admin page without rights", viewer.name);
        return Err(raidadmin::AdminError::access_denied().into());
    }

    let form = read_form(&headers, request, &state).await?;
    let action = form.action()?;
    if action == AdminAction::PrintRaidTeams {
        return Err(ApiError::bad_request("PrintRaidTeams is opened as a link"));
    }
    let action_request = form.into_request()?;
    let raid_id = action_request.raid_id;

    if action.is_mutating() {
        info!("{} runs {} for raid {}", viewer.name, action, raid_id);
    } else {
        debug!("{} runs {} for raid {}", viewer.name, action, raid_id);
    }
    let outcome = state.admin.execute(&viewer, action, action_request).await?;

    match outcome {
        ActionOutcome::Dump { raid_id, raid } => {
            let body = serde_json::to_vec_pretty(&raid)?;
            Ok((
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, "application/json".to_string()),
                    (
                        header::CONTENT_DISPOSITION,
                        format!("attachment; filename=\"raid-{}.json\"", raid_id),
                    ),
                ],
                body,
            )
                .into_response())
        }
        outcome => {
            let message = outcome.short_result();
            render_page(&state, viewer, raid_id, Some(message)).await
        }
    }
}

/// Collect fields from a multipart or url-encoded body
async fn read_form(headers: &HeaderMap, request: Request, state: &AppState) -> Result<PostedForm> {
    let is_multipart = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("multipart/form-data"));

    if !is_multipart {
        let Form(fields) = Form::<HashMap<String, String>>::from_request(request, state)
            .await
            .map_err(|e| ApiError::bad_request(&e.body_text()))?;
        return Ok(PostedForm {
            fields,
            upload: None,
        });
    }

    let mut multipart = Multipart::from_request(request, state)
        .await
        .map_err(|e| ApiError::bad_request(&e.body_text()))?;

    let mut form = PostedForm::default();
    while let Some(part) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(&e.body_text()))?
    {
        let name = part.name().unwrap_or_default().to_string();
        if name == field::DATA_FILE {
            let bytes = part
                .bytes()
                .await
                .map_err(|e| ApiError::bad_request(&e.body_text()))?;
            // Browsers send an empty part when no file was chosen
            if !bytes.is_empty() {
                form.upload = Some(bytes.to_vec());
            }
        } else {
            let value = part
                .text()
                .await
                .map_err(|e| ApiError::bad_request(&e.body_text()))?;
            form.fields.insert(name, value);
        }
    }

    Ok(form)
}

async fn render_page(
    state: &AppState,
    viewer: Viewer,
    raid_id: RaidId,
    short_result: Option<String>,
) -> Result<Response> {
    let mut builder = PageContext::builder(state.config.script_path.clone())
        .raid(raid_id)
        .viewer(viewer)
        .tab_index(state.config.tab_index);
    if let Some(message) = short_result {
        builder = builder.short_result(message);
    }

    let body = render_admin_page(&builder.build())?;
    let selector = RaidSelector {
        script_url: state.config.script_path.clone(),
        raids: state.admin.raid_choices().await?,
        selected: raid_id,
    };

    Ok(Html(render_document(PAGE_TITLE, &selector, &body)).into_response())
}
