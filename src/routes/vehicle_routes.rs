use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Response,
    routing::{get, post},
    Extension, Form, Json, Router,
};

use super::{html, FieldQuery, FieldValidation};
use crate::middleware::SessionId;
use crate::state::AppState;
use crate::utils::errors::{AppError, AppResult};
use crate::viewmodels::{AddVehicleField, AddVehicleInput, AddVehicleViewModel, SubmitBlocked};
use crate::views::Page;

pub fn create_vehicle_router() -> Router<AppState> {
    Router::new()
        .route("/add-vehicle", get(show_form).post(submit_form))
        .route("/add-vehicle/validate", post(validate_field))
}

fn render(state: &AppState, view_model: &mut AddVehicleViewModel, status: StatusCode) -> AppResult<Response> {
    let notifications = view_model.take_notifications();
    let body = state.templates.render_page(
        Page::AddVehicle,
        Page::AddVehicle.path(),
        &notifications,
        &view_model.to_view(),
    )?;
    html(status, body)
}

/// Navegar al formulario lo vuelve a montar vacío
async fn show_form(
    State(state): State<AppState>,
    Extension(SessionId(session_id)): Extension<SessionId>,
) -> AppResult<Response> {
    let session = state.session(session_id).await;
    let mut page = session.lock().await;
    page.add_vehicle.remount();
    render(&state, &mut page.add_vehicle, StatusCode::OK)
}

async fn submit_form(
    State(state): State<AppState>,
    Extension(SessionId(session_id)): Extension<SessionId>,
    Form(input): Form<AddVehicleInput>,
) -> AppResult<Response> {
    let session = state.session(session_id).await;

    let ticket = {
        let mut page = session.lock().await;
        let view_model = &mut page.add_vehicle;
        if !view_model.is_submitting() {
            view_model.set_input(input);
        }
        match view_model.begin_submit() {
            Ok(ticket) => ticket,
            Err(blocked) => {
                let status = match blocked {
                    SubmitBlocked::Invalid => StatusCode::UNPROCESSABLE_ENTITY,
                    SubmitBlocked::InFlight => StatusCode::CONFLICT,
                };
                return render(&state, view_model, status);
            }
        }
    };

    let result = state.api.add_vehicle(&ticket.request).await;

    let mut page = session.lock().await;
    page.add_vehicle.finish_submit(&ticket, result);
    render(&state, &mut page.add_vehicle, StatusCode::OK)
}

/// Blur de un campo: a partir de aquí ese campo muestra sus errores
async fn validate_field(
    State(state): State<AppState>,
    Extension(SessionId(session_id)): Extension<SessionId>,
    Query(query): Query<FieldQuery>,
    Form(input): Form<AddVehicleInput>,
) -> AppResult<Json<FieldValidation>> {
    let field = AddVehicleField::from_form_name(&query.field)
        .ok_or_else(|| AppError::BadRequest(format!("unknown field '{}'", query.field)))?;

    let session = state.session(session_id).await;
    let mut page = session.lock().await;
    let view_model = &mut page.add_vehicle;
    if !view_model.is_submitting() {
        view_model.set_input(input);
    }
    view_model.blur(field);

    Ok(Json(FieldValidation {
        field: field.form_name(),
        errors: view_model.to_view().errors,
    }))
}
