use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Response,
    routing::{get, post},
    Extension, Form, Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;

use super::{html, FieldQuery, FieldValidation};
use crate::middleware::SessionId;
use crate::state::AppState;
use crate::utils::errors::{AppError, AppResult};
use crate::viewmodels::{SearchBookViewModel, SearchField, SearchInput, SubmitBlocked};
use crate::views::Page;

pub fn create_search_book_router() -> Router<AppState> {
    Router::new()
        .route("/search-book", get(show_form).post(search))
        .route("/search-book/validate", post(validate_field))
        .route("/search-book/book", post(book))
}

/// Formulario de la fila "Book Now"
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookForm {
    pub vehicle_id: String,
}

fn render(state: &AppState, view_model: &mut SearchBookViewModel, status: StatusCode) -> AppResult<Response> {
    let notifications = view_model.take_notifications();
    let body = state.templates.render_page(
        Page::SearchBook,
        Page::SearchBook.path(),
        &notifications,
        &view_model.to_view(),
    )?;
    html(status, body)
}

async fn show_form(
    State(state): State<AppState>,
    Extension(SessionId(session_id)): Extension<SessionId>,
) -> AppResult<Response> {
    let session = state.session(session_id).await;
    let mut page = session.lock().await;
    page.search_book.remount(state.local_now(), state.utc_offset());
    render(&state, &mut page.search_book, StatusCode::OK)
}

async fn search(
    State(state): State<AppState>,
    Extension(SessionId(session_id)): Extension<SessionId>,
    Form(input): Form<SearchInput>,
) -> AppResult<Response> {
    let session = state.session(session_id).await;

    let ticket = {
        let mut page = session.lock().await;
        let view_model = &mut page.search_book;
        if !view_model.is_searching() {
            view_model.set_utc_offset(state.utc_offset());
            view_model.set_input(input);
        }
        match view_model.begin_search() {
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

    let result = state.api.search_available_vehicles(&ticket.request).await;

    let mut page = session.lock().await;
    page.search_book.finish_search(&ticket, result);
    render(&state, &mut page.search_book, StatusCode::OK)
}

async fn book(
    State(state): State<AppState>,
    Extension(SessionId(session_id)): Extension<SessionId>,
    Form(form): Form<BookForm>,
) -> AppResult<Response> {
    let session = state.session(session_id).await;

    let ticket = {
        let mut page = session.lock().await;
        page.search_book
            .begin_booking(&form.vehicle_id, Uuid::new_v4().to_string())?
    };

    log::info!("📝 Reservando vehículo {}", ticket.request.vehicle_id);
    let result = state.api.create_booking(&ticket.request).await;

    let mut page = session.lock().await;
    page.search_book.finish_booking(&ticket, result);
    render(&state, &mut page.search_book, StatusCode::OK)
}

async fn validate_field(
    State(state): State<AppState>,
    Extension(SessionId(session_id)): Extension<SessionId>,
    Query(query): Query<FieldQuery>,
    Form(input): Form<SearchInput>,
) -> AppResult<Json<FieldValidation>> {
    let field = SearchField::from_form_name(&query.field)
        .ok_or_else(|| AppError::BadRequest(format!("unknown field '{}'", query.field)))?;

    let session = state.session(session_id).await;
    let mut page = session.lock().await;
    let view_model = &mut page.search_book;
    if !view_model.is_searching() {
        view_model.set_input(input);
    }
    view_model.blur(field);

    Ok(Json(FieldValidation {
        field: field.form_name(),
        errors: view_model.to_view().errors,
    }))
}
