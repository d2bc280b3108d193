use axum::{
    extract::Request,
    http::{header, HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

/// Nombre de la cookie de sesión
pub const SESSION_COOKIE: &str = "fleetlink_sid";

/// Id de sesión del navegador, disponible como extensión de la request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionId(pub Uuid);

/// Leer el id de sesión de la cabecera `Cookie`
pub fn session_id_from_headers(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .and_then(|(_, value)| Uuid::parse_str(value.trim()).ok())
}

/// Middleware de sesión
///
/// Si la request no trae una cookie válida se genera un id nuevo y se
/// devuelve en `Set-Cookie`.
pub async fn session_middleware(mut request: Request, next: Next) -> Response {
    let (id, is_new) = match session_id_from_headers(request.headers()) {
        Some(id) => (id, false),
        None => (Uuid::new_v4(), true),
    };

    request.extensions_mut().insert(SessionId(id));
    let mut response = next.run(request).await;

    if is_new {
        let cookie = format!("{}={}; Path=/; HttpOnly; SameSite=Lax", SESSION_COOKIE, id);
        match HeaderValue::from_str(&cookie) {
            Ok(value) => {
                response.headers_mut().append(header::SET_COOKIE, value);
            }
            Err(e) => tracing::error!("❌ Cookie de sesión inválida: {}", e),
        }
    }

    response
}
