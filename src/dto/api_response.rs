use serde::Deserialize;

// Envoltorio genérico de todas las respuestas del backend
// Un `data` ausente se lee como `None`
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}
