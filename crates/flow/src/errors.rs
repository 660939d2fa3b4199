// Archivo: errors.rs
// Propósito: definir los errores del motor de aprobación y el alias Result<T>
// usado por las APIs del crate.
use survey_domain::{DomainError, Role, SurveyStatus};
use thiserror::Error;

use crate::transitions::TransitionKind;

/// Fallos de validación de negocio. El llamador debe volver a pedir el dato
/// y reintentar; el registro queda intacto.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
  /// Una devolución exige un motivo no vacío.
  #[error("Se requiere un motivo claro antes de devolver (rol {role})")]
  MissingReason { role: Role },
}

/// Errores comunes del motor de flujos.
///
/// - `NotFound`: registro no encontrado.
/// - `Conflict`: conflicto de versión (control optimista).
/// - `Storage`: error al acceder al almacenamiento.
/// - `Validation`: regla de negocio incumplida (motivo de devolución).
/// - `Rejected`: la combinación estado/rol/acción no es una arista del grafo.
#[derive(Error, Debug)]
pub enum FlowError {
  #[error("No encontrado: {0}")]
  NotFound(String),
  #[error("Conflicto: {0}")]
  Conflict(String),
  #[error("Error de almacenamiento: {0}")]
  Storage(String),
  #[error("Validación: {0}")]
  Validation(#[from] ValidationError),
  #[error("Transición no permitida: {kind} por {role} desde {from}")]
  Rejected { from: SurveyStatus, role: Role, kind: TransitionKind },
  #[error("Error de dominio: {0}")]
  Domain(#[from] DomainError),
  #[error("Error de serialización: {0}")]
  Serialization(#[from] serde_json::Error),
  #[error("Otro: {0}")]
  Other(String),
}

impl FlowError {
  /// `true` para los rechazos que el llamador resuelve volviendo a pedir
  /// datos (no son fallos de infraestructura).
  pub fn is_user_facing(&self) -> bool {
    matches!(self, FlowError::Validation(_) | FlowError::Rejected { .. })
  }
}

/// Alias de resultado usado por las APIs del crate.
pub type Result<T> = std::result::Result<T, FlowError>;
