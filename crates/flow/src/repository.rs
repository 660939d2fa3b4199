// Archivo: repository.rs
// Propósito: definir el trait `SurveyRepository` y el trait auxiliar
// `DraftStore`. Describe el contrato que deben implementar las
// persistencias (SQLite vía diesel, in-memory, etc.).
use crate::errors::Result;
use serde::{Deserialize, Serialize};
use survey_domain::{SurveyPayload, SurveyRecord};
use uuid::Uuid;

/// Resultado de una escritura con control optimista.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PersistResult {
    /// Escritura aplicada; `new_version` es la versión almacenada.
    Ok { new_version: i64 },
    /// La versión almacenada no coincide con la esperada.
    Conflict,
}

/// Contrato mínimo del repositorio de encuestas.
///
/// Cada registro se guarda completo; `version` crece en uno con cada
/// actualización aceptada.
pub trait SurveyRepository: Send + Sync {
    /// Inserta un registro nuevo. Devuelve `Conflict` si el id ya existe.
    fn insert(&self, record: &SurveyRecord) -> Result<()>;

    /// Obtiene un registro por id.
    fn get(&self, id: &Uuid) -> Result<Option<SurveyRecord>>;

    /// Lista todos los registros, ordenados por fecha de envío ascendente.
    fn list(&self) -> Result<Vec<SurveyRecord>>;

    /// Sustituye el registro almacenado si su versión es `expected_version`.
    /// Devuelve `NotFound` si el id no existe.
    fn update(&self, record: &SurveyRecord, expected_version: i64) -> Result<PersistResult>;

    /// Número de registros almacenados.
    fn count(&self) -> Result<usize> {
        Ok(self.list()?.len())
    }
}

/// Borradores del formulario por propietario (autoguardado del empleado).
pub trait DraftStore: Send + Sync {
    /// Guarda (o reemplaza) el borrador de `owner`.
    fn save_draft(&self, owner: &str, draft: &SurveyPayload) -> Result<()>;
    /// Carga el borrador de `owner`, si existe.
    fn load_draft(&self, owner: &str) -> Result<Option<SurveyPayload>>;
    /// Elimina el borrador tras un envío.
    fn clear_draft(&self, owner: &str) -> Result<()>;
}
