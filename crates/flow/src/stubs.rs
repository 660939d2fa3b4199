// Archivo: stubs.rs
// Propósito: implementaciones en memoria para pruebas y wiring rápido.
//
// Incluye un repositorio en memoria (`InMemorySurveyRepository`) y un
// almacén de borradores (`InMemoryDraftStore`). No son durables; se usan
// para demos, la CLI sin base de datos y pruebas locales.
use crate::errors::{FlowError, Result};
use crate::repository::{DraftStore, PersistResult, SurveyRepository};
use indexmap::IndexMap;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use survey_domain::{SurveyPayload, SurveyRecord};
use uuid::Uuid;

// Minimal in-memory repository (not durable)
pub struct InMemorySurveyRepository {
    /// Registros en orden de inserción.
    records: Mutex<IndexMap<Uuid, SurveyRecord>>,
}

impl InMemorySurveyRepository {
    /// Crea una nueva instancia del repositorio en memoria.
    pub fn new() -> Self {
        Self { records: Mutex::new(IndexMap::new()) }
    }

    /// Repositorio precargado con `records` (p.ej. `DomainStubs::sample_records`).
    pub fn with_records(records: Vec<SurveyRecord>) -> Self {
        let map = records.into_iter().map(|r| (r.id(), r)).collect();
        Self { records: Mutex::new(map) }
    }

    /// Helper para mapear `Mutex::lock()` en un `Result` con
    /// `FlowError::Storage`.
    fn lock<'a, T>(&'a self, m: &'a Mutex<T>) -> std::result::Result<MutexGuard<'a, T>, FlowError> {
        m.lock().map_err(|e| FlowError::Storage(format!("mutex poisoned: {:?}", e)))
    }
}

impl Default for InMemorySurveyRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl SurveyRepository for InMemorySurveyRepository {
    fn insert(&self, record: &SurveyRecord) -> Result<()> {
        let mut records = self.lock(&self.records)?;
        if records.contains_key(&record.id()) {
            return Err(FlowError::Conflict(format!("survey {} already exists", record.id())));
        }
        records.insert(record.id(), record.clone());
        Ok(())
    }

    fn get(&self, id: &Uuid) -> Result<Option<SurveyRecord>> {
        Ok(self.lock(&self.records)?.get(id).cloned())
    }

    fn list(&self) -> Result<Vec<SurveyRecord>> {
        let mut out: Vec<SurveyRecord> = self.lock(&self.records)?.values().cloned().collect();
        // sort estable: a igual fecha se conserva el orden de inserción
        out.sort_by_key(|r| r.submitted_at());
        Ok(out)
    }

    /// Sustituye el registro aplicando control optimista por
    /// `expected_version`.
    fn update(&self, record: &SurveyRecord, expected_version: i64) -> Result<PersistResult> {
        let mut records = self.lock(&self.records)?;
        let stored = records.get_mut(&record.id())
                            .ok_or_else(|| FlowError::NotFound(format!("survey {}", record.id())))?;
        if stored.version() != expected_version {
            return Ok(PersistResult::Conflict);
        }
        let new_version = expected_version.saturating_add(1);
        let mut next = record.clone();
        next.set_version(new_version);
        *stored = next;
        Ok(PersistResult::Ok { new_version })
    }

    fn count(&self) -> Result<usize> {
        Ok(self.lock(&self.records)?.len())
    }
}

/// Borradores en memoria indexados por propietario.
#[derive(Default)]
pub struct InMemoryDraftStore {
    drafts: Mutex<HashMap<String, SurveyPayload>>,
}

impl InMemoryDraftStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn guard(&self) -> Result<MutexGuard<'_, HashMap<String, SurveyPayload>>> {
        self.drafts.lock().map_err(|e| FlowError::Storage(format!("mutex poisoned: {:?}", e)))
    }
}

impl DraftStore for InMemoryDraftStore {
    fn save_draft(&self, owner: &str, draft: &SurveyPayload) -> Result<()> {
        self.guard()?.insert(owner.to_string(), draft.clone());
        Ok(())
    }

    fn load_draft(&self, owner: &str) -> Result<Option<SurveyPayload>> {
        Ok(self.guard()?.get(owner).cloned())
    }

    fn clear_draft(&self, owner: &str) -> Result<()> {
        self.guard()?.remove(owner);
        Ok(())
    }
}
