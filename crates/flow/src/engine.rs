// Archivo: engine.rs
// Propósito: implementar el `WorkflowEngine`, único punto que cambia el
// estado de un registro.
//
// La aplicación de una transición es pura (`apply_transition`): valida la
// arista, exige motivo en las devoluciones, gestiona las notas de etapa y
// rellena `last_action`. El motor la envuelve con lectura, escritura
// optimista y trazas.
use crate::errors::{FlowError, Result, ValidationError};
use crate::repository::{PersistResult, SurveyRepository};
use crate::transitions::{self, Effect, NoteSlot, TransitionKind};
use chrono::{DateTime, Utc};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use survey_domain::{LastAction, NewSurvey, Role, StageNote, SurveyPayload, SurveyRecord, SurveyStatus};
use uuid::Uuid;

/// Configuración del motor: textos por defecto de `last_action.note` y el
/// separador usado al unir notas de etapa.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub note_delimiter: String,
    pub sent_to_manager: String,
    pub sent_to_branch: String,
    pub sent_to_unit: String,
    pub resent_to_unit: String,
    pub sent_to_inspection: String,
    pub resubmitted: String,
    /// Texto genérico cuando ninguna de las anteriores aplica.
    pub done: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { note_delimiter: " | ".into(),
               sent_to_manager: "أُرسل لمدير الإدارة.".into(),
               sent_to_branch: "أُرسل لمدير الفرع.".into(),
               sent_to_unit: "أُرسل للوحدة.".into(),
               resent_to_unit: "أُعيد الإرسال للوحدة.".into(),
               sent_to_inspection: "تمت الإحالة إلى مكتب التفتيش.".into(),
               resubmitted: "أُعيد إرسال الاستبيان بعد التعديل.".into(),
               done: "تم الإجراء.".into() }
    }
}

impl EngineConfig {
    /// Texto por defecto para un envío hacia `to`. `resend` distingue el
    /// reenvío con la nota de etapa ya sellada.
    pub fn confirmation(&self, to: SurveyStatus, resend: bool) -> &str {
        match (to, resend) {
            (SurveyStatus::SentToManager, _) => &self.sent_to_manager,
            (SurveyStatus::SentToBranch, _) => &self.sent_to_branch,
            (SurveyStatus::SentToUnit, false) => &self.sent_to_unit,
            (SurveyStatus::SentToUnit, true) => &self.resent_to_unit,
            (SurveyStatus::SentToInspection, _) => &self.sent_to_inspection,
            (SurveyStatus::AwaitingSecretary, _) => &self.resubmitted,
            _ => &self.done,
        }
    }

    /// Une las notas no vacías con `note_delimiter`.
    pub fn join_notes<'a, I>(&self, notes: I) -> String
        where I: IntoIterator<Item = &'a str>
    {
        notes.into_iter()
             .map(str::trim)
             .filter(|n| !n.is_empty())
             .collect::<Vec<_>>()
             .join(&self.note_delimiter)
    }
}

/// Petición de transición sobre un registro.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionRequest {
    pub role: Role,
    pub kind: TransitionKind,
    /// Motivo (devolución) o nota introducida (envío).
    #[serde(default)]
    pub note: Option<String>,
    /// Formulario corregido en el reenvío del empleado.
    #[serde(default)]
    pub survey: Option<SurveyPayload>,
}

impl TransitionRequest {
    pub fn new(role: Role, kind: TransitionKind) -> Self {
        Self { role, kind, note: None, survey: None }
    }

    pub fn send(role: Role) -> Self {
        Self::new(role, TransitionKind::Send)
    }

    pub fn give_back(role: Role, reason: &str) -> Self {
        Self::new(role, TransitionKind::Return).with_note(reason)
    }

    pub fn escalate(role: Role) -> Self {
        Self::new(role, TransitionKind::Escalate)
    }

    pub fn with_note(mut self, note: &str) -> Self {
        self.note = Some(note.to_string());
        self
    }

    pub fn with_survey(mut self, survey: SurveyPayload) -> Self {
        self.survey = Some(survey);
        self
    }
}

/// Resumen de una transición aplicada.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppliedTransition {
    pub from: SurveyStatus,
    pub to: SurveyStatus,
    /// `true` si esta transición selló una nota de etapa.
    pub note_sealed: bool,
}

fn stage_note_mut(record: &mut SurveyRecord, slot: NoteSlot) -> &mut StageNote {
    match slot {
        NoteSlot::Manager => record.manager_note_mut(),
        NoteSlot::BranchManager => record.branch_manager_note_mut(),
    }
}

/// Aplica `request` sobre `record` en memoria.
///
/// Ante cualquier error el registro queda sin cambios: la arista y el motivo
/// se validan antes de tocar nada.
pub fn apply_transition(record: &mut SurveyRecord,
                        request: &TransitionRequest,
                        config: &EngineConfig,
                        at: DateTime<Utc>)
                        -> Result<AppliedTransition> {
    let from = record.status();
    let edge = transitions::lookup(from, request.role, request.kind)
        .ok_or(FlowError::Rejected { from, role: request.role, kind: request.kind })?;
    let entered = request.note.as_deref().map(str::trim).unwrap_or("");
    let or_default = |resend: bool| {
        if entered.is_empty() {
            config.confirmation(edge.to, resend).to_string()
        } else {
            entered.to_string()
        }
    };

    let mut note_sealed = false;
    let note = if request.kind == TransitionKind::Return {
        if entered.is_empty() {
            return Err(ValidationError::MissingReason { role: request.role }.into());
        }
        entered.to_string()
    } else {
        match edge.effect {
            Effect::None => or_default(false),
            Effect::StageNote(slot) => {
                let cell = stage_note_mut(record, slot);
                if cell.is_sealed() {
                    // reenvío: la nota guardada no se toca y no se pide otra
                    config.confirmation(edge.to, true).to_string()
                } else {
                    note_sealed = cell.try_set(entered);
                    or_default(false)
                }
            }
            Effect::FreezeInspectionNote => {
                let joined = config.join_notes([record.manager_note().value(), record.branch_manager_note().value()]);
                record.set_inspection_note(joined.clone());
                if joined.is_empty() {
                    config.confirmation(edge.to, false).to_string()
                } else {
                    joined
                }
            }
            Effect::Resubmit => {
                if let Some(survey) = &request.survey {
                    record.replace_survey(survey.clone());
                }
                or_default(false)
            }
        }
    };

    record.set_status(edge.to, LastAction { by: request.role, at, note });
    Ok(AppliedTransition { from, to: edge.to, note_sealed })
}

/// Edita el borrador de la nota de etapa de `role` mientras el registro está
/// pendiente en esa etapa. Devuelve `false` si no es editable.
pub fn edit_stage_note(record: &mut SurveyRecord, role: Role, value: &str) -> bool {
    let Some(slot) = transitions::note_slot(role) else {
        return false;
    };
    if !transitions::is_pending_for(record.status(), role) {
        return false;
    }
    stage_note_mut(record, slot).edit(value)
}

/// Motor de aprobación sobre un `SurveyRepository`.
///
/// Cada operación de escritura lee el registro, aplica el cambio en memoria
/// y lo persiste con la versión leída; si otro actor escribió antes se
/// devuelve `FlowError::Conflict` y nada cambia.
pub struct WorkflowEngine<R>
    where R: SurveyRepository
{
    repo: Arc<R>,
    config: EngineConfig,
}

impl<R> WorkflowEngine<R> where R: SurveyRepository
{
    pub fn new(repo: Arc<R>, config: EngineConfig) -> Self {
        Self { repo, config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Crea un registro en `awaiting_secretary` y lo persiste.
    pub fn create(&self, new: NewSurvey) -> Result<SurveyRecord> {
        let record = SurveyRecord::create(new, Utc::now());
        self.repo.insert(&record)?;
        info!("survey {} created for '{}' ({})", record.id(), record.employee_name(), record.cycle());
        Ok(record)
    }

    /// Guarda un registro ya preparado (estado, notas y versión incluidos),
    /// p.ej. importaciones o datos de ejemplo. No pasa por la tabla de
    /// transiciones.
    pub fn import(&self, record: SurveyRecord) -> Result<SurveyRecord> {
        self.repo.insert(&record)?;
        info!("survey {} imported at {}", record.id(), record.status());
        Ok(record)
    }

    pub fn get(&self, id: &Uuid) -> Result<SurveyRecord> {
        self.repo
            .get(id)?
            .ok_or_else(|| FlowError::NotFound(format!("survey {}", id)))
    }

    pub fn list(&self) -> Result<Vec<SurveyRecord>> {
        self.repo.list()
    }

    /// Acciones disponibles para `role` sobre el registro `id`.
    pub fn available_actions(&self, id: &Uuid, role: Role) -> Result<Vec<TransitionKind>> {
        let record = self.get(id)?;
        Ok(transitions::available(record.status(), role))
    }

    /// Ejecuta una transición y devuelve el registro persistido.
    pub fn transition(&self, id: &Uuid, request: TransitionRequest) -> Result<SurveyRecord> {
        let mut record = self.get(id)?;
        let expected = record.version();
        let applied = match apply_transition(&mut record, &request, &self.config, Utc::now()) {
            Ok(a) => a,
            Err(e) => {
                warn!("survey {}: {} by {} refused: {}", id, request.kind, request.role, e);
                return Err(e);
            }
        };
        self.persist(&mut record, expected)?;
        info!("survey {}: {} -> {} by {}{}",
              id,
              applied.from,
              applied.to,
              request.role,
              if applied.note_sealed { " (stage note sealed)" } else { "" });
        Ok(record)
    }

    /// Edita el borrador de la nota de etapa. `Ok(false)` si la nota ya está
    /// sellada o el registro no está pendiente para `role`.
    pub fn edit_note(&self, id: &Uuid, role: Role, value: &str) -> Result<bool> {
        let mut record = self.get(id)?;
        let expected = record.version();
        if !edit_stage_note(&mut record, role, value) {
            return Ok(false);
        }
        self.persist(&mut record, expected)?;
        Ok(true)
    }

    fn persist(&self, record: &mut SurveyRecord, expected_version: i64) -> Result<()> {
        match self.repo.update(record, expected_version)? {
            PersistResult::Ok { new_version } => {
                record.set_version(new_version);
                Ok(())
            }
            PersistResult::Conflict => {
                warn!("survey {}: version conflict (expected {})", record.id(), expected_version);
                Err(FlowError::Conflict(format!("survey {} was modified concurrently", record.id())))
            }
        }
    }
}
