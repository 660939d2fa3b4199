// Archivo: transitions.rs
// Propósito: tabla central de transiciones `(estado, rol, acción) -> estado`.
// Toda la validación de aristas pasa por aquí; ninguna otra capa decide qué
// acciones existen para un estado.
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use survey_domain::{DomainError, Role, SurveyStatus};

/// Tipo de acción solicitada sobre un registro.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionKind {
    /// Devolver a la etapa anterior (exige motivo).
    Return,
    /// Enviar o reenviar a la etapa siguiente.
    Send,
    /// Remitir a la oficina de inspección (terminal).
    Escalate,
}

impl fmt::Display for TransitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TransitionKind::Return => "return",
            TransitionKind::Send => "send",
            TransitionKind::Escalate => "escalate",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for TransitionKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "return" => Ok(TransitionKind::Return),
            "send" | "resend" => Ok(TransitionKind::Send),
            "escalate" => Ok(TransitionKind::Escalate),
            other => Err(DomainError::UnknownToken(other.to_string())),
        }
    }
}

/// Nota de etapa afectada por un envío.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoteSlot {
    Manager,
    BranchManager,
}

/// Efecto adicional de una arista sobre el registro.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    None,
    /// Intenta sellar la nota de la etapa (primera escritura gana).
    StageNote(NoteSlot),
    /// Congela `inspection_note` con la unión de las notas de etapa.
    FreezeInspectionNote,
    /// El empleado reenvía con el formulario corregido.
    Resubmit,
}

/// Arista del grafo de aprobación.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub from: SurveyStatus,
    pub role: Role,
    pub kind: TransitionKind,
    pub to: SurveyStatus,
    pub effect: Effect,
}

const fn edge(from: SurveyStatus, role: Role, kind: TransitionKind, to: SurveyStatus, effect: Effect) -> Edge {
    Edge { from, role, kind, to, effect }
}

use Effect::{FreezeInspectionNote, Resubmit, StageNote};
use SurveyStatus::*;
use TransitionKind::{Escalate, Return, Send};

const EDGES: &[Edge] = &[
    // empleado
    edge(ReturnedBySecretary, Role::Employee, Send, AwaitingSecretary, Resubmit),
    // secretaría
    edge(AwaitingSecretary, Role::Secretary, Return, ReturnedBySecretary, Effect::None),
    edge(AwaitingSecretary, Role::Secretary, Send, SentToManager, Effect::None),
    edge(ReturnedByManager, Role::Secretary, Send, SentToManager, Effect::None),
    // director de departamento
    edge(AwaitingManager, Role::Manager, Return, ReturnedByManager, Effect::None),
    edge(SentToManager, Role::Manager, Return, ReturnedByManager, Effect::None),
    edge(AwaitingManager, Role::Manager, Send, SentToBranch, StageNote(NoteSlot::Manager)),
    edge(SentToManager, Role::Manager, Send, SentToBranch, StageNote(NoteSlot::Manager)),
    edge(ReturnedByBranch, Role::Manager, Send, SentToBranch, StageNote(NoteSlot::Manager)),
    edge(ReturnedToManager, Role::Manager, Send, SentToBranch, StageNote(NoteSlot::Manager)),
    // director de sucursal
    edge(AwaitingBranch, Role::BranchManager, Return, ReturnedToManager, Effect::None),
    edge(SentToBranch, Role::BranchManager, Return, ReturnedByBranch, Effect::None),
    edge(AwaitingBranch, Role::BranchManager, Send, SentToUnit, StageNote(NoteSlot::BranchManager)),
    edge(SentToBranch, Role::BranchManager, Send, SentToUnit, StageNote(NoteSlot::BranchManager)),
    edge(ReturnedFromUnit, Role::BranchManager, Send, SentToUnit, StageNote(NoteSlot::BranchManager)),
    edge(ReturnedFromUnit, Role::BranchManager, Escalate, SentToInspection, FreezeInspectionNote),
    // unidad técnica
    edge(SentToUnit, Role::Unit, Return, ReturnedFromUnit, Effect::None),
];

static INDEX: Lazy<HashMap<(SurveyStatus, Role, TransitionKind), Edge>> =
    Lazy::new(|| EDGES.iter().map(|e| ((e.from, e.role, e.kind), *e)).collect());

/// Todas las aristas del grafo.
pub fn edges() -> &'static [Edge] {
    EDGES
}

/// Busca la arista para `(from, role, kind)`.
pub fn lookup(from: SurveyStatus, role: Role, kind: TransitionKind) -> Option<Edge> {
    INDEX.get(&(from, role, kind)).copied()
}

/// Acciones que un rol puede ejecutar sobre un registro en `from`.
pub fn available(from: SurveyStatus, role: Role) -> Vec<TransitionKind> {
    EDGES.iter().filter(|e| e.from == from && e.role == role).map(|e| e.kind).collect()
}

/// Nota de etapa que pertenece a `role`, si tiene una.
pub fn note_slot(role: Role) -> Option<NoteSlot> {
    match role {
        Role::Manager => Some(NoteSlot::Manager),
        Role::BranchManager => Some(NoteSlot::BranchManager),
        _ => None,
    }
}

/// El registro está pendiente en la etapa de `role` cuando ese rol puede
/// devolverlo desde el estado actual.
pub fn is_pending_for(status: SurveyStatus, role: Role) -> bool {
    lookup(status, role, Return).is_some()
}
