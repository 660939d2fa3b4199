// payload.rs
//
// Carga útil completa del formulario de la estadística mensual. Los nombres
// serializados siguen el formato camelCase que produce el formulario, de
// modo que los borradores existentes se pueden importar sin conversión.
use crate::DomainError;
use serde::{Deserialize, Serialize};

/// Contadores `prev/monthly/done` de una sección del formulario. `total` y
/// `remain` siempre se derivan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counters {
  pub prev: u32,
  pub monthly: u32,
  pub done: u32,
}

impl Counters {
  pub fn new(prev: u32, monthly: u32, done: u32) -> Self {
    Self { prev, monthly, done }
  }

  pub fn total(&self) -> u32 {
    self.prev.saturating_add(self.monthly)
  }

  pub fn remain(&self) -> u32 {
    self.total().saturating_sub(self.done)
  }
}

/// Comisión (tarea) asignada durante el mes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CommitteeTask {
  pub subject: String,
  pub duration_days: u32,
  pub assign_date: String,
  pub done_date: String,
  pub remark: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TopicItem {
  pub number: String,
  pub summary: String,
  pub assign_date: String,
  pub action_date: String,
  pub action_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RemainingTopic {
  pub number: String,
  pub summary: String,
  pub assign_date: String,
  pub action_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SurveyPayload {
  pub branch: String,
  pub full_name: String,
  pub cycle: String,
  /// Cargo del empleado ("عضو" o "موظف فني").
  pub role: String,
  pub department: String,
  pub degree: String,
  pub major: String,

  // comisiones
  pub prev: u32,
  pub monthly: u32,
  pub done: u32,
  pub notes: String,
  pub tasks: Vec<CommitteeTask>,

  // temas; `None` cuando el formulario no trae cifras propias de temas
  pub topics_prev: Option<u32>,
  pub topics_monthly: Option<u32>,
  pub topics_done: Option<u32>,
  pub topics_notes: String,
  pub topics: Vec<TopicItem>,

  pub remaining_topics: Vec<RemainingTopic>,
  pub reasons_justifications: String,
  pub challenges_difficulties: String,
}

impl SurveyPayload {
  pub fn from_json(value: serde_json::Value) -> Result<Self, DomainError> {
    Ok(serde_json::from_value(value)?)
  }

  pub fn committee_counters(&self) -> Counters {
    Counters::new(self.prev, self.monthly, self.done)
  }

  /// Cifras propias de la sección de temas, si el formulario las trae.
  pub fn topic_counters(&self) -> Option<Counters> {
    if self.topics_prev.is_none() && self.topics_monthly.is_none() && self.topics_done.is_none() {
      return None;
    }
    Some(Counters::new(self.topics_prev.unwrap_or(0),
                       self.topics_monthly.unwrap_or(0),
                       self.topics_done.unwrap_or(0)))
  }

  /// Contadores que alimentan el resumen `topics` del registro: los de temas
  /// si existen, si no los de comisiones.
  pub fn effective_counters(&self) -> Counters {
    self.topic_counters().unwrap_or_else(|| self.committee_counters())
  }
}
