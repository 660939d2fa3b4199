// record.rs
use crate::{Counters, Role, StageNote, SurveyPayload, SurveyStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Resumen de temas del registro. `remain` no se almacena: se recalcula
/// siempre como `max(total - done, 0)`, también al deserializar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "TopicsRepr", from = "TopicsRepr")]
pub struct Topics {
    total: u32,
    done: u32,
}

#[derive(Serialize, Deserialize)]
struct TopicsRepr {
    #[serde(default)]
    total: u32,
    #[serde(default)]
    done: u32,
    #[serde(default)]
    remain: u32,
}

impl From<TopicsRepr> for Topics {
    fn from(r: TopicsRepr) -> Self {
        Topics::new(r.total, r.done)
    }
}

impl From<Topics> for TopicsRepr {
    fn from(t: Topics) -> Self {
        TopicsRepr { total: t.total, done: t.done, remain: t.remain() }
    }
}

impl Topics {
    pub fn new(total: u32, done: u32) -> Self {
        Self { total, done }
    }

    pub fn from_counters(c: &Counters) -> Self {
        Self::new(c.total(), c.done)
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    pub fn done(&self) -> u32 {
        self.done
    }

    pub fn remain(&self) -> u32 {
        self.total.saturating_sub(self.done)
    }
}

/// Última acción aplicada sobre el registro. Se sobrescribe en cada
/// transición.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastAction {
    pub by: Role,
    pub at: DateTime<Utc>,
    pub note: String,
}

/// Datos que entrega el formulario para crear un registro.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSurvey {
    pub employee_name: String,
    pub department: String,
    pub branch: String,
    pub cycle: String,
    #[serde(default)]
    pub employee_note: String,
    #[serde(default)]
    pub survey: Option<SurveyPayload>,
}

impl NewSurvey {
    pub fn new(employee_name: &str, department: &str, branch: &str, cycle: &str) -> Self {
        Self { employee_name: employee_name.to_string(),
               department: department.to_string(),
               branch: branch.to_string(),
               cycle: cycle.to_string(),
               employee_note: String::new(),
               survey: None }
    }

    pub fn with_survey(mut self, survey: SurveyPayload) -> Self {
        self.survey = Some(survey);
        self
    }

    pub fn with_employee_note(mut self, note: &str) -> Self {
        self.employee_note = note.to_string();
        self
    }
}

/// Estadística mensual de un empleado en su recorrido por la cadena.
///
/// Los campos descriptivos son inmutables tras la creación. El estado, las
/// notas de etapa y la última acción sólo deben cambiarse a través del motor
/// de transiciones (`flow::WorkflowEngine`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveyRecord {
    id: Uuid,
    employee_name: String,
    department: String,
    branch: String,
    cycle: String,
    submitted_at: DateTime<Utc>,
    status: SurveyStatus,
    topics: Topics,
    #[serde(default)]
    survey: Option<SurveyPayload>,
    #[serde(default)]
    employee_note: String,
    #[serde(default)]
    manager_note: StageNote,
    #[serde(default)]
    branch_manager_note: StageNote,
    #[serde(default)]
    inspection_note: String,
    #[serde(default)]
    last_action: Option<LastAction>,
    #[serde(default)]
    version: i64,
}

impl SurveyRecord {
    /// Crea el registro en la primera etapa de la cadena
    /// (`awaiting_secretary`). Los campos de identidad vacíos se completan con
    /// los del formulario cuando éste los trae.
    pub fn create(new: NewSurvey, now: DateTime<Utc>) -> Self {
        let NewSurvey { employee_name, department, branch, cycle, employee_note, survey } = new;
        let pick = |own: String, from_form: Option<&String>| {
            if own.trim().is_empty() {
                from_form.cloned().unwrap_or_default()
            } else {
                own
            }
        };
        let employee_name = pick(employee_name, survey.as_ref().map(|s| &s.full_name));
        let department = pick(department, survey.as_ref().map(|s| &s.department));
        let branch = pick(branch, survey.as_ref().map(|s| &s.branch));
        let cycle = pick(cycle, survey.as_ref().map(|s| &s.cycle));
        let topics = survey.as_ref()
                           .map(|s| Topics::from_counters(&s.effective_counters()))
                           .unwrap_or_default();
        Self { id: Uuid::new_v4(),
               employee_name,
               department,
               branch,
               cycle,
               submitted_at: now,
               status: SurveyStatus::AwaitingSecretary,
               topics,
               survey,
               employee_note,
               manager_note: StageNote::new(),
               branch_manager_note: StageNote::new(),
               inspection_note: String::new(),
               last_action: None,
               version: 0 }
    }

    pub fn new(new: NewSurvey) -> Self {
        Self::create(new, Utc::now())
    }

    /// Fija un estado inicial distinto (importación de registros existentes y
    /// datos de ejemplo).
    pub fn with_status(mut self, status: SurveyStatus) -> Self {
        self.status = status;
        self
    }

    /// Fija notas de etapa ya entregadas (importación y datos de ejemplo).
    pub fn with_stage_notes(mut self, manager_note: &str, branch_manager_note: &str) -> Self {
        self.manager_note = StageNote::sealed_with(manager_note);
        self.branch_manager_note = StageNote::sealed_with(branch_manager_note);
        self
    }

    pub fn with_topics(mut self, topics: Topics) -> Self {
        self.topics = topics;
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn employee_name(&self) -> &str {
        &self.employee_name
    }

    pub fn department(&self) -> &str {
        &self.department
    }

    pub fn branch(&self) -> &str {
        &self.branch
    }

    pub fn cycle(&self) -> &str {
        &self.cycle
    }

    pub fn submitted_at(&self) -> DateTime<Utc> {
        self.submitted_at
    }

    pub fn status(&self) -> SurveyStatus {
        self.status
    }

    pub fn topics(&self) -> Topics {
        self.topics
    }

    pub fn survey(&self) -> Option<&SurveyPayload> {
        self.survey.as_ref()
    }

    pub fn employee_note(&self) -> &str {
        &self.employee_note
    }

    pub fn manager_note(&self) -> &StageNote {
        &self.manager_note
    }

    pub fn branch_manager_note(&self) -> &StageNote {
        &self.branch_manager_note
    }

    pub fn inspection_note(&self) -> &str {
        &self.inspection_note
    }

    pub fn last_action(&self) -> Option<&LastAction> {
        self.last_action.as_ref()
    }

    pub fn version(&self) -> i64 {
        self.version
    }

    /// Cambia el estado y sobrescribe la última acción.
    pub fn set_status(&mut self, status: SurveyStatus, action: LastAction) {
        self.status = status;
        self.last_action = Some(action);
    }

    pub fn manager_note_mut(&mut self) -> &mut StageNote {
        &mut self.manager_note
    }

    pub fn branch_manager_note_mut(&mut self) -> &mut StageNote {
        &mut self.branch_manager_note
    }

    pub fn set_inspection_note(&mut self, note: String) {
        self.inspection_note = note;
    }

    /// Sustituye el formulario (reenvío del empleado) y recalcula `topics`.
    pub fn replace_survey(&mut self, survey: SurveyPayload) {
        self.topics = Topics::from_counters(&survey.effective_counters());
        self.survey = Some(survey);
    }

    pub fn set_version(&mut self, version: i64) {
        self.version = version;
    }

    /// Formulario completo para exportación. Si el registro no trae
    /// formulario se sintetiza uno a partir de la fila.
    pub fn full_survey(&self) -> SurveyPayload {
        if let Some(s) = &self.survey {
            return s.clone();
        }
        let or_dash = |s: &str| if s.trim().is_empty() { "—".to_string() } else { s.to_string() };
        let t = self.topics;
        SurveyPayload { branch: or_dash(&self.branch),
                        full_name: or_dash(&self.employee_name),
                        cycle: or_dash(&self.cycle),
                        role: "موظف فني".to_string(),
                        department: or_dash(&self.department),
                        degree: "—".to_string(),
                        major: "—".to_string(),
                        prev: 0,
                        monthly: t.total(),
                        done: t.done(),
                        topics_prev: Some(0),
                        topics_monthly: Some(t.total()),
                        topics_done: Some(t.done()),
                        reasons_justifications: if t.remain() > 0 {
                            "نواقص بسيطة قيد الاستكمال.".to_string()
                        } else {
                            String::new()
                        },
                        ..SurveyPayload::default() }
    }
}
