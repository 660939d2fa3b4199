// Archivo: inbox.rs
// Propósito: bandejas de trabajo por rol (pendientes, devueltos, enviados,
// devueltos desde abajo, remitidos a inspección), con búsqueda y orden.
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use survey_domain::{locale_cmp, DomainError, Role, SurveyRecord, SurveyStatus};

/// Pestaña de la bandeja de un rol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InboxTab {
    /// Registros pendientes de una acción de este rol.
    Awaiting,
    /// Registros que este rol devolvió hacia arriba en la cadena.
    ReturnedUpstream,
    /// Registros que este rol ya envió.
    Sent,
    /// Registros que la etapa siguiente devolvió a este rol.
    ReturnedFromDownstream,
    /// Registros remitidos a inspección.
    SentToInspection,
}

impl fmt::Display for InboxTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            InboxTab::Awaiting => "awaiting",
            InboxTab::ReturnedUpstream => "returned_upstream",
            InboxTab::Sent => "sent",
            InboxTab::ReturnedFromDownstream => "returned_from_downstream",
            InboxTab::SentToInspection => "sent_to_inspection",
        };
        write!(f, "{}", s)
    }
}

/// Orden de la bandeja.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InboxSort {
    /// Más recientes primero.
    #[default]
    Recent,
    Employee,
    Cycle,
}

impl FromStr for InboxSort {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "recent" => Ok(InboxSort::Recent),
            "employee" | "name" => Ok(InboxSort::Employee),
            "cycle" => Ok(InboxSort::Cycle),
            other => Err(DomainError::UnknownToken(other.to_string())),
        }
    }
}

/// Estados que componen la pestaña `tab` para `role`. Vacío si el rol no
/// tiene esa pestaña.
pub fn tab_statuses(role: Role, tab: InboxTab) -> &'static [SurveyStatus] {
    use InboxTab::*;
    use SurveyStatus as S;
    match (role, tab) {
        (Role::Employee, Sent) => &[S::AwaitingSecretary],
        (Role::Employee, ReturnedFromDownstream) => &[S::ReturnedBySecretary],

        (Role::Secretary, Awaiting) => &[S::AwaitingSecretary],
        (Role::Secretary, ReturnedUpstream) => &[S::ReturnedBySecretary],
        (Role::Secretary, Sent) => &[S::SentToManager],
        (Role::Secretary, ReturnedFromDownstream) => &[S::ReturnedByManager],

        (Role::Manager, Awaiting) => &[S::AwaitingManager, S::SentToManager],
        (Role::Manager, ReturnedUpstream) => &[S::ReturnedByManager],
        (Role::Manager, Sent) => &[S::SentToBranch],
        (Role::Manager, ReturnedFromDownstream) => &[S::ReturnedByBranch, S::ReturnedToManager],

        (Role::BranchManager, Awaiting) => &[S::AwaitingBranch, S::SentToBranch],
        (Role::BranchManager, ReturnedUpstream) => &[S::ReturnedToManager, S::ReturnedByBranch],
        (Role::BranchManager, Sent) => &[S::SentToUnit],
        (Role::BranchManager, ReturnedFromDownstream) => &[S::ReturnedFromUnit],
        (Role::BranchManager, SentToInspection) => &[S::SentToInspection],

        (Role::Unit, Awaiting) => &[S::SentToUnit],
        (Role::Unit, ReturnedUpstream) => &[S::ReturnedFromUnit],

        (Role::Inspection, Awaiting) => &[S::SentToInspection],
        _ => &[],
    }
}

const ALL_TABS: [InboxTab; 5] = [InboxTab::Awaiting,
                                 InboxTab::ReturnedUpstream,
                                 InboxTab::Sent,
                                 InboxTab::ReturnedFromDownstream,
                                 InboxTab::SentToInspection];

/// Pestañas que tiene `role`, en orden de presentación.
pub fn tabs_for(role: Role) -> Vec<InboxTab> {
    ALL_TABS.into_iter().filter(|t| !tab_statuses(role, *t).is_empty()).collect()
}

fn matches_query(record: &SurveyRecord, query: &str) -> bool {
    query.is_empty()
    || record.employee_name().contains(query)
    || record.department().contains(query)
    || record.cycle().contains(query)
}

/// Registros de la pestaña, filtrados por `query` (subcadena sobre nombre,
/// departamento o ciclo) y ordenados según `sort`.
pub fn queue(records: &[SurveyRecord], role: Role, tab: InboxTab, query: &str, sort: InboxSort) -> Vec<SurveyRecord> {
    let statuses = tab_statuses(role, tab);
    let q = query.trim();
    let mut out: Vec<SurveyRecord> = records.iter()
                                            .filter(|r| statuses.contains(&r.status()))
                                            .filter(|r| matches_query(r, q))
                                            .cloned()
                                            .collect();
    match sort {
        InboxSort::Recent => out.sort_by(|a, b| b.submitted_at().cmp(&a.submitted_at())),
        InboxSort::Employee => out.sort_by(|a, b| locale_cmp(a.employee_name(), b.employee_name())),
        InboxSort::Cycle => out.sort_by(|a, b| a.cycle().cmp(b.cycle())),
    }
    out
}

/// Número de registros por pestaña del rol.
pub fn counts(records: &[SurveyRecord], role: Role) -> IndexMap<InboxTab, usize> {
    tabs_for(role).into_iter()
                  .map(|tab| {
                      let statuses = tab_statuses(role, tab);
                      (tab, records.iter().filter(|r| statuses.contains(&r.status())).count())
                  })
                  .collect()
}
