// Agregación de la estadística mensual: filas por empleado o por
// departamento, fila de totales y orden. Todas las vistas por rol pasan por
// `aggregate`; sólo cambia el conjunto de estados visibles.
use crate::filter::StatsFilter;
use crate::tally::Tally;
use indexmap::IndexMap;
use log::debug;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;
use survey_domain::{locale_cmp, DomainError, Role, SurveyRecord, SurveyStatus};
use uuid::Uuid;

const NOTE_DELIMITER: &str = " | ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Grouping {
    #[default]
    Employee,
    Department,
}

/// Clave de orden. Los campos numéricos ordenan de mayor a menor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    Name,
    Total,
    Done,
    Remain,
}

impl FromStr for SortKey {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "name" => Ok(SortKey::Name),
            "total" => Ok(SortKey::Total),
            "done" => Ok(SortKey::Done),
            "remain" => Ok(SortKey::Remain),
            other => Err(DomainError::UnknownToken(other.to_string())),
        }
    }
}

/// Fila de estadística. En la agrupación por departamento `name` es el
/// departamento y `record_id` es `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsRow {
    pub record_id: Option<Uuid>,
    pub name: String,
    pub department: String,
    pub branch: String,
    pub cycle: String,
    pub tally: Tally,
    /// Notas del formulario (o del empleado); en departamentos, la unión de
    /// las notas de cada registro.
    pub note: String,
    pub manager_note: String,
    pub branch_manager_note: String,
}

/// Resultado de una consulta de estadística.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsReport {
    pub grouping: Grouping,
    pub rows: Vec<StatsRow>,
    /// Presente cuando hay al menos una fila.
    pub totals: Option<Tally>,
}

impl StatsReport {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn percent_done(&self) -> u64 {
        self.totals.map(|t| t.percent_done()).unwrap_or(0)
    }
}

/// Parámetros de una consulta.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StatsQuery {
    pub filter: StatsFilter,
    pub grouping: Grouping,
    pub sort: Option<SortKey>,
}

impl StatsQuery {
    pub fn new(filter: StatsFilter) -> Self {
        Self { filter, ..Self::default() }
    }

    pub fn grouped_by(mut self, grouping: Grouping) -> Self {
        self.grouping = grouping;
        self
    }

    pub fn sorted_by(mut self, key: SortKey) -> Self {
        self.sort = Some(key);
        self
    }
}

fn first_non_empty<'a>(candidates: &[&'a str]) -> &'a str {
    candidates.iter().copied().map(str::trim).find(|s| !s.is_empty()).unwrap_or("")
}

fn topics_notes(record: &SurveyRecord) -> &str {
    record.survey().map(|s| s.topics_notes.as_str()).unwrap_or("")
}

fn employee_row(record: &SurveyRecord) -> StatsRow {
    StatsRow { record_id: Some(record.id()),
               name: record.employee_name().to_string(),
               department: record.department().to_string(),
               branch: record.branch().to_string(),
               cycle: record.cycle().to_string(),
               tally: Tally::from_record(record),
               note: first_non_empty(&[topics_notes(record), record.employee_note()]).to_string(),
               manager_note: record.manager_note().value().to_string(),
               branch_manager_note: record.branch_manager_note().value().to_string() }
}

/// Nota de un registro dentro de su departamento: notas del formulario, y si
/// no hay, la del director de sucursal, la del director, la del empleado.
fn department_note(record: &SurveyRecord) -> &str {
    first_non_empty(&[topics_notes(record),
                      record.branch_manager_note().value(),
                      record.manager_note().value(),
                      record.employee_note()])
}

fn department_rows(records: &[&SurveyRecord]) -> Vec<StatsRow> {
    let mut groups: IndexMap<&str, (Tally, Vec<&str>, &str)> = IndexMap::new();
    for r in records {
        let dep = if r.department().trim().is_empty() { "—" } else { r.department() };
        let entry = groups.entry(dep).or_insert_with(|| (Tally::default(), Vec::new(), r.branch()));
        entry.0 += Tally::from_record(r);
        let note = department_note(r);
        if !note.is_empty() {
            entry.1.push(note);
        }
    }
    groups.into_iter()
          .map(|(dep, (tally, notes, branch))| StatsRow { record_id: None,
                                                          name: dep.to_string(),
                                                          department: dep.to_string(),
                                                          branch: branch.to_string(),
                                                          cycle: String::new(),
                                                          tally,
                                                          note: notes.join(NOTE_DELIMITER),
                                                          manager_note: String::new(),
                                                          branch_manager_note: String::new() })
          .collect()
}

fn compare(key: SortKey, a: &StatsRow, b: &StatsRow) -> Ordering {
    match key {
        SortKey::Name => locale_cmp(&a.name, &b.name),
        SortKey::Total => b.tally.total.cmp(&a.tally.total),
        SortKey::Done => b.tally.done.cmp(&a.tally.done),
        SortKey::Remain => b.tally.remain.cmp(&a.tally.remain),
    }
}

/// Agrega los registros cuyo estado está en `visible` y que pasan el filtro.
pub fn aggregate(records: &[SurveyRecord], visible: &[SurveyStatus], query: &StatsQuery) -> StatsReport {
    let selected: Vec<&SurveyRecord> = records.iter()
                                              .filter(|r| visible.contains(&r.status()))
                                              .filter(|r| query.filter.matches(r))
                                              .collect();
    let mut rows: Vec<StatsRow> = match query.grouping {
        Grouping::Employee => selected.iter().map(|r| employee_row(r)).collect(),
        Grouping::Department => department_rows(&selected),
    };
    rows.retain(|row| query.filter.matches_name(&row.name));
    if let Some(key) = query.sort {
        rows.sort_by(|a, b| compare(key, a, b));
    }
    let totals = if rows.is_empty() {
        None
    } else {
        let mut t = Tally::default();
        for row in &rows {
            t += row.tally;
        }
        Some(t)
    };
    debug!("stats: {} of {} records -> {} {:?} rows", selected.len(), records.len(), rows.len(), query.grouping);
    StatsReport { grouping: query.grouping, rows, totals }
}

/// Estadística de la etapa de `role` (sus estados visibles).
pub fn for_role(records: &[SurveyRecord], role: Role, query: &StatsQuery) -> StatsReport {
    aggregate(records, role.visible_statuses(), query)
}
