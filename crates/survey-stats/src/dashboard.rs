//! Proyecciones del panel de inspección: línea temporal por ciclo, progreso
//! global, mejores empleados, alertas por sucursal y tendencia mensual.
use crate::aggregate::StatsRow;
use crate::tally::percent_done;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use survey_domain::{SurveyRecord, SurveyStatus};

const UNKNOWN_CYCLE: &str = "غير محدد";

/// Suma de `topics.total` por estado dentro de un ciclo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelinePoint {
    pub cycle: String,
    pub by_status: IndexMap<SurveyStatus, u64>,
    pub total: u64,
}

pub fn timeline(records: &[SurveyRecord]) -> Vec<TimelinePoint> {
    let mut by_cycle: IndexMap<String, TimelinePoint> = IndexMap::new();
    for r in records {
        let cycle = if r.cycle().trim().is_empty() { UNKNOWN_CYCLE } else { r.cycle() };
        let point = by_cycle.entry(cycle.to_string()).or_insert_with(|| TimelinePoint { cycle: cycle.to_string(),
                                                                                         by_status: IndexMap::new(),
                                                                                         total: 0 });
        let total = u64::from(r.topics().total());
        *point.by_status.entry(r.status()).or_insert(0) += total;
        point.total += total;
    }
    let mut out: Vec<TimelinePoint> = by_cycle.into_values().collect();
    out.sort_by(|a, b| a.cycle.cmp(&b.cycle));
    out
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub total: u64,
    pub done: u64,
    pub pct: u64,
}

/// Progreso global de las filas de estadística.
pub fn progress(rows: &[StatsRow]) -> Progress {
    let (total, done) = rows.iter().fold((0, 0), |(t, d), r| (t + r.tally.total, d + r.tally.done));
    Progress { total, done, pct: percent_done(done, total) }
}

/// Los `n` empleados con más temas terminados; a igualdad, menos pendientes.
pub fn top_employees(rows: &[StatsRow], n: usize) -> Vec<StatsRow> {
    let mut out = rows.to_vec();
    out.sort_by(|a, b| b.tally.done.cmp(&a.tally.done).then(a.tally.remain.cmp(&b.tally.remain)));
    out.truncate(n);
    out
}

/// Sucursal con mayor proporción de temas pendientes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BranchAlert {
    pub branch: String,
    /// `remain / total`, entre 0 y 1.
    pub risk: f64,
    /// Registros ya remitidos a inspección.
    pub awaiting: usize,
    pub remain: u64,
    pub total: u64,
}

impl BranchAlert {
    pub fn risk_percent(&self) -> u64 {
        percent_done(self.remain, self.total)
    }
}

/// Las tres sucursales de mayor riesgo entre las que tienen temas.
pub fn smart_alerts(records: &[SurveyRecord]) -> Vec<BranchAlert> {
    let mut by_branch: IndexMap<&str, (u64, u64, usize)> = IndexMap::new();
    for r in records {
        let e = by_branch.entry(r.branch()).or_insert((0, 0, 0));
        e.0 += u64::from(r.topics().total());
        e.1 += u64::from(r.topics().remain());
        if r.status() == SurveyStatus::SentToInspection {
            e.2 += 1;
        }
    }
    let mut items: Vec<BranchAlert> = by_branch.into_iter()
                                               .filter(|(_, (total, _, _))| *total > 0)
                                               .map(|(branch, (total, remain, awaiting))| BranchAlert {
                                                   branch: branch.to_string(),
                                                   risk: remain as f64 / total as f64,
                                                   awaiting,
                                                   remain,
                                                   total,
                                               })
                                               .collect();
    items.sort_by(|a, b| b.risk.partial_cmp(&a.risk).unwrap_or(Ordering::Equal));
    items.truncate(3);
    items
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthPoint {
    pub month: String,
    pub total: u64,
    pub done: u64,
    pub remain: u64,
    pub pct: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyTrends {
    pub months: Vec<MonthPoint>,
    pub total: u64,
    pub done: u64,
    pub remain: u64,
}

impl MonthlyTrends {
    pub fn pct(&self) -> u64 {
        percent_done(self.done, self.total)
    }
}

/// Tendencia mensual de una sucursal, opcionalmente de un solo
/// departamento. Meses en orden ascendente.
pub fn monthly_trends(records: &[SurveyRecord], branch: &str, department: Option<&str>) -> MonthlyTrends {
    let mut by_month: IndexMap<&str, (u64, u64, u64)> = IndexMap::new();
    for r in records.iter().filter(|r| r.branch() == branch) {
        let dep = if r.department().is_empty() { "—" } else { r.department() };
        if department.is_some_and(|d| d != dep) {
            continue;
        }
        let month = if r.cycle().is_empty() { "—" } else { r.cycle() };
        let t = r.topics();
        let e = by_month.entry(month).or_insert((0, 0, 0));
        e.0 += u64::from(t.total());
        e.1 += u64::from(t.done());
        e.2 += u64::from(t.remain());
    }
    by_month.sort_keys();

    let mut trends = MonthlyTrends::default();
    for (month, (total, done, remain)) in by_month {
        trends.total += total;
        trends.done += done;
        trends.remain += remain;
        trends.months.push(MonthPoint { month: month.to_string(), total, done, remain, pct: percent_done(done, total) });
    }
    trends
}
