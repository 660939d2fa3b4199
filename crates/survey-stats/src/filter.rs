use serde::{Deserialize, Serialize};
use survey_domain::SurveyRecord;

/// Filtro de la estadística. Los campos vacíos no filtran.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsFilter {
    /// Igualdad exacta.
    pub branch: String,
    /// Subcadena.
    pub department: String,
    /// Subcadena (p.ej. `"2025-08"` o `"2025"`).
    pub cycle: String,
    /// Texto libre: subcadena literal sobre el nombre de la fila (empleado o
    /// departamento según la agrupación), sin normalizar.
    pub query: String,
}

impl StatsFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn branch(mut self, branch: &str) -> Self {
        self.branch = branch.to_string();
        self
    }

    pub fn department(mut self, department: &str) -> Self {
        self.department = department.to_string();
        self
    }

    pub fn cycle(mut self, cycle: &str) -> Self {
        self.cycle = cycle.to_string();
        self
    }

    pub fn query(mut self, query: &str) -> Self {
        self.query = query.to_string();
        self
    }

    /// Sucursal, departamento y ciclo. El texto libre se aplica aparte con
    /// `matches_name`, una vez formadas las filas.
    pub fn matches(&self, record: &SurveyRecord) -> bool {
        let branch = self.branch.trim();
        let department = self.department.trim();
        let cycle = self.cycle.trim();
        (branch.is_empty() || record.branch() == branch)
        && (department.is_empty() || record.department().contains(department))
        && (cycle.is_empty() || record.cycle().contains(cycle))
    }

    pub fn matches_name(&self, name: &str) -> bool {
        let query = self.query.trim();
        query.is_empty() || name.contains(query)
    }
}
