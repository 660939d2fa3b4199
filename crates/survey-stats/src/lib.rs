//! Estadística mensual de temas por empleado y por departamento.
//!
//! `aggregate` es la única ruta de cálculo: cada vista por rol le pasa su
//! conjunto de estados visibles (`Role::visible_statuses`). El porcentaje de
//! avance se calcula siempre con `percent_done`.
pub mod aggregate;
pub mod dashboard;
pub mod filter;
pub mod tally;

pub use aggregate::{aggregate, for_role, Grouping, SortKey, StatsQuery, StatsReport, StatsRow};
pub use filter::StatsFilter;
pub use tally::{percent_done, Tally};
