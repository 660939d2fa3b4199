//! Persistencia SQLite (Diesel + r2d2) para el trait `SurveyRepository` y
//! los borradores (`DraftStore`). Las migraciones van embebidas y se aplican
//! al abrir el repositorio.

pub mod schema;
mod survey_persistence;

pub use survey_persistence::{new_from_env, DieselSurveyRepository, DEFAULT_DB_URL, MIGRATIONS};
