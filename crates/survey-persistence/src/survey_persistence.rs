use crate::schema;
use crate::schema::survey_drafts::dsl as drafts_dsl;
use crate::schema::surveys::dsl as surveys_dsl;
use chrono::Utc;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool, PooledConnection};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use flow::{DraftStore, FlowError, PersistResult, Result, SurveyRepository};
use log::{debug, info};
use std::sync::Arc;
use survey_domain::{SurveyPayload, SurveyRecord};
use uuid::Uuid;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("./migrations");
/// Base usada cuando no hay `SURVEY_DB_URL` ni `DATABASE_URL`.
pub const DEFAULT_DB_URL: &str = "file:surveys?mode=memory&cache=shared";

type DbPool = Pool<ConnectionManager<SqliteConnection>>;
type DbConn = PooledConnection<ConnectionManager<SqliteConnection>>;

/// Repo Diesel que implementa `SurveyRepository` y `DraftStore`.
#[derive(Clone)]
pub struct DieselSurveyRepository {
  pool: Arc<DbPool>,
}

#[derive(Debug, Queryable, Insertable)]
#[diesel(table_name = schema::surveys)]
struct SurveyRow {
  pub id: String,
  pub employee_name: String,
  pub department: String,
  pub branch: String,
  pub cycle: String,
  pub status: String,
  pub submitted_at_ts: i64,
  pub version: i64,
  pub record: String,
}

#[derive(Debug, Queryable, Insertable)]
#[diesel(table_name = schema::survey_drafts)]
struct DraftRow {
  pub owner: String,
  pub payload: String,
  pub updated_at_ts: i64,
}

fn db_err(e: DieselError) -> FlowError {
  FlowError::Storage(format!("db: {}", e))
}

impl SurveyRow {
  fn from_record(record: &SurveyRecord) -> Result<Self> {
    Ok(SurveyRow { id: record.id().to_string(),
                   employee_name: record.employee_name().to_string(),
                   department: record.department().to_string(),
                   branch: record.branch().to_string(),
                   cycle: record.cycle().to_string(),
                   status: record.status().as_str().to_string(),
                   submitted_at_ts: record.submitted_at().timestamp_micros(),
                   version: record.version(),
                   record: serde_json::to_string(record)? })
  }

  /// La columna `version` manda sobre la copia guardada en el JSON.
  fn into_record(self) -> Result<SurveyRecord> {
    let mut rec: SurveyRecord = serde_json::from_str(&self.record)?;
    rec.set_version(self.version);
    Ok(rec)
  }
}

impl DieselSurveyRepository {
  /// Abre (o crea) la base SQLite en `database_url` y aplica las
  /// migraciones pendientes.
  pub fn new(database_url: &str) -> Result<Self> {
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    let pool = Pool::builder().max_size(4)
                              .build(manager)
                              .map_err(|e| FlowError::Storage(format!("pool: {}", e)))?;
    let repo = DieselSurveyRepository { pool: Arc::new(pool) };
    let mut c = repo.conn()?;
    for pragma in ["PRAGMA journal_mode = WAL;", "PRAGMA busy_timeout = 5000;"] {
      if let Err(e) = diesel::sql_query(pragma).execute(&mut c) {
        debug!("{} ignored: {}", pragma, e);
      }
    }
    c.run_pending_migrations(MIGRATIONS)
     .map_err(|e| FlowError::Storage(format!("migrations: {}", e)))?;
    info!("survey store ready at {}", database_url);
    Ok(repo)
  }

  fn conn(&self) -> Result<DbConn> {
    self.pool.get().map_err(|e| FlowError::Storage(format!("pool: {}", e)))
  }

  fn exists(&self, conn: &mut DbConn, id_s: &str) -> Result<bool> {
    let n = surveys_dsl::surveys.filter(surveys_dsl::id.eq(id_s))
                                .count()
                                .get_result::<i64>(conn)
                                .map_err(db_err)?;
    Ok(n > 0)
  }
}

impl SurveyRepository for DieselSurveyRepository {
  fn insert(&self, record: &SurveyRecord) -> Result<()> {
    let mut conn = self.conn()?;
    let row = SurveyRow::from_record(record)?;
    match diesel::insert_into(surveys_dsl::surveys).values(&row).execute(&mut conn) {
      Ok(_) => {
        debug!("survey {} inserted", row.id);
        Ok(())
      }
      Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
        Err(FlowError::Conflict(format!("survey {} already exists", row.id)))
      }
      Err(e) => Err(db_err(e)),
    }
  }

  fn get(&self, id: &Uuid) -> Result<Option<SurveyRecord>> {
    let mut conn = self.conn()?;
    let opt = surveys_dsl::surveys.filter(surveys_dsl::id.eq(id.to_string()))
                                  .first::<SurveyRow>(&mut conn)
                                  .optional()
                                  .map_err(db_err)?;
    opt.map(SurveyRow::into_record).transpose()
  }

  fn list(&self) -> Result<Vec<SurveyRecord>> {
    let mut conn = self.conn()?;
    let rows = surveys_dsl::surveys.order(surveys_dsl::submitted_at_ts.asc())
                                   .load::<SurveyRow>(&mut conn)
                                   .map_err(db_err)?;
    debug!("loaded {} surveys", rows.len());
    rows.into_iter().map(SurveyRow::into_record).collect()
  }

  /// Un único `UPDATE ... WHERE id = ? AND version = ?`: si no toca filas,
  /// o el registro no existe (`NotFound`) o la versión cambió (`Conflict`).
  fn update(&self, record: &SurveyRecord, expected_version: i64) -> Result<PersistResult> {
    let mut conn = self.conn()?;
    let id_s = record.id().to_string();
    let new_version = expected_version.saturating_add(1);
    let mut next = record.clone();
    next.set_version(new_version);
    let json = serde_json::to_string(&next)?;
    let touched = diesel::update(surveys_dsl::surveys.filter(surveys_dsl::id.eq(&id_s))
                                                     .filter(surveys_dsl::version.eq(expected_version)))
                  .set((surveys_dsl::status.eq(next.status().as_str()),
                        surveys_dsl::version.eq(new_version),
                        surveys_dsl::record.eq(json)))
                  .execute(&mut conn)
                  .map_err(db_err)?;
    if touched > 0 {
      return Ok(PersistResult::Ok { new_version });
    }
    if self.exists(&mut conn, &id_s)? {
      Ok(PersistResult::Conflict)
    } else {
      Err(FlowError::NotFound(format!("survey {}", id_s)))
    }
  }

  fn count(&self) -> Result<usize> {
    let mut conn = self.conn()?;
    let n = surveys_dsl::surveys.count().get_result::<i64>(&mut conn).map_err(db_err)?;
    Ok(n.max(0) as usize)
  }
}

impl DraftStore for DieselSurveyRepository {
  fn save_draft(&self, owner: &str, draft: &SurveyPayload) -> Result<()> {
    let mut conn = self.conn()?;
    let row = DraftRow { owner: owner.to_string(),
                         payload: serde_json::to_string(draft)?,
                         updated_at_ts: Utc::now().timestamp_micros() };
    diesel::replace_into(drafts_dsl::survey_drafts).values(&row).execute(&mut conn).map_err(db_err)?;
    Ok(())
  }

  fn load_draft(&self, owner: &str) -> Result<Option<SurveyPayload>> {
    let mut conn = self.conn()?;
    let opt = drafts_dsl::survey_drafts.filter(drafts_dsl::owner.eq(owner))
                                       .first::<DraftRow>(&mut conn)
                                       .optional()
                                       .map_err(db_err)?;
    match opt {
      Some(row) => Ok(Some(serde_json::from_str(&row.payload)?)),
      None => Ok(None),
    }
  }

  fn clear_draft(&self, owner: &str) -> Result<()> {
    let mut conn = self.conn()?;
    diesel::delete(drafts_dsl::survey_drafts.filter(drafts_dsl::owner.eq(owner))).execute(&mut conn)
                                                                                 .map_err(db_err)?;
    Ok(())
  }
}

/// Construye el repositorio a partir del entorno (`.env` incluido):
/// `SURVEY_DB_URL`, con `DATABASE_URL` como respaldo y una base SQLite en
/// memoria compartida si no hay ninguna.
pub fn new_from_env() -> Result<DieselSurveyRepository> {
  dotenvy::dotenv().ok();
  let url = std::env::var("SURVEY_DB_URL").or_else(|_| std::env::var("DATABASE_URL"))
                                          .unwrap_or_else(|_| DEFAULT_DB_URL.into());
  let l = url.to_lowercase();
  if l.starts_with("postgres") || l.starts_with("mysql") {
    return Err(FlowError::Storage("survey-persistence only supports SQLite URLs".into()));
  }
  DieselSurveyRepository::new(&url)
}
