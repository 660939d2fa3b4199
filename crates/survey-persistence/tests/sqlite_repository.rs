use flow::{DraftStore, EngineConfig, FlowError, PersistResult, SurveyRepository, SurveyService, TransitionRequest};
use std::sync::Arc;
use survey_domain::{DomainStubs, NewSurvey, Role, SurveyRecord, SurveyStatus};
use survey_persistence::DieselSurveyRepository;
use uuid::Uuid;

// Base SQLite en un archivo temporal por test para no compartir estado.
fn temp_repo() -> DieselSurveyRepository {
  let tmp_path = std::env::temp_dir().join(format!("survey_test_{}.db", Uuid::new_v4()));
  DieselSurveyRepository::new(tmp_path.to_str().unwrap()).expect("failed to create repo")
}

#[test]
fn insert_get_list_roundtrip() {
  let repo = temp_repo();
  let recs = DomainStubs::sample_records();
  for r in &recs {
    repo.insert(r).expect("insert");
  }
  assert_eq!(repo.count().unwrap(), 4);
  assert!(matches!(repo.insert(&recs[0]), Err(FlowError::Conflict(_))));

  let back = repo.get(&recs[3].id()).unwrap().expect("stored");
  assert_eq!(back, recs[3]);
  assert!(back.manager_note().is_sealed());
  assert!(repo.get(&Uuid::new_v4()).unwrap().is_none());

  let listed = repo.list().unwrap();
  assert_eq!(listed.len(), 4);
  assert!(listed.windows(2).all(|w| w[0].submitted_at() <= w[1].submitted_at()));
}

#[test]
fn update_checks_version() {
  let repo = temp_repo();
  let rec = SurveyRecord::new(NewSurvey::new("a", "b", "c", "2025-08"));
  repo.insert(&rec).unwrap();

  let moved = rec.clone().with_status(SurveyStatus::SentToManager);
  assert_eq!(repo.update(&moved, 0).unwrap(), PersistResult::Ok { new_version: 1 });
  assert_eq!(repo.update(&moved, 0).unwrap(), PersistResult::Conflict);

  let stored = repo.get(&rec.id()).unwrap().unwrap();
  assert_eq!(stored.version(), 1);
  assert_eq!(stored.status(), SurveyStatus::SentToManager);

  let ghost = SurveyRecord::new(NewSurvey::new("x", "y", "z", "2025-08"));
  assert!(matches!(repo.update(&ghost, 0), Err(FlowError::NotFound(_))));
}

#[test]
fn engine_runs_on_sqlite() {
  let repo = Arc::new(temp_repo());
  let service = SurveyService::new(repo.clone(), EngineConfig::default()).with_drafts(repo.clone());
  let payload = DomainStubs::sample_payload("منى", "إدارة الخدمات", "2025-08");
  service.save_draft("mona", &payload).unwrap();
  assert_eq!(repo.load_draft("mona").unwrap(), Some(payload.clone()));

  let rec = service.submit("mona", NewSurvey::default().with_survey(payload)).unwrap();
  assert!(repo.load_draft("mona").unwrap().is_none());

  service.act(&rec.id(), TransitionRequest::send(Role::Secretary)).unwrap();
  let r = service.act(&rec.id(), TransitionRequest::send(Role::Manager).with_note("ملاحظة")).unwrap();
  assert_eq!(r.version(), 2);

  let stored = repo.get(&rec.id()).unwrap().unwrap();
  assert_eq!(stored.status(), SurveyStatus::SentToBranch);
  assert_eq!(stored.manager_note().value(), "ملاحظة");
  assert!(stored.manager_note().is_sealed());
  assert_eq!(stored.last_action().unwrap().by, Role::Manager);
}
