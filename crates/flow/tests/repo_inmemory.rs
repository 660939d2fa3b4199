use flow::repository::{DraftStore, PersistResult, SurveyRepository};
use flow::stubs::{InMemoryDraftStore, InMemorySurveyRepository};
use flow::{EngineConfig, FlowError, InboxSort, InboxTab, SurveyService, TransitionRequest};
use std::sync::Arc;
use survey_domain::{DomainStubs, NewSurvey, Role, SurveyRecord, SurveyStatus};

#[test]
fn update_applies_optimistic_version() {
  let repo = InMemorySurveyRepository::new();
  let rec = SurveyRecord::new(NewSurvey::new("a", "b", "c", "2025-08"));
  repo.insert(&rec).expect("insert");
  assert!(matches!(repo.insert(&rec), Err(FlowError::Conflict(_))));

  let res = repo.update(&rec, 0).expect("update");
  assert_eq!(res, PersistResult::Ok { new_version: 1 });
  // stale writer still holds version 0
  assert_eq!(repo.update(&rec, 0).expect("stale"), PersistResult::Conflict);
  assert_eq!(repo.get(&rec.id()).unwrap().unwrap().version(), 1);

  let missing = SurveyRecord::new(NewSurvey::new("x", "y", "z", "2025-08"));
  assert!(matches!(repo.update(&missing, 0), Err(FlowError::NotFound(_))));
}

#[test]
fn concurrent_writers_conflict() {
  let repo = Arc::new(InMemorySurveyRepository::new());
  let service = SurveyService::new(repo.clone(), EngineConfig::default());
  let rec = service.submit("u1", NewSurvey::new("a", "b", "c", "2025-08")).unwrap();

  // another actor writes behind the engine's back
  let stale = repo.get(&rec.id()).unwrap().unwrap();
  repo.update(&stale, 0).unwrap();

  let mut copy = stale.clone();
  copy.set_version(0);
  assert_eq!(repo.update(&copy, 0).unwrap(), PersistResult::Conflict);
  // the engine always reads the latest version, so it still succeeds
  let r = service.act(&rec.id(), TransitionRequest::send(Role::Secretary)).unwrap();
  assert_eq!(r.version(), 2);
}

#[test]
fn list_is_ordered_by_submission() {
  let recs = DomainStubs::sample_records();
  let repo = InMemorySurveyRepository::with_records(recs.clone());
  assert_eq!(repo.count().unwrap(), 4);
  let listed = repo.list().unwrap();
  assert!(listed.windows(2).all(|w| w[0].submitted_at() <= w[1].submitted_at()));
  assert_eq!(listed[0].id(), recs[0].id());
}

#[test]
fn imported_samples_keep_status_notes_and_topics() {
  let service = SurveyService::new(Arc::new(InMemorySurveyRepository::new()), EngineConfig::default());
  let recs = DomainStubs::sample_records();
  assert_eq!(service.import(recs.clone()).unwrap(), 4);

  let stored = service.engine().get(&recs[3].id()).unwrap();
  assert_eq!(stored, recs[3]);
  assert_eq!(stored.status(), SurveyStatus::SentToInspection);
  assert!(stored.branch_manager_note().is_sealed());
  assert_eq!(stored.topics().total(), 5);

  let statuses: Vec<SurveyStatus> = service.records().unwrap().iter().map(|r| r.status()).collect();
  assert!(statuses.contains(&SurveyStatus::SentToBranch));
  assert!(matches!(service.import(vec![recs[0].clone()]), Err(FlowError::Conflict(_))));
}

#[test]
fn drafts_are_cleared_on_submit() {
  let drafts = Arc::new(InMemoryDraftStore::new());
  let service = SurveyService::new(Arc::new(InMemorySurveyRepository::new()), EngineConfig::default())
    .with_drafts(drafts.clone());
  let payload = DomainStubs::sample_payload("منى", "إدارة", "2025-08");
  service.save_draft("mona", &payload).unwrap();
  assert_eq!(service.load_draft("mona").unwrap(), Some(payload.clone()));

  service.submit("mona", NewSurvey::default().with_survey(payload)).unwrap();
  assert!(drafts.load_draft("mona").unwrap().is_none());
}

#[test]
fn inbox_tabs_follow_the_chain() {
  let service = SurveyService::new(Arc::new(InMemorySurveyRepository::new()), EngineConfig::default());
  let a = service.submit("a", NewSurvey::new("بشير", "إدارة أ", "طرابلس", "2025-07")).unwrap();
  let b = service.submit("b", NewSurvey::new("أحمد", "إدارة ب", "طرابلس", "2025-08")).unwrap();
  service.act(&a.id(), TransitionRequest::send(Role::Secretary)).unwrap();
  service.act(&b.id(), TransitionRequest::send(Role::Secretary)).unwrap();
  service.act(&b.id(), TransitionRequest::give_back(Role::Manager, "ناقص")).unwrap();

  let counts = service.inbox_counts(Role::Manager).unwrap();
  assert_eq!(counts[&InboxTab::Awaiting], 1);
  assert_eq!(counts[&InboxTab::ReturnedUpstream], 1);
  assert_eq!(counts.keys().next(), Some(&InboxTab::Awaiting));

  let back = service.inbox(Role::Secretary, InboxTab::ReturnedFromDownstream, "", InboxSort::Recent).unwrap();
  assert_eq!(back.len(), 1);
  assert_eq!(back[0].status(), SurveyStatus::ReturnedByManager);

  service.act(&b.id(), TransitionRequest::send(Role::Secretary)).unwrap();
  let queue = service.inbox(Role::Manager, InboxTab::Awaiting, "", InboxSort::Employee).unwrap();
  let names: Vec<_> = queue.iter().map(|r| r.employee_name()).collect();
  assert_eq!(names, vec!["أحمد", "بشير"]);

  let by_cycle = service.inbox(Role::Manager, InboxTab::Awaiting, " 2025-07 ", InboxSort::Cycle).unwrap();
  assert_eq!(by_cycle.len(), 1);
  assert_eq!(by_cycle[0].employee_name(), "بشير");
  assert!(service.inbox(Role::Manager, InboxTab::Awaiting, "غير موجود", InboxSort::Recent).unwrap().is_empty());
}
