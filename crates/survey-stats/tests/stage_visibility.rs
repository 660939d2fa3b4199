use flow::inbox::tab_statuses;
use flow::{EngineConfig, InMemorySurveyRepository, InboxSort, InboxTab, SurveyService, TransitionRequest};
use std::sync::Arc;
use survey_domain::{DomainStubs, NewSurvey, Role, SurveyStatus};
use survey_stats::{for_role, StatsQuery};

fn service() -> SurveyService<InMemorySurveyRepository> {
  SurveyService::new(Arc::new(InMemorySurveyRepository::new()), EngineConfig::default())
}

fn submit(service: &SurveyService<InMemorySurveyRepository>, name: &str) -> uuid::Uuid {
  let payload = DomainStubs::sample_payload(name, "إدارة الخدمات", "2025-08");
  let new = NewSurvey::new(name, "إدارة الخدمات", "طرابلس", "2025-08").with_survey(payload);
  service.submit(name, new).expect("submit").id()
}

#[test]
fn record_pending_at_branch_shows_in_branch_stats_and_inbox() {
  let s = service();
  let id = submit(&s, "سالم محمد");
  s.act(&id, TransitionRequest::send(Role::Secretary)).unwrap();
  let r = s.act(&id, TransitionRequest::send(Role::Manager).with_note("راجعوا")).unwrap();
  assert_eq!(r.status(), SurveyStatus::SentToBranch);

  let awaiting = s.inbox(Role::BranchManager, InboxTab::Awaiting, "", InboxSort::Recent).unwrap();
  assert_eq!(awaiting.len(), 1);
  let report = for_role(&s.records().unwrap(), Role::BranchManager, &StatsQuery::default());
  assert_eq!(report.rows.len(), 1);
  assert_eq!(report.rows[0].record_id, Some(id));
  assert_eq!(report.totals.expect("totals").total, 5);
}

#[test]
fn record_bounced_by_branch_stays_in_branch_stats() {
  let s = service();
  let id = submit(&s, "منى");
  s.act(&id, TransitionRequest::send(Role::Secretary)).unwrap();
  s.act(&id, TransitionRequest::send(Role::Manager)).unwrap();
  let r = s.act(&id, TransitionRequest::give_back(Role::BranchManager, "ناقص")).unwrap();
  assert_eq!(r.status(), SurveyStatus::ReturnedByBranch);
  assert_eq!(for_role(&s.records().unwrap(), Role::BranchManager, &StatsQuery::default()).rows.len(), 1);
}

#[test]
fn branch_inbox_statuses_are_all_visible_in_branch_stats() {
  let visible = Role::BranchManager.visible_statuses();
  for tab in [InboxTab::Awaiting, InboxTab::Sent, InboxTab::ReturnedFromDownstream, InboxTab::SentToInspection] {
    for st in tab_statuses(Role::BranchManager, tab) {
      assert!(visible.contains(st), "{} ({})", st, tab);
    }
  }
}
