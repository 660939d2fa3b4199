use chrono::Utc;
use serde_json::json;
use survey_domain::{DomainStubs, NewSurvey, Role, SurveyPayload, SurveyRecord, SurveyStatus, Topics};

#[test]
fn creation_derives_topics_from_committee_counters() {
  let payload = DomainStubs::sample_payload("سالم", "إدارة", "2025-08");
  let rec = SurveyRecord::create(NewSurvey::new("سالم", "إدارة", "طرابلس", "2025-08").with_survey(payload), Utc::now());
  assert_eq!(rec.status(), SurveyStatus::AwaitingSecretary);
  assert_eq!(rec.topics().total(), 5);
  assert_eq!(rec.topics().done(), 4);
  assert_eq!(rec.topics().remain(), 1);
  assert!(rec.last_action().is_none());
  assert!(rec.manager_note().is_empty());
  assert_eq!(rec.inspection_note(), "");
}

#[test]
fn topic_figures_take_precedence_over_committees() {
  let mut payload = SurveyPayload::default();
  payload.prev = 10;
  payload.topics_prev = Some(1);
  payload.topics_monthly = Some(2);
  payload.topics_done = Some(1);
  let rec = SurveyRecord::new(NewSurvey::new("a", "b", "c", "2025-08").with_survey(payload));
  assert_eq!(rec.topics(), Topics::new(3, 1));
}

#[test]
fn identity_falls_back_to_form_fields() {
  let payload = DomainStubs::sample_payload("منى", "إدارة التفتيش", "2025-07");
  let rec = SurveyRecord::new(NewSurvey::new("", "", "", "").with_survey(payload));
  assert_eq!(rec.employee_name(), "منى");
  assert_eq!(rec.department(), "إدارة التفتيش");
  assert_eq!(rec.cycle(), "2025-07");
}

#[test]
fn remain_is_recomputed_when_deserializing() {
  let rec = SurveyRecord::new(NewSurvey::new("a", "b", "c", "2025-08"));
  let mut v = serde_json::to_value(&rec).unwrap();
  assert_eq!(v["topics"]["remain"], json!(0));
  v["topics"] = json!({"total": 7, "done": 2, "remain": 99});
  let back: SurveyRecord = serde_json::from_value(v).unwrap();
  assert_eq!(back.topics().remain(), 5);
}

#[test]
fn status_and_role_tokens_parse() {
  for st in SurveyStatus::ALL {
    assert_eq!(st.as_str().parse::<SurveyStatus>().unwrap(), st);
  }
  assert!("archived".parse::<SurveyStatus>().is_err());
  assert_eq!("branch".parse::<Role>().unwrap(), Role::BranchManager);
  assert_eq!(serde_json::to_value(SurveyStatus::SentToUnit).unwrap(), json!("sent_to_unit"));
}

#[test]
fn full_survey_fallback_when_payload_missing() {
  let rec = SurveyRecord::new(NewSurvey::new("علي", "", "طرابلس", "2025-08")).with_topics(Topics::new(6, 4));
  let s = rec.full_survey();
  assert_eq!(s.full_name, "علي");
  assert_eq!(s.department, "—");
  assert_eq!(s.monthly, 6);
  assert_eq!(s.done, 4);
  assert!(!s.reasons_justifications.is_empty());
}

#[test]
fn sample_records_cover_the_chain() {
  let recs = DomainStubs::sample_records();
  assert_eq!(recs.len(), 4);
  let last = recs.last().unwrap();
  assert_eq!(last.status(), SurveyStatus::SentToInspection);
  assert!(last.manager_note().is_sealed());
}
