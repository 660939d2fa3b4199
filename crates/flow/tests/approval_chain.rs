use flow::{EngineConfig, FlowError, InMemorySurveyRepository, TransitionKind, TransitionRequest, ValidationError,
           WorkflowEngine};
use std::sync::Arc;
use survey_domain::{DomainStubs, NewSurvey, Role, SurveyStatus};

fn engine() -> WorkflowEngine<InMemorySurveyRepository> {
  WorkflowEngine::new(Arc::new(InMemorySurveyRepository::new()), EngineConfig::default())
}

fn submitted(engine: &WorkflowEngine<InMemorySurveyRepository>) -> uuid::Uuid {
  let payload = DomainStubs::sample_payload("سالم محمد", "إدارة الخدمات", "2025-08");
  let new = NewSurvey::new("سالم محمد", "إدارة الخدمات", "طرابلس", "2025-08").with_survey(payload);
  engine.create(new).expect("create").id()
}

#[test]
fn full_chain_to_inspection() {
  let e = engine();
  let id = submitted(&e);

  let r = e.transition(&id, TransitionRequest::send(Role::Secretary)).expect("secretary");
  assert_eq!(r.status(), SurveyStatus::SentToManager);
  assert_eq!(r.last_action().unwrap().note, "أُرسل لمدير الإدارة.");

  let r = e.transition(&id, TransitionRequest::send(Role::Manager).with_note("  راجعوا الأرقام  ")).expect("manager");
  assert_eq!(r.status(), SurveyStatus::SentToBranch);
  assert!(r.manager_note().is_sealed());
  assert_eq!(r.manager_note().value(), "راجعوا الأرقام");
  assert_eq!(r.last_action().unwrap().note, "راجعوا الأرقام");

  let r = e.transition(&id, TransitionRequest::send(Role::BranchManager).with_note("معتمد")).expect("branch");
  assert_eq!(r.status(), SurveyStatus::SentToUnit);
  assert_eq!(r.branch_manager_note().value(), "معتمد");

  let r = e.transition(&id, TransitionRequest::give_back(Role::Unit, "ينقصه كشف")).expect("unit");
  assert_eq!(r.status(), SurveyStatus::ReturnedFromUnit);
  assert_eq!(r.last_action().unwrap().by, Role::Unit);

  let r = e.transition(&id, TransitionRequest::escalate(Role::BranchManager)).expect("escalate");
  assert_eq!(r.status(), SurveyStatus::SentToInspection);
  assert_eq!(r.inspection_note(), "راجعوا الأرقام | معتمد");
  assert_eq!(r.last_action().unwrap().note, "راجعوا الأرقام | معتمد");
  assert_eq!(r.version(), 5);
}

#[test]
fn return_requires_a_reason_and_leaves_record_untouched() {
  let e = engine();
  let id = submitted(&e);
  let before = e.get(&id).unwrap();

  for reason in ["", "   \n"] {
    let err = e.transition(&id, TransitionRequest::give_back(Role::Secretary, reason)).unwrap_err();
    assert!(matches!(err, FlowError::Validation(ValidationError::MissingReason { role: Role::Secretary })));
    assert!(err.is_user_facing());
  }
  let err = e.transition(&id, TransitionRequest::new(Role::Secretary, TransitionKind::Return)).unwrap_err();
  assert!(matches!(err, FlowError::Validation(_)));
  assert_eq!(e.get(&id).unwrap(), before);

  let r = e.transition(&id, TransitionRequest::give_back(Role::Secretary, " أرفق الكشف ")).unwrap();
  assert_eq!(r.status(), SurveyStatus::ReturnedBySecretary);
  assert_eq!(r.last_action().unwrap().note, "أرفق الكشف");
}

#[test]
fn stage_note_survives_resend() {
  let e = engine();
  let id = submitted(&e);
  e.transition(&id, TransitionRequest::send(Role::Secretary)).unwrap();
  e.transition(&id, TransitionRequest::send(Role::Manager).with_note("الملاحظة الأولى")).unwrap();
  e.transition(&id, TransitionRequest::give_back(Role::BranchManager, "أعد التدقيق")).unwrap();

  let r = e.get(&id).unwrap();
  assert_eq!(r.status(), SurveyStatus::ReturnedByBranch);
  assert!(!e.edit_note(&id, Role::Manager, "محاولة تعديل").unwrap());

  let r2 = e.transition(&id, TransitionRequest::send(Role::Manager).with_note("ملاحظة جديدة")).unwrap();
  assert_eq!(r2.status(), SurveyStatus::SentToBranch);
  assert_eq!(r2.manager_note().value(), "الملاحظة الأولى");
  assert_eq!(r2.last_action().unwrap().note, "أُرسل لمدير الفرع.");
  assert_eq!(r.manager_note(), r2.manager_note());
}

#[test]
fn empty_first_send_keeps_note_open() {
  let e = engine();
  let id = submitted(&e);
  e.transition(&id, TransitionRequest::send(Role::Secretary)).unwrap();
  let r = e.transition(&id, TransitionRequest::send(Role::Manager)).unwrap();
  assert!(r.manager_note().is_empty());
  assert!(!r.manager_note().is_sealed());
  assert_eq!(r.last_action().unwrap().note, "أُرسل لمدير الفرع.");

  e.transition(&id, TransitionRequest::give_back(Role::BranchManager, "ناقص")).unwrap();
  let r = e.transition(&id, TransitionRequest::send(Role::Manager).with_note("تمت المراجعة")).unwrap();
  assert!(r.manager_note().is_sealed());
  assert_eq!(r.manager_note().value(), "تمت المراجعة");
}

#[test]
fn draft_note_is_sealed_on_send() {
  let e = engine();
  let id = submitted(&e);
  e.transition(&id, TransitionRequest::send(Role::Secretary)).unwrap();
  assert!(e.edit_note(&id, Role::Manager, "مسودة").unwrap());
  assert!(e.edit_note(&id, Role::Manager, "مسودة معدلة").unwrap());
  // todavía no está pendiente para el director de sucursal
  assert!(!e.edit_note(&id, Role::BranchManager, "x").unwrap());
  assert!(!e.edit_note(&id, Role::Secretary, "x").unwrap());

  let r = e.transition(&id, TransitionRequest::send(Role::Manager)).unwrap();
  assert!(r.manager_note().is_sealed());
  assert_eq!(r.manager_note().value(), "مسودة معدلة");
}

#[test]
fn escalation_without_notes_uses_default_text() {
  let e = engine();
  let id = submitted(&e);
  e.transition(&id, TransitionRequest::send(Role::Secretary)).unwrap();
  e.transition(&id, TransitionRequest::send(Role::Manager)).unwrap();
  e.transition(&id, TransitionRequest::send(Role::BranchManager)).unwrap();
  e.transition(&id, TransitionRequest::give_back(Role::Unit, "سبب")).unwrap();
  let r = e.transition(&id, TransitionRequest::escalate(Role::BranchManager)).unwrap();
  assert_eq!(r.inspection_note(), "");
  assert_eq!(r.last_action().unwrap().note, "تمت الإحالة إلى مكتب التفتيش.");
}

#[test]
fn branch_resend_after_unit_return() {
  let e = engine();
  let id = submitted(&e);
  e.transition(&id, TransitionRequest::send(Role::Secretary)).unwrap();
  e.transition(&id, TransitionRequest::send(Role::Manager)).unwrap();
  e.transition(&id, TransitionRequest::send(Role::BranchManager).with_note("نص الفرع")).unwrap();
  e.transition(&id, TransitionRequest::give_back(Role::Unit, "سبب")).unwrap();
  let r = e.transition(&id, TransitionRequest::send(Role::BranchManager).with_note("آخر")).unwrap();
  assert_eq!(r.status(), SurveyStatus::SentToUnit);
  assert_eq!(r.branch_manager_note().value(), "نص الفرع");
  assert_eq!(r.last_action().unwrap().note, "أُعيد الإرسال للوحدة.");
}

#[test]
fn undefined_edges_are_rejected() {
  let e = engine();
  let id = submitted(&e);
  let before = e.get(&id).unwrap();

  let err = e.transition(&id, TransitionRequest::send(Role::Manager)).unwrap_err();
  match err {
    FlowError::Rejected { from, role, kind } => {
      assert_eq!(from, SurveyStatus::AwaitingSecretary);
      assert_eq!(role, Role::Manager);
      assert_eq!(kind, TransitionKind::Send);
    }
    other => panic!("unexpected error: {other}"),
  }
  assert!(e.transition(&id, TransitionRequest::escalate(Role::Secretary)).is_err());
  assert!(e.transition(&id, TransitionRequest::send(Role::Inspection)).is_err());
  assert_eq!(e.get(&id).unwrap(), before);
}

#[test]
fn terminal_state_accepts_nothing() {
  let e = engine();
  let id = submitted(&e);
  e.transition(&id, TransitionRequest::send(Role::Secretary)).unwrap();
  e.transition(&id, TransitionRequest::send(Role::Manager)).unwrap();
  e.transition(&id, TransitionRequest::send(Role::BranchManager)).unwrap();
  e.transition(&id, TransitionRequest::give_back(Role::Unit, "سبب")).unwrap();
  e.transition(&id, TransitionRequest::escalate(Role::BranchManager)).unwrap();

  for role in [Role::Employee, Role::Secretary, Role::Manager, Role::BranchManager, Role::Unit, Role::Inspection] {
    assert!(e.available_actions(&id, role).unwrap().is_empty());
    for kind in [TransitionKind::Send, TransitionKind::Return, TransitionKind::Escalate] {
      let req = TransitionRequest::new(role, kind).with_note("x");
      assert!(matches!(e.transition(&id, req), Err(FlowError::Rejected { .. })));
    }
  }
}

#[test]
fn employee_resubmits_corrected_form() {
  let e = engine();
  let id = submitted(&e);
  e.transition(&id, TransitionRequest::give_back(Role::Secretary, "صحح الأرقام")).unwrap();

  let mut fixed = DomainStubs::sample_payload("سالم محمد", "إدارة الخدمات", "2025-08");
  fixed.prev = 5;
  fixed.done = 6;
  let r = e.transition(&id, TransitionRequest::send(Role::Employee).with_survey(fixed)).unwrap();
  assert_eq!(r.status(), SurveyStatus::AwaitingSecretary);
  assert_eq!(r.topics().total(), 8);
  assert_eq!(r.topics().done(), 6);
  assert_eq!(r.last_action().unwrap().note, "أُعيد إرسال الاستبيان بعد التعديل.");
}

#[test]
fn unknown_record_is_not_found() {
  let e = engine();
  let err = e.transition(&uuid::Uuid::new_v4(), TransitionRequest::send(Role::Secretary)).unwrap_err();
  assert!(matches!(err, FlowError::NotFound(_)));
}
