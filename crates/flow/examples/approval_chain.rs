use flow::errors::FlowError;
use flow::stubs::InMemorySurveyRepository;
use flow::{EngineConfig, TransitionRequest, WorkflowEngine};
use std::sync::Arc;
use survey_domain::{DomainStubs, NewSurvey, Role};

fn main() -> Result<(), FlowError> {
    let repo = Arc::new(InMemorySurveyRepository::new());
    let engine = WorkflowEngine::new(repo, EngineConfig::default());

    let payload = DomainStubs::sample_payload("سالم محمد", "إدارة الخدمات", "2025-08");
    let rec = engine.create(NewSurvey::new("", "", "", "").with_survey(payload))?;
    println!("created {} [{}] topics {:?}", rec.id(), rec.status(), rec.topics());

    let steps = [TransitionRequest::send(Role::Secretary),
                 TransitionRequest::send(Role::Manager).with_note("تدقيق أرقام الوارد الشهري."),
                 TransitionRequest::send(Role::BranchManager).with_note("يعتمد."),
                 TransitionRequest::give_back(Role::Unit, "ينقصه كشف الإحالات."),
                 TransitionRequest::escalate(Role::BranchManager)];
    for step in steps {
        let r = engine.transition(&rec.id(), step)?;
        let note = r.last_action().map(|a| a.note.as_str()).unwrap_or("");
        println!("-> {} (v{}): {}", r.status(), r.version(), note);
    }

    // cualquier acción sobre un registro terminal se rechaza
    if let Err(e) = engine.transition(&rec.id(), TransitionRequest::send(Role::Manager)) {
        println!("rechazado: {}", e);
    }
    println!("inspection note: {}", engine.get(&rec.id())?.inspection_note());
    Ok(())
}
