// Archivo: service.rs
// Propósito: implementar `SurveyService`, la capa orquestadora que expone
// las operaciones de alto nivel (enviar formulario, actuar sobre un
// registro, bandejas, borradores). La invocan la CLI y los handlers.
use crate::engine::{EngineConfig, TransitionRequest, WorkflowEngine};
use crate::errors::Result;
use crate::inbox::{self, InboxSort, InboxTab};
use crate::repository::{DraftStore, SurveyRepository};
use indexmap::IndexMap;
use std::sync::Arc;
use survey_domain::{NewSurvey, Role, SurveyPayload, SurveyRecord};
use uuid::Uuid;

/// Servicio de alto nivel sobre el motor de aprobación.
pub struct SurveyService<R> where R: SurveyRepository
{
    engine: Arc<WorkflowEngine<R>>,
    drafts: Option<Arc<dyn DraftStore>>,
}

impl<R> SurveyService<R> where R: SurveyRepository + 'static
{
    /// Crea el servicio inyectando el repositorio y la configuración del
    /// motor. El `WorkflowEngine` se construye internamente y se reusa.
    pub fn new(repo: Arc<R>, config: EngineConfig) -> Self {
        Self { engine: Arc::new(WorkflowEngine::new(repo, config)), drafts: None }
    }

    /// Habilita el autoguardado de borradores.
    pub fn with_drafts(mut self, drafts: Arc<dyn DraftStore>) -> Self {
        self.drafts = Some(drafts);
        self
    }

    pub fn engine(&self) -> &WorkflowEngine<R> {
        &self.engine
    }

    /// Importa registros ya preparados. Devuelve cuántos se guardaron.
    pub fn import<I>(&self, records: I) -> Result<usize>
        where I: IntoIterator<Item = SurveyRecord>
    {
        let mut n = 0;
        for record in records {
            self.engine.import(record)?;
            n += 1;
        }
        Ok(n)
    }

    /// Envía el formulario de `owner`: crea el registro y descarta su
    /// borrador.
    pub fn submit(&self, owner: &str, new: NewSurvey) -> Result<SurveyRecord> {
        let record = self.engine.create(new)?;
        if let Some(drafts) = &self.drafts {
            drafts.clear_draft(owner)?;
        }
        Ok(record)
    }

    /// Guarda el borrador de `owner`. Sin almacén configurado no hace nada.
    pub fn save_draft(&self, owner: &str, draft: &SurveyPayload) -> Result<()> {
        match &self.drafts {
            Some(drafts) => drafts.save_draft(owner, draft),
            None => Ok(()),
        }
    }

    pub fn load_draft(&self, owner: &str) -> Result<Option<SurveyPayload>> {
        match &self.drafts {
            Some(drafts) => drafts.load_draft(owner),
            None => Ok(None),
        }
    }

    /// Aplica una acción sobre el registro `id`.
    pub fn act(&self, id: &Uuid, request: TransitionRequest) -> Result<SurveyRecord> {
        self.engine.transition(id, request)
    }

    pub fn edit_note(&self, id: &Uuid, role: Role, value: &str) -> Result<bool> {
        self.engine.edit_note(id, role, value)
    }

    pub fn records(&self) -> Result<Vec<SurveyRecord>> {
        self.engine.list()
    }

    /// Contenido de una pestaña de la bandeja de `role`.
    pub fn inbox(&self, role: Role, tab: InboxTab, query: &str, sort: InboxSort) -> Result<Vec<SurveyRecord>> {
        let records = self.engine.list()?;
        Ok(inbox::queue(&records, role, tab, query, sort))
    }

    /// Conteo por pestaña de la bandeja de `role`.
    pub fn inbox_counts(&self, role: Role) -> Result<IndexMap<InboxTab, usize>> {
        let records = self.engine.list()?;
        Ok(inbox::counts(&records, role))
    }
}
