//! Crate `flow`: motor de la cadena de aprobación de encuestas mensuales
//!
//! Este crate define la tabla de transiciones `(estado, rol, acción)`, el
//! contrato de persistencia `SurveyRepository` y una implementación en memoria
//! útil para pruebas (`InMemorySurveyRepository`). El `WorkflowEngine` es el
//! único componente que cambia el estado de un registro.
//!
//! Diseño resumido:
//! - Una sola tabla de aristas: cualquier combinación ausente se rechaza con
//!   `FlowError::Rejected` y el registro no cambia.
//! - Notas de etapa de escritura única: se sellan en el primer envío con
//!   contenido y los reenvíos no las alteran.
//! - Locking optimista: cada escritura lleva la versión leída; si otro actor
//!   escribió antes se obtiene `FlowError::Conflict`.
//!
//! Ejemplo rápido:
//! ```rust
//! use flow::{EngineConfig, InMemorySurveyRepository, TransitionRequest, WorkflowEngine};
//! use survey_domain::{NewSurvey, Role, SurveyStatus};
//! use std::sync::Arc;
//! let engine = WorkflowEngine::new(Arc::new(InMemorySurveyRepository::new()), EngineConfig::default());
//! let rec = engine.create(NewSurvey::new("سالم", "إدارة", "طرابلس", "2025-08")).unwrap();
//! let rec = engine.transition(&rec.id(), TransitionRequest::send(Role::Secretary)).unwrap();
//! assert_eq!(rec.status(), SurveyStatus::SentToManager);
//! ```
pub mod engine;
pub mod errors;
pub mod inbox;
pub mod repository;
pub mod service;
pub mod stubs;
pub mod transitions;

pub use engine::*;
pub use errors::*;
pub use inbox::{InboxSort, InboxTab};
pub use repository::*;
pub use service::SurveyService;
pub use stubs::*;
pub use transitions::TransitionKind;
