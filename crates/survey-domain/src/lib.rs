mod collation;
mod domain_stubs;
mod errors;
mod note;
mod payload;
mod record;
mod role;
mod status;

pub use collation::locale_cmp;
pub use domain_stubs::DomainStubs;
pub use errors::DomainError;
pub use note::StageNote;
pub use payload::{CommitteeTask, Counters, RemainingTopic, SurveyPayload, TopicItem};
pub use record::{LastAction, NewSurvey, SurveyRecord, Topics};
pub use role::Role;
pub use status::SurveyStatus;
