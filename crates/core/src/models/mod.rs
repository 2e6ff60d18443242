//! Shared domain models.

pub mod resource;
pub mod veteran;

pub use resource::{
    DecodeError, EducationProgram, JobPosting, LegalAid, PsychologistContact, Resource,
    ResourceKind, SocialGroup,
};
pub use veteran::{Veteran, STATUS_LABELS};
