//! Data models for the Leo Tax Filing portal.

mod activity;
mod document;
mod profile;
mod user;

pub use activity::{Activity, ActivityAction, NewActivity};
pub use document::{
    filter_records, DocumentKind, DocumentRecord, COPY_CATEGORIES, TAX_FORM_CATEGORIES, TAX_YEARS,
    UPLOAD_CATEGORIES,
};
pub use profile::{Profile, ProfileInput};
pub use user::{Role, Session, SessionUser, User};
