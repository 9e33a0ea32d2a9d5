//! Domain crate for the notes app: models, validation, the [`Backend`] capability and
//! its implementations. Has no UI dependency, so every flow rule here is testable with
//! [`MemoryBackend`] and no network.

pub mod auth;
pub mod backend;
pub mod error;
pub mod models;
pub mod notes;

mod memory;
pub use memory::MemoryBackend;

#[cfg(not(target_arch = "wasm32"))]
mod supabase;
#[cfg(not(target_arch = "wasm32"))]
pub use supabase::SupabaseBackend;

pub use auth::{AuthReply, Credentials, NoticeAction, SignUpOutcome};
pub use backend::{Backend, SharedBackend};
pub use error::{AppError, BackendError, ValidationError};
pub use models::{AuthSession, AuthUser, NewNote, Note, SignUpResponse, UserInfo};
