mod modal_overlay;
pub use modal_overlay::ModalOverlay;

mod entry;
pub use entry::EntryView;

mod login;
pub use login::LoginView;

mod dashboard;
pub use dashboard::DashboardView;

mod note_card;
pub use note_card::NoteCard;

mod note_detail;
pub use note_detail::NoteDetailView;
