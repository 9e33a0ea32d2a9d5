mod home;
pub use home::Home;

mod login;
pub use login::Login;

mod dashboard;
pub use dashboard::Dashboard;

mod note_detail;
pub use note_detail::NoteDetail;

use dioxus::prelude::*;
use ui::Destination;

use crate::Route;

/// Navigation handler for shared views: maps each [`Destination`] to its [`Route`].
pub(crate) fn use_route_navigation() -> EventHandler<Destination> {
    let nav = use_navigator();
    use_callback(move |destination: Destination| {
        nav.push(Route::from(destination));
    })
}
