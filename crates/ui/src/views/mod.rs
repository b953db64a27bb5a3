mod history;
mod home;
mod login;
mod practice;
mod state;

pub use history::HistoryView;
pub use home::HomeView;
pub use login::LoginView;
pub use practice::PracticeView;
pub use state::{ViewError, ViewState, view_state_from_resource};
