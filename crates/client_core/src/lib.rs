pub mod config;
pub mod connectivity;
pub mod controller;
pub mod reducer;
pub mod sandbox;
pub mod tutor;
pub mod view;

pub use config::{load_settings, Settings};
pub use connectivity::ConnectivityMonitor;
pub use controller::SessionController;
pub use reducer::{reduce, Action, Effect, SessionView, Transition};
pub use sandbox::{SandboxApi, SandboxClient, SandboxError};
pub use tutor::{TutorApi, TutorClient, TutorError};
pub use view::{ProjectFilters, ViewState};
