pub mod api;
pub mod auth;
pub mod child;
pub mod flash;
pub mod gate;
pub mod landing;
pub mod parent;
pub mod responses;
pub mod router;
pub mod state;
pub mod templates;

pub use responses::{ApiMessage, json_error};
pub use state::AppState;
