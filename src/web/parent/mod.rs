mod chores;
mod dashboard;
mod money;
mod reviews;

pub use chores::{chore_types_page, create_chore_type, toggle_chore_type, update_chore_type};
pub use dashboard::parent_dashboard;
pub use money::{add_fine, add_payment};
pub use reviews::{approve_submission, reject_submission};
