pub mod confirmation;
pub mod repository_scope;

pub use confirmation::{AssumeYes, Confirmation};
pub use repository_scope::{discover_repositories, require_repository};
