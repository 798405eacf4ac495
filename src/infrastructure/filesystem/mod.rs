pub mod config_store;
pub mod repo_locator;

pub use config_store::{ConfigStore, ConfigStoreError, SgitConfigFile};
pub use repo_locator::{DiscoveryError, RepositoryLocator};
