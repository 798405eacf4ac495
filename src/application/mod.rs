/// Application layer: per-repository use cases, the executor that fans them
/// out, and the services commands share.
pub mod services;
pub mod use_cases;
