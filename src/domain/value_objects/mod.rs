pub mod branch_name;
pub mod branch_set;
pub mod exclusion_set;
pub mod remote_kind;
