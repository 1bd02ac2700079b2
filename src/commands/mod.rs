pub mod affected;
pub mod agents;
pub mod check_permissions;
pub mod config;
pub mod deploy;
pub mod deploy_changed;
pub mod version;
