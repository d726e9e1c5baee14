pub mod app;
pub mod context;
pub mod deploy;
pub mod discovery;
pub mod fly;
pub mod github;
pub mod orchestration;
pub mod shared;
