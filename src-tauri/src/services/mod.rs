pub mod backend;
pub mod dashboard;
pub mod state;
pub mod view;
