//! Client core of the clinic dashboard: typed access to the clinic REST API, the
//! dashboard view-state with its refresh-on-mutation policy, and supervision of the
//! backend process the desktop shell launches.

pub mod api;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;

pub use api::ApiClient;
pub use error::{ApiError, BackendError};
pub use models::ApiResponse;
