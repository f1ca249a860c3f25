pub mod cancel;
pub mod quantity;
pub mod scaler;
pub mod sync_policy;

pub use crate::domain::model::{Aggregate, CacheScope};
pub use crate::domain::ports::{LocalStore, RemoteStore};
pub use crate::utils::error::Result;
