pub mod connector;
pub mod infrastructure;
pub mod ports;

pub use connector::StoreConnector;
#[cfg(feature = "postgres")]
pub use connector::StoreOptions;
pub use infrastructure::memory::InMemoryUserCollection;
#[cfg(feature = "postgres")]
pub use infrastructure::postgres::{PoolSettings, PostgresStore, PostgresUserCollection};
pub use ports::users::UserCollection;
