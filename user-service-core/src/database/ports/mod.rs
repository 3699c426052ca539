//! Repository ports (interfaces) for the user store.
//! Implementations live under `database::infrastructure`.

pub mod users;
