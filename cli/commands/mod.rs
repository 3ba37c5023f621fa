pub mod reconcile;
pub mod users;
