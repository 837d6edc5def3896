pub mod user_store;

#[cfg(test)]
mod in_memory_user_store;

pub use user_store::PostgresUserStore;

#[cfg(test)]
pub use in_memory_user_store::InMemoryUserStore;
