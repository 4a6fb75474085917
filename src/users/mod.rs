//! User store and user management

mod memory;
mod postgres;
mod repository;
mod service;

pub use memory::{InMemoryUserRepository, MemoryUnitOfWork};
pub use postgres::PgUserRepository;
pub use repository::UserRepository;
pub use service::{UserError, UserService};
