pub mod product;
pub mod user;

pub use product::PostgresProductRepository;
pub use user::PostgresUserRepository;
