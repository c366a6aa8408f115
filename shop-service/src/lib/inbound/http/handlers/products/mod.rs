pub mod create_product;
pub mod delete_product;
pub mod get_product;
pub mod list_own_products;
pub mod list_products;
pub mod update_product;

pub use create_product::create_product;
pub use delete_product::delete_product;
pub use get_product::get_product;
pub use list_own_products::list_own_products;
pub use list_products::list_products;
pub use update_product::update_product;
