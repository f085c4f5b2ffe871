//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument. Owner-scoped repositories take a
//! [`Tenant`](stockroom_core::tenant::Tenant) and bind its user id in every
//! query.

pub mod cabinet_repo;
pub mod category_repo;
pub mod inventory_log_repo;
pub mod item_repo;
pub mod product_repo;
pub mod room_repo;
pub mod user_repo;
pub mod verification_code_repo;

pub use cabinet_repo::CabinetRepo;
pub use category_repo::CategoryRepo;
pub use inventory_log_repo::InventoryLogRepo;
pub use item_repo::ItemRepo;
pub use product_repo::ProductRepo;
pub use room_repo::RoomRepo;
pub use user_repo::UserRepo;
pub use verification_code_repo::VerificationCodeRepo;
