//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod deliverable_repo;
pub mod message_repo;
pub mod order_repo;
pub mod payment_repo;
pub mod property_repo;
pub mod service_pricing_repo;
pub mod session_repo;
pub mod user_repo;

pub use deliverable_repo::DeliverableRepo;
pub use message_repo::MessageRepo;
pub use order_repo::OrderRepo;
pub use payment_repo::PaymentRepo;
pub use property_repo::PropertyRepo;
pub use service_pricing_repo::ServicePricingRepo;
pub use session_repo::SessionRepo;
pub use user_repo::UserRepo;
