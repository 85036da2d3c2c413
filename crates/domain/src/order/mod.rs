//! The Order entity and its supporting types.

mod entity;
mod status;
mod value_objects;

pub use entity::Order;
pub use status::{OrderStatus, PaymentStatus};
pub use value_objects::{Money, OrderItem, ProductId, ShippingAddress, UserId};
