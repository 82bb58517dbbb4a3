//! Data models

pub mod menu_item;
pub mod order;
pub mod user;

pub use menu_item::{MenuItem, MenuItemCreate, MenuItemUpdate};
pub use order::{
    CreateOrderRequest, CreateOrderResponse, Order, OrderItem, OrderItemInput, OrderStatus,
    ReceiptLine, ValidateResponse,
};
pub use user::{User, UserPublic};
