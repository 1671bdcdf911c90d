//! HTTP handlers for mallseg-web

pub mod customer;
pub mod health;
pub mod owner;
pub mod ui;

pub use customer::{customer_form, submit_customer};
pub use health::health_routes;
pub use owner::{owner_dashboard, owner_login};
pub use ui::serve_index;
