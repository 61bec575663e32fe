pub mod ids;
pub mod user;
pub mod product;
pub mod unit;
pub mod order;

pub use ids::*;
pub use user::*;
pub use product::*;
pub use unit::*;
pub use order::*;
