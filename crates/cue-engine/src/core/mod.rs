pub mod constraint;
pub mod dispatch;
pub mod filter;
pub mod physics;
pub mod scene;
pub mod time;
