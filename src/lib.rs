pub mod bridge;
pub mod model;
pub mod msg;
pub mod transport;
