pub mod builtin;
pub mod capability;
pub mod channel;
pub mod dispatcher;
pub mod error;
pub mod method;
pub mod platform;
pub mod registry;
pub mod schema;

pub use channel::ChannelRouter;
pub use dispatcher::Dispatcher;
pub use platform::{HostPlatform, PlatformCapabilities};
pub use registry::{MethodRegistry, SealedRegistry};
