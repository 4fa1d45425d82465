pub mod registry;
pub mod traits;

pub use registry::AdapterRegistry;
pub use traits::{RawRecord, WalletAdapter};
