pub mod key;
pub mod pinning;
