mod adapter;

pub use adapter::PawninBackend;

#[cfg(test)]
pub(crate) use adapter::test_server;
