//! Integration tests

#[cfg(feature = "ssr")]
mod api_test;
mod broadcast_test;
mod concurrency_test;
mod ordering_test;
#[cfg(feature = "ssr")]
mod server_test;
