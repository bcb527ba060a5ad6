//! End-to-end pool tests

mod pool_lifecycle;
