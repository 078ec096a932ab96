pub mod config_tests;
pub mod error_tests;
pub mod formatter_tests;
pub mod session_tests;
