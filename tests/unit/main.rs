mod config_tests;
mod matcher_tests;
mod request_tests;
