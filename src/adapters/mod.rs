pub mod api_simulator;
pub mod documentation_handler;
pub mod file_store;
pub mod path_resolver;
pub mod request_example;
pub mod route_generator;
pub mod state_manager;
