pub mod arrivals;
pub mod models;
pub mod outcome;
pub mod random_process;
pub mod scenario;
pub mod server_pool;
