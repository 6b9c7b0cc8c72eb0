pub mod server;

use std::time::Duration;

#[derive(Debug)]
pub enum Action {
    Server {
        port: u16,
        dsn: String,
        access_ttl: Duration,
        refresh_ttl: Duration,
    },
}
