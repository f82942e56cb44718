use std::net::{IpAddr, SocketAddr};

use clap::Parser;

pub const DEFAULT_PORT: u16 = 4000;

#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "pokepick-server")]
#[command(about = "In-memory team and contact backend for pokepick")]
pub struct ServerArgs {
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: IpAddr,
    #[arg(long, env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,
}

impl ServerArgs {
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
