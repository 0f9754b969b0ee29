//! Port adapters.

mod tcp_probe;

pub use tcp_probe::TcpProxyProbe;
