// Listener module
// Resolves the fixed bind address and creates the listening socket

use socket2::{Domain, Protocol, Socket, Type};
use std::io;
use std::net::{SocketAddr, ToSocketAddrs};
use tokio::net::TcpListener;

/// Resolve `host:port`, preferring the first IPv4 result
pub fn resolve_bind_addr(host: &str, port: u16) -> io::Result<SocketAddr> {
    let addrs: Vec<SocketAddr> = (host, port).to_socket_addrs()?.collect();

    addrs
        .iter()
        .find(|a| a.is_ipv4())
        .or_else(|| addrs.first())
        .copied()
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("No address found for {host}:{port}"),
            )
        })
}

/// Create a `TcpListener` bound to `addr`.
///
/// `SO_REUSEADDR` lets a restart bind while old connections sit in
/// `TIME_WAIT`. `SO_REUSEPORT` is deliberately left off: a second instance on
/// the same port must fail with `AddrInUse`.
///
/// Bind errors keep their `io::ErrorKind` and gain the address in the message.
pub fn create_listener(addr: SocketAddr) -> io::Result<TcpListener> {
    let domain = if addr.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    };

    let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP))?;
    socket.set_reuse_address(true)?;
    socket.set_nonblocking(true)?;

    socket
        .bind(&addr.into())
        .map_err(|e| io::Error::new(e.kind(), format!("Failed to bind {addr}: {e}")))?;

    socket.listen(128)?;

    // Convert socket2::Socket to std::net::TcpListener, then to tokio::net::TcpListener
    let std_listener: std::net::TcpListener = socket.into();
    TcpListener::from_std(std_listener)
}
