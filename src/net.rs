//! Local network helpers.

use std::net::{Ipv4Addr, SocketAddr, UdpSocket};

use tokio::net::TcpStream;

/// Discover the IPv4 address other machines on the LAN would use to reach this host.
///
/// Connecting a UDP socket sends no packets; it only makes the OS pick a route and a
/// source address. Falls back to loopback when there is no route.
pub fn local_ipv4() -> Ipv4Addr {
    probe_local_ipv4().unwrap_or(Ipv4Addr::LOCALHOST)
}

fn probe_local_ipv4() -> Option<Ipv4Addr> {
    let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0)).ok()?;
    socket.connect((Ipv4Addr::new(10, 255, 255, 255), 1)).ok()?;
    match socket.local_addr().ok()? {
        SocketAddr::V4(addr) if !addr.ip().is_unspecified() => Some(*addr.ip()),
        _ => None,
    }
}

/// Check whether something is already accepting connections on a local port.
pub async fn port_in_use(port: u16) -> bool {
    TcpStream::connect((Ipv4Addr::LOCALHOST, port)).await.is_ok()
}
