//! Passive SSDP advertisement
//!
//! Announces the root device on the UPnP multicast group, answers matching
//! `M-SEARCH` queries and says goodbye on shutdown. Discovery is best effort:
//! if the multicast socket cannot be opened the service runs without it.

use chrono::Utc;
use socket2::{Domain, Protocol, Socket, Type};
use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::DiscoveryConfig;
use crate::device::DeviceIdentity;
use crate::errors::AppResult;

pub const SSDP_MULTICAST_ADDR: Ipv4Addr = Ipv4Addr::new(239, 255, 255, 250);
pub const SSDP_PORT: u16 = 1900;
pub const MAX_AGE: u32 = 1800;
pub const ROOT_DEVICE: &str = "upnp:rootdevice";
pub const DEVICE_TYPE: &str = "urn:schemas-upnp-org:device:MediaServer:1";

/// The SSDP view of the emulated device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Advertisement {
    udn: String,
    location: String,
    server: String,
}

impl Advertisement {
    pub fn new(identity: &DeviceIdentity, server: impl Into<String>) -> Self {
        Self {
            udn: identity.udn(),
            location: identity.descriptor_url(),
            server: server.into(),
        }
    }

    pub fn notification_types(&self) -> [&str; 3] {
        [ROOT_DEVICE, self.udn.as_str(), DEVICE_TYPE]
    }

    fn usn(&self, nt: &str) -> String {
        if nt == self.udn {
            self.udn.clone()
        } else {
            format!("{}::{}", self.udn, nt)
        }
    }

    pub fn notify_alive(&self, nt: &str) -> String {
        format!(
            "NOTIFY * HTTP/1.1\r\n\
             HOST: {SSDP_MULTICAST_ADDR}:{SSDP_PORT}\r\n\
             CACHE-CONTROL: max-age={MAX_AGE}\r\n\
             LOCATION: {}\r\n\
             NT: {nt}\r\n\
             NTS: ssdp:alive\r\n\
             SERVER: {}\r\n\
             USN: {}\r\n\
             \r\n",
            self.location,
            self.server,
            self.usn(nt)
        )
    }

    pub fn notify_byebye(&self, nt: &str) -> String {
        format!(
            "NOTIFY * HTTP/1.1\r\n\
             HOST: {SSDP_MULTICAST_ADDR}:{SSDP_PORT}\r\n\
             NT: {nt}\r\n\
             NTS: ssdp:byebye\r\n\
             USN: {}\r\n\
             \r\n",
            self.usn(nt)
        )
    }

    pub fn search_response(&self, st: &str, date: &str) -> String {
        format!(
            "HTTP/1.1 200 OK\r\n\
             CACHE-CONTROL: max-age={MAX_AGE}\r\n\
             DATE: {date}\r\n\
             EXT:\r\n\
             LOCATION: {}\r\n\
             SERVER: {}\r\n\
             ST: {st}\r\n\
             USN: {}\r\n\
             \r\n",
            self.location,
            self.server,
            self.usn(st)
        )
    }

    /// Notification types answering a search target, empty when nothing matches
    pub fn matching_targets(&self, st: &str) -> Vec<&str> {
        if st == "ssdp:all" {
            self.notification_types().to_vec()
        } else {
            self.notification_types()
                .into_iter()
                .filter(|nt| *nt == st)
                .collect()
        }
    }
}

/// Extract the `ST` header of an `M-SEARCH` request
pub fn parse_search_target(datagram: &str) -> Option<&str> {
    if !datagram.starts_with("M-SEARCH") {
        return None;
    }
    datagram.lines().skip(1).find_map(|line| {
        let (name, value) = line.split_once(':')?;
        name.trim().eq_ignore_ascii_case("ST").then(|| value.trim())
    })
}

pub struct SsdpAdvertiser {
    advertisement: Advertisement,
    announce_interval: Duration,
}

impl SsdpAdvertiser {
    pub fn new(identity: &DeviceIdentity, config: &DiscoveryConfig) -> AppResult<Self> {
        Ok(Self {
            advertisement: Advertisement::new(identity, config.server_string.clone()),
            announce_interval: config.announce_interval()?,
        })
    }

    /// Advertise until `cancel` fires, then send `ssdp:byebye`
    pub async fn run(self, cancel: CancellationToken) {
        let socket = match bind_multicast() {
            Ok(socket) => socket,
            Err(e) => {
                warn!(
                    "SSDP discovery disabled, cannot bind {}:{}: {}",
                    SSDP_MULTICAST_ADDR, SSDP_PORT, e
                );
                return;
            }
        };
        info!(
            "SSDP advertising {} every {}",
            self.advertisement.location,
            humantime::format_duration(self.announce_interval)
        );

        // The first tick fires immediately and doubles as the startup announcement
        let mut ticker = tokio::time::interval(self.announce_interval);
        let mut buf = [0u8; 2048];
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    self.send_all(&socket, |nt| self.advertisement.notify_byebye(nt)).await;
                    info!("SSDP advertiser stopped");
                    break;
                }
                _ = ticker.tick() => {
                    self.send_all(&socket, |nt| self.advertisement.notify_alive(nt)).await;
                }
                received = socket.recv_from(&mut buf) => match received {
                    Ok((len, src)) => {
                        let datagram = String::from_utf8_lossy(&buf[..len]);
                        self.answer_search(&socket, &datagram, src).await;
                    }
                    Err(e) => warn!("SSDP receive failed: {}", e),
                },
            }
        }
    }

    async fn send_all(&self, socket: &UdpSocket, message: impl Fn(&str) -> String) {
        let target = SocketAddr::from((SSDP_MULTICAST_ADDR, SSDP_PORT));
        for nt in self.advertisement.notification_types() {
            if let Err(e) = socket.send_to(message(nt).as_bytes(), target).await {
                warn!("Failed to send SSDP NOTIFY for {}: {}", nt, e);
            }
        }
    }

    async fn answer_search(&self, socket: &UdpSocket, datagram: &str, src: SocketAddr) {
        let Some(st) = parse_search_target(datagram) else {
            return;
        };
        let date = Utc::now().format("%a, %d %b %Y %H:%M:%S GMT").to_string();
        for nt in self.advertisement.matching_targets(st) {
            let response = self.advertisement.search_response(nt, &date);
            match socket.send_to(response.as_bytes(), src).await {
                Ok(_) => debug!("Answered M-SEARCH from {} for {}", src, nt),
                Err(e) => warn!("Failed to answer M-SEARCH from {}: {}", src, e),
            }
        }
    }
}

fn bind_multicast() -> std::io::Result<UdpSocket> {
    let socket = Socket::new(Domain::IPV4, Type::DGRAM, Some(Protocol::UDP))?;
    socket.set_reuse_address(true)?;
    socket.set_nonblocking(true)?;
    socket.bind(&SocketAddr::from((Ipv4Addr::UNSPECIFIED, SSDP_PORT)).into())?;
    socket.join_multicast_v4(&SSDP_MULTICAST_ADDR, &Ipv4Addr::UNSPECIFIED)?;
    socket.set_multicast_loop_v4(false)?;
    UdpSocket::from_std(socket.into())
}
