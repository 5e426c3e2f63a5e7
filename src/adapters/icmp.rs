//! ICMP echo adapter over `surge_ping`.
//!
//! One [`Client`] owns the raw socket; it is opened once per run and every
//! attempt reuses it through a single [`Pinger`]. Raw replies are folded
//! into the [`PingOutcome`] taxonomy here so the rest of the crate never
//! sees the wire layer.

use std::net::IpAddr;
use std::time::Duration;

use surge_ping::{
    Client, Config, ICMP, IcmpPacket, PingIdentifier, PingSequence, Pinger, SurgeError,
};

use crate::domain::ping::PingOutcome;
use crate::error::ZpingError;
use crate::services::session::Prober;

/// Echo request timeout.
const PING_TIMEOUT: Duration = Duration::from_millis(3000);

/// ICMP prober bound to one target and one shared socket.
pub struct IcmpProbe {
    target: IpAddr,
    // Keeps the shared socket alive for the lifetime of the probe.
    _client: Client,
    pinger: Pinger,
    sequence: u16,
}

impl IcmpProbe {
    /// Open the ICMP socket for `target`. Needs raw socket privileges on
    /// most platforms.
    pub async fn open(target: IpAddr) -> Result<Self, ZpingError> {
        let config = match target {
            IpAddr::V4(_) => Config::default(),
            IpAddr::V6(_) => Config::builder().kind(ICMP::V6).build(),
        };
        let client = Client::new(&config)
            .map_err(|e| ZpingError::Icmp(format!("cannot open ICMP socket: {e}")))?;
        let mut pinger = client
            .pinger(target, PingIdentifier(std::process::id() as u16))
            .await;
        pinger.timeout(PING_TIMEOUT);
        Ok(Self {
            target,
            _client: client,
            pinger,
            sequence: 0,
        })
    }
}

impl Prober for IcmpProbe {
    async fn probe(&mut self) -> PingOutcome {
        let seq = self.sequence;
        self.sequence = self.sequence.wrapping_add(1);
        let reply = self.pinger.ping(PingSequence(seq), &[]).await;
        classify(self.target, reply)
    }
}

/// Fold a raw reply from the ICMP layer into the outcome taxonomy.
fn classify(
    target: IpAddr,
    reply: Result<(IcmpPacket, Duration), SurgeError>,
) -> PingOutcome {
    match reply {
        Ok((packet, rtt)) => classify_packet(&packet, rtt),
        Err(SurgeError::Timeout { .. }) => PingOutcome::Failure {
            status: "TimedOut".to_string(),
            reply_source: None,
        },
        Err(e) => PingOutcome::transport(target, e),
    }
}

fn classify_packet(packet: &IcmpPacket, rtt: Duration) -> PingOutcome {
    let (source, status): (IpAddr, Option<String>) = match packet {
        IcmpPacket::V4(reply) => (
            reply.get_source().into(),
            icmpv4_status(reply.get_icmp_type().0, reply.get_icmp_code().0),
        ),
        IcmpPacket::V6(reply) => (
            reply.get_source().into(),
            icmpv6_status(reply.get_icmpv6_type().0),
        ),
    };
    match status {
        None => PingOutcome::Success {
            rtt_ms: rtt.as_millis(),
        },
        Some(status) => PingOutcome::Failure {
            status,
            reply_source: (!source.is_unspecified()).then_some(source),
        },
    }
}

/// Status names for the ICMPv4 message types an echo request can provoke.
/// `None` marks an echo reply.
fn icmpv4_status(icmp_type: u8, icmp_code: u8) -> Option<String> {
    let status = match icmp_type {
        0 => return None,
        3 => match icmp_code {
            0 => "DestinationNetworkUnreachable",
            1 => "DestinationHostUnreachable",
            2 => "DestinationProtocolUnreachable",
            3 => "DestinationPortUnreachable",
            _ => "DestinationUnreachable",
        },
        4 => "SourceQuench",
        5 => "Redirect",
        11 => "TtlExpired",
        12 => "ParameterProblem",
        other => return Some(format!("IcmpType{other}")),
    };
    Some(status.to_string())
}

/// Same mapping for ICMPv6, where the echo reply type is 129.
fn icmpv6_status(icmp_type: u8) -> Option<String> {
    let status = match icmp_type {
        129 => return None,
        1 => "DestinationUnreachable",
        2 => "PacketTooBig",
        3 => "TtlExpired",
        4 => "ParameterProblem",
        other => return Some(format!("Icmpv6Type{other}")),
    };
    Some(status.to_string())
}
