use ferrous_lookup_domain::wire::{decode_message, encode_message, encode_record};
use ferrous_lookup_domain::{DomainName, Message, MessageBuilder, RData, ResourceRecord};
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::net::UdpSocket;
use tokio::sync::oneshot;

pub fn name(s: &str) -> DomainName {
    s.parse().unwrap()
}

pub fn a_record(owner: &str, ip: [u8; 4]) -> ResourceRecord {
    ResourceRecord::new(name(owner), 300, RData::A(Ipv4Addr::from(ip)))
}

pub fn ns_record(zone: &str, target: &str) -> ResourceRecord {
    ResourceRecord::new(name(zone), 172800, RData::Ns(name(target)))
}

/// What a fake server says for names under one suffix.
#[derive(Clone)]
pub enum Zone {
    /// Refer queries to `nameserver`, with glue when an address is given.
    Referral {
        zone: &'static str,
        nameserver: &'static str,
        glue: Option<[u8; 4]>,
    },
    /// Answer with these records.
    Answer(Vec<ResourceRecord>),
    /// Drop the query.
    Silent,
}

/// UDP name server on loopback that answers from a fixed table of zones.
///
/// Entries are matched by suffix in order; the first match wins.
pub struct FakeNameServer {
    addr: SocketAddr,
    received: Arc<AtomicUsize>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl FakeNameServer {
    pub async fn start(addr: SocketAddr, table: Vec<(&'static str, Zone)>) -> std::io::Result<Self> {
        let socket = UdpSocket::bind(addr).await?;
        let addr = socket.local_addr()?;
        let received = Arc::new(AtomicUsize::new(0));
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();

        let counter = received.clone();
        tokio::spawn(async move {
            let mut buf = vec![0u8; 512];
            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => break,
                    result = socket.recv_from(&mut buf) => {
                        let Ok((len, src)) = result else { continue };
                        counter.fetch_add(1, Ordering::SeqCst);
                        let Ok(request) = decode_message(&buf[..len]) else { continue };
                        if let Some(reply) = respond(&table, &request) {
                            let _ = socket.send_to(&reply, src).await;
                        }
                    }
                }
            }
        });

        Ok(Self {
            addr,
            received,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn received(&self) -> usize {
        self.received.load(Ordering::SeqCst)
    }
}

impl Drop for FakeNameServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

fn respond(table: &[(&'static str, Zone)], request: &Message) -> Option<Vec<u8>> {
    let question = request.question()?;
    let qname = question.name.to_string().to_ascii_lowercase();
    let (_, zone) = table
        .iter()
        .find(|(suffix, _)| qname == *suffix || qname.ends_with(&format!(".{}", suffix)))?;

    let reply = MessageBuilder::response_to(request);
    let reply = match zone {
        Zone::Silent => return None,
        Zone::Answer(records) => reply.authoritative(true).answers(records.clone()),
        Zone::Referral {
            zone,
            nameserver,
            glue,
        } => {
            let reply = reply.authority(ns_record(zone, nameserver));
            match glue {
                Some(ip) => reply.additional(a_record(nameserver, *ip)),
                None => reply,
            }
        }
    };
    encode_with_additionals(&reply.build())
}

/// The codec never writes the additional section, so glue is appended here.
fn encode_with_additionals(message: &Message) -> Option<Vec<u8>> {
    let mut bytes = encode_message(message).ok()?;
    for record in message.additionals() {
        encode_record(record, &mut bytes).ok()?;
    }
    let count = message.additionals().len() as u16;
    bytes[10..12].copy_from_slice(&count.to_be_bytes());
    Some(bytes)
}
