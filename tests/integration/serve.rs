mod helpers;

use ferrous_lookup_application::use_cases::HandleDnsQueryUseCase;
use ferrous_lookup_domain::wire::{decode_message, encode_query};
use ferrous_lookup_domain::{DnsQuery, RecordType, ResponseCode};
use ferrous_lookup_infrastructure::dns::{run_udp_listener, DnsServerHandler};
use helpers::{a_record, resolver_for, Hierarchy, Zone};
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio_util::sync::CancellationToken;

async fn start_server(root: SocketAddr, shutdown: CancellationToken) -> SocketAddr {
    let socket = Arc::new(UdpSocket::bind("127.0.0.1:0").await.unwrap());
    let addr = socket.local_addr().unwrap();
    let use_case = HandleDnsQueryUseCase::new(Arc::new(resolver_for(root)))
        .with_resolution_timeout(Some(Duration::from_secs(5)))
        .with_cancellation(shutdown.clone());
    let handler = DnsServerHandler::new(Arc::new(use_case));
    tokio::spawn(run_udp_listener(socket, Arc::new(handler), 3, shutdown));
    addr
}

async fn ask(client: &UdpSocket, id: u16, domain: &str) -> ferrous_lookup_domain::Message {
    let query = DnsQuery::parse(domain, RecordType::A).unwrap();
    client.send(&encode_query(id, &query)).await.unwrap();
    let mut buf = [0u8; 1024];
    let len = tokio::time::timeout(Duration::from_secs(5), client.recv(&mut buf))
        .await
        .expect("server did not reply")
        .unwrap();
    decode_message(&buf[..len]).unwrap()
}

#[tokio::test]
async fn test_server_answers_through_the_hierarchy() {
    let hierarchy = Hierarchy::start(
        vec![(
            "com",
            Zone::Referral {
                zone: "com",
                nameserver: "a.gtld-servers.net",
                glue: Some([127, 0, 0, 2]),
            },
        )],
        vec![(
            "example.com",
            Zone::Referral {
                zone: "example.com",
                nameserver: "ns1.example.com",
                glue: Some([127, 0, 0, 3]),
            },
        )],
        vec![
            (
                "www.example.com",
                Zone::Answer(vec![a_record("www.example.com", [93, 184, 216, 34])]),
            ),
            ("broken.example.com", Zone::Silent),
        ],
    )
    .await;

    let shutdown = CancellationToken::new();
    let server = start_server(hierarchy.root_addr(), shutdown.clone()).await;
    let client = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    client.connect(server).await.unwrap();

    let reply = ask(&client, 0x2a2a, "www.example.com").await;
    assert_eq!(reply.id(), 0x2a2a);
    assert!(reply.header().is_response());
    assert!(reply.header().recursion_available());
    assert_eq!(reply.questions().len(), 1);
    assert_eq!(
        reply.answers()[0].rdata.as_ipv4(),
        Some(Ipv4Addr::new(93, 184, 216, 34))
    );

    // Garbage is skipped and the listener keeps serving
    client.send(&[0xff; 5]).await.unwrap();

    let reply = ask(&client, 0x0101, "broken.example.com").await;
    assert_eq!(reply.id(), 0x0101);
    assert_eq!(reply.header().response_code(), ResponseCode::ServFail);

    shutdown.cancel();
}
