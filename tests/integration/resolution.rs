mod helpers;

use ferrous_lookup_application::ports::{DnsResolver, ResolutionContext};
use ferrous_lookup_domain::{DnsQuery, DomainError, RData, RecordType, ResourceRecord};
use helpers::{a_record, loopback, name, resolver_for, FakeNameServer, Hierarchy, Zone};
use std::net::Ipv4Addr;

fn query(domain: &str, record_type: RecordType) -> DnsQuery {
    DnsQuery::parse(domain, record_type).unwrap()
}

fn referral(zone: &'static str, nameserver: &'static str, glue: Option<[u8; 4]>) -> Zone {
    Zone::Referral {
        zone,
        nameserver,
        glue,
    }
}

#[tokio::test]
async fn test_glue_chain_from_root_to_authoritative() {
    let hierarchy = Hierarchy::start(
        vec![("com", referral("com", "a.gtld-servers.net", Some([127, 0, 0, 2])))],
        vec![(
            "example.com",
            referral("example.com", "ns1.example.com", Some([127, 0, 0, 3])),
        )],
        vec![(
            "www.example.com",
            Zone::Answer(vec![a_record("www.example.com", [93, 184, 216, 34])]),
        )],
    )
    .await;

    let resolution = resolver_for(hierarchy.root_addr())
        .resolve(&query("www.example.com", RecordType::A), &ResolutionContext::new())
        .await
        .unwrap();

    assert_eq!(
        resolution.answers[0].rdata,
        RData::A(Ipv4Addr::new(93, 184, 216, 34))
    );
    assert_eq!(resolution.answered_by, loopback(3, hierarchy.port()));
    assert_eq!(resolution.queries_sent, 3);
    assert_eq!(hierarchy.root.received(), 1);
    assert_eq!(hierarchy.tld.received(), 1);
    assert_eq!(hierarchy.authoritative.received(), 1);
}

#[tokio::test]
async fn test_glueless_nameserver_is_resolved_from_root() {
    let hierarchy = Hierarchy::start(
        vec![
            ("test", referral("test", "a.nic.test", Some([127, 0, 0, 2]))),
            ("com", referral("com", "a.gtld-servers.net", Some([127, 0, 0, 2]))),
        ],
        vec![
            (
                "ns1.dns-host.test",
                Zone::Answer(vec![a_record("ns1.dns-host.test", [127, 0, 0, 3])]),
            ),
            ("example.com", referral("example.com", "ns1.dns-host.test", None)),
        ],
        vec![(
            "example.com",
            Zone::Answer(vec![a_record("www.example.com", [93, 184, 216, 34])]),
        )],
    )
    .await;

    let resolution = resolver_for(hierarchy.root_addr())
        .resolve(&query("www.example.com", RecordType::A), &ResolutionContext::new())
        .await
        .unwrap();

    assert_eq!(
        resolution.answers[0].rdata.as_ipv4(),
        Some(Ipv4Addr::new(93, 184, 216, 34))
    );
    assert_eq!(resolution.queries_sent, 5);
    assert_eq!(hierarchy.root.received(), 2);
    assert_eq!(hierarchy.tld.received(), 2);
    assert_eq!(hierarchy.authoritative.received(), 1);
}

#[tokio::test]
async fn test_mx_and_txt_answers_survive_the_wire() {
    let server = FakeNameServer::start(
        loopback(1, 0),
        vec![(
            "example.com",
            Zone::Answer(vec![
                ResourceRecord::new(
                    name("example.com"),
                    3600,
                    RData::Mx {
                        preference: 10,
                        exchange: name("mail.example.com"),
                    },
                ),
                ResourceRecord::new(
                    name("example.com"),
                    3600,
                    RData::Txt(vec![b"v=spf1 -all".to_vec()]),
                ),
            ]),
        )],
    )
    .await
    .unwrap();

    let resolution = resolver_for(server.addr())
        .resolve(&query("example.com", RecordType::MX), &ResolutionContext::new())
        .await
        .unwrap();

    assert_eq!(resolution.answers.len(), 2);
    assert_eq!(
        resolution.answers[0].rdata,
        RData::Mx {
            preference: 10,
            exchange: name("mail.example.com"),
        }
    );
    assert_eq!(
        resolution.answers[1].rdata,
        RData::Txt(vec![b"v=spf1 -all".to_vec()])
    );
}

#[tokio::test]
async fn test_silent_authoritative_exhausts_retries() {
    let hierarchy = Hierarchy::start(
        vec![("com", referral("com", "a.gtld-servers.net", Some([127, 0, 0, 2])))],
        vec![(
            "example.com",
            referral("example.com", "ns1.example.com", Some([127, 0, 0, 3])),
        )],
        vec![("example.com", Zone::Silent)],
    )
    .await;

    let err = resolver_for(hierarchy.root_addr())
        .resolve(&query("www.example.com", RecordType::A), &ResolutionContext::new())
        .await
        .unwrap_err();

    match err {
        DomainError::TransportTimeout { server, attempts } => {
            assert_eq!(server, loopback(3, hierarchy.port()));
            assert_eq!(attempts, 2);
        }
        other => panic!("expected TransportTimeout, got {:?}", other),
    }
    assert_eq!(hierarchy.authoritative.received(), 2);
}

#[tokio::test]
async fn test_root_referring_to_itself_stops() {
    let server = FakeNameServer::start(
        loopback(1, 0),
        vec![("com", referral("com", "a.root-servers.net", Some([127, 0, 0, 1])))],
    )
    .await
    .unwrap();

    let err = resolver_for(server.addr())
        .resolve(&query("example.com", RecordType::A), &ResolutionContext::new())
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::NoDelegation { .. }));
    assert_eq!(server.received(), 1);
}
