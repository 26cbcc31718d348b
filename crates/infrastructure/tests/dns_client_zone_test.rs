use ferrous_query_domain::{DnsName, DomainError, RecordClass, RecordType, ResourceRecords};
use ferrous_query_infrastructure::DnsClient;

mod helpers;
use helpers::{asked, resolver_config, MockDnsServer, ResponseBuilder};

fn zone() -> DnsName {
    "example.com".parse().unwrap()
}

async fn transfer(servers: &[&MockDnsServer]) -> Result<ResourceRecords, DomainError> {
    let addrs: Vec<_> = servers.iter().map(|s| s.addr()).collect();
    let client = DnsClient::new(&resolver_config(&addrs, 200, 1)).await.unwrap();
    client.query_zone(&zone(), RecordClass::IN, false).await
}

fn summary(records: &ResourceRecords) -> Vec<(RecordType, Vec<u8>)> {
    records
        .answers
        .iter()
        .map(|rr| (rr.rtype, rr.rdata.to_vec()))
        .collect()
}

fn zone_cause(err: &DomainError) -> &DomainError {
    match err {
        DomainError::Communication { message, cause } => {
            assert_eq!(message, "DNS error during zone transfer");
            cause.as_deref().expect("zone transfer failure cause")
        }
        other => panic!("expected communication error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_zone_transfer_spans_several_messages() {
    let server = MockDnsServer::tcp(|q| {
        vec![
            ResponseBuilder::reply_to(q).soa().a([10, 0, 0, 1]).build(),
            ResponseBuilder::reply_to(q)
                .without_question()
                .a([10, 0, 0, 2])
                .a([10, 0, 0, 3])
                .build(),
            ResponseBuilder::reply_to(q)
                .without_question()
                .a([10, 0, 0, 4])
                .soa()
                .build(),
        ]
    })
    .await;

    let records = transfer(&[&server]).await.unwrap();
    let answers = summary(&records);

    assert!(records.is_zone_transfer());
    assert!(records.questions.is_empty());
    assert_eq!(answers.len(), 5);
    assert_eq!(answers[0].0, RecordType::SOA);
    assert_eq!(
        answers[1..].iter().map(|a| a.1.clone()).collect::<Vec<_>>(),
        vec![
            vec![10, 0, 0, 1],
            vec![10, 0, 0, 2],
            vec![10, 0, 0, 3],
            vec![10, 0, 0, 4],
        ]
    );
}

#[tokio::test]
async fn test_zone_transfer_in_single_message() {
    let server = MockDnsServer::tcp(|q| {
        vec![ResponseBuilder::reply_to(q)
            .authoritative()
            .soa()
            .a([192, 0, 2, 7])
            .soa()
            .build()]
    })
    .await;

    let records = transfer(&[&server]).await.unwrap();
    let types: Vec<_> = summary(&records).into_iter().map(|a| a.0).collect();
    assert_eq!(types, vec![RecordType::SOA, RecordType::A]);
}

#[tokio::test]
async fn test_opening_soa_alone_waits_for_more() {
    let server = MockDnsServer::tcp(|q| {
        vec![
            ResponseBuilder::reply_to(q).soa().build(),
            ResponseBuilder::reply_to(q).without_question().build(),
            ResponseBuilder::reply_to(q)
                .without_question()
                .a([10, 1, 1, 1])
                .soa()
                .build(),
        ]
    })
    .await;

    let records = transfer(&[&server]).await.unwrap();
    let types: Vec<_> = summary(&records).into_iter().map(|a| a.0).collect();
    assert_eq!(types, vec![RecordType::SOA, RecordType::A]);
}

#[tokio::test]
async fn test_zone_transfer_sends_axfr_request() {
    let server = MockDnsServer::tcp(|q| {
        vec![ResponseBuilder::reply_to(q).soa().soa().build()]
    })
    .await;

    transfer(&[&server]).await.unwrap();

    let requests = server.tcp_requests();
    assert_eq!(requests.len(), 1);
    let question = asked(&requests[0]);
    assert_eq!(question.qtype, RecordType::AXFR);
    assert_eq!(question.name, zone());
}

#[tokio::test]
async fn test_zone_transfer_must_begin_with_soa() {
    let server = MockDnsServer::tcp(|q| {
        vec![ResponseBuilder::reply_to(q).a([10, 0, 0, 1]).soa().build()]
    })
    .await;

    let err = transfer(&[&server]).await.unwrap_err();
    match zone_cause(&err) {
        DomainError::MalformedMessage(message) => {
            assert_eq!(message, "zone transfer doesn't begin with SOA")
        }
        other => panic!("unexpected cause {:?}", other),
    }
}

#[tokio::test]
async fn test_stream_closed_before_closing_soa() {
    let server = MockDnsServer::tcp(|q| {
        vec![ResponseBuilder::reply_to(q).soa().a([10, 0, 0, 1]).build()]
    })
    .await;

    let err = transfer(&[&server]).await.unwrap_err();
    match zone_cause(&err) {
        DomainError::MalformedMessage(message) => assert_eq!(message, "incomplete zone transfer"),
        other => panic!("unexpected cause {:?}", other),
    }
}

#[tokio::test]
async fn test_zone_transfer_falls_back_to_next_server() {
    let refusing =
        MockDnsServer::tcp(|q| vec![ResponseBuilder::reply_to(q).rcode(5).build()]).await;
    let primary = MockDnsServer::tcp(|q| {
        vec![ResponseBuilder::reply_to(q).soa().a([10, 9, 9, 9]).soa().build()]
    })
    .await;

    let records = transfer(&[&refusing, &primary]).await.unwrap();

    assert_eq!(records.answers.len(), 2);
    assert_eq!(refusing.tcp_requests().len(), 1);
    assert_eq!(primary.tcp_requests().len(), 1);
}

#[tokio::test]
async fn test_refused_everywhere_is_wrapped() {
    let refusing =
        MockDnsServer::tcp(|q| vec![ResponseBuilder::reply_to(q).rcode(5).build()]).await;

    let err = transfer(&[&refusing]).await.unwrap_err();
    assert!(matches!(
        zone_cause(&err),
        DomainError::OperationNotSupported { rcode: 5, .. }
    ));
}

#[tokio::test]
async fn test_last_server_failure_is_reported() {
    let refusing =
        MockDnsServer::tcp(|q| vec![ResponseBuilder::reply_to(q).rcode(5).build()]).await;
    let hangs_up = MockDnsServer::tcp(|_| Vec::new()).await;

    let err = transfer(&[&refusing, &hangs_up]).await.unwrap_err();

    assert!(matches!(zone_cause(&err), DomainError::Transport { .. }));
    assert_eq!(refusing.tcp_requests().len(), 1);
    assert_eq!(hangs_up.tcp_requests().len(), 1);
}

#[tokio::test]
async fn test_unknown_zone_is_terminal() {
    let nxdomain =
        MockDnsServer::tcp(|q| vec![ResponseBuilder::reply_to(q).rcode(3).build()]).await;
    let primary = MockDnsServer::tcp(|q| {
        vec![ResponseBuilder::reply_to(q).soa().soa().build()]
    })
    .await;

    let err = transfer(&[&nxdomain, &primary]).await.unwrap_err();

    assert!(err.is_name_not_found());
    assert!(primary.tcp_requests().is_empty());
}

#[tokio::test]
async fn test_rcode_of_follow_up_message_is_checked() {
    let server = MockDnsServer::tcp(|q| {
        vec![
            ResponseBuilder::reply_to(q).soa().build(),
            ResponseBuilder::reply_to(q).without_question().rcode(2).build(),
        ]
    })
    .await;

    let err = transfer(&[&server]).await.unwrap_err();
    assert!(matches!(
        zone_cause(&err),
        DomainError::ServiceUnavailable { .. }
    ));
}
