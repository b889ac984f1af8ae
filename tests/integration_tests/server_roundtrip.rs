// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use anyhow::Result;
use memify_server_rs::mesp::Value;

use crate::integration_tests::common::{TestClient, TestServer, bulk, cmd};

#[tokio::test]
async fn ping_over_the_wire() -> Result<()> {
    let server = TestServer::start().await?;
    let mut client = TestClient::connect(server.addr).await?;
    client.handshake().await?;

    let reply = client.round_trip(&Value::Simple("PING".into())).await?;
    assert_eq!(reply, bulk("PONG"));

    server.stop().await;
    Ok(())
}

#[tokio::test]
async fn string_commands_end_to_end() -> Result<()> {
    // Full string lifecycle over a real socket.
    let server = TestServer::start().await?;
    let mut client = TestClient::connect(server.addr).await?;
    client.handshake().await?;

    let reply = client
        .round_trip(&cmd(vec![
            bulk("SET"),
            bulk("foo"),
            bulk("bar"),
            Value::Int(60),
        ]))
        .await?;
    assert_eq!(reply, cmd(vec![bulk("foo"), bulk("bar"), Value::Int(60)]));

    let reply = client
        .round_trip(&cmd(vec![bulk("GET"), bulk("foo")]))
        .await?;
    assert_eq!(reply, bulk("bar"));

    let reply = client
        .round_trip(&cmd(vec![bulk("DELETE"), bulk("foo")]))
        .await?;
    assert_eq!(reply, bulk("SUCCESS"));

    let reply = client
        .round_trip(&cmd(vec![bulk("GET"), bulk("foo")]))
        .await?;
    assert_eq!(reply, bulk("NOT FOUND"));

    server.stop().await;
    Ok(())
}

#[tokio::test]
async fn geo_commands_end_to_end() -> Result<()> {
    // Geo lifecycle over a real socket.
    let server = TestServer::start().await?;
    let mut client = TestClient::connect(server.addr).await?;
    client.handshake().await?;

    let reply = client
        .round_trip(&cmd(vec![
            bulk("GEOSET"),
            bulk("city"),
            bulk("Paris"),
            Value::Float(48.8566),
            Value::Float(2.3522),
            Value::Float(35.0),
        ]))
        .await?;
    assert_eq!(
        reply,
        cmd(vec![
            bulk("Paris"),
            Value::Float(48.8566),
            Value::Float(2.3522),
            Value::Float(35.0),
        ])
    );

    client
        .round_trip(&cmd(vec![
            bulk("GEOSET"),
            bulk("city"),
            bulk("London"),
            Value::Float(51.5074),
            Value::Float(-0.1278),
            Value::Float(11.0),
        ]))
        .await?;

    let reply = client
        .round_trip(&cmd(vec![
            bulk("GEODISTANCE"),
            bulk("city"),
            bulk("Paris"),
            bulk("London"),
        ]))
        .await?;
    match reply {
        Value::Float(d) => {
            assert!((f64::from(d) - 343.5).abs() / 343.5 < 0.01, "distance {d}");
        },
        other => panic!("expected Float, got {other:?}"),
    }

    server.stop().await;
    Ok(())
}

#[tokio::test]
async fn corrupt_signature_is_survivable() -> Result<()> {
    // A corrupt signature answers in-band and the session keeps going.
    let server = TestServer::start().await?;
    let mut client = TestClient::connect(server.addr).await?;
    client.handshake().await?;

    client
        .send_badly_signed(&cmd(vec![bulk("GET"), bulk("foo")]))
        .await?;
    assert_eq!(client.recv().await?, bulk("Signature Verification Failure"));

    let reply = client.round_trip(&Value::Simple("PING".into())).await?;
    assert_eq!(reply, bulk("PONG"));

    server.stop().await;
    Ok(())
}

#[tokio::test]
async fn pipelined_frames_answer_in_order() -> Result<()> {
    let server = TestServer::start().await?;
    let mut client = TestClient::connect(server.addr).await?;
    client.handshake().await?;

    client
        .send_many(&[
            cmd(vec![bulk("SET"), bulk("a"), bulk("1"), Value::Int(60)]),
            cmd(vec![bulk("SET"), bulk("b"), bulk("2"), Value::Int(60)]),
            cmd(vec![bulk("GET"), bulk("a")]),
            cmd(vec![bulk("GET"), bulk("b")]),
        ])
        .await?;

    assert_eq!(
        client.recv().await?,
        cmd(vec![bulk("a"), bulk("1"), Value::Int(60)])
    );
    assert_eq!(
        client.recv().await?,
        cmd(vec![bulk("b"), bulk("2"), Value::Int(60)])
    );
    assert_eq!(client.recv().await?, bulk("1"));
    assert_eq!(client.recv().await?, bulk("2"));

    server.stop().await;
    Ok(())
}

#[tokio::test]
async fn handshake_rejects_stale_and_future_timestamps() -> Result<()> {
    let server = TestServer::start().await?;

    let mut stale = TestClient::connect(server.addr).await?;
    let verdict = stale
        .handshake_at(TestClient::unix_now() - 400, super::common::TEST_SECRET)
        .await?;
    assert_eq!(verdict, "FAIL");

    let mut future = TestClient::connect(server.addr).await?;
    let verdict = future
        .handshake_at(TestClient::unix_now() + 400, super::common::TEST_SECRET)
        .await?;
    assert_eq!(verdict, "FAIL");

    // Inside the window, either direction is fine.
    let mut recent = TestClient::connect(server.addr).await?;
    let verdict = recent
        .handshake_at(TestClient::unix_now() - 120, super::common::TEST_SECRET)
        .await?;
    assert_eq!(verdict, "OK");

    server.stop().await;
    Ok(())
}

#[tokio::test]
async fn handshake_rejects_wrong_secret_and_garbage() -> Result<()> {
    let server = TestServer::start().await?;

    let mut wrong = TestClient::connect(server.addr).await?;
    let verdict = wrong
        .handshake_at(TestClient::unix_now(), "not-the-secret")
        .await?;
    assert_eq!(verdict, "FAIL");

    let mut garbage = TestClient::connect(server.addr).await?;
    let verdict = garbage.raw_handshake(b"no delimiter here").await?;
    assert_eq!(verdict, "FAIL");

    server.stop().await;
    Ok(())
}

#[tokio::test]
async fn unknown_verbs_and_parse_errors_come_back_in_band() -> Result<()> {
    let server = TestServer::start().await?;
    let mut client = TestClient::connect(server.addr).await?;
    client.handshake().await?;

    let reply = client.round_trip(&cmd(vec![bulk("FLUSH")])).await?;
    assert_eq!(reply, bulk("INVALID COMMAND: Invalid command"));

    let reply = client.raw_signed_round_trip(b"!bogus\r\n").await?;
    match reply {
        Value::Bulk(b) => assert!(
            b.starts_with(b"ERROR: "),
            "expected ERROR reply, got {b:?}"
        ),
        other => panic!("expected Bulk, got {other:?}"),
    }

    // Still alive afterwards.
    let reply = client.round_trip(&Value::Simple("PING".into())).await?;
    assert_eq!(reply, bulk("PONG"));

    server.stop().await;
    Ok(())
}

#[tokio::test]
async fn frame_without_delimiter_is_rejected_in_band() -> Result<()> {
    let server = TestServer::start().await?;
    let mut client = TestClient::connect(server.addr).await?;
    client.handshake().await?;

    let reply = client.raw_frame_round_trip(b"no-newline-at-all").await?;
    assert_eq!(reply, bulk("Invalid message format"));

    server.stop().await;
    Ok(())
}

#[tokio::test]
async fn split_frame_across_writes_is_reassembled() -> Result<()> {
    let server = TestServer::start().await?;
    let mut client = TestClient::connect(server.addr).await?;
    client.handshake().await?;

    let reply = client
        .send_split(&cmd(vec![bulk("SET"), bulk("s"), bulk("1"), Value::Int(60)]))
        .await?;
    assert_eq!(reply, cmd(vec![bulk("s"), bulk("1"), Value::Int(60)]));

    server.stop().await;
    Ok(())
}
