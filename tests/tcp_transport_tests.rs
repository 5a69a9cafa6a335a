use rand::{rngs::SmallRng, SeedableRng};
use subsim_bot::{
    BotNode, BotTuning, ChargeTarget, Command, Coordinate, Direction, Event, TcpTransport,
    Transport, TurnController,
};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tokio::time::Duration;

#[tokio::test(flavor = "multi_thread")]
async fn exchanges_lines_over_loopback() -> anyhow::Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    let server = tokio::spawn(async move {
        let (socket, _) = listener.accept().await?;
        let (read, mut write) = socket.into_split();
        write.write_all(b"C|1.0|Loopback|8|8|0\r\n").await?;
        let mut lines = BufReader::new(read).lines();
        let got = lines.next_line().await?;
        anyhow::Ok(got)
    });

    let mut client = TcpTransport::connect(addr).await?;
    let event = client.recv().await?;
    assert!(matches!(event, Event::Config(ref c) if c.width == 8 && c.title == "Loopback"));
    assert_eq!(client.last_recv(), "C|1.0|Loopback|8|8|0");

    client
        .send(Command::Move {
            turn: 3,
            sub_id: 0,
            direction: Direction::East,
            charge: ChargeTarget::Sonar,
        })
        .await?;
    assert_eq!(client.last_send(), "M|3|0|E|Sonar");
    assert_eq!(server.await??, Some("M|3|0|E|Sonar".to_string()));
    Ok(())
}

#[tokio::test]
async fn silent_server_times_out() -> anyhow::Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let server = tokio::spawn(async move {
        let (socket, _) = listener.accept().await?;
        tokio::time::sleep(Duration::from_millis(500)).await;
        drop(socket);
        anyhow::Ok(())
    });

    let mut client = TcpTransport::connect(addr).await?;
    client.set_read_timeout(Some(Duration::from_millis(50)));
    let err = client.recv().await.unwrap_err();
    assert!(err.to_string().contains("Receive timeout"), "{}", err);
    server.await??;
    Ok(())
}

#[tokio::test]
async fn closed_connection_is_reported() -> anyhow::Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let server = tokio::spawn(async move {
        let (socket, _) = listener.accept().await?;
        drop(socket);
        anyhow::Ok(())
    });

    let mut client = TcpTransport::connect(addr).await?;
    server.await??;
    let err = client.recv().await.unwrap_err();
    let msg = err.to_string();
    assert!(
        msg.contains("Connection closed by peer") || msg.contains("Connection reset by peer"),
        "{}",
        msg
    );
    Ok(())
}

#[tokio::test]
async fn garbage_line_is_a_protocol_error() -> anyhow::Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let server = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await?;
        socket.write_all(b"Q|what\n").await?;
        tokio::time::sleep(Duration::from_millis(100)).await;
        anyhow::Ok(())
    });

    let mut client = TcpTransport::connect(addr).await?;
    let err = client.recv().await.unwrap_err();
    assert!(err.to_string().contains("unknown message type"), "{}", err);
    server.await??;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn full_game_over_tcp() -> anyhow::Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    let server = tokio::spawn(async move {
        let (socket, _) = listener.accept().await?;
        let (read, mut write) = socket.into_split();
        let mut lines = BufReader::new(read).lines();

        write.write_all(b"C|1.0|Arena|10|10|1\nV|Obstacle|4|4\n").await?;
        let join = lines.next_line().await?.unwrap_or_default();
        let Command::Join { name, position } = Command::parse(&join)? else {
            anyhow::bail!("expected join, got {:?}", join);
        };
        anyhow::ensure!(position != Coordinate::new(4, 4));
        write.write_all(format!("J|{}\n", name).as_bytes()).await?;

        let mut sent = Vec::new();
        for turn in 1..=3u32 {
            write.write_all(format!("B|{}\n", turn).as_bytes()).await?;
            let line = lines.next_line().await?.unwrap_or_default();
            let cmd = Command::parse(&line)?;
            anyhow::ensure!(cmd.turn() == Some(turn), "wrong turn in {:?}", line);
            write
                .write_all(
                    format!(
                        "I|{}|0|{}|{}|1|torpedos=1|torpedo_range=1\nH|{}|0\n",
                        turn, position.x, position.y, turn
                    )
                    .as_bytes(),
                )
                .await?;
            sent.push(cmd);
        }
        write.write_all(b"F|1|3|Finished\nF|Trident|7\n").await?;
        anyhow::Ok(sent)
    });

    let transport = TcpTransport::connect(addr).await?;
    let controller = TurnController::new("Trident", BotTuning::default());
    let mut node = BotNode::new(controller, Box::new(transport));
    let mut rng = SmallRng::seed_from_u64(2024);
    let summary = node.run(&mut rng).await?;

    let sent = server.await??;
    assert_eq!(sent.len(), 3);
    assert_eq!(summary.players[0].name, "Trident");
    assert_eq!(summary.players[0].score, 7);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn oversized_line_is_refused_before_buffering_it() -> anyhow::Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let server = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await?;
        // no newline: an unbounded read would keep waiting for more
        let flood = vec![b'A'; 80 * 1024];
        let _ = socket.write_all(&flood).await;
        tokio::time::sleep(Duration::from_millis(500)).await;
        anyhow::Ok(())
    });

    let mut client = TcpTransport::connect(addr).await?;
    client.set_read_timeout(Some(Duration::from_secs(5)));
    let err = client.recv().await.unwrap_err();
    assert!(err.to_string().contains("Line too long"), "{}", err);
    drop(client);
    server.await??;
    Ok(())
}

#[tokio::test]
async fn line_at_the_limit_is_accepted() -> anyhow::Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let server = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await?;
        let mut line = String::from("V|Motd|");
        line.push_str(&"x".repeat(64 * 1024 - line.len()));
        line.push('\n');
        socket.write_all(line.as_bytes()).await?;
        tokio::time::sleep(Duration::from_millis(100)).await;
        anyhow::Ok(())
    });

    let mut client = TcpTransport::connect(addr).await?;
    let event = client.recv().await?;
    assert!(matches!(event, Event::CustomSetting(ref s) if s.name == "Motd"));
    server.await??;
    Ok(())
}
