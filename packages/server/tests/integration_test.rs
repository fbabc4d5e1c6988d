//! Integration tests driving an in-process server over real WebSocket and HTTP
//! connections.

use std::{sync::Arc, time::Duration};

use futures_util::{SinkExt, StreamExt};
use tokio::{net::TcpStream, time::timeout};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};
use vibelounge_server::{
    infrastructure::{
        dto::{
            http::{HealthDto, RoomDetailDto, RoomSummaryDto},
            websocket::{InboundEnvelope, MessageType, Metadata, OutboundEnvelope},
        },
        message_pusher::WebSocketMessagePusher,
        repository::InMemoryRoomRepository,
    },
    ui::{AppState, Server},
};

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

const RECV_TIMEOUT: Duration = Duration::from_secs(5);

/// Start a server on an ephemeral port and return its address
async fn start_server(room_capacity: usize) -> String {
    let repository = Arc::new(InMemoryRoomRepository::new(room_capacity));
    let message_pusher = Arc::new(WebSocketMessagePusher::default());
    let state = Arc::new(AppState::with_default_buffer(repository, message_pusher));
    let app = Server::new(state).router();

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr.to_string()
}

async fn connect(addr: &str) -> Socket {
    let (socket, _) = connect_async(format!("ws://{}/ws", addr)).await.unwrap();
    socket
}

fn metadata(name: &str) -> Metadata {
    Metadata::new(
        name,
        format!("https://example.com/{}.png", name),
        1700000000000,
    )
}

async fn send(socket: &mut Socket, envelope: &InboundEnvelope) {
    let json = serde_json::to_string(envelope).unwrap();
    socket.send(Message::Text(json.into())).await.unwrap();
}

async fn recv(socket: &mut Socket) -> OutboundEnvelope {
    loop {
        let msg = timeout(RECV_TIMEOUT, socket.next())
            .await
            .expect("timed out waiting for an envelope")
            .expect("connection closed")
            .unwrap();
        if let Message::Text(text) = msg {
            return serde_json::from_str(text.as_str()).unwrap();
        }
    }
}

async fn get_json<T: serde::de::DeserializeOwned>(addr: &str, path: &str) -> T {
    reqwest::get(format!("http://{}{}", addr, path))
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

async fn wait_for_rooms(addr: &str, expected: usize) -> HealthDto {
    for _ in 0..50 {
        let health: HealthDto = get_json(addr, "/api/health").await;
        if health.rooms == expected {
            return health;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("room count never reached {}", expected);
}

#[tokio::test]
async fn test_health_check() {
    // テスト項目: ヘルスチェックが接続数とルーム数を返す
    // given (前提条件):
    let addr = start_server(10).await;

    // when (操作):
    let health: HealthDto = get_json(&addr, "/api/health").await;

    // then (期待する結果):
    assert_eq!(
        health,
        HealthDto {
            status: "ok".to_string(),
            active_connections: 0,
            rooms: 0,
        }
    );
}

#[tokio::test]
async fn test_alice_and_bob_chat_in_room() {
    // テスト項目: 2 人が同じルームに参加してチャットし、片方が切断する
    // given (前提条件):
    let addr = start_server(10).await;
    let mut alice = connect(&addr).await;
    let mut bob = connect(&addr).await;

    // when (操作): Alice が参加
    send(&mut alice, &InboundEnvelope::join("r1", metadata("Alice"))).await;

    // then (期待する結果):
    let list = recv(&mut alice).await;
    assert_eq!(list.participants(), Some(&["Alice".to_string()][..]));
    let welcome = recv(&mut alice).await;
    assert_eq!(welcome.message(), Some("Welcome to r1, Alice!"));

    // when (操作): Bob が参加
    send(&mut bob, &InboundEnvelope::join("r1", metadata("Bob"))).await;

    // then (期待する結果):
    let joined = recv(&mut alice).await;
    assert_eq!(joined.r#type, MessageType::Join);
    assert_eq!(joined.message(), Some("Bob joined the room"));
    let list = recv(&mut alice).await;
    assert_eq!(
        list.participants(),
        Some(&["Alice".to_string(), "Bob".to_string()][..])
    );
    assert_eq!(recv(&mut bob).await.r#type, MessageType::ParticipantList);
    assert_eq!(
        recv(&mut bob).await.message(),
        Some("Welcome to r1, Bob!")
    );

    // when (操作): Bob がチャット
    send(&mut bob, &InboundEnvelope::chat("r1", metadata("Bob"), "hi 👋")).await;

    // then (期待する結果): 送信者を含む全員に届く
    for socket in [&mut alice, &mut bob] {
        let chat = recv(socket).await;
        assert_eq!(chat.r#type, MessageType::Chat);
        assert_eq!(chat.message(), Some("hi 👋"));
        assert_eq!(chat.metadata, Some(metadata("Bob")));
    }

    // then (期待する結果): HTTP API からルームが見える
    let rooms: Vec<RoomSummaryDto> = get_json(&addr, "/api/rooms").await;
    assert_eq!(rooms.len(), 1);
    assert_eq!(rooms[0].participants, vec!["Alice", "Bob"]);
    let detail: RoomDetailDto = get_json(&addr, "/api/rooms/r1").await;
    assert_eq!(detail.participants[1].avatar_url, "https://example.com/Bob.png");

    // when (操作): Alice が切断
    alice.close(None).await.unwrap();

    // then (期待する結果):
    let left = recv(&mut bob).await;
    assert_eq!(left.r#type, MessageType::System);
    assert_eq!(left.message(), Some("Alice left the room"));
    let list = recv(&mut bob).await;
    assert_eq!(list.participants(), Some(&["Bob".to_string()][..]));

    // when (操作): Bob も切断
    bob.close(None).await.unwrap();

    // then (期待する結果): ルームが削除される
    let health = wait_for_rooms(&addr, 0).await;
    assert_eq!(health.rooms, 0);
    let status = reqwest::get(format!("http://{}/api/rooms/r1", addr))
        .await
        .unwrap()
        .status();
    assert_eq!(status, reqwest::StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_concurrent_first_joins_create_one_room() {
    // テスト項目: 同じルームへの同時の初回参加でルームは 1 つだけ作られる
    // given (前提条件):
    let addr = start_server(10).await;
    let mut sockets = Vec::new();
    for _ in 0..8 {
        sockets.push(connect(&addr).await);
    }

    // when (操作):
    let joins = sockets.iter_mut().enumerate().map(|(i, socket)| async move {
        send(socket, &InboundEnvelope::join("race", metadata(&format!("user{}", i)))).await;
    });
    futures_util::future::join_all(joins).await;

    // then (期待する結果):
    let mut participants = 0;
    for _ in 0..50 {
        let detail: RoomDetailDto = get_json(&addr, "/api/rooms/race").await;
        participants = detail.participants.len();
        if participants == 8 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    assert_eq!(participants, 8);
    let rooms: Vec<RoomSummaryDto> = get_json(&addr, "/api/rooms").await;
    assert_eq!(rooms.len(), 1);
}

#[tokio::test]
async fn test_malformed_frame_keeps_connection_open() {
    // テスト項目: 不正なフレームを受け取っても接続は維持される
    // given (前提条件):
    let addr = start_server(10).await;
    let mut alice = connect(&addr).await;

    // when (操作):
    alice
        .send(Message::Text("not json".to_string().into()))
        .await
        .unwrap();
    send(&mut alice, &InboundEnvelope::join("r1", metadata("Alice"))).await;

    // then (期待する結果): 後続の join は処理される
    assert_eq!(recv(&mut alice).await.r#type, MessageType::ParticipantList);
    assert_eq!(
        recv(&mut alice).await.message(),
        Some("Welcome to r1, Alice!")
    );
}

#[tokio::test]
async fn test_room_full_is_reported_to_sender() {
    // テスト項目: 上限に達したルームへの参加は本人に system メッセージで通知される
    // given (前提条件):
    let addr = start_server(1).await;
    let mut alice = connect(&addr).await;
    let mut bob = connect(&addr).await;
    send(&mut alice, &InboundEnvelope::join("r1", metadata("Alice"))).await;
    recv(&mut alice).await;
    recv(&mut alice).await;

    // when (操作):
    send(&mut bob, &InboundEnvelope::join("r1", metadata("Bob"))).await;

    // then (期待する結果):
    let rejected = recv(&mut bob).await;
    assert_eq!(rejected.r#type, MessageType::System);
    let detail: RoomDetailDto = get_json(&addr, "/api/rooms/r1").await;
    assert_eq!(detail.participants.len(), 1);
}
