//! Integration tests driving rooms end to end over the local backend.

use logging::{LogLevel, Logger};
use roomkit::{
    ConnectOptions, ConnectionState, E2eeOptions, ExternalKeyProvider, LocalRoomService, Room,
    RoomError, RoomEvent, RoomOptions, SubscriptionPermissions, TrackKind, TrackPermission,
    TrackSource, VideoCodec,
};
use std::fs;
use std::sync::Arc;
use std::sync::mpsc::{Receiver, channel};
use std::thread;
use std::time::{Duration, Instant};

const EVENT_WAIT: Duration = Duration::from_secs(2);

fn make_room(service: &LocalRoomService) -> Room {
    Room::new(Arc::new(service.clone()), RoomOptions::default())
}

fn connect(service: &LocalRoomService, token: &str) -> Room {
    let room = make_room(service);
    room.connect(
        "local://integration",
        token,
        ConnectOptions {
            auto_subscribe: false,
        },
    )
    .expect("connect should succeed");
    room
}

fn event_stream(room: &Room) -> Receiver<RoomEvent> {
    let (tx, rx) = channel();
    room.on(move |event| {
        let _ = tx.send(event.clone());
    });
    rx
}

fn wait_for_track_published(events: &Receiver<RoomEvent>) -> RoomEvent {
    loop {
        let event = events
            .recv_timeout(EVENT_WAIT)
            .expect("expected a TrackPublished event");
        if matches!(event, RoomEvent::TrackPublished { .. }) {
            return event;
        }
    }
}

#[test]
fn connect_populates_roster_from_snapshot() {
    let service = LocalRoomService::new();
    service
        .add_scripted_participant(
            "integration",
            "mediator",
            "Mediator",
            &[
                (TrackKind::Audio, TrackSource::Microphone),
                (TrackKind::Video, TrackSource::Camera),
            ],
        )
        .unwrap();

    let room = connect(&service, "guest:Guest");
    assert_eq!(room.connection_state(), ConnectionState::Connected);
    assert_eq!(room.name().as_deref(), Some("integration"));

    let participants = room.remote_participants();
    assert_eq!(participants.len(), 1, "roster should hold the agent");
    let agent = &participants[0];
    assert_eq!(agent.identity.as_str(), "mediator");
    assert_eq!(agent.publications.len(), 2);
    assert!(agent.publications.iter().all(|p| !p.subscribed));

    room.disconnect();
}

#[test]
fn later_publications_arrive_as_events() {
    let service = LocalRoomService::new();
    service
        .add_scripted_participant("integration", "mediator", "Mediator", &[])
        .unwrap();

    let room = connect(&service, "guest:Guest");
    let events = event_stream(&room);

    let sid = service
        .publish_scripted_track("integration", "mediator", TrackKind::Audio, TrackSource::Microphone)
        .unwrap();

    match wait_for_track_published(&events) {
        RoomEvent::TrackPublished {
            participant,
            publication,
        } => {
            assert_eq!(participant.as_str(), "mediator");
            assert_eq!(publication.sid, sid);
            assert_eq!(publication.kind, TrackKind::Audio);
        }
        other => panic!("unexpected event {:?}", other),
    }

    // The roster catches up too.
    let agent = room
        .remote_participant(&"mediator".into())
        .expect("agent should be in the roster");
    assert_eq!(agent.publications.len(), 1);

    room.disconnect();
}

#[test]
fn removed_handler_stops_receiving() {
    let service = LocalRoomService::new();
    service
        .add_scripted_participant("integration", "mediator", "Mediator", &[])
        .unwrap();

    let room = connect(&service, "guest:Guest");

    let (removed_tx, removed_rx) = channel();
    let removed_id = room.on(move |event| {
        let _ = removed_tx.send(event.clone());
    });
    let events = event_stream(&room);

    assert!(room.off(removed_id), "handler should have been registered");
    assert!(!room.off(removed_id), "removing twice reports absence");

    service
        .publish_scripted_track("integration", "mediator", TrackKind::Audio, TrackSource::Microphone)
        .unwrap();
    wait_for_track_published(&events);

    assert!(
        removed_rx.try_recv().is_err(),
        "deregistered handler must not see events"
    );

    room.disconnect();
}

#[test]
fn subscription_honors_publisher_permissions() {
    let service = LocalRoomService::new();

    let publisher = connect(&service, "host:Host");
    let guest = connect(&service, "guest:Guest");
    let agent = connect(&service, "mediator:Mediator");

    let guest_events = event_stream(&guest);

    let local = publisher.local_participant().expect("publisher is connected");
    local
        .set_subscription_permissions(SubscriptionPermissions {
            all_participants_allowed: false,
            permissions: vec![
                TrackPermission::for_participant("mediator"),
                TrackPermission::for_kind(TrackKind::Audio),
            ],
        })
        .unwrap();
    local.enable_camera_and_microphone().unwrap();

    // Wait until the guest has seen both publications.
    wait_for_track_published(&guest_events);
    wait_for_track_published(&guest_events);

    let host = guest
        .remote_participant(&"host".into())
        .expect("host should be in the guest's roster");
    let video = host
        .publications
        .iter()
        .find(|p| p.kind == TrackKind::Video)
        .expect("host published video");
    let audio = host
        .publications
        .iter()
        .find(|p| p.kind == TrackKind::Audio)
        .expect("host published audio");

    assert!(
        !guest.set_subscribed(&video.sid, true).unwrap(),
        "guest video subscription should be denied"
    );
    assert!(
        guest.set_subscribed(&audio.sid, true).unwrap(),
        "guest audio subscription should be granted"
    );
    assert!(
        agent.set_subscribed(&video.sid, true).unwrap(),
        "agent subscribes to everything"
    );

    let stats = service.publication_stats("integration", &video.sid).unwrap();
    assert_eq!(stats.subscribe_requests, 2);
    assert_eq!(stats.subscribers.len(), 1, "only the agent got the video");

    let stats = service.publication_stats("integration", &audio.sid).unwrap();
    assert_eq!(stats.subscribe_requests, 1);
    assert_eq!(stats.subscribers.len(), 1);

    publisher.disconnect();
    guest.disconnect();
    agent.disconnect();
}

#[test]
fn unsubscribe_clears_granted_state() {
    let service = LocalRoomService::new();
    let sids = service
        .add_scripted_participant(
            "integration",
            "mediator",
            "Mediator",
            &[(TrackKind::Audio, TrackSource::Microphone)],
        )
        .unwrap();

    let room = connect(&service, "guest:Guest");
    assert!(room.set_subscribed(&sids[0], true).unwrap());
    assert!(!room.set_subscribed(&sids[0], false).unwrap());

    let stats = service.publication_stats("integration", &sids[0]).unwrap();
    assert_eq!(stats.subscribe_requests, 1);
    assert_eq!(stats.unsubscribe_requests, 1);
    assert!(stats.subscribers.is_empty());

    let agent = room.remote_participant(&"mediator".into()).unwrap();
    assert!(!agent.publications[0].subscribed);

    room.disconnect();
}

#[test]
fn e2ee_requires_options_and_key_before_connect() {
    let service = LocalRoomService::new();

    // No E2EE options at all.
    let bare = make_room(&service);
    assert!(matches!(
        bare.set_e2ee_enabled(true),
        Err(RoomError::Encryption(_))
    ));

    // Options but no key installed yet.
    let provider = Arc::new(ExternalKeyProvider::new());
    let options = RoomOptions {
        e2ee: Some(E2eeOptions::new(Arc::clone(&provider))),
        ..RoomOptions::default()
    };
    let room = Room::new(Arc::new(service.clone()), options);
    assert!(matches!(
        room.set_e2ee_enabled(true),
        Err(RoomError::Encryption(_))
    ));

    provider.set_key("passphrase").unwrap();
    room.set_e2ee_enabled(true).unwrap();
    assert!(room.e2ee_enabled());

    room.connect(
        "local://integration",
        "secure:Secure",
        ConnectOptions {
            auto_subscribe: false,
        },
    )
    .unwrap();

    // Too late once connected.
    assert!(matches!(
        room.set_e2ee_enabled(false),
        Err(RoomError::InvalidState(_))
    ));

    let record = &service.connect_records("integration")[0];
    assert!(record.e2ee_enabled);
    assert!(record.key_installed);

    room.disconnect();
}

#[test]
fn connect_twice_is_rejected() {
    let service = LocalRoomService::new();
    let room = connect(&service, "guest:Guest");
    let result = room.connect(
        "local://integration",
        "guest:Guest",
        ConnectOptions {
            auto_subscribe: false,
        },
    );
    assert!(matches!(result, Err(RoomError::InvalidState(_))));
    room.disconnect();
}

#[test]
fn connect_records_capture_session_configuration() {
    let service = LocalRoomService::new();
    let options = RoomOptions {
        publish_defaults: roomkit::PublishDefaults {
            video_codec: VideoCodec::H264,
            ..Default::default()
        },
        single_peer_connection: true,
        ..RoomOptions::default()
    };
    let room = Room::new(Arc::new(service.clone()), options);
    room.connect(
        "local://integration",
        "guest:Guest",
        ConnectOptions {
            auto_subscribe: false,
        },
    )
    .unwrap();

    let records = service.connect_records("integration");
    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.identity.as_str(), "guest");
    assert!(!record.auto_subscribe);
    assert!(!record.e2ee_enabled);
    assert!(record.single_peer_connection);
    assert_eq!(record.video_codec, VideoCodec::H264);
    assert_eq!(record.simulcast_layers.len(), 2);
    assert!(record.dynacast);

    room.disconnect();
}

#[test]
fn disconnect_notifies_the_rest_of_the_room() {
    let service = LocalRoomService::new();
    let leaver = connect(&service, "leaver:Leaver");
    let stayer = connect(&service, "stayer:Stayer");
    let stayer_events = event_stream(&stayer);
    let leaver_events = event_stream(&leaver);

    leaver.disconnect();
    assert_eq!(leaver.connection_state(), ConnectionState::Disconnected);

    // The leaver's own handlers see the local Disconnected event.
    let event = leaver_events.recv_timeout(EVENT_WAIT).unwrap();
    assert!(matches!(event, RoomEvent::Disconnected));

    // The remaining client sees the departure.
    loop {
        let event = stayer_events.recv_timeout(EVENT_WAIT).unwrap();
        if let RoomEvent::ParticipantDisconnected { identity } = event {
            assert_eq!(identity.as_str(), "leaver");
            break;
        }
    }
    assert_eq!(service.participant_count("integration"), 1);

    stayer.disconnect();
}

#[test]
fn enable_camera_and_microphone_publishes_and_captures() {
    let service = LocalRoomService::new();
    let room = connect(&service, "guest:Guest");

    let local = room.local_participant().expect("connected");
    local.enable_camera_and_microphone().unwrap();

    let camera = local.camera_track().expect("camera track exists");
    let frames = camera.subscribe_frames();
    let frame = frames
        .recv_timeout(EVENT_WAIT)
        .expect("camera should produce frames");
    assert_eq!(frame.width(), camera.width());

    let microphone = local.microphone_track().expect("microphone track exists");
    assert!(!microphone.is_muted());

    let publication = local.camera_publication().expect("camera was published");
    let stats = service
        .publication_stats("integration", &publication.sid)
        .expect("publication is registered");
    assert_eq!(stats.subscribe_requests, 0);

    // Enabling again must not publish a second pair of tracks.
    local.enable_camera_and_microphone().unwrap();
    let roster_side = connect(&service, "observer:Observer");
    let guest = roster_side.remote_participant(&"guest".into()).unwrap();
    assert_eq!(guest.publications.len(), 2);

    room.disconnect();
    roster_side.disconnect();
}

#[test]
fn connections_reach_the_backend_log() {
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("backend.log");
    let logger = Logger::new(log_path.clone(), LogLevel::Debug).unwrap();
    let service = LocalRoomService::with_logger(logger);

    let room = connect(&service, "guest:Guest");
    room.disconnect();
    drop(room);
    drop(service);

    // The writer thread drains its queue once the last handle is gone.
    let deadline = Instant::now() + EVENT_WAIT;
    let mut content = String::new();
    while Instant::now() < deadline {
        content = fs::read_to_string(&log_path).unwrap_or_default();
        if content.contains("'guest' connected to 'integration'")
            && content.contains("'guest' disconnected from 'integration'")
        {
            return;
        }
        thread::sleep(Duration::from_millis(10));
    }
    panic!("log lines never appeared, got: {:?}", content);
}
