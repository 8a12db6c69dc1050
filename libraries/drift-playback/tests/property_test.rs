//! Property-based tests for PlaybackSession
//!
//! Uses proptest to check session invariants across random inputs and
//! random operation sequences.

use drift_core::Catalog;
use drift_playback::{
    shuffle::pick_from, ContextState, ManualClock, MediaCommand, MediaError, MediaStatus,
    PlaybackSession, RandomPicker, SessionConfig, Ticket, Transport,
};
use proptest::prelude::*;
use std::time::Duration;

// ===== Helpers =====

#[derive(Debug, Clone)]
enum Op {
    Play,
    Pause,
    Toggle,
    Skip,
    Succeed,
    Fail,
    Advance(u64),
    Seek(f64),
    Hide,
    Show,
    Ended,
}

fn arbitrary_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        Just(Op::Play),
        Just(Op::Pause),
        Just(Op::Toggle),
        Just(Op::Skip),
        Just(Op::Succeed),
        Just(Op::Fail),
        (0u64..2_000).prop_map(Op::Advance),
        (-100.0f64..400.0).prop_map(Op::Seek),
        Just(Op::Hide),
        Just(Op::Show),
        Just(Op::Ended),
    ]
}

fn arbitrary_names() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-z0-9]{1,8}\\.mp3", 1..20)
}

/// Outstanding request as seen by a host
#[derive(Debug, Clone, Copy)]
enum Request {
    Resume(Ticket),
    Play(Ticket),
}

fn latest_request(commands: &[MediaCommand], previous: Option<Request>) -> Option<Request> {
    commands.iter().fold(previous, |acc, c| match c {
        MediaCommand::ResumeContext { ticket } => Some(Request::Resume(*ticket)),
        MediaCommand::Play { ticket } => Some(Request::Play(*ticket)),
        _ => acc,
    })
}

fn running(paused: bool) -> MediaStatus {
    MediaStatus {
        position_secs: 10.0,
        duration_secs: Some(240.0),
        paused,
        context: ContextState::Running,
    }
}

// ===== Property Tests =====

proptest! {
    /// Property: seek lands in [0, duration] and emits exactly one Seek
    #[test]
    fn seek_is_clamped(duration in 0.5f64..10_000.0, target in -20_000.0f64..20_000.0) {
        let mut session = PlaybackSession::new(SessionConfig::default(), ManualClock::new());
        session.load_catalog(Catalog::from_names(["a.mp3"])).unwrap();
        session.tick(MediaStatus { duration_secs: Some(duration), ..running(true) });
        session.drain_commands();

        prop_assert!(session.seek(target));

        let position = session.state().position_secs;
        prop_assert!((0.0..=duration).contains(&position));
        let commands = session.drain_commands();
        prop_assert_eq!(commands, vec![MediaCommand::Seek { position_secs: position }]);
    }

    /// Property: picks are always catalog members
    #[test]
    fn picks_are_catalog_members(names in arbitrary_names(), seed in any::<u64>()) {
        let catalog = Catalog::from_names(names);
        let mut picker = RandomPicker::seeded(seed);
        for _ in 0..20 {
            let track = pick_from(&mut picker, catalog.as_slice()).unwrap();
            prop_assert!(catalog.contains(track));
        }
    }

    /// Property: selected tracks come from the catalog
    #[test]
    fn selected_track_is_member(names in arbitrary_names(), seed in any::<u64>(), skips in 1usize..10) {
        let config = SessionConfig { seed: Some(seed), ..SessionConfig::default() };
        let mut session = PlaybackSession::new(config, ManualClock::new());
        let catalog = Catalog::from_names(names);
        session.load_catalog(catalog.clone()).unwrap();

        for _ in 0..skips {
            let track = session.skip_next().unwrap();
            prop_assert!(catalog.contains(&track));
            prop_assert_eq!(session.state().retry_count, 0);
        }
    }

    /// Property: invariants hold across any operation sequence
    #[test]
    fn invariants_hold_for_any_sequence(
        names in arbitrary_names(),
        seed in any::<u64>(),
        ops in prop::collection::vec(arbitrary_op(), 1..60)
    ) {
        let clock = ManualClock::new();
        let config = SessionConfig { seed: Some(seed), ..SessionConfig::default() };
        let max_retries = config.max_retries;
        let mut session = PlaybackSession::new(config, clock.clone());
        session.load_catalog(Catalog::from_names(names)).unwrap();
        session.activate().unwrap();
        let mut request = latest_request(&session.drain_commands(), None);
        let mut paused_output = true;

        for op in ops {
            match op {
                Op::Play => { let _ = session.play(); }
                Op::Pause => session.pause(),
                Op::Toggle => { let _ = session.toggle(); }
                Op::Skip => { session.skip_next(); }
                Op::Succeed => match request.take() {
                    Some(Request::Resume(t)) => session.on_context_resumed(t, Ok(())),
                    Some(Request::Play(t)) => {
                        paused_output = false;
                        session.on_play_settled(t, Ok(()));
                    }
                    None => {}
                },
                Op::Fail => match request.take() {
                    Some(Request::Resume(t)) => {
                        session.on_context_resumed(t, Err(drift_playback::GraphError::ContextResume("denied".into())));
                    }
                    Some(Request::Play(t)) => {
                        session.on_play_settled(t, Err(MediaError::Source("broken".into())));
                    }
                    None => {}
                },
                Op::Advance(ms) => {
                    clock.advance(Duration::from_millis(ms));
                    session.tick(running(paused_output));
                }
                Op::Seek(target) => { session.seek(target); }
                Op::Hide => session.page_hidden(),
                Op::Show => session.page_shown(running(paused_output)),
                Op::Ended => {
                    if let Some(load) = session.current_load() {
                        let _ = session.on_track_ended(load);
                    }
                }
            }

            let commands = session.drain_commands();
            if commands.iter().any(|c| matches!(c, MediaCommand::Pause | MediaCommand::Load { .. })) {
                paused_output = true;
            }
            request = latest_request(&commands, request);
            session.drain_events();

            let state = session.state();
            prop_assert!(state.retry_count <= max_retries);
            prop_assert!(state.position_secs >= 0.0);
            if let Some(duration) = state.known_duration() {
                prop_assert!(state.position_secs <= duration);
            }
            if state.transport == Transport::Playing {
                prop_assert!(state.current_track.is_some());
            }
            if state.transport != Transport::Loading {
                prop_assert!(!session.is_erroring());
            }
        }
    }

    /// Property: a second pause never produces output
    #[test]
    fn pause_is_idempotent(
        names in arbitrary_names(),
        seed in any::<u64>(),
        ops in prop::collection::vec(arbitrary_op(), 0..20)
    ) {
        let clock = ManualClock::new();
        let config = SessionConfig { seed: Some(seed), ..SessionConfig::default() };
        let mut session = PlaybackSession::new(config, clock.clone());
        session.load_catalog(Catalog::from_names(names)).unwrap();
        session.activate().unwrap();

        for op in ops {
            match op {
                Op::Toggle => { let _ = session.toggle(); }
                Op::Skip => { session.skip_next(); }
                Op::Advance(ms) => {
                    clock.advance(Duration::from_millis(ms));
                    session.tick(running(false));
                }
                _ => {}
            }
        }

        session.pause();
        let transport = session.state().transport;
        session.drain_commands();
        session.drain_events();

        session.pause();
        prop_assert!(!session.has_pending_output());
        prop_assert_eq!(session.state().transport, transport);
    }
}
