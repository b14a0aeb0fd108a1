//! Tests for the wedding session state and `update_state`.

use std::str::FromStr;

use concierge::planner::{
    shared_state, update_state, StateField, StateUpdate, WeddingState, STATE_UPDATED,
};
use pretty_assertions::assert_eq;

fn update(origin: &str, destination: &str, guests: &str, genre: &str) -> StateUpdate {
    StateUpdate {
        origin: origin.into(),
        destination: destination.into(),
        guest_count: guests.into(),
        music_genre: genre.into(),
    }
}

#[tokio::test]
async fn update_state_sets_all_fields_and_confirms() {
    let state = shared_state(WeddingState::default());

    let reply = update_state(&state, update("Lima", "Rome", "80", "Jazz")).await;

    assert_eq!(reply, STATE_UPDATED);
    assert_eq!(reply, "State updated successfully");
    assert_eq!(*state.read().await, WeddingState::new("Lima", "Rome", "80", "Jazz"));
}

#[tokio::test]
async fn update_state_is_idempotent() {
    let state = shared_state(WeddingState::default());

    update_state(&state, update("Lima", "Rome", "80", "Jazz")).await;
    let first = state.read().await.clone();
    update_state(&state, update("Lima", "Rome", "80", "Jazz")).await;

    assert_eq!(*state.read().await, first);
}

#[tokio::test]
async fn update_state_overwrites_without_merging() {
    let state = shared_state(WeddingState::new("Lima", "Rome", "80", "Jazz"));

    update_state(&state, update("Quito", "", "120", "Rock")).await;

    let current = state.read().await.clone();
    assert_eq!(current.origin.as_deref(), Some("Quito"));
    assert_eq!(current.get(StateField::Destination), None);
    assert!(!current.is_set(StateField::Destination));
    assert_eq!(current.get(StateField::GuestCount), Some("120"));
}

#[test]
fn require_reports_missing_fields_in_declaration_order() {
    let state = WeddingState {
        guest_count: Some("80".into()),
        ..Default::default()
    };

    let err = state
        .require(&[StateField::MusicGenre, StateField::Origin, StateField::GuestCount])
        .unwrap_err();

    assert_eq!(err.names(), vec!["origin", "music_genre"]);
    assert_eq!(err.to_string(), "missing state fields: origin, music_genre");
}

#[test]
fn require_passes_when_fields_are_set() {
    let state = WeddingState::new("Lima", "Rome", "80", "Jazz");
    assert!(state.require(&StateField::ALL).is_ok());
}

#[test]
fn state_field_names_are_snake_case() {
    assert_eq!(StateField::GuestCount.name(), "guest_count");
    assert_eq!(StateField::MusicGenre.to_string(), "music_genre");
    assert_eq!(StateField::from_str("destination").unwrap(), StateField::Destination);
}

#[test]
fn display_marks_unset_fields() {
    let state = WeddingState {
        origin: Some("Lima".into()),
        ..Default::default()
    };
    assert_eq!(
        state.to_string(),
        "origin=Lima, destination=<unset>, guest_count=<unset>, music_genre=<unset>"
    );
}
