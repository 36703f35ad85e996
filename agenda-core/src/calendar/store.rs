//! Event store handle used by the UI.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;

use crate::calendar::event::{CalendarEvent, EventId};
use crate::calendar::state::{CalendarAction, CalendarState};

/// Handle to the event store. Clones share the same collection.
#[derive(Clone)]
pub struct CalendarStore {
    state: Arc<watch::Sender<CalendarState>>,
}

impl Default for CalendarStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CalendarStore {
    pub fn new() -> Self {
        Self::with_state(CalendarState::new())
    }

    pub fn with_state(initial: CalendarState) -> Self {
        let (state, _) = watch::channel(initial);
        CalendarStore {
            state: Arc::new(state),
        }
    }

    fn dispatch(&self, action: CalendarAction) {
        debug!(?action, "Calendar transition");
        self.state.send_modify(|state| state.apply(action));
    }

    pub fn state(&self) -> CalendarState {
        self.state.borrow().clone()
    }

    pub fn events(&self) -> Vec<CalendarEvent> {
        self.state.borrow().events().to_vec()
    }

    pub fn active_event(&self) -> Option<CalendarEvent> {
        self.state.borrow().active_event().cloned()
    }

    pub fn has_event_selected(&self) -> bool {
        self.state.borrow().has_event_selected()
    }

    pub fn subscribe(&self) -> watch::Receiver<CalendarState> {
        self.state.subscribe()
    }

    /// Select an event, or clear the selection with `None`. The event is not checked
    /// against the collection.
    pub fn set_active_event(&self, event: Option<CalendarEvent>) {
        self.dispatch(CalendarAction::SetActiveEvent(event));
    }

    /// Create the event if it has no id yet, otherwise update the stored copy.
    ///
    /// Returns the id the event is stored under, or `None` when an update names an
    /// id that is not in the collection (nothing is changed in that case). Saving a
    /// new event clears the selection.
    pub async fn start_saving_event(&self, mut event: CalendarEvent) -> Option<EventId> {
        match event.id.clone() {
            Some(id) => {
                self.dispatch(CalendarAction::UpdateEvent(event));
                self.state.borrow().get(&id).is_some().then_some(id)
            }
            None => {
                let id = EventId::synthetic();
                event.id = Some(id.clone());
                self.dispatch(CalendarAction::AddNewEvent(event));
                Some(id)
            }
        }
    }

    pub async fn start_deleting_event(&self) {
        self.dispatch(CalendarAction::DeleteEvent);
    }

    pub fn load_events(&self, events: Vec<CalendarEvent>) {
        self.dispatch(CalendarAction::LoadEvents(events));
    }

    pub fn clear(&self) {
        self.dispatch(CalendarAction::Clear);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn draft(title: &str) -> CalendarEvent {
        let start = Utc.with_ymd_and_hms(2025, 3, 20, 15, 0, 0).unwrap();
        CalendarEvent::new(title, start, start + Duration::hours(1))
    }

    #[tokio::test]
    async fn test_saving_draft_creates_event() {
        let store = CalendarStore::new();

        let id = store.start_saving_event(draft("Lunch")).await;

        let events = store.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].id, id);
        assert_eq!(events[0].title, "Lunch");
    }

    #[tokio::test]
    async fn test_saving_existing_event_updates_it() {
        let store = CalendarStore::new();
        let id = store.start_saving_event(draft("Lunch")).await;
        assert!(id.is_some());

        let mut edited = store.events()[0].clone();
        edited.notes = Some("Bring snacks".to_string());
        let saved_id = store.start_saving_event(edited).await;

        assert_eq!(saved_id, id);
        let events = store.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].notes.as_deref(), Some("Bring snacks"));
    }

    #[tokio::test]
    async fn test_deleting_selected_event() {
        let store = CalendarStore::new();
        store.start_saving_event(draft("Keep")).await;
        store.start_saving_event(draft("Drop")).await;

        let target = store.events().into_iter().find(|e| e.title == "Drop");
        store.set_active_event(target);
        assert!(store.has_event_selected());

        store.start_deleting_event().await;

        assert_eq!(store.events().len(), 1);
        assert_eq!(store.events()[0].title, "Keep");
        assert!(!store.has_event_selected());
        assert_eq!(store.active_event(), None);
    }

    #[tokio::test]
    async fn test_saving_unknown_id_reports_nothing_stored() {
        let store = CalendarStore::new();
        store.start_saving_event(draft("Keep")).await;

        let saved = store.start_saving_event(draft("Ghost").with_id("missing")).await;

        assert_eq!(saved, None);
        assert_eq!(store.events().len(), 1);
        assert_eq!(store.events()[0].title, "Keep");
    }

    #[tokio::test]
    async fn test_select_draft_save_then_delete() {
        let store = CalendarStore::new();
        store.start_saving_event(draft("Existing")).await;

        let new_event = draft("Planning");
        store.set_active_event(Some(new_event.clone()));
        let id = store.start_saving_event(new_event).await;
        assert_eq!(store.events().len(), 2);
        assert!(!store.has_event_selected());

        let stored = store.events().into_iter().find(|e| e.id == id);
        store.set_active_event(stored);
        store.start_deleting_event().await;

        let events = store.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].title, "Existing");
        assert!(!store.has_event_selected());
    }

    #[tokio::test]
    async fn test_deleting_without_selection_is_ignored() {
        let store = CalendarStore::new();
        store.start_saving_event(draft("Keep")).await;

        store.start_deleting_event().await;

        assert_eq!(store.events().len(), 1);
    }

    #[tokio::test]
    async fn test_clones_share_state_and_notify() {
        let store = CalendarStore::new();
        let other = store.clone();
        let mut rx = other.subscribe();

        store.start_saving_event(draft("Shared")).await;

        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().len(), 1);
        assert_eq!(other.events().len(), 1);
    }
}
