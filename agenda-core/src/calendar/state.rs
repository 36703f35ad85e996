//! Event collection and selection, and the transitions over them.

use crate::calendar::event::{CalendarEvent, EventId};

/// Transitions of the event store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalendarAction {
    SetActiveEvent(Option<CalendarEvent>),
    AddNewEvent(CalendarEvent),
    UpdateEvent(CalendarEvent),
    /// Remove the selected event.
    DeleteEvent,
    /// Merge events fetched from the backend, skipping ids already present.
    LoadEvents(Vec<CalendarEvent>),
    Clear,
}

/// Events in insertion order, plus the current selection.
///
/// Every stored event has an id and ids are unique. A selection that carries
/// an id refers to a stored event; a selection without one is an unsaved draft.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CalendarState {
    events: Vec<CalendarEvent>,
    active_event: Option<CalendarEvent>,
}

impl CalendarState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[CalendarEvent] {
        &self.events
    }

    pub fn active_event(&self) -> Option<&CalendarEvent> {
        self.active_event.as_ref()
    }

    pub fn has_event_selected(&self) -> bool {
        self.active_event.is_some()
    }

    pub fn get(&self, id: &EventId) -> Option<&CalendarEvent> {
        self.events.iter().find(|e| e.id.as_ref() == Some(id))
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    fn position(&self, id: &EventId) -> Option<usize> {
        self.events.iter().position(|e| e.id.as_ref() == Some(id))
    }

    pub fn apply(&mut self, action: CalendarAction) {
        match action {
            CalendarAction::SetActiveEvent(event) => {
                self.active_event = event;
            }
            CalendarAction::AddNewEvent(mut event) => {
                let id = event.id.get_or_insert_with(EventId::synthetic).clone();
                match self.position(&id) {
                    // Re-adding a known id replaces the stored copy.
                    Some(index) => self.events[index] = event,
                    None => self.events.push(event),
                }
                // A save ends the selection.
                self.active_event = None;
            }
            CalendarAction::UpdateEvent(event) => {
                let Some(id) = event.id.clone() else {
                    return;
                };
                let Some(index) = self.position(&id) else {
                    return;
                };

                if self.active_event.as_ref().and_then(|a| a.id.as_ref()) == Some(&id) {
                    self.active_event = Some(event.clone());
                }
                self.events[index] = event;
            }
            CalendarAction::DeleteEvent => {
                let Some(active) = self.active_event.take() else {
                    return;
                };
                if let Some(id) = active.id {
                    self.events.retain(|e| e.id.as_ref() != Some(&id));
                }
            }
            CalendarAction::LoadEvents(events) => {
                for event in events {
                    let Some(id) = event.id.as_ref() else {
                        continue;
                    };
                    if self.position(id).is_none() {
                        self.events.push(event);
                    }
                }
            }
            CalendarAction::Clear => {
                self.events.clear();
                self.active_event = None;
            }
        }
    }
}
