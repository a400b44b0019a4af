use std::collections::VecDeque;

use serde::{
  Deserialize,
  Serialize,
};

pub const DEFAULT_EVENT_LIMIT: usize = 512;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EditorEventKind {
  TextChanged { len_chars: usize },
  BeganEditing,
  GutterWidthChanged { width: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorEvent {
  pub seq:  u64,
  #[serde(flatten)]
  pub kind: EditorEventKind,
}

/// Receives editor events, e.g. to push the text back into a bound state
/// holder.
pub trait EditorObserver {
  fn on_event(&mut self, event: &EditorEvent);
}

impl<F> EditorObserver for F
where
  F: FnMut(&EditorEvent),
{
  fn on_event(&mut self, event: &EditorEvent) {
    self(event)
  }
}

/// Sequenced editor events.
///
/// Events are either ready right away ([`EventQueue::push`]) or deferred
/// ([`EventQueue::defer`]) until the next [`EventQueue::release`], which the
/// editor calls once a layout pass has settled. Released events stay in a
/// bounded history for [`EventQueue::events_since`].
#[derive(Debug, Clone)]
pub struct EventQueue {
  deferred:       Vec<EditorEvent>,
  ready:          VecDeque<EditorEvent>,
  history:        VecDeque<EditorEvent>,
  next_event_seq: u64,
  event_limit:    usize,
}

impl Default for EventQueue {
  fn default() -> Self {
    Self::with_limit(DEFAULT_EVENT_LIMIT)
  }
}

impl EventQueue {
  pub fn with_limit(event_limit: usize) -> Self {
    Self {
      deferred:       Vec::new(),
      ready:          VecDeque::new(),
      history:        VecDeque::new(),
      next_event_seq: 1,
      event_limit:    event_limit.max(1),
    }
  }

  pub fn latest_seq(&self) -> u64 {
    self.next_event_seq.saturating_sub(1)
  }

  pub fn oldest_seq(&self) -> u64 {
    self
      .history
      .front()
      .map(|event| event.seq)
      .unwrap_or(self.next_event_seq)
  }

  /// Released events newer than `seq`.
  pub fn events_since(&self, seq: u64) -> Vec<EditorEvent> {
    self
      .history
      .iter()
      .filter(|event| event.seq > seq)
      .cloned()
      .collect()
  }

  pub fn has_deferred(&self) -> bool {
    !self.deferred.is_empty()
  }

  pub fn push(&mut self, kind: EditorEventKind) -> u64 {
    let event = self.next_event(kind);
    let seq = event.seq;
    self.make_ready(event);
    seq
  }

  pub fn defer(&mut self, kind: EditorEventKind) -> u64 {
    let event = self.next_event(kind);
    let seq = event.seq;
    self.deferred.push(event);
    seq
  }

  /// Make every deferred event ready, oldest first.
  pub fn release(&mut self) {
    let deferred = std::mem::take(&mut self.deferred);
    for event in deferred {
      self.make_ready(event);
    }
  }

  /// Take all ready events in sequence order.
  pub fn drain(&mut self) -> Vec<EditorEvent> {
    self.ready.drain(..).collect()
  }

  /// Hand every ready event to `observer`, returning how many were delivered.
  pub fn dispatch(&mut self, observer: &mut impl EditorObserver) -> usize {
    let events = self.drain();
    for event in &events {
      observer.on_event(event);
    }
    events.len()
  }

  fn next_event(&mut self, kind: EditorEventKind) -> EditorEvent {
    let event = EditorEvent {
      seq: self.next_event_seq,
      kind,
    };
    self.next_event_seq = self.next_event_seq.saturating_add(1);
    event
  }

  fn make_ready(&mut self, event: EditorEvent) {
    let idx = self.history.partition_point(|other| other.seq < event.seq);
    self.history.insert(idx, event.clone());
    while self.history.len() > self.event_limit {
      self.history.pop_front();
    }

    let idx = self.ready.partition_point(|other| other.seq < event.seq);
    self.ready.insert(idx, event);
    while self.ready.len() > self.event_limit {
      if let Some(dropped) = self.ready.pop_front() {
        tracing::warn!(seq = dropped.seq, "dropping undelivered editor event");
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn pushed_events_are_ready() {
    let mut queue = EventQueue::default();
    let seq = queue.push(EditorEventKind::BeganEditing);
    assert_eq!(seq, 1);
    assert_eq!(queue.drain(), vec![EditorEvent {
      seq:  1,
      kind: EditorEventKind::BeganEditing,
    }]);
    assert!(queue.drain().is_empty());
  }

  #[test]
  fn deferred_events_wait_for_release() {
    let mut queue = EventQueue::default();
    queue.defer(EditorEventKind::TextChanged { len_chars: 3 });
    assert!(queue.has_deferred());
    assert!(queue.drain().is_empty());
    assert!(queue.events_since(0).is_empty());

    queue.release();
    assert!(!queue.has_deferred());
    let events = queue.drain();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].kind, EditorEventKind::TextChanged { len_chars: 3 });
  }

  #[test]
  fn drain_orders_by_sequence() {
    let mut queue = EventQueue::default();
    queue.defer(EditorEventKind::TextChanged { len_chars: 1 });
    queue.push(EditorEventKind::BeganEditing);
    queue.release();
    let seqs: Vec<u64> = queue.drain().iter().map(|event| event.seq).collect();
    assert_eq!(seqs, vec![1, 2]);
  }

  #[test]
  fn history_is_bounded() {
    let mut queue = EventQueue::with_limit(2);
    for _ in 0..5 {
      queue.push(EditorEventKind::BeganEditing);
    }
    assert_eq!(queue.oldest_seq(), 4);
    assert_eq!(queue.latest_seq(), 5);
    assert_eq!(queue.events_since(4).len(), 1);
    assert_eq!(queue.drain().len(), 2);
  }

  #[test]
  fn closures_observe_events() {
    let mut queue = EventQueue::default();
    queue.push(EditorEventKind::BeganEditing);
    queue.push(EditorEventKind::GutterWidthChanged { width: 40.0 });

    let mut seen = Vec::new();
    let delivered = queue.dispatch(&mut |event: &EditorEvent| seen.push(event.kind.clone()));
    assert_eq!(delivered, 2);
    assert_eq!(seen, vec![
      EditorEventKind::BeganEditing,
      EditorEventKind::GutterWidthChanged { width: 40.0 },
    ]);
  }

  #[test]
  fn events_serialize_with_kind_tag() {
    let event = EditorEvent {
      seq:  7,
      kind: EditorEventKind::TextChanged { len_chars: 12 },
    };
    let json = serde_json::to_value(&event).unwrap();
    assert_eq!(
      json,
      serde_json::json!({ "seq": 7, "kind": "text_changed", "len_chars": 12 })
    );
  }
}
