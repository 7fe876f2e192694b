/// Events published by the session controller, both returned from `update`
/// and fanned out to subscribed observers (HUD highlighting, progress bars).
#[derive(Clone, Debug, PartialEq)]
pub enum NavEvent {
    /// Emitted every tick a target is being acquired by gaze
    DwellProgress { target: String, progress: f32 },

    /// An in-room teleport began animating toward `target`
    TeleportStarted { target: String },

    /// The viewpoint arrived; `target` is now the active marker
    TeleportCompleted { target: String },

    /// A room switch began; content for `room` is loading
    RoomLoadStarted { room: String },

    /// A room switch finished and `room` is now current
    RoomChanged { room: String },

    /// Room content failed to mount; the previous room remains current
    RoomLoadFailed { room: String, reason: String },

    /// A confirmation could not be acted on (disabled transition, switch
    /// already in flight, capability turned off)
    TransitionRejected { target: String, reason: String },
}

/// Disposer handle returned by `subscribe`; pass it back to `unsubscribe`
/// to detach the observer. Dropping the handle without unsubscribing leaves
/// the observer attached for the life of the session.
#[derive(Debug, PartialEq, Eq)]
pub struct ObserverHandle(u64);

/// Subscription fan-out for session events. Single-threaded by design:
/// observers run inline at the end of the tick that produced the event.
#[derive(Default)]
pub struct ObserverHub {
    next_id: u64,
    observers: Vec<(u64, Box<dyn FnMut(&NavEvent)>)>,
}

impl ObserverHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, observer: impl FnMut(&NavEvent) + 'static) -> ObserverHandle {
        let id = self.next_id;
        self.next_id += 1;
        self.observers.push((id, Box::new(observer)));
        ObserverHandle(id)
    }

    pub fn unsubscribe(&mut self, handle: ObserverHandle) {
        self.observers.retain(|(id, _)| *id != handle.0);
    }

    pub fn publish(&mut self, event: &NavEvent) {
        for (_, observer) in self.observers.iter_mut() {
            observer(event);
        }
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_subscribe_publish_unsubscribe() {
        let mut hub = ObserverHub::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let sink = seen.clone();
        let handle = hub.subscribe(move |event| sink.borrow_mut().push(event.clone()));

        hub.publish(&NavEvent::RoomChanged {
            room: "SideWing".to_string(),
        });
        assert_eq!(seen.borrow().len(), 1);

        hub.unsubscribe(handle);
        hub.publish(&NavEvent::RoomChanged {
            room: "Gallery".to_string(),
        });
        assert_eq!(seen.borrow().len(), 1);
        assert_eq!(hub.observer_count(), 0);
    }

    #[test]
    fn test_unsubscribe_only_detaches_its_observer() {
        let mut hub = ObserverHub::new();
        let seen = Rc::new(RefCell::new(0u32));

        let first_sink = seen.clone();
        let first = hub.subscribe(move |_| *first_sink.borrow_mut() += 1);
        let second_sink = seen.clone();
        let _second = hub.subscribe(move |_| *second_sink.borrow_mut() += 10);

        hub.unsubscribe(first);
        hub.publish(&NavEvent::TeleportCompleted {
            target: "Entrance".to_string(),
        });
        assert_eq!(*seen.borrow(), 10);
    }
}
