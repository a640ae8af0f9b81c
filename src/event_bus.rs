//! Named-event publish/subscribe, composed into slides and media.
//!
//! Listeners are invoked synchronously, in registration order, with the
//! owning object as their receiver. `fire` snapshots the listener list
//! before calling anything, so listeners added while an event is being
//! delivered wait for the next `fire`. A one-shot listener is removed just
//! before it runs. A failing listener aborts delivery and its error is
//! returned to whoever fired the event; listeners it cut off stay
//! registered.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use anyhow::Result;

type Callback<T, P> = Rc<dyn Fn(&T, &P) -> Result<()>>;

struct Entry<T, P> {
    id: u64,
    once: bool,
    callback: Callback<T, P>,
}

pub struct EventBus<T, P = ()> {
    listeners: RefCell<HashMap<String, Vec<Entry<T, P>>>>,
    next_id: Cell<u64>,
}

impl<T, P> EventBus<T, P> {
    pub fn new() -> Self {
        Self {
            listeners: RefCell::new(HashMap::new()),
            next_id: Cell::new(0),
        }
    }

    /// Call `callback` every time `event` fires.
    pub fn on<F>(&self, event: &str, callback: F)
    where
        F: Fn(&T, &P) -> Result<()> + 'static,
    {
        self.register(event, false, Rc::new(callback));
    }

    /// Call `callback` the next time `event` fires, then forget it.
    pub fn once<F>(&self, event: &str, callback: F)
    where
        F: Fn(&T, &P) -> Result<()> + 'static,
    {
        self.register(event, true, Rc::new(callback));
    }

    fn register(&self, event: &str, once: bool, callback: Callback<T, P>) {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.listeners
            .borrow_mut()
            .entry(event.to_string())
            .or_default()
            .push(Entry { id, once, callback });
    }

    pub fn fire(&self, target: &T, event: &str, payload: &P) -> Result<()> {
        let snapshot: Vec<(u64, bool, Callback<T, P>)> = match self.listeners.borrow().get(event) {
            Some(entries) => entries.iter().map(|e| (e.id, e.once, e.callback.clone())).collect(),
            None => return Ok(()),
        };

        for (id, once, callback) in snapshot {
            if once && !self.remove(event, id) {
                // Already taken by a nested fire of the same event
                continue;
            }
            callback(target, payload)?;
        }
        Ok(())
    }

    fn remove(&self, event: &str, id: u64) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let Some(entries) = listeners.get_mut(event) else {
            return false;
        };
        let before = entries.len();
        entries.retain(|e| e.id != id);
        entries.len() != before
    }

    pub fn listener_count(&self, event: &str) -> usize {
        self.listeners.borrow().get(event).map_or(0, Vec::len)
    }
}

impl<T, P> Default for EventBus<T, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, P> fmt::Debug for EventBus<T, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let listeners = self.listeners.borrow();
        let mut map = f.debug_map();
        for (event, entries) in listeners.iter() {
            map.entry(event, &entries.len());
        }
        map.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::bail;

    struct Target {
        name: &'static str,
        bus: EventBus<Target, u32>,
    }

    fn target() -> Rc<Target> {
        Rc::new(Target { name: "panel", bus: EventBus::new() })
    }

    #[test]
    fn listeners_run_in_registration_order_with_payload() {
        let t = target();
        let log = Rc::new(RefCell::new(Vec::new()));
        for tag in ["a", "b", "c"] {
            let log = log.clone();
            t.bus.on("tick", move |target, n| {
                log.borrow_mut().push(format!("{tag}:{}:{n}", target.name));
                Ok(())
            });
        }
        t.bus.fire(&t, "tick", &7).unwrap();
        assert_eq!(*log.borrow(), ["a:panel:7", "b:panel:7", "c:panel:7"]);
    }

    #[test]
    fn once_listener_runs_a_single_time() {
        let t = target();
        let count = Rc::new(Cell::new(0));
        let c = count.clone();
        t.bus.once("tick", move |_, _| {
            c.set(c.get() + 1);
            Ok(())
        });
        t.bus.fire(&t, "tick", &0).unwrap();
        t.bus.fire(&t, "tick", &0).unwrap();
        assert_eq!(count.get(), 1);
        assert_eq!(t.bus.listener_count("tick"), 0);
    }

    #[test]
    fn listener_added_during_fire_waits_for_next_fire() {
        let t = target();
        let count = Rc::new(Cell::new(0));
        let c = count.clone();
        t.bus.once("tick", move |target, _| {
            let c = c.clone();
            target.bus.on("tick", move |_, _| {
                c.set(c.get() + 1);
                Ok(())
            });
            Ok(())
        });
        t.bus.fire(&t, "tick", &0).unwrap();
        assert_eq!(count.get(), 0);
        t.bus.fire(&t, "tick", &0).unwrap();
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn failing_listener_stops_delivery_and_propagates() {
        let t = target();
        let reached = Rc::new(Cell::new(false));
        t.bus.on("tick", |_, _| bail!("setup bug"));
        let r = reached.clone();
        t.bus.on("tick", move |_, _| {
            r.set(true);
            Ok(())
        });
        let err = t.bus.fire(&t, "tick", &0).unwrap_err();
        assert_eq!(err.to_string(), "setup bug");
        assert!(!reached.get());
    }

    #[test]
    fn once_listener_survives_an_aborted_fire() {
        let t = target();
        let failed = Rc::new(Cell::new(false));
        let f = failed.clone();
        t.bus.on("tick", move |_, _| {
            if f.replace(true) {
                Ok(())
            } else {
                bail!("first tick fails")
            }
        });
        let count = Rc::new(Cell::new(0));
        let c = count.clone();
        t.bus.once("tick", move |_, _| {
            c.set(c.get() + 1);
            Ok(())
        });

        assert!(t.bus.fire(&t, "tick", &0).is_err());
        assert_eq!(t.bus.listener_count("tick"), 2);
        t.bus.fire(&t, "tick", &0).unwrap();
        t.bus.fire(&t, "tick", &0).unwrap();
        assert_eq!(count.get(), 1);
        assert_eq!(t.bus.listener_count("tick"), 1);
    }

    #[test]
    fn nested_fire_does_not_repeat_a_once_listener() {
        let t = target();
        let count = Rc::new(Cell::new(0));
        t.bus.on("tick", |target, n| {
            if *n == 0 {
                target.bus.fire(target, "tick", &1)?;
            }
            Ok(())
        });
        let c = count.clone();
        t.bus.once("tick", move |_, _| {
            c.set(c.get() + 1);
            Ok(())
        });
        t.bus.fire(&t, "tick", &0).unwrap();
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn unknown_event_is_a_no_op() {
        let t = target();
        assert!(t.bus.fire(&t, "nothing", &0).is_ok());
        assert_eq!(t.bus.listener_count("nothing"), 0);
    }
}
