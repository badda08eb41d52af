//! Project-scoped connection registry.
//!
//! Plain synchronous state. Only the hub loop owns an instance.

use std::collections::{HashMap, HashSet};

use super::connection::{Connection, ConnectionId};

struct Entry {
    connection: Connection,
    projects: HashSet<String>,
}

/// Outcome of one fan-out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Delivery {
    pub delivered: usize,
    pub dropped: usize,
}

#[derive(Default)]
pub(crate) struct Registry {
    projects: HashMap<String, HashSet<ConnectionId>>,
    connections: HashMap<ConnectionId, Entry>,
}

impl Registry {
    /// Subscribe `connection` to `project_id`. Returns `false` if it was
    /// already subscribed.
    pub fn register(&mut self, connection: Connection, project_id: &str) -> bool {
        let id = connection.id();
        let entry = self.connections.entry(id).or_insert_with(|| Entry {
            connection,
            projects: HashSet::new(),
        });
        if !entry.projects.insert(project_id.to_string()) {
            return false;
        }
        self.projects
            .entry(project_id.to_string())
            .or_default()
            .insert(id);
        true
    }

    /// Remove a connection from every project and close it. Returns
    /// `false` if it was not registered.
    pub fn unregister(&mut self, id: ConnectionId) -> bool {
        let Some(entry) = self.connections.remove(&id) else {
            return false;
        };
        for project_id in &entry.projects {
            if let Some(subscribers) = self.projects.get_mut(project_id) {
                subscribers.remove(&id);
                if subscribers.is_empty() {
                    self.projects.remove(project_id);
                }
            }
        }
        entry.connection.close();
        true
    }

    /// Enqueue `frame` on every subscriber of `project_id`. Subscribers
    /// whose queue rejects the frame are unregistered.
    pub fn broadcast(&mut self, project_id: &str, frame: &str) -> Delivery {
        let Some(subscribers) = self.projects.get(project_id) else {
            return Delivery::default();
        };

        let mut delivery = Delivery::default();
        let mut dead = Vec::new();
        for id in subscribers {
            let Some(entry) = self.connections.get(id) else {
                continue;
            };
            if entry.connection.try_deliver(frame.to_string()) {
                delivery.delivered += 1;
            } else {
                dead.push(*id);
            }
        }

        for id in dead {
            if self.unregister(id) {
                delivery.dropped += 1;
            }
        }
        delivery
    }

    pub fn subscriber_count(&self, project_id: &str) -> usize {
        self.projects.get(project_id).map_or(0, HashSet::len)
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Close and forget every connection.
    pub fn clear(&mut self) {
        for (_, entry) in self.connections.drain() {
            entry.connection.close();
        }
        self.projects.clear();
    }
}
