//! The two-party room: maps transport addresses to registered peers.
//!
//! The room is owned exclusively by the dispatch loop, so no locking is
//! needed; if receipt is ever parallelized this needs equivalent protection.

use std::collections::HashMap;
use std::net::SocketAddr;

/// One registered participant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Peer {
    pub addr: SocketAddr,
    pub name: String,
}

/// A pairing of at most two participants, keyed by stringified address.
#[derive(Debug, Default)]
pub struct Room {
    peers: HashMap<String, Peer>,
}

impl Room {
    pub fn new() -> Self {
        Self::default()
    }

    /// True only when two *other* distinct addresses are already registered.
    ///
    /// An address that is itself one of the two occupants is never shut out.
    pub fn is_full(&self, addr: SocketAddr) -> bool {
        if self.peers.len() < 2 {
            return false;
        }
        !self.peers.contains_key(&addr.to_string())
    }

    /// Resolves the registered participant that is not `addr`, if any.
    pub fn other_peer(&self, addr: SocketAddr) -> Option<SocketAddr> {
        let key = addr.to_string();
        self.peers
            .iter()
            .find(|(k, _)| **k != key)
            .map(|(_, peer)| peer.addr)
    }

    /// Registers (or re-registers) a participant.
    pub fn add(&mut self, addr: SocketAddr, name: String) {
        self.peers.insert(addr.to_string(), Peer { addr, name });
    }

    /// Removes a participant on its departure signal.
    pub fn remove(&mut self, addr: SocketAddr) {
        self.peers.remove(&addr.to_string());
    }

    /// Looks up the registered peer for an address.
    pub fn get(&self, addr: SocketAddr) -> Option<&Peer> {
        self.peers.get(&addr.to_string())
    }

    pub fn len(&self) -> usize {
        self.peers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(last_octet: u8, port: u16) -> SocketAddr {
        format!("10.0.0.{last_octet}:{port}").parse().unwrap()
    }

    #[test]
    fn test_empty_room_is_not_full_for_anyone() {
        let room = Room::new();
        assert!(!room.is_full(addr(1, 1000)));
    }

    #[test]
    fn test_room_with_one_peer_is_not_full() {
        let mut room = Room::new();
        room.add(addr(1, 1000), "alice".to_string());
        assert!(!room.is_full(addr(2, 2000)));
    }

    #[test]
    fn test_third_distinct_address_sees_a_full_room() {
        // Registering A then B: C is shut out, A and B are not.
        let (a, b, c) = (addr(1, 1000), addr(2, 2000), addr(3, 3000));
        let mut room = Room::new();
        room.add(a, "alice".to_string());
        room.add(b, "bob".to_string());

        assert!(room.is_full(c));
        assert!(!room.is_full(a));
        assert!(!room.is_full(b));
    }

    #[test]
    fn test_other_peer_resolves_the_counterpart() {
        let (a, b) = (addr(1, 1000), addr(2, 2000));
        let mut room = Room::new();
        room.add(a, "alice".to_string());
        room.add(b, "bob".to_string());

        assert_eq!(room.other_peer(a), Some(b));
        assert_eq!(room.other_peer(b), Some(a));
    }

    #[test]
    fn test_other_peer_is_none_when_alone() {
        let a = addr(1, 1000);
        let mut room = Room::new();
        room.add(a, "alice".to_string());
        assert_eq!(room.other_peer(a), None);
    }

    #[test]
    fn test_other_peer_is_none_in_empty_room() {
        assert_eq!(Room::new().other_peer(addr(1, 1000)), None);
    }

    #[test]
    fn test_remove_frees_a_slot() {
        let (a, b, c) = (addr(1, 1000), addr(2, 2000), addr(3, 3000));
        let mut room = Room::new();
        room.add(a, "alice".to_string());
        room.add(b, "bob".to_string());
        assert!(room.is_full(c));

        room.remove(a);
        assert!(!room.is_full(c));
        assert_eq!(room.other_peer(c), Some(b));
    }

    #[test]
    fn test_re_registering_same_address_does_not_duplicate() {
        let a = addr(1, 1000);
        let mut room = Room::new();
        room.add(a, "alice".to_string());
        room.add(a, "alice2".to_string());

        assert_eq!(room.len(), 1);
        assert_eq!(room.get(a).unwrap().name, "alice2");
    }

    #[test]
    fn test_same_ip_different_port_counts_as_distinct_peer() {
        let mut room = Room::new();
        room.add(addr(1, 1000), "alice".to_string());
        room.add(addr(1, 1001), "bob".to_string());
        assert_eq!(room.len(), 2);
        assert!(room.is_full(addr(1, 1002)));
    }
}
