//! Per-processor change broadcast/poll protocol.
//!
//! Every write to a processor parameter is broadcast as a set of dirty bits,
//! one word per *participant* (consumer category: editor, table view,
//! multi-object surface, network protocol layer, host). Each participant
//! later polls and clears its own word independently. The originator of a
//! write is excluded from its own broadcast, which is what prevents a
//! network-origin change from echoing back onto the wire.
//!
//! Storage is one atomic word per participant: `broadcast` ORs bits in,
//! `poll` clears exactly the requested bits with a single read-modify-write.
//! Bits are never lost between a broadcast and the poll that clears them,
//! and participants never block each other.

use std::sync::atomic::{AtomicU32, Ordering};

/// Bitmask of change types, see [`change`].
pub type ChangeMask = u32;

/// Change-type bits, independent of which participant is notified.
pub mod change {
    use super::ChangeMask;

    /// Nothing changed.
    pub const NONE: ChangeMask = 0;
    /// Object position changed. X and Y writes both raise this single
    /// combined bit; consumers re-read both coordinates.
    pub const POSITION: ChangeMask = 1 << 0;
    /// Reverb send gain changed.
    pub const REVERB_SEND_GAIN: ChangeMask = 1 << 1;
    /// Object spread factor changed.
    pub const SPREAD: ChangeMask = 1 << 2;
    /// Delay mode selection changed.
    pub const DELAY_MODE: ChangeMask = 1 << 3;
    /// Matrix channel gain changed.
    pub const GAIN: ChangeMask = 1 << 4;
    /// Matrix channel mute state changed.
    pub const MUTE: ChangeMask = 1 << 5;
    /// Processor communication mode (Rx/Tx) changed.
    pub const COMS_MODE: ChangeMask = 1 << 6;
    /// Remote channel mapping of the processor changed.
    pub const MAPPING: ChangeMask = 1 << 7;
    /// All change types.
    pub const ALL: ChangeMask = (1 << 8) - 1;
}

/// An identified consumer/producer category of parameter changes.
///
/// The enumeration is closed and process-wide; each engine keeps one dirty
/// word per participant per processor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum Participant {
    /// The processor's own plugin editor window.
    Editor = 0,
    /// The channel table view.
    TableView = 1,
    /// The multi-object 2D surface.
    MultiSurface = 2,
    /// The network/bridging protocol layer.
    Protocol = 3,
    /// The plugin host (automation lanes).
    Host = 4,
}

impl Participant {
    /// Number of participant identities.
    pub const COUNT: usize = 5;

    /// All participants, in index order.
    pub const ALL: [Participant; Self::COUNT] = [
        Participant::Editor,
        Participant::TableView,
        Participant::MultiSurface,
        Participant::Protocol,
        Participant::Host,
    ];

    /// Participants that are notified even of their own writes.
    ///
    /// These UI surfaces schedule redraws by polling their own dirty flags
    /// instead of updating synchronously inside their edit call, so the
    /// no-self-echo rule does not apply to them. This set is deliberately
    /// explicit rather than inferred.
    pub const SELF_NOTIFY: [Participant; 2] =
        [Participant::Editor, Participant::MultiSurface];

    /// Look up a participant by its index.
    ///
    /// An out-of-range index is a programming error: asserted in debug
    /// builds, `None` (so callers no-op) in release builds.
    pub fn from_index(index: usize) -> Option<Participant> {
        let participant = Self::ALL.get(index).copied();
        debug_assert!(
            participant.is_some(),
            "participant index {index} out of range"
        );
        if participant.is_none() {
            log::warn!("ignoring unknown participant index {index}");
        }
        participant
    }

    /// Whether this participant receives broadcasts it originated itself.
    pub fn is_self_notified(self) -> bool {
        Self::SELF_NOTIFY.contains(&self)
    }
}

/// Per-processor dirty-flag store, one OR-accumulated word per participant.
#[derive(Debug, Default)]
pub struct ChangeRegistry {
    dirty: [AtomicU32; Participant::COUNT],
}

impl ChangeRegistry {
    /// Create a registry with all flags clear.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `mask` dirty for every participant except the originator.
    ///
    /// Participants in [`Participant::SELF_NOTIFY`] are always targeted,
    /// source or not. ORing means concurrent broadcasts never lose bits.
    pub fn broadcast(&self, source: Participant, mask: ChangeMask) {
        if mask == change::NONE {
            return;
        }
        for target in Participant::ALL {
            if target == source && !target.is_self_notified() {
                continue;
            }
            self.dirty[target as usize].fetch_or(mask, Ordering::AcqRel);
        }
    }

    /// Non-destructive test: does `participant` have any of `mask` pending?
    pub fn changed(&self, participant: Participant, mask: ChangeMask) -> bool {
        self.dirty[participant as usize].load(Ordering::Acquire) & mask != change::NONE
    }

    /// Test and clear: atomically reads `participant`'s word, clears exactly
    /// the bits in `mask` and reports whether any of them were set.
    ///
    /// Bits outside `mask` are left untouched, so a consumer polling a
    /// subset never disturbs its remaining pending changes.
    pub fn poll(&self, participant: Participant, mask: ChangeMask) -> bool {
        let previous = self.dirty[participant as usize].fetch_and(!mask, Ordering::AcqRel);
        previous & mask != change::NONE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_broadcast_skips_source() {
        let registry = ChangeRegistry::new();
        registry.broadcast(Participant::Protocol, change::POSITION);

        assert!(!registry.changed(Participant::Protocol, change::POSITION));
        assert!(registry.changed(Participant::TableView, change::POSITION));
        assert!(registry.changed(Participant::Host, change::POSITION));
    }

    #[test]
    fn test_self_notify_surfaces_see_own_writes() {
        let registry = ChangeRegistry::new();
        registry.broadcast(Participant::Editor, change::GAIN);
        assert!(registry.changed(Participant::Editor, change::GAIN));

        registry.broadcast(Participant::MultiSurface, change::POSITION);
        assert!(registry.changed(Participant::MultiSurface, change::POSITION));
    }

    #[test]
    fn test_poll_is_idempotent() {
        let registry = ChangeRegistry::new();
        registry.broadcast(Participant::Protocol, change::MUTE);

        assert!(registry.poll(Participant::TableView, change::MUTE));
        assert!(!registry.poll(Participant::TableView, change::MUTE));
    }

    #[test]
    fn test_disjoint_masks_accumulate() {
        let registry = ChangeRegistry::new();
        registry.broadcast(Participant::Protocol, change::POSITION);
        registry.broadcast(Participant::Host, change::SPREAD);

        // One poll over the union reports both pending bits.
        assert!(registry.changed(
            Participant::TableView,
            change::POSITION | change::SPREAD
        ));
        assert!(registry.poll(Participant::TableView, change::POSITION));
        // The spread bit survived the position poll.
        assert!(registry.poll(Participant::TableView, change::SPREAD));
    }

    #[test]
    fn test_poll_clears_only_requested_bits() {
        let registry = ChangeRegistry::new();
        registry.broadcast(Participant::Host, change::GAIN | change::MUTE);

        assert!(registry.poll(Participant::TableView, change::GAIN));
        assert!(registry.changed(Participant::TableView, change::MUTE));
    }

    #[test]
    fn test_poll_scoped_to_one_participant() {
        let registry = ChangeRegistry::new();
        registry.broadcast(Participant::Protocol, change::POSITION);

        assert!(registry.poll(Participant::TableView, change::POSITION));
        // Another participant's flags are untouched by that poll.
        assert!(registry.changed(Participant::Editor, change::POSITION));
    }

    #[test]
    fn test_broadcast_none_is_noop() {
        let registry = ChangeRegistry::new();
        registry.broadcast(Participant::Protocol, change::NONE);
        assert!(!registry.changed(Participant::TableView, change::ALL));
    }

    #[test]
    fn test_from_index_round_trip() {
        for participant in Participant::ALL {
            assert_eq!(
                Participant::from_index(participant as usize),
                Some(participant)
            );
        }
    }

    #[test]
    fn test_two_participant_scenario() {
        // Protocol applies an inbound network value; the table view sees it,
        // the protocol layer itself must not (no echo loop).
        let registry = ChangeRegistry::new();
        registry.broadcast(Participant::Protocol, change::POSITION);

        assert!(!registry.changed(Participant::Protocol, change::POSITION));
        assert!(registry.changed(Participant::TableView, change::POSITION));
        assert!(registry.poll(Participant::TableView, change::POSITION));
        assert!(!registry.changed(Participant::TableView, change::POSITION));
    }
}
