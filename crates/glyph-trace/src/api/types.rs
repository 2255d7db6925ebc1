use bytemuck::{Pod, Zeroable};

/// Index of a marker within its glyph's marker list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarkerId(pub u32);

/// Why a touch event was not accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RejectReason {
    /// Touch-down was not near the start (or resume) sample.
    InvalidStart,
    /// Touch-move strayed beyond the tolerance radius.
    TooFarFromPath,
    /// Touch-move landed on a part of the path already traced.
    Backtrack,
    /// Finger lifted mid-trace while resuming is disabled; progress was discarded.
    LiftedBeforeEnd,
}

/// Discrete signals for the host (audio cues, haptics, dialogs).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressEvent {
    Started,
    Advanced(usize),
    Rejected(RejectReason),
    MarkerTouched(MarkerId),
    Completed,
}

/// Flat form of a [`ProgressEvent`] for hosts that read plain float buffers.
/// `kind` identifies the variant, `a` carries the payload.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct EventRecord {
    pub kind: f32,
    pub a: f32,
    pub b: f32,
    pub c: f32,
}

impl EventRecord {
    pub const FLOATS: usize = 4;

    pub const KIND_STARTED: f32 = 1.0;
    pub const KIND_ADVANCED: f32 = 2.0;
    pub const KIND_REJECTED: f32 = 3.0;
    pub const KIND_MARKER_TOUCHED: f32 = 4.0;
    pub const KIND_COMPLETED: f32 = 5.0;
}

impl RejectReason {
    /// Stable numeric code used in [`EventRecord::a`].
    pub fn code(self) -> u32 {
        match self {
            RejectReason::InvalidStart => 0,
            RejectReason::TooFarFromPath => 1,
            RejectReason::Backtrack => 2,
            RejectReason::LiftedBeforeEnd => 3,
        }
    }
}

impl From<ProgressEvent> for EventRecord {
    fn from(event: ProgressEvent) -> Self {
        let (kind, a) = match event {
            ProgressEvent::Started => (Self::KIND_STARTED, 0.0),
            ProgressEvent::Advanced(idx) => (Self::KIND_ADVANCED, idx as f32),
            ProgressEvent::Rejected(reason) => (Self::KIND_REJECTED, reason.code() as f32),
            ProgressEvent::MarkerTouched(id) => (Self::KIND_MARKER_TOUCHED, id.0 as f32),
            ProgressEvent::Completed => (Self::KIND_COMPLETED, 0.0),
        };
        Self { kind, a, b: 0.0, c: 0.0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::size_of;

    #[test]
    fn event_record_is_16_bytes() {
        assert_eq!(size_of::<EventRecord>(), EventRecord::FLOATS * 4);
    }

    #[test]
    fn records_carry_payload() {
        let rec = EventRecord::from(ProgressEvent::Advanced(42));
        assert_eq!(rec.kind, EventRecord::KIND_ADVANCED);
        assert_eq!(rec.a, 42.0);

        let rec = EventRecord::from(ProgressEvent::Rejected(RejectReason::Backtrack));
        assert_eq!(rec.kind, EventRecord::KIND_REJECTED);
        assert_eq!(rec.a, 2.0);

        let rec = EventRecord::from(ProgressEvent::MarkerTouched(MarkerId(3)));
        assert_eq!(rec.kind, EventRecord::KIND_MARKER_TOUCHED);
        assert_eq!(rec.a, 3.0);
    }
}
