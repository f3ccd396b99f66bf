//! Unit tests for tq-core primitives.

#[cfg(test)]
mod ids {
    use crate::{ActorId, TicketId};

    #[test]
    fn index_roundtrip() {
        let id = ActorId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(ActorId::try_from(42usize).unwrap(), id);
    }

    #[test]
    fn invalid_sentinels_are_max() {
        assert_eq!(ActorId::INVALID.0, u32::MAX);
        assert_eq!(TicketId::INVALID.0, u64::MAX);
        assert_eq!(ActorId::default(), ActorId::INVALID);
    }

    #[test]
    fn ticket_id_next() {
        assert_eq!(TicketId(7).next(), TicketId(8));
    }

    #[test]
    fn display() {
        assert_eq!(ActorId(7).to_string(), "ActorId(7)");
        assert_eq!(TicketId(3).to_string(), "TicketId(3)");
    }
}

#[cfg(test)]
mod time {
    use crate::Tick;

    #[test]
    fn tick_arithmetic() {
        let t = Tick(10);
        assert_eq!(t + 5, Tick(15));
        assert_eq!(t.checked_offset(3), Some(Tick(13)));
        assert_eq!(Tick(15) - Tick(10), 5u64);
    }

    #[test]
    fn checked_offset_stops_at_max() {
        assert_eq!(Tick(u64::MAX - 1).checked_offset(1), Some(Tick(u64::MAX)));
        assert_eq!(Tick(u64::MAX).checked_offset(1), None);
        assert_eq!(Tick(1).checked_offset(u64::MAX), None);
    }

    #[test]
    #[should_panic(expected = "tick overflow")]
    fn add_past_max_panics() {
        let _ = Tick(u64::MAX) + 1;
    }

    #[test]
    fn signed_diff_goes_negative() {
        assert_eq!(Tick(3).signed_diff(Tick(5)), -2);
        assert_eq!(Tick(5).signed_diff(Tick(3)), 2);
    }

    #[test]
    fn signed_diff_saturates() {
        assert_eq!(Tick(u64::MAX).signed_diff(Tick(0)), i64::MAX);
        assert_eq!(Tick(0).signed_diff(Tick(u64::MAX)), i64::MIN);
        assert_eq!(Tick(1 << 63).signed_diff(Tick(1)), i64::MAX);
    }

    #[test]
    fn display() {
        assert_eq!(Tick(12).to_string(), "T12");
    }
}

#[cfg(test)]
mod ticket {
    use crate::{QueueError, Tick, Ticket, TicketId};

    fn ticket(now: u64, interval: u64, seq: u64) -> Ticket<&'static str> {
        Ticket::new(Tick(now), interval, TicketId(seq), "x").unwrap()
    }

    #[test]
    fn new_sets_time_from_interval() {
        let t = ticket(4, 6, 0);
        assert_eq!(t.insert_time, Tick(4));
        assert_eq!(t.time, Tick(10));
        assert_eq!(t.interval(), 6);
        assert_eq!(t.id(), TicketId(0));
    }

    #[test]
    fn orders_by_time_then_sequence() {
        let early = ticket(0, 1, 5);
        let late = ticket(0, 2, 0);
        assert!(early < late);

        let first = ticket(0, 3, 1);
        let second = ticket(1, 2, 2); // same due tick, scheduled later
        assert!(first < second);
    }

    #[test]
    fn payload_ignored_by_equality() {
        let a = Ticket::new(Tick(0), 1, TicketId(0), 1).unwrap();
        let b = Ticket::new(Tick(0), 1, TicketId(0), 2).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn passed_plus_left_is_interval() {
        let t = ticket(10, 7, 0);
        for now in 5..20 {
            assert_eq!(t.time_passed(Tick(now)) + t.time_left(Tick(now)), 7);
        }
    }

    #[test]
    fn progress_bounds_and_linearity() {
        let t = ticket(0, 4, 0);
        assert_eq!(t.progress(Tick(0)).unwrap(), 0.0);
        assert_eq!(t.progress(Tick(1)).unwrap(), 0.25);
        assert_eq!(t.progress(Tick(2)).unwrap(), 0.5);
        assert_eq!(t.progress(Tick(4)).unwrap(), 1.0);
    }

    #[test]
    fn progress_zero_interval_errors() {
        let t = ticket(3, 0, 9);
        assert_eq!(
            t.progress(Tick(3)),
            Err(QueueError::DegenerateInterval { ticket: TicketId(9) })
        );
    }

    #[test]
    fn new_rejects_due_time_past_max() {
        assert_eq!(
            Ticket::new(Tick(u64::MAX - 2), 3, TicketId(0), ()),
            Err(QueueError::TimeOverflow { clock: Tick(u64::MAX - 2), interval: 3 })
        );
        let edge = Ticket::new(Tick(u64::MAX - 2), 2, TicketId(0), ()).unwrap();
        assert_eq!(edge.time, Tick(u64::MAX));
    }

    #[test]
    fn time_passed_saturates_on_wide_windows() {
        let t = ticket(0, u64::MAX, 0);
        assert_eq!(t.time_left(Tick(0)), i64::MAX);
        assert_eq!(t.time_passed(Tick(u64::MAX)), i64::MAX);
    }
}
