//! Unit tests for tdsim-net.

#[cfg(test)]
mod eye {
    use tdsim_core::NodeId;

    use crate::AllSeeingEye;

    #[test]
    fn all_nodes_start_alive() {
        let eye = AllSeeingEye::new(3, NodeId(0));
        assert!(eye.is_alive(NodeId(0)));
        assert!(eye.is_alive(NodeId(1)));
        assert!(eye.is_alive(NodeId(2)));
    }

    #[test]
    fn join_and_leave() {
        let mut eye = AllSeeingEye::new(3, NodeId(0));
        eye.join(NodeId(1));
        assert!(eye.is_alive(NodeId(1)));
        eye.leave(NodeId(1));
        assert!(!eye.is_alive(NodeId(1)));
    }

    #[test]
    fn leave_is_idempotent() {
        let mut eye = AllSeeingEye::new(2, NodeId(0));
        eye.leave(NodeId(0));
        eye.leave(NodeId(0));
        assert!(!eye.is_alive(NodeId(0)));
    }

    #[test]
    fn alive_except_excludes_self() {
        let mut eye = AllSeeingEye::new(3, NodeId(0));
        eye.join(NodeId(1));
        eye.join(NodeId(2));
        let others = eye.alive_except(NodeId(1));
        assert_eq!(others.len(), 2);
        assert!(!others.contains(&NodeId(1)));
    }

    #[test]
    fn all_except_ignores_tree_membership() {
        let eye = AllSeeingEye::new(3, NodeId(0));
        let others = eye.all_except(NodeId(0));
        assert_eq!(others, vec![NodeId(1), NodeId(2)]);
    }

    #[test]
    fn is_known_bounds_check() {
        let eye = AllSeeingEye::new(3, NodeId(0));
        assert!(eye.is_known(NodeId(2)));
        assert!(!eye.is_known(NodeId(3)));
    }
}

#[cfg(test)]
mod transport {
    use tdsim_core::NodeId;
    use tdsim_message::Message;

    use crate::{InMemoryTransport, NetError, Transport};

    #[test]
    fn delivery_is_deferred_to_next_call() {
        let mut t = InMemoryTransport::new(3);
        t.send(NodeId(0), NodeId(1), Message::basic(NodeId(0), NodeId(1))).unwrap();
        let first = t.deliver();
        assert_eq!(first[1].len(), 1);
        let second = t.deliver();
        assert!(second[1].is_empty());
    }

    #[test]
    fn per_sender_order_preserved() {
        let mut t = InMemoryTransport::new(2);
        t.send(NodeId(0), NodeId(1), Message::basic(NodeId(0), NodeId(1))).unwrap();
        t.send(NodeId(0), NodeId(1), Message::control_ack(NodeId(0), NodeId(1))).unwrap();
        let delivered = t.deliver();
        assert!(matches!(delivered[1][0], Message::Basic { .. }));
        assert!(matches!(delivered[1][1], Message::ControlAck { .. }));
    }

    #[test]
    fn unknown_destination_is_rejected() {
        let mut t = InMemoryTransport::new(2);
        let err = t.send(NodeId(0), NodeId(5), Message::basic(NodeId(0), NodeId(5))).unwrap_err();
        assert!(matches!(err, NetError::UnknownNode(NodeId(5))));
    }
}
