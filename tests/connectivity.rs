#![allow(clippy::unwrap_used)]

use std::collections::BTreeSet;

use wirenet::math::Point2;
use wirenet::{ConnectorId, Wire, WireId, WireSystem};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn line(system: &mut WireSystem, points: &[(f64, f64)]) -> WireId {
    system.add_wire(Wire::from_positions(
        points.iter().map(|&(x, y)| Point2::new(x, y)),
    ))
}

/// a ─ b ─ c, joined end to end.
fn chain(system: &mut WireSystem) -> (WireId, WireId, WireId) {
    let a = line(system, &[(0.0, 0.0), (100.0, 0.0)]);
    let b = line(system, &[(100.0, 0.0), (100.0, 100.0)]);
    let c = line(system, &[(100.0, 100.0), (200.0, 100.0)]);
    system.generate_junctions();
    (a, b, c)
}

fn members(system: &WireSystem, wire: WireId) -> BTreeSet<WireId> {
    let net = system.net_of(wire).unwrap();
    system.net(net).unwrap().wires().iter().copied().collect()
}

#[test]
fn tee_junction_is_discovered_and_split_again() {
    init_tracing();
    let mut system = WireSystem::new();
    let w1 = line(&mut system, &[(0.0, 0.0), (100.0, 0.0)]);
    let w2 = line(&mut system, &[(50.0, 0.0), (50.0, 100.0)]);

    system.generate_junctions();
    assert_eq!(system.net_of(w1), system.net_of(w2));
    assert!(system.wire(w2).unwrap().points()[0].is_junction);
    assert_eq!(system.wires_connected_to(w1), BTreeSet::from([w1, w2]));
    assert_eq!(system.nets().len(), 1);

    assert!(system.disconnect_wire(w1, w2));
    assert_ne!(system.net_of(w1), system.net_of(w2));
    assert_eq!(members(&system, w1), BTreeSet::from([w1]));
    assert_eq!(members(&system, w2), BTreeSet::from([w2]));
}

#[test]
fn collinear_points_are_simplified_away() {
    let mut system = WireSystem::new();
    let w = line(&mut system, &[(0.0, 0.0), (50.0, 0.0), (100.0, 0.0)]);

    system.simplify(w);
    assert_eq!(
        system.wire(w).unwrap().positions(),
        vec![Point2::new(0.0, 0.0), Point2::new(100.0, 0.0)]
    );
}

#[test]
fn connector_index_follows_point_removal() {
    let mut system = WireSystem::new();
    let w = line(&mut system, &[(0.0, 0.0), (50.0, 0.0), (100.0, 0.0)]);
    system.attach_connector(w, 1, ConnectorId(9));

    system.remove_point(w, 0);
    assert_eq!(system.attached_point_index(ConnectorId(9)), Some(0));
    assert_eq!(system.attached_wire(ConnectorId(9)), Some(w));
}

#[test]
fn connecting_merges_nets() {
    let mut system = WireSystem::new();
    let a = line(&mut system, &[(0.0, 0.0), (10.0, 0.0)]);
    let b = line(&mut system, &[(0.0, 50.0), (10.0, 50.0)]);
    let c = line(&mut system, &[(0.0, 90.0), (10.0, 90.0)]);
    system.connect_wire(b, c);
    let (na, nb) = (system.net_of(a).unwrap(), system.net_of(b).unwrap());

    assert!(system.connect_wire(a, b));
    assert!(!system.connect_wire(a, b));
    assert!(!system.connect_wire(b, a));
    assert_eq!(members(&system, a), BTreeSet::from([a, b, c]));
    assert_eq!(system.net_of(c), Some(na));
    assert!(system.net(nb).is_err());
}

#[test]
fn reachability_is_symmetric() {
    let mut system = WireSystem::new();
    let (a, b, c) = chain(&mut system);

    for w in [a, b, c] {
        let reached = system.wires_connected_to(w);
        assert!(reached.contains(&w));
        for other in &reached {
            assert!(system.wires_connected_to(*other).contains(&w));
        }
    }
}

#[test]
fn disconnect_partitions_or_keeps_the_net() {
    let mut system = WireSystem::new();
    let (a, b, c) = chain(&mut system);
    let original = members(&system, a);

    system.disconnect_wire(b, c);
    let left = members(&system, a);
    let right = members(&system, c);
    assert_eq!(left, BTreeSet::from([a, b]));
    assert_eq!(right, BTreeSet::from([c]));
    assert_eq!(left.union(&right).copied().collect::<BTreeSet<_>>(), original);

    let mut ring = WireSystem::new();
    let x = line(&mut ring, &[(0.0, 0.0), (10.0, 0.0)]);
    let y = line(&mut ring, &[(0.0, 20.0), (10.0, 20.0)]);
    let z = line(&mut ring, &[(0.0, 40.0), (10.0, 40.0)]);
    ring.connect_wire(x, y);
    ring.connect_wire(y, z);
    ring.connect_wire(z, x);

    ring.disconnect_wire(x, y);
    assert_eq!(ring.nets().len(), 1);
    assert_eq!(members(&ring, x), BTreeSet::from([x, y, z]));
}

#[test]
fn removing_wires_updates_net_registry() {
    let mut system = WireSystem::new();
    let (a, b, c) = chain(&mut system);
    let lone = line(&mut system, &[(0.0, 500.0), (10.0, 500.0)]);
    assert_eq!(system.nets().len(), 2);

    assert!(system.remove_wire(lone));
    assert_eq!(system.nets().len(), 1);
    assert!(!system.remove_wire(lone));

    assert!(system.remove_wire(c));
    assert_eq!(system.nets().len(), 1);
    assert_eq!(system.wire(b).unwrap().junctions(), vec![0]);
    assert_eq!(members(&system, a), BTreeSet::from([a, b]));
}

#[test]
fn removing_a_bridge_splits_the_net() {
    let mut system = WireSystem::new();
    let (a, b, c) = chain(&mut system);

    system.remove_wire(b);
    assert_eq!(system.nets().len(), 2);
    assert_ne!(system.net_of(a), system.net_of(c));
    assert!(system.wire(a).unwrap().junctions().is_empty());
    assert!(system.wire(c).unwrap().junctions().is_empty());
}

#[test]
fn user_drag_connects_and_disconnects_endpoints() {
    let mut system = WireSystem::new();
    let w1 = line(&mut system, &[(0.0, 0.0), (100.0, 0.0)]);
    let w2 = line(&mut system, &[(50.0, 50.0), (50.0, 100.0)]);

    system.move_point_to(w2, 0, Point2::new(50.0, 0.0));
    system.point_moved_by_user(w2, 0);
    assert!(system.are_connected(w1, w2));
    assert_eq!(system.net_of(w1), system.net_of(w2));
    assert!(system.wire(w2).unwrap().points()[0].is_junction);

    system.move_point_to(w2, 0, Point2::new(50.0, 30.0));
    system.point_moved_by_user(w2, 0);
    assert!(!system.are_connected(w1, w2));
    assert_ne!(system.net_of(w1), system.net_of(w2));
    assert!(system.wire(w2).unwrap().junctions().is_empty());
}

#[test]
fn hit_test_uses_tolerance() {
    let mut system = WireSystem::new();
    let w = line(&mut system, &[(0.0, 0.0), (100.0, 0.0)]);

    assert_eq!(system.hit_test(&Point2::new(30.0, 0.8)), Some(w));
    assert_eq!(system.hit_test(&Point2::new(30.0, 5.0)), None);
    assert_eq!(system.wire_with_point_at(&Point2::new(100.0, 0.0)), Some(w));
}
