use ocpn_layout::graph_view::GraphView;
use ocpn_layout::layout::{Layout, LayoutStage};
use ocpn_layout::{Config, Error, Net, NetArc, Place, Transition, acyclic};
use std::collections::{BTreeMap, VecDeque};

fn net(places: &[&str], transitions: &[&str], arcs: &[(&str, &str, &str)]) -> Net {
    let mut net = Net::new();
    for p in places {
        net.add_place(Place::new(*p, "order")).unwrap();
    }
    for t in transitions {
        net.add_transition(Transition::new(*t, *t)).unwrap();
    }
    for (id, s, t) in arcs {
        net.add_arc(NetArc::new(*id, *s, *t)).unwrap();
    }
    net
}

fn four_cycle() -> Net {
    let mut n = Net::new();
    n.add_place(Place::new("P1", "order")).unwrap();
    n.add_transition(Transition::new("T1", "t1")).unwrap();
    n.add_place(Place::new("P2", "order")).unwrap();
    n.add_transition(Transition::new("T2", "t2")).unwrap();
    for (id, s, t) in [
        ("a1", "P1", "T1"),
        ("a2", "T1", "P2"),
        ("a3", "P2", "T2"),
        ("a4", "T2", "P1"),
    ] {
        n.add_arc(NetArc::new(id, s, t)).unwrap();
    }
    n
}

fn reversed_ids(layout: &Layout) -> Vec<&str> {
    layout
        .arcs
        .values()
        .filter(|a| a.reversed)
        .map(|a| a.id.as_str())
        .collect()
}

fn is_acyclic(layout: &Layout) -> bool {
    let mut in_degree: BTreeMap<&str, usize> =
        layout.nodes.keys().map(|k| (k.as_str(), 0)).collect();
    for a in layout.arcs.values() {
        *in_degree.get_mut(a.lower()).unwrap() += 1;
    }
    let mut queue: VecDeque<&str> = in_degree
        .iter()
        .filter(|(_, d)| **d == 0)
        .map(|(v, _)| *v)
        .collect();
    let mut seen = 0;
    while let Some(v) = queue.pop_front() {
        seen += 1;
        for a in layout.arcs.values().filter(|a| a.upper() == v) {
            let d = in_degree.get_mut(a.lower()).unwrap();
            *d -= 1;
            if *d == 0 {
                queue.push_back(a.lower());
            }
        }
    }
    seen == layout.nodes.len()
}

#[test]
fn acyclic_reverses_one_arc_of_a_two_cycle() {
    let net = net(
        &["P1", "P2"],
        &["T"],
        &[("a1", "P1", "T"), ("a2", "T", "P2"), ("a3", "P2", "T")],
    );
    let mut layout = Layout::from_net(&net);
    acyclic::run(&mut layout, &Config::default()).unwrap();

    assert_eq!(reversed_ids(&layout), ["a2"]);
    assert_eq!(layout.stats.reversed_arcs, 1);
    assert_eq!(layout.stage(), LayoutStage::CyclesBroken);
    assert!(is_acyclic(&layout));
}

#[test]
fn acyclic_keeps_endpoints_of_reversed_arcs() {
    let net = net(
        &["P1", "P2"],
        &["T"],
        &[("a1", "P1", "T"), ("a2", "T", "P2"), ("a3", "P2", "T")],
    );
    let mut layout = Layout::from_net(&net);
    acyclic::run(&mut layout, &Config::default()).unwrap();

    let arc = layout.arc("a2").unwrap();
    assert_eq!((arc.source.as_str(), arc.target.as_str()), ("T", "P2"));
    assert_eq!((arc.upper(), arc.lower()), ("P2", "T"));
}

#[test]
fn acyclic_breaks_a_plain_cycle_at_the_first_inserted_node() {
    let mut layout = Layout::from_net(&four_cycle());
    acyclic::run(&mut layout, &Config::default()).unwrap();
    assert_eq!(reversed_ids(&layout), ["a4"]);
}

#[test]
fn acyclic_honours_seeded_sources() {
    let mut layout = Layout::from_net(&four_cycle());
    let config = Config {
        sources: vec!["P2".to_string()],
        ..Config::default()
    };
    acyclic::run(&mut layout, &config).unwrap();
    assert_eq!(reversed_ids(&layout), ["a2"]);
    assert!(is_acyclic(&layout));
}

#[test]
fn acyclic_honours_seeded_sinks() {
    let mut layout = Layout::from_net(&four_cycle());
    let config = Config {
        sinks: vec!["P2".to_string()],
        ..Config::default()
    };
    acyclic::run(&mut layout, &config).unwrap();
    assert_eq!(reversed_ids(&layout), ["a3"]);
}

#[test]
fn feedback_order_treats_nodes_seeded_twice_as_sources() {
    let view = GraphView::new(
        ["P1", "T1", "P2", "T2"],
        [("P1", "T1"), ("T1", "P2"), ("P2", "T2"), ("T2", "P1")],
    );
    let order = acyclic::feedback_order(
        view,
        &["P2".to_string(), "missing".to_string()],
        &["P2".to_string()],
    );
    assert_eq!(order, ["P2", "T2", "P1", "T1"]);
}

#[test]
fn feedback_order_is_a_topological_order_of_a_dag() {
    let view = GraphView::new(
        ["c", "b", "a"],
        [("a", "b"), ("b", "c"), ("a", "c")],
    );
    let order = acyclic::feedback_order(view, &[], &[]);
    assert_eq!(order, ["a", "b", "c"]);
}

#[test]
fn acyclic_leaves_dags_untouched() {
    let net = net(
        &["P1", "P2", "P3"],
        &["T1", "T2"],
        &[
            ("a1", "P1", "T1"),
            ("a2", "T1", "P2"),
            ("a3", "P2", "T2"),
            ("a4", "T2", "P3"),
            ("a5", "P1", "T2"),
        ],
    );
    let mut layout = Layout::from_net(&net);
    acyclic::run(&mut layout, &Config::default()).unwrap();
    assert!(reversed_ids(&layout).is_empty());
}

#[test]
fn acyclic_rejects_a_layout_in_the_wrong_stage() {
    let mut layout = Layout::from_net(&four_cycle());
    acyclic::run(&mut layout, &Config::default()).unwrap();
    let err = acyclic::run(&mut layout, &Config::default()).unwrap_err();
    assert!(matches!(err, Error::InternalInvariant { .. }));
}
