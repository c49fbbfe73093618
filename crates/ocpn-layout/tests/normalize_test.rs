use ocpn_layout::layout::{Layout, LayoutStage};
use ocpn_layout::rank::{self, LongestPathSolver};
use ocpn_layout::{Config, Error, Net, NetArc, NodeKind, Place, Transition, acyclic, normalize};

fn layered(places: &[&str], transitions: &[&str], arcs: &[(&str, &str, &str)]) -> Layout {
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
    let mut layout = Layout::from_net(&net);
    acyclic::run(&mut layout, &Config::default()).unwrap();
    rank::run(&mut layout, &LongestPathSolver).unwrap();
    layout
}

fn layer_skip() -> Layout {
    layered(
        &["P0", "P1"],
        &["T1", "T2"],
        &[
            ("a0", "P0", "T1"),
            ("a1", "T1", "P1"),
            ("a2", "P1", "T2"),
            ("a3", "P0", "T2"),
        ],
    )
}

#[test]
fn normalize_splits_a_layer_skipping_arc_into_a_dummy_chain() {
    let mut layout = layer_skip();
    normalize::run(&mut layout).unwrap();

    let arc = layout.arc("a3").unwrap();
    assert_eq!(arc.path.len(), 2);
    assert_eq!((arc.min_layer, arc.max_layer), (Some(0), Some(3)));
    assert_eq!(layout.stats.dummy_vertices, 2);
    assert_eq!(layout.stage(), LayoutStage::ProperlyLayered);

    let (d0, d1) = (arc.path[0].clone(), arc.path[1].clone());
    assert!(d0.starts_with("_d"));
    assert_eq!(layout.node(&d0).unwrap().layer, Some(1));
    assert_eq!(layout.node(&d1).unwrap().layer, Some(2));
    assert_eq!(layout.layering[1], ["T1".to_string(), d0.clone()]);
    assert_eq!(layout.layering[2], ["P1".to_string(), d1.clone()]);

    let NodeKind::Dummy(first) = &layout.node(&d0).unwrap().kind else {
        panic!("expected a dummy");
    };
    assert_eq!((first.arc.as_str(), first.upper.as_str()), ("a3", "P0"));
    assert_eq!(first.lower, d1);
    let NodeKind::Dummy(second) = &layout.node(&d1).unwrap().kind else {
        panic!("expected a dummy");
    };
    assert_eq!((second.upper.as_str(), second.lower.as_str()), (d0.as_str(), "T2"));
}

#[test]
fn normalize_adds_boundary_arcs_around_each_chain() {
    let mut layout = layer_skip();
    normalize::run(&mut layout).unwrap();

    let path = layout.arc("a3").unwrap().path.clone();
    let boundary: Vec<(&str, &str)> = layout
        .arcs
        .values()
        .filter(|a| !a.original)
        .map(|a| (a.source.as_str(), a.target.as_str()))
        .collect();
    assert_eq!(boundary, [("P0", path[0].as_str()), (path[1].as_str(), "T2")]);
}

#[test]
fn normalize_produces_a_proper_layering() {
    let mut layout = layer_skip();
    normalize::run(&mut layout).unwrap();

    let hops = layout.hops();
    assert_eq!(hops.len(), 6);
    for hop in hops {
        let upper = layout.node(&hop.upper).unwrap().layer.unwrap();
        let lower = layout.node(&hop.lower).unwrap().layer.unwrap();
        assert_eq!(lower, upper + 1, "{hop:?}");
    }
}

#[test]
fn normalize_orders_chains_of_reversed_arcs_from_upper_to_lower() {
    let mut layout = layered(
        &["P0", "P1", "P2"],
        &["T0", "T1"],
        &[
            ("a0", "P0", "T0"),
            ("a1", "T0", "P1"),
            ("a2", "P1", "T1"),
            ("a3", "T1", "P2"),
            ("back", "T1", "P0"),
        ],
    );
    assert!(layout.arc("back").unwrap().reversed);
    normalize::run(&mut layout).unwrap();

    let path = &layout.arc("back").unwrap().path;
    assert_eq!(path.len(), 2);
    assert_eq!(layout.node(&path[0]).unwrap().layer, Some(1));
    assert_eq!(layout.node(&path[1]).unwrap().layer, Some(2));
}

#[test]
fn normalize_leaves_short_arcs_alone() {
    let mut layout = layered(&["P0", "P1"], &["T"], &[("a0", "P0", "T"), ("a1", "T", "P1")]);
    normalize::run(&mut layout).unwrap();
    assert_eq!(layout.stats.dummy_vertices, 0);
    assert_eq!(layout.arcs.len(), 2);
    assert!(layout.nodes.values().all(|n| !n.is_dummy()));
}

#[test]
fn normalize_rejects_a_layout_without_layers() {
    let mut net = Net::new();
    net.add_place(Place::new("P", "order")).unwrap();
    let mut layout = Layout::from_net(&net);
    let err = normalize::run(&mut layout).unwrap_err();
    assert!(matches!(err, Error::InternalInvariant { .. }));
}
