mod common;

use common::{config, endcap_surface, global_muon, init_tracing, leaf, local_at, muon_tag};

use muon_det_cleaner::{
    cleaner_errors::CleanerError,
    collections::RecHitCollection,
    constants::MAX_DECOMPOSITION_DEPTH,
    det_id::{CscDetId, MuonDetId},
    event::{Event, InputTag},
    geometry::MuonGeometry,
    hits::{rec_hits::CscRecHit2D, HitKind, TrackingHit},
    muons::Muon,
    AnyCleaner, CscRecHitColCleaner, Technology,
};

fn layer(n: u8) -> CscDetId {
    CscDetId::new(2, 3, 1, 9, n).unwrap()
}

fn geometry() -> MuonGeometry {
    let mut geometry = MuonGeometry::new();
    for n in 1..=6 {
        geometry.add_csc_layer(layer(n), endcap_surface(-950.0 - 2.5 * f64::from(n)));
    }
    geometry
}

/// One hit per layer `1..=4`, all far from a muon at (η, φ) = (-2.0, 1.0).
fn far_hits(geometry: &MuonGeometry) -> Vec<CscRecHit2D> {
    (1..=4)
        .map(|n| {
            let surface = geometry.csc_layer(&layer(n)).unwrap();
            CscRecHit2D::new(layer(n), local_at(surface, -1.2, -1.0 + 0.1 * f64::from(n)))
        })
        .collect()
}

fn muon_on_layers(layers: &[u8]) -> Muon {
    global_muon(
        -2.0,
        1.0,
        layers
            .iter()
            .map(|n| leaf(HitKind::CscRecHit2D, layer(*n)))
            .collect(),
    )
}

fn event_with(id: u64, muons: Vec<Muon>, inputs: &[(&str, Vec<CscRecHit2D>)]) -> Event {
    let mut event = Event::new(id);
    event.put_muons(muon_tag(), muons);
    for (tag, hits) in inputs {
        event
            .csc_mut()
            .insert_input(tag.parse().unwrap(), hits.iter().cloned().collect());
    }
    event
}

#[test]
fn test_exact_match_veto() {
    // veto {2, 4} over hits on layers [1, 2, 3, 4] leaves [1, 3]
    let geometry = geometry();
    let hits = far_hits(&geometry);
    let mut event = event_with(1, vec![muon_on_layers(&[2, 4])], &[("csc2DRecHits", hits.clone())]);

    CscRecHitColCleaner::new(config(&["csc2DRecHits"]))
        .produce(&mut event, &geometry)
        .unwrap();

    let output = event.csc().output("").unwrap();
    assert_eq!(output.ids().copied().collect::<Vec<_>>(), vec![layer(1), layer(3)]);
    assert_eq!(
        output.iter().cloned().collect::<Vec<_>>(),
        vec![hits[0].clone(), hits[2].clone()]
    );
}

#[test]
fn test_collections_are_cleaned_independently() {
    let geometry = geometry();
    let hits = far_hits(&geometry);
    let a = hits[..3].to_vec();
    let b = hits[1..].to_vec();
    let muons = || vec![muon_on_layers(&[2])];

    let mut both = event_with(2, muons(), &[("csc2DRecHits:a", a.clone()), ("csc2DRecHits:b", b.clone())]);
    CscRecHitColCleaner::new(config(&["csc2DRecHits:a", "csc2DRecHits:b"]))
        .produce(&mut both, &geometry)
        .unwrap();

    for (instance, hits) in [("a", a), ("b", b)] {
        let tag = format!("csc2DRecHits:{instance}");
        let mut alone = event_with(3, muons(), &[(tag.as_str(), hits)]);
        CscRecHitColCleaner::new(config(&[tag.as_str()]))
            .produce(&mut alone, &geometry)
            .unwrap();

        assert_eq!(both.csc().output(instance), alone.csc().output(instance));
    }
    assert_eq!(both.csc().output("a").unwrap().len(), 2);
    assert_eq!(both.csc().output("b").unwrap().len(), 2);
}

#[test]
fn test_grouping_has_unique_sorted_keys() {
    let geometry = geometry();
    let mut hits = far_hits(&geometry);
    hits.extend(far_hits(&geometry).into_iter().rev());
    let mut event = event_with(4, Vec::new(), &[("csc2DRecHits", hits)]);

    let summary = CscRecHitColCleaner::new(config(&["csc2DRecHits"]))
        .produce(&mut event, &geometry)
        .unwrap();

    let output = event.csc().output("").unwrap();
    let ids: Vec<CscDetId> = output.ids().copied().collect();
    assert_eq!(ids, (1..=4).map(layer).collect::<Vec<_>>());
    for (id, range) in output.ranges() {
        assert_eq!(range.len(), 2);
        assert!(range.iter().all(|h| h.csc_id == *id));
    }
    assert_eq!(summary.total().n_kept, output.len());
}

#[test]
fn test_failing_event_does_not_affect_the_batch() {
    init_tracing();
    let geometry = geometry();
    let hits = far_hits(&geometry);
    let inputs = [("csc2DRecHits", hits.clone())];

    let stray = CscDetId::new(1, 4, 2, 30, 1).unwrap();
    let mut with_stray = hits.clone();
    with_stray.push(CscRecHit2D::new(stray, nalgebra::Point3::origin()));

    let mut too_deep = leaf(HitKind::CscRecHit2D, layer(1));
    for _ in 0..=MAX_DECOMPOSITION_DEPTH {
        too_deep = TrackingHit::composite(HitKind::CscSegment, layer(0).raw(), vec![too_deep]);
    }

    let mut events = vec![
        event_with(10, vec![muon_on_layers(&[1])], &inputs),
        event_with(11, vec![muon_on_layers(&[1]), Muon::untyped()], &inputs),
        event_with(12, vec![muon_on_layers(&[1])], &[("csc2DRecHits", with_stray)]),
        event_with(13, vec![global_muon(-2.0, 1.0, vec![too_deep])], &inputs),
        event_with(14, Vec::new(), &[("otherHits", hits.clone())]),
        event_with(15, vec![muon_on_layers(&[1])], &inputs),
    ];

    let cleaner = AnyCleaner::new(Technology::Csc, config(&["csc2DRecHits"]));
    let results = cleaner.process_events(&mut events, &geometry);

    assert_eq!(results.len(), 6);
    assert_eq!(results[0].as_ref().map(|s| s.event_id), Ok(10));
    assert_eq!(
        results[1].as_ref().err(),
        Some(&CleanerError::UnknownMuonType { index: 1 })
    );
    assert_eq!(
        results[2].as_ref().err(),
        Some(&CleanerError::UnknownGeometryElement {
            technology: Technology::Csc,
            raw_id: stray.raw()
        })
    );
    assert!(matches!(
        results[3],
        Err(CleanerError::DecompositionTooDeep { .. })
    ));
    assert_eq!(
        results[4].as_ref().err(),
        Some(&CleanerError::ProductNotFound("csc2DRecHits".into()))
    );
    assert_eq!(results[5].as_ref().map(|s| s.event_id), Ok(15));

    for (event, ok) in events.iter().zip([true, false, false, false, false, true]) {
        assert_eq!(event.csc().output("").is_some(), ok, "event {}", event.id());
    }
    assert_eq!(events[0].csc().output(""), events[5].csc().output(""));
    assert_eq!(events[5].csc().output("").unwrap().len(), 3);
}

#[test]
fn test_failing_collection_commits_no_sibling() {
    let geometry = geometry();
    let hits = far_hits(&geometry);
    let stray = CscDetId::new(1, 4, 2, 30, 1).unwrap();
    let mut with_stray = hits.clone();
    with_stray.push(CscRecHit2D::new(stray, nalgebra::Point3::origin()));

    let mut events = vec![
        event_with(
            40,
            vec![muon_on_layers(&[1])],
            &[("csc2DRecHits:a", hits.clone()), ("csc2DRecHits:b", with_stray)],
        ),
        event_with(
            41,
            vec![muon_on_layers(&[1])],
            &[("csc2DRecHits:a", hits.clone()), ("csc2DRecHits:b", hits)],
        ),
    ];

    let cleaner = CscRecHitColCleaner::new(config(&["csc2DRecHits:a", "csc2DRecHits:b"]));
    let results = cleaner.process_events(&mut events, &geometry);

    // "a" alone would have been cleaned without error
    assert_eq!(
        results[0].as_ref().err(),
        Some(&CleanerError::UnknownGeometryElement {
            technology: Technology::Csc,
            raw_id: stray.raw()
        })
    );
    assert!(events[0].csc().output("a").is_none());
    assert!(events[0].csc().output("b").is_none());
    assert_eq!(events[0].csc().n_outputs(), 0);

    let summary = results[1].as_ref().unwrap();
    assert_eq!(summary.event_id, 41);
    assert_eq!(summary.total().n_kept, 6);
    for instance in ["a", "b"] {
        let output = events[1].csc().output(instance).unwrap();
        assert_eq!(output.ids().copied().collect::<Vec<_>>(), vec![layer(2), layer(3), layer(4)]);
    }
}

#[test]
fn test_each_technology_writes_its_own_store() {
    let geometry = geometry();
    let mut event = event_with(30, Vec::new(), &[("hits", far_hits(&geometry))]);
    event
        .dt_mut()
        .insert_input(InputTag::new("hits", ""), RecHitCollection::new());
    event
        .rpc_mut()
        .insert_input(InputTag::new("hits", ""), RecHitCollection::new());

    for name in ["CSCRecHitColCleaner", "DTRecHitColCleaner", "RPCRecHitColCleaner"] {
        AnyCleaner::from_name(name, config(&["hits"]))
            .unwrap()
            .produce(&mut event, &geometry)
            .unwrap();
    }

    assert_eq!(event.csc().output("").unwrap().len(), 4);
    assert!(event.dt().output("").unwrap().is_empty());
    assert!(event.rpc().output("").unwrap().is_empty());
}
