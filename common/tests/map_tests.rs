use marches_common::geo::{BoundingBox, LatLng, Polygon, point_in_polygon};
use marches_common::model::marche::Marche;
use marches_common::state::map::{DrawKind, MapController, MapEffect, MapError, MapMode};

fn marche(id: i64, lat: f64, lng: f64) -> Marche {
    Marche {
        id,
        num_marche: format!("{id}/2025"),
        objet: "Réfection de chaussée".into(),
        annee: 2025,
        num_boite: None,
        organisme: Some("Région Fès-Meknès".into()),
        type_communaute_publique: Some("Région".into()),
        latitude: Some(lat),
        longitude: Some(lng),
        created_at: None,
    }
}

#[test]
fn triangle_vertex_agrees_between_prefilter_and_exact_test() {
    let vertices = vec![
        LatLng::new(34.0, -5.0),
        LatLng::new(34.0, -4.0),
        LatLng::new(35.0, -4.5),
    ];
    let triangle = Polygon::new(vertices.clone()).expect("three vertices");
    let bbox = BoundingBox::of(&vertices).expect("non-empty");

    for vertex in &vertices {
        assert!(bbox.contains(*vertex));
        assert!(point_in_polygon(*vertex, triangle.ring()));
        assert!(triangle.contains(*vertex));
    }

    let outside = LatLng::new(34.9, -4.9);
    assert!(bbox.contains(outside));
    assert!(!triangle.contains(outside));
}

#[test]
fn point_just_past_an_edge_is_outside_for_both_tests() {
    let vertices = vec![
        LatLng::new(0.0, 0.0),
        LatLng::new(0.0, 2.0),
        LatLng::new(2.0, 2.0),
        LatLng::new(2.0, 0.0),
    ];
    let square = Polygon::new(vertices.clone()).expect("four vertices");
    let bbox = BoundingBox::of(&vertices).expect("non-empty");

    let on_edge = LatLng::new(1.0, 2.0);
    assert!(bbox.contains(on_edge));
    assert!(point_in_polygon(on_edge, square.ring()));

    let past_edge = LatLng::new(1.0, 2.0 + 1e-13);
    assert_eq!(bbox.contains(past_edge), point_in_polygon(past_edge, square.ring()));
    assert!(!square.contains(past_edge));

    let past_corner = LatLng::new(2.0 + 1e-13, 2.0);
    assert_eq!(bbox.contains(past_corner), point_in_polygon(past_corner, square.ring()));
}

#[test]
fn geometry_draw_without_selection_is_refused() {
    let mut map = MapController::default();
    map.set_marches(vec![marche(1, 34.0, -5.0)]);

    assert_eq!(
        map.start_geometry_draw(DrawKind::Polygon),
        Err(MapError::NoRecordSelected)
    );
    assert_eq!(map.mode(), &MapMode::Idle);
    assert_eq!(map.complete_shape(), Err(MapError::NotDrawing));
    let effects = map.click(LatLng::new(34.0, -5.0)).expect("idle click");
    assert!(!effects.iter().any(|e| matches!(e, MapEffect::SubmitGeometry { .. })));
}

#[test]
fn records_without_position_never_match_a_search() {
    let mut hidden = marche(2, 0.0, 0.0);
    hidden.latitude = None;
    let mut map = MapController::default();
    map.set_marches(vec![marche(1, 34.5, -4.5), hidden]);

    map.start_search_draw().expect("idle");
    for (lat, lng) in [(34.0, -5.0), (34.0, -4.0), (35.0, -4.0), (35.0, -5.0)] {
        map.click(LatLng::new(lat, lng)).expect("drawing");
    }
    let effects = map.complete_shape().expect("closed polygon");
    assert_eq!(effects[0], MapEffect::ShowResults { count: 1 });
    assert_eq!(map.results_page().total_items, 1);
}
