use agtablette_core::LayerKind;
use agtablette_designer::layer::Layer;
use agtablette_designer::model::{AxisKind, Coordinates, SymmetryAxis};

fn triangle_layer() -> (Layer, u64) {
    let mut layer = Layer::new(LayerKind::Main);
    let id = layer
        .add_polygon(
            "Triangle",
            "Test",
            "#000",
            &[
                Coordinates::new(0.0, 0.0),
                Coordinates::new(100.0, 0.0),
                Coordinates::new(0.0, 100.0),
            ],
        )
        .unwrap();
    (layer, id)
}

#[test]
fn test_polygon_path_is_closed() {
    let (layer, id) = triangle_layer();
    let shape = layer.shape(id).unwrap();
    assert_eq!(shape.path(&layer).unwrap(), "M 0 0 L 100 0 L 0 100 L 0 0 Z");
}

#[test]
fn test_polygon_hit_test_and_bounds() {
    let (layer, id) = triangle_layer();
    let shape = layer.shape(id).unwrap();
    assert!(shape.contains_point(Coordinates::new(10.0, 10.0), &layer).unwrap());
    assert!(!shape.contains_point(Coordinates::new(90.0, 90.0), &layer).unwrap());
    assert_eq!(shape.bounds(&layer).unwrap(), (0.0, 0.0, 100.0, 100.0));
}

#[test]
fn test_reflect_moves_owned_points() {
    let (mut layer, id) = triangle_layer();
    let axis = SymmetryAxis::new(AxisKind::Vertical, Coordinates::new(50.0, 0.0));
    {
        let (shape, points) = layer.shape_and_points(id).unwrap();
        shape.reflect(points, &axis).unwrap();
    }

    let shape = layer.shape(id).unwrap();
    assert!(shape.is_reversed);
    assert_eq!(shape.position(), Coordinates::new(100.0, 0.0));
    let vertices = shape.absolute_vertices(&layer).unwrap();
    let expected = [
        Coordinates::new(100.0, 0.0),
        Coordinates::new(0.0, 0.0),
        Coordinates::new(100.0, 100.0),
    ];
    assert_eq!(vertices.len(), 3);
    for (v, e) in vertices.iter().zip(expected) {
        assert!(v.equal(e), "{} != {}", v, e);
    }
}

#[test]
fn test_reflect_twice_restores_outline() {
    let (mut layer, id) = triangle_layer();
    let before = layer.shape(id).unwrap().absolute_vertices(&layer).unwrap();
    let axis = SymmetryAxis::new(AxisKind::NorthWest, Coordinates::new(20.0, 30.0));
    for _ in 0..2 {
        let (shape, points) = layer.shape_and_points(id).unwrap();
        shape.reflect(points, &axis).unwrap();
    }
    let shape = layer.shape(id).unwrap();
    assert!(!shape.is_reversed);
    let after = shape.absolute_vertices(&layer).unwrap();
    for (a, b) in before.iter().zip(&after) {
        assert!(a.equal(*b));
    }
}

#[test]
fn test_removing_polygon_frees_its_geometry() {
    let (mut layer, id) = triangle_layer();
    assert_eq!(layer.points().len(), 3);
    assert_eq!(layer.segments().len(), 3);
    layer.remove_shape(id).unwrap();
    assert!(layer.points().is_empty());
    assert!(layer.segments().is_empty());
    assert!(layer.is_empty());
}
