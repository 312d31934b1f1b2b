use std::f64::consts::PI;

use agtablette_designer::model::Coordinates;
use agtablette_designer::viewport::Viewport;

#[test]
fn test_dist_and_middle() {
    let a = Coordinates::new(0.0, 0.0);
    let b = Coordinates::new(3.0, 4.0);
    assert_eq!(a.dist(b), 5.0);
    assert_eq!(a.middle_with(b), Coordinates::new(1.5, 2.0));
}

#[test]
fn test_angle_with_is_in_zero_two_pi() {
    let c = Coordinates::new(10.0, 10.0);
    assert_eq!(c.angle_with(Coordinates::new(20.0, 10.0)), 0.0);
    assert!((c.angle_with(Coordinates::new(10.0, 20.0)) - PI / 2.0).abs() < 1e-9);
    assert!((c.angle_with(Coordinates::new(10.0, 0.0)) - 3.0 * PI / 2.0).abs() < 1e-9);
    // Just below the x axis wraps to 0 rather than 2π
    assert_eq!(c.angle_with(Coordinates::new(1e9, 10.0 - 1e-6)), 0.0);
}

#[test]
fn test_rotate_quarter_turn() {
    let p = Coordinates::new(2.0, 1.0);
    let rotated = p.rotate(PI / 2.0, Coordinates::new(1.0, 1.0));
    assert!(rotated.equal(Coordinates::new(1.0, 2.0)));
}

#[test]
fn test_equal_tolerance() {
    let a = Coordinates::new(1.0, 1.0);
    assert!(a.equal(Coordinates::new(1.0005, 1.0)));
    assert!(!a.equal(Coordinates::new(1.01, 1.0)));
    assert!(a.equal_within(Coordinates::new(1.01, 1.0), 0.1));
}

#[test]
fn test_operators() {
    let a = Coordinates::new(1.0, 2.0);
    let b = Coordinates::new(3.0, 5.0);
    assert_eq!(a + b, a.add(b));
    assert_eq!(b - a, b.substract(a));
    assert_eq!(a * 2.0, a.multiply(2.0));
    assert_eq!(-a, Coordinates::new(-1.0, -2.0));
    assert_eq!(a.multiply_xy(2.0, 3.0), Coordinates::new(2.0, 6.0));
    assert_eq!(a.dot(b), 13.0);
}

#[test]
fn test_canvas_conversion_with_zoom_and_offset() {
    let mut vp = Viewport::default();
    vp.set_zoom(2.0);
    vp.set_offset(Coordinates::new(10.0, -5.0));

    let world = Coordinates::new(3.0, 4.0);
    let canvas = world.to_canvas_coordinates(&vp);
    assert_eq!(canvas, Coordinates::new(16.0, 3.0));
    assert!(canvas.from_canvas_coordinates(&vp).equal(world));
}
