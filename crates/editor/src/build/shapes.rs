//! 2D shape outlines using kurbo, lifted onto the XY plane

use std::f64::consts::TAU;

use glam::Vec3;
use kurbo::{Circle as KCircle, Line as KLine, Point, Rect, Vec2};
use shared::Shape2D;

use crate::state::scene::Profile;

/// Convert kurbo Point to a point on z = 0
fn lift(p: Point) -> Vec3 {
    Vec3::new(p.x as f32, p.y as f32, 0.0)
}

/// Outline of a shape in local plane coordinates
pub fn outline(shape: &Shape2D) -> Profile {
    match shape {
        Shape2D::Point { x, y } => Profile::new(vec![lift(Point::new(*x, *y))], false),
        Shape2D::Line { x1, y1, x2, y2 } => {
            let line = KLine::new((*x1, *y1), (*x2, *y2));
            Profile::new(vec![lift(line.p0), lift(line.p1)], false)
        }
        Shape2D::Rectangle { width, height } => {
            let r = Rect::from_center_size(Point::ORIGIN, (*width, *height));
            let corners = [
                Point::new(r.x0, r.y0),
                Point::new(r.x1, r.y0),
                Point::new(r.x1, r.y1),
                Point::new(r.x0, r.y1),
            ];
            Profile::new(corners.into_iter().map(lift).collect(), true)
        }
        Shape2D::Circle { radius, resolution } => {
            let circle = KCircle::new(Point::ORIGIN, *radius);
            let n = (*resolution).max(3);
            let points = (0..n)
                .map(|i| {
                    let angle = TAU * i as f64 / n as f64;
                    lift(circle.center + Vec2::from_angle(angle) * circle.radius)
                })
                .collect();
            Profile::new(points, true)
        }
    }
}
