// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Lay out a weighted tree and print it as an SVG document.
//!
//! Run:
//! - `cargo run -p understory_pythagoras_demos --example pythagoras_svg > tree.svg`

use kurbo::{Point, Rect, Shape};
use understory_pythagoras::{Square, WeightedTree, compute_layout};

fn main() {
    // Uneven splits make the asymmetry visible.
    let mut adapter = WeightedTree::new(100);
    let a = adapter.push_child(0, 70);
    let b = adapter.push_child(0, 30);
    let a1 = adapter.push_child(a, 40);
    let _a2 = adapter.push_child(a, 30);
    let _b1 = adapter.push_child(b, 10);
    let _b2 = adapter.push_child(b, 20);
    let a11 = adapter.push_child(a1, 25);
    adapter.push_child(a1, 15);
    adapter.push_child(a11, 5);
    adapter.push_child(a11, 20);

    let tree = compute_layout(
        &adapter,
        Square::new(Point::ORIGIN, 200.0, -std::f64::consts::FRAC_PI_2),
    );

    let mut bounds = Rect::ZERO;
    let mut paths = Vec::with_capacity(tree.len());
    for (_, node) in tree.iter() {
        let square = node.square();
        let path = square.transform() * square.rect().to_path(0.1);
        bounds = if bounds == Rect::ZERO {
            path.bounding_box()
        } else {
            bounds.union(path.bounding_box())
        };
        // Deeper squares are lighter.
        let shade = 40 + 30 * node.depth().min(6);
        paths.push(format!(
            r#"  <path d="{}" fill="rgb({shade},122,31)" stroke="white" stroke-width="0.5"><title>node {}</title></path>"#,
            path.to_svg(),
            node.label(),
        ));
    }

    let view = bounds.inflate(10.0, 10.0);
    println!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="{} {} {} {}">"#,
        view.x0,
        view.y0,
        view.width(),
        view.height()
    );
    for p in paths {
        println!("{p}");
    }
    println!("</svg>");
}
