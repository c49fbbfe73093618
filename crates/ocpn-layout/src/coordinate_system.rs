//! Positioning works top-to-bottom. Left-to-right layouts swap node sizes before coordinate
//! assignment and swap coordinates and sizes back afterwards.

use crate::config::Direction;
use crate::layout::Layout;

pub fn adjust(layout: &mut Layout, direction: Direction) {
    match direction {
        Direction::LeftToRight => swap_width_height(layout),
        Direction::TopToBottom => {}
    }
}

pub fn undo(layout: &mut Layout, direction: Direction) {
    match direction {
        Direction::LeftToRight => {
            swap_xy(layout);
            swap_width_height(layout);
        }
        Direction::TopToBottom => {}
    }
}

fn swap_width_height(layout: &mut Layout) {
    for n in layout.nodes.values_mut() {
        (n.width, n.height) = (n.height, n.width);
    }
}

fn swap_xy(layout: &mut Layout) {
    for n in layout.nodes.values_mut() {
        if let (Some(x), Some(y)) = (n.x, n.y) {
            n.x = Some(y);
            n.y = Some(x);
        }
    }
    for a in layout.arcs.values_mut() {
        for p in &mut a.points {
            (p.x, p.y) = (p.y, p.x);
        }
    }
}
