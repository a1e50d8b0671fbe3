//! Coordinate conversion between shell rects and wry rects.

use shoji_common::Rect;

/// Convert a logical-coordinate `Rect` to a wry `Rect`.
pub fn to_wry_rect(rect: &Rect) -> wry::Rect {
    wry::Rect {
        position: wry::dpi::Position::Logical(wry::dpi::LogicalPosition::new(rect.x, rect.y)),
        size: wry::dpi::Size::Logical(wry::dpi::LogicalSize::new(
            rect.width.max(0.0),
            rect.height.max(0.0),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_converts_to_logical_wry_rect() {
        let wry_rect = to_wry_rect(&Rect::new(100.0, 50.0, 800.0, 600.0));

        match wry_rect.position {
            wry::dpi::Position::Logical(pos) => {
                assert!((pos.x - 100.0).abs() < f64::EPSILON);
                assert!((pos.y - 50.0).abs() < f64::EPSILON);
            }
            _ => panic!("Expected logical position"),
        }
        match wry_rect.size {
            wry::dpi::Size::Logical(size) => {
                assert!((size.width - 800.0).abs() < f64::EPSILON);
                assert!((size.height - 600.0).abs() < f64::EPSILON);
            }
            _ => panic!("Expected logical size"),
        }
    }

    #[test]
    fn negative_size_is_clamped() {
        let wry_rect = to_wry_rect(&Rect::new(0.0, 0.0, -5.0, 10.0));
        match wry_rect.size {
            wry::dpi::Size::Logical(size) => assert_eq!(size.width, 0.0),
            _ => panic!("Expected logical size"),
        }
    }
}
