//! Link regions registered on a page.

use crate::geometry::{BBox, Point};
use crate::intern::LinkId;

/// A clickable page region and its target.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Link {
    /// Area of the link on the page.
    pub bbox: BBox,
    /// URI or destination string (e.g., "#page=3").
    pub uri: String,
}

/// The first link whose area contains `point`.
pub fn link_at(links: &[Link], point: Point) -> Option<LinkId> {
    links.iter().position(|l| l.bbox.contains_point(point))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn links() -> Vec<Link> {
        vec![
            Link {
                bbox: BBox::new(100.0, 200.0, 300.0, 220.0),
                uri: "https://example.com".to_string(),
            },
            Link {
                bbox: BBox::new(0.0, 0.0, 400.0, 400.0),
                uri: "#page=3".to_string(),
            },
        ]
    }

    #[test]
    fn test_first_registered_link_wins() {
        assert_eq!(link_at(&links(), Point::new(150.0, 210.0)), Some(0));
        assert_eq!(link_at(&links(), Point::new(10.0, 10.0)), Some(1));
    }

    #[test]
    fn test_point_outside_all_links() {
        assert_eq!(link_at(&links(), Point::new(500.0, 10.0)), None);
    }
}
