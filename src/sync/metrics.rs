//! Proportional scroll mapping.

use serde::{Deserialize, Serialize};

/// Scroll geometry of one view, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrollMetrics {
    /// Current offset of the top edge
    pub scroll_top: f64,
    /// Full height of the scrollable content
    pub scroll_height: f64,
    /// Visible height of the viewport
    pub client_height: f64,
}

impl ScrollMetrics {
    /// Creates a new set of metrics.
    pub fn new(scroll_top: f64, scroll_height: f64, client_height: f64) -> Self {
        Self {
            scroll_top,
            scroll_height,
            client_height,
        }
    }

    /// Distance the view can travel; zero or negative when content fits.
    pub fn scroll_range(&self) -> f64 {
        self.scroll_height - self.client_height
    }

    /// Returns true if the content is taller than the viewport.
    pub fn overflows(&self) -> bool {
        self.scroll_range() > 0.0
    }

    /// Scroll position as a fraction of the range, if the view can scroll.
    pub fn fraction(&self) -> Option<f64> {
        self.overflows()
            .then(|| self.scroll_top / self.scroll_range())
    }
}

/// Maps the source position onto the target view.
///
/// Returns `None` when either view has nothing to scroll, leaving the
/// target untouched.
pub fn compute_scroll_sync(source: &ScrollMetrics, target: &ScrollMetrics) -> Option<f64> {
    let fraction = source.fraction()?;
    if !target.overflows() {
        return None;
    }
    Some(fraction * target.scroll_range())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_half_way() {
        let editor = ScrollMetrics::new(50.0, 200.0, 100.0);
        let preview = ScrollMetrics::new(0.0, 400.0, 100.0);
        assert_eq!(compute_scroll_sync(&editor, &preview), Some(150.0));
    }

    #[test]
    fn test_source_without_overflow() {
        let editor = ScrollMetrics::new(0.0, 100.0, 100.0);
        let preview = ScrollMetrics::new(30.0, 400.0, 100.0);
        assert_eq!(compute_scroll_sync(&editor, &preview), None);
    }

    #[test]
    fn test_target_without_overflow() {
        let editor = ScrollMetrics::new(10.0, 300.0, 100.0);
        let preview = ScrollMetrics::new(0.0, 80.0, 100.0);
        assert_eq!(compute_scroll_sync(&editor, &preview), None);
    }

    #[test]
    fn test_extremes() {
        let preview = ScrollMetrics::new(0.0, 1000.0, 200.0);
        let top = ScrollMetrics::new(0.0, 500.0, 100.0);
        let bottom = ScrollMetrics::new(400.0, 500.0, 100.0);
        assert_eq!(compute_scroll_sync(&top, &preview), Some(0.0));
        assert_eq!(compute_scroll_sync(&bottom, &preview), Some(800.0));
    }

    #[test]
    fn test_metrics_json_shape() {
        let metrics: ScrollMetrics =
            serde_json::from_str(r#"{"scrollTop":1,"scrollHeight":2,"clientHeight":3}"#).unwrap();
        assert_eq!(metrics, ScrollMetrics::new(1.0, 2.0, 3.0));
    }
}
