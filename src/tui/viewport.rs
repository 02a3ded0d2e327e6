//! Scrollable line viewport used by the diff screen

/// Window of `height` lines over some text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Viewport {
    lines: Vec<String>,
    offset: usize,
    height: usize,
}

impl Viewport {
    pub fn new(height: usize) -> Self {
        Self {
            height,
            ..Self::default()
        }
    }

    /// Replace the content and jump to the top
    pub fn set_content(&mut self, content: &str) {
        self.lines = if content.is_empty() {
            Vec::new()
        } else {
            content.split('\n').map(str::to_string).collect()
        };
        self.offset = 0;
    }

    pub fn set_height(&mut self, height: usize) {
        self.height = height;
        self.clamp();
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn total_lines(&self) -> usize {
        self.lines.len()
    }

    fn max_offset(&self) -> usize {
        self.lines.len().saturating_sub(self.height)
    }

    fn clamp(&mut self) {
        self.offset = self.offset.min(self.max_offset());
    }

    pub fn scroll_down(&mut self, n: usize) {
        self.offset = self.offset.saturating_add(n);
        self.clamp();
    }

    pub fn scroll_up(&mut self, n: usize) {
        self.offset = self.offset.saturating_sub(n);
    }

    pub fn line_down(&mut self) {
        self.scroll_down(1);
    }

    pub fn line_up(&mut self) {
        self.scroll_up(1);
    }

    pub fn page_down(&mut self) {
        self.scroll_down(self.height.max(1));
    }

    pub fn page_up(&mut self) {
        self.scroll_up(self.height.max(1));
    }

    pub fn goto_top(&mut self) {
        self.offset = 0;
    }

    /// Visible lines joined with newlines
    pub fn view(&self) -> String {
        let end = (self.offset + self.height).min(self.lines.len());
        self.lines[self.offset.min(end)..end].join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn numbered(n: usize) -> String {
        (0..n).map(|i| i.to_string()).collect::<Vec<_>>().join("\n")
    }

    #[test]
    fn test_view_window() {
        let mut vp = Viewport::new(2);
        vp.set_content(&numbered(5));
        assert_eq!(vp.view(), "0\n1");
        vp.line_down();
        assert_eq!(vp.view(), "1\n2");
        vp.page_down();
        assert_eq!(vp.view(), "3\n4");
        vp.page_down();
        assert_eq!(vp.offset(), 3);
        vp.goto_top();
        assert_eq!(vp.offset(), 0);
    }

    #[test]
    fn test_short_content_never_scrolls() {
        let mut vp = Viewport::new(10);
        vp.set_content("a\nb");
        vp.page_down();
        assert_eq!(vp.offset(), 0);
        assert_eq!(vp.view(), "a\nb");
    }

    #[test]
    fn test_shrinking_height_keeps_offset_valid() {
        let mut vp = Viewport::new(2);
        vp.set_content(&numbered(4));
        vp.scroll_down(10);
        assert_eq!(vp.offset(), 2);
        vp.set_height(10);
        assert_eq!(vp.offset(), 0);
    }

    #[derive(Debug, Clone)]
    enum Scroll {
        LineUp,
        LineDown,
        PageUp,
        PageDown,
    }

    fn scroll_strategy() -> impl Strategy<Value = Scroll> {
        prop_oneof![
            Just(Scroll::LineUp),
            Just(Scroll::LineDown),
            Just(Scroll::PageUp),
            Just(Scroll::PageDown),
        ]
    }

    proptest! {
        #[test]
        fn prop_offset_stays_clamped(
            total in 0usize..60,
            height in 0usize..20,
            ops in prop::collection::vec(scroll_strategy(), 0..40),
        ) {
            let mut vp = Viewport::new(height);
            vp.set_content(&numbered(total));
            let max = vp.total_lines().saturating_sub(height);
            for op in ops {
                match op {
                    Scroll::LineUp => vp.line_up(),
                    Scroll::LineDown => vp.line_down(),
                    Scroll::PageUp => vp.page_up(),
                    Scroll::PageDown => vp.page_down(),
                }
                prop_assert!(vp.offset() <= max);
            }
            vp.goto_top();
            prop_assert_eq!(vp.offset(), 0);
        }
    }
}
