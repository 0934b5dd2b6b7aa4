use std::ops::Range;

/// Visible window over a list of `count` rows, each `item_height` lines tall,
/// drawn into a lane `lane_height` lines high.
///
/// When `count > 0`, `top <= selected <= bottom < count` always holds and the
/// window spans exactly [`Viewport::capacity`] rows unless the list is shorter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewport {
    top: usize,
    bottom: usize,
    selected: usize,
    count: usize,
    item_height: u16,
    lane_height: u16,
}

impl Viewport {
    pub fn new(item_height: u16) -> Self {
        Self {
            top: 0,
            bottom: 0,
            selected: 0,
            count: 0,
            item_height: item_height.max(1),
            lane_height: 0,
        }
    }

    pub fn top(&self) -> usize {
        self.top
    }

    pub fn bottom(&self) -> usize {
        self.bottom
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn item_height(&self) -> u16 {
        self.item_height
    }

    /// Rows that fit in the lane; never less than one.
    pub fn capacity(&self) -> usize {
        usize::from(self.lane_height / self.item_height).max(1)
    }

    /// Row indices currently on screen.
    pub fn window(&self) -> Range<usize> {
        if self.count == 0 {
            0..0
        } else {
            self.top..self.bottom + 1
        }
    }

    pub fn set_count(&mut self, count: usize) {
        let previous = self.count;
        self.count = count;
        if count == 0 {
            self.top = 0;
            self.bottom = 0;
            self.selected = 0;
            return;
        }
        if previous == 0 || count < previous {
            self.top = 0;
        }
        self.selected = self.selected.min(count - 1);
        self.fit();
    }

    pub fn resize(&mut self, lane_height: u16) {
        self.lane_height = lane_height;
        self.set_count(self.count);
    }

    pub fn set_item_height(&mut self, item_height: u16) {
        self.item_height = item_height.max(1);
        self.set_count(self.count);
    }

    pub fn move_next(&mut self) {
        if self.count == 0 {
            return;
        }
        self.selected = (self.selected + 1).min(self.count - 1);
        self.follow_selection();
    }

    pub fn move_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
        self.follow_selection();
    }

    pub fn page_down(&mut self) {
        if self.count == 0 {
            return;
        }
        self.selected = (self.selected + self.half_page()).min(self.count - 1);
        self.follow_selection();
    }

    pub fn page_up(&mut self) {
        self.selected = self.selected.saturating_sub(self.half_page());
        self.follow_selection();
    }

    pub fn first(&mut self) {
        self.selected = 0;
        self.top = 0;
        self.fit();
    }

    pub fn last(&mut self) {
        if self.count == 0 {
            return;
        }
        self.selected = self.count - 1;
        self.top = self.count.saturating_sub(self.capacity());
        self.fit();
    }

    fn half_page(&self) -> usize {
        (self.capacity() / 2).max(1)
    }

    /// Recompute `bottom` from `top`, pull `top` back if the window ran past the
    /// end, then shift by the minimum needed to keep the selection visible.
    fn fit(&mut self) {
        if self.count == 0 {
            return;
        }
        let capacity = self.capacity();
        let last = self.count - 1;

        self.top = self.top.min(last);
        self.bottom = (self.top + capacity - 1).min(last);
        if self.bottom - self.top + 1 < capacity {
            self.top = (self.bottom + 1).saturating_sub(capacity);
        }
        self.follow_selection();
    }

    fn follow_selection(&mut self) {
        if self.count == 0 {
            return;
        }
        let capacity = self.capacity();
        if self.selected < self.top {
            self.top = self.selected;
            self.bottom = (self.top + capacity - 1).min(self.count - 1);
        } else if self.selected > self.bottom {
            self.bottom = self.selected;
            self.top = (self.bottom + 1).saturating_sub(capacity);
        }
    }
}
