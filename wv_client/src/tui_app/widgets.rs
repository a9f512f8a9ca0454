//! Reusable input and scrollable-list state for the TUI.

use ratatui::widgets::{ListItem, ListState, ScrollbarState};

/// A bounded list of rendered items with scroll state.
///
/// Newest items sit at index 0 so a bottom-to-top list renders them at
/// the bottom. No selection means the view stays pinned to the newest
/// entry; scrolling up walks toward older entries.
pub struct ScrollableList {
    pub list_items: Vec<ListItem<'static>>,
    pub list_state: ListState,
    pub scroll_state: ScrollbarState,
    max_items: usize,
}

impl ScrollableList {
    pub fn new(max_items: usize) -> Self {
        Self {
            list_items: Vec::new(),
            list_state: ListState::default(),
            scroll_state: ScrollbarState::default(),
            max_items,
        }
    }

    /// Record a new item, dropping the oldest once the bound is reached.
    pub fn push(&mut self, item: ListItem<'static>) {
        self.list_items.insert(0, item);
        self.list_items.truncate(self.max_items);
        self.scroll_state = self.scroll_state.content_length(self.list_items.len());
    }

    /// Scroll one entry toward the oldest item.
    pub fn move_up(&mut self) {
        if self.list_items.is_empty() {
            return;
        }
        let last = self.list_items.len() - 1;
        let next = match self.list_state.selected() {
            Some(idx) => (idx + 1).min(last),
            None => 0,
        };
        self.list_state.select(Some(next));
        self.scroll_state = self.scroll_state.position(next);
    }

    /// Scroll one entry back toward the newest item.
    pub fn move_down(&mut self) {
        match self.list_state.selected() {
            None | Some(0) => self.jump_to_last(),
            Some(idx) => {
                self.list_state.select(Some(idx - 1));
                self.scroll_state = self.scroll_state.position(idx - 1);
            }
        }
    }

    /// Jump to the oldest entry.
    pub fn jump_to_first(&mut self) {
        if self.list_items.is_empty() {
            return;
        }
        let last = self.list_items.len() - 1;
        self.list_state.select(Some(last));
        self.scroll_state = self.scroll_state.position(last);
    }

    /// Jump back to the newest entry and re-pin the view to it.
    pub fn jump_to_last(&mut self) {
        self.list_state.select(None);
        self.scroll_state = self.scroll_state.position(0);
    }
}

/// Single-line input box state with cursor tracking.
pub struct UserInput {
    pub value: String,
    pub char_idx: usize,
}

impl UserInput {
    pub fn new() -> Self {
        Self {
            value: String::new(),
            char_idx: 0,
        }
    }

    fn byte_idx(&self) -> usize {
        self.value
            .char_indices()
            .map(|(idx, _)| idx)
            .nth(self.char_idx)
            .unwrap_or(self.value.len())
    }

    pub fn input(&mut self, c: char) {
        let idx = self.byte_idx();
        self.value.insert(idx, c);
        self.char_idx += 1;
    }

    pub fn backspace(&mut self) {
        if self.char_idx > 0 {
            self.char_idx -= 1;
            let idx = self.byte_idx();
            self.value.remove(idx);
        }
    }

    pub fn delete(&mut self) {
        if self.char_idx < self.value.chars().count() {
            let idx = self.byte_idx();
            self.value.remove(idx);
        }
    }

    pub fn move_left(&mut self) {
        self.char_idx = self.char_idx.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.char_idx = (self.char_idx + 1).min(self.value.chars().count());
    }

    pub fn jump_to_first(&mut self) {
        self.char_idx = 0;
    }

    pub fn jump_to_last(&mut self) {
        self.char_idx = self.value.chars().count();
    }

    /// Take the current value, clearing the input box.
    pub fn submit(&mut self) -> String {
        self.char_idx = 0;
        std::mem::take(&mut self.value)
    }
}

impl Default for UserInput {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_inserts_at_cursor() {
        let mut input = UserInput::new();
        for c in "adx".chars() {
            input.input(c);
        }
        input.move_left();
        input.input('d');
        assert_eq!(input.value, "addx");
        assert_eq!(input.char_idx, 3);
    }

    #[test]
    fn backspace_removes_before_cursor() {
        let mut input = UserInput::new();
        for c in "abc".chars() {
            input.input(c);
        }
        input.backspace();
        assert_eq!(input.value, "ab");
        input.jump_to_first();
        input.backspace();
        assert_eq!(input.value, "ab");
    }

    #[test]
    fn delete_removes_at_cursor() {
        let mut input = UserInput::new();
        for c in "abc".chars() {
            input.input(c);
        }
        input.jump_to_first();
        input.delete();
        assert_eq!(input.value, "bc");
    }

    #[test]
    fn submit_clears_the_box() {
        let mut input = UserInput::new();
        for c in "refresh".chars() {
            input.input(c);
        }
        assert_eq!(input.submit(), "refresh");
        assert!(input.value.is_empty());
        assert_eq!(input.char_idx, 0);
    }

    #[test]
    fn scrollable_list_is_bounded() {
        let mut list = ScrollableList::new(3);
        for i in 0..5 {
            list.push(ListItem::new(format!("record {i}")));
        }
        assert_eq!(list.list_items.len(), 3);
    }
}
